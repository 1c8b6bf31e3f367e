//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, poll budget > 0)
//! - Check URLs and addresses parse
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: SubmitterConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;
use thiserror::Error;

use crate::config::schema::SubmitterConfig;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Check a configuration, collecting every problem found.
pub fn validate_config(config: &SubmitterConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if let Err(e) = config.node.rpc_url.parse::<url::Url>() {
        errors.push(ValidationError::new("node.rpc_url", e.to_string()));
    }
    for failover in &config.node.failover_urls {
        if let Err(e) = failover.parse::<url::Url>() {
            errors.push(ValidationError::new(
                "node.failover_urls",
                format!("'{}': {}", failover, e),
            ));
        }
    }
    if config.node.rpc_timeout_secs == 0 {
        errors.push(ValidationError::new("node.rpc_timeout_secs", "must be greater than 0"));
    }

    let tx = &config.transaction;
    if tx.chain_id == 0 {
        errors.push(ValidationError::new("transaction.chain_id", "must be greater than 0"));
    }
    if tx.gas_price_wei == 0 {
        errors.push(ValidationError::new("transaction.gas_price_wei", "must be greater than 0"));
    }
    if tx.gas_multiplier_percent < 100 {
        errors.push(ValidationError::new(
            "transaction.gas_multiplier_percent",
            "must be at least 100 (never below the estimate)",
        ));
    }
    if tx.max_poll_attempts == 0 {
        errors.push(ValidationError::new("transaction.max_poll_attempts", "must be greater than 0"));
    }

    if config.retries.read_attempts == 0 {
        errors.push(ValidationError::new("retries.read_attempts", "must be at least 1"));
    }
    if config.retries.base_delay_ms > config.retries.max_delay_ms {
        errors.push(ValidationError::new(
            "retries.base_delay_ms",
            "must not exceed retries.max_delay_ms",
        ));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!("'{}' is not a socket address", config.observability.metrics_address),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
