//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the submitter.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Root configuration for the transaction submitter.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct SubmitterConfig {
    /// Ledger node connection settings.
    pub node: NodeConfig,

    /// Transaction building and confirmation settings.
    pub transaction: TransactionConfig,

    /// Retry policy for read calls.
    pub retries: RetryConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Ledger node connection configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct NodeConfig {
    /// JSON-RPC endpoint URL.
    pub rpc_url: String,

    /// Failover JSON-RPC endpoint URLs, used for reads only.
    pub failover_urls: Vec<String>,

    /// RPC request timeout in seconds.
    pub rpc_timeout_secs: u64,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            rpc_url: "http://localhost:8545".to_string(),
            failover_urls: Vec::new(),
            rpc_timeout_secs: 10,
        }
    }
}

/// Transaction pipeline configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct TransactionConfig {
    /// Chain ID for EIP-155 replay protection (80001 = Polygon Mumbai).
    pub chain_id: u64,

    /// Fixed gas price in wei.
    pub gas_price_wei: u64,

    /// Gas limit as a percentage of the node's estimate (200 = 2x).
    pub gas_multiplier_percent: u64,

    /// Delay before each receipt query in milliseconds.
    pub poll_interval_ms: u64,

    /// Receipt queries before giving up.
    pub max_poll_attempts: u32,
}

impl TransactionConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

impl Default for TransactionConfig {
    fn default() -> Self {
        Self {
            chain_id: 80001,
            gas_price_wei: 9_500_000_000,
            gas_multiplier_percent: 200,
            poll_interval_ms: 1000,
            max_poll_attempts: 30,
        }
    }
}

/// Retry configuration for node reads (nonce, balance, gas estimate).
///
/// Broadcasts are never retried.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct RetryConfig {
    /// Total attempts per read, including the first (1 = no retry).
    pub read_attempts: u32,

    /// Base delay for exponential backoff in milliseconds.
    pub base_delay_ms: u64,

    /// Maximum delay for exponential backoff in milliseconds.
    pub max_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            read_attempts: 1,
            base_delay_ms: 100,
            max_delay_ms: 2000,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Emit logs as JSON lines.
    pub json_logs: bool,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SubmitterConfig::default();
        assert_eq!(config.transaction.chain_id, 80001);
        assert_eq!(config.transaction.gas_price_wei, 9_500_000_000);
        assert_eq!(config.transaction.gas_multiplier_percent, 200);
        assert_eq!(config.transaction.max_poll_attempts, 30);
        assert_eq!(config.transaction.poll_interval(), Duration::from_secs(1));
        assert_eq!(config.retries.read_attempts, 1);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: SubmitterConfig = toml::from_str(
            r#"
            [node]
            rpc_url = "https://rpc-mumbai.example.org"

            [transaction]
            max_poll_attempts = 60
            "#,
        )
        .unwrap();

        assert_eq!(config.node.rpc_url, "https://rpc-mumbai.example.org");
        assert_eq!(config.node.rpc_timeout_secs, 10);
        assert_eq!(config.transaction.max_poll_attempts, 60);
        assert_eq!(config.transaction.chain_id, 80001);
        assert_eq!(config.observability, ObservabilityConfig::default());
    }
}
