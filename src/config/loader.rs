//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use crate::config::schema::SubmitterConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Environment variable overriding `node.rpc_url`.
pub const RPC_URL_ENV_VAR: &str = "SUBMITTER_RPC_URL";

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Validation(Vec<ValidationError>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Validation(errors) => {
                write!(f, "Validation failed: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Parse and validate configuration from TOML text.
pub fn parse_config(content: &str) -> Result<SubmitterConfig, ConfigError> {
    let config: SubmitterConfig = toml::from_str(content).map_err(ConfigError::Parse)?;
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Load and validate configuration from a TOML file.
///
/// With no path, defaults are used. `SUBMITTER_RPC_URL` overrides the node URL
/// before validation either way.
pub fn load_config(path: Option<&Path>) -> Result<SubmitterConfig, ConfigError> {
    let mut config = match path {
        Some(path) => {
            let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
            toml::from_str(&content).map_err(ConfigError::Parse)?
        }
        None => SubmitterConfig::default(),
    };

    apply_rpc_url_override(&mut config, rpc_url_override());

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Value of `SUBMITTER_RPC_URL`, if set.
///
/// Loading runs before logging is up, so callers log the override themselves.
pub fn rpc_url_override() -> Option<String> {
    std::env::var(RPC_URL_ENV_VAR).ok()
}

/// Replace `node.rpc_url` with `rpc_url` when present. Returns whether it did.
pub fn apply_rpc_url_override(config: &mut SubmitterConfig, rpc_url: Option<String>) -> bool {
    match rpc_url {
        Some(rpc_url) => {
            config.node.rpc_url = rpc_url;
            true
        }
        None => false,
    }
}
