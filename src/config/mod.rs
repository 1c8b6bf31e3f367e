//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML) + SUBMITTER_RPC_URL
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → SubmitterConfig (validated, immutable)
//!     → handed explicitly to the node client and orchestrator
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks
//! - Nothing reads configuration from global state; the private key is
//!   never part of the file

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, rpc_url_override, ConfigError};
pub use schema::{NodeConfig, ObservabilityConfig, RetryConfig, SubmitterConfig, TransactionConfig};
