//! Contract call submission: gas budgeting, signing, broadcast and confirmation.

pub mod blockchain;
pub mod config;
pub mod observability;
pub mod resilience;

pub use blockchain::{ContractCall, PrivateKey, Receipt, RpcNode, SubmitError, TransactionOrchestrator};
pub use config::SubmitterConfig;
