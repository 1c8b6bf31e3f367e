//! Transaction submission pipeline.
//!
//! # Data Flow
//! ```text
//! PrivateKey (per call, zeroized on drop) + ContractCall
//!     → reader.rs (nonce, gas estimate, balance via NodeClient)
//!     → gas.rs (gas limit, total cost, affordability)
//!     → transaction.rs (unsigned envelope)
//!     → wallet.rs (sign; consumes the key)
//!     → broadcast.rs (eth_sendRawTransaction)
//!     → poller.rs (bounded receipt polling)
//!     → Receipt | SubmitError
//! ```
//! `orchestrator.rs` drives the sequence; `client.rs` is the node seam.
//!
//! # Security Constraints
//! - Private keys ONLY from environment variables or per-call input
//! - Never log private keys or sensitive data
//! - All RPC calls have configurable timeouts
//! - Affordability is checked before a signature exists

pub mod broadcast;
pub mod client;
pub mod gas;
pub mod orchestrator;
pub mod poller;
pub mod reader;
pub mod transaction;
pub mod types;
pub mod wallet;

pub use client::{NodeClient, RpcNode};
pub use orchestrator::TransactionOrchestrator;
pub use types::{ChainId, ConfirmationStatus, ContractCall, GasPlan, Receipt, SubmitError, SubmitResult};
pub use wallet::PrivateKey;
