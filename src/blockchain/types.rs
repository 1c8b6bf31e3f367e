//! Chain-specific types and error definitions.

use alloy::primitives::{Address, Bytes, TxHash, B256, U256};
use alloy::rpc::types::TransactionReceipt;
use serde::Serialize;
use thiserror::Error;

// Re-export TransactionConfig from config module to avoid duplication
pub use crate::config::schema::TransactionConfig;

/// Chain ID type for strong typing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChainId(pub u64);

impl From<u64> for ChainId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl From<ChainId> for u64 {
    fn from(id: ChainId) -> Self {
        id.0
    }
}

/// Errors that can occur while submitting a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    /// Private key could not be parsed or does not match the sender.
    #[error("Invalid private key format: {0}")]
    InvalidKeyFormat(String),

    /// Transport-level failure reaching the node (connection, timeout).
    #[error("Node unreachable: {0}")]
    NodeUnreachable(String),

    /// The node validated the request and refused it.
    #[error("Node rejected request: {0}")]
    NodeRejected(String),

    /// Pre-flight affordability check failed. Never reaches the network.
    #[error("Insufficient funds: required {required} wei, available {available} wei")]
    InsufficientFunds { required: U256, available: U256 },

    /// Call payload is neither empty nor a selector followed by whole ABI words.
    #[error("Malformed call payload of {len} bytes")]
    InvalidPayload { len: usize },

    /// Scaled gas limit does not fit in 64 bits.
    #[error("Gas estimate {estimate} overflows the gas limit")]
    GasOverflow { estimate: u64 },

    /// No mined receipt within the polling budget. The transaction may still confirm.
    #[error("Transaction {tx_hash} not confirmed after {attempts} attempts")]
    TimedOut { tx_hash: TxHash, attempts: u32 },

    /// Transaction was mined but execution failed on-chain.
    #[error("Transaction {tx_hash} reverted in block {block_number}")]
    Reverted { tx_hash: TxHash, block_number: u64 },

    /// Chain configuration mismatch.
    #[error("Chain ID mismatch: expected {expected}, got {actual}")]
    ChainMismatch { expected: u64, actual: u64 },
}

impl SubmitError {
    /// Whether the same request may succeed if tried again unchanged.
    ///
    /// `TimedOut` is transient in the sense that re-polling the hash may
    /// still yield a receipt; it must never lead to a resubmission.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::NodeUnreachable(_) | Self::TimedOut { .. })
    }

    /// Hash of the broadcast transaction, if the failure happened after broadcast.
    pub fn tx_hash(&self) -> Option<TxHash> {
        match self {
            Self::TimedOut { tx_hash, .. } | Self::Reverted { tx_hash, .. } => Some(*tx_hash),
            _ => None,
        }
    }
}

/// Result type for submission operations.
pub type SubmitResult<T> = Result<T, SubmitError>;

/// Node-issued record of a mined transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Receipt {
    pub transaction_hash: TxHash,
    /// Absent while the transaction is pending.
    pub block_number: Option<u64>,
    pub block_hash: Option<B256>,
    /// `true` when execution succeeded.
    pub status: bool,
    pub gas_used: u64,
    pub from: Address,
    pub to: Option<Address>,
}

impl Receipt {
    /// Whether this receipt confirms `tx_hash`: same hash and included in a block.
    pub fn confirms(&self, tx_hash: &TxHash) -> bool {
        self.transaction_hash == *tx_hash && self.block_number.is_some()
    }
}

impl From<TransactionReceipt> for Receipt {
    fn from(receipt: TransactionReceipt) -> Self {
        Self {
            transaction_hash: receipt.transaction_hash,
            block_number: receipt.block_number,
            block_hash: receipt.block_hash,
            status: receipt.status(),
            gas_used: receipt.gas_used,
            from: receipt.from,
            to: receipt.to,
        }
    }
}

/// Spending plan derived from a raw gas estimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GasPlan {
    pub estimated_gas: u64,
    pub gas_limit: u64,
    pub gas_price: u128,
    /// `gas_limit * gas_price + value`.
    pub total_cost: U256,
}

/// A logical contract call as supplied by UI collaborators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractCall {
    pub to: Address,
    /// ABI-encoded method call.
    pub data: Bytes,
    pub value: U256,
}

impl ContractCall {
    pub fn new(to: Address, data: impl Into<Bytes>) -> Self {
        Self {
            to,
            data: data.into(),
            value: U256::ZERO,
        }
    }

    pub fn with_value(mut self, value: U256) -> Self {
        self.value = value;
        self
    }
}

/// Final state of the receipt polling state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmationStatus {
    /// Mined and executed successfully.
    Confirmed(Receipt),
    /// Mined but reverted. Final, no further polling needed.
    Failed(Receipt),
    /// Attempts exhausted without a mined receipt. Inconclusive.
    TimedOut { attempts: u32 },
}
