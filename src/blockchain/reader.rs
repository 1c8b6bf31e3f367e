//! Read-only chain queries used to prepare a submission.

use alloy::primitives::{Address, Bytes, U256};
use std::sync::Arc;

use crate::blockchain::client::NodeClient;
use crate::blockchain::types::SubmitResult;

/// Nonce, balance and gas estimate lookups.
///
/// Errors are passed through untouched; retrying is the orchestrator's call.
#[derive(Clone)]
pub struct ChainReader {
    node: Arc<dyn NodeClient>,
}

impl ChainReader {
    pub fn new(node: Arc<dyn NodeClient>) -> Self {
        Self { node }
    }

    /// Current transaction count, which is the next nonce to use.
    pub async fn nonce(&self, address: Address) -> SubmitResult<u64> {
        let nonce = self.node.get_transaction_count(address).await?;
        tracing::debug!(%address, nonce, "Fetched nonce");
        Ok(nonce)
    }

    pub async fn balance(&self, address: Address) -> SubmitResult<U256> {
        let balance = self.node.get_balance(address).await?;
        tracing::debug!(%address, %balance, "Fetched balance");
        Ok(balance)
    }

    pub async fn estimate_gas(&self, from: Address, to: Address, data: Bytes) -> SubmitResult<u64> {
        let estimate = self.node.estimate_gas(from, to, data).await?;
        tracing::debug!(%from, %to, estimate, "Estimated gas");
        Ok(estimate)
    }
}
