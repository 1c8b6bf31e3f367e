//! Submission of signed transactions to the node's pool.

use alloy::primitives::TxHash;
use std::sync::Arc;

use crate::blockchain::client::NodeClient;
use crate::blockchain::transaction::SignedTransaction;
use crate::blockchain::types::SubmitResult;

/// Hands signed envelopes to the node.
///
/// Never retries: a submit with an unknown outcome must be followed by
/// polling the original hash, not by a second submit.
#[derive(Clone)]
pub struct Broadcaster {
    node: Arc<dyn NodeClient>,
}

impl Broadcaster {
    pub fn new(node: Arc<dyn NodeClient>) -> Self {
        Self { node }
    }

    /// Submit `signed` and return the hash the node accepted it under.
    pub async fn submit(&self, signed: &SignedTransaction) -> SubmitResult<TxHash> {
        let tx = signed.transaction();
        let node_hash = self.node.send_raw_transaction(signed.raw().clone()).await?;

        if node_hash != signed.hash() {
            tracing::warn!(
                local_hash = %signed.hash(),
                node_hash = %node_hash,
                "Node returned a different transaction hash, tracking the node's"
            );
        }

        tracing::info!(
            tx_hash = %node_hash,
            from = %tx.from,
            to = %tx.to,
            nonce = tx.nonce,
            "Transaction broadcast"
        );
        Ok(node_hash)
    }
}
