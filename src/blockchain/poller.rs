//! Receipt polling and outcome classification.
//!
//! ```text
//! PENDING ──(matching receipt, block set, status ok)──▶ CONFIRMED
//!    │    ──(matching receipt, block set, reverted)──▶ FAILED
//!    └────(max_attempts queries without either)─────▶ TIMED_OUT
//! ```
//!
//! A query error is not terminal. It uses up one attempt and polling goes on,
//! so a flaky node is never mistaken for a failed transaction.

use alloy::primitives::TxHash;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;

use crate::blockchain::client::NodeClient;
use crate::blockchain::types::ConfirmationStatus;
use crate::observability::metrics;

/// Polls the node for the receipt of one transaction.
#[derive(Clone)]
pub struct ReceiptPoller {
    node: Arc<dyn NodeClient>,
}

impl ReceiptPoller {
    pub fn new(node: Arc<dyn NodeClient>) -> Self {
        Self { node }
    }

    /// Wait `interval` before each of at most `max_attempts` receipt queries.
    pub async fn await_receipt(
        &self,
        tx_hash: TxHash,
        max_attempts: u32,
        interval: Duration,
    ) -> ConfirmationStatus {
        for attempt in 1..=max_attempts {
            sleep(interval).await;

            match self.node.get_transaction_receipt(tx_hash).await {
                Ok(Some(receipt)) if receipt.confirms(&tx_hash) => {
                    metrics::record_poll_attempts(attempt);
                    let block_number = receipt.block_number.unwrap_or_default();
                    if receipt.status {
                        tracing::info!(%tx_hash, block_number, attempt, "Transaction confirmed");
                        return ConfirmationStatus::Confirmed(receipt);
                    }
                    tracing::warn!(%tx_hash, block_number, attempt, "Transaction reverted");
                    return ConfirmationStatus::Failed(receipt);
                }
                Ok(Some(receipt)) => {
                    tracing::debug!(
                        %tx_hash,
                        receipt_hash = %receipt.transaction_hash,
                        attempt,
                        "Receipt not yet usable"
                    );
                }
                Ok(None) => {
                    tracing::debug!(%tx_hash, attempt, max_attempts, "Transaction pending");
                }
                Err(e) => {
                    tracing::warn!(%tx_hash, attempt, max_attempts, error = %e, "Receipt query failed");
                }
            }
        }

        metrics::record_poll_attempts(max_attempts);
        tracing::warn!(%tx_hash, attempts = max_attempts, "Gave up waiting for receipt");
        ConfirmationStatus::TimedOut {
            attempts: max_attempts,
        }
    }
}
