//! End-to-end execution of one contract call.
//!
//! # Responsibilities
//! - Reject malformed payloads before any node call
//! - Read nonce, gas estimate and balance (with the read retry policy)
//! - Budget gas and refuse unaffordable calls before signing
//! - Build, sign, broadcast, and wait for the receipt
//!
//! # Known limitation
//! The nonce is read fresh on every call and never reserved. Two concurrent
//! `execute` calls for the same account can pick the same nonce; the node
//! decides which one wins. Callers that need ordering must keep at most one
//! `execute` per account in flight.

use alloy::primitives::{Address, TxHash, U256};
use std::sync::Arc;

use crate::blockchain::broadcast::Broadcaster;
use crate::blockchain::client::NodeClient;
use crate::blockchain::gas::GasBudgeter;
use crate::blockchain::poller::ReceiptPoller;
use crate::blockchain::reader::ChainReader;
use crate::blockchain::transaction::{build_transaction, validate_payload};
use crate::blockchain::types::{
    ConfirmationStatus, ContractCall, Receipt, SubmitError, SubmitResult, TransactionConfig,
};
use crate::blockchain::wallet::{self, PrivateKey};
use crate::config::{RetryConfig, SubmitterConfig};
use crate::observability::metrics;
use crate::resilience::retries::retry_read;

/// Composes reader, budgeter, builder, signer, broadcaster and poller.
///
/// Holds no per-account state; one instance can serve many callers.
#[derive(Clone)]
pub struct TransactionOrchestrator {
    reader: ChainReader,
    budgeter: GasBudgeter,
    broadcaster: Broadcaster,
    poller: ReceiptPoller,
    transaction: TransactionConfig,
    retries: RetryConfig,
}

impl TransactionOrchestrator {
    pub fn new(node: Arc<dyn NodeClient>, config: &SubmitterConfig) -> Self {
        Self {
            reader: ChainReader::new(node.clone()),
            budgeter: GasBudgeter::new(config.transaction.gas_multiplier_percent),
            broadcaster: Broadcaster::new(node.clone()),
            poller: ReceiptPoller::new(node),
            transaction: config.transaction.clone(),
            retries: config.retries.clone(),
        }
    }

    /// Read-only access for callers that only need nonce or balance.
    pub fn reader(&self) -> &ChainReader {
        &self.reader
    }

    /// Execute `call` as the account owning `key` and wait for its receipt.
    ///
    /// Errors returned after the broadcast (`TimedOut`, `Reverted`) carry the
    /// transaction hash. On `TimedOut`, poll that hash with `await_receipt`
    /// instead of calling `execute` again.
    pub async fn execute(&self, key: PrivateKey, call: ContractCall) -> SubmitResult<Receipt> {
        let result = self.submit_and_confirm(key, call).await;
        metrics::record_transaction(outcome_label(&result));
        result
    }

    /// Same as `execute`, with the destination, payload and value given separately.
    pub async fn execute_call(
        &self,
        key: PrivateKey,
        to: Address,
        data: impl Into<alloy::primitives::Bytes>,
        value: U256,
    ) -> SubmitResult<Receipt> {
        self.execute(key, ContractCall::new(to, data).with_value(value))
            .await
    }

    /// Poll an already broadcast transaction with the configured budget.
    pub async fn await_receipt(&self, tx_hash: TxHash) -> SubmitResult<Receipt> {
        let status = self
            .poller
            .await_receipt(
                tx_hash,
                self.transaction.max_poll_attempts,
                self.transaction.poll_interval(),
            )
            .await;

        match status {
            ConfirmationStatus::Confirmed(receipt) => Ok(receipt),
            ConfirmationStatus::Failed(receipt) => Err(SubmitError::Reverted {
                tx_hash,
                block_number: receipt.block_number.unwrap_or_default(),
            }),
            ConfirmationStatus::TimedOut { attempts } => {
                Err(SubmitError::TimedOut { tx_hash, attempts })
            }
        }
    }

    async fn submit_and_confirm(&self, key: PrivateKey, call: ContractCall) -> SubmitResult<Receipt> {
        let from = key.address()?;
        let to = call.to;
        let data = &call.data;

        tracing::info!(%from, %to, value = %call.value, data_len = data.len(), "Executing contract call");

        // Local checks first: a malformed payload never reaches the node.
        validate_payload(data)?;

        let nonce = retry_read(&self.retries, "nonce", move || self.reader.nonce(from)).await?;
        let estimate = retry_read(&self.retries, "estimate_gas", move || {
            self.reader.estimate_gas(from, to, data.clone())
        })
        .await?;
        let balance = retry_read(&self.retries, "balance", move || self.reader.balance(from)).await?;

        let plan = self.budgeter.plan(
            estimate,
            u128::from(self.transaction.gas_price_wei),
            call.value,
            balance,
        )?;
        tracing::debug!(
            nonce,
            estimated_gas = plan.estimated_gas,
            gas_limit = plan.gas_limit,
            gas_price = plan.gas_price,
            total_cost = %plan.total_cost,
            "Gas plan ready"
        );

        let unsigned = build_transaction(from, &call, nonce, &plan, self.transaction.chain_id)?;
        let signed = wallet::sign(unsigned, key)?;
        let tx_hash = self.broadcaster.submit(&signed).await?;

        self.await_receipt(tx_hash).await
    }
}

fn outcome_label(result: &SubmitResult<Receipt>) -> &'static str {
    match result {
        Ok(_) => "confirmed",
        Err(SubmitError::Reverted { .. }) => "reverted",
        Err(SubmitError::TimedOut { .. }) => "timed_out",
        Err(SubmitError::InsufficientFunds { .. }) => "insufficient_funds",
        Err(SubmitError::NodeRejected(_)) => "rejected",
        Err(SubmitError::NodeUnreachable(_)) => "unreachable",
        Err(_) => "invalid_input",
    }
}
