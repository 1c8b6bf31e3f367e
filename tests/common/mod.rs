//! Shared utilities for pipeline integration tests.

use alloy::primitives::{keccak256, Address, Bytes, TxHash, U256};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

use contract_submitter::blockchain::{NodeClient, PrivateKey, Receipt, SubmitError, SubmitResult};

/// Anvil's first account. Publicly known, never use for real funds.
pub const TEST_PRIVATE_KEY: &str = "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

pub fn test_key() -> PrivateKey {
    PrivateKey::from_hex(TEST_PRIVATE_KEY).unwrap()
}

pub fn test_address() -> Address {
    test_key().address().unwrap()
}

/// Every call the fake node received, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeCall {
    GetTransactionCount(Address),
    GetBalance(Address),
    EstimateGas { from: Address, to: Address, data: Bytes },
    SendRawTransaction(Bytes),
    GetTransactionReceipt(TxHash),
}

/// Scripted answer to one receipt query.
#[derive(Debug, Clone, Copy)]
#[allow(dead_code)]
pub enum ReceiptStep {
    /// Node has no receipt yet.
    Pending,
    /// Receipt for the queried hash but without a block number.
    Unmined,
    /// Mined receipt for the queried hash.
    Mined { block_number: u64, status: bool },
    /// Mined receipt whose hash is not the queried one.
    ForeignHash,
    /// Query fails at the transport level.
    Error,
}

/// In-memory ledger node following a script.
///
/// Broadcasts are accepted under `keccak256(raw)`, like a real node, unless a
/// node hash is set. Receipt queries beyond the script answer `Pending`.
pub struct FakeNode {
    nonce: u64,
    balance: U256,
    estimate: SubmitResult<u64>,
    send_error: Option<SubmitError>,
    node_hash: Option<TxHash>,
    nonce_failures: Mutex<u32>,
    receipts: Mutex<VecDeque<ReceiptStep>>,
    calls: Mutex<Vec<NodeCall>>,
}

#[allow(dead_code)]
impl FakeNode {
    pub fn new(nonce: u64, estimate: u64, balance: U256) -> Self {
        Self {
            nonce,
            balance,
            estimate: Ok(estimate),
            send_error: None,
            node_hash: None,
            nonce_failures: Mutex::new(0),
            receipts: Mutex::new(VecDeque::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_receipts(self, steps: Vec<ReceiptStep>) -> Self {
        *self.receipts.lock().unwrap() = steps.into();
        self
    }

    pub fn with_estimate_error(mut self, error: SubmitError) -> Self {
        self.estimate = Err(error);
        self
    }

    pub fn with_send_error(mut self, error: SubmitError) -> Self {
        self.send_error = Some(error);
        self
    }

    /// Report broadcasts under `hash` instead of the keccak of the raw bytes.
    pub fn with_node_hash(mut self, hash: TxHash) -> Self {
        self.node_hash = Some(hash);
        self
    }

    /// Make the first `count` nonce reads fail as unreachable.
    pub fn with_nonce_failures(self, count: u32) -> Self {
        *self.nonce_failures.lock().unwrap() = count;
        self
    }

    pub fn calls(&self) -> Vec<NodeCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn receipt_queries(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, NodeCall::GetTransactionReceipt(_)))
            .count()
    }

    /// Raw bytes of the single broadcast, if any.
    pub fn broadcast(&self) -> Option<Bytes> {
        self.calls().into_iter().find_map(|c| match c {
            NodeCall::SendRawTransaction(raw) => Some(raw),
            _ => None,
        })
    }

    fn record(&self, call: NodeCall) {
        self.calls.lock().unwrap().push(call);
    }
}

fn receipt(tx_hash: TxHash, block_number: Option<u64>, status: bool) -> Receipt {
    Receipt {
        transaction_hash: tx_hash,
        block_number,
        block_hash: block_number.map(|_| TxHash::repeat_byte(0xbb)),
        status,
        gas_used: 21_000,
        from: Address::ZERO,
        to: None,
    }
}

#[async_trait]
impl NodeClient for FakeNode {
    async fn get_transaction_count(&self, address: Address) -> SubmitResult<u64> {
        self.record(NodeCall::GetTransactionCount(address));
        let mut failures = self.nonce_failures.lock().unwrap();
        if *failures > 0 {
            *failures -= 1;
            return Err(SubmitError::NodeUnreachable("connection refused".into()));
        }
        Ok(self.nonce)
    }

    async fn get_balance(&self, address: Address) -> SubmitResult<U256> {
        self.record(NodeCall::GetBalance(address));
        Ok(self.balance)
    }

    async fn estimate_gas(&self, from: Address, to: Address, data: Bytes) -> SubmitResult<u64> {
        self.record(NodeCall::EstimateGas { from, to, data });
        self.estimate.clone()
    }

    async fn send_raw_transaction(&self, raw: Bytes) -> SubmitResult<TxHash> {
        let hash = self.node_hash.unwrap_or_else(|| keccak256(&raw));
        self.record(NodeCall::SendRawTransaction(raw));
        match &self.send_error {
            Some(e) => Err(e.clone()),
            None => Ok(hash),
        }
    }

    async fn get_transaction_receipt(&self, tx_hash: TxHash) -> SubmitResult<Option<Receipt>> {
        self.record(NodeCall::GetTransactionReceipt(tx_hash));
        let step = self
            .receipts
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(ReceiptStep::Pending);
        match step {
            ReceiptStep::Pending => Ok(None),
            ReceiptStep::Unmined => Ok(Some(receipt(tx_hash, None, true))),
            ReceiptStep::Mined { block_number, status } => {
                Ok(Some(receipt(tx_hash, Some(block_number), status)))
            }
            ReceiptStep::ForeignHash => Ok(Some(receipt(TxHash::repeat_byte(0xee), Some(1), true))),
            ReceiptStep::Error => Err(SubmitError::NodeUnreachable("connection reset".into())),
        }
    }
}
