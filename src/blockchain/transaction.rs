//! Transaction envelopes: unsigned assembly and the immutable signed form.
//!
//! # Responsibilities
//! - Validate the call payload shape
//! - Assemble the unsigned transaction from nonce, gas plan and call
//! - Hold the signed wire bytes and their hash without exposing mutation

use alloy::primitives::{Address, Bytes, TxHash, U256};

use crate::blockchain::types::{ContractCall, GasPlan, SubmitError, SubmitResult};

/// Length of an ABI function selector.
const SELECTOR_LEN: usize = 4;
/// Length of one ABI word.
const WORD_LEN: usize = 32;

/// Transaction fields prior to signing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsignedTransaction {
    pub from: Address,
    pub to: Address,
    /// Must equal the sender's on-chain transaction count at build time.
    pub nonce: u64,
    pub gas_limit: u64,
    pub gas_price: u128,
    pub value: U256,
    pub data: Bytes,
    pub chain_id: u64,
}

/// Signed, wire-ready transaction.
///
/// Fields are private: changing any of them would invalidate the signature,
/// so a modified transaction has to go through `wallet::sign` again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedTransaction {
    tx: UnsignedTransaction,
    raw: Bytes,
    hash: TxHash,
}

impl SignedTransaction {
    pub(crate) fn new(tx: UnsignedTransaction, raw: Bytes, hash: TxHash) -> Self {
        Self { tx, raw, hash }
    }

    /// EIP-2718 encoded bytes for `eth_sendRawTransaction`.
    pub fn raw(&self) -> &Bytes {
        &self.raw
    }

    /// Locally computed transaction hash.
    pub fn hash(&self) -> TxHash {
        self.hash
    }

    /// The fields that were signed.
    pub fn transaction(&self) -> &UnsignedTransaction {
        &self.tx
    }
}

/// Check that a payload is empty or a selector followed by whole ABI words.
pub fn validate_payload(data: &[u8]) -> SubmitResult<()> {
    if data.is_empty() {
        return Ok(());
    }
    if data.len() < SELECTOR_LEN || (data.len() - SELECTOR_LEN) % WORD_LEN != 0 {
        return Err(SubmitError::InvalidPayload { len: data.len() });
    }
    Ok(())
}

/// Assemble an unsigned transaction from already validated inputs.
pub fn build_transaction(
    from: Address,
    call: &ContractCall,
    nonce: u64,
    plan: &GasPlan,
    chain_id: u64,
) -> SubmitResult<UnsignedTransaction> {
    validate_payload(&call.data)?;

    Ok(UnsignedTransaction {
        from,
        to: call.to,
        nonce,
        gas_limit: plan.gas_limit,
        gas_price: plan.gas_price,
        value: call.value,
        data: call.data.clone(),
        chain_id,
    })
}
