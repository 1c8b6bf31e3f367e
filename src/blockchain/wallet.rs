//! Private key handling, address derivation and transaction signing.
//!
//! # Security
//! - Private keys are loaded ONLY from environment variables or per-call input
//! - Keys are never logged or serialized
//! - Key bytes are zeroized when the `PrivateKey` is dropped
//! - `sign` consumes the key, so it cannot outlive the signing step

use alloy::consensus::{SignableTransaction, TxEnvelope, TxLegacy};
use alloy::eips::eip2718::Encodable2718;
use alloy::network::TxSignerSync;
use alloy::primitives::{hex, Address, TxKind, B256};
use alloy::signers::local::PrivateKeySigner;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use crate::blockchain::transaction::{SignedTransaction, UnsignedTransaction};
use crate::blockchain::types::{SubmitError, SubmitResult};

/// Environment variable name for the private key.
pub const PRIVATE_KEY_ENV_VAR: &str = "SUBMITTER_PRIVATE_KEY";

/// A secp256k1 private key, zeroized on drop.
///
/// Deliberately neither `Clone` nor `Serialize`.
pub struct PrivateKey {
    bytes: [u8; 32],
}

impl PrivateKey {
    /// Parse a hex-encoded private key (with or without 0x prefix).
    pub fn from_hex(private_key_hex: &str) -> SubmitResult<Self> {
        let key_hex = private_key_hex.trim();
        let key_hex = key_hex.strip_prefix("0x").unwrap_or(key_hex);

        let decoded = Zeroizing::new(
            hex::decode(key_hex)
                .map_err(|e| SubmitError::InvalidKeyFormat(format!("not valid hex: {}", e)))?,
        );
        Self::from_slice(&decoded)
    }

    /// Build a key from raw bytes, validating it is a usable scalar.
    pub fn from_slice(raw: &[u8]) -> SubmitResult<Self> {
        if raw.len() != 32 {
            return Err(SubmitError::InvalidKeyFormat(format!(
                "expected 32 bytes, got {}",
                raw.len()
            )));
        }
        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(raw);
        let key = Self { bytes };

        // Rejects zero and scalars >= the curve order.
        key.signer()?;
        Ok(key)
    }

    /// Load the key from `SUBMITTER_PRIVATE_KEY`.
    pub fn from_env() -> SubmitResult<Self> {
        let private_key = Zeroizing::new(std::env::var(PRIVATE_KEY_ENV_VAR).map_err(|_| {
            SubmitError::InvalidKeyFormat(format!(
                "Environment variable {} not set",
                PRIVATE_KEY_ENV_VAR
            ))
        })?);
        Self::from_hex(&private_key)
    }

    /// Public address for this key.
    pub fn address(&self) -> SubmitResult<Address> {
        Ok(self.signer()?.address())
    }

    fn signer(&self) -> SubmitResult<PrivateKeySigner> {
        PrivateKeySigner::from_bytes(&B256::from(self.bytes))
            .map_err(|e| SubmitError::InvalidKeyFormat(e.to_string()))
    }
}

impl Zeroize for PrivateKey {
    fn zeroize(&mut self) {
        self.bytes.zeroize();
    }
}

impl Drop for PrivateKey {
    fn drop(&mut self) {
        self.zeroize();
    }
}

impl ZeroizeOnDrop for PrivateKey {}

impl std::fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("PrivateKey(<redacted>)")
    }
}

/// Derive the account address of a hex-encoded private key.
pub fn derive_address(private_key_hex: &str) -> SubmitResult<Address> {
    PrivateKey::from_hex(private_key_hex)?.address()
}

/// Sign a transaction as an EIP-155 legacy envelope.
///
/// Signatures are RFC 6979 deterministic, so the same transaction and key
/// always produce the same bytes. The key is dropped (and zeroized) on return.
pub fn sign(tx: UnsignedTransaction, key: PrivateKey) -> SubmitResult<SignedTransaction> {
    let signer = key.signer()?;
    if signer.address() != tx.from {
        return Err(SubmitError::InvalidKeyFormat(format!(
            "key belongs to {}, transaction is from {}",
            signer.address(),
            tx.from
        )));
    }

    let mut legacy = TxLegacy {
        chain_id: Some(tx.chain_id),
        nonce: tx.nonce,
        gas_price: tx.gas_price,
        gas_limit: tx.gas_limit,
        to: TxKind::Call(tx.to),
        value: tx.value,
        input: tx.data.clone(),
    };

    let signature = signer
        .sign_transaction_sync(&mut legacy)
        .map_err(|e| SubmitError::InvalidKeyFormat(format!("Signing failed: {}", e)))?;

    let envelope = TxEnvelope::from(legacy.into_signed(signature));
    let hash = *envelope.tx_hash();
    let raw = envelope.encoded_2718();

    tracing::debug!(
        tx_hash = %hash,
        from = %tx.from,
        nonce = tx.nonce,
        "Transaction signed"
    );

    Ok(SignedTransaction::new(tx, raw.into(), hash))
}
