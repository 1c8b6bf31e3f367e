//! Gas budgeting: raw node estimate into an affordable spending plan.

use alloy::primitives::U256;

use crate::blockchain::types::{GasPlan, SubmitError, SubmitResult};

/// Default safety multiplier applied to node estimates, in percent.
pub const DEFAULT_GAS_MULTIPLIER_PERCENT: u64 = 200;

/// Converts gas estimates into plans using a fixed multiplier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GasBudgeter {
    multiplier_percent: u64,
}

impl Default for GasBudgeter {
    fn default() -> Self {
        Self::new(DEFAULT_GAS_MULTIPLIER_PERCENT)
    }
}

impl GasBudgeter {
    pub fn new(multiplier_percent: u64) -> Self {
        Self { multiplier_percent }
    }

    /// `ceil(raw_estimate * multiplier)` in exact integer arithmetic.
    pub fn gas_limit(&self, raw_estimate: u64) -> SubmitResult<u64> {
        let scaled = (raw_estimate as u128) * (self.multiplier_percent as u128);
        let limit = scaled.div_ceil(100);
        u64::try_from(limit).map_err(|_| SubmitError::GasOverflow {
            estimate: raw_estimate,
        })
    }

    /// Build a plan and check it against the sender's balance.
    ///
    /// Runs before signing: an unaffordable transaction never gets a signature.
    pub fn plan(
        &self,
        raw_estimate: u64,
        gas_price: u128,
        value: U256,
        balance: U256,
    ) -> SubmitResult<GasPlan> {
        let gas_limit = self.gas_limit(raw_estimate)?;
        let total_cost = U256::from(gas_limit)
            .saturating_mul(U256::from(gas_price))
            .saturating_add(value);

        if total_cost > balance {
            tracing::warn!(
                required = %total_cost,
                available = %balance,
                gas_limit = gas_limit,
                gas_price = gas_price,
                "Insufficient funds for transaction"
            );
            return Err(SubmitError::InsufficientFunds {
                required: total_cost,
                available: balance,
            });
        }

        Ok(GasPlan {
            estimated_gas: raw_estimate,
            gas_limit,
            gas_price,
            total_cost,
        })
    }
}
