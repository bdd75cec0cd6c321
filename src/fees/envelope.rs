//! Priced fee parameters for one pending transaction.

use alloy::primitives::U256;
use serde::Serialize;
use thiserror::Error;

use crate::rpc::RpcError;

/// Fee pricing, tagged by the market variant it was computed under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "variant")]
pub enum FeePricing {
    /// Base fee + priority fee split. Invariant:
    /// `max_fee >= safety_margin * base_fee + priority_fee`.
    Eip1559 {
        base_fee: u128,
        priority_fee: u128,
        max_fee: u128,
    },
    /// Single gas price; zero is valid on gasless chains.
    Legacy { gas_price: u128 },
}

/// The full cost parameters for one transaction: pricing plus a gas limit
/// carrying a fixed buffer over the simulated estimate.
///
/// Computed fresh per transaction; the base fee moves every block, so an
/// envelope is never reused.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeeEnvelope {
    #[serde(flatten)]
    pub pricing: FeePricing,
    pub gas_limit: u64,
}

impl FeeEnvelope {
    /// The per-unit price ceiling the sender can be charged.
    pub fn price_ceiling(&self) -> u128 {
        match self.pricing {
            FeePricing::Eip1559 { max_fee, .. } => max_fee,
            FeePricing::Legacy { gas_price } => gas_price,
        }
    }

    /// Worst-case total fee in wei: gas limit times the price ceiling.
    pub fn max_cost_wei(&self) -> U256 {
        U256::from(self.gas_limit) * U256::from(self.price_ceiling())
    }
}

/// Errors from fee estimation.
#[derive(Debug, Error)]
pub enum FeeError {
    /// The gas simulation failed. Fatal: an undersized limit can burn the
    /// whole fee on a guaranteed execution failure.
    #[error("gas limit estimation failed: {source}")]
    GasEstimationFailed {
        #[source]
        source: RpcError,
    },

    /// A required fee feed (gas price, latest block) exhausted all endpoints.
    #[error(transparent)]
    Rpc(#[from] RpcError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_max_cost_uses_price_ceiling() {
        let envelope = FeeEnvelope {
            pricing: FeePricing::Eip1559 {
                base_fee: 10,
                priority_fee: 2,
                max_fee: 22,
            },
            gas_limit: 21_000,
        };
        assert_eq!(envelope.price_ceiling(), 22);
        assert_eq!(envelope.max_cost_wei(), U256::from(21_000u64 * 22));
    }

    #[test]
    fn test_gasless_envelope_costs_nothing() {
        let envelope = FeeEnvelope {
            pricing: FeePricing::Legacy { gas_price: 0 },
            gas_limit: 21_000,
        };
        assert_eq!(envelope.max_cost_wei(), U256::ZERO);
    }
}
