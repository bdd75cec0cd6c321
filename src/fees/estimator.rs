//! Dual-mode gas-fee estimation.
//!
//! # Responsibilities
//! - Simulate the transaction for a gas limit (fatal on failure)
//! - Price EIP-1559 chains from the live base fee plus sampled priority fees
//! - Price legacy chains from `eth_gasPrice` or an explicit override
//!
//! Priority-fee sampling degrades to safer defaults instead of failing: a
//! too-low tip only risks slow inclusion, while a wrong gas limit risks
//! paying for a transaction that cannot execute. The two paths are kept
//! separate on purpose.

use alloy::consensus::{BlockHeader, Transaction as _};
use alloy::eips::BlockNumberOrTag;
use alloy::rpc::types::{Block, TransactionRequest};

use crate::chains::FeeMarket;
use crate::fees::envelope::{FeeEnvelope, FeeError, FeePricing};
use crate::rpc::RpcClient;

/// Recent blocks inspected when sampling priority fees.
pub const SAMPLE_BLOCKS: u64 = 4;

/// Transactions inspected per sampled block.
pub const SAMPLE_TXS_PER_BLOCK: usize = 20;

/// Percentile of sampled priority fees selected as the tip.
pub const PRIORITY_FEE_PERCENTILE: u8 = 75;

/// Floor for the priority fee: 0.1 gwei. Prevents zero-tip stalls on quiet
/// chains.
pub const MIN_PRIORITY_FEE_WEI: u128 = 100_000_000;

/// Priority fee used when sampling yields no data: 1.5 gwei.
pub const FALLBACK_PRIORITY_FEE_WEI: u128 = 1_500_000_000;

/// Multiplier applied to the base fee inside the max-fee computation, so the
/// transaction stays includable across several base-fee increases.
pub const BASE_FEE_SAFETY_MARGIN: u128 = 2;

/// Percentage added to the simulated gas estimate.
pub const GAS_LIMIT_BUFFER_PERCENT: u64 = 20;

/// Computes a [`FeeEnvelope`] for one pending transaction.
#[derive(Debug, Clone)]
pub struct FeeEstimator {
    sample_blocks: u64,
    sample_txs_per_block: usize,
    percentile: u8,
    min_priority_fee: u128,
    fallback_priority_fee: u128,
    safety_margin: u128,
    gas_buffer_percent: u64,
}

impl Default for FeeEstimator {
    fn default() -> Self {
        Self {
            sample_blocks: SAMPLE_BLOCKS,
            sample_txs_per_block: SAMPLE_TXS_PER_BLOCK,
            percentile: PRIORITY_FEE_PERCENTILE,
            min_priority_fee: MIN_PRIORITY_FEE_WEI,
            fallback_priority_fee: FALLBACK_PRIORITY_FEE_WEI,
            safety_margin: BASE_FEE_SAFETY_MARGIN,
            gas_buffer_percent: GAS_LIMIT_BUFFER_PERCENT,
        }
    }
}

impl FeeEstimator {
    /// Estimate the full fee envelope for `draft`.
    ///
    /// `gas_price_override` forces a specific legacy gas price (zero allowed,
    /// for gasless chains); it also applies when an EIP-1559 chain falls back
    /// to legacy pricing because the latest block carries no base fee.
    pub async fn estimate(
        &self,
        rpc: &RpcClient,
        fee_market: FeeMarket,
        draft: &TransactionRequest,
        gas_price_override: Option<u128>,
    ) -> Result<FeeEnvelope, FeeError> {
        // Gas limit first: its failure is fatal, so don't sample fees for a
        // transaction that cannot be priced at all.
        let simulated = rpc
            .estimate_gas(draft)
            .await
            .map_err(|source| FeeError::GasEstimationFailed { source })?;
        let gas_limit = simulated + simulated * self.gas_buffer_percent / 100;

        let pricing = match fee_market {
            FeeMarket::Legacy => self.legacy(rpc, gas_price_override).await?,
            FeeMarket::Eip1559 => self.eip1559(rpc, gas_price_override).await?,
        };

        tracing::debug!(gas_limit, ?pricing, "Fee envelope computed");
        Ok(FeeEnvelope { pricing, gas_limit })
    }

    async fn legacy(
        &self,
        rpc: &RpcClient,
        gas_price_override: Option<u128>,
    ) -> Result<FeePricing, FeeError> {
        let gas_price = match gas_price_override {
            Some(price) => price,
            None => rpc.gas_price().await?,
        };
        Ok(FeePricing::Legacy { gas_price })
    }

    async fn eip1559(
        &self,
        rpc: &RpcClient,
        gas_price_override: Option<u128>,
    ) -> Result<FeePricing, FeeError> {
        let latest = rpc.block_with_transactions(BlockNumberOrTag::Latest).await?;
        let Some(latest) = latest else {
            tracing::warn!("No latest block returned, falling back to legacy pricing");
            return self.legacy(rpc, gas_price_override).await;
        };
        // A chain tagged EIP-1559 that serves blocks without a base fee is
        // not actually pricing that way at this height.
        let Some(base_fee) = latest.header.base_fee_per_gas() else {
            tracing::warn!("Latest block has no base fee, falling back to legacy pricing");
            return self.legacy(rpc, gas_price_override).await;
        };

        let samples = self.sample_priority_fees(rpc, &latest).await;
        Ok(self.price_eip1559(base_fee as u128, samples))
    }

    /// Walk backwards from the latest block collecting observed priority
    /// fees. Every failure degrades to whatever was collected so far.
    async fn sample_priority_fees(&self, rpc: &RpcClient, latest: &Block) -> Vec<u128> {
        let mut samples = Vec::new();
        collect_priority_fees(latest, self.sample_txs_per_block, &mut samples);

        let newest = latest.header.number();
        for offset in 1..self.sample_blocks {
            let Some(number) = newest.checked_sub(offset) else {
                break;
            };
            match rpc
                .block_with_transactions(BlockNumberOrTag::Number(number))
                .await
            {
                Ok(Some(block)) => {
                    collect_priority_fees(&block, self.sample_txs_per_block, &mut samples)
                }
                Ok(None) => break,
                Err(err) => {
                    tracing::warn!(
                        block = number,
                        error = %err,
                        "Priority fee sampling degraded, continuing with collected samples"
                    );
                    break;
                }
            }
        }
        samples
    }

    fn price_eip1559(&self, base_fee: u128, samples: Vec<u128>) -> FeePricing {
        let priority_fee = select_priority_fee(
            samples,
            self.percentile,
            self.min_priority_fee,
            self.fallback_priority_fee,
        );
        let max_fee = self.safety_margin * base_fee + priority_fee;
        FeePricing::Eip1559 {
            base_fee,
            priority_fee,
            max_fee,
        }
    }
}

fn collect_priority_fees(block: &Block, limit: usize, out: &mut Vec<u128>) {
    for tx in block.transactions.txns().take(limit) {
        if let Some(fee) = tx.max_priority_fee_per_gas() {
            out.push(fee);
        }
    }
}

/// Select the configured percentile of the samples, floored at the minimum;
/// an empty window yields the fixed fallback.
fn select_priority_fee(mut samples: Vec<u128>, percentile: u8, floor: u128, fallback: u128) -> u128 {
    if samples.is_empty() {
        return fallback.max(floor);
    }
    samples.sort_unstable();
    let index = (samples.len() - 1) * percentile as usize / 100;
    samples[index].max(floor)
}
