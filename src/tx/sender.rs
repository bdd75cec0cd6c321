//! The send pipeline: one intent in, one confirmed submission out.
//!
//! Stages run in a fixed order, terminal on the first failure:
//! validate, balance check, fee estimate, build, sign, broadcast. The
//! balance check runs before any fee or build work so an underfunded
//! intent never produces a partial submission, and the nonce is read fresh
//! at build time so a stale value can never be reused.

use alloy::network::TransactionBuilder;
use alloy::primitives::{Address, U256};
use alloy::rpc::types::TransactionRequest;

use crate::chains::ChainDescriptor;
use crate::fees::{FeeEstimator, FeePricing};
use crate::rpc::RpcClient;
use crate::tx::erc20;
use crate::tx::types::{
    format_amount, parse_amount, SendError, SubmissionResult, TransferIntent,
};
use crate::wallet::AgentWallet;

/// Drives one transfer intent through to broadcast on a single chain.
///
/// Owns nothing shared: each sender holds its own RPC client and wallet
/// handle, so concurrent submissions on different chains cannot interfere.
pub struct TransferSender {
    chain: ChainDescriptor,
    rpc: RpcClient,
    estimator: FeeEstimator,
    wallet: AgentWallet,
}

impl TransferSender {
    pub fn new(
        chain: ChainDescriptor,
        rpc: RpcClient,
        estimator: FeeEstimator,
        wallet: AgentWallet,
    ) -> Self {
        Self {
            chain,
            rpc,
            estimator,
            wallet,
        }
    }

    /// The sending account.
    pub fn address(&self) -> Address {
        self.wallet.address()
    }

    /// Execute the pipeline for `intent`.
    ///
    /// `gas_price_override` forces a legacy gas price (zero allowed, for
    /// gasless chains).
    pub async fn send(
        &self,
        intent: &TransferIntent,
        gas_price_override: Option<u128>,
    ) -> Result<SubmissionResult, SendError> {
        let validated = intent.validate()?;
        let sender = self.wallet.address();

        // Balance check, then the draft used for gas simulation.
        let (amount, draft) = match validated.token {
            None => {
                let amount = parse_amount(&intent.amount, self.chain.decimals)?;
                let have = self.rpc.balance(sender).await?;
                if have < amount {
                    return Err(self.insufficient(have, amount, self.chain.decimals, None));
                }
                let draft = TransactionRequest::default()
                    .with_from(sender)
                    .with_to(validated.to)
                    .with_value(amount);
                (amount, draft)
            }
            Some(token) => {
                let decimals = erc20::decimals(&self.rpc, token).await?;
                let amount = parse_amount(&intent.amount, decimals)?;
                let have = erc20::balance_of(&self.rpc, token, sender).await?;
                if have < amount {
                    return Err(self.insufficient(have, amount, decimals, Some(token)));
                }
                let draft = TransactionRequest::default()
                    .with_from(sender)
                    .with_to(token)
                    .with_input(erc20::encode_transfer(validated.to, amount));
                (amount, draft)
            }
        };

        let fee = self
            .estimator
            .estimate(&self.rpc, self.chain.fee_market, &draft, gas_price_override)
            .await?;

        // Nonce is read here, not earlier and never cached: reusing a stale
        // nonce risks replacing or double-submitting a pending transaction.
        let nonce = self.rpc.nonce(sender).await?;

        let mut tx = draft
            .with_nonce(nonce)
            .with_chain_id(self.chain.chain_id)
            .with_gas_limit(fee.gas_limit);
        tx = match &fee.pricing {
            FeePricing::Eip1559 {
                priority_fee,
                max_fee,
                ..
            } => tx
                .with_max_fee_per_gas(*max_fee)
                .with_max_priority_fee_per_gas(*priority_fee),
            FeePricing::Legacy { gas_price } => tx.with_gas_price(*gas_price),
        };

        let raw = self
            .wallet
            .sign(tx)
            .await
            .map_err(|e| SendError::SigningFailed(e.to_string()))?;

        let tx_hash = self
            .rpc
            .broadcast(&raw)
            .await
            .map_err(SendError::BroadcastFailed)?;

        tracing::info!(
            chain = %self.chain.name,
            %tx_hash,
            nonce,
            gas_limit = fee.gas_limit,
            "Transaction broadcast"
        );

        let max_fee_wei = fee.max_cost_wei();
        // The fee is paid in the native asset regardless of what moved, so
        // the native deduction only includes the amount for native sends.
        let total_native_wei = if validated.token.is_none() {
            amount + max_fee_wei
        } else {
            max_fee_wei
        };

        Ok(SubmissionResult {
            explorer_url: self.chain.tx_url(&tx_hash.to_string()),
            tx_hash,
            fee,
            amount_wei: amount,
            max_fee_wei,
            total_native_wei,
        })
    }

    fn insufficient(
        &self,
        have: U256,
        need: U256,
        decimals: u8,
        token: Option<Address>,
    ) -> SendError {
        let symbol = match token {
            None => self.chain.symbol.clone(),
            Some(token) => format!("of token {}", token),
        };
        SendError::InsufficientBalance {
            have: format_amount(have, decimals),
            need: format_amount(need, decimals),
            symbol,
        }
    }
}
