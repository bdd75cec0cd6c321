//! Transfer intents, submission results, and pipeline errors.

use alloy::primitives::utils::{format_units, parse_units};
use alloy::primitives::{Address, TxHash, U256};
use serde::Serialize;
use thiserror::Error;

use crate::fees::{FeeEnvelope, FeeError};
use crate::rpc::RpcError;

/// A logical transfer: "send N of token T to R". The sender is implicit,
/// always the local account.
#[derive(Debug, Clone)]
pub struct TransferIntent {
    /// Recipient address.
    pub to: String,
    /// Decimal amount in asset units (e.g. "0.5").
    pub amount: String,
    /// Token contract address; `None` means the chain's native asset.
    pub token: Option<String>,
}

/// A [`TransferIntent`] whose fields parsed. Produced before any network
/// call is made.
#[derive(Debug, Clone, Copy)]
pub struct ValidatedIntent {
    pub to: Address,
    pub token: Option<Address>,
}

impl TransferIntent {
    /// Check address syntax and that the amount is a positive decimal.
    /// Purely local; token decimals are resolved later, on the network.
    pub fn validate(&self) -> Result<ValidatedIntent, SendError> {
        let to: Address = self
            .to
            .parse()
            .map_err(|_| SendError::InvalidAddress(self.to.clone()))?;
        let token = match &self.token {
            Some(raw) => Some(
                raw.parse::<Address>()
                    .map_err(|_| SendError::InvalidAddress(raw.clone()))?,
            ),
            None => None,
        };
        // Scale-independent syntax and non-zero check; the exact base-unit
        // value is parsed once the asset's decimals are known.
        parse_amount(&self.amount, 18)?;
        Ok(ValidatedIntent { to, token })
    }
}

/// Terminal outcome of a successful submission.
#[derive(Debug, Clone, Serialize)]
pub struct SubmissionResult {
    /// Transaction hash accepted by the network.
    pub tx_hash: TxHash,
    /// The fee envelope actually used.
    pub fee: FeeEnvelope,
    /// Amount moved, in the transferred asset's base units.
    pub amount_wei: U256,
    /// Worst-case fee cost in native wei.
    pub max_fee_wei: U256,
    /// Native deduction ceiling: amount plus fee for native sends, fee
    /// alone for token sends (the fee is always paid in the native asset).
    pub total_native_wei: U256,
    /// Explorer link for the transaction, when the chain has an explorer.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explorer_url: Option<String>,
}

/// Errors from the send pipeline. The pipeline is terminal on the first of
/// these; no partial state survives that would make a caller retry unsafe.
#[derive(Debug, Error)]
pub enum SendError {
    /// An address field failed to parse. Local check, no network touched.
    #[error("invalid address '{0}'")]
    InvalidAddress(String),

    /// The amount is not a positive decimal for the asset's precision.
    #[error("invalid amount '{0}'")]
    InvalidAmount(String),

    /// Pre-flight balance check failed; nothing was built or broadcast.
    #[error("insufficient balance: have {have} {symbol}, need {need} {symbol}")]
    InsufficientBalance {
        have: String,
        need: String,
        symbol: String,
    },

    /// The external signer refused. Fatal and non-retryable.
    #[error("signing failed: {0}")]
    SigningFailed(String),

    /// The network did not accept the transaction. Surfaced verbatim and
    /// never retried here: after an ambiguous failure, a rebuilt
    /// transaction could double-spend under certain nonce conditions.
    #[error("broadcast failed: {0}")]
    BroadcastFailed(#[source] RpcError),

    #[error(transparent)]
    Fee(#[from] FeeError),

    #[error(transparent)]
    Rpc(#[from] RpcError),
}

/// Parse a decimal amount string into base units, rejecting zero and
/// negative values.
pub fn parse_amount(amount: &str, decimals: u8) -> Result<U256, SendError> {
    let parsed = parse_units(amount, decimals)
        .map_err(|_| SendError::InvalidAmount(amount.to_string()))?;
    if parsed.is_negative() {
        return Err(SendError::InvalidAmount(amount.to_string()));
    }
    let value = parsed.get_absolute();
    if value.is_zero() {
        return Err(SendError::InvalidAmount(amount.to_string()));
    }
    Ok(value)
}

/// Format base units as a decimal string with trailing zeros trimmed.
pub fn format_amount(value: U256, decimals: u8) -> String {
    match format_units(value, decimals) {
        Ok(text) if text.contains('.') => text
            .trim_end_matches('0')
            .trim_end_matches('.')
            .to_string(),
        Ok(text) => text,
        Err(_) => value.to_string(),
    }
}
