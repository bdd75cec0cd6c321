//! Chain descriptor types and error definitions.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Fee-market variant of a chain.
///
/// Consumed by exhaustive matching in the fee estimator; chains that report
/// no base fee at runtime are priced on the legacy path regardless of tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FeeMarket {
    /// Base fee + priority fee split (EIP-1559).
    #[default]
    Eip1559,
    /// Single `gasPrice` parameter.
    Legacy,
}

/// Identity and connection data for one EVM network.
///
/// Immutable once constructed. Built-ins are process-wide constants; user
/// entries are loaded from the persisted store at startup and only change
/// through explicit registry operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainDescriptor {
    /// Display name, also the registry lookup key (case-insensitive).
    pub name: String,

    /// Numeric chain id (EIP-155), must be positive.
    pub chain_id: u64,

    /// Native asset ticker symbol.
    pub symbol: String,

    /// Native asset decimals (18 for all current built-ins).
    pub decimals: u8,

    /// Ordered RPC endpoint URLs; the first entry is preferred.
    pub rpc_urls: Vec<String>,

    /// Block explorer base URL, if the chain has one.
    #[serde(default)]
    pub explorer_url: Option<String>,

    /// Fee-market variant.
    #[serde(default)]
    pub fee_market: FeeMarket,
}

impl ChainDescriptor {
    /// Derive the explorer URL for a transaction hash.
    pub fn tx_url(&self, hash: &str) -> Option<String> {
        self.explorer_url
            .as_ref()
            .map(|base| format!("{}/tx/{}", base.trim_end_matches('/'), hash))
    }

    /// Derive the explorer URL for an account address.
    pub fn address_url(&self, address: &str) -> Option<String> {
        self.explorer_url
            .as_ref()
            .map(|base| format!("{}/address/{}", base.trim_end_matches('/'), address))
    }

    /// Validate the descriptor before it is accepted into the registry.
    ///
    /// Checks are purely syntactic; no network calls.
    pub fn validate(&self) -> Result<(), ChainError> {
        if self.name.trim().is_empty() {
            return Err(ChainError::InvalidDescriptor(
                "chain name must not be empty".to_string(),
            ));
        }
        if self.chain_id == 0 {
            return Err(ChainError::InvalidDescriptor(
                "chain id must be a positive integer".to_string(),
            ));
        }
        if self.rpc_urls.is_empty() {
            return Err(ChainError::InvalidDescriptor(
                "at least one RPC URL is required".to_string(),
            ));
        }
        for raw in &self.rpc_urls {
            let url = raw.parse::<url::Url>().map_err(|e| {
                ChainError::InvalidDescriptor(format!("invalid RPC URL '{}': {}", raw, e))
            })?;
            if url.scheme() != "http" && url.scheme() != "https" {
                return Err(ChainError::InvalidDescriptor(format!(
                    "RPC URL '{}' must use http or https",
                    raw
                )));
            }
        }
        if let Some(explorer) = &self.explorer_url {
            explorer.parse::<url::Url>().map_err(|e| {
                ChainError::InvalidDescriptor(format!("invalid explorer URL '{}': {}", explorer, e))
            })?;
        }
        Ok(())
    }
}

/// Errors from registry operations and the persisted user store.
#[derive(Debug, Error)]
pub enum ChainError {
    /// The name matched neither a built-in nor a user-defined chain.
    #[error("unknown chain '{0}'")]
    UnknownChain(String),

    /// Built-in chains cannot be removed.
    #[error("chain '{0}' is built in and cannot be removed")]
    BuiltInImmutable(String),

    /// The descriptor failed syntactic validation.
    #[error("invalid chain descriptor: {0}")]
    InvalidDescriptor(String),

    /// The persisted user store could not be read or written.
    #[error("chain store error: {0}")]
    Store(#[from] std::io::Error),

    /// The persisted user store held malformed JSON.
    #[error("chain store is corrupt: {0}")]
    StoreFormat(#[from] serde_json::Error),
}
