//! Wallet signing capability.
//!
//! # Security
//! - Private keys come from the environment or the keystore file, never
//!   from command-line arguments
//! - Keys are never logged or serialized into output
//!
//! The core treats this module as its signing boundary: it hands over an
//! unsigned request and receives raw signed bytes.

use alloy::eips::eip2718::Encodable2718;
use alloy::network::{EthereumWallet, TransactionBuilder};
use alloy::primitives::Address;
use alloy::rpc::types::TransactionRequest;
use alloy::signers::local::PrivateKeySigner;
use thiserror::Error;

/// Environment variable holding a hex-encoded private key.
pub const PRIVATE_KEY_ENV_VAR: &str = "AGENT_WALLET_PRIVATE_KEY";

/// Errors from key loading and signing.
#[derive(Debug, Error)]
pub enum WalletError {
    /// The key material could not be parsed.
    #[error("invalid private key: {0}")]
    InvalidKey(String),

    /// The keystore file could not be read or written.
    #[error("keystore error: {0}")]
    Keystore(#[from] std::io::Error),

    /// Signing failed. Fatal and non-retryable; no partially-signed artifact
    /// is produced.
    #[error("signing failed: {0}")]
    Signing(String),
}

/// The agent's signing account.
#[derive(Debug, Clone)]
pub struct AgentWallet {
    signer: PrivateKeySigner,
}

impl AgentWallet {
    /// Create a wallet from a hex-encoded private key, with or without a
    /// `0x` prefix.
    pub fn from_private_key(private_key_hex: &str) -> Result<Self, WalletError> {
        let key_hex = private_key_hex
            .trim()
            .strip_prefix("0x")
            .unwrap_or_else(|| private_key_hex.trim());

        let signer: PrivateKeySigner = key_hex
            .parse()
            .map_err(|e| WalletError::InvalidKey(format!("{}", e)))?;

        tracing::info!(address = %signer.address(), "Wallet loaded");
        Ok(Self { signer })
    }

    /// Load the key from `AGENT_WALLET_PRIVATE_KEY`.
    pub fn from_env() -> Result<Self, WalletError> {
        let private_key = std::env::var(PRIVATE_KEY_ENV_VAR).map_err(|_| {
            WalletError::InvalidKey(format!(
                "environment variable {} not set",
                PRIVATE_KEY_ENV_VAR
            ))
        })?;
        Self::from_private_key(&private_key)
    }

    /// Generate a fresh random account.
    pub fn random() -> Self {
        let signer = PrivateKeySigner::random();
        tracing::info!(address = %signer.address(), "Generated new wallet");
        Self { signer }
    }

    /// The account address.
    pub fn address(&self) -> Address {
        self.signer.address()
    }

    /// Hex encoding of the key for keystore persistence. Crate-internal so
    /// the key never crosses the library boundary.
    pub(crate) fn key_hex(&self) -> String {
        alloy::hex::encode(self.signer.to_bytes())
    }

    /// Sign a fully-populated transaction request, returning the raw
    /// EIP-2718 encoded bytes ready for broadcast.
    pub async fn sign(&self, tx: TransactionRequest) -> Result<Vec<u8>, WalletError> {
        let wallet = EthereumWallet::from(self.signer.clone());
        let envelope = tx
            .build(&wallet)
            .await
            .map_err(|e| WalletError::Signing(e.to_string()))?;
        Ok(envelope.encoded_2718())
    }
}
