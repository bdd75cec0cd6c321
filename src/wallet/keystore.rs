//! Key persistence at a user-scoped path.
//!
//! The keystore owns the raw key bytes on disk; the rest of the crate only
//! ever sees an [`AgentWallet`]. The key file is created with `0600`
//! permissions so no other user on the host can read it.

use std::io::Write;
use std::path::PathBuf;

use crate::chains::store::wallet_dir;
use crate::wallet::signer::{AgentWallet, WalletError, PRIVATE_KEY_ENV_VAR};

const KEY_FILE: &str = "signing-key";

/// Handle to the persisted signing key.
#[derive(Debug, Clone)]
pub struct Keystore {
    path: PathBuf,
}

impl Keystore {
    /// Keystore backed by an explicit file path.
    pub fn at(path: PathBuf) -> Self {
        Self { path }
    }

    /// Keystore at the default user-scoped location:
    /// `$AGENT_WALLET_HOME/signing-key`, or `$HOME/.agent-wallet/signing-key`.
    pub fn default_location() -> Result<Self, WalletError> {
        Ok(Self::at(wallet_dir()?.join(KEY_FILE)))
    }

    /// Load the agent's wallet.
    ///
    /// Precedence: `AGENT_WALLET_PRIVATE_KEY` environment variable, then the
    /// key file, then a freshly generated key persisted for next time.
    pub fn load_or_generate(&self) -> Result<AgentWallet, WalletError> {
        if std::env::var_os(PRIVATE_KEY_ENV_VAR).is_some() {
            return AgentWallet::from_env();
        }

        if self.path.exists() {
            let contents = std::fs::read_to_string(&self.path)?;
            return AgentWallet::from_private_key(&contents);
        }

        let wallet = AgentWallet::random();
        self.persist(&wallet)?;
        tracing::info!(path = %self.path.display(), "Persisted new signing key");
        Ok(wallet)
    }

    fn persist(&self, wallet: &AgentWallet) -> Result<(), WalletError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let mut options = std::fs::OpenOptions::new();
        options.write(true).create_new(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }
        let mut file = options.open(&self.path)?;
        file.write_all(wallet.key_hex().as_bytes())?;
        Ok(())
    }
}
