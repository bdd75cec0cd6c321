//! Persistence for user-defined chains.
//!
//! The user set is a JSON map of lowercase chain name to descriptor, stored
//! at a fixed user-scoped path. An absent file means "no user-defined
//! chains"; the file is only ever written through registry operations.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::PathBuf;

use crate::chains::types::{ChainDescriptor, ChainError};

/// Environment variable overriding the wallet's base directory.
pub const HOME_ENV_VAR: &str = "AGENT_WALLET_HOME";

const STORE_FILE: &str = "chains.json";

/// Handle to the persisted user chain set.
#[derive(Debug, Clone)]
pub struct ChainStore {
    path: PathBuf,
}

impl ChainStore {
    /// Store backed by an explicit file path.
    pub fn at(path: PathBuf) -> Self {
        Self { path }
    }

    /// Store at the default user-scoped location:
    /// `$AGENT_WALLET_HOME/chains.json`, or `$HOME/.agent-wallet/chains.json`.
    pub fn default_location() -> Result<Self, ChainError> {
        Ok(Self::at(wallet_dir().map_err(ChainError::Store)?.join(STORE_FILE)))
    }

    /// Load the user set. Absent file yields an empty map.
    pub fn load(&self) -> Result<BTreeMap<String, ChainDescriptor>, ChainError> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let file = File::open(&self.path)?;
        let reader = BufReader::new(file);
        let map: BTreeMap<String, ChainDescriptor> = serde_json::from_reader(reader)?;
        tracing::debug!(count = map.len(), path = %self.path.display(), "Loaded user chains");
        Ok(map)
    }

    /// Replace the persisted user set.
    pub fn save(&self, chains: &BTreeMap<String, ChainDescriptor>) -> Result<(), ChainError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = File::create(&self.path)?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, chains)?;
        tracing::debug!(count = chains.len(), path = %self.path.display(), "Saved user chains");
        Ok(())
    }
}

/// Resolve the wallet's base directory.
pub fn wallet_dir() -> Result<PathBuf, std::io::Error> {
    if let Some(dir) = std::env::var_os(HOME_ENV_VAR) {
        return Ok(PathBuf::from(dir));
    }
    let home = std::env::var_os("HOME").ok_or_else(|| {
        std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "neither AGENT_WALLET_HOME nor HOME is set",
        )
    })?;
    Ok(PathBuf::from(home).join(".agent-wallet"))
}
