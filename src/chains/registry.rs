//! Chain registry: built-in constants merged with the persisted user set.
//!
//! All mutation goes through `add`/`remove`; there are no ambient file writes
//! elsewhere in the codebase. Lookups are case-insensitive on name, and user
//! entries take precedence over built-ins on collision.

use std::collections::BTreeMap;

use crate::chains::builtin::builtin_chains;
use crate::chains::store::ChainStore;
use crate::chains::types::{ChainDescriptor, ChainError};

/// Registry of known chains. Constructed once at process start; read-only
/// while transactions are in flight.
#[derive(Debug)]
pub struct ChainRegistry {
    builtin: BTreeMap<String, ChainDescriptor>,
    user: BTreeMap<String, ChainDescriptor>,
    store: ChainStore,
}

impl ChainRegistry {
    /// Build the registry from the built-in catalog plus one read of the
    /// persisted user set.
    pub fn load(store: ChainStore) -> Result<Self, ChainError> {
        let builtin = builtin_chains()
            .into_iter()
            .map(|c| (c.name.to_lowercase(), c))
            .collect();
        let user = store.load()?;
        Ok(Self {
            builtin,
            user,
            store,
        })
    }

    /// Look up a chain by name, case-insensitively, across both sets.
    pub fn resolve(&self, name: &str) -> Result<&ChainDescriptor, ChainError> {
        let key = name.to_lowercase();
        self.user
            .get(&key)
            .or_else(|| self.builtin.get(&key))
            .ok_or_else(|| ChainError::UnknownChain(name.to_string()))
    }

    /// Merged view of all chains, user entries shadowing built-ins, in
    /// deterministic name order.
    pub fn list(&self) -> Vec<&ChainDescriptor> {
        let mut merged: BTreeMap<&str, &ChainDescriptor> = self
            .builtin
            .iter()
            .map(|(k, v)| (k.as_str(), v))
            .collect();
        for (k, v) in &self.user {
            merged.insert(k.as_str(), v);
        }
        merged.into_values().collect()
    }

    /// Validate and persist a user-defined chain. Re-adding an existing name
    /// overwrites it.
    pub fn add(&mut self, descriptor: ChainDescriptor) -> Result<(), ChainError> {
        descriptor.validate()?;
        let key = descriptor.name.to_lowercase();
        self.user.insert(key, descriptor);
        self.store.save(&self.user)?;
        Ok(())
    }

    /// Delete a user-defined chain from the persisted set.
    pub fn remove(&mut self, name: &str) -> Result<(), ChainError> {
        let key = name.to_lowercase();
        if self.builtin.contains_key(&key) {
            return Err(ChainError::BuiltInImmutable(name.to_string()));
        }
        if self.user.remove(&key).is_none() {
            return Err(ChainError::UnknownChain(name.to_string()));
        }
        self.store.save(&self.user)?;
        Ok(())
    }
}
