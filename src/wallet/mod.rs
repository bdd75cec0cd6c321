//! Local key custody: keystore file plus the signing capability.

pub mod keystore;
pub mod signer;

pub use keystore::Keystore;
pub use signer::{AgentWallet, WalletError, PRIVATE_KEY_ENV_VAR};
