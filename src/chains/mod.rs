//! Chain registry: network descriptors, built-in catalog, persisted user set.

pub mod builtin;
pub mod registry;
pub mod store;
pub mod types;

pub use registry::ChainRegistry;
pub use store::ChainStore;
pub use types::{ChainDescriptor, ChainError, FeeMarket};
