//! Fault-tolerant RPC access layer with ordered endpoint failover.

pub mod client;
pub mod error;

pub use client::{RpcClient, DEFAULT_TIMEOUT_SECS, EXTRA_PASSES};
pub use error::{RpcError, RpcResult};
