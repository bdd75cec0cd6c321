//! Self-custodied EVM wallet library for autonomous agents.
//!
//! Turns a logical intent ("send N of token T on chain C") into a signed,
//! broadcast transaction against any EVM-compatible network, with no
//! trusted intermediary:
//!
//! - [`chains`]: registry of network descriptors, built-in catalog plus a
//!   persisted user-defined set
//! - [`rpc`]: fault-tolerant JSON-RPC access with ordered endpoint failover
//! - [`fees`]: dual-mode fee estimation (EIP-1559 and legacy gas pricing)
//! - [`tx`]: the send pipeline and cross-chain balance queries
//! - [`wallet`]: key custody, keystore file plus the signing capability
//! - [`swap`]: black-box DEX-aggregator quote client

pub mod chains;
pub mod fees;
pub mod rpc;
pub mod swap;
pub mod tx;
pub mod wallet;

pub use chains::{ChainDescriptor, ChainError, ChainRegistry, ChainStore, FeeMarket};
pub use fees::{FeeEnvelope, FeeEstimator, FeePricing};
pub use rpc::{RpcClient, RpcError};
pub use tx::{SendError, SubmissionResult, TransferIntent, TransferSender};
pub use wallet::{AgentWallet, Keystore, WalletError};
