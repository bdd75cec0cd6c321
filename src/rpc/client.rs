//! Fault-tolerant JSON-RPC client for one chain.
//!
//! # Responsibilities
//! - One HTTP provider per configured endpoint, attempted in listed order
//! - Advance past transport failures; surface node-level errors unchanged
//! - Bound every attempt with a timeout
//! - Read chain state and broadcast signed transactions

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use alloy::eips::BlockNumberOrTag;
use alloy::primitives::{Address, Bytes, TxHash, U256};
use alloy::providers::{Provider, ProviderBuilder};
use alloy::rpc::types::{Block, TransactionRequest};
use alloy::transports::TransportResult;
use tokio::time::timeout;

use crate::chains::ChainDescriptor;
use crate::rpc::error::{is_terminal, RpcError, RpcResult};

/// Per-attempt request timeout.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Additional whole-operation passes over the endpoint list after the first,
/// absorbing transient multi-endpoint blips. Exactly one by design.
pub const EXTRA_PASSES: u32 = 1;

struct Endpoint {
    url: String,
    provider: Arc<dyn Provider + Send + Sync>,
}

/// RPC client bound to one chain descriptor's endpoint list.
///
/// Endpoint ordering is static: the first URL is always preferred, with no
/// adaptive reordering, so behavior stays deterministic and auditable.
pub struct RpcClient {
    endpoints: Vec<Endpoint>,
    timeout: Duration,
}

impl RpcClient {
    /// Build a client from a descriptor's endpoint list.
    pub fn new(descriptor: &ChainDescriptor) -> RpcResult<Self> {
        let mut endpoints = Vec::with_capacity(descriptor.rpc_urls.len());
        for raw in &descriptor.rpc_urls {
            let url: url::Url = raw.parse().map_err(|e: url::ParseError| {
                RpcError::InvalidEndpoint {
                    url: raw.clone(),
                    reason: e.to_string(),
                }
            })?;
            let provider =
                Arc::new(ProviderBuilder::new().connect_http(url)) as Arc<dyn Provider + Send + Sync>;
            endpoints.push(Endpoint {
                url: raw.clone(),
                provider,
            });
        }
        if endpoints.is_empty() {
            return Err(RpcError::InvalidEndpoint {
                url: String::new(),
                reason: "descriptor has no RPC endpoints".to_string(),
            });
        }
        Ok(Self {
            endpoints,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        })
    }

    /// Override the per-attempt timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Drive one logical call through the failover policy: every endpoint in
    /// order, then one more full pass, with a timeout per attempt. A
    /// well-formed JSON-RPC error response ends the call immediately.
    async fn with_failover<T, F, Fut>(&self, operation: &'static str, call: F) -> RpcResult<T>
    where
        F: Fn(Arc<dyn Provider + Send + Sync>) -> Fut,
        Fut: Future<Output = TransportResult<T>>,
    {
        let passes = 1 + EXTRA_PASSES;
        let mut attempts = 0u32;
        let mut last_error = String::new();

        for pass in 0..passes {
            for (index, endpoint) in self.endpoints.iter().enumerate() {
                attempts += 1;
                match timeout(self.timeout, call(endpoint.provider.clone())).await {
                    Ok(Ok(value)) => return Ok(value),
                    Ok(Err(err)) if is_terminal(&err) => {
                        return Err(RpcError::Call {
                            operation,
                            message: err.to_string(),
                        });
                    }
                    Ok(Err(err)) => {
                        tracing::warn!(
                            operation,
                            endpoint = %endpoint.url,
                            endpoint_idx = index,
                            pass,
                            error = %err,
                            "RPC transport error, trying next endpoint"
                        );
                        last_error = err.to_string();
                    }
                    Err(_) => {
                        tracing::warn!(
                            operation,
                            endpoint = %endpoint.url,
                            endpoint_idx = index,
                            pass,
                            timeout_secs = self.timeout.as_secs(),
                            "RPC timeout, trying next endpoint"
                        );
                        last_error = format!("timeout after {:?}", self.timeout);
                    }
                }
            }
        }

        Err(RpcError::Exhausted {
            operation,
            attempts,
            last_error,
        })
    }

    /// Native balance of an address in wei.
    pub async fn balance(&self, address: Address) -> RpcResult<U256> {
        self.with_failover("eth_getBalance", move |p| async move {
            p.get_balance(address).await
        })
        .await
    }

    /// Current transaction count (nonce) of an address.
    pub async fn nonce(&self, address: Address) -> RpcResult<u64> {
        self.with_failover("eth_getTransactionCount", move |p| async move {
            p.get_transaction_count(address).await
        })
        .await
    }

    /// Current network gas price in wei.
    pub async fn gas_price(&self) -> RpcResult<u128> {
        self.with_failover("eth_gasPrice", move |p| async move {
            p.get_gas_price().await
        })
        .await
    }

    /// Fetch a block with its transactions hydrated.
    pub async fn block_with_transactions(
        &self,
        number: BlockNumberOrTag,
    ) -> RpcResult<Option<Block>> {
        self.with_failover("eth_getBlockByNumber", move |p| async move {
            p.get_block_by_number(number).full().await
        })
        .await
    }

    /// Simulate a transaction to obtain its gas requirement.
    pub async fn estimate_gas(&self, tx: &TransactionRequest) -> RpcResult<u64> {
        self.with_failover("eth_estimateGas", move |p| {
            let tx = tx.clone();
            async move { p.estimate_gas(tx).await }
        })
        .await
    }

    /// Execute a read-only contract call.
    pub async fn call(&self, tx: &TransactionRequest) -> RpcResult<Bytes> {
        self.with_failover("eth_call", move |p| {
            let tx = tx.clone();
            async move { p.call(tx).await }
        })
        .await
    }

    /// Broadcast a signed transaction, returning its hash once an endpoint
    /// accepts it. Re-sending the same raw bytes on failover is safe: the
    /// hash is identical, so a node that already holds it cannot double-spend.
    pub async fn broadcast(&self, raw: &[u8]) -> RpcResult<TxHash> {
        self.with_failover("eth_sendRawTransaction", move |p| {
            let raw = raw.to_vec();
            async move {
                p.send_raw_transaction(&raw)
                    .await
                    .map(|pending| *pending.tx_hash())
            }
        })
        .await
    }
}

impl std::fmt::Debug for RpcClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RpcClient")
            .field(
                "endpoints",
                &self.endpoints.iter().map(|e| &e.url).collect::<Vec<_>>(),
            )
            .field("timeout", &self.timeout)
            .finish()
    }
}
