//! Concurrent native-balance sweep across registered chains.
//!
//! Each chain is queried as an independent read-only task; one chain's
//! failure never aborts its siblings, and results carry per-chain errors.

use alloy::primitives::Address;
use futures_util::future::join_all;
use serde::Serialize;

use crate::chains::ChainDescriptor;
use crate::rpc::{RpcClient, RpcError};
use crate::tx::types::format_amount;

/// Outcome of one chain's balance query.
#[derive(Debug, Clone, Serialize)]
pub struct ChainBalance {
    pub chain: String,
    pub symbol: String,
    /// Decimal-formatted balance; absent when the query failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub balance: Option<String>,
    /// Failure reason; absent when the query succeeded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Query the native balance of `address` on every given chain concurrently.
pub async fn native_balances(chains: Vec<ChainDescriptor>, address: Address) -> Vec<ChainBalance> {
    let queries = chains.into_iter().map(|chain| async move {
        match query_chain(&chain, address).await {
            Ok(balance) => ChainBalance {
                balance: Some(format_amount(balance, chain.decimals)),
                chain: chain.name,
                symbol: chain.symbol,
                error: None,
            },
            Err(err) => {
                tracing::warn!(chain = %chain.name, error = %err, "Balance query failed");
                ChainBalance {
                    chain: chain.name,
                    symbol: chain.symbol,
                    balance: None,
                    error: Some(err.to_string()),
                }
            }
        }
    });
    join_all(queries).await
}

async fn query_chain(
    chain: &ChainDescriptor,
    address: Address,
) -> Result<alloy::primitives::U256, RpcError> {
    RpcClient::new(chain)?.balance(address).await
}
