//! Failover behavior of the RPC access layer against scripted endpoints.

mod common;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use agent_wallet::chains::{ChainDescriptor, FeeMarket};
use agent_wallet::rpc::{RpcClient, RpcError};
use alloy::primitives::Address;
use serde_json::Value;

use common::{
    dead_endpoint_url, quantity, start_http_error_endpoint, start_rpc_endpoint, MockResponse,
};

fn descriptor(urls: Vec<String>) -> ChainDescriptor {
    ChainDescriptor {
        name: "testnet".to_string(),
        chain_id: 31337,
        symbol: "TST".to_string(),
        decimals: 18,
        rpc_urls: urls,
        explorer_url: None,
        fee_market: FeeMarket::Eip1559,
    }
}

fn client(urls: Vec<String>) -> RpcClient {
    RpcClient::new(&descriptor(urls))
        .unwrap()
        .with_timeout(Duration::from_secs(5))
}

#[tokio::test]
async fn test_failover_to_second_endpoint() {
    // First endpoint refuses connections; the second knows the nonce.
    let dead = dead_endpoint_url().await;
    let live = start_rpc_endpoint(Arc::new(|method: &str, _: &Value| match method {
        "eth_getTransactionCount" => MockResponse::Result(quantity(5)),
        _ => MockResponse::RpcError(-32601, "method not found".to_string()),
    }))
    .await;

    let client = client(vec![dead, live.url.clone()]);
    let nonce = client.nonce(Address::ZERO).await.unwrap();

    assert_eq!(nonce, 5);
    // The surviving endpoint answered on the first pass, exactly once.
    assert_eq!(live.call_count("eth_getTransactionCount"), 1);
}

#[tokio::test]
async fn test_node_error_is_terminal_and_skips_failover() {
    let first = start_rpc_endpoint(Arc::new(|_: &str, _: &Value| {
        MockResponse::RpcError(3, "execution reverted".to_string())
    }))
    .await;
    let second = start_rpc_endpoint(Arc::new(|_: &str, _: &Value| MockResponse::Result(quantity(21_000))))
        .await;

    let client = client(vec![first.url.clone(), second.url.clone()]);
    let err = client
        .estimate_gas(&Default::default())
        .await
        .unwrap_err();

    let RpcError::Call { message, .. } = err else {
        panic!("expected terminal call error, got {:?}", err);
    };
    assert!(message.contains("execution reverted"));
    // A well-formed node error must not be retried anywhere.
    assert_eq!(first.call_count("eth_estimateGas"), 1);
    assert_eq!(second.calls().len(), 0);
}

#[tokio::test]
async fn test_exhaustion_after_one_extra_pass() {
    let flaky = start_http_error_endpoint(503).await;

    let client = client(vec![flaky.url.clone()]);
    let err = client.gas_price().await.unwrap_err();

    let RpcError::Exhausted {
        operation,
        attempts,
        ..
    } = err
    else {
        panic!("expected exhaustion, got {:?}", err);
    };
    assert_eq!(operation, "eth_gasPrice");
    // One endpoint, first pass plus exactly one retry pass.
    assert_eq!(attempts, 2);
    assert_eq!(flaky.call_count("eth_gasPrice"), 2);
}

#[tokio::test]
async fn test_exhaustion_counts_every_endpoint_on_both_passes() {
    let a = start_http_error_endpoint(502).await;
    let b = start_http_error_endpoint(500).await;

    let client = client(vec![a.url.clone(), b.url.clone()]);
    let err = client.balance(Address::ZERO).await.unwrap_err();

    let RpcError::Exhausted { attempts, .. } = err else {
        panic!("expected exhaustion, got {:?}", err);
    };
    assert_eq!(attempts, 4);
    assert_eq!(a.call_count("eth_getBalance"), 2);
    assert_eq!(b.call_count("eth_getBalance"), 2);
}

#[tokio::test]
async fn test_retry_pass_absorbs_transient_blip() {
    // Fails once at the transport level, then recovers: the whole-operation
    // retry pass must pick it up without surfacing an error.
    let hits = Arc::new(AtomicUsize::new(0));
    let hits_responder = hits.clone();
    let endpoint = start_rpc_endpoint(Arc::new(move |_: &str, _: &Value| {
        if hits_responder.fetch_add(1, Ordering::SeqCst) == 0 {
            MockResponse::HttpStatus(503)
        } else {
            MockResponse::Result(quantity(7))
        }
    }))
    .await;

    let client = client(vec![endpoint.url.clone()]);
    let nonce = client.nonce(Address::ZERO).await.unwrap();

    assert_eq!(nonce, 7);
    assert_eq!(endpoint.call_count("eth_getTransactionCount"), 2);
}
