//! Shared mock JSON-RPC endpoints for integration tests.
//!
//! Each endpoint is a raw TCP listener speaking just enough HTTP to serve
//! scripted JSON-RPC responses, plus a per-endpoint log of the methods it
//! was asked for.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use serde_json::{json, Value};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

/// What the mock answers for one request.
pub enum MockResponse {
    /// JSON-RPC success with this `result`.
    Result(Value),
    /// Well-formed JSON-RPC error response (application-level, terminal).
    RpcError(i64, String),
    /// Bare HTTP status with an empty body (transport-level failure).
    HttpStatus(u16),
}

pub type Responder = Arc<dyn Fn(&str, &Value) -> MockResponse + Send + Sync>;

/// A running mock endpoint.
pub struct MockRpc {
    pub url: String,
    calls: Arc<Mutex<Vec<String>>>,
}

impl MockRpc {
    /// All methods requested so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// How many times one method was requested.
    pub fn call_count(&self, method: &str) -> usize {
        self.calls().iter().filter(|m| m.as_str() == method).count()
    }
}

/// Start a mock endpoint driven by `responder`.
pub async fn start_rpc_endpoint(responder: Responder) -> MockRpc {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let calls = Arc::new(Mutex::new(Vec::new()));
    let calls_task = calls.clone();

    tokio::spawn(async move {
        loop {
            let Ok((mut socket, _)) = listener.accept().await else {
                break;
            };
            let responder = responder.clone();
            let calls = calls_task.clone();
            tokio::spawn(async move {
                let Some(request) = read_http_request(&mut socket).await else {
                    return;
                };
                let method = request["method"].as_str().unwrap_or_default().to_string();
                let params = request["params"].clone();
                let id = request["id"].clone();
                calls.lock().unwrap().push(method.clone());

                let response = match responder(&method, &params) {
                    MockResponse::Result(result) => http_ok(
                        json!({ "jsonrpc": "2.0", "id": id, "result": result }).to_string(),
                    ),
                    MockResponse::RpcError(code, message) => http_ok(
                        json!({
                            "jsonrpc": "2.0",
                            "id": id,
                            "error": { "code": code, "message": message }
                        })
                        .to_string(),
                    ),
                    MockResponse::HttpStatus(status) => format!(
                        "HTTP/1.1 {} Error\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
                        status
                    ),
                };
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    MockRpc {
        url: format!("http://{}", addr),
        calls,
    }
}

/// Endpoint that always fails at the transport level with `status`.
pub async fn start_http_error_endpoint(status: u16) -> MockRpc {
    start_rpc_endpoint(Arc::new(move |_: &str, _: &Value| MockResponse::HttpStatus(status))).await
}

/// Reserve an address nothing listens on; connections are refused.
pub async fn dead_endpoint_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

fn http_ok(body: String) -> String {
    format!(
        "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        body.len(),
        body
    )
}

async fn read_http_request(socket: &mut TcpStream) -> Option<Value> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];

    let header_end = loop {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = find_subslice(&buf, b"\r\n\r\n") {
            break pos + 4;
        }
        if buf.len() > 64 * 1024 {
            return None;
        }
    };

    let headers = String::from_utf8_lossy(&buf[..header_end]).to_string();
    let content_length = headers
        .lines()
        .find_map(|line| {
            let (name, value) = line.split_once(':')?;
            name.eq_ignore_ascii_case("content-length")
                .then(|| value.trim().parse::<usize>().ok())?
        })
        .unwrap_or(0);

    while buf.len() < header_end + content_length {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }
    serde_json::from_slice(buf.get(header_end..header_end + content_length)?).ok()
}

fn find_subslice(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

/// Hex quantity encoding used by JSON-RPC.
pub fn quantity(value: u128) -> Value {
    json!(format!("0x{:x}", value))
}

/// A syntactically complete RPC block object with the given number, base
/// fee, and transaction list.
pub fn block_json(number: u64, base_fee: Option<u128>, transactions: Vec<Value>) -> Value {
    let zero_hash = format!("0x{}", "0".repeat(64));
    let mut block = json!({
        "hash": format!("0x{:064x}", number + 1),
        "parentHash": zero_hash,
        "sha3Uncles": zero_hash,
        "miner": format!("0x{}", "0".repeat(40)),
        "stateRoot": zero_hash,
        "transactionsRoot": zero_hash,
        "receiptsRoot": zero_hash,
        "logsBloom": format!("0x{}", "0".repeat(512)),
        "difficulty": "0x0",
        "number": format!("0x{:x}", number),
        "gasLimit": "0x1c9c380",
        "gasUsed": "0x5208",
        "timestamp": "0x65000000",
        "extraData": "0x",
        "mixHash": zero_hash,
        "nonce": "0x0000000000000000",
        "uncles": [],
        "transactions": transactions,
    });
    if let Some(fee) = base_fee {
        block["baseFeePerGas"] = quantity(fee);
    }
    block
}

/// Resolve the block number an `eth_getBlockByNumber` request asked for,
/// mapping `latest` to `head`.
pub fn requested_block_number(params: &Value, head: u64) -> u64 {
    match params[0].as_str() {
        Some("latest") => head,
        Some(hex) => u64::from_str_radix(hex.trim_start_matches("0x"), 16).unwrap_or(head),
        None => head,
    }
}
