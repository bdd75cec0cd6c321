//! Minimal ERC-20 surface: the reads the pipeline needs plus transfer
//! calldata encoding.

use alloy::network::TransactionBuilder;
use alloy::primitives::{Address, Bytes, U256};
use alloy::rpc::types::TransactionRequest;
use alloy::sol;
use alloy::sol_types::SolCall;

use crate::rpc::{RpcClient, RpcError, RpcResult};

sol! {
    function balanceOf(address owner) external view returns (uint256);
    function decimals() external view returns (uint8);
    function transfer(address to, uint256 amount) external returns (bool);
}

fn read_request(token: Address, calldata: Vec<u8>) -> TransactionRequest {
    TransactionRequest::default()
        .with_to(token)
        .with_input(Bytes::from(calldata))
}

fn decode_error(operation: &'static str, err: impl std::fmt::Display) -> RpcError {
    RpcError::Call {
        operation,
        message: format!("malformed return data: {}", err),
    }
}

/// Token balance of `owner`.
pub async fn balance_of(rpc: &RpcClient, token: Address, owner: Address) -> RpcResult<U256> {
    let call = balanceOfCall { owner };
    let data = rpc.call(&read_request(token, call.abi_encode())).await?;
    balanceOfCall::abi_decode_returns(&data).map_err(|e| decode_error("balanceOf", e))
}

/// Token decimals, read from the contract.
pub async fn decimals(rpc: &RpcClient, token: Address) -> RpcResult<u8> {
    let call = decimalsCall {};
    let data = rpc.call(&read_request(token, call.abi_encode())).await?;
    decimalsCall::abi_decode_returns(&data).map_err(|e| decode_error("decimals", e))
}

/// Calldata for `transfer(to, amount)`.
pub fn encode_transfer(to: Address, amount: U256) -> Bytes {
    Bytes::from(transferCall { to, amount }.abi_encode())
}
