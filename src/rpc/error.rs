//! RPC error taxonomy and transport/application classification.

use alloy::transports::TransportError;
use thiserror::Error;

/// Errors from the RPC access layer.
#[derive(Debug, Error)]
pub enum RpcError {
    /// An endpoint URL in the descriptor could not be parsed.
    #[error("invalid RPC endpoint URL '{url}': {reason}")]
    InvalidEndpoint { url: String, reason: String },

    /// The node returned a well-formed JSON-RPC error response. Terminal for
    /// the call; failover does not apply.
    #[error("{operation} rejected by node: {message}")]
    Call {
        operation: &'static str,
        message: String,
    },

    /// Every endpoint failed on every pass.
    #[error("{operation} failed on all endpoints after {attempts} attempts, last error: {last_error}")]
    Exhausted {
        operation: &'static str,
        attempts: u32,
        last_error: String,
    },
}

/// Result type for RPC operations.
pub type RpcResult<T> = Result<T, RpcError>;

/// A well-formed JSON-RPC error response (revert, invalid params, known
/// transaction) is an answer from the chain, not an endpoint fault. Anything
/// else is treated as a transport problem worth trying the next endpoint for.
pub(crate) fn is_terminal(err: &TransportError) -> bool {
    matches!(err, TransportError::ErrorResp(_))
}
