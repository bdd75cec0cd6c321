//! Swap-aggregator client.
//!
//! The aggregator is a black box: the wallet only consumes its quote/route
//! HTTP API as an external price oracle. Nothing about routing is modeled
//! here.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Environment variable holding the aggregator's base URL.
pub const SWAP_API_ENV_VAR: &str = "AGENT_WALLET_SWAP_API_URL";

/// Errors from the aggregator client.
#[derive(Debug, Error)]
pub enum SwapError {
    /// No aggregator endpoint configured.
    #[error("swap aggregator URL not configured, set {SWAP_API_ENV_VAR}")]
    NotConfigured,

    /// Transport-level request failure.
    #[error("swap aggregator request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The aggregator answered with a non-success status; body surfaced
    /// verbatim.
    #[error("swap aggregator returned {status}: {body}")]
    Api { status: u16, body: String },
}

/// Parameters for one quote.
#[derive(Debug, Clone, Serialize)]
pub struct QuoteRequest {
    pub chain_id: u64,
    pub sell_token: String,
    pub buy_token: String,
    /// Sell amount in the token's base units, as a decimal string.
    pub sell_amount: String,
}

/// A quote (or executable route) returned by the aggregator.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapQuote {
    pub buy_amount: String,
    #[serde(default)]
    pub price: Option<String>,
    /// Route fields, present when the aggregator returns an executable
    /// transaction payload.
    #[serde(default)]
    pub to: Option<String>,
    #[serde(default)]
    pub data: Option<String>,
    #[serde(default)]
    pub value: Option<String>,
}

/// HTTP client for the aggregator.
#[derive(Debug, Clone)]
pub struct SwapClient {
    http: reqwest::Client,
    base_url: String,
}

impl SwapClient {
    pub fn new(base_url: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url,
        }
    }

    /// Client configured from `AGENT_WALLET_SWAP_API_URL`.
    pub fn from_env() -> Result<Self, SwapError> {
        let base_url = std::env::var(SWAP_API_ENV_VAR).map_err(|_| SwapError::NotConfigured)?;
        Ok(Self::new(base_url))
    }

    /// Fetch a quote for the given pair and amount.
    pub async fn quote(&self, request: &QuoteRequest) -> Result<SwapQuote, SwapError> {
        let url = format!("{}/quote", self.base_url.trim_end_matches('/'));
        let response = self
            .http
            .get(&url)
            .query(&[
                ("chainId", request.chain_id.to_string()),
                ("sellToken", request.sell_token.clone()),
                ("buyToken", request.buy_token.clone()),
                ("sellAmount", request.sell_amount.clone()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SwapError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response.json().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_deserializes_route_payload() {
        let quote: SwapQuote = serde_json::from_str(
            r#"{
                "buyAmount": "990000",
                "price": "0.99",
                "to": "0x1111111111111111111111111111111111111111",
                "data": "0xdeadbeef",
                "value": "0"
            }"#,
        )
        .unwrap();
        assert_eq!(quote.buy_amount, "990000");
        assert_eq!(quote.price.as_deref(), Some("0.99"));
        assert!(quote.to.is_some());
    }

    #[test]
    fn test_quote_deserializes_minimal_payload() {
        let quote: SwapQuote = serde_json::from_str(r#"{"buyAmount": "1"}"#).unwrap();
        assert_eq!(quote.buy_amount, "1");
        assert!(quote.to.is_none());
        assert!(quote.data.is_none());
    }
}
