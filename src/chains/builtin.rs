//! Built-in chain catalog.
//!
//! These descriptors ship with the binary and cannot be removed; user-defined
//! entries with the same name shadow them in the merged registry view.

use crate::chains::types::{ChainDescriptor, FeeMarket};

fn chain(
    name: &str,
    chain_id: u64,
    symbol: &str,
    rpc_urls: &[&str],
    explorer_url: &str,
    fee_market: FeeMarket,
) -> ChainDescriptor {
    ChainDescriptor {
        name: name.to_string(),
        chain_id,
        symbol: symbol.to_string(),
        decimals: 18,
        rpc_urls: rpc_urls.iter().map(|u| u.to_string()).collect(),
        explorer_url: Some(explorer_url.to_string()),
        fee_market,
    }
}

/// All built-in chain descriptors.
pub fn builtin_chains() -> Vec<ChainDescriptor> {
    vec![
        chain(
            "ethereum",
            1,
            "ETH",
            &["https://eth.llamarpc.com", "https://rpc.ankr.com/eth"],
            "https://etherscan.io",
            FeeMarket::Eip1559,
        ),
        chain(
            "sepolia",
            11155111,
            "ETH",
            &["https://rpc.sepolia.org", "https://rpc2.sepolia.org"],
            "https://sepolia.etherscan.io",
            FeeMarket::Eip1559,
        ),
        chain(
            "base",
            8453,
            "ETH",
            &["https://mainnet.base.org", "https://base.llamarpc.com"],
            "https://basescan.org",
            FeeMarket::Eip1559,
        ),
        chain(
            "arbitrum",
            42161,
            "ETH",
            &["https://arb1.arbitrum.io/rpc"],
            "https://arbiscan.io",
            FeeMarket::Eip1559,
        ),
        chain(
            "optimism",
            10,
            "ETH",
            &["https://mainnet.optimism.io"],
            "https://optimistic.etherscan.io",
            FeeMarket::Eip1559,
        ),
        chain(
            "polygon",
            137,
            "MATIC",
            &["https://polygon-rpc.com", "https://rpc.ankr.com/polygon"],
            "https://polygonscan.com",
            FeeMarket::Eip1559,
        ),
        chain(
            "bsc",
            56,
            "BNB",
            &[
                "https://bsc-dataseed.binance.org",
                "https://bsc-dataseed1.defibit.io",
            ],
            "https://bscscan.com",
            FeeMarket::Legacy,
        ),
        chain(
            "avalanche",
            43114,
            "AVAX",
            &["https://api.avax.network/ext/bc/C/rpc"],
            "https://snowtrace.io",
            FeeMarket::Eip1559,
        ),
    ]
}
