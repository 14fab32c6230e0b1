//! Process configuration, supplied through the environment.

use anyhow::{Context, Result};

pub const DEFAULT_PORT: u16 = 4000;

/// Everything the relay needs at startup: the RPC endpoint, the signing
/// credential and the deployed contract addresses. Values are checked for
/// presence only; formats are validated when the chain client connects.
#[derive(Debug, Clone)]
pub struct Config {
    pub rpc_url: String,
    pub private_key: String,
    pub usdc_address: String,
    pub escrow_address: String,
    pub token_address: String,
    pub port: u16,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            rpc_url: require("SEPOLIA_RPC_URL")?,
            private_key: require("ITOS_PRIVATE_KEY")?,
            usdc_address: require("USDC_ADDRESS")?,
            escrow_address: require("ESCROW_ADDRESS")?,
            token_address: require("ITOS_TOKEN_ADDRESS")?,
            port: std::env::var("ITOS_RELAY_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_PORT),
        })
    }
}

fn require(name: &str) -> Result<String> {
    std::env::var(name).with_context(|| format!("missing environment variable {name}"))
}
