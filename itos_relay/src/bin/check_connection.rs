//! Connection check: connect to the configured endpoint and print the
//! operator's address and native balance.

use anyhow::Result;
use ethers::utils::format_units;
use itos_relay::chain::EthereumChainClient;
use itos_relay::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let config = Config::from_env()?;
    let client = EthereumChainClient::connect(&config).await?;

    println!("✅ Connected to {}", config.rpc_url);
    println!("📄 Operator address: {:?}", client.operator());

    let balance = client.eth_balance().await?;
    println!("💰 ETH balance: {}", format_units(balance, "ether")?);

    Ok(())
}
