//! Draw test USDC from the token faucet and print the balance change.

use anyhow::Result;
use ethers::types::U256;
use ethers::utils::{format_units, parse_units};
use itos_relay::chain::{EscrowChain, EthereumChainClient};
use itos_relay::config::Config;
use itos_relay::invest::USDC_DECIMALS;

const FAUCET_AMOUNT: &str = "1000";

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let config = Config::from_env()?;
    let client = EthereumChainClient::connect(&config).await?;

    let before = client.usdc_balance().await?;
    println!(
        "💰 USDC balance before: {}",
        format_units(before, USDC_DECIMALS)?
    );

    let amount: U256 = parse_units(FAUCET_AMOUNT, USDC_DECIMALS)?.into();
    println!("🚰 Requesting {FAUCET_AMOUNT} test USDC from the faucet...");
    let receipt = client.request_faucet(amount).await?;
    println!(
        "✅ Faucet transaction included: {} (block {})",
        receipt.hash, receipt.block_number
    );

    let after = client.usdc_balance().await?;
    println!(
        "💰 USDC balance after: {}",
        format_units(after, USDC_DECIMALS)?
    );

    Ok(())
}
