//! One-shot investment: run the full approve → deposit → read-back sequence
//! for a fixed amount, printing each step.

use std::sync::Arc;

use anyhow::Result;
use ethers::types::U256;
use ethers::utils::format_units;
use itos_relay::chain::{EscrowChain, EthereumChainClient};
use itos_relay::config::Config;
use itos_relay::invest::{Orchestrator, USDC_DECIMALS};

const INVEST_AMOUNT_USDC: f64 = 100.0;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let config = Config::from_env()?;
    let client = Arc::new(EthereumChainClient::connect(&config).await?);

    let balance = client.usdc_balance().await?;
    println!(
        "💰 Current USDC balance: {}",
        format_units(balance, USDC_DECIMALS)?
    );

    let quote = client
        .participations_for(U256::from(INVEST_AMOUNT_USDC as u64))
        .await?;
    println!("📐 {INVEST_AMOUNT_USDC} USDC currently buys {quote} participations");

    println!("📤 Investing {INVEST_AMOUNT_USDC} USDC...");
    let orchestrator = Orchestrator::new(client);
    let outcome = orchestrator.invest(INVEST_AMOUNT_USDC).await?;

    println!("✅ Approval confirmed. Tx hash: {}", outcome.approve.hash);
    println!("✅ Investment executed. Tx hash: {}", outcome.deposit.hash);
    println!(
        "📊 Investor record: {} smallest units deposited, {} participations, status {:?}",
        outcome.investor.usdc_deposited, outcome.investor.participations, outcome.investor.status
    );

    Ok(())
}
