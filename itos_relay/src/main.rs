use std::sync::Arc;

use anyhow::Result;

use itos_relay::api::{self, AppState};
use itos_relay::chain::EthereumChainClient;
use itos_relay::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let config = Config::from_env()?;
    let client = Arc::new(EthereumChainClient::connect(&config).await?);
    log::info!("connected; operator address {:?}", client.operator());

    let state = AppState::new(client);
    api::serve(&config, state).await
}
