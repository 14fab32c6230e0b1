//! The real-chain path: a client for the relay service.

use async_trait::async_trait;
use itos_relay::api::{EscrowStatusResponse, InvestResponse};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BackendError {
    /// The relay could not be reached or answered with garbage.
    #[error("relay unreachable: {0}")]
    Transport(String),
    /// The relay answered but the investment failed on its side.
    #[error("relay rejected the investment: {0}")]
    Rejected(String),
}

/// Seam between the store and the relay, so the fallback behavior is
/// exercisable without a running service.
#[async_trait]
pub trait InvestmentBackend: Send + Sync {
    async fn invest(&self, amount_usdc: f64) -> Result<InvestResponse, BackendError>;
    async fn escrow_status(&self) -> Result<EscrowStatusResponse, BackendError>;
}

/// HTTP client for the relay service.
pub struct RelayBackend {
    base_url: String,
    client: reqwest::Client,
}

impl RelayBackend {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl InvestmentBackend for RelayBackend {
    async fn invest(&self, amount_usdc: f64) -> Result<InvestResponse, BackendError> {
        let response = self
            .client
            .post(format!("{}/invest", self.base_url))
            .json(&serde_json::json!({ "amount": amount_usdc }))
            .send()
            .await
            .map_err(|e| BackendError::Transport(e.to_string()))?;

        if response.status().is_success() {
            response
                .json::<InvestResponse>()
                .await
                .map_err(|e| BackendError::Transport(e.to_string()))
        } else {
            let body: serde_json::Value = response
                .json()
                .await
                .map_err(|e| BackendError::Transport(e.to_string()))?;
            let message = body
                .get("error")
                .and_then(|v| v.as_str())
                .unwrap_or("unknown relay error")
                .to_string();
            Err(BackendError::Rejected(message))
        }
    }

    async fn escrow_status(&self) -> Result<EscrowStatusResponse, BackendError> {
        self.client
            .get(format!("{}/escrow", self.base_url))
            .send()
            .await
            .map_err(|e| BackendError::Transport(e.to_string()))?
            .json::<EscrowStatusResponse>()
            .await
            .map_err(|e| BackendError::Transport(e.to_string()))
    }
}
