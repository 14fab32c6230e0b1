//! The relay's HTTP surface.

pub mod error;
pub mod handlers;

pub use error::ApiError;
pub use handlers::{EscrowStatusResponse, InvestRequest, InvestResponse};

use std::sync::Arc;

use axum::http::Method;
use axum::routing::{get, post};
use axum::Router;
use tokio::sync::Mutex;
use tower_http::cors::{Any, CorsLayer};

use crate::chain::EscrowChain;
use crate::config::Config;
use crate::invest::Orchestrator;

/// Shared relay state: chain access, the orchestrator built over it, and the
/// per-identity submission lock that serializes investment sequences.
#[derive(Clone)]
pub struct AppState {
    pub chain: Arc<dyn EscrowChain>,
    pub orchestrator: Arc<Orchestrator>,
    pub submit_lock: Arc<Mutex<()>>,
}

impl AppState {
    pub fn new(chain: Arc<dyn EscrowChain>) -> Self {
        Self {
            orchestrator: Arc::new(Orchestrator::new(chain.clone())),
            chain,
            submit_lock: Arc::new(Mutex::new(())),
        }
    }
}

/// Router with the demo's open-to-any-origin CORS policy.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/invest", post(handlers::invest))
        .route("/escrow", get(handlers::escrow_status))
        .route("/health", get(handlers::health))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([Method::GET, Method::POST])
                .allow_headers(Any),
        )
        .with_state(state)
}

pub async fn serve(config: &Config, state: AppState) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.port)).await?;
    log::info!("relay listening on http://0.0.0.0:{}", config.port);
    axum::serve(listener, create_router(state)).await?;
    Ok(())
}
