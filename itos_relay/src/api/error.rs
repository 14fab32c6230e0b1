//! Error payload for the relay's HTTP surface.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::chain::ChainError;
use crate::invest::InvestError;

/// Failure body returned by every endpoint: HTTP 500 carrying the error's
/// display message. The front end only distinguishes success from failure,
/// so no per-kind status codes exist.
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiError {
    pub success: bool,
    pub error: String,
}

impl ApiError {
    pub fn from_message(message: impl Into<String>) -> Self {
        Self {
            success: false,
            error: message.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (StatusCode::INTERNAL_SERVER_ERROR, Json(self)).into_response()
    }
}

impl From<InvestError> for ApiError {
    fn from(err: InvestError) -> Self {
        Self::from_message(err.to_string())
    }
}

impl From<ChainError> for ApiError {
    fn from(err: ChainError) -> Self {
        Self::from_message(err.to_string())
    }
}
