//! Request handlers and their wire types.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::chain::{EscrowSnapshot, InvestorRecord, ProjectSnapshot};
use crate::invest::InvestOutcome;

use super::error::ApiError;
use super::AppState;

#[derive(Debug, Clone, Deserialize)]
pub struct InvestRequest {
    pub amount: f64,
}

/// Success body for `POST /invest`. `investorInfo` carries the escrow's five
/// return values in declaration order, amounts as decimal strings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvestResponse {
    pub success: bool,
    #[serde(rename = "approveTx")]
    pub approve_tx: String,
    #[serde(rename = "investTx")]
    pub invest_tx: String,
    #[serde(rename = "investorInfo")]
    pub investor_info: serde_json::Value,
}

impl InvestResponse {
    fn from_outcome(outcome: &InvestOutcome) -> Self {
        Self {
            success: true,
            approve_tx: outcome.approve.hash.clone(),
            invest_tx: outcome.deposit.hash.clone(),
            investor_info: investor_info_body(&outcome.investor),
        }
    }
}

fn investor_info_body(record: &InvestorRecord) -> serde_json::Value {
    serde_json::json!([
        record.usdc_deposited.to_string(),
        record.participations.to_string(),
        record.timestamp.to_string(),
        record.flags.to_string(),
        record.status,
    ])
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EscrowBody {
    pub total_raised: String,
    pub funding_goal: String,
    pub minimum_funding: String,
    pub participation_price: String,
    pub deadline: u64,
    pub investor_count: u64,
    pub goal_reached: bool,
    pub funds_released: bool,
    pub refunds_enabled: bool,
    pub buyback_active: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectBody {
    pub name: String,
    pub description: String,
    #[serde(rename = "type")]
    pub project_type: String,
    pub goal: String,
    pub deadline: u64,
    pub state: u8,
    pub available_participations: String,
    pub total_participations: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EscrowStatusResponse {
    pub escrow: EscrowBody,
    pub project: ProjectBody,
}

impl EscrowStatusResponse {
    fn new(escrow: &EscrowSnapshot, project: &ProjectSnapshot) -> Self {
        Self {
            escrow: EscrowBody {
                total_raised: escrow.total_raised.to_string(),
                funding_goal: escrow.funding_goal.to_string(),
                minimum_funding: escrow.minimum_funding.to_string(),
                participation_price: escrow.participation_price.to_string(),
                deadline: escrow.deadline.as_u64(),
                investor_count: escrow.investor_count.as_u64(),
                goal_reached: escrow.goal_reached,
                funds_released: escrow.funds_released,
                refunds_enabled: escrow.refunds_enabled,
                buyback_active: escrow.buyback_active,
            },
            project: ProjectBody {
                name: project.name.clone(),
                description: project.description.clone(),
                project_type: project.project_type.clone(),
                goal: project.goal.to_string(),
                deadline: project.deadline.as_u64(),
                state: project.state,
                available_participations: project.available_participations.to_string(),
                total_participations: project.total_participations.to_string(),
            },
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// `POST /invest`: run the full approval, deposit and read-back sequence on
/// behalf of the caller under the relay's single signing identity.
pub async fn invest(
    State(state): State<AppState>,
    Json(req): Json<InvestRequest>,
) -> Result<Json<InvestResponse>, ApiError> {
    // One sequence at a time: concurrent requests would otherwise race the
    // signing identity's account nonce.
    let _serialized = state.submit_lock.lock().await;

    log::info!("investment requested: {} USDC", req.amount);
    let outcome = state.orchestrator.invest(req.amount).await?;
    Ok(Json(InvestResponse::from_outcome(&outcome)))
}

/// `GET /escrow`: combined escrow and project snapshot.
pub async fn escrow_status(
    State(state): State<AppState>,
) -> Result<Json<EscrowStatusResponse>, ApiError> {
    let escrow = state.chain.escrow_info().await?;
    let project = state.chain.project_info().await?;
    Ok(Json(EscrowStatusResponse::new(&escrow, &project)))
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
