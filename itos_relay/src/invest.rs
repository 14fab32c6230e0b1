//! Investment orchestration: the approve → deposit → read-back sequence.

use std::sync::Arc;

use ethers::types::U256;
use ethers::utils::parse_units;
use thiserror::Error;

use crate::chain::{ChainError, EscrowChain, InvestorRecord, TxReceipt};

/// Decimal precision of the stable-value token.
pub const USDC_DECIMALS: u32 = 6;

#[derive(Debug, Error)]
pub enum InvestError {
    /// Rejected before any chain access.
    #[error("invalid amount: {0}")]
    InvalidAmount(String),
    /// The diagnostic balance read failed; nothing was submitted.
    #[error("balance query failed: {0}")]
    Balance(#[source] ChainError),
    /// The approval failed; no deposit was attempted.
    #[error("approval failed: {0}")]
    Approval(#[source] ChainError),
    /// The deposit failed after the approval was included. The allowance
    /// granted by `approve_tx` remains outstanding.
    #[error("deposit failed, approval {approve_tx} remains outstanding: {source}")]
    Deposit {
        approve_tx: String,
        #[source]
        source: ChainError,
    },
    /// Both transactions were included but the investor record could not be
    /// read back.
    #[error("investor record read-back failed: {0}")]
    ReadBack(#[source] ChainError),
}

/// Result of a completed investment sequence.
#[derive(Debug, Clone)]
pub struct InvestOutcome {
    pub approve: TxReceipt,
    pub deposit: TxReceipt,
    pub investor: InvestorRecord,
}

/// Sequences the investment transaction against the escrow.
///
/// Each step depends on the previous one's on-chain effect being durable, so
/// the steps run strictly in order and a failure stops the sequence where it
/// stands. Nothing is retried or rolled back; there is no idempotency key, so
/// repeating a partially failed call submits a fresh approval.
pub struct Orchestrator {
    chain: Arc<dyn EscrowChain>,
}

impl Orchestrator {
    pub fn new(chain: Arc<dyn EscrowChain>) -> Self {
        Self { chain }
    }

    pub async fn invest(&self, amount: f64) -> Result<InvestOutcome, InvestError> {
        let units = to_smallest_units(amount)?;

        let balance = self
            .chain
            .usdc_balance()
            .await
            .map_err(InvestError::Balance)?;
        log::info!("operator holds {balance} smallest units, investing {units}");

        let approve = self
            .chain
            .approve_spend(units)
            .await
            .map_err(InvestError::Approval)?;
        log::info!(
            "approval included: {} (block {})",
            approve.hash,
            approve.block_number
        );

        let deposit = match self.chain.deposit(units).await {
            Ok(receipt) => receipt,
            Err(source) => {
                log::warn!(
                    "deposit failed; allowance from {} remains outstanding",
                    approve.hash
                );
                return Err(InvestError::Deposit {
                    approve_tx: approve.hash,
                    source,
                });
            }
        };
        log::info!(
            "deposit included: {} (block {})",
            deposit.hash,
            deposit.block_number
        );

        let investor = self
            .chain
            .investor_info()
            .await
            .map_err(InvestError::ReadBack)?;

        Ok(InvestOutcome {
            approve,
            deposit,
            investor,
        })
    }
}

/// Convert a human-unit amount to the token's smallest units using its fixed
/// 6-decimal precision.
pub fn to_smallest_units(amount: f64) -> Result<U256, InvestError> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(InvestError::InvalidAmount(format!(
            "amount must be a positive number, got {amount}"
        )));
    }
    let units = parse_units(amount.to_string(), USDC_DECIMALS)
        .map_err(|e| InvestError::InvalidAmount(e.to_string()))?;
    Ok(units.into())
}
