//! Typed access to the platform's contracts over JSON-RPC.

pub mod client;
pub mod contracts;

pub use client::EthereumChainClient;

use async_trait::async_trait;
use ethers::types::U256;
use thiserror::Error;

/// Failure taxonomy for chain access.
#[derive(Debug, Error)]
pub enum ChainError {
    /// The RPC endpoint is unreachable or the provider failed mid-call.
    #[error("rpc connection failed: {0}")]
    Connection(String),
    /// A state-changing call could not be submitted or was dropped before
    /// inclusion (credential, gas or transport problem).
    #[error("transaction submission failed: {0}")]
    Submission(String),
    /// The method reverted on-chain.
    #[error("contract reverted: {reason}")]
    ContractRevert { reason: String },
}

/// Receipt for a transaction that reached inclusion.
#[derive(Debug, Clone)]
pub struct TxReceipt {
    pub hash: String,
    pub block_number: u64,
}

/// Investor record as stored by the escrow contract, decoded from
/// `getInvestorInfo`. The contract is the sole source of truth; this is read
/// back for display and never cached.
#[derive(Debug, Clone)]
pub struct InvestorRecord {
    pub usdc_deposited: U256,
    pub participations: U256,
    pub timestamp: U256,
    pub flags: U256,
    pub status: String,
}

/// Escrow state decoded from `getEscrowInfo`.
#[derive(Debug, Clone)]
pub struct EscrowSnapshot {
    pub total_raised: U256,
    pub funding_goal: U256,
    pub minimum_funding: U256,
    pub participation_price: U256,
    pub deadline: U256,
    pub investor_count: U256,
    pub goal_reached: bool,
    pub funds_released: bool,
    pub refunds_enabled: bool,
    pub buyback_active: bool,
}

/// Project metadata decoded from the property token's `getProjectInfo`.
#[derive(Debug, Clone)]
pub struct ProjectSnapshot {
    pub name: String,
    pub description: String,
    pub project_type: String,
    pub goal: U256,
    pub deadline: U256,
    pub state: u8,
    pub available_participations: U256,
    pub total_participations: U256,
}

/// The chain surface the relay drives. Implemented by the live client; test
/// doubles stand in for the network.
///
/// Writes block until the transaction is included (one confirmation) and are
/// never retried: a single failed submission surfaces immediately.
#[async_trait]
pub trait EscrowChain: Send + Sync {
    /// Operator's USDC balance in smallest units.
    async fn usdc_balance(&self) -> Result<U256, ChainError>;
    /// Grant the escrow permission to move exactly `amount` smallest units.
    async fn approve_spend(&self, amount: U256) -> Result<TxReceipt, ChainError>;
    /// Deposit `amount` smallest units into the escrow.
    async fn deposit(&self, amount: U256) -> Result<TxReceipt, ChainError>;
    /// Read back the operator's investor record.
    async fn investor_info(&self) -> Result<InvestorRecord, ChainError>;
    /// Current escrow state.
    async fn escrow_info(&self) -> Result<EscrowSnapshot, ChainError>;
    /// Project metadata from the property token.
    async fn project_info(&self) -> Result<ProjectSnapshot, ChainError>;
}
