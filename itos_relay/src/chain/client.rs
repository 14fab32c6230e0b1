//! Live chain client backed by ethers-rs.
//!
//! Holds the JSON-RPC connection and the single signing identity, and exposes
//! typed calls against the three deployed contracts. Reads go through
//! `.call()`; writes are submitted and awaited until one confirmation.

use std::sync::Arc;

use async_trait::async_trait;
use ethers::abi::{AbiDecode, Detokenize};
use ethers::contract::{ContractCall, ContractError};
use ethers::middleware::SignerMiddleware;
use ethers::providers::{Http, Middleware, Provider};
use ethers::signers::{LocalWallet, Signer};
use ethers::types::{Address, Bytes, U256, U64};

use crate::config::Config;

use super::contracts::{ProjectEscrow, PropertyToken, TestUsdc};
use super::{ChainError, EscrowChain, EscrowSnapshot, InvestorRecord, ProjectSnapshot, TxReceipt};

type RelaySigner = SignerMiddleware<Provider<Http>, LocalWallet>;

/// Chain connection plus contract handles. Created at process start, never
/// mutated afterwards; the signing identity is bound to the network's chain
/// id at connect time.
pub struct EthereumChainClient {
    client: Arc<RelaySigner>,
    operator: Address,
    escrow_address: Address,
    usdc: TestUsdc<RelaySigner>,
    escrow: ProjectEscrow<RelaySigner>,
    token: PropertyToken<RelaySigner>,
}

impl EthereumChainClient {
    pub async fn connect(config: &Config) -> Result<Self, ChainError> {
        let provider = Provider::<Http>::try_from(config.rpc_url.as_str())
            .map_err(|e| ChainError::Connection(format!("invalid rpc url: {e}")))?;

        let chain_id = provider
            .get_chainid()
            .await
            .map_err(|e| ChainError::Connection(format!("failed to get chain id: {e}")))?
            .as_u64();

        let wallet = config
            .private_key
            .parse::<LocalWallet>()
            .map_err(|e| ChainError::Submission(format!("invalid signing key: {e}")))?
            .with_chain_id(chain_id);
        let operator = wallet.address();

        let usdc_address = parse_address(&config.usdc_address, "USDC_ADDRESS")?;
        let escrow_address = parse_address(&config.escrow_address, "ESCROW_ADDRESS")?;
        let token_address = parse_address(&config.token_address, "ITOS_TOKEN_ADDRESS")?;

        let client = Arc::new(SignerMiddleware::new(provider, wallet));

        Ok(Self {
            operator,
            escrow_address,
            usdc: TestUsdc::new(usdc_address, client.clone()),
            escrow: ProjectEscrow::new(escrow_address, client.clone()),
            token: PropertyToken::new(token_address, client.clone()),
            client,
        })
    }

    /// Address of the signing identity every request invests under.
    pub fn operator(&self) -> Address {
        self.operator
    }

    /// Operator's native balance, for connection checks.
    pub async fn eth_balance(&self) -> Result<U256, ChainError> {
        self.client
            .get_balance(self.operator, None)
            .await
            .map_err(|e| ChainError::Connection(e.to_string()))
    }

    /// Participations the escrow currently grants for a human-unit amount.
    pub async fn participations_for(&self, usdc_human: U256) -> Result<U256, ChainError> {
        self.escrow
            .calculate_participations(usdc_human)
            .call()
            .await
            .map_err(read_error)
    }

    /// Draw test USDC from the token faucet; waits for inclusion.
    pub async fn request_faucet(&self, amount: U256) -> Result<TxReceipt, ChainError> {
        send_and_confirm(self.usdc.faucet(amount)).await
    }
}

#[async_trait]
impl EscrowChain for EthereumChainClient {
    async fn usdc_balance(&self) -> Result<U256, ChainError> {
        self.usdc
            .balance_of(self.operator)
            .call()
            .await
            .map_err(read_error)
    }

    async fn approve_spend(&self, amount: U256) -> Result<TxReceipt, ChainError> {
        send_and_confirm(self.usdc.approve(self.escrow_address, amount)).await
    }

    async fn deposit(&self, amount: U256) -> Result<TxReceipt, ChainError> {
        send_and_confirm(self.escrow.invest(amount)).await
    }

    async fn investor_info(&self) -> Result<InvestorRecord, ChainError> {
        let (usdc_deposited, participations, timestamp, flags, status) = self
            .escrow
            .get_investor_info(self.operator)
            .call()
            .await
            .map_err(read_error)?;
        Ok(InvestorRecord {
            usdc_deposited,
            participations,
            timestamp,
            flags,
            status,
        })
    }

    async fn escrow_info(&self) -> Result<EscrowSnapshot, ChainError> {
        let (
            total_raised,
            funding_goal,
            minimum_funding,
            participation_price,
            deadline,
            investor_count,
            goal_reached,
            funds_released,
            refunds_enabled,
            buyback_active,
        ) = self.escrow.get_escrow_info().call().await.map_err(read_error)?;
        Ok(EscrowSnapshot {
            total_raised,
            funding_goal,
            minimum_funding,
            participation_price,
            deadline,
            investor_count,
            goal_reached,
            funds_released,
            refunds_enabled,
            buyback_active,
        })
    }

    async fn project_info(&self) -> Result<ProjectSnapshot, ChainError> {
        let (
            name,
            description,
            project_type,
            goal,
            deadline,
            state,
            available_participations,
            total_participations,
        ) = self.token.get_project_info().call().await.map_err(read_error)?;
        Ok(ProjectSnapshot {
            name,
            description,
            project_type,
            goal,
            deadline,
            state,
            available_participations,
            total_participations,
        })
    }
}

/// Submit a state-changing call and wait for one confirmation.
async fn send_and_confirm<D: Detokenize>(
    call: ContractCall<RelaySigner, D>,
) -> Result<TxReceipt, ChainError> {
    let pending = call.send().await.map_err(submit_error)?;
    let hash = format!("{:?}", pending.tx_hash());

    let receipt = pending
        .confirmations(1)
        .await
        .map_err(|e| ChainError::Connection(format!("failed waiting for inclusion: {e}")))?
        .ok_or_else(|| {
            ChainError::Submission(format!("transaction {hash} dropped before inclusion"))
        })?;

    if receipt.status == Some(U64::from(1)) {
        Ok(TxReceipt {
            hash,
            block_number: receipt.block_number.map(|b| b.as_u64()).unwrap_or_default(),
        })
    } else {
        Err(ChainError::ContractRevert {
            reason: format!("transaction {hash} failed on-chain"),
        })
    }
}

fn parse_address(raw: &str, name: &str) -> Result<Address, ChainError> {
    raw.parse::<Address>()
        .map_err(|e| ChainError::Connection(format!("invalid address in {name}: {e}")))
}

fn read_error(err: ContractError<RelaySigner>) -> ChainError {
    match revert_of(&err) {
        Some(revert) => revert,
        None => ChainError::Connection(err.to_string()),
    }
}

fn submit_error(err: ContractError<RelaySigner>) -> ChainError {
    if let Some(revert) = revert_of(&err) {
        return revert;
    }
    match err {
        ContractError::ProviderError { e } => ChainError::Connection(e.to_string()),
        other => ChainError::Submission(other.to_string()),
    }
}

fn revert_of(err: &ContractError<RelaySigner>) -> Option<ChainError> {
    err.as_revert().map(|data| ChainError::ContractRevert {
        reason: revert_reason(data),
    })
}

/// Decode a Solidity `Error(string)` payload; anything else keeps the
/// generic reason.
fn revert_reason(data: &Bytes) -> String {
    const ERROR_STRING_SELECTOR: [u8; 4] = [0x08, 0xc3, 0x79, 0xa0];
    if data.len() > 4 && data[..4] == ERROR_STRING_SELECTOR {
        if let Ok(reason) = String::decode(&data[4..]) {
            return reason;
        }
    }
    "execution reverted".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_error_string_revert_payload() {
        // Error("not enough allowance") as emitted by require(.., "..")
        let mut payload = vec![0x08, 0xc3, 0x79, 0xa0];
        payload.extend(ethers::abi::encode(&[ethers::abi::Token::String(
            "not enough allowance".to_string(),
        )]));
        let reason = revert_reason(&Bytes::from(payload));
        assert_eq!(reason, "not enough allowance");
    }

    #[test]
    fn opaque_revert_payload_keeps_generic_reason() {
        let reason = revert_reason(&Bytes::from(vec![0xde, 0xad, 0xbe, 0xef]));
        assert_eq!(reason, "execution reverted");
    }
}
