//! The owned application store.
//!
//! One state object, mutated only through the action methods below; render
//! code gets shared references and never touches the fields directly.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use rand::Rng;
use thiserror::Error;

use crate::backend::InvestmentBackend;
use crate::governance::{demo_proposals, Proposal, VoteChoice, VoteRecord};
use crate::portfolio::{
    fabricate_tx_id, fabricate_wallet, market_tick, portfolio_stats, CustodyMode, Investment,
    InvestmentStatus, PortfolioStats, TxProvenance,
};
use crate::session::{KycStatus, RegistrationForm, User};

/// Price of one property token.
pub const TOKEN_PRICE_COP: f64 = 10_000.0;
/// Platform fee charged on top of the invested amount.
pub const PLATFORM_FEE: f64 = 0.02;
/// Balance every fresh account starts with.
pub const STARTING_BALANCE_COP: f64 = 5_000_000.0;

/// The project currently open for investment.
pub const DEMO_PROJECT: &str = "Torre Empresarial Chapinero";

/// Demo account that logs in with an existing holding.
const SEEDED_ACCOUNT_EMAIL: &str = "juan@itos.co";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("all fields are required")]
    MissingFields,
    #[error("registration rejected: {0}")]
    InvalidRegistration(String),
    #[error("not logged in")]
    NotLoggedIn,
    #[error("identity verification incomplete")]
    KycIncomplete,
    #[error("token count must be positive")]
    InvalidTokenCount,
    #[error("insufficient balance")]
    InsufficientBalance,
    #[error("no tokens held in this proposal's project")]
    NoVotingPower,
    #[error("unknown proposal {0}")]
    UnknownProposal(String),
}

pub struct AppStore {
    backend: Arc<dyn InvestmentBackend>,
    session: Option<User>,
    balance_cop: f64,
    investments: Vec<Investment>,
    proposals: Vec<Proposal>,
    votes: Vec<VoteRecord>,
    next_entry_id: u64,
}

impl AppStore {
    pub fn new(backend: Arc<dyn InvestmentBackend>) -> Self {
        Self {
            backend,
            session: None,
            balance_cop: STARTING_BALANCE_COP,
            investments: Vec::new(),
            proposals: demo_proposals(),
            votes: Vec::new(),
            next_entry_id: 1,
        }
    }

    pub fn session(&self) -> Option<&User> {
        self.session.as_ref()
    }

    pub fn balance_cop(&self) -> f64 {
        self.balance_cop
    }

    pub fn investments(&self) -> &[Investment] {
        &self.investments
    }

    pub fn proposals(&self) -> &[Proposal] {
        &self.proposals
    }

    pub fn votes(&self) -> &[VoteRecord] {
        &self.votes
    }

    pub fn stats(&self) -> PortfolioStats {
        portfolio_stats(&self.investments)
    }

    /// Log in. Credentials are not checked against anything; the account is
    /// fabricated, and the well-known demo address arrives verified with an
    /// existing holding.
    pub fn login<R: Rng>(
        &mut self,
        email: &str,
        password: &str,
        rng: &mut R,
    ) -> Result<&User, StoreError> {
        if email.is_empty() || password.is_empty() {
            return Err(StoreError::MissingFields);
        }

        self.session = Some(User {
            name: "Juan Pérez".into(),
            email: email.to_string(),
            document_id: "12345678".into(),
            phone: "300 123 4567".into(),
            wallet: "0x742d35Cc6B342e2c8aF53a7e0bF0cb92e12341c5".into(),
            kyc_status: KycStatus::Verified,
            registration_date: NaiveDate::from_ymd_opt(2024, 1, 15).expect("valid date"),
        });

        if email == SEEDED_ACCOUNT_EMAIL {
            self.investments = vec![Investment {
                id: self.take_entry_id(),
                project: "Residencial La Sabana".into(),
                tokens: 12,
                invested_amount: 120_000.0,
                current_value: 135_000.0,
                date: NaiveDate::from_ymd_opt(2024, 3, 15).expect("valid date"),
                custody: CustodyMode::Fiduciary,
                status: InvestmentStatus::Active,
                provenance: TxProvenance::Simulated {
                    fabricated_id: fabricate_tx_id(rng),
                },
            }];
            self.balance_cop = 3_500_000.0;
        } else {
            self.investments = Vec::new();
            self.balance_cop = STARTING_BALANCE_COP;
        }
        self.votes.clear();

        Ok(self.session.as_ref().expect("session just set"))
    }

    /// Register a new account. Verification starts pending, gating
    /// investments until it completes.
    pub fn register<R: Rng>(
        &mut self,
        form: RegistrationForm,
        rng: &mut R,
    ) -> Result<&User, StoreError> {
        if form.name.is_empty()
            || form.email.is_empty()
            || form.document_id.is_empty()
            || form.phone.is_empty()
            || form.password.is_empty()
        {
            return Err(StoreError::MissingFields);
        }
        if form.document_id.len() < 7 {
            return Err(StoreError::InvalidRegistration(
                "document id must have at least 7 digits".into(),
            ));
        }

        let wallet = form
            .wallet
            .filter(|w| !w.is_empty())
            .unwrap_or_else(|| fabricate_wallet(rng));

        self.session = Some(User {
            name: form.name,
            email: form.email,
            document_id: form.document_id,
            phone: form.phone,
            wallet,
            kyc_status: KycStatus::Pending,
            registration_date: Utc::now().date_naive(),
        });
        self.investments = Vec::new();
        self.votes.clear();
        self.balance_cop = STARTING_BALANCE_COP;

        Ok(self.session.as_ref().expect("session just set"))
    }

    /// Invest in the demo project. Tries the real chain through the relay;
    /// any failure there falls back to the simulated path so the demo stays
    /// usable, with the fabricated identifier explicitly marked.
    pub async fn invest<R: Rng>(
        &mut self,
        tokens: u32,
        custody: CustodyMode,
        rng: &mut R,
    ) -> Result<Investment, StoreError> {
        match self.session.as_ref() {
            None => return Err(StoreError::NotLoggedIn),
            Some(user) if user.kyc_status != KycStatus::Verified => {
                return Err(StoreError::KycIncomplete)
            }
            Some(_) => {}
        }
        if tokens == 0 {
            return Err(StoreError::InvalidTokenCount);
        }

        let invested_amount = f64::from(tokens) * TOKEN_PRICE_COP;
        let total_cost = invested_amount * (1.0 + PLATFORM_FEE);
        if total_cost > self.balance_cop {
            return Err(StoreError::InsufficientBalance);
        }

        // 1 token = 1 USDC on the chain side.
        let provenance = match self.backend.invest(f64::from(tokens)).await {
            Ok(response) => TxProvenance::Real {
                tx_hash: response.invest_tx,
                block_number: None,
            },
            Err(err) => {
                log::warn!("chain path failed, falling back to simulation: {err}");
                TxProvenance::Simulated {
                    fabricated_id: fabricate_tx_id(rng),
                }
            }
        };

        self.balance_cop -= total_cost;
        let entry = Investment {
            id: self.take_entry_id(),
            project: DEMO_PROJECT.to_string(),
            tokens,
            invested_amount,
            current_value: invested_amount,
            date: Utc::now().date_naive(),
            custody,
            status: InvestmentStatus::Active,
            provenance,
        };
        self.investments.push(entry.clone());
        Ok(entry)
    }

    /// Cast a vote weighted by the tokens held in the proposal's project.
    /// Votes are demo-simulated and carry a fabricated identifier.
    pub fn vote<R: Rng>(
        &mut self,
        proposal_id: &str,
        choice: VoteChoice,
        rng: &mut R,
    ) -> Result<VoteRecord, StoreError> {
        if self.session.is_none() {
            return Err(StoreError::NotLoggedIn);
        }

        let project = self
            .proposals
            .iter()
            .find(|p| p.id == proposal_id)
            .map(|p| p.project.clone())
            .ok_or_else(|| StoreError::UnknownProposal(proposal_id.to_string()))?;

        let weight: u32 = self
            .investments
            .iter()
            .filter(|i| i.project == project)
            .map(|i| i.tokens)
            .sum();
        if weight == 0 {
            return Err(StoreError::NoVotingPower);
        }

        let proposal = self
            .proposals
            .iter_mut()
            .find(|p| p.id == proposal_id)
            .expect("looked up above");
        match choice {
            VoteChoice::For => proposal.votes_for += u64::from(weight),
            VoteChoice::Against => proposal.votes_against += u64::from(weight),
        }

        let record = VoteRecord {
            proposal_id: proposal_id.to_string(),
            choice,
            weight,
            provenance: TxProvenance::Simulated {
                fabricated_id: fabricate_tx_id(rng),
            },
        };
        self.votes.push(record.clone());
        Ok(record)
    }

    /// Restart a rejected verification.
    pub fn retry_kyc(&mut self) -> Result<KycStatus, StoreError> {
        let user = self.session.as_mut().ok_or(StoreError::NotLoggedIn)?;
        if user.kyc_status == KycStatus::Rejected {
            user.kyc_status = KycStatus::Pending;
        }
        Ok(user.kyc_status)
    }

    /// One step of the cosmetic market walk.
    pub fn market_tick<R: Rng>(&mut self, rng: &mut R) {
        market_tick(&mut self.investments, rng);
    }

    fn take_entry_id(&mut self) -> u64 {
        let id = self.next_entry_id;
        self.next_entry_id += 1;
        id
    }

    #[cfg(test)]
    pub(crate) fn set_kyc_for_tests(&mut self, status: KycStatus) {
        if let Some(user) = self.session.as_mut() {
            user.kyc_status = status;
        }
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use itos_relay::api::{EscrowStatusResponse, InvestResponse};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use crate::backend::BackendError;
    use crate::portfolio::SIMULATED_MARKER;

    use super::*;

    const REAL_HASH: &str = "0x9d4c72a9f6c3e1b8a54f2d0e8c7b6a5948372615049382716abcdef01234567";

    #[derive(Default)]
    struct HealthyBackend {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl InvestmentBackend for HealthyBackend {
        async fn invest(&self, _amount_usdc: f64) -> Result<InvestResponse, BackendError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(InvestResponse {
                success: true,
                approve_tx: "0xapprove".into(),
                invest_tx: REAL_HASH.into(),
                investor_info: serde_json::json!([]),
            })
        }

        async fn escrow_status(&self) -> Result<EscrowStatusResponse, BackendError> {
            Err(BackendError::Transport("not wired in tests".into()))
        }
    }

    struct FailingBackend;

    #[async_trait]
    impl InvestmentBackend for FailingBackend {
        async fn invest(&self, _amount_usdc: f64) -> Result<InvestResponse, BackendError> {
            Err(BackendError::Transport("connection refused".into()))
        }

        async fn escrow_status(&self) -> Result<EscrowStatusResponse, BackendError> {
            Err(BackendError::Transport("connection refused".into()))
        }
    }

    fn rng() -> StdRng {
        StdRng::seed_from_u64(99)
    }

    fn logged_in_store(backend: Arc<dyn InvestmentBackend>) -> AppStore {
        let mut store = AppStore::new(backend);
        store
            .login("ana@example.com", "secret", &mut rng())
            .unwrap();
        store
    }

    #[tokio::test]
    async fn real_path_appends_an_entry_with_the_genuine_hash() {
        let mut store = logged_in_store(Arc::new(HealthyBackend::default()));
        let entry = store
            .invest(10, CustodyMode::Fiduciary, &mut rng())
            .await
            .unwrap();

        assert!(entry.provenance.is_real());
        assert_eq!(entry.provenance.display_id(), REAL_HASH);
        assert!(!entry.provenance.display_id().contains(SIMULATED_MARKER));
        assert_eq!(store.investments().len(), 1);
    }

    #[tokio::test]
    async fn backend_failure_falls_back_to_a_marked_simulated_entry() {
        let mut store = logged_in_store(Arc::new(FailingBackend));
        let entry = store
            .invest(10, CustodyMode::Fiduciary, &mut rng())
            .await
            .unwrap();

        assert!(!entry.provenance.is_real());
        let shown = entry.provenance.display_id();
        assert!(shown.ends_with(SIMULATED_MARKER));
        // Still hash-shaped underneath the marker.
        let raw = shown.trim_end_matches(SIMULATED_MARKER);
        assert_eq!(raw.len(), 66);
        assert!(raw.starts_with("0x"));
    }

    #[tokio::test]
    async fn real_and_simulated_entries_stay_distinguishable() {
        let healthy = Arc::new(HealthyBackend::default());
        let mut store = logged_in_store(healthy);
        store
            .invest(5, CustodyMode::Fiduciary, &mut rng())
            .await
            .unwrap();

        // Second investment goes through a dead relay.
        store.backend = Arc::new(FailingBackend);
        store
            .invest(5, CustodyMode::Wallet, &mut rng())
            .await
            .unwrap();

        let real: Vec<_> = store
            .investments()
            .iter()
            .filter(|i| i.provenance.is_real())
            .collect();
        let simulated: Vec<_> = store
            .investments()
            .iter()
            .filter(|i| !i.provenance.is_real())
            .collect();
        assert_eq!(real.len(), 1);
        assert_eq!(simulated.len(), 1);
        assert!(simulated[0]
            .provenance
            .display_id()
            .ends_with(SIMULATED_MARKER));
    }

    #[tokio::test]
    async fn unverified_users_cannot_invest() {
        let backend = Arc::new(HealthyBackend::default());
        let mut store = AppStore::new(backend.clone());
        store
            .register(
                RegistrationForm {
                    name: "Ana Gómez".into(),
                    email: "ana@example.com".into(),
                    document_id: "9876543".into(),
                    phone: "301 555 1234".into(),
                    password: "secret".into(),
                    wallet: None,
                },
                &mut rng(),
            )
            .unwrap();

        let err = store
            .invest(5, CustodyMode::Fiduciary, &mut rng())
            .await
            .unwrap_err();
        assert_eq!(err, StoreError::KycIncomplete);
        assert_eq!(backend.calls.load(Ordering::SeqCst), 0);
        assert!(store.investments().is_empty());
    }

    #[tokio::test]
    async fn insufficient_balance_is_rejected_before_the_backend() {
        let backend = Arc::new(HealthyBackend::default());
        let mut store = logged_in_store(backend.clone());

        // 600 tokens cost 6.12M COP with the fee; the account holds 5M.
        let err = store
            .invest(600, CustodyMode::Fiduciary, &mut rng())
            .await
            .unwrap_err();
        assert_eq!(err, StoreError::InsufficientBalance);
        assert_eq!(backend.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn investing_deducts_the_amount_plus_platform_fee() {
        let mut store = logged_in_store(Arc::new(HealthyBackend::default()));
        store
            .invest(10, CustodyMode::Fiduciary, &mut rng())
            .await
            .unwrap();

        // 10 tokens = 100,000 COP + 2% fee.
        assert_eq!(store.balance_cop(), STARTING_BALANCE_COP - 102_000.0);
        assert_eq!(store.investments()[0].invested_amount, 100_000.0);
    }

    #[tokio::test]
    async fn zero_tokens_are_rejected() {
        let mut store = logged_in_store(Arc::new(HealthyBackend::default()));
        let err = store
            .invest(0, CustodyMode::Fiduciary, &mut rng())
            .await
            .unwrap_err();
        assert_eq!(err, StoreError::InvalidTokenCount);
    }

    #[test]
    fn seeded_demo_account_arrives_with_a_holding() {
        let mut store = AppStore::new(Arc::new(FailingBackend));
        store.login("juan@itos.co", "secret", &mut rng()).unwrap();

        assert_eq!(store.balance_cop(), 3_500_000.0);
        assert_eq!(store.investments().len(), 1);
        assert_eq!(store.investments()[0].project, "Residencial La Sabana");
        assert_eq!(store.investments()[0].tokens, 12);
    }

    #[test]
    fn votes_are_weighted_by_held_tokens() {
        let mut store = AppStore::new(Arc::new(FailingBackend));
        store.login("juan@itos.co", "secret", &mut rng()).unwrap();

        let record = store
            .vote("sabana_dividends", VoteChoice::For, &mut rng())
            .unwrap();
        assert_eq!(record.weight, 12);
        assert!(!record.provenance.is_real());

        let proposal = store
            .proposals()
            .iter()
            .find(|p| p.id == "sabana_dividends")
            .unwrap();
        assert_eq!(proposal.votes_for, 421 + 12);
    }

    #[test]
    fn voting_requires_tokens_in_the_project() {
        let mut store = AppStore::new(Arc::new(FailingBackend));
        store.login("juan@itos.co", "secret", &mut rng()).unwrap();

        // Holds La Sabana tokens only, not Chapinero.
        let err = store
            .vote("chapinero_expansion", VoteChoice::For, &mut rng())
            .unwrap_err();
        assert_eq!(err, StoreError::NoVotingPower);
    }

    #[test]
    fn kyc_retry_moves_rejected_back_to_pending() {
        let mut store = AppStore::new(Arc::new(FailingBackend));
        store.login("ana@example.com", "secret", &mut rng()).unwrap();
        store.set_kyc_for_tests(KycStatus::Rejected);

        assert_eq!(store.retry_kyc().unwrap(), KycStatus::Pending);
        // Retrying a non-rejected status is a no-op.
        store.set_kyc_for_tests(KycStatus::Verified);
        assert_eq!(store.retry_kyc().unwrap(), KycStatus::Verified);
    }

    #[test]
    fn registration_validates_required_fields_and_document_id() {
        let mut store = AppStore::new(Arc::new(FailingBackend));

        let err = store
            .register(RegistrationForm::default(), &mut rng())
            .unwrap_err();
        assert_eq!(err, StoreError::MissingFields);

        let err = store
            .register(
                RegistrationForm {
                    name: "Ana Gómez".into(),
                    email: "ana@example.com".into(),
                    document_id: "123".into(),
                    phone: "301 555 1234".into(),
                    password: "secret".into(),
                    wallet: None,
                },
                &mut rng(),
            )
            .unwrap_err();
        assert!(matches!(err, StoreError::InvalidRegistration(_)));
    }

    #[test]
    fn registration_fabricates_a_wallet_when_none_is_given() {
        let mut store = AppStore::new(Arc::new(FailingBackend));
        let user = store
            .register(
                RegistrationForm {
                    name: "Ana Gómez".into(),
                    email: "ana@example.com".into(),
                    document_id: "9876543".into(),
                    phone: "301 555 1234".into(),
                    password: "secret".into(),
                    wallet: None,
                },
                &mut rng(),
            )
            .unwrap();

        assert_eq!(user.kyc_status, KycStatus::Pending);
        assert_eq!(user.wallet.len(), 42);
        assert!(user.wallet.starts_with("0x"));
    }
}
