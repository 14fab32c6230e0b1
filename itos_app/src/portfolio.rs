//! Portfolio entries and the cosmetic market simulation.

use chrono::NaiveDate;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Marker appended when rendering identifiers that never touched the chain.
pub const SIMULATED_MARKER: &str = " (simulated)";

/// Where a portfolio entry's transaction identifier came from.
///
/// Simulated entries stay structurally distinct from real ones so downstream
/// code cannot treat a fabricated identifier as a genuine receipt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TxProvenance {
    Real {
        tx_hash: String,
        block_number: Option<u64>,
    },
    Simulated {
        fabricated_id: String,
    },
}

impl TxProvenance {
    pub fn is_real(&self) -> bool {
        matches!(self, TxProvenance::Real { .. })
    }

    /// Identifier for display: genuine hashes verbatim, fabricated ones with
    /// the explicit trailing marker.
    pub fn display_id(&self) -> String {
        match self {
            TxProvenance::Real { tx_hash, .. } => tx_hash.clone(),
            TxProvenance::Simulated { fabricated_id } => {
                format!("{fabricated_id}{SIMULATED_MARKER}")
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CustodyMode {
    Fiduciary,
    Wallet,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvestmentStatus {
    Active,
    Completed,
}

/// One portfolio holding. Local and ephemeral: a best-effort mirror of the
/// authoritative contract state, never reconciled against it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Investment {
    pub id: u64,
    pub project: String,
    pub tokens: u32,
    pub invested_amount: f64,
    pub current_value: f64,
    pub date: NaiveDate,
    pub custody: CustodyMode,
    pub status: InvestmentStatus,
    pub provenance: TxProvenance,
}

impl Investment {
    pub fn gain_percentage(&self) -> f64 {
        if self.invested_amount == 0.0 {
            return 0.0;
        }
        (self.current_value - self.invested_amount) / self.invested_amount * 100.0
    }
}

/// Aggregate portfolio figures for the dashboard.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PortfolioStats {
    pub total_invested: f64,
    pub current_value: f64,
    pub total_gain: f64,
    pub gain_percentage: f64,
    /// Entry id of the best-performing holding.
    pub top_performer: Option<u64>,
}

pub fn portfolio_stats(investments: &[Investment]) -> PortfolioStats {
    if investments.is_empty() {
        return PortfolioStats::default();
    }

    let total_invested: f64 = investments.iter().map(|i| i.invested_amount).sum();
    let current_value: f64 = investments.iter().map(|i| i.current_value).sum();
    let total_gain = current_value - total_invested;
    let gain_percentage = if total_invested > 0.0 {
        total_gain / total_invested * 100.0
    } else {
        0.0
    };

    let top_performer = investments
        .iter()
        .max_by(|a, b| {
            a.gain_percentage()
                .partial_cmp(&b.gain_percentage())
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .map(|i| i.id);

    PortfolioStats {
        total_invested,
        current_value,
        total_gain,
        gain_percentage,
        top_performer,
    }
}

/// Maximum per-tick move of the market walk.
const VOLATILITY: f64 = 0.02;

/// One step of the cosmetic market simulation: each holding moves up to ±2 %
/// and never drops below half its invested amount.
pub fn market_tick<R: Rng>(investments: &mut [Investment], rng: &mut R) {
    for investment in investments.iter_mut() {
        let change = (rng.gen::<f64>() - 0.5) * 2.0 * VOLATILITY;
        let new_value = investment.current_value * (1.0 + change);
        investment.current_value = new_value.max(investment.invested_amount * 0.5);
    }
}

/// Fabricate a transaction-hash-shaped identifier for the simulated path.
pub fn fabricate_tx_id<R: Rng>(rng: &mut R) -> String {
    let mut bytes = [0u8; 32];
    rng.fill(&mut bytes[..]);
    format!("0x{}", hex::encode(bytes))
}

/// Fabricate a plausible wallet address for registrations without one.
pub fn fabricate_wallet<R: Rng>(rng: &mut R) -> String {
    let mut bytes = [0u8; 20];
    rng.fill(&mut bytes[..]);
    format!("0x{}", hex::encode(bytes))
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    fn entry(id: u64, invested: f64, current: f64) -> Investment {
        Investment {
            id,
            project: "Torre Empresarial Chapinero".into(),
            tokens: 10,
            invested_amount: invested,
            current_value: current,
            date: NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(),
            custody: CustodyMode::Fiduciary,
            status: InvestmentStatus::Active,
            provenance: TxProvenance::Simulated {
                fabricated_id: "0xabc".into(),
            },
        }
    }

    #[test]
    fn simulated_identifiers_carry_the_marker() {
        let simulated = TxProvenance::Simulated {
            fabricated_id: "0x1234".into(),
        };
        assert_eq!(simulated.display_id(), format!("0x1234{SIMULATED_MARKER}"));
        assert!(!simulated.is_real());

        let real = TxProvenance::Real {
            tx_hash: "0x1234".into(),
            block_number: Some(7),
        };
        assert_eq!(real.display_id(), "0x1234");
        assert!(real.is_real());
    }

    #[test]
    fn fabricated_ids_are_hash_shaped() {
        let mut rng = StdRng::seed_from_u64(7);
        let id = fabricate_tx_id(&mut rng);
        assert_eq!(id.len(), 66);
        assert!(id.starts_with("0x"));
        assert!(id[2..].chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn stats_aggregate_and_pick_the_top_performer() {
        let holdings = vec![entry(1, 100_000.0, 110_000.0), entry(2, 50_000.0, 65_000.0)];
        let stats = portfolio_stats(&holdings);

        assert_eq!(stats.total_invested, 150_000.0);
        assert_eq!(stats.current_value, 175_000.0);
        assert_eq!(stats.total_gain, 25_000.0);
        assert!((stats.gain_percentage - 16.666_666).abs() < 0.001);
        assert_eq!(stats.top_performer, Some(2));
    }

    #[test]
    fn empty_portfolio_has_zeroed_stats() {
        let stats = portfolio_stats(&[]);
        assert_eq!(stats.total_invested, 0.0);
        assert_eq!(stats.top_performer, None);
    }

    #[test]
    fn market_tick_stays_within_bounds_and_above_the_floor() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut holdings = vec![entry(1, 100_000.0, 100_000.0)];

        for _ in 0..200 {
            let before = holdings[0].current_value;
            market_tick(&mut holdings, &mut rng);
            let after = holdings[0].current_value;
            assert!(after >= before * 0.9799);
            assert!(after <= before * 1.0201);
            assert!(after >= 50_000.0);
        }
    }

    #[test]
    fn market_tick_never_drops_below_half_the_invested_amount() {
        let mut rng = StdRng::seed_from_u64(3);
        // Already at the floor: the walk cannot push it further down.
        let mut holdings = vec![entry(1, 100_000.0, 50_000.0)];
        for _ in 0..100 {
            market_tick(&mut holdings, &mut rng);
            assert!(holdings[0].current_value >= 50_000.0);
        }
    }
}
