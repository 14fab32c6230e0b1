//! Governance proposals and voting, demo-simulated.

use serde::{Deserialize, Serialize};

use crate::portfolio::TxProvenance;

/// Governance proposal attached to a funded project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Proposal {
    pub id: String,
    pub project: String,
    pub title: String,
    pub description: String,
    pub votes_for: u64,
    pub votes_against: u64,
}

impl Proposal {
    pub fn approval_percentage(&self) -> f64 {
        let total = self.votes_for + self.votes_against;
        if total == 0 {
            return 0.0;
        }
        self.votes_for as f64 / total as f64 * 100.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteChoice {
    For,
    Against,
}

/// A cast vote. Votes are demo-simulated, so the provenance is always a
/// fabricated identifier.
#[derive(Debug, Clone)]
pub struct VoteRecord {
    pub proposal_id: String,
    pub choice: VoteChoice,
    pub weight: u32,
    pub provenance: TxProvenance,
}

/// Seed proposals for the demo projects.
pub fn demo_proposals() -> Vec<Proposal> {
    vec![
        Proposal {
            id: "chapinero_liquidation".into(),
            project: "Torre Empresarial Chapinero".into(),
            title: "Early liquidation".into(),
            description: "Purchase offer at 16% above projection; accept and distribute gains."
                .into(),
            votes_for: 234,
            votes_against: 124,
        },
        Proposal {
            id: "chapinero_expansion".into(),
            project: "Torre Empresarial Chapinero".into(),
            title: "Project expansion".into(),
            description: "Add two floors with extra funding; projected ROI rises to 22%.".into(),
            votes_for: 189,
            votes_against: 167,
        },
        Proposal {
            id: "sabana_dividends".into(),
            project: "Residencial La Sabana".into(),
            title: "Dividend distribution".into(),
            description: "Project completed; authorize the final distribution of gains.".into(),
            votes_for: 421,
            votes_against: 78,
        },
        Proposal {
            id: "techflow_series_b".into(),
            project: "StartUp TechFlow".into(),
            title: "Participate in Series B".into(),
            description: "Option to join the next round and keep the current stake.".into(),
            votes_for: 156,
            votes_against: 89,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn approval_percentage_handles_empty_tallies() {
        let mut proposal = demo_proposals().remove(0);
        assert!((proposal.approval_percentage() - 65.363).abs() < 0.01);

        proposal.votes_for = 0;
        proposal.votes_against = 0;
        assert_eq!(proposal.approval_percentage(), 0.0);
    }
}
