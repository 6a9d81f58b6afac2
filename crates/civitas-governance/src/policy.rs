//! Finalization eligibility rules.

use civitas_types::U256;
use serde::{Deserialize, Serialize};

use crate::error::GovernanceError;

/// Rule deciding whether a proposal that exceeded quorum may be executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinalizationPolicy {
    /// Strict majority: `votes_for > votes_against`.
    #[default]
    MajorityFor,
    /// Exceeding quorum is enough, regardless of the split.
    QuorumOnly,
}

impl FinalizationPolicy {
    /// Check the outcome of a tally under this policy.
    pub fn check_outcome(&self, votes_for: U256, votes_against: U256) -> Result<(), GovernanceError> {
        match self {
            FinalizationPolicy::MajorityFor if votes_for <= votes_against => {
                Err(GovernanceError::ProposalRejected {
                    votes_for,
                    votes_against,
                })
            }
            _ => Ok(()),
        }
    }
}

/// Combined decisive weight of a tally.
pub fn total_votes(votes_for: U256, votes_against: U256) -> Result<U256, GovernanceError> {
    votes_for
        .checked_add(&votes_against)
        .ok_or(GovernanceError::Overflow)
}

/// Quorum is met only when the combined weight strictly exceeds it.
pub fn check_quorum(votes_for: U256, votes_against: U256, quorum: U256) -> Result<(), GovernanceError> {
    let total = total_votes(votes_for, votes_against)?;
    if total > quorum {
        Ok(())
    } else {
        Err(GovernanceError::QuorumNotMet { total, quorum })
    }
}
