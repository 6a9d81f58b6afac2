//! Events emitted by committed governance operations.

use civitas_types::{Address, U256};
use serde::{Deserialize, Serialize};

use crate::proposal::VoteType;

/// Record of a successful state change, in commit order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum GovernanceEvent {
    ProposalCreated {
        id: u64,
        name: String,
        amount: U256,
        recipient: Address,
        proposer: Address,
    },
    VoteCast {
        proposal_id: u64,
        voter: Address,
        choice: VoteType,
        weight: U256,
    },
    ProposalFinalized {
        proposal_id: u64,
        recipient: Address,
        amount: U256,
    },
}

impl GovernanceEvent {
    /// Proposal the event refers to.
    pub fn proposal_id(&self) -> u64 {
        match self {
            GovernanceEvent::ProposalCreated { id, .. } => *id,
            GovernanceEvent::VoteCast { proposal_id, .. } => *proposal_id,
            GovernanceEvent::ProposalFinalized { proposal_id, .. } => *proposal_id,
        }
    }
}
