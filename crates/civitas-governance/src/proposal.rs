//! Proposal records and the proposal arena.
//!
//! Proposals go through states: Open -> Finalized (terminal).

use std::collections::HashMap;

use civitas_types::{Address, U256};
use serde::{Deserialize, Serialize};

use crate::error::GovernanceError;
use crate::policy;

/// Vote choice, numbered as in the host contract ABI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum VoteType {
    /// Absence of a vote. Not castable.
    #[default]
    Abstain = 0,
    /// Vote in favor
    For = 1,
    /// Vote against
    Against = 2,
}

impl VoteType {
    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            VoteType::Abstain => "Abstain",
            VoteType::For => "For",
            VoteType::Against => "Against",
        }
    }

    /// Whether this choice can be submitted through `vote`.
    pub fn is_castable(&self) -> bool {
        !matches!(self, VoteType::Abstain)
    }
}

impl TryFrom<u8> for VoteType {
    type Error = GovernanceError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(VoteType::Abstain),
            1 => Ok(VoteType::For),
            2 => Ok(VoteType::Against),
            other => Err(GovernanceError::InvalidArgument(format!(
                "unknown vote type {}",
                other
            ))),
        }
    }
}

impl From<VoteType> for u8 {
    fn from(v: VoteType) -> Self {
        v as u8
    }
}

/// A cast vote with the weight snapshotted when it was cast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ballot {
    pub choice: VoteType,
    pub weight: U256,
}

/// Tally view returned by `get_proposal_votes`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposalVotes {
    pub votes_for: U256,
    pub votes_against: U256,
    pub finalized: bool,
}

/// Treasury disbursement proposal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Proposal {
    /// Sequential ID, starting at 1
    pub id: u64,
    /// Label
    pub name: String,
    /// Requested disbursement in base units
    pub amount: U256,
    /// Receiver of the disbursement
    pub recipient: Address,
    /// Creator
    pub proposer: Address,
    /// Weighted votes in favor
    pub votes_for: U256,
    /// Weighted votes against
    pub votes_against: U256,
    /// Set once the disbursement has executed
    pub finalized: bool,
    ballots: HashMap<Address, Ballot>,
}

impl Proposal {
    /// Create a new open proposal with empty tallies.
    pub fn new(id: u64, name: String, amount: U256, recipient: Address, proposer: Address) -> Self {
        Self {
            id,
            name,
            amount,
            recipient,
            proposer,
            votes_for: U256::ZERO,
            votes_against: U256::ZERO,
            finalized: false,
            ballots: HashMap::new(),
        }
    }

    /// Record a vote.
    ///
    /// Validation happens before any field is touched, so a rejected vote
    /// leaves the proposal unchanged.
    pub fn cast_vote(
        &mut self,
        voter: Address,
        choice: VoteType,
        weight: U256,
    ) -> Result<(), GovernanceError> {
        let in_favor = match choice {
            VoteType::For => true,
            VoteType::Against => false,
            VoteType::Abstain => {
                return Err(GovernanceError::InvalidArgument(
                    "abstain is not a castable vote".to_string(),
                ))
            }
        };

        if self.finalized {
            return Err(GovernanceError::AlreadyFinalized(self.id));
        }

        if self.ballots.contains_key(&voter) {
            return Err(GovernanceError::DuplicateVote {
                proposal_id: self.id,
                voter,
            });
        }

        if weight.is_zero() {
            return Err(GovernanceError::Unauthorized(voter));
        }

        let tally = if in_favor {
            &mut self.votes_for
        } else {
            &mut self.votes_against
        };
        *tally = tally.checked_add(&weight).ok_or(GovernanceError::Overflow)?;

        self.ballots.insert(voter, Ballot { choice, weight });
        Ok(())
    }

    /// Tally view.
    pub fn votes(&self) -> ProposalVotes {
        ProposalVotes {
            votes_for: self.votes_for,
            votes_against: self.votes_against,
            finalized: self.finalized,
        }
    }

    /// Get total decisive votes cast.
    pub fn total_votes(&self) -> Result<U256, GovernanceError> {
        policy::total_votes(self.votes_for, self.votes_against)
    }

    /// Check if voter has voted.
    pub fn has_voted(&self, voter: &Address) -> bool {
        self.ballots.contains_key(voter)
    }

    /// Ballot cast by `voter`, if any.
    pub fn ballot(&self, voter: &Address) -> Option<Ballot> {
        self.ballots.get(voter).copied()
    }

    /// Number of ballots cast.
    pub fn voter_count(&self) -> usize {
        self.ballots.len()
    }
}

/// Arena of proposals indexed by sequential ID.
///
/// IDs are `1..=len()`; the proposal with ID `n` lives at index `n - 1`.
#[derive(Debug, Default, Clone)]
pub struct ProposalRegistry {
    proposals: Vec<Proposal>,
}

impl ProposalRegistry {
    /// Create a new registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a new proposal and return its ID.
    pub fn create(
        &mut self,
        name: String,
        amount: U256,
        recipient: Address,
        proposer: Address,
    ) -> u64 {
        let id = self.proposals.len() as u64 + 1;
        self.proposals
            .push(Proposal::new(id, name, amount, recipient, proposer));
        id
    }

    /// Get a proposal.
    pub fn get(&self, id: u64) -> Option<&Proposal> {
        let index = usize::try_from(id.checked_sub(1)?).ok()?;
        self.proposals.get(index)
    }

    /// Get a proposal mutably.
    pub fn get_mut(&mut self, id: u64) -> Option<&mut Proposal> {
        let index = usize::try_from(id.checked_sub(1)?).ok()?;
        self.proposals.get_mut(index)
    }

    /// Number of proposals ever created.
    pub fn count(&self) -> u64 {
        self.proposals.len() as u64
    }

    /// All proposals in ID order.
    pub fn all(&self) -> &[Proposal] {
        &self.proposals
    }

    /// Proposals still accepting votes.
    pub fn open(&self) -> impl Iterator<Item = &Proposal> {
        self.proposals.iter().filter(|p| !p.finalized)
    }
}
