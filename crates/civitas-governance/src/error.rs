use civitas_types::{Address, U256};
use thiserror::Error;

use crate::ledger::LedgerError;

/// Errors that can occur in governance operations.
///
/// Every error is a synchronous rejection of the triggering call; the
/// governance state is left exactly as it was before the call.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum GovernanceError {
    #[error("Proposal not found: {0}")]
    NotFound(u64),

    #[error("Unauthorized: {0} holds no voting weight")]
    Unauthorized(Address),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Duplicate vote: {voter} already voted on proposal {proposal_id}")]
    DuplicateVote { proposal_id: u64, voter: Address },

    #[error("Proposal already finalized: {0}")]
    AlreadyFinalized(u64),

    #[error("Quorum not met: {total} <= {quorum}")]
    QuorumNotMet { total: U256, quorum: U256 },

    #[error("Proposal rejected: {votes_for} for, {votes_against} against")]
    ProposalRejected { votes_for: U256, votes_against: U256 },

    #[error("Insufficient treasury: required {required}, available {available}")]
    InsufficientTreasury { required: U256, available: U256 },

    #[error("Treasury transfer failed: {0}")]
    TransferFailed(#[from] LedgerError),

    #[error("Vote tally overflow")]
    Overflow,
}

/// Fieldless category of a [`GovernanceError`], for callers that only
/// branch on the kind of rejection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    NotFound,
    Unauthorized,
    InvalidArgument,
    DuplicateVote,
    AlreadyFinalized,
    QuorumNotMet,
    ProposalRejected,
    InsufficientTreasury,
    TransferFailed,
    Overflow,
}

impl GovernanceError {
    /// Category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            GovernanceError::NotFound(_) => ErrorKind::NotFound,
            GovernanceError::Unauthorized(_) => ErrorKind::Unauthorized,
            GovernanceError::InvalidArgument(_) => ErrorKind::InvalidArgument,
            GovernanceError::DuplicateVote { .. } => ErrorKind::DuplicateVote,
            GovernanceError::AlreadyFinalized(_) => ErrorKind::AlreadyFinalized,
            GovernanceError::QuorumNotMet { .. } => ErrorKind::QuorumNotMet,
            GovernanceError::ProposalRejected { .. } => ErrorKind::ProposalRejected,
            GovernanceError::InsufficientTreasury { .. } => ErrorKind::InsufficientTreasury,
            GovernanceError::TransferFailed(_) => ErrorKind::TransferFailed,
            GovernanceError::Overflow => ErrorKind::Overflow,
        }
    }
}
