//! Civitas Governance - token-weighted treasury governance.
//!
//! This crate provides:
//! - Proposal lifecycle management (create, vote, finalize)
//! - Balance-weighted voting with one ballot per holder per proposal
//! - Strict quorum and configurable finalization policy
//! - Atomic treasury disbursement through a pluggable ledger
//! - A thread-safe handle for concurrent hosts

pub mod config;
pub mod error;
pub mod events;
pub mod governance;
pub mod ledger;
pub mod policy;
pub mod proposal;
pub mod shared;

pub use config::{ConfigError, GovernanceConfig};
pub use error::{ErrorKind, GovernanceError};
pub use events::GovernanceEvent;
pub use governance::Governance;
pub use ledger::{InMemoryLedger, Ledger, LedgerError};
pub use policy::FinalizationPolicy;
pub use proposal::{Ballot, Proposal, ProposalRegistry, ProposalVotes, VoteType};
pub use shared::SharedGovernance;
