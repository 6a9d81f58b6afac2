//! Governance core: proposal lifecycle, vote accounting and treasury
//! disbursement.
//!
//! Every mutating operation validates completely before it touches state,
//! so a rejected call leaves proposals, tallies and balances unchanged.
//! Finalization flips the proposal flag and moves the funds as one unit:
//! if the ledger refuses the transfer the flag is restored.

use civitas_types::{Address, U256};
use tracing::{debug, info, warn};

use crate::config::{ConfigError, GovernanceConfig};
use crate::error::GovernanceError;
use crate::events::GovernanceEvent;
use crate::ledger::Ledger;
use crate::policy::{self, FinalizationPolicy};
use crate::proposal::{Ballot, Proposal, ProposalRegistry, ProposalVotes, VoteType};

/// Treasury governance state machine.
///
/// `W` supplies voting weight (token balances), `F` holds the treasury
/// asset under [`GovernanceConfig::treasury`].
///
/// Committed operations append to an in-memory event log that is never
/// trimmed here. Hosts must call [`Governance::drain_events`] periodically
/// to keep it bounded.
#[derive(Debug)]
pub struct Governance<W, F> {
    config: GovernanceConfig,
    registry: ProposalRegistry,
    weights: W,
    funds: F,
    events: Vec<GovernanceEvent>,
}

impl<W: Ledger, F: Ledger> Governance<W, F> {
    /// Create a governance instance over the given ledgers.
    pub fn new(config: GovernanceConfig, weights: W, funds: F) -> Result<Self, ConfigError> {
        config.validate()?;

        info!(
            quorum = %config.quorum,
            treasury = %config.treasury,
            policy = ?config.policy,
            "Governance initialized"
        );

        Ok(Self {
            config,
            registry: ProposalRegistry::new(),
            weights,
            funds,
            events: Vec::new(),
        })
    }

    /// Create a disbursement proposal. Returns the new proposal ID.
    pub fn create_proposal(
        &mut self,
        caller: Address,
        name: impl Into<String>,
        amount: U256,
        recipient: Address,
    ) -> Result<u64, GovernanceError> {
        let name = name.into();
        let result = self.try_create_proposal(caller, name, amount, recipient);
        if let Err(e) = &result {
            debug!(%caller, error = %e, "Proposal creation rejected");
        }
        result
    }

    fn try_create_proposal(
        &mut self,
        caller: Address,
        name: String,
        amount: U256,
        recipient: Address,
    ) -> Result<u64, GovernanceError> {
        self.require_weight(&caller)?;

        if name.trim().is_empty() {
            return Err(GovernanceError::InvalidArgument(
                "proposal name cannot be empty".to_string(),
            ));
        }
        if amount.is_zero() {
            return Err(GovernanceError::InvalidArgument(
                "proposal amount must be greater than zero".to_string(),
            ));
        }
        if recipient.is_zero() {
            return Err(GovernanceError::InvalidArgument(
                "recipient cannot be the zero address".to_string(),
            ));
        }
        if recipient == self.config.treasury {
            return Err(GovernanceError::InvalidArgument(
                "recipient cannot be the treasury itself".to_string(),
            ));
        }
        if self.config.check_treasury_on_create {
            self.require_treasury(amount)?;
        }

        let id = self.registry.create(name.clone(), amount, recipient, caller);

        info!(proposal_id = id, proposer = %caller, %amount, %recipient, "Proposal created");
        self.events.push(GovernanceEvent::ProposalCreated {
            id,
            name,
            amount,
            recipient,
            proposer: caller,
        });

        Ok(id)
    }

    /// Cast `caller`'s vote on a proposal, weighted by their current balance.
    pub fn vote(
        &mut self,
        caller: Address,
        proposal_id: u64,
        vote_type: VoteType,
    ) -> Result<(), GovernanceError> {
        let result = self.try_vote(caller, proposal_id, vote_type);
        if let Err(e) = &result {
            debug!(proposal_id, %caller, error = %e, "Vote rejected");
        }
        result
    }

    fn try_vote(
        &mut self,
        caller: Address,
        proposal_id: u64,
        vote_type: VoteType,
    ) -> Result<(), GovernanceError> {
        if !vote_type.is_castable() {
            return Err(GovernanceError::InvalidArgument(
                "abstain is not a castable vote".to_string(),
            ));
        }

        let proposal = self
            .registry
            .get_mut(proposal_id)
            .ok_or(GovernanceError::NotFound(proposal_id))?;

        // Weight is read now and stored with the ballot.
        let weight = self.weights.balance_of(&caller);
        proposal.cast_vote(caller, vote_type, weight)?;

        info!(
            proposal_id,
            voter = %caller,
            choice = vote_type.label(),
            %weight,
            votes_for = %proposal.votes_for,
            votes_against = %proposal.votes_against,
            "Vote cast"
        );
        self.events.push(GovernanceEvent::VoteCast {
            proposal_id,
            voter: caller,
            choice: vote_type,
            weight,
        });

        Ok(())
    }

    /// Current tally and finalization flag of a proposal.
    pub fn get_proposal_votes(&self, proposal_id: u64) -> Result<ProposalVotes, GovernanceError> {
        Ok(self.proposal(proposal_id)?.votes())
    }

    /// Execute a proposal: mark it finalized and pay its amount out of the
    /// treasury to the recipient.
    pub fn finalize_proposal(
        &mut self,
        caller: Address,
        proposal_id: u64,
    ) -> Result<(), GovernanceError> {
        let result = self.try_finalize(caller, proposal_id);
        if let Err(e) = &result {
            debug!(proposal_id, %caller, error = %e, "Finalization rejected");
        }
        result
    }

    fn try_finalize(&mut self, caller: Address, proposal_id: u64) -> Result<(), GovernanceError> {
        let proposal = self.proposal(proposal_id)?;
        if proposal.finalized {
            return Err(GovernanceError::AlreadyFinalized(proposal_id));
        }
        self.require_weight(&caller)?;
        self.check_executable(proposal)?;

        let treasury = self.config.treasury;
        let proposal = self
            .registry
            .get_mut(proposal_id)
            .ok_or(GovernanceError::NotFound(proposal_id))?;
        let (recipient, amount) = (proposal.recipient, proposal.amount);

        proposal.finalized = true;
        if let Err(e) = self.funds.transfer(&treasury, &recipient, amount) {
            proposal.finalized = false;
            warn!(proposal_id, %recipient, %amount, error = %e, "Treasury transfer failed, finalization rolled back");
            return Err(GovernanceError::TransferFailed(e));
        }

        info!(proposal_id, finalized_by = %caller, %recipient, %amount, "Proposal finalized");
        self.events.push(GovernanceEvent::ProposalFinalized {
            proposal_id,
            recipient,
            amount,
        });

        Ok(())
    }

    /// Whether an open proposal currently passes quorum, outcome and
    /// treasury checks. Finalized proposals report `false`.
    pub fn can_finalize(&self, proposal_id: u64) -> Result<bool, GovernanceError> {
        let proposal = self.proposal(proposal_id)?;
        Ok(!proposal.finalized && self.check_executable(proposal).is_ok())
    }

    fn check_executable(&self, proposal: &Proposal) -> Result<(), GovernanceError> {
        policy::check_quorum(proposal.votes_for, proposal.votes_against, self.config.quorum)?;
        self.config
            .policy
            .check_outcome(proposal.votes_for, proposal.votes_against)?;
        self.require_treasury(proposal.amount)
    }

    fn require_weight(&self, caller: &Address) -> Result<U256, GovernanceError> {
        let weight = self.weights.balance_of(caller);
        if weight.is_zero() {
            return Err(GovernanceError::Unauthorized(*caller));
        }
        Ok(weight)
    }

    fn require_treasury(&self, amount: U256) -> Result<(), GovernanceError> {
        let available = self.treasury_balance();
        if amount > available {
            return Err(GovernanceError::InsufficientTreasury {
                required: amount,
                available,
            });
        }
        Ok(())
    }

    /// Number of proposals created so far. IDs are `1..=proposal_count()`.
    pub fn proposal_count(&self) -> u64 {
        self.registry.count()
    }

    /// Look up a proposal by ID.
    pub fn proposal(&self, proposal_id: u64) -> Result<&Proposal, GovernanceError> {
        self.registry
            .get(proposal_id)
            .ok_or(GovernanceError::NotFound(proposal_id))
    }

    /// All proposals in ID order.
    pub fn proposals(&self) -> &[Proposal] {
        self.registry.all()
    }

    /// Proposals that have not been finalized.
    pub fn open_proposals(&self) -> impl Iterator<Item = &Proposal> {
        self.registry.open()
    }

    /// Whether `voter` has voted on a proposal.
    pub fn has_voted(&self, proposal_id: u64, voter: &Address) -> Result<bool, GovernanceError> {
        Ok(self.proposal(proposal_id)?.has_voted(voter))
    }

    /// Ballot `voter` cast on a proposal, if any.
    pub fn ballot(&self, proposal_id: u64, voter: &Address) -> Result<Option<Ballot>, GovernanceError> {
        Ok(self.proposal(proposal_id)?.ballot(voter))
    }

    pub fn quorum(&self) -> U256 {
        self.config.quorum
    }

    pub fn policy(&self) -> FinalizationPolicy {
        self.config.policy
    }

    pub fn config(&self) -> &GovernanceConfig {
        &self.config
    }

    /// Treasury custody address.
    pub fn treasury(&self) -> Address {
        self.config.treasury
    }

    /// Funds currently held by the treasury.
    pub fn treasury_balance(&self) -> U256 {
        self.funds.balance_of(&self.config.treasury)
    }

    /// Voting weight `owner` would cast right now.
    pub fn voting_weight(&self, owner: &Address) -> U256 {
        self.weights.balance_of(owner)
    }

    /// Events committed since the last drain, oldest first.
    pub fn events(&self) -> &[GovernanceEvent] {
        &self.events
    }

    /// Take and clear the event log. The log only shrinks through this call.
    pub fn drain_events(&mut self) -> Vec<GovernanceEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn weights(&self) -> &W {
        &self.weights
    }

    /// Mutable token ledger, for hosts that move tokens between calls.
    pub fn weights_mut(&mut self) -> &mut W {
        &mut self.weights
    }

    pub fn funds(&self) -> &F {
        &self.funds
    }

    /// Mutable funds ledger, for external deposits into the treasury.
    pub fn funds_mut(&mut self) -> &mut F {
        &mut self.funds
    }

    /// Both ledgers at once.
    pub fn ledgers_mut(&mut self) -> (&mut W, &mut F) {
        (&mut self.weights, &mut self.funds)
    }
}
