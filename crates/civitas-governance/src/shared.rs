//! Thread-safe governance handle.
//!
//! All calls go through one mutex, so concurrent callers observe the same
//! serial order a ledger host would impose: a vote's read-modify-write of a
//! tally and finalization's check-then-set never interleave.

use std::sync::Arc;

use civitas_types::{Address, U256};
use parking_lot::Mutex;

use crate::error::GovernanceError;
use crate::events::GovernanceEvent;
use crate::governance::Governance;
use crate::ledger::Ledger;
use crate::proposal::{Proposal, ProposalVotes, VoteType};

/// Cloneable handle to a [`Governance`] instance shared between threads.
#[derive(Debug)]
pub struct SharedGovernance<W, F> {
    inner: Arc<Mutex<Governance<W, F>>>,
}

impl<W, F> Clone for SharedGovernance<W, F> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<W: Ledger, F: Ledger> SharedGovernance<W, F> {
    pub fn new(governance: Governance<W, F>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(governance)),
        }
    }

    pub fn create_proposal(
        &self,
        caller: Address,
        name: impl Into<String>,
        amount: U256,
        recipient: Address,
    ) -> Result<u64, GovernanceError> {
        self.inner.lock().create_proposal(caller, name, amount, recipient)
    }

    pub fn vote(
        &self,
        caller: Address,
        proposal_id: u64,
        vote_type: VoteType,
    ) -> Result<(), GovernanceError> {
        self.inner.lock().vote(caller, proposal_id, vote_type)
    }

    pub fn finalize_proposal(&self, caller: Address, proposal_id: u64) -> Result<(), GovernanceError> {
        self.inner.lock().finalize_proposal(caller, proposal_id)
    }

    pub fn get_proposal_votes(&self, proposal_id: u64) -> Result<ProposalVotes, GovernanceError> {
        self.inner.lock().get_proposal_votes(proposal_id)
    }

    pub fn proposal_count(&self) -> u64 {
        self.inner.lock().proposal_count()
    }

    /// Snapshot of a proposal.
    pub fn proposal(&self, proposal_id: u64) -> Result<Proposal, GovernanceError> {
        self.inner.lock().proposal(proposal_id).cloned()
    }

    pub fn quorum(&self) -> U256 {
        self.inner.lock().quorum()
    }

    pub fn treasury_balance(&self) -> U256 {
        self.inner.lock().treasury_balance()
    }

    pub fn can_finalize(&self, proposal_id: u64) -> Result<bool, GovernanceError> {
        self.inner.lock().can_finalize(proposal_id)
    }

    pub fn drain_events(&self) -> Vec<GovernanceEvent> {
        self.inner.lock().drain_events()
    }

    /// Run `f` with exclusive access to the governance state, e.g. to fund
    /// the treasury or move tokens between governance calls.
    pub fn with_ledgers<R>(&self, f: impl FnOnce(&mut W, &mut F) -> R) -> R {
        let mut guard = self.inner.lock();
        let gov = &mut *guard;
        let (weights, funds) = gov.ledgers_mut();
        f(weights, funds)
    }

    /// Run a read-only closure against the current state.
    pub fn read<R>(&self, f: impl FnOnce(&Governance<W, F>) -> R) -> R {
        f(&self.inner.lock())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GovernanceConfig;
    use crate::ledger::InMemoryLedger;
    use std::thread;

    fn addr(n: u64) -> Address {
        Address::from_low_u64(n)
    }

    #[test]
    fn test_concurrent_votes_are_exact() {
        const VOTERS: u64 = 32;

        let config = GovernanceConfig::with_quorum(U256::ZERO);
        let treasury = config.treasury;
        let weights = InMemoryLedger::with_balances((1..=VOTERS).map(|n| (addr(n), U256::from(n))));
        let funds = InMemoryLedger::with_balances([(treasury, U256::tokens(10))]);
        let shared = SharedGovernance::new(Governance::new(config, weights, funds).unwrap());

        let id = shared
            .create_proposal(addr(1), "Concurrent", U256::tokens(1), addr(500))
            .unwrap();

        let handles: Vec<_> = (1..=VOTERS)
            .map(|n| {
                let gov = shared.clone();
                thread::spawn(move || {
                    let choice = if n % 2 == 0 { VoteType::For } else { VoteType::Against };
                    gov.vote(addr(n), id, choice).unwrap();
                    // Second attempt from the same voter always loses
                    assert!(gov.vote(addr(n), id, choice).is_err());
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        let even: u64 = (1..=VOTERS).filter(|n| n % 2 == 0).sum();
        let odd: u64 = (1..=VOTERS).filter(|n| n % 2 == 1).sum();
        let votes = shared.get_proposal_votes(id).unwrap();
        assert_eq!(votes.votes_for, U256::from(even));
        assert_eq!(votes.votes_against, U256::from(odd));
    }

    #[test]
    fn test_concurrent_finalize_pays_once() {
        let config = GovernanceConfig::with_quorum(U256::ZERO);
        let treasury = config.treasury;
        let weights = InMemoryLedger::with_balances((1..=8).map(|n| (addr(n), U256::ONE)));
        let funds = InMemoryLedger::with_balances([(treasury, U256::tokens(10))]);
        let shared = SharedGovernance::new(Governance::new(config, weights, funds).unwrap());

        let id = shared
            .create_proposal(addr(1), "Race", U256::tokens(3), addr(500))
            .unwrap();
        shared.vote(addr(1), id, VoteType::For).unwrap();

        let handles: Vec<_> = (1..=8)
            .map(|n| {
                let gov = shared.clone();
                thread::spawn(move || gov.finalize_proposal(addr(n), id).is_ok())
            })
            .collect();
        let successes = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|ok| *ok)
            .count();

        assert_eq!(successes, 1);
        assert_eq!(shared.treasury_balance(), U256::tokens(7));
        assert_eq!(
            shared.read(|g| g.funds().balance_of(&addr(500))),
            U256::tokens(3)
        );
    }

    #[test]
    fn test_with_ledgers_funds_treasury() {
        let config = GovernanceConfig::with_quorum(U256::ZERO);
        let treasury = config.treasury;
        let shared = SharedGovernance::new(
            Governance::new(config, InMemoryLedger::new(), InMemoryLedger::new()).unwrap(),
        );

        shared
            .with_ledgers(|_, funds| funds.credit(treasury, U256::tokens(1_000)))
            .unwrap();

        assert_eq!(shared.treasury_balance(), U256::tokens(1_000));
        assert_eq!(shared.proposal_count(), 0);
        assert!(shared.proposal(1).is_err());
    }
}
