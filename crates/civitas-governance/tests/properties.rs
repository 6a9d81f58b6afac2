//! Property tests over arbitrary call sequences.

use civitas_governance::{
    ErrorKind, Governance, GovernanceConfig, InMemoryLedger, VoteType,
};
use civitas_types::{Address, U256};
use proptest::prelude::*;

const HOLDERS: u64 = 6;

#[derive(Debug, Clone)]
enum Call {
    Create { caller: u64, amount: u64 },
    Vote { caller: u64, proposal: u64, choice: u8 },
    Finalize { caller: u64, proposal: u64 },
}

fn call() -> impl Strategy<Value = Call> {
    // Callers 0 and HOLDERS + 1 hold no tokens
    prop_oneof![
        (0..=HOLDERS + 1, 0..20u64).prop_map(|(caller, amount)| Call::Create { caller, amount }),
        (0..=HOLDERS + 1, 0..6u64, 0..3u8)
            .prop_map(|(caller, proposal, choice)| Call::Vote { caller, proposal, choice }),
        (0..=HOLDERS + 1, 0..6u64).prop_map(|(caller, proposal)| Call::Finalize { caller, proposal }),
    ]
}

fn dao(quorum: u64) -> Governance<InMemoryLedger, InMemoryLedger> {
    let config = GovernanceConfig::with_quorum(U256::from(quorum));
    let treasury = config.treasury;
    let tokens = InMemoryLedger::with_balances(
        (1..=HOLDERS).map(|n| (Address::from_low_u64(n), U256::from(n * 10))),
    );
    let funds = InMemoryLedger::with_balances([(treasury, U256::from(50u64))]);
    Governance::new(config, tokens, funds).unwrap()
}

proptest! {
    #[test]
    fn prop_ids_are_dense_and_sequential(calls in prop::collection::vec(call(), 0..60)) {
        let mut gov = dao(40);
        let mut created = Vec::new();

        for c in calls {
            if let Call::Create { caller, amount } = c {
                if let Ok(id) = gov.create_proposal(
                    Address::from_low_u64(caller),
                    "p",
                    U256::from(amount),
                    Address::from_low_u64(0x99),
                ) {
                    created.push(id);
                }
            }
        }

        prop_assert_eq!(gov.proposal_count(), created.len() as u64);
        let expected: Vec<u64> = (1..=created.len() as u64).collect();
        prop_assert_eq!(created, expected);
    }

    #[test]
    fn prop_state_invariants_hold(calls in prop::collection::vec(call(), 0..80), quorum in 0..150u64) {
        let mut gov = dao(quorum);
        let initial_treasury = gov.treasury_balance();
        let mut totals: Vec<U256> = Vec::new();
        let mut paid = U256::ZERO;

        for c in calls {
            match c {
                Call::Create { caller, amount } => {
                    let _ = gov.create_proposal(
                        Address::from_low_u64(caller),
                        "p",
                        U256::from(amount),
                        Address::from_low_u64(0x99),
                    );
                }
                Call::Vote { caller, proposal, choice } => {
                    let choice = VoteType::try_from(choice).unwrap();
                    let voter = Address::from_low_u64(caller);
                    let before = gov.get_proposal_votes(proposal).ok();
                    let already = gov.has_voted(proposal, &voter).unwrap_or(false);
                    let result = gov.vote(voter, proposal, choice);
                    if already {
                        let err = result.as_ref().unwrap_err().kind();
                        prop_assert!(
                            err == ErrorKind::DuplicateVote || err == ErrorKind::AlreadyFinalized
                                || err == ErrorKind::InvalidArgument
                        );
                    }
                    if result.is_err() {
                        prop_assert_eq!(gov.get_proposal_votes(proposal).ok(), before);
                    }
                }
                Call::Finalize { caller, proposal } => {
                    let before = gov.get_proposal_votes(proposal).ok();
                    let amount = gov.proposal(proposal).map(|p| p.amount).ok();
                    match gov.finalize_proposal(Address::from_low_u64(caller), proposal) {
                        Ok(()) => {
                            let before = before.unwrap();
                            prop_assert!(!before.finalized);
                            let total = before.votes_for.checked_add(&before.votes_against).unwrap();
                            prop_assert!(total > U256::from(quorum));
                            prop_assert!(before.votes_for > before.votes_against);
                            paid = paid.checked_add(&amount.unwrap()).unwrap();
                        }
                        Err(e) => {
                            if e.kind() == ErrorKind::QuorumNotMet {
                                prop_assert!(!gov.get_proposal_votes(proposal).unwrap().finalized);
                            }
                            prop_assert_eq!(gov.get_proposal_votes(proposal).ok(), before);
                        }
                    }
                }
            }

            // Tallies never shrink
            for (i, p) in gov.proposals().iter().enumerate() {
                let total = p.total_votes().unwrap();
                if let Some(prev) = totals.get(i) {
                    prop_assert!(total >= *prev);
                    totals[i] = total;
                } else {
                    totals.push(total);
                }
            }

            prop_assert_eq!(
                gov.treasury_balance(),
                initial_treasury.checked_sub(&paid).unwrap()
            );
        }
    }
}
