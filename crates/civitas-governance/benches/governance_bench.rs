use civitas_governance::{Governance, GovernanceConfig, InMemoryLedger, VoteType};
use civitas_types::{Address, U256};
use criterion::{criterion_group, criterion_main, BatchSize, Criterion};

const VOTERS: u64 = 1_000;

fn dao() -> Governance<InMemoryLedger, InMemoryLedger> {
    let config = GovernanceConfig::with_quorum(U256::tokens(VOTERS / 2));
    let treasury = config.treasury;
    let tokens = InMemoryLedger::with_balances(
        (1..=VOTERS).map(|n| (Address::from_low_u64(n), U256::tokens(1))),
    );
    let funds = InMemoryLedger::with_balances([(treasury, U256::tokens(1_000_000))]);
    Governance::new(config, tokens, funds).expect("valid config")
}

fn bench_vote(c: &mut Criterion) {
    c.bench_function("vote_1000_holders", |bencher| {
        bencher.iter_batched(
            || {
                let mut gov = dao();
                let id = gov
                    .create_proposal(Address::from_low_u64(1), "bench", U256::tokens(1), Address::from_low_u64(0xbeef))
                    .expect("proposal");
                (gov, id)
            },
            |(mut gov, id)| {
                for n in 1..=VOTERS {
                    let _ = gov.vote(Address::from_low_u64(n), id, VoteType::For);
                }
                gov
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_finalize(c: &mut Criterion) {
    c.bench_function("finalize_after_full_vote", |bencher| {
        bencher.iter_batched(
            || {
                let mut gov = dao();
                let id = gov
                    .create_proposal(Address::from_low_u64(1), "bench", U256::tokens(1), Address::from_low_u64(0xbeef))
                    .expect("proposal");
                for n in 1..=VOTERS {
                    let _ = gov.vote(Address::from_low_u64(n), id, VoteType::For);
                }
                (gov, id)
            },
            |(mut gov, id)| gov.finalize_proposal(Address::from_low_u64(1), id),
            BatchSize::SmallInput,
        )
    });
}

criterion_group!(benches, bench_vote, bench_finalize);
criterion_main!(benches);
