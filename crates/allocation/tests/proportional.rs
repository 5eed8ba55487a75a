//! End-to-end and property tests for the proportional allocation pipeline.

use num_bigint::{BigInt, BigUint};
use num_rational::BigRational;
use num_traits::{Signed, Zero};
use poolaudit_allocation::{
    allocate_block, group_events, proportional_shares, run_audit, AuditParams, ContributionLedger,
    MemoryBalanceSource, MemoryEventSource,
};
use poolaudit_types::{
    Address, BlockGroup, BlockNumber, Contribution, IssuanceEvent, TokenAmount, ADDRESS_BYTES,
};
use proptest::prelude::*;

fn addr(byte: u8) -> Address {
    Address([byte; ADDRESS_BYTES])
}

const POOL: u8 = 0xEE;

fn setup(
    events: &[(u8, u64, BlockNumber)],
    balances: &[(BlockNumber, u64)],
) -> (MemoryEventSource, MemoryBalanceSource) {
    let mut event_source = MemoryEventSource::default();
    for (participant, amount, block_number) in events {
        event_source.push(addr(*participant), TokenAmount::from(*amount), *block_number);
    }

    let mut balance_source = MemoryBalanceSource::new();
    for (block_number, balance) in balances {
        balance_source.set_balance(addr(POOL), *block_number, BigUint::from(*balance));
    }

    (event_source, balance_source)
}

fn params(from_block: BlockNumber, to_block: BlockNumber) -> AuditParams {
    AuditParams {
        pool: addr(POOL),
        from_block,
        to_block,
    }
}

#[test]
fn two_participants_split_one_block() {
    let (events, balances) = setup(&[(1, 60, 5), (2, 40, 5)], &[(5, 500)]);

    let report = run_audit(&events, &balances, &params(1, 10)).unwrap();

    assert_eq!(report.contributions[&addr(1).to_string()], "300");
    assert_eq!(report.contributions[&addr(2).to_string()], "200");
    assert_eq!(report.grand_total, "500");
}

#[test]
fn mixed_blocks_and_a_shrinking_pool() {
    // Block 3 grows the pool by 100, block 7 shrinks it by 30, block 9 grows
    // it by 230. The shrinking block's issuances contribute nothing.
    let (events, balances) = setup(
        &[(1, 10, 3), (2, 5, 7), (1, 30, 9), (2, 70, 9)],
        &[(3, 100), (7, 70), (9, 300)],
    );

    let report = run_audit(&events, &balances, &params(1, 10)).unwrap();

    assert_eq!(report.contributions[&addr(1).to_string()], "169"); // 100 + 230*30/100
    assert_eq!(report.contributions[&addr(2).to_string()], "161"); // 230*70/100
    assert_eq!(report.grand_total, "330");
    assert_eq!(report.pool_balance, "300");
}

#[test]
fn snapshot_values_are_strictly_positive() {
    let (events, balances) = setup(
        &[(1, 10, 3), (2, 5, 7), (3, 1, 8)],
        &[(3, 100), (7, 70), (8, 70)],
    );

    let report = run_audit(&events, &balances, &params(1, 10)).unwrap();

    // Block 7 (negative delta) and block 8 (zero delta) leave no entries.
    assert_eq!(report.contributions.len(), 1);
    for value in report.contributions.values() {
        assert!(!value.starts_with('-'));
        assert_ne!(value, "0");
    }
}

#[test]
fn identical_inputs_produce_byte_identical_reports() {
    let (events, balances) = setup(
        &[(1, 7, 3), (2, 11, 3), (3, 13, 6)],
        &[(3, 1_000), (6, 1_100)],
    );

    let first = run_audit(&events, &balances, &params(1, 10)).unwrap();
    let second = run_audit(&events, &balances, &params(1, 10)).unwrap();

    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

fn arb_events() -> impl Strategy<Value = Vec<(u8, u64, BlockNumber)>> {
    prop::collection::vec((1u8..=8, 1u64..=1_000, 1u64..=12), 1..24)
}

fn arb_balances() -> impl Strategy<Value = Vec<u64>> {
    // Balance of the pool at the end of blocks 0..=12; deltas between
    // consecutive entries may be negative.
    prop::collection::vec(0u64..=1_000_000, 13)
}

fn balance_fixture(balances: &[u64]) -> MemoryBalanceSource {
    let mut source = MemoryBalanceSource::new();
    for (block_number, balance) in balances.iter().enumerate() {
        source.set_balance(addr(POOL), block_number as BlockNumber, BigUint::from(*balance));
    }
    source
}

proptest! {
    /// Pre-filter shares are a lossless partition of the block delta.
    #[test]
    fn shares_conserve_the_delta(
        issuances in prop::collection::vec((1u8..=8, 1u64..=1_000), 1..10),
        delta in -1_000_000i64..=1_000_000,
    ) {
        let mut group = BlockGroup::new(1);
        for (participant, amount) in &issuances {
            group.add_issuance(addr(*participant), TokenAmount::from(*amount));
        }

        let pool_delta = BigInt::from(delta);
        let token_total = BigInt::from(group.token_total());
        let shares = proportional_shares(&group, &pool_delta, &token_total);

        let sum: Contribution = shares.values().sum();
        prop_assert_eq!(sum, BigRational::from_integer(pool_delta));
    }

    /// Folding blocks into the ledger in any order yields the same totals.
    #[test]
    fn block_order_does_not_change_final_totals(
        events in arb_events(),
        balances in arb_balances(),
    ) {
        let typed: Vec<IssuanceEvent> = events
            .iter()
            .map(|(participant, amount, block_number)| IssuanceEvent {
                participant: addr(*participant),
                amount: TokenAmount::from(*amount),
                block_number: *block_number,
            })
            .collect();

        let groups = group_events(typed);
        let balance_source = balance_fixture(&balances);

        let mut ascending = ContributionLedger::new();
        for group in groups.values() {
            let allocation = allocate_block(group, &addr(POOL), &balance_source).unwrap();
            for (participant, share) in allocation.allocations {
                ascending.record(participant, share);
            }
        }

        let mut descending = ContributionLedger::new();
        for group in groups.values().rev() {
            let allocation = allocate_block(group, &addr(POOL), &balance_source).unwrap();
            for (participant, share) in allocation.allocations {
                descending.record(participant, share);
            }
        }

        prop_assert_eq!(ascending.snapshot(), descending.snapshot());
    }

    /// Everything the pipeline ever records is strictly positive.
    #[test]
    fn ledger_totals_are_strictly_positive(
        events in arb_events(),
        balances in arb_balances(),
    ) {
        let typed: Vec<IssuanceEvent> = events
            .iter()
            .map(|(participant, amount, block_number)| IssuanceEvent {
                participant: addr(*participant),
                amount: TokenAmount::from(*amount),
                block_number: *block_number,
            })
            .collect();

        let groups = group_events(typed);
        let balance_source = balance_fixture(&balances);

        let mut ledger = ContributionLedger::new();
        for group in groups.values() {
            let allocation = allocate_block(group, &addr(POOL), &balance_source).unwrap();
            for (participant, share) in allocation.allocations {
                prop_assert!(share.is_positive());
                ledger.record(participant, share);
            }
        }

        let (totals, grand_total) = ledger.snapshot();
        for total in totals.values() {
            prop_assert!(total.is_positive());
        }
        prop_assert!(grand_total.is_positive() || grand_total.is_zero());
    }
}
