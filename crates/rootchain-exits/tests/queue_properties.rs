//! Property-based tests for exit ordering.
//!
//! - The queue drains in non-decreasing `exitable_at`, ties by position
//! - The root chain pays matured exits in that same order, each once

use chrono::{Duration, TimeZone, Utc};
use proptest::prelude::*;
use rootchain_exits::{ExitQueue, InMemoryLedger, RootChain};
use rootchain_types::*;
use rust_decimal::Decimal;

// =============================================================================
// Queue ordering
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Property: draining yields exactly the inserted entries, sorted.
    #[test]
    fn prop_queue_drains_sorted(
        entries in prop::collection::vec((0i64..1_000, 1u64..50), 0..64),
    ) {
        let base = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        let mut expected: Vec<ExitPriority> = entries
            .iter()
            .enumerate()
            .map(|(i, (secs, blknum))| {
                // Index makes positions unique.
                let pos = UtxoPos::new(*blknum, i as u64, 0).unwrap();
                ExitPriority::new(base + Duration::seconds(*secs), pos)
            })
            .collect();

        let mut queue = ExitQueue::new();
        for p in &expected {
            queue.insert(*p);
        }
        prop_assert_eq!(queue.len(), expected.len());

        let mut drained = Vec::new();
        while let Ok(p) = queue.delete_min() {
            drained.push(p);
        }
        expected.sort();
        prop_assert_eq!(&drained, &expected);
        for pair in drained.windows(2) {
            prop_assert!(pair[0].exitable_at <= pair[1].exitable_at);
            if pair[0].exitable_at == pair[1].exitable_at {
                prop_assert!(pair[0].utxo_pos < pair[1].utxo_pos);
            }
        }
    }
}

// =============================================================================
// Engine payout ordering
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    /// Property: exits started at arbitrary times are paid in priority
    /// order, each exactly once, and only after maturity.
    #[test]
    fn prop_exits_paid_in_priority_order(
        delays in prop::collection::vec(0i64..12, 1..12),
    ) {
        let operator = TestAccount::from_seed(1);
        let depositor = TestAccount::from_seed(2);
        let mut chain = RootChain::new(RootChainConfig::new(operator.address)).unwrap();
        let bond = chain.config().exit_bond;
        let mut ledger = InMemoryLedger::new();
        let mut now = Utc.timestamp_opt(1_700_000_000, 0).unwrap();

        // One deposit per exit; amounts identify the deposit.
        let mut positions = Vec::new();
        for i in 0..delays.len() {
            let amount = Decimal::from(i as u64 + 1);
            let ctx = CallContext::new(depositor.address, now).with_value(amount);
            let blknum = chain.deposit(&ctx, "ETH", amount).unwrap();
            positions.push((UtxoPos::new(blknum, 0, 0).unwrap(), amount));
        }

        // Start exits in reverse order at increasing times.
        let mut expected = Vec::new();
        for ((pos, amount), delay) in positions.iter().rev().zip(&delays) {
            now += Duration::hours(*delay);
            let ctx = CallContext::new(depositor.address, now).with_value(bond);
            chain.start_deposit_exit(&ctx, *pos, "ETH", *amount).unwrap();
            expected.push((chain.get_exit(*pos).unwrap().priority(), *amount));
        }
        expected.sort_by_key(|(p, _)| *p);

        let caller = CallContext::new(operator.address, now);
        prop_assert_eq!(chain.process_exits(&caller, "ETH", &mut ledger).unwrap(), 0);

        let end = now + Duration::days(30);
        let caller = CallContext::new(operator.address, end);
        prop_assert_eq!(
            chain.process_exits(&caller, "ETH", &mut ledger).unwrap(),
            delays.len()
        );
        prop_assert_eq!(chain.process_exits(&caller, "ETH", &mut ledger).unwrap(), 0);

        let paid: Vec<Decimal> = ledger
            .payouts()
            .iter()
            .step_by(2)
            .map(|p| p.amount)
            .collect();
        let want: Vec<Decimal> = expected.iter().map(|(_, a)| *a).collect();
        prop_assert_eq!(paid, want);
        prop_assert_eq!(chain.custody_of("ETH"), Decimal::ZERO);
    }
}
