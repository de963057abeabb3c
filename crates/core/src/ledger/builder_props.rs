//! Property-based tests for the entry builder.
//!
//! The central guarantee: every successful build returns a non-empty entry
//! set whose debit sum equals its credit sum exactly, for every movement
//! kind and every valid amount.

use chrono::NaiveDate;
use proptest::prelude::*;
use tally_shared::types::{Amount, UserId};

use super::account::AccountRegistry;
use super::account::test_support::{account, full_registry};
use super::builder::build_entries;
use super::entry::{EntryDraft, EntrySide};
use super::movement::{Movement, MovementKind};

/// Strategy for a valid positive total (0.01 to 1,000,000.00).
fn total_strategy() -> impl Strategy<Value = i64> {
    1i64..100_000_000i64
}

/// Strategy for an arbitrary requested shared amount, including out-of-range
/// values that must be clamped.
fn shared_strategy() -> impl Strategy<Value = Option<i64>> {
    prop_oneof![
        Just(None),
        (-10_000_000i64..200_000_000i64).prop_map(Some),
    ]
}

fn movement(user_id: UserId, kind: MovementKind, amount: i64) -> Movement {
    Movement {
        user_id,
        kind,
        amount: Amount::from_minor(amount),
        date: NaiveDate::from_ymd_opt(2026, 8, 1).unwrap(),
        description: "prop movement".to_string(),
        category: None,
        is_necessary: None,
    }
}

fn debit_sum(entries: &[EntryDraft]) -> i64 {
    entries
        .iter()
        .filter(|e| e.side == EntrySide::Debit)
        .map(|e| e.amount.minor())
        .sum()
}

fn credit_sum(entries: &[EntryDraft]) -> i64 {
    entries
        .iter()
        .filter(|e| e.side == EntrySide::Credit)
        .map(|e| e.amount.minor())
        .sum()
}

/// Builds each movement kind against the registry for the given total.
fn kinds_for(registry: &AccountRegistry, shared: Option<i64>) -> Vec<MovementKind> {
    let payment = registry.default_payment().unwrap().id;
    let savings = registry
        .first_active_of_kind(super::account::AccountKind::Savings)
        .unwrap()
        .id;
    vec![
        MovementKind::Expense {
            payment,
            shared_amount: shared.map(Amount::from_minor),
        },
        MovementKind::Income { into: payment },
        MovementKind::Transfer {
            from: payment,
            to: savings,
        },
        MovementKind::FriendSettlement { into: payment },
        MovementKind::RefundReversal { into: payment },
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// For every movement kind and valid total, the output is non-empty and
    /// debits balance credits exactly.
    #[test]
    fn prop_every_build_balances(
        total in total_strategy(),
        shared in shared_strategy(),
    ) {
        let user = UserId::new();
        let registry = full_registry(user);

        for kind in kinds_for(&registry, shared) {
            let entries = build_entries(&movement(user, kind, total), &registry).unwrap();
            prop_assert!(!entries.is_empty());
            prop_assert_eq!(debit_sum(&entries), credit_sum(&entries));
            prop_assert!(entries.iter().all(|e| e.amount.is_positive()));
        }
    }

    /// The payment-account credit always carries the full total, regardless
    /// of how the debit side is split.
    #[test]
    fn prop_expense_credit_carries_total(
        total in total_strategy(),
        shared in shared_strategy(),
    ) {
        let user = UserId::new();
        let registry = full_registry(user);
        let payment = registry.default_payment().unwrap().id;

        let entries = build_entries(
            &movement(
                user,
                MovementKind::Expense {
                    payment,
                    shared_amount: shared.map(Amount::from_minor),
                },
                total,
            ),
            &registry,
        )
        .unwrap();

        let credits: Vec<_> = entries
            .iter()
            .filter(|e| e.side == EntrySide::Credit)
            .collect();
        prop_assert_eq!(credits.len(), 1);
        prop_assert_eq!(credits[0].account_id, payment);
        prop_assert_eq!(credits[0].amount.minor(), total);
    }

    /// The clamp property: no debit entry ever exceeds the total, and no
    /// negative personal share appears, whatever shared amount is requested.
    #[test]
    fn prop_shared_amount_clamped(
        total in total_strategy(),
        shared in -10_000_000i64..200_000_000i64,
    ) {
        let user = UserId::new();
        let registry = full_registry(user);
        let payment = registry.default_payment().unwrap().id;

        let entries = build_entries(
            &movement(
                user,
                MovementKind::Expense {
                    payment,
                    shared_amount: Some(Amount::from_minor(shared)),
                },
                total,
            ),
            &registry,
        )
        .unwrap();

        for entry in entries.iter().filter(|e| e.side == EntrySide::Debit) {
            prop_assert!(entry.amount.is_positive());
            prop_assert!(entry.amount.minor() <= total);
        }
    }

    /// The zero-debit guard holds without a friend-receivable account: the
    /// expense sink absorbs the whole total.
    #[test]
    fn prop_fold_back_without_receivable(
        total in total_strategy(),
        shared in 0i64..200_000_000i64,
    ) {
        let user = UserId::new();
        let registry = AccountRegistry::new(
            user,
            vec![
                account(user, "Main Checking", super::account::AccountKind::Checking, 0),
                account(user, "Expenses", super::account::AccountKind::ExpenseSink, 0),
            ],
        );
        let payment = registry.default_payment().unwrap().id;
        let sink = registry.expense_sink().unwrap().id;

        let entries = build_entries(
            &movement(
                user,
                MovementKind::Expense {
                    payment,
                    shared_amount: Some(Amount::from_minor(shared)),
                },
                total,
            ),
            &registry,
        )
        .unwrap();

        let debits: Vec<_> = entries
            .iter()
            .filter(|e| e.side == EntrySide::Debit)
            .collect();
        prop_assert_eq!(debits.len(), 1);
        prop_assert_eq!(debits[0].account_id, sink);
        prop_assert_eq!(debits[0].amount.minor(), total);
    }
}
