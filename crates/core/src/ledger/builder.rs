//! Entry builder: one balanced entry set per movement kind.
//!
//! Pure function, no I/O. Every successful build returns a non-empty entry
//! list whose debit sum equals its credit sum exactly.

use tally_shared::types::Amount;

use super::account::AccountRegistry;
use super::entry::EntryDraft;
use super::error::LedgerError;
use super::movement::{Movement, MovementKind};
use super::validation::validate_entries;

/// Builds the balanced entry set for a movement.
///
/// The registry must be the requesting user's. Account references are
/// checked to exist and be active; movement kinds that require an internal
/// or friend-receivable account fail with a resolution error when it is not
/// provisioned.
///
/// # Errors
///
/// - [`LedgerError::NonPositiveAmount`] for a zero or negative total.
/// - Resolution errors for missing or inactive accounts.
/// - [`LedgerError::TransferSameAccount`] for a self-loop transfer.
pub fn build_entries(
    movement: &Movement,
    registry: &AccountRegistry,
) -> Result<Vec<EntryDraft>, LedgerError> {
    let total = movement.amount;
    if !total.is_positive() {
        return Err(LedgerError::NonPositiveAmount);
    }

    let entries = match &movement.kind {
        MovementKind::Expense {
            payment,
            shared_amount,
        } => build_expense(registry, *payment, total, *shared_amount)?,
        MovementKind::Income { into } => {
            let into = registry.active_account(*into)?;
            let income_sink = registry.income_sink()?;
            vec![
                EntryDraft::debit(into.id, total),
                EntryDraft::credit(income_sink.id, total),
            ]
        }
        MovementKind::Transfer { from, to } => {
            if from == to {
                return Err(LedgerError::TransferSameAccount);
            }
            let from = registry.active_account(*from)?;
            let to = registry.active_account(*to)?;
            vec![
                EntryDraft::debit(to.id, total),
                EntryDraft::credit(from.id, total),
            ]
        }
        MovementKind::FriendSettlement { into } => {
            let into = registry.active_account(*into)?;
            // Repayment cannot be tracked without a ledger target.
            let receivable = registry.friend_receivable().ok_or(
                LedgerError::MissingAccount(super::account::AccountKind::FriendReceivable),
            )?;
            vec![
                EntryDraft::debit(into.id, total),
                EntryDraft::credit(receivable.id, total),
            ]
        }
        MovementKind::RefundReversal { into } => {
            let into = registry.active_account(*into)?;
            let expense_sink = registry.expense_sink()?;
            // Mirror image of an ordinary expense: credits the expense sink,
            // which is what lets refunds reduce net expense totals.
            vec![
                EntryDraft::debit(into.id, total),
                EntryDraft::credit(expense_sink.id, total),
            ]
        }
    };

    // Output guarantee, re-verified independently by the writer.
    validate_entries(&entries)?;
    Ok(entries)
}

/// Expense: split `total` into a personal share (debiting the expense sink)
/// and a friend share (debiting the friend-receivable account), always
/// crediting the payment account for the full total.
fn build_expense(
    registry: &AccountRegistry,
    payment: tally_shared::types::AccountId,
    total: Amount,
    shared_amount: Option<Amount>,
) -> Result<Vec<EntryDraft>, LedgerError> {
    let payment = registry.active_account(payment)?;
    let expense_sink = registry.expense_sink()?;

    let shared = shared_amount
        .unwrap_or(Amount::ZERO)
        .clamp(Amount::ZERO, total);

    let mut entries = Vec::with_capacity(3);
    match registry.friend_receivable() {
        Some(receivable) if shared.is_positive() => {
            let personal = total - shared;
            if personal.is_positive() {
                entries.push(EntryDraft::debit(expense_sink.id, personal));
            }
            entries.push(EntryDraft::debit(receivable.id, shared));
        }
        // Without a friend-receivable account the shared portion folds back
        // into the expense-sink debit: an expense must never produce zero
        // debit entries, or it would stay permanently unbalanced against its
        // one credit.
        _ => entries.push(EntryDraft::debit(expense_sink.id, total)),
    }
    entries.push(EntryDraft::credit(payment.id, total));

    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::account::test_support::{account, full_registry};
    use crate::ledger::account::{AccountKind, AccountRegistry};
    use crate::ledger::entry::EntrySide;
    use chrono::NaiveDate;
    use tally_shared::types::{AccountId, UserId};

    fn movement(user_id: UserId, kind: MovementKind, amount: i64) -> Movement {
        Movement {
            user_id,
            kind,
            amount: Amount::from_minor(amount),
            date: NaiveDate::from_ymd_opt(2026, 8, 1).unwrap(),
            description: "test movement".to_string(),
            category: None,
            is_necessary: None,
        }
    }

    fn registry_without_receivable(user: UserId) -> AccountRegistry {
        AccountRegistry::new(
            user,
            vec![
                account(user, "Main Checking", AccountKind::Checking, 0),
                account(user, "Income", AccountKind::IncomeSink, 0),
                account(user, "Expenses", AccountKind::ExpenseSink, 0),
            ],
        )
    }

    fn debits(entries: &[EntryDraft]) -> Vec<&EntryDraft> {
        entries
            .iter()
            .filter(|e| e.side == EntrySide::Debit)
            .collect()
    }

    #[test]
    fn test_plain_expense() {
        let user = UserId::new();
        let registry = full_registry(user);
        let payment = registry.default_payment().unwrap().id;
        let sink = registry.expense_sink().unwrap().id;

        let entries = build_entries(
            &movement(
                user,
                MovementKind::Expense {
                    payment,
                    shared_amount: None,
                },
                1000,
            ),
            &registry,
        )
        .unwrap();

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0], EntryDraft::debit(sink, Amount::from_minor(1000)));
        assert_eq!(
            entries[1],
            EntryDraft::credit(payment, Amount::from_minor(1000))
        );
    }

    #[test]
    fn test_expense_with_friend_share() {
        let user = UserId::new();
        let registry = full_registry(user);
        let payment = registry.default_payment().unwrap().id;
        let sink = registry.expense_sink().unwrap().id;
        let receivable = registry.friend_receivable().unwrap().id;

        let entries = build_entries(
            &movement(
                user,
                MovementKind::Expense {
                    payment,
                    shared_amount: Some(Amount::from_minor(400)),
                },
                1000,
            ),
            &registry,
        )
        .unwrap();

        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0], EntryDraft::debit(sink, Amount::from_minor(600)));
        assert_eq!(
            entries[1],
            EntryDraft::debit(receivable, Amount::from_minor(400))
        );
        assert_eq!(
            entries[2],
            EntryDraft::credit(payment, Amount::from_minor(1000))
        );
    }

    #[test]
    fn test_expense_shared_clamped_to_total() {
        // total = 1000, shared requested = 1500: shared clamps to 1000 and
        // personal collapses to 0 with a single debit path.
        let user = UserId::new();
        let registry = full_registry(user);
        let payment = registry.default_payment().unwrap().id;
        let receivable = registry.friend_receivable().unwrap().id;

        let entries = build_entries(
            &movement(
                user,
                MovementKind::Expense {
                    payment,
                    shared_amount: Some(Amount::from_minor(1500)),
                },
                1000,
            ),
            &registry,
        )
        .unwrap();

        let d = debits(&entries);
        assert_eq!(d.len(), 1);
        assert_eq!(d[0].account_id, receivable);
        assert_eq!(d[0].amount, Amount::from_minor(1000));
    }

    #[test]
    fn test_expense_negative_shared_treated_as_zero() {
        let user = UserId::new();
        let registry = full_registry(user);
        let payment = registry.default_payment().unwrap().id;
        let sink = registry.expense_sink().unwrap().id;

        let entries = build_entries(
            &movement(
                user,
                MovementKind::Expense {
                    payment,
                    shared_amount: Some(Amount::from_minor(-300)),
                },
                500,
            ),
            &registry,
        )
        .unwrap();

        let d = debits(&entries);
        assert_eq!(d.len(), 1);
        assert_eq!(d[0].account_id, sink);
        assert_eq!(d[0].amount, Amount::from_minor(500));
    }

    #[test]
    fn test_expense_zero_debit_guard() {
        // shared == total but no friend-receivable account exists: the full
        // amount must still debit the expense sink, never zero entries.
        let user = UserId::new();
        let registry = registry_without_receivable(user);
        let payment = registry.default_payment().unwrap().id;
        let sink = registry.expense_sink().unwrap().id;

        let entries = build_entries(
            &movement(
                user,
                MovementKind::Expense {
                    payment,
                    shared_amount: Some(Amount::from_minor(500)),
                },
                500,
            ),
            &registry,
        )
        .unwrap();

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0], EntryDraft::debit(sink, Amount::from_minor(500)));
    }

    #[test]
    fn test_expense_requires_expense_sink() {
        let user = UserId::new();
        let checking = account(user, "Main Checking", AccountKind::Checking, 0);
        let payment = checking.id;
        let registry = AccountRegistry::new(user, vec![checking]);

        let err = build_entries(
            &movement(
                user,
                MovementKind::Expense {
                    payment,
                    shared_amount: None,
                },
                100,
            ),
            &registry,
        )
        .unwrap_err();
        assert_eq!(err, LedgerError::MissingAccount(AccountKind::ExpenseSink));
    }

    #[test]
    fn test_income() {
        let user = UserId::new();
        let registry = full_registry(user);
        let into = registry.default_payment().unwrap().id;
        let income_sink = registry.income_sink().unwrap().id;

        let entries = build_entries(
            &movement(user, MovementKind::Income { into }, 250_000),
            &registry,
        )
        .unwrap();

        assert_eq!(
            entries,
            vec![
                EntryDraft::debit(into, Amount::from_minor(250_000)),
                EntryDraft::credit(income_sink, Amount::from_minor(250_000)),
            ]
        );
    }

    #[test]
    fn test_transfer() {
        let user = UserId::new();
        let registry = full_registry(user);
        let from = registry.default_payment().unwrap().id;
        let to = registry
            .first_active_of_kind(AccountKind::Savings)
            .unwrap()
            .id;

        let entries = build_entries(
            &movement(user, MovementKind::Transfer { from, to }, 5000),
            &registry,
        )
        .unwrap();

        assert_eq!(
            entries,
            vec![
                EntryDraft::debit(to, Amount::from_minor(5000)),
                EntryDraft::credit(from, Amount::from_minor(5000)),
            ]
        );
    }

    #[test]
    fn test_transfer_rejects_self_loop() {
        let user = UserId::new();
        let registry = full_registry(user);
        let from = registry.default_payment().unwrap().id;

        let err = build_entries(
            &movement(user, MovementKind::Transfer { from, to: from }, 100),
            &registry,
        )
        .unwrap_err();
        assert_eq!(err, LedgerError::TransferSameAccount);
    }

    #[test]
    fn test_transfer_requires_resolved_accounts() {
        let user = UserId::new();
        let registry = full_registry(user);
        let from = registry.default_payment().unwrap().id;
        let missing = AccountId::new();

        let err = build_entries(
            &movement(user, MovementKind::Transfer { from, to: missing }, 100),
            &registry,
        )
        .unwrap_err();
        assert_eq!(err, LedgerError::AccountNotFound(missing));
    }

    #[test]
    fn test_friend_settlement() {
        let user = UserId::new();
        let registry = full_registry(user);
        let into = registry.default_payment().unwrap().id;
        let receivable = registry.friend_receivable().unwrap().id;

        let entries = build_entries(
            &movement(user, MovementKind::FriendSettlement { into }, 400),
            &registry,
        )
        .unwrap();

        assert_eq!(
            entries,
            vec![
                EntryDraft::debit(into, Amount::from_minor(400)),
                EntryDraft::credit(receivable, Amount::from_minor(400)),
            ]
        );
    }

    #[test]
    fn test_friend_settlement_requires_receivable() {
        let user = UserId::new();
        let registry = registry_without_receivable(user);
        let into = registry.default_payment().unwrap().id;

        let err = build_entries(
            &movement(user, MovementKind::FriendSettlement { into }, 400),
            &registry,
        )
        .unwrap_err();
        assert_eq!(
            err,
            LedgerError::MissingAccount(AccountKind::FriendReceivable)
        );
    }

    #[test]
    fn test_refund_reversal_mirrors_expense() {
        let user = UserId::new();
        let registry = full_registry(user);
        let into = registry.default_payment().unwrap().id;
        let sink = registry.expense_sink().unwrap().id;

        let entries = build_entries(
            &movement(user, MovementKind::RefundReversal { into }, 10000),
            &registry,
        )
        .unwrap();

        assert_eq!(
            entries,
            vec![
                EntryDraft::debit(into, Amount::from_minor(10000)),
                EntryDraft::credit(sink, Amount::from_minor(10000)),
            ]
        );
    }

    #[test]
    fn test_non_positive_total_rejected() {
        let user = UserId::new();
        let registry = full_registry(user);
        let payment = registry.default_payment().unwrap().id;

        for amount in [0, -100] {
            let err = build_entries(
                &movement(
                    user,
                    MovementKind::Expense {
                        payment,
                        shared_amount: None,
                    },
                    amount,
                ),
                &registry,
            )
            .unwrap_err();
            assert_eq!(err, LedgerError::NonPositiveAmount);
        }
    }

    #[test]
    fn test_inactive_payment_account_rejected() {
        let user = UserId::new();
        let mut closed = account(user, "Closed Checking", AccountKind::Checking, 0);
        closed.is_active = false;
        let payment = closed.id;
        let registry = AccountRegistry::new(
            user,
            vec![closed, account(user, "Expenses", AccountKind::ExpenseSink, 0)],
        );

        let err = build_entries(
            &movement(
                user,
                MovementKind::Expense {
                    payment,
                    shared_amount: None,
                },
                100,
            ),
            &registry,
        )
        .unwrap_err();
        assert_eq!(err, LedgerError::AccountInactive(payment));
    }
}
