//! Demo data for local development.

use chrono::NaiveDate;
use tracing::info;

use tally_core::ledger::{AccountKind, Movement, MovementKind, build_entries};
use tally_shared::types::{Amount, IdempotencyKey, UserId};

use crate::error::StoreError;
use crate::repository::{CreateTransactionInput, LedgerRepository};

/// Seeds a fresh demo user with a full account set and a month of movements.
///
/// Every movement carries a fixed idempotency key, so a retried seed for the
/// same user no-ops instead of duplicating the ledger.
pub async fn seed_demo(repo: &LedgerRepository) -> Result<UserId, StoreError> {
    let user = UserId::new();
    repo.bootstrap_user(user).await;
    repo.create_account(user, "Savings", AccountKind::Savings, Amount::from_minor(500_000))
        .await;
    repo.create_account(
        user,
        "Credit Card",
        AccountKind::CreditLiability,
        Amount::from_minor(-50_000),
    )
    .await;
    repo.create_account(user, "Friend IOUs", AccountKind::FriendReceivable, Amount::ZERO)
        .await;

    let registry = repo.registry(user).await;
    let checking = registry.default_payment().map(|a| a.id);
    let Some(checking) = checking else {
        // Bootstrap just created a checking account; reaching here means the
        // store lost it, which the caller should hear about loudly.
        return Err(StoreError::Ledger(
            tally_core::ledger::LedgerError::MissingAccount(AccountKind::Checking),
        ));
    };
    let savings = registry
        .first_active_of_kind(AccountKind::Savings)
        .map(|a| a.id);
    let credit = registry
        .first_active_of_kind(AccountKind::CreditLiability)
        .map(|a| a.id);

    let mut movements: Vec<(&str, Movement)> = vec![
        (
            "seed-salary",
            movement(
                user,
                MovementKind::Income { into: checking },
                250_000,
                date(1),
                "Monthly salary",
                None,
            ),
        ),
        (
            "seed-groceries",
            movement(
                user,
                MovementKind::Expense {
                    payment: checking,
                    shared_amount: None,
                },
                8_450,
                date(3),
                "Groceries",
                Some(true),
            ),
        ),
        (
            "seed-dinner",
            movement(
                user,
                MovementKind::Expense {
                    payment: checking,
                    shared_amount: Some(Amount::from_minor(3_000)),
                },
                6_000,
                date(7),
                "Dinner, split with Sam",
                Some(false),
            ),
        ),
        (
            "seed-settle",
            movement(
                user,
                MovementKind::FriendSettlement { into: checking },
                3_000,
                date(12),
                "Sam paid back dinner",
                None,
            ),
        ),
        (
            "seed-refund",
            movement(
                user,
                MovementKind::RefundReversal { into: checking },
                2_199,
                date(15),
                "Returned headphones",
                None,
            ),
        ),
    ];
    if let Some(savings) = savings {
        movements.push((
            "seed-save",
            movement(
                user,
                MovementKind::Transfer {
                    from: checking,
                    to: savings,
                },
                50_000,
                date(5),
                "Monthly savings",
                None,
            ),
        ));
    }
    if let Some(credit) = credit {
        movements.push((
            "seed-cc",
            movement(
                user,
                MovementKind::Expense {
                    payment: credit,
                    shared_amount: None,
                },
                12_999,
                date(9),
                "Online order",
                Some(false),
            ),
        ));
    }

    for (key, m) in movements {
        let entries = build_entries(&m, &registry)?;
        repo.create_transaction(CreateTransactionInput {
            user_id: m.user_id,
            date: m.date,
            description: m.description,
            amount: m.amount,
            category: m.category,
            is_necessary: m.is_necessary,
            idempotency_key: IdempotencyKey::new(key).ok(),
            entries,
        })
        .await?;
    }

    info!(user_id = %user, "Seeded demo data");
    Ok(user)
}

fn movement(
    user_id: UserId,
    kind: MovementKind,
    amount: i64,
    date: NaiveDate,
    description: &str,
    is_necessary: Option<bool>,
) -> Movement {
    Movement {
        user_id,
        kind,
        amount: Amount::from_minor(amount),
        date,
        description: description.to_string(),
        category: None,
        is_necessary,
    }
}

fn date(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 8, day).unwrap_or_default()
}
