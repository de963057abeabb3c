//! Classified money movements.
//!
//! A movement is the structured intent handed to the ledger engine by the
//! classification layer. Each kind has a distinct, non-overlapping
//! entry-generation rule, so the kinds are a tagged enum rather than a family
//! of boolean flags layered onto one shape.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tally_shared::types::{AccountId, Amount, CategoryId, UserId};

/// The kind of movement, with the resolved accounts it involves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum MovementKind {
    /// Money spent from a payment account, optionally with a portion owed
    /// by a third party ("shared amount", clamped to `[0, total]`).
    Expense {
        /// Account the money left.
        payment: AccountId,
        /// Portion owed by a friend, if any.
        shared_amount: Option<Amount>,
    },
    /// Money received into an account.
    Income {
        /// Account the money arrived in.
        into: AccountId,
    },
    /// Money moved between two of the user's accounts.
    Transfer {
        /// Source account.
        from: AccountId,
        /// Destination account.
        to: AccountId,
    },
    /// A third party repaying a tracked friend debt.
    FriendSettlement {
        /// Account the repayment arrived in.
        into: AccountId,
    },
    /// Money returned that reverses a prior expense (refund, cashback).
    RefundReversal {
        /// Account the refund arrived in.
        into: AccountId,
    },
}

/// A classified movement, ready for entry building.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Movement {
    /// The requesting user.
    pub user_id: UserId,
    /// Movement kind with resolved account references.
    #[serde(flatten)]
    pub kind: MovementKind,
    /// Total amount in minor units; strictly positive.
    pub amount: Amount,
    /// Movement date.
    pub date: NaiveDate,
    /// Free-text description.
    pub description: String,
    /// Optional category reference.
    pub category: Option<CategoryId>,
    /// Optional "was this necessary" flag.
    pub is_necessary: Option<bool>,
}
