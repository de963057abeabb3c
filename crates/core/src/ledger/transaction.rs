//! Transaction header.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tally_shared::types::{Amount, CategoryId, IdempotencyKey, TransactionId, UserId};

/// A transaction header record; it owns a list of entries.
///
/// Immutable after commit except for the soft-delete toggle and limited
/// header edits (description, category, necessity) that never touch entries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique identifier.
    pub id: TransactionId,
    /// Owning user.
    pub user_id: UserId,
    /// Transaction date.
    pub date: NaiveDate,
    /// Free-text description.
    pub description: String,
    /// Total amount in minor units; strictly positive.
    pub amount: Amount,
    /// Optional category reference.
    pub category: Option<CategoryId>,
    /// Optional "was this necessary" flag.
    pub is_necessary: Option<bool>,
    /// Client-supplied idempotency key; unique per user when present.
    pub idempotency_key: Option<IdempotencyKey>,
    /// When the transaction was committed.
    pub created_at: DateTime<Utc>,
    /// Soft-delete timestamp. Deleted transactions stay in storage and are
    /// excluded from balance folds by filter, never physically removed.
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Transaction {
    /// Returns true if the transaction is soft-deleted.
    #[must_use]
    pub const fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header() -> Transaction {
        Transaction {
            id: TransactionId::new(),
            user_id: UserId::new(),
            date: NaiveDate::from_ymd_opt(2026, 8, 1).unwrap(),
            description: "coffee".to_string(),
            amount: Amount::from_minor(450),
            category: None,
            is_necessary: Some(false),
            idempotency_key: None,
            created_at: Utc::now(),
            deleted_at: None,
        }
    }

    #[test]
    fn test_soft_delete_flag() {
        let mut tx = header();
        assert!(!tx.is_deleted());
        tx.deleted_at = Some(Utc::now());
        assert!(tx.is_deleted());
    }
}
