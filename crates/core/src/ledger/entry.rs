//! Ledger entry domain types.

use serde::{Deserialize, Serialize};
use tally_shared::types::{AccountId, Amount, EntryId, TransactionId};

/// Polarity of a ledger entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntrySide {
    /// Debit entry.
    Debit,
    /// Credit entry.
    Credit,
}

impl EntrySide {
    /// The opposite polarity.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Debit => Self::Credit,
            Self::Credit => Self::Debit,
        }
    }
}

/// A not-yet-persisted entry produced by the entry builder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryDraft {
    /// The account affected by this entry.
    pub account_id: AccountId,
    /// Whether this is a debit or credit.
    pub side: EntrySide,
    /// Amount in minor units; strictly positive.
    pub amount: Amount,
}

impl EntryDraft {
    /// A debit draft.
    #[must_use]
    pub const fn debit(account_id: AccountId, amount: Amount) -> Self {
        Self {
            account_id,
            side: EntrySide::Debit,
            amount,
        }
    }

    /// A credit draft.
    #[must_use]
    pub const fn credit(account_id: AccountId, amount: Amount) -> Self {
        Self {
            account_id,
            side: EntrySide::Credit,
            amount,
        }
    }

    /// Returns the signed amount (positive for debit, negative for credit).
    #[must_use]
    pub fn signed_amount(&self) -> Amount {
        match self.side {
            EntrySide::Debit => self.amount,
            EntrySide::Credit => Amount::ZERO - self.amount,
        }
    }
}

/// A persisted ledger entry: one half of a balanced bookkeeping line.
///
/// Entries are created together with their transaction, atomically, and are
/// never created, updated, or deleted independently of it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entry {
    /// Unique identifier for this entry.
    pub id: EntryId,
    /// The transaction this entry belongs to.
    pub transaction_id: TransactionId,
    /// The account affected by this entry.
    pub account_id: AccountId,
    /// Whether this is a debit or credit.
    pub side: EntrySide,
    /// Amount in minor units; strictly positive.
    pub amount: Amount,
}

impl Entry {
    /// Materializes a draft into a persisted entry for a transaction.
    #[must_use]
    pub fn from_draft(transaction_id: TransactionId, draft: &EntryDraft) -> Self {
        Self {
            id: EntryId::new(),
            transaction_id,
            account_id: draft.account_id,
            side: draft.side,
            amount: draft.amount,
        }
    }

    /// Returns the signed amount (positive for debit, negative for credit).
    #[must_use]
    pub fn signed_amount(&self) -> Amount {
        match self.side {
            EntrySide::Debit => self.amount,
            EntrySide::Credit => Amount::ZERO - self.amount,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signed_amounts() {
        let account = AccountId::new();
        let debit = EntryDraft::debit(account, Amount::from_minor(1000));
        let credit = EntryDraft::credit(account, Amount::from_minor(1000));
        assert_eq!(debit.signed_amount(), Amount::from_minor(1000));
        assert_eq!(credit.signed_amount(), Amount::from_minor(-1000));
    }

    #[test]
    fn test_opposite_side() {
        assert_eq!(EntrySide::Debit.opposite(), EntrySide::Credit);
        assert_eq!(EntrySide::Credit.opposite(), EntrySide::Debit);
    }

    #[test]
    fn test_from_draft_preserves_fields() {
        let draft = EntryDraft::credit(AccountId::new(), Amount::from_minor(250));
        let transaction_id = TransactionId::new();
        let entry = Entry::from_draft(transaction_id, &draft);
        assert_eq!(entry.transaction_id, transaction_id);
        assert_eq!(entry.account_id, draft.account_id);
        assert_eq!(entry.side, EntrySide::Credit);
        assert_eq!(entry.amount, Amount::from_minor(250));
    }
}
