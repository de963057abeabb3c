//! In-process store state.
//!
//! One write lock over the whole state is the atomic-commit primitive:
//! everything mutated under a single write-lock acquisition either all
//! becomes visible or (on early return) none of it does. The token index is
//! part of the same state, so `(user, key)` uniqueness is enforced at the
//! same level as the commit itself.

use std::collections::HashMap;

use tally_core::ledger::{Account, Entry, Transaction};
use tally_shared::types::{AccountId, IdempotencyKey, TransactionId, UserId};

/// All persisted rows.
#[derive(Debug, Default)]
pub(crate) struct StoreState {
    /// Accounts by id.
    pub accounts: HashMap<AccountId, Account>,
    /// Account ids per user, in creation order. Registry order ("first
    /// active checking") is defined by this.
    pub accounts_by_user: HashMap<UserId, Vec<AccountId>>,
    /// Transaction headers by id.
    pub transactions: HashMap<TransactionId, Transaction>,
    /// Transaction ids per user, in commit order.
    pub transactions_by_user: HashMap<UserId, Vec<TransactionId>>,
    /// Entries per transaction, in builder order.
    pub entries: HashMap<TransactionId, Vec<Entry>>,
    /// Unique index backing the idempotency guard.
    pub token_index: HashMap<(UserId, IdempotencyKey), TransactionId>,
}

impl StoreState {
    /// A user's accounts in creation order.
    pub fn user_accounts(&self, user_id: UserId) -> Vec<Account> {
        self.accounts_by_user
            .get(&user_id)
            .into_iter()
            .flatten()
            .filter_map(|id| self.accounts.get(id))
            .cloned()
            .collect()
    }

    /// Inserts an account and indexes it under its owner.
    pub fn insert_account(&mut self, account: Account) {
        self.accounts_by_user
            .entry(account.user_id)
            .or_default()
            .push(account.id);
        self.accounts.insert(account.id, account);
    }
}
