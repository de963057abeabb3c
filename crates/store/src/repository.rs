//! Ledger repository: atomic commits, idempotency, queries.
//!
//! The repository owns the store state and is the only writer. A commit is
//! one write-lock acquisition: the header and all entries persist together
//! or not at all, and `(user, idempotency key)` uniqueness is checked inside
//! the same unit as the ultimate race-safety backstop. The initial read-lock
//! lookup is purely a fast-path optimization.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use tokio::sync::RwLock;
use tracing::{error, info};

use tally_core::ledger::{
    Account, AccountBalance, AccountKind, AccountRegistry, Direction, Entry, EntryDraft,
    LedgerError, Transaction, derive_direction, validate_entries,
};
use tally_shared::types::{AccountId, Amount, CategoryId, IdempotencyKey, TransactionId, UserId};

use crate::error::StoreError;
use crate::state::StoreState;

/// Input for committing a transaction.
#[derive(Debug, Clone)]
pub struct CreateTransactionInput {
    /// The requesting user.
    pub user_id: UserId,
    /// Transaction date.
    pub date: NaiveDate,
    /// Free-text description.
    pub description: String,
    /// Total amount; strictly positive.
    pub amount: Amount,
    /// Optional category reference.
    pub category: Option<CategoryId>,
    /// Optional "was this necessary" flag.
    pub is_necessary: Option<bool>,
    /// Optional client-supplied idempotency key.
    pub idempotency_key: Option<IdempotencyKey>,
    /// Balanced entry drafts from the entry builder.
    pub entries: Vec<EntryDraft>,
}

/// Result of a create call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CreateOutcome {
    /// The committed (or previously committed) transaction.
    pub transaction_id: TransactionId,
    /// True when an idempotency key matched a prior transaction and nothing
    /// new was written. A successful no-op, not an error.
    pub was_already_created: bool,
}

/// Header fields that may be edited after commit. Entries are never touched.
#[derive(Debug, Clone, Default)]
pub struct UpdateTransactionInput {
    /// New description, if changing.
    pub description: Option<String>,
    /// New category: `Some(Some(_))` sets, `Some(None)` clears, `None`
    /// leaves as-is.
    pub category: Option<Option<CategoryId>>,
    /// New necessity flag, if changing.
    pub is_necessary: Option<bool>,
}

/// Filter options for listing transactions.
#[derive(Debug, Clone, Default)]
pub struct TransactionFilter {
    /// Inclusive date range start.
    pub date_from: Option<NaiveDate>,
    /// Inclusive date range end.
    pub date_to: Option<NaiveDate>,
    /// Filter by category.
    pub category: Option<CategoryId>,
    /// Filter by derived direction.
    pub direction: Option<Direction>,
    /// Include soft-deleted transactions.
    pub include_deleted: bool,
}

/// A transaction with its entries and derived direction.
#[derive(Debug, Clone)]
pub struct TransactionRecord {
    /// Transaction header.
    pub transaction: Transaction,
    /// Ledger entries, in commit order.
    pub entries: Vec<Entry>,
    /// Derived economic direction; computed, never stored.
    pub direction: Direction,
}

/// Ledger repository over the in-process store.
#[derive(Debug, Clone, Default)]
pub struct LedgerRepository {
    state: Arc<RwLock<StoreState>>,
}

impl LedgerRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // ========================================================================
    // Accounts
    // ========================================================================

    /// Creates an account for a user.
    pub async fn create_account(
        &self,
        user_id: UserId,
        name: impl Into<String>,
        kind: AccountKind,
        starting_balance: Amount,
    ) -> Account {
        let account = Account {
            id: AccountId::new(),
            user_id,
            name: name.into(),
            kind,
            starting_balance,
            is_active: true,
            created_at: Utc::now(),
        };
        let mut state = self.state.write().await;
        state.insert_account(account.clone());
        account
    }

    /// Provisions the default account set for a new user: a checking account
    /// plus the two internal sinks every movement needs as a counterparty.
    pub async fn bootstrap_user(&self, user_id: UserId) -> Vec<Account> {
        let defaults = [
            ("Main Checking", AccountKind::Checking),
            ("Income", AccountKind::IncomeSink),
            ("Expenses", AccountKind::ExpenseSink),
        ];
        let mut created = Vec::with_capacity(defaults.len());
        for (name, kind) in defaults {
            created.push(
                self.create_account(user_id, name, kind, Amount::ZERO)
                    .await,
            );
        }
        info!(user_id = %user_id, "Bootstrapped default accounts");
        created
    }

    /// Lists a user's accounts in creation order.
    pub async fn list_accounts(&self, user_id: UserId) -> Vec<Account> {
        self.state.read().await.user_accounts(user_id)
    }

    /// Marks an account inactive. Its entries and balance history remain.
    pub async fn deactivate_account(
        &self,
        user_id: UserId,
        account_id: AccountId,
    ) -> Result<(), StoreError> {
        let mut state = self.state.write().await;
        let account = state
            .accounts
            .get_mut(&account_id)
            .filter(|a| a.user_id == user_id)
            .ok_or(StoreError::AccountNotFound(account_id))?;
        account.is_active = false;
        Ok(())
    }

    /// Snapshot of a user's account registry.
    pub async fn registry(&self, user_id: UserId) -> AccountRegistry {
        let accounts = self.state.read().await.user_accounts(user_id);
        AccountRegistry::new(user_id, accounts)
    }

    // ========================================================================
    // Ledger writer + idempotency guard
    // ========================================================================

    /// Looks up a prior transaction for `(user, key)`.
    ///
    /// A caller that lost a concurrent race (or gave up waiting and retried)
    /// re-queries here and treats a found match as success.
    pub async fn find_by_idempotency_key(
        &self,
        user_id: UserId,
        key: &IdempotencyKey,
    ) -> Option<TransactionId> {
        self.state
            .read()
            .await
            .token_index
            .get(&(user_id, key.clone()))
            .copied()
    }

    /// Commits a transaction header plus its entries as one atomic unit.
    ///
    /// Preconditions re-verified inside the unit, independently of the entry
    /// builder: positive total, positive entry amounts, every account owned
    /// by the requesting user, and debit sum == credit sum. Entries are
    /// inserted one at a time, so the balance check is deferred to the end
    /// of the unit; intermediate states are legitimately unbalanced.
    ///
    /// With an idempotency key, a retried or racing request returns the
    /// original transaction id with `was_already_created = true`.
    pub async fn create_transaction(
        &self,
        input: CreateTransactionInput,
    ) -> Result<CreateOutcome, StoreError> {
        // Fast path, outside the write lock.
        if let Some(key) = &input.idempotency_key {
            if let Some(existing) = self.find_by_idempotency_key(input.user_id, key).await {
                return Ok(CreateOutcome {
                    transaction_id: existing,
                    was_already_created: true,
                });
            }
        }

        let mut state = self.state.write().await;

        // Uniqueness backstop at the same level as the atomic unit: the
        // loser of a concurrent race lands here and observes the winner.
        if let Some(key) = &input.idempotency_key {
            if let Some(&existing) = state.token_index.get(&(input.user_id, key.clone())) {
                return Ok(CreateOutcome {
                    transaction_id: existing,
                    was_already_created: true,
                });
            }
        }

        if !input.amount.is_positive() {
            return Err(LedgerError::NonPositiveAmount.into());
        }
        for draft in &input.entries {
            let account = state
                .accounts
                .get(&draft.account_id)
                .ok_or(StoreError::AccountNotFound(draft.account_id))?;
            if account.user_id != input.user_id {
                return Err(StoreError::ForeignAccount(draft.account_id));
            }
        }

        let transaction_id = TransactionId::new();
        let header = Transaction {
            id: transaction_id,
            user_id: input.user_id,
            date: input.date,
            description: input.description.clone(),
            amount: input.amount,
            category: input.category,
            is_necessary: input.is_necessary,
            idempotency_key: input.idempotency_key.clone(),
            created_at: Utc::now(),
            deleted_at: None,
        };

        state.transactions.insert(transaction_id, header);
        state
            .transactions_by_user
            .entry(input.user_id)
            .or_default()
            .push(transaction_id);
        let rows = state.entries.entry(transaction_id).or_default();
        for draft in &input.entries {
            rows.push(Entry::from_draft(transaction_id, draft));
        }

        // Deferred balance check, end of the atomic unit.
        if let Err(e) = validate_entries(&input.entries) {
            state.entries.remove(&transaction_id);
            state.transactions.remove(&transaction_id);
            if let Some(ids) = state.transactions_by_user.get_mut(&input.user_id) {
                ids.retain(|id| *id != transaction_id);
            }
            error!(
                error = %e,
                user_id = %input.user_id,
                "Rolled back commit: entry set failed re-verification"
            );
            return Err(e.into());
        }

        if let Some(key) = input.idempotency_key {
            state.token_index.insert((input.user_id, key), transaction_id);
        }

        info!(
            transaction_id = %transaction_id,
            user_id = %input.user_id,
            amount = %input.amount,
            "Committed transaction"
        );
        Ok(CreateOutcome {
            transaction_id,
            was_already_created: false,
        })
    }

    // ========================================================================
    // Read path
    // ========================================================================

    /// Fetches one transaction with entries and derived direction.
    pub async fn get_transaction(
        &self,
        user_id: UserId,
        id: TransactionId,
    ) -> Result<TransactionRecord, StoreError> {
        let state = self.state.read().await;
        let transaction = state
            .transactions
            .get(&id)
            .filter(|t| t.user_id == user_id)
            .cloned()
            .ok_or(StoreError::TransactionNotFound(id))?;
        let entries = state.entries.get(&id).cloned().unwrap_or_default();
        let (expense_sink, income_sink) = Self::sinks(&state, user_id)?;
        let direction = derive_direction(&entries, expense_sink, income_sink);
        Ok(TransactionRecord {
            transaction,
            entries,
            direction,
        })
    }

    /// Lists a user's transactions, newest first, with derived direction.
    pub async fn list_transactions(
        &self,
        user_id: UserId,
        filter: &TransactionFilter,
    ) -> Result<Vec<TransactionRecord>, StoreError> {
        let state = self.state.read().await;
        let ids = match state.transactions_by_user.get(&user_id) {
            Some(ids) if !ids.is_empty() => ids,
            // A user with no transactions may not have sinks yet; deriving
            // direction for zero rows needs none.
            _ => return Ok(Vec::new()),
        };
        let (expense_sink, income_sink) = Self::sinks(&state, user_id)?;

        let mut records: Vec<TransactionRecord> = ids
            .iter()
            .filter_map(|id| state.transactions.get(id))
            .filter(|t| filter.include_deleted || !t.is_deleted())
            .filter(|t| filter.date_from.is_none_or(|from| t.date >= from))
            .filter(|t| filter.date_to.is_none_or(|to| t.date <= to))
            .filter(|t| filter.category.is_none_or(|c| t.category == Some(c)))
            .map(|t| {
                let entries = state.entries.get(&t.id).cloned().unwrap_or_default();
                let direction = derive_direction(&entries, expense_sink, income_sink);
                TransactionRecord {
                    transaction: t.clone(),
                    entries,
                    direction,
                }
            })
            .filter(|r| filter.direction.is_none_or(|d| r.direction == d))
            .collect();

        records.sort_by(|a, b| {
            b.transaction
                .date
                .cmp(&a.transaction.date)
                .then(b.transaction.created_at.cmp(&a.transaction.created_at))
        });
        Ok(records)
    }

    /// Current balance per account: the starting balance plus the fold over
    /// all entries of non-deleted transactions, with running debit/credit
    /// totals.
    pub async fn account_balances(&self, user_id: UserId) -> HashMap<AccountId, AccountBalance> {
        let state = self.state.read().await;

        let mut balances: HashMap<AccountId, AccountBalance> = state
            .user_accounts(user_id)
            .iter()
            .map(|a| (a.id, AccountBalance::new(a.id, a.starting_balance)))
            .collect();

        for id in state.transactions_by_user.get(&user_id).into_iter().flatten() {
            let deleted = state.transactions.get(id).is_none_or(Transaction::is_deleted);
            if deleted {
                continue;
            }
            for entry in state.entries.get(id).into_iter().flatten() {
                if let Some(balance) = balances.get_mut(&entry.account_id) {
                    balance.apply(entry);
                }
            }
        }

        balances
    }

    // ========================================================================
    // Header lifecycle
    // ========================================================================

    /// Edits header fields. Entries are what balances hold over and are
    /// never touched here.
    pub async fn update_transaction(
        &self,
        user_id: UserId,
        id: TransactionId,
        update: UpdateTransactionInput,
    ) -> Result<(), StoreError> {
        let mut state = self.state.write().await;
        let transaction = state
            .transactions
            .get_mut(&id)
            .filter(|t| t.user_id == user_id)
            .ok_or(StoreError::TransactionNotFound(id))?;
        if let Some(description) = update.description {
            transaction.description = description;
        }
        if let Some(category) = update.category {
            transaction.category = category;
        }
        if let Some(is_necessary) = update.is_necessary {
            transaction.is_necessary = Some(is_necessary);
        }
        Ok(())
    }

    /// Soft-deletes a transaction: entries remain but are excluded from
    /// balance folds. Idempotent.
    pub async fn delete_transaction(
        &self,
        user_id: UserId,
        id: TransactionId,
    ) -> Result<(), StoreError> {
        let mut state = self.state.write().await;
        let transaction = state
            .transactions
            .get_mut(&id)
            .filter(|t| t.user_id == user_id)
            .ok_or(StoreError::TransactionNotFound(id))?;
        if transaction.deleted_at.is_none() {
            transaction.deleted_at = Some(Utc::now());
        }
        Ok(())
    }

    /// Clears the soft-delete timestamp. Idempotent.
    pub async fn restore_transaction(
        &self,
        user_id: UserId,
        id: TransactionId,
    ) -> Result<(), StoreError> {
        let mut state = self.state.write().await;
        let transaction = state
            .transactions
            .get_mut(&id)
            .filter(|t| t.user_id == user_id)
            .ok_or(StoreError::TransactionNotFound(id))?;
        transaction.deleted_at = None;
        Ok(())
    }

    fn sinks(state: &StoreState, user_id: UserId) -> Result<(AccountId, AccountId), StoreError> {
        let registry = AccountRegistry::new(user_id, state.user_accounts(user_id));
        let expense_sink = registry.expense_sink()?.id;
        let income_sink = registry.income_sink()?.id;
        Ok((expense_sink, income_sink))
    }
}
