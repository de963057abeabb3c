//! Accounts and the account registry.
//!
//! Every user owns a set of accounts. Two of them are *internal* sinks
//! (income-sink and expense-sink): non-user-facing counterparties that exist
//! purely so every real-world movement has a matching entry, preserving the
//! double-entry invariant.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tally_shared::types::{AccountId, Amount, UserId};

use super::error::LedgerError;

/// Account kind. Immutable after creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountKind {
    /// Everyday checking account.
    Checking,
    /// Savings account.
    Savings,
    /// Credit card or similar liability. Balance is stored as a negative
    /// number by convention: a negative balance is the amount owed.
    CreditLiability,
    /// Emergency fund.
    EmergencyFund,
    /// Tracks money owed to the user by friends (shared expenses).
    FriendReceivable,
    /// Internal counterparty for income movements.
    IncomeSink,
    /// Internal counterparty for expense movements.
    ExpenseSink,
}

impl AccountKind {
    /// Returns true for the internal, non-user-facing counterparty kinds.
    #[must_use]
    pub const fn is_internal(self) -> bool {
        matches!(self, Self::IncomeSink | Self::ExpenseSink)
    }

    /// Returns true for kinds whose balances are negative-by-convention.
    #[must_use]
    pub const fn is_liability(self) -> bool {
        matches!(self, Self::CreditLiability)
    }
}

impl std::fmt::Display for AccountKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Checking => "checking",
            Self::Savings => "savings",
            Self::CreditLiability => "credit_liability",
            Self::EmergencyFund => "emergency_fund",
            Self::FriendReceivable => "friend_receivable",
            Self::IncomeSink => "income_sink",
            Self::ExpenseSink => "expense_sink",
        };
        write!(f, "{name}")
    }
}

/// An account owned by exactly one user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    /// Unique identifier.
    pub id: AccountId,
    /// Owning user.
    pub user_id: UserId,
    /// Display name, matched against free-text payment hints.
    pub name: String,
    /// Account kind. Immutable after creation.
    pub kind: AccountKind,
    /// Balance the fold starts from. Negative for liability kinds.
    pub starting_balance: Amount,
    /// Inactive accounts are excluded from resolution by default.
    pub is_active: bool,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
}

/// Read-only view of a single user's accounts.
///
/// Leaf dependency for the resolver, builder, and direction deriver. All
/// lookups are deterministic: "first" means first in registry order, which
/// callers keep stable (creation order).
#[derive(Debug, Clone)]
pub struct AccountRegistry {
    user_id: UserId,
    accounts: Vec<Account>,
}

impl AccountRegistry {
    /// Builds a registry from a user's accounts, dropping any foreign rows.
    #[must_use]
    pub fn new(user_id: UserId, accounts: Vec<Account>) -> Self {
        let accounts = accounts
            .into_iter()
            .filter(|a| a.user_id == user_id)
            .collect();
        Self { user_id, accounts }
    }

    /// The user this registry belongs to.
    #[must_use]
    pub const fn user_id(&self) -> UserId {
        self.user_id
    }

    /// All accounts, active or not.
    #[must_use]
    pub fn all(&self) -> &[Account] {
        &self.accounts
    }

    /// Looks up an account by id.
    #[must_use]
    pub fn get(&self, id: AccountId) -> Option<&Account> {
        self.accounts.iter().find(|a| a.id == id)
    }

    /// Iterates over active accounts in registry order.
    pub fn active(&self) -> impl Iterator<Item = &Account> {
        self.accounts.iter().filter(|a| a.is_active)
    }

    /// First active account of the given kind, if any.
    #[must_use]
    pub fn first_active_of_kind(&self, kind: AccountKind) -> Option<&Account> {
        self.active().find(|a| a.kind == kind)
    }

    /// The expense-sink account. Required for every expense and refund.
    pub fn expense_sink(&self) -> Result<&Account, LedgerError> {
        self.first_active_of_kind(AccountKind::ExpenseSink)
            .ok_or(LedgerError::MissingAccount(AccountKind::ExpenseSink))
    }

    /// The income-sink account. Required for every income movement.
    pub fn income_sink(&self) -> Result<&Account, LedgerError> {
        self.first_active_of_kind(AccountKind::IncomeSink)
            .ok_or(LedgerError::MissingAccount(AccountKind::IncomeSink))
    }

    /// The friend-receivable account, if the user tracks friend debts.
    #[must_use]
    pub fn friend_receivable(&self) -> Option<&Account> {
        self.first_active_of_kind(AccountKind::FriendReceivable)
    }

    /// The default payment account: the first active checking account.
    #[must_use]
    pub fn default_payment(&self) -> Option<&Account> {
        self.first_active_of_kind(AccountKind::Checking)
    }

    /// Returns the account if it exists and is active.
    pub fn active_account(&self, id: AccountId) -> Result<&Account, LedgerError> {
        let account = self.get(id).ok_or(LedgerError::AccountNotFound(id))?;
        if !account.is_active {
            return Err(LedgerError::AccountInactive(id));
        }
        Ok(account)
    }
}
