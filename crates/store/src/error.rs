//! Error types for store operations.

use tally_core::ledger::LedgerError;
use tally_shared::AppError;
use tally_shared::types::{AccountId, TransactionId};
use thiserror::Error;

/// Errors that can occur during store operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// Transaction not found (or owned by another user).
    #[error("Transaction not found: {0}")]
    TransactionNotFound(TransactionId),

    /// Account not found (or owned by another user).
    #[error("Account not found: {0}")]
    AccountNotFound(AccountId),

    /// An entry references an account the requesting user does not own.
    #[error("Account {0} does not belong to the requesting user")]
    ForeignAccount(AccountId),

    /// A ledger rule failed at commit time.
    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::TransactionNotFound(_) | StoreError::AccountNotFound(_) => {
                Self::NotFound(err.to_string())
            }
            StoreError::ForeignAccount(_) => Self::Validation(err.to_string()),
            StoreError::Ledger(ref ledger) => {
                if ledger.is_invariant_violation() {
                    // Never leak entry contents; the caller sees an opaque
                    // internal failure and the detail goes to the log.
                    Self::Internal("ledger invariant violation".to_string())
                } else {
                    match ledger.http_status_code() {
                        404 => Self::NotFound(err.to_string()),
                        422 => Self::BusinessRule(err.to_string()),
                        _ => Self::Validation(err.to_string()),
                    }
                }
            }
        }
    }
}
