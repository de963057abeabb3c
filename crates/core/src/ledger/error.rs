//! Ledger error types for validation, resolution, and invariant errors.
//!
//! Three families, deliberately distinct (they differ in who fixes what):
//! - Validation: the caller corrects the request.
//! - Resolution: the user provisions a missing account.
//! - Invariant: the engine itself is wrong; surfaced opaquely, logged fully.

use tally_shared::types::AccountId;
use thiserror::Error;

use super::account::AccountKind;

/// Errors that can occur during ledger operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    // ========== Validation Errors ==========
    /// Transaction amount must be strictly positive.
    #[error("Transaction amount must be positive")]
    NonPositiveAmount,

    /// Transaction amount exceeds the configured ceiling.
    #[error("Transaction amount {amount} exceeds the maximum of {ceiling} (minor units)")]
    AmountAboveCeiling {
        /// Requested amount in minor units.
        amount: i64,
        /// Configured ceiling in minor units.
        ceiling: i64,
    },

    /// Transfers require two distinct accounts.
    #[error("Transfer source and destination must be different accounts")]
    TransferSameAccount,

    // ========== Resolution Errors ==========
    /// Referenced account does not exist in the user's registry.
    #[error("Account not found: {0}")]
    AccountNotFound(AccountId),

    /// Referenced account is inactive.
    #[error("Account {0} is inactive")]
    AccountInactive(AccountId),

    /// A required account of the given kind is not provisioned.
    #[error("No active {0} account is provisioned for this user")]
    MissingAccount(AccountKind),

    // ========== Invariant Violations ==========
    /// An entry set came out empty.
    #[error("Transaction must have at least one entry")]
    NoEntries,

    /// An entry amount was zero or negative.
    #[error("Entry amount must be positive")]
    NonPositiveEntryAmount,

    /// Entry set does not balance (debits != credits).
    #[error("Entries are unbalanced: debits ({debits}) != credits ({credits}) (minor units)")]
    Unbalanced {
        /// Total debit amount in minor units.
        debits: i64,
        /// Total credit amount in minor units.
        credits: i64,
    },
}

impl LedgerError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NonPositiveAmount => "NON_POSITIVE_AMOUNT",
            Self::AmountAboveCeiling { .. } => "AMOUNT_ABOVE_CEILING",
            Self::TransferSameAccount => "TRANSFER_SAME_ACCOUNT",
            Self::AccountNotFound(_) => "ACCOUNT_NOT_FOUND",
            Self::AccountInactive(_) => "ACCOUNT_INACTIVE",
            Self::MissingAccount(_) => "MISSING_ACCOUNT",
            Self::NoEntries => "NO_ENTRIES",
            Self::NonPositiveEntryAmount => "NON_POSITIVE_ENTRY_AMOUNT",
            Self::Unbalanced { .. } => "UNBALANCED_ENTRIES",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self {
            // 400 Bad Request - the caller corrects the request
            Self::NonPositiveAmount
            | Self::AmountAboveCeiling { .. }
            | Self::TransferSameAccount
            | Self::AccountInactive(_) => 400,

            // 404 Not Found
            Self::AccountNotFound(_) => 404,

            // 422 Unprocessable - the fix is "provision an account"
            Self::MissingAccount(_) => 422,

            // 500 - should be unreachable if the entry builder is correct
            Self::NoEntries | Self::NonPositiveEntryAmount | Self::Unbalanced { .. } => 500,
        }
    }

    /// Returns true if this error indicates a broken engine invariant.
    ///
    /// Invariant violations are logged with full detail but returned to the
    /// caller as an opaque internal failure: entry contents never leak.
    #[must_use]
    pub const fn is_invariant_violation(&self) -> bool {
        matches!(
            self,
            Self::NoEntries | Self::NonPositiveEntryAmount | Self::Unbalanced { .. }
        )
    }
}
