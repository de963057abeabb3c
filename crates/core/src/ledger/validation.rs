//! Business rule validation for entry sets.
//!
//! The builder guarantees its output passes this check; the ledger writer
//! re-runs it independently at commit time. Defense in depth: an imbalance
//! here is an engine invariant violation, never a user-facing input error.

use tally_shared::types::Amount;

use super::entry::{EntryDraft, EntrySide};
use super::error::LedgerError;

/// Validates that a set of entry drafts forms a committable transaction:
/// non-empty, every amount strictly positive, and debit sum equal to credit
/// sum (exact integer arithmetic).
pub fn validate_entries(entries: &[EntryDraft]) -> Result<(), LedgerError> {
    if entries.is_empty() {
        return Err(LedgerError::NoEntries);
    }

    let mut total_debits = Amount::ZERO;
    let mut total_credits = Amount::ZERO;

    for entry in entries {
        if !entry.amount.is_positive() {
            return Err(LedgerError::NonPositiveEntryAmount);
        }

        match entry.side {
            EntrySide::Debit => total_debits += entry.amount,
            EntrySide::Credit => total_credits += entry.amount,
        }
    }

    if total_debits != total_credits {
        return Err(LedgerError::Unbalanced {
            debits: total_debits.minor(),
            credits: total_credits.minor(),
        });
    }

    Ok(())
}
