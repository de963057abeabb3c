//! Direction derivation.
//!
//! A transaction's economic direction (expense, income, transfer, other) is
//! never stored; it is derived from which internal sink accounts its entries
//! touch. This single function is the only classifier in the system, so the
//! listing and analytics paths can never drift apart.

use serde::{Deserialize, Serialize};
use tally_shared::types::AccountId;

use super::entry::{Entry, EntrySide};

/// Derived economic classification of a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Money spent (an entry debits the expense sink).
    Expense,
    /// Money received (an entry credits the income sink).
    Income,
    /// Movement between the user's own accounts (no sink touched).
    Transfer,
    /// Anything else; notably the refund-reversal signature (an entry
    /// credits the expense sink).
    Other,
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Expense => "expense",
            Self::Income => "income",
            Self::Transfer => "transfer",
            Self::Other => "other",
        };
        write!(f, "{name}")
    }
}

/// Classifies a transaction from its entries.
///
/// Scan order is normative: an expense-sink debit is checked before an
/// expense-sink credit, and both before the income sink, so that when a
/// transaction touches multiple internal accounts the most specific signal
/// wins.
#[must_use]
pub fn derive_direction(
    entries: &[Entry],
    expense_sink: AccountId,
    income_sink: AccountId,
) -> Direction {
    let touches = |account: AccountId, side: EntrySide| {
        entries
            .iter()
            .any(|e| e.account_id == account && e.side == side)
    };

    if touches(expense_sink, EntrySide::Debit) {
        Direction::Expense
    } else if touches(expense_sink, EntrySide::Credit) {
        Direction::Other
    } else if touches(income_sink, EntrySide::Credit) {
        Direction::Income
    } else {
        Direction::Transfer
    }
}
