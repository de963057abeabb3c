//! Double-entry bookkeeping logic.
//!
//! This module implements the core ledger functionality:
//! - The account registry (kinds, internal sink accounts, active flags)
//! - Heuristic account resolution from loose payment hints
//! - Entry building: one balanced entry set per movement kind
//! - Balance calculation as a fold over committed entries
//! - Direction derivation from the internal accounts a transaction touches
//! - Business rule validation and error types

pub mod account;
pub mod balance;
pub mod builder;
pub mod direction;
pub mod entry;
pub mod error;
pub mod movement;
pub mod resolver;
pub mod transaction;
pub mod validation;

#[cfg(test)]
mod builder_props;

pub use account::{Account, AccountKind, AccountRegistry};
pub use balance::{AccountBalance, account_balance};
pub use builder::build_entries;
pub use direction::{Direction, derive_direction};
pub use entry::{Entry, EntryDraft, EntrySide};
pub use error::LedgerError;
pub use movement::{Movement, MovementKind};
pub use resolver::{AliasTable, PaymentHint, resolve};
pub use transaction::Transaction;
pub use validation::validate_entries;
