//! Persistence layer for Tally.
//!
//! This crate provides:
//! - The ledger repository: atomic transaction commits (header + entries as
//!   one unit), the idempotency guard, listing with derived direction,
//!   balance queries, and soft delete/restore
//! - Account provisioning and user bootstrap
//! - Demo data seeding for development
//!
//! Correctness under concurrency rests on two things the store guarantees at
//! the same level: the atomic commit unit, and uniqueness of
//! `(user, idempotency key)` enforced inside that unit. A losing concurrent
//! writer observes the winner's transaction, never a hard error.

pub mod error;
pub mod repository;
pub mod seed;
mod state;

pub use error::StoreError;
pub use repository::{
    CreateOutcome, CreateTransactionInput, LedgerRepository, TransactionFilter, TransactionRecord,
    UpdateTransactionInput,
};
