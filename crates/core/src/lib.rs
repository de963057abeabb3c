//! Core ledger engine for Tally.
//!
//! This crate contains pure business logic with ZERO web or storage
//! dependencies. It turns a classified money movement (expense, income,
//! transfer, friend-debt settlement, refund) into a set of balanced
//! double-entry ledger entries, and reconstructs balances and transaction
//! direction purely from those entries.
//!
//! # Modules
//!
//! - `ledger` - Double-entry bookkeeping logic

pub mod ledger;
