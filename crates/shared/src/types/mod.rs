//! Common types used across the application.

pub mod amount;
pub mod id;
pub mod token;

pub use amount::Amount;
pub use id::{AccountId, CategoryId, EntryId, TransactionId, UserId};
pub use token::IdempotencyKey;
