//! Client-supplied idempotency keys.
//!
//! An idempotency key lets a retried request be recognized as "the same
//! attempt" rather than a new one. Keys are opaque, bounded-length strings
//! with a constrained character set; uniqueness is per user.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Maximum accepted key length in bytes.
pub const MAX_KEY_LEN: usize = 64;

/// Errors produced when parsing an idempotency key.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InvalidIdempotencyKey {
    /// The key was empty.
    #[error("Idempotency key must not be empty")]
    Empty,

    /// The key exceeded [`MAX_KEY_LEN`] bytes.
    #[error("Idempotency key must be at most {MAX_KEY_LEN} characters, got {0}")]
    TooLong(usize),

    /// The key contained a character outside `[A-Za-z0-9._-]`.
    #[error("Idempotency key contains invalid character {0:?}")]
    InvalidCharacter(char),
}

/// An opaque client-generated key deduplicating transaction creation attempts.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct IdempotencyKey(String);

impl IdempotencyKey {
    /// Validates and wraps a raw key.
    pub fn new(raw: impl Into<String>) -> Result<Self, InvalidIdempotencyKey> {
        let raw = raw.into();
        if raw.is_empty() {
            return Err(InvalidIdempotencyKey::Empty);
        }
        if raw.len() > MAX_KEY_LEN {
            return Err(InvalidIdempotencyKey::TooLong(raw.len()));
        }
        if let Some(bad) = raw
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-')))
        {
            return Err(InvalidIdempotencyKey::InvalidCharacter(bad));
        }
        Ok(Self(raw))
    }

    /// Returns the key as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for IdempotencyKey {
    type Error = InvalidIdempotencyKey;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<IdempotencyKey> for String {
    fn from(key: IdempotencyKey) -> Self {
        key.0
    }
}

impl std::str::FromStr for IdempotencyKey {
    type Err = InvalidIdempotencyKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl std::fmt::Display for IdempotencyKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
