//! Heuristic account resolution from loose payment hints.
//!
//! Maps a hint (an explicit account reference, or a free-text payment-method
//! name) to a concrete account. Rules run in a fixed order and the first
//! match wins: exact matches must never be shadowed by looser heuristics,
//! and the credit-keyword fallback runs last because it is the least precise
//! signal.

use std::collections::HashMap;

use tally_shared::types::AccountId;

use super::account::{Account, AccountKind, AccountRegistry};

/// Free-text fragments that suggest a liability-like payment method.
const CREDIT_KEYWORDS: &[&str] = &["credit", "card", "cc"];

/// A loose reference to the account a movement touched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentHint {
    /// Explicit account identifier.
    Id(AccountId),
    /// Free-text name fragment (e.g., "my visa").
    Name(String),
    /// No hint; the caller supplies a default.
    None,
}

impl PaymentHint {
    /// Builds a hint from optional id/name fields, id taking precedence.
    #[must_use]
    pub fn from_parts(id: Option<AccountId>, name: Option<String>) -> Self {
        match (id, name) {
            (Some(id), _) => Self::Id(id),
            (None, Some(name)) if !name.trim().is_empty() => Self::Name(name),
            _ => Self::None,
        }
    }
}

/// Data-driven alias table: known free-text name → account display name.
///
/// Configuration input, not hard logic; the table can be swapped without
/// touching the resolver.
#[derive(Debug, Clone, Default)]
pub struct AliasTable {
    aliases: HashMap<String, String>,
}

impl AliasTable {
    /// Builds a table from alias → account-name pairs. Keys are matched
    /// case-insensitively.
    #[must_use]
    pub fn new(aliases: HashMap<String, String>) -> Self {
        let aliases = aliases
            .into_iter()
            .map(|(alias, name)| (alias.to_lowercase(), name))
            .collect();
        Self { aliases }
    }

    /// Looks up the canonical account name for an alias.
    #[must_use]
    pub fn lookup(&self, fragment: &str) -> Option<&str> {
        self.aliases
            .get(&fragment.to_lowercase())
            .map(String::as_str)
    }

    /// Returns true if the table has no aliases.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }
}

/// Resolves a payment hint to an active account.
///
/// Rules, in order, first match wins:
/// 1. Explicit id resolving to an active account.
/// 2. Exact case-insensitive name match.
/// 3. Substring match either direction (fragment in name, or name in fragment).
/// 4. Alias-table match mapping the fragment to a known account name.
/// 5. Credit-keyword fallback to the first active credit-liability account.
/// 6. No match: `None`; callers supply their default (typically the first
///    active checking account).
#[must_use]
pub fn resolve<'a>(
    hint: &PaymentHint,
    registry: &'a AccountRegistry,
    aliases: &AliasTable,
) -> Option<&'a Account> {
    match hint {
        PaymentHint::Id(id) => registry.get(*id).filter(|a| a.is_active),
        PaymentHint::Name(raw) => {
            let fragment = raw.trim().to_lowercase();
            if fragment.is_empty() {
                return None;
            }
            resolve_fragment(&fragment, registry, aliases)
        }
        PaymentHint::None => None,
    }
}

fn resolve_fragment<'a>(
    fragment: &str,
    registry: &'a AccountRegistry,
    aliases: &AliasTable,
) -> Option<&'a Account> {
    // Rule 2: exact case-insensitive name match.
    if let Some(account) = registry
        .active()
        .find(|a| a.name.to_lowercase() == fragment)
    {
        return Some(account);
    }

    // Rule 3: substring either direction.
    if let Some(account) = registry.active().find(|a| {
        let name = a.name.to_lowercase();
        name.contains(fragment) || fragment.contains(&name)
    }) {
        return Some(account);
    }

    // Rule 4: alias table (e.g., a card brand mapped to an account name).
    if let Some(canonical) = aliases.lookup(fragment) {
        let canonical = canonical.to_lowercase();
        if let Some(account) = registry
            .active()
            .find(|a| a.name.to_lowercase() == canonical)
        {
            return Some(account);
        }
    }

    // Rule 5: liability keyword, the least precise signal.
    if CREDIT_KEYWORDS.iter().any(|kw| fragment.contains(kw)) {
        return registry.first_active_of_kind(AccountKind::CreditLiability);
    }

    None
}
