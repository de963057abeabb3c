//! Account balance calculation.
//!
//! `balance = starting_balance + sum(debits) - sum(credits)`, computed only
//! over entries of non-deleted transactions. One formula for every account
//! kind: liability starting balances are already negative by convention, so
//! a debit (paying down a card) moves the balance toward zero and a credit
//! (a new charge) moves it further negative. Per-kind branching here would
//! be a bug, not a refinement.

use serde::{Deserialize, Serialize};
use tally_shared::types::{AccountId, Amount};

use super::entry::{Entry, EntrySide};

/// Folds an account's entries onto its starting balance.
///
/// The caller supplies only entries that reference this account and belong
/// to non-deleted transactions.
#[must_use]
pub fn account_balance<'a, I>(starting_balance: Amount, entries: I) -> Amount
where
    I: IntoIterator<Item = &'a Entry>,
{
    entries
        .into_iter()
        .fold(starting_balance, |acc, e| acc + e.signed_amount())
}

/// Running debit/credit totals for one account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountBalance {
    /// The account ID.
    pub account_id: AccountId,
    /// Balance the fold started from.
    pub starting_balance: Amount,
    /// Total debit amount.
    pub debit_total: Amount,
    /// Total credit amount.
    pub credit_total: Amount,
    /// Net balance: starting + debits - credits.
    pub balance: Amount,
}

impl AccountBalance {
    /// Creates a balance at the account's starting point.
    #[must_use]
    pub const fn new(account_id: AccountId, starting_balance: Amount) -> Self {
        Self {
            account_id,
            starting_balance,
            debit_total: Amount::ZERO,
            credit_total: Amount::ZERO,
            balance: starting_balance,
        }
    }

    /// Applies one entry to the running totals.
    pub fn apply(&mut self, entry: &Entry) {
        match entry.side {
            EntrySide::Debit => self.debit_total += entry.amount,
            EntrySide::Credit => self.credit_total += entry.amount,
        }
        self.balance = self.starting_balance + self.debit_total - self.credit_total;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use tally_shared::types::TransactionId;

    fn entry(account_id: AccountId, side: EntrySide, amount: i64) -> Entry {
        Entry {
            id: tally_shared::types::EntryId::new(),
            transaction_id: TransactionId::new(),
            account_id,
            side,
            amount: Amount::from_minor(amount),
        }
    }

    #[test]
    fn test_empty_fold_is_starting_balance() {
        let balance = account_balance(Amount::from_minor(12345), []);
        assert_eq!(balance, Amount::from_minor(12345));
    }

    #[test]
    fn test_liability_round_trip() {
        // A card owing $500.00: a 100.00 debit (payment) brings it to
        // -400.00; a later 20.00 credit (charge) takes it to -420.00.
        let account_id = AccountId::new();
        let starting = Amount::from_minor(-50000);

        let after_payment = account_balance(
            starting,
            [&entry(account_id, EntrySide::Debit, 10000)],
        );
        assert_eq!(after_payment, Amount::from_minor(-40000));

        let after_charge = account_balance(
            starting,
            [
                &entry(account_id, EntrySide::Debit, 10000),
                &entry(account_id, EntrySide::Credit, 2000),
            ],
        );
        assert_eq!(after_charge, Amount::from_minor(-42000));
    }

    #[test]
    fn test_running_totals_match_fold() {
        let account_id = AccountId::new();
        let entries = vec![
            entry(account_id, EntrySide::Debit, 700),
            entry(account_id, EntrySide::Credit, 300),
            entry(account_id, EntrySide::Debit, 100),
        ];

        let mut running = AccountBalance::new(account_id, Amount::from_minor(1000));
        for e in &entries {
            running.apply(e);
        }

        assert_eq!(running.debit_total, Amount::from_minor(800));
        assert_eq!(running.credit_total, Amount::from_minor(300));
        assert_eq!(
            running.balance,
            account_balance(Amount::from_minor(1000), entries.iter())
        );
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// The fold equals starting + sum of signed amounts, for any mix of
        /// entries, on any starting balance (including liability-negative).
        #[test]
        fn prop_fold_is_starting_plus_signed_sum(
            starting in -1_000_000i64..1_000_000i64,
            amounts in prop::collection::vec((1i64..100_000, prop::bool::ANY), 0..20),
        ) {
            let account_id = AccountId::new();
            let entries: Vec<Entry> = amounts
                .iter()
                .map(|&(amount, is_debit)| {
                    let side = if is_debit { EntrySide::Debit } else { EntrySide::Credit };
                    entry(account_id, side, amount)
                })
                .collect();

            let expected = starting
                + entries
                    .iter()
                    .map(|e| e.signed_amount().minor())
                    .sum::<i64>();

            prop_assert_eq!(
                account_balance(Amount::from_minor(starting), entries.iter()),
                Amount::from_minor(expected)
            );
        }

        /// Fold order never matters: entries are commutative under addition.
        #[test]
        fn prop_fold_is_order_independent(
            starting in -1_000_000i64..1_000_000i64,
            amounts in prop::collection::vec((1i64..100_000, prop::bool::ANY), 1..20),
        ) {
            let account_id = AccountId::new();
            let entries: Vec<Entry> = amounts
                .iter()
                .map(|&(amount, is_debit)| {
                    let side = if is_debit { EntrySide::Debit } else { EntrySide::Credit };
                    entry(account_id, side, amount)
                })
                .collect();

            let forward = account_balance(Amount::from_minor(starting), entries.iter());
            let backward = account_balance(Amount::from_minor(starting), entries.iter().rev());
            prop_assert_eq!(forward, backward);
        }
    }
}
