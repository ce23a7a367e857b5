//! Read-only account queries
//!
//! `LedgerQueries` answers reporting questions from store snapshots. It takes
//! no account locks, so a report running next to transfers may observe one
//! account before and another after the same transfer.

use crate::core::traits::AccountStore;
use crate::types::{Account, LedgerError, Transaction};
use rust_decimal::Decimal;
use std::fmt;

/// Reporting view over an account store
pub struct LedgerQueries<'a> {
    store: &'a dyn AccountStore,
}

/// Bank-wide totals
#[derive(Debug, Clone, PartialEq)]
pub struct LedgerSummary {
    pub total_accounts: usize,
    pub total_balance: Decimal,
    /// Account with the highest balance, if any account exists
    pub richest: Option<Account>,
}

impl<'a> LedgerQueries<'a> {
    pub fn new(store: &'a dyn AccountStore) -> Self {
        LedgerQueries { store }
    }

    pub fn total_accounts(&self) -> Result<usize, LedgerError> {
        Ok(self.store.find_all()?.len())
    }

    /// Sum of all account balances
    pub fn total_balance(&self) -> Result<Decimal, LedgerError> {
        Ok(self
            .store
            .find_all()?
            .iter()
            .map(Account::balance)
            .sum())
    }

    /// Account with the highest balance; ties go to the smallest id
    pub fn highest_balance_account(&self) -> Result<Option<Account>, LedgerError> {
        Ok(richest(self.store.find_all()?))
    }

    /// Accounts whose balance is at least `min`, sorted by id
    pub fn filter_by_min_balance(&self, min: Decimal) -> Result<Vec<Account>, LedgerError> {
        self.filter(|balance| balance >= min)
    }

    /// Accounts whose balance is at most `max`, sorted by id
    pub fn filter_by_max_balance(&self, max: Decimal) -> Result<Vec<Account>, LedgerError> {
        self.filter(|balance| balance <= max)
    }

    /// Accounts whose balance lies in `min..=max`, sorted by id
    pub fn filter_by_balance_range(
        &self,
        min: Decimal,
        max: Decimal,
    ) -> Result<Vec<Account>, LedgerError> {
        self.filter(|balance| balance >= min && balance <= max)
    }

    /// Current balance of one account
    ///
    /// # Errors
    ///
    /// Returns `AccountNotFound` if the account does not exist.
    pub fn account_balance(&self, account_id: &str) -> Result<Decimal, LedgerError> {
        Ok(self.find(account_id)?.balance())
    }

    /// Full history of one account in chronological order
    ///
    /// # Errors
    ///
    /// Returns `AccountNotFound` if the account does not exist.
    pub fn transaction_history(&self, account_id: &str) -> Result<Vec<Transaction>, LedgerError> {
        Ok(self.find(account_id)?.transactions())
    }

    /// Totals computed from a single snapshot of the store
    pub fn summary(&self) -> Result<LedgerSummary, LedgerError> {
        let accounts = self.store.find_all()?;
        Ok(LedgerSummary {
            total_accounts: accounts.len(),
            total_balance: accounts.iter().map(Account::balance).sum(),
            richest: richest(accounts),
        })
    }

    fn find(&self, account_id: &str) -> Result<Account, LedgerError> {
        self.store
            .find_by_id(account_id)?
            .ok_or_else(|| LedgerError::account_not_found(account_id))
    }

    fn filter<F>(&self, keep: F) -> Result<Vec<Account>, LedgerError>
    where
        F: Fn(Decimal) -> bool,
    {
        let mut accounts: Vec<Account> = self
            .store
            .find_all()?
            .into_iter()
            .filter(|account| keep(account.balance()))
            .collect();
        accounts.sort_by(|a, b| a.id().cmp(b.id()));
        Ok(accounts)
    }
}

fn richest(accounts: Vec<Account>) -> Option<Account> {
    accounts.into_iter().max_by(|a, b| {
        a.balance()
            .cmp(&b.balance())
            .then_with(|| b.id().cmp(a.id()))
    })
}

impl fmt::Display for LedgerSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Total number of accounts: {}", self.total_accounts)?;
        write!(f, "Total balance: {:.2}", self.total_balance)?;
        if let Some(account) = &self.richest {
            write!(
                f,
                "\nRichest account: {} with {:.2}",
                account.id(),
                account.balance()
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::account_store::InMemoryAccountStore;
    use crate::types::AccountKind;
    use rstest::rstest;

    fn store_with(balances: &[(&str, i64)]) -> InMemoryAccountStore {
        let store = InMemoryAccountStore::new();
        for (id, balance) in balances {
            let mut account = Account::new(*id, "C1", AccountKind::Savings);
            if *balance > 0 {
                account.deposit(Decimal::new(*balance, 0)).unwrap();
            }
            store.save(&account).unwrap();
        }
        store
    }

    fn ids(accounts: &[Account]) -> Vec<&str> {
        accounts.iter().map(Account::id).collect()
    }

    #[test]
    fn test_empty_store() {
        let store = InMemoryAccountStore::new();
        let queries = LedgerQueries::new(&store);

        assert_eq!(queries.total_accounts().unwrap(), 0);
        assert_eq!(queries.total_balance().unwrap(), Decimal::ZERO);
        assert_eq!(queries.highest_balance_account().unwrap(), None);
        assert!(queries.filter_by_min_balance(Decimal::ZERO).unwrap().is_empty());
    }

    #[test]
    fn test_totals_and_richest() {
        let store = store_with(&[("A1", 5000), ("A2", 3000), ("A3", 0)]);
        let queries = LedgerQueries::new(&store);

        assert_eq!(queries.total_accounts().unwrap(), 3);
        assert_eq!(queries.total_balance().unwrap(), Decimal::new(8000, 0));
        let richest = queries.highest_balance_account().unwrap().unwrap();
        assert_eq!(richest.id(), "A1");
    }

    #[test]
    fn test_richest_tie_goes_to_smallest_id() {
        let store = store_with(&[("B", 100), ("A", 100)]);
        let queries = LedgerQueries::new(&store);

        assert_eq!(queries.highest_balance_account().unwrap().unwrap().id(), "A");
    }

    #[rstest]
    #[case::min_inclusive(Some(3000), None, vec!["A1", "A2"])]
    #[case::max_inclusive(None, Some(3000), vec!["A2", "A3"])]
    #[case::range_inclusive(Some(0), Some(3000), vec!["A2", "A3"])]
    #[case::range_single(Some(5000), Some(5000), vec!["A1"])]
    #[case::range_empty(Some(4000), Some(4500), vec![])]
    fn test_balance_filters(
        #[case] min: Option<i64>,
        #[case] max: Option<i64>,
        #[case] expected: Vec<&str>,
    ) {
        let store = store_with(&[("A3", 0), ("A1", 5000), ("A2", 3000)]);
        let queries = LedgerQueries::new(&store);

        let result = match (min, max) {
            (Some(min), Some(max)) => {
                queries.filter_by_balance_range(Decimal::new(min, 0), Decimal::new(max, 0))
            }
            (Some(min), None) => queries.filter_by_min_balance(Decimal::new(min, 0)),
            (None, Some(max)) => queries.filter_by_max_balance(Decimal::new(max, 0)),
            (None, None) => unreachable!(),
        }
        .unwrap();

        assert_eq!(ids(&result), expected);
    }

    #[test]
    fn test_account_balance_and_history() {
        let store = store_with(&[("A1", 5000)]);
        let queries = LedgerQueries::new(&store);

        assert_eq!(queries.account_balance("A1").unwrap(), Decimal::new(5000, 0));
        assert_eq!(queries.transaction_history("A1").unwrap().len(), 1);
        assert!(matches!(
            queries.account_balance("UNKNOWN"),
            Err(LedgerError::AccountNotFound { .. })
        ));
        assert!(matches!(
            queries.transaction_history("UNKNOWN"),
            Err(LedgerError::AccountNotFound { .. })
        ));
    }

    #[test]
    fn test_summary_display() {
        let store = store_with(&[("A1", 5000), ("A2", 3000)]);
        let summary = LedgerQueries::new(&store).summary().unwrap();

        assert_eq!(summary.total_accounts, 2);
        assert_eq!(
            summary.to_string(),
            "Total number of accounts: 2\nTotal balance: 8000.00\nRichest account: A1 with 5000.00"
        );
    }
}
