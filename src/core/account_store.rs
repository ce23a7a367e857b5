//! In-memory account store
//!
//! `InMemoryAccountStore` keeps account snapshots in a `DashMap`. Loads hand
//! out clones, so callers always work on a transient copy and must `save` it
//! back for a change to become visible, exactly as with a file or database
//! backed store.

use crate::core::traits::AccountStore;
use crate::types::{Account, AccountId, LedgerError};
use dashmap::DashMap;

/// Thread-safe in-memory account store
#[derive(Debug, Default)]
pub struct InMemoryAccountStore {
    accounts: DashMap<AccountId, Account>,
}

impl InMemoryAccountStore {
    pub fn new() -> Self {
        Self {
            accounts: DashMap::new(),
        }
    }

    /// Number of stored accounts
    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}

impl AccountStore for InMemoryAccountStore {
    fn find_by_id(&self, id: &str) -> Result<Option<Account>, LedgerError> {
        Ok(self.accounts.get(id).map(|entry| entry.value().clone()))
    }

    fn find_all(&self) -> Result<Vec<Account>, LedgerError> {
        Ok(self
            .accounts
            .iter()
            .map(|entry| entry.value().clone())
            .collect())
    }

    fn save(&self, account: &Account) -> Result<(), LedgerError> {
        self.accounts
            .insert(account.id().to_string(), account.clone());
        Ok(())
    }

    fn delete(&self, id: &str) -> Result<(), LedgerError> {
        self.accounts.remove(id);
        Ok(())
    }
}
