//! Collaborator traits consumed by the transaction engine
//!
//! The engine talks to persistence and to the customer directory only through
//! these traits, so a store or directory can be swapped without touching the
//! locking protocol.

use crate::types::{Account, Customer, LedgerError};

/// Persistence boundary for accounts
///
/// The store is the system of record. Every load returns a fresh value; the
/// engine mutates that value and hands it back to [`AccountStore::save`] while
/// holding the account's lock.
pub trait AccountStore: Send + Sync {
    /// Load one account with its full transaction history
    fn find_by_id(&self, id: &str) -> Result<Option<Account>, LedgerError>;

    /// Load every account (order not significant)
    fn find_all(&self) -> Result<Vec<Account>, LedgerError>;

    /// Persist the full current state of `account`, replacing whatever was
    /// stored for its id
    ///
    /// Saving the same snapshot twice leaves the store unchanged.
    fn save(&self, account: &Account) -> Result<(), LedgerError>;

    /// Remove an account and its history
    fn delete(&self, id: &str) -> Result<(), LedgerError>;
}

/// Customer registry consulted before an account is created
pub trait CustomerDirectory: Send + Sync {
    fn contains(&self, customer_id: &str) -> bool;

    /// Add a customer after validating its contact details
    fn register(&self, customer: Customer) -> Result<(), LedgerError>;
}
