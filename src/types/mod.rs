//! Types module
//!
//! Contains core data structures used throughout the application.
//! This module organizes types into logical submodules:
//! - `account`: Account state and balance rules
//! - `transaction`: Ledger entries and identifiers
//! - `customer`: Customer records
//! - `operation`: Requests accepted by the transaction engine
//! - `error`: Error types for the ledger

pub mod account;
pub mod customer;
pub mod error;
pub mod operation;
pub mod transaction;

pub use account::{Account, AccountKind};
pub use customer::Customer;
pub use error::LedgerError;
pub use operation::LedgerOperation;
pub use transaction::{AccountId, CustomerId, Transaction, TransactionId, TransactionKind};
