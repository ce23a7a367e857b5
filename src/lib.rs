//! Rust Bank Ledger Library
//! # Overview
//!
//! This library keeps customer accounts with a balance and an append-only
//! transaction history, and applies deposits, withdrawals and transfers to
//! them safely from many threads at once.
//!
//! # Architecture
//!
//! The system is organized into several key components:
//!
//! - [`types`] - Core data types (Account, Transaction, LedgerOperation, errors)
//! - [`cli`] - CLI arguments parsing and the end-to-end run
//! - [`core`] - Business logic components:
//!   - [`core::engine`] - Locked deposit, withdrawal and transfer orchestration
//!   - [`core::lock_table`] - Per-account locks with canonical pair ordering
//!   - [`core::reporting`] - Balance queries and summaries
//! - [`io`] - CSV parsing, output, and the CSV-file account store
//! - [`strategy`] - Sync and async batch processing of operation files
//!
//! # Operations
//!
//! - **Open**: Create an account for a registered customer, optionally funded
//! - **Deposit**: Credit funds to an account
//! - **Withdraw**: Debit funds from an account (no overdraft)
//! - **Transfer**: Move funds between two distinct accounts atomically
//!
//! # Invariants
//!
//! Every account's balance equals the signed sum of its transaction history
//! and never goes negative. A transfer either applies both of its legs or
//! neither.

// Module declarations
pub mod cli;
pub mod core;
pub mod io;
pub mod strategy;
pub mod types;

pub use core::{
    AccountStore, CustomerDirectory, InMemoryAccountStore, InMemoryCustomerDirectory,
    LedgerQueries, LedgerSummary, TransactionEngine,
};
pub use io::{write_accounts_csv, CsvAccountStore, CsvCustomerDirectory};
pub use types::{
    Account, AccountId, AccountKind, Customer, CustomerId, LedgerError, LedgerOperation,
    Transaction, TransactionId, TransactionKind,
};
