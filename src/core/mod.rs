//! Core business logic module
//!
//! This module contains the ledger's processing components:
//! - `traits` - Store and customer-directory abstractions
//! - `engine` - Locked deposit, withdrawal, and transfer orchestration
//! - `lock_table` - Per-account locks with canonical pair ordering
//! - `account_store` - In-memory account store
//! - `customer_directory` - Customer registration and validation
//! - `reporting` - Read-only balance queries and summaries
//! - `batch_processor` - Partitioned parallel application of operation batches

pub mod account_store;
pub mod batch_processor;
pub mod customer_directory;
pub mod engine;
pub mod lock_table;
pub mod reporting;
pub mod traits;

pub use account_store::InMemoryAccountStore;
pub use batch_processor::{BatchProcessor, ProcessingResult};
pub use customer_directory::InMemoryCustomerDirectory;
pub use engine::TransactionEngine;
pub use lock_table::AccountLocks;
pub use reporting::{LedgerQueries, LedgerSummary};
pub use traits::{AccountStore, CustomerDirectory};
