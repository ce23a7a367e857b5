//! I/O module
//!
//! Handles CSV parsing, output, and file-backed persistence.
//!
//! # Components
//!
//! - `csv_format` - CSV format handling (record conversion, output serialization)
//! - `sync_reader` - Synchronous CSV reader with iterator interface
//! - `async_reader` - Asynchronous CSV reader with batch reading interface
//! - `csv_store` - Account store persisted as CSV files
//! - `csv_customers` - Customer directory persisted as a CSV file

pub mod async_reader;
pub mod csv_customers;
pub mod csv_format;
pub mod csv_store;
pub mod sync_reader;

pub use async_reader::AsyncReader;
pub use csv_customers::CsvCustomerDirectory;
pub use csv_format::{
    convert_csv_record, read_customers_csv, write_accounts_csv, write_statement_csv, CsvRecord,
};
pub use csv_store::CsvAccountStore;
pub use sync_reader::SyncReader;
