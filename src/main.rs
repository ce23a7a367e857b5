//! Rust Bank Ledger CLI
//!
//! Command-line interface for applying ledger operations from CSV files.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- --customers customers.csv operations.csv > accounts.csv
//! cargo run -- --strategy sync --customers customers.csv operations.csv > accounts.csv
//! cargo run -- --data-dir ledger/ --customers customers.csv operations.csv > accounts.csv
//! cargo run -- --data-dir ledger/ --statement A1 empty.csv > statement.csv
//! RUST_LOG=debug cargo run -- --customers customers.csv operations.csv
//! ```
//!
//! The program reads operations from the input CSV file, applies them through
//! the ledger engine using the selected processing strategy, and writes the
//! final account states to stdout. Logs go to stderr and are filtered with
//! `RUST_LOG`.
//!
//! # Exit Codes
//!
//! - 0: Success
//! - 1: Error (missing arguments, file not found, file not readable, etc.)

use rust_bank_ledger::cli;
use std::process;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = cli::parse_args();

    let mut output = std::io::stdout();
    if let Err(e) = cli::run(&args, &mut output) {
        tracing::error!(error = %e, "processing failed");
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
