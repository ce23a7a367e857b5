//! Benchmark suite for comparing processing strategies
//!
//! This benchmark compares the synchronous and asynchronous processing
//! strategies using the divan benchmarking framework.
//!
//! # Running Benchmarks
//!
//! ```bash
//! # Run all benchmarks
//! cargo bench
//! ```
//!
//! # Generated Input
//!
//! Each benchmark writes an operations file into a temporary directory before
//! timing starts. The file opens one account per 50 operations and then mixes
//! deposits, withdrawals and transfers between neighbouring accounts.

use rust_bank_ledger::cli::StrategyType;
use rust_bank_ledger::strategy::{create_strategy, BatchConfig};
use rust_bank_ledger::{Customer, InMemoryAccountStore, InMemoryCustomerDirectory, TransactionEngine};
use std::fmt::Write as _;
use std::path::Path;
use std::sync::Arc;
use tempfile::NamedTempFile;

fn main() {
    divan::main();
}

fn write_operations(size: usize) -> NamedTempFile {
    let accounts = (size / 50).max(2);
    let mut content = String::from("type,account,counterparty,amount,customer,kind\n");
    for account in 0..accounts {
        writeln!(content, "open,A{},,1000,C1,savings", account).unwrap();
    }
    for i in 0..size.saturating_sub(accounts) {
        let account = i % accounts;
        match i % 3 {
            0 => writeln!(content, "deposit,A{},,2.50,,", account),
            1 => writeln!(content, "withdraw,A{},,1.25,,", account),
            _ => writeln!(content, "transfer,A{},A{},3,,", account, (account + 1) % accounts),
        }
        .unwrap();
    }

    let file = NamedTempFile::new().expect("Failed to create benchmark input");
    std::fs::write(file.path(), content).expect("Failed to write benchmark input");
    file
}

fn fresh_engine() -> Arc<TransactionEngine> {
    let customers = InMemoryCustomerDirectory::new();
    customers
        .register(Customer::new("C1", "Bench", "bench@example.com", "0123456789"))
        .expect("Failed to register customer");
    Arc::new(TransactionEngine::new(
        Arc::new(InMemoryAccountStore::new()),
        Arc::new(customers),
    ))
}

fn bench_strategy(bencher: divan::Bencher, strategy_type: StrategyType, path: &Path) {
    let config = match strategy_type {
        StrategyType::Async => Some(BatchConfig::default()),
        StrategyType::Sync => None,
    };
    let strategy = create_strategy(strategy_type, config);

    bencher.with_inputs(fresh_engine).bench_values(|engine| {
        strategy
            .process(&engine, path)
            .expect("Processing failed")
    });
}

/// Benchmark synchronous processing strategy
#[divan::bench(args = [100, 1_000, 10_000])]
fn sync_strategy(bencher: divan::Bencher, size: usize) {
    let input = write_operations(size);
    bench_strategy(bencher, StrategyType::Sync, input.path());
}

/// Benchmark asynchronous processing strategy
#[divan::bench(args = [100, 1_000, 10_000])]
fn async_strategy(bencher: divan::Bencher, size: usize) {
    let input = write_operations(size);
    bench_strategy(bencher, StrategyType::Async, input.path());
}
