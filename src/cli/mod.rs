// CLI module
// Command-line interface, argument parsing and the end-to-end run

mod args;

pub use args::{CliArgs, StrategyType};

use crate::core::{
    AccountStore, CustomerDirectory, InMemoryAccountStore, InMemoryCustomerDirectory,
    TransactionEngine,
};
use crate::io::{
    read_customers_csv, write_accounts_csv, write_statement_csv, CsvAccountStore,
    CsvCustomerDirectory,
};
use crate::strategy;
use clap::Parser;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;

/// Parse command-line arguments using clap
///
/// On invalid arguments or `--help`, clap prints the message and exits.
pub fn parse_args() -> CliArgs {
    CliArgs::parse()
}

/// Run the whole pipeline described by `args`, writing CSV to `output`
///
/// 1. Opens the CSV store and customer directory in `--data-dir`, or
///    in-memory ones
/// 2. Registers the customers from `--customers`, if given
/// 3. Applies the operations file with the selected strategy
/// 4. Writes the account listing, or one account's statement
///
/// Rejected rows and invalid customers are logged and skipped; only fatal
/// errors (unreadable files, unknown statement account) are returned.
pub fn run(args: &CliArgs, output: &mut dyn Write) -> Result<(), String> {
    let (accounts, customers): (Arc<dyn AccountStore>, Arc<dyn CustomerDirectory>) =
        match &args.data_dir {
            Some(dir) => (
                Arc::new(CsvAccountStore::open(dir).map_err(|e| e.to_string())?),
                Arc::new(CsvCustomerDirectory::open(dir).map_err(|e| e.to_string())?),
            ),
            None => (
                Arc::new(InMemoryAccountStore::new()),
                Arc::new(InMemoryCustomerDirectory::new()),
            ),
        };

    if let Some(path) = &args.customers_file {
        load_customers(customers.as_ref(), path)?;
    }

    let engine = Arc::new(TransactionEngine::new(accounts, customers));

    let config = match args.strategy {
        StrategyType::Async => Some(args.to_batch_config()),
        StrategyType::Sync => None,
    };
    let strategy = strategy::create_strategy(args.strategy, config);
    strategy.process(&engine, &args.input_file)?;

    match engine.queries().summary() {
        Ok(summary) => tracing::info!(
            accounts = summary.total_accounts,
            total_balance = %summary.total_balance,
            richest = summary.richest.as_ref().map(|a| a.id()).unwrap_or("-"),
            "ledger summary"
        ),
        Err(e) => tracing::warn!(error = %e, "could not compute ledger summary"),
    }

    match &args.statement {
        Some(account_id) => {
            let account = engine
                .get_account(account_id)
                .map_err(|e| e.to_string())?
                .ok_or_else(|| format!("Account {} not found", account_id))?;
            write_statement_csv(&account, output)
        }
        None => {
            let accounts = engine.get_all_accounts().map_err(|e| e.to_string())?;
            write_accounts_csv(&accounts, output)
        }
    }
}

fn load_customers(directory: &dyn CustomerDirectory, path: &Path) -> Result<(), String> {
    let file = File::open(path)
        .map_err(|e| format!("Failed to open file '{}': {}", path.display(), e))?;

    for customer in read_customers_csv(file) {
        let id = customer.id.clone();
        if let Err(e) = directory.register(customer) {
            tracing::warn!(customer = %id, error = %e, "skipping customer");
        }
    }
    Ok(())
}
