use crate::strategy::BatchConfig;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Apply ledger operations to customer accounts
#[derive(Parser, Debug)]
#[command(name = "bank-ledger")]
#[command(about = "Apply deposits, withdrawals and transfers to customer accounts", long_about = None)]
pub struct CliArgs {
    /// Input CSV file path containing ledger operations
    #[arg(value_name = "INPUT", help = "Path to the operations CSV file")]
    pub input_file: PathBuf,

    /// Customers allowed to open accounts
    #[arg(
        long = "customers",
        value_name = "FILE",
        help = "Customers CSV file (id,name,email,phone)"
    )]
    pub customers_file: Option<PathBuf>,

    /// Directory of the CSV account store
    #[arg(
        long = "data-dir",
        value_name = "DIR",
        help = "Persist accounts as CSV files in DIR (default: in-memory store)"
    )]
    pub data_dir: Option<PathBuf>,

    /// Processing strategy to use for the operations file
    #[arg(
        long = "strategy",
        value_name = "STRATEGY",
        default_value = "async",
        help = "Processing strategy: 'sync' for in-order or 'async' for batched parallel processing"
    )]
    pub strategy: StrategyType,

    /// Number of operations per batch (async mode only)
    #[arg(
        long = "batch-size",
        value_name = "SIZE",
        help = "Number of operations per batch (default: 1000)"
    )]
    pub batch_size: Option<usize>,

    /// Maximum number of concurrently applied partitions (async mode only)
    #[arg(
        long = "max-concurrent",
        value_name = "COUNT",
        help = "Maximum number of account partitions applied concurrently (default: CPU cores)"
    )]
    pub max_concurrent_batches: Option<usize>,

    /// Print one account's statement instead of the account listing
    #[arg(
        long = "statement",
        value_name = "ACCOUNT",
        help = "Write the transaction history of ACCOUNT instead of all balances"
    )]
    pub statement: Option<String>,
}

/// Available processing strategies
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum StrategyType {
    Sync,
    Async,
}

impl CliArgs {
    /// Create a BatchConfig from CLI arguments
    ///
    /// Missing values take their defaults; zero values fall back to the
    /// defaults with a warning.
    pub fn to_batch_config(&self) -> BatchConfig {
        if self.batch_size.is_some() || self.max_concurrent_batches.is_some() {
            let default = BatchConfig::default();
            BatchConfig::new(
                self.batch_size.unwrap_or(default.batch_size),
                self.max_concurrent_batches
                    .unwrap_or(default.max_concurrent_batches),
            )
        } else {
            BatchConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::default_strategy(&["program", "input.csv"], StrategyType::Async)]
    #[case::explicit_sync(&["program", "--strategy", "sync", "input.csv"], StrategyType::Sync)]
    #[case::explicit_async(&["program", "--strategy", "async", "input.csv"], StrategyType::Async)]
    fn test_strategy_parsing(#[case] args: &[&str], #[case] expected: StrategyType) {
        let parsed = CliArgs::try_parse_from(args).unwrap();
        assert_eq!(parsed.strategy, expected);
    }

    #[test]
    fn test_optional_paths_and_statement() {
        let parsed = CliArgs::try_parse_from([
            "program",
            "--customers",
            "customers.csv",
            "--data-dir",
            "ledger",
            "--statement",
            "A1",
            "ops.csv",
        ])
        .unwrap();

        assert_eq!(parsed.input_file, PathBuf::from("ops.csv"));
        assert_eq!(parsed.customers_file, Some(PathBuf::from("customers.csv")));
        assert_eq!(parsed.data_dir, Some(PathBuf::from("ledger")));
        assert_eq!(parsed.statement.as_deref(), Some("A1"));
    }

    #[test]
    fn test_optional_arguments_default_to_none() {
        let parsed = CliArgs::try_parse_from(["program", "ops.csv"]).unwrap();

        assert_eq!(parsed.customers_file, None);
        assert_eq!(parsed.data_dir, None);
        assert_eq!(parsed.statement, None);
    }

    #[rstest]
    #[case::all_defaults(&["program", "input.csv"], 1000, num_cpus::get())]
    #[case::custom_batch_size(&["program", "--batch-size", "2000", "input.csv"], 2000, num_cpus::get())]
    #[case::custom_max_concurrent(&["program", "--max-concurrent", "8", "input.csv"], 1000, 8)]
    #[case::all_custom(
        &["program", "--batch-size", "2000", "--max-concurrent", "8", "input.csv"],
        2000,
        8
    )]
    #[case::zero_batch_size(&["program", "--batch-size", "0", "input.csv"], 1000, num_cpus::get())]
    #[case::zero_max_concurrent(&["program", "--max-concurrent", "0", "input.csv"], 1000, num_cpus::get())]
    fn test_batch_config_conversion(
        #[case] args: &[&str],
        #[case] expected_batch_size: usize,
        #[case] expected_max_concurrent: usize,
    ) {
        let parsed = CliArgs::try_parse_from(args).unwrap();
        let config = parsed.to_batch_config();

        assert_eq!(config.batch_size, expected_batch_size);
        assert_eq!(config.max_concurrent_batches, expected_max_concurrent);
    }

    #[rstest]
    #[case::missing_input(&["program"])]
    #[case::invalid_strategy(&["program", "--strategy", "invalid", "input.csv"])]
    #[case::non_numeric_batch_size(&["program", "--batch-size", "many", "input.csv"])]
    fn test_parsing_errors(#[case] args: &[&str]) {
        let result = CliArgs::try_parse_from(args);
        assert!(result.is_err());
    }
}
