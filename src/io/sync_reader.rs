//! Synchronous CSV reader with iterator interface
//!
//! Provides a streaming iterator over ledger operations from a CSV file.
//! Delegates CSV format concerns to the csv_format module.
//!
//! # Iterator Interface
//!
//! SyncReader implements the Iterator trait, yielding
//! `Result<LedgerOperation, String>` for each CSV row:
//!
//! ```no_run
//! use rust_bank_ledger::io::sync_reader::SyncReader;
//! use std::path::Path;
//!
//! let reader = SyncReader::new(Path::new("operations.csv")).unwrap();
//! for result in reader {
//!     match result {
//!         Ok(operation) => println!("Applying {:?}", operation),
//!         Err(e) => eprintln!("Error: {}", e),
//!     }
//! }
//! ```
//!
//! # Error Handling
//!
//! - Fatal errors (file not found, I/O errors) are returned from `new()`
//! - Individual record parsing errors are yielded as Err variants in the iterator
//! - Line numbers are included in error messages for debugging
//!
//! Records are read one at a time, so memory use does not grow with the file.

use crate::io::csv_format::{convert_csv_record, CsvRecord};
use crate::types::LedgerOperation;
use csv::{ReaderBuilder, Trim};
use std::fs::File;
use std::path::Path;

/// Synchronous CSV reader
#[derive(Debug)]
pub struct SyncReader {
    reader: csv::Reader<File>,
    line_num: usize,
}

impl SyncReader {
    /// Create a new SyncReader from a file path
    ///
    /// The CSV reader is configured to:
    /// - Trim whitespace from all fields
    /// - Allow flexible field counts (trailing optional columns may be omitted)
    /// - Use an 8KB buffer
    pub fn new(path: &Path) -> Result<Self, String> {
        let file = File::open(path)
            .map_err(|e| format!("Failed to open file '{}': {}", path.display(), e))?;

        let reader = ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .buffer_capacity(8 * 1024)
            .from_reader(file);

        Ok(Self {
            reader,
            line_num: 0,
        })
    }
}

impl Iterator for SyncReader {
    type Item = Result<LedgerOperation, String>;

    /// Get the next operation from the CSV file
    ///
    /// Errors carry the 1-based line number, counting the header as line 1.
    fn next(&mut self) -> Option<Self::Item> {
        let mut deserializer = self.reader.deserialize::<CsvRecord>();
        let row = deserializer.next()?;
        self.line_num += 1;
        let line = self.line_num + 1;

        Some(match row {
            Ok(csv_record) => {
                convert_csv_record(csv_record).map_err(|e| format!("Line {}: {}", line, e))
            }
            Err(e) => Err(format!("Line {}: CSV parse error: {}", line, e)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::AccountKind;
    use rust_decimal::Decimal;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const HEADER: &str = "type,account,counterparty,amount,customer,kind\n";

    /// Helper function to create a temporary CSV file for testing
    fn create_temp_csv(rows: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        file.write_all(HEADER.as_bytes())
            .and_then(|_| file.write_all(rows.as_bytes()))
            .expect("Failed to write to temp file");
        file.flush().expect("Failed to flush temp file");
        file
    }

    #[test]
    fn test_sync_reader_new_fails_on_missing_file() {
        let result = SyncReader::new(Path::new("nonexistent.csv"));
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("Failed to open file"));
    }

    #[test]
    fn test_sync_reader_iterates_all_operation_types() {
        let file = create_temp_csv(
            "open,A1,,5000,C1,savings\n\
             deposit,A1,,100.0,,\n\
             withdraw,A1,,50.0,,\n\
             transfer,A1,A2,25,,\n",
        );

        let reader = SyncReader::new(file.path()).unwrap();
        let operations: Vec<_> = reader.map(Result::unwrap).collect();

        assert_eq!(
            operations,
            vec![
                LedgerOperation::Open {
                    account: "A1".to_string(),
                    customer: "C1".to_string(),
                    kind: AccountKind::Savings,
                    initial_balance: Decimal::new(5000, 0),
                },
                LedgerOperation::Deposit {
                    account: "A1".to_string(),
                    amount: Decimal::new(1000, 1),
                },
                LedgerOperation::Withdraw {
                    account: "A1".to_string(),
                    amount: Decimal::new(500, 1),
                },
                LedgerOperation::Transfer {
                    from: "A1".to_string(),
                    to: "A2".to_string(),
                    amount: Decimal::new(25, 0),
                },
            ]
        );
    }

    #[test]
    fn test_sync_reader_accepts_short_rows() {
        let file = create_temp_csv("deposit,A1,,100.0\n");

        let reader = SyncReader::new(file.path()).unwrap();
        let records: Vec<_> = reader.collect();

        assert_eq!(records.len(), 1);
        assert!(records[0].is_ok());
    }

    #[test]
    fn test_sync_reader_includes_line_numbers_in_errors() {
        let file = create_temp_csv(
            "deposit,A1,,100.0,,\n\
             deposit,A2,,invalid,,\n\
             deposit,A3,,50.0,,\n",
        );

        let reader = SyncReader::new(file.path()).unwrap();
        let records: Vec<_> = reader.collect();

        assert_eq!(records.len(), 3);
        assert!(records[0].is_ok());
        assert!(records[2].is_ok());

        let error = records[1].as_ref().unwrap_err();
        assert!(error.contains("Line 3")); // Line 3 because of header
        assert!(error.contains("Invalid amount"));
    }

    #[test]
    fn test_sync_reader_handles_whitespace() {
        let file = create_temp_csv("  deposit  ,  A1  ,  ,  100.0  ,,\n");

        let reader = SyncReader::new(file.path()).unwrap();
        let records: Vec<_> = reader.collect();

        assert_eq!(
            records[0],
            Ok(LedgerOperation::Deposit {
                account: "A1".to_string(),
                amount: Decimal::new(1000, 1),
            })
        );
    }

    #[test]
    fn test_sync_reader_handles_empty_file_after_header() {
        let file = create_temp_csv("");

        let reader = SyncReader::new(file.path()).unwrap();

        assert_eq!(reader.count(), 0);
    }

    #[test]
    fn test_sync_reader_continues_after_error() {
        let file = create_temp_csv(
            "deposit,A1,,100.0,,\n\
             refund,A2,,50.0,,\n\
             deposit,A3,,75.0,,\n",
        );

        let reader = SyncReader::new(file.path()).unwrap();
        let valid: Vec<_> = reader.filter_map(Result::ok).collect();

        assert_eq!(valid.len(), 2);
        assert_eq!(valid[0].primary_account(), "A1");
        assert_eq!(valid[1].primary_account(), "A3");
    }
}
