//! Asynchronous CSV reader with batch interface
//!
//! Provides batched reads of ledger operations from a CSV source for the
//! async processing strategy.
//!
//! # Architecture
//!
//! ```text
//! CSV Reader → AsyncReader → Batches of LedgerOperations
//!                  ↓
//!           csv_format module
//!           (CsvRecord, convert_csv_record)
//! ```

use crate::io::csv_format::{convert_csv_record, CsvRecord};
use crate::types::LedgerOperation;
use csv_async::AsyncReaderBuilder;
use futures::io::AsyncRead;
use futures::stream::StreamExt;

/// Asynchronous CSV reader
///
/// Rows that fail to parse are logged and counted, never returned.
pub struct AsyncReader<R: AsyncRead + Unpin> {
    csv_reader: csv_async::AsyncDeserializer<R>,
    line_num: usize,
    skipped: usize,
}

impl<R: AsyncRead + Unpin + Send + 'static> AsyncReader<R> {
    /// Create a new AsyncReader from an async reader
    pub fn new(reader: R) -> Self {
        let csv_reader = AsyncReaderBuilder::new()
            .flexible(true)
            .trim(csv_async::Trim::All)
            .create_deserializer(reader);

        Self {
            csv_reader,
            line_num: 1,
            skipped: 0,
        }
    }

    /// Read a batch of operations
    ///
    /// Reads until `batch_size` operations have been parsed or the input is
    /// exhausted. An empty vector means the end of the input was reached.
    pub async fn read_batch(&mut self, batch_size: usize) -> Vec<LedgerOperation> {
        let mut batch = Vec::with_capacity(batch_size);
        let mut records = self.csv_reader.deserialize::<CsvRecord>();

        while batch.len() < batch_size {
            let row = match records.next().await {
                Some(row) => row,
                None => break,
            };
            self.line_num += 1;

            match row.map_err(|e| format!("CSV parse error: {}", e)).and_then(convert_csv_record) {
                Ok(operation) => batch.push(operation),
                Err(e) => {
                    self.skipped += 1;
                    tracing::warn!(line = self.line_num, error = %e, "skipping unparseable row");
                }
            }
        }

        batch
    }

    /// Number of rows skipped so far because they could not be parsed
    pub fn skipped(&self) -> usize {
        self.skipped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::io::Cursor;
    use rust_decimal::Decimal;

    const HEADER: &str = "type,account,counterparty,amount,customer,kind\n";

    fn reader_over(rows: &str) -> AsyncReader<Cursor<Vec<u8>>> {
        let content = format!("{}{}", HEADER, rows);
        AsyncReader::new(Cursor::new(content.into_bytes()))
    }

    #[tokio::test]
    async fn test_async_reader_multiple_batches() {
        let mut async_reader = reader_over(
            "deposit,A1,,100.0,,\n\
             deposit,A2,,200.0,,\n\
             deposit,A3,,300.0,,\n\
             deposit,A4,,400.0,,\n\
             deposit,A5,,500.0,,\n",
        );

        let batch1 = async_reader.read_batch(2).await;
        assert_eq!(batch1.len(), 2);
        assert_eq!(batch1[0].primary_account(), "A1");
        assert_eq!(batch1[1].primary_account(), "A2");

        let batch2 = async_reader.read_batch(2).await;
        assert_eq!(batch2.len(), 2);
        assert_eq!(batch2[0].primary_account(), "A3");

        let batch3 = async_reader.read_batch(2).await;
        assert_eq!(batch3.len(), 1);
        assert_eq!(batch3[0].primary_account(), "A5");

        assert!(async_reader.read_batch(2).await.is_empty());
    }

    #[tokio::test]
    async fn test_async_reader_empty_csv() {
        let mut async_reader = reader_over("");

        assert!(async_reader.read_batch(10).await.is_empty());
        assert_eq!(async_reader.skipped(), 0);
    }

    #[tokio::test]
    async fn test_async_reader_skips_and_counts_invalid_rows() {
        let mut async_reader = reader_over(
            "refund,A1,,100.0,,\n\
             deposit,A1,,abc,,\n\
             transfer,A1,A2,50.0,,\n",
        );

        let batch = async_reader.read_batch(10).await;

        assert_eq!(
            batch,
            vec![LedgerOperation::Transfer {
                from: "A1".to_string(),
                to: "A2".to_string(),
                amount: Decimal::new(500, 1),
            }]
        );
        assert_eq!(async_reader.skipped(), 2);
    }

    #[tokio::test]
    async fn test_async_reader_whitespace_and_case() {
        let mut async_reader = reader_over("  DEPOSIT  ,  A1  ,, 100.0 ,,\nWithdrawal,A1,,1,,\n");

        let batch = async_reader.read_batch(10).await;

        assert_eq!(batch.len(), 2);
        assert_eq!(
            batch[0],
            LedgerOperation::Deposit {
                account: "A1".to_string(),
                amount: Decimal::new(1000, 1),
            }
        );
        assert_eq!(batch[1].name(), "withdraw");
    }
}
