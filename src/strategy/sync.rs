//! Synchronous processing strategy
//!
//! This module provides a single-threaded implementation of the
//! ProcessingStrategy trait. It streams rows with `SyncReader` and applies each
//! one through the engine before reading the next, so operations take effect
//! in exact file order.

use crate::core::TransactionEngine;
use crate::io::sync_reader::SyncReader;
use crate::strategy::{ProcessingReport, ProcessingStrategy};
use std::path::Path;
use std::sync::Arc;

/// Synchronous processing strategy
///
/// # Examples
///
/// ```no_run
/// use rust_bank_ledger::core::{InMemoryAccountStore, InMemoryCustomerDirectory, TransactionEngine};
/// use rust_bank_ledger::strategy::{ProcessingStrategy, SyncProcessingStrategy};
/// use std::path::Path;
/// use std::sync::Arc;
///
/// let engine = Arc::new(TransactionEngine::new(
///     Arc::new(InMemoryAccountStore::new()),
///     Arc::new(InMemoryCustomerDirectory::new()),
/// ));
/// let report = SyncProcessingStrategy
///     .process(&engine, Path::new("operations.csv"))
///     .expect("Processing failed");
/// println!("{} applied, {} rejected", report.applied, report.rejected);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct SyncProcessingStrategy;

impl ProcessingStrategy for SyncProcessingStrategy {
    fn process(
        &self,
        engine: &Arc<TransactionEngine>,
        input_path: &Path,
    ) -> Result<ProcessingReport, String> {
        let reader = SyncReader::new(input_path)?;
        let mut report = ProcessingReport::default();

        for row in reader {
            let result = row.and_then(|operation| {
                engine.execute(&operation).map_err(|e| {
                    format!(
                        "{} on account {} rejected: {}",
                        operation.name(),
                        operation.primary_account(),
                        e
                    )
                })
            });
            if let Err(e) = &result {
                tracing::warn!(error = %e, "skipping row");
            }
            report.record(&result);
        }

        tracing::info!(
            applied = report.applied,
            rejected = report.rejected,
            "sync processing finished"
        );
        Ok(report)
    }
}
