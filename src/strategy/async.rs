//! Asynchronous batch processing strategy
//!
//! This module provides a multi-threaded implementation of the
//! ProcessingStrategy trait. It reads operations in batches and applies each
//! batch with account-based partitioning.
//!
//! # Architecture
//!
//! ```text
//! AsyncProcessingStrategy
//!     ├── BatchConfig (batch_size, max_concurrent_batches)
//!     ├── AsyncReader (batch CSV reading)
//!     └── BatchProcessor (account partitioning + blocking tasks)
//!         └── Arc<TransactionEngine> (per-account locks)
//! ```
//!
//! Batches are processed one after the other: a batch is read only after the
//! previous one has been fully applied. Within a batch, groups of operations
//! that share no account run on tokio's blocking pool, which is capped at
//! `max_concurrent_batches` threads.

use crate::core::{BatchProcessor, TransactionEngine};
use crate::io::async_reader::AsyncReader;
use crate::strategy::{ProcessingReport, ProcessingStrategy};
use std::path::Path;
use std::sync::Arc;

/// Configuration for batch processing
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BatchConfig {
    /// Number of operations per batch
    pub batch_size: usize,
    /// Maximum number of partitions applied concurrently
    pub max_concurrent_batches: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            batch_size: 1000,
            max_concurrent_batches: num_cpus::get(),
        }
    }
}

impl BatchConfig {
    /// Create a new BatchConfig with custom values
    ///
    /// Zero values fall back to the defaults with a warning.
    pub fn new(batch_size: usize, max_concurrent_batches: usize) -> Self {
        let default = Self::default();

        let batch_size = if batch_size == 0 {
            tracing::warn!(
                batch_size,
                fallback = default.batch_size,
                "invalid batch size, using default"
            );
            default.batch_size
        } else {
            batch_size
        };

        let max_concurrent_batches = if max_concurrent_batches == 0 {
            tracing::warn!(
                max_concurrent_batches,
                fallback = default.max_concurrent_batches,
                "invalid concurrency limit, using default"
            );
            default.max_concurrent_batches
        } else {
            max_concurrent_batches
        };

        Self {
            batch_size,
            max_concurrent_batches,
        }
    }
}

/// Asynchronous batch processing strategy
#[derive(Debug, Clone)]
pub struct AsyncProcessingStrategy {
    config: BatchConfig,
}

impl AsyncProcessingStrategy {
    pub fn new(config: BatchConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &BatchConfig {
        &self.config
    }
}

impl ProcessingStrategy for AsyncProcessingStrategy {
    /// Apply every operation in `input_path` in batches
    ///
    /// 1. Creates a tokio multi-threaded runtime
    /// 2. Reads operations in batches with AsyncReader
    /// 3. Applies each batch through a BatchProcessor and waits for it to finish
    ///    before reading the next one
    fn process(
        &self,
        engine: &Arc<TransactionEngine>,
        input_path: &Path,
    ) -> Result<ProcessingReport, String> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(self.config.max_concurrent_batches)
            .max_blocking_threads(self.config.max_concurrent_batches)
            .build()
            .map_err(|e| format!("Failed to create tokio runtime: {}", e))?;

        runtime.block_on(async {
            let processor = BatchProcessor::new(Arc::clone(engine));

            let file = tokio::fs::File::open(input_path)
                .await
                .map_err(|e| format!("Failed to open file '{}': {}", input_path.display(), e))?;

            // csv-async reads through the futures-io traits
            let compat_file = tokio_util::compat::TokioAsyncReadCompatExt::compat(file);
            let mut reader = AsyncReader::new(compat_file);
            let mut report = ProcessingReport::default();

            loop {
                let batch = reader.read_batch(self.config.batch_size).await;
                if batch.is_empty() {
                    break;
                }

                for outcome in processor.process_batch(batch).await {
                    report.record(&outcome.result);
                }
            }
            report.rejected += reader.skipped();

            tracing::info!(
                applied = report.applied,
                rejected = report.rejected,
                "async processing finished"
            );
            Ok(report)
        })
    }
}
