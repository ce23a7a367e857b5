//! Processing strategy module for operation files
//!
//! This module defines the Strategy pattern for complete processing pipelines,
//! covering both CSV parsing and applying operations through the transaction
//! engine. This allows different processing implementations (synchronous,
//! asynchronous batch) to be selected at runtime.

use crate::cli::StrategyType;
use crate::core::TransactionEngine;
use std::path::Path;
use std::sync::Arc;

pub mod r#async;
pub mod sync;

pub use self::r#async::{AsyncProcessingStrategy, BatchConfig};
pub use sync::SyncProcessingStrategy;

/// Counts of what happened to the rows of an operations file
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProcessingReport {
    /// Operations the engine applied
    pub applied: usize,
    /// Rows that failed to parse or that the engine rejected
    pub rejected: usize,
}

impl ProcessingReport {
    pub fn record<T, E>(&mut self, result: &Result<T, E>) {
        if result.is_ok() {
            self.applied += 1;
        } else {
            self.rejected += 1;
        }
    }
}

/// Processing strategy trait for complete operation pipelines
///
/// Each strategy reads operations from a CSV file and applies them through the
/// shared engine.
pub trait ProcessingStrategy: Send + Sync {
    /// Apply every operation in `input_path`
    ///
    /// # Returns
    ///
    /// * `Ok(ProcessingReport)` once the whole file has been read, even if some
    ///   rows were rejected
    /// * `Err(String)` if a fatal error occurred (file not found, runtime error)
    ///
    /// Individual row failures are logged and counted but do not stop
    /// processing.
    fn process(
        &self,
        engine: &Arc<TransactionEngine>,
        input_path: &Path,
    ) -> Result<ProcessingReport, String>;
}

/// Create a processing strategy based on the specified strategy type
///
/// `config` is only used by the async strategy; `None` selects the defaults.
pub fn create_strategy(
    strategy_type: StrategyType,
    config: Option<BatchConfig>,
) -> Box<dyn ProcessingStrategy> {
    match strategy_type {
        StrategyType::Sync => Box::new(SyncProcessingStrategy),
        StrategyType::Async => Box::new(AsyncProcessingStrategy::new(config.unwrap_or_default())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_counts_outcomes() {
        let mut report = ProcessingReport::default();

        report.record::<(), String>(&Ok(()));
        report.record::<(), String>(&Err("bad row".to_string()));
        report.record::<(), String>(&Ok(()));

        assert_eq!(
            report,
            ProcessingReport {
                applied: 2,
                rejected: 1
            }
        );
    }
}
