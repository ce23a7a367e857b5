//! Batch processing with account-based partitioning
//!
//! This module provides the `BatchProcessor` struct, which applies a batch of
//! operations with as much parallelism as the ordering rules allow.
//!
//! # Ordering
//!
//! Two operations depend on each other when they touch a common account,
//! either as the account of an open, deposit or withdrawal, or as either side
//! of a transfer. A batch is split into the connected groups of that relation:
//! every group runs sequentially in file order on its own blocking task, and
//! different groups run in parallel.
//!
//! Groups share no account, so the final state of a batch is the same as
//! applying it in file order on one thread, and an operation that precedes its
//! account's `open` in the file fails the same way it does sequentially.

use std::collections::HashMap;
use std::sync::Arc;

use crate::core::engine::TransactionEngine;
use crate::types::{AccountId, LedgerError, LedgerOperation};

/// Outcome of applying a single operation
#[derive(Debug, Clone)]
pub struct ProcessingResult {
    /// The operation that was applied
    pub operation: LedgerOperation,

    /// The result of applying it
    pub result: Result<(), LedgerError>,
}

/// Batch processor with account-based partitioning
///
/// Cheap to clone; clones share the same engine.
#[derive(Clone)]
pub struct BatchProcessor {
    engine: Arc<TransactionEngine>,
}

impl BatchProcessor {
    pub fn new(engine: Arc<TransactionEngine>) -> Self {
        Self { engine }
    }

    /// Split a batch into groups of operations that share no account
    ///
    /// Each operation lands in exactly one group, groups are listed in order of
    /// their first operation, and every group keeps the original relative order
    /// of its operations.
    pub fn partition_by_account(&self, batch: Vec<LedgerOperation>) -> Vec<Vec<LedgerOperation>> {
        let mut groups = AccountGroups::default();
        let nodes: Vec<usize> = batch
            .iter()
            .map(|operation| {
                let ids: Vec<usize> = operation
                    .accounts()
                    .into_iter()
                    .map(|account| groups.node(account))
                    .collect();
                for pair in ids.windows(2) {
                    groups.union(pair[0], pair[1]);
                }
                ids[0]
            })
            .collect();

        let mut slots: HashMap<usize, usize> = HashMap::new();
        let mut partitions: Vec<Vec<LedgerOperation>> = Vec::new();
        for (operation, node) in batch.into_iter().zip(nodes) {
            let root = groups.root(node);
            let slot = *slots.entry(root).or_insert_with(|| {
                partitions.push(Vec::new());
                partitions.len() - 1
            });
            partitions[slot].push(operation);
        }

        partitions
    }

    /// Apply operations one after the other on the current thread
    ///
    /// Every operation is attempted; failures are recorded in the results and
    /// logged, never propagated.
    pub fn apply_sequentially(&self, operations: Vec<LedgerOperation>) -> Vec<ProcessingResult> {
        operations
            .into_iter()
            .map(|operation| {
                let result = self.engine.execute(&operation);
                if let Err(e) = &result {
                    tracing::warn!(
                        operation = operation.name(),
                        account = operation.primary_account(),
                        error = %e,
                        "operation rejected"
                    );
                }
                ProcessingResult { operation, result }
            })
            .collect()
    }

    /// Apply a batch and wait for every operation in it to finish
    ///
    /// Results are grouped by partition, in order of each partition's first
    /// operation.
    pub async fn process_batch(&self, batch: Vec<LedgerOperation>) -> Vec<ProcessingResult> {
        let partitions = self.partition_by_account(batch);

        let mut tasks = Vec::with_capacity(partitions.len());
        for operations in partitions {
            let processor = self.clone();
            tasks.push(tokio::task::spawn_blocking(move || {
                processor.apply_sequentially(operations)
            }));
        }

        let mut results = Vec::new();
        for task in tasks {
            match task.await {
                Ok(partition_results) => results.extend(partition_results),
                Err(e) => tracing::error!(error = %e, "partition task failed"),
            }
        }

        results
    }
}

/// Union-find over the account ids seen in one batch
#[derive(Debug, Default)]
struct AccountGroups {
    nodes: HashMap<AccountId, usize>,
    parent: Vec<usize>,
}

impl AccountGroups {
    fn node(&mut self, account: &str) -> usize {
        if let Some(&node) = self.nodes.get(account) {
            return node;
        }
        let node = self.parent.len();
        self.parent.push(node);
        self.nodes.insert(account.to_string(), node);
        node
    }

    fn root(&mut self, mut node: usize) -> usize {
        while self.parent[node] != node {
            // path halving
            self.parent[node] = self.parent[self.parent[node]];
            node = self.parent[node];
        }
        node
    }

    fn union(&mut self, a: usize, b: usize) {
        let (root_a, root_b) = (self.root(a), self.root(b));
        if root_a != root_b {
            self.parent[root_b] = root_a;
        }
    }
}
