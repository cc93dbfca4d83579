// Aggregated outcome of one batch call

use crate::error::ItemError;

/// A unit of work that completed successfully.
#[derive(Debug, Clone)]
pub struct ItemSuccess<T> {
    /// Submission index of the item within the batch
    pub index: usize,
    /// Value produced by the unit of work
    pub value: T,
}

/// A unit of work that failed in isolation.
#[derive(Debug, Clone)]
pub struct ItemFailure {
    /// Submission index of the item within the batch
    pub index: usize,
    /// What went wrong for this item only
    pub error: ItemError,
}

/// Aggregate result of one batch call.
///
/// `succeeded` and `failed` are in the order results were observed
/// completing, not submission order. Indices are carried on every entry;
/// callers that need deterministic order re-sort with [`sort_by_index`].
///
/// Constructed once every item has resolved, immutable afterwards, and
/// discarded with the call. The aggregate itself is never persisted.
///
/// [`sort_by_index`]: BatchOutcome::sort_by_index
#[derive(Debug)]
pub struct BatchOutcome<T> {
    /// Number of items submitted
    pub total: usize,
    /// Completed items, completion order
    pub succeeded: Vec<ItemSuccess<T>>,
    /// Failed items, completion order
    pub failed: Vec<ItemFailure>,
}

impl<T> BatchOutcome<T> {
    pub(crate) fn with_capacity(total: usize) -> Self {
        Self {
            total,
            succeeded: Vec::with_capacity(total),
            failed: Vec::new(),
        }
    }

    pub(crate) fn record(&mut self, index: usize, result: Result<T, ItemError>) {
        match result {
            Ok(value) => self.succeeded.push(ItemSuccess { index, value }),
            Err(error) => self.failed.push(ItemFailure { index, error }),
        }
    }

    /// Number of items that completed successfully
    pub fn success_count(&self) -> usize {
        self.succeeded.len()
    }

    /// Number of items that failed
    pub fn failure_count(&self) -> usize {
        self.failed.len()
    }

    /// True when every item resolved one way or the other
    pub fn is_complete(&self) -> bool {
        self.succeeded.len() + self.failed.len() == self.total
    }

    /// Re-sort both sequences into submission order
    pub fn sort_by_index(&mut self) {
        self.succeeded.sort_by_key(|s| s.index);
        self.failed.sort_by_key(|f| f.index);
    }
}
