// Bounded-concurrency batch execution
//
// Two modes, matched to the workload:
// - run_blocking: synchronous units offloaded onto the blocking worker pool
// - run_fanout: I/O-bound units interleaved on the calling task
//
// In both modes one item's failure is isolated into its own slot of the
// outcome; the batch always runs to completion unless the input was
// rejected up front or the runtime itself is unavailable.

use std::future::Future;
use std::sync::Arc;

use futures::stream::{self, StreamExt};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::debug;

use crate::batch::BatchOutcome;
use crate::config::BatchConfig;
use crate::error::{BatchError, ItemError};

/// Executes one batch of independent work items under a concurrency bound.
///
/// The executor owns no threads of its own; the worker pool and in-flight
/// result buffer live only for the duration of a single call, so there is
/// no cross-request pooling to tear down.
#[derive(Debug, Clone)]
pub struct BatchExecutor {
    config: BatchConfig,
}

impl BatchExecutor {
    /// Create an executor with the given tuning
    pub fn new(config: BatchConfig) -> Self {
        Self { config }
    }

    /// Access the executor's configuration
    pub fn config(&self) -> &BatchConfig {
        &self.config
    }

    /// Reject counts outside `[1, max_batch_size]` before any work starts
    pub fn validate_count(&self, count: usize) -> Result<(), BatchError> {
        if count == 0 {
            return Err(BatchError::invalid("count must be at least 1"));
        }
        if count > self.config.max_batch_size {
            return Err(BatchError::invalid(format!(
                "count {} exceeds maximum of {}",
                count, self.config.max_batch_size
            )));
        }
        Ok(())
    }

    /// Blocking-offload mode: each item runs `work` on the blocking worker
    /// pool, at most `concurrency` at a time. Submissions beyond that width
    /// queue until a slot frees. Results are collected as they complete,
    /// not in submission order.
    pub async fn run_blocking<T, F>(
        &self,
        count: usize,
        work: F,
    ) -> Result<BatchOutcome<T>, BatchError>
    where
        T: Send + 'static,
        F: Fn(usize) -> anyhow::Result<T> + Send + Sync + 'static,
    {
        self.validate_count(count)?;

        let semaphore = Arc::new(Semaphore::new(self.config.concurrency));
        let work = Arc::new(work);
        let timeout = self.config.item_timeout;
        let mut tasks = JoinSet::new();

        for index in 0..count {
            let permit = semaphore
                .clone()
                .acquire_owned()
                .await
                .map_err(|e| BatchError::systemic(format!("worker pool closed: {e}")))?;
            let work = Arc::clone(&work);

            tasks.spawn(async move {
                let handle = tokio::task::spawn_blocking(move || work(index));
                let result = match tokio::time::timeout(timeout, handle).await {
                    // The abandoned closure finishes on its pool thread;
                    // only this await gives up on it.
                    Err(_) => Err(ItemError::Timeout),
                    Ok(Err(join)) => Err(ItemError::Failed(join.to_string())),
                    Ok(Ok(Err(e))) => Err(ItemError::Failed(e.to_string())),
                    Ok(Ok(Ok(value))) => Ok(value),
                };
                drop(permit);
                (index, result)
            });
        }

        let mut outcome = BatchOutcome::with_capacity(count);
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, result)) => outcome.record(index, result),
                Err(e) => {
                    return Err(BatchError::systemic(format!("collector task failed: {e}")))
                }
            }
        }

        debug!(
            total = count,
            succeeded = outcome.success_count(),
            failed = outcome.failure_count(),
            "blocking batch complete"
        );
        Ok(outcome)
    }

    /// Cooperative async-fanout mode: all items are driven concurrently on
    /// the calling task, at most `concurrency` in flight. Nothing is
    /// spawned; suspension happens at each item's await points, and the
    /// interleaving order is scheduler-determined.
    pub async fn run_fanout<T, F, Fut>(
        &self,
        count: usize,
        work: F,
    ) -> Result<BatchOutcome<T>, BatchError>
    where
        F: Fn(usize) -> Fut,
        Fut: Future<Output = anyhow::Result<T>>,
    {
        self.validate_count(count)?;

        let timeout = self.config.item_timeout;
        let results: Vec<(usize, Result<T, ItemError>)> = stream::iter(0..count)
            .map(|index| {
                let fut = work(index);
                async move {
                    let result = match tokio::time::timeout(timeout, fut).await {
                        Err(_) => Err(ItemError::Timeout),
                        Ok(Err(e)) => Err(ItemError::Failed(e.to_string())),
                        Ok(Ok(value)) => Ok(value),
                    };
                    (index, result)
                }
            })
            .buffer_unordered(self.config.concurrency.max(1))
            .collect()
            .await;

        let mut outcome = BatchOutcome::with_capacity(count);
        for (index, result) in results {
            outcome.record(index, result);
        }

        debug!(
            total = count,
            succeeded = outcome.success_count(),
            failed = outcome.failure_count(),
            "fanout batch complete"
        );
        Ok(outcome)
    }
}
