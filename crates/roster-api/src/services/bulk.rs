// Bulk creation services
//
// Two write paths over the same executor:
// - create_blocking: one insert per item, dispatched across the bounded
//   blocking pool
// - create_batched: records grouped into fixed-size chunks, each chunk
//   written with a single insert_many call behind the thread hop

use std::sync::Arc;

use tracing::info;

use roster_core::{run_blocking, BatchError, BatchExecutor, BatchOutcome};
use roster_storage::{CreatePerson, PersonStore};

/// Summary returned by the bulk endpoints.
#[derive(Debug, Clone, Copy)]
pub struct BulkSummary {
    pub requested: usize,
    pub created: usize,
}

pub struct BulkService {
    store: Arc<PersonStore>,
    executor: Arc<BatchExecutor>,
}

/// Deterministic record for bulk-generated rows.
fn generated_person(index: usize) -> CreatePerson {
    CreatePerson {
        name: format!("person-{index}"),
        age: 18 + (index as i64 % 60),
    }
}

impl BulkService {
    pub fn new(store: Arc<PersonStore>, executor: Arc<BatchExecutor>) -> Self {
        Self { store, executor }
    }

    /// Offload mode: `count` independent single-row inserts, each on a
    /// blocking worker, at most `concurrency` in flight.
    pub async fn create_blocking(&self, count: usize) -> Result<BulkSummary, BatchError> {
        let store = Arc::clone(&self.store);
        let outcome = self
            .executor
            .run_blocking(count, move |index| {
                store.insert_one(&generated_person(index)).map(|row| row.id)
            })
            .await?;

        let summary = BulkSummary {
            requested: count,
            created: outcome.success_count(),
        };
        info!(
            requested = summary.requested,
            created = summary.created,
            failed = outcome.failure_count(),
            "pool-offload bulk insert complete"
        );
        Ok(summary)
    }

    /// Chunked mode: the batch is validated against the full record count,
    /// then grouped into `write_chunk_size` chunks fanned out
    /// cooperatively; each chunk hops onto a worker thread for one
    /// insert_many call.
    pub async fn create_batched(&self, count: usize) -> Result<BulkSummary, BatchError> {
        self.executor.validate_count(count)?;

        let chunk_size = self.executor.config().write_chunk_size.max(1);
        let chunks: Vec<(usize, usize)> = (0..count)
            .step_by(chunk_size)
            .map(|start| (start, chunk_size.min(count - start)))
            .collect();

        let store = &self.store;
        let outcome: BatchOutcome<usize> = self
            .executor
            .run_fanout(chunks.len(), |chunk_index| {
                let store = Arc::clone(store);
                let (start, len) = chunks[chunk_index];
                async move {
                    let records: Vec<CreatePerson> =
                        (start..start + len).map(generated_person).collect();
                    let written =
                        run_blocking(move || store.insert_many(&records, len)).await??;
                    Ok(written)
                }
            })
            .await?;

        let summary = BulkSummary {
            requested: count,
            created: outcome.succeeded.iter().map(|s| s.value).sum(),
        };
        info!(
            requested = summary.requested,
            created = summary.created,
            chunks = chunks.len(),
            chunk_size,
            "chunked bulk insert complete"
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roster_core::BatchConfig;

    fn service(chunk_size: usize) -> (Arc<PersonStore>, BulkService) {
        let store = Arc::new(PersonStore::open_in_memory().unwrap());
        let executor = Arc::new(BatchExecutor::new(
            BatchConfig::default()
                .with_concurrency(4)
                .with_write_chunk_size(chunk_size),
        ));
        (store.clone(), BulkService::new(store, executor))
    }

    #[tokio::test]
    async fn blocking_creates_exactly_count_rows() {
        let (store, service) = service(500);
        let summary = service.create_blocking(25).await.unwrap();

        assert_eq!(summary.requested, 25);
        assert_eq!(summary.created, 25);
        assert_eq!(store.count().unwrap(), 25);
    }

    #[tokio::test]
    async fn batched_total_is_unaffected_by_chunking() {
        let (store, service) = service(5);
        let summary = service.create_batched(23).await.unwrap();

        assert_eq!(summary.requested, 23);
        assert_eq!(summary.created, 23);
        assert_eq!(store.count().unwrap(), 23);
    }

    #[tokio::test]
    async fn batched_validates_the_record_count_not_the_chunk_count() {
        let (store, service) = service(5);
        // 20_001 records would only be 4_001 chunks; the full count must
        // still be rejected.
        let result = service.create_batched(20_001).await;
        assert!(matches!(result, Err(BatchError::InvalidInput(_))));
        assert_eq!(store.count().unwrap(), 0);
    }

    #[tokio::test]
    async fn generated_rows_are_deterministic() {
        let first = generated_person(3);
        let second = generated_person(3);
        assert_eq!(first.name, second.name);
        assert_eq!(first.age, second.age);
        assert_eq!(first.name, "person-3");
    }
}
