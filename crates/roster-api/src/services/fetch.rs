// Outbound HTTP fan-out
//
// All targets are fetched concurrently on the calling task; the store is
// never involved, so no thread hop is needed here.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;
use utoipa::ToSchema;

use roster_core::{BatchError, BatchExecutor, ItemError};

/// Per-URL outcome embedded in the fan-out response.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FetchEntry {
    /// Target that was fetched.
    pub url: String,
    /// HTTP status when the request completed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    /// Failure description when it did not.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

pub struct FetchService {
    targets: Vec<String>,
    executor: Arc<BatchExecutor>,
}

impl FetchService {
    pub fn new(targets: Vec<String>, executor: Arc<BatchExecutor>) -> Self {
        Self { targets, executor }
    }

    pub fn targets(&self) -> &[String] {
        &self.targets
    }

    /// Fetches every configured target concurrently. One client is
    /// acquired per batch and dropped on return, on every exit path.
    /// Failures are embedded per entry, never raised; entries come back
    /// in target order.
    pub async fn fanout(&self) -> Result<Vec<FetchEntry>, BatchError> {
        if self.targets.is_empty() {
            return Ok(Vec::new());
        }

        let client = reqwest::Client::new();
        let targets = &self.targets;
        let outcome = self
            .executor
            .run_fanout(targets.len(), |index| {
                let client = client.clone();
                let url = targets[index].clone();
                async move {
                    let response = client.get(&url).send().await?;
                    Ok(response.status().as_u16())
                }
            })
            .await?;

        debug!(
            targets = targets.len(),
            succeeded = outcome.success_count(),
            failed = outcome.failure_count(),
            "fanout fetch complete"
        );

        // Completion order is scheduler-determined; rebuild target order
        // from the carried indices.
        let mut by_index: Vec<Option<FetchEntry>> = (0..targets.len()).map(|_| None).collect();
        for success in outcome.succeeded {
            by_index[success.index] = Some(FetchEntry {
                url: targets[success.index].clone(),
                status: Some(success.value),
                error: None,
            });
        }
        for failure in outcome.failed {
            let error = match failure.error {
                ItemError::Timeout => "request timed out".to_string(),
                ItemError::Failed(msg) => msg,
            };
            by_index[failure.index] = Some(FetchEntry {
                url: targets[failure.index].clone(),
                status: None,
                error: Some(error),
            });
        }

        Ok(by_index.into_iter().flatten().collect())
    }
}
