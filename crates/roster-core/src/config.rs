// Batch executor configuration
//
// Built once at process start and passed by reference; components never
// consult the environment after startup.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Tuning knobs for batch execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchConfig {
    /// Largest accepted batch size
    pub max_batch_size: usize,

    /// Upper bound on simultaneously active units of work
    pub concurrency: usize,

    /// Rows per chunk for chunked bulk writes (distinct from `concurrency`)
    pub write_chunk_size: usize,

    /// Per-item timeout. An item exceeding it is recorded as a timeout
    /// failure; siblings are unaffected.
    #[serde(with = "duration_secs")]
    pub item_timeout: Duration,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            max_batch_size: 10_000,
            concurrency: 8,
            write_chunk_size: 500,
            item_timeout: Duration::from_secs(10),
        }
    }
}

impl BatchConfig {
    /// Create configuration from environment variables, falling back to
    /// defaults for anything unset or unparsable
    pub fn from_env() -> Self {
        let base = Self::default();
        Self {
            max_batch_size: env_parse("BATCH_MAX_SIZE").unwrap_or(base.max_batch_size),
            concurrency: env_parse("BATCH_CONCURRENCY").unwrap_or(base.concurrency),
            write_chunk_size: env_parse("BATCH_WRITE_CHUNK").unwrap_or(base.write_chunk_size),
            item_timeout: env_parse("BATCH_ITEM_TIMEOUT_SECS")
                .map(Duration::from_secs)
                .unwrap_or(base.item_timeout),
        }
    }

    /// Set the largest accepted batch size
    pub fn with_max_batch_size(mut self, max: usize) -> Self {
        self.max_batch_size = max.max(1);
        self
    }

    /// Set the concurrency bound
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Set the chunk size for chunked bulk writes
    pub fn with_write_chunk_size(mut self, size: usize) -> Self {
        self.write_chunk_size = size.max(1);
        self
    }

    /// Set the per-item timeout
    pub fn with_item_timeout(mut self, timeout: Duration) -> Self {
        self.item_timeout = timeout;
        self
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.parse().ok())
}

/// Serde support for Duration as whole seconds
mod duration_secs {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        duration.as_secs().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = BatchConfig::default();
        assert_eq!(config.max_batch_size, 10_000);
        assert_eq!(config.concurrency, 8);
        assert_eq!(config.write_chunk_size, 500);
        assert_eq!(config.item_timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_config_builder() {
        let config = BatchConfig::default()
            .with_max_batch_size(100)
            .with_concurrency(4)
            .with_write_chunk_size(25)
            .with_item_timeout(Duration::from_millis(250));

        assert_eq!(config.max_batch_size, 100);
        assert_eq!(config.concurrency, 4);
        assert_eq!(config.write_chunk_size, 25);
        assert_eq!(config.item_timeout, Duration::from_millis(250));
    }

    #[test]
    fn test_builder_clamps_zero_values() {
        let config = BatchConfig::default()
            .with_concurrency(0)
            .with_write_chunk_size(0);
        assert_eq!(config.concurrency, 1);
        assert_eq!(config.write_chunk_size, 1);
    }
}
