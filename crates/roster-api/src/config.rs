// Server configuration
//
// Read once at startup and passed by reference; handlers never consult
// the environment directly.

use roster_core::BatchConfig;

/// Fixed default target set for the fan-out endpoint.
const DEFAULT_FANOUT_TARGETS: &[&str] = &[
    "https://httpbin.org/get",
    "https://example.com/",
    "https://www.rust-lang.org/",
];

#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (`ROSTER_ADDR`, default 0.0.0.0:9000)
    pub addr: String,
    /// SQLite database path (`ROSTER_DB`); in-memory when unset
    pub db_path: Option<String>,
    /// Optional route prefix (`API_PREFIX`, e.g. "/api")
    pub api_prefix: String,
    /// Allowed CORS origins (`CORS_ALLOWED_ORIGINS`, comma-separated)
    pub cors_origins: Vec<String>,
    /// Fan-out fetch targets (`FANOUT_TARGETS`, comma-separated)
    pub fanout_targets: Vec<String>,
    /// Batch executor tuning
    pub batch: BatchConfig,
}

impl ServerConfig {
    /// Create configuration from environment variables
    pub fn from_env() -> Self {
        let fanout_targets = {
            let configured = split_csv(std::env::var("FANOUT_TARGETS").ok());
            if configured.is_empty() {
                DEFAULT_FANOUT_TARGETS.iter().map(|s| s.to_string()).collect()
            } else {
                configured
            }
        };

        Self {
            addr: std::env::var("ROSTER_ADDR").unwrap_or_else(|_| "0.0.0.0:9000".to_string()),
            db_path: std::env::var("ROSTER_DB").ok().filter(|s| !s.is_empty()),
            api_prefix: std::env::var("API_PREFIX").unwrap_or_default(),
            cors_origins: split_csv(std::env::var("CORS_ALLOWED_ORIGINS").ok()),
            fanout_targets,
            batch: BatchConfig::from_env(),
        }
    }
}

fn split_csv(raw: Option<String>) -> Vec<String> {
    raw.map(|s| {
        s.split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_csv_trims_and_drops_empties() {
        let parts = split_csv(Some(" a.example.com , ,b.example.com".to_string()));
        assert_eq!(parts, vec!["a.example.com", "b.example.com"]);
    }

    #[test]
    fn split_csv_handles_unset() {
        assert!(split_csv(None).is_empty());
    }
}
