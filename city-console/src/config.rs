use std::path::PathBuf;
use std::time::Duration;

use city_client::ClientConfig;

use crate::reconcile::ReconcileConfig;

/// Console configuration
///
/// # Environment variables
///
/// | Variable | Default | Meaning |
/// |----------|---------|---------|
/// | CITY_API_URL | http://localhost:3000 | Backend base URL |
/// | CITY_API_PREFIX | /api/v1 | API path prefix |
/// | CITY_API_TIMEOUT_SECS | (none) | Request timeout; unset waits indefinitely |
/// | CITY_SESSION_FILE | .city-session.json | Persisted session (token, redirect) |
/// | CITY_RECONCILE_BATCH_SIZE | 5 | Schedules created concurrently per batch |
/// | CITY_RECONCILE_DELAY_MS | 500 | Pause between batches |
/// | LOG_LEVEL | (none) | Overrides the default log filter |
/// | LOG_DIR | (none) | Also write daily rolling log files here |
#[derive(Debug, Clone)]
pub struct ConsoleConfig {
    pub api_url: String,
    pub api_prefix: String,
    pub api_timeout_secs: Option<u64>,
    pub session_file: PathBuf,
    pub reconcile_batch_size: usize,
    pub reconcile_delay_ms: u64,
    pub log_level: Option<String>,
    pub log_dir: Option<String>,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

impl ConsoleConfig {
    /// Load from the process environment, falling back to defaults
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            api_url: var("CITY_API_URL").unwrap_or_else(|| "http://localhost:3000".into()),
            api_prefix: var("CITY_API_PREFIX").unwrap_or_else(|| "/api/v1".into()),
            api_timeout_secs: var("CITY_API_TIMEOUT_SECS").and_then(|v| v.parse().ok()),
            session_file: var("CITY_SESSION_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(".city-session.json")),
            reconcile_batch_size: var("CITY_RECONCILE_BATCH_SIZE")
                .and_then(|v| v.parse().ok())
                .filter(|n| *n > 0)
                .unwrap_or(5),
            reconcile_delay_ms: var("CITY_RECONCILE_DELAY_MS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(500),
            log_level: var("LOG_LEVEL").filter(|v| !v.trim().is_empty()),
            log_dir: var("LOG_DIR").filter(|v| !v.trim().is_empty()),
        }
    }

    pub fn client_config(&self) -> ClientConfig {
        let config = ClientConfig::new(&self.api_url).with_api_prefix(&self.api_prefix);
        match self.api_timeout_secs {
            Some(secs) => config.with_timeout(secs),
            None => config,
        }
    }

    pub fn reconcile_config(&self) -> ReconcileConfig {
        ReconcileConfig {
            batch_size: self.reconcile_batch_size,
            batch_delay: Duration::from_millis(self.reconcile_delay_ms),
            ..ReconcileConfig::default()
        }
    }
}
