//! Client configuration

/// Default REST prefix of the asset backend
pub const DEFAULT_API_PREFIX: &str = "/api/v1";

/// Client configuration for connecting to the asset backend
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Server base URL (e.g., "http://localhost:8080")
    pub base_url: String,

    /// Path prefix every resource lives under
    pub api_prefix: String,

    /// Request timeout in seconds; `None` waits indefinitely
    pub timeout: Option<u64>,
}

impl ClientConfig {
    /// Create a new client configuration
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_prefix: DEFAULT_API_PREFIX.to_string(),
            timeout: None,
        }
    }

    /// Set the API prefix
    pub fn with_api_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.api_prefix = prefix.into();
        self
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout = Some(seconds);
        self
    }

    /// Base URL and prefix joined, without a trailing slash
    pub fn api_root(&self) -> String {
        let base = self.base_url.trim_end_matches('/');
        let prefix = self.api_prefix.trim_matches('/');
        if prefix.is_empty() {
            base.to_string()
        } else {
            format!("{base}/{prefix}")
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new("http://localhost:8080")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_root_normalizes_slashes() {
        let config = ClientConfig::new("http://city.local/").with_api_prefix("/api/v1/");
        assert_eq!(config.api_root(), "http://city.local/api/v1");
    }

    #[test]
    fn test_empty_prefix() {
        let config = ClientConfig::new("http://city.local").with_api_prefix("");
        assert_eq!(config.api_root(), "http://city.local");
    }

    #[test]
    fn test_no_timeout_by_default() {
        assert!(ClientConfig::default().timeout.is_none());
        assert_eq!(ClientConfig::default().with_timeout(5).timeout, Some(5));
    }
}
