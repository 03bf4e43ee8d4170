// Configuration module

use std::path::Path;
use std::time::Duration;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_API_BASE_URL, DEFAULT_CACHE_TTL_MS, DEFAULT_REQUEST_TIMEOUT_MS};

fn default_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

fn default_request_timeout_ms() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_MS
}

fn default_cache_ttl_ms() -> u64 {
    DEFAULT_CACHE_TTL_MS
}

/// Client configuration for the catalog data layer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Catalog API base URL
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Bearer token sent in the `Authorization` header.
    /// Usually provided via `${TMDB_API_TOKEN}` substitution.
    pub api_token: String,

    /// Per-request deadline in milliseconds (default: 10000)
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,

    /// Cache entry time-to-live in milliseconds (default: 300000)
    #[serde(default = "default_cache_ttl_ms")]
    pub cache_ttl_ms: u64,
}

impl ClientConfig {
    /// Build a config from a bearer token with all other fields defaulted
    pub fn with_token(api_token: impl Into<String>) -> Self {
        Self {
            base_url: default_base_url(),
            api_token: api_token.into(),
            request_timeout_ms: default_request_timeout_ms(),
            cache_ttl_ms: default_cache_ttl_ms(),
        }
    }

    /// Parse YAML with `${VAR_NAME}` environment variable substitution
    pub fn from_yaml_with_env(yaml: &str) -> Result<Self, String> {
        let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").map_err(|e| e.to_string())?;

        // First, check that all referenced environment variables exist
        for caps in re.captures_iter(yaml) {
            let var_name = &caps[1];
            std::env::var(var_name).map_err(|_| {
                format!(
                    "Environment variable '{}' is referenced but not set",
                    var_name
                )
            })?;
        }

        // Now perform the substitution (we know all vars exist)
        let substituted = re.replace_all(yaml, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap() // Safe because we checked above
        });

        let config: ClientConfig =
            serde_yaml::from_str(&substituted).map_err(|e| e.to_string())?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let yaml = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file: {}", e))?;
        Self::from_yaml_with_env(&yaml)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.base_url.is_empty() {
            return Err("base_url cannot be empty".to_string());
        }
        if self.api_token.is_empty() {
            return Err("api_token cannot be empty".to_string());
        }
        if self.request_timeout_ms == 0 {
            return Err("request_timeout_ms must be greater than 0".to_string());
        }
        if self.cache_ttl_ms == 0 {
            return Err("cache_ttl_ms must be greater than 0".to_string());
        }
        Ok(())
    }

    /// Per-request deadline as a Duration
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    /// Cache TTL as a Duration
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_millis(self.cache_ttl_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_token_applies_defaults() {
        let config = ClientConfig::with_token("secret");
        assert_eq!(config.base_url, DEFAULT_API_BASE_URL);
        assert_eq!(config.api_token, "secret");
        assert_eq!(config.request_timeout_ms, 10_000);
        assert_eq!(config.cache_ttl_ms, 300_000);
    }

    #[test]
    fn test_from_yaml_applies_serde_defaults() {
        let yaml = r#"
api_token: abc123
"#;
        let config = ClientConfig::from_yaml_with_env(yaml).unwrap();
        assert_eq!(config.base_url, DEFAULT_API_BASE_URL);
        assert_eq!(config.request_timeout_ms, 10_000);
        assert_eq!(config.cache_ttl_ms, 300_000);
    }

    #[test]
    fn test_from_yaml_with_explicit_values() {
        let yaml = r#"
base_url: https://example.test/3
api_token: abc123
request_timeout_ms: 5000
cache_ttl_ms: 60000
"#;
        let config = ClientConfig::from_yaml_with_env(yaml).unwrap();
        assert_eq!(config.base_url, "https://example.test/3");
        assert_eq!(config.request_timeout_ms, 5000);
        assert_eq!(config.cache_ttl(), Duration::from_secs(60));
    }

    #[test]
    fn test_env_substitution_replaces_token() {
        std::env::set_var("CINECACHE_TEST_TOKEN", "from-env");
        let yaml = r#"
api_token: ${CINECACHE_TEST_TOKEN}
"#;
        let config = ClientConfig::from_yaml_with_env(yaml).unwrap();
        assert_eq!(config.api_token, "from-env");
    }

    #[test]
    fn test_env_substitution_fails_for_missing_variable() {
        let yaml = r#"
api_token: ${CINECACHE_TEST_MISSING_VAR}
"#;
        let result = ClientConfig::from_yaml_with_env(yaml);
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("CINECACHE_TEST_MISSING_VAR"));
    }

    #[test]
    fn test_validate_rejects_empty_token() {
        let mut config = ClientConfig::with_token("x");
        config.api_token = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_timeout() {
        let mut config = ClientConfig::with_token("x");
        config.request_timeout_ms = 0;
        assert!(config.validate().is_err());
    }
}
