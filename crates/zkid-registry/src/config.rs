//! Hosted circuit registry configuration.
//!
//! Defaults point at the public zkPassport circuit host. Override via
//! environment variables or explicit construction for staging/testing.

use url::Url;

/// Default host serving packaged circuits.
pub const DEFAULT_CIRCUITS_URL: &str = "https://circuits.zkpassport.id";

/// Default per-lookup timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Configuration for the hosted circuit registry.
#[derive(Debug, Clone)]
pub struct RegistryConfig {
    /// Base URL of the circuit host.
    /// Default: <https://circuits.zkpassport.id>
    pub circuits_url: Url,
    /// Per-lookup timeout in seconds. Lookups are never retried here.
    pub timeout_secs: u64,
}

impl RegistryConfig {
    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `ZKID_CIRCUITS_URL` (default: `https://circuits.zkpassport.id`)
    /// - `ZKID_REGISTRY_TIMEOUT_SECS` (default: 10)
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            circuits_url: env_url("ZKID_CIRCUITS_URL", DEFAULT_CIRCUITS_URL)?,
            timeout_secs: std::env::var("ZKID_REGISTRY_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .filter(|secs| *secs > 0)
                .unwrap_or(DEFAULT_TIMEOUT_SECS),
        })
    }

    /// Create a configuration pointing to a local mock server (for testing).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidUrl` if the localhost URL cannot be parsed.
    pub fn local_mock(port: u16) -> Result<Self, ConfigError> {
        let circuits_url = Url::parse(&format!("http://127.0.0.1:{port}"))
            .map_err(|e| ConfigError::InvalidUrl("localhost".to_string(), e.to_string()))?;
        Ok(Self {
            circuits_url,
            timeout_secs: 2,
        })
    }
}

fn env_url(var: &str, default: &str) -> Result<Url, ConfigError> {
    let raw = std::env::var(var).unwrap_or_else(|_| default.to_string());
    Url::parse(&raw).map_err(|e| ConfigError::InvalidUrl(var.to_string(), e.to_string()))
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid URL for {0}: {1}")]
    InvalidUrl(String, String),
}
