//! Registry error types.

use std::time::Duration;

/// Errors resolving a packaged circuit's verification key.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// No packaged circuit (or no vkey within it) exists for the lookup.
    #[error("no packaged circuit {name} (version {version})")]
    NotFound { name: String, version: String },
    /// HTTP transport error.
    #[error("HTTP error calling {endpoint}: {source}")]
    Http {
        endpoint: String,
        source: reqwest::Error,
    },
    /// The circuit host returned a non-2xx status other than 404.
    #[error("circuit host {endpoint} returned {status}: {body}")]
    Api {
        endpoint: String,
        status: u16,
        body: String,
    },
    /// Response deserialization failed.
    #[error("failed to deserialize packaged circuit from {endpoint}: {reason}")]
    Deserialization { endpoint: String, reason: String },
    /// The lookup did not complete within its time budget.
    #[error("lookup of {name} (version {version}) timed out after {elapsed:?}")]
    Timeout {
        name: String,
        version: String,
        elapsed: Duration,
    },
    /// Reading an on-disk packaged circuit failed.
    #[error("I/O error reading {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
}
