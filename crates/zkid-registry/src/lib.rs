//! # zkid-registry -- Circuit Descriptor Registry
//!
//! Resolves a packaged sub-circuit (by name and version) to its base64
//! verification key.
//!
//! ## Sources
//!
//! - [`HostedCircuitClient`]: the hosted circuit service over HTTPS.
//! - [`StaticKeySource`]: in-memory keys, optionally loaded from a fixture
//!   directory of packaged circuit JSON files.
//! - [`TimeoutSource`]: wraps either of the above with a per-lookup deadline.
//!
//! ## Failure Policy
//!
//! Lookups are the only blocking points of proof-chain assembly. They are
//! bounded by a timeout and never retried at this layer; a failed lookup is
//! terminal for the sub-circuit being formatted.

pub mod config;
pub mod error;
pub mod fixture;
pub mod hosted;
pub mod source;
pub mod timeout;

pub use config::{ConfigError, RegistryConfig};
pub use error::RegistryError;
pub use fixture::StaticKeySource;
pub use hosted::HostedCircuitClient;
pub use source::{PackagedCircuit, VerificationKeySource};
pub use timeout::{with_timeout, TimeoutSource};

use std::time::Duration;

/// Build the hosted client from `config`, bounded by its timeout.
pub fn hosted_source(config: RegistryConfig) -> Result<TimeoutSource<HostedCircuitClient>, RegistryError> {
    let timeout = Duration::from_secs(config.timeout_secs);
    Ok(with_timeout(HostedCircuitClient::new(config)?, timeout))
}
