//! # Verification Key Source
//!
//! The seam between the formatter and wherever packaged circuits live.
//! Implementations must be `Send + Sync` so that the four sub-circuit lookups
//! of one assembly can run concurrently.

use std::future::Future;

use serde::{Deserialize, Serialize};

use zkid_core::{decode_base64_to_bytes, CodecError};

use crate::error::RegistryError;

/// A packaged circuit as served by the circuit host.
///
/// Only the fields the pipeline consumes are modeled; hosts return more
/// (bytecode, ABI, hashes) and `deny_unknown_fields` is intentionally not used.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackagedCircuit {
    /// Packaged circuit name.
    #[serde(default)]
    pub name: String,
    /// Package version, when the host reports one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Base64-encoded verification key.
    #[serde(default)]
    pub vkey: String,
    /// Verification key hash, when the host reports one.
    #[serde(default, alias = "vkeyHash", skip_serializing_if = "Option::is_none")]
    pub vkey_hash: Option<String>,
}

impl PackagedCircuit {
    /// Decode the base64 verification key into raw bytes.
    pub fn vkey_bytes(&self) -> Result<Vec<u8>, CodecError> {
        decode_base64_to_bytes(&self.vkey)
    }
}

/// Resolves a packaged circuit's verification key by name and version.
pub trait VerificationKeySource: Send + Sync {
    /// Fetch the packaged circuit `name` at `version`.
    ///
    /// # Errors
    ///
    /// [`RegistryError::NotFound`] when the circuit (or its vkey) does not
    /// exist; transport and decoding variants otherwise. Implementations do
    /// not retry.
    fn fetch_verification_key(
        &self,
        name: &str,
        version: &str,
    ) -> impl Future<Output = Result<PackagedCircuit, RegistryError>> + Send;

    /// Human-readable name of this source for logs.
    fn source_name(&self) -> &str;
}

impl<T: VerificationKeySource> VerificationKeySource for std::sync::Arc<T> {
    fn fetch_verification_key(
        &self,
        name: &str,
        version: &str,
    ) -> impl Future<Output = Result<PackagedCircuit, RegistryError>> + Send {
        (**self).fetch_verification_key(name, version)
    }

    fn source_name(&self) -> &str {
        (**self).source_name()
    }
}

/// Reject a packaged circuit whose vkey is empty.
pub(crate) fn require_vkey(
    circuit: PackagedCircuit,
    name: &str,
    version: &str,
) -> Result<PackagedCircuit, RegistryError> {
    if circuit.vkey.trim().is_empty() {
        return Err(RegistryError::NotFound {
            name: name.to_string(),
            version: version.to_string(),
        });
    }
    Ok(circuit)
}
