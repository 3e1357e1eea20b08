//! Typed client for the hosted circuit registry.
//!
//! Packaged circuits are static JSON documents:
//!
//! | Method | Path | Operation |
//! |--------|------|-----------|
//! | GET | `/versions/{version}/circuits/{name}.json` | Fetch packaged circuit |
//!
//! A 404 means the circuit does not exist at that version. Lookups are not
//! retried; callers that want retries wrap the whole assembly.
//!
//! `name` and `version` come from untrusted proof results. Each is pushed as
//! a single percent-encoded path segment. Values holding a separator,
//! query, fragment or escape character, or that are exactly `.` or `..`,
//! are refused as [`RegistryError::NotFound`] without a request.

use std::time::Duration;

use crate::config::RegistryConfig;
use crate::error::RegistryError;
use crate::source::{require_vkey, PackagedCircuit, VerificationKeySource};

/// Client for the hosted circuit registry.
#[derive(Debug, Clone)]
pub struct HostedCircuitClient {
    http: reqwest::Client,
    base_url: url::Url,
}

impl HostedCircuitClient {
    /// Create a client from configuration.
    pub fn new(config: RegistryConfig) -> Result<Self, RegistryError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| RegistryError::Http {
                endpoint: "client_init".into(),
                source: e,
            })?;
        Ok(Self {
            http,
            base_url: config.circuits_url,
        })
    }

    /// Base URL this client resolves circuits against.
    pub fn base_url(&self) -> &url::Url {
        &self.base_url
    }

    /// Fetch a packaged circuit.
    ///
    /// Calls `GET {base_url}/versions/{version}/circuits/{name}.json`.
    pub async fn get_packaged_circuit(
        &self,
        name: &str,
        version: &str,
    ) -> Result<PackagedCircuit, RegistryError> {
        let url = self.circuit_url(name, version)?;
        let endpoint = format!("GET {}", url.path());
        tracing::debug!(%url, "fetching packaged circuit");

        let resp = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| RegistryError::Http {
                endpoint: endpoint.clone(),
                source: e,
            })?;

        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(RegistryError::NotFound {
                name: name.to_string(),
                version: version.to_string(),
            });
        }

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(RegistryError::Api {
                endpoint,
                status,
                body,
            });
        }

        let body = resp.bytes().await.map_err(|e| RegistryError::Http {
            endpoint: endpoint.clone(),
            source: e,
        })?;
        let circuit: PackagedCircuit =
            serde_json::from_slice(&body).map_err(|e| RegistryError::Deserialization {
                endpoint,
                reason: e.to_string(),
            })?;

        require_vkey(circuit, name, version)
    }

    /// `{base_url}/versions/{version}/circuits/{name}.json`, one segment per value.
    pub fn circuit_url(&self, name: &str, version: &str) -> Result<url::Url, RegistryError> {
        let not_found = || RegistryError::NotFound {
            name: name.to_string(),
            version: version.to_string(),
        };
        if !is_plain_segment(name) || !is_plain_segment(version) {
            tracing::warn!(name, version, "refusing circuit lookup outside the registry path");
            return Err(not_found());
        }

        let file = format!("{name}.json");
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| not_found())?
            .pop_if_empty()
            .extend(["versions", version, "circuits", file.as_str()]);
        Ok(url)
    }
}

fn is_plain_segment(value: &str) -> bool {
    !value.is_empty()
        && value != "."
        && value != ".."
        && !value.contains(['/', '\\', '?', '#', '%'])
}

impl VerificationKeySource for HostedCircuitClient {
    async fn fetch_verification_key(
        &self,
        name: &str,
        version: &str,
    ) -> Result<PackagedCircuit, RegistryError> {
        self.get_packaged_circuit(name, version).await
    }

    fn source_name(&self) -> &str {
        "HostedCircuitClient"
    }
}
