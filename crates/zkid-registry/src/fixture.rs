//! # Static Key Source
//!
//! In-memory packaged circuits, for tests and for offline operation from a
//! directory of packaged circuit JSON files (each with a base64 `vkey`).
//!
//! Lookups first try the exact `(name, version)` pair, then a
//! version-agnostic entry registered under the name alone.

use std::collections::HashMap;
use std::path::Path;

use crate::error::RegistryError;
use crate::source::{require_vkey, PackagedCircuit, VerificationKeySource};

/// Verification keys held in memory.
#[derive(Debug, Clone, Default)]
pub struct StaticKeySource {
    versioned: HashMap<(String, String), PackagedCircuit>,
    any_version: HashMap<String, PackagedCircuit>,
}

impl StaticKeySource {
    /// Create an empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a base64 vkey for `name` at exactly `version`.
    pub fn insert(&mut self, name: &str, version: &str, vkey_base64: impl Into<String>) {
        self.versioned.insert(
            (name.to_string(), version.to_string()),
            PackagedCircuit {
                name: name.to_string(),
                version: Some(version.to_string()),
                vkey: vkey_base64.into(),
                vkey_hash: None,
            },
        );
    }

    /// Register a base64 vkey for `name` at any version.
    pub fn insert_any_version(&mut self, name: &str, vkey_base64: impl Into<String>) {
        self.any_version.insert(
            name.to_string(),
            PackagedCircuit {
                name: name.to_string(),
                version: None,
                vkey: vkey_base64.into(),
                vkey_hash: None,
            },
        );
    }

    /// Builder-style [`insert_any_version`](Self::insert_any_version).
    pub fn with_key(mut self, name: &str, vkey_base64: impl Into<String>) -> Self {
        self.insert_any_version(name, vkey_base64);
        self
    }

    /// Number of registered circuits.
    pub fn len(&self) -> usize {
        self.versioned.len() + self.any_version.len()
    }

    /// Whether no circuits are registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Load every `*.json` packaged circuit in `dir`.
    ///
    /// A file's circuit name is its `name` field, falling back to the file
    /// stem. Files carrying a `version` are registered for that version only.
    pub fn from_dir(dir: &Path) -> Result<Self, RegistryError> {
        let io_err = |source: std::io::Error| RegistryError::Io {
            path: dir.display().to_string(),
            source,
        };

        let mut paths: Vec<_> = std::fs::read_dir(dir)
            .map_err(io_err)?
            .collect::<Result<Vec<_>, _>>()
            .map_err(io_err)?
            .into_iter()
            .map(|entry| entry.path())
            .filter(|p| p.extension().is_some_and(|ext| ext == "json"))
            .collect();
        paths.sort();

        let mut source = Self::new();
        for path in paths {
            let raw = std::fs::read(&path).map_err(|e| RegistryError::Io {
                path: path.display().to_string(),
                source: e,
            })?;
            let mut circuit: PackagedCircuit =
                serde_json::from_slice(&raw).map_err(|e| RegistryError::Deserialization {
                    endpoint: path.display().to_string(),
                    reason: e.to_string(),
                })?;
            if circuit.name.is_empty() {
                circuit.name = path
                    .file_stem()
                    .map(|s| s.to_string_lossy().into_owned())
                    .unwrap_or_default();
            }
            tracing::debug!(name = %circuit.name, path = %path.display(), "loaded packaged circuit");
            match circuit.version.clone() {
                Some(version) => {
                    source
                        .versioned
                        .insert((circuit.name.clone(), version), circuit);
                }
                None => {
                    source.any_version.insert(circuit.name.clone(), circuit);
                }
            }
        }
        Ok(source)
    }

    fn lookup(&self, name: &str, version: &str) -> Option<&PackagedCircuit> {
        self.versioned
            .get(&(name.to_string(), version.to_string()))
            .or_else(|| self.any_version.get(name))
    }
}

impl VerificationKeySource for StaticKeySource {
    async fn fetch_verification_key(
        &self,
        name: &str,
        version: &str,
    ) -> Result<PackagedCircuit, RegistryError> {
        let found = self
            .lookup(name, version)
            .cloned()
            .ok_or_else(|| RegistryError::NotFound {
                name: name.to_string(),
                version: version.to_string(),
            })?;
        require_vkey(found, name, version)
    }

    fn source_name(&self) -> &str {
        "StaticKeySource"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn exact_version_wins_over_any_version() {
        let mut src = StaticKeySource::new();
        src.insert("dsc_check", "0.5.0", "AAAA");
        src.insert_any_version("dsc_check", "AQID");

        let exact = src.fetch_verification_key("dsc_check", "0.5.0").await.unwrap();
        assert_eq!(exact.vkey, "AAAA");
        let fallback = src.fetch_verification_key("dsc_check", "0.6.0").await.unwrap();
        assert_eq!(fallback.vkey, "AQID");
        assert_eq!(src.len(), 2);
    }

    #[tokio::test]
    async fn unknown_circuit_is_not_found() {
        let src = StaticKeySource::new().with_key("dsc_check", "AAAA");
        let err = src
            .fetch_verification_key("disclose_bytes", "0.5.0")
            .await
            .unwrap_err();
        assert!(matches!(err, RegistryError::NotFound { ref name, .. } if name == "disclose_bytes"));
    }

    #[test]
    fn loads_packaged_circuits_from_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("1_vkey_sig_check_dsc.json"),
            r#"{"name":"sig_check_dsc","vkey":"AAAA"}"#,
        )
        .unwrap();
        std::fs::write(
            dir.path().join("disclose_bytes.json"),
            r#"{"vkey":"AQID","version":"0.5.2"}"#,
        )
        .unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let src = StaticKeySource::from_dir(dir.path()).unwrap();
        assert_eq!(src.len(), 2);
        assert!(src.lookup("sig_check_dsc", "anything").is_some());
        assert!(src.lookup("disclose_bytes", "0.5.2").is_some());
        assert!(src.lookup("disclose_bytes", "0.5.1").is_none());
    }

    #[test]
    fn malformed_file_is_a_deserialization_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("bad.json"), "{not json").unwrap();
        let err = StaticKeySource::from_dir(dir.path()).unwrap_err();
        assert!(matches!(err, RegistryError::Deserialization { .. }));
    }
}
