//! # zkid-cli -- Command-Line Interface for zkID Proof Chains
//!
//! Provides the `zkid` binary.
//!
//! ## Subcommands
//!
//! - `zkid format` -- Assemble four sub-circuit proofs into a contract bundle.
//! - `zkid zk-id` -- Print the zkID (terminal nullifier) of a bundle.
//! - `zkid classify` -- Show which sub-circuit each circuit name maps to.
//! - `zkid verify` -- Re-check commitment linkage of a stored bundle.
//!
//! ```bash
//! zkid format --proofs proofs.json --keys-dir circuits/ --output bundle.json
//! zkid zk-id --bundle bundle.json --decimal
//! zkid verify --bundle bundle.json
//! ```
//!
//! ## Crate Policy
//!
//! - Argument parsing is separated from business logic.
//! - Handlers delegate to the library crates and return a process exit code.

pub mod classify;
pub mod format;
pub mod verify;
pub mod zk_id;

use std::path::Path;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Read and parse a JSON file.
pub fn read_json<T: DeserializeOwned>(path: &Path, what: &str) -> Result<T> {
    let raw = std::fs::read(path)
        .with_context(|| format!("failed to read {what}: {}", path.display()))?;
    serde_json::from_slice(&raw)
        .with_context(|| format!("failed to parse {what}: {}", path.display()))
}

/// Write pretty JSON to `output`, or to stdout when `None`.
pub fn write_json<T: Serialize>(value: &T, output: Option<&Path>) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("failed to serialize output")?;
    match output {
        Some(path) => {
            std::fs::write(path, format!("{json}\n"))
                .with_context(|| format!("failed to write output: {}", path.display()))?;
            tracing::info!(path = %path.display(), "output written");
        }
        None => println!("{json}"),
    }
    Ok(())
}
