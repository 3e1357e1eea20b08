//! # Format Subcommand
//!
//! Reads a JSON array of proof results, assembles them into a contract
//! bundle, and writes the bundle as JSON.
//!
//! Verification keys come from `--keys-dir` when given (a directory of
//! packaged circuit JSON files), otherwise from the hosted circuit service
//! configured by `ZKID_CIRCUITS_URL`.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;

use zkid_chain::{
    Assembly, AssemblyReport, ChainPolicy, ChunkedSerializer, CircuitLayouts, ProofChainAssembler,
    SubCircuitFormatter,
};
use zkid_core::{ContractProofData, Field, ProofResult};
use zkid_registry::config::DEFAULT_TIMEOUT_SECS;
use zkid_registry::{hosted_source, with_timeout, RegistryConfig, StaticKeySource, VerificationKeySource};

use crate::{read_json, write_json};

/// Arguments for the format subcommand.
#[derive(Args, Debug)]
pub struct FormatArgs {
    /// JSON file holding an array of proof results.
    #[arg(long)]
    pub proofs: PathBuf,

    /// Directory of packaged circuit JSON files to resolve keys from.
    #[arg(long)]
    pub keys_dir: Option<PathBuf>,

    /// YAML file overriding the public-input layouts.
    #[arg(long)]
    pub layout: Option<PathBuf>,

    /// Return the bundle even when commitment linkage is broken.
    #[arg(long)]
    pub permissive: bool,

    /// Per-lookup key resolution timeout in seconds (at least 1).
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout_secs: Option<u64>,

    /// Write the output here instead of stdout.
    #[arg(long, short)]
    pub output: Option<PathBuf>,

    /// Emit the zkID and assembly report alongside the bundle.
    #[arg(long)]
    pub report: bool,
}

/// Bundle plus diagnostics, written with `--report`.
#[derive(Debug, Serialize)]
pub struct FormatOutput<'a> {
    /// The zkID.
    pub zk_id: Field,
    /// Assembly diagnostics.
    pub report: &'a AssemblyReport,
    /// The contract bundle.
    pub bundle: &'a ContractProofData,
}

/// Execute the format subcommand.
pub fn run_format(args: &FormatArgs) -> Result<u8> {
    let proofs: Vec<ProofResult> = read_json(&args.proofs, "proof results")?;
    let layouts = match &args.layout {
        Some(path) => CircuitLayouts::from_yaml_file(path)
            .with_context(|| format!("failed to load layout: {}", path.display()))?,
        None => CircuitLayouts::default(),
    };
    let policy = if args.permissive {
        ChainPolicy::Permissive
    } else {
        ChainPolicy::Strict
    };

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;
    let assembly = runtime.block_on(async {
        match &args.keys_dir {
            Some(dir) => {
                let keys = StaticKeySource::from_dir(dir)
                    .with_context(|| format!("failed to load keys from {}", dir.display()))?;
                tracing::info!(circuits = keys.len(), dir = %dir.display(), "loaded verification keys");
                let timeout = Duration::from_secs(args.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS));
                assemble(with_timeout(keys, timeout), layouts, policy, &proofs).await
            }
            None => {
                let mut config = RegistryConfig::from_env()?;
                if let Some(secs) = args.timeout_secs {
                    config.timeout_secs = secs;
                }
                tracing::info!(url = %config.circuits_url, "resolving keys from hosted registry");
                assemble(hosted_source(config)?, layouts, policy, &proofs).await
            }
        }
    })?;

    tracing::info!(zk_id = %assembly.zk_id, "bundle assembled");
    if args.report {
        write_json(
            &FormatOutput {
                zk_id: assembly.zk_id,
                report: &assembly.report,
                bundle: &assembly.bundle,
            },
            args.output.as_deref(),
        )?;
    } else {
        write_json(&assembly.bundle, args.output.as_deref())?;
    }
    Ok(0)
}

async fn assemble<K: VerificationKeySource>(
    keys: K,
    layouts: CircuitLayouts,
    policy: ChainPolicy,
    proofs: &[ProofResult],
) -> Result<Assembly> {
    let formatter = SubCircuitFormatter::new(ChunkedSerializer::new(layouts), keys);
    let assembly = ProofChainAssembler::new(formatter)
        .with_policy(policy)
        .assemble(proofs)
        .await
        .context("proof chain assembly failed")?;
    Ok(assembly)
}
