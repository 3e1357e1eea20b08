//! # Verify Subcommand
//!
//! Re-checks commitment linkage of a stored bundle. Exit codes: 0 intact,
//! 2 broken, 1 on read errors.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use zkid_chain::verify_chain;
use zkid_core::{extract_zk_id, ContractProofData};

use crate::read_json;

/// Arguments for the verify subcommand.
#[derive(Args, Debug)]
pub struct VerifyArgs {
    /// Bundle JSON written by `zkid format`.
    #[arg(long)]
    pub bundle: PathBuf,
}

/// Execute the verify subcommand.
pub fn run_verify(args: &VerifyArgs) -> Result<u8> {
    let bundle: ContractProofData = read_json(&args.bundle, "bundle")?;
    let links = verify_chain(&bundle);

    for link in &links {
        let status = if link.is_intact() { "ok" } else { "BROKEN" };
        println!("{status:<6} {link}");
    }
    match extract_zk_id(&bundle) {
        Some(id) => println!("zkID   {id}"),
        None => println!("zkID   (none)"),
    }

    let broken = links.iter().filter(|l| !l.is_intact()).count();
    if broken > 0 {
        tracing::error!(broken, "proof chain linkage broken");
        return Ok(2);
    }
    Ok(0)
}
