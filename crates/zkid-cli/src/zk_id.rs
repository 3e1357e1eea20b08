//! # zk-id Subcommand
//!
//! Prints the zkID carried by a stored bundle.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use zkid_core::{extract_zk_id, ContractProofData};

use crate::read_json;

/// Arguments for the zk-id subcommand.
#[derive(Args, Debug)]
pub struct ZkIdArgs {
    /// Bundle JSON written by `zkid format`.
    #[arg(long)]
    pub bundle: PathBuf,

    /// Print in decimal instead of hex.
    #[arg(long)]
    pub decimal: bool,
}

/// The zkID of `bundle` rendered for display, if it carries one.
pub fn render_zk_id(bundle: &ContractProofData, decimal: bool) -> Option<String> {
    extract_zk_id(bundle).map(|id| {
        if decimal {
            id.to_decimal_string()
        } else {
            id.to_hex()
        }
    })
}

/// Execute the zk-id subcommand.
pub fn run_zk_id(args: &ZkIdArgs) -> Result<u8> {
    let bundle: ContractProofData = read_json(&args.bundle, "bundle")?;
    match render_zk_id(&bundle, args.decimal) {
        Some(id) => {
            println!("{id}");
            Ok(0)
        }
        None => {
            tracing::error!(bundle = %args.bundle.display(), "bundle carries no nullifier");
            Ok(1)
        }
    }
}
