//! # Classify Subcommand
//!
//! Shows which sub-circuit slot each circuit name is assigned to.

use anyhow::Result;
use clap::Args;

use zkid_core::{classify, Classification};

/// Arguments for the classify subcommand.
#[derive(Args, Debug)]
pub struct ClassifyArgs {
    /// Circuit names, e.g. `sig_check_dsc_tbs_700_rsa_pkcs_4096_sha512`.
    #[arg(required = true)]
    pub names: Vec<String>,
}

/// One output line: name, slot, and type.
pub fn describe(name: &str) -> String {
    match classify(name) {
        Classification::Known(circuit) => format!("{name}\t{}\t{circuit}", circuit.slot()),
        Classification::Unknown => format!("{name}\t-\tunknown"),
    }
}

/// Execute the classify subcommand. Exits 1 when any name is unknown.
pub fn run_classify(args: &ClassifyArgs) -> Result<u8> {
    let mut unknown = 0usize;
    for name in &args.names {
        if classify(name) == Classification::Unknown {
            unknown += 1;
        }
        println!("{}", describe(name));
    }
    if unknown > 0 {
        tracing::warn!(unknown, "some circuit names match no sub-circuit");
        return Ok(1);
    }
    Ok(0)
}
