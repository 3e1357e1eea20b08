//! # zkid CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use zkid_cli::classify::{run_classify, ClassifyArgs};
use zkid_cli::format::{run_format, FormatArgs};
use zkid_cli::verify::{run_verify, VerifyArgs};
use zkid_cli::zk_id::{run_zk_id, ZkIdArgs};

/// zkID proof-chain toolchain.
///
/// Formats the four passport sub-circuit proofs into the bundle a verifier
/// contract consumes, and inspects existing bundles.
#[derive(Parser, Debug)]
#[command(name = "zkid", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Assemble proof results into a contract bundle.
    Format(FormatArgs),

    /// Print the zkID of a bundle.
    #[command(name = "zk-id")]
    ZkId(ZkIdArgs),

    /// Show the sub-circuit each circuit name maps to.
    Classify(ClassifyArgs),

    /// Re-check commitment linkage of a bundle.
    Verify(VerifyArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    // Logs go to stderr so stdout stays clean for JSON output.
    if cli.log_json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
    }

    tracing::debug!(version = env!("CARGO_PKG_VERSION"), "zkid CLI starting");

    let result = match cli.command {
        Commands::Format(args) => run_format(&args),
        Commands::ZkId(args) => run_zk_id(&args),
        Commands::Classify(args) => run_classify(&args),
        Commands::Verify(args) => run_verify(&args),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn cli_parse_format_minimal() {
        let cli = Cli::try_parse_from(["zkid", "format", "--proofs", "proofs.json"]).unwrap();
        if let Commands::Format(args) = cli.command {
            assert_eq!(args.proofs, PathBuf::from("proofs.json"));
            assert!(args.keys_dir.is_none());
            assert!(!args.permissive);
            assert!(args.output.is_none());
        } else {
            panic!("expected format");
        }
    }

    #[test]
    fn cli_parse_format_all_flags() {
        let cli = Cli::try_parse_from([
            "zkid",
            "-vv",
            "format",
            "--proofs",
            "p.json",
            "--keys-dir",
            "circuits",
            "--layout",
            "layout.yaml",
            "--permissive",
            "--timeout-secs",
            "3",
            "-o",
            "bundle.json",
            "--report",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        if let Commands::Format(args) = cli.command {
            assert_eq!(args.keys_dir, Some(PathBuf::from("circuits")));
            assert_eq!(args.layout, Some(PathBuf::from("layout.yaml")));
            assert!(args.permissive);
            assert_eq!(args.timeout_secs, Some(3));
            assert_eq!(args.output, Some(PathBuf::from("bundle.json")));
            assert!(args.report);
        } else {
            panic!("expected format");
        }
    }

    #[test]
    fn cli_rejects_zero_timeout() {
        let err = Cli::try_parse_from(["zkid", "format", "--proofs", "p.json", "--timeout-secs", "0"])
            .unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }

    #[test]
    fn cli_parse_zk_id_decimal() {
        let cli = Cli::try_parse_from(["zkid", "zk-id", "--bundle", "b.json", "--decimal"]).unwrap();
        assert!(matches!(cli.command, Commands::ZkId(ref a) if a.decimal));
    }

    #[test]
    fn cli_parse_classify_requires_names() {
        assert!(Cli::try_parse_from(["zkid", "classify"]).is_err());
        let cli = Cli::try_parse_from(["zkid", "classify", "dsc_check", "disclose_bytes"]).unwrap();
        if let Commands::Classify(args) = cli.command {
            assert_eq!(args.names.len(), 2);
        } else {
            panic!("expected classify");
        }
    }

    #[test]
    fn cli_parse_verify_and_log_json() {
        let cli = Cli::try_parse_from(["zkid", "verify", "--bundle", "b.json", "--log-json"]).unwrap();
        assert!(cli.log_json);
        assert!(matches!(cli.command, Commands::Verify(_)));
    }

    #[test]
    fn cli_rejects_unknown_subcommand() {
        assert!(Cli::try_parse_from(["zkid", "prove"]).is_err());
    }
}
