//! Subcommand handlers driven end to end over synthetic proofs and an
//! on-disk key directory.

use std::path::{Path, PathBuf};

use zkid_chain::mock::{synthetic_vkey, SyntheticChain, SYNTHETIC_NAMES};
use zkid_cli::format::{run_format, FormatArgs};
use zkid_cli::read_json;
use zkid_cli::verify::{run_verify, VerifyArgs};
use zkid_cli::zk_id::{render_zk_id, run_zk_id, ZkIdArgs};
use zkid_core::{ContractProofData, Field, VKEY_SIZE};

struct Workspace {
    dir: tempfile::TempDir,
}

impl Workspace {
    fn new(inputs: [[u64; 2]; 4]) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let chain = SyntheticChain::from_u64(inputs);
        std::fs::write(
            dir.path().join("proofs.json"),
            serde_json::to_vec_pretty(&chain.proofs).unwrap(),
        )
        .unwrap();

        let keys = dir.path().join("circuits");
        std::fs::create_dir(&keys).unwrap();
        for (i, name) in SYNTHETIC_NAMES.iter().enumerate() {
            let packaged = serde_json::json!({
                "name": name,
                "vkey": synthetic_vkey(i as u64, VKEY_SIZE),
            });
            std::fs::write(
                keys.join(format!("{name}.json")),
                serde_json::to_vec(&packaged).unwrap(),
            )
            .unwrap();
        }
        Self { dir }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    fn format_args(&self, output: &Path) -> FormatArgs {
        FormatArgs {
            proofs: self.path("proofs.json"),
            keys_dir: Some(self.path("circuits")),
            layout: None,
            permissive: false,
            timeout_secs: Some(5),
            output: Some(output.to_path_buf()),
            report: false,
        }
    }
}

#[test]
fn format_writes_bundle_with_zk_id() {
    let ws = Workspace::new([[10, 20], [20, 30], [30, 40], [40, 99]]);
    let out = ws.path("bundle.json");
    assert_eq!(run_format(&ws.format_args(&out)).unwrap(), 0);

    let bundle: ContractProofData = read_json(&out, "bundle").unwrap();
    assert_eq!(bundle.public_inputs.input_a, [Field::from_u64(10), Field::from_u64(20)]);
    assert_eq!(render_zk_id(&bundle, false), Some(Field::from_u64(99).to_hex()));
    assert_eq!(render_zk_id(&bundle, true).as_deref(), Some("99"));

    let zk_args = ZkIdArgs {
        bundle: out.clone(),
        decimal: true,
    };
    assert_eq!(run_zk_id(&zk_args).unwrap(), 0);
    assert_eq!(run_verify(&VerifyArgs { bundle: out }).unwrap(), 0);
}

#[test]
fn verify_flags_tampered_bundle() {
    let ws = Workspace::new([[10, 20], [20, 30], [30, 40], [40, 99]]);
    let out = ws.path("bundle.json");
    run_format(&ws.format_args(&out)).unwrap();

    let mut bundle: ContractProofData = read_json(&out, "bundle").unwrap();
    bundle.public_inputs.input_c[0] = Field::from_u64(31);
    let tampered = ws.path("tampered.json");
    std::fs::write(&tampered, serde_json::to_vec(&bundle).unwrap()).unwrap();

    assert_eq!(run_verify(&VerifyArgs { bundle: tampered }).unwrap(), 2);
}

#[test]
fn broken_chain_fails_unless_permissive() {
    let ws = Workspace::new([[10, 20], [21, 30], [30, 40], [40, 99]]);
    let out = ws.path("bundle.json");

    let err = run_format(&ws.format_args(&out)).unwrap_err();
    assert!(format!("{err:#}").contains("proof chain broken"));
    assert!(!out.exists());

    let mut args = ws.format_args(&out);
    args.permissive = true;
    args.report = true;
    assert_eq!(run_format(&args).unwrap(), 0);

    let output: serde_json::Value = read_json(&out, "report").unwrap();
    assert_eq!(output["zk_id"], serde_json::json!(Field::from_u64(99).to_hex()));
    let links = output["report"]["links"].as_array().unwrap();
    assert_eq!(links.len(), 3);
    assert_eq!(links[0]["from"], "dsc_check");
    assert_ne!(links[0]["output"], links[0]["input"]);
}

#[test]
fn zk_id_without_nullifier_exits_one() {
    let ws = Workspace::new([[10, 20], [20, 30], [30, 40], [40, 99]]);
    let out = ws.path("bundle.json");
    run_format(&ws.format_args(&out)).unwrap();

    let mut bundle: ContractProofData = read_json(&out, "bundle").unwrap();
    bundle.public_inputs.input_d[1] = Field::zero();
    std::fs::write(&out, serde_json::to_vec(&bundle).unwrap()).unwrap();

    let args = ZkIdArgs {
        bundle: out,
        decimal: false,
    };
    assert_eq!(run_zk_id(&args).unwrap(), 1);
}

#[test]
fn truncated_bundle_is_rejected() {
    let ws = Workspace::new([[10, 20], [20, 30], [30, 40], [40, 99]]);
    let out = ws.path("bundle.json");
    run_format(&ws.format_args(&out)).unwrap();

    let mut value: serde_json::Value = read_json(&out, "bundle").unwrap();
    value["vkeys"]["vkey_a"].as_array_mut().unwrap().pop();
    std::fs::write(&out, serde_json::to_vec(&value).unwrap()).unwrap();

    assert!(run_verify(&VerifyArgs { bundle: out }).is_err());
}
