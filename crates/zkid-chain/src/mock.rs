//! # Synthetic Proofs
//!
//! Builds [`ProofResult`]s in the chunked layout with chosen semantic public
//! inputs, and matching verification keys, so the full formatting and
//! assembly pipeline can run without a prover.
//!
//! ## Security Notice
//!
//! These payloads are not proofs. They carry no soundness and must never be
//! submitted to a verifier contract.

use zkid_core::{encode_bytes_to_base64, CircuitType, Field, ProofResult, VKEY_SIZE};
use zkid_registry::StaticKeySource;

use crate::layout::CircuitLayouts;

/// Package version stamped on synthetic proofs.
pub const SYNTHETIC_VERSION: &str = "0.0.0-synthetic";

/// Proof body length of synthetic proofs, in fields. Shorter than the padded
/// size so padding is exercised.
pub const SYNTHETIC_BODY_FIELDS: usize = 440;

/// Base64 verification key of `fields` deterministic 32-byte chunks.
pub fn synthetic_vkey(seed: u64, fields: usize) -> String {
    let bytes: Vec<u8> = (0..fields)
        .flat_map(|i| Field::from_u64(seed.wrapping_mul(1_000_003).wrapping_add(i as u64)).to_be_bytes())
        .collect();
    encode_bytes_to_base64(&bytes)
}

/// A proof for `circuit` whose rule inputs are `inputs`, laid out per `layouts`.
///
/// Public inputs not named by the rule are filled with their own index.
pub fn synthetic_proof(
    name: &str,
    circuit: CircuitType,
    inputs: [Field; 2],
    layouts: &CircuitLayouts,
) -> ProofResult {
    let layout = layouts.get(circuit);
    let mut public_inputs: Vec<Field> = (0..layout.count).map(|i| Field::from_u64(i as u64)).collect();
    for (kind, value) in circuit.public_input_rule().into_iter().zip(inputs) {
        if let Some(position) = layout.index_of(kind).and_then(|idx| idx.resolve(layout.count)) {
            public_inputs[position] = value;
        }
    }

    let mut encoded = String::from("0x");
    let body = (0..SYNTHETIC_BODY_FIELDS).map(|i| Field::from_u64(0xb0d1_0000 + i as u64));
    for field in public_inputs.into_iter().chain(body) {
        encoded.push_str(&hex::encode(field.as_bytes()));
    }

    let vkey_hash = Field::from_u64(circuit.index() as u64 + 1).to_hex();
    ProofResult::new(name, SYNTHETIC_VERSION, vkey_hash, encoded)
}

/// Four synthetic proofs in chain order plus the keys that resolve them.
#[derive(Debug, Clone)]
pub struct SyntheticChain {
    /// Proofs, ordered DSC, ID data, integrity, disclosure.
    pub proofs: Vec<ProofResult>,
    /// Verification keys for every proof name.
    pub keys: StaticKeySource,
}

/// Names used by [`SyntheticChain::linked`].
pub const SYNTHETIC_NAMES: [&str; 4] = [
    "sig_check_dsc_tbs_700_rsa_pkcs_4096_sha512",
    "sig_check_id_data_tbs_700_rsa_pkcs_2048_sha256",
    "data_check_integrity_sha256",
    "disclose_bytes",
];

impl SyntheticChain {
    /// A correctly linked chain: root, then commitments `c1..c3`, then `nullifier`.
    pub fn linked(root: Field, commitments: [Field; 3], nullifier: Field) -> Self {
        let [c1, c2, c3] = commitments;
        Self::from_inputs(
            SYNTHETIC_NAMES,
            [[root, c1], [c1, c2], [c2, c3], [c3, nullifier]],
            &CircuitLayouts::default(),
        )
    }

    /// Proofs with explicit per-circuit inputs, which need not link.
    pub fn from_inputs(names: [&str; 4], inputs: [[Field; 2]; 4], layouts: &CircuitLayouts) -> Self {
        let mut proofs = Vec::with_capacity(4);
        let mut keys = StaticKeySource::new();
        for ((circuit, name), pair) in CircuitType::ALL.into_iter().zip(names).zip(inputs) {
            proofs.push(synthetic_proof(name, circuit, pair, layouts));
            keys.insert_any_version(name, synthetic_vkey(circuit.index() as u64, VKEY_SIZE));
        }
        Self { proofs, keys }
    }

    /// Chain from small integers, convenient in tests.
    pub fn from_u64(inputs: [[u64; 2]; 4]) -> Self {
        Self::from_inputs(
            SYNTHETIC_NAMES,
            inputs.map(|[a, b]| [Field::from_u64(a), Field::from_u64(b)]),
            &CircuitLayouts::default(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::ChunkedSerializer;
    use crate::serializer::CircuitSerializer;

    #[test]
    fn synthetic_integrity_proof_places_commitments_after_dates() {
        let layouts = CircuitLayouts::default();
        let proof = synthetic_proof(
            "data_check_integrity_sha256",
            CircuitType::IntegrityCheck,
            [Field::from_u64(30), Field::from_u64(40)],
            &layouts,
        );
        let s = ChunkedSerializer::default();
        let data = s.proof_data(proof.proof.as_deref().unwrap(), 10).unwrap();
        assert_eq!(data.proof.len(), SYNTHETIC_BODY_FIELDS);
        assert_eq!(zkid_core::hex_to_field(&data.public_inputs[8]).unwrap(), Field::from_u64(30));
        assert_eq!(zkid_core::hex_to_field(&data.public_inputs[9]).unwrap(), Field::from_u64(40));
    }

    #[test]
    fn synthetic_vkey_has_requested_size() {
        let bytes = zkid_core::decode_base64_to_bytes(&synthetic_vkey(3, 128)).unwrap();
        assert_eq!(bytes.len(), 128 * 32);
    }
}
