//! # Chunked Serializer
//!
//! Reference [`CircuitSerializer`] for proofs encoded as one hex string of
//! concatenated 32-byte big-endian field elements, public inputs first.
//! Verification keys use the same flat layout.
//!
//! Where each semantic public input sits inside a circuit's public inputs is
//! described by a [`PublicInputLayout`]. The shipped defaults match the
//! passport circuits; deployments with different circuit builds override
//! them from YAML:
//!
//! ```yaml
//! integrity:
//!   count: 10
//!   commitment_in: 8
//!   commitment_out: 9
//! disclosure:
//!   count: 3
//!   commitment_in: 0
//!   nullifier: last
//! ```

use std::fmt;
use std::path::Path;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

use zkid_core::{bytes_to_field_chunks, classify, hex_to_field, CircuitType, Field, PublicInputKind};

use crate::serializer::{CircuitSerializer, CommitmentSide, ProofData, SerializerError};

/// Position of a public input: absolute, or the last one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputIndex {
    /// Zero-based position.
    At(usize),
    /// The final public input.
    Last,
}

impl InputIndex {
    /// Resolve against `len` public inputs.
    pub fn resolve(self, len: usize) -> Option<usize> {
        match self {
            Self::At(i) if i < len => Some(i),
            Self::At(_) => None,
            Self::Last => len.checked_sub(1),
        }
    }
}

impl fmt::Display for InputIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::At(i) => write!(f, "{i}"),
            Self::Last => f.write_str("last"),
        }
    }
}

impl Serialize for InputIndex {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::At(i) => serializer.serialize_u64(*i as u64),
            Self::Last => serializer.serialize_str("last"),
        }
    }
}

impl<'de> Deserialize<'de> for InputIndex {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct IndexVisitor;

        impl<'de> Visitor<'de> for IndexVisitor {
            type Value = InputIndex;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a non-negative index or \"last\"")
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<InputIndex, E> {
                usize::try_from(v)
                    .map(InputIndex::At)
                    .map_err(|_| E::custom(format!("index {v} out of range")))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<InputIndex, E> {
                u64::try_from(v)
                    .map_err(|_| E::custom(format!("negative index {v}")))
                    .and_then(|v| self.visit_u64(v))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<InputIndex, E> {
                if v.eq_ignore_ascii_case("last") {
                    Ok(InputIndex::Last)
                } else {
                    Err(E::invalid_value(de::Unexpected::Str(v), &self))
                }
            }
        }

        deserializer.deserialize_any(IndexVisitor)
    }
}

/// Where a circuit's semantic public inputs live.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicInputLayout {
    /// Total public inputs the circuit declares.
    pub count: usize,
    /// Position of the certificate registry root.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub merkle_root: Option<InputIndex>,
    /// Position of the incoming commitment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commitment_in: Option<InputIndex>,
    /// Position of the outgoing commitment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commitment_out: Option<InputIndex>,
    /// Position of the nullifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nullifier: Option<InputIndex>,
}

impl PublicInputLayout {
    /// Position of `kind`, if this circuit exposes it.
    pub fn index_of(&self, kind: PublicInputKind) -> Option<InputIndex> {
        match kind {
            PublicInputKind::MerkleRoot => self.merkle_root,
            PublicInputKind::CommitmentIn => self.commitment_in,
            PublicInputKind::CommitmentOut => self.commitment_out,
            PublicInputKind::Nullifier => self.nullifier,
        }
    }
}

/// Public-input layouts for all four sub-circuits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CircuitLayouts {
    /// DSC check.
    pub dsc: PublicInputLayout,
    /// ID data check.
    pub id_data: PublicInputLayout,
    /// Integrity check.
    pub integrity: PublicInputLayout,
    /// Disclosure check.
    pub disclosure: PublicInputLayout,
}

impl Default for CircuitLayouts {
    fn default() -> Self {
        Self {
            dsc: PublicInputLayout {
                count: 2,
                merkle_root: Some(InputIndex::At(0)),
                commitment_in: None,
                commitment_out: Some(InputIndex::At(1)),
                nullifier: None,
            },
            id_data: PublicInputLayout {
                count: 2,
                merkle_root: None,
                commitment_in: Some(InputIndex::At(0)),
                commitment_out: Some(InputIndex::At(1)),
                nullifier: None,
            },
            // Eight date inputs precede the commitments.
            integrity: PublicInputLayout {
                count: 10,
                merkle_root: None,
                commitment_in: Some(InputIndex::At(8)),
                commitment_out: Some(InputIndex::At(9)),
                nullifier: None,
            },
            disclosure: PublicInputLayout {
                count: 3,
                merkle_root: None,
                commitment_in: Some(InputIndex::At(0)),
                commitment_out: None,
                nullifier: Some(InputIndex::Last),
            },
        }
    }
}

/// Error loading a layout override.
#[derive(Error, Debug)]
pub enum LayoutError {
    /// The file could not be read.
    #[error("failed to read layout file {path}: {source}")]
    Io {
        /// File path.
        path: String,
        /// Underlying error.
        source: std::io::Error,
    },
    /// The YAML did not describe a layout.
    #[error("invalid layout: {0}")]
    Parse(#[from] serde_yaml::Error),
    /// A layout is internally inconsistent.
    #[error("invalid {circuit} layout: {reason}")]
    Invalid {
        /// Circuit whose layout is wrong.
        circuit: CircuitType,
        /// What is wrong.
        reason: String,
    },
}

impl CircuitLayouts {
    /// Layout for `circuit`.
    pub fn get(&self, circuit: CircuitType) -> &PublicInputLayout {
        match circuit {
            CircuitType::DscCheck => &self.dsc,
            CircuitType::IdDataCheck => &self.id_data,
            CircuitType::IntegrityCheck => &self.integrity,
            CircuitType::DisclosureCheck => &self.disclosure,
        }
    }

    /// Parse YAML. Circuits left out keep their default layout.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, LayoutError> {
        let layouts: Self = serde_yaml::from_str(yaml)?;
        layouts.validate()?;
        Ok(layouts)
    }

    /// Load and parse a YAML file.
    pub fn from_yaml_file(path: &Path) -> Result<Self, LayoutError> {
        let content = std::fs::read_to_string(path).map_err(|source| LayoutError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_yaml_str(&content)
    }

    /// Every rule input must exist and every absolute index must fit `count`.
    pub fn validate(&self) -> Result<(), LayoutError> {
        for circuit in CircuitType::ALL {
            let layout = self.get(circuit);
            for kind in circuit.public_input_rule() {
                let Some(index) = layout.index_of(kind) else {
                    return Err(LayoutError::Invalid {
                        circuit,
                        reason: format!("no position for {kind}"),
                    });
                };
                if index.resolve(layout.count).is_none() {
                    return Err(LayoutError::Invalid {
                        circuit,
                        reason: format!("{kind} position {index:?} outside {} inputs", layout.count),
                    });
                }
            }
        }
        Ok(())
    }
}

/// [`CircuitSerializer`] for the flat 32-byte chunk encoding.
#[derive(Debug, Clone, Default)]
pub struct ChunkedSerializer {
    layouts: CircuitLayouts,
}

impl ChunkedSerializer {
    /// Serializer with custom layouts.
    pub fn new(layouts: CircuitLayouts) -> Self {
        Self { layouts }
    }

    /// The layouts in use.
    pub fn layouts(&self) -> &CircuitLayouts {
        &self.layouts
    }

    fn read(
        &self,
        circuit: CircuitType,
        kind: PublicInputKind,
        proof: &ProofData,
    ) -> Result<Field, SerializerError> {
        let index = self
            .layouts
            .get(circuit)
            .index_of(kind)
            .ok_or(SerializerError::Unsupported { circuit, kind })?;
        let available = proof.public_inputs.len();
        let position = index
            .resolve(available)
            .ok_or(SerializerError::MissingPublicInput { index, available })?;
        Ok(hex_to_field(&proof.public_inputs[position])?)
    }
}

fn decode_payload(encoded: &str, what: &'static str) -> Result<Vec<Field>, String> {
    let trimmed = encoded.trim();
    let digits = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    let bytes = hex::decode(digits).map_err(|e| format!("{what} is not valid hex: {e}"))?;
    bytes_to_field_chunks(&bytes, what).map_err(|e| e.to_string())
}

impl CircuitSerializer for ChunkedSerializer {
    fn proof_data(
        &self,
        encoded_proof: &str,
        num_public_inputs: usize,
    ) -> Result<ProofData, SerializerError> {
        let fields = decode_payload(encoded_proof, "proof").map_err(SerializerError::MalformedProof)?;
        if fields.len() < num_public_inputs {
            return Err(SerializerError::MalformedProof(format!(
                "proof carries {} fields, fewer than its {num_public_inputs} public inputs",
                fields.len()
            )));
        }
        let (inputs, body) = fields.split_at(num_public_inputs);
        Ok(ProofData {
            public_inputs: inputs.iter().map(Field::to_hex).collect(),
            proof: body.iter().map(Field::to_hex).collect(),
        })
    }

    fn number_of_public_inputs(&self, circuit_name: &str) -> Result<usize, SerializerError> {
        classify(circuit_name)
            .circuit()
            .map(|circuit| self.layouts.get(circuit).count)
            .ok_or_else(|| SerializerError::UnknownCircuit(circuit_name.to_string()))
    }

    fn merkle_root(&self, proof: &ProofData) -> Result<Field, SerializerError> {
        self.read(CircuitType::DscCheck, PublicInputKind::MerkleRoot, proof)
    }

    fn commitment(
        &self,
        circuit: CircuitType,
        side: CommitmentSide,
        proof: &ProofData,
    ) -> Result<Field, SerializerError> {
        let kind = match side {
            CommitmentSide::In => PublicInputKind::CommitmentIn,
            CommitmentSide::Out => PublicInputKind::CommitmentOut,
        };
        self.read(circuit, kind, proof)
    }

    fn nullifier(&self, proof: &ProofData) -> Result<Field, SerializerError> {
        self.read(CircuitType::DisclosureCheck, PublicInputKind::Nullifier, proof)
    }

    fn vk_to_fields(&self, vkey: &[u8]) -> Result<Vec<String>, SerializerError> {
        let fields = bytes_to_field_chunks(vkey, "verification key")
            .map_err(|e| SerializerError::MalformedVerificationKey(e.to_string()))?;
        Ok(fields.iter().map(Field::to_hex).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(values: &[u64]) -> String {
        let mut hex_out = String::from("0x");
        for v in values {
            hex_out.push_str(&Field::from_u64(*v).to_hex()[2..]);
        }
        hex_out
    }

    #[test]
    fn default_layouts_are_valid() {
        CircuitLayouts::default().validate().unwrap();
    }

    #[test]
    fn proof_data_splits_public_inputs_first() {
        let s = ChunkedSerializer::default();
        let data = s.proof_data(&payload(&[7, 8, 1, 2, 3]), 2).unwrap();
        assert_eq!(data.public_inputs.len(), 2);
        assert_eq!(data.proof.len(), 3);
        assert_eq!(hex_to_field(&data.public_inputs[1]).unwrap(), Field::from_u64(8));
        assert_eq!(hex_to_field(&data.proof[0]).unwrap(), Field::from_u64(1));
    }

    #[test]
    fn proof_data_rejects_short_and_misaligned_payloads() {
        let s = ChunkedSerializer::default();
        assert!(matches!(
            s.proof_data(&payload(&[1]), 2),
            Err(SerializerError::MalformedProof(_))
        ));
        assert!(matches!(
            s.proof_data("0xabcd", 0),
            Err(SerializerError::MalformedProof(_))
        ));
        assert!(matches!(
            s.proof_data("not hex", 0),
            Err(SerializerError::MalformedProof(_))
        ));
    }

    #[test]
    fn public_input_counts_follow_classification() {
        let s = ChunkedSerializer::default();
        assert_eq!(s.number_of_public_inputs("sig_check_dsc_tbs_700_rsa_pkcs_4096_sha512").unwrap(), 2);
        assert_eq!(s.number_of_public_inputs("data_check_integrity_sha256").unwrap(), 10);
        assert_eq!(s.number_of_public_inputs("disclose_bytes").unwrap(), 3);
        assert!(matches!(
            s.number_of_public_inputs("mystery"),
            Err(SerializerError::UnknownCircuit(_))
        ));
    }

    #[test]
    fn integrity_commitments_follow_date_inputs() {
        let s = ChunkedSerializer::default();
        let mut values: Vec<u64> = (100..108).collect();
        values.extend([30, 40]);
        let data = s.proof_data(&payload(&values), 10).unwrap();
        let c_in = s.commitment(CircuitType::IntegrityCheck, CommitmentSide::In, &data).unwrap();
        let c_out = s.commitment(CircuitType::IntegrityCheck, CommitmentSide::Out, &data).unwrap();
        assert_eq!(c_in, Field::from_u64(30));
        assert_eq!(c_out, Field::from_u64(40));
    }

    #[test]
    fn nullifier_reads_last_input() {
        let s = ChunkedSerializer::default();
        let data = s.proof_data(&payload(&[40, 5, 99]), 3).unwrap();
        assert_eq!(s.nullifier(&data).unwrap(), Field::from_u64(99));
    }

    #[test]
    fn unresolved_last_input_names_last() {
        let s = ChunkedSerializer::default();
        let err = s.nullifier(&ProofData::default()).unwrap_err();
        assert!(matches!(
            err,
            SerializerError::MissingPublicInput { index: InputIndex::Last, available: 0 }
        ));
        assert_eq!(err.to_string(), "public input last requested but the proof carries 0");

        let data = s.proof_data(&payload(&[1, 2]), 2).unwrap();
        let err = s.commitment(CircuitType::IntegrityCheck, CommitmentSide::In, &data).unwrap_err();
        assert!(err.to_string().starts_with("public input 8 requested"));
    }

    #[test]
    fn unsupported_kind_is_an_error() {
        let s = ChunkedSerializer::default();
        let data = s.proof_data(&payload(&[1, 2]), 2).unwrap();
        assert!(matches!(
            s.commitment(CircuitType::DscCheck, CommitmentSide::In, &data),
            Err(SerializerError::Unsupported { .. })
        ));
    }

    #[test]
    fn vk_to_fields_requires_whole_chunks() {
        let s = ChunkedSerializer::default();
        assert_eq!(s.vk_to_fields(&[0u8; 64]).unwrap().len(), 2);
        assert!(matches!(
            s.vk_to_fields(&[0u8; 33]),
            Err(SerializerError::MalformedVerificationKey(_))
        ));
    }

    #[test]
    fn yaml_override_keeps_unlisted_defaults() {
        let layouts = CircuitLayouts::from_yaml_str(
            "disclosure:\n  count: 5\n  commitment_in: 1\n  nullifier: last\n",
        )
        .unwrap();
        assert_eq!(layouts.disclosure.count, 5);
        assert_eq!(layouts.disclosure.commitment_in, Some(InputIndex::At(1)));
        assert_eq!(layouts.integrity, CircuitLayouts::default().integrity);
    }

    #[test]
    fn yaml_rejects_out_of_range_index() {
        let err = CircuitLayouts::from_yaml_str(
            "dsc:\n  count: 2\n  merkle_root: 0\n  commitment_out: 4\n",
        )
        .unwrap_err();
        assert!(matches!(err, LayoutError::Invalid { circuit: CircuitType::DscCheck, .. }));
    }

    #[test]
    fn yaml_rejects_missing_rule_input() {
        let err = CircuitLayouts::from_yaml_str("disclosure:\n  count: 3\n  commitment_in: 0\n")
            .unwrap_err();
        assert!(matches!(err, LayoutError::Invalid { .. }));
    }

    #[test]
    fn input_index_resolves() {
        assert_eq!(InputIndex::At(1).resolve(2), Some(1));
        assert_eq!(InputIndex::At(2).resolve(2), None);
        assert_eq!(InputIndex::Last.resolve(3), Some(2));
        assert_eq!(InputIndex::Last.resolve(0), None);
    }
}
