//! # Proof Data Model
//!
//! - [`ProofResult`]: one raw proof as produced by the external prover.
//! - [`SubCircuitProof`]: one formatted sub-circuit (vkey, proof, 2 public inputs).
//! - [`ContractProofData`]: the four sub-circuits laid out in the slot/field
//!   names the on-chain verifier expects (`vkey_a`, `proof_b`, `input_d`, ...).
//!
//! ## Size Invariants
//!
//! Verification keys hold exactly [`VKEY_SIZE`] elements, proofs exactly
//! [`PROOF_SIZE`], public inputs exactly [`PUBLIC_INPUTS_SIZE`]. These are
//! fixed-size arrays, so a constructed value cannot violate them, and
//! deserialization re-checks every length.

use serde::{Deserialize, Serialize};

use crate::circuit::CircuitType;
use crate::codec::fixed_array;
use crate::error::{CodecError, MissingFieldError, ProofResultField};
use crate::field::Field;

/// Verification key length in field elements.
pub const VKEY_SIZE: usize = 128;

/// Proof length in field elements (shorter proofs are zero-padded).
pub const PROOF_SIZE: usize = 456;

/// Public inputs contributed per sub-circuit.
pub const PUBLIC_INPUTS_SIZE: usize = 2;

/// A raw proof as delivered by the proving device.
///
/// Every field is optional on the wire; absence is reported by
/// [`ProofResult::require_fields`] rather than by deserialization, so a
/// malformed entry fails with a precise error instead of a serde message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProofResult {
    /// Packaged circuit name, e.g. `sig_check_dsc_tbs_700_rsa_pkcs_4096_sha512`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Circuit package version, e.g. `0.5.2`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Hash of the verification key the prover used.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vkey_hash: Option<String>,
    /// Encoded proof payload (hex, public inputs first).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proof: Option<String>,
}

/// Borrowed view of a [`ProofResult`] whose required fields are present.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequiredFields<'a> {
    /// Circuit name.
    pub name: &'a str,
    /// Circuit package version.
    pub version: &'a str,
    /// Verification key hash.
    pub vkey_hash: &'a str,
    /// Encoded proof payload.
    pub proof: &'a str,
}

impl ProofResult {
    /// Build a complete proof result.
    pub fn new(
        name: impl Into<String>,
        version: impl Into<String>,
        vkey_hash: impl Into<String>,
        proof: impl Into<String>,
    ) -> Self {
        Self {
            name: Some(name.into()),
            version: Some(version.into()),
            vkey_hash: Some(vkey_hash.into()),
            proof: Some(proof.into()),
        }
    }

    /// The circuit name, or `""` when absent.
    pub fn name_or_empty(&self) -> &str {
        self.name.as_deref().unwrap_or_default()
    }

    /// Check that name, vkeyHash, version, and proof are present and non-empty.
    pub fn require_fields(&self) -> Result<RequiredFields<'_>, MissingFieldError> {
        fn present<'a>(
            value: &'a Option<String>,
            field: ProofResultField,
        ) -> Result<&'a str, MissingFieldError> {
            match value.as_deref() {
                Some(v) if !v.trim().is_empty() => Ok(v),
                _ => Err(MissingFieldError(field)),
            }
        }

        Ok(RequiredFields {
            name: present(&self.name, ProofResultField::Name)?,
            vkey_hash: present(&self.vkey_hash, ProofResultField::VkeyHash)?,
            version: present(&self.version, ProofResultField::Version)?,
            proof: present(&self.proof, ProofResultField::Proof)?,
        })
    }
}

/// One formatted sub-circuit, ready for the contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubCircuitProof {
    /// Verification key fields.
    #[serde(with = "field_array")]
    pub vkey: Box<[Field; VKEY_SIZE]>,
    /// Proof fields, zero-padded.
    #[serde(with = "field_array")]
    pub proof: Box<[Field; PROOF_SIZE]>,
    /// The two semantic public inputs, per [`CircuitType::public_input_rule`].
    pub public_inputs: [Field; PUBLIC_INPUTS_SIZE],
}

impl SubCircuitProof {
    /// Validate sizes and assemble. `proof` must already be padded.
    pub fn new(
        vkey: Vec<Field>,
        proof: Vec<Field>,
        public_inputs: Vec<Field>,
    ) -> Result<Self, CodecError> {
        Ok(Self {
            vkey: fixed_array::<VKEY_SIZE>(vkey, "verification key")?,
            proof: fixed_array::<PROOF_SIZE>(proof, "proof")?,
            public_inputs: *fixed_array::<PUBLIC_INPUTS_SIZE>(public_inputs, "public inputs")?,
        })
    }

    /// First public input (commitment in, or the Merkle root for DSC).
    pub fn commitment_in(&self) -> Field {
        self.public_inputs[0]
    }

    /// Second public input (commitment out, or the nullifier for disclosure).
    pub fn commitment_out(&self) -> Field {
        self.public_inputs[1]
    }
}

/// Verification keys keyed by slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationKeys {
    /// DSC check.
    #[serde(with = "field_array")]
    pub vkey_a: Box<[Field; VKEY_SIZE]>,
    /// ID data check.
    #[serde(with = "field_array")]
    pub vkey_b: Box<[Field; VKEY_SIZE]>,
    /// Integrity check.
    #[serde(with = "field_array")]
    pub vkey_c: Box<[Field; VKEY_SIZE]>,
    /// Disclosure check.
    #[serde(with = "field_array")]
    pub vkey_d: Box<[Field; VKEY_SIZE]>,
}

/// Proofs keyed by slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofFields {
    /// DSC check.
    #[serde(with = "field_array")]
    pub proof_a: Box<[Field; PROOF_SIZE]>,
    /// ID data check.
    #[serde(with = "field_array")]
    pub proof_b: Box<[Field; PROOF_SIZE]>,
    /// Integrity check.
    #[serde(with = "field_array")]
    pub proof_c: Box<[Field; PROOF_SIZE]>,
    /// Disclosure check.
    #[serde(with = "field_array")]
    pub proof_d: Box<[Field; PROOF_SIZE]>,
}

/// Public inputs keyed by slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicInputs {
    /// `[merkle_root, commitment_out]`.
    pub input_a: [Field; PUBLIC_INPUTS_SIZE],
    /// `[commitment_in, commitment_out]`.
    pub input_b: [Field; PUBLIC_INPUTS_SIZE],
    /// `[commitment_in, commitment_out]`.
    pub input_c: [Field; PUBLIC_INPUTS_SIZE],
    /// `[commitment_in, nullifier]`.
    pub input_d: [Field; PUBLIC_INPUTS_SIZE],
}

impl PublicInputs {
    /// Public inputs of one sub-circuit.
    pub fn get(&self, circuit: CircuitType) -> &[Field; PUBLIC_INPUTS_SIZE] {
        match circuit {
            CircuitType::DscCheck => &self.input_a,
            CircuitType::IdDataCheck => &self.input_b,
            CircuitType::IntegrityCheck => &self.input_c,
            CircuitType::DisclosureCheck => &self.input_d,
        }
    }
}

/// The complete bundle handed to the on-chain verifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractProofData {
    /// Verification keys per slot.
    pub vkeys: VerificationKeys,
    /// Proofs per slot.
    pub proofs: ProofFields,
    /// Public inputs per slot.
    pub public_inputs: PublicInputs,
}

impl ContractProofData {
    /// Lay out four formatted sub-circuits given in canonical order (a, b, c, d).
    pub fn from_slots(slots: [SubCircuitProof; 4]) -> Self {
        let [a, b, c, d] = slots;
        Self {
            public_inputs: PublicInputs {
                input_a: a.public_inputs,
                input_b: b.public_inputs,
                input_c: c.public_inputs,
                input_d: d.public_inputs,
            },
            vkeys: VerificationKeys {
                vkey_a: a.vkey,
                vkey_b: b.vkey,
                vkey_c: c.vkey,
                vkey_d: d.vkey,
            },
            proofs: ProofFields {
                proof_a: a.proof,
                proof_b: b.proof,
                proof_c: c.proof,
                proof_d: d.proof,
            },
        }
    }

    /// Public inputs of one sub-circuit.
    pub fn public_inputs_for(&self, circuit: CircuitType) -> &[Field; PUBLIC_INPUTS_SIZE] {
        self.public_inputs.get(circuit)
    }

    /// Verification key of one sub-circuit.
    pub fn vkey_for(&self, circuit: CircuitType) -> &[Field; VKEY_SIZE] {
        match circuit {
            CircuitType::DscCheck => &self.vkeys.vkey_a,
            CircuitType::IdDataCheck => &self.vkeys.vkey_b,
            CircuitType::IntegrityCheck => &self.vkeys.vkey_c,
            CircuitType::DisclosureCheck => &self.vkeys.vkey_d,
        }
    }

    /// Proof fields of one sub-circuit.
    pub fn proof_for(&self, circuit: CircuitType) -> &[Field; PROOF_SIZE] {
        match circuit {
            CircuitType::DscCheck => &self.proofs.proof_a,
            CircuitType::IdDataCheck => &self.proofs.proof_b,
            CircuitType::IntegrityCheck => &self.proofs.proof_c,
            CircuitType::DisclosureCheck => &self.proofs.proof_d,
        }
    }
}

/// Read the zkID (terminal nullifier) from `public_inputs.input_d[1]`.
///
/// A zero nullifier is reported as absent.
pub fn extract_zk_id(data: &ContractProofData) -> Option<Field> {
    let nullifier = data.public_inputs.input_d[1];
    (!nullifier.is_zero()).then_some(nullifier)
}

/// Serde adapter for boxed fixed-size field arrays (serde derives stop at 32).
mod field_array {
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    use crate::field::Field;

    #[allow(clippy::borrowed_box)]
    pub fn serialize<S: Serializer, const N: usize>(
        arr: &Box<[Field; N]>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(arr.iter())
    }

    pub fn deserialize<'de, D: Deserializer<'de>, const N: usize>(
        deserializer: D,
    ) -> Result<Box<[Field; N]>, D::Error> {
        let elements = Vec::<Field>::deserialize(deserializer)?;
        let len = elements.len();
        elements.into_boxed_slice().try_into().map_err(|_| {
            D::Error::invalid_length(len, &format!("{N} field elements").as_str())
        })
    }
}
