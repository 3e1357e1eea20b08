//! # Sub-Circuit Formatter
//!
//! Turns one raw [`ProofResult`] into a [`SubCircuitProof`]:
//!
//! 1. Split the proof into public inputs and body, decode the body to field
//!    elements and zero-pad it to [`PROOF_SIZE`].
//! 2. Fetch the circuit's verification key, decode base64 to bytes and bytes
//!    to exactly [`VKEY_SIZE`] fields.
//! 3. Read the two public inputs named by the circuit's public-input rule.
//!
//! The registry lookup in step 2 is the only await point.
//!
//! [`PROOF_SIZE`]: zkid_core::PROOF_SIZE
//! [`VKEY_SIZE`]: zkid_core::VKEY_SIZE

use zkid_core::{
    hex_strings_to_fields, hex_to_field, pad_to_length, CircuitType, CodecError, Field, ProofResult,
    SubCircuitProof, PROOF_SIZE,
};
use zkid_registry::VerificationKeySource;

use crate::error::{FormatError, FormatErrorKind, FormatStage};
use crate::serializer::{extract_public_inputs, CircuitSerializer, SerializerError};

/// Formats individual sub-circuit proofs.
#[derive(Debug, Clone)]
pub struct SubCircuitFormatter<S, K> {
    serializer: S,
    keys: K,
}

fn codec(stage: FormatStage) -> impl FnOnce(CodecError) -> FormatErrorKind {
    move |source| FormatErrorKind::Codec { stage, source }
}

/// Hashes compare as field values when both parse, else as trimmed text.
fn same_vkey_hash(hosted: &str, claimed: &str) -> bool {
    match (hex_to_field(hosted), hex_to_field(claimed)) {
        (Ok(a), Ok(b)) => a == b,
        _ => hosted.trim().eq_ignore_ascii_case(claimed.trim()),
    }
}

fn serializer(stage: FormatStage) -> impl FnOnce(SerializerError) -> FormatErrorKind {
    move |source| FormatErrorKind::Serializer { stage, source }
}

impl<S: CircuitSerializer, K: VerificationKeySource> SubCircuitFormatter<S, K> {
    /// Formatter over `serializer`, resolving keys from `keys`.
    pub fn new(serializer: S, keys: K) -> Self {
        Self { serializer, keys }
    }

    /// The proof serializer.
    pub fn serializer(&self) -> &S {
        &self.serializer
    }

    /// The verification key source.
    pub fn keys(&self) -> &K {
        &self.keys
    }

    /// Format `result` for the `circuit` slot.
    pub async fn format(
        &self,
        result: &ProofResult,
        circuit: CircuitType,
    ) -> Result<SubCircuitProof, FormatError> {
        let name = result.name_or_empty();
        self.format_inner(result, circuit)
            .await
            .map_err(|kind| FormatError {
                circuit,
                name: name.to_string(),
                kind,
            })
    }

    async fn format_inner(
        &self,
        result: &ProofResult,
        circuit: CircuitType,
    ) -> Result<SubCircuitProof, FormatErrorKind> {
        let fields = result.require_fields()?;
        tracing::debug!(%circuit, name = fields.name, version = fields.version, "formatting sub-circuit");

        let num_inputs = self
            .serializer
            .number_of_public_inputs(fields.name)
            .map_err(serializer(FormatStage::ProofFields))?;
        let proof_data = self
            .serializer
            .proof_data(fields.proof, num_inputs)
            .map_err(serializer(FormatStage::ProofFields))?;
        let proof = hex_strings_to_fields(&proof_data.proof).map_err(codec(FormatStage::ProofFields))?;
        let proof = pad_to_length(proof, PROOF_SIZE, Field::ZERO).map_err(codec(FormatStage::ProofFields))?;

        let packaged = self
            .keys
            .fetch_verification_key(fields.name, fields.version)
            .await?;
        if let Some(hosted) = packaged.vkey_hash.as_deref() {
            if !same_vkey_hash(hosted, fields.vkey_hash) {
                tracing::warn!(
                    %circuit,
                    name = fields.name,
                    claimed = fields.vkey_hash,
                    hosted,
                    "verification key hash differs from the one the prover reported"
                );
            }
        }
        let vkey_bytes = packaged.vkey_bytes().map_err(codec(FormatStage::VerificationKey))?;
        let vkey_strings = self
            .serializer
            .vk_to_fields(&vkey_bytes)
            .map_err(serializer(FormatStage::VerificationKey))?;
        let vkey = hex_strings_to_fields(&vkey_strings).map_err(codec(FormatStage::VerificationKey))?;

        let public_inputs = extract_public_inputs(&self.serializer, circuit, &proof_data)
            .map_err(serializer(FormatStage::PublicInputs))?;

        let formatted =
            SubCircuitProof::new(vkey, proof, public_inputs).map_err(codec(FormatStage::SizeCheck))?;
        tracing::debug!(
            %circuit,
            commitment_in = %formatted.public_inputs[0],
            commitment_out = %formatted.public_inputs[1],
            "sub-circuit formatted"
        );
        Ok(formatted)
    }
}
