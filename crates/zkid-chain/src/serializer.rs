//! # Circuit Serializer Trait
//!
//! The binary layout of proofs and verification keys belongs to the proving
//! system, not to this crate. [`CircuitSerializer`] is the narrow seam to
//! that knowledge: six operations, nothing more, so that the formatter and
//! assembler can be exercised against fakes.
//!
//! [`ChunkedSerializer`](crate::layout::ChunkedSerializer) is the reference
//! binding for the flat 32-byte layout the passport circuits use.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use zkid_core::{CircuitType, CodecError, Field, PublicInputKind};

use crate::layout::InputIndex;

/// A proof split into its public inputs and proof body, as hex field strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofData {
    /// Every public input the circuit declares, in circuit order.
    pub public_inputs: Vec<String>,
    /// The proof body.
    pub proof: Vec<String>,
}

/// Which end of a sub-circuit's commitment link to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommitmentSide {
    /// The commitment received from the previous sub-circuit.
    In,
    /// The commitment handed to the next sub-circuit.
    Out,
}

/// Error raised by a [`CircuitSerializer`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SerializerError {
    /// The encoded proof could not be split.
    #[error("malformed proof payload: {0}")]
    MalformedProof(String),
    /// The circuit name maps to no known public-input layout.
    #[error("no public-input layout for circuit \"{0}\"")]
    UnknownCircuit(String),
    /// A layout index points past the proof's public inputs.
    #[error("public input {index} requested but the proof carries {available}")]
    MissingPublicInput {
        /// Requested position, as written in the layout.
        index: InputIndex,
        /// Number of public inputs present.
        available: usize,
    },
    /// The circuit has no public input of this kind.
    #[error("{circuit} exposes no {kind}")]
    Unsupported {
        /// The circuit asked.
        circuit: CircuitType,
        /// The kind requested.
        kind: PublicInputKind,
    },
    /// The verification key bytes do not match the expected layout.
    #[error("malformed verification key: {0}")]
    MalformedVerificationKey(String),
    /// A field element failed to decode.
    #[error(transparent)]
    Codec(#[from] CodecError),
}

/// Knowledge of the proving system's proof and verification key layout.
pub trait CircuitSerializer: Send + Sync {
    /// Split an encoded proof whose first `num_public_inputs` fields are public inputs.
    fn proof_data(
        &self,
        encoded_proof: &str,
        num_public_inputs: usize,
    ) -> Result<ProofData, SerializerError>;

    /// Number of public inputs the named circuit declares.
    fn number_of_public_inputs(&self, circuit_name: &str) -> Result<usize, SerializerError>;

    /// Certificate registry root exposed by the DSC check.
    fn merkle_root(&self, proof: &ProofData) -> Result<Field, SerializerError>;

    /// Incoming or outgoing commitment of `circuit`.
    fn commitment(
        &self,
        circuit: CircuitType,
        side: CommitmentSide,
        proof: &ProofData,
    ) -> Result<Field, SerializerError>;

    /// Scoped nullifier exposed by the disclosure check.
    fn nullifier(&self, proof: &ProofData) -> Result<Field, SerializerError>;

    /// Verification key bytes as hex field strings.
    fn vk_to_fields(&self, vkey: &[u8]) -> Result<Vec<String>, SerializerError>;
}

/// Read one semantic public input, dispatching on its kind.
pub fn extract_public_input<S: CircuitSerializer + ?Sized>(
    serializer: &S,
    circuit: CircuitType,
    kind: PublicInputKind,
    proof: &ProofData,
) -> Result<Field, SerializerError> {
    match kind {
        PublicInputKind::MerkleRoot => serializer.merkle_root(proof),
        PublicInputKind::CommitmentIn => serializer.commitment(circuit, CommitmentSide::In, proof),
        PublicInputKind::CommitmentOut => serializer.commitment(circuit, CommitmentSide::Out, proof),
        PublicInputKind::Nullifier => serializer.nullifier(proof),
    }
}

/// Extract the two public inputs `circuit` contributes to the bundle.
pub fn extract_public_inputs<S: CircuitSerializer + ?Sized>(
    serializer: &S,
    circuit: CircuitType,
    proof: &ProofData,
) -> Result<Vec<Field>, SerializerError> {
    circuit
        .public_input_rule()
        .into_iter()
        .map(|kind| extract_public_input(serializer, circuit, kind, proof))
        .collect()
}
