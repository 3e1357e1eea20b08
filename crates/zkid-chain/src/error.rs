//! Error types for sub-circuit formatting and chain assembly.

use std::fmt;

use thiserror::Error;

use zkid_core::{CircuitType, CodecError, MissingFieldError};
use zkid_registry::RegistryError;

use crate::assembler::ChainLink;
use crate::serializer::SerializerError;

/// Step of sub-circuit formatting at which a failure occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormatStage {
    /// Splitting the encoded proof and decoding its fields.
    ProofFields,
    /// Decoding the verification key.
    VerificationKey,
    /// Reading the semantic public inputs.
    PublicInputs,
    /// Final size validation of the assembled sub-circuit.
    SizeCheck,
}

impl fmt::Display for FormatStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ProofFields => write!(f, "decoding proof fields"),
            Self::VerificationKey => write!(f, "decoding verification key"),
            Self::PublicInputs => write!(f, "extracting public inputs"),
            Self::SizeCheck => write!(f, "validating sizes"),
        }
    }
}

/// Why a sub-circuit could not be formatted.
#[derive(Error, Debug)]
pub enum FormatErrorKind {
    /// A required proof result field is absent.
    #[error(transparent)]
    MissingField(#[from] MissingFieldError),

    /// A value failed to decode or had the wrong size.
    #[error("{stage}: {source}")]
    Codec {
        /// Where it failed.
        stage: FormatStage,
        /// Underlying codec error.
        source: CodecError,
    },

    /// The serializer rejected the proof or key.
    #[error("{stage}: {source}")]
    Serializer {
        /// Where it failed.
        stage: FormatStage,
        /// Underlying serializer error.
        source: SerializerError,
    },

    /// The verification key lookup failed.
    #[error("verification key lookup failed: {0}")]
    Registry(#[from] RegistryError),
}

/// Failure formatting one sub-circuit. Names the circuit and the cause.
#[derive(Error, Debug)]
#[error("failed to format {circuit} proof \"{name}\": {kind}")]
pub struct FormatError {
    /// Target slot of the failing proof.
    pub circuit: CircuitType,
    /// Circuit name from the proof result (empty when absent).
    pub name: String,
    /// Cause.
    #[source]
    pub kind: FormatErrorKind,
}

/// Failure assembling the four-proof chain.
#[derive(Error, Debug)]
pub enum AssemblyError {
    /// One or more sub-circuit types have no proof.
    #[error("missing proofs for: {}", join(missing))]
    MissingProof {
        /// Every absent type, in chain order.
        missing: Vec<CircuitType>,
    },

    /// More than one proof classified as the same type.
    #[error("{circuit} supplied more than once: {}", names.join(", "))]
    DuplicateProof {
        /// The over-supplied type.
        circuit: CircuitType,
        /// Names of the competing proofs.
        names: Vec<String>,
    },

    /// Proofs whose names match no sub-circuit.
    #[error("unrecognised proof names: {}", names.join(", "))]
    UnknownProof {
        /// The unmatched names.
        names: Vec<String>,
    },

    /// A sub-circuit failed to format.
    #[error(transparent)]
    Format(#[from] FormatError),

    /// Commitment linkage between consecutive sub-circuits is broken.
    #[error("proof chain broken at: {}", join(broken))]
    ChainIntegrity {
        /// Every broken link.
        broken: Vec<ChainLink>,
    },

    /// The disclosure proof carries a zero nullifier.
    #[error("disclosure proof carries no nullifier")]
    MissingNullifier,
}

fn join<T: fmt::Display>(items: &[T]) -> String {
    items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
