//! # zkid-chain -- Proof Chain Assembly
//!
//! Formats the four sub-circuit proofs of a passport verification into the
//! single bundle the on-chain verifier consumes, and checks that they form
//! one chain.
//!
//! ## Pipeline
//!
//! ```text
//! [ProofResult; 4] --classify--> slots a..d
//!     --SubCircuitFormatter (x4, concurrent)--> [SubCircuitProof; 4]
//!     --verify_chain--> ContractProofData + zkID
//! ```
//!
//! ## Seams
//!
//! - [`CircuitSerializer`]: proof and verification key layout of the proving
//!   system. [`ChunkedSerializer`] is the reference binding.
//! - [`VerificationKeySource`](zkid_registry::VerificationKeySource): where
//!   verification keys come from.
//!
//! ## Crate Policy
//!
//! - No I/O of its own beyond what the key source performs.
//! - No retries. A failed sub-circuit fails the whole assembly.
//! - Synthetic proofs live behind the `mock` feature.

pub mod assembler;
pub mod error;
pub mod formatter;
pub mod layout;
#[cfg(feature = "mock")]
pub mod mock;
pub mod serializer;

pub use assembler::{
    verify_chain, Assembly, AssemblyReport, ChainLink, ChainPolicy, OrderWarning,
    ProofChainAssembler,
};
pub use error::{AssemblyError, FormatError, FormatErrorKind, FormatStage};
pub use formatter::SubCircuitFormatter;
pub use layout::{ChunkedSerializer, CircuitLayouts, InputIndex, LayoutError, PublicInputLayout};
pub use serializer::{
    extract_public_input, extract_public_inputs, CircuitSerializer, CommitmentSide, ProofData,
    SerializerError,
};

/// Assembler over the reference serializer with default layouts.
pub fn chunked_assembler<K: zkid_registry::VerificationKeySource>(
    keys: K,
) -> ProofChainAssembler<ChunkedSerializer, K> {
    ProofChainAssembler::new(SubCircuitFormatter::new(ChunkedSerializer::default(), keys))
}
