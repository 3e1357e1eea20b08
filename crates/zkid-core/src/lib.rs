#![deny(missing_docs)]

//! # zkid-core -- Foundational Types for zkID Proof-Chain Assembly
//!
//! This crate defines the types every other crate in the workspace depends
//! on. It has no internal crate dependencies and performs no I/O.
//!
//! ## Design Principles
//!
//! 1. **One canonical [`Field`] form.** Every numeric value that reaches the
//!    contract is a 32-byte big-endian field element. Hex strings, base64
//!    blobs, and raw bytes are converted at the edge by the [`codec`] module.
//!
//! 2. **Sizes are types.** [`SubCircuitProof`] and [`ContractProofData`] hold
//!    fixed-size arrays (128 / 456 / 2). An undersized verification key cannot
//!    be represented, only rejected.
//!
//! 3. **Closed [`CircuitType`] enum.** Four variants, exhaustive `match`
//!    everywhere. String keywords are consulted exactly once, in [`classify`].

pub mod circuit;
pub mod codec;
pub mod error;
pub mod field;
pub mod proof;

// Re-export primary types at crate root for ergonomic imports.
pub use circuit::{classify, CircuitType, Classification, PublicInputKind};
pub use codec::{
    bytes_to_field_chunks, decode_base64_to_bytes, encode_bytes_to_base64, fixed_array,
    hex_strings_to_fields, hex_to_field, pad_to_length,
};
pub use error::{CodecError, MissingFieldError, ProofResultField};
pub use field::{Field, FIELD_BYTES};
pub use proof::{
    extract_zk_id, ContractProofData, ProofFields, ProofResult, PublicInputs, RequiredFields,
    SubCircuitProof, VerificationKeys, PROOF_SIZE, PUBLIC_INPUTS_SIZE, VKEY_SIZE,
};
