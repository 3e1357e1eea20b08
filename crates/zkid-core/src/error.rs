//! # Error Hierarchy
//!
//! Structured error types for the codec and data model, built with `thiserror`.
//! Each variant carries the offending input or the sizes involved so that a
//! failure can be attributed without re-running the pipeline.

use std::fmt;

use thiserror::Error;

/// Errors converting between encoded representations and field elements.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// Malformed base64 input.
    #[error("invalid base64 input: {0}")]
    Decode(String),

    /// A string could not be parsed as a hex field element.
    #[error("invalid field element \"{input}\": {reason}")]
    Parse {
        /// The rejected input, verbatim.
        input: String,
        /// Why it was rejected.
        reason: String,
    },

    /// A field array does not have the required number of elements.
    ///
    /// Raised both for exact-size checks and when padding would have to
    /// truncate (padding never drops elements).
    #[error("{what} has {actual} field elements, expected {expected}")]
    Size {
        /// Which array was being validated.
        what: &'static str,
        /// The required element count.
        expected: usize,
        /// The element count actually present.
        actual: usize,
    },

    /// A byte string cannot be split into whole 32-byte field elements.
    #[error("{what} is {len} bytes, not a multiple of {width}")]
    Misaligned {
        /// Which byte string was being split.
        what: &'static str,
        /// Its length in bytes.
        len: usize,
        /// The chunk width in bytes.
        width: usize,
    },
}

/// The fields of a [`ProofResult`](crate::ProofResult) that formatting depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProofResultField {
    /// The circuit name (used for classification and key lookup).
    Name,
    /// The circuit package version.
    Version,
    /// The verification key hash reported by the prover.
    VkeyHash,
    /// The encoded proof payload.
    Proof,
}

impl fmt::Display for ProofResultField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name => write!(f, "name"),
            Self::Version => write!(f, "version"),
            Self::VkeyHash => write!(f, "vkeyHash"),
            Self::Proof => write!(f, "proof"),
        }
    }
}

/// A proof result lacks a field that formatting requires.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("proof result is missing required field `{0}`")]
pub struct MissingFieldError(pub ProofResultField);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_error_names_array_and_counts() {
        let err = CodecError::Size {
            what: "verification key",
            expected: 128,
            actual: 127,
        };
        let msg = err.to_string();
        assert!(msg.contains("verification key"));
        assert!(msg.contains("127"));
        assert!(msg.contains("128"));
    }

    #[test]
    fn misaligned_display() {
        let err = CodecError::Misaligned {
            what: "proof bytes",
            len: 33,
            width: 32,
        };
        assert_eq!(err.to_string(), "proof bytes is 33 bytes, not a multiple of 32");
    }

    #[test]
    fn missing_field_uses_wire_name() {
        let err = MissingFieldError(ProofResultField::VkeyHash);
        assert_eq!(err.to_string(), "proof result is missing required field `vkeyHash`");
    }
}
