//! # Field/Bytes Codec
//!
//! Lossless conversion between the encodings that arrive from provers and
//! key hosts (base64 verification-key blobs, hex field strings, raw bytes)
//! and canonical [`Field`] arrays.
//!
//! Nothing here truncates: every length mismatch surfaces as a
//! [`CodecError`].

use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine;

use crate::error::CodecError;
use crate::field::{Field, FIELD_BYTES};

/// Decode standard (padded) base64. Surrounding whitespace is ignored.
pub fn decode_base64_to_bytes(input: &str) -> Result<Vec<u8>, CodecError> {
    BASE64_STANDARD
        .decode(input.trim())
        .map_err(|e| CodecError::Decode(e.to_string()))
}

/// Encode bytes as standard (padded) base64.
pub fn encode_bytes_to_base64(bytes: &[u8]) -> String {
    BASE64_STANDARD.encode(bytes)
}

/// Parse a `0x`-prefixed or bare big-endian hex string as a field element.
pub fn hex_to_field(input: &str) -> Result<Field, CodecError> {
    Field::from_hex(input)
}

/// Parse every string of a hex field list, failing on the first bad entry.
pub fn hex_strings_to_fields<S: AsRef<str>>(values: &[S]) -> Result<Vec<Field>, CodecError> {
    values.iter().map(|v| hex_to_field(v.as_ref())).collect()
}

/// Right-pad `elements` with `pad` up to `target` elements.
///
/// Input already at `target` is returned unchanged. Input longer than
/// `target` is a [`CodecError::Size`]; it is never truncated.
pub fn pad_to_length(
    mut elements: Vec<Field>,
    target: usize,
    pad: Field,
) -> Result<Vec<Field>, CodecError> {
    if elements.len() > target {
        return Err(CodecError::Size {
            what: "padded field array",
            expected: target,
            actual: elements.len(),
        });
    }
    elements.resize(target, pad);
    Ok(elements)
}

/// Split a byte string into consecutive 32-byte big-endian field elements.
pub fn bytes_to_field_chunks(bytes: &[u8], what: &'static str) -> Result<Vec<Field>, CodecError> {
    if bytes.len() % FIELD_BYTES != 0 {
        return Err(CodecError::Misaligned {
            what,
            len: bytes.len(),
            width: FIELD_BYTES,
        });
    }
    bytes
        .chunks_exact(FIELD_BYTES)
        .map(Field::from_be_bytes)
        .collect()
}

/// Convert a validated vector into a fixed-size, heap-allocated array.
pub fn fixed_array<const N: usize>(
    elements: Vec<Field>,
    what: &'static str,
) -> Result<Box<[Field; N]>, CodecError> {
    let actual = elements.len();
    elements
        .into_boxed_slice()
        .try_into()
        .map_err(|_| CodecError::Size {
            what,
            expected: N,
            actual,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base64_decodes_known_value() {
        assert_eq!(decode_base64_to_bytes("AQID").unwrap(), vec![1, 2, 3]);
        assert_eq!(decode_base64_to_bytes("  AQID\n").unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn base64_rejects_malformed_input() {
        let err = decode_base64_to_bytes("not base64!").unwrap_err();
        assert!(matches!(err, CodecError::Decode(_)));
    }

    #[test]
    fn hex_list_fails_on_first_bad_entry() {
        let values = vec!["0x01".to_string(), "0xg1".to_string(), "0x03".to_string()];
        let err = hex_strings_to_fields(&values).unwrap_err();
        match err {
            CodecError::Parse { input, .. } => assert_eq!(input, "0xg1"),
            other => panic!("expected Parse, got {other:?}"),
        }
    }

    #[test]
    fn pad_fills_with_pad_value() {
        let padded = pad_to_length(vec![Field::from_u64(7)], 3, Field::zero()).unwrap();
        assert_eq!(padded, vec![Field::from_u64(7), Field::ZERO, Field::ZERO]);
    }

    #[test]
    fn pad_never_truncates() {
        let err = pad_to_length(vec![Field::ZERO; 457], 456, Field::ZERO).unwrap_err();
        assert_eq!(
            err,
            CodecError::Size {
                what: "padded field array",
                expected: 456,
                actual: 457
            }
        );
    }

    #[test]
    fn pad_at_target_is_unchanged() {
        let input: Vec<Field> = (0..456).map(Field::from_u64).collect();
        let padded = pad_to_length(input.clone(), 456, Field::ZERO).unwrap();
        assert_eq!(padded, input);
    }

    #[test]
    fn chunks_split_big_endian() {
        let mut bytes = vec![0u8; 64];
        bytes[31] = 10;
        bytes[63] = 20;
        let fields = bytes_to_field_chunks(&bytes, "test bytes").unwrap();
        assert_eq!(fields, vec![Field::from_u64(10), Field::from_u64(20)]);
    }

    #[test]
    fn chunks_reject_partial_trailing_chunk() {
        let err = bytes_to_field_chunks(&[0u8; 40], "vkey bytes").unwrap_err();
        assert!(matches!(err, CodecError::Misaligned { len: 40, .. }));
    }

    #[test]
    fn fixed_array_checks_exact_length() {
        let ok = fixed_array::<2>(vec![Field::ZERO, Field::ZERO], "public inputs").unwrap();
        assert_eq!(ok.len(), 2);
        let err = fixed_array::<128>(vec![Field::ZERO; 127], "verification key").unwrap_err();
        assert_eq!(
            err,
            CodecError::Size {
                what: "verification key",
                expected: 128,
                actual: 127
            }
        );
    }
}
