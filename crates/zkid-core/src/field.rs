//! # Field Elements
//!
//! [`Field`] is the atomic numeric unit of proofs, verification keys, and
//! public inputs: a non-negative integer stored in canonical 32-byte
//! big-endian form.
//!
//! ## Invariant
//!
//! A `Field` never holds more than 32 significant bytes. Inputs wider than
//! that are rejected at construction rather than silently reduced, so two
//! `Field`s compare equal exactly when the integers they encode are equal.

use std::fmt;
use std::str::FromStr;

use num_bigint::BigUint;
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::CodecError;

/// Width of a canonical field element in bytes.
pub const FIELD_BYTES: usize = 32;

/// A field element in canonical 32-byte big-endian form.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Field([u8; FIELD_BYTES]);

impl Field {
    /// The zero element.
    pub const ZERO: Field = Field([0u8; FIELD_BYTES]);

    /// Return the zero element.
    pub fn zero() -> Self {
        Self::ZERO
    }

    /// Build a field element from a small integer.
    pub fn from_u64(value: u64) -> Self {
        let mut bytes = [0u8; FIELD_BYTES];
        bytes[FIELD_BYTES - 8..].copy_from_slice(&value.to_be_bytes());
        Self(bytes)
    }

    /// Build a field element from big-endian bytes.
    ///
    /// Leading zero bytes are ignored; at most [`FIELD_BYTES`] significant
    /// bytes are accepted.
    pub fn from_be_bytes(bytes: &[u8]) -> Result<Self, CodecError> {
        let first = bytes.iter().position(|b| *b != 0).unwrap_or(bytes.len());
        let significant = &bytes[first..];
        if significant.len() > FIELD_BYTES {
            return Err(CodecError::Parse {
                input: format!("0x{}", hex::encode(bytes)),
                reason: format!(
                    "{} significant bytes exceed the {FIELD_BYTES}-byte field width",
                    significant.len()
                ),
            });
        }
        let mut out = [0u8; FIELD_BYTES];
        out[FIELD_BYTES - significant.len()..].copy_from_slice(significant);
        Ok(Self(out))
    }

    /// Parse a big-endian hex string, with or without a `0x` prefix.
    ///
    /// Odd-length input is read as if it carried one leading `0` nibble.
    pub fn from_hex(input: &str) -> Result<Self, CodecError> {
        let trimmed = input.trim();
        let digits = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .unwrap_or(trimmed);
        if digits.is_empty() {
            return Err(CodecError::Parse {
                input: input.to_string(),
                reason: "no hex digits".to_string(),
            });
        }

        let decoded = if digits.len() % 2 == 1 {
            hex::decode(format!("0{digits}"))
        } else {
            hex::decode(digits)
        };
        let bytes = decoded.map_err(|e| CodecError::Parse {
            input: input.to_string(),
            reason: e.to_string(),
        })?;

        Self::from_be_bytes(&bytes).map_err(|_| CodecError::Parse {
            input: input.to_string(),
            reason: format!("value is wider than {FIELD_BYTES} bytes"),
        })
    }

    /// Borrow the canonical big-endian bytes.
    pub fn as_bytes(&self) -> &[u8; FIELD_BYTES] {
        &self.0
    }

    /// Copy out the canonical big-endian bytes.
    pub fn to_be_bytes(self) -> [u8; FIELD_BYTES] {
        self.0
    }

    /// Whether this is the zero element.
    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|b| *b == 0)
    }

    /// `0x`-prefixed, zero-padded, lowercase hex (66 characters).
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }

    /// Base-10 rendering, as shown to end users for zkIDs.
    pub fn to_decimal_string(&self) -> String {
        BigUint::from_bytes_be(&self.0).to_str_radix(10)
    }
}

impl From<u64> for Field {
    fn from(value: u64) -> Self {
        Self::from_u64(value)
    }
}

impl FromStr for Field {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Field({})", self.to_hex())
    }
}

impl Serialize for Field {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Field {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(FieldVisitor)
    }
}

struct FieldVisitor;

impl<'de> Visitor<'de> for FieldVisitor {
    type Value = Field;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a hex string or a non-negative integer")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Field, E> {
        Field::from_hex(v).map_err(E::custom)
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Field, E> {
        Ok(Field::from_u64(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Field, E> {
        u64::try_from(v)
            .map(Field::from_u64)
            .map_err(|_| E::custom(format!("negative field element {v}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefixed_and_bare_hex_agree() {
        let a = Field::from_hex("0x2f8a").unwrap();
        let b = Field::from_hex("2f8a").unwrap();
        assert_eq!(a, b);
        assert_eq!(a, Field::from_u64(0x2f8a));
    }

    #[test]
    fn odd_length_hex_is_left_padded() {
        assert_eq!(Field::from_hex("0xa").unwrap(), Field::from_u64(10));
        assert_eq!(Field::from_hex("abc").unwrap(), Field::from_u64(0xabc));
    }

    #[test]
    fn uppercase_prefix_and_digits_accepted() {
        assert_eq!(Field::from_hex("0XFF").unwrap(), Field::from_u64(255));
    }

    #[test]
    fn rejects_non_hex_characters() {
        let err = Field::from_hex("0xzz").unwrap_err();
        assert!(matches!(err, CodecError::Parse { .. }));
    }

    #[test]
    fn rejects_empty_input() {
        assert!(Field::from_hex("").is_err());
        assert!(Field::from_hex("0x").is_err());
    }

    #[test]
    fn rejects_values_wider_than_32_bytes() {
        let wide = format!("0x01{}", "00".repeat(32));
        assert!(Field::from_hex(&wide).is_err());
    }

    #[test]
    fn accepts_leading_zero_bytes_beyond_width() {
        let padded = format!("0x{}{}", "00".repeat(8), "11".repeat(32));
        let f = Field::from_hex(&padded).unwrap();
        assert_eq!(f.as_bytes(), &[0x11; 32]);
    }

    #[test]
    fn real_commitment_parses() {
        let hex = "0x2f8a00b3644fdca8dd2fbc2c8c8ffe82a8997d572ef8c4aec58d65c5a9d17f9c";
        let f = Field::from_hex(hex).unwrap();
        assert_eq!(f.to_hex(), hex);
    }

    #[test]
    fn decimal_rendering() {
        assert_eq!(Field::from_u64(99).to_decimal_string(), "99");
        assert_eq!(Field::ZERO.to_decimal_string(), "0");
    }

    #[test]
    fn serde_uses_hex_strings_and_accepts_integers() {
        let f = Field::from_u64(20);
        let json = serde_json::to_string(&f).unwrap();
        assert_eq!(
            json,
            "\"0x0000000000000000000000000000000000000000000000000000000000000014\""
        );
        let back: Field = serde_json::from_str(&json).unwrap();
        assert_eq!(back, f);
        let from_int: Field = serde_json::from_str("20").unwrap();
        assert_eq!(from_int, f);
        assert!(serde_json::from_str::<Field>("-1").is_err());
    }
}
