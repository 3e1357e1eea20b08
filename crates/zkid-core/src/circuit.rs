//! # Sub-Circuit Types
//!
//! The passport verification protocol is split into four sub-circuits whose
//! proofs chain into one another. [`CircuitType`] is the closed set of those
//! sub-circuits; [`classify`] maps a prover-supplied circuit name onto it.
//!
//! ## Classification
//!
//! Names are matched case-insensitively by keyword substring, testing the
//! types in canonical order and taking the first hit. Circuit names carry
//! algorithm and size suffixes (`sig_check_dsc_tbs_700_rsa_pkcs_4096_sha512`),
//! so exact matching is not possible.
//!
//! ## Public-input rule
//!
//! Every sub-circuit contributes exactly two public inputs to the contract
//! bundle. Which two is fixed per type by [`CircuitType::public_input_rule`].

use std::fmt;

use serde::{Deserialize, Serialize};

/// One of the four sub-circuits of the passport verification protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CircuitType {
    /// Document Signer Certificate check (slot `a`).
    DscCheck,
    /// ID data signature check (slot `b`).
    IdDataCheck,
    /// Data integrity check (slot `c`).
    IntegrityCheck,
    /// Selective disclosure check (slot `d`), which emits the nullifier.
    DisclosureCheck,
}

/// The semantic meaning of a public input exposed to the contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PublicInputKind {
    /// Root of the certificate registry Merkle tree.
    MerkleRoot,
    /// Commitment received from the previous sub-circuit.
    CommitmentIn,
    /// Commitment handed to the next sub-circuit.
    CommitmentOut,
    /// Scoped nullifier, published as the zkID.
    Nullifier,
}

impl CircuitType {
    /// All sub-circuits in canonical chain order.
    pub const ALL: [CircuitType; 4] = [
        CircuitType::DscCheck,
        CircuitType::IdDataCheck,
        CircuitType::IntegrityCheck,
        CircuitType::DisclosureCheck,
    ];

    /// Lowercase keywords identifying this sub-circuit inside a circuit name.
    pub fn keywords(self) -> &'static [&'static str] {
        match self {
            Self::DscCheck => &["dsc"],
            Self::IdDataCheck => &["id_data", "id_attribute"],
            Self::IntegrityCheck => &["integrity"],
            Self::DisclosureCheck => &["disclose", "disclosure"],
        }
    }

    /// Position in the canonical chain (0..4).
    pub fn index(self) -> usize {
        match self {
            Self::DscCheck => 0,
            Self::IdDataCheck => 1,
            Self::IntegrityCheck => 2,
            Self::DisclosureCheck => 3,
        }
    }

    /// Contract slot letter (`a`..`d`).
    pub fn slot(self) -> char {
        match self {
            Self::DscCheck => 'a',
            Self::IdDataCheck => 'b',
            Self::IntegrityCheck => 'c',
            Self::DisclosureCheck => 'd',
        }
    }

    /// The two public inputs this sub-circuit contributes, in bundle order.
    pub fn public_input_rule(self) -> [PublicInputKind; 2] {
        match self {
            Self::DscCheck => [PublicInputKind::MerkleRoot, PublicInputKind::CommitmentOut],
            Self::IdDataCheck | Self::IntegrityCheck => {
                [PublicInputKind::CommitmentIn, PublicInputKind::CommitmentOut]
            }
            Self::DisclosureCheck => [PublicInputKind::CommitmentIn, PublicInputKind::Nullifier],
        }
    }

    /// The sub-circuit that consumes this one's output commitment, if any.
    pub fn next(self) -> Option<CircuitType> {
        Self::ALL.get(self.index() + 1).copied()
    }
}

impl fmt::Display for CircuitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DscCheck => write!(f, "DSC check"),
            Self::IdDataCheck => write!(f, "ID data check"),
            Self::IntegrityCheck => write!(f, "integrity check"),
            Self::DisclosureCheck => write!(f, "disclosure check"),
        }
    }
}

impl fmt::Display for PublicInputKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MerkleRoot => write!(f, "merkle root"),
            Self::CommitmentIn => write!(f, "commitment in"),
            Self::CommitmentOut => write!(f, "commitment out"),
            Self::Nullifier => write!(f, "nullifier"),
        }
    }
}

/// Outcome of classifying a circuit name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Classification {
    /// The name matched one of the four sub-circuits.
    Known(CircuitType),
    /// The name matched no keyword.
    Unknown,
}

impl Classification {
    /// The matched circuit type, if any.
    pub fn circuit(self) -> Option<CircuitType> {
        match self {
            Self::Known(ct) => Some(ct),
            Self::Unknown => None,
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Known(ct) => write!(f, "{ct}"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

/// Classify a circuit name by keyword.
pub fn classify(name: &str) -> Classification {
    let lowered = name.to_ascii_lowercase();
    CircuitType::ALL
        .into_iter()
        .find(|ct| ct.keywords().iter().any(|kw| lowered.contains(kw)))
        .map_or(Classification::Unknown, Classification::Known)
}
