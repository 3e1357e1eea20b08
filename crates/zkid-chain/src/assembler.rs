//! # Proof Chain Assembler
//!
//! Takes the prover's proof results, assigns each to its sub-circuit slot,
//! formats the four slots concurrently, and verifies commitment linkage
//! before handing back a [`ContractProofData`] bundle.
//!
//! ## Security Invariant
//!
//! Under [`ChainPolicy::Strict`] (the default) a bundle is only returned when
//! every link holds: the outgoing commitment of each sub-circuit equals the
//! incoming commitment of the next. A verifier contract rejects a broken
//! chain anyway; failing here gives the caller a precise diagnosis instead of
//! a reverted transaction.
//!
//! ## Slot Selection
//!
//! Proofs are classified by name and placed by type, so input order does not
//! matter. Out-of-order input is reported as a warning. Selection fails, in
//! this order, on: any missing type, any duplicated type, any unknown name.

use std::fmt;

use serde::{Deserialize, Serialize};

use zkid_core::{
    classify, extract_zk_id, CircuitType, Classification, ContractProofData, Field, ProofResult,
};
use zkid_registry::VerificationKeySource;

use crate::error::AssemblyError;
use crate::formatter::SubCircuitFormatter;
use crate::serializer::CircuitSerializer;

/// What to do when commitment linkage is broken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChainPolicy {
    /// Fail with [`AssemblyError::ChainIntegrity`].
    #[default]
    Strict,
    /// Log, record in the report, and return the bundle.
    Permissive,
}

/// One commitment link between consecutive sub-circuits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainLink {
    /// Producing sub-circuit.
    pub from: CircuitType,
    /// Consuming sub-circuit.
    pub to: CircuitType,
    /// `from`'s outgoing commitment.
    pub output: Field,
    /// `to`'s incoming commitment.
    pub input: Field,
}

impl ChainLink {
    /// Whether the commitments agree.
    pub fn is_intact(&self) -> bool {
        self.output == self.input
    }
}

impl fmt::Display for ChainLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_intact() {
            write!(f, "{} -> {}", self.from, self.to)
        } else {
            write!(f, "{} -> {} ({} != {})", self.from, self.to, self.output, self.input)
        }
    }
}

/// The three links of a bundle, in chain order.
///
/// Link `i` compares the second public input of slot `i` with the first of
/// slot `i + 1`. For the DSC slot the second input is its outgoing commitment.
pub fn verify_chain(data: &ContractProofData) -> [ChainLink; 3] {
    [
        (CircuitType::DscCheck, CircuitType::IdDataCheck),
        (CircuitType::IdDataCheck, CircuitType::IntegrityCheck),
        (CircuitType::IntegrityCheck, CircuitType::DisclosureCheck),
    ]
    .map(|(from, to)| ChainLink {
        from,
        to,
        output: data.public_inputs_for(from)[1],
        input: data.public_inputs_for(to)[0],
    })
}

/// A proof found at a position other than its canonical one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderWarning {
    /// Zero-based position in the input.
    pub position: usize,
    /// Type canonical order expects there.
    pub expected: CircuitType,
    /// What was found.
    pub found: Classification,
}

impl fmt::Display for OrderWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "position {}: expected {}, found {}",
            self.position, self.expected, self.found
        )
    }
}

/// Diagnostics gathered during assembly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssemblyReport {
    /// Classification of every input proof, in input order.
    pub detected_order: Vec<Classification>,
    /// Positional mismatches against canonical order.
    pub order_warnings: Vec<OrderWarning>,
    /// Every commitment link, intact or not.
    pub links: [ChainLink; 3],
}

impl AssemblyReport {
    /// Whether every link holds.
    pub fn is_chain_intact(&self) -> bool {
        self.links.iter().all(ChainLink::is_intact)
    }

    /// The links that do not hold.
    pub fn broken_links(&self) -> Vec<ChainLink> {
        self.links.iter().filter(|l| !l.is_intact()).copied().collect()
    }
}

/// Successful assembly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assembly {
    /// The contract bundle.
    pub bundle: ContractProofData,
    /// The nullifier published as the zkID.
    pub zk_id: Field,
    /// Diagnostics.
    pub report: AssemblyReport,
}

/// Assembles four proof results into a contract bundle.
#[derive(Debug, Clone)]
pub struct ProofChainAssembler<S, K> {
    formatter: SubCircuitFormatter<S, K>,
    policy: ChainPolicy,
}

impl<S: CircuitSerializer, K: VerificationKeySource> ProofChainAssembler<S, K> {
    /// Assembler with the default [`ChainPolicy::Strict`].
    pub fn new(formatter: SubCircuitFormatter<S, K>) -> Self {
        Self {
            formatter,
            policy: ChainPolicy::default(),
        }
    }

    /// Replace the chain policy.
    pub fn with_policy(mut self, policy: ChainPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Current chain policy.
    pub fn policy(&self) -> ChainPolicy {
        self.policy
    }

    /// The underlying formatter.
    pub fn formatter(&self) -> &SubCircuitFormatter<S, K> {
        &self.formatter
    }

    /// Format and verify `proofs`, returning the bundle and a report.
    pub async fn assemble(&self, proofs: &[ProofResult]) -> Result<Assembly, AssemblyError> {
        tracing::info!(count = proofs.len(), policy = ?self.policy, "assembling proof chain");

        let detected: Vec<Classification> =
            proofs.iter().map(|p| classify(p.name_or_empty())).collect();
        let order_warnings = order_warnings(&detected);
        for warning in &order_warnings {
            tracing::warn!(%warning, "proof out of canonical order");
        }

        let [a, b, c, d] = select_slots(proofs, &detected)?;
        let f = &self.formatter;
        let (a, b, c, d) = tokio::try_join!(
            f.format(a, CircuitType::DscCheck),
            f.format(b, CircuitType::IdDataCheck),
            f.format(c, CircuitType::IntegrityCheck),
            f.format(d, CircuitType::DisclosureCheck),
        )?;
        let bundle = ContractProofData::from_slots([a, b, c, d]);

        let links = verify_chain(&bundle);
        let broken: Vec<ChainLink> = links.iter().filter(|l| !l.is_intact()).copied().collect();
        if broken.is_empty() {
            tracing::info!("proof chain linkage verified");
        } else {
            for link in &broken {
                tracing::warn!(%link, "broken commitment link");
            }
            if self.policy == ChainPolicy::Strict {
                return Err(AssemblyError::ChainIntegrity { broken });
            }
        }

        let zk_id = extract_zk_id(&bundle).ok_or(AssemblyError::MissingNullifier)?;
        tracing::info!(%zk_id, "proof chain assembled");

        Ok(Assembly {
            bundle,
            zk_id,
            report: AssemblyReport {
                detected_order: detected,
                order_warnings,
                links,
            },
        })
    }

    /// Format `proofs` into the contract bundle.
    pub async fn format_proofs_for_contract(
        &self,
        proofs: &[ProofResult],
    ) -> Result<ContractProofData, AssemblyError> {
        self.assemble(proofs).await.map(|assembly| assembly.bundle)
    }
}

fn order_warnings(detected: &[Classification]) -> Vec<OrderWarning> {
    detected
        .iter()
        .zip(CircuitType::ALL)
        .enumerate()
        .filter(|(_, (found, expected))| **found != Classification::Known(*expected))
        .map(|(position, (found, expected))| OrderWarning {
            position,
            expected,
            found: *found,
        })
        .collect()
}

fn select_slots<'a>(
    proofs: &'a [ProofResult],
    detected: &[Classification],
) -> Result<[&'a ProofResult; 4], AssemblyError> {
    let mut by_type: [Vec<&'a ProofResult>; 4] = Default::default();
    let mut unknown = Vec::new();
    for (proof, class) in proofs.iter().zip(detected) {
        match class {
            Classification::Known(ct) => by_type[ct.index()].push(proof),
            Classification::Unknown => unknown.push(proof.name_or_empty().to_string()),
        }
    }

    let missing: Vec<CircuitType> = CircuitType::ALL
        .into_iter()
        .filter(|ct| by_type[ct.index()].is_empty())
        .collect();
    if !missing.is_empty() {
        return Err(AssemblyError::MissingProof { missing });
    }
    if let Some(circuit) = CircuitType::ALL.into_iter().find(|ct| by_type[ct.index()].len() > 1) {
        let names = by_type[circuit.index()]
            .iter()
            .map(|p| p.name_or_empty().to_string())
            .collect();
        return Err(AssemblyError::DuplicateProof { circuit, names });
    }
    if !unknown.is_empty() {
        return Err(AssemblyError::UnknownProof { names: unknown });
    }

    Ok(CircuitType::ALL.map(|ct| by_type[ct.index()][0]))
}
