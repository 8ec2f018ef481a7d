//! # Membership Verifier Trait
//!
//! The interface every membership proof backend satisfies. The bridge only
//! ever sees this trait, so mock and real verifiers are interchangeable.
//!
//! ## Security Invariant
//!
//! The trait requires `Send + Sync` bounds so one verifier can serve
//! concurrent readers. Verification is a pure function of the statement
//! and the proof.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use vouch_core::Bytes32;

/// Error during proof generation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProofError {
    /// The Merkle path does not prove the identity's commitment.
    #[error("witness error: {0}")]
    WitnessError(String),
    /// The requested statement is not provable.
    #[error("circuit error: {0}")]
    CircuitError(String),
}

/// Error during proof verification.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VerifyError {
    /// The proof is structurally malformed.
    #[error("malformed proof: {0}")]
    MalformedProof(String),
    /// The statement is outside what the verifier supports.
    #[error("unsupported statement: {0}")]
    UnsupportedStatement(String),
}

/// Public inputs of a membership proof.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MembershipStatement {
    /// Depth of the group tree the proof was built against.
    pub merkle_tree_depth: u8,
    /// Group root the member's commitment is included under.
    pub merkle_root: Bytes32,
    /// Application message bound into the proof.
    pub signal: Bytes32,
    /// Scope-specific nullifier hash; one per member per scope.
    pub nullifier_hash: Bytes32,
    /// Scope the proof was made for.
    pub external_nullifier: Bytes32,
}

/// A membership proof: eight 256-bit words.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MembershipProof(pub [Bytes32; 8]);

impl MembershipProof {
    /// The proof words.
    pub fn words(&self) -> &[Bytes32; 8] {
        &self.0
    }
}

/// Verifies membership proofs.
pub trait MembershipVerifier: Send + Sync {
    /// Check `proof` against `statement`.
    ///
    /// `Ok(false)` is a well-formed proof that does not verify; `Err` is a
    /// proof or statement the backend cannot evaluate.
    fn verify(
        &self,
        statement: &MembershipStatement,
        proof: &MembershipProof,
    ) -> Result<bool, VerifyError>;
}
