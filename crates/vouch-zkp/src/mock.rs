//! # Mock Membership Proof System
//!
//! A deterministic, transparent proof system for development and testing.
//! Produces SHA-256-based "proofs" that are verifiable but provide **no
//! zero-knowledge guarantees**.
//!
//! ## How It Works
//!
//! - `prove()` checks the member's witness locally (the Merkle path must
//!   prove the identity's commitment), derives the public statement, and
//!   emits eight words chained from a digest of that statement:
//!   `w0 = SHA256(tag || statement)`, `wi = SHA256(w(i-1) || i)`.
//! - `verify()` recomputes the chain from the statement and compares.
//!
//! ## Security Warning
//!
//! **NOT SOUND, NOT PRIVATE.** Anyone can recompute a valid proof for any
//! statement. The mock binds a proof to its public inputs and nothing
//! more; it exists so the bridge's nullifier, scope, and root-history
//! rules can be exercised end to end without a real circuit.

use sha2::{Digest, Sha256};
use vouch_core::Bytes32;
use vouch_crypto::merkle::{MerkleProof, MAX_DEPTH, MIN_DEPTH};

use crate::identity::MemberIdentity;
use crate::traits::{
    MembershipProof, MembershipStatement, MembershipVerifier, ProofError, VerifyError,
};

const DOMAIN_TAG: &[u8] = b"vouch.mock-membership.v1";

/// Deterministic transparent prover and verifier.
#[derive(Debug, Default, Clone, Copy)]
pub struct MockMembershipSystem;

impl MockMembershipSystem {
    /// Prove that `identity` is the leaf proved by `merkle_proof`, for the
    /// scope `external_nullifier` and message `signal`.
    pub fn prove(
        &self,
        identity: &MemberIdentity,
        merkle_proof: &MerkleProof,
        signal: Bytes32,
        external_nullifier: Bytes32,
    ) -> Result<(MembershipStatement, MembershipProof), ProofError> {
        if merkle_proof.leaf != identity.commitment() {
            return Err(ProofError::WitnessError(
                "merkle proof is for a different commitment".into(),
            ));
        }
        if !merkle_proof.verify() {
            return Err(ProofError::WitnessError(
                "merkle proof does not fold to its root".into(),
            ));
        }
        let depth = u8::try_from(merkle_proof.depth())
            .map_err(|_| ProofError::CircuitError("merkle depth exceeds u8".into()))?;

        let statement = MembershipStatement {
            merkle_tree_depth: depth,
            merkle_root: merkle_proof.root,
            signal,
            nullifier_hash: identity.nullifier_hash(&external_nullifier),
            external_nullifier,
        };
        Ok((statement, proof_words(&statement)))
    }
}

impl MembershipVerifier for MockMembershipSystem {
    fn verify(
        &self,
        statement: &MembershipStatement,
        proof: &MembershipProof,
    ) -> Result<bool, VerifyError> {
        if !(MIN_DEPTH..=MAX_DEPTH).contains(&statement.merkle_tree_depth) {
            return Err(VerifyError::UnsupportedStatement(format!(
                "merkle tree depth {} outside {MIN_DEPTH}..={MAX_DEPTH}",
                statement.merkle_tree_depth
            )));
        }
        Ok(proof_words(statement) == *proof)
    }
}

fn proof_words(statement: &MembershipStatement) -> MembershipProof {
    let mut h = Sha256::new();
    h.update(DOMAIN_TAG);
    h.update([statement.merkle_tree_depth]);
    h.update(statement.merkle_root.as_bytes());
    h.update(statement.signal.as_bytes());
    h.update(statement.nullifier_hash.as_bytes());
    h.update(statement.external_nullifier.as_bytes());

    let mut words = [Bytes32::ZERO; 8];
    words[0] = Bytes32::from_bytes(h.finalize().into());
    for i in 1..words.len() {
        let mut h = Sha256::new();
        h.update(words[i - 1].as_bytes());
        h.update([i as u8]);
        words[i] = Bytes32::from_bytes(h.finalize().into());
    }
    MembershipProof(words)
}
