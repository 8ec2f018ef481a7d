//! # Member Identity
//!
//! A member holds two secrets, a trapdoor and a nullifier. Only the
//! commitment derived from them is ever published (as a group leaf):
//!
//! ```text
//! secret        = keccak256(nullifier || trapdoor)
//! commitment    = keccak256(secret)
//! nullifierHash = keccak256(nullifier || externalNullifier)
//! ```
//!
//! The nullifier hash is deterministic per scope, so a member can prove
//! membership once per external nullifier without revealing which leaf
//! they are.

use rand::RngCore;
use vouch_core::Bytes32;
use vouch_crypto::{keccak256, Keccak256Hasher};

/// A member's secrets.
///
/// Does not implement `Serialize`: the secrets never leave the holder.
#[derive(Clone, PartialEq, Eq)]
pub struct MemberIdentity {
    trapdoor: Bytes32,
    nullifier: Bytes32,
}

impl MemberIdentity {
    /// Fresh random identity.
    pub fn generate() -> Self {
        let mut rng = rand::rngs::OsRng;
        let mut trapdoor = [0u8; 32];
        let mut nullifier = [0u8; 32];
        rng.fill_bytes(&mut trapdoor);
        rng.fill_bytes(&mut nullifier);
        Self::from_secrets(Bytes32::from_bytes(trapdoor), Bytes32::from_bytes(nullifier))
    }

    /// Deterministic identity derived from a seed phrase.
    pub fn from_seed(seed: &[u8]) -> Self {
        let mut t = Keccak256Hasher::new();
        t.update(b"vouch.identity.trapdoor").update(seed);
        let mut n = Keccak256Hasher::new();
        n.update(b"vouch.identity.nullifier").update(seed);
        Self::from_secrets(t.finalize(), n.finalize())
    }

    /// Identity from explicit secrets.
    pub fn from_secrets(trapdoor: Bytes32, nullifier: Bytes32) -> Self {
        Self {
            trapdoor,
            nullifier,
        }
    }

    /// The public commitment inserted into group trees.
    pub fn commitment(&self) -> Bytes32 {
        let mut h = Keccak256Hasher::new();
        h.update(self.nullifier.as_bytes())
            .update(self.trapdoor.as_bytes());
        keccak256(h.finalize().as_bytes())
    }

    /// Nullifier hash for one scope.
    pub fn nullifier_hash(&self, external_nullifier: &Bytes32) -> Bytes32 {
        let mut h = Keccak256Hasher::new();
        h.update(self.nullifier.as_bytes())
            .update(external_nullifier.as_bytes());
        h.finalize()
    }
}

impl std::fmt::Debug for MemberIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "MemberIdentity(commitment: {})", self.commitment())
    }
}
