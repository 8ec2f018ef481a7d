//! # Keccak-256
//!
//! The single hash function of the protocol. Note this is the original
//! Keccak padding (as used by Ethereum), not NIST SHA3-256.

use sha3::{Digest, Keccak256};
use vouch_core::Bytes32;

/// Hash `data` with Keccak-256.
pub fn keccak256(data: impl AsRef<[u8]>) -> Bytes32 {
    let mut hasher = Keccak256::new();
    hasher.update(data.as_ref());
    Bytes32::from_bytes(hasher.finalize().into())
}

/// Incremental Keccak-256 over several byte slices.
///
/// Equivalent to hashing the concatenation of every `update` call.
#[derive(Clone, Default)]
pub struct Keccak256Hasher(Keccak256);

impl Keccak256Hasher {
    /// Start an empty hash.
    pub fn new() -> Self {
        Self(Keccak256::new())
    }

    /// Append bytes.
    pub fn update(&mut self, data: impl AsRef<[u8]>) -> &mut Self {
        self.0.update(data.as_ref());
        self
    }

    /// Finish and return the digest.
    pub fn finalize(self) -> Bytes32 {
        Bytes32::from_bytes(self.0.finalize().into())
    }
}
