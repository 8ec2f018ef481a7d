//! # Incremental Merkle Tree
//!
//! A fixed-depth binary Merkle tree filled left to right. Each membership
//! group owns one; its leaves are member identity commitments and its root
//! is what membership proofs are checked against.
//!
//! ## Algorithm
//!
//! Domain-separated Keccak-256:
//! - Leaf: `keccak256(0x00 || commitment)`.
//! - Node: `keccak256(0x01 || left || right)`.
//!
//! Unfilled positions hold the leaf hash of the all-zero commitment, so the
//! root of a partially filled tree is well defined at every size. Only the
//! filled prefix of each level is stored; the right-hand remainder is
//! taken from the precomputed zero-subtree hashes.

use serde::{Deserialize, Serialize};
use vouch_core::error::CryptoError;
use vouch_core::Bytes32;

use crate::keccak::Keccak256Hasher;

/// Smallest supported tree depth.
pub const MIN_DEPTH: u8 = 1;
/// Largest supported tree depth (about four billion leaves).
pub const MAX_DEPTH: u8 = 32;

// ---------------------------------------------------------------------------
// Hashing
// ---------------------------------------------------------------------------

/// Leaf hash: `keccak256(0x00 || commitment)`.
pub fn leaf_hash(commitment: &Bytes32) -> Bytes32 {
    let mut h = Keccak256Hasher::new();
    h.update([0x00]).update(commitment.as_bytes());
    h.finalize()
}

/// Interior node hash: `keccak256(0x01 || left || right)`.
pub fn node_hash(left: &Bytes32, right: &Bytes32) -> Bytes32 {
    let mut h = Keccak256Hasher::new();
    h.update([0x01]).update(left.as_bytes()).update(right.as_bytes());
    h.finalize()
}

/// `zeros[l]` is the root of an empty subtree of height `l`.
fn zero_hashes(depth: u8) -> Vec<Bytes32> {
    let mut zeros = Vec::with_capacity(usize::from(depth) + 1);
    zeros.push(leaf_hash(&Bytes32::ZERO));
    for l in 0..usize::from(depth) {
        let z = zeros[l];
        zeros.push(node_hash(&z, &z));
    }
    zeros
}

// ---------------------------------------------------------------------------
// Tree
// ---------------------------------------------------------------------------

/// An append-only Merkle tree of fixed depth.
#[derive(Debug, Clone)]
pub struct IncrementalMerkleTree {
    depth: u8,
    /// Member commitments in insertion order.
    leaves: Vec<Bytes32>,
    /// `levels[l]` holds the filled prefix of level `l` (0 = leaf hashes).
    levels: Vec<Vec<Bytes32>>,
    zeros: Vec<Bytes32>,
}

impl IncrementalMerkleTree {
    /// Create an empty tree of `depth` levels.
    pub fn new(depth: u8) -> Result<Self, CryptoError> {
        if !(MIN_DEPTH..=MAX_DEPTH).contains(&depth) {
            return Err(CryptoError::Merkle(format!(
                "depth {depth} outside {MIN_DEPTH}..={MAX_DEPTH}"
            )));
        }
        Ok(Self {
            depth,
            leaves: Vec::new(),
            levels: vec![Vec::new(); usize::from(depth)],
            zeros: zero_hashes(depth),
        })
    }

    /// Tree depth.
    pub fn depth(&self) -> u8 {
        self.depth
    }

    /// Number of inserted leaves.
    pub fn size(&self) -> u64 {
        self.leaves.len() as u64
    }

    /// Maximum number of leaves, `2^depth`.
    pub fn capacity(&self) -> u64 {
        1u64 << self.depth
    }

    /// Whether every leaf position is taken.
    pub fn is_full(&self) -> bool {
        self.size() >= self.capacity()
    }

    /// Commitment stored at `index`.
    pub fn leaf(&self, index: u64) -> Option<&Bytes32> {
        usize::try_from(index).ok().and_then(|i| self.leaves.get(i))
    }

    /// Position of the first leaf equal to `commitment`.
    pub fn index_of(&self, commitment: &Bytes32) -> Option<u64> {
        self.leaves
            .iter()
            .position(|l| l == commitment)
            .map(|i| i as u64)
    }

    /// Current root.
    pub fn root(&self) -> Bytes32 {
        let top = usize::from(self.depth);
        match self.levels[top - 1].as_slice() {
            [] => self.zeros[top],
            [only] => node_hash(only, &self.zeros[top - 1]),
            [left, right, ..] => node_hash(left, right),
        }
    }

    /// Append `commitment` and return its leaf index.
    pub fn insert(&mut self, commitment: Bytes32) -> Result<u64, CryptoError> {
        if self.is_full() {
            return Err(CryptoError::Merkle(format!(
                "tree of depth {} is full",
                self.depth
            )));
        }
        let index = self.leaves.len();
        self.leaves.push(commitment);

        let mut pos = index;
        let mut node = leaf_hash(&commitment);
        for l in 0..usize::from(self.depth) {
            let level = &mut self.levels[l];
            if pos == level.len() {
                level.push(node);
            } else {
                level[pos] = node;
            }
            let sibling = if pos % 2 == 0 {
                level.get(pos + 1).copied().unwrap_or(self.zeros[l])
            } else {
                level[pos - 1]
            };
            node = if pos % 2 == 0 {
                node_hash(&node, &sibling)
            } else {
                node_hash(&sibling, &node)
            };
            pos /= 2;
        }
        Ok(index as u64)
    }

    /// Inclusion proof for the leaf at `index` against the current root.
    pub fn inclusion_proof(&self, index: u64) -> Result<MerkleProof, CryptoError> {
        let leaf = *self
            .leaf(index)
            .ok_or_else(|| CryptoError::Merkle(format!("leaf index {index} out of range")))?;

        let mut pos = index as usize;
        let mut siblings = Vec::with_capacity(usize::from(self.depth));
        for l in 0..usize::from(self.depth) {
            let sibling_pos = pos ^ 1;
            siblings.push(
                self.levels[l]
                    .get(sibling_pos)
                    .copied()
                    .unwrap_or(self.zeros[l]),
            );
            pos /= 2;
        }

        Ok(MerkleProof {
            leaf,
            leaf_index: index,
            siblings,
            root: self.root(),
        })
    }
}

// ---------------------------------------------------------------------------
// Inclusion proof
// ---------------------------------------------------------------------------

/// A Merkle inclusion proof for one leaf.
///
/// `siblings[l]` is the sibling at level `l`, leaf level first. Bit `l` of
/// `leaf_index` says whether the running hash is the right child (`1`) or
/// the left child (`0`) at that level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MerkleProof {
    /// The proved commitment.
    pub leaf: Bytes32,
    /// Its position in the tree.
    pub leaf_index: u64,
    /// Sibling path, leaf level first.
    pub siblings: Vec<Bytes32>,
    /// Root the proof was generated against.
    pub root: Bytes32,
}

impl MerkleProof {
    /// Tree depth implied by the path length.
    pub fn depth(&self) -> usize {
        self.siblings.len()
    }

    /// Fold the path into a root.
    pub fn compute_root(&self) -> Bytes32 {
        let mut node = leaf_hash(&self.leaf);
        for (l, sibling) in self.siblings.iter().enumerate() {
            node = if (self.leaf_index >> l) & 1 == 0 {
                node_hash(&node, sibling)
            } else {
                node_hash(sibling, &node)
            };
        }
        node
    }

    /// Whether the path is well-formed and folds to `self.root`.
    pub fn verify(&self) -> bool {
        let depth = self.siblings.len();
        if depth < usize::from(MIN_DEPTH) || depth > usize::from(MAX_DEPTH) {
            return false;
        }
        if (self.leaf_index >> depth) != 0 {
            return false;
        }
        self.compute_root() == self.root
    }
}
