//! # vouch-crypto: Cryptographic Primitives
//!
//! Provides the cryptographic building blocks for vouch:
//!
//! - **Keccak-256** hashing for claim identifiers, selection seeds, group
//!   ids, and Merkle nodes.
//! - **secp256k1** public-key recovery from 65-byte witness signatures over
//!   EIP-191 personal-message digests, plus key generation and signing for
//!   witness tooling.
//! - **Incremental Merkle tree** of fixed depth for membership groups, with
//!   inclusion proofs.
//!
//! ## Crate Policy
//!
//! - Depends only on `vouch-core` internally.
//! - No mocking of cryptographic operations in tests: signatures are real
//!   secp256k1 signatures and hashes are real Keccak-256.
//! - Private keys are never serialized or logged.

pub mod keccak;
pub mod merkle;
pub mod secp256k1;

pub use keccak::{keccak256, Keccak256Hasher};
pub use merkle::{IncrementalMerkleTree, MerkleProof, MAX_DEPTH, MIN_DEPTH};
pub use secp256k1::{eth_signed_message_hash, recover_address, WitnessKeyPair};
