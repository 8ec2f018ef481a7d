//! # vouch-zkp: Membership Proofs
//!
//! Defines the seam between the credential bridge and whatever
//! zero-knowledge system proves group membership.
//!
//! ## Architecture
//!
//! - **Traits** (`traits.rs`): [`MembershipVerifier`] checks a proof against
//!   its public statement `(depth, root, signal, nullifierHash,
//!   externalNullifier)`. Proofs are eight 256-bit words, the Groth16 point
//!   layout used by deployed membership verifiers.
//!
//! - **Identity** (`identity.rs`): [`MemberIdentity`] holds the member's
//!   secrets and derives the commitment inserted into a group tree and the
//!   per-scope nullifier hash.
//!
//! - **Mock** (`mock.rs`): [`MockMembershipSystem`] is a deterministic,
//!   transparent prover/verifier pair for local tooling and tests.
//!
//! ## Crate Policy
//!
//! - Depends on `vouch-core` and `vouch-crypto` internally.
//! - No `unsafe` in mock implementation.

pub mod identity;
#[cfg(feature = "mock")]
pub mod mock;
pub mod traits;

pub use identity::MemberIdentity;
#[cfg(feature = "mock")]
pub use mock::MockMembershipSystem;
pub use traits::{
    MembershipProof, MembershipStatement, MembershipVerifier, ProofError, VerifyError,
};
