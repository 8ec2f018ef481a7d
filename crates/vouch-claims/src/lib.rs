//! # vouch-claims: Claim Verification
//!
//! Checks that a claim was attested by exactly the witnesses its epoch
//! selects for it, in selection order.
//!
//! - **Identifier** (`identifier.rs`): the canonical claim hash and the
//!   byte-exact payload witnesses sign.
//!
//! - **Verifier** (`verifier.rs`): `verify_proof`, a pure gate over an
//!   epoch registry snapshot with no side effects.
//!
//! - **Context** (`context.rs`): substring extraction of `"key":"value"`
//!   fields from the caller-defined context payload.
//!
//! - **Signer** (`signer.rs`): witness-side signing of claim data, used by
//!   tooling and tests.
//!
//! ## Security Invariant
//!
//! Signatures are matched to witnesses by position. A signer counts only
//! at the position the selection assigned to it, so no witness can be
//! counted twice and no permutation of valid signatures verifies.

pub mod context;
pub mod identifier;
pub mod signer;
pub mod verifier;

pub use context::extract_field_from_context;
pub use identifier::{hash_claim_info, signing_payload};
pub use signer::{create_signed_claim, sign_claim};
pub use verifier::{fetch_witnesses_for_claim, provider_from_proof, verify_proof, VerifiedClaim};
