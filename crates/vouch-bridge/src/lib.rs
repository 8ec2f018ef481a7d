//! # vouch-bridge: Group & Credential Bridge
//!
//! Turns a verified claim into an anonymous group membership, and checks
//! later membership proofs against the groups.
//!
//! ## Lifecycle per provider group
//!
//! ```text
//! NonExistent ──create_group / first merkelize_user──▶ Created ──merkelize_user──▶ …
//! ```
//!
//! ## Invariants
//!
//! - A claim identifier is merkelized at most once, into the group of its
//!   provider. One observed fact mints one membership.
//! - A `(dapp, nullifierHash)` pair verifies at most once.
//! - A membership proof for dapp `d` must be scoped to `d`: its external
//!   nullifier is the 32-byte form of `d`.
//!
//! Every operation checks all preconditions before mutating, so an error
//! leaves groups, the merkelized ledger, and nullifier sets unchanged.

pub mod bridge;
pub mod membership;

pub use bridge::{Bridge, MerkelizeReceipt};
pub use membership::{GroupRef, MembershipRequest, VerifiedMembership};
