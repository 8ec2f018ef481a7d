//! # API Route Modules
//!
//! - `epochs`: Witness committees and per-claim witness selection.
//! - `claims`: Claim proof verification and context field extraction.
//! - `groups`: Provider groups, inclusion proofs, and merkelization.
//! - `dapps`: Dapp scopes and membership proof verification.

pub mod claims;
pub mod dapps;
pub mod epochs;
pub mod groups;
