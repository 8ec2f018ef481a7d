#![deny(missing_docs)]

//! # vouch-core: Foundational Types for vouch
//!
//! This crate defines the types every other crate in the workspace depends
//! on. It has no internal crate dependencies: only `serde`, `hex`,
//! `thiserror`, and `chrono` from the external ecosystem.
//!
//! ## Design Principles
//!
//! 1. **Newtype wrappers for protocol primitives.** [`Address`],
//!    [`ClaimIdentifier`], [`GroupId`], and [`DappId`] are distinct types.
//!    You cannot pass a group id where a claim identifier is expected.
//!
//! 2. **Hex on the wire.** Every byte-oriented newtype serializes as a
//!    `0x`-prefixed lowercase hex string, which is also the form used inside
//!    the canonical signing payloads. One rendering, one byte sequence.
//!
//! 3. **Single [`VouchError`] taxonomy.** Every caller-visible failure of
//!    epoch management, claim verification, and the credential bridge is a
//!    variant of one enum, so the facade and the HTTP layer map it
//!    exhaustively.
//!
//! 4. **Authorization is a value.** Administrative operations take an
//!    [`OwnerAuthorization`], which can only be obtained from
//!    [`Owner::authorize`]. There is no ambient "current caller".
//!
//! ## Crate Policy
//!
//! - No dependencies on other `vouch-*` crates (this is the leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod auth;
pub mod claim;
pub mod epoch;
pub mod error;
pub mod identity;
pub mod temporal;

// Re-export primary types at crate root for ergonomic imports.
pub use auth::{Owner, OwnerAuthorization};
pub use claim::{ClaimInfo, ClaimProof, CompleteClaimData, SignatureBytes, SignedClaim};
pub use epoch::{Epoch, EpochId, Witness};
pub use error::{CryptoError, ValidationError, VouchError};
pub use identity::{Address, Bytes32, ClaimIdentifier, DappId, GroupId};
pub use temporal::{Clock, ManualClock, SystemClock, UnixSeconds};
