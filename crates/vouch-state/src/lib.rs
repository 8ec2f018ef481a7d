//! # vouch-state: Registry State
//!
//! The mutable stores behind the facade, each enforcing its own invariants
//! so no caller can put it into an inconsistent state.
//!
//! ## Stores
//!
//! - **Epochs** (`epoch.rs`): append-only list of witness committees with
//!   validity windows. `fetch_epoch(0)` is the current epoch.
//!
//! - **Selection** (`selection.rs`): the deterministic draw of the witness
//!   subset that must sign a given claim.
//!
//! - **Groups** (`group.rs`): one membership group per provider, each an
//!   incremental Merkle tree with a short root history, plus the set of
//!   claim identifiers already merkelized.
//!
//! - **Dapps** (`dapp.rs`): external-nullifier scopes and their consumed
//!   nullifier hashes.
//!
//! ## Design
//!
//! Every mutating method checks all of its preconditions before touching
//! state, so a returned error always means nothing changed. None of the
//! stores lock: the facade linearizes access.

pub mod dapp;
pub mod epoch;
pub mod group;
pub mod selection;

pub use dapp::{DappRecord, DappRegistry};
pub use epoch::{EpochRegistry, DEFAULT_EPOCH_DURATION_S};
pub use group::{
    group_id_for_provider, Group, GroupRegistry, GroupSummary, MerkelizedUser,
    DEFAULT_MERKLE_DEPTH, DEFAULT_ROOT_VALIDITY_S,
};
pub use selection::select_witnesses_for_claim;
