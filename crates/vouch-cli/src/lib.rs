//! # vouch-cli: CLI Tool for vouch
//!
//! Offline tooling over the same code paths the registry runs.
//!
//! ## Subcommands
//!
//! - `vouch hash-claim`: Canonical identifier of a claim info.
//! - `vouch extract-field`: Context field extraction.
//! - `vouch select-witnesses`: Witnesses that must sign a claim.
//! - `vouch verify`: Verify a claim proof against an epoch file.
//! - `vouch keygen`: Generate a witness key.
//! - `vouch sign-claim`: Sign a claim with witness keys into a full proof.
//!
//! Epoch lists, claim infos, and proofs are read from YAML or JSON files
//! (JSON is valid YAML, so one loader handles both).

pub mod claim;
pub mod verify;
pub mod witness;

use std::path::Path;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use vouch_core::Epoch;
use vouch_state::{EpochRegistry, DEFAULT_EPOCH_DURATION_S};

/// Read a YAML or JSON document.
pub fn load_document<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_yaml::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))
}

/// Load an exported epoch list and rebuild the registry from it.
pub fn load_epochs(path: &Path) -> Result<EpochRegistry> {
    let epochs: Vec<Epoch> = load_document(path)?;
    tracing::debug!(path = %path.display(), epochs = epochs.len(), "loaded epochs");
    EpochRegistry::from_epochs(epochs, DEFAULT_EPOCH_DURATION_S)
        .with_context(|| format!("invalid epoch list in {}", path.display()))
}
