//! # Verification Subcommands
//!
//! `select-witnesses` and `verify` run against an exported epoch list, so a
//! relying party can check a proof without talking to a registry.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use vouch_claims::{fetch_witnesses_for_claim, verify_proof};
use vouch_core::{ClaimIdentifier, ClaimProof, EpochId, UnixSeconds};

use crate::{load_document, load_epochs};

/// Arguments for `vouch select-witnesses`.
#[derive(Args, Debug)]
pub struct SelectWitnessesArgs {
    /// Exported epoch list (YAML/JSON).
    #[arg(long)]
    pub epochs: PathBuf,
    /// Epoch id; 0 selects the most recent epoch.
    #[arg(long, default_value_t = 0)]
    pub epoch: EpochId,
    /// Claim identifier (`0x` hex).
    #[arg(long)]
    pub identifier: ClaimIdentifier,
    /// Claim creation time, Unix seconds.
    #[arg(long)]
    pub timestamp: UnixSeconds,
}

/// Arguments for `vouch verify`.
#[derive(Args, Debug)]
pub struct VerifyArgs {
    /// Exported epoch list (YAML/JSON).
    #[arg(long)]
    pub epochs: PathBuf,
    /// Claim proof file.
    #[arg(value_name = "PROOF")]
    pub proof: PathBuf,
}

/// Execute `vouch select-witnesses`: one `address host` line per witness,
/// in signing order.
pub fn run_select_witnesses(args: &SelectWitnessesArgs) -> Result<u8> {
    let epochs = load_epochs(&args.epochs)?;
    let witnesses =
        fetch_witnesses_for_claim(&epochs, args.epoch, &args.identifier, args.timestamp)
            .context("witness selection failed")?;
    for w in &witnesses {
        println!("{} {}", w.address, w.host);
    }
    Ok(0)
}

/// Execute `vouch verify`. Prints the verified claim as JSON, or the
/// rejection reason with exit code 1.
pub fn run_verify(args: &VerifyArgs) -> Result<u8> {
    let epochs = load_epochs(&args.epochs)?;
    let proof: ClaimProof = load_document(&args.proof)?;
    match verify_proof(&epochs, &proof) {
        Ok(claim) => {
            println!("{}", serde_json::to_string_pretty(&claim)?);
            Ok(0)
        }
        Err(e) => {
            tracing::warn!(code = e.code(), "claim rejected");
            eprintln!("FAIL: {e}");
            Ok(1)
        }
    }
}
