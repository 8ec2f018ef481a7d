//! # Witness Subcommands
//!
//! `keygen` writes a fresh secp256k1 witness key; `sign-claim` plays the
//! role of an attesting committee, signing a claim with every key the
//! selection calls for and emitting the complete proof.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use vouch_claims::{create_signed_claim, hash_claim_info};
use vouch_core::{Address, ClaimInfo, ClaimProof, CompleteClaimData, EpochId, UnixSeconds};
use vouch_crypto::WitnessKeyPair;

use crate::{load_document, load_epochs};

/// Arguments for `vouch keygen`.
#[derive(Args, Debug)]
pub struct KeygenArgs {
    /// Output directory.
    #[arg(long, default_value = ".")]
    pub output: PathBuf,
    /// File name prefix; writes `<prefix>.key` and `<prefix>.addr`.
    #[arg(long, default_value = "witness")]
    pub prefix: String,
}

/// Arguments for `vouch sign-claim`.
#[derive(Args, Debug)]
pub struct SignClaimArgs {
    /// Exported epoch list (YAML/JSON).
    #[arg(long)]
    pub epochs: PathBuf,
    /// Claim info file.
    #[arg(long)]
    pub claim_info: PathBuf,
    /// Claim owner address.
    #[arg(long)]
    pub owner: Address,
    /// Attesting epoch; 0 uses the most recent epoch.
    #[arg(long, default_value_t = 0)]
    pub epoch: EpochId,
    /// Claim creation time, Unix seconds.
    #[arg(long)]
    pub timestamp: UnixSeconds,
    /// Witness key files; must cover every selected witness.
    #[arg(long = "key", required = true)]
    pub keys: Vec<PathBuf>,
    /// Write the proof here instead of stdout.
    #[arg(long)]
    pub out: Option<PathBuf>,
}

/// Execute `vouch keygen`. Prints the new witness address.
pub fn run_keygen(args: &KeygenArgs) -> Result<u8> {
    std::fs::create_dir_all(&args.output)
        .with_context(|| format!("failed to create {}", args.output.display()))?;
    let key = WitnessKeyPair::generate();
    let key_path = args.output.join(format!("{}.key", args.prefix));
    let addr_path = args.output.join(format!("{}.addr", args.prefix));
    std::fs::write(&key_path, key.to_secret_hex())
        .with_context(|| format!("failed to write {}", key_path.display()))?;
    std::fs::write(&addr_path, key.address().to_string())
        .with_context(|| format!("failed to write {}", addr_path.display()))?;
    tracing::info!(key = %key_path.display(), "wrote witness key");
    println!("{}", key.address());
    Ok(0)
}

/// Execute `vouch sign-claim`.
pub fn run_sign_claim(args: &SignClaimArgs) -> Result<u8> {
    let epochs = load_epochs(&args.epochs)?;
    let epoch = epochs.fetch_epoch(args.epoch)?;
    let info: ClaimInfo = load_document(&args.claim_info)?;
    let keys = args
        .keys
        .iter()
        .map(|p| read_key(p))
        .collect::<Result<Vec<_>>>()?;

    let claim = CompleteClaimData {
        identifier: hash_claim_info(&info),
        owner: args.owner,
        epoch: epoch.id,
        timestamp_s: args.timestamp,
    };
    let signed_claim = create_signed_claim(epoch, claim, &keys)?;
    tracing::debug!(
        epoch = epoch.id,
        signatures = signed_claim.signatures.len(),
        "claim signed"
    );

    let proof = ClaimProof {
        claim_info: info,
        signed_claim,
    };
    let json = serde_json::to_string_pretty(&proof)?;
    match &args.out {
        Some(path) => std::fs::write(path, json)
            .with_context(|| format!("failed to write {}", path.display()))?,
        None => println!("{json}"),
    }
    Ok(0)
}

fn read_key(path: &Path) -> Result<WitnessKeyPair> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    WitnessKeyPair::from_hex(content.trim())
        .with_context(|| format!("invalid witness key in {}", path.display()))
}
