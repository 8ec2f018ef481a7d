//! # Claim Subcommands
//!
//! `hash-claim` prints the canonical identifier witnesses sign over;
//! `extract-field` runs the context field scan on a literal context or on
//! the context of a proof file.

use std::path::{Path, PathBuf};

use anyhow::{bail, Result};
use clap::Args;
use vouch_claims::{extract_field_from_context, hash_claim_info};
use vouch_core::{ClaimInfo, ClaimProof};

use crate::load_document;

/// Arguments for `vouch hash-claim`.
#[derive(Args, Debug)]
pub struct HashClaimArgs {
    /// YAML/JSON file holding `{provider, parameters, context}`.
    #[arg(long, conflicts_with_all = ["provider", "parameters", "context"])]
    pub file: Option<PathBuf>,
    /// Provider tag.
    #[arg(long, required_unless_present = "file")]
    pub provider: Option<String>,
    /// Serialized extraction parameters.
    #[arg(long, required_unless_present = "file")]
    pub parameters: Option<String>,
    /// Serialized context.
    #[arg(long, default_value = "")]
    pub context: String,
}

/// Arguments for `vouch extract-field`.
#[derive(Args, Debug)]
pub struct ExtractFieldArgs {
    /// Field name, or a full `"name":"` pattern.
    #[arg(value_name = "KEY")]
    pub key: String,
    /// Literal context string.
    #[arg(long, conflicts_with = "proof", required_unless_present = "proof")]
    pub context: Option<String>,
    /// Claim proof file whose context is scanned.
    #[arg(long)]
    pub proof: Option<PathBuf>,
}

/// Execute `vouch hash-claim`.
pub fn run_hash_claim(args: &HashClaimArgs) -> Result<u8> {
    let info = match &args.file {
        Some(path) => load_document::<ClaimInfo>(path)?,
        None => match (&args.provider, &args.parameters) {
            (Some(provider), Some(parameters)) => ClaimInfo {
                provider: provider.clone(),
                parameters: parameters.clone(),
                context: args.context.clone(),
            },
            _ => bail!("--provider and --parameters are required without --file"),
        },
    };
    println!("{}", hash_claim_info(&info));
    Ok(0)
}

/// Execute `vouch extract-field`. Exits 1 when the key is absent.
pub fn run_extract_field(args: &ExtractFieldArgs) -> Result<u8> {
    let context = match (&args.context, &args.proof) {
        (Some(context), _) => context.clone(),
        (None, Some(path)) => context_of(path)?,
        (None, None) => bail!("one of --context or --proof is required"),
    };
    match extract_field_from_context(&context, &args.key) {
        Some(value) => {
            println!("{value}");
            Ok(0)
        }
        None => {
            eprintln!("NOT FOUND: {}", args.key);
            Ok(1)
        }
    }
}

fn context_of(path: &Path) -> Result<String> {
    let proof: ClaimProof = load_document(path)?;
    Ok(proof.claim_info.context)
}
