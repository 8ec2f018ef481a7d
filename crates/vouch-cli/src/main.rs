//! # vouch CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use vouch_cli::claim::{run_extract_field, run_hash_claim, ExtractFieldArgs, HashClaimArgs};
use vouch_cli::verify::{run_select_witnesses, run_verify, SelectWitnessesArgs, VerifyArgs};
use vouch_cli::witness::{run_keygen, run_sign_claim, KeygenArgs, SignClaimArgs};

/// vouch: witness-attested claims and anonymous group membership.
///
/// Offline tooling for claim identifiers, witness selection, proof
/// verification, and witness keys.
#[derive(Parser, Debug)]
#[command(name = "vouch", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the canonical identifier of a claim info.
    HashClaim(HashClaimArgs),

    /// Extract a string field from a claim context.
    ExtractField(ExtractFieldArgs),

    /// List the witnesses that must sign a claim.
    SelectWitnesses(SelectWitnessesArgs),

    /// Verify a claim proof against an epoch list.
    Verify(VerifyArgs),

    /// Generate a secp256k1 witness key.
    Keygen(KeygenArgs),

    /// Sign a claim with witness keys and emit the proof.
    SignClaim(SignClaimArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);
    if std::env::var("LOG_FORMAT").is_ok_and(|f| f == "json") {
        builder.json().init();
    } else {
        builder.init();
    }

    tracing::debug!("vouch CLI starting");

    let result = match cli.command {
        Commands::HashClaim(args) => run_hash_claim(&args),
        Commands::ExtractField(args) => run_extract_field(&args),
        Commands::SelectWitnesses(args) => run_select_witnesses(&args),
        Commands::Verify(args) => run_verify(&args),
        Commands::Keygen(args) => run_keygen(&args),
        Commands::SignClaim(args) => run_sign_claim(&args),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}
