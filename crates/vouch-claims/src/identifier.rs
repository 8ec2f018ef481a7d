//! # Canonical Claim Encodings
//!
//! Witnesses compute both values independently, so the byte layout is
//! fixed:
//!
//! ```text
//! identifier = keccak256(provider "\n" parameters "\n" context)
//! payload    = "0x<identifier>" "\n" "0x<owner>" "\n" <timestampS> "\n" <epoch>
//! ```
//!
//! Hex is lowercase; integers are ASCII decimal.

use vouch_core::{ClaimIdentifier, ClaimInfo, CompleteClaimData};
use vouch_crypto::Keccak256Hasher;

/// Canonical identifier of `info`.
pub fn hash_claim_info(info: &ClaimInfo) -> ClaimIdentifier {
    let mut h = Keccak256Hasher::new();
    h.update(info.provider.as_bytes())
        .update(b"\n")
        .update(info.parameters.as_bytes())
        .update(b"\n")
        .update(info.context.as_bytes());
    ClaimIdentifier::new(h.finalize())
}

/// The message witnesses sign for `claim`.
pub fn signing_payload(claim: &CompleteClaimData) -> String {
    format!(
        "{}\n{}\n{}\n{}",
        claim.identifier.to_hex(),
        claim.owner.to_hex(),
        claim.timestamp_s,
        claim.epoch
    )
}
