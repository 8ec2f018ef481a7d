//! # Proof Verification
//!
//! `verify_proof` runs its checks in a fixed order and stops at the first
//! failure, so a given bad proof always produces the same error:
//!
//! 1. `IdentifierMismatch`: the claim info does not hash to the claimed
//!    identifier.
//! 2. `EpochNotFound`: the claim names no known epoch, or its timestamp is
//!    outside that epoch's window.
//! 3. `NoSignatures`, then `SignatureCountMismatch` against the number of
//!    selected witnesses.
//! 4. `SignatureNotAppropriate`: signature `i` does not recover to selected
//!    witness `i`. A signature that cannot be recovered at all fails here
//!    too.

use serde::{Deserialize, Serialize};
use vouch_core::{
    Address, ClaimIdentifier, ClaimProof, EpochId, UnixSeconds, VouchError, Witness,
};
use vouch_crypto::{eth_signed_message_hash, recover_address};
use vouch_state::{select_witnesses_for_claim, EpochRegistry};

use crate::identifier::{hash_claim_info, signing_payload};

/// What a successful verification established.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifiedClaim {
    /// Canonical claim identifier.
    pub identifier: ClaimIdentifier,
    /// The claimant.
    pub owner: Address,
    /// Provider from the claim info.
    pub provider: String,
    /// Attesting epoch.
    pub epoch: EpochId,
    /// Claim creation time.
    pub timestamp_s: UnixSeconds,
    /// The witnesses whose signatures verified, in signing order.
    pub witnesses: Vec<Address>,
}

/// Witnesses of epoch `epoch_id` (`0` = current) that must sign the claim
/// `identifier` created at `timestamp_s`.
pub fn fetch_witnesses_for_claim(
    epochs: &EpochRegistry,
    epoch_id: EpochId,
    identifier: &ClaimIdentifier,
    timestamp_s: UnixSeconds,
) -> Result<Vec<Witness>, VouchError> {
    let epoch = epochs.fetch_epoch(epoch_id)?;
    Ok(select_witnesses_for_claim(epoch, identifier, timestamp_s))
}

/// The provider a proof is for.
pub fn provider_from_proof(proof: &ClaimProof) -> &str {
    &proof.claim_info.provider
}

/// Verify `proof` against the committees in `epochs`.
pub fn verify_proof(
    epochs: &EpochRegistry,
    proof: &ClaimProof,
) -> Result<VerifiedClaim, VouchError> {
    let claim = &proof.signed_claim.claim;

    let expected = hash_claim_info(&proof.claim_info);
    if expected != claim.identifier {
        return Err(VouchError::IdentifierMismatch {
            expected,
            actual: claim.identifier,
        });
    }

    if claim.epoch == 0 {
        return Err(VouchError::EpochNotFound {
            epoch: 0,
            reason: "claims must name a concrete epoch",
        });
    }
    let epoch = epochs.fetch_epoch(claim.epoch)?;
    if !epoch.is_valid_at(claim.timestamp_s) {
        return Err(VouchError::EpochNotFound {
            epoch: claim.epoch,
            reason: "claim timestamp outside epoch validity window",
        });
    }

    let selected = select_witnesses_for_claim(epoch, &claim.identifier, claim.timestamp_s);

    let signatures = &proof.signed_claim.signatures;
    if signatures.is_empty() {
        return Err(VouchError::NoSignatures);
    }
    if signatures.len() != selected.len() {
        return Err(VouchError::SignatureCountMismatch {
            signatures: signatures.len(),
            witnesses: selected.len(),
        });
    }

    let digest = eth_signed_message_hash(signing_payload(claim).as_bytes());
    for (position, (signature, witness)) in signatures.iter().zip(&selected).enumerate() {
        let signer = recover_address(&digest, signature.as_bytes()).map_err(|e| {
            VouchError::SignatureNotAppropriate {
                position,
                reason: e.to_string(),
            }
        })?;
        if signer != witness.address {
            return Err(VouchError::SignatureNotAppropriate {
                position,
                reason: format!(
                    "recovered {signer}, expected selected witness {}",
                    witness.address
                ),
            });
        }
    }

    Ok(VerifiedClaim {
        identifier: claim.identifier,
        owner: claim.owner,
        provider: proof.claim_info.provider.clone(),
        epoch: claim.epoch,
        timestamp_s: claim.timestamp_s,
        witnesses: selected.into_iter().map(|w| w.address).collect(),
    })
}
