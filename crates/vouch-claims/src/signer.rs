//! # Witness-Side Signing
//!
//! Produces the signatures `verify_proof` expects: one per selected
//! witness, over the EIP-191 digest of the canonical payload, in selection
//! order.

use vouch_core::{CompleteClaimData, CryptoError, Epoch, SignatureBytes, SignedClaim};
use vouch_crypto::WitnessKeyPair;
use vouch_state::select_witnesses_for_claim;

use crate::identifier::signing_payload;

/// Sign `claim` with one witness key.
pub fn sign_claim(
    key: &WitnessKeyPair,
    claim: &CompleteClaimData,
) -> Result<SignatureBytes, CryptoError> {
    key.sign_message(signing_payload(claim).as_bytes())
}

/// Sign `claim` with every witness `epoch` selects for it, drawing keys
/// from `keys`. Keys for unselected witnesses are ignored.
pub fn create_signed_claim(
    epoch: &Epoch,
    claim: CompleteClaimData,
    keys: &[WitnessKeyPair],
) -> Result<SignedClaim, CryptoError> {
    let selected = select_witnesses_for_claim(epoch, &claim.identifier, claim.timestamp_s);
    let signatures = selected
        .iter()
        .map(|w| {
            let key = keys
                .iter()
                .find(|k| k.address() == w.address)
                .ok_or_else(|| {
                    CryptoError::KeyError(format!("no key for selected witness {}", w.address))
                })?;
            sign_claim(key, &claim)
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(SignedClaim { claim, signatures })
}

#[cfg(test)]
mod tests {
    use super::*;
    use vouch_core::{Address, ClaimIdentifier, Witness};

    #[test]
    fn missing_key_is_reported() {
        let known = WitnessKeyPair::generate();
        let unknown = WitnessKeyPair::generate();
        let epoch = Epoch {
            id: 1,
            witnesses: vec![
                Witness::new(known.address(), "a"),
                Witness::new(unknown.address(), "b"),
            ],
            minimum_witnesses_for_claim_creation: 2,
            timestamp_start: 0,
            timestamp_end: 100,
        };
        let claim = CompleteClaimData {
            identifier: ClaimIdentifier::from([1; 32]),
            owner: Address::from_bytes([2; 20]),
            epoch: 1,
            timestamp_s: 5,
        };
        let err = create_signed_claim(&epoch, claim, &[known]).unwrap_err();
        assert!(matches!(err, CryptoError::KeyError(_)));
    }
}
