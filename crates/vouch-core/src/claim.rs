//! # Claim Data Model
//!
//! The artifacts a claimant submits: the claim info that identifies what
//! was observed, the complete claim data witnesses sign, and the ordered
//! witness signatures.
//!
//! Field names serialize in camelCase (`claimInfo`, `signedClaim`,
//! `timestampS`) so proofs produced by witness tooling deserialize
//! unchanged.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::epoch::EpochId;
use crate::error::ValidationError;
use crate::identity::{Address, ClaimIdentifier};
use crate::temporal::UnixSeconds;

/// What was observed: the provider template, its extraction parameters, and
/// the application context.
///
/// Only ever hashed into a [`ClaimIdentifier`]; never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimInfo {
    /// Data-source/template tag, e.g. `"http"`.
    pub provider: String,
    /// Canonical serialized extraction parameters.
    pub parameters: String,
    /// Serialized application payload (extracted parameters, provider hash).
    #[serde(default)]
    pub context: String,
}

/// The claim statement witnesses sign.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompleteClaimData {
    /// Hash of the claim info.
    pub identifier: ClaimIdentifier,
    /// The claimant.
    pub owner: Address,
    /// Epoch whose committee attested the claim.
    pub epoch: EpochId,
    /// Claim creation time, seconds since the Unix epoch.
    pub timestamp_s: UnixSeconds,
}

/// Claim data plus one signature per selected witness, in selection order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedClaim {
    /// The signed statement.
    pub claim: CompleteClaimData,
    /// Witness signatures, ordered as the witness selection for the claim.
    pub signatures: Vec<SignatureBytes>,
}

/// A claim proof as submitted for verification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimProof {
    /// The claim info the identifier must hash from.
    pub claim_info: ClaimInfo,
    /// The signed claim.
    pub signed_claim: SignedClaim,
}

/// An opaque signature blob.
///
/// Length is not validated here: a malformed blob is a verification
/// failure at its position, not a parse failure of the whole proof.
#[derive(Clone, PartialEq, Eq, Hash, Default)]
pub struct SignatureBytes(Vec<u8>);

impl SignatureBytes {
    /// Wrap raw signature bytes.
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    /// The raw bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Byte length.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the blob is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Render as `0x`-prefixed lowercase hex.
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(&self.0))
    }

    /// Parse hex of any length, with or without the `0x` prefix.
    pub fn from_hex(s: &str) -> Result<Self, ValidationError> {
        let t = s.trim();
        let digits = t.strip_prefix("0x").unwrap_or(t);
        hex::decode(digits)
            .map(Self)
            .map_err(|e| ValidationError::InvalidHex {
                field: "signature",
                reason: e.to_string(),
            })
    }
}

impl From<Vec<u8>> for SignatureBytes {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl fmt::Debug for SignatureBytes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hex = self.to_hex();
        let prefix: String = hex.chars().take(18).collect();
        write!(f, "SignatureBytes({prefix}…, {} bytes)", self.0.len())
    }
}

impl Serialize for SignatureBytes {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for SignatureBytes {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn proof_json_uses_witness_field_names() {
        let json = r#"{
            "claimInfo": {"provider": "http", "parameters": "{}", "context": ""},
            "signedClaim": {
                "claim": {
                    "identifier": "0x9e19819f75fe9a5440fc89505225f27104e85ca9456cf71ce441131e08ccd2f3",
                    "owner": "0xf9f25d1b846625674901ace47d6313d1ac795265",
                    "epoch": 1,
                    "timestampS": 1731312831
                },
                "signatures": ["0xdeadbeef"]
            }
        }"#;
        let proof: ClaimProof = serde_json::from_str(json).unwrap();
        assert_eq!(proof.signed_claim.claim.epoch, 1);
        assert_eq!(proof.signed_claim.claim.timestamp_s, 1_731_312_831);
        assert_eq!(proof.signed_claim.signatures[0].as_bytes(), &[0xde, 0xad, 0xbe, 0xef]);

        let out = serde_json::to_value(&proof).unwrap();
        assert!(out["signedClaim"]["claim"]["timestampS"].is_number());
    }

    #[test]
    fn missing_context_defaults_to_empty() {
        let info: ClaimInfo =
            serde_json::from_str(r#"{"provider":"http","parameters":"{}"}"#).unwrap();
        assert_eq!(info.context, "");
    }

    #[test]
    fn signature_rejects_non_hex() {
        assert!(SignatureBytes::from_hex("0xzz").is_err());
    }
}
