//! # secp256k1 Witness Signatures
//!
//! Witnesses sign the canonical claim payload as an EIP-191 personal
//! message with their secp256k1 key. Verification does not need the public
//! key: the signer's 20-byte address is recovered from the 65-byte
//! `r || s || v` signature and compared with the expected witness.
//!
//! ## Security Invariant
//!
//! - High-`s` signatures are rejected, so each message has exactly one
//!   valid encoding per signer.
//! - `v` may be `27`/`28` or the raw recovery id `0`/`1`; anything else is a
//!   recovery failure.
//! - `WitnessKeyPair` does not implement `Serialize` or `Debug` output of
//!   the secret scalar. The only export is the explicit
//!   [`WitnessKeyPair::to_secret_hex`] used by key generation tooling.

use k256::ecdsa::{RecoveryId, Signature, SigningKey, VerifyingKey};
use k256::elliptic_curve::sec1::ToEncodedPoint;
use vouch_core::error::CryptoError;
use vouch_core::{Address, Bytes32, SignatureBytes};

use crate::keccak::{keccak256, Keccak256Hasher};

/// Length of a recoverable signature: `r (32) || s (32) || v (1)`.
pub const SIGNATURE_LEN: usize = 65;

const EIP191_PREFIX: &[u8] = b"\x19Ethereum Signed Message:\n";

/// Digest of `payload` as an EIP-191 personal message:
/// `keccak256("\x19Ethereum Signed Message:\n" || len(payload) || payload)`,
/// with the length in ASCII decimal.
pub fn eth_signed_message_hash(payload: &[u8]) -> Bytes32 {
    let mut h = Keccak256Hasher::new();
    h.update(EIP191_PREFIX)
        .update(payload.len().to_string())
        .update(payload);
    h.finalize()
}

/// Recover the address that produced `signature` over `digest`.
pub fn recover_address(digest: &Bytes32, signature: &[u8]) -> Result<Address, CryptoError> {
    if signature.len() != SIGNATURE_LEN {
        return Err(CryptoError::RecoveryFailed(format!(
            "signature must be {SIGNATURE_LEN} bytes, got {}",
            signature.len()
        )));
    }

    let sig = Signature::from_slice(&signature[..64])
        .map_err(|e| CryptoError::RecoveryFailed(format!("invalid r/s: {e}")))?;
    if sig.normalize_s().is_some() {
        return Err(CryptoError::RecoveryFailed("high-s signature".into()));
    }

    let v = signature[64];
    let recid = match v {
        27 | 28 => RecoveryId::from_byte(v - 27),
        0 | 1 => RecoveryId::from_byte(v),
        _ => None,
    }
    .ok_or_else(|| CryptoError::RecoveryFailed(format!("invalid recovery byte {v}")))?;

    let key = VerifyingKey::recover_from_prehash(digest.as_bytes(), &sig, recid)
        .map_err(|e| CryptoError::RecoveryFailed(e.to_string()))?;
    Ok(address_of(&key))
}

/// Ethereum-style address of a public key: the last 20 bytes of the
/// Keccak-256 of the uncompressed point without its `0x04` tag.
fn address_of(key: &VerifyingKey) -> Address {
    let point = key.as_affine().to_encoded_point(false);
    let digest = keccak256(&point.as_bytes()[1..]);
    let mut out = [0u8; 20];
    out.copy_from_slice(&digest.as_bytes()[12..]);
    Address::from_bytes(out)
}

/// A witness signing key.
pub struct WitnessKeyPair {
    signing_key: SigningKey,
}

impl WitnessKeyPair {
    /// Generate a fresh key from the OS random source.
    pub fn generate() -> Self {
        Self {
            signing_key: SigningKey::random(&mut rand::rngs::OsRng),
        }
    }

    /// Load a key from its 32-byte secret scalar.
    pub fn from_slice(secret: &[u8]) -> Result<Self, CryptoError> {
        SigningKey::from_slice(secret)
            .map(|signing_key| Self { signing_key })
            .map_err(|e| CryptoError::KeyError(format!("invalid secret key: {e}")))
    }

    /// Load a key from hex, with or without `0x`.
    pub fn from_hex(secret_hex: &str) -> Result<Self, CryptoError> {
        let t = secret_hex.trim();
        let digits = t.strip_prefix("0x").unwrap_or(t);
        let bytes = hex::decode(digits)
            .map_err(|e| CryptoError::KeyError(format!("invalid secret key hex: {e}")))?;
        Self::from_slice(&bytes)
    }

    /// Export the secret scalar as `0x`-prefixed hex.
    pub fn to_secret_hex(&self) -> String {
        format!("0x{}", hex::encode(self.signing_key.to_bytes()))
    }

    /// The address witnesses are identified by.
    pub fn address(&self) -> Address {
        address_of(self.signing_key.verifying_key())
    }

    /// Sign `payload` as an EIP-191 personal message.
    pub fn sign_message(&self, payload: &[u8]) -> Result<SignatureBytes, CryptoError> {
        let digest = eth_signed_message_hash(payload);
        let (sig, recid) = self
            .signing_key
            .sign_prehash_recoverable(digest.as_bytes())
            .map_err(|e| CryptoError::SigningFailed(e.to_string()))?;
        let mut out = Vec::with_capacity(SIGNATURE_LEN);
        out.extend_from_slice(&sig.to_bytes());
        out.push(27 + recid.to_byte());
        Ok(SignatureBytes::new(out))
    }
}

impl std::fmt::Debug for WitnessKeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "WitnessKeyPair(address: {})", self.address())
    }
}
