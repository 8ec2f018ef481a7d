//! # Identity Newtypes
//!
//! Byte-oriented identifiers used throughout vouch. Each identifier is a
//! distinct type: you cannot pass a [`GroupId`] where a [`ClaimIdentifier`]
//! is expected.
//!
//! ## Rendering
//!
//! All types render as `0x`-prefixed lowercase hex. Parsing accepts the
//! prefix optionally and is case-insensitive. [`Bytes32`] (and the types
//! wrapping it) additionally parse plain decimal strings, because field
//! elements such as dapp ids and nullifiers are commonly exchanged as
//! decimal integers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ValidationError;

fn decode_hex_fixed<const N: usize>(field: &'static str, s: &str) -> Result<[u8; N], ValidationError> {
    let trimmed = s.trim();
    let digits = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    let bytes = hex::decode(digits).map_err(|e| ValidationError::InvalidHex {
        field,
        reason: e.to_string(),
    })?;
    if bytes.len() != N {
        return Err(ValidationError::InvalidLength {
            field,
            expected: N,
            actual: bytes.len(),
        });
    }
    let mut out = [0u8; N];
    out.copy_from_slice(&bytes);
    Ok(out)
}

// ---------------------------------------------------------------------------
// Address
// ---------------------------------------------------------------------------

/// A 20-byte account address: the identity of witnesses, claim owners, and
/// the registry owner.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Address([u8; 20]);

impl Address {
    /// The all-zero address. Never a valid owner.
    pub const ZERO: Address = Address([0u8; 20]);

    /// Wrap raw address bytes.
    pub const fn from_bytes(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    /// Return the raw 20 bytes.
    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// Whether this is the zero address.
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 20]
    }

    /// Render as `0x`-prefixed lowercase hex.
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }

    /// Parse from hex, with or without the `0x` prefix.
    pub fn from_hex(s: &str) -> Result<Self, ValidationError> {
        decode_hex_fixed::<20>("address", s).map(Self)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self.to_hex())
    }
}

impl FromStr for Address {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

// ---------------------------------------------------------------------------
// Bytes32
// ---------------------------------------------------------------------------

/// A 32-byte word: a digest, a Merkle root, or a big-endian 256-bit integer.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Bytes32([u8; 32]);

impl Bytes32 {
    /// The zero word.
    pub const ZERO: Bytes32 = Bytes32([0u8; 32]);

    /// Wrap raw bytes.
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Return the raw 32 bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Whether every byte is zero.
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 32]
    }

    /// Big-endian encoding of a `u64`.
    pub fn from_u64(value: u64) -> Self {
        let mut out = [0u8; 32];
        out[24..].copy_from_slice(&value.to_be_bytes());
        Self(out)
    }

    /// Render as `0x`-prefixed lowercase hex (66 chars).
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }

    /// Parse 32 bytes of hex, with or without the `0x` prefix.
    pub fn from_hex(s: &str) -> Result<Self, ValidationError> {
        decode_hex_fixed::<32>("bytes32", s).map(Self)
    }

    /// Parse an unsigned decimal integer into its 32-byte big-endian form.
    ///
    /// Rejects empty input, non-digit characters, and values ≥ 2^256.
    pub fn from_dec_str(s: &str) -> Result<Self, ValidationError> {
        let digits = s.trim();
        if digits.is_empty() {
            return Err(ValidationError::InvalidInteger {
                field: "bytes32",
                reason: "empty string".into(),
            });
        }
        let mut out = [0u8; 32];
        for ch in digits.chars() {
            let d = ch.to_digit(10).ok_or_else(|| ValidationError::InvalidInteger {
                field: "bytes32",
                reason: format!("unexpected character '{ch}'"),
            })?;
            // out = out * 10 + d, big-endian, carrying from the least
            // significant byte.
            let mut carry = d;
            for byte in out.iter_mut().rev() {
                let v = u32::from(*byte) * 10 + carry;
                *byte = (v & 0xff) as u8;
                carry = v >> 8;
            }
            if carry != 0 {
                return Err(ValidationError::InvalidInteger {
                    field: "bytes32",
                    reason: "value does not fit in 256 bits".into(),
                });
            }
        }
        Ok(Self(out))
    }

    /// Parse either `0x`-prefixed hex or a plain decimal integer.
    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        let t = s.trim();
        if t.starts_with("0x") || t.starts_with("0X") {
            Self::from_hex(t)
        } else {
            Self::from_dec_str(t)
        }
    }
}

impl fmt::Display for Bytes32 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Bytes32 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Bytes32({})", self.to_hex())
    }
}

impl FromStr for Bytes32 {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<[u8; 32]> for Bytes32 {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

impl Serialize for Bytes32 {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Bytes32 {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

// ---------------------------------------------------------------------------
// Bytes32-backed identifiers
// ---------------------------------------------------------------------------

macro_rules! bytes32_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Bytes32);

        impl $name {
            /// Wrap a 32-byte word.
            pub const fn new(word: Bytes32) -> Self {
                Self(word)
            }

            /// The underlying word.
            pub fn as_word(&self) -> &Bytes32 {
                &self.0
            }

            /// The raw 32 bytes.
            pub fn as_bytes(&self) -> &[u8; 32] {
                self.0.as_bytes()
            }

            /// Render as `0x`-prefixed lowercase hex.
            pub fn to_hex(&self) -> String {
                self.0.to_hex()
            }
        }

        impl From<Bytes32> for $name {
            fn from(word: Bytes32) -> Self {
                Self(word)
            }
        }

        impl From<[u8; 32]> for $name {
            fn from(bytes: [u8; 32]) -> Self {
                Self(Bytes32::from_bytes(bytes))
            }
        }

        impl FromStr for $name {
            type Err = ValidationError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Bytes32::parse(s).map(Self)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0.to_hex())
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0.to_hex())
            }
        }
    };
}

bytes32_id!(
    /// Canonical identifier of a claim: the hash of its provider,
    /// parameters, and context.
    ClaimIdentifier
);

bytes32_id!(
    /// Identifier of a provider-scoped membership group, derived from the
    /// provider name.
    GroupId
);

bytes32_id!(
    /// Externally chosen 256-bit dapp identifier. Its 32-byte big-endian
    /// form is the external nullifier scoping membership proofs.
    DappId
);

impl DappId {
    /// Dapp id from a small integer.
    pub fn from_u64(value: u64) -> Self {
        Self(Bytes32::from_u64(value))
    }

    /// The external nullifier that proofs for this dapp must carry.
    pub fn external_nullifier(&self) -> Bytes32 {
        self.0
    }
}
