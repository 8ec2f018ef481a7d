//! # Error Types: Structured Error Hierarchy
//!
//! Defines the error types used throughout vouch. All errors use
//! `thiserror` for derive-based `Display` and `Error` implementations.
//!
//! ## Design
//!
//! - [`ValidationError`] covers malformed input (bad hex, wrong lengths).
//! - [`CryptoError`] covers primitive failures (signature recovery, key
//!   parsing, Merkle tree bounds).
//! - [`VouchError`] is the caller-visible taxonomy. Every variant is a
//!   deterministic outcome of the inputs: nothing here is transient, so
//!   retrying without changing the request always fails the same way.

use thiserror::Error;

use crate::identity::{ClaimIdentifier, DappId, GroupId};

/// Caller-visible failure of an epoch, claim, group, or membership operation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VouchError {
    /// The caller is not the registry owner.
    #[error("caller {caller} is not authorized for this operation")]
    NotAuthorized {
        /// The rejected caller, rendered as an address.
        caller: String,
    },

    /// Epoch committee configuration rejected.
    #[error("invalid epoch config: {0}")]
    InvalidEpochConfig(String),

    /// The claim's epoch does not exist, or the claim falls outside its window.
    #[error("epoch {epoch} not found: {reason}")]
    EpochNotFound {
        /// The requested epoch id (0 means "current").
        epoch: u32,
        /// Why no usable epoch was found.
        reason: &'static str,
    },

    /// The claim identifier does not match the hash of the claim info.
    #[error("claim identifier mismatch: expected {expected}, got {actual}")]
    IdentifierMismatch {
        /// Identifier recomputed from the claim info.
        expected: ClaimIdentifier,
        /// Identifier carried by the signed claim.
        actual: ClaimIdentifier,
    },

    /// The signed claim carries no signatures.
    #[error("no signatures")]
    NoSignatures,

    /// The number of signatures differs from the number of selected witnesses.
    #[error("number of signatures ({signatures}) not equal to number of witnesses ({witnesses})")]
    SignatureCountMismatch {
        /// Signatures supplied.
        signatures: usize,
        /// Witnesses selected for the claim.
        witnesses: usize,
    },

    /// A signature did not recover to the witness expected at its position.
    #[error("signature not appropriate at position {position}: {reason}")]
    SignatureNotAppropriate {
        /// Zero-based position in the signature list.
        position: usize,
        /// Recovery failure or the mismatching signer.
        reason: String,
    },

    /// A group already exists for this provider.
    #[error("group {group_id} already exists for provider '{provider}'")]
    GroupAlreadyExists {
        /// The derived group id.
        group_id: GroupId,
        /// The provider name.
        provider: String,
    },

    /// No group exists for the requested provider or id.
    #[error("group not found: {0}")]
    GroupNotFound(String),

    /// The group tree depth is outside the supported range.
    #[error("invalid merkle tree depth {depth}: must be between {min} and {max}")]
    InvalidGroupDepth {
        /// The requested depth.
        depth: u8,
        /// Smallest supported depth.
        min: u8,
        /// Largest supported depth.
        max: u8,
    },

    /// The group tree has no free leaves left.
    #[error("group {group_id} is full ({capacity} members)")]
    GroupFull {
        /// The full group.
        group_id: GroupId,
        /// Its capacity.
        capacity: u64,
    },

    /// The member commitment cannot be inserted as a leaf.
    #[error("invalid member commitment: {0}")]
    InvalidMemberCommitment(String),

    /// This claim identifier has already been merkelized.
    #[error("claim {identifier} already merkelized into group {group_id}")]
    UserAlreadyMerkelized {
        /// The consumed claim identifier.
        identifier: ClaimIdentifier,
        /// The group that holds it.
        group_id: GroupId,
    },

    /// A dapp with this id already exists.
    #[error("dapp {0} already exists")]
    DappAlreadyExists(DappId),

    /// No dapp with this id exists.
    #[error("dapp {0} not created")]
    DappNotFound(DappId),

    /// The membership proof failed verification.
    #[error("invalid membership proof: {0}")]
    InvalidMembershipProof(String),

    /// The nullifier hash was already consumed in this dapp scope.
    #[error("nullifier {nullifier_hash} already consumed for dapp {dapp_id}")]
    NullifierAlreadyConsumed {
        /// The dapp scope.
        dapp_id: DappId,
        /// The replayed nullifier hash, hex-encoded.
        nullifier_hash: String,
    },

    /// Malformed input.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl VouchError {
    /// Stable, machine-readable code for this error kind.
    ///
    /// Used as the `code` field of API error bodies and as the `reason`
    /// label on rejection counters.
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotAuthorized { .. } => "NOT_AUTHORIZED",
            Self::InvalidEpochConfig(_) => "INVALID_EPOCH_CONFIG",
            Self::EpochNotFound { .. } => "EPOCH_NOT_FOUND",
            Self::IdentifierMismatch { .. } => "IDENTIFIER_MISMATCH",
            Self::NoSignatures => "NO_SIGNATURES",
            Self::SignatureCountMismatch { .. } => "SIGNATURE_COUNT_MISMATCH",
            Self::SignatureNotAppropriate { .. } => "SIGNATURE_NOT_APPROPRIATE",
            Self::GroupAlreadyExists { .. } => "GROUP_ALREADY_EXISTS",
            Self::GroupNotFound(_) => "GROUP_NOT_FOUND",
            Self::InvalidGroupDepth { .. } => "INVALID_GROUP_DEPTH",
            Self::GroupFull { .. } => "GROUP_FULL",
            Self::InvalidMemberCommitment(_) => "INVALID_MEMBER_COMMITMENT",
            Self::UserAlreadyMerkelized { .. } => "USER_ALREADY_MERKELIZED",
            Self::DappAlreadyExists(_) => "DAPP_ALREADY_EXISTS",
            Self::DappNotFound(_) => "DAPP_NOT_FOUND",
            Self::InvalidMembershipProof(_) => "INVALID_MEMBERSHIP_PROOF",
            Self::NullifierAlreadyConsumed { .. } => "NULLIFIER_ALREADY_CONSUMED",
            Self::Validation(_) => "VALIDATION_ERROR",
        }
    }
}

/// Malformed input to a constructor or parser.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Hex decoding failed.
    #[error("invalid hex for {field}: {reason}")]
    InvalidHex {
        /// The field being parsed.
        field: &'static str,
        /// Decoder message.
        reason: String,
    },

    /// A fixed-size value had the wrong length.
    #[error("{field} must be {expected} bytes, got {actual}")]
    InvalidLength {
        /// The field being parsed.
        field: &'static str,
        /// Required byte length.
        expected: usize,
        /// Supplied byte length.
        actual: usize,
    },

    /// A decimal integer could not be parsed.
    #[error("invalid integer for {field}: {reason}")]
    InvalidInteger {
        /// The field being parsed.
        field: &'static str,
        /// Parser message.
        reason: String,
    },

    /// A configuration value is out of range.
    #[error("invalid config value for {field}: {reason}")]
    InvalidConfig {
        /// The configuration key.
        field: &'static str,
        /// Why it was rejected.
        reason: String,
    },
}

/// Error in cryptographic operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CryptoError {
    /// Signature is malformed or does not recover to a public key.
    #[error("signature recovery failed: {0}")]
    RecoveryFailed(String),

    /// Key generation or parsing failed.
    #[error("key error: {0}")]
    KeyError(String),

    /// Signing failed.
    #[error("signing failed: {0}")]
    SigningFailed(String),

    /// Merkle tree operation failed.
    #[error("merkle error: {0}")]
    Merkle(String),
}
