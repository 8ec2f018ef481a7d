//! Request and result types for membership verification.

use serde::{Deserialize, Serialize};
use vouch_core::{Bytes32, DappId, GroupId};
use vouch_zkp::MembershipProof;

/// How a caller names a group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GroupRef {
    /// By provider name; the id is derived.
    Provider(String),
    /// By raw group id.
    Id(GroupId),
}

impl From<GroupId> for GroupRef {
    fn from(id: GroupId) -> Self {
        Self::Id(id)
    }
}

impl From<&str> for GroupRef {
    fn from(provider: &str) -> Self {
        Self::Provider(provider.to_string())
    }
}

impl std::fmt::Display for GroupRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Provider(p) => write!(f, "provider '{p}'"),
            Self::Id(id) => write!(f, "group {id}"),
        }
    }
}

/// A membership proof submitted on behalf of a dapp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MembershipRequest {
    /// Group the member claims to belong to.
    pub group: GroupRef,
    /// Group root the proof was generated against.
    pub merkle_root: Bytes32,
    /// Application message bound into the proof.
    pub signal: Bytes32,
    /// One-time tag for this member in this scope.
    pub nullifier_hash: Bytes32,
    /// Scope the proof was generated for.
    pub external_nullifier: Bytes32,
    /// Consuming dapp.
    pub dapp_id: DappId,
    /// The eight proof words.
    pub proof: MembershipProof,
}

/// The validated public tuple of an accepted membership proof.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifiedMembership {
    /// Group proven.
    pub group_id: GroupId,
    /// Dapp whose nullifier set consumed the proof.
    pub dapp_id: DappId,
    /// Root the proof verified against.
    pub merkle_root: Bytes32,
    /// Signal.
    pub signal: Bytes32,
    /// Consumed nullifier hash.
    pub nullifier_hash: Bytes32,
    /// Scope.
    pub external_nullifier: Bytes32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn group_ref_json_shapes() {
        let p: GroupRef = serde_json::from_str(r#"{"provider":"github-cred"}"#).unwrap();
        assert_eq!(p, GroupRef::Provider("github-cred".into()));
        let id: GroupRef = serde_json::from_str(
            r#"{"id":"0x0000000000000000000000000000000000000000000000000000000000000001"}"#,
        )
        .unwrap();
        assert_eq!(id, GroupRef::Id(GroupId::new(Bytes32::from_u64(1))));
    }
}
