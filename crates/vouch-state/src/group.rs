//! # Membership Groups
//!
//! One group per provider. The group id is `keccak256(provider)`, so the
//! same provider string always lands in the same group and distinct
//! providers cannot collide short of a hash collision.
//!
//! Each group is an incremental Merkle tree of member commitments. When a
//! member joins, the superseded root stays acceptable for
//! `root_validity_s` seconds so proofs generated just before the insertion
//! still verify.
//!
//! The registry also owns the merkelized-claim ledger: a claim identifier
//! enters at most one group, once.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use vouch_core::{Address, Bytes32, ClaimIdentifier, GroupId, UnixSeconds, VouchError};
use vouch_crypto::merkle::{IncrementalMerkleTree, MerkleProof, MAX_DEPTH, MIN_DEPTH};
use vouch_crypto::keccak256;

/// Depth of groups created implicitly by merkelization.
pub const DEFAULT_MERKLE_DEPTH: u8 = 20;
/// How long a superseded root keeps verifying.
pub const DEFAULT_ROOT_VALIDITY_S: u64 = 3_600;

/// The group id for `provider`.
pub fn group_id_for_provider(provider: &str) -> GroupId {
    GroupId::new(keccak256(provider.as_bytes()))
}

// ---------------------------------------------------------------------------
// Group
// ---------------------------------------------------------------------------

/// A provider-scoped membership group.
#[derive(Debug, Clone)]
pub struct Group {
    id: GroupId,
    provider: String,
    admin: Address,
    tree: IncrementalMerkleTree,
    root_validity_s: u64,
    /// Superseded roots with the time they stopped being current.
    root_history: Vec<(Bytes32, UnixSeconds)>,
}

impl Group {
    /// An empty group for `provider`.
    pub fn new(
        provider: impl Into<String>,
        depth: u8,
        admin: Address,
        root_validity_s: u64,
    ) -> Result<Self, VouchError> {
        let provider = provider.into();
        let tree = IncrementalMerkleTree::new(depth).map_err(|_| VouchError::InvalidGroupDepth {
            depth,
            min: MIN_DEPTH,
            max: MAX_DEPTH,
        })?;
        Ok(Self {
            id: group_id_for_provider(&provider),
            provider,
            admin,
            tree,
            root_validity_s,
            root_history: Vec::new(),
        })
    }

    /// Group id.
    pub fn id(&self) -> &GroupId {
        &self.id
    }

    /// Provider the group was created for.
    pub fn provider(&self) -> &str {
        &self.provider
    }

    /// Administrator identity.
    pub fn admin(&self) -> &Address {
        &self.admin
    }

    /// Tree depth.
    pub fn depth(&self) -> u8 {
        self.tree.depth()
    }

    /// Member count.
    pub fn size(&self) -> u64 {
        self.tree.size()
    }

    /// Current root.
    pub fn root(&self) -> Bytes32 {
        self.tree.root()
    }

    /// Whether `root` is the current root or was superseded less than
    /// `root_validity_s` ago.
    pub fn is_valid_root(&self, root: &Bytes32, now: UnixSeconds) -> bool {
        if *root == self.tree.root() {
            return true;
        }
        self.root_history
            .iter()
            .any(|(r, at)| r == root && now.saturating_sub(*at) < self.root_validity_s)
    }

    /// Inclusion proof for the member at `index`.
    pub fn inclusion_proof(&self, index: u64) -> Result<MerkleProof, VouchError> {
        self.tree
            .inclusion_proof(index)
            .map_err(|e| VouchError::InvalidMemberCommitment(e.to_string()))
    }

    /// Leaf index of `commitment`, if it is a member.
    pub fn index_of(&self, commitment: &Bytes32) -> Option<u64> {
        self.tree.index_of(commitment)
    }

    /// Errors `add_member` would return, without mutating.
    fn check_insert(&self, commitment: &Bytes32) -> Result<(), VouchError> {
        if commitment.is_zero() {
            return Err(VouchError::InvalidMemberCommitment(
                "commitment must be non-zero".into(),
            ));
        }
        if self.tree.is_full() {
            return Err(VouchError::GroupFull {
                group_id: self.id,
                capacity: self.tree.capacity(),
            });
        }
        Ok(())
    }

    fn add_member(&mut self, commitment: Bytes32, now: UnixSeconds) -> Result<u64, VouchError> {
        self.check_insert(&commitment)?;
        let previous = self.tree.root();
        let index = self.tree.insert(commitment).map_err(|_| VouchError::GroupFull {
            group_id: self.id,
            capacity: self.tree.capacity(),
        })?;
        let validity = self.root_validity_s;
        self.root_history
            .retain(|(_, at)| now.saturating_sub(*at) < validity);
        self.root_history.push((previous, now));
        Ok(index)
    }

    /// Read-only view for callers.
    pub fn summary(&self) -> GroupSummary {
        GroupSummary {
            group_id: self.id,
            provider: self.provider.clone(),
            admin: self.admin,
            merkle_tree_depth: self.depth(),
            size: self.size(),
            root: self.root(),
        }
    }
}

/// Serializable snapshot of a group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupSummary {
    /// Group id.
    pub group_id: GroupId,
    /// Provider name.
    pub provider: String,
    /// Administrator identity.
    pub admin: Address,
    /// Tree depth.
    pub merkle_tree_depth: u8,
    /// Member count.
    pub size: u64,
    /// Current root.
    pub root: Bytes32,
}

/// Where a merkelized claim's member commitment lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MerkelizedUser {
    /// Group holding the commitment.
    pub group_id: GroupId,
    /// Leaf index of the commitment.
    pub leaf_index: u64,
    /// When the claim was merkelized.
    pub merkelized_at: UnixSeconds,
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

/// All groups plus the merkelized-claim ledger.
#[derive(Debug, Clone)]
pub struct GroupRegistry {
    groups: BTreeMap<GroupId, Group>,
    merkelized: BTreeMap<ClaimIdentifier, MerkelizedUser>,
    root_validity_s: u64,
}

impl GroupRegistry {
    /// Empty registry; groups keep superseded roots for `root_validity_s`.
    pub fn new(root_validity_s: u64) -> Self {
        Self {
            groups: BTreeMap::new(),
            merkelized: BTreeMap::new(),
            root_validity_s,
        }
    }

    /// Create the group for `provider`.
    pub fn create_group(
        &mut self,
        provider: &str,
        depth: u8,
        admin: Address,
    ) -> Result<GroupId, VouchError> {
        let id = group_id_for_provider(provider);
        if self.groups.contains_key(&id) {
            return Err(VouchError::GroupAlreadyExists {
                group_id: id,
                provider: provider.to_string(),
            });
        }
        let group = Group::new(provider, depth, admin, self.root_validity_s)?;
        self.groups.insert(id, group);
        Ok(id)
    }

    /// Group by id.
    pub fn get(&self, id: &GroupId) -> Option<&Group> {
        self.groups.get(id)
    }

    /// Group by provider name.
    pub fn by_provider(&self, provider: &str) -> Option<&Group> {
        self.groups.get(&group_id_for_provider(provider))
    }

    /// Whether a group with this id exists.
    pub fn contains(&self, id: &GroupId) -> bool {
        self.groups.contains_key(id)
    }

    /// Number of groups.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Whether no group exists.
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Ledger entry for `identifier`, if it has been merkelized.
    pub fn merkelized(&self, identifier: &ClaimIdentifier) -> Option<&MerkelizedUser> {
        self.merkelized.get(identifier)
    }

    /// Insert `commitment` into group `group_id` on behalf of the claim
    /// `identifier`, consuming the identifier.
    pub fn merkelize(
        &mut self,
        group_id: &GroupId,
        identifier: ClaimIdentifier,
        commitment: Bytes32,
        now: UnixSeconds,
    ) -> Result<MerkelizedUser, VouchError> {
        if let Some(prior) = self.merkelized.get(&identifier) {
            return Err(VouchError::UserAlreadyMerkelized {
                identifier,
                group_id: prior.group_id,
            });
        }
        let group = self
            .groups
            .get_mut(group_id)
            .ok_or_else(|| VouchError::GroupNotFound(group_id.to_hex()))?;
        let leaf_index = group.add_member(commitment, now)?;
        let record = MerkelizedUser {
            group_id: *group_id,
            leaf_index,
            merkelized_at: now,
        };
        self.merkelized.insert(identifier, record);
        Ok(record)
    }
}
