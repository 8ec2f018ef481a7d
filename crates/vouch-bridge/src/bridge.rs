//! # Bridge Operations
//!
//! `Bridge` owns the group registry and the dapp registry. It never reads
//! the clock or checks callers itself: the facade passes `now` and, for
//! administrative operations, an [`OwnerAuthorization`].

use serde::{Deserialize, Serialize};
use vouch_claims::{verify_proof, VerifiedClaim};
use vouch_core::{
    Address, Bytes32, ClaimIdentifier, ClaimProof, DappId, GroupId, OwnerAuthorization,
    UnixSeconds, VouchError,
};
use vouch_state::{
    group_id_for_provider, DappRegistry, EpochRegistry, Group, GroupRegistry, GroupSummary,
    MerkelizedUser,
};
use vouch_zkp::{MembershipStatement, MembershipVerifier};

use crate::membership::{GroupRef, MembershipRequest, VerifiedMembership};

/// Outcome of a successful merkelization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MerkelizeReceipt {
    /// The verified claim that was consumed.
    pub claim: VerifiedClaim,
    /// Group the commitment joined.
    pub group_id: GroupId,
    /// Leaf index of the commitment.
    pub leaf_index: u64,
    /// Group root after insertion.
    pub root: Bytes32,
    /// Whether this call created the group.
    pub group_created: bool,
}

/// Groups, dapps, and the merkelized-claim ledger.
#[derive(Debug, Clone)]
pub struct Bridge {
    groups: GroupRegistry,
    dapps: DappRegistry,
    admin: Address,
    default_merkle_depth: u8,
}

impl Bridge {
    /// A bridge whose groups are administered by `admin`. Groups created
    /// implicitly by merkelization get `default_merkle_depth`.
    pub fn new(admin: Address, default_merkle_depth: u8, root_validity_s: u64) -> Self {
        Self {
            groups: GroupRegistry::new(root_validity_s),
            dapps: DappRegistry::new(),
            admin,
            default_merkle_depth,
        }
    }

    /// The group administrator identity.
    pub fn admin(&self) -> &Address {
        &self.admin
    }

    /// Create the group for `provider`.
    pub fn create_group(
        &mut self,
        _auth: &OwnerAuthorization,
        provider: &str,
        merkle_depth: u8,
    ) -> Result<GroupId, VouchError> {
        self.groups.create_group(provider, merkle_depth, self.admin)
    }

    /// Verify `proof` and insert `member_commitment` into its provider's
    /// group, creating the group on first use.
    pub fn merkelize_user(
        &mut self,
        epochs: &EpochRegistry,
        proof: &ClaimProof,
        member_commitment: Bytes32,
        now: UnixSeconds,
    ) -> Result<MerkelizeReceipt, VouchError> {
        let claim = verify_proof(epochs, proof)?;
        let group_id = group_id_for_provider(&claim.provider);

        if let Some(prior) = self.groups.merkelized(&claim.identifier) {
            return Err(VouchError::UserAlreadyMerkelized {
                identifier: claim.identifier,
                group_id: prior.group_id,
            });
        }
        if member_commitment.is_zero() {
            return Err(VouchError::InvalidMemberCommitment(
                "commitment must be non-zero".into(),
            ));
        }

        // A fresh group has room and the commitment is already checked, so
        // the insert below cannot fail after the group is created.
        let group_created = !self.groups.contains(&group_id);
        if group_created {
            self.groups
                .create_group(&claim.provider, self.default_merkle_depth, self.admin)?;
        }

        let record = self
            .groups
            .merkelize(&group_id, claim.identifier, member_commitment, now)?;
        let root = self
            .groups
            .get(&group_id)
            .map(Group::root)
            .ok_or_else(|| VouchError::GroupNotFound(group_id.to_hex()))?;

        Ok(MerkelizeReceipt {
            claim,
            group_id,
            leaf_index: record.leaf_index,
            root,
            group_created,
        })
    }

    /// Register dapp scope `dapp_id`.
    pub fn create_dapp(
        &mut self,
        _auth: &OwnerAuthorization,
        dapp_id: DappId,
        now: UnixSeconds,
    ) -> Result<(), VouchError> {
        self.dapps.create(dapp_id, now)
    }

    /// Check a membership proof for `request.dapp_id` and consume its
    /// nullifier.
    pub fn verify_merkel_identity(
        &mut self,
        verifier: &dyn MembershipVerifier,
        request: &MembershipRequest,
        now: UnixSeconds,
    ) -> Result<VerifiedMembership, VouchError> {
        if !self.dapps.contains(&request.dapp_id) {
            return Err(VouchError::DappNotFound(request.dapp_id));
        }
        let group = self
            .resolve_group(&request.group)
            .ok_or_else(|| VouchError::GroupNotFound(request.group.to_string()))?;

        if request.external_nullifier != request.dapp_id.external_nullifier() {
            return Err(VouchError::InvalidMembershipProof(format!(
                "external nullifier {} is not the scope of dapp {}",
                request.external_nullifier, request.dapp_id
            )));
        }
        self.dapps
            .check_unconsumed(&request.dapp_id, &request.nullifier_hash)?;
        if !group.is_valid_root(&request.merkle_root, now) {
            return Err(VouchError::InvalidMembershipProof(format!(
                "root {} is not a current or recent root of {}",
                request.merkle_root,
                group.id()
            )));
        }

        let statement = MembershipStatement {
            merkle_tree_depth: group.depth(),
            merkle_root: request.merkle_root,
            signal: request.signal,
            nullifier_hash: request.nullifier_hash,
            external_nullifier: request.external_nullifier,
        };
        match verifier.verify(&statement, &request.proof) {
            Ok(true) => {}
            Ok(false) => {
                return Err(VouchError::InvalidMembershipProof(
                    "proof does not verify".into(),
                ))
            }
            Err(e) => return Err(VouchError::InvalidMembershipProof(e.to_string())),
        }

        let group_id = *group.id();
        self.dapps
            .consume(&request.dapp_id, request.nullifier_hash)?;

        Ok(VerifiedMembership {
            group_id,
            dapp_id: request.dapp_id,
            merkle_root: request.merkle_root,
            signal: request.signal,
            nullifier_hash: request.nullifier_hash,
            external_nullifier: request.external_nullifier,
        })
    }

    // -----------------------------------------------------------------------
    // Read-only accessors
    // -----------------------------------------------------------------------

    /// Resolve a group reference.
    pub fn resolve_group(&self, group: &GroupRef) -> Option<&Group> {
        match group {
            GroupRef::Provider(p) => self.groups.by_provider(p),
            GroupRef::Id(id) => self.groups.get(id),
        }
    }

    /// Summary of a group, if it exists.
    pub fn group_summary(&self, group: &GroupRef) -> Option<GroupSummary> {
        self.resolve_group(group).map(Group::summary)
    }

    /// Whether dapp `id` is registered.
    pub fn dapp_exists(&self, id: &DappId) -> bool {
        self.dapps.contains(id)
    }

    /// Ledger entry for a merkelized claim.
    pub fn merkelized(&self, identifier: &ClaimIdentifier) -> Option<&MerkelizedUser> {
        self.groups.merkelized(identifier)
    }

    /// Number of groups.
    pub fn group_count(&self) -> usize {
        self.groups.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vouch_claims::{create_signed_claim, hash_claim_info};
    use vouch_core::{ClaimInfo, CompleteClaimData, Owner, Witness};
    use vouch_crypto::WitnessKeyPair;
    use vouch_zkp::{MemberIdentity, MembershipProof, MockMembershipSystem, VerifyError};

    const OWNER: Address = Address::from_bytes([0x0a; 20]);

    struct Env {
        epochs: EpochRegistry,
        keys: Vec<WitnessKeyPair>,
        bridge: Bridge,
        auth: OwnerAuthorization,
    }

    fn env() -> Env {
        let auth = Owner::new(OWNER).authorize(&OWNER).unwrap();
        let keys: Vec<_> = (0..3).map(|_| WitnessKeyPair::generate()).collect();
        let mut epochs = EpochRegistry::new(10_000);
        epochs
            .add_epoch(
                &auth,
                keys.iter().map(|k| Witness::new(k.address(), "wss://w")).collect(),
                2,
                1_000,
            )
            .unwrap();
        Env {
            epochs,
            keys,
            bridge: Bridge::new(Address::from_bytes([0xb0; 20]), 10, 600),
            auth,
        }
    }

    fn claim(env: &Env, provider: &str, context: &str) -> ClaimProof {
        let claim_info = ClaimInfo {
            provider: provider.into(),
            parameters: "{}".into(),
            context: context.into(),
        };
        let data = CompleteClaimData {
            identifier: hash_claim_info(&claim_info),
            owner: Address::from_bytes([0x33; 20]),
            epoch: 1,
            timestamp_s: 1_500,
        };
        let epoch = env.epochs.fetch_epoch(1).unwrap();
        ClaimProof {
            claim_info,
            signed_claim: create_signed_claim(epoch, data, &env.keys).unwrap(),
        }
    }

    fn membership(
        env: &Env,
        id: &MemberIdentity,
        provider: &str,
        dapp: DappId,
    ) -> MembershipRequest {
        let group = env.bridge.resolve_group(&provider.into()).unwrap();
        let path = group
            .inclusion_proof(group.index_of(&id.commitment()).unwrap())
            .unwrap();
        let (stmt, proof) = MockMembershipSystem
            .prove(id, &path, Bytes32::from_u64(7), dapp.external_nullifier())
            .unwrap();
        MembershipRequest {
            group: provider.into(),
            merkle_root: stmt.merkle_root,
            signal: stmt.signal,
            nullifier_hash: stmt.nullifier_hash,
            external_nullifier: stmt.external_nullifier,
            dapp_id: dapp,
            proof,
        }
    }

    #[test]
    fn create_group_once_with_bridge_admin() {
        let mut env = env();
        let gid = env.bridge.create_group(&env.auth, "github-cred", 16).unwrap();
        let summary = env.bridge.group_summary(&gid.into()).unwrap();
        assert_eq!(summary.admin, Address::from_bytes([0xb0; 20]));
        assert_eq!(summary.merkle_tree_depth, 16);
        assert!(matches!(
            env.bridge.create_group(&env.auth, "github-cred", 16),
            Err(VouchError::GroupAlreadyExists { .. })
        ));
    }

    #[test]
    fn merkelize_creates_group_then_refuses_repeat() {
        let mut env = env();
        let p = claim(&env, "github-cred", "{}");
        let r = env
            .bridge
            .merkelize_user(&env.epochs, &p, Bytes32::from_u64(1), 2_000)
            .unwrap();
        assert!(r.group_created);
        assert_eq!(r.group_id, group_id_for_provider("github-cred"));
        assert_eq!(r.leaf_index, 0);
        assert_eq!(
            env.bridge.group_summary(&"github-cred".into()).unwrap().merkle_tree_depth,
            10
        );

        let err = env
            .bridge
            .merkelize_user(&env.epochs, &p, Bytes32::from_u64(2), 2_001)
            .unwrap_err();
        assert!(matches!(err, VouchError::UserAlreadyMerkelized { .. }));
        assert_eq!(
            env.bridge.group_summary(&"github-cred".into()).unwrap().size,
            1
        );
    }

    #[test]
    fn merkelize_into_existing_group() {
        let mut env = env();
        env.bridge.create_group(&env.auth, "github-cred", 4).unwrap();
        let proof = claim(&env, "github-cred", "{}");
        let r = env
            .bridge
            .merkelize_user(&env.epochs, &proof, Bytes32::from_u64(1), 2_000)
            .unwrap();
        assert!(!r.group_created);
        let proof = claim(&env, "github-cred", "{\"n\":2}");
        let r2 = env
            .bridge
            .merkelize_user(&env.epochs, &proof, Bytes32::from_u64(2), 2_000)
            .unwrap();
        assert_eq!(r2.leaf_index, 1);
        assert_eq!(env.bridge.group_count(), 1);
    }

    #[test]
    fn failed_verification_changes_nothing() {
        let mut env = env();
        let mut p = claim(&env, "github-cred", "{}");
        p.signed_claim.signatures.pop();
        assert!(matches!(
            env.bridge.merkelize_user(&env.epochs, &p, Bytes32::from_u64(1), 2_000),
            Err(VouchError::SignatureCountMismatch { .. })
        ));
        assert_eq!(env.bridge.group_count(), 0);
        assert!(env.bridge.merkelized(&p.signed_claim.claim.identifier).is_none());
    }

    #[test]
    fn zero_commitment_does_not_create_group() {
        let mut env = env();
        let p = claim(&env, "github-cred", "{}");
        assert!(matches!(
            env.bridge.merkelize_user(&env.epochs, &p, Bytes32::ZERO, 2_000),
            Err(VouchError::InvalidMemberCommitment(_))
        ));
        assert_eq!(env.bridge.group_count(), 0);
    }

    #[test]
    fn membership_proof_once_per_dapp() {
        let mut env = env();
        let id = MemberIdentity::from_seed(b"alice");
        let p = claim(&env, "github-cred", "{}");
        env.bridge
            .merkelize_user(&env.epochs, &p, id.commitment(), 2_000)
            .unwrap();
        let dapp = DappId::from_u64(1);
        env.bridge.create_dapp(&env.auth, dapp, 2_000).unwrap();

        let req = membership(&env, &id, "github-cred", dapp);
        let ok = env
            .bridge
            .verify_merkel_identity(&MockMembershipSystem, &req, 2_001)
            .unwrap();
        assert_eq!(ok.nullifier_hash, id.nullifier_hash(&dapp.external_nullifier()));
        assert_eq!(ok.group_id, group_id_for_provider("github-cred"));

        assert!(matches!(
            env.bridge.verify_merkel_identity(&MockMembershipSystem, &req, 2_002),
            Err(VouchError::NullifierAlreadyConsumed { .. })
        ));

        let other = DappId::from_u64(2);
        env.bridge.create_dapp(&env.auth, other, 2_000).unwrap();
        let req2 = membership(&env, &id, "github-cred", other);
        assert_ne!(req2.nullifier_hash, req.nullifier_hash);
        env.bridge
            .verify_merkel_identity(&MockMembershipSystem, &req2, 2_003)
            .unwrap();
    }

    #[test]
    fn membership_error_order() {
        let mut env = env();
        let id = MemberIdentity::from_seed(b"alice");
        let proof = claim(&env, "github-cred", "{}");
        env.bridge
            .merkelize_user(&env.epochs, &proof, id.commitment(), 2_000)
            .unwrap();
        let dapp = DappId::from_u64(1);
        let mut req = {
            env.bridge.create_dapp(&env.auth, dapp, 0).unwrap();
            membership(&env, &id, "github-cred", dapp)
        };

        let mut unknown_dapp = req.clone();
        unknown_dapp.dapp_id = DappId::from_u64(9);
        assert_eq!(
            env.bridge
                .verify_merkel_identity(&MockMembershipSystem, &unknown_dapp, 2_001),
            Err(VouchError::DappNotFound(DappId::from_u64(9)))
        );

        let mut unknown_group = req.clone();
        unknown_group.group = "twitter".into();
        assert!(matches!(
            env.bridge
                .verify_merkel_identity(&MockMembershipSystem, &unknown_group, 2_001),
            Err(VouchError::GroupNotFound(_))
        ));

        let mut wrong_scope = req.clone();
        wrong_scope.external_nullifier = Bytes32::from_u64(2);
        assert!(matches!(
            env.bridge
                .verify_merkel_identity(&MockMembershipSystem, &wrong_scope, 2_001),
            Err(VouchError::InvalidMembershipProof(_))
        ));

        let mut stale_root = req.clone();
        stale_root.merkle_root = Bytes32::from_u64(1234);
        assert!(matches!(
            env.bridge
                .verify_merkel_identity(&MockMembershipSystem, &stale_root, 2_001),
            Err(VouchError::InvalidMembershipProof(_))
        ));

        req.signal = Bytes32::from_u64(8);
        assert!(matches!(
            env.bridge.verify_merkel_identity(&MockMembershipSystem, &req, 2_001),
            Err(VouchError::InvalidMembershipProof(_))
        ));
        // Nothing above consumed the nullifier.
        req.signal = Bytes32::from_u64(7);
        env.bridge
            .verify_merkel_identity(&MockMembershipSystem, &req, 2_001)
            .unwrap();
    }

    #[test]
    fn recent_root_still_verifies_then_expires() {
        let mut env = env();
        let alice = MemberIdentity::from_seed(b"alice");
        let proof = claim(&env, "github-cred", "{}");
        env.bridge
            .merkelize_user(&env.epochs, &proof, alice.commitment(), 2_000)
            .unwrap();
        let dapp = DappId::from_u64(1);
        env.bridge.create_dapp(&env.auth, dapp, 0).unwrap();
        let req = membership(&env, &alice, "github-cred", dapp);

        let proof = claim(&env, "github-cred", "{\"b\":1}");

        env.bridge
            .merkelize_user(&env.epochs, &proof, Bytes32::from_u64(5), 3_000)
            .unwrap();

        let mut expired = Bridge::clone(&env.bridge);
        assert!(matches!(
            expired.verify_merkel_identity(&MockMembershipSystem, &req, 3_600),
            Err(VouchError::InvalidMembershipProof(_))
        ));
        env.bridge
            .verify_merkel_identity(&MockMembershipSystem, &req, 3_599)
            .unwrap();
    }

    struct Broken;

    impl MembershipVerifier for Broken {
        fn verify(
            &self,
            _statement: &MembershipStatement,
            _proof: &MembershipProof,
        ) -> Result<bool, VerifyError> {
            Err(VerifyError::MalformedProof("point not on curve".into()))
        }
    }

    #[test]
    fn verifier_errors_map_to_invalid_proof() {
        let mut env = env();
        let id = MemberIdentity::from_seed(b"alice");
        let proof = claim(&env, "github-cred", "{}");
        env.bridge
            .merkelize_user(&env.epochs, &proof, id.commitment(), 2_000)
            .unwrap();
        let dapp = DappId::from_u64(1);
        env.bridge.create_dapp(&env.auth, dapp, 0).unwrap();
        let req = membership(&env, &id, "github-cred", dapp);
        let err = env.bridge.verify_merkel_identity(&Broken, &req, 2_001).unwrap_err();
        assert!(matches!(err, VouchError::InvalidMembershipProof(ref m) if m.contains("curve")));
        assert!(env.bridge.dapp_exists(&dapp));
    }
}
