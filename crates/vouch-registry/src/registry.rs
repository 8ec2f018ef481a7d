//! # Registry Facade
//!
//! [`Registry`] is the single entry point external callers use. It owns
//! the epoch registry and the bridge behind one `RwLock`: every mutating
//! operation takes the write lock for its whole duration, including the
//! claim verification inside `merkelize_user`, so all state transitions
//! are totally ordered. Reads share the read lock.
//!
//! The facade is where the ambient concerns live: the caller identity is
//! turned into an [`OwnerAuthorization`], "now" comes from the injected
//! [`Clock`], and outcomes are logged and counted. The stores underneath
//! are pure functions of their inputs.

use std::sync::Arc;

use parking_lot::RwLock;
use vouch_bridge::{Bridge, GroupRef, MembershipRequest, MerkelizeReceipt, VerifiedMembership};
use vouch_claims::VerifiedClaim;
use vouch_core::{
    Address, Bytes32, ClaimIdentifier, ClaimProof, Clock, DappId, Epoch, EpochId, Owner,
    UnixSeconds, VouchError, Witness,
};
use vouch_crypto::MerkleProof;
use vouch_state::{EpochRegistry, GroupSummary, MerkelizedUser};
use vouch_zkp::MembershipVerifier;

use crate::config::{ConfigError, RegistryConfig};
use crate::metrics;

struct RegistryState {
    epochs: EpochRegistry,
    bridge: Bridge,
}

/// Epochs, claim verification, groups, and dapps behind one lock.
pub struct Registry {
    config: RegistryConfig,
    owner: Owner,
    clock: Arc<dyn Clock>,
    verifier: Arc<dyn MembershipVerifier>,
    state: RwLock<RegistryState>,
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.read();
        f.debug_struct("Registry")
            .field("config", &self.config)
            .field("current_epoch", &state.epochs.current_epoch_id())
            .field("groups", &state.bridge.group_count())
            .finish_non_exhaustive()
    }
}

impl Registry {
    /// An empty registry.
    pub fn new(
        config: RegistryConfig,
        clock: Arc<dyn Clock>,
        verifier: Arc<dyn MembershipVerifier>,
    ) -> Result<Self, ConfigError> {
        Self::restore(config, clock, verifier, Vec::new())
    }

    /// A registry whose epoch list is rebuilt from `epochs`, as previously
    /// returned by [`Registry::epochs`]. Every epoch invariant is checked
    /// again.
    pub fn restore(
        config: RegistryConfig,
        clock: Arc<dyn Clock>,
        verifier: Arc<dyn MembershipVerifier>,
        epochs: Vec<Epoch>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let epochs = EpochRegistry::from_epochs(epochs, config.epoch_duration_s)
            .map_err(|e| ConfigError::Invalid("epochs".into(), e.to_string()))?;
        let bridge = Bridge::new(
            config.admin(),
            config.default_merkle_depth,
            config.root_validity_s,
        );
        Ok(Self {
            owner: Owner::new(config.owner),
            config,
            clock,
            verifier,
            state: RwLock::new(RegistryState { epochs, bridge }),
        })
    }

    /// The configuration in effect.
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// The registry owner.
    pub fn owner(&self) -> &Address {
        self.owner.address()
    }

    /// Current time. Read only while holding the write lock.
    fn now(&self) -> UnixSeconds {
        self.clock.now_s()
    }

    // -----------------------------------------------------------------------
    // Epochs
    // -----------------------------------------------------------------------

    /// Append a committee starting now. Owner only.
    pub fn add_epoch(
        &self,
        caller: &Address,
        witnesses: Vec<Witness>,
        minimum_witnesses_for_claim_creation: u32,
    ) -> Result<Epoch, VouchError> {
        let auth = self.owner.authorize(caller)?;
        let mut state = self.state.write();
        let now = self.now();
        let epoch = state
            .epochs
            .add_epoch(&auth, witnesses, minimum_witnesses_for_claim_creation, now)?
            .clone();
        metrics::incr(metrics::EPOCHS_ADDED);
        tracing::info!(
            epoch = epoch.id,
            witnesses = epoch.witnesses.len(),
            minimum = epoch.minimum_witnesses_for_claim_creation,
            start = epoch.timestamp_start,
            end = epoch.timestamp_end,
            "epoch added"
        );
        Ok(epoch)
    }

    /// Epoch `id`, or the current epoch for `0`.
    pub fn fetch_epoch(&self, id: EpochId) -> Result<Epoch, VouchError> {
        self.state.read().epochs.fetch_epoch(id).cloned()
    }

    /// Id of the most recently added epoch, `0` when none exists.
    pub fn current_epoch_id(&self) -> EpochId {
        self.state.read().epochs.current_epoch_id()
    }

    /// Every epoch, oldest first, for export and later [`Registry::restore`].
    pub fn epochs(&self) -> Vec<Epoch> {
        self.state.read().epochs.epochs().to_vec()
    }

    /// Witnesses of epoch `epoch_id` that must sign `identifier` at
    /// `timestamp_s`, in signing order.
    pub fn fetch_witnesses_for_claim(
        &self,
        epoch_id: EpochId,
        identifier: &ClaimIdentifier,
        timestamp_s: UnixSeconds,
    ) -> Result<Vec<Witness>, VouchError> {
        let selected = vouch_claims::fetch_witnesses_for_claim(
            &self.state.read().epochs,
            epoch_id,
            identifier,
            timestamp_s,
        )?;
        tracing::debug!(
            epoch = epoch_id,
            claim = %identifier,
            selected = ?selected.iter().map(|w| w.address.to_hex()).collect::<Vec<_>>(),
            "witnesses selected"
        );
        Ok(selected)
    }

    // -----------------------------------------------------------------------
    // Claims
    // -----------------------------------------------------------------------

    /// Check a claim proof against the stored committees. No side effects.
    pub fn verify_proof(&self, proof: &ClaimProof) -> Result<VerifiedClaim, VouchError> {
        let result = vouch_claims::verify_proof(&self.state.read().epochs, proof);
        record_claim_outcome(proof, &result);
        result
    }

    /// Value of `key` in a claim context, by substring scan.
    pub fn extract_field_from_context(context: &str, key: &str) -> Option<String> {
        vouch_claims::extract_field_from_context(context, key).map(str::to_string)
    }

    /// The provider a proof is for.
    pub fn provider_from_proof(proof: &ClaimProof) -> &str {
        vouch_claims::provider_from_proof(proof)
    }

    // -----------------------------------------------------------------------
    // Groups
    // -----------------------------------------------------------------------

    /// Create the group for `provider`. Owner only. `merkle_depth`
    /// defaults to the configured depth.
    pub fn create_group(
        &self,
        caller: &Address,
        provider: &str,
        merkle_depth: Option<u8>,
    ) -> Result<GroupSummary, VouchError> {
        let auth = self.owner.authorize(caller)?;
        let depth = merkle_depth.unwrap_or(self.config.default_merkle_depth);
        let mut state = self.state.write();
        let group_id = state.bridge.create_group(&auth, provider, depth)?;
        tracing::info!(provider, group = %group_id, depth, "group created");
        state
            .bridge
            .group_summary(&GroupRef::Id(group_id))
            .ok_or_else(|| VouchError::GroupNotFound(group_id.to_hex()))
    }

    /// Summary of a group, if it exists.
    pub fn group_summary(&self, group: &GroupRef) -> Option<GroupSummary> {
        self.state.read().bridge.group_summary(group)
    }

    /// Whether the group exists.
    pub fn group_exists(&self, group: &GroupRef) -> bool {
        self.state.read().bridge.resolve_group(group).is_some()
    }

    /// Inclusion proof for `commitment` in its group's current tree.
    pub fn inclusion_proof(
        &self,
        group: &GroupRef,
        commitment: &Bytes32,
    ) -> Result<MerkleProof, VouchError> {
        let state = self.state.read();
        let g = state
            .bridge
            .resolve_group(group)
            .ok_or_else(|| VouchError::GroupNotFound(group.to_string()))?;
        let index = g.index_of(commitment).ok_or_else(|| {
            VouchError::InvalidMemberCommitment(format!("{commitment} is not a member of {group}"))
        })?;
        g.inclusion_proof(index)
    }

    /// Verify `proof` and insert `member_commitment` into its provider's
    /// group, once per claim identifier.
    pub fn merkelize_user(
        &self,
        proof: &ClaimProof,
        member_commitment: Bytes32,
    ) -> Result<MerkelizeReceipt, VouchError> {
        let mut guard = self.state.write();
        let now = self.now();
        let state = &mut *guard;
        let result = state
            .bridge
            .merkelize_user(&state.epochs, proof, member_commitment, now);
        drop(guard);

        match &result {
            Ok(receipt) => {
                metrics::incr(metrics::CLAIMS_VERIFIED);
                metrics::incr(metrics::MEMBERS_MERKELIZED);
                tracing::info!(
                    claim = %receipt.claim.identifier,
                    provider = %receipt.claim.provider,
                    group = %receipt.group_id,
                    leaf = receipt.leaf_index,
                    group_created = receipt.group_created,
                    "member merkelized"
                );
            }
            Err(e) => {
                metrics::incr_rejected(metrics::CLAIMS_REJECTED, e);
                tracing::warn!(
                    claim = %proof.signed_claim.claim.identifier,
                    code = e.code(),
                    error = %e,
                    "merkelization rejected"
                );
            }
        }
        result
    }

    /// Ledger entry for a merkelized claim.
    pub fn merkelized(&self, identifier: &ClaimIdentifier) -> Option<MerkelizedUser> {
        self.state.read().bridge.merkelized(identifier).cloned()
    }

    // -----------------------------------------------------------------------
    // Dapps and membership
    // -----------------------------------------------------------------------

    /// Register dapp scope `dapp_id`. Owner only.
    pub fn create_dapp(&self, caller: &Address, dapp_id: DappId) -> Result<(), VouchError> {
        let auth = self.owner.authorize(caller)?;
        let mut state = self.state.write();
        let now = self.now();
        state.bridge.create_dapp(&auth, dapp_id, now)?;
        drop(state);
        tracing::info!(dapp = %dapp_id, "dapp created");
        Ok(())
    }

    /// Whether dapp `dapp_id` is registered.
    pub fn dapp_exists(&self, dapp_id: &DappId) -> bool {
        self.state.read().bridge.dapp_exists(dapp_id)
    }

    /// Check a membership proof and consume its nullifier.
    pub fn verify_merkel_identity(
        &self,
        request: &MembershipRequest,
    ) -> Result<VerifiedMembership, VouchError> {
        let mut state = self.state.write();
        let now = self.now();
        let result = state
            .bridge
            .verify_merkel_identity(self.verifier.as_ref(), request, now);
        drop(state);
        match &result {
            Ok(verified) => {
                metrics::incr(metrics::MEMBERSHIP_PROOFS);
                tracing::info!(
                    dapp = %verified.dapp_id,
                    group = %verified.group_id,
                    nullifier = %verified.nullifier_hash,
                    "membership proof accepted"
                );
            }
            Err(e) => {
                metrics::incr_rejected(metrics::MEMBERSHIP_REJECTED, e);
                tracing::warn!(
                    dapp = %request.dapp_id,
                    group = %request.group,
                    code = e.code(),
                    error = %e,
                    "membership proof rejected"
                );
            }
        }
        result
    }
}

fn record_claim_outcome(proof: &ClaimProof, result: &Result<VerifiedClaim, VouchError>) {
    match result {
        Ok(claim) => {
            metrics::incr(metrics::CLAIMS_VERIFIED);
            tracing::debug!(claim = %claim.identifier, epoch = claim.epoch, "claim verified");
        }
        Err(e) => {
            metrics::incr_rejected(metrics::CLAIMS_REJECTED, e);
            tracing::warn!(
                claim = %proof.signed_claim.claim.identifier,
                code = e.code(),
                error = %e,
                "claim rejected"
            );
        }
    }
}
