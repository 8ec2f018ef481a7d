//! # Dapp Scopes
//!
//! A dapp is an external-nullifier scope. Each `(dapp, nullifierHash)`
//! pair may be consumed once: a member proves membership to a dapp at most
//! once, while proofs to different dapps stay unlinkable.

use std::collections::{BTreeMap, BTreeSet};

use vouch_core::{Bytes32, DappId, UnixSeconds, VouchError};

/// A registered dapp and its consumed nullifiers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DappRecord {
    /// Registration time.
    pub created_at: UnixSeconds,
    consumed: BTreeSet<Bytes32>,
}

impl DappRecord {
    /// Number of nullifiers consumed in this scope.
    pub fn consumed_count(&self) -> usize {
        self.consumed.len()
    }
}

/// All dapp scopes.
#[derive(Debug, Clone, Default)]
pub struct DappRegistry {
    dapps: BTreeMap<DappId, DappRecord>,
}

impl DappRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `id`.
    pub fn create(&mut self, id: DappId, now: UnixSeconds) -> Result<(), VouchError> {
        if self.dapps.contains_key(&id) {
            return Err(VouchError::DappAlreadyExists(id));
        }
        self.dapps.insert(
            id,
            DappRecord {
                created_at: now,
                consumed: BTreeSet::new(),
            },
        );
        Ok(())
    }

    /// Whether `id` is registered.
    pub fn contains(&self, id: &DappId) -> bool {
        self.dapps.contains_key(id)
    }

    /// Record for `id`.
    pub fn get(&self, id: &DappId) -> Option<&DappRecord> {
        self.dapps.get(id)
    }

    /// Fail unless `nullifier_hash` is still unused in scope `id`.
    pub fn check_unconsumed(&self, id: &DappId, nullifier_hash: &Bytes32) -> Result<(), VouchError> {
        let record = self.dapps.get(id).ok_or(VouchError::DappNotFound(*id))?;
        if record.consumed.contains(nullifier_hash) {
            return Err(VouchError::NullifierAlreadyConsumed {
                dapp_id: *id,
                nullifier_hash: nullifier_hash.to_hex(),
            });
        }
        Ok(())
    }

    /// Consume `nullifier_hash` in scope `id`.
    pub fn consume(&mut self, id: &DappId, nullifier_hash: Bytes32) -> Result<(), VouchError> {
        self.check_unconsumed(id, &nullifier_hash)?;
        if let Some(record) = self.dapps.get_mut(id) {
            record.consumed.insert(nullifier_hash);
        }
        Ok(())
    }
}
