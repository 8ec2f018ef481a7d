//! # Epoch Registry
//!
//! Append-only list of witness committees.
//!
//! ## Rules
//!
//! - Ids are contiguous from 1; a new epoch takes `last + 1`.
//! - A committee is non-empty, has no duplicate or zero addresses, and its
//!   threshold satisfies `1 <= minimum <= |witnesses|`.
//! - Epoch `n` is valid from its creation time for `epoch_duration_s`
//!   seconds, both ends inclusive.
//! - Id `0` addresses the current (most recently added) epoch.

use std::collections::BTreeSet;

use vouch_core::{Epoch, EpochId, OwnerAuthorization, UnixSeconds, VouchError, Witness};

/// Default epoch validity: one day.
pub const DEFAULT_EPOCH_DURATION_S: u64 = 86_400;

/// The append-only epoch list.
#[derive(Debug, Clone)]
pub struct EpochRegistry {
    epochs: Vec<Epoch>,
    epoch_duration_s: u64,
}

impl EpochRegistry {
    /// An empty registry whose epochs last `epoch_duration_s`.
    pub fn new(epoch_duration_s: u64) -> Self {
        Self {
            epochs: Vec::new(),
            epoch_duration_s,
        }
    }

    /// Rebuild a registry from an exported epoch list, re-checking every
    /// rule a live registry enforces.
    pub fn from_epochs(epochs: Vec<Epoch>, epoch_duration_s: u64) -> Result<Self, VouchError> {
        let mut prev_start = 0;
        for (i, epoch) in epochs.iter().enumerate() {
            let expected = u32::try_from(i + 1)
                .map_err(|_| VouchError::InvalidEpochConfig("too many epochs".into()))?;
            if epoch.id != expected {
                return Err(VouchError::InvalidEpochConfig(format!(
                    "epoch ids must be contiguous from 1: expected {expected}, got {}",
                    epoch.id
                )));
            }
            if epoch.timestamp_start < prev_start {
                return Err(VouchError::InvalidEpochConfig(format!(
                    "epoch {} starts before its predecessor",
                    epoch.id
                )));
            }
            if epoch.timestamp_end < epoch.timestamp_start {
                return Err(VouchError::InvalidEpochConfig(format!(
                    "epoch {} ends before it starts",
                    epoch.id
                )));
            }
            validate_committee(&epoch.witnesses, epoch.minimum_witnesses_for_claim_creation)?;
            prev_start = epoch.timestamp_start;
        }
        Ok(Self {
            epochs,
            epoch_duration_s,
        })
    }

    /// Append a committee starting at `now`.
    pub fn add_epoch(
        &mut self,
        _auth: &OwnerAuthorization,
        witnesses: Vec<Witness>,
        minimum_witnesses_for_claim_creation: u32,
        now: UnixSeconds,
    ) -> Result<&Epoch, VouchError> {
        validate_committee(&witnesses, minimum_witnesses_for_claim_creation)?;

        let id = self
            .current_epoch_id()
            .checked_add(1)
            .ok_or_else(|| VouchError::InvalidEpochConfig("epoch id overflow".into()))?;
        if let Some(last) = self.epochs.last() {
            if now < last.timestamp_start {
                return Err(VouchError::InvalidEpochConfig(format!(
                    "start {now} precedes epoch {} start {}",
                    last.id, last.timestamp_start
                )));
            }
        }

        self.epochs.push(Epoch {
            id,
            witnesses,
            minimum_witnesses_for_claim_creation,
            timestamp_start: now,
            timestamp_end: now.saturating_add(self.epoch_duration_s),
        });
        // Just pushed, so `last` is present.
        Ok(&self.epochs[self.epochs.len() - 1])
    }

    /// Epoch `id`, or the current epoch for `0`.
    pub fn fetch_epoch(&self, id: EpochId) -> Result<&Epoch, VouchError> {
        let found = if id == 0 {
            self.epochs.last()
        } else {
            self.epochs.get(id as usize - 1)
        };
        found.ok_or(VouchError::EpochNotFound {
            epoch: id,
            reason: if self.epochs.is_empty() {
                "no epochs have been added"
            } else {
                "unknown epoch id"
            },
        })
    }

    /// Id of the current epoch, `0` when none exists.
    pub fn current_epoch_id(&self) -> EpochId {
        self.epochs.last().map_or(0, |e| e.id)
    }

    /// All epochs, oldest first.
    pub fn epochs(&self) -> &[Epoch] {
        &self.epochs
    }

    /// Validity of newly added epochs.
    pub fn epoch_duration_s(&self) -> u64 {
        self.epoch_duration_s
    }
}

fn validate_committee(witnesses: &[Witness], minimum: u32) -> Result<(), VouchError> {
    if witnesses.is_empty() {
        return Err(VouchError::InvalidEpochConfig(
            "witness list is empty".into(),
        ));
    }
    if minimum == 0 {
        return Err(VouchError::InvalidEpochConfig(
            "minimum witnesses for claim creation must be at least 1".into(),
        ));
    }
    if minimum as usize > witnesses.len() {
        return Err(VouchError::InvalidEpochConfig(format!(
            "minimum witnesses {minimum} exceeds committee size {}",
            witnesses.len()
        )));
    }
    let mut seen = BTreeSet::new();
    for w in witnesses {
        if w.address.is_zero() {
            return Err(VouchError::InvalidEpochConfig(
                "witness address must not be zero".into(),
            ));
        }
        if !seen.insert(w.address) {
            return Err(VouchError::InvalidEpochConfig(format!(
                "duplicate witness {}",
                w.address
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use vouch_core::{Address, Owner};

    fn auth() -> OwnerAuthorization {
        let owner = Address::from_bytes([0xaa; 20]);
        Owner::new(owner).authorize(&owner).unwrap()
    }

    fn witnesses(n: u8) -> Vec<Witness> {
        (1..=n)
            .map(|i| Witness::new(Address::from_bytes([i; 20]), format!("wss://w{i}")))
            .collect()
    }

    #[test]
    fn ids_increment_from_one() {
        let mut reg = EpochRegistry::new(100);
        assert_eq!(reg.current_epoch_id(), 0);
        assert_eq!(reg.add_epoch(&auth(), witnesses(3), 2, 1_000).unwrap().id, 1);
        assert_eq!(reg.add_epoch(&auth(), witnesses(4), 4, 1_050).unwrap().id, 2);
        assert_eq!(reg.current_epoch_id(), 2);
    }

    #[test]
    fn window_uses_configured_duration() {
        let mut reg = EpochRegistry::new(100);
        let e = reg.add_epoch(&auth(), witnesses(1), 1, 1_000).unwrap();
        assert_eq!(e.timestamp_start, 1_000);
        assert_eq!(e.timestamp_end, 1_100);
    }

    #[test]
    fn fetch_zero_is_current() {
        let mut reg = EpochRegistry::new(100);
        reg.add_epoch(&auth(), witnesses(1), 1, 1).unwrap();
        reg.add_epoch(&auth(), witnesses(2), 1, 2).unwrap();
        assert_eq!(reg.fetch_epoch(0).unwrap().id, 2);
        assert_eq!(reg.fetch_epoch(1).unwrap().witnesses.len(), 1);
        assert!(matches!(
            reg.fetch_epoch(3),
            Err(VouchError::EpochNotFound { epoch: 3, .. })
        ));
    }

    #[test]
    fn fetch_on_empty_registry_fails() {
        let reg = EpochRegistry::new(100);
        assert!(matches!(
            reg.fetch_epoch(0),
            Err(VouchError::EpochNotFound { epoch: 0, .. })
        ));
    }

    #[test]
    fn invalid_committees_are_rejected_without_effect() {
        let mut reg = EpochRegistry::new(100);
        let cases = vec![
            (Vec::new(), 0),
            (witnesses(2), 3),
            (witnesses(2), 0),
            (
                vec![
                    Witness::new(Address::from_bytes([1; 20]), "a"),
                    Witness::new(Address::from_bytes([1; 20]), "b"),
                ],
                1,
            ),
            (vec![Witness::new(Address::ZERO, "z")], 1),
        ];
        for (ws, min) in cases {
            assert!(matches!(
                reg.add_epoch(&auth(), ws, min, 10),
                Err(VouchError::InvalidEpochConfig(_))
            ));
        }
        assert_eq!(reg.current_epoch_id(), 0);
    }

    #[test]
    fn start_may_not_go_backwards() {
        let mut reg = EpochRegistry::new(100);
        reg.add_epoch(&auth(), witnesses(1), 1, 500).unwrap();
        assert!(reg.add_epoch(&auth(), witnesses(1), 1, 499).is_err());
        assert!(reg.add_epoch(&auth(), witnesses(1), 1, 500).is_ok());
    }

    #[test]
    fn restore_accepts_exported_list() {
        let mut reg = EpochRegistry::new(100);
        reg.add_epoch(&auth(), witnesses(3), 2, 10).unwrap();
        reg.add_epoch(&auth(), witnesses(5), 5, 20).unwrap();
        let restored = EpochRegistry::from_epochs(reg.epochs().to_vec(), 100).unwrap();
        assert_eq!(restored.epochs(), reg.epochs());
        assert_eq!(restored.current_epoch_id(), 2);
    }

    #[test]
    fn restore_rejects_gaps_and_bad_committees() {
        let mut reg = EpochRegistry::new(100);
        reg.add_epoch(&auth(), witnesses(3), 2, 10).unwrap();
        reg.add_epoch(&auth(), witnesses(3), 2, 20).unwrap();

        let mut gap = reg.epochs().to_vec();
        gap[1].id = 3;
        assert!(EpochRegistry::from_epochs(gap, 100).is_err());

        let mut bad = reg.epochs().to_vec();
        bad[0].minimum_witnesses_for_claim_creation = 9;
        assert!(EpochRegistry::from_epochs(bad, 100).is_err());

        let mut backwards = reg.epochs().to_vec();
        backwards[1].timestamp_start = 5;
        assert!(EpochRegistry::from_epochs(backwards, 100).is_err());
    }
}
