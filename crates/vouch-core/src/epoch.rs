//! # Witness Epochs
//!
//! An epoch is an immutable, ordered witness committee valid for a bounded
//! time window. Epochs are appended, never edited; the order of
//! `witnesses` is significant because witness selection indexes into it.

use serde::{Deserialize, Serialize};

use crate::identity::Address;
use crate::temporal::UnixSeconds;

/// Epoch number. Real epochs start at 1; `0` addresses the current epoch.
pub type EpochId = u32;

/// A witness trusted to attest claims.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Witness {
    /// The witness's signing identity.
    pub address: Address,
    /// Where claimants reach the witness (a URI; not interpreted here).
    pub host: String,
}

impl Witness {
    /// Create a witness.
    pub fn new(address: Address, host: impl Into<String>) -> Self {
        Self {
            address,
            host: host.into(),
        }
    }
}

/// A witness committee with its selection threshold and validity window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Epoch {
    /// Epoch number, starting at 1.
    pub id: EpochId,
    /// Ordered committee.
    pub witnesses: Vec<Witness>,
    /// How many witnesses must sign each claim.
    pub minimum_witnesses_for_claim_creation: u32,
    /// Start of validity (inclusive).
    pub timestamp_start: UnixSeconds,
    /// End of validity (inclusive).
    pub timestamp_end: UnixSeconds,
}

impl Epoch {
    /// Whether a claim created at `timestamp_s` falls inside this epoch.
    pub fn is_valid_at(&self, timestamp_s: UnixSeconds) -> bool {
        self.timestamp_start <= timestamp_s && timestamp_s <= self.timestamp_end
    }

    /// Position of a witness address in the committee.
    pub fn witness_index(&self, address: &Address) -> Option<usize> {
        self.witnesses.iter().position(|w| &w.address == address)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn epoch() -> Epoch {
        Epoch {
            id: 1,
            witnesses: vec![
                Witness::new(Address::from_bytes([1; 20]), "wss://a"),
                Witness::new(Address::from_bytes([2; 20]), "wss://b"),
            ],
            minimum_witnesses_for_claim_creation: 1,
            timestamp_start: 100,
            timestamp_end: 200,
        }
    }

    #[test]
    fn validity_window_is_inclusive() {
        let e = epoch();
        assert!(!e.is_valid_at(99));
        assert!(e.is_valid_at(100));
        assert!(e.is_valid_at(200));
        assert!(!e.is_valid_at(201));
    }

    #[test]
    fn witness_index_follows_committee_order() {
        let e = epoch();
        assert_eq!(e.witness_index(&Address::from_bytes([2; 20])), Some(1));
        assert_eq!(e.witness_index(&Address::ZERO), None);
    }

    #[test]
    fn serializes_camel_case() {
        let v = serde_json::to_value(epoch()).unwrap();
        assert_eq!(v["minimumWitnessesForClaimCreation"], 1);
        assert_eq!(v["timestampStart"], 100);
    }
}
