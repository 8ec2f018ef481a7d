//! # Witness Selection
//!
//! Deterministically draws the ordered subset of an epoch's committee that
//! must sign a claim. Any party holding the same epoch and claim derives
//! the same witnesses in the same order, and signatures are matched to
//! witnesses by position, so the draw is byte-exact.
//!
//! ## Algorithm
//!
//! ```text
//! seed     = keccak256("0x<identifier hex>\n<epoch id>\n<minimum>\n<timestampS>")
//! block(0) = seed
//! block(b) = keccak256(seed || be32(b))          for b >= 1
//! draw i   = be_u32(block(i / 8)[4*(i % 8) .. 4*(i % 8) + 4]) mod remaining
//! ```
//!
//! The drawn witness is taken out of the working list by swap-remove: the
//! last remaining witness moves into its slot. Committees drawing at most
//! eight witnesses only ever read `block(0)`.

use vouch_core::{ClaimIdentifier, Epoch, UnixSeconds, Witness};
use vouch_crypto::{keccak256, Keccak256Hasher};

const WORDS_PER_BLOCK: usize = 8;

/// Witnesses that must sign the claim `identifier` created at `timestamp_s`,
/// in signing order.
///
/// Returns `min(minimum, |witnesses|)` distinct witnesses.
pub fn select_witnesses_for_claim(
    epoch: &Epoch,
    identifier: &ClaimIdentifier,
    timestamp_s: UnixSeconds,
) -> Vec<Witness> {
    let seed = keccak256(format!(
        "{}\n{}\n{}\n{}",
        identifier.to_hex(),
        epoch.id,
        epoch.minimum_witnesses_for_claim_creation,
        timestamp_s
    ));

    let count = (epoch.minimum_witnesses_for_claim_creation as usize).min(epoch.witnesses.len());
    let mut remaining = epoch.witnesses.clone();
    let mut selected = Vec::with_capacity(count);
    let mut block = seed;

    for i in 0..count {
        let word = i % WORDS_PER_BLOCK;
        if word == 0 && i > 0 {
            let mut h = Keccak256Hasher::new();
            h.update(seed.as_bytes())
                .update(((i / WORDS_PER_BLOCK) as u32).to_be_bytes());
            block = h.finalize();
        }
        let bytes = block.as_bytes();
        let offset = word * 4;
        let draw = u32::from_be_bytes([
            bytes[offset],
            bytes[offset + 1],
            bytes[offset + 2],
            bytes[offset + 3],
        ]);
        let index = draw as usize % remaining.len();
        selected.push(remaining.swap_remove(index));
    }

    selected
}

#[cfg(test)]
mod tests {
    use super::*;
    use vouch_core::{Address, Bytes32};

    fn epoch(n: u8, minimum: u32) -> Epoch {
        Epoch {
            id: 1,
            witnesses: (1..=n)
                .map(|i| Witness::new(Address::from_bytes([i; 20]), format!("wss://w{i}")))
                .collect(),
            minimum_witnesses_for_claim_creation: minimum,
            timestamp_start: 0,
            timestamp_end: u64::MAX,
        }
    }

    fn reference_single_hash(epoch: &Epoch, id: &ClaimIdentifier, ts: u64) -> Vec<Witness> {
        // The widely deployed draw: one hash, 4-byte words, offset wraps.
        let seed = keccak256(format!(
            "{}\n{}\n{}\n{}",
            id.to_hex(),
            epoch.id,
            epoch.minimum_witnesses_for_claim_creation,
            ts
        ));
        let b = seed.as_bytes();
        let mut left = epoch.witnesses.clone();
        let mut out = Vec::new();
        let mut off = 0;
        for _ in 0..epoch.minimum_witnesses_for_claim_creation {
            let r = u32::from_be_bytes([b[off], b[off + 1], b[off + 2], b[off + 3]]);
            let idx = r as usize % left.len();
            out.push(left[idx].clone());
            let last = left.len() - 1;
            left[idx] = left[last].clone();
            left.pop();
            off = (off + 4) % 32;
        }
        out
    }

    #[test]
    fn single_witness_committee_selects_it() {
        let e = epoch(1, 1);
        let sel = select_witnesses_for_claim(&e, &ClaimIdentifier::new(Bytes32::from_u64(9)), 5);
        assert_eq!(sel, e.witnesses);
    }

    #[test]
    fn full_threshold_is_a_permutation() {
        let e = epoch(5, 5);
        let sel = select_witnesses_for_claim(&e, &ClaimIdentifier::new(Bytes32::from_u64(1)), 7);
        let mut a: Vec<_> = sel.iter().map(|w| w.address).collect();
        let mut b: Vec<_> = e.witnesses.iter().map(|w| w.address).collect();
        a.sort();
        b.sort();
        assert_eq!(a, b);
    }

    #[test]
    fn matches_single_hash_draw_up_to_eight() {
        for n in 1..=8u8 {
            let e = epoch(12, u32::from(n));
            for seed in 0..20u64 {
                let id = ClaimIdentifier::new(keccak256(seed.to_be_bytes()));
                assert_eq!(
                    select_witnesses_for_claim(&e, &id, 1_700_000_000 + seed),
                    reference_single_hash(&e, &id, 1_700_000_000 + seed)
                );
            }
        }
    }

    fn drawn_indices(sel: &[Witness]) -> Vec<u8> {
        sel.iter().map(|w| w.address.as_bytes()[0]).collect()
    }

    #[test]
    fn fifteen_witness_known_answer() {
        let id = ClaimIdentifier::new(Bytes32::from_u64(0x1234));
        let sel = select_witnesses_for_claim(&epoch(15, 5), &id, 1_700_000_000);
        assert_eq!(drawn_indices(&sel), vec![15, 14, 4, 7, 6]);
    }

    #[test]
    fn known_answer_past_the_first_block() {
        let id = ClaimIdentifier::new(Bytes32::from_u64(0x1234));
        let sel = select_witnesses_for_claim(&epoch(15, 12), &id, 1_700_000_000);
        assert_eq!(
            drawn_indices(&sel),
            vec![5, 13, 1, 15, 4, 14, 9, 10, 6, 7, 12, 11]
        );
    }

    #[test]
    fn inputs_change_the_draw() {
        let e = epoch(20, 3);
        let id = ClaimIdentifier::new(Bytes32::from_u64(77));
        let base = select_witnesses_for_claim(&e, &id, 100);
        let differs = (101..140).any(|ts| select_witnesses_for_claim(&e, &id, ts) != base);
        assert!(differs);
    }

    mod prop {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn deterministic_distinct_and_sized(
                n in 1u8..=40,
                min_frac in 0.0f64..=1.0,
                id in any::<[u8; 32]>(),
                ts in any::<u64>(),
            ) {
                let minimum = ((f64::from(n) * min_frac).ceil() as u32).clamp(1, u32::from(n));
                let e = epoch(n, minimum);
                let id = ClaimIdentifier::from(id);
                let a = select_witnesses_for_claim(&e, &id, ts);
                let b = select_witnesses_for_claim(&e, &id, ts);
                prop_assert_eq!(&a, &b);
                prop_assert_eq!(a.len(), minimum as usize);
                let mut addrs: Vec<_> = a.iter().map(|w| w.address).collect();
                addrs.sort();
                addrs.dedup();
                prop_assert_eq!(addrs.len(), minimum as usize);
                prop_assert!(a.iter().all(|w| e.witnesses.contains(w)));
            }
        }
    }
}
