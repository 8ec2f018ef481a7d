//! # Registry Metrics
//!
//! Counter names recorded through the `metrics` facade. Nothing is
//! exported from here; a binary installs a recorder (the API server uses
//! the Prometheus exporter) or the calls are no-ops.

use vouch_core::VouchError;

/// Epochs appended.
pub const EPOCHS_ADDED: &str = "vouch_epochs_added_total";
/// Claim proofs that verified.
pub const CLAIMS_VERIFIED: &str = "vouch_claims_verified_total";
/// Claim proofs rejected, labelled by `reason`.
pub const CLAIMS_REJECTED: &str = "vouch_claims_rejected_total";
/// Commitments inserted into a group.
pub const MEMBERS_MERKELIZED: &str = "vouch_members_merkelized_total";
/// Membership proofs accepted.
pub const MEMBERSHIP_PROOFS: &str = "vouch_membership_proofs_total";
/// Membership proofs rejected, labelled by `reason`.
pub const MEMBERSHIP_REJECTED: &str = "vouch_membership_rejected_total";

pub(crate) fn incr(name: &'static str) {
    ::metrics::counter!(name).increment(1);
}

pub(crate) fn incr_rejected(name: &'static str, err: &VouchError) {
    ::metrics::counter!(name, "reason" => err.code()).increment(1);
}
