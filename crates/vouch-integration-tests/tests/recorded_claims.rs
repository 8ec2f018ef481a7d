//! # Recorded Production Claims
//!
//! Three claims attested by live witnesses. Each one must hash to its
//! recorded identifier and verify against a single-witness epoch whose
//! window covers the claim timestamp. Any drift in the identifier hash,
//! the signing payload layout, or EIP-191 recovery breaks these.

use vouch_claims::{extract_field_from_context, hash_claim_info, verify_proof};
use vouch_core::{
    Address, ClaimInfo, ClaimProof, CompleteClaimData, Epoch, SignatureBytes, SignedClaim,
    VouchError, Witness,
};
use vouch_state::{EpochRegistry, DEFAULT_EPOCH_DURATION_S};

struct Recorded {
    witness: &'static str,
    provider: &'static str,
    parameters: &'static str,
    context: &'static str,
    identifier: &'static str,
    owner: &'static str,
    timestamp_s: u64,
    signature: &'static str,
}

const TWITTER_FOLLOWERS: Recorded = Recorded {
    witness: "0x189027e3c77b3a92fd01bf7cc4e6a86e77f5034e",
    provider: "http",
    parameters: r#"{"method":"GET","responseMatches":[{"type":"regex","value":"followers_count\":\\s*(?<followers_count>[\\d\\.]+)"}],"url":"https://api.twitter.com/2/users/by/username/anime_kaguya?user.fields=public_metrics"}"#,
    context: r#"{"extractedParameters":{"followers_count":"473022"},"providerHash":"0x12700638dc2514ec6c1608afc479d979d05c545cf0da29d2434ca2dbbf533600"}"#,
    identifier: "0x9e19819f75fe9a5440fc89505225f27104e85ca9456cf71ce441131e08ccd2f3",
    owner: "0xf9f25d1b846625674901ace47d6313d1ac795265",
    timestamp_s: 1731312831,
    signature: "0x5303b18942e4a2f395afc9485def2f0cb1b0649ce957df508dcc607f6d539ec6747197c9495c84d1229ca336c00b37335f461bb21955be2294047e4553760d961b",
};

const GITHUB_USERNAME: Recorded = Recorded {
    witness: "0x244897572368eadf65bfbc5aec98d8e5443a9072",
    provider: "http",
    parameters: r#"{"additionalClientOptions":{},"body":"","geoLocation":"","headers":{"user-agent":"Mozilla/5.0 (iPhone; CPU iPhone OS 17_6_1 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Mobile/15E148 Safari/604.1"},"method":"GET","paramValues":{"username":"qpzm"},"responseMatches":[{"invert":false,"type":"contains","value":"<span class=\"color-fg-muted\">({{username}})</span>"}],"responseRedactions":[{"jsonPath":"","regex":"<span\\ class=\"color\\-fg\\-muted\">\\((.*)\\)</span>","xPath":""}],"url":"https://github.com/settings/profile"}"#,
    context: r#"{"contextAddress":"0x0","contextMessage":"","extractedParameters":{"username":"qpzm"},"providerHash":"0x74734677e529e5d823b3a2845799a908ab59d2afa9ac168c6fd5d57d1b0e319f"}"#,
    identifier: "0x38857161784f3a3ae27d411909ef5a55606901525e6390267a82f7bc141a3ba8",
    owner: "0xe57ab8012af3becf06d18b679f4a48d0c0865294",
    timestamp_s: 1728025483,
    signature: "0xc754c9acb205dfbf8b06c5bab3ae4083ed19a4cc3732c5da23f6e54f8f667cf7444b837576ce4b0005a0f00287b609ab8d61a252fb75e14f15c75addf9ecfdc41b",
};

const STEAM_ID: Recorded = Recorded {
    witness: "0x244897572368eadf65bfbc5aec98d8e5443a9072",
    provider: "http",
    parameters: r#"{"body":"","geoLocation":"in","method":"GET","responseMatches":[{"type":"contains","value":"_steamid\">Steam ID: 76561198155115943</div>"}],"responseRedactions":[{"jsonPath":"","regex":"_steamid\">Steam ID: (.*)</div>","xPath":"id(\"responsive_page_template_content\")/div[@class=\"page_header_ctn\"]/div[@class=\"page_content\"]/div[@class=\"youraccount_steamid\"]"}],"url":"https://store.steampowered.com/account/"}"#,
    context: r#"{"contextAddress":"0x0","contextMessage":"0098967F","providerHash":"0xeda3e4cee88b5cbaec045410a0042f99ab3733a4d5b5eb2da5cecc25aa9e9df1"}"#,
    identifier: "0x930a5687ac463eb8f048bd203659bd8f73119c534969258e5a7c5b8eb0987b16",
    owner: "0xef27fa8830a070aa6e26703be6f17858b61d3fba",
    timestamp_s: 1712685785,
    signature: "0xb246a05693f3e21a70eab5dfd5edc1d0597a160c82b8bf9e24d1f09f9dde9899154bb1672c1bf38193a7829e96e4ed09bc327657bf266e90451f6a90c8b45dfb1c",
};

fn proof_of(r: &Recorded) -> ClaimProof {
    ClaimProof {
        claim_info: ClaimInfo {
            provider: r.provider.into(),
            parameters: r.parameters.into(),
            context: r.context.into(),
        },
        signed_claim: SignedClaim {
            claim: CompleteClaimData {
                identifier: r.identifier.parse().unwrap(),
                owner: r.owner.parse().unwrap(),
                epoch: 1,
                timestamp_s: r.timestamp_s,
            },
            signatures: vec![SignatureBytes::from_hex(r.signature).unwrap()],
        },
    }
}

/// A single-witness epoch 1 opened shortly before the claim.
fn epochs_for(r: &Recorded) -> EpochRegistry {
    let start = r.timestamp_s - 60;
    let witness: Address = r.witness.parse().unwrap();
    EpochRegistry::from_epochs(
        vec![Epoch {
            id: 1,
            witnesses: vec![Witness::new(witness, "wss://witness.example/ws")],
            minimum_witnesses_for_claim_creation: 1,
            timestamp_start: start,
            timestamp_end: start + DEFAULT_EPOCH_DURATION_S,
        }],
        DEFAULT_EPOCH_DURATION_S,
    )
    .unwrap()
}

fn assert_verifies(r: &Recorded) {
    let proof = proof_of(r);
    assert_eq!(
        hash_claim_info(&proof.claim_info).to_hex(),
        r.identifier,
        "identifier drifted"
    );
    let verified = verify_proof(&epochs_for(r), &proof).unwrap();
    assert_eq!(verified.witnesses, vec![r.witness.parse::<Address>().unwrap()]);
    assert_eq!(verified.owner, r.owner.parse::<Address>().unwrap());
    assert_eq!(verified.timestamp_s, r.timestamp_s);
}

#[test]
fn twitter_followers_claim_verifies() {
    assert_verifies(&TWITTER_FOLLOWERS);
    assert_eq!(
        extract_field_from_context(TWITTER_FOLLOWERS.context, "\"followers_count\":\""),
        Some("473022")
    );
}

#[test]
fn github_username_claim_verifies() {
    assert_verifies(&GITHUB_USERNAME);
    assert_eq!(
        extract_field_from_context(GITHUB_USERNAME.context, "\"username\":\""),
        Some("qpzm")
    );
}

#[test]
fn steam_id_claim_verifies() {
    assert_verifies(&STEAM_ID);
    assert_eq!(
        extract_field_from_context(STEAM_ID.context, "\"contextMessage\":\""),
        Some("0098967F")
    );
}

#[test]
fn recorded_signature_does_not_cover_another_owner() {
    let mut proof = proof_of(&STEAM_ID);
    proof.signed_claim.claim.owner = GITHUB_USERNAME.owner.parse().unwrap();
    assert!(matches!(
        verify_proof(&epochs_for(&STEAM_ID), &proof),
        Err(VouchError::SignatureNotAppropriate { position: 0, .. })
    ));
}

#[test]
fn recorded_signature_does_not_cover_another_timestamp() {
    let mut proof = proof_of(&GITHUB_USERNAME);
    proof.signed_claim.claim.timestamp_s += 1;
    assert!(matches!(
        verify_proof(&epochs_for(&GITHUB_USERNAME), &proof),
        Err(VouchError::SignatureNotAppropriate { .. })
    ));
}

#[test]
fn recorded_claim_rejected_by_a_different_witness() {
    // The github and steam claims share a witness; the twitter one does not.
    let proof = proof_of(&TWITTER_FOLLOWERS);
    let mut other = Recorded { ..TWITTER_FOLLOWERS };
    other.witness = STEAM_ID.witness;
    assert!(matches!(
        verify_proof(&epochs_for(&other), &proof),
        Err(VouchError::SignatureNotAppropriate { .. })
    ));
}

#[test]
fn recorded_claim_outside_epoch_window_is_rejected() {
    let proof = proof_of(&STEAM_ID);
    let late = Recorded {
        timestamp_s: STEAM_ID.timestamp_s + 2 * DEFAULT_EPOCH_DURATION_S,
        ..STEAM_ID
    };
    assert!(matches!(
        verify_proof(&epochs_for(&late), &proof),
        Err(VouchError::EpochNotFound { epoch: 1, .. })
    ));
}
