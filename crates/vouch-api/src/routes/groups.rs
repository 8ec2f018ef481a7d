//! # Group API
//!
//! Provider-scoped membership groups and claim merkelization.
//!
//! ## Endpoints
//!
//! - `POST /v1/groups`: Create the group for a provider (owner only).
//! - `GET /v1/groups/{provider}`: Group summary.
//! - `GET /v1/groups/{provider}/members/{commitment}/proof`: Inclusion proof.
//! - `POST /v1/groups/merkelize`: Verify a claim and insert a member.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use vouch_bridge::{GroupRef, MerkelizeReceipt};
use vouch_core::{Bytes32, ClaimProof};
use vouch_crypto::MerkleProof;
use vouch_state::GroupSummary;

use crate::auth::CallerIdentity;
use crate::error::AppError;
use crate::extractors::{extract_json, extract_validated_json, parse_path, Validate};
use crate::state::AppState;

/// Request body for group creation.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateGroupRequest {
    /// Provider the group is for.
    pub provider: String,
    /// Tree depth; the configured default when omitted.
    #[serde(default)]
    pub merkle_tree_depth: Option<u8>,
}

impl Validate for CreateGroupRequest {
    fn validate(&self) -> Result<(), String> {
        if self.provider.is_empty() {
            return Err("provider must not be empty".into());
        }
        Ok(())
    }
}

/// Request body for merkelization.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MerkelizeRequest {
    /// The claim proof to verify and consume.
    pub proof: ClaimProof,
    /// Commitment to insert as the new leaf.
    pub member_commitment: Bytes32,
}

/// Build the groups router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/groups", post(create_group))
        .route("/v1/groups/merkelize", post(merkelize_user))
        .route("/v1/groups/{provider}", get(group_summary))
        .route(
            "/v1/groups/{provider}/members/{commitment}/proof",
            get(inclusion_proof),
        )
}

/// POST /v1/groups: Create the group for a provider.
async fn create_group(
    State(state): State<AppState>,
    caller: CallerIdentity,
    body: Result<Json<CreateGroupRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<GroupSummary>), AppError> {
    let req = extract_validated_json(body)?;
    let summary = state
        .registry
        .create_group(&caller.address, &req.provider, req.merkle_tree_depth)?;
    Ok((StatusCode::CREATED, Json(summary)))
}

/// GET /v1/groups/{provider}: Group summary.
async fn group_summary(
    State(state): State<AppState>,
    Path(provider): Path<String>,
) -> Result<Json<GroupSummary>, AppError> {
    state
        .registry
        .group_summary(&GroupRef::Provider(provider.clone()))
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("no group for provider '{provider}'")))
}

/// GET /v1/groups/{provider}/members/{commitment}/proof: Inclusion proof
/// for a member, against the group's current root.
async fn inclusion_proof(
    State(state): State<AppState>,
    Path((provider, commitment)): Path<(String, String)>,
) -> Result<Json<MerkleProof>, AppError> {
    let commitment: Bytes32 = parse_path("commitment", &commitment)?;
    let proof = state
        .registry
        .inclusion_proof(&GroupRef::Provider(provider), &commitment)?;
    Ok(Json(proof))
}

/// POST /v1/groups/merkelize: Verify a claim and insert the member.
async fn merkelize_user(
    State(state): State<AppState>,
    body: Result<Json<MerkelizeRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<MerkelizeReceipt>), AppError> {
    let req = extract_json(body)?;
    let receipt = state
        .registry
        .merkelize_user(&req.proof, req.member_commitment)?;
    Ok((StatusCode::CREATED, Json(receipt)))
}
