//! # Dapp & Membership API
//!
//! Dapp scopes and anonymous membership proofs bound to them.
//!
//! ## Endpoints
//!
//! - `POST /v1/dapps`: Register a dapp scope (owner only).
//! - `GET /v1/dapps/{id}`: Whether a dapp exists.
//! - `POST /v1/membership/verify`: Verify a membership proof and consume
//!   its nullifier.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use vouch_bridge::{MembershipRequest, VerifiedMembership};
use vouch_core::{Bytes32, DappId};

use crate::auth::CallerIdentity;
use crate::error::AppError;
use crate::extractors::{extract_json, parse_path};
use crate::state::AppState;

/// Request body for dapp creation.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDappRequest {
    /// Decimal integer or `0x` hex.
    pub dapp_id: DappId,
}

/// A registered dapp.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DappResponse {
    pub dapp_id: DappId,
    /// The external nullifier membership proofs for this dapp carry.
    pub external_nullifier: Bytes32,
}

impl From<DappId> for DappResponse {
    fn from(dapp_id: DappId) -> Self {
        Self {
            dapp_id,
            external_nullifier: dapp_id.external_nullifier(),
        }
    }
}

/// Build the dapps router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/dapps", post(create_dapp))
        .route("/v1/dapps/{id}", get(get_dapp))
        .route("/v1/membership/verify", post(verify_membership))
}

/// POST /v1/dapps: Register a dapp scope.
async fn create_dapp(
    State(state): State<AppState>,
    caller: CallerIdentity,
    body: Result<Json<CreateDappRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<DappResponse>), AppError> {
    let req = extract_json(body)?;
    state.registry.create_dapp(&caller.address, req.dapp_id)?;
    Ok((StatusCode::CREATED, Json(req.dapp_id.into())))
}

/// GET /v1/dapps/{id}: Whether a dapp exists.
async fn get_dapp(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DappResponse>, AppError> {
    let dapp_id: DappId = parse_path("dapp id", &id)?;
    if state.registry.dapp_exists(&dapp_id) {
        Ok(Json(dapp_id.into()))
    } else {
        Err(AppError::NotFound(format!("dapp {dapp_id} not created")))
    }
}

/// POST /v1/membership/verify: Verify a membership proof.
async fn verify_membership(
    State(state): State<AppState>,
    body: Result<Json<MembershipRequest>, JsonRejection>,
) -> Result<Json<VerifiedMembership>, AppError> {
    let req = extract_json(body)?;
    Ok(Json(state.registry.verify_merkel_identity(&req)?))
}
