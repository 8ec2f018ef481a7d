//! # Epoch API
//!
//! Witness committee management and per-claim witness selection.
//!
//! ## Endpoints
//!
//! - `POST /v1/epochs`: Append a committee (owner only).
//! - `GET /v1/epochs/current`: Id of the current epoch.
//! - `GET /v1/epochs/{id}`: Fetch an epoch; `0` is the current one.
//! - `POST /v1/epochs/{id}/witnesses`: Witnesses that must sign a claim.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use vouch_core::{ClaimIdentifier, Epoch, EpochId, UnixSeconds, Witness};

use crate::auth::CallerIdentity;
use crate::error::AppError;
use crate::extractors::{extract_json, extract_validated_json, parse_path, Validate};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / Response types
// ---------------------------------------------------------------------------

/// Request body for adding an epoch.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddEpochRequest {
    /// Ordered committee.
    pub witnesses: Vec<Witness>,
    /// Witnesses required per claim.
    pub minimum_witnesses_for_claim_creation: u32,
}

impl Validate for AddEpochRequest {
    fn validate(&self) -> Result<(), String> {
        const MAX_WITNESSES: usize = 1_024;
        if self.witnesses.len() > MAX_WITNESSES {
            return Err(format!("witnesses must not exceed {MAX_WITNESSES} entries"));
        }
        Ok(())
    }
}

/// Response for the current epoch id.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentEpochResponse {
    /// `0` when no epoch exists yet.
    pub epoch_id: EpochId,
}

/// Request body for witness selection.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WitnessesForClaimRequest {
    /// Claim identifier.
    pub identifier: ClaimIdentifier,
    /// Claim creation time.
    pub timestamp_s: UnixSeconds,
}

/// Selected witnesses, in signing order.
#[derive(Debug, Serialize, Deserialize)]
pub struct WitnessesForClaimResponse {
    /// Witnesses whose signatures the claim must carry.
    pub witnesses: Vec<Witness>,
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

/// Build the epochs router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/epochs", post(add_epoch))
        .route("/v1/epochs/current", get(current_epoch))
        .route("/v1/epochs/{id}", get(fetch_epoch))
        .route("/v1/epochs/{id}/witnesses", post(witnesses_for_claim))
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /v1/epochs: Append a committee starting now.
async fn add_epoch(
    State(state): State<AppState>,
    caller: CallerIdentity,
    body: Result<Json<AddEpochRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Epoch>), AppError> {
    let req = extract_validated_json(body)?;
    let epoch = state.registry.add_epoch(
        &caller.address,
        req.witnesses,
        req.minimum_witnesses_for_claim_creation,
    )?;
    Ok((StatusCode::CREATED, Json(epoch)))
}

/// GET /v1/epochs/current: Id of the most recent epoch.
async fn current_epoch(State(state): State<AppState>) -> Json<CurrentEpochResponse> {
    Json(CurrentEpochResponse {
        epoch_id: state.registry.current_epoch_id(),
    })
}

/// GET /v1/epochs/{id}: Fetch an epoch.
async fn fetch_epoch(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Epoch>, AppError> {
    let id: EpochId = parse_path("epoch id", &id)?;
    Ok(Json(state.registry.fetch_epoch(id)?))
}

/// POST /v1/epochs/{id}/witnesses: Witnesses that must sign a claim.
async fn witnesses_for_claim(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<WitnessesForClaimRequest>, JsonRejection>,
) -> Result<Json<WitnessesForClaimResponse>, AppError> {
    let id: EpochId = parse_path("epoch id", &id)?;
    let req = extract_json(body)?;
    let witnesses = state
        .registry
        .fetch_witnesses_for_claim(id, &req.identifier, req.timestamp_s)?;
    Ok(Json(WitnessesForClaimResponse { witnesses }))
}
