//! # Claim API
//!
//! Stateless claim checks against the stored committees.
//!
//! ## Endpoints
//!
//! - `POST /v1/claims/verify`: Verify a claim proof.
//! - `POST /v1/claims/context-field`: Extract a field from a claim context.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use vouch_claims::VerifiedClaim;
use vouch_core::ClaimProof;
use vouch_registry::Registry;

use crate::error::AppError;
use crate::extractors::{extract_json, extract_validated_json, Validate};
use crate::state::AppState;

/// Request body for context field extraction.
#[derive(Debug, Deserialize)]
pub struct ContextFieldRequest {
    /// The claim context payload.
    pub context: String,
    /// Field name, or a full `"name":"` pattern.
    pub key: String,
}

impl Validate for ContextFieldRequest {
    fn validate(&self) -> Result<(), String> {
        if self.key.is_empty() {
            return Err("key must not be empty".into());
        }
        Ok(())
    }
}

/// Extracted value; `found` is false when the key does not occur.
#[derive(Debug, Serialize, Deserialize)]
pub struct ContextFieldResponse {
    pub found: bool,
    pub value: String,
}

/// Build the claims router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/claims/verify", post(verify_claim))
        .route("/v1/claims/context-field", post(context_field))
}

/// POST /v1/claims/verify: Verify a claim proof.
async fn verify_claim(
    State(state): State<AppState>,
    body: Result<Json<ClaimProof>, JsonRejection>,
) -> Result<Json<VerifiedClaim>, AppError> {
    let proof = extract_json(body)?;
    Ok(Json(state.registry.verify_proof(&proof)?))
}

/// POST /v1/claims/context-field: Extract a field from a claim context.
async fn context_field(
    body: Result<Json<ContextFieldRequest>, JsonRejection>,
) -> Result<Json<ContextFieldResponse>, AppError> {
    let req = extract_validated_json(body)?;
    let value = Registry::extract_field_from_context(&req.context, &req.key);
    Ok(Json(ContextFieldResponse {
        found: value.is_some(),
        value: value.unwrap_or_default(),
    }))
}
