//! # API Error Types
//!
//! Structured error type implementing `axum::response::IntoResponse`.
//! Maps [`VouchError`] from the registry to HTTP status codes and returns
//! JSON error bodies with a machine-readable code and a message.
//! Never exposes internal error details in responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use vouch_core::VouchError;

/// Structured JSON error response body.
///
/// All error responses use this format for consistency across the API surface.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    /// The error detail.
    pub error: ErrorDetail,
}

/// Inner error detail.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDetail {
    /// Machine-readable error code (e.g., "EPOCH_NOT_FOUND", "BAD_REQUEST").
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Additional details, present only for client errors.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// Application-level error type that implements [`IntoResponse`] for Axum.
#[derive(Error, Debug)]
pub enum AppError {
    /// A registry operation failed; status depends on the kind.
    #[error(transparent)]
    Domain(#[from] VouchError),

    /// Resource not found (404).
    #[error("not found: {0}")]
    NotFound(String),

    /// Request validation failed (422).
    #[error("validation error: {0}")]
    Validation(String),

    /// Request body or path could not be parsed (400).
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Authentication failure: invalid token (401).
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Internal server error (500). Message is logged but not returned to client.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Return the HTTP status code and machine-readable error code for this error.
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            Self::Domain(err) => (domain_status(err), err.code()),
            Self::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            Self::Validation(_) => (StatusCode::UNPROCESSABLE_ENTITY, "VALIDATION_ERROR"),
            Self::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            Self::Unauthorized(_) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            Self::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }
}

/// Status for a registry failure: authorization 403, lookups 404,
/// duplicates and replays 409, everything else 422.
fn domain_status(err: &VouchError) -> StatusCode {
    match err {
        VouchError::NotAuthorized { .. } => StatusCode::FORBIDDEN,
        VouchError::EpochNotFound { .. }
        | VouchError::GroupNotFound(_)
        | VouchError::DappNotFound(_) => StatusCode::NOT_FOUND,
        VouchError::GroupAlreadyExists { .. }
        | VouchError::UserAlreadyMerkelized { .. }
        | VouchError::DappAlreadyExists(_)
        | VouchError::NullifierAlreadyConsumed { .. }
        | VouchError::GroupFull { .. } => StatusCode::CONFLICT,
        VouchError::InvalidEpochConfig(_)
        | VouchError::IdentifierMismatch { .. }
        | VouchError::NoSignatures
        | VouchError::SignatureCountMismatch { .. }
        | VouchError::SignatureNotAppropriate { .. }
        | VouchError::InvalidGroupDepth { .. }
        | VouchError::InvalidMemberCommitment(_)
        | VouchError::InvalidMembershipProof(_)
        | VouchError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        // Never expose internal error messages to clients.
        let message = match &self {
            Self::Internal(_) => "An internal error occurred".to_string(),
            other => other.to_string(),
        };

        if matches!(&self, Self::Internal(_)) {
            tracing::error!(error = %self, "internal server error");
        }

        let body = ErrorBody {
            error: ErrorDetail {
                code: code.to_string(),
                message,
                details: None,
            },
        };

        (status, Json(body)).into_response()
    }
}

/// Convert vouch-core validation errors to API errors.
impl From<vouch_core::ValidationError> for AppError {
    fn from(err: vouch_core::ValidationError) -> Self {
        Self::BadRequest(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use vouch_core::DappId;

    #[test]
    fn not_authorized_is_forbidden() {
        let err = AppError::from(VouchError::NotAuthorized {
            caller: "0x00".into(),
        });
        let (status, code) = err.status_and_code();
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(code, "NOT_AUTHORIZED");
    }

    #[test]
    fn lookups_are_not_found() {
        let err = AppError::from(VouchError::EpochNotFound {
            epoch: 9,
            reason: "unknown epoch id",
        });
        assert_eq!(err.status_and_code().0, StatusCode::NOT_FOUND);
        let err = AppError::from(VouchError::DappNotFound(DappId::from_u64(1)));
        assert_eq!(err.status_and_code(), (StatusCode::NOT_FOUND, "DAPP_NOT_FOUND"));
    }

    #[test]
    fn replays_are_conflicts() {
        let err = AppError::from(VouchError::NullifierAlreadyConsumed {
            dapp_id: DappId::from_u64(1),
            nullifier_hash: "0x01".into(),
        });
        assert_eq!(
            err.status_and_code(),
            (StatusCode::CONFLICT, "NULLIFIER_ALREADY_CONSUMED")
        );
    }

    #[test]
    fn verification_failures_are_unprocessable() {
        let err = AppError::from(VouchError::SignatureCountMismatch {
            signatures: 1,
            witnesses: 2,
        });
        assert_eq!(err.status_and_code().0, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn bad_request_status_code() {
        let err = AppError::BadRequest("malformed".into());
        assert_eq!(err.status_and_code(), (StatusCode::BAD_REQUEST, "BAD_REQUEST"));
    }

    #[tokio::test]
    async fn internal_error_message_is_hidden() {
        let resp = AppError::Internal("lock poisoned at 0xdead".into()).into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        let body: ErrorBody = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body.error.code, "INTERNAL_ERROR");
        assert!(!body.error.message.contains("0xdead"));
    }

    #[tokio::test]
    async fn domain_error_body_carries_code_and_message() {
        let resp = AppError::from(VouchError::NoSignatures).into_response();
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        let body: ErrorBody = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body.error.code, "NO_SIGNATURES");
        assert_eq!(body.error.message, "no signatures");
        assert!(body.error.details.is_none());
    }
}
