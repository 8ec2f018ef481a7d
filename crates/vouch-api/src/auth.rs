//! # Authentication Middleware
//!
//! Resolves the caller of every `/v1` request to an address.
//!
//! ## Token Format
//!
//! ```text
//! Authorization: Bearer {secret}
//! ```
//!
//! A request carrying the configured secret acts as the registry owner.
//! A request with no `Authorization` header is anonymous: it can verify
//! claims, merkelize, and prove membership, and the registry rejects its
//! administrative calls with `NotAuthorized`. A header with the wrong
//! secret or scheme is rejected here with 401.
//!
//! ## CallerIdentity
//!
//! Every request that passes gets a [`CallerIdentity`] injected into the
//! request extensions. Handlers extract it via the `FromRequestParts` impl.

use axum::extract::{FromRequestParts, Request};
use axum::http::request::Parts;
use axum::http::{header, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use subtle::ConstantTimeEq;
use vouch_core::Address;

use crate::error::{AppError, ErrorBody, ErrorDetail};

// ── CallerIdentity ──────────────────────────────────────────────────────────

/// The address a request acts as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallerIdentity {
    /// The owner for authenticated requests, the zero address otherwise.
    pub address: Address,
}

impl CallerIdentity {
    /// An unauthenticated caller.
    pub const ANONYMOUS: CallerIdentity = CallerIdentity {
        address: Address::ZERO,
    };

    /// Whether the request presented no credentials.
    pub fn is_anonymous(&self) -> bool {
        self.address.is_zero()
    }
}

/// Extracts the identity that the auth middleware injected into extensions.
/// Returns 401 if no identity is present (middleware didn't run).
impl<S: Send + Sync> FromRequestParts<S> for CallerIdentity {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CallerIdentity>()
            .copied()
            .ok_or_else(|| AppError::Unauthorized("no caller identity in request context".into()))
    }
}

// ── Auth Configuration ──────────────────────────────────────────────────────

/// Auth configuration injected into request extensions.
///
/// Custom `Debug` redacts the token value to prevent credential leakage in logs.
#[derive(Clone)]
pub struct AuthConfig {
    /// Owner secret. `None` disables authentication: every request acts as
    /// the owner.
    pub token: Option<String>,
    /// The address authenticated requests act as.
    pub owner: Address,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .field("owner", &self.owner)
            .finish()
    }
}

// ── Token Validation ────────────────────────────────────────────────────────

/// Constant-time comparison of bearer tokens.
///
/// When lengths differ, performs a dummy comparison so timing does not
/// depend on how much of the token matched.
fn constant_time_token_eq(provided: &str, expected: &str) -> bool {
    let provided = provided.as_bytes();
    let expected = expected.as_bytes();
    if provided.len() != expected.len() {
        let _ = expected.ct_eq(expected);
        return false;
    }
    provided.ct_eq(expected).into()
}

// ── Middleware ───────────────────────────────────────────────────────────────

/// Resolve the caller from the Authorization header and inject a
/// [`CallerIdentity`] into request extensions.
pub async fn auth_middleware(mut request: Request, next: Next) -> Response {
    let config = request.extensions().get::<AuthConfig>().cloned();

    let identity = match config {
        Some(AuthConfig {
            token: Some(ref expected),
            owner,
        }) => {
            let auth_header = request
                .headers()
                .get(header::AUTHORIZATION)
                .and_then(|v| v.to_str().ok());

            match auth_header {
                Some(value) => match value.strip_prefix("Bearer ") {
                    Some(provided) if constant_time_token_eq(provided, expected) => {
                        CallerIdentity { address: owner }
                    }
                    Some(_) => {
                        tracing::warn!("authentication failed: invalid bearer token");
                        return unauthorized_response("invalid bearer token");
                    }
                    None => {
                        tracing::warn!("authentication failed: non-Bearer authorization scheme");
                        return unauthorized_response(
                            "authorization header must use Bearer scheme",
                        );
                    }
                },
                None => CallerIdentity::ANONYMOUS,
            }
        }
        // Auth disabled: every request acts as the owner.
        Some(AuthConfig { token: None, owner }) => CallerIdentity { address: owner },
        None => CallerIdentity::ANONYMOUS,
    };

    request.extensions_mut().insert(identity);
    next.run(request).await
}

fn unauthorized_response(message: &str) -> Response {
    let body = ErrorBody {
        error: ErrorDetail {
            code: "UNAUTHORIZED".to_string(),
            message: message.to_string(),
            details: None,
        },
    };
    (StatusCode::UNAUTHORIZED, Json(body)).into_response()
}
