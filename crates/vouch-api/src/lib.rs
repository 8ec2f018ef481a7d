//! # vouch-api: Axum API Service
//!
//! Exposes the registry facade over HTTP. Handlers only translate between
//! JSON and registry calls; every rule lives in the domain crates.
//!
//! ## API Surface
//!
//! | Prefix             | Module               | Domain                        |
//! |--------------------|----------------------|-------------------------------|
//! | `/v1/epochs/*`     | [`routes::epochs`]   | Witness committees, selection |
//! | `/v1/claims/*`     | [`routes::claims`]   | Claim verification            |
//! | `/v1/groups/*`     | [`routes::groups`]   | Groups, merkelization         |
//! | `/v1/dapps/*`      | [`routes::dapps`]    | Dapp scopes                   |
//! | `/v1/membership/*` | [`routes::dapps`]    | Membership proofs             |
//!
//! ## Middleware Stack (execution order)
//!
//! ```text
//! TraceLayer → MetricsMiddleware → AuthMiddleware → Handler
//! ```
//!
//! `/health/liveness` and `/metrics` sit outside the auth middleware.

pub mod auth;
pub mod error;
pub mod extractors;
pub mod middleware;
pub mod routes;
pub mod state;

use axum::extract::State;
use axum::middleware::from_fn;
use axum::routing::get;
use axum::Router;

use crate::auth::AuthConfig;
use crate::state::AppState;

pub use error::AppError;

/// Assemble the full application router with all routes and middleware.
pub fn app(state: AppState) -> Router {
    let auth_config = AuthConfig {
        token: state.config.auth_token.clone(),
        owner: *state.registry.owner(),
    };

    let api = Router::new()
        .merge(routes::epochs::router())
        .merge(routes::claims::router())
        .merge(routes::groups::router())
        .merge(routes::dapps::router())
        .layer(from_fn(auth::auth_middleware))
        .layer(from_fn(middleware::metrics::metrics_middleware))
        .layer(middleware::tracing_layer::layer())
        .layer(axum::Extension(auth_config))
        .with_state(state.clone());

    let probes = Router::new()
        .route("/health/liveness", get(liveness))
        .route("/metrics", get(render_metrics))
        .with_state(state);

    Router::new().merge(probes).merge(api)
}

/// Liveness probe: always returns 200 if the process is running.
async fn liveness() -> &'static str {
    "ok"
}

/// Prometheus text exposition. Empty when no recorder is installed.
async fn render_metrics(State(state): State<AppState>) -> String {
    state
        .prometheus
        .as_ref()
        .map(|handle| handle.render())
        .unwrap_or_default()
}
