//! # vouch-registry: Orchestration Facade
//!
//! The thin boundary external callers (the HTTP API, tooling, tests) use to
//! reach the epoch registry, claim verifier, and credential bridge.
//!
//! ## Responsibilities
//!
//! - **Linearization**: one `parking_lot::RwLock` over all mutable state.
//!   An operation either commits fully or leaves every store unchanged,
//!   and no caller observes an intermediate state.
//! - **Authorization**: administrative operations take the caller address
//!   and resolve it against the configured owner before touching state.
//! - **Time**: "now" comes from an injected [`Clock`](vouch_core::Clock).
//! - **Observability**: `tracing` events on every state change and
//!   rejection, `metrics` counters named in [`metrics`].
//!
//! ## Configuration
//!
//! [`RegistryConfig`] is read from `VOUCH_*` environment variables or a
//! YAML/JSON document.

pub mod config;
pub mod metrics;
pub mod registry;

pub use config::{ConfigError, RegistryConfig};
pub use registry::Registry;
