//! # Middleware
//!
//! - `metrics`: per-request counters recorded through the `metrics` facade.
//! - `tracing_layer`: `tower_http` request spans.

pub mod metrics;
pub mod tracing_layer;
