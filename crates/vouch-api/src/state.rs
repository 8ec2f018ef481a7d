//! # Application State
//!
//! Shared state handed to every handler: the registry facade, server
//! configuration, and the Prometheus handle when a recorder is installed.

use std::sync::Arc;

use metrics_exporter_prometheus::PrometheusHandle;
use vouch_registry::Registry;

/// Server configuration.
///
/// Custom `Debug` redacts the auth token.
#[derive(Clone)]
pub struct AppConfig {
    /// Port to bind the HTTP server to.
    pub port: u16,
    /// Bearer secret that authenticates the registry owner.
    /// If `None`, authentication is disabled.
    pub auth_token: Option<String>,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("port", &self.port)
            .field(
                "auth_token",
                &self.auth_token.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            auth_token: None,
        }
    }
}

/// State shared by all handlers.
#[derive(Clone)]
pub struct AppState {
    /// The registry facade.
    pub registry: Arc<Registry>,
    /// Server configuration.
    pub config: AppConfig,
    /// Renders `/metrics`; absent when no recorder was installed.
    pub prometheus: Option<PrometheusHandle>,
}

impl AppState {
    /// State over `registry` without a metrics recorder.
    pub fn new(registry: Registry, config: AppConfig) -> Self {
        Self {
            registry: Arc::new(registry),
            config,
            prometheus: None,
        }
    }

    /// Serve `/metrics` from `handle`.
    pub fn with_prometheus(mut self, handle: PrometheusHandle) -> Self {
        self.prometheus = Some(handle);
        self
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("registry", &self.registry)
            .field("config", &self.config)
            .field("prometheus", &self.prometheus.is_some())
            .finish()
    }
}
