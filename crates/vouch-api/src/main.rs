//! # vouch-api: Binary Entry Point
//!
//! Starts the Axum HTTP server for the vouch registry.
//!
//! Environment:
//! - `PORT` (default 8080)
//! - `AUTH_TOKEN`: owner bearer secret; authentication is disabled when unset
//! - `VOUCH_CONFIG`: YAML/JSON registry config file; otherwise `VOUCH_*`
//!   variables (see `RegistryConfig::from_env`)
//! - `VOUCH_EPOCHS`: YAML/JSON file of previously exported epochs to restore
//! - `LOG_FORMAT=json`: JSON log lines
//! - `RUST_LOG`: tracing filter (default `info`)

use std::sync::Arc;

use metrics_exporter_prometheus::PrometheusBuilder;
use tracing_subscriber::EnvFilter;
use vouch_api::state::{AppConfig, AppState};
use vouch_core::{Epoch, SystemClock};
use vouch_registry::{Registry, RegistryConfig};
use vouch_zkp::MockMembershipSystem;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);
    let auth_token = std::env::var("AUTH_TOKEN").ok();
    if auth_token.is_none() {
        tracing::warn!("AUTH_TOKEN not set; every request acts as the registry owner");
    }
    let config = AppConfig { port, auth_token };

    let registry_config = match std::env::var("VOUCH_CONFIG") {
        Ok(path) => RegistryConfig::from_yaml_str(&std::fs::read_to_string(&path)?)?,
        Err(_) => RegistryConfig::from_env()?,
    };
    let epochs: Vec<Epoch> = match std::env::var("VOUCH_EPOCHS") {
        Ok(path) => serde_yaml::from_str(&std::fs::read_to_string(&path)?)?,
        Err(_) => Vec::new(),
    };
    tracing::info!(
        owner = %registry_config.owner,
        restored_epochs = epochs.len(),
        "registry configured"
    );

    // The transparent mock is the only in-tree membership verifier.
    tracing::warn!("membership proofs are checked by the transparent mock verifier");
    let registry = Registry::restore(
        registry_config,
        Arc::new(SystemClock),
        Arc::new(MockMembershipSystem),
        epochs,
    )
    .map_err(|e| {
        tracing::error!("registry initialization failed: {e}");
        e
    })?;

    let prometheus = PrometheusBuilder::new().install_recorder()?;
    let state = AppState::new(registry, config).with_prometheus(prometheus);
    let app = vouch_api::app(state);

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("vouch API listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if std::env::var("LOG_FORMAT").is_ok_and(|f| f == "json") {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}
