//! Application setup and initialization
//!
//! The composition root: builds storage, the broker producer, the services,
//! and the router, in that order.

pub mod broker;
pub mod routes;
pub mod server;
pub mod storage;

use crate::state::AppState;
use anyhow::{Context, Result};
use catflow_core::Config;
use std::sync::Arc;

/// Initialize the entire application
///
/// Storage failure is fatal. A producer that cannot be created is logged and
/// left out so the process still serves `/status` (reporting 500).
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    // Validate configuration first - fail fast on misconfiguration
    config
        .validate()
        .context("Configuration validation failed")?;

    crate::telemetry::init_telemetry(config.environment(), config.is_production())
        .context("Failed to initialize telemetry")?;

    tracing::info!("Configuration loaded and validated successfully");

    let storage = storage::setup_storage(&config).await?;
    let broker = broker::setup_broker(&config).await;

    let state = Arc::new(AppState::new(config.clone(), storage, broker));

    let router = routes::setup_routes(&config, state.clone())?;

    Ok((state, router))
}
