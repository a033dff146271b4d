//! Storage setup and initialization

use anyhow::{Context, Result};
use catflow_core::Config;
use catflow_storage::{create_storage, Storage};
use std::sync::Arc;

pub async fn setup_storage(config: &Config) -> Result<Arc<dyn Storage>> {
    tracing::info!(backend = %config.storage_backend(), "Initializing storage...");

    let storage = create_storage(config)
        .await
        .context("Failed to initialize storage backend")?;

    tracing::info!(
        backend = %storage.backend_type(),
        bucket = config.s3_bucket().unwrap_or("-"),
        "Storage initialized successfully"
    );

    Ok(storage)
}
