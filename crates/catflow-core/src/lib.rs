//! Catflow Core Library
//!
//! This crate provides the configuration, error types, and shared domain types
//! used by every Catflow ingest component.

pub mod config;
pub mod error;
pub mod models;
pub mod storage_types;

// Re-export commonly used types
pub use config::{BaseConfig, Config, IngestConfig};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use models::{AnnouncementFormat, AnnouncementRecord, ExchangeKind};
pub use storage_types::StorageBackend;
