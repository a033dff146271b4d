//! Catflow API Library
//!
//! HTTP boundary of the ingest service: accepts uploads, stores them through
//! the object store gateway, and announces each stored key on the broker.

// Module declarations
mod api_doc;
mod handlers;
mod middleware;
pub mod setup;
mod telemetry;
mod utils;

// Public modules
pub mod error;
pub mod services;
pub mod state;

// Re-exports
pub use error::{ErrorResponse, HttpAppError};
pub use services::health::{HealthReporter, StatusReport};
pub use services::ingest::{IncomingFile, IngestError, IngestReceipt, IngestService};
pub use state::AppState;
