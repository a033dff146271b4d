//! Application services: ingestion and health reporting.

pub mod health;
pub mod ingest;
