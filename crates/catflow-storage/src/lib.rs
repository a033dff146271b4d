//! Catflow Storage Library
//!
//! This crate provides the object store gateway used by the ingest service:
//! the [`Storage`] trait with S3 and local filesystem implementations, and the
//! [`StorageKey`] type every uploaded object is stored under.
//!
//! # Storage key format
//!
//! Keys are flat, bucket-relative names of the form `{uuid}.{extension}`, where
//! the extension is copied from the uploaded filename. See the `keys` module.

pub mod factory;
pub mod keys;
#[cfg(feature = "storage-local")]
pub mod local;
#[cfg(feature = "storage-s3")]
pub mod s3;
pub mod traits;

// Re-export commonly used types
pub use catflow_core::StorageBackend;
pub use factory::create_storage;
pub use keys::{extension_of, StorageKey};
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
#[cfg(feature = "storage-s3")]
pub use s3::{S3Settings, S3Storage};
pub use traits::{Storage, StorageError, StorageResult};
