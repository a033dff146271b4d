//! Ingestion coordinator
//!
//! Upload first, announce second: the object is stored under a fresh
//! [`StorageKey`], then one announcement is published per routing key. No
//! announcement is ever sent for an object that was not stored.

use bytes::Bytes;
use catflow_broker::{BrokerError, Publisher};
use catflow_core::{AnnouncementFormat, AnnouncementRecord, AppError};
use catflow_storage::{Storage, StorageError, StorageKey};
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// No usable broker connection; checked before anything is stored
    #[error("Broker connectivity error: {0}")]
    Connectivity(String),

    /// Stored, but the announcement under `routing_key` was not published.
    /// The object stays in storage.
    #[error("Stored object {key} but failed to announce it on routing key '{routing_key}': {source}")]
    PartialAnnouncement {
        key: String,
        routing_key: String,
        #[source]
        source: BrokerError,
    },

    #[error("Failed to encode announcement: {0}")]
    Encode(String),
}

impl From<IngestError> for AppError {
    fn from(err: IngestError) -> Self {
        match err {
            IngestError::Storage(e) => AppError::Storage(e.to_string()),
            IngestError::Connectivity(message) => AppError::Connectivity(message),
            IngestError::PartialAnnouncement {
                key,
                routing_key,
                source,
            } => AppError::PartialAnnouncement {
                key,
                routing_key,
                message: source.to_string(),
            },
            IngestError::Encode(message) => AppError::Internal(message),
        }
    }
}

/// A file as received at the boundary.
#[derive(Debug, Clone)]
pub struct IncomingFile {
    pub filename: String,
    pub content_type: String,
    pub data: Bytes,
}

/// Outcome of a fully successful ingestion.
#[derive(Debug, Clone)]
pub struct IngestReceipt {
    pub key: StorageKey,
    /// Number of messages published for this object
    pub announcements: usize,
}

#[derive(Clone)]
pub struct IngestService {
    storage: Arc<dyn Storage>,
    publisher: Option<Arc<dyn Publisher>>,
    routing_keys: Vec<String>,
    format: AnnouncementFormat,
}

impl IngestService {
    pub fn new(
        storage: Arc<dyn Storage>,
        publisher: Option<Arc<dyn Publisher>>,
        routing_keys: Vec<String>,
        format: AnnouncementFormat,
    ) -> Self {
        Self {
            storage,
            publisher,
            routing_keys,
            format,
        }
    }

    /// Routing keys one ingestion publishes under. With none configured a
    /// single publish with the empty key is made, which fanout exchanges and
    /// externally bound queues still receive.
    pub fn routing_keys(&self) -> Vec<&str> {
        if self.routing_keys.is_empty() {
            vec![""]
        } else {
            self.routing_keys.iter().map(String::as_str).collect()
        }
    }

    fn connected_publisher(&self) -> Result<&Arc<dyn Publisher>, IngestError> {
        let publisher = self.publisher.as_ref().ok_or_else(|| {
            IngestError::Connectivity("RabbitMQ producer is not available".to_string())
        })?;

        if !publisher.is_connected() {
            return Err(IngestError::Connectivity(format!(
                "RabbitMQ connection is {}",
                publisher.state()
            )));
        }

        Ok(publisher)
    }

    /// Store `file` and announce it on every routing key.
    ///
    /// Stops at the first failed publish; publishes already made are not
    /// retracted.
    #[tracing::instrument(
        skip(self, file),
        fields(filename = %file.filename, size_bytes = file.data.len())
    )]
    pub async fn ingest(&self, file: IncomingFile) -> Result<IngestReceipt, IngestError> {
        let publisher = self.connected_publisher()?;

        let key = StorageKey::generate(&file.filename);
        let key_str = key.to_string();

        // Encoded once; every routing key gets identical bytes
        let payload = self
            .format
            .encode(&AnnouncementRecord::new(key_str.as_str()))
            .map_err(|e| IngestError::Encode(e.to_string()))?;

        self.storage
            .upload(&key_str, &file.content_type, file.data)
            .await?;

        let mut announcements = 0;
        for routing_key in self.routing_keys() {
            publisher
                .publish(routing_key, &payload)
                .await
                .map_err(|source| {
                    tracing::error!(
                        key = %key_str,
                        exchange = %publisher.exchange(),
                        routing_key = %routing_key,
                        error = %source,
                        "Announcement failed after upload"
                    );
                    IngestError::PartialAnnouncement {
                        key: key_str.clone(),
                        routing_key: routing_key.to_string(),
                        source,
                    }
                })?;
            announcements += 1;
        }

        tracing::info!(
            key = %key_str,
            exchange = %publisher.exchange(),
            announcements,
            payload_bytes = payload.len(),
            "File ingested"
        );

        Ok(IngestReceipt { key, announcements })
    }
}
