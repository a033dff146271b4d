//! Announcement payloads published after a successful upload.
//!
//! Two wire formats exist. `Plain` is the storage key as UTF-8 text. `Json`
//! is a JSON array holding one [`AnnouncementRecord`]; consumers must ignore
//! record fields they do not know so the record can grow.

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::AppError;

/// One uploaded object, as seen by downstream consumers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnouncementRecord {
    /// Storage key the object was written under
    pub key: String,
}

impl AnnouncementRecord {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }
}

/// Encoding used for announcement message bodies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnnouncementFormat {
    Plain,
    #[default]
    Json,
}

impl AnnouncementFormat {
    /// Encode the announcement for a single stored object.
    pub fn encode(&self, record: &AnnouncementRecord) -> Result<Vec<u8>, AppError> {
        match self {
            AnnouncementFormat::Plain => Ok(record.key.as_bytes().to_vec()),
            AnnouncementFormat::Json => Ok(serde_json::to_vec(std::slice::from_ref(record))?),
        }
    }

    /// Decode a message body back into records.
    pub fn decode(&self, payload: &[u8]) -> Result<Vec<AnnouncementRecord>, AppError> {
        match self {
            AnnouncementFormat::Plain => {
                let key = std::str::from_utf8(payload).map_err(|e| {
                    AppError::InvalidInput(format!("Announcement is not valid UTF-8: {}", e))
                })?;
                Ok(vec![AnnouncementRecord::new(key)])
            }
            AnnouncementFormat::Json => Ok(serde_json::from_slice(payload)?),
        }
    }
}

impl FromStr for AnnouncementFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "plain" => Ok(AnnouncementFormat::Plain),
            "json" => Ok(AnnouncementFormat::Json),
            _ => Err(anyhow::anyhow!("Invalid announcement format: {}", s)),
        }
    }
}

impl Display for AnnouncementFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            AnnouncementFormat::Plain => write!(f, "plain"),
            AnnouncementFormat::Json => write!(f, "json"),
        }
    }
}
