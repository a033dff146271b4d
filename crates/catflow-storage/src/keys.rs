//! Storage key generation.
//!
//! Key format: `{uuid}.{extension}`. The extension is everything after the
//! last `.` of the original filename; a filename with no `.` gets an empty
//! extension and the key keeps its trailing separator (`{uuid}.`), so a key
//! always splits into exactly one id and one extension.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::StorageError;

/// Extension of `filename`: the substring after the final `.`, or `""`.
pub fn extension_of(filename: &str) -> &str {
    match filename.rfind('.') {
        Some(idx) => &filename[idx + 1..],
        None => "",
    }
}

/// Identifier an uploaded object is stored and announced under.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct StorageKey {
    id: Uuid,
    extension: String,
}

impl StorageKey {
    /// Issue a fresh key that keeps the extension of `original_filename`.
    pub fn generate(original_filename: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            extension: extension_of(original_filename).to_string(),
        }
    }

    /// Parse a key previously rendered with [`StorageKey::to_string`].
    pub fn parse(raw: &str) -> Result<Self, StorageError> {
        let (id, extension) = raw.rsplit_once('.').ok_or_else(|| {
            StorageError::InvalidKey(format!("'{}' has no extension separator", raw))
        })?;
        let id = Uuid::parse_str(id)
            .map_err(|e| StorageError::InvalidKey(format!("'{}': {}", raw, e)))?;
        Ok(Self {
            id,
            extension: extension.to_string(),
        })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }
}

impl fmt::Display for StorageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.id, self.extension)
    }
}

impl FromStr for StorageKey {
    type Err = StorageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for StorageKey {
    type Error = StorageError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<StorageKey> for String {
    fn from(key: StorageKey) -> Self {
        key.to_string()
    }
}
