//! Draft record types
//!
//! A [`Draft`] is the persisted snapshot of a user's in-progress form state
//! plus its version and save time. The payload is an opaque JSON object that
//! round-trips exactly through save and restore.

use crate::error::StoreError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Opaque structured draft payload
///
/// Always a JSON object. Constructing one from any other JSON shape is an
/// [`StoreError::InvalidInput`], both in code and during deserialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Value", into = "Value")]
pub struct DraftData(Map<String, Value>);

impl DraftData {
    /// Create an empty payload
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Borrow the underlying object
    #[inline]
    #[must_use]
    pub fn as_object(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Look up a field by key
    #[inline]
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Number of top-level fields
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the payload has no fields
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for DraftData {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Map<String, Value>> for DraftData {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl TryFrom<Value> for DraftData {
    type Error = StoreError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            _ => Err(StoreError::InvalidInput(
                "data must be an object".to_string(),
            )),
        }
    }
}

impl From<DraftData> for Value {
    fn from(data: DraftData) -> Self {
        Value::Object(data.0)
    }
}

/// Persisted draft record: one per user identity
///
/// # Invariants
/// - `version` starts at 1 and increases by exactly one on every committed
///   write for the same identity, until the record is deleted
/// - `saved_at` is the commit time of the last successful write
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Draft {
    /// In-progress form state, exactly as the client submitted it
    pub data: DraftData,
    /// Commit time of the last successful write
    pub saved_at: DateTime<Utc>,
    /// Count of successful writes since the record was last created
    pub version: u64,
}

impl Draft {
    /// Build the record a commit produces, given the previous version
    #[inline]
    #[must_use]
    pub(crate) fn commit(data: DraftData, prev_version: Option<u64>) -> Self {
        Self {
            data,
            saved_at: Utc::now(),
            version: prev_version.map_or(1, |v| v + 1),
        }
    }
}
