//! Point-in-time views of a cache entry.

use super::key::QueryKey;
use crate::error::RemoteError;
use crate::Timestamp;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// State of one cache entry as seen by a reader or subscriber.
#[derive(Debug, Clone, PartialEq)]
pub struct QuerySnapshot {
    pub key: QueryKey,
    /// Last successfully loaded value. Survives later failures.
    pub data: Option<Value>,
    pub is_loading: bool,
    /// Set by invalidation, cleared by the next successful load.
    pub is_stale: bool,
    /// Outcome of the most recent failed load, cleared on success.
    pub error: Option<RemoteError>,
    pub updated_at: Option<Timestamp>,
    /// Number of loader invocations so far.
    pub fetch_count: u64,
    /// Number of times the key has been invalidated.
    pub invalidation_count: u64,
}

impl QuerySnapshot {
    pub(crate) fn empty(key: QueryKey) -> Self {
        Self {
            key,
            data: None,
            is_loading: false,
            is_stale: false,
            error: None,
            updated_at: None,
            fetch_count: 0,
            invalidation_count: 0,
        }
    }

    /// Deserialize the cached value, if any.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<Option<T>, serde_json::Error> {
        self.data
            .as_ref()
            .map(|value| serde_json::from_value(value.clone()))
            .transpose()
    }

    pub fn is_success(&self) -> bool {
        self.data.is_some() && self.error.is_none()
    }
}

/// Change notification delivered to subscribers.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryUpdate {
    pub key: QueryKey,
    pub snapshot: QuerySnapshot,
}
