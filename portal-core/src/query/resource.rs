//! Typed per-resource state derived from cache snapshots.

use super::snapshot::QuerySnapshot;
use serde::de::DeserializeOwned;

/// What a component knows about one resource it renders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceState<T> {
    Loading,
    Ready(T),
    Failed(String),
}

impl<T> Default for ResourceState<T> {
    fn default() -> Self {
        Self::Loading
    }
}

impl<T: DeserializeOwned> ResourceState<T> {
    /// Interpret a snapshot.
    ///
    /// A value that is present wins over a concurrent reload or a later
    /// failure, so a refetch never blanks out what is already on screen.
    pub fn from_snapshot(snapshot: &QuerySnapshot) -> Self {
        match snapshot.decode::<T>() {
            Ok(Some(value)) => Self::Ready(value),
            Ok(None) => match &snapshot.error {
                Some(err) if !snapshot.is_loading => Self::Failed(err.to_string()),
                _ => Self::Loading,
            },
            Err(err) => Self::Failed(format!("Unexpected response: {}", err)),
        }
    }
}

impl<T> ResourceState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            Self::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn map<U>(&self, f: impl FnOnce(&T) -> U) -> ResourceState<U> {
        match self {
            Self::Loading => ResourceState::Loading,
            Self::Ready(value) => ResourceState::Ready(f(value)),
            Self::Failed(message) => ResourceState::Failed(message.clone()),
        }
    }
}
