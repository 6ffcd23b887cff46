//! Keyed query cache with request de-duplication and change subscriptions.
//!
//! A [`QueryCache`] maps a [`QueryKey`] to the last known outcome of loading
//! that resource. Readers go through [`QueryCache::fetch`], which serves a
//! fresh value from memory, joins a load already in flight for the same key,
//! or starts a new one. Components that render a key register a
//! [`Subscription`] and receive a [`QueryUpdate`] on every state change.
//!
//! # Example
//!
//! ```ignore
//! let cache = QueryCache::new(CacheConfig::default());
//! let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
//! let _sub = cache.subscribe(&QueryKey::from(["user-profile"]), tx);
//!
//! let snapshot = cache
//!     .fetch(&QueryKey::from(["user-profile"]), move || {
//!         let backend = backend.clone();
//!         async move { backend.get_json("/profile").await }
//!     })
//!     .await;
//!
//! // After a successful edit:
//! cache.invalidate(&QueryKey::from(["user-profile"]));
//! ```

pub mod cache;
pub mod key;
pub mod resource;
pub mod snapshot;

pub use cache::{CacheConfig, Loader, MutationGuard, QueryCache, Subscription};
pub use key::QueryKey;
pub use resource::ResourceState;
pub use snapshot::{QuerySnapshot, QueryUpdate};
