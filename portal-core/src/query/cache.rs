//! Query cache with at-most-one load in flight per key.
//!
//! Entry state lives behind a `std::sync::Mutex` that is only ever held for
//! short synchronous sections, never across an `.await`. Loads run as shared
//! futures: the first reader of a stale key starts one, later readers await a
//! clone of the same future, and the future itself writes the outcome back
//! into the entry when it resolves.

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::{Duration, Instant};

use chrono::Utc;
use futures_util::future::{BoxFuture, FutureExt, Shared};
use serde_json::Value;
use tokio::runtime::Handle;
use tokio::sync::{mpsc, OwnedMutexGuard};
use tracing::{debug, warn};

use super::key::QueryKey;
use super::snapshot::{QuerySnapshot, QueryUpdate};
use crate::error::{RemoteError, RemoteResult};
use crate::Timestamp;

/// Produces the value for a key. Kept by the cache so invalidation can
/// reload the key without the original caller being involved.
pub type Loader = Arc<dyn Fn() -> BoxFuture<'static, RemoteResult<Value>> + Send + Sync>;

type InFlight = Shared<BoxFuture<'static, QuerySnapshot>>;

/// Configuration for the query cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// How long a successfully loaded value is served without reloading.
    pub stale_time: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            stale_time: Duration::from_secs(30),
        }
    }
}

impl CacheConfig {
    /// Create a new cache config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the stale time.
    pub fn with_stale_time(mut self, stale_time: Duration) -> Self {
        self.stale_time = stale_time;
        self
    }
}

#[derive(Default)]
struct Entry {
    data: Option<Value>,
    error: Option<RemoteError>,
    is_loading: bool,
    is_stale: bool,
    updated_at: Option<Timestamp>,
    loaded_at: Option<Instant>,
    fetch_count: u64,
    invalidation_count: u64,
    /// Invalidated while a load was in flight; reload once it lands.
    refetch_pending: bool,
    loader: Option<Loader>,
    in_flight: Option<InFlight>,
    subscribers: Vec<(u64, mpsc::UnboundedSender<QueryUpdate>)>,
    mutation: Arc<tokio::sync::Mutex<()>>,
}

impl Entry {
    fn snapshot(&self, key: &QueryKey) -> QuerySnapshot {
        QuerySnapshot {
            key: key.clone(),
            data: self.data.clone(),
            is_loading: self.is_loading,
            is_stale: self.is_stale,
            error: self.error.clone(),
            updated_at: self.updated_at,
            fetch_count: self.fetch_count,
            invalidation_count: self.invalidation_count,
        }
    }

    fn is_fresh(&self, stale_time: Duration) -> bool {
        if self.data.is_none() || self.is_stale {
            return false;
        }
        self.loaded_at
            .map(|loaded_at| loaded_at.elapsed() < stale_time)
            .unwrap_or(false)
    }

    fn notify(&mut self, key: &QueryKey) {
        if self.subscribers.is_empty() {
            return;
        }
        let snapshot = self.snapshot(key);
        self.subscribers.retain(|(_, sender)| {
            sender
                .send(QueryUpdate {
                    key: key.clone(),
                    snapshot: snapshot.clone(),
                })
                .is_ok()
        });
    }

    fn active_subscribers(&mut self) -> usize {
        self.subscribers.retain(|(_, sender)| !sender.is_closed());
        self.subscribers.len()
    }
}

struct Inner {
    config: CacheConfig,
    entries: Mutex<HashMap<QueryKey, Entry>>,
    next_subscriber_id: AtomicU64,
}

impl Inner {
    fn entries(&self) -> MutexGuard<'_, HashMap<QueryKey, Entry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Process-wide query cache, shared by cloning.
///
/// Created once at startup and handed to every component that reads through
/// it; clones share the same entries.
#[derive(Clone)]
pub struct QueryCache {
    inner: Arc<Inner>,
}

impl fmt::Debug for QueryCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryCache")
            .field("config", &self.inner.config)
            .field("entries", &self.inner.entries().len())
            .finish()
    }
}

impl Default for QueryCache {
    fn default() -> Self {
        Self::new(CacheConfig::default())
    }
}

impl QueryCache {
    pub fn new(config: CacheConfig) -> Self {
        Self {
            inner: Arc::new(Inner {
                config,
                entries: Mutex::new(HashMap::new()),
                next_subscriber_id: AtomicU64::new(1),
            }),
        }
    }

    pub fn config(&self) -> &CacheConfig {
        &self.inner.config
    }

    /// Read `key`, loading it with `loader` if needed.
    ///
    /// A fresh value is returned without calling `loader`. If a load for the
    /// key is already running, this waits for that load instead of starting
    /// another. Load failures are recorded in the returned snapshot's
    /// `error`; the previous `data` is kept.
    pub async fn fetch<F, Fut>(&self, key: &QueryKey, loader: F) -> QuerySnapshot
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = RemoteResult<Value>> + Send + 'static,
    {
        self.fetch_with(key, Arc::new(move || loader().boxed()))
            .await
    }

    /// [`fetch`](Self::fetch) with an already boxed loader.
    pub async fn fetch_with(&self, key: &QueryKey, loader: Loader) -> QuerySnapshot {
        let in_flight = {
            let mut entries = self.inner.entries();
            let entry = entries.entry(key.clone()).or_default();
            if entry.is_fresh(self.inner.config.stale_time) {
                debug!(%key, "query cache hit");
                return entry.snapshot(key);
            }
            entry.loader = Some(Arc::clone(&loader));
            if let Some(in_flight) = entry.in_flight.clone() {
                debug!(%key, "joining in-flight query");
                in_flight
            } else {
                self.start_load(key, entry, loader)
            }
        };
        in_flight.await
    }

    /// Current state of `key` without loading anything.
    pub fn peek(&self, key: &QueryKey) -> Option<QuerySnapshot> {
        self.inner
            .entries()
            .get(key)
            .map(|entry| entry.snapshot(key))
    }

    /// Mark `key` stale and reload it in the background for its subscribers.
    ///
    /// Returns immediately with the number of active subscribers. Without
    /// subscribers nothing is reloaded now; the next `fetch` does it. A key
    /// invalidated while a load is running is reloaded again once that load
    /// finishes, so the older response never counts as fresh.
    pub fn invalidate(&self, key: &QueryKey) -> usize {
        let mut entries = self.inner.entries();
        let Some(entry) = entries.get_mut(key) else {
            debug!(%key, "invalidate on unknown key ignored");
            return 0;
        };
        entry.is_stale = true;
        entry.invalidation_count += 1;
        let observers = entry.active_subscribers();
        debug!(%key, observers, "query invalidated");

        if entry.in_flight.is_some() {
            entry.refetch_pending = true;
            entry.notify(key);
            return observers;
        }
        if !self.refetch_if_observed(key, entry) {
            entry.notify(key);
        }
        observers
    }

    /// Invalidate every known key. Returns the total number of subscribers
    /// that will see a reload.
    pub fn invalidate_all(&self) -> usize {
        let keys: Vec<QueryKey> = self.inner.entries().keys().cloned().collect();
        keys.iter().map(|key| self.invalidate(key)).sum()
    }

    /// Register `sender` for change notifications on `key`.
    ///
    /// If the key already has a value, an error or a load in progress, the
    /// current snapshot is sent right away so the subscriber does not depend
    /// on the next change to learn about it.
    pub fn subscribe(
        &self,
        key: &QueryKey,
        sender: mpsc::UnboundedSender<QueryUpdate>,
    ) -> Subscription {
        let id = self.inner.next_subscriber_id.fetch_add(1, Ordering::Relaxed);
        let mut entries = self.inner.entries();
        let entry = entries.entry(key.clone()).or_default();
        if entry.data.is_some() || entry.error.is_some() || entry.is_loading {
            let _ = sender.send(QueryUpdate {
                key: key.clone(),
                snapshot: entry.snapshot(key),
            });
        }
        entry.subscribers.push((id, sender));
        Subscription {
            key: key.clone(),
            id,
            cache: Arc::downgrade(&self.inner),
        }
    }

    /// Subscribe with a fresh channel.
    pub fn subscribe_channel(
        &self,
        key: &QueryKey,
    ) -> (Subscription, mpsc::UnboundedReceiver<QueryUpdate>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (self.subscribe(key, sender), receiver)
    }

    pub fn subscriber_count(&self, key: &QueryKey) -> usize {
        self.inner
            .entries()
            .get_mut(key)
            .map(Entry::active_subscribers)
            .unwrap_or(0)
    }

    /// Serialize write sequences against `key`.
    ///
    /// Hold the guard across "send the update, then invalidate" so two
    /// submits for the same resource never interleave.
    pub async fn lock_mutation(&self, key: &QueryKey) -> MutationGuard {
        let mutex = {
            let mut entries = self.inner.entries();
            Arc::clone(&entries.entry(key.clone()).or_default().mutation)
        };
        let guard = mutex.lock_owned().await;
        MutationGuard {
            key: key.clone(),
            _guard: guard,
        }
    }

    /// Drop every entry. Outstanding subscriptions stop receiving updates.
    pub fn clear(&self) {
        let mut entries = self.inner.entries();
        debug!(entries = entries.len(), "query cache cleared");
        entries.clear();
    }

    fn start_load(&self, key: &QueryKey, entry: &mut Entry, loader: Loader) -> InFlight {
        entry.is_loading = true;
        entry.fetch_count += 1;
        debug!(%key, fetch_count = entry.fetch_count, "query load started");

        let cache = Arc::downgrade(&self.inner);
        let owned_key = key.clone();
        let in_flight = async move {
            let result = loader().await;
            match cache.upgrade() {
                Some(inner) => QueryCache { inner }.finish_load(&owned_key, result),
                None => detached_snapshot(owned_key, result),
            }
        }
        .boxed()
        .shared();

        entry.in_flight = Some(in_flight.clone());
        entry.notify(key);
        in_flight
    }

    fn finish_load(&self, key: &QueryKey, result: RemoteResult<Value>) -> QuerySnapshot {
        let mut entries = self.inner.entries();
        let entry = entries.entry(key.clone()).or_default();
        match result {
            Ok(value) => {
                entry.data = Some(value);
                entry.error = None;
                entry.updated_at = Some(Utc::now());
                entry.loaded_at = Some(Instant::now());
                entry.is_stale = entry.refetch_pending;
            }
            Err(err) => {
                warn!(%key, error = %err, "query load failed");
                entry.error = Some(err);
            }
        }
        entry.is_loading = false;
        entry.in_flight = None;
        entry.notify(key);

        let snapshot = entry.snapshot(key);
        if std::mem::take(&mut entry.refetch_pending) {
            self.refetch_if_observed(key, entry);
        }
        snapshot
    }

    /// Start a background reload if anyone is watching. Returns whether a
    /// reload was started.
    fn refetch_if_observed(&self, key: &QueryKey, entry: &mut Entry) -> bool {
        if entry.active_subscribers() == 0 {
            return false;
        }
        let Some(loader) = entry.loader.clone() else {
            return false;
        };
        let in_flight = self.start_load(key, entry, loader);
        match Handle::try_current() {
            Ok(handle) => {
                handle.spawn(async move {
                    in_flight.await;
                });
            }
            // The shared load is driven by whoever fetches the key next.
            Err(_) => debug!(%key, "no runtime for background reload"),
        }
        true
    }
}

fn detached_snapshot(key: QueryKey, result: RemoteResult<Value>) -> QuerySnapshot {
    let mut snapshot = QuerySnapshot::empty(key);
    match result {
        Ok(value) => snapshot.data = Some(value),
        Err(err) => snapshot.error = Some(err),
    }
    snapshot
}

/// Registration for change notifications on one key.
///
/// Dropping it (or calling [`unsubscribe`](Self::unsubscribe)) removes the
/// registration before returning; no update is delivered afterwards.
#[derive(Debug)]
pub struct Subscription {
    key: QueryKey,
    id: u64,
    cache: Weak<Inner>,
}

impl Subscription {
    pub fn key(&self) -> &QueryKey {
        &self.key
    }

    pub fn unsubscribe(self) {}
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(inner) = self.cache.upgrade() {
            if let Some(entry) = inner.entries().get_mut(&self.key) {
                entry.subscribers.retain(|(id, _)| *id != self.id);
            }
        }
    }
}

/// Exclusive right to mutate one key; released on drop.
#[derive(Debug)]
pub struct MutationGuard {
    key: QueryKey,
    _guard: OwnedMutexGuard<()>,
}

impl MutationGuard {
    pub fn key(&self) -> &QueryKey {
        &self.key
    }
}
