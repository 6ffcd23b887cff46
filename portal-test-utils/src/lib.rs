//! Faculty Portal Test Utilities
//!
//! Shared test infrastructure for the workspace:
//! - An in-memory [`FakeBackend`] that records every request
//! - Proptest generators for form input and records
//! - Fixtures for common profiles and lists
//! - Assertions over cache snapshots

pub use portal_core::backend::paths;
pub use portal_core::{
    PatentRecord, ProfileBackend, ProfileRecord, ProjectRecord, QuerySnapshot, RemoteError,
    RemoteResult,
};

use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

// ============================================================================
// FAKE BACKEND
// ============================================================================

/// HTTP method of a recorded request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Put,
}

/// One request seen by a [`FakeBackend`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub method: Method,
    pub path: String,
    pub body: Option<Value>,
}

#[derive(Debug, Default)]
struct FakeState {
    resources: HashMap<String, Value>,
    get_failures: HashMap<String, RemoteError>,
    put_failure: Option<RemoteError>,
    delay: Duration,
    calls: Vec<RecordedCall>,
}

/// In-memory profile backend.
///
/// Serves whatever was stored for a path. `PUT /profile/edit` merges the
/// body's top-level fields into the stored profile and answers with the
/// result, so a later `GET /profile` sees the update. Paths with nothing
/// stored answer 404.
#[derive(Debug, Clone, Default)]
pub struct FakeBackend {
    state: Arc<Mutex<FakeState>>,
}

impl FakeBackend {
    /// Create an empty backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Backend serving the A. Smith profile with a few projects and patents.
    pub fn seeded() -> Self {
        Self::new()
            .with_profile(fixtures::asmith_profile_json())
            .with_projects(fixtures::sample_projects_json())
            .with_patents(fixtures::sample_patents_json())
    }

    fn state(&self) -> MutexGuard<'_, FakeState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn with_resource(self, path: &str, value: Value) -> Self {
        self.state().resources.insert(path.to_string(), value);
        self
    }

    pub fn with_profile(self, profile: Value) -> Self {
        self.with_resource(paths::PROFILE, profile)
    }

    pub fn with_projects(self, projects: Value) -> Self {
        self.with_resource(paths::PROJECTS, projects)
    }

    pub fn with_patents(self, patents: Value) -> Self {
        self.with_resource(paths::PATENTS, patents)
    }

    /// Delay every response by `delay`.
    pub fn with_delay(self, delay: Duration) -> Self {
        self.state().delay = delay;
        self
    }

    /// Make GETs of `path` fail with `error` until [`heal`](Self::heal).
    pub fn fail_get(&self, path: &str, error: RemoteError) {
        self.state().get_failures.insert(path.to_string(), error);
    }

    /// Make every PUT fail with `error` until [`heal`](Self::heal).
    pub fn fail_put(&self, error: RemoteError) {
        self.state().put_failure = Some(error);
    }

    /// Remove every injected failure.
    pub fn heal(&self) {
        let mut state = self.state();
        state.get_failures.clear();
        state.put_failure = None;
    }

    pub fn set_resource(&self, path: &str, value: Value) {
        self.state().resources.insert(path.to_string(), value);
    }

    pub fn resource(&self, path: &str) -> Option<Value> {
        self.state().resources.get(path).cloned()
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.state().calls.clone()
    }

    pub fn get_count(&self, path: &str) -> usize {
        self.count(Method::Get, path)
    }

    pub fn put_count(&self) -> usize {
        self.state()
            .calls
            .iter()
            .filter(|call| call.method == Method::Put)
            .count()
    }

    pub fn last_put_body(&self) -> Option<Value> {
        self.state()
            .calls
            .iter()
            .rev()
            .find(|call| call.method == Method::Put)
            .and_then(|call| call.body.clone())
    }

    fn count(&self, method: Method, path: &str) -> usize {
        self.state()
            .calls
            .iter()
            .filter(|call| call.method == method && call.path == path)
            .count()
    }

    fn record(&self, method: Method, path: &str, body: Option<Value>) -> Duration {
        let mut state = self.state();
        state.calls.push(RecordedCall {
            method,
            path: path.to_string(),
            body,
        });
        state.delay
    }
}

#[async_trait]
impl ProfileBackend for FakeBackend {
    async fn get_json(&self, path: &str) -> RemoteResult<Value> {
        let delay = self.record(Method::Get, path, None);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        let state = self.state();
        if let Some(err) = state.get_failures.get(path) {
            return Err(err.clone());
        }
        state
            .resources
            .get(path)
            .cloned()
            .ok_or_else(|| RemoteError::http(404, format!("No route for {}", path)))
    }

    async fn put_json(&self, path: &str, body: &Value) -> RemoteResult<Value> {
        let delay = self.record(Method::Put, path, Some(body.clone()));
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        let mut state = self.state();
        if let Some(err) = &state.put_failure {
            return Err(err.clone());
        }
        if path != paths::PROFILE_EDIT {
            return Err(RemoteError::http(404, format!("No route for {}", path)));
        }

        let profile = state
            .resources
            .entry(paths::PROFILE.to_string())
            .or_insert_with(|| json!({}));
        if let (Some(stored), Some(update)) = (profile.as_object_mut(), body.as_object()) {
            for (field, value) in update {
                stored.insert(field.clone(), value.clone());
            }
        }
        Ok(profile.clone())
    }
}

// ============================================================================
// PROPTEST GENERATORS
// ============================================================================

pub mod generators {
    //! Proptest strategies for form input and backend records.

    use super::*;
    use proptest::prelude::*;

    /// An absolute http(s) URL.
    pub fn arb_url() -> impl Strategy<Value = String> {
        (
            prop::sample::select(vec!["http", "https"]),
            "[a-z]{1,12}(\\.[a-z]{2,8}){1,2}",
            "(/[a-zA-Z0-9_-]{1,10}){0,3}",
        )
            .prop_map(|(scheme, host, path)| format!("{}://{}{}", scheme, host, path))
    }

    /// Non-empty text that never parses as an absolute URL.
    pub fn arb_non_url() -> impl Strategy<Value = String> {
        "[a-zA-Z0-9 ._/-]{1,40}"
    }

    /// Value for a URL field: empty or a valid URL.
    pub fn arb_url_field() -> impl Strategy<Value = String> {
        prop_oneof![Just(String::new()), arb_url()]
    }

    /// Generate a ProjectRecord.
    pub fn arb_project() -> impl Strategy<Value = ProjectRecord> {
        (
            "[a-f0-9]{24}",
            "[A-Za-z][A-Za-z ]{0,40}",
            prop::option::of("[A-Za-z ,.]{0,120}"),
        )
            .prop_map(|(id, title, description)| ProjectRecord {
                id,
                title,
                description,
            })
    }

    /// Generate a list of projects of up to `max` entries.
    pub fn arb_projects(max: usize) -> impl Strategy<Value = Vec<ProjectRecord>> {
        prop::collection::vec(arb_project(), 0..=max)
    }
}

// ============================================================================
// TEST FIXTURES
// ============================================================================

pub mod fixtures {
    //! Pre-built records for common scenarios.

    use super::*;

    /// Profile with every link unset.
    pub fn asmith_profile_json() -> Value {
        json!({
            "name": "A. Smith",
            "designation": "Associate Professor",
            "description": "Works on distributed systems and compilers.",
            "department": "Computer Science",
            "linkedin": "",
            "orchidID": "",
            "scopusID": "",
            "googleScholar": "",
            "researchInterests": ["Distributed systems", "Compilers"],
            "courses": ["CS101 Introduction to Programming", "CS431 Compilers"]
        })
    }

    pub fn asmith_profile() -> ProfileRecord {
        serde_json::from_value(asmith_profile_json()).unwrap_or_default()
    }

    pub fn sample_projects_json() -> Value {
        json!([
            {
                "_id": "p1",
                "title": "Campus energy monitoring",
                "description": "Sensor network for building energy use."
            },
            { "_id": "p2", "title": "Verified parser generator" },
            {
                "_id": "p3",
                "title": "Edge caching for lecture video",
                "description": "CDN experiments across three campuses."
            }
        ])
    }

    pub fn sample_patents_json() -> Value {
        json!([
            {
                "_id": "pt1",
                "title": "Low-power mesh routing",
                "description": "Routing protocol for battery-operated sensors."
            }
        ])
    }
}

// ============================================================================
// CUSTOM ASSERTIONS
// ============================================================================

pub mod assertions {
    //! Assertions over cache snapshots.

    use super::*;

    /// Assert that a snapshot finished loading with data and no error.
    #[track_caller]
    pub fn assert_loaded(snapshot: &QuerySnapshot) {
        assert!(
            !snapshot.is_loading && snapshot.is_success(),
            "Expected a loaded snapshot, got: {:?}",
            snapshot
        );
    }

    /// Assert that a snapshot carries an HTTP error with `status`.
    #[track_caller]
    pub fn assert_http_error(snapshot: &QuerySnapshot, status: u16) {
        match &snapshot.error {
            Some(err) if err.status_code() == Some(status) => {}
            other => panic!("Expected HTTP {} error, got: {:?}", status, other),
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[tokio::test]
    async fn test_fake_serves_seeded_profile() {
        let backend = FakeBackend::seeded();
        let profile = backend.get_json(paths::PROFILE).await.unwrap();
        assert_eq!(profile["name"], "A. Smith");
        assert_eq!(backend.get_count(paths::PROFILE), 1);
    }

    #[tokio::test]
    async fn test_fake_unknown_path_is_404() {
        let backend = FakeBackend::new();
        let err = backend.get_json(paths::PROJECTS).await.unwrap_err();
        assert_eq!(err.status_code(), Some(404));
    }

    #[tokio::test]
    async fn test_fake_put_merges_into_profile() {
        let backend = FakeBackend::seeded();
        let updated = backend
            .put_json(
                paths::PROFILE_EDIT,
                &json!({ "linkedin": "https://linkedin.com/in/asmith" }),
            )
            .await
            .unwrap();

        assert_eq!(updated["linkedin"], "https://linkedin.com/in/asmith");
        assert_eq!(updated["name"], "A. Smith");
        assert_eq!(backend.put_count(), 1);
        let profile = backend.get_json(paths::PROFILE).await.unwrap();
        assert_eq!(profile["linkedin"], "https://linkedin.com/in/asmith");
    }

    #[tokio::test]
    async fn test_fake_injected_failures() {
        let backend = FakeBackend::seeded();
        backend.fail_put(RemoteError::http(500, "boom"));
        backend.fail_get(paths::PATENTS, RemoteError::network("down"));

        assert!(backend.put_json(paths::PROFILE_EDIT, &json!({})).await.is_err());
        assert!(backend.get_json(paths::PATENTS).await.is_err());

        backend.heal();
        assert!(backend.get_json(paths::PATENTS).await.is_ok());
        assert_eq!(backend.resource(paths::PROFILE).unwrap()["linkedin"], "");
    }

    #[test]
    fn test_fixture_profile_has_empty_links() {
        let profile = fixtures::asmith_profile();
        assert_eq!(profile.name, "A. Smith");
        assert_eq!(profile.linkedin.as_deref(), Some(""));
        assert_eq!(profile.courses.len(), 2);
    }

    proptest! {
        #[test]
        fn generated_urls_have_scheme(url in generators::arb_url()) {
            prop_assert!(url.starts_with("http://") || url.starts_with("https://"));
        }

        #[test]
        fn generated_non_urls_have_no_scheme(text in generators::arb_non_url()) {
            prop_assert!(!text.contains(':'));
        }
    }
}
