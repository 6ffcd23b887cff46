//! The seam between the profile workflow and whatever serves the data.

use crate::error::RemoteResult;
use async_trait::async_trait;
use serde_json::Value;

/// Endpoint paths, relative to the backend base URL.
pub mod paths {
    pub const PROFILE: &str = "/profile";
    pub const PROFILE_EDIT: &str = "/profile/edit";
    pub const PROJECTS: &str = "/project/list";
    pub const PATENTS: &str = "/patent/list";
}

/// JSON-over-HTTP access to the profile backend.
///
/// Paths are relative to the backend's base URL (`/profile`,
/// `/project/list`, ...). Credentials are the implementor's business.
/// Failures come back as [`RemoteError`](crate::RemoteError) and are never
/// retried at this layer.
#[async_trait]
pub trait ProfileBackend: Send + Sync + 'static {
    /// Issue a GET and return the parsed body.
    async fn get_json(&self, path: &str) -> RemoteResult<Value>;

    /// Issue a PUT with a JSON body and return the parsed response body.
    async fn put_json(&self, path: &str, body: &Value) -> RemoteResult<Value>;
}
