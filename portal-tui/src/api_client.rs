//! REST client for the profile backend.

use crate::config::{AuthConfig, TuiConfig};
use async_trait::async_trait;
use portal_core::backend::paths;
use portal_core::{
    EditProfileData, PatentRecord, ProfileBackend, ProfileRecord, ProjectRecord, RemoteError,
    RemoteResult, SocialProfileUpdate,
};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, COOKIE};
use reqwest::{RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

#[derive(Debug, thiserror::Error)]
pub enum ApiClientError {
    #[error("Config error: {0}")]
    Config(String),
    #[error(transparent)]
    Remote(#[from] RemoteError),
}

#[derive(Clone)]
pub struct RestClient {
    client: reqwest::Client,
    base_url: String,
    auth_header: HeaderMap,
}

impl std::fmt::Debug for RestClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl RestClient {
    pub fn new(config: &TuiConfig) -> Result<Self, ApiClientError> {
        Self::with_settings(&config.api_base_url, &config.auth, config.request_timeout())
    }

    pub fn with_settings(
        base_url: &str,
        auth: &AuthConfig,
        timeout: Duration,
    ) -> Result<Self, ApiClientError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiClientError::Config(e.to_string()))?;

        let auth_header = build_auth_headers(auth)?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            auth_header,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn get_profile(&self) -> RemoteResult<ProfileRecord> {
        decode(self.get_json(paths::PROFILE).await?)
    }

    pub async fn list_projects(&self) -> RemoteResult<Vec<ProjectRecord>> {
        decode(self.get_json(paths::PROJECTS).await?)
    }

    pub async fn list_patents(&self) -> RemoteResult<Vec<PatentRecord>> {
        decode(self.get_json(paths::PATENTS).await?)
    }

    /// Send the links form and return the profile as the server now has it.
    pub async fn update_social_profile(
        &self,
        update: &SocialProfileUpdate,
    ) -> RemoteResult<ProfileRecord> {
        let body = serde_json::to_value(EditProfileData::from(update.clone()))?;
        decode(self.put_json(paths::PROFILE_EDIT, &body).await?)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send(
        &self,
        method: &'static str,
        path: &str,
        request: RequestBuilder,
    ) -> RemoteResult<Value> {
        let response = request
            .headers(self.auth_header.clone())
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        let text = response.text().await.map_err(transport_error)?;
        debug!(method, path, status = status.as_u16(), "backend response");

        if status.is_success() {
            if text.trim().is_empty() {
                return Ok(Value::Null);
            }
            return serde_json::from_str(&text).map_err(RemoteError::from);
        }

        let message = error_message(status, &text);
        warn!(method, path, status = status.as_u16(), %message, "backend request failed");
        Err(RemoteError::http(status.as_u16(), message))
    }
}

#[async_trait]
impl ProfileBackend for RestClient {
    async fn get_json(&self, path: &str) -> RemoteResult<Value> {
        let request = self.client.get(self.url(path));
        self.send("GET", path, request).await
    }

    async fn put_json(&self, path: &str, body: &Value) -> RemoteResult<Value> {
        let request = self.client.put(self.url(path)).json(body);
        self.send("PUT", path, request).await
    }
}

fn decode<T: DeserializeOwned>(value: Value) -> RemoteResult<T> {
    Ok(serde_json::from_value(value)?)
}

fn transport_error(err: reqwest::Error) -> RemoteError {
    if err.is_decode() {
        RemoteError::Decode(err.to_string())
    } else {
        RemoteError::Network(err.to_string())
    }
}

/// Human message for a failed response: the body's `message` or `error`
/// field, else the body text, else the status reason phrase.
fn error_message(status: StatusCode, body: &str) -> String {
    if let Ok(Value::Object(fields)) = serde_json::from_str::<Value>(body) {
        for field in ["message", "error"] {
            if let Some(Value::String(message)) = fields.get(field) {
                if !message.trim().is_empty() {
                    return message.clone();
                }
            }
        }
    }
    let body = body.trim();
    if !body.is_empty() {
        return body.to_string();
    }
    status
        .canonical_reason()
        .unwrap_or("Unknown error")
        .to_string()
}

fn header_value(value: &str) -> Result<HeaderValue, ApiClientError> {
    HeaderValue::from_str(value).map_err(|e| ApiClientError::Config(e.to_string()))
}

fn build_auth_headers(auth: &AuthConfig) -> Result<HeaderMap, ApiClientError> {
    let mut headers = HeaderMap::new();
    if let Some(api_key) = &auth.api_key {
        headers.insert(HeaderName::from_static("x-api-key"), header_value(api_key)?);
    }
    if let Some(jwt) = &auth.jwt {
        headers.insert(AUTHORIZATION, header_value(&format!("Bearer {}", jwt))?);
    }
    if let Some(cookie) = &auth.session_cookie {
        headers.insert(COOKIE, header_value(cookie)?);
    }
    Ok(headers)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn auth() -> AuthConfig {
        AuthConfig {
            jwt: Some("abc".to_string()),
            api_key: Some("key".to_string()),
            session_cookie: None,
        }
    }

    #[test]
    fn test_error_message_prefers_json_message() {
        let message = error_message(
            StatusCode::BAD_REQUEST,
            r#"{"message":"Invalid LinkedIn URL","code":"E1"}"#,
        );
        assert_eq!(message, "Invalid LinkedIn URL");
        let message = error_message(StatusCode::UNAUTHORIZED, r#"{"error":"Token expired"}"#);
        assert_eq!(message, "Token expired");
    }

    #[test]
    fn test_error_message_falls_back_to_text_then_reason() {
        assert_eq!(
            error_message(StatusCode::BAD_GATEWAY, "upstream down\n"),
            "upstream down"
        );
        assert_eq!(
            error_message(StatusCode::SERVICE_UNAVAILABLE, ""),
            "Service Unavailable"
        );
    }

    #[test]
    fn test_auth_headers() {
        let headers = build_auth_headers(&auth()).unwrap();
        assert_eq!(headers.get(AUTHORIZATION).unwrap(), "Bearer abc");
        assert_eq!(headers.get("x-api-key").unwrap(), "key");
        assert!(headers.get(COOKIE).is_none());
    }

    #[test]
    fn test_invalid_header_value_is_config_error() {
        let mut auth = auth();
        auth.session_cookie = Some("bad\nvalue".to_string());
        assert!(matches!(
            build_auth_headers(&auth),
            Err(ApiClientError::Config(_))
        ));
    }

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let client =
            RestClient::with_settings("http://localhost:3000/api/", &auth(), Duration::from_secs(1))
                .unwrap();
        assert_eq!(client.url(paths::PROFILE), "http://localhost:3000/api/profile");
    }
}
