//! Configuration loading for the portal TUI.
//!
//! All fields are required unless explicitly marked optional. No defaults.

use portal_core::CacheConfig;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

/// Environment variable consulted when `--config` is not given.
pub const CONFIG_ENV_VAR: &str = "PORTAL_TUI_CONFIG";

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TuiConfig {
    pub api_base_url: String,
    pub auth: AuthConfig,
    pub request_timeout_ms: u64,
    pub refresh_interval_ms: u64,
    pub stale_time_ms: u64,
    pub persistence_path: PathBuf,
    pub log_path: PathBuf,
    pub theme: ThemeConfig,
}

/// Credentials attached to every request.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AuthConfig {
    pub jwt: Option<String>,
    pub api_key: Option<String>,
    /// Raw `Cookie` header value for session-cookie backends.
    pub session_cookie: Option<String>,
}

impl AuthConfig {
    pub fn is_empty(&self) -> bool {
        [&self.jwt, &self.api_key, &self.session_cookie]
            .iter()
            .all(|value| value.as_deref().map_or(true, |v| v.trim().is_empty()))
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ThemeConfig {
    pub name: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing configuration file path (use --config or PORTAL_TUI_CONFIG)")]
    MissingConfigPath,
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid config value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

fn invalid(field: &'static str, reason: &str) -> ConfigError {
    ConfigError::InvalidValue {
        field,
        reason: reason.to_string(),
    }
}

impl TuiConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let path = config_path_from_args(std::env::args().skip(1)).or_else(config_path_from_env);
        let path = path.ok_or(ConfigError::MissingConfigPath)?;
        let config = Self::from_path(&path)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_base_url.trim().is_empty() {
            return Err(invalid("api_base_url", "must not be empty"));
        }
        match Url::parse(&self.api_base_url) {
            Ok(url) if url.scheme() == "http" || url.scheme() == "https" => {}
            _ => return Err(invalid("api_base_url", "must be an absolute http(s) URL")),
        }
        if self.auth.is_empty() {
            return Err(invalid(
                "auth",
                "jwt, api_key or session_cookie must be provided",
            ));
        }
        if self.request_timeout_ms == 0 {
            return Err(invalid("request_timeout_ms", "must be > 0"));
        }
        if self.refresh_interval_ms == 0 {
            return Err(invalid("refresh_interval_ms", "must be > 0"));
        }
        if self.persistence_path.as_os_str().is_empty() {
            return Err(invalid("persistence_path", "must not be empty"));
        }
        if self.log_path.as_os_str().is_empty() {
            return Err(invalid("log_path", "must not be empty"));
        }
        if self.theme.name.trim().is_empty() {
            return Err(invalid("theme.name", "must not be empty"));
        }
        if !self.theme.name.eq_ignore_ascii_case("synthbrute") {
            return Err(invalid("theme.name", "only 'synthbrute' is supported"));
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_millis(self.refresh_interval_ms)
    }

    pub fn cache_config(&self) -> CacheConfig {
        CacheConfig::new().with_stale_time(Duration::from_millis(self.stale_time_ms))
    }
}

fn config_path_from_env() -> Option<PathBuf> {
    std::env::var(CONFIG_ENV_VAR).ok().map(PathBuf::from)
}

/// Value of `--config <path>` or `--config=<path>`.
pub fn config_path_from_args(args: impl IntoIterator<Item = String>) -> Option<PathBuf> {
    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        if arg == "--config" {
            return args.next().map(PathBuf::from);
        }
        if let Some(path) = arg.strip_prefix("--config=") {
            return Some(PathBuf::from(path));
        }
    }
    None
}
