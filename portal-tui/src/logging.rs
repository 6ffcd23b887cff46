//! File logging for the TUI.
//!
//! The terminal belongs to the UI, so log output goes to the configured file
//! without ANSI colors. `RUST_LOG` overrides the default filter.

use crate::error::TuiError;
use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

pub const DEFAULT_FILTER: &str = "portal_tui=info,portal_core=info";

/// Install the global subscriber. Call once, before the first log line.
pub fn init_logging(log_path: &Path) -> Result<(), TuiError> {
    if let Some(parent) = log_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)?;

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_ansi(false)
        .with_target(true)
        .with_writer(Mutex::new(file))
        .try_init()
        .map_err(|e| TuiError::Logging(e.to_string()))
}
