//! Error types shared by the remote client and the query cache.

use thiserror::Error;

/// Failure talking to the profile backend.
///
/// Cloneable because the query cache keeps the last error next to the last
/// good value, and a de-duplicated fetch hands the same outcome to every
/// waiter.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RemoteError {
    /// The server answered with a non-success status.
    #[error("HTTP {status_code}: {message}")]
    Http { status_code: u16, message: String },

    /// The request never reached the server (connect, DNS, timeout).
    #[error("Network error: {0}")]
    Network(String),

    /// The server answered but the body was not what we expected.
    #[error("Unexpected response: {0}")]
    Decode(String),
}

impl RemoteError {
    pub fn http(status_code: u16, message: impl Into<String>) -> Self {
        Self::Http {
            status_code,
            message: message.into(),
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Http { status_code, .. } => Some(*status_code),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for RemoteError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

pub type RemoteResult<T> = Result<T, RemoteError>;
