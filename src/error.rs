/// Error types shared by the IAM and container-service clients
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::iks::status::StatusOutcome;

/// Crate-wide result type
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while talking to IBM Cloud
#[derive(Debug, Error)]
pub enum Error {
    /// The IAM token exchange was rejected or returned no token
    #[error("IAM token exchange failed: {message}")]
    Auth {
        status: Option<u16>,
        message: String,
    },

    /// The request never produced an HTTP response
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The container service answered with a non-success status
    #[error(transparent)]
    Upstream(#[from] UpstreamError),

    /// A successful response did not have the expected shape
    #[error("unexpected {operation} response: {source}")]
    Decode {
        operation: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("timeout after {secs} seconds: {description}")]
    Timeout { secs: u64, description: String },
}

impl Error {
    pub(crate) fn auth(status: Option<u16>, message: impl Into<String>) -> Self {
        Self::Auth {
            status,
            message: message.into(),
        }
    }

    pub(crate) fn transport(url: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Transport {
            url: url.into(),
            source,
        }
    }

    pub(crate) fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}

/// A container-service call that came back with a non-success status.
///
/// The decoded response body is kept so callers can surface the upstream
/// error document as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Error)]
#[error("{operation}: {outcome} (HTTP {status})")]
pub struct UpstreamError {
    pub operation: &'static str,
    pub status: u16,
    #[serde(rename = "message")]
    pub outcome: StatusOutcome,
    pub payload: Value,
}
