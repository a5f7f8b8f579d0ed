use std::time::Duration;

use serde_json::Value;
use thiserror::Error;

/// Failure of a single upstream call. Never retried.
#[derive(Error, Debug)]
pub enum UpstreamError {
    #[error("Upstream request timed out after {}ms", .0.as_millis())]
    Timeout(Duration),

    #[error("Upstream returned HTTP {status}")]
    Http { status: u16, body: Value },

    #[error("Upstream request failed: {0}")]
    Transport(String),

    #[error("Upstream response could not be decoded: {0}")]
    Decode(String),
}

impl UpstreamError {
    pub(crate) fn from_reqwest(e: reqwest::Error, timeout: Duration) -> Self {
        if e.is_timeout() {
            return UpstreamError::Timeout(timeout);
        }
        // The request URL is not part of the message.
        UpstreamError::Transport(e.without_url().to_string())
    }

    /// HTTP status returned by upstream, if it answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            UpstreamError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Best-effort upstream body, or the error message when there is none.
    pub fn details(&self) -> Value {
        match self {
            UpstreamError::Http { body, .. } => body.clone(),
            other => Value::String(other.to_string()),
        }
    }
}
