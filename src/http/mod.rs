//! HTTP plumbing.
//!
//! [`Transport`] is the seam between the fetch layer and the network. The
//! [`RequestExecutor`] wraps any transport with a per-attempt deadline and
//! capped exponential-backoff retry.

mod client;
mod executor;
#[cfg(any(test, feature = "test-support"))]
mod scripted;

pub use client::ReqwestTransport;
pub use executor::{RequestExecutor, backoff_delay};
#[cfg(any(test, feature = "test-support"))]
pub use scripted::{Scripted, ScriptedTransport};

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Error raised for a single request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    /// The attempt did not finish before its deadline.
    #[error("request to {url} timed out after {timeout_ms}ms")]
    Timeout {
        /// Requested URL.
        url: String,
        /// Deadline that elapsed.
        timeout_ms: u64,
    },

    /// The server answered with a non-success status.
    #[error("HTTP {status} response from {url}")]
    Status {
        /// Requested URL.
        url: String,
        /// Status code.
        status: u16,
    },

    /// The connection failed or the body could not be read.
    #[error("request to {url} failed: {cause}")]
    Transport {
        /// Requested URL.
        url: String,
        /// Underlying cause.
        cause: String,
    },
}

impl RequestError {
    /// The URL the failed request targeted.
    #[must_use]
    pub fn url(&self) -> &str {
        match self {
            Self::Timeout { url, .. } | Self::Status { url, .. } | Self::Transport { url, .. } => {
                url
            },
        }
    }
}

/// A fully-read HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// Status code.
    pub status: u16,
    /// Response body.
    pub body: String,
}

impl HttpResponse {
    /// Creates a response.
    #[must_use]
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Whether the status is in the 2xx range.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }

    /// Decodes the body as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Decode`] if the body does not match `T`.
    pub fn json<T: DeserializeOwned>(&self, resource: &str) -> crate::Result<T> {
        serde_json::from_str(&self.body).map_err(|e| crate::Error::Decode {
            resource: resource.to_string(),
            cause: e.to_string(),
        })
    }
}

/// Issues a single GET request.
///
/// Implementations perform exactly one attempt and report the status as-is;
/// retries, deadlines and status checks belong to [`RequestExecutor`].
#[async_trait]
pub trait Transport: Send + Sync {
    /// Fetches `url` and reads the whole body.
    ///
    /// # Errors
    ///
    /// Returns [`RequestError::Transport`] if the request could not be sent
    /// or the body could not be read.
    async fn get(&self, url: &str) -> Result<HttpResponse, RequestError>;
}
