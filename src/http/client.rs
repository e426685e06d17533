//! Network transport backed by `reqwest`.

use super::{HttpResponse, RequestError, Transport};
use async_trait::async_trait;

/// Transport that talks to the real API.
///
/// No client-level timeout is set; the executor enforces per-attempt
/// deadlines by dropping the in-flight future.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    /// HTTP client with connection pooling.
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Creates a new transport.
    #[must_use]
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .user_agent(format!("dexcache/{}", env!("CARGO_PKG_VERSION")))
            .pool_max_idle_per_host(10)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self { client }
    }

    /// Wraps an existing client.
    #[must_use]
    pub const fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl Default for ReqwestTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn get(&self, url: &str) -> Result<HttpResponse, RequestError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| RequestError::Transport {
                url: url.to_string(),
                cause: e.to_string(),
            })?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(|e| RequestError::Transport {
            url: url.to_string(),
            cause: format!("failed to read body: {e}"),
        })?;

        Ok(HttpResponse { status, body })
    }
}
