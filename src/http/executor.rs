//! Timeout and retry wrapper for single requests.
//!
//! # Retry Strategy
//!
//! - Every attempt gets its own deadline (`timeout_ms`)
//! - Non-2xx statuses, transport errors and timeouts all count as failures
//! - Between failed attempts: `min(1000ms * 2^(attempt-1), 5000ms)`
//! - No wait after the final attempt; its error is returned unchanged

use super::{HttpResponse, RequestError, Transport};
use crate::config::{ApiConfig, DebugFlags};
use crate::observability::{HTTP_ATTEMPTS_TOTAL, HTTP_REQUEST_DURATION_MS};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::instrument;

/// Base delay before the second attempt.
const BACKOFF_BASE_MS: u64 = 1_000;
/// Upper bound on any single backoff.
const BACKOFF_CAP_MS: u64 = 5_000;

/// Backoff after failed attempt `attempt` (1-based).
///
/// Formula: `min(1000 * 2^(attempt - 1), 5000)` milliseconds.
#[must_use]
pub fn backoff_delay(attempt: u32) -> Duration {
    if attempt == 0 {
        return Duration::ZERO;
    }
    let factor = 1_u64 << (attempt - 1).min(10);
    Duration::from_millis(BACKOFF_BASE_MS.saturating_mul(factor).min(BACKOFF_CAP_MS))
}

/// Executes GET requests with a deadline per attempt and capped retry.
#[derive(Clone)]
pub struct RequestExecutor {
    transport: Arc<dyn Transport>,
    timeout: Duration,
    max_attempts: u32,
    debug: DebugFlags,
}

impl std::fmt::Debug for RequestExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestExecutor")
            .field("timeout", &self.timeout)
            .field("max_attempts", &self.max_attempts)
            .field("debug", &self.debug)
            .finish_non_exhaustive()
    }
}

impl RequestExecutor {
    /// Creates an executor from API settings.
    #[must_use]
    pub fn new(transport: Arc<dyn Transport>, api: &ApiConfig, debug: DebugFlags) -> Self {
        Self {
            transport,
            timeout: api.timeout(),
            max_attempts: api.retry_attempts.max(1),
            debug,
        }
    }

    /// Overrides the per-attempt deadline.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Overrides the attempt count (at least 1).
    #[must_use]
    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts.max(1);
        self
    }

    /// Attempts per request.
    #[must_use]
    pub const fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Fetches `url`, retrying failed attempts with backoff.
    ///
    /// # Errors
    ///
    /// Returns the error of the last attempt once all attempts have failed.
    #[instrument(skip(self), fields(max_attempts = self.max_attempts))]
    pub async fn execute(&self, url: &str) -> Result<HttpResponse, RequestError> {
        if self.debug.enable_api_logging {
            tracing::info!(url = %url, "API call");
        }

        let mut attempt = 1;
        loop {
            match self.attempt(url).await {
                Ok(response) => {
                    if self.debug.debug_api_calls {
                        tracing::debug!(url = %url, attempt, "API success");
                    }
                    return Ok(response);
                },
                Err(error) => {
                    if self.debug.debug_api_calls {
                        tracing::debug!(
                            url = %url,
                            attempt,
                            max_attempts = self.max_attempts,
                            error = %error,
                            "API error"
                        );
                    }
                    if attempt >= self.max_attempts {
                        return Err(error);
                    }
                    tokio::time::sleep(backoff_delay(attempt)).await;
                    attempt += 1;
                },
            }
        }
    }

    /// Runs one attempt under the deadline and checks the status.
    async fn attempt(&self, url: &str) -> Result<HttpResponse, RequestError> {
        let start = Instant::now();
        let result = match tokio::time::timeout(self.timeout, self.transport.get(url)).await {
            Ok(Ok(response)) if response.is_success() => Ok(response),
            Ok(Ok(response)) => Err(RequestError::Status {
                url: url.to_string(),
                status: response.status,
            }),
            Ok(Err(error)) => Err(error),
            Err(_) => Err(RequestError::Timeout {
                url: url.to_string(),
                timeout_ms: u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX),
            }),
        };

        let outcome = if result.is_ok() { "success" } else { "failure" };
        metrics::counter!(HTTP_ATTEMPTS_TOTAL, "outcome" => outcome).increment(1);
        #[allow(clippy::cast_precision_loss)]
        metrics::histogram!(HTTP_REQUEST_DURATION_MS)
            .record(start.elapsed().as_millis() as f64);

        result
    }
}
