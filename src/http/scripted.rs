//! In-memory transport for tests.
//!
//! Compiled only for unit tests or with the `test-support` feature.
//!
//! Responses are keyed by exact URL. Each URL has a queue of one-shot
//! replies consumed in order and an optional persistent reply used once the
//! queue is empty. URLs with neither answer `404`.

use super::{HttpResponse, RequestError, Transport};
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

/// A scripted reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scripted {
    /// Answer with a status and body.
    Respond {
        /// Status code.
        status: u16,
        /// Response body.
        body: String,
    },
    /// Fail at the transport level.
    Fail(String),
    /// Never complete. Only a deadline ends the attempt.
    Hang,
}

impl Scripted {
    /// Shorthand for [`Scripted::Respond`].
    #[must_use]
    pub fn respond(status: u16, body: impl Into<String>) -> Self {
        Self::Respond {
            status,
            body: body.into(),
        }
    }
}

#[derive(Debug, Default)]
struct Script {
    queued: VecDeque<Scripted>,
    fallback: Option<Scripted>,
    calls: usize,
}

#[derive(Debug, Default)]
struct State {
    scripts: HashMap<String, Script>,
    total_calls: usize,
}

/// Transport double that replays scripted replies.
#[derive(Debug, Default)]
pub struct ScriptedTransport {
    state: Mutex<State>,
    latency: Option<Duration>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl ScriptedTransport {
    /// Creates a transport with no scripts.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Delays every reply by `latency`.
    #[must_use]
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn set_fallback(&self, url: &str, reply: Scripted) {
        self.lock()
            .scripts
            .entry(url.to_string())
            .or_default()
            .fallback = Some(reply);
    }

    /// Always answers `url` with `status` and `body`.
    pub fn respond(&self, url: &str, status: u16, body: impl Into<String>) {
        self.set_fallback(url, Scripted::respond(status, body));
    }

    /// Always fails `url` at the transport level.
    pub fn fail(&self, url: &str, cause: impl Into<String>) {
        self.set_fallback(url, Scripted::Fail(cause.into()));
    }

    /// Never answers `url`.
    pub fn hang(&self, url: &str) {
        self.set_fallback(url, Scripted::Hang);
    }

    /// Queues a one-shot reply for `url`.
    pub fn push(&self, url: &str, reply: Scripted) {
        self.lock()
            .scripts
            .entry(url.to_string())
            .or_default()
            .queued
            .push_back(reply);
    }

    /// Number of requests made for `url`.
    #[must_use]
    pub fn calls(&self, url: &str) -> usize {
        self.lock().scripts.get(url).map_or(0, |script| script.calls)
    }

    /// Number of requests made for any URL.
    #[must_use]
    pub fn total_calls(&self) -> usize {
        self.lock().total_calls
    }

    /// Requests currently awaiting a reply.
    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Highest number of requests that were awaiting a reply at once.
    #[must_use]
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    fn next_reply(&self, url: &str) -> Scripted {
        let mut state = self.lock();
        state.total_calls += 1;
        let script = state.scripts.entry(url.to_string()).or_default();
        script.calls += 1;
        script
            .queued
            .pop_front()
            .or_else(|| script.fallback.clone())
            .unwrap_or_else(|| Scripted::respond(404, "Not Found"))
    }
}

/// Decrements the in-flight counter when a request finishes or is dropped.
struct InFlight<'a>(&'a AtomicUsize);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn get(&self, url: &str) -> Result<HttpResponse, RequestError> {
        let reply = self.next_reply(url);

        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(current, Ordering::SeqCst);
        let _guard = InFlight(&self.in_flight);

        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        match reply {
            Scripted::Respond { status, body } => Ok(HttpResponse { status, body }),
            Scripted::Fail(cause) => Err(RequestError::Transport {
                url: url.to_string(),
                cause,
            }),
            Scripted::Hang => std::future::pending().await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unknown_url_is_not_found() {
        let transport = ScriptedTransport::new();
        let response = transport.get("https://example.test/missing").await.expect("reply");
        assert_eq!(response.status, 404);
        assert_eq!(transport.calls("https://example.test/missing"), 1);
    }

    #[tokio::test]
    async fn test_queue_then_fallback() {
        let transport = ScriptedTransport::new();
        let url = "https://example.test/a";
        transport.push(url, Scripted::respond(500, ""));
        transport.respond(url, 200, "ok");

        assert_eq!(transport.get(url).await.expect("reply").status, 500);
        assert_eq!(transport.get(url).await.expect("reply").status, 200);
        assert_eq!(transport.get(url).await.expect("reply").status, 200);
        assert_eq!(transport.calls(url), 3);
        assert_eq!(transport.total_calls(), 3);
    }

    #[tokio::test]
    async fn test_fail_reports_transport_error() {
        let transport = ScriptedTransport::new();
        transport.fail("https://example.test/b", "refused");
        let err = transport.get("https://example.test/b").await.expect_err("fails");
        assert_eq!(err.url(), "https://example.test/b");
    }

    #[tokio::test(start_paused = true)]
    async fn test_latency_tracks_concurrency() {
        let transport = ScriptedTransport::new().with_latency(Duration::from_millis(50));
        transport.respond("https://example.test/1", 200, "");
        transport.respond("https://example.test/2", 200, "");

        let (a, b) = tokio::join!(
            transport.get("https://example.test/1"),
            transport.get("https://example.test/2")
        );
        assert!(a.is_ok() && b.is_ok());
        assert_eq!(transport.max_in_flight(), 2);
        assert_eq!(transport.in_flight(), 0);
    }
}
