//! Progress reporting for long-running region loads.

use serde::Serialize;
use std::sync::{Arc, Mutex, PoisonError};

/// Receives `(current, total)` updates during a bulk fetch.
///
/// Within one run `current` never decreases. Sinks are called inline on the
/// fetching task and are expected not to panic.
pub trait ProgressSink: Send + Sync {
    /// Reports that `current` of `total` records have been resolved.
    fn report(&self, current: usize, total: usize);
}

impl<F> ProgressSink for F
where
    F: Fn(usize, usize) + Send + Sync,
{
    fn report(&self, current: usize, total: usize) {
        self(current, total);
    }
}

/// Snapshot of a run's progress.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ProgressState {
    /// Records resolved so far.
    pub current: usize,
    /// Records requested.
    pub total: usize,
}

impl ProgressState {
    /// Whether every requested record has been resolved.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.total > 0 && self.current >= self.total
    }

    /// Completion in percent, 0 when nothing was requested.
    #[must_use]
    pub fn percent(&self) -> u8 {
        if self.total == 0 {
            return 0;
        }
        let percent = self.current.min(self.total) * 100 / self.total;
        u8::try_from(percent).unwrap_or(100)
    }
}

/// A sink that stores the latest update for another task to read.
///
/// The fetcher never resets it; whoever owns the display calls
/// [`SharedProgress::reset`] once the run has finished.
#[derive(Debug, Clone, Default)]
pub struct SharedProgress {
    state: Arc<Mutex<ProgressState>>,
}

impl SharedProgress {
    /// Creates a sink at `(0, 0)`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Latest reported state.
    #[must_use]
    pub fn snapshot(&self) -> ProgressState {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns to `(0, 0)`.
    pub fn reset(&self) {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner) = ProgressState::default();
    }
}

impl ProgressSink for SharedProgress {
    fn report(&self, current: usize, total: usize) {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner) = ProgressState { current, total };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn test_closure_is_a_sink() {
        let seen = Mutex::new(Vec::new());
        let sink = |current: usize, total: usize| {
            seen.lock().expect("lock").push((current, total));
        };
        sink.report(0, 3);
        sink.report(3, 3);
        assert_eq!(*seen.lock().expect("lock"), vec![(0, 3), (3, 3)]);
    }

    #[test]
    fn test_shared_progress_snapshot_and_reset() {
        let progress = SharedProgress::new();
        let reader = progress.clone();

        progress.report(4, 10);
        assert_eq!(reader.snapshot(), ProgressState { current: 4, total: 10 });

        reader.reset();
        assert_eq!(progress.snapshot(), ProgressState::default());
    }

    #[test_case(0, 0, 0, false ; "empty")]
    #[test_case(5, 10, 50, false ; "half")]
    #[test_case(10, 10, 100, true ; "done")]
    #[test_case(1, 3, 33, false ; "rounds down")]
    fn test_percent(current: usize, total: usize, percent: u8, complete: bool) {
        let state = ProgressState { current, total };
        assert_eq!(state.percent(), percent);
        assert_eq!(state.is_complete(), complete);
    }
}
