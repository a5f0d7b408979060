use std::time::{Duration, Instant};

/// Per-session memory of the last successful outbound call.
///
/// Each interactive session owns exactly one of these; it is never shared or persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FetchState {
    last_call: Option<Instant>,
}

impl FetchState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from a known last-call time, e.g. when resuming a session in tests.
    pub fn with_last_call(last_call: Instant) -> Self {
        Self {
            last_call: Some(last_call),
        }
    }

    pub fn last_call(&self) -> Option<Instant> {
        self.last_call
    }

    /// Time still to wait before another call is allowed, if any.
    pub fn remaining_wait(&self, now: Instant, min_interval: Duration) -> Option<Duration> {
        let last = self.last_call?;
        let elapsed = now.saturating_duration_since(last);
        if elapsed < min_interval {
            Some(min_interval - elapsed)
        } else {
            None
        }
    }

    pub(crate) fn record_success(&mut self, now: Instant) {
        self.last_call = Some(now);
    }
}
