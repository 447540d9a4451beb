#![forbid(unsafe_code)]

//! Deadline bookkeeping on a host-supplied monotonic clock.
//!
//! Browser `setTimeout`/`setInterval` handles become plain values here: a
//! [`OneShot`] is an optional deadline, an [`Interval`] is an optional next
//! deadline plus a fixed period. Components compare them against the `now`
//! the host passes to `advance_to`.

use core::time::Duration;

/// A single optional deadline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OneShot {
    due: Option<Duration>,
}

impl OneShot {
    #[must_use]
    pub const fn new() -> Self {
        Self { due: None }
    }

    /// Arm (or re-arm) the deadline.
    pub fn arm(&mut self, at: Duration) {
        self.due = Some(at);
    }

    pub fn cancel(&mut self) {
        self.due = None;
    }

    #[must_use]
    pub const fn due(&self) -> Option<Duration> {
        self.due
    }

    #[must_use]
    pub const fn is_armed(&self) -> bool {
        self.due.is_some()
    }

    /// Disarm and return the deadline if it has passed.
    pub fn fire_if_due(&mut self, now: Duration) -> Option<Duration> {
        match self.due {
            Some(due) if due <= now => {
                self.due = None;
                Some(due)
            }
            _ => None,
        }
    }
}

/// A repeating deadline with a fixed period.
///
/// Like `setInterval`, the cadence is anchored to the start time: firing
/// advances the next deadline by exactly one period.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interval {
    period: Duration,
    next: Option<Duration>,
}

impl Interval {
    /// Create a stopped interval. A zero period is bumped to 1ms.
    #[must_use]
    pub fn new(period: Duration) -> Self {
        Self {
            period: period.max(Duration::from_millis(1)),
            next: None,
        }
    }

    #[must_use]
    pub const fn period(&self) -> Duration {
        self.period
    }

    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.next.is_some()
    }

    #[must_use]
    pub const fn due(&self) -> Option<Duration> {
        self.next
    }

    /// Start from `now` unless already running.
    ///
    /// Returns `true` if the interval was started by this call.
    pub fn start(&mut self, now: Duration) -> bool {
        if self.next.is_some() {
            return false;
        }
        self.next = Some(now.saturating_add(self.period));
        true
    }

    /// Stop, returning whether it was running.
    pub fn stop(&mut self) -> bool {
        self.next.take().is_some()
    }

    /// Move the next deadline on by one period. No-op while stopped.
    ///
    /// For callers that already compared [`Interval::due`] against the clock.
    pub fn consume(&mut self) {
        if let Some(due) = self.next {
            self.next = Some(due.saturating_add(self.period));
        }
    }

    /// Consume one due tick, scheduling the following one.
    pub fn fire_if_due(&mut self, now: Duration) -> Option<Duration> {
        match self.next {
            Some(due) if due <= now => {
                self.next = Some(due.saturating_add(self.period));
                Some(due)
            }
            _ => None,
        }
    }
}
