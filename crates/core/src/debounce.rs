use std::time::{Duration, Instant};

/// Default quiet window for scroll persistence.
pub const SCROLL_DEBOUNCE: Duration = Duration::from_millis(300);

/// Coalesce a burst of events: remember only the most recent value, release
/// it once a full quiet window has elapsed with no newer event.
///
/// Timer-free on purpose — the caller injects `now`, so the coalescing rule
/// ("act on the last event of a quiet period") is testable without sleeping
/// and independent of any particular timer primitive. This is a
/// throughput/resource control, not a correctness requirement: dropping an
/// intermediate value only ever skips a redundant persist.
#[derive(Debug)]
pub struct Debouncer {
    window: Duration,
    pending: Option<(f64, Instant)>,
}

impl Debouncer {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            pending: None,
        }
    }

    /// Record an event, replacing any pending one and restarting the window.
    pub fn record(&mut self, value: f64, now: Instant) {
        self.pending = Some((value, now));
    }

    /// Release the pending value if the quiet window has elapsed.
    pub fn poll(&mut self, now: Instant) -> Option<f64> {
        let (value, recorded) = self.pending?;
        if now.duration_since(recorded) >= self.window {
            self.pending = None;
            Some(value)
        } else {
            None
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(SCROLL_DEBOUNCE)
    }
}
