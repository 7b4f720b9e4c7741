//! Latest-filter-wins request tracking and search debouncing

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

/// Identifies one issued request
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Ticket(u64);

impl Ticket {
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

/// Hands out request tickets; only the most recent one may deliver data
///
/// A slow response to an earlier filter must not overwrite the result of a
/// newer one, so every response is checked against the latest ticket.
#[derive(Debug, Default)]
pub struct RequestGeneration {
    latest: AtomicU64,
}

impl RequestGeneration {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new request, making all outstanding tickets stale
    pub fn begin(&self) -> Ticket {
        Ticket(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.latest.load(Ordering::SeqCst) == ticket.0
    }

    /// Pass `value` through only if `ticket` is still the latest
    pub fn accept<T>(&self, ticket: Ticket, value: T) -> Option<T> {
        self.is_current(ticket).then_some(value)
    }

    /// Invalidate every outstanding ticket (view teardown)
    pub fn invalidate(&self) {
        self.latest.fetch_add(1, Ordering::SeqCst);
    }
}

/// Default quiet period before a search keystroke triggers a fetch
pub const DEFAULT_DEBOUNCE_MS: u64 = 300;

/// Quiet-period debounce driven by caller-supplied timestamps (milliseconds)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Debounce {
    window_ms: u64,
    pending_since: Option<u64>,
}

impl Default for Debounce {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE_MS)
    }
}

impl Debounce {
    pub fn new(window_ms: u64) -> Self {
        Self {
            window_ms,
            pending_since: None,
        }
    }

    pub fn window_ms(&self) -> u64 {
        self.window_ms
    }

    /// Record a keystroke; restarts the quiet period
    pub fn touch(&mut self, now_ms: u64) {
        self.pending_since = Some(now_ms);
    }

    pub fn is_pending(&self) -> bool {
        self.pending_since.is_some()
    }

    /// Fire once when the quiet period has elapsed since the last keystroke
    pub fn take_ready(&mut self, now_ms: u64) -> bool {
        match self.pending_since {
            Some(since) if now_ms.saturating_sub(since) >= self.window_ms => {
                self.pending_since = None;
                true
            }
            _ => false,
        }
    }

    /// Drop a pending fire (view teardown)
    pub fn cancel(&mut self) {
        self.pending_since = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latest_ticket_wins() {
        let generation = RequestGeneration::new();
        let first = generation.begin();
        let second = generation.begin();

        assert!(second > first);
        assert!(!generation.is_current(first));
        assert_eq!(generation.accept(first, "stale"), None);
        assert_eq!(generation.accept(second, "fresh"), Some("fresh"));
    }

    #[test]
    fn test_invalidate_drops_everything() {
        let generation = RequestGeneration::new();
        let ticket = generation.begin();
        generation.invalidate();
        assert!(!generation.is_current(ticket));
    }

    #[test]
    fn test_ticket_raw_round_trip() {
        let generation = RequestGeneration::new();
        let ticket = generation.begin();
        assert!(generation.is_current(Ticket::from_raw(ticket.value())));
    }

    #[test]
    fn test_debounce_waits_for_quiet_period() {
        let mut debounce = Debounce::new(300);
        debounce.touch(1_000);
        assert!(!debounce.take_ready(1_200));

        debounce.touch(1_250);
        assert!(!debounce.take_ready(1_500));
        assert!(debounce.take_ready(1_550));
        // Fires once
        assert!(!debounce.take_ready(2_000));
    }

    #[test]
    fn test_debounce_cancel() {
        let mut debounce = Debounce::default();
        debounce.touch(0);
        debounce.cancel();
        assert!(!debounce.is_pending());
        assert!(!debounce.take_ready(10_000));
        assert_eq!(debounce.window_ms(), DEFAULT_DEBOUNCE_MS);
    }
}
