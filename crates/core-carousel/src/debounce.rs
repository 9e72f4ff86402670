//! Single-shot, replaceable timer.
//!
//! Contract:
//! - `schedule` stores the value and (re)starts the window; a value already
//!   pending is discarded (debounce, not throttle).
//! - `poll` yields the stored value exactly once, the first time it is called
//!   with `now >= deadline`. The value returned is always the latest scheduled.
//! - `cancel` drops the pending value; a cancelled timer never fires.
//!
//! Time is passed in by the caller so the owner decides where `now` comes
//! from (runtime tick, test clock).

use std::time::{Duration, Instant};

#[derive(Debug)]
pub struct Debounce<T> {
    window: Duration,
    pending: Option<Pending<T>>,
}

#[derive(Debug)]
struct Pending<T> {
    deadline: Instant,
    value: T,
}

impl<T> Debounce<T> {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            pending: None,
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Arm (or re-arm) the timer. Returns `true` when an earlier pending value
    /// was replaced.
    pub fn schedule(&mut self, value: T, now: Instant) -> bool {
        let replaced = self.pending.is_some();
        self.pending = Some(Pending {
            deadline: now + self.window,
            value,
        });
        replaced
    }

    pub fn poll(&mut self, now: Instant) -> Option<T> {
        if self.pending.as_ref().is_some_and(|p| now >= p.deadline) {
            return self.pending.take().map(|p| p.value);
        }
        None
    }

    /// Returns `true` when a pending value was dropped.
    pub fn cancel(&mut self) -> bool {
        self.pending.take().is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|p| p.deadline)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WINDOW: Duration = Duration::from_millis(150);

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn fires_once_after_window() {
        let t0 = Instant::now();
        let mut d = Debounce::new(WINDOW);
        assert!(!d.schedule(800u32, t0));
        assert_eq!(d.poll(t0 + ms(149)), None);
        assert_eq!(d.poll(t0 + ms(150)), Some(800));
        assert_eq!(d.poll(t0 + ms(500)), None, "single shot");
        assert!(!d.is_pending());
    }

    #[test]
    fn rapid_events_collapse_to_last() {
        let t0 = Instant::now();
        let mut d = Debounce::new(WINDOW);
        d.schedule(1200u32, t0);
        assert!(d.schedule(700u32, t0 + ms(100)), "second event replaces the first");
        assert_eq!(d.deadline(), Some(t0 + ms(250)));
        // The first event's deadline passes without firing.
        assert_eq!(d.poll(t0 + ms(150)), None);
        assert_eq!(d.poll(t0 + ms(249)), None);
        assert_eq!(d.poll(t0 + ms(250)), Some(700));
        assert_eq!(d.poll(t0 + ms(400)), None);
    }

    #[test]
    fn cancel_prevents_firing() {
        let t0 = Instant::now();
        let mut d = Debounce::new(WINDOW);
        d.schedule(640u32, t0);
        assert!(d.cancel());
        assert!(!d.cancel(), "nothing left to cancel");
        assert_eq!(d.poll(t0 + ms(1000)), None);
        assert_eq!(d.deadline(), None);
    }

    #[test]
    fn zero_window_fires_immediately() {
        let t0 = Instant::now();
        let mut d = Debounce::new(Duration::ZERO);
        d.schedule("w", t0);
        assert_eq!(d.window(), Duration::ZERO);
        assert_eq!(d.poll(t0), Some("w"));
    }
}
