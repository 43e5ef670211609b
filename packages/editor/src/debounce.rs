//! Idle-time debouncing for snapshot capture
//!
//! Every edit pushes the deadline out by `delay`; the owner polls and
//! captures once the deadline has passed. Nothing here owns a timer, so the
//! host decides how to wait (event loop tick, `tokio::time::sleep_until` on
//! [`Debouncer::deadline`], or an explicit flush).

use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct Debouncer {
    delay: Duration,
    deadline: Option<Instant>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    /// (Re)start the idle window from `now`
    pub fn schedule(&mut self, now: Instant) {
        self.deadline = Some(now + self.delay);
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn is_due(&self, now: Instant) -> bool {
        matches!(self.deadline, Some(deadline) if now >= deadline)
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reschedule_pushes_deadline() {
        let mut debouncer = Debouncer::new(Duration::from_millis(500));
        let start = Instant::now();

        debouncer.schedule(start);
        debouncer.schedule(start + Duration::from_millis(300));

        assert!(!debouncer.is_due(start + Duration::from_millis(600)));
        assert!(debouncer.is_due(start + Duration::from_millis(800)));
    }

    #[test]
    fn test_cancel() {
        let mut debouncer = Debouncer::new(Duration::from_millis(10));
        let now = Instant::now();
        debouncer.schedule(now);
        debouncer.cancel();

        assert!(!debouncer.is_pending());
        assert!(!debouncer.is_due(now + Duration::from_secs(1)));
    }
}
