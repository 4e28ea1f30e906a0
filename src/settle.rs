//! Settle emitter - turns a rapidly changing input into a stable value.
//!
//! A raw value submitted on every keystroke is held until no new value has
//! arrived for the configured delay, then emitted once. Submitting again
//! before emission replaces the pending value and restarts the quiet
//! period. There is no background timer; the owner drives `poll` with the
//! current time, so emission is deterministic and trivially cancellable.

use std::time::{Duration, Instant};

/// Holds at most one pending value together with its emission deadline.
#[derive(Debug, Clone)]
pub struct SettleEmitter<T> {
    delay: Duration,
    pending: Option<Pending<T>>,
}

#[derive(Debug, Clone)]
struct Pending<T> {
    value: T,
    deadline: Instant,
}

impl<T> SettleEmitter<T> {
    pub fn new(delay: Duration) -> Self {
        SettleEmitter {
            delay,
            pending: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Submit a new raw value, replacing any pending one and restarting the
    /// quiet period.
    pub fn submit(&mut self, value: T, now: Instant) {
        self.pending = Some(Pending {
            value,
            deadline: now + self.delay,
        });
    }

    /// Emit the pending value if its quiet period has elapsed.
    ///
    /// Returns `None` while nothing is pending or the deadline has not
    /// passed. Each submitted value is emitted at most once.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        let due = self.pending.as_ref().is_some_and(|p| now >= p.deadline);
        if due {
            self.pending.take().map(|p| p.value)
        } else {
            None
        }
    }

    /// Emit the pending value immediately, without waiting for the quiet
    /// period.
    pub fn flush(&mut self) -> Option<T> {
        self.pending.take().map(|p| p.value)
    }

    /// Drop the pending value. Used on teardown so a stale emission never
    /// fires against a destroyed consumer.
    pub fn cancel(&mut self) {
        self.pending = None;
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Deadline of the pending value, if any.
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|p| p.deadline)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    const DELAY: Duration = Duration::from_millis(100);

    #[test]
    fn test_emits_after_quiet_period() {
        let mut emitter = SettleEmitter::new(DELAY);
        let start = Instant::now();

        emitter.submit("a", start);
        assert!(emitter.is_pending());

        // Still inside the quiet period.
        assert_eq!(emitter.poll(start + Duration::from_millis(50)), None);
        assert!(emitter.is_pending());

        // Quiet period elapsed.
        assert_eq!(emitter.poll(start + DELAY), Some("a"));
        assert!(!emitter.is_pending());

        // Emitted at most once.
        assert_eq!(emitter.poll(start + Duration::from_secs(1)), None);
    }

    #[test]
    fn test_resubmit_restarts_quiet_period() {
        let mut emitter = SettleEmitter::new(DELAY);
        let start = Instant::now();

        emitter.submit("a", start);
        emitter.submit("ab", start + Duration::from_millis(80));

        // The first deadline has passed, but the resubmission moved it.
        assert_eq!(emitter.poll(start + Duration::from_millis(120)), None);

        // Only the latest value is ever emitted.
        assert_eq!(
            emitter.poll(start + Duration::from_millis(180)),
            Some("ab")
        );
    }

    #[test]
    fn test_cancel_drops_pending() {
        let mut emitter = SettleEmitter::new(DELAY);
        let start = Instant::now();

        emitter.submit("a", start);
        emitter.cancel();
        assert!(!emitter.is_pending());
        assert_eq!(emitter.poll(start + Duration::from_secs(1)), None);
    }

    #[test]
    fn test_flush_emits_immediately() {
        let mut emitter = SettleEmitter::new(DELAY);
        emitter.submit(42, Instant::now());
        assert_eq!(emitter.flush(), Some(42));
        assert_eq!(emitter.flush(), None);
    }

    #[test]
    fn test_deadline_tracks_latest_submit() {
        let mut emitter: SettleEmitter<&str> = SettleEmitter::new(DELAY);
        assert_eq!(emitter.deadline(), None);

        let start = Instant::now();
        emitter.submit("a", start);
        assert_eq!(emitter.deadline(), Some(start + DELAY));

        let later = start + Duration::from_millis(30);
        emitter.submit("b", later);
        assert_eq!(emitter.deadline(), Some(later + DELAY));
    }

    #[test]
    fn test_with_real_clock() {
        let mut emitter = SettleEmitter::new(Duration::from_millis(20));
        emitter.submit("typed", Instant::now());

        assert_eq!(emitter.poll(Instant::now()), None);
        thread::sleep(Duration::from_millis(30));
        assert_eq!(emitter.poll(Instant::now()), Some("typed"));
    }
}
