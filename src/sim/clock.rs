//! Injectable monotonic clocks
//!
//! Every timestamp in the simulation is a `Duration` measured from the
//! clock's own epoch, never a wall-clock reading.

use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Source of monotonic time for the simulation
pub trait Clock {
    /// Time elapsed since this clock's epoch
    fn now(&self) -> Duration;

    /// Time elapsed since an earlier reading of this clock
    fn since(&self, earlier: Duration) -> Duration {
        self.now().saturating_sub(earlier)
    }
}

/// Manually advanced clock
///
/// Clones share the same underlying time, so a driver or test can keep a
/// handle and advance the clock the arena reads from.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<Duration>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move time forward
    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }

    /// Convenience for `advance(Duration::from_millis(ms))`
    pub fn advance_ms(&self, ms: u64) {
        self.advance(Duration::from_millis(ms));
    }

    /// Jump to an absolute time (must not go backwards)
    pub fn set(&self, at: Duration) {
        debug_assert!(at >= self.now.get(), "ManualClock cannot run backwards");
        self.now.set(at.max(self.now.get()));
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        self.now.get()
    }
}

/// Real-time clock backed by `Instant`
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    start: Instant,
}

impl Default for SystemClock {
    fn default() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl SystemClock {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.start.elapsed()
    }
}
