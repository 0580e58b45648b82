//! Combo multiplier for closely timed pickups

use std::time::Duration;

#[derive(Debug, Clone)]
pub struct ComboSystem {
    current: u32,
    max: u32,
    last_pickup: Option<Duration>,
    timeout: Duration,
    /// Multiplier grows by one every `step` combo
    step: u32,
}

impl ComboSystem {
    pub fn new(timeout: Duration, step: u32) -> Self {
        Self {
            current: 0,
            max: 0,
            last_pickup: None,
            timeout,
            step: step.max(1),
        }
    }

    pub fn current(&self) -> u32 {
        self.current
    }

    /// High-water mark, never decreases
    pub fn max(&self) -> u32 {
        self.max
    }

    pub fn last_pickup(&self) -> Option<Duration> {
        self.last_pickup
    }

    pub fn multiplier(&self) -> i64 {
        1 + (self.current / self.step) as i64
    }

    /// Record a pickup at `now` and return the multiplier for it
    ///
    /// A gap longer than the timeout (or no previous pickup) resets the
    /// combo to zero. Otherwise the multiplier is taken from the combo as
    /// it stands, then the combo is incremented for the next pickup.
    pub fn register_pickup(&mut self, now: Duration) -> i64 {
        let in_window = self
            .last_pickup
            .is_some_and(|last| now.saturating_sub(last) <= self.timeout);

        let multiplier = if in_window {
            let m = self.multiplier();
            self.current += 1;
            self.max = self.max.max(self.current);
            m
        } else {
            self.current = 0;
            self.multiplier()
        };

        self.last_pickup = Some(now);
        multiplier
    }
}
