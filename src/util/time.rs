//! Time utilities for the simulation loop

use std::time::{Duration, Instant};

/// Default simulation tick rate (one tick per display frame)
pub const DEFAULT_TICK_RATE: u32 = 60;

/// Duration of a single tick at the given rate
pub fn tick_duration(ticks_per_second: u32) -> Duration {
    Duration::from_micros(1_000_000 / ticks_per_second.max(1) as u64)
}

/// A simple timer for measuring durations
#[derive(Debug, Clone)]
pub struct Timer {
    start: Instant,
}

impl Timer {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }

    pub fn elapsed_micros(&self) -> u64 {
        self.start.elapsed().as_micros() as u64
    }

    pub fn reset(&mut self) {
        self.start = Instant::now();
    }
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tick_duration_at_default_rate() {
        assert_eq!(
            tick_duration(DEFAULT_TICK_RATE),
            Duration::from_micros(16_666)
        );
    }

    #[test]
    fn tick_duration_guards_zero_rate() {
        assert_eq!(tick_duration(0), Duration::from_micros(1_000_000));
    }
}
