//! Time sources for calculation timing.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Monotonic millisecond clock.
pub trait Clock: Send {
    fn now_ms(&self) -> f64;
}

/// Wall-independent clock anchored at construction.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> f64 {
        self.origin.elapsed().as_secs_f64() * 1000.0
    }
}

/// Test clock. Clones share the same reading.
///
/// With a step configured, every read advances the clock by that step
/// after returning, so a start/end pair measures exactly one step.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now_bits: Arc<AtomicU64>,
    step_bits: Arc<AtomicU64>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_step(step_ms: f64) -> Self {
        let clock = Self::new();
        clock.set_step(step_ms);
        clock
    }

    pub fn set(&self, now_ms: f64) {
        self.now_bits.store(now_ms.to_bits(), Ordering::SeqCst);
    }

    pub fn advance(&self, delta_ms: f64) {
        let now = f64::from_bits(self.now_bits.load(Ordering::SeqCst));
        self.set(now + delta_ms);
    }

    pub fn set_step(&self, step_ms: f64) {
        self.step_bits.store(step_ms.to_bits(), Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> f64 {
        let now = f64::from_bits(self.now_bits.load(Ordering::SeqCst));
        let step = f64::from_bits(self.step_bits.load(Ordering::SeqCst));
        if step != 0.0 {
            self.set(now + step);
        }
        now
    }
}

#[cfg(test)]
mod tests {
    use super::{Clock, ManualClock, SystemClock};

    #[test]
    fn manual_clock_clones_share_reading() {
        let clock = ManualClock::new();
        let handle = clock.clone();
        handle.set(10.0);
        handle.advance(2.5);
        assert_eq!(clock.now_ms(), 12.5);
        assert_eq!(clock.now_ms(), 12.5);
    }

    #[test]
    fn stepping_clock_advances_per_read() {
        let clock = ManualClock::with_step(20.0);
        let start = clock.now_ms();
        let end = clock.now_ms();
        assert_eq!(end - start, 20.0);
    }

    #[test]
    fn system_clock_is_monotonic() {
        let clock = SystemClock::new();
        let first = clock.now_ms();
        assert!(clock.now_ms() >= first);
    }
}
