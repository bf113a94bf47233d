//! # Clocks
//!
//! The driver paces commands with a `Clock`, so runs can either be made in real time or against
//! a virtual time base which advances instantly.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use std::{
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
    thread,
    time::{Duration, Instant},
};

// ------------------------------------------------------------------------------------------------
// TRAITS
// ------------------------------------------------------------------------------------------------

/// A monotonic time source which can be slept on.
pub trait Clock {
    /// Seconds elapsed since the clock was created.
    fn now_s(&self) -> f64;

    /// Block for the given duration.
    fn sleep(&self, duration: Duration);
}

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Real time clock.
#[derive(Clone, Copy, Debug)]
pub struct SystemClock {
    start: Instant,
}

/// Simulated clock where sleeping advances time immediately.
///
/// Clones share the same time base, so the driver and a simulated provider can be given copies of
/// one clock.
#[derive(Clone, Debug, Default)]
pub struct VirtualClock {
    /// `f64` seconds stored as bits
    time_s: Arc<AtomicU64>,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl SystemClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_s(&self) -> f64 {
        self.start.elapsed().as_secs_f64()
    }

    fn sleep(&self, duration: Duration) {
        thread::sleep(duration)
    }
}

impl VirtualClock {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Clock for VirtualClock {
    fn now_s(&self) -> f64 {
        f64::from_bits(self.time_s.load(Ordering::SeqCst))
    }

    fn sleep(&self, duration: Duration) {
        let dt = duration.as_secs_f64();

        // Only one thread is expected to sleep at a time but keep the update atomic anyway
        let mut current = self.time_s.load(Ordering::SeqCst);
        loop {
            let next = (f64::from_bits(current) + dt).to_bits();
            match self.time_s.compare_exchange_weak(
                current,
                next,
                Ordering::SeqCst,
                Ordering::SeqCst,
            ) {
                Ok(_) => break,
                Err(actual) => current = actual,
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_virtual_clock() {
        let clock = VirtualClock::new();
        let shared = clock.clone();

        assert_eq!(clock.now_s(), 0.0);

        clock.sleep(Duration::from_millis(1500));
        assert_eq!(shared.now_s(), 1.5);

        shared.sleep(Duration::from_secs(2));
        assert_eq!(clock.now_s(), 3.5);
    }

    #[test]
    fn test_system_clock() {
        let clock = SystemClock::new();
        let before = clock.now_s();
        clock.sleep(Duration::from_millis(10));

        assert!(clock.now_s() - before >= 0.01);
    }
}
