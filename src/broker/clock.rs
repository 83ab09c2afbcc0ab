//! Time abstraction for the broker
//!
//! The broker never reads the system time directly. Message timestamps and the
//! `request` timeout both come from a [`Clock`] handed to the broker when it is
//! built, so firmware can plug in its tick counter and tests can drive time by hand.

use std::sync::atomic::{AtomicU32, Ordering};
use std::time::{Duration, Instant};

/// Monotonic tick source.
pub trait Clock: Send + Sync {
    /// Current tick. Wraps at `u32::MAX`.
    fn now(&self) -> u32;

    /// Called between polls while `request` waits for a reply. Cooperative
    /// platforms yield here; simulated clocks advance.
    fn idle(&self) {}
}

/// Counter that advances by one on every read.
///
/// Useful where no timer exists: any code path that reads the clock moves time
/// forward, so `request` timeouts still terminate.
#[derive(Debug, Default)]
pub struct TickClock {
    ticks: AtomicU32,
}

impl TickClock {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Clock for TickClock {
    fn now(&self) -> u32 {
        self.ticks.fetch_add(1, Ordering::Relaxed)
    }
}

/// Milliseconds elapsed since the clock was created.
#[derive(Debug)]
pub struct SystemClock {
    origin: Instant,
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Clock for SystemClock {
    fn now(&self) -> u32 {
        // truncation wraps after ~49 days, same as a 32-bit ms tick
        self.origin.elapsed().as_millis() as u32
    }

    fn idle(&self) {
        std::thread::sleep(Duration::from_millis(1));
    }
}

/// Clock that only moves when told to.
///
/// Each `idle` call advances it by `step` ticks, which lets a test observe exactly
/// how long `request` waited.
#[derive(Debug)]
pub struct ManualClock {
    ticks: AtomicU32,
    step: u32,
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new(0)
    }
}

impl ManualClock {
    pub fn new(start: u32) -> Self {
        Self::with_step(start, 1)
    }

    pub fn with_step(start: u32, step: u32) -> Self {
        Self {
            ticks: AtomicU32::new(start),
            step,
        }
    }

    pub fn advance(&self, ticks: u32) {
        self.ticks.fetch_add(ticks, Ordering::Relaxed);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> u32 {
        self.ticks.load(Ordering::Relaxed)
    }

    fn idle(&self) {
        self.advance(self.step);
    }
}
