/*
 * Simulation Clocks
 *
 * The scheduler reads time through the TimeSource trait, once when it is
 * created and once per dispatch-loop iteration. The difference between two
 * reads is the work time the iteration may hand out.
 *
 * ### TickClock
 * Deterministic virtual time. Every read advances the clock by a fixed step,
 * the way each timer interrupt adds one tick worth of milliseconds to the
 * uptime counter. Extra time can be injected with advance().
 *
 * ### SystemClock
 * Milliseconds elapsed since the clock was created. Fast loops may see a
 * zero work time; such iterations grant zero units.
 */

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use crate::scheduler::TimeSource;

/// Default step of a TickClock (one 100Hz timer tick)
pub const DEFAULT_TICK_MS: u64 = 10;

/// Virtual clock advancing a fixed step per read
#[derive(Debug)]
pub struct TickClock {
    /// Current time in milliseconds
    now_ms: AtomicU64,

    /// Milliseconds added by each read
    step_ms: u64,
}

impl TickClock {
    pub fn new(step_ms: u64) -> Self {
        Self {
            now_ms: AtomicU64::new(0),
            step_ms,
        }
    }

    pub fn step_ms(&self) -> u64 {
        self.step_ms
    }

    /// Add `ms` on top of the regular steps
    pub fn advance(&self, ms: u64) {
        self.now_ms.fetch_add(ms, Ordering::SeqCst);
    }

    /// Current time without advancing
    pub fn peek(&self) -> u64 {
        self.now_ms.load(Ordering::SeqCst)
    }
}

impl Default for TickClock {
    fn default() -> Self {
        Self::new(DEFAULT_TICK_MS)
    }
}

impl TimeSource for TickClock {
    fn now(&self) -> u64 {
        self.now_ms.fetch_add(self.step_ms, Ordering::SeqCst)
    }
}

/// Wall clock, milliseconds since creation
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    start: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self { start: Instant::now() }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeSource for SystemClock {
    fn now(&self) -> u64 {
        u64::try_from(self.start.elapsed().as_millis()).unwrap_or(u64::MAX)
    }
}
