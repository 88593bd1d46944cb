/*
 * Simulated Process
 *
 * A SimProcess carries nothing but counters: how much CPU time and how much
 * blocking (I/O) time it still needs. Work only ever decreases them, never
 * by more than the units granted, and never below zero.
 *
 * A process created with no blocking need never visits the Blocking Queue.
 */

use std::fmt;

use super::{traits::Process, types::ProcessId};

/// Counter-only process used by the simulator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimProcess {
    /// Unique process identifier
    pid: ProcessId,

    /// Human-readable name (for logs)
    name: String,

    /// CPU time still needed; 0 means done
    cpu_time_remaining: u64,

    /// Blocking time still needed
    blocking_time_remaining: u64,
}

impl SimProcess {
    pub fn new(pid: usize, cpu_time: u64, blocking_time: u64) -> Self {
        Self::named(pid, format!("proc-{}", pid), cpu_time, blocking_time)
    }

    pub fn named(pid: usize, name: impl Into<String>, cpu_time: u64, blocking_time: u64) -> Self {
        Self {
            pid: ProcessId::new(pid),
            name: name.into(),
            cpu_time_remaining: cpu_time,
            blocking_time_remaining: blocking_time,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn cpu_time_remaining(&self) -> u64 {
        self.cpu_time_remaining
    }

    pub fn blocking_time_remaining(&self) -> u64 {
        self.blocking_time_remaining
    }

    pub fn is_finished(&self) -> bool {
        self.cpu_time_remaining == 0
    }
}

impl Process for SimProcess {
    fn pid(&self) -> ProcessId {
        self.pid
    }

    fn perform_cpu_work(&mut self, units: u64) -> bool {
        self.cpu_time_remaining = self.cpu_time_remaining.saturating_sub(units);
        self.cpu_time_remaining == 0
    }

    fn perform_blocking_work(&mut self, units: u64) -> bool {
        self.blocking_time_remaining = self.blocking_time_remaining.saturating_sub(units);
        self.blocking_time_remaining == 0
    }

    fn needs_blocking(&self) -> bool {
        self.blocking_time_remaining > 0
    }
}

impl fmt::Display for SimProcess {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}) cpu={} blocking={}",
            self.name, self.pid, self.cpu_time_remaining, self.blocking_time_remaining
        )
    }
}
