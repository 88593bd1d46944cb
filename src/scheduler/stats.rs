/*
 * Scheduler Accounting
 *
 * Counters updated by the dispatch loop and the interrupt handler. Nothing
 * here influences scheduling decisions.
 */

use super::{
    events::Interrupt,
    types::{PRIORITY_LEVELS, PriorityLevel, ProcessId},
};

/// A process that finished its CPU need
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Completion {
    pub pid: ProcessId,
    /// Scheduler clock at retirement
    pub at: u64,
}

/// Run statistics of one scheduler
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchedStats {
    /// Dispatch-loop iterations
    pub iterations: u64,

    /// Iterations that found nothing to service
    pub idle_iterations: u64,

    /// Dispatches of the Blocking Queue
    pub blocking_dispatches: u64,

    /// Dispatches per CPU level
    pub cpu_dispatches: [u64; PRIORITY_LEVELS],

    pub blocked: u64,
    pub ready: u64,
    pub lowered: u64,

    /// Retirement order
    pub completions: Vec<Completion>,
}

impl SchedStats {
    pub fn record_interrupt(&mut self, interrupt: Interrupt) {
        match interrupt {
            Interrupt::ProcessBlocked => self.blocked += 1,
            Interrupt::ProcessReady => self.ready += 1,
            Interrupt::LowerPriority => self.lowered += 1,
        }
    }

    pub fn record_cpu_dispatch(&mut self, level: PriorityLevel) {
        self.cpu_dispatches[level.index()] += 1;
    }

    pub fn record_completion(&mut self, pid: ProcessId, at: u64) {
        self.completions.push(Completion { pid, at });
    }

    /// Interrupts handled, all kinds
    pub fn interrupts(&self) -> u64 {
        self.blocked + self.ready + self.lowered
    }

    pub fn retired(&self) -> usize {
        self.completions.len()
    }

    /// Retirement order as process ids
    pub fn retirement_order(&self) -> Vec<ProcessId> {
        self.completions.iter().map(|completion| completion.pid).collect()
    }
}
