/*
 * Scheduler Trait Definitions
 *
 * This module defines the seams of the scheduler subsystem:
 *
 * - Process: what the scheduler needs from a unit of work
 * - InterruptSink: where a queue reports the outcome of servicing a process
 * - TimeSource: where the dispatch loop reads the current time
 *
 * Queues never own a reference to their scheduler. They are handed an
 * InterruptSink for the duration of a single service call, which keeps the
 * ownership graph a tree while preserving the synchronous callback.
 */

use super::{
    events::Interrupt,
    queue::Queue,
    types::{ProcessId, QueueId},
};

/// Contract of a schedulable process
///
/// Work methods consume at most `units` of the respective need and report
/// whether that need is now fully satisfied.
pub trait Process {
    /// Identifier, stable for the lifetime of the process
    fn pid(&self) -> ProcessId;

    /// Perform up to `units` of CPU work; true if the CPU need is now 0
    fn perform_cpu_work(&mut self, units: u64) -> bool;

    /// Perform up to `units` of blocking work; true if the blocking need is now 0
    fn perform_blocking_work(&mut self, units: u64) -> bool;

    /// Whether any blocking need remains
    fn needs_blocking(&self) -> bool;
}

/// Receiver of queue interrupts
///
/// The source queue has already dequeued `process` when this is called.
/// Implementations decide which queue the process goes to next.
pub trait InterruptSink<P> {
    /// React to an interrupt raised by `source` for `process`
    fn handle_interrupt(&mut self, source: &mut Queue<P>, process: P, interrupt: Interrupt);

    /// A queue dropped a finished process
    ///
    /// Accounting only; no queue membership changes here.
    fn on_retired(&mut self, _source: QueueId, _pid: ProcessId) {}
}

/// Source of the current time in milliseconds
pub trait TimeSource {
    fn now(&self) -> u64;
}
