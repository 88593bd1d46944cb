/*
 * mlfq-sim: Multi-Level Feedback Queue Scheduler Simulator
 *
 * A simulated process scheduler: synthetic processes needing CPU time and
 * blocking (I/O) time are admitted, run in time-sliced bursts, demoted across
 * three priority levels and retired, all driven by a clock instead of real
 * concurrency.
 *
 * - scheduler: queues, interrupt handling and the dispatch loop
 * - utils: clocks and the logger used by the driver
 * - workload: seeded process generation
 * - cli: driver command line
 */

pub mod cli;
pub mod scheduler;
pub mod utils;
pub mod workload;

#[cfg(test)]
mod tests;

pub use scheduler::{
    Interrupt, Process, ProcessId, Queue, QueueId, QueueKind, SchedConfig, SchedError, Scheduler,
    SimProcess, TimeSource,
};
