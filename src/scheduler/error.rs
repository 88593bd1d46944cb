/*
 * Scheduler Errors
 *
 * Every variant here is a programming error in the caller or a broken
 * invariant, never a condition the simulation retries.
 */

use core::fmt;

use super::types::{PriorityLevel, ProcessId, QueueId, QueueKind};

/// Scheduler error types
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchedError {
    /// Dequeue or work requested on an empty queue
    EmptyQueueAccess(QueueId),
    /// CPU work on the Blocking Queue, or blocking work on a CPU queue
    WrongQueueKind { queue: QueueId, expected: QueueKind },
    /// A process was found in more than one queue
    DuplicateMembership(ProcessId),
    /// Interrupt token outside the recognized set
    UnknownInterruptKind(String),
}

impl fmt::Display for SchedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchedError::EmptyQueueAccess(queue) => write!(f, "Queue {} is empty", queue),
            SchedError::WrongQueueKind { queue, expected } => {
                write!(f, "Queue {} is not a {}", queue, expected.name())
            }
            SchedError::DuplicateMembership(pid) => {
                write!(f, "{} is a member of more than one queue", pid)
            }
            SchedError::UnknownInterruptKind(token) => {
                write!(f, "Unknown interrupt kind '{}'", token)
            }
        }
    }
}

impl std::error::Error for SchedError {}

/// Configuration error types
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A queue was given a zero quantum
    ZeroQuantum(QueueId),
    /// CPU quantum at `level` is not larger than the one above it
    QuantaNotIncreasing { level: PriorityLevel },
    /// Workload range with start > end
    EmptyRange(&'static str),
    /// Blocking ratio outside [0, 1]
    InvalidRatio,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ZeroQuantum(queue) => write!(f, "Queue {} has a zero quantum", queue),
            ConfigError::QuantaNotIncreasing { level } => {
                write!(f, "CPU quantum of level {} must exceed the level above", level)
            }
            ConfigError::EmptyRange(what) => write!(f, "Empty {} range", what),
            ConfigError::InvalidRatio => write!(f, "Blocking ratio must be within 0.0..=1.0"),
        }
    }
}

impl std::error::Error for ConfigError {}
