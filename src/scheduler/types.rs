/*
 * Scheduler Type Definitions
 *
 * This module defines the core types used throughout the scheduler subsystem.
 * They are small, Copy-able and shared by the queues, the interrupt handler
 * and the dispatch loop.
 *
 * Priority levels are a checked type rather than a raw index: the only way to
 * move a process one level down is PriorityLevel::lower(), which refuses to go
 * past the last level.
 */

use core::fmt;

use super::error::ConfigError;

/// Number of CPU priority levels
pub const PRIORITY_LEVELS: usize = 3;

/// Default CPU quanta, shortest first (10 + 20 * level)
pub const DEFAULT_CPU_QUANTA: [u64; PRIORITY_LEVELS] = [10, 30, 50];

/// Default quantum of the Blocking Queue
pub const DEFAULT_BLOCKING_QUANTUM: u64 = 50;

/// Unique identifier for a simulated process
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ProcessId(pub usize);

impl ProcessId {
    /// Create a new ProcessId
    pub fn new(id: usize) -> Self {
        ProcessId(id)
    }

    /// Get the raw ID value
    pub fn as_usize(&self) -> usize {
        self.0
    }
}

impl fmt::Display for ProcessId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "pid {}", self.0)
    }
}

/// Priority level of a CPU queue
///
/// Level 0 is serviced first and has the shortest quantum. Values are always
/// in `0..PRIORITY_LEVELS`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PriorityLevel(u8);

impl PriorityLevel {
    /// Highest priority level
    pub const HIGHEST: PriorityLevel = PriorityLevel(0);

    /// Lowest priority level (the demotion floor)
    pub const LOWEST: PriorityLevel = PriorityLevel((PRIORITY_LEVELS - 1) as u8);

    /// Create a level, or None if it is out of range
    pub fn new(level: usize) -> Option<Self> {
        if level < PRIORITY_LEVELS {
            Some(PriorityLevel(level as u8))
        } else {
            None
        }
    }

    /// Next level down in priority, or None at the floor
    pub fn lower(self) -> Option<Self> {
        Self::new(self.index() + 1)
    }

    /// Next level down, staying put at the floor
    pub fn lower_or_floor(self) -> Self {
        self.lower().unwrap_or(self)
    }

    pub fn is_lowest(self) -> bool {
        self == Self::LOWEST
    }

    /// Get the level as a usize for indexing
    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// All levels, highest priority first
    pub fn all() -> impl Iterator<Item = PriorityLevel> {
        (0..PRIORITY_LEVELS).map(|level| PriorityLevel(level as u8))
    }
}

impl fmt::Display for PriorityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Kind of a queue, fixed at construction
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum QueueKind {
    /// Runs CPU bursts
    Cpu,

    /// Runs simulated I/O (blocking) bursts
    Blocking,
}

impl QueueKind {
    pub fn name(self) -> &'static str {
        match self {
            QueueKind::Cpu => "CPU_QUEUE",
            QueueKind::Blocking => "BLOCKING_QUEUE",
        }
    }
}

/// Identity of a queue inside one scheduler
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum QueueId {
    /// The single Blocking Queue
    Blocking,

    /// The CPU queue of a priority level
    Cpu(PriorityLevel),
}

impl QueueId {
    pub fn kind(self) -> QueueKind {
        match self {
            QueueId::Blocking => QueueKind::Blocking,
            QueueId::Cpu(_) => QueueKind::Cpu,
        }
    }

    /// Priority level, None for the Blocking Queue
    pub fn priority_level(self) -> Option<PriorityLevel> {
        match self {
            QueueId::Blocking => None,
            QueueId::Cpu(level) => Some(level),
        }
    }
}

impl fmt::Display for QueueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueueId::Blocking => write!(f, "blocking"),
            QueueId::Cpu(level) => write!(f, "cpu[{}]", level),
        }
    }
}

/// Scheduler configuration
///
/// CPU quanta must be positive and strictly increasing with the level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchedConfig {
    /// Quantum of each CPU level, index = priority level
    pub cpu_quanta: [u64; PRIORITY_LEVELS],

    /// Quantum of the Blocking Queue
    pub blocking_quantum: u64,
}

impl SchedConfig {
    /// Quantum of a CPU level
    pub fn cpu_quantum(&self, level: PriorityLevel) -> u64 {
        self.cpu_quanta[level.index()]
    }

    /// Quantum of any queue
    pub fn quantum(&self, id: QueueId) -> u64 {
        match id {
            QueueId::Blocking => self.blocking_quantum,
            QueueId::Cpu(level) => self.cpu_quantum(level),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.blocking_quantum == 0 {
            return Err(ConfigError::ZeroQuantum(QueueId::Blocking));
        }

        let mut previous = 0;
        for level in PriorityLevel::all() {
            let quantum = self.cpu_quantum(level);
            if quantum == 0 {
                return Err(ConfigError::ZeroQuantum(QueueId::Cpu(level)));
            }
            if quantum <= previous {
                return Err(ConfigError::QuantaNotIncreasing { level });
            }
            previous = quantum;
        }

        Ok(())
    }
}

impl Default for SchedConfig {
    fn default() -> Self {
        Self {
            cpu_quanta: DEFAULT_CPU_QUANTA,
            blocking_quantum: DEFAULT_BLOCKING_QUANTUM,
        }
    }
}
