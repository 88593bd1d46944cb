/*
 * Scheduler Interrupt Definitions
 *
 * This module defines the interrupts a queue raises to its scheduler after
 * servicing a process. The scheduler reacts to each one by moving the process
 * to its next queue.
 *
 * A process that finishes its CPU need raises nothing: the queue drops it.
 */

use core::fmt;
use core::str::FromStr;

use bitflags::bitflags;

use super::error::SchedError;

/// Interrupts raised by a queue to the scheduler
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Interrupt {
    /// CPU burst done but blocking need outstanding
    ///
    /// The process moves to the Blocking Queue.
    ProcessBlocked,

    /// Blocking burst finished, or the process stopped before its quantum ran out
    ///
    /// The process re-enters CPU contention.
    ProcessReady,

    /// The process used its whole quantum without finishing
    ///
    /// CPU processes drop one level; blocking processes stay where they are.
    LowerPriority,
}

impl Interrupt {
    /// All interrupt kinds
    pub const ALL: [Interrupt; 3] = [
        Interrupt::ProcessBlocked,
        Interrupt::ProcessReady,
        Interrupt::LowerPriority,
    ];

    /// Stable token for logging and parsing
    pub fn as_str(self) -> &'static str {
        match self {
            Interrupt::ProcessBlocked => "PROCESS_BLOCKED",
            Interrupt::ProcessReady => "PROCESS_READY",
            Interrupt::LowerPriority => "LOWER_PRIORITY",
        }
    }

    /// Mask bit of this interrupt kind
    pub fn mask(self) -> InterruptMask {
        match self {
            Interrupt::ProcessBlocked => InterruptMask::BLOCKED,
            Interrupt::ProcessReady => InterruptMask::READY,
            Interrupt::LowerPriority => InterruptMask::LOWER_PRIORITY,
        }
    }
}

impl fmt::Display for Interrupt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Interrupt {
    type Err = SchedError;

    /// Accepts the full token or its short form (`blocked`, `ready`, `lower`)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "PROCESS_BLOCKED" | "BLOCKED" => Ok(Interrupt::ProcessBlocked),
            "PROCESS_READY" | "READY" => Ok(Interrupt::ProcessReady),
            "LOWER_PRIORITY" | "LOWER" => Ok(Interrupt::LowerPriority),
            _ => Err(SchedError::UnknownInterruptKind(s.to_string())),
        }
    }
}

bitflags! {
    /// Set of interrupt kinds
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct InterruptMask: u8 {
        const BLOCKED = 1;
        const READY = 1 << 1;
        const LOWER_PRIORITY = 1 << 2;
        const ALL = Self::BLOCKED.bits() | Self::READY.bits() | Self::LOWER_PRIORITY.bits();
    }
}

impl InterruptMask {
    pub fn allows(self, interrupt: Interrupt) -> bool {
        self.contains(interrupt.mask())
    }

    /// Parse a comma separated list of interrupt tokens, `all` or `none`
    pub fn parse_list(list: &str) -> Result<Self, SchedError> {
        match list.trim() {
            "all" => return Ok(InterruptMask::ALL),
            "none" | "" => return Ok(InterruptMask::empty()),
            _ => {}
        }

        list.split(',')
            .map(|token| token.trim().parse::<Interrupt>())
            .try_fold(InterruptMask::empty(), |mask, interrupt| Ok(mask | interrupt?.mask()))
    }
}
