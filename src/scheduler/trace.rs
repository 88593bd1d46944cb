/*
 * Interrupt Trace
 *
 * Fixed-size history of the queue transitions the interrupt handler made.
 * When the ring is full the oldest entry is overwritten and counted as
 * dropped. A mask selects which interrupt kinds get recorded at all.
 */

use heapless::Deque;

use super::{
    events::{Interrupt, InterruptMask},
    types::{ProcessId, QueueId},
};

/// Number of entries the trace keeps
pub const TRACE_CAPACITY: usize = 64;

/// One recorded transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraceEntry {
    /// Scheduler clock when the interrupt was handled
    pub at: u64,
    pub pid: ProcessId,
    pub interrupt: Interrupt,
    /// Queue that raised the interrupt
    pub from: QueueId,
    /// Queue the process was moved to
    pub to: QueueId,
}

/// Bounded interrupt history
#[derive(Debug)]
pub struct InterruptTrace {
    mask: InterruptMask,
    entries: Deque<TraceEntry, TRACE_CAPACITY>,
    dropped: u64,
}

impl InterruptTrace {
    pub fn new(mask: InterruptMask) -> Self {
        Self {
            mask,
            entries: Deque::new(),
            dropped: 0,
        }
    }

    pub fn mask(&self) -> InterruptMask {
        self.mask
    }

    pub fn set_mask(&mut self, mask: InterruptMask) {
        self.mask = mask;
    }

    /// Record an entry if its interrupt kind is enabled
    pub fn record(&mut self, entry: TraceEntry) {
        if !self.mask.allows(entry.interrupt) {
            return;
        }

        if self.entries.is_full() {
            self.entries.pop_front();
            self.dropped += 1;
        }

        // Cannot fail, a slot was freed above
        let _ = self.entries.push_back(entry);
    }

    /// Entries, oldest first
    pub fn entries(&self) -> impl Iterator<Item = &TraceEntry> {
        self.entries.iter()
    }

    /// Entries for one process, oldest first
    pub fn history(&self, pid: ProcessId) -> impl Iterator<Item = &TraceEntry> {
        self.entries.iter().filter(move |entry| entry.pid == pid)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries overwritten since creation
    pub fn dropped(&self) -> u64 {
        self.dropped
    }
}

impl Default for InterruptTrace {
    fn default() -> Self {
        Self::new(InterruptMask::ALL)
    }
}
