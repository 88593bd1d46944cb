/*
 * Interrupt Handler
 *
 * This module holds the transition rules of the MLFQ and the table of queues
 * they operate on.
 *
 * TRANSITIONS:
 * ============
 *
 * PROCESS_BLOCKED  -> Blocking Queue
 *
 * PROCESS_READY    -> still queued in a CPU source: one level down (floor: stay)
 *                  -> otherwise: admitted again (blocking need -> Blocking
 *                     Queue, else CPU level 0)
 *
 * LOWER_PRIORITY   -> Blocking source: back onto the Blocking Queue
 *                  -> CPU source: one level down (floor: stay)
 *
 * Before routing, the handler removes the process from its source queue if it
 * is still there, so a process is never queued twice.
 *
 * While a queue is serviced it is detached from the table and passed to the
 * handler as `source`. Any transition targeting the source queue lands in it
 * directly; the rest of the table is reachable through `queues`.
 */

use super::{
    events::Interrupt,
    queue::Queue,
    stats::SchedStats,
    trace::{InterruptTrace, TraceEntry},
    traits::{InterruptSink, Process},
    types::{PRIORITY_LEVELS, PriorityLevel, ProcessId, QueueId, SchedConfig},
};

/// Queue a freshly admitted process starts in
pub fn admission_target<P: Process>(process: &P) -> QueueId {
    if process.needs_blocking() {
        QueueId::Blocking
    } else {
        QueueId::Cpu(PriorityLevel::HIGHEST)
    }
}

/// Queue a process goes to after `interrupt` was raised by `source`
///
/// `was_present` tells whether the process was still queued in `source` when
/// the interrupt arrived.
pub fn interrupt_target<P: Process>(
    source: QueueId,
    process: &P,
    interrupt: Interrupt,
    was_present: bool,
) -> QueueId {
    match interrupt {
        Interrupt::ProcessBlocked => QueueId::Blocking,

        Interrupt::ProcessReady => match (was_present, source) {
            (true, QueueId::Cpu(level)) => QueueId::Cpu(level.lower_or_floor()),
            // The Blocking Queue has no priority level to step down from, so a
            // process still queued there is admitted again instead of landing
            // in cpu[1].
            _ => admission_target(process),
        },

        Interrupt::LowerPriority => match source {
            QueueId::Blocking => QueueId::Blocking,
            QueueId::Cpu(level) => QueueId::Cpu(level.lower_or_floor()),
        },
    }
}

/// The Blocking Queue plus one CPU queue per priority level
#[derive(Debug)]
pub struct RunQueues<P> {
    blocking: Queue<P>,
    cpu: [Queue<P>; PRIORITY_LEVELS],
}

impl<P> RunQueues<P> {
    pub fn new(config: &SchedConfig) -> Self {
        Self {
            blocking: Queue::new(QueueId::Blocking, config.blocking_quantum),
            cpu: core::array::from_fn(|index| {
                let level = PriorityLevel::new(index).unwrap_or(PriorityLevel::LOWEST);
                Queue::new(QueueId::Cpu(level), config.cpu_quantum(level))
            }),
        }
    }

    pub fn get(&self, id: QueueId) -> &Queue<P> {
        match id {
            QueueId::Blocking => &self.blocking,
            QueueId::Cpu(level) => &self.cpu[level.index()],
        }
    }

    pub fn get_mut(&mut self, id: QueueId) -> &mut Queue<P> {
        match id {
            QueueId::Blocking => &mut self.blocking,
            QueueId::Cpu(level) => &mut self.cpu[level.index()],
        }
    }

    pub fn blocking(&self) -> &Queue<P> {
        &self.blocking
    }

    pub fn cpu(&self, level: PriorityLevel) -> &Queue<P> {
        &self.cpu[level.index()]
    }

    /// All queues, Blocking Queue first, then CPU levels highest first
    pub fn iter(&self) -> impl Iterator<Item = &Queue<P>> {
        core::iter::once(&self.blocking).chain(self.cpu.iter())
    }

    pub fn all_empty(&self) -> bool {
        self.iter().all(Queue::is_empty)
    }

    /// First non-empty CPU level, highest priority first
    pub fn first_ready_level(&self) -> Option<PriorityLevel> {
        PriorityLevel::all().find(|&level| !self.cpu(level).is_empty())
    }

    /// Take a queue out of the table, leaving an empty stand-in
    pub fn detach(&mut self, id: QueueId) -> Queue<P> {
        let slot = self.get_mut(id);
        let stand_in = Queue::new(id, slot.quantum());
        core::mem::replace(slot, stand_in)
    }

    /// Put a detached queue back
    ///
    /// Anything that reached the stand-in meanwhile is kept, behind the
    /// queue's own members.
    pub fn attach(&mut self, mut queue: Queue<P>) {
        let slot = self.get_mut(queue.id());
        queue.append(slot);
        *slot = queue;
    }
}

/// InterruptSink that applies the transition rules to a RunQueues table
pub struct InterruptHandler<'a, P> {
    queues: &'a mut RunQueues<P>,
    stats: &'a mut SchedStats,
    trace: &'a mut InterruptTrace,
    /// Scheduler clock, for accounting
    now: u64,
}

impl<'a, P> InterruptHandler<'a, P> {
    pub fn new(
        queues: &'a mut RunQueues<P>,
        stats: &'a mut SchedStats,
        trace: &'a mut InterruptTrace,
        now: u64,
    ) -> Self {
        Self { queues, stats, trace, now }
    }
}

impl<P: Process> InterruptSink<P> for InterruptHandler<'_, P> {
    fn handle_interrupt(&mut self, source: &mut Queue<P>, process: P, interrupt: Interrupt) {
        let pid = process.pid();
        let from = source.id();

        let was_present = source.remove(pid).is_some();
        if was_present {
            log::debug!("[{}] {} was still queued, removed before routing", from, pid);
        }

        let to = interrupt_target(from, &process, interrupt, was_present);

        log::debug!("[{}] {} {} -> {}", from, pid, interrupt, to);

        self.stats.record_interrupt(interrupt);
        self.trace.record(TraceEntry {
            at: self.now,
            pid,
            interrupt,
            from,
            to,
        });

        if to == from {
            source.enqueue(process);
        } else {
            self.queues.get_mut(to).enqueue(process);
        }
    }

    fn on_retired(&mut self, _source: QueueId, pid: ProcessId) {
        self.stats.record_completion(pid, self.now);
    }
}
