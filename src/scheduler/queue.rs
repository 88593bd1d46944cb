/*
 * Scheduling Queues
 *
 * A Queue is a FIFO of processes with a fixed quantum. CPU queues hold one
 * priority level each; the single Blocking Queue runs simulated I/O.
 *
 * Servicing a queue works on its head process only:
 * 1. Dequeue the head
 * 2. Grant it min(time, quantum) units of work
 * 3. Raise an interrupt to the sink (or drop the process if it finished)
 *
 * The serviced process is never left in the queue; only the interrupt
 * decides where it goes next.
 */

use std::collections::VecDeque;

use super::{
    error::SchedError,
    events::Interrupt,
    traits::{InterruptSink, Process},
    types::{PriorityLevel, ProcessId, QueueId, QueueKind},
};

/// FIFO of processes sharing a quantum
#[derive(Debug)]
pub struct Queue<P> {
    /// Which queue this is (kind and level)
    id: QueueId,

    /// Maximum units granted per dispatch
    quantum: u64,

    /// Members in dispatch order
    processes: VecDeque<P>,
}

impl<P> Queue<P> {
    /// Create an empty queue
    pub fn new(id: QueueId, quantum: u64) -> Self {
        Self {
            id,
            quantum,
            processes: VecDeque::new(),
        }
    }

    pub fn id(&self) -> QueueId {
        self.id
    }

    pub fn quantum(&self) -> u64 {
        self.quantum
    }

    pub fn queue_type(&self) -> QueueKind {
        self.id.kind()
    }

    /// Priority level, None for the Blocking Queue
    pub fn priority_level(&self) -> Option<PriorityLevel> {
        self.id.priority_level()
    }

    /// Append a process at the tail
    pub fn enqueue(&mut self, process: P) {
        self.processes.push_back(process);
    }

    /// Remove and return the head
    pub fn dequeue(&mut self) -> Result<P, SchedError> {
        self.processes
            .pop_front()
            .ok_or(SchedError::EmptyQueueAccess(self.id))
    }

    /// Head process, if any
    pub fn peek(&self) -> Option<&P> {
        self.processes.front()
    }

    pub fn is_empty(&self) -> bool {
        self.processes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.processes.len()
    }

    /// Members in dispatch order
    pub fn iter(&self) -> impl Iterator<Item = &P> {
        self.processes.iter()
    }

    /// Move all members of `other` behind ours
    pub(super) fn append(&mut self, other: &mut Queue<P>) {
        self.processes.append(&mut other.processes);
    }

    /// Units granted for a dispatch with `time` available
    fn grant(&self, time: u64) -> u64 {
        time.min(self.quantum)
    }

    fn expect_kind(&self, expected: QueueKind) -> Result<(), SchedError> {
        if self.queue_type() == expected {
            Ok(())
        } else {
            Err(SchedError::WrongQueueKind { queue: self.id, expected })
        }
    }
}

impl<P: Process> Queue<P> {
    /// Whether a process with `pid` is queued here
    pub fn contains(&self, pid: ProcessId) -> bool {
        self.processes.iter().any(|process| process.pid() == pid)
    }

    /// Remove the process with `pid`, if present
    pub fn remove(&mut self, pid: ProcessId) -> Option<P> {
        let index = self.processes.iter().position(|process| process.pid() == pid)?;
        self.processes.remove(index)
    }

    /// Identifiers of all members in dispatch order
    pub fn pids(&self) -> Vec<ProcessId> {
        self.processes.iter().map(Process::pid).collect()
    }

    /// Run one blocking burst on the head process
    ///
    /// Raises ProcessReady once the blocking need is gone, LowerPriority if the
    /// quantum ran out first.
    pub fn do_blocking_work(
        &mut self,
        time: u64,
        sink: &mut dyn InterruptSink<P>,
    ) -> Result<(), SchedError> {
        self.expect_kind(QueueKind::Blocking)?;

        let mut process = self.dequeue()?;
        let units = self.grant(time);
        let finished = process.perform_blocking_work(units);

        log::trace!("[{}] {} blocked for {} units", self.id, process.pid(), units);

        let interrupt = if finished {
            Interrupt::ProcessReady
        } else {
            Interrupt::LowerPriority
        };
        sink.handle_interrupt(self, process, interrupt);

        Ok(())
    }

    /// Run one CPU burst on the head process
    ///
    /// Outcomes are checked in this order:
    /// 1. CPU need done, blocking need left: ProcessBlocked
    /// 2. CPU need done: the process is dropped
    /// 3. Whole quantum used: LowerPriority
    /// 4. Otherwise: ProcessReady
    pub fn do_cpu_work(
        &mut self,
        time: u64,
        sink: &mut dyn InterruptSink<P>,
    ) -> Result<(), SchedError> {
        self.expect_kind(QueueKind::Cpu)?;

        let mut process = self.dequeue()?;
        let units = self.grant(time);
        let finished = process.perform_cpu_work(units);
        let pid = process.pid();

        log::trace!("[{}] {} ran for {} units", self.id, pid, units);

        if finished && process.needs_blocking() {
            sink.handle_interrupt(self, process, Interrupt::ProcessBlocked);
        } else if finished {
            log::debug!("[{}] {} finished, retiring", self.id, pid);
            drop(process);
            sink.on_retired(self.id, pid);
        } else if units == self.quantum {
            sink.handle_interrupt(self, process, Interrupt::LowerPriority);
        } else {
            sink.handle_interrupt(self, process, Interrupt::ProcessReady);
        }

        Ok(())
    }
}
