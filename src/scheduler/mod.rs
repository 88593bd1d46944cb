/*
 * Multi-Level Feedback Queue Scheduler
 *
 * This module implements the dispatch loop of the simulated MLFQ scheduler.
 * Processes are counters of CPU and blocking (I/O) time; the scheduler grants
 * them time-sliced bursts driven by a clock, not by real concurrency.
 *
 * QUEUES:
 * =======
 *
 *   blocking  → simulated I/O, serviced before any CPU work
 *   cpu[0]    → highest priority, shortest quantum
 *   cpu[1]
 *   cpu[2]    → lowest priority, longest quantum (demotion floor)
 *
 * DISPATCH LOOP:
 * ==============
 *
 * Until every queue is empty:
 * 1. work_time = now - clock; clock = now
 * 2. Blocking Queue non-empty: one blocking burst, nothing else this round
 * 3. Otherwise: one CPU burst on the first non-empty CPU level
 *
 * Levels are strict: cpu[1] is only looked at once cpu[0] is empty. Demotion
 * through LOWER_PRIORITY interrupts is what lets the lower levels run.
 *
 * INTERRUPTS:
 * ===========
 *
 * Each burst ends with the queue raising PROCESS_BLOCKED, PROCESS_READY or
 * LOWER_PRIORITY to the scheduler (see handler.rs), or with the process
 * retiring. The transition is applied before the next iteration starts.
 *
 * Everything runs on one thread; every step completes synchronously.
 */

pub mod error;
pub mod events;
pub mod handler;
pub mod process;
pub mod queue;
pub mod stats;
pub mod trace;
pub mod traits;
pub mod types;

use std::collections::BTreeSet;

pub use error::{ConfigError, SchedError};
pub use events::{Interrupt, InterruptMask};
pub use handler::{InterruptHandler, RunQueues, admission_target, interrupt_target};
pub use process::SimProcess;
pub use queue::Queue;
pub use stats::{Completion, SchedStats};
pub use trace::{InterruptTrace, TRACE_CAPACITY, TraceEntry};
pub use traits::{InterruptSink, Process, TimeSource};
pub use types::{
    DEFAULT_BLOCKING_QUANTUM, DEFAULT_CPU_QUANTA, PRIORITY_LEVELS, PriorityLevel, ProcessId,
    QueueId, QueueKind, SchedConfig,
};

/// MLFQ scheduler over processes `P`, timed by `C`
pub struct Scheduler<P, C> {
    /// Time source for work-time computation
    clock: C,

    /// Clock reading at the start of the previous iteration
    last_tick: u64,

    /// Blocking Queue and CPU queues
    queues: RunQueues<P>,

    config: SchedConfig,
    stats: SchedStats,
    trace: InterruptTrace,
}

impl<P: Process, C: TimeSource> Scheduler<P, C> {
    /// Create a scheduler with the default quanta
    pub fn new(clock: C) -> Self {
        Self::build(SchedConfig::default(), clock)
    }

    /// Create a scheduler with custom quanta
    pub fn with_config(config: SchedConfig, clock: C) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(config, clock))
    }

    fn build(config: SchedConfig, clock: C) -> Self {
        let last_tick = clock.now();

        log::info!(
            "MLFQ scheduler initialized: {} CPU levels, quanta {:?}, blocking quantum {}",
            PRIORITY_LEVELS,
            config.cpu_quanta,
            config.blocking_quantum
        );

        Self {
            clock,
            last_tick,
            queues: RunQueues::new(&config),
            config,
            stats: SchedStats::default(),
            trace: InterruptTrace::default(),
        }
    }

    /// Admit a new process
    ///
    /// Processes with blocking need start in the Blocking Queue, all others in
    /// CPU level 0.
    pub fn add_new_process(&mut self, process: P) {
        let target = admission_target(&process);
        log::debug!("Admitting {} into {}", process.pid(), target);
        self.queues.get_mut(target).enqueue(process);
        self.debug_check_membership();
    }

    /// Run until every queue is empty
    pub fn run(&mut self) -> Result<&SchedStats, SchedError> {
        log::info!("Scheduler running with {} process(es)", self.len());

        while !self.all_queues_empty() {
            self.step()?;
        }

        log::info!(
            "All queues empty after {} iteration(s), {} process(es) retired",
            self.stats.iterations,
            self.stats.retired()
        );

        Ok(&self.stats)
    }

    /// One iteration of the dispatch loop
    ///
    /// Returns the queue that was serviced, or None if there was nothing to do.
    pub fn step(&mut self) -> Result<Option<QueueId>, SchedError> {
        let now = self.clock.now();
        let work_time = now.saturating_sub(self.last_tick);
        self.last_tick = now;
        self.stats.iterations += 1;

        let target = if !self.queues.blocking().is_empty() {
            Some(QueueId::Blocking)
        } else {
            self.queues.first_ready_level().map(QueueId::Cpu)
        };

        let Some(target) = target else {
            self.stats.idle_iterations += 1;
            return Ok(None);
        };

        log::trace!("Tick {}: servicing {} with {} units", now, target, work_time);

        match target {
            QueueId::Blocking => self.stats.blocking_dispatches += 1,
            QueueId::Cpu(level) => self.stats.record_cpu_dispatch(level),
        }

        self.service(target, work_time)?;
        self.debug_check_membership();

        Ok(Some(target))
    }

    /// Perform one burst on queue `id`, delivering its interrupt
    fn service(&mut self, id: QueueId, work_time: u64) -> Result<(), SchedError> {
        let mut source = self.queues.detach(id);

        let result = {
            let mut handler = InterruptHandler::new(
                &mut self.queues,
                &mut self.stats,
                &mut self.trace,
                self.last_tick,
            );
            match id {
                QueueId::Blocking => source.do_blocking_work(work_time, &mut handler),
                QueueId::Cpu(_) => source.do_cpu_work(work_time, &mut handler),
            }
        };

        self.queues.attach(source);
        result
    }

    /// Apply an interrupt for `process` as if raised by queue `source`
    ///
    /// If a process with the same id is still queued in `source`, it is
    /// removed first.
    pub fn handle_interrupt(&mut self, source: QueueId, process: P, interrupt: Interrupt) {
        let mut queue = self.queues.detach(source);
        {
            let mut handler = InterruptHandler::new(
                &mut self.queues,
                &mut self.stats,
                &mut self.trace,
                self.last_tick,
            );
            handler.handle_interrupt(&mut queue, process, interrupt);
        }
        self.queues.attach(queue);
        self.debug_check_membership();
    }

    /// True iff the Blocking Queue and every CPU queue are empty
    pub fn all_queues_empty(&self) -> bool {
        self.queues.all_empty()
    }

    /// Verify that no process is queued twice
    pub fn check_membership(&self) -> Result<(), SchedError> {
        let mut seen = BTreeSet::new();
        for queue in self.queues.iter() {
            for process in queue.iter() {
                if !seen.insert(process.pid()) {
                    return Err(SchedError::DuplicateMembership(process.pid()));
                }
            }
        }
        Ok(())
    }

    fn debug_check_membership(&self) {
        debug_assert_eq!(self.check_membership(), Ok(()));
    }

    /// Queue currently holding `pid`, if any
    pub fn locate(&self, pid: ProcessId) -> Option<QueueId> {
        self.queues
            .iter()
            .find(|queue| queue.contains(pid))
            .map(Queue::id)
    }
}

impl<P, C> Scheduler<P, C> {
    /// Blocking Queue (read-only)
    pub fn blocking_queue(&self) -> &Queue<P> {
        self.queues.blocking()
    }

    /// CPU queue of a priority level (read-only)
    pub fn cpu_queue(&self, level: PriorityLevel) -> &Queue<P> {
        self.queues.cpu(level)
    }

    /// Any queue by id (read-only)
    pub fn queue(&self, id: QueueId) -> &Queue<P> {
        self.queues.get(id)
    }

    /// Processes queued anywhere
    pub fn len(&self) -> usize {
        self.queues.iter().map(Queue::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn config(&self) -> &SchedConfig {
        &self.config
    }

    pub fn stats(&self) -> &SchedStats {
        &self.stats
    }

    pub fn trace(&self) -> &InterruptTrace {
        &self.trace
    }

    /// Select which interrupt kinds the trace records
    pub fn set_trace_mask(&mut self, mask: InterruptMask) {
        self.trace.set_mask(mask);
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }
}
