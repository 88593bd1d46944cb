/*
 * Scheduler Scenario Tests
 *
 * End-to-end checks of the dispatch loop: admission, the three interrupt
 * transitions, the demotion floor, Blocking Queue precedence and termination.
 * Every scenario runs on a TickClock so work times are exact.
 */

use crate::scheduler::{
    Interrupt, InterruptMask, PriorityLevel, Process, ProcessId, QueueId, SchedConfig, SchedError,
    Scheduler, SimProcess,
};
use crate::utils::TickClock;
use crate::workload::{self, WorkloadConfig};

type TestScheduler = Scheduler<SimProcess, TickClock>;

fn scheduler(step_ms: u64) -> TestScheduler {
    Scheduler::new(TickClock::new(step_ms))
}

fn level(index: usize) -> PriorityLevel {
    PriorityLevel::new(index).unwrap()
}

fn cpu(index: usize) -> QueueId {
    QueueId::Cpu(level(index))
}

fn head(scheduler: &TestScheduler, id: QueueId) -> &SimProcess {
    scheduler.queue(id).peek().expect("queue should not be empty")
}

#[test]
fn test_admission_placement() {
    let mut scheduler = scheduler(10);
    scheduler.add_new_process(SimProcess::new(1, 50, 0));
    scheduler.add_new_process(SimProcess::new(2, 50, 20));

    assert_eq!(scheduler.locate(ProcessId(1)), Some(cpu(0)));
    assert_eq!(scheduler.locate(ProcessId(2)), Some(QueueId::Blocking));
    assert_eq!(scheduler.len(), 2);
    assert!(!scheduler.all_queues_empty());
}

#[test]
fn test_short_process_retires_in_one_burst() {
    let mut scheduler = scheduler(10);
    scheduler.add_new_process(SimProcess::new(1, 5, 0));

    assert_eq!(scheduler.step(), Ok(Some(cpu(0))));

    assert!(scheduler.all_queues_empty());
    assert_eq!(scheduler.stats().retirement_order(), vec![ProcessId(1)]);
    assert_eq!(scheduler.stats().interrupts(), 0);
}

#[test]
fn test_expired_quantum_demotes() {
    let mut scheduler = scheduler(10);
    scheduler.add_new_process(SimProcess::new(1, 25, 0));

    scheduler.step().unwrap();

    assert_eq!(scheduler.locate(ProcessId(1)), Some(cpu(1)));
    assert_eq!(head(&scheduler, cpu(1)).cpu_time_remaining(), 15);

    let entry = scheduler.trace().entries().last().copied().unwrap();
    assert_eq!(entry.interrupt, Interrupt::LowerPriority);
    assert_eq!((entry.from, entry.to), (cpu(0), cpu(1)));
}

#[test]
fn test_finished_blocking_returns_to_top_level() {
    let mut scheduler = scheduler(50);
    scheduler.add_new_process(SimProcess::new(1, 40, 30));

    assert_eq!(scheduler.step(), Ok(Some(QueueId::Blocking)));

    assert_eq!(scheduler.locate(ProcessId(1)), Some(cpu(0)));
    let process = head(&scheduler, cpu(0));
    assert_eq!(process.blocking_time_remaining(), 0);
    assert_eq!(process.cpu_time_remaining(), 40);
    assert_eq!(scheduler.stats().ready, 1);
}

#[test]
fn test_blocking_queue_serviced_first() {
    let mut scheduler = scheduler(10);
    scheduler.add_new_process(SimProcess::new(1, 5, 0));
    scheduler.add_new_process(SimProcess::new(2, 40, 30));

    assert_eq!(scheduler.step(), Ok(Some(QueueId::Blocking)));

    assert_eq!(head(&scheduler, cpu(0)).cpu_time_remaining(), 5);
    assert_eq!(head(&scheduler, QueueId::Blocking).blocking_time_remaining(), 20);
    assert_eq!(scheduler.stats().cpu_dispatches, [0, 0, 0]);
}

#[test]
fn test_levels_are_strict() {
    let mut scheduler = scheduler(10);
    scheduler.add_new_process(SimProcess::new(1, 100, 0));
    scheduler.step().unwrap();
    assert_eq!(scheduler.locate(ProcessId(1)), Some(cpu(1)));

    scheduler.add_new_process(SimProcess::new(2, 100, 0));
    assert_eq!(scheduler.step(), Ok(Some(cpu(0))));

    assert_eq!(head(&scheduler, cpu(1)).pid(), ProcessId(1));
    assert_eq!(head(&scheduler, cpu(1)).cpu_time_remaining(), 90);
}

#[test]
fn test_demotion_stops_at_lowest_level() {
    let mut scheduler = scheduler(100);
    scheduler.add_new_process(SimProcess::new(1, 200, 0));

    let mut locations = Vec::new();
    while !scheduler.all_queues_empty() {
        scheduler.step().unwrap();
        locations.push(scheduler.locate(ProcessId(1)));
    }

    assert_eq!(
        locations,
        vec![Some(cpu(1)), Some(cpu(2)), Some(cpu(2)), Some(cpu(2)), Some(cpu(2)), None]
    );
    assert_eq!(scheduler.stats().cpu_dispatches, [1, 1, 4]);
}

#[test]
fn test_cpu_burst_then_blocking_cycle() {
    let mut scheduler = scheduler(10);

    // Drop a process that still needs I/O into CPU level 1
    scheduler.handle_interrupt(cpu(0), SimProcess::new(1, 5, 20), Interrupt::LowerPriority);
    assert_eq!(scheduler.locate(ProcessId(1)), Some(cpu(1)));

    assert_eq!(scheduler.step(), Ok(Some(cpu(1))));
    assert_eq!(scheduler.locate(ProcessId(1)), Some(QueueId::Blocking));

    assert_eq!(scheduler.step(), Ok(Some(QueueId::Blocking)));
    assert_eq!(scheduler.locate(ProcessId(1)), Some(QueueId::Blocking));

    assert_eq!(scheduler.step(), Ok(Some(QueueId::Blocking)));
    assert_eq!(scheduler.locate(ProcessId(1)), Some(cpu(0)));

    assert_eq!(scheduler.step(), Ok(Some(cpu(0))));
    assert!(scheduler.all_queues_empty());

    let stats = scheduler.stats();
    assert_eq!((stats.blocked, stats.ready, stats.lowered), (1, 1, 2));
    assert_eq!(stats.retirement_order(), vec![ProcessId(1)]);
}

#[test]
fn test_ready_for_process_still_in_source() {
    let mut scheduler = scheduler(10);
    scheduler.add_new_process(SimProcess::new(1, 50, 0));

    scheduler.handle_interrupt(cpu(0), SimProcess::new(1, 50, 0), Interrupt::ProcessReady);

    assert_eq!(scheduler.locate(ProcessId(1)), Some(cpu(1)));
    assert_eq!(scheduler.len(), 1);
}

#[test]
fn test_ready_at_lowest_level_stays() {
    let mut scheduler = scheduler(10);
    scheduler.handle_interrupt(cpu(1), SimProcess::new(1, 500, 0), Interrupt::LowerPriority);
    assert_eq!(scheduler.locate(ProcessId(1)), Some(cpu(2)));

    scheduler.handle_interrupt(cpu(2), SimProcess::new(1, 500, 0), Interrupt::ProcessReady);

    assert_eq!(scheduler.locate(ProcessId(1)), Some(cpu(2)));
    assert_eq!(scheduler.len(), 1);
}

#[test]
fn test_ready_for_absent_process_is_readmitted() {
    let mut scheduler = scheduler(10);

    scheduler.handle_interrupt(cpu(2), SimProcess::new(1, 50, 0), Interrupt::ProcessReady);
    scheduler.handle_interrupt(cpu(1), SimProcess::new(2, 50, 10), Interrupt::ProcessReady);

    assert_eq!(scheduler.locate(ProcessId(1)), Some(cpu(0)));
    assert_eq!(scheduler.locate(ProcessId(2)), Some(QueueId::Blocking));
}

#[test]
fn test_ready_for_process_still_in_blocking_is_readmitted() {
    let mut scheduler = scheduler(10);
    scheduler.add_new_process(SimProcess::new(1, 50, 20));
    assert_eq!(scheduler.locate(ProcessId(1)), Some(QueueId::Blocking));

    scheduler.handle_interrupt(QueueId::Blocking, SimProcess::new(1, 50, 0), Interrupt::ProcessReady);

    assert_eq!(scheduler.locate(ProcessId(1)), Some(cpu(0)));
    assert!(scheduler.blocking_queue().is_empty());
    assert_eq!(scheduler.len(), 1);
}

#[test]
fn test_zero_work_time_grants_nothing() {
    let mut scheduler = scheduler(0);
    scheduler.add_new_process(SimProcess::new(1, 25, 0));

    assert_eq!(scheduler.step(), Ok(Some(cpu(0))));

    assert_eq!(scheduler.locate(ProcessId(1)), Some(cpu(0)));
    assert_eq!(head(&scheduler, cpu(0)).cpu_time_remaining(), 25);
    assert_eq!(scheduler.stats().ready, 1);
}

#[test]
fn test_idle_step_on_empty_scheduler() {
    let mut scheduler = scheduler(10);
    assert_eq!(scheduler.step(), Ok(None));
    assert_eq!(scheduler.stats().idle_iterations, 1);
    assert_eq!(scheduler.run().unwrap().iterations, 1);
}

#[test]
fn test_generated_workload_terminates() {
    let config = WorkloadConfig { count: 25, seed: 42, ..WorkloadConfig::default() };
    let processes = workload::generate(&config).unwrap();
    let mut scheduler = scheduler(10);
    for process in processes {
        scheduler.add_new_process(process);
    }

    let stats = scheduler.run().unwrap();

    assert_eq!(stats.retired(), 25);
    let mut retired = stats.retirement_order();
    retired.sort();
    assert_eq!(retired, (1..=25).map(ProcessId).collect::<Vec<_>>());
    assert!(scheduler.all_queues_empty());
}

#[test]
fn test_membership_holds_every_step() {
    let config = WorkloadConfig { count: 15, seed: 3, blocking_ratio: 0.6, ..WorkloadConfig::default() };
    let mut scheduler = scheduler(10);
    for process in workload::generate(&config).unwrap() {
        scheduler.add_new_process(process);
    }

    while !scheduler.all_queues_empty() {
        scheduler.step().unwrap();
        assert_eq!(scheduler.check_membership(), Ok(()));
        assert_eq!(scheduler.len() + scheduler.stats().retired(), 15);
    }
}

#[test]
fn test_trace_mask() {
    let mut scheduler = scheduler(10);
    scheduler.set_trace_mask(InterruptMask::BLOCKED);
    scheduler.add_new_process(SimProcess::new(1, 100, 0));

    scheduler.step().unwrap();

    assert_eq!(scheduler.stats().lowered, 1);
    assert!(scheduler.trace().is_empty());
}

#[test]
fn test_custom_quanta() {
    let config = SchedConfig { cpu_quanta: [5, 15, 40], blocking_quantum: 20 };
    let mut scheduler: TestScheduler =
        Scheduler::with_config(config, TickClock::new(100)).unwrap();
    scheduler.add_new_process(SimProcess::new(1, 30, 0));

    scheduler.step().unwrap();

    assert_eq!(head(&scheduler, cpu(1)).cpu_time_remaining(), 25);
    assert_eq!(scheduler.cpu_queue(level(1)).quantum(), 15);
    assert_eq!(scheduler.blocking_queue().quantum(), 20);
}

#[test]
fn test_rejects_invalid_config() {
    let config = SchedConfig { cpu_quanta: [0, 15, 40], blocking_quantum: 20 };
    assert!(TestScheduler::with_config(config, TickClock::default()).is_err());
}

#[cfg(debug_assertions)]
#[test]
#[should_panic]
fn test_duplicate_admission_is_caught() {
    let mut scheduler = scheduler(10);
    scheduler.add_new_process(SimProcess::new(1, 10, 0));
    scheduler.add_new_process(SimProcess::new(1, 10, 5));
}

#[test]
fn test_duplicate_error_message() {
    let err = SchedError::DuplicateMembership(ProcessId(4));
    assert_eq!(err.to_string(), "pid 4 is a member of more than one queue");
}
