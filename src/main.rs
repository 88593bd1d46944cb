/*
 * mlfq-sim Driver
 *
 * Generates a workload, admits it into an MLFQ scheduler, runs the scheduler
 * until every queue is empty and prints what happened.
 */

use std::process::ExitCode;

use mlfq_sim::{
    Scheduler, SimProcess, TimeSource,
    cli::{self, Command, RunOptions},
    scheduler::{PriorityLevel, SchedStats},
    utils::{self, SystemClock, TickClock},
    workload,
};

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let args: Vec<&str> = args.iter().map(String::as_str).collect();

    let options = match cli::parse_args(&args) {
        Ok(Command::Run(options)) => options,
        Ok(Command::Help) => {
            println!("{}", cli::USAGE);
            return ExitCode::SUCCESS;
        }
        Ok(Command::Version) => {
            println!("mlfq-sim {}", env!("CARGO_PKG_VERSION"));
            return ExitCode::SUCCESS;
        }
        Err(err) => {
            eprintln!("{}", err);
            eprintln!("{}", cli::USAGE);
            return ExitCode::from(2);
        }
    };

    if let Err(err) = utils::init(utils::level_for_verbosity(options.verbosity)) {
        eprintln!("Logger already installed: {}", err);
    }

    let result = if options.realtime {
        simulate(&options, SystemClock::new())
    } else {
        simulate(&options, TickClock::new(options.step_ms))
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{}", err);
            ExitCode::FAILURE
        }
    }
}

fn simulate<C: TimeSource>(
    options: &RunOptions,
    clock: C,
) -> Result<(), Box<dyn std::error::Error>> {
    let processes = workload::generate(&options.workload)?;
    let mut scheduler: Scheduler<SimProcess, C> =
        Scheduler::with_config(options.sched.clone(), clock)?;
    scheduler.set_trace_mask(options.trace);

    println!("Workload (seed {}):", options.workload.seed);
    for process in &processes {
        println!("  {}", process);
    }

    for process in processes {
        scheduler.add_new_process(process);
    }

    scheduler.run()?;

    print_stats(scheduler.stats());
    print_trace(&scheduler);

    Ok(())
}

fn print_stats(stats: &SchedStats) {
    println!();
    println!("Iterations:          {}", stats.iterations);
    println!("Blocking dispatches: {}", stats.blocking_dispatches);
    for level in PriorityLevel::all() {
        println!("CPU[{}] dispatches:   {}", level, stats.cpu_dispatches[level.index()]);
    }
    println!(
        "Interrupts:          {} blocked, {} ready, {} lower-priority",
        stats.blocked, stats.ready, stats.lowered
    );

    println!();
    println!("Retirement order:");
    for completion in &stats.completions {
        println!("  t={:>6}  {}", completion.at, completion.pid);
    }
}

fn print_trace<C>(scheduler: &Scheduler<SimProcess, C>) {
    let trace = scheduler.trace();
    if trace.is_empty() {
        return;
    }

    println!();
    println!(
        "Interrupt trace (last {} of {}):",
        trace.len(),
        trace.len() as u64 + trace.dropped()
    );
    for entry in trace.entries() {
        println!(
            "  t={:>6}  {:<8} {:<16} {} -> {}",
            entry.at,
            entry.pid.to_string(),
            entry.interrupt.as_str(),
            entry.from,
            entry.to
        );
    }
}
