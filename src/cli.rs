/*
 * Command Line Options
 *
 * Hand-rolled parser for the driver. Options only, no subcommands; see USAGE
 * for the list. Scheduler and workload settings are validated here so the
 * driver never starts a run with a bad configuration.
 */

use core::fmt;
use core::str::FromStr;

use crate::scheduler::{ConfigError, InterruptMask, PRIORITY_LEVELS, SchedConfig, SchedError};
use crate::utils::DEFAULT_TICK_MS;
use crate::workload::WorkloadConfig;

/// Parsed command
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Run(RunOptions),
    Help,
    Version,
}

/// Options of a simulation run
#[derive(Debug, Clone, PartialEq)]
pub struct RunOptions {
    pub workload: WorkloadConfig,
    pub sched: SchedConfig,
    /// Virtual clock step; ignored with `realtime`
    pub step_ms: u64,
    pub realtime: bool,
    pub trace: InterruptMask,
    /// -v count minus -q count
    pub verbosity: i8,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            workload: WorkloadConfig::default(),
            sched: SchedConfig::default(),
            step_ms: DEFAULT_TICK_MS,
            realtime: false,
            trace: InterruptMask::ALL,
            verbosity: 0,
        }
    }
}

/// CLI errors
#[derive(Debug, Clone, PartialEq)]
pub enum CliError {
    UnknownOption(String),
    MissingValue(&'static str),
    InvalidValue { option: &'static str, value: String },
    Config(ConfigError),
    Trace(SchedError),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::UnknownOption(option) => write!(f, "Unknown option: {}", option),
            CliError::MissingValue(option) => write!(f, "Missing value for {}", option),
            CliError::InvalidValue { option, value } => {
                write!(f, "Invalid value '{}' for {}", value, option)
            }
            CliError::Config(err) => write!(f, "Configuration error: {}", err),
            CliError::Trace(err) => write!(f, "Invalid trace filter: {}", err),
        }
    }
}

impl std::error::Error for CliError {}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        CliError::Config(err)
    }
}

pub const USAGE: &str = "\
Usage: mlfq-sim [OPTIONS]

Options:
  -n, --processes N          number of generated processes (default 10)
  -s, --seed S               workload seed
      --blocking-ratio R     share of processes with blocking need, 0..1
      --step MS              virtual clock step per iteration (default 10)
      --realtime             use the wall clock instead of the virtual one
      --quanta A,B,C         CPU quanta, shortest first
      --blocking-quantum Q   Blocking Queue quantum
      --trace KINDS          interrupt kinds to trace: all, none, or a list of
                             blocked, ready, lower
  -v, --verbose              more logging (repeatable)
  -q, --quiet                less logging (repeatable)
  -h, --help                 print this help
  -V, --version              print version";

/// Parse arguments, program name excluded
pub fn parse_args(args: &[&str]) -> Result<Command, CliError> {
    let mut options = RunOptions::default();
    let mut args = args.iter().copied();

    while let Some(arg) = args.next() {
        match arg {
            "-h" | "--help" => return Ok(Command::Help),
            "-V" | "--version" => return Ok(Command::Version),
            "-v" | "--verbose" => options.verbosity = options.verbosity.saturating_add(1),
            "-q" | "--quiet" => options.verbosity = options.verbosity.saturating_sub(1),
            "--realtime" => options.realtime = true,
            "-n" | "--processes" => {
                options.workload.count = parse_value("--processes", args.next())?;
            }
            "-s" | "--seed" => {
                options.workload.seed = parse_value("--seed", args.next())?;
            }
            "--blocking-ratio" => {
                options.workload.blocking_ratio = parse_value("--blocking-ratio", args.next())?;
            }
            "--step" => {
                let value = args.next();
                options.step_ms = parse_value("--step", value)?;
                // A zero step freezes the virtual clock and every burst gets 0 units
                if options.step_ms == 0 {
                    return Err(CliError::InvalidValue {
                        option: "--step",
                        value: value.unwrap_or_default().to_string(),
                    });
                }
            }
            "--quanta" => {
                options.sched.cpu_quanta = parse_quanta(args.next())?;
            }
            "--blocking-quantum" => {
                options.sched.blocking_quantum = parse_value("--blocking-quantum", args.next())?;
            }
            "--trace" => {
                let list = args.next().ok_or(CliError::MissingValue("--trace"))?;
                options.trace = InterruptMask::parse_list(list).map_err(CliError::Trace)?;
            }
            other => return Err(CliError::UnknownOption(other.to_string())),
        }
    }

    options.sched.validate()?;
    options.workload.validate()?;

    Ok(Command::Run(options))
}

fn parse_value<T: FromStr>(option: &'static str, value: Option<&str>) -> Result<T, CliError> {
    let value = value.ok_or(CliError::MissingValue(option))?;
    value.parse().map_err(|_| CliError::InvalidValue {
        option,
        value: value.to_string(),
    })
}

fn parse_quanta(value: Option<&str>) -> Result<[u64; PRIORITY_LEVELS], CliError> {
    let value = value.ok_or(CliError::MissingValue("--quanta"))?;
    let invalid = || CliError::InvalidValue {
        option: "--quanta",
        value: value.to_string(),
    };

    let quanta = value
        .split(',')
        .map(|part| part.trim().parse::<u64>().map_err(|_| invalid()))
        .collect::<Result<Vec<_>, _>>()?;

    quanta.try_into().map_err(|_| invalid())
}
