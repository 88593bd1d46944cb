/*
 * Workload Generator
 *
 * Builds a reproducible set of SimProcesses from a seed. Every process gets a
 * random CPU need; a `blocking_ratio` share of them also gets a blocking need
 * and will therefore start in the Blocking Queue.
 */

use std::ops::RangeInclusive;

use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::scheduler::{ConfigError, SimProcess};

/// Parameters of a generated workload
#[derive(Debug, Clone, PartialEq)]
pub struct WorkloadConfig {
    /// Number of processes, pids 1..=count
    pub count: usize,

    /// RNG seed
    pub seed: u64,

    /// CPU need of every process
    pub cpu_time: RangeInclusive<u64>,

    /// Blocking need of blocking processes
    pub blocking_time: RangeInclusive<u64>,

    /// Share of processes that need blocking, 0.0..=1.0
    pub blocking_ratio: f64,
}

impl WorkloadConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cpu_time.is_empty() {
            return Err(ConfigError::EmptyRange("CPU time"));
        }
        if self.blocking_time.is_empty() {
            return Err(ConfigError::EmptyRange("blocking time"));
        }
        if !(0.0..=1.0).contains(&self.blocking_ratio) {
            return Err(ConfigError::InvalidRatio);
        }
        Ok(())
    }
}

impl Default for WorkloadConfig {
    fn default() -> Self {
        Self {
            count: 10,
            seed: 0x5eed,
            cpu_time: 1..=100,
            blocking_time: 1..=60,
            blocking_ratio: 0.4,
        }
    }
}

/// Generate the processes described by `config`
pub fn generate(config: &WorkloadConfig) -> Result<Vec<SimProcess>, ConfigError> {
    config.validate()?;

    let mut rng = StdRng::seed_from_u64(config.seed);
    let processes = (1..=config.count)
        .map(|pid| {
            let cpu_time = rng.gen_range(config.cpu_time.clone());
            let blocking_time = if rng.gen_bool(config.blocking_ratio) {
                rng.gen_range(config.blocking_time.clone())
            } else {
                0
            };
            SimProcess::new(pid, cpu_time, blocking_time)
        })
        .collect();

    Ok(processes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::Process;

    #[test]
    fn test_same_seed_same_workload() {
        let config = WorkloadConfig::default();
        assert_eq!(generate(&config).unwrap(), generate(&config).unwrap());
    }

    #[test]
    fn test_respects_ranges() {
        let config = WorkloadConfig {
            count: 50,
            cpu_time: 5..=8,
            blocking_time: 20..=30,
            ..WorkloadConfig::default()
        };

        let processes = generate(&config).unwrap();
        assert_eq!(processes.len(), 50);
        for (index, process) in processes.iter().enumerate() {
            assert_eq!(process.pid().as_usize(), index + 1);
            assert!((5..=8).contains(&process.cpu_time_remaining()));
            let blocking = process.blocking_time_remaining();
            assert!(blocking == 0 || (20..=30).contains(&blocking));
        }
    }

    #[test]
    fn test_ratio_extremes() {
        let none = WorkloadConfig { blocking_ratio: 0.0, ..WorkloadConfig::default() };
        assert!(generate(&none).unwrap().iter().all(|p| !p.needs_blocking()));

        let all = WorkloadConfig { blocking_ratio: 1.0, ..WorkloadConfig::default() };
        assert!(generate(&all).unwrap().iter().all(|p| p.needs_blocking()));
    }

    #[test]
    fn test_rejects_invalid_config() {
        #[allow(clippy::reversed_empty_ranges)]
        let config = WorkloadConfig { cpu_time: 10..=1, ..WorkloadConfig::default() };
        assert_eq!(generate(&config), Err(ConfigError::EmptyRange("CPU time")));

        let config = WorkloadConfig { blocking_ratio: 1.5, ..WorkloadConfig::default() };
        assert_eq!(generate(&config), Err(ConfigError::InvalidRatio));
    }
}
