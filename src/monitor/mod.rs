//! Resource monitor for a child process.
//!
//! Spawns a command, samples its CPU, memory, disk and scheduling counters at
//! a fixed interval until it exits, and returns the samples as a
//! `MonitorReport`. Nothing here touches the similarity engine; the monitored
//! command is usually the `tf-idf-similarity` binary itself.

#[cfg(target_os = "linux")]
pub mod procfs;
pub mod report;

use std::io;
use std::process::{Child, Command, ExitStatus};
use std::thread;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

pub use self::report::MonitorReport;

/// Kernel clock ticks per second used by `/proc` cpu times
const CLOCK_TICKS_PER_SEC: f64 = 100.0;

#[derive(Error, Debug)]
pub enum MonitorError {
    #[error("failed to spawn `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to sample process {pid}: {source}")]
    Sample {
        pid: u32,
        #[source]
        source: io::Error,
    },

    #[error("failed to wait for child process: {0}")]
    Wait(#[source] io::Error),

    #[error("process monitoring is not supported on this platform")]
    Unsupported,
}

/// Cumulative counters of a process at one instant
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProcessCounters {
    /// user + system time in clock ticks
    pub cpu_ticks: u64,
    pub rss_bytes: u64,
    pub read_bytes: Option<u64>,
    pub write_bytes: Option<u64>,
    pub threads: u64,
    pub voluntary_ctxt_switches: u64,
    pub involuntary_ctxt_switches: u64,
}

/// Source of process counters
pub trait ProcessSampler: Send {
    /// `Ok(None)` once the process no longer exists
    fn sample(&mut self, pid: u32) -> Result<Option<ProcessCounters>, MonitorError>;
}

/// Sampler for platforms without a process counter source
#[derive(Debug, Clone, Copy, Default)]
pub struct UnsupportedSampler;

impl ProcessSampler for UnsupportedSampler {
    fn sample(&mut self, _pid: u32) -> Result<Option<ProcessCounters>, MonitorError> {
        Err(MonitorError::Unsupported)
    }
}

/// One row of the report
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// time since spawn
    pub elapsed: Duration,
    /// CPU utilization over the last interval, 100% = one core
    pub cpu_percent: f64,
    pub rss_bytes: u64,
    pub read_bytes: Option<u64>,
    pub write_bytes: Option<u64>,
    pub threads: u64,
    /// voluntary + involuntary
    pub ctxt_switches: u64,
}

impl Sample {
    fn from_counters(
        elapsed: Duration,
        counters: &ProcessCounters,
        previous: Option<(&ProcessCounters, Duration)>,
    ) -> Self {
        let cpu_percent = match previous {
            Some((prev, prev_elapsed)) => {
                let wall = elapsed.saturating_sub(prev_elapsed).as_secs_f64();
                let ticks = counters.cpu_ticks.saturating_sub(prev.cpu_ticks) as f64;
                if wall > 0.0 {
                    ticks / CLOCK_TICKS_PER_SEC / wall * 100.0
                } else {
                    0.0
                }
            }
            None => 0.0,
        };
        Self {
            elapsed,
            cpu_percent,
            rss_bytes: counters.rss_bytes,
            read_bytes: counters.read_bytes,
            write_bytes: counters.write_bytes,
            threads: counters.threads,
            ctxt_switches: counters.voluntary_ctxt_switches + counters.involuntary_ctxt_switches,
        }
    }
}

pub struct Monitor {
    interval: Duration,
    sampler: Box<dyn ProcessSampler>,
}

impl Monitor {
    /// Monitor with the platform sampler
    pub fn new(interval: Duration) -> Self {
        #[cfg(target_os = "linux")]
        let sampler: Box<dyn ProcessSampler> = Box::new(procfs::ProcfsSampler::new());
        #[cfg(not(target_os = "linux"))]
        let sampler: Box<dyn ProcessSampler> = Box::new(UnsupportedSampler);
        Self::with_sampler(interval, sampler)
    }

    pub fn with_sampler(interval: Duration, sampler: Box<dyn ProcessSampler>) -> Self {
        Self { interval, sampler }
    }

    #[inline]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Spawn `command` and sample it every interval until it exits.
    ///
    /// The first row is taken right after spawning. If sampling or waiting
    /// fails the child is killed before the error is returned.
    pub fn run(&mut self, command: &mut Command) -> Result<MonitorReport, MonitorError> {
        let program = command.get_program().to_string_lossy().into_owned();
        let start = Instant::now();
        let mut child = command.spawn().map_err(|source| MonitorError::Spawn {
            program: program.clone(),
            source,
        })?;
        let pid = child.id();
        info!(pid, %program, interval_ms = self.interval.as_millis() as u64, "monitoring process");

        let mut samples = Vec::new();
        let status = match self.sample_until_exit(&mut child, start, &mut samples) {
            Ok(status) => status,
            Err(e) => {
                warn!(pid, error = %e, "monitoring failed, killing process");
                let _ = child.kill();
                let _ = child.wait();
                return Err(e);
            }
        };

        info!(pid, ?status, samples = samples.len(), "process exited");
        Ok(MonitorReport::new(program, samples, status.code(), start.elapsed()))
    }

    fn sample_until_exit(
        &mut self,
        child: &mut Child,
        start: Instant,
        samples: &mut Vec<Sample>,
    ) -> Result<ExitStatus, MonitorError> {
        let pid = child.id();
        let mut previous: Option<(ProcessCounters, Duration)> = None;
        loop {
            if let Some(status) = child.try_wait().map_err(MonitorError::Wait)? {
                return Ok(status);
            }
            let Some(counters) = self.sampler.sample(pid)? else {
                return child.wait().map_err(MonitorError::Wait);
            };
            let elapsed = start.elapsed();
            let sample = Sample::from_counters(
                elapsed,
                &counters,
                previous.as_ref().map(|(prev, at)| (prev, *at)),
            );
            debug!(?sample, "sampled process");
            samples.push(sample);
            previous = Some((counters, elapsed));
            thread::sleep(self.interval);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct ScriptedSampler {
        counters: Vec<ProcessCounters>,
    }

    impl ProcessSampler for ScriptedSampler {
        fn sample(&mut self, _pid: u32) -> Result<Option<ProcessCounters>, MonitorError> {
            if self.counters.is_empty() {
                Ok(None)
            } else {
                Ok(Some(self.counters.remove(0)))
            }
        }
    }

    #[test]
    fn cpu_percent_from_tick_delta() {
        let prev = ProcessCounters { cpu_ticks: 100, ..Default::default() };
        let now = ProcessCounters { cpu_ticks: 150, ..Default::default() };
        let sample = Sample::from_counters(
            Duration::from_secs(2),
            &now,
            Some((&prev, Duration::from_secs(1))),
        );
        assert!((sample.cpu_percent - 50.0).abs() < 1e-9);
    }

    #[test]
    fn first_sample_has_no_cpu_figure() {
        let now = ProcessCounters {
            cpu_ticks: 999,
            voluntary_ctxt_switches: 3,
            involuntary_ctxt_switches: 4,
            ..Default::default()
        };
        let sample = Sample::from_counters(Duration::from_millis(5), &now, None);
        assert_eq!(sample.cpu_percent, 0.0);
        assert_eq!(sample.ctxt_switches, 7);
    }

    #[cfg(unix)]
    #[test]
    fn stops_when_sampler_loses_the_process() {
        let sampler = ScriptedSampler {
            counters: vec![ProcessCounters { threads: 1, ..Default::default() }],
        };
        let mut monitor = Monitor::with_sampler(Duration::from_millis(10), Box::new(sampler));
        let report = monitor.run(Command::new("sleep").arg("0.2")).unwrap();
        assert_eq!(report.samples().len(), 1);
        assert_eq!(report.exit_code(), Some(0));
    }

    #[cfg(unix)]
    #[test]
    fn sampler_errors_kill_the_child() {
        let mut monitor = Monitor::with_sampler(Duration::from_millis(10), Box::new(UnsupportedSampler));
        let started = Instant::now();
        let err = monitor.run(Command::new("sleep").arg("5")).unwrap_err();
        assert!(matches!(err, MonitorError::Unsupported));
        assert!(started.elapsed() < Duration::from_secs(4));
    }

    #[test]
    fn missing_program_is_spawn_error() {
        let mut monitor = Monitor::new(Duration::from_millis(10));
        let err = monitor
            .run(&mut Command::new("definitely-not-a-real-program-to-monitor"))
            .unwrap_err();
        assert!(matches!(err, MonitorError::Spawn { .. }));
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn samples_a_real_child() {
        let mut monitor = Monitor::new(Duration::from_millis(50));
        let report = monitor.run(Command::new("sleep").arg("0.3")).unwrap();
        assert!(!report.samples().is_empty());
        assert_eq!(report.exit_code(), Some(0));
        assert!(report.to_string().contains("cpu%"));
    }
}
