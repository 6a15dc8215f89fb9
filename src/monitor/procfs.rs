//! `/proc` based sampler for Linux.

use std::fs;
use std::io;

use super::{MonitorError, ProcessCounters, ProcessSampler};

/// Reads `/proc/<pid>/{stat,status,io}`
#[derive(Debug, Clone)]
pub struct ProcfsSampler {
    root: String,
}

impl ProcfsSampler {
    pub fn new() -> Self {
        Self {
            root: "/proc".to_string(),
        }
    }

    fn read(&self, pid: u32, file: &str) -> io::Result<String> {
        fs::read_to_string(format!("{}/{pid}/{file}", self.root))
    }
}

impl Default for ProcfsSampler {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessSampler for ProcfsSampler {
    fn sample(&mut self, pid: u32) -> Result<Option<ProcessCounters>, MonitorError> {
        let sample_err = |source: io::Error| MonitorError::Sample { pid, source };

        let stat = match self.read(pid, "stat") {
            Ok(stat) => stat,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(sample_err(e)),
        };
        let status = match self.read(pid, "status") {
            Ok(status) => status,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(sample_err(e)),
        };
        // io needs ptrace access; missing it only loses the disk columns
        let io = self.read(pid, "io").ok();

        let cpu_ticks = parse_stat_cpu_ticks(&stat).ok_or_else(|| {
            sample_err(io::Error::new(io::ErrorKind::InvalidData, "malformed stat"))
        })?;
        let status = parse_status(&status);
        let (read_bytes, write_bytes) = io.as_deref().map(parse_io).unwrap_or((None, None));

        Ok(Some(ProcessCounters {
            cpu_ticks,
            rss_bytes: status.rss_bytes,
            read_bytes,
            write_bytes,
            threads: status.threads,
            voluntary_ctxt_switches: status.voluntary_ctxt_switches,
            involuntary_ctxt_switches: status.involuntary_ctxt_switches,
        }))
    }
}

/// utime + stime from `/proc/<pid>/stat`.
/// The command name may contain spaces and parentheses, so fields are
/// counted from the last `)`.
pub(crate) fn parse_stat_cpu_ticks(stat: &str) -> Option<u64> {
    let rest = &stat[stat.rfind(')')? + 1..];
    let fields: Vec<&str> = rest.split_whitespace().collect();
    // fields[0] is field 3 (state); utime is field 14, stime field 15
    let utime: u64 = fields.get(11)?.parse().ok()?;
    let stime: u64 = fields.get(12)?.parse().ok()?;
    Some(utime + stime)
}

#[derive(Debug, Default, PartialEq, Eq)]
pub(crate) struct StatusFields {
    pub rss_bytes: u64,
    pub threads: u64,
    pub voluntary_ctxt_switches: u64,
    pub involuntary_ctxt_switches: u64,
}

pub(crate) fn parse_status(status: &str) -> StatusFields {
    let mut fields = StatusFields::default();
    for line in status.lines() {
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let number = value
            .split_whitespace()
            .next()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(0);
        match key.trim() {
            "VmRSS" => fields.rss_bytes = number * 1024,
            "Threads" => fields.threads = number,
            "voluntary_ctxt_switches" => fields.voluntary_ctxt_switches = number,
            "nonvoluntary_ctxt_switches" => fields.involuntary_ctxt_switches = number,
            _ => {}
        }
    }
    fields
}

pub(crate) fn parse_io(io: &str) -> (Option<u64>, Option<u64>) {
    let mut read = None;
    let mut write = None;
    for line in io.lines() {
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let value = value.trim().parse::<u64>().ok();
        match key.trim() {
            "read_bytes" => read = value,
            "write_bytes" => write = value,
            _ => {}
        }
    }
    (read, write)
}
