use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::Sample;

const HEADERS: [&str; 7] = ["t(s)", "cpu%", "rss(bytes)", "read(bytes)", "write(bytes)", "threads", "ctx_switches"];

/// Samples of one monitored run, rendered as an aligned text table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonitorReport {
    program: String,
    samples: Vec<Sample>,
    exit_code: Option<i32>,
    wall_time: Duration,
}

impl MonitorReport {
    pub fn new(program: String, samples: Vec<Sample>, exit_code: Option<i32>, wall_time: Duration) -> Self {
        Self {
            program,
            samples,
            exit_code,
            wall_time,
        }
    }

    #[inline]
    pub fn program(&self) -> &str {
        &self.program
    }

    #[inline]
    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    /// `None` when the process was killed by a signal
    #[inline]
    pub fn exit_code(&self) -> Option<i32> {
        self.exit_code
    }

    #[inline]
    pub fn wall_time(&self) -> Duration {
        self.wall_time
    }

    /// Highest resident memory seen
    pub fn peak_rss_bytes(&self) -> u64 {
        self.samples.iter().map(|s| s.rss_bytes).max().unwrap_or(0)
    }

    fn rows(&self) -> Vec<[String; 7]> {
        let opt = |v: Option<u64>| v.map_or_else(|| "-".to_string(), |v| v.to_string());
        self.samples
            .iter()
            .map(|s| {
                [
                    format!("{:.1}", s.elapsed.as_secs_f64()),
                    format!("{:.1}", s.cpu_percent),
                    s.rss_bytes.to_string(),
                    opt(s.read_bytes),
                    opt(s.write_bytes),
                    s.threads.to_string(),
                    s.ctxt_switches.to_string(),
                ]
            })
            .collect()
    }
}

impl fmt::Display for MonitorReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rows = self.rows();
        let mut widths = HEADERS.map(str::len);
        for row in &rows {
            for (width, cell) in widths.iter_mut().zip(row.iter()) {
                *width = (*width).max(cell.len());
            }
        }

        let write_row = |f: &mut fmt::Formatter<'_>, cells: &[&str]| -> fmt::Result {
            for (i, (cell, width)) in cells.iter().zip(widths.iter().copied()).enumerate() {
                if i > 0 {
                    f.write_str(" | ")?;
                }
                write!(f, "{cell:>width$}")?;
            }
            writeln!(f)
        };

        writeln!(f, "process: {}", self.program)?;
        write_row(f, &HEADERS)?;
        let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
        f.write_str(&rule.join("-+-"))?;
        writeln!(f)?;
        for row in &rows {
            let cells: Vec<&str> = row.iter().map(String::as_str).collect();
            write_row(f, &cells)?;
        }
        let exit = self
            .exit_code
            .map_or_else(|| "killed by signal".to_string(), |c| c.to_string());
        write!(
            f,
            "samples: {}, wall time: {:.2}s, peak rss: {} bytes, exit: {}",
            self.samples.len(),
            self.wall_time.as_secs_f64(),
            self.peak_rss_bytes(),
            exit
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(secs: u64, rss: u64) -> Sample {
        Sample {
            elapsed: Duration::from_secs(secs),
            cpu_percent: 12.5,
            rss_bytes: rss,
            read_bytes: Some(4096),
            write_bytes: None,
            threads: 1,
            ctxt_switches: 9,
        }
    }

    #[test]
    fn table_has_header_rows_and_summary() {
        let report = MonitorReport::new(
            "tf-idf-similarity".to_string(),
            vec![sample(0, 1_000), sample(1, 250_000)],
            Some(0),
            Duration::from_millis(1500),
        );
        let text = report.to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 6);
        assert_eq!(lines[0], "process: tf-idf-similarity");
        assert!(lines[1].contains("cpu%") && lines[1].contains("ctx_switches"));
        assert!(lines[2].starts_with("----"));
        assert!(lines[4].contains("250000") && lines[4].contains(" - "));
        assert_eq!(lines[5], "samples: 2, wall time: 1.50s, peak rss: 250000 bytes, exit: 0");
        // columns are aligned
        assert_eq!(lines[1].len(), lines[3].len());
        assert_eq!(lines[3].len(), lines[4].len());
    }

    #[test]
    fn empty_report_still_renders() {
        let report = MonitorReport::new("true".to_string(), Vec::new(), None, Duration::ZERO);
        assert_eq!(report.peak_rss_bytes(), 0);
        assert!(report.to_string().ends_with("exit: killed by signal"));
    }
}
