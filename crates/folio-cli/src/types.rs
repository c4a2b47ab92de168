use std::path::PathBuf;
use std::time::Duration;

/// Outcome of one `holdings` run, for the end-of-run summary.
pub struct RunResult {
    pub records_read: usize,
    pub transformed: usize,
    pub failed: usize,
    pub output: PathBuf,
    pub report: PathBuf,
    pub elapsed: Duration,
    /// General counters worth surfacing on the terminal.
    pub highlights: Vec<(String, u64)>,
}

impl RunResult {
    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }
}
