//! Terminal progress line for running transfers.

use pdl_core::downloader::{ProgressSink, ProgressStats};
use std::io::Write;
use std::path::Path;
use std::sync::{Mutex, PoisonError};
use std::time::Instant;

const PROGRESS_INTERVAL_MS: u128 = 500;

/// Prints at most one line per interval, plus the final line of each file.
#[derive(Debug, Default)]
pub struct ProgressPrinter {
    last_print: Mutex<Option<Instant>>,
}

impl ProgressPrinter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProgressSink for ProgressPrinter {
    fn on_progress(&self, destination: &Path, stats: &ProgressStats) {
        let now = Instant::now();
        let finished = stats.bytes_done >= stats.total_bytes;
        let mut last = self.last_print.lock().unwrap_or_else(PoisonError::into_inner);
        let due = last.map_or(true, |t| {
            now.duration_since(t).as_millis() >= PROGRESS_INTERVAL_MS
        });
        if !due && !finished {
            return;
        }
        *last = Some(now);

        let name = destination
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let mut out = std::io::stdout().lock();
        let _ = write!(out, "\r{}", format_line(&name, stats));
        if finished {
            let _ = writeln!(out);
        }
        let _ = out.flush();
    }
}

fn format_line(name: &str, stats: &ProgressStats) -> String {
    let done_mib = stats.bytes_done as f64 / 1_048_576.0;
    let total_mib = stats.total_bytes as f64 / 1_048_576.0;
    let pct = stats.fraction() * 100.0;
    let rate_mib = stats.bytes_per_sec() / 1_048_576.0;
    let eta = stats
        .eta_secs()
        .map(|s| format!("{:.0}s", s))
        .unwrap_or_else(|| "?".to_string());
    format!(
        "  {}  {:.1} / {:.1} MiB ({:.1}%)  {:.2} MiB/s  ETA {}  ",
        name, done_mib, total_mib, pct, rate_mib, eta
    )
}
