//! Progress reporting for transfers (bytes done, ETA, rate).
//!
//! Consumers get a snapshot after each flushed chunk; rate and ETA only count
//! bytes fetched in this run, not the part resumed from disk.

use std::path::Path;

/// Snapshot of download progress for one destination file.
#[derive(Debug, Clone)]
pub struct ProgressStats {
    /// Bytes on disk so far (resumed prefix included).
    pub bytes_done: u64,
    /// Declared file size in bytes.
    pub total_bytes: u64,
    /// Bytes that were already on disk when this transfer started.
    pub resumed_from: u64,
    /// Elapsed time since the transfer started (seconds).
    pub elapsed_secs: f64,
}

impl ProgressStats {
    /// Bytes fetched in this run.
    pub fn fetched(&self) -> u64 {
        self.bytes_done.saturating_sub(self.resumed_from)
    }

    /// Transfer rate in bytes per second (0 if elapsed is 0).
    pub fn bytes_per_sec(&self) -> f64 {
        if self.elapsed_secs <= 0.0 {
            return 0.0;
        }
        self.fetched() as f64 / self.elapsed_secs
    }

    /// Estimated seconds remaining (None if rate is 0 or already done).
    pub fn eta_secs(&self) -> Option<f64> {
        let remaining = self.total_bytes.saturating_sub(self.bytes_done);
        if remaining == 0 {
            return Some(0.0);
        }
        let rate = self.bytes_per_sec();
        if rate <= 0.0 {
            return None;
        }
        Some(remaining as f64 / rate)
    }

    /// Fraction complete in [0.0, 1.0].
    pub fn fraction(&self) -> f64 {
        if self.total_bytes == 0 {
            return 1.0;
        }
        (self.bytes_done as f64 / self.total_bytes as f64).min(1.0)
    }
}

/// Receives progress snapshots after each flushed chunk.
pub trait ProgressSink: Send + Sync {
    fn on_progress(&self, destination: &Path, stats: &ProgressStats);
}

impl<F> ProgressSink for F
where
    F: Fn(&Path, &ProgressStats) + Send + Sync,
{
    fn on_progress(&self, destination: &Path, stats: &ProgressStats) {
        self(destination, stats)
    }
}
