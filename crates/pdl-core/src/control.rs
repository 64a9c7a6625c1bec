//! Cancellation for in-flight transfers.
//!
//! A `CancelToken` is a shared flag: the CLI sets it on Ctrl-C and every
//! transfer loop checks it between received buffers, stopping at a chunk
//! boundary so the partial file stays resumable.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. All clones observe it.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}
