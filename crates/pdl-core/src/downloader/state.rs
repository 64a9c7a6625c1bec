//! Transfer state derived from the destination file on disk.

use std::io;
use std::path::PathBuf;

/// Where a transfer stands before it starts. Resumability relies on the
/// destination's length alone; nothing else is persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferState {
    pub destination: PathBuf,
    /// Declared size of the remote file.
    pub total_size: u64,
    /// Bytes already on disk.
    pub present: u64,
}

impl TransferState {
    /// Reads the current length of `destination` (0 if it does not exist).
    pub fn from_disk(destination: PathBuf, total_size: u64) -> io::Result<Self> {
        let present = match std::fs::metadata(&destination) {
            Ok(m) => m.len(),
            Err(e) if e.kind() == io::ErrorKind::NotFound => 0,
            Err(e) => return Err(e),
        };
        Ok(Self {
            destination,
            total_size,
            present,
        })
    }

    pub fn is_complete(&self) -> bool {
        self.present >= self.total_size
    }

    pub fn remaining(&self) -> u64 {
        self.total_size.saturating_sub(self.present)
    }

    /// Value for curl's `range` option: `Range: bytes=<present>-<total>`.
    /// The end is past the last byte; servers clamp it to the file length.
    pub fn range_spec(&self) -> String {
        format!("{}-{}", self.present, self.total_size)
    }
}
