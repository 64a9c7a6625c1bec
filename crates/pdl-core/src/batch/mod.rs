//! Multi-lecture runs: resolve each selected lecture and download it.
//!
//! Lectures are processed one after another. A failing lecture is recorded
//! and the run moves on to the next one; cancellation stops the run before
//! the next lecture starts. Two lectures that resolve to the same local file
//! would append to each other, so the second one is refused.

use std::collections::HashSet;
use std::path::PathBuf;
use thiserror::Error;

use crate::control::CancelToken;
use crate::downloader::{self, DownloadOptions, ProgressSink};
use crate::error::{DownloadError, ResolutionError};
use crate::portal::{MediaFormat, Portal};
use crate::session::Session;

/// One selected lecture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchItem {
    /// 1-based position in the course listing.
    pub index: usize,
    pub lecture_url: String,
}

#[derive(Debug, Clone)]
pub struct BatchOptions {
    pub format: MediaFormat,
    pub download: DownloadOptions,
}

#[derive(Error, Debug)]
pub enum ItemError {
    #[error("{0}")]
    Resolution(#[from] ResolutionError),
    #[error("{0}")]
    Download(#[from] DownloadError),
}

/// A lecture whose file is complete on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completed {
    pub destination: PathBuf,
    pub total_size: u64,
    /// Bytes that were on disk before this run.
    pub resumed_from: u64,
}

impl Completed {
    pub fn was_already_complete(&self) -> bool {
        self.resumed_from >= self.total_size
    }
}

#[derive(Debug)]
pub struct ItemOutcome {
    pub item: BatchItem,
    pub result: Result<Completed, ItemError>,
}

#[derive(Debug, Default)]
pub struct BatchReport {
    /// Outcomes in the order the items were given.
    pub outcomes: Vec<ItemOutcome>,
}

impl BatchReport {
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.result.is_ok()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }

    pub fn all_succeeded(&self) -> bool {
        self.failed() == 0
    }
}

/// Resolves and downloads every item in order, returning one outcome per item.
pub fn run_batch(
    portal: Portal,
    session: &Session,
    items: Vec<BatchItem>,
    opts: &BatchOptions,
    cancel: &CancelToken,
    progress: Option<&dyn ProgressSink>,
) -> BatchReport {
    let mut claimed: HashSet<PathBuf> = HashSet::new();
    let mut outcomes = Vec::with_capacity(items.len());

    tracing::info!(portal = %portal, lectures = items.len(), "batch started");
    for item in items {
        let result = if cancel.is_cancelled() {
            Err(ItemError::Download(DownloadError::Cancelled))
        } else {
            run_one(portal, session, &item, opts, cancel, progress, &mut claimed)
        };
        match &result {
            Ok(done) => tracing::info!(
                index = item.index,
                destination = %done.destination.display(),
                "lecture done"
            ),
            Err(e) => tracing::warn!(index = item.index, error = %e, "lecture failed"),
        }
        outcomes.push(ItemOutcome { item, result });
    }

    let report = BatchReport { outcomes };
    tracing::info!(
        succeeded = report.succeeded(),
        failed = report.failed(),
        "batch finished"
    );
    report
}

fn run_one(
    portal: Portal,
    session: &Session,
    item: &BatchItem,
    opts: &BatchOptions,
    cancel: &CancelToken,
    progress: Option<&dyn ProgressSink>,
    claimed: &mut HashSet<PathBuf>,
) -> Result<Completed, ItemError> {
    let url = portal.resolve_download_url(
        &item.lecture_url,
        session,
        opts.format,
        &opts.download.http,
        cancel,
    )?;
    let state = downloader::prepare(&url, session, None, &opts.download, cancel)?;
    if !claimed.insert(state.destination.clone()) {
        return Err(DownloadError::DuplicateDestination {
            path: state.destination,
        }
        .into());
    }
    downloader::transfer(&url, session, &state, &opts.download, cancel, progress)?;
    Ok(Completed {
        destination: state.destination,
        total_size: state.total_size,
        resumed_from: state.present,
    })
}
