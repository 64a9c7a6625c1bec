//! Resumable single-stream downloader.
//!
//! Probe the remote size, measure what is already on disk, then fetch only the
//! missing tail with a Range request and append it in fixed-size chunks.
//! A destination that already has the declared size is left untouched, so
//! repeated runs are idempotent.

mod chunk;
mod probe;
mod progress;
mod state;

pub use chunk::ChunkWriter;
pub use probe::{probe, ProbeResult};
pub use progress::{ProgressSink, ProgressStats};
pub use state::TransferState;

use curl::easy::Easy;
use std::cell::Cell;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::str;
use std::time::Instant;

use crate::control::CancelToken;
use crate::error::DownloadError;
use crate::session::Session;
use crate::transport::{self, parse_status_line, HttpOptions};
use crate::url_model;

/// Default bytes per appended chunk.
pub const DEFAULT_CHUNK_SIZE: usize = 1_000_000;

#[derive(Debug, Clone)]
pub struct DownloadOptions {
    /// Bytes buffered before each append+flush.
    pub chunk_size: usize,
    /// Suppress progress reports.
    pub quiet: bool,
    /// Directory for destinations derived from the URL.
    pub output_dir: PathBuf,
    pub http: HttpOptions,
}

impl Default for DownloadOptions {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            quiet: false,
            output_dir: PathBuf::from("."),
            http: HttpOptions::default(),
        }
    }
}

/// Why the write callback refused a buffer.
enum Abort {
    Cancelled,
    Status(u32),
    Storage(std::io::Error),
}

/// Probes `url` and reads the destination's state from disk.
///
/// Without an explicit `destination` the file is named after the last path
/// segment of the final URL, inside `opts.output_dir`.
pub fn prepare(
    url: &str,
    session: &Session,
    destination: Option<&Path>,
    opts: &DownloadOptions,
    cancel: &CancelToken,
) -> Result<TransferState, DownloadError> {
    let probed = probe(url, session, &opts.http, cancel)?;
    let destination = match destination {
        Some(p) => p.to_path_buf(),
        None => opts
            .output_dir
            .join(url_model::derive_filename(&probed.final_url)),
    };
    let state = TransferState::from_disk(destination, probed.content_length)?;
    if state.present > 0 && !state.is_complete() && !probed.accept_ranges {
        tracing::warn!(url, "server does not advertise byte ranges; resume may be refused");
    }
    tracing::debug!(
        url,
        destination = %state.destination.display(),
        total = state.total_size,
        present = state.present,
        "transfer prepared"
    );
    Ok(state)
}

/// Downloads `url` into `destination`, resuming from whatever is on disk.
/// Returns the declared file size.
pub fn download(
    url: &str,
    session: &Session,
    destination: Option<&Path>,
    opts: &DownloadOptions,
    cancel: &CancelToken,
    progress: Option<&dyn ProgressSink>,
) -> Result<u64, DownloadError> {
    let state = prepare(url, session, destination, opts, cancel)?;
    if cancel.is_cancelled() {
        return Err(DownloadError::Cancelled);
    }
    transfer(url, session, &state, opts, cancel, progress)
}

/// Fetches the bytes missing from `state.destination`.
///
/// The response must be `206 Partial Content`; anything else aborts before a
/// byte is appended (`RangeNotHonored`), except a `200` when nothing is on
/// disk yet. On any abort only whole chunks have been written, so the next
/// call resumes cleanly.
pub fn transfer(
    url: &str,
    session: &Session,
    state: &TransferState,
    opts: &DownloadOptions,
    cancel: &CancelToken,
    progress: Option<&dyn ProgressSink>,
) -> Result<u64, DownloadError> {
    if state.is_complete() {
        if state.present > state.total_size {
            tracing::warn!(
                destination = %state.destination.display(),
                present = state.present,
                total = state.total_size,
                "local file is larger than the remote one; leaving it as is"
            );
        }
        tracing::info!(destination = %state.destination.display(), "already complete");
        return Ok(state.total_size);
    }
    if cancel.is_cancelled() {
        return Err(DownloadError::Cancelled);
    }

    let mut easy = Easy::new();
    transport::configure(&mut easy, &opts.http)?;
    session.install(&mut easy)?;
    easy.url(url)?;
    easy.range(&state.range_spec())?;
    easy.progress(true)?;

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&state.destination)?;
    let mut writer = ChunkWriter::new(file, opts.chunk_size);

    let accepts = |code: u32| code == 206 || (code == 200 && state.present == 0);
    let status = Cell::new(0u32);
    let mut abort: Option<Abort> = None;
    let started = Instant::now();
    let report = |flushed: u64| {
        if opts.quiet {
            return;
        }
        if let Some(sink) = progress {
            let stats = ProgressStats {
                bytes_done: state.present + flushed,
                total_bytes: state.total_size,
                resumed_from: state.present,
                elapsed_secs: started.elapsed().as_secs_f64(),
            };
            sink.on_progress(&state.destination, &stats);
        }
    };

    tracing::info!(
        destination = %state.destination.display(),
        range = %state.range_spec(),
        remaining = state.remaining(),
        "transfer started"
    );

    let performed = {
        let mut t = easy.transfer();
        t.header_function(|data| {
            if let Some(code) = str::from_utf8(data).ok().and_then(parse_status_line) {
                status.set(code);
            }
            true
        })?;
        t.progress_function(|_, _, _, _| !cancel.is_cancelled())?;
        t.write_function(|data| {
            if cancel.is_cancelled() {
                abort = Some(Abort::Cancelled);
                return Ok(0);
            }
            let code = status.get();
            if !accepts(code) {
                abort = Some(Abort::Status(code));
                return Ok(0);
            }
            match writer.push(data) {
                Ok(0) => {}
                Ok(_) => report(writer.flushed()),
                Err(e) => {
                    abort = Some(Abort::Storage(e));
                    return Ok(0);
                }
            }
            Ok(data.len())
        })?;
        t.perform()
    };

    if let Err(e) = performed {
        let kept = state.present + writer.discard_tail();
        tracing::warn!(
            destination = %state.destination.display(),
            kept,
            error = %e,
            "transfer aborted; partial file kept"
        );
        return Err(match abort {
            Some(Abort::Cancelled) => DownloadError::Cancelled,
            Some(Abort::Status(code)) => status_error(code, url),
            Some(Abort::Storage(io)) => DownloadError::Storage(io),
            None if e.is_aborted_by_callback() || cancel.is_cancelled() => DownloadError::Cancelled,
            None => DownloadError::Network(e),
        });
    }

    let code = easy.response_code()?;
    if !accepts(code) {
        writer.discard_tail();
        return Err(status_error(code, url));
    }

    let written = writer.finish()?;
    report(written);
    let on_disk = state.present + written;
    if on_disk > state.total_size {
        // An over-long file would pass as complete next time; keep only the prior prefix.
        OpenOptions::new()
            .write(true)
            .open(&state.destination)?
            .set_len(state.present)?;
        tracing::warn!(
            destination = %state.destination.display(),
            received = on_disk,
            total = state.total_size,
            kept = state.present,
            "server sent more than the declared size; bytes of this run discarded"
        );
    }
    if on_disk != state.total_size {
        return Err(DownloadError::Incomplete {
            expected: state.total_size,
            received: on_disk,
        });
    }
    tracing::info!(
        destination = %state.destination.display(),
        bytes = written,
        "transfer finished"
    );
    Ok(state.total_size)
}

/// A 2xx that is not partial content means the Range header was ignored.
fn status_error(code: u32, url: &str) -> DownloadError {
    if (200..300).contains(&code) {
        DownloadError::RangeNotHonored { status: code }
    } else {
        DownloadError::Http {
            status: code,
            url: url.to_string(),
        }
    }
}
