//! Size and final-URL probing before a transfer.
//!
//! Tries HEAD first; servers that refuse HEAD or omit `Content-Length` get a
//! GET that is aborted as soon as the first body byte arrives.

use curl::easy::Easy;
use std::str;

use crate::control::CancelToken;
use crate::error::DownloadError;
use crate::session::Session;
use crate::transport::{self, parse_head, HttpOptions};

/// What a transfer needs to know about the remote file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeResult {
    pub content_length: u64,
    /// URL after redirects; its last path segment names the local file.
    pub final_url: String,
    /// Server sent `Accept-Ranges: bytes`. Informational: some servers honor
    /// ranges without advertising them.
    pub accept_ranges: bool,
}

/// Both requests give up with `Cancelled` once `cancel` is set.
pub fn probe(
    url: &str,
    session: &Session,
    http: &HttpOptions,
    cancel: &CancelToken,
) -> Result<ProbeResult, DownloadError> {
    match probe_head(url, session, http, cancel) {
        Ok(Some(found)) => return Ok(found),
        Ok(None) => tracing::debug!(url, "HEAD gave no usable length, probing with GET"),
        Err(e) if e.is_aborted_by_callback() => return Err(DownloadError::Cancelled),
        Err(e) => tracing::debug!(url, error = %e, "HEAD failed, probing with GET"),
    }
    probe_get(url, session, http, cancel)
}

fn probe_head(
    url: &str,
    session: &Session,
    http: &HttpOptions,
    cancel: &CancelToken,
) -> Result<Option<ProbeResult>, curl::Error> {
    let mut easy = Easy::new();
    transport::configure(&mut easy, http)?;
    session.install(&mut easy)?;
    easy.url(url)?;
    easy.nobody(true)?;
    let r = transport::perform(&mut easy, cancel)?;
    if !r.is_success() {
        return Ok(None);
    }
    let accept_ranges = r.head.accept_ranges;
    Ok(r.head.content_length.map(|content_length| ProbeResult {
        content_length,
        final_url: r.effective_url,
        accept_ranges,
    }))
}

fn probe_get(
    url: &str,
    session: &Session,
    http: &HttpOptions,
    cancel: &CancelToken,
) -> Result<ProbeResult, DownloadError> {
    let mut lines: Vec<String> = Vec::new();

    let mut easy = Easy::new();
    transport::configure(&mut easy, http)?;
    session.install(&mut easy)?;
    easy.url(url)?;
    easy.progress(true)?;

    let performed = {
        let mut transfer = easy.transfer();
        transfer.progress_function(|_, _, _, _| !cancel.is_cancelled())?;
        transfer.header_function(|data| {
            if let Ok(s) = str::from_utf8(data) {
                lines.push(s.trim_end().to_string());
            }
            true
        })?;
        // Headers are all we need; refusing the first body buffer aborts the transfer.
        transfer.write_function(|_| Ok(0))?;
        transfer.perform()
    };
    match performed {
        Ok(()) => {}
        Err(e) if e.is_write_error() => {}
        Err(e) => return Err(e.into()),
    }

    let status = easy.response_code()?;
    if !(200..300).contains(&status) {
        return Err(DownloadError::Http {
            status,
            url: url.to_string(),
        });
    }
    let final_url = easy.effective_url()?.unwrap_or(url).to_string();
    let head = parse_head(&lines);
    let content_length = head
        .content_length
        .ok_or_else(|| DownloadError::MissingContentLength {
            url: url.to_string(),
        })?;
    Ok(ProbeResult {
        content_length,
        final_url,
        accept_ranges: head.accept_ranges,
    })
}
