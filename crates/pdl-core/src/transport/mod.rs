//! Thin helpers over libcurl `Easy` handles shared by the login hops,
//! the portal lookups and the downloader.

mod parse;

pub use parse::{parse_head, parse_status_line, ResponseHead};

use curl::easy::Easy;
use std::str;
use std::time::Duration;

use crate::control::CancelToken;

/// Per-request transport limits.
#[derive(Debug, Clone)]
pub struct HttpOptions {
    pub connect_timeout: Duration,
    /// Hard cap on a whole request; None lets long transfers run.
    pub timeout: Option<Duration>,
    /// Abort if throughput stays below this many bytes/s...
    pub low_speed_limit: u32,
    /// ...for this long.
    pub low_speed_time: Duration,
    pub max_redirections: u32,
}

impl Default for HttpOptions {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(30),
            timeout: None,
            low_speed_limit: 1024,
            low_speed_time: Duration::from_secs(60),
            max_redirections: 10,
        }
    }
}

/// A fully buffered response (portal pages and login hops are small).
#[derive(Debug, Clone)]
pub struct Response {
    pub status: u32,
    /// URL after redirects were followed.
    pub effective_url: String,
    pub head: ResponseHead,
    pub body: Vec<u8>,
}

impl Response {
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Applies timeouts and redirect policy. Redirects are followed by default.
pub fn configure(easy: &mut Easy, opts: &HttpOptions) -> Result<(), curl::Error> {
    easy.follow_location(true)?;
    easy.max_redirections(opts.max_redirections)?;
    easy.connect_timeout(opts.connect_timeout)?;
    // Prefer low-speed timeout over a wall-clock cap so long lectures on slow links survive.
    easy.low_speed_limit(opts.low_speed_limit)?;
    easy.low_speed_time(opts.low_speed_time)?;
    if let Some(t) = opts.timeout {
        easy.timeout(t)?;
    }
    easy.useragent(concat!("pdl/", env!("CARGO_PKG_VERSION")))?;
    Ok(())
}

/// Switches the handle to GET for `url`.
pub fn get(easy: &mut Easy, url: &str, cancel: &CancelToken) -> Result<Response, curl::Error> {
    easy.url(url)?;
    easy.get(true)?;
    perform(easy, cancel)
}

/// Switches the handle to a urlencoded form POST for `url`.
pub fn post_form(
    easy: &mut Easy,
    url: &str,
    fields: &[(&str, &str)],
    cancel: &CancelToken,
) -> Result<Response, curl::Error> {
    let body = url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(fields.iter().copied())
        .finish();
    easy.url(url)?;
    easy.post(true)?;
    easy.post_fields_copy(body.as_bytes())?;
    perform(easy, cancel)
}

/// Runs the configured request, collecting headers of the final hop and the body.
///
/// libcurl polls the progress callback at least once a second, even while the
/// server is silent, so `cancel` stops the request within about a second with
/// `is_aborted_by_callback()`.
pub fn perform(easy: &mut Easy, cancel: &CancelToken) -> Result<Response, curl::Error> {
    let mut lines: Vec<String> = Vec::new();
    let mut body: Vec<u8> = Vec::new();
    easy.progress(true)?;
    {
        let mut transfer = easy.transfer();
        transfer.progress_function(|_, _, _, _| !cancel.is_cancelled())?;
        transfer.header_function(|data| {
            if let Ok(s) = str::from_utf8(data) {
                lines.push(s.trim_end().to_string());
            }
            true
        })?;
        transfer.write_function(|data| {
            body.extend_from_slice(data);
            Ok(data.len())
        })?;
        transfer.perform()?;
    }

    let status = easy.response_code()?;
    let effective_url = easy.effective_url()?.unwrap_or_default().to_string();
    Ok(Response {
        status,
        effective_url,
        head: parse_head(&lines),
        body,
    })
}
