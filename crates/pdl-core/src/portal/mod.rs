//! Lecture lookup on the two known PoliTo video portals.
//!
//! Each portal maps a course page to its lecture page URLs and a lecture
//! page to the direct media URL for a format. Pages are scraped with fixed
//! patterns; when they stop matching the layout has changed and the caller
//! gets `PatternNotFound`.

pub mod didattica;
pub mod elearning;
mod format;
mod syllabus;

pub use format::MediaFormat;
pub use syllabus::{Syllabus, SyllabusLecture};

use curl::easy::Easy;
use regex::Regex;
use std::fmt;
use url::Url;

use crate::control::CancelToken;
use crate::error::ResolutionError;
use crate::session::Session;
use crate::transport::{self, HttpOptions};

/// The closed set of supported portal layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Portal {
    Didattica,
    Elearning,
}

impl Portal {
    /// Picks the portal from the URL host.
    pub fn from_url(url: &str) -> Result<Portal, ResolutionError> {
        let unsupported = || ResolutionError::UnsupportedDomain {
            url: url.to_string(),
        };
        let parsed = Url::parse(url).map_err(|_| unsupported())?;
        let host = parsed.host_str().ok_or_else(unsupported)?;
        let on = |domain: &str| host == domain || host.ends_with(&format!(".{}", domain));
        if on("didattica.polito.it") {
            Ok(Portal::Didattica)
        } else if on("elearning.polito.it") {
            Ok(Portal::Elearning)
        } else {
            Err(unsupported())
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Portal::Didattica => "didattica.polito.it",
            Portal::Elearning => "elearning.polito.it",
        }
    }

    /// Lecture page URLs listed on a course page, in page order.
    pub fn list_lectures(
        self,
        page_url: &str,
        session: &Session,
        http: &HttpOptions,
        cancel: &CancelToken,
    ) -> Result<Vec<String>, ResolutionError> {
        let page = parse_page_url(page_url)?;
        let html = fetch_page(page_url, session, http, cancel)?;
        let urls = match self {
            Portal::Didattica => didattica::lecture_urls(&html, &page),
            Portal::Elearning => elearning::lecture_urls(&html, &page),
        };
        if urls.is_empty() {
            return Err(ResolutionError::PatternNotFound {
                what: "lecture links",
                url: page_url.to_string(),
            });
        }
        tracing::debug!(portal = self.name(), count = urls.len(), "lectures listed");
        Ok(urls)
    }

    /// Direct media URL of one lecture in the requested format.
    ///
    /// The format link on the lecture page redirects to the media file; the
    /// redirect target is returned without fetching it.
    pub fn resolve_download_url(
        self,
        lecture_url: &str,
        session: &Session,
        format: MediaFormat,
        http: &HttpOptions,
        cancel: &CancelToken,
    ) -> Result<String, ResolutionError> {
        let page = parse_page_url(lecture_url)?;
        let html = fetch_page(lecture_url, session, http, cancel)?;
        let link = match self {
            Portal::Didattica => didattica::format_link(&html, format, &page),
            Portal::Elearning => elearning::format_link(&html, format, &page),
        }
        .ok_or_else(|| ResolutionError::PatternNotFound {
            what: "format link",
            url: lecture_url.to_string(),
        })?;
        let target = redirect_location(&link, session, http, cancel)?;
        tracing::debug!(lecture = lecture_url, %format, target = %target, "download url resolved");
        Ok(target)
    }

    /// Course syllabus. Only didattica publishes one.
    pub fn fetch_syllabus(
        self,
        page_url: &str,
        session: &Session,
        http: &HttpOptions,
        cancel: &CancelToken,
    ) -> Result<Syllabus, ResolutionError> {
        match self {
            Portal::Didattica => {
                let html = fetch_page(page_url, session, http, cancel)?;
                didattica::syllabus(&html).ok_or_else(|| ResolutionError::PatternNotFound {
                    what: "course syllabus",
                    url: page_url.to_string(),
                })
            }
            Portal::Elearning => Err(ResolutionError::SyllabusUnsupported {
                portal: self.name(),
            }),
        }
    }
}

impl fmt::Display for Portal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn parse_page_url(url: &str) -> Result<Url, ResolutionError> {
    Url::parse(url).map_err(|_| ResolutionError::UnsupportedDomain {
        url: url.to_string(),
    })
}

fn fetch_page(
    url: &str,
    session: &Session,
    http: &HttpOptions,
    cancel: &CancelToken,
) -> Result<String, ResolutionError> {
    let mut easy = Easy::new();
    transport::configure(&mut easy, http)?;
    session.install(&mut easy)?;
    let r = transport::get(&mut easy, url, cancel)?;
    if !r.is_success() {
        return Err(ResolutionError::Http {
            status: r.status,
            url: url.to_string(),
        });
    }
    Ok(r.text())
}

fn redirect_location(
    url: &str,
    session: &Session,
    http: &HttpOptions,
    cancel: &CancelToken,
) -> Result<String, ResolutionError> {
    let mut easy = Easy::new();
    transport::configure(&mut easy, http)?;
    easy.follow_location(false)?;
    session.install(&mut easy)?;
    let r = transport::get(&mut easy, url, cancel)?;
    let location = r
        .head
        .location
        .filter(|l| !l.is_empty())
        .ok_or_else(|| ResolutionError::MissingRedirect {
            url: url.to_string(),
        })?;
    // Relative targets resolve against the link that redirected.
    Ok(Url::parse(url)
        .and_then(|base| base.join(&location))
        .map(String::from)
        .unwrap_or(location))
}

/// First capture group of every match, in page order.
pub(crate) fn capture_all<'h>(re: &Regex, html: &'h str) -> Vec<&'h str> {
    re.captures_iter(html)
        .filter_map(|c| c.get(1))
        .map(|m| m.as_str())
        .collect()
}

pub(crate) fn unescape(s: &str) -> String {
    html_escape::decode_html_entities(s).into_owned()
}

/// Resolves a scraped `href` against `dir` on the host that served `page`.
pub(crate) fn link_under(page: &Url, dir: &str, href: &str) -> Option<String> {
    page.join(dir)
        .and_then(|base| base.join(&unescape(href)))
        .ok()
        .map(String::from)
}
