//! Typed outcomes for the login handshake, portal lookup and transfers.

use std::path::PathBuf;
use thiserror::Error;

/// Why the federated login did not produce a session.
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("username and password are both required")]
    MissingCredentials,
    /// The identity provider re-rendered its login form or the exchange did
    /// not land on the student home page.
    #[error("credentials rejected by the identity provider")]
    CredentialsRejected,
    /// An intermediate page no longer carries the expected hidden form field.
    #[error("login page format changed: `{missing}` field not found")]
    PortalFormatChanged { missing: &'static str },
    #[error("login cancelled")]
    Cancelled,
    #[error("network error during login: {0}")]
    Network(#[source] curl::Error),
}

/// Why a portal page could not be turned into lecture or download URLs.
#[derive(Error, Debug)]
pub enum ResolutionError {
    #[error("unsupported portal domain: {url}")]
    UnsupportedDomain { url: String },
    #[error("could not find {what} on {url}")]
    PatternNotFound { what: &'static str, url: String },
    #[error("no redirect location returned by {url}")]
    MissingRedirect { url: String },
    #[error("syllabus is only available on didattica, not on {portal}")]
    SyllabusUnsupported { portal: &'static str },
    #[error("GET {url} returned HTTP {status}")]
    Http { status: u32, url: String },
    #[error("lookup cancelled")]
    Cancelled,
    #[error("network error: {0}")]
    Network(#[source] curl::Error),
}

/// Why a transfer stopped before the destination reached its declared size.
/// The partial file is always kept for the next attempt.
#[derive(Error, Debug)]
pub enum DownloadError {
    #[error("network error: {0}")]
    Network(#[source] curl::Error),
    #[error("server ignored the range request (HTTP {status})")]
    RangeNotHonored { status: u32 },
    #[error("no Content-Length for {url}")]
    MissingContentLength { url: String },
    #[error("{url} returned HTTP {status}")]
    Http { status: u32, url: String },
    #[error("incomplete transfer: expected {expected} bytes on disk, have {received}")]
    Incomplete { expected: u64, received: u64 },
    #[error("download cancelled")]
    Cancelled,
    #[error("another lecture of this run already writes {}", path.display())]
    DuplicateDestination { path: PathBuf },
    #[error("storage: {0}")]
    Storage(#[from] std::io::Error),
}

// Callback aborts only come from a cancelled `CancelToken`.

impl From<curl::Error> for AuthError {
    fn from(e: curl::Error) -> Self {
        if e.is_aborted_by_callback() {
            AuthError::Cancelled
        } else {
            AuthError::Network(e)
        }
    }
}

impl From<curl::Error> for ResolutionError {
    fn from(e: curl::Error) -> Self {
        if e.is_aborted_by_callback() {
            ResolutionError::Cancelled
        } else {
            ResolutionError::Network(e)
        }
    }
}

impl From<curl::Error> for DownloadError {
    fn from(e: curl::Error) -> Self {
        if e.is_aborted_by_callback() {
            DownloadError::Cancelled
        } else {
            DownloadError::Network(e)
        }
    }
}

impl ResolutionError {
    /// True when the URL points outside the two known portals.
    pub fn is_unsupported_domain(&self) -> bool {
        matches!(self, ResolutionError::UnsupportedDomain { .. })
    }
}
