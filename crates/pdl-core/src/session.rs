//! Authenticated transport state shared by every request after login.

use curl::easy::Easy;
use std::str;

/// Cookie jar exported from the login handle, in libcurl's Netscape line format.
///
/// Built once by [`crate::auth::authenticate`] and never mutated afterwards;
/// each request installs the cookies into its own fresh handle.
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    cookies: Vec<String>,
}

impl Session {
    /// A session carrying no cookies, for URLs that need no login.
    pub fn anonymous() -> Self {
        Self {
            cookies: Vec::new(),
        }
    }

    /// Snapshot of the cookie engine of `easy` (must have had the engine enabled).
    pub(crate) fn capture(easy: &mut Easy) -> Result<Self, curl::Error> {
        let list = easy.cookies()?;
        let cookies = list
            .iter()
            .filter_map(|c| str::from_utf8(c).ok())
            .map(str::to_string)
            .collect();
        Ok(Self { cookies })
    }

    /// Enables the cookie engine on `easy` and loads this session's cookies.
    pub fn install(&self, easy: &mut Easy) -> Result<(), curl::Error> {
        easy.cookie_file("")?;
        for line in &self.cookies {
            easy.cookie_list(line)?;
        }
        Ok(())
    }

    pub fn cookie_count(&self) -> usize {
        self.cookies.len()
    }

    pub fn is_anonymous(&self) -> bool {
        self.cookies.is_empty()
    }
}

// Cookie values are bearer credentials.
impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("cookies", &self.cookies.len())
            .finish()
    }
}
