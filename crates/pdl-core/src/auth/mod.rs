//! Federated login: identity provider → first service provider → portal
//! service provider, ending on the student home page.
//!
//! All hops share one curl handle so its cookie engine carries the state
//! between them; the cookies left on the handle at the end become the
//! [`Session`].

mod relay;

pub use relay::{extract_relay_tokens, is_credentials_form, RelayTokens};

use curl::easy::Easy;
use std::fmt;

use crate::control::CancelToken;
use crate::error::AuthError;
use crate::session::Session;
use crate::transport::{self, HttpOptions};

/// Username and password for the identity provider. Either may be missing
/// until the front end has asked the user for it.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    username: Option<String>,
    password: Option<String>,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .finish()
    }
}

impl Credentials {
    pub fn new(username: Option<String>, password: Option<String>) -> Self {
        Self { username, password }
    }

    pub fn username(&self) -> Option<&str> {
        self.username.as_deref().filter(|s| !s.is_empty())
    }

    pub fn password(&self) -> Option<&str> {
        self.password.as_deref().filter(|s| !s.is_empty())
    }

    pub fn with_username(mut self, username: String) -> Self {
        self.username = Some(username);
        self
    }

    pub fn with_password(mut self, password: String) -> Self {
        self.password = Some(password);
        self
    }

    fn require(&self) -> Result<(&str, &str), AuthError> {
        match (self.username(), self.password()) {
            (Some(u), Some(p)) => Ok((u, p)),
            _ => Err(AuthError::MissingCredentials),
        }
    }
}

/// The URLs visited by the login exchange, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthEndpoints {
    /// Identity provider login page (sets the initial IdP cookies).
    pub idp_login: String,
    /// Identity provider username/password endpoint.
    pub idp_authn: String,
    /// First service provider assertion consumer.
    pub sp_assertion: String,
    /// Portal login endpoint that starts the second SAML round.
    pub session_login: String,
    /// Portal service provider assertion consumer.
    pub session_assertion: String,
    /// Where a successful exchange lands.
    pub student_home: String,
}

impl Default for AuthEndpoints {
    fn default() -> Self {
        Self {
            idp_login: "https://idp.polito.it/idp/x509mixed-login".to_string(),
            idp_authn: "https://idp.polito.it/idp/Authn/X509Mixed/UserPasswordLogin".to_string(),
            sp_assertion: "https://www.polito.it/Shibboleth.sso/SAML2/POST".to_string(),
            session_login: "https://login.didattica.polito.it/secure/ShibLogin.php".to_string(),
            session_assertion: "https://login.didattica.polito.it/Shibboleth.sso/SAML2/POST"
                .to_string(),
            student_home: "https://didattica.polito.it/portal/page/portal/home/Studente"
                .to_string(),
        }
    }
}

/// Runs the full login exchange and returns the authenticated session.
///
/// No step is retried. Missing relay fields on the identity provider's reply
/// are reported as `CredentialsRejected` when the reply is the login form
/// again, `PortalFormatChanged` otherwise. Landing anywhere but
/// `student_home` is `CredentialsRejected`. A cancelled `cancel` stops the
/// hop in flight with `Cancelled`.
pub fn authenticate(
    credentials: &Credentials,
    endpoints: &AuthEndpoints,
    http: &HttpOptions,
    cancel: &CancelToken,
) -> Result<Session, AuthError> {
    let (username, password) = credentials.require()?;

    let mut easy = Easy::new();
    transport::configure(&mut easy, http)?;
    easy.cookie_file("")?;

    let r = transport::get(&mut easy, &endpoints.idp_login, cancel)?;
    tracing::debug!(status = r.status, "idp login page");

    let r = transport::post_form(
        &mut easy,
        &endpoints.idp_authn,
        &[("j_username", username), ("j_password", password)],
        cancel,
    )?;
    tracing::debug!(status = r.status, "idp credentials submitted");
    let page = r.text();
    let tokens = extract_relay_tokens(&page).map_err(|e| {
        if is_credentials_form(&page) {
            AuthError::CredentialsRejected
        } else {
            e
        }
    })?;
    tracing::debug!(?tokens, "first relay pair");

    let r = transport::post_form(
        &mut easy,
        &endpoints.sp_assertion,
        &tokens.form_fields(),
        cancel,
    )?;
    tracing::debug!(status = r.status, url = %r.effective_url, "first assertion relayed");

    let r = transport::post_form(&mut easy, &endpoints.session_login, &[], cancel)?;
    tracing::debug!(status = r.status, "portal login started");
    let tokens = extract_relay_tokens(&r.text())?;
    tracing::debug!(?tokens, "second relay pair");

    let r = transport::post_form(
        &mut easy,
        &endpoints.session_assertion,
        &tokens.form_fields(),
        cancel,
    )?;

    if r.effective_url != endpoints.student_home {
        tracing::warn!(landed = %r.effective_url, "login did not reach the student home");
        return Err(AuthError::CredentialsRejected);
    }

    let session = Session::capture(&mut easy)?;
    tracing::info!(cookies = session.cookie_count(), "login succeeded");
    Ok(session)
}
