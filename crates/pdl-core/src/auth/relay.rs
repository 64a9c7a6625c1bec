//! Hidden form field extraction for the SAML relay hops.

use regex::Regex;
use std::sync::OnceLock;

use crate::error::AuthError;

/// The (RelayState, SAMLResponse) pair one hop hands to the next.
///
/// Values are already HTML-unescaped and must be posted verbatim.
#[derive(Clone, PartialEq, Eq)]
pub struct RelayTokens {
    pub relay_state: String,
    pub saml_response: String,
}

impl RelayTokens {
    /// Form fields for the assertion consumer POST.
    pub fn form_fields(&self) -> [(&str, &str); 2] {
        [
            ("RelayState", self.relay_state.as_str()),
            ("SAMLResponse", self.saml_response.as_str()),
        ]
    }
}

impl std::fmt::Debug for RelayTokens {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RelayTokens")
            .field("relay_state_len", &self.relay_state.len())
            .field("saml_response_len", &self.saml_response.len())
            .finish()
    }
}

fn relay_state_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r#"name="RelayState"[^>]*?value="([^"]*)""#).expect("valid RelayState regex")
    })
}

fn saml_response_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r#"name="SAMLResponse"[^>]*?value="([^"]*)""#)
            .expect("valid SAMLResponse regex")
    })
}

/// Value of the first hidden field matched by `pattern`, HTML-unescaped.
fn field_value(pattern: &Regex, html: &str) -> Option<String> {
    let raw = pattern.captures(html)?.get(1)?.as_str();
    Some(html_escape::decode_html_entities(raw).into_owned())
}

/// Extracts the relay pair from an auto-submit form page.
///
/// Fails with `PortalFormatChanged` naming the first missing field.
pub fn extract_relay_tokens(html: &str) -> Result<RelayTokens, AuthError> {
    let relay_state = field_value(relay_state_pattern(), html)
        .ok_or(AuthError::PortalFormatChanged { missing: "RelayState" })?;
    let saml_response = field_value(saml_response_pattern(), html)
        .ok_or(AuthError::PortalFormatChanged { missing: "SAMLResponse" })?;
    Ok(RelayTokens {
        relay_state,
        saml_response,
    })
}

/// True when the page is the identity provider's username/password form.
pub fn is_credentials_form(html: &str) -> bool {
    html.contains(r#"name="j_username""#)
}
