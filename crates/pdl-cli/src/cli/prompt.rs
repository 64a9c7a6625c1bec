//! Interactive credential prompts.

use anyhow::Result;
use dialoguer::{Input, Password};
use pdl_core::auth::Credentials;

/// Asks for whichever of username and password is missing.
pub fn complete(credentials: Credentials) -> Result<Credentials> {
    let mut credentials = credentials;
    if credentials.username().is_none() {
        let username: String = Input::new().with_prompt("Username").interact_text()?;
        credentials = credentials.with_username(username.trim().to_string());
    }
    if credentials.password().is_none() {
        let password = Password::new().with_prompt("Password").interact()?;
        credentials = credentials.with_password(password);
    }
    Ok(credentials)
}
