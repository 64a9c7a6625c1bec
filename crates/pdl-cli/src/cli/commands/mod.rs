//! CLI command handlers, one file per subcommand, plus what they share.

mod completions;
mod download;
mod fetch;
mod list;
mod syllabus;

pub use completions::run_completions;
pub use download::run_download;
pub use fetch::run_fetch;
pub use list::run_list;
pub use syllabus::run_syllabus;

use anyhow::{Context, Result};
use pdl_core::auth::{self, AuthEndpoints, Credentials};
use pdl_core::config::PdlConfig;
use pdl_core::control::CancelToken;
use pdl_core::downloader::DownloadOptions;
use pdl_core::portal::Portal;
use pdl_core::session::Session;
use pdl_core::transport::HttpOptions;
use std::path::PathBuf;

use crate::cli::prompt;

/// Options shared by every subcommand.
#[derive(Debug, Clone)]
pub struct Globals {
    pub credentials: Credentials,
    pub quiet: bool,
    /// Set by the first Ctrl-C; every network call of the command watches it.
    pub cancel: CancelToken,
}

/// Runs blocking curl work off the async runtime.
pub(crate) async fn blocking<T, F>(f: F) -> Result<T>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .context("background task failed")
}

/// Picks the portal for `url`, asking the user to report unknown domains.
pub(crate) fn portal_for(url: &str) -> Result<Portal> {
    Portal::from_url(url).map_err(|e| {
        if e.is_unsupported_domain() {
            eprintln!(
                "Only didattica.polito.it and elearning.polito.it are supported.\n\
                 If lectures are published on another domain, please report it so it can be added."
            );
        }
        e.into()
    })
}

/// Transfer options from the config and command-line overrides. The output
/// directory is created if missing.
pub(crate) fn download_options(
    cfg: &PdlConfig,
    quiet: bool,
    chunk_size: Option<usize>,
    output_dir: Option<PathBuf>,
) -> Result<DownloadOptions> {
    let opts = DownloadOptions {
        chunk_size: chunk_size.unwrap_or(cfg.chunk_size),
        quiet,
        output_dir: output_dir
            .or_else(|| cfg.output_dir.clone())
            .unwrap_or_else(|| PathBuf::from(".")),
        http: cfg.http_options(),
    };
    std::fs::create_dir_all(&opts.output_dir)
        .with_context(|| format!("creating output directory {}", opts.output_dir.display()))?;
    Ok(opts)
}

/// Prompts for missing credentials and runs the login exchange.
pub(crate) async fn login(globals: &Globals, http: &HttpOptions) -> Result<Session> {
    let credentials = globals.credentials.clone();
    let credentials = blocking(move || prompt::complete(credentials)).await??;
    let (http, cancel) = (http.clone(), globals.cancel.clone());
    let session = blocking(move || {
        auth::authenticate(&credentials, &AuthEndpoints::default(), &http, &cancel)
    })
    .await?
    .context("login failed")?;
    if !globals.quiet {
        println!("Logged in.");
    }
    Ok(session)
}

/// Exit status for a second Ctrl-C (128 + SIGINT).
const INTERRUPTED: i32 = 130;

/// Cancels `token` on the first Ctrl-C; requests in flight stop within about
/// a second and transfers at the next chunk boundary. A second Ctrl-C exits.
pub(crate) fn cancel_on_ctrl_c(token: CancelToken) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_err() {
            return;
        }
        eprintln!("\nInterrupted, stopping after the current chunk (Ctrl-C again to quit)...");
        tracing::info!("interrupt received, cancelling");
        token.cancel();
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("second interrupt, exiting");
            std::process::exit(INTERRUPTED);
        }
    });
}
