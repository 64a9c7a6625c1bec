//! `pdl fetch` – resumable download of one direct URL.

use anyhow::Result;
use pdl_core::config::PdlConfig;
use pdl_core::downloader;
use pdl_core::session::Session;
use std::path::PathBuf;

use super::{blocking, download_options, login, Globals};
use crate::cli::progress::ProgressPrinter;

/// Logs in only when credentials were given on the command line.
pub async fn run_fetch(
    globals: &Globals,
    cfg: &PdlConfig,
    url: &str,
    output: Option<PathBuf>,
) -> Result<()> {
    let http = cfg.http_options();
    let creds = &globals.credentials;
    let session = if creds.username().is_some() || creds.password().is_some() {
        login(globals, &http).await?
    } else {
        Session::anonymous()
    };
    let opts = download_options(cfg, globals.quiet, None, None)?;

    let cancel = globals.cancel.clone();
    let url = url.to_string();
    let size = blocking(move || {
        let printer = ProgressPrinter::new();
        downloader::download(&url, &session, output.as_deref(), &opts, &cancel, Some(&printer))
    })
    .await??;
    tracing::info!(bytes = size, "fetch complete");
    Ok(())
}
