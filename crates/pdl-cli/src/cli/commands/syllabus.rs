//! `pdl syllabus` – print or save the course syllabus.

use anyhow::{Context, Result};
use pdl_core::config::PdlConfig;
use std::path::PathBuf;

use super::{blocking, login, portal_for, Globals};

pub async fn run_syllabus(
    globals: &Globals,
    cfg: &PdlConfig,
    url: &str,
    save: Option<PathBuf>,
) -> Result<()> {
    let portal = portal_for(url)?;
    let http = cfg.http_options();
    let session = login(globals, &http).await?;

    let (url, cancel) = (url.to_string(), globals.cancel.clone());
    let syllabus =
        blocking(move || portal.fetch_syllabus(&url, &session, &http, &cancel)).await??;

    match save {
        Some(path) => {
            std::fs::write(&path, syllabus.to_string())
                .with_context(|| format!("writing syllabus to {}", path.display()))?;
            if !globals.quiet {
                println!("Syllabus saved to {}", path.display());
            }
        }
        None => print!("{}", syllabus),
    }
    Ok(())
}
