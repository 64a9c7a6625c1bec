//! `pdl list` – numbered lectures of a course.

use anyhow::Result;
use pdl_core::config::PdlConfig;
use pdl_core::error::ResolutionError;

use super::{blocking, login, portal_for, Globals};

/// Prints lecture titles from the syllabus, or the lecture URLs on portals without one.
pub async fn run_list(globals: &Globals, cfg: &PdlConfig, url: &str) -> Result<()> {
    let portal = portal_for(url)?;
    let http = cfg.http_options();
    let session = login(globals, &http).await?;

    let (url, cancel) = (url.to_string(), globals.cancel.clone());
    let lines = blocking(move || match portal.fetch_syllabus(&url, &session, &http, &cancel) {
        Ok(syllabus) => Ok(syllabus
            .lectures
            .iter()
            .map(|l| format!("{} - {}", l.title, l.date))
            .collect()),
        Err(ResolutionError::SyllabusUnsupported { .. }) => {
            portal.list_lectures(&url, &session, &http, &cancel)
        }
        Err(e) => Err(e),
    })
    .await??;

    for (i, line) in lines.iter().enumerate() {
        println!("{:>3}. {}", i + 1, line);
    }
    Ok(())
}
