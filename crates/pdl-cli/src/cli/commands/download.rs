//! `pdl download` – download the selected lectures of a course.

use anyhow::{bail, Result};
use pdl_core::batch::{self, BatchItem, BatchOptions};
use pdl_core::config::PdlConfig;
use pdl_core::portal::MediaFormat;

use super::{blocking, download_options, login, portal_for, Globals};
use crate::cli::progress::ProgressPrinter;
use crate::cli::selection;
use crate::cli::{DownloadOverrides, LectureSelection};

pub async fn run_download(
    globals: &Globals,
    cfg: &PdlConfig,
    url: &str,
    lectures: &LectureSelection,
    overrides: DownloadOverrides,
) -> Result<()> {
    let portal = portal_for(url)?;
    let http = cfg.http_options();
    let session = login(globals, &http).await?;

    let listing = {
        let (url, session, http) = (url.to_string(), session.clone(), http.clone());
        let cancel = globals.cancel.clone();
        blocking(move || portal.list_lectures(&url, &session, &http, &cancel)).await??
    };
    let selected = selection::select(lectures, listing.len());
    if !selected.out_of_range.is_empty() {
        let skipped: Vec<String> = selected.out_of_range.iter().map(|i| i.to_string()).collect();
        eprintln!(
            "Skipping lecture number(s) {}: the course lists {} lecture(s).",
            skipped.join(", "),
            listing.len()
        );
        tracing::warn!(out_of_range = ?selected.out_of_range, total = listing.len(), "out-of-range lectures skipped");
    }
    if selected.indices.is_empty() {
        println!("Nothing to download.");
        return Ok(());
    }

    let format_name = overrides.format.as_deref().unwrap_or(&cfg.default_format);
    let format = MediaFormat::from_name_lossy(format_name);
    if !format_name.eq_ignore_ascii_case(format.as_str()) {
        eprintln!("Unknown format '{}', using {}.", format_name, format);
    }
    let opts = BatchOptions {
        format,
        download: download_options(cfg, globals.quiet, overrides.chunk_size, overrides.output_dir)?,
    };

    let items: Vec<BatchItem> = selected
        .indices
        .iter()
        .map(|&index| BatchItem {
            index,
            lecture_url: listing[index - 1].clone(),
        })
        .collect();
    let total = items.len();
    if !globals.quiet {
        println!("Starting download of {} lecture(s)", total);
    }

    let cancel = globals.cancel.clone();
    let report = blocking(move || {
        let printer = ProgressPrinter::new();
        batch::run_batch(portal, &session, items, &opts, &cancel, Some(&printer))
    })
    .await?;

    for outcome in &report.outcomes {
        match &outcome.result {
            Ok(done) if done.was_already_complete() && !globals.quiet => {
                println!("Lecture {}: {} already complete", outcome.item.index, done.destination.display());
            }
            Ok(_) => {}
            Err(e) => eprintln!("Lecture {} failed: {}", outcome.item.index, e),
        }
    }
    if !report.all_succeeded() {
        bail!("{} of {} lecture(s) failed", report.failed(), total);
    }
    if !globals.quiet {
        println!("Downloaded {} lecture(s).", report.succeeded());
    }
    Ok(())
}
