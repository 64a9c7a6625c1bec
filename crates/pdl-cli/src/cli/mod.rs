//! CLI for PDL, the PoliTo lecture downloader.

mod commands;
mod progress;
mod prompt;
mod selection;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;
use pdl_core::auth::Credentials;
use pdl_core::config;
use pdl_core::control::CancelToken;
use std::path::PathBuf;

use commands::{
    cancel_on_ctrl_c, run_completions, run_download, run_fetch, run_list, run_syllabus, Globals,
};

/// Top-level CLI for PDL.
#[derive(Debug, Parser)]
#[command(name = "pdl", version)]
#[command(about = "PDL: download video lectures from the PoliTo portals", long_about = None)]
pub struct Cli {
    /// Portal username (prompted when missing).
    #[arg(short, long, global = true)]
    pub username: Option<String>,

    /// Portal password (prompted when missing).
    #[arg(short, long, global = true)]
    pub password: Option<String>,

    /// Do not print progress.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: CliCommand,
}

/// Which lectures of a course to download. Indices are 1-based.
#[derive(Debug, Clone, Default, Args)]
pub struct LectureSelection {
    /// Lecture to start at (default 1).
    #[arg(long, value_name = "N")]
    pub lecture_start: Option<usize>,

    /// Lecture to end at, inclusive (default last).
    #[arg(long, value_name = "N")]
    pub lecture_end: Option<usize>,

    /// Comma-separated lecture numbers, e.g. 1,2,5,8. Overrides start/end.
    #[arg(long, value_name = "ITEMS", value_delimiter = ',')]
    pub lecture_items: Vec<usize>,
}

/// Per-run overrides of configuration values.
#[derive(Debug, Clone, Default, Args)]
pub struct DownloadOverrides {
    /// Media format: video, iphone or audio (unknown names fall back to video).
    #[arg(long, value_name = "FORMAT")]
    pub format: Option<String>,

    /// Bytes written per chunk (default from config).
    #[arg(long, value_name = "BYTES")]
    pub chunk_size: Option<usize>,

    /// Directory for the downloaded files (default from config, else current directory).
    #[arg(long, short = 'o', value_name = "DIR")]
    pub output_dir: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Download the lectures of a course page.
    Download {
        /// Course page on didattica.polito.it or elearning.polito.it.
        url: String,

        #[command(flatten)]
        selection: LectureSelection,

        #[command(flatten)]
        overrides: DownloadOverrides,
    },

    /// List the lectures of a course page with their numbers.
    List {
        /// Course page URL.
        url: String,
    },

    /// Print the course syllabus, or save it to a file.
    Syllabus {
        /// Course page URL.
        url: String,

        /// Save instead of printing (default file syllabus.txt).
        #[arg(long, value_name = "FILE", num_args = 0..=1, default_missing_value = "syllabus.txt")]
        save: Option<PathBuf>,
    },

    /// Download a single direct media URL, resuming a partial file.
    Fetch {
        /// Direct HTTP/HTTPS URL.
        url: String,

        /// Destination file (default: named after the URL, in the output directory).
        #[arg(long, short = 'o', value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Print a shell completion script.
    Completions {
        /// Target shell.
        shell: Shell,
    },
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        if let CliCommand::Completions { shell } = cli.command {
            return run_completions(shell);
        }

        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);
        let globals = Globals {
            credentials: Credentials::new(cli.username, cli.password),
            quiet: cli.quiet,
            cancel: CancelToken::new(),
        };
        cancel_on_ctrl_c(globals.cancel.clone());

        match cli.command {
            CliCommand::Download {
                url,
                selection,
                overrides,
            } => run_download(&globals, &cfg, &url, &selection, overrides).await?,
            CliCommand::List { url } => run_list(&globals, &cfg, &url).await?,
            CliCommand::Syllabus { url, save } => run_syllabus(&globals, &cfg, &url, save).await?,
            CliCommand::Fetch { url, output } => run_fetch(&globals, &cfg, &url, output).await?,
            CliCommand::Completions { .. } => {}
        }

        Ok(())
    }
}
