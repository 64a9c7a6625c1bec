use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::transport::HttpOptions;

/// Global configuration loaded from `~/.config/pdl/config.toml`.
///
/// Credentials are never stored here; they are asked for on every run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PdlConfig {
    /// Bytes buffered before each append+flush to the destination file.
    pub chunk_size: usize,
    /// Format used when none is given on the command line ("video", "iphone", "audio").
    pub default_format: String,
    /// Directory for downloaded lectures (None = current directory).
    pub output_dir: Option<PathBuf>,
    /// Connection establishment timeout in seconds.
    pub connect_timeout_secs: u64,
    /// Optional hard cap on a single request in seconds (None = no cap).
    pub request_timeout_secs: Option<u64>,
    /// Abort a transfer slower than this many bytes per second...
    pub low_speed_limit_bytes: u32,
    /// ...for this many seconds.
    pub low_speed_time_secs: u64,
    /// Redirects followed per request.
    pub max_redirections: u32,
}

impl Default for PdlConfig {
    fn default() -> Self {
        Self {
            chunk_size: 1_000_000,
            default_format: "video".to_string(),
            output_dir: None,
            connect_timeout_secs: 30,
            request_timeout_secs: None,
            low_speed_limit_bytes: 1024,
            low_speed_time_secs: 60,
            max_redirections: 10,
        }
    }
}

impl PdlConfig {
    /// Transport settings applied to every curl handle.
    pub fn http_options(&self) -> HttpOptions {
        HttpOptions {
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            timeout: self.request_timeout_secs.map(Duration::from_secs),
            low_speed_limit: self.low_speed_limit_bytes,
            low_speed_time: Duration::from_secs(self.low_speed_time_secs),
            max_redirections: self.max_redirections,
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("pdl")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<PdlConfig> {
    load_or_init_at(&config_path()?)
}

/// Like [`load_or_init`] for an explicit file. Keys missing from the file
/// take their default value, so older config files keep working.
pub fn load_or_init_at(path: &Path) -> Result<PdlConfig> {
    if !path.exists() {
        let default_cfg = PdlConfig::default();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml::to_string_pretty(&default_cfg)?)
            .with_context(|| format!("write default config: {}", path.display()))?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(path)?;
    toml::from_str(&data).with_context(|| format!("parse config: {}", path.display()))
}
