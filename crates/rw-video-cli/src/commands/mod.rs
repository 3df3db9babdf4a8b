//! CLI command implementations.

mod check;
mod render;

use std::path::{Path, PathBuf};

use clap::Args;
use rw_video::BuildContext;
use rw_video_config::{CliSettings, Config, VideoConfig};

use crate::error::CliError;

pub(crate) use check::CheckArgs;
pub(crate) use render::RenderArgs;

/// Configuration arguments shared by all commands.
#[derive(Args)]
pub(crate) struct SettingsArgs {
    /// Path to configuration file (default: auto-discover rw.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Course identifier (overrides config).
    #[arg(long, env = "RW_VIDEO_BASECOURSE")]
    basecourse: Option<String>,

    /// Content store directory (overrides config).
    #[arg(long)]
    store_dir: Option<PathBuf>,

    /// Use the popup player for self-hosted videos by default.
    #[arg(long)]
    popup: bool,
}

impl SettingsArgs {
    /// Load `rw.toml` with the command-line overrides applied.
    pub(crate) fn load(&self) -> Result<Config, CliError> {
        let cli_settings = CliSettings {
            basecourse: self.basecourse.clone(),
            store_dir: self.store_dir.clone(),
            popup: self.popup.then_some(true),
        };
        Ok(Config::load(self.config.as_deref(), Some(&cli_settings))?)
    }
}

/// Build context for one source file.
pub(crate) fn build_context(video: &VideoConfig, source: &Path) -> BuildContext {
    BuildContext::new(video.basecourse.as_str())
        .with_popup(video.popup)
        .with_default_size(video.default_width, video.default_height)
        .with_source_path(source)
}

/// Read a markdown source file.
pub(crate) fn read_source(path: &Path) -> Result<String, CliError> {
    std::fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })
}
