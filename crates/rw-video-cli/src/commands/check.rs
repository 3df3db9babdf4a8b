//! `rw-video check` command implementation.

use std::path::{Path, PathBuf};

use clap::Args;
use rw_video::{DirectiveRegistry, DocumentProcessor, MemoryStore, render_markdown};
use rw_video_config::VideoConfig;

use super::{SettingsArgs, build_context, read_source};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the check command.
#[derive(Args)]
pub(crate) struct CheckArgs {
    /// Markdown files to check.
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    #[command(flatten)]
    settings: SettingsArgs,
}

impl CheckArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let config = self.settings.load()?;

        let mut registry = DirectiveRegistry::new();
        rw_video::init(&mut registry);

        let mut failed = 0usize;
        let mut videos = 0usize;
        for input in &self.inputs {
            match check_file(&registry, &config.video_resolved, input) {
                Ok(count) => {
                    videos += count;
                    output.info(&format!("{}: {count} video(s)", input.display()));
                }
                Err(err) => {
                    failed += 1;
                    output.warning(&err.to_string());
                }
            }
        }

        if failed > 0 {
            return Err(CliError::Validation(format!(
                "{failed} of {} file(s) failed",
                self.inputs.len()
            )));
        }

        output.success(&format!(
            "Checked {} file(s), {videos} video(s)",
            self.inputs.len()
        ));
        Ok(())
    }
}

/// Run every directive of one file against an in-memory store.
fn check_file(
    registry: &DirectiveRegistry,
    video: &VideoConfig,
    input: &Path,
) -> Result<usize, CliError> {
    let markdown = read_source(input)?;
    let store = MemoryStore::new();

    let mut processor = DocumentProcessor::new(registry, &store, build_context(video, input));
    render_markdown(&mut processor, &markdown).map_err(|source| CliError::Document {
        path: input.to_path_buf(),
        source,
    })?;

    Ok(processor.directive_count())
}
