//! `rw-video render` command implementation.

use std::io::Write;
use std::path::{Path, PathBuf};

use clap::Args;
use rw_video::{DirectiveRegistry, DocumentProcessor, FileStore, render_markdown};
use rw_video_config::VideoConfig;

use super::{SettingsArgs, build_context, read_source};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the render command.
#[derive(Args)]
pub(crate) struct RenderArgs {
    /// Markdown file to render.
    input: PathBuf,

    /// Write the HTML fragment here instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,

    #[command(flatten)]
    settings: SettingsArgs,
}

impl RenderArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let config = self.settings.load()?;

        let (html, count) = render_file(&config.video_resolved, &self.input)?;

        match &self.output {
            Some(path) => {
                if let Some(parent) = path.parent()
                    && !parent.as_os_str().is_empty()
                {
                    std::fs::create_dir_all(parent)?;
                }
                std::fs::write(path, &html)?;
                output.success(&format!("Rendered {} to {}", self.input.display(), path.display()));
            }
            None => {
                let mut stdout = std::io::stdout().lock();
                stdout.write_all(html.as_bytes())?;
                stdout.flush()?;
            }
        }

        output.info(&format!(
            "{count} video directive(s) registered in {}",
            config.video_resolved.store_dir.display()
        ));
        Ok(())
    }
}

/// Render one file, registering its videos in the file store.
///
/// Returns the HTML fragment and the number of video directives.
fn render_file(video: &VideoConfig, input: &Path) -> Result<(String, usize), CliError> {
    let markdown = read_source(input)?;

    let mut registry = DirectiveRegistry::new();
    rw_video::init(&mut registry);
    let store = FileStore::new(&video.store_dir);

    let mut processor = DocumentProcessor::new(&registry, &store, build_context(video, input));
    let html = render_markdown(&mut processor, &markdown).map_err(|source| CliError::Document {
        path: input.to_path_buf(),
        source,
    })?;

    tracing::info!(
        path = %input.display(),
        videos = processor.directive_count(),
        "Rendered document"
    );
    Ok((html, processor.directive_count()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn config(root: &Path) -> VideoConfig {
        VideoConfig {
            basecourse: "thinkcspy".to_owned(),
            popup: false,
            default_width: 500,
            default_height: 281,
            store_dir: root.join("content"),
        }
    }

    #[test]
    fn test_render_file_writes_store() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("intro.md");
        std::fs::write(
            &input,
            "# Intro\n\n:::video[d1]{controls}\na.mp4.webm\n:::\n\n::youtube[abc]\n",
        )
        .unwrap();
        let video = config(dir.path());

        let (html, count) = render_file(&video, &input).unwrap();

        assert_eq!(count, 2);
        assert!(html.contains("<h1>Intro</h1>"));
        assert!(html.contains(r#"type="video/webm""#));
        assert!(html.contains(r#"data-video-videoid="abc""#));

        let store = FileStore::new(&video.store_dir);
        assert!(store.html_path("d1", "thinkcspy").unwrap().exists());
        assert!(store.html_path("abc", "thinkcspy").unwrap().exists());
        let question = store.read_question("abc", "thinkcspy").unwrap();
        assert_eq!(question.question_type, "youtube");
        assert_eq!(question.source_path.as_deref(), Some(input.as_path()));
    }

    #[test]
    fn test_render_file_reports_path_on_error() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("bad.md");
        std::fs::write(&input, ":::video[d1]\nclip.avi\n:::\n").unwrap();

        let err = render_file(&config(dir.path()), &input).unwrap_err();

        assert!(matches!(err, CliError::Document { .. }));
        assert!(err.to_string().starts_with(&input.display().to_string()));
    }
}
