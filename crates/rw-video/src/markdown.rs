//! Markdown to HTML with video directives.

use pulldown_cmark::{Options, Parser, html};

use crate::error::DocumentError;
use crate::processor::DocumentProcessor;

/// Render a markdown document to an HTML fragment, expanding video directives.
///
/// Runs the parse pass, pulldown-cmark, then the render pass.
///
/// # Example
///
/// ```
/// use rw_video::{BuildContext, DirectiveRegistry, DocumentProcessor, MemoryStore, render_markdown};
///
/// let mut registry = DirectiveRegistry::new();
/// rw_video::init(&mut registry);
/// let store = MemoryStore::new();
/// let mut processor = DocumentProcessor::new(&registry, &store, BuildContext::new("course"));
///
/// let html = render_markdown(&mut processor, "# Lesson\n\n::youtube[anwy2MPT5RE]\n").unwrap();
/// assert!(html.contains("<h1>Lesson</h1>"));
/// assert!(html.contains(r#"data-video-videoid="anwy2MPT5RE""#));
/// ```
pub fn render_markdown(
    processor: &mut DocumentProcessor<'_>,
    markdown: &str,
) -> Result<String, DocumentError> {
    let preprocessed = processor.process(markdown)?;

    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_FOOTNOTES);
    options.insert(Options::ENABLE_TASKLISTS);

    let parser = Parser::new_ext(&preprocessed, options);
    let mut output = String::with_capacity(preprocessed.len() * 3 / 2);
    html::push_html(&mut output, parser);

    processor.post_process(&mut output)?;
    Ok(output)
}
