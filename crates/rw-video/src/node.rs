//! Directive results handed back to the host.

use crate::embed::EmbedDescriptor;
use crate::store::{ContentStore, register_html};
use crate::template::Template;
use crate::VideoError;

/// Output of [`VideoDirective::run`](crate::VideoDirective::run).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VideoNode {
    /// Final HTML, already registered with the content store.
    Raw(String),
    /// Normalized descriptor whose HTML is produced during the render pass.
    Deferred(PendingVideo),
}

/// An embedded video waiting for the render pass.
///
/// [`visit`](Self::visit) expands the template and registers the HTML;
/// [`depart`](Self::depart) closes the node and does nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingVideo {
    /// Directive name.
    pub name: &'static str,
    /// Line of the directive in the source document.
    pub line: usize,
    /// Normalized options.
    pub descriptor: EmbedDescriptor,
    template: Template,
}

impl PendingVideo {
    pub(crate) fn new(
        name: &'static str,
        line: usize,
        descriptor: EmbedDescriptor,
        template: Template,
    ) -> Self {
        Self {
            name,
            line,
            descriptor,
            template,
        }
    }

    /// Render the HTML and register it under `(divid, basecourse)`.
    pub fn visit(&self, store: &dyn ContentStore) -> Result<String, VideoError> {
        let html = self.template.expand(&self.descriptor)?;
        register_html(
            store,
            &self.descriptor.divid,
            &self.descriptor.basecourse,
            &html,
        );
        Ok(html)
    }

    /// Close the node. Embedded videos have no closing markup.
    pub fn depart(&self) {}
}
