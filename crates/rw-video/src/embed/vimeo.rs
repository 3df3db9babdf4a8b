//! `::vimeo[VIDEO_ID]{...}` directive.

use super::{EmbedDescriptor, Offsets};
use crate::context::BuildContext;
use crate::invocation::DirectiveInvocation;
use crate::node::{PendingVideo, VideoNode};
use crate::registry::VideoDirective;
use crate::store::ContentStore;
use crate::template;
use crate::VideoError;

/// Normalize a `vimeo` invocation.
pub fn normalize(
    inv: &DirectiveInvocation,
    ctx: &BuildContext,
) -> Result<EmbedDescriptor, VideoError> {
    super::normalize(inv, ctx, Offsets::Rejected)
}

/// Render a normalized Vimeo descriptor.
pub fn render(descriptor: &EmbedDescriptor) -> Result<String, VideoError> {
    template::VIMEO.expand(descriptor)
}

/// Vimeo iframe directive. Never registers a question.
#[derive(Debug, Default, Clone, Copy)]
pub struct VimeoDirective;

impl VideoDirective for VimeoDirective {
    fn name(&self) -> &'static str {
        "vimeo"
    }

    fn run(
        &self,
        inv: &DirectiveInvocation,
        ctx: &BuildContext,
        _store: &dyn ContentStore,
    ) -> Result<VideoNode, VideoError> {
        let descriptor = normalize(inv, ctx)?;
        tracing::debug!(divid = %descriptor.divid, video_id = %descriptor.video_id, "Normalized vimeo directive");

        Ok(VideoNode::Deferred(PendingVideo::new(
            self.name(),
            inv.line,
            descriptor,
            template::VIMEO,
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use pretty_assertions::assert_eq;

    fn html_for(inv: &DirectiveInvocation) -> String {
        render(&normalize(inv, &BuildContext::new("course")).unwrap()).unwrap()
    }

    #[test]
    fn test_default_scheme_is_https() {
        let html = html_for(&DirectiveInvocation::new("vimeo", "76979871"));
        assert!(html.starts_with(r#"<iframe src="https://player.vimeo.com/video/76979871""#));
    }

    #[test]
    fn test_scheme_follows_option() {
        for scheme in ["http", "https"] {
            let html =
                html_for(&DirectiveInvocation::new("vimeo", "76979871").with_option("http", scheme));
            assert!(html.starts_with(&format!(
                r#"<iframe src="{scheme}://player.vimeo.com/video/76979871""#
            )));
        }
    }

    #[test]
    fn test_full_iframe() {
        let html = html_for(
            &DirectiveInvocation::new("vimeo", "42")
                .with_option("width", "560")
                .with_option("height", "315")
                .with_option("align", "right"),
        );
        assert_eq!(
            html,
            r#"<iframe src="https://player.vimeo.com/video/42" width="560" height="315" frameborder="0" webkitAllowFullScreen mozallowfullscreen allowFullScreen class="align-right" seamless ></iframe>"#
        );
    }

    #[test]
    fn test_no_question_registered() {
        let store = MemoryStore::new();
        let inv = DirectiveInvocation::new("vimeo", "42");
        let node = VimeoDirective
            .run(&inv, &BuildContext::new("course"), &store)
            .unwrap();
        assert!(store.calls().is_empty());

        let VideoNode::Deferred(pending) = node else {
            panic!("expected deferred node");
        };
        pending.visit(&store).unwrap();
        assert!(store.questions().is_empty());
        assert!(store.html("42", "course").is_some());
    }
}
