//! `::youtube[VIDEO_ID]{...}` directive.

use super::{EmbedDescriptor, Offsets};
use crate::context::BuildContext;
use crate::invocation::DirectiveInvocation;
use crate::node::{PendingVideo, VideoNode};
use crate::registry::VideoDirective;
use crate::store::{ContentStore, QuestionRecord, register_question};
use crate::template;
use crate::VideoError;

/// Normalize a `youtube` invocation.
pub fn normalize(
    inv: &DirectiveInvocation,
    ctx: &BuildContext,
) -> Result<EmbedDescriptor, VideoError> {
    super::normalize(inv, ctx, Offsets::Accepted)
}

/// Render a normalized YouTube descriptor.
pub fn render(descriptor: &EmbedDescriptor) -> Result<String, VideoError> {
    template::YOUTUBE.expand(descriptor)
}

/// YouTube player directive.
///
/// Registers a question when run; the HTML is produced and registered when
/// the deferred node is visited.
///
/// ```
/// use rw_video::{BuildContext, DirectiveInvocation, MemoryStore, VideoDirective, VideoNode, YoutubeDirective};
///
/// let store = MemoryStore::new();
/// let inv = DirectiveInvocation::new("youtube", "anwy2MPT5RE").with_option("align", "center");
/// let node = YoutubeDirective.run(&inv, &BuildContext::new("course"), &store).unwrap();
///
/// let VideoNode::Deferred(pending) = node else { panic!("expected deferred node") };
/// let html = pending.visit(&store).unwrap();
/// assert!(html.contains(r#"class="align-center youtube-video""#));
/// ```
#[derive(Debug, Default, Clone, Copy)]
pub struct YoutubeDirective;

impl VideoDirective for YoutubeDirective {
    fn name(&self) -> &'static str {
        "youtube"
    }

    fn run(
        &self,
        inv: &DirectiveInvocation,
        ctx: &BuildContext,
        store: &dyn ContentStore,
    ) -> Result<VideoNode, VideoError> {
        let descriptor = normalize(inv, ctx)?;
        tracing::debug!(divid = %descriptor.divid, video_id = %descriptor.video_id, "Normalized youtube directive");

        register_question(
            store,
            &QuestionRecord {
                divid: descriptor.divid.clone(),
                basecourse: descriptor.basecourse.clone(),
                question_type: self.name().to_owned(),
                question_label: descriptor.question_label.clone(),
                source_path: ctx.source_path.clone(),
                line: inv.line,
            },
        );

        Ok(VideoNode::Deferred(PendingVideo::new(
            self.name(),
            inv.line,
            descriptor,
            template::YOUTUBE,
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryStore, StoreCall};

    fn run(inv: &DirectiveInvocation, store: &MemoryStore) -> PendingVideo {
        match YoutubeDirective.run(inv, &BuildContext::new("course"), store) {
            Ok(VideoNode::Deferred(pending)) => pending,
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_default_dimensions_in_output() {
        let inv = DirectiveInvocation::new("youtube", "anwy2MPT5RE");
        let html = render(&normalize(&inv, &BuildContext::new("course")).unwrap()).unwrap();

        assert!(html.contains(r#"data-video-width="500""#));
        assert!(html.contains(r#"data-video-height="281""#));
        assert!(html.contains(r#"data-video-start="0""#));
        assert!(html.contains(r#"data-video-end="-1""#));
        assert!(html.contains(r#"data-video-videoid="anwy2MPT5RE""#));
        assert!(html.contains(r#"data-video-divid="anwy2MPT5RE""#));
        assert!(html.contains(r#"id="anwy2MPT5RE" data-component="youtube""#));
    }

    #[test]
    fn test_alignment_class() {
        for align in ["left", "center", "right"] {
            let inv = DirectiveInvocation::new("youtube", "abc").with_option("align", align);
            let html = render(&normalize(&inv, &BuildContext::new("course")).unwrap()).unwrap();
            assert!(html.contains(&format!("class=\"align-{align} youtube-video\"")));
        }
    }

    #[test]
    fn test_invalid_alignment() {
        let inv = DirectiveInvocation::new("youtube", "abc").with_option("align", "middle");
        let err = normalize(&inv, &BuildContext::new("course")).unwrap_err();
        assert!(matches!(err, VideoError::InvalidOption { key, .. } if key == "align"));
    }

    #[test]
    fn test_question_registered_before_html() {
        let store = MemoryStore::new();
        let inv = DirectiveInvocation::new("youtube", "abc").with_option("question_label", "2.1");
        let pending = run(&inv, &store);

        let calls = store.calls();
        assert_eq!(calls.len(), 1);
        let StoreCall::Question(q) = &calls[0] else {
            panic!("expected question registration");
        };
        assert_eq!(q.question_type, "youtube");
        assert_eq!(q.question_label, "2.1");

        let html = pending.visit(&store).unwrap();
        pending.depart();
        assert_eq!(store.calls().len(), 2);
        assert_eq!(store.html("abc", "course"), Some(html));
    }

    #[test]
    fn test_offsets_rendered() {
        let inv = DirectiveInvocation::new("youtube", "abc")
            .with_option("start", "30")
            .with_option("end", "90");
        let html = render(&normalize(&inv, &BuildContext::new("course")).unwrap()).unwrap();
        assert!(html.contains(r#"data-video-start="30""#));
        assert!(html.contains(r#"data-video-end="90""#));
    }
}
