//! Self-hosted `<video>` directive.
//!
//! ```text
//! :::video[intro]{controls loop thumb=_static/still.png}
//! _static/intro.mov
//! _static/intro.webm
//! :::
//! ```

use serde::Serialize;

use crate::context::BuildContext;
use crate::invocation::DirectiveInvocation;
use crate::node::VideoNode;
use crate::registry::VideoDirective;
use crate::store::{ContentStore, QuestionRecord, register_html, register_question};
use crate::template;
use crate::validate;
use crate::VideoError;

/// File extension to `video/*` subtype.
const MIME_SUBTYPES: &[(&str, &str)] = &[("mov", "mp4"), ("webm", "webm"), ("m4v", "m4v")];

const OPTIONS: &[&str] = &[
    "divid",
    "controls",
    "loop",
    "thumb",
    "preload",
    "popup",
    "inline",
    "question_label",
];

/// One `<source>` child.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VideoSource {
    /// Source URL.
    pub src: String,
    /// Subtype for `type="video/{mime}"`.
    pub mime: &'static str,
}

impl VideoSource {
    fn to_html(&self) -> String {
        format!(
            r#"<source src="{}" type="video/{}"></source>"#,
            self.src, self.mime
        )
    }
}

/// How the thumbnail reveals the video.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Presentation {
    /// Show the video in place and log a play event.
    Inline,
    /// Open the video in a modal.
    Popup,
}

/// Normalized options of a self-hosted video.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VideoDescriptor {
    /// Component identifier.
    pub divid: String,
    /// Course identifier.
    pub basecourse: String,
    /// Display label; empty when not set.
    pub question_label: String,
    /// `controls` attribute token, or empty.
    pub controls: &'static str,
    /// `loop` attribute token, or empty.
    pub loop_attr: &'static str,
    /// `preload="auto"` or `preload="none"`.
    pub preload: &'static str,
    /// Poster image URL; empty when not set.
    pub thumb: String,
    /// Sources in content order.
    pub source_list: Vec<VideoSource>,
    /// `<source>` fragments joined for the template.
    pub sources: String,
    /// Script variant.
    pub presentation: Presentation,
}

impl VideoDescriptor {
    /// Rebuild an invocation that normalizes back to this descriptor.
    #[must_use]
    pub fn to_invocation(&self) -> DirectiveInvocation {
        let mut inv = DirectiveInvocation::new("video", &self.divid);
        if !self.controls.is_empty() {
            inv = inv.with_flag("controls");
        }
        if !self.loop_attr.is_empty() {
            inv = inv.with_flag("loop");
        }
        if self.preload == PRELOAD_AUTO {
            inv = inv.with_flag("preload");
        }
        if !self.thumb.is_empty() {
            inv = inv.with_option("thumb", &self.thumb);
        }
        if !self.question_label.is_empty() {
            inv = inv.with_option("question_label", &self.question_label);
        }
        inv = inv.with_flag(match self.presentation {
            Presentation::Inline => "inline",
            Presentation::Popup => "popup",
        });
        for source in &self.source_list {
            inv = inv.with_line(&source.src);
        }
        inv
    }
}

const PRELOAD_AUTO: &str = r#"preload="auto""#;
const PRELOAD_NONE: &str = r#"preload="none""#;

/// Derive the `video/*` subtype from a source URL's file extension.
pub fn mime_subtype(url: &str) -> Result<&'static str, VideoError> {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    let file = path.rsplit('/').next().unwrap_or(path);
    let ext = file
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .ok_or_else(|| VideoError::UnsupportedFormat {
            url: url.to_owned(),
        })?;

    MIME_SUBTYPES
        .iter()
        .find(|(e, _)| *e == ext)
        .map(|(_, mime)| *mime)
        .ok_or_else(|| VideoError::UnsupportedFormat {
            url: url.to_owned(),
        })
}

/// Normalize a `video` invocation.
pub fn normalize(
    inv: &DirectiveInvocation,
    ctx: &BuildContext,
) -> Result<VideoDescriptor, VideoError> {
    validate::known_options(inv, OPTIONS)?;

    let divid = match validate::value(inv, "divid")? {
        Some(raw) => validate::divid(raw)?,
        None => validate::divid(&inv.argument)?,
    };

    let source_list = inv
        .content
        .iter()
        .filter(|line| !line.trim().is_empty())
        .map(|line| {
            let src = validate::uri(line)?;
            let mime = mime_subtype(&src)?;
            Ok(VideoSource { src, mime })
        })
        .collect::<Result<Vec<_>, VideoError>>()?;

    let sources = source_list
        .iter()
        .map(VideoSource::to_html)
        .collect::<Vec<_>>()
        .join("\n    ");

    let thumb = validate::value(inv, "thumb")?
        .map(validate::uri)
        .transpose()?
        .unwrap_or_default();

    let presentation = match (validate::flag(inv, "popup")?, validate::flag(inv, "inline")?) {
        (true, true) => {
            return Err(VideoError::invalid_option(
                "popup",
                "",
                "popup and inline are mutually exclusive",
            ));
        }
        (true, false) => Presentation::Popup,
        (false, true) => Presentation::Inline,
        (false, false) if ctx.popup => Presentation::Popup,
        (false, false) => Presentation::Inline,
    };

    Ok(VideoDescriptor {
        divid,
        basecourse: ctx.basecourse.clone(),
        question_label: validate::value(inv, "question_label")?
            .map(str::to_owned)
            .unwrap_or_default(),
        controls: if validate::flag(inv, "controls")? {
            "controls"
        } else {
            ""
        },
        loop_attr: if validate::flag(inv, "loop")? { "loop" } else { "" },
        preload: if validate::flag(inv, "preload")? {
            PRELOAD_AUTO
        } else {
            PRELOAD_NONE
        },
        thumb,
        source_list,
        sources,
        presentation,
    })
}

/// Render a normalized self-hosted video: the `<video>` block followed by
/// the popup or inline script.
pub fn render(descriptor: &VideoDescriptor) -> Result<String, VideoError> {
    let mut html = template::VIDEO.expand(descriptor)?;
    let script = match descriptor.presentation {
        Presentation::Popup => template::POPUP,
        Presentation::Inline => template::INLINE,
    };
    html.push_str(&script.expand(descriptor)?);
    Ok(html)
}

/// Self-hosted video directive.
///
/// Registers a question, renders, and registers the HTML, all inside
/// [`run`](VideoDirective::run).
#[derive(Debug, Default, Clone, Copy)]
pub struct SelfHostedVideoDirective;

impl VideoDirective for SelfHostedVideoDirective {
    fn name(&self) -> &'static str {
        "video"
    }

    fn has_content(&self) -> bool {
        true
    }

    fn run(
        &self,
        inv: &DirectiveInvocation,
        ctx: &BuildContext,
        store: &dyn ContentStore,
    ) -> Result<VideoNode, VideoError> {
        let descriptor = normalize(inv, ctx)?;
        tracing::debug!(
            divid = %descriptor.divid,
            sources = descriptor.source_list.len(),
            "Normalized video directive"
        );

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

        let html = render(&descriptor)?;
        register_html(store, &descriptor.divid, &descriptor.basecourse, &html);

        Ok(VideoNode::Raw(html))
    }
}
