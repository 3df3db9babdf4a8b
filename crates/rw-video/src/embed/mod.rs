//! Embedded-provider videos (YouTube, Vimeo).
//!
//! Both providers share one option set: a provider video id as the argument,
//! plus `divid`, `width`, `height`, `align` and `http`. YouTube adds `start`
//! and `end`.

pub mod vimeo;
pub mod youtube;

pub use vimeo::VimeoDirective;
pub use youtube::YoutubeDirective;

use serde::Serialize;

use crate::context::BuildContext;
use crate::invocation::DirectiveInvocation;
use crate::validate;
use crate::VideoError;

/// Allowed values for `align`.
pub const ALIGNMENTS: &[&str] = &["left", "center", "right"];
/// Allowed values for `http`.
pub const SCHEMES: &[&str] = &["http", "https"];

const COMMON_OPTIONS: &[&str] = &["divid", "height", "width", "align", "http", "question_label"];

/// Normalized options of an embedded video.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmbedDescriptor {
    /// Component identifier.
    pub divid: String,
    /// Course identifier.
    pub basecourse: String,
    /// Display label; empty when not set.
    pub question_label: String,
    /// Provider video id.
    pub video_id: String,
    /// Player width in pixels.
    pub width: u32,
    /// Player height in pixels.
    pub height: u32,
    /// One of [`ALIGNMENTS`].
    pub align: String,
    /// One of [`SCHEMES`].
    pub http: String,
    /// Start offset in seconds.
    pub start: u32,
    /// End offset in seconds, `-1` for the end of the video.
    pub end: i64,
}

impl EmbedDescriptor {
    /// Rebuild an invocation that normalizes back to this descriptor.
    #[must_use]
    pub fn to_invocation(&self, name: &str) -> DirectiveInvocation {
        let mut inv = DirectiveInvocation::new(name, &self.video_id)
            .with_option("divid", &self.divid)
            .with_option("width", self.width.to_string())
            .with_option("height", self.height.to_string())
            .with_option("align", &self.align)
            .with_option("http", &self.http);
        if !self.question_label.is_empty() {
            inv = inv.with_option("question_label", &self.question_label);
        }
        if self.start > 0 {
            inv = inv.with_option("start", self.start.to_string());
        }
        if self.end >= 0 {
            inv = inv.with_option("end", self.end.to_string());
        }
        inv
    }
}

/// Which optional YouTube-only offsets the directive accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Offsets {
    Accepted,
    Rejected,
}

/// Shared normalization for embedded videos.
pub(crate) fn normalize(
    inv: &DirectiveInvocation,
    ctx: &BuildContext,
    offsets: Offsets,
) -> Result<EmbedDescriptor, VideoError> {
    match offsets {
        Offsets::Accepted => {
            let mut allowed = COMMON_OPTIONS.to_vec();
            allowed.extend(["start", "end"]);
            validate::known_options(inv, &allowed)?;
        }
        Offsets::Rejected => validate::known_options(inv, COMMON_OPTIONS)?,
    }

    let video_id = validate::uri(&inv.argument)?;

    let width = dimension(inv, "width")?.unwrap_or(ctx.default_width);
    let height = dimension(inv, "height")?.unwrap_or(ctx.default_height);

    let align = match non_empty(inv, "align")? {
        Some(raw) => validate::choice("align", raw, ALIGNMENTS)?,
        None => "left",
    };
    let http = match non_empty(inv, "http")? {
        Some(raw) => validate::choice("http", raw, SCHEMES)?,
        None => "https",
    };

    let divid = match non_empty(inv, "divid")? {
        Some(raw) => validate::divid(raw)?,
        None => validate::divid(&inv.argument)?,
    };

    let (start, end) = match offsets {
        Offsets::Accepted => {
            let start = non_empty(inv, "start")?
                .map(|raw| validate::nonnegative_int("start", raw))
                .transpose()?
                .unwrap_or(0);
            let end = match non_empty(inv, "end")? {
                Some(raw) => match validate::nonnegative_int("end", raw)? {
                    0 => -1,
                    n => i64::from(n),
                },
                None => -1,
            };
            (start, end)
        }
        Offsets::Rejected => (0, -1),
    };

    Ok(EmbedDescriptor {
        divid,
        basecourse: ctx.basecourse.clone(),
        question_label: non_empty(inv, "question_label")?
            .map(str::to_owned)
            .unwrap_or_default(),
        video_id,
        width,
        height,
        align: align.to_owned(),
        http: http.to_owned(),
        start,
        end,
    })
}

/// Option value, with an empty string treated as unset.
fn non_empty<'a>(inv: &'a DirectiveInvocation, key: &str) -> Result<Option<&'a str>, VideoError> {
    Ok(validate::value(inv, key)?.filter(|v| !v.trim().is_empty()))
}

/// `width`/`height`: `0` and unset both fall back to the default.
fn dimension(inv: &DirectiveInvocation, key: &str) -> Result<Option<u32>, VideoError> {
    Ok(non_empty(inv, key)?
        .map(|raw| validate::nonnegative_int(key, raw))
        .transpose()?
        .filter(|&n| n > 0))
}
