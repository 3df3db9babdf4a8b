//! HTML templates and the placeholder expander.
//!
//! Templates use `{{ name }}` placeholders filled from a serialized
//! descriptor. Every placeholder must resolve to a descriptor field; a
//! missing one is reported as [`VideoError::MissingKey`] before rendering.
//! Values are inserted verbatim (no escaping), so descriptors only carry
//! values that passed [`validate`](crate::validate).

use minijinja::{Environment, UndefinedBehavior, Value};
use serde::Serialize;

use crate::VideoError;

/// A named template string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Template {
    /// Template name, used in error messages.
    pub name: &'static str,
    /// Template source.
    pub source: &'static str,
}

impl Template {
    /// Placeholder names referenced by this template, in order of first use.
    #[must_use]
    pub fn placeholders(&self) -> Vec<&'static str> {
        let mut names = Vec::new();
        let mut rest = self.source;

        while let Some(start) = rest.find("{{") {
            let after = &rest[start + 2..];
            let Some(end) = after.find("}}") else {
                break;
            };
            let expr = after[..end].trim();
            let ident_end = expr
                .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
                .unwrap_or(expr.len());
            let ident = &expr[..ident_end];
            if !ident.is_empty() && !names.contains(&ident) {
                names.push(ident);
            }
            rest = &after[end + 2..];
        }

        names
    }

    /// Substitute `descriptor` into the template.
    pub fn expand<S: Serialize>(&self, descriptor: &S) -> Result<String, VideoError> {
        let ctx = Value::from_serialize(descriptor);

        for name in self.placeholders() {
            let present = ctx.get_attr(name).is_ok_and(|v| !v.is_undefined());
            if !present {
                return Err(VideoError::MissingKey(name.to_owned()));
            }
        }

        let mut env = Environment::new();
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        env.set_keep_trailing_newline(true);

        env.render_str(self.source, ctx)
            .map_err(|e| VideoError::Template(format!("{}: {e}", self.name)))
    }
}

/// `<video>` element with one `<source>` per URL.
pub const VIDEO: Template = Template {
    name: "video",
    source: r#"<div id="{{ divid }}" class="video_popup runestone" >
<video {{ controls }} {{ preload }} {{ loop_attr }} poster="{{ thumb }}">
    {{ sources }}
    No supported video types
</video>
</div>
"#,
};

/// Thumbnail anchor that opens the video in a modal.
pub const POPUP: Template = Template {
    name: "popup",
    source: r#"<a id="{{ divid }}_thumb" style='position:relative;'>
    <img src="{{ thumb }}" />
    <div class='video-play-overlay'></div>
</a>
<script>
  window.addEventListener('load', (event) => {
    jQuery(function ($) {
       $('#{{ divid }}_thumb').click(function (e) {
                $('#{{ divid }}').modal();
                return false;
        });
    });
  });
</script>

"#,
};

/// Click-to-reveal script that logs a play event.
pub const INLINE: Template = Template {
    name: "inline",
    source: r#"<script>
  window.addEventListener('load', (event) => {
    jQuery(function($) {
        var rb = new RunestoneBase();
        $('#{{ divid }}_thumb').click(function(e) {
            $('#{{ divid }}').show();
            $('#{{ divid }}_thumb').hide();
            rb.logBookEvent({'event':'video','act':'play','div_id': '{{ divid }}'});
        });
        $('#{{ divid }} video').one("click", function(){
            this.play();
        });
        $('#{{ divid }} video').one("play", function(){
            rb.logBookEvent({'event':'video','act':'play','div_id': '{{ divid }}'});
        });
    });
  });
</script>
"#,
};

/// YouTube player placeholder; the page script reads the `data-video-*` attributes.
pub const YOUTUBE: Template = Template {
    name: "youtube",
    source: r#"<div class="runestone" style="margin-left: auto; margin-right:auto">
    <div id="{{ divid }}" data-component="youtube" class="align-{{ align }} youtube-video"
        data-video-height="{{ height }}" data-question_label="{{ question_label }}"
        data-video-width="{{ width }}" data-video-videoid="{{ video_id }}"
        data-video-divid="{{ divid }}" data-video-start="{{ start }}"
        data-video-end="{{ end }}" ></div>
</div>
"#,
};

/// Vimeo player iframe.
pub const VIMEO: Template = Template {
    name: "vimeo",
    source: r#"<iframe src="{{ http }}://player.vimeo.com/video/{{ video_id }}" width="{{ width }}" height="{{ height }}" frameborder="0" webkitAllowFullScreen mozallowfullscreen allowFullScreen class="align-{{ align }}" seamless ></iframe>"#,
};
