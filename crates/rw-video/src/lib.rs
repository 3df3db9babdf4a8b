//! Video embedding directives for the RW documentation engine.
//!
//! Three directives turn markdown into video markup and register the result
//! with a content database:
//!
//! - `:::video[divid]{...}` with one source URL per line: a self-hosted
//!   `<video>` element plus a popup or inline click-to-play script
//! - `::youtube[VIDEO_ID]{...}`: a `data-video-*` placeholder for the YouTube
//!   player script
//! - `::vimeo[VIDEO_ID]{...}`: a Vimeo `<iframe>`
//!
//! # Architecture
//!
//! Each directive exposes two independently callable phases:
//!
//! 1. `normalize(invocation, ctx) -> Descriptor` validates the raw options and
//!    applies defaults
//! 2. `render(&descriptor) -> Html` expands the descriptor into a template
//!
//! [`VideoDirective::run`] chains them with the content-store registrations.
//! Self-hosted videos render inside `run`; embedded videos return a
//! [`PendingVideo`] rendered later by [`PendingVideo::visit`].
//! [`DocumentProcessor`] drives both passes over a markdown document.
//!
//! # Example
//!
//! ```
//! use rw_video::{BuildContext, DirectiveRegistry, DocumentProcessor, MemoryStore, render_markdown};
//!
//! let mut registry = DirectiveRegistry::new();
//! rw_video::init(&mut registry);
//!
//! let store = MemoryStore::new();
//! let mut processor = DocumentProcessor::new(&registry, &store, BuildContext::new("thinkcspy"));
//!
//! let source = ":::video[d1]{controls loop thumb=_static/t.png}\na.mov\na.webm\n:::\n";
//! let html = render_markdown(&mut processor, source).unwrap();
//!
//! assert!(html.contains(r#"<source src="a.mov" type="video/mp4"></source>"#));
//! assert!(store.html("d1", "thinkcspy").is_some());
//! ```

mod context;
pub mod embed;
mod error;
mod invocation;
mod markdown;
mod node;
mod processor;
mod registry;
mod store;
pub mod template;
pub mod validate;
pub mod video;

pub use context::{BuildContext, DEFAULT_HEIGHT, DEFAULT_WIDTH};
pub use embed::{EmbedDescriptor, VimeoDirective, YoutubeDirective};
pub use error::{DocumentError, StoreError, VideoError};
pub use invocation::{DirectiveInvocation, OptionValue};
pub use markdown::render_markdown;
pub use node::{PendingVideo, VideoNode};
pub use processor::DocumentProcessor;
pub use registry::{DirectiveRegistry, VideoDirective, init};
pub use store::{ContentStore, FileStore, MemoryStore, QuestionRecord, StoreCall};
pub use video::{Presentation, SelfHostedVideoDirective, VideoDescriptor, VideoSource};

