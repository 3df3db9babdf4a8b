//! Document processor for video directives.
//!
//! Processing is split in two passes over a markdown document:
//!
//! 1. **Parse pass** ([`DocumentProcessor::process`]): each registered
//!    directive is run. Raw HTML is spliced in directly; deferred nodes leave
//!    an `<!--rw-video:NONCE:N-->` comment that passes through pulldown-cmark
//!    unchanged. The nonce is drawn per processor, so markup written by the
//!    author never matches it.
//!
//! 2. **Render pass** ([`DocumentProcessor::post_process`]): deferred nodes
//!    are visited in document order and their placeholders replaced with the
//!    rendered HTML.
//!
//! # Example
//!
//! ```
//! use rw_video::{BuildContext, DirectiveRegistry, DocumentProcessor, MemoryStore};
//!
//! let mut registry = DirectiveRegistry::new();
//! rw_video::init(&mut registry);
//! let store = MemoryStore::new();
//!
//! let mut processor = DocumentProcessor::new(&registry, &store, BuildContext::new("course"));
//! let mut html = processor.process("Intro\n\n::vimeo[42]{align=center}\n").unwrap();
//! assert!(html.contains(&processor.placeholder(0)));
//!
//! processor.post_process(&mut html).unwrap();
//! assert!(html.contains("player.vimeo.com/video/42"));
//! ```

mod fence;
mod parser;

use std::collections::HashMap;
use std::hash::{BuildHasher, RandomState};

use fence::FenceTracker;
use parser::{DirectiveLine, parse_line};

use crate::context::BuildContext;
use crate::error::DocumentError;
use crate::invocation::DirectiveInvocation;
use crate::node::{PendingVideo, VideoNode};
use crate::registry::DirectiveRegistry;
use crate::store::ContentStore;

/// Container directive collecting body lines until its closing `:::`.
struct OpenContainer {
    inv: DirectiveInvocation,
    colon_count: usize,
}

/// Runs video directives over one markdown document.
pub struct DocumentProcessor<'a> {
    registry: &'a DirectiveRegistry,
    store: &'a dyn ContentStore,
    ctx: BuildContext,
    fence: FenceTracker,
    open: Option<OpenContainer>,
    pending: Vec<PendingVideo>,
    /// divid -> line of first use.
    seen_ids: HashMap<String, usize>,
    directive_count: usize,
    nonce: u64,
}

impl<'a> DocumentProcessor<'a> {
    /// Create a processor for one document.
    #[must_use]
    pub fn new(
        registry: &'a DirectiveRegistry,
        store: &'a dyn ContentStore,
        ctx: BuildContext,
    ) -> Self {
        Self {
            registry,
            store,
            ctx,
            fence: FenceTracker::new(),
            open: None,
            pending: Vec::new(),
            seen_ids: HashMap::new(),
            directive_count: 0,
            nonce: RandomState::new().hash_one(0u8),
        }
    }

    /// Build context shared by the document's directives.
    #[must_use]
    pub fn context(&self) -> &BuildContext {
        &self.ctx
    }

    /// Number of video directives run so far.
    #[must_use]
    pub fn directive_count(&self) -> usize {
        self.directive_count
    }

    /// Marker left in the parse-pass output for the `idx`-th deferred node.
    #[must_use]
    pub fn placeholder(&self, idx: usize) -> String {
        placeholder(self.nonce, idx)
    }

    /// Deferred nodes waiting for [`post_process`](Self::post_process).
    #[must_use]
    pub fn pending(&self) -> &[PendingVideo] {
        &self.pending
    }

    /// Parse pass: run every registered directive in `input`.
    ///
    /// Unknown directives and directives inside code fences are left as they are.
    pub fn process(&mut self, input: &str) -> Result<String, DocumentError> {
        let mut output = String::with_capacity(input.len());
        let lines: Vec<&str> = input.lines().collect();
        let line_count = lines.len();

        for (idx, line) in lines.iter().enumerate() {
            if let Some(processed) = self.process_line(line, idx + 1)? {
                output.push_str(&processed);
                if idx + 1 < line_count || input.ends_with('\n') {
                    output.push('\n');
                }
            }
        }

        if let Some(open) = self.open.take() {
            return Err(DocumentError::UnclosedDirective {
                line: open.inv.line,
                name: open.inv.name,
            });
        }

        Ok(output)
    }

    /// Returns `None` for lines swallowed by an open container.
    fn process_line(&mut self, line: &str, line_num: usize) -> Result<Option<String>, DocumentError> {
        if let Some(open) = &mut self.open {
            if let Some(DirectiveLine::ContainerEnd { colon_count }) = parse_line(line)
                && colon_count >= open.colon_count
            {
                let Some(open) = self.open.take() else {
                    return Ok(None);
                };
                return self.run(&open.inv).map(Some);
            }
            open.inv.content.push(line.to_owned());
            return Ok(None);
        }

        self.fence.update(line);
        if self.fence.in_fence() {
            return Ok(Some(line.to_owned()));
        }

        match parse_line(line) {
            Some(DirectiveLine::Leaf {
                name,
                argument,
                attrs,
            }) if self.registry.get(name).is_some() => {
                let inv = parse_invocation(name, argument, attrs, line_num)?;
                self.run(&inv).map(Some)
            }
            Some(DirectiveLine::ContainerStart {
                name,
                argument,
                attrs,
                colon_count,
            }) if self.registry.get(name).is_some_and(|d| d.has_content()) => {
                self.open = Some(OpenContainer {
                    inv: parse_invocation(name, argument, attrs, line_num)?,
                    colon_count,
                });
                Ok(None)
            }
            _ => Ok(Some(line.to_owned())),
        }
    }

    fn run(&mut self, inv: &DirectiveInvocation) -> Result<String, DocumentError> {
        let registry = self.registry;
        let Some(directive) = registry.get(&inv.name) else {
            return Ok(String::new());
        };

        self.claim_divid(inv)?;

        let node = directive
            .run(inv, &self.ctx, self.store)
            .map_err(|source| DocumentError::Directive {
                line: inv.line,
                name: inv.name.clone(),
                source,
            })?;
        self.directive_count += 1;

        // Blank lines around the block so pulldown-cmark keeps it as raw HTML.
        Ok(match node {
            VideoNode::Raw(html) => format!("\n{}\n", html.trim_end()),
            VideoNode::Deferred(pending) => {
                let placeholder = self.placeholder(self.pending.len());
                self.pending.push(pending);
                format!("\n{placeholder}\n")
            }
        })
    }

    /// Record the invocation's divid, failing if an earlier directive used it.
    fn claim_divid(&mut self, inv: &DirectiveInvocation) -> Result<(), DocumentError> {
        let divid = inv
            .get("divid")
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .unwrap_or(&inv.argument);

        if let Some(&first_line) = self.seen_ids.get(divid) {
            return Err(DocumentError::DuplicateId {
                line: inv.line,
                first_line,
                divid: divid.to_owned(),
            });
        }
        self.seen_ids.insert(divid.to_owned(), inv.line);
        Ok(())
    }

    /// Render pass: visit deferred nodes in document order and replace their
    /// placeholders.
    pub fn post_process(&mut self, html: &mut String) -> Result<(), DocumentError> {
        for (idx, pending) in self.pending.drain(..).enumerate() {
            let rendered = pending
                .visit(self.store)
                .map_err(|source| DocumentError::Directive {
                    line: pending.line,
                    name: pending.name.to_owned(),
                    source,
                })?;
            pending.depart();

            let placeholder = placeholder(self.nonce, idx);
            if html.contains(&placeholder) {
                *html = html.replacen(&placeholder, rendered.trim_end(), 1);
            } else {
                tracing::warn!(divid = %pending.descriptor.divid, "Placeholder missing from rendered HTML");
            }
        }
        Ok(())
    }
}

fn parse_invocation(
    name: &str,
    argument: &str,
    attrs: &str,
    line: usize,
) -> Result<DirectiveInvocation, DocumentError> {
    DirectiveInvocation::parse(name, argument, attrs, line).map_err(|source| {
        DocumentError::Directive {
            line,
            name: name.to_owned(),
            source,
        }
    })
}

fn placeholder(nonce: u64, idx: usize) -> String {
    format!("<!--rw-video:{nonce:016x}:{idx}-->")
}
