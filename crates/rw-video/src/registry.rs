//! Directive handler trait and registry.

use crate::context::BuildContext;
use crate::embed::{VimeoDirective, YoutubeDirective};
use crate::invocation::DirectiveInvocation;
use crate::node::VideoNode;
use crate::store::ContentStore;
use crate::video::SelfHostedVideoDirective;
use crate::VideoError;

/// Handler for one video directive.
///
/// Handlers are stateless: everything a run needs arrives through the
/// invocation, the build context and the store.
pub trait VideoDirective: Send + Sync {
    /// Directive name matched against `::name` / `:::name`.
    fn name(&self) -> &'static str;

    /// Whether the directive takes body lines (container form).
    fn has_content(&self) -> bool {
        false
    }

    /// Normalize the invocation and produce a node for the host.
    fn run(
        &self,
        inv: &DirectiveInvocation,
        ctx: &BuildContext,
        store: &dyn ContentStore,
    ) -> Result<VideoNode, VideoError>;
}

/// Set of directive handlers available to a processor.
///
/// # Example
///
/// ```
/// use rw_video::DirectiveRegistry;
///
/// let mut registry = DirectiveRegistry::new();
/// rw_video::init(&mut registry);
/// assert!(registry.get("youtube").is_some());
/// assert!(registry.get("note").is_none());
/// ```
#[derive(Default)]
pub struct DirectiveRegistry {
    directives: Vec<Box<dyn VideoDirective>>,
}

impl DirectiveRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler. A later handler with the same name replaces the earlier one.
    pub fn register<D: VideoDirective + 'static>(&mut self, directive: D) {
        let name = directive.name();
        self.directives.retain(|d| d.name() != name);
        self.directives.push(Box::new(directive));
    }

    /// Register a handler, builder style.
    #[must_use]
    pub fn with<D: VideoDirective + 'static>(mut self, directive: D) -> Self {
        self.register(directive);
        self
    }

    /// Look up a handler by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&dyn VideoDirective> {
        self.directives
            .iter()
            .find(|d| d.name() == name)
            .map(|d| d.as_ref())
    }

    /// Registered directive names, in registration order.
    #[must_use]
    pub fn names(&self) -> Vec<&'static str> {
        self.directives.iter().map(|d| d.name()).collect()
    }

    /// Number of registered handlers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.directives.len()
    }

    /// Whether no handler is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.directives.is_empty()
    }
}

/// Register the `video`, `youtube` and `vimeo` directives.
pub fn init(registry: &mut DirectiveRegistry) {
    registry.register(SelfHostedVideoDirective);
    registry.register(YoutubeDirective);
    registry.register(VimeoDirective);
}
