//! Per-document build context.

use std::path::{Path, PathBuf};

/// Default iframe width when `width` is unset.
pub const DEFAULT_WIDTH: u32 = 500;
/// Default iframe height when `height` is unset.
pub const DEFAULT_HEIGHT: u32 = 281;

/// Values shared by every directive in one document.
///
/// # Example
///
/// ```
/// use rw_video::BuildContext;
///
/// let ctx = BuildContext::new("thinkcspy")
///     .with_source_path("docs/intro.md")
///     .with_popup(true);
/// assert_eq!(ctx.basecourse, "thinkcspy");
/// assert!(ctx.popup);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildContext {
    /// Course identifier the generated content is registered under.
    pub basecourse: String,
    /// Use the popup script for self-hosted videos unless the directive says otherwise.
    pub popup: bool,
    /// Width used when an embedded video leaves `width` unset.
    pub default_width: u32,
    /// Height used when an embedded video leaves `height` unset.
    pub default_height: u32,
    /// Source file being processed (for question records and log fields).
    pub source_path: Option<PathBuf>,
}

impl Default for BuildContext {
    fn default() -> Self {
        Self::new("")
    }
}

impl BuildContext {
    /// Create a context for the given course with default layout values.
    #[must_use]
    pub fn new(basecourse: impl Into<String>) -> Self {
        Self {
            basecourse: basecourse.into(),
            popup: false,
            default_width: DEFAULT_WIDTH,
            default_height: DEFAULT_HEIGHT,
            source_path: None,
        }
    }

    /// Set the popup default.
    #[must_use]
    pub fn with_popup(mut self, popup: bool) -> Self {
        self.popup = popup;
        self
    }

    /// Set the default embed dimensions.
    #[must_use]
    pub fn with_default_size(mut self, width: u32, height: u32) -> Self {
        self.default_width = width;
        self.default_height = height;
        self
    }

    /// Set the source file path.
    #[must_use]
    pub fn with_source_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.source_path = Some(path.into());
        self
    }

    /// Source file path, if known.
    #[must_use]
    pub fn source_path(&self) -> Option<&Path> {
        self.source_path.as_deref()
    }
}
