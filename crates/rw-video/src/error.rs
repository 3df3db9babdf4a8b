//! Error types for video directive processing.

/// Error raised while normalizing or rendering a single video directive.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VideoError {
    /// Source URL has no extension or one that doesn't map to a video type.
    #[error("unsupported video format: {url}")]
    UnsupportedFormat {
        /// The offending source URL.
        url: String,
    },

    /// URI argument or option failed the safety check.
    #[error("invalid URI '{value}': {reason}")]
    InvalidUri {
        /// The rejected value (after whitespace removal).
        value: String,
        /// Why it was rejected.
        reason: String,
    },

    /// Option value is outside its allowed domain.
    #[error("invalid value for option '{key}': '{value}' ({reason})")]
    InvalidOption {
        /// Option name.
        key: String,
        /// Raw value as written in the source.
        value: String,
        /// Expected domain.
        reason: String,
    },

    /// Template referenced a placeholder the descriptor does not provide.
    #[error("template placeholder '{0}' missing from descriptor")]
    MissingKey(String),

    /// Template failed to compile or render for any other reason.
    #[error("template error: {0}")]
    Template(String),
}

impl VideoError {
    pub(crate) fn invalid_option(
        key: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidOption {
            key: key.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_uri(value: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidUri {
            value: value.into(),
            reason: reason.into(),
        }
    }
}

/// Error from a [`ContentStore`](crate::ContentStore) implementation.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// I/O error while persisting content.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Question record could not be serialized.
    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Error raised while processing a whole document.
///
/// Every variant points at the directive that caused it so the build failure
/// can be reported against the source location.
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    /// A directive failed to normalize or render.
    #[error("line {line}: {name} directive: {source}")]
    Directive {
        /// Line where the directive starts (1-indexed).
        line: usize,
        /// Directive name.
        name: String,
        /// Underlying error.
        #[source]
        source: VideoError,
    },

    /// Two directives in the same document resolved to the same `divid`.
    #[error("line {line}: duplicate divid '{divid}' (first used on line {first_line})")]
    DuplicateId {
        /// Line of the second occurrence.
        line: usize,
        /// Line of the first occurrence.
        first_line: usize,
        /// The repeated identifier.
        divid: String,
    },

    /// A container directive was opened and never closed.
    #[error("line {line}: unclosed container directive :::{name} (missing closing :::)")]
    UnclosedDirective {
        /// Line where the container was opened.
        line: usize,
        /// Directive name.
        name: String,
    },
}
