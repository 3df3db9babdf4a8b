//! Content database sink.
//!
//! Directives register two kinds of records:
//!
//! - [`QuestionRecord`]: the directive as a gradable/loggable interaction unit
//! - generated HTML keyed by `(divid, basecourse)`
//!
//! # Implementations
//!
//! - [`MemoryStore`]: Records every call in order (tests, dry runs)
//! - [`FileStore`]: One file per key under a root directory

mod file;
pub use file::FileStore;

use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Serialize};

use crate::StoreError;

/// Interaction unit registered with the content database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionRecord {
    /// Component identifier.
    pub divid: String,
    /// Course identifier.
    pub basecourse: String,
    /// Directive name (`video`, `youtube`).
    pub question_type: String,
    /// Display label; empty when not set.
    pub question_label: String,
    /// Source document, if known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_path: Option<PathBuf>,
    /// Line of the directive in the source document.
    pub line: usize,
}

/// Sink for generated content.
///
/// Both operations are upserts keyed by `(divid, basecourse)`.
pub trait ContentStore: Send + Sync {
    /// Register a directive as an interaction unit.
    fn add_question(&self, question: &QuestionRecord) -> Result<(), StoreError>;

    /// Store the generated HTML for a component.
    fn add_html(&self, divid: &str, basecourse: &str, html: &str) -> Result<(), StoreError>;
}

/// One call recorded by [`MemoryStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreCall {
    /// `add_question` was called.
    Question(QuestionRecord),
    /// `add_html` was called.
    Html {
        /// Component identifier.
        divid: String,
        /// Course identifier.
        basecourse: String,
        /// Generated HTML.
        html: String,
    },
}

/// In-memory [`ContentStore`] that records every call in order.
///
/// # Example
///
/// ```
/// use rw_video::{ContentStore, MemoryStore};
///
/// let store = MemoryStore::new();
/// store.add_html("d1", "course", "<div></div>").unwrap();
/// assert_eq!(store.html("d1", "course").as_deref(), Some("<div></div>"));
/// ```
#[derive(Debug, Default)]
pub struct MemoryStore {
    calls: Mutex<Vec<StoreCall>>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All calls so far, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<StoreCall> {
        self.lock().clone()
    }

    /// Registered questions, in order.
    #[must_use]
    pub fn questions(&self) -> Vec<QuestionRecord> {
        self.lock()
            .iter()
            .filter_map(|call| match call {
                StoreCall::Question(q) => Some(q.clone()),
                StoreCall::Html { .. } => None,
            })
            .collect()
    }

    /// Latest HTML stored for a key.
    #[must_use]
    pub fn html(&self, divid: &str, basecourse: &str) -> Option<String> {
        self.lock().iter().rev().find_map(|call| match call {
            StoreCall::Html {
                divid: d,
                basecourse: b,
                html,
            } if d == divid && b == basecourse => Some(html.clone()),
            _ => None,
        })
    }

    fn lock(&self) -> MutexGuard<'_, Vec<StoreCall>> {
        self.calls.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ContentStore for MemoryStore {
    fn add_question(&self, question: &QuestionRecord) -> Result<(), StoreError> {
        self.lock().push(StoreCall::Question(question.clone()));
        Ok(())
    }

    fn add_html(&self, divid: &str, basecourse: &str, html: &str) -> Result<(), StoreError> {
        self.lock().push(StoreCall::Html {
            divid: divid.to_owned(),
            basecourse: basecourse.to_owned(),
            html: html.to_owned(),
        });
        Ok(())
    }
}

/// Register a question, logging instead of failing when the store errors.
pub(crate) fn register_question(store: &dyn ContentStore, question: &QuestionRecord) {
    match store.add_question(question) {
        Ok(()) => tracing::debug!(
            divid = %question.divid,
            question_type = %question.question_type,
            "Registered question"
        ),
        Err(e) => tracing::warn!(divid = %question.divid, error = %e, "Failed to register question"),
    }
}

/// Register generated HTML, logging instead of failing when the store errors.
pub(crate) fn register_html(store: &dyn ContentStore, divid: &str, basecourse: &str, html: &str) {
    match store.add_html(divid, basecourse, html) {
        Ok(()) => tracing::debug!(divid, basecourse, bytes = html.len(), "Registered HTML"),
        Err(e) => tracing::warn!(divid, basecourse, error = %e, "Failed to register HTML"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(divid: &str) -> QuestionRecord {
        QuestionRecord {
            divid: divid.to_owned(),
            basecourse: "course".to_owned(),
            question_type: "video".to_owned(),
            question_label: String::new(),
            source_path: None,
            line: 1,
        }
    }

    #[test]
    fn test_memory_store_records_in_order() {
        let store = MemoryStore::new();
        store.add_question(&question("d1")).unwrap();
        store.add_html("d1", "course", "<p>a</p>").unwrap();

        let calls = store.calls();
        assert_eq!(calls.len(), 2);
        assert!(matches!(calls[0], StoreCall::Question(_)));
        assert!(matches!(calls[1], StoreCall::Html { .. }));
    }

    #[test]
    fn test_memory_store_html_latest_wins() {
        let store = MemoryStore::new();
        store.add_html("d1", "course", "old").unwrap();
        store.add_html("d1", "course", "new").unwrap();
        store.add_html("d1", "other", "elsewhere").unwrap();

        assert_eq!(store.html("d1", "course").as_deref(), Some("new"));
        assert_eq!(store.html("d2", "course"), None);
    }

    #[test]
    fn test_memory_store_questions() {
        let store = MemoryStore::new();
        store.add_question(&question("a")).unwrap();
        store.add_html("a", "course", "x").unwrap();
        store.add_question(&question("b")).unwrap();

        let divids: Vec<_> = store.questions().into_iter().map(|q| q.divid).collect();
        assert_eq!(divids, vec!["a", "b"]);
    }

    struct FailingStore;

    impl ContentStore for FailingStore {
        fn add_question(&self, _question: &QuestionRecord) -> Result<(), StoreError> {
            Err(StoreError::Io(std::io::Error::other("down")))
        }

        fn add_html(&self, _divid: &str, _basecourse: &str, _html: &str) -> Result<(), StoreError> {
            Err(StoreError::Io(std::io::Error::other("down")))
        }
    }

    #[test]
    fn test_register_helpers_swallow_errors() {
        register_question(&FailingStore, &question("d1"));
        register_html(&FailingStore, "d1", "course", "<p></p>");
    }
}
