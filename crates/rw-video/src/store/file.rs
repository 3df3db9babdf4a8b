//! File-based content store.
//!
//! Directory layout:
//! ```text
//! {root}/
//! +-- {basecourse}/
//!     +-- {divid}.html          # latest generated HTML
//!     +-- questions/
//!         +-- {divid}.json      # question record
//! ```
//!
//! Writing an existing key overwrites it.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::{ContentStore, QuestionRecord};
use crate::StoreError;

/// [`ContentStore`] rooted at a directory on disk.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Create a store rooted at `root`. Directories are created on first write.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the HTML file for a key.
    pub fn html_path(&self, divid: &str, basecourse: &str) -> Result<PathBuf, StoreError> {
        Ok(self
            .course_dir(basecourse)?
            .join(format!("{}.html", key_segment(divid)?)))
    }

    /// Path of the question record for a key.
    pub fn question_path(&self, divid: &str, basecourse: &str) -> Result<PathBuf, StoreError> {
        Ok(self
            .course_dir(basecourse)?
            .join("questions")
            .join(format!("{}.json", key_segment(divid)?)))
    }

    /// Read back a stored question record.
    pub fn read_question(&self, divid: &str, basecourse: &str) -> Result<QuestionRecord, StoreError> {
        let content = fs::read_to_string(self.question_path(divid, basecourse)?)?;
        Ok(serde_json::from_str(&content)?)
    }

    fn course_dir(&self, basecourse: &str) -> Result<PathBuf, StoreError> {
        Ok(self.root.join(key_segment(basecourse)?))
    }
}

impl ContentStore for FileStore {
    fn add_question(&self, question: &QuestionRecord) -> Result<(), StoreError> {
        let path = self.question_path(&question.divid, &question.basecourse)?;
        let json = serde_json::to_string_pretty(question)?;
        write_file(&path, json.as_bytes())
    }

    fn add_html(&self, divid: &str, basecourse: &str, html: &str) -> Result<(), StoreError> {
        let path = self.html_path(divid, basecourse)?;
        write_file(&path, html.as_bytes())
    }
}

/// Validate a key used as a single path segment.
fn key_segment(key: &str) -> Result<&str, StoreError> {
    if key.is_empty() || key == "." || key == ".." || key.contains(['/', '\\']) {
        return Err(StoreError::Io(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("invalid content store key: '{key}'"),
        )));
    }
    Ok(key)
}

fn write_file(path: &Path, data: &[u8]) -> Result<(), StoreError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, data)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn question() -> QuestionRecord {
        QuestionRecord {
            divid: "intro".to_owned(),
            basecourse: "thinkcspy".to_owned(),
            question_type: "youtube".to_owned(),
            question_label: "1.1".to_owned(),
            source_path: Some(PathBuf::from("docs/intro.md")),
            line: 7,
        }
    }

    #[test]
    fn test_add_html_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());

        store.add_html("intro", "thinkcspy", "<div>v1</div>").unwrap();

        let path = dir.path().join("thinkcspy/intro.html");
        assert_eq!(fs::read_to_string(path).unwrap(), "<div>v1</div>");
    }

    #[test]
    fn test_add_html_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());

        store.add_html("intro", "thinkcspy", "v1").unwrap();
        store.add_html("intro", "thinkcspy", "v2").unwrap();

        let path = store.html_path("intro", "thinkcspy").unwrap();
        assert_eq!(fs::read_to_string(path).unwrap(), "v2");
    }

    #[test]
    fn test_question_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());

        store.add_question(&question()).unwrap();

        let stored = store.read_question("intro", "thinkcspy").unwrap();
        assert_eq!(stored, question());
        assert!(dir.path().join("thinkcspy/questions/intro.json").exists());
    }

    #[test]
    fn test_rejects_path_traversal_keys() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());

        assert!(store.add_html("../escape", "thinkcspy", "x").is_err());
        assert!(store.add_html("intro", "..", "x").is_err());
        assert!(store.add_html("intro", "", "x").is_err());
    }
}
