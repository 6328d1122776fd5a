//! In-memory storage for tests.

use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;
use std::sync::{RwLock, RwLockWriteGuard};

use crate::storage::{Document, Storage, StorageError};

const BACKEND: &str = "Mock";

/// Documents, contents and mtimes held under one lock.
#[derive(Debug, Default)]
struct MockState {
    documents: BTreeMap<String, Document>,
    contents: HashMap<String, String>,
    mtimes: HashMap<String, f64>,
}

/// In-memory [`Storage`] for tests.
///
/// Build it up with the `with_*` methods, then simulate edits between builds
/// with `set_content` and `set_mtime`. A document added without content or
/// mtime behaves like an unreadable file: it shows up in scans, but `read` or
/// `mtime` fail with `NotFound`. Scans carry each document's current content.
///
/// ```ignore
/// use docnav_storage::{MockStorage, Storage};
///
/// let storage = MockStorage::new()
///     .with_file("intro", "Introduction", "# Introduction")
///     .with_mtime("intro", 1_705_332_275.0);
///
/// assert_eq!(storage.scan()?.len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct MockStorage {
    state: RwLock<MockState>,
}

impl MockStorage {
    /// Create an empty mock storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> RwLockWriteGuard<'_, MockState> {
        self.state.write().unwrap()
    }

    /// Add a document titled `title` at canonical path `path`.
    ///
    /// The source path is derived the way the filesystem backend names files:
    /// `index.md` for the root, `{path}.md` otherwise.
    #[must_use]
    pub fn with_document(self, path: impl Into<String>, title: impl Into<String>) -> Self {
        let path = path.into();
        let source_path = if path.is_empty() {
            PathBuf::from("index.md")
        } else {
            PathBuf::from(format!("{path}.md"))
        };
        self.state().documents.insert(
            path.clone(),
            Document {
                path,
                source_path,
                title: title.into(),
                description: None,
                content: None,
            },
        );
        self
    }

    /// Add a document together with its content.
    #[must_use]
    pub fn with_file(
        self,
        path: impl Into<String>,
        title: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        let path = path.into();
        self.set_content(path.clone(), content);
        self.with_document(path, title)
    }

    /// Set the modification time (seconds since Unix epoch) of a document.
    #[must_use]
    pub fn with_mtime(self, path: impl Into<String>, mtime: f64) -> Self {
        self.set_mtime(path, mtime);
        self
    }

    /// Replace the content of a document.
    pub fn set_content(&self, path: impl Into<String>, content: impl Into<String>) {
        self.state().contents.insert(path.into(), content.into());
    }

    /// Drop the content of a document, making it unreadable.
    pub fn remove_content(&self, path: &str) {
        self.state().contents.remove(path);
    }

    /// Replace the modification time of a document.
    pub fn set_mtime(&self, path: impl Into<String>, mtime: f64) {
        self.state().mtimes.insert(path.into(), mtime);
    }
}

impl Storage for MockStorage {
    fn scan(&self) -> Result<Vec<Document>, StorageError> {
        let state = self.state.read().unwrap();
        Ok(state
            .documents
            .values()
            .map(|doc| Document {
                content: state.contents.get(&doc.path).cloned(),
                ..doc.clone()
            })
            .collect())
    }

    fn read(&self, path: &str) -> Result<String, StorageError> {
        let state = self.state.read().unwrap();
        state
            .contents
            .get(path)
            .cloned()
            .ok_or_else(|| StorageError::missing(BACKEND, path))
    }

    fn mtime(&self, path: &str) -> Result<f64, StorageError> {
        let state = self.state.read().unwrap();
        state
            .mtimes
            .get(path)
            .copied()
            .ok_or_else(|| StorageError::missing(BACKEND, path))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::StorageErrorKind;

    #[test]
    fn test_scan_is_sorted_by_path() {
        let storage = MockStorage::new()
            .with_document("zeta", "Zeta")
            .with_document("", "Home")
            .with_document("alpha", "Alpha");

        let docs = storage.scan().unwrap();
        let paths: Vec<_> = docs.iter().map(|d| d.path.as_str()).collect();

        assert_eq!(paths, vec!["", "alpha", "zeta"]);
        assert_eq!(docs[0].source_path, PathBuf::from("index.md"));
        assert_eq!(docs[1].source_path, PathBuf::from("alpha.md"));
    }

    #[test]
    fn test_with_document_replaces_same_path() {
        let storage = MockStorage::new()
            .with_document("intro", "Old")
            .with_document("intro", "New");

        let docs = storage.scan().unwrap();

        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].title, "New");
    }

    #[test]
    fn test_read_missing_content() {
        let storage = MockStorage::new().with_document("intro", "Intro");

        let err = storage.read("intro").unwrap_err();

        assert_eq!(err.kind(), StorageErrorKind::NotFound);
        assert_eq!(err.backend(), "Mock");
        assert_eq!(err.target(), Some("intro"));
    }

    #[test]
    fn test_simulated_edit() {
        let storage = MockStorage::new()
            .with_file("intro", "Intro", "v1")
            .with_mtime("intro", 10.0);

        storage.set_content("intro", "v2");
        storage.set_mtime("intro", 20.0);

        assert_eq!(storage.read("intro").unwrap(), "v2");
        assert_eq!(storage.scan().unwrap()[0].content.as_deref(), Some("v2"));
        assert!((storage.mtime("intro").unwrap() - 20.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_remove_content() {
        let storage = MockStorage::new().with_file("intro", "Intro", "v1");

        storage.remove_content("intro");

        assert_eq!(storage.scan().unwrap()[0].content, None);
        assert_eq!(storage.read("intro").unwrap_err().kind(), StorageErrorKind::NotFound);
    }
}
