//! Storage trait and error types.
//!
//! All document arguments are **canonical document paths**, never file
//! paths: `""` is the site root, `"intro"` a page, `"basic/container"` either
//! `basic/container.md` or `basic/container/index.md`. Backends own the
//! mapping to their own layout.

use std::error::Error;
use std::fmt;
use std::path::PathBuf;

/// One content document found by a scan.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Document {
    /// Canonical document path.
    pub path: String,
    /// Source file relative to the storage root (e.g., "intro.md").
    pub source_path: PathBuf,
    /// Resolved title.
    pub title: String,
    /// Frontmatter description, if any.
    pub description: Option<String>,
    /// Content as read by the scan, when the backend read it to resolve the
    /// title. Consumers use it in place of a second [`Storage::read`].
    pub content: Option<String>,
}

/// What went wrong, independent of the backend.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum StorageErrorKind {
    /// No document at that path.
    NotFound,
    /// The backend refused access.
    PermissionDenied,
    /// The path or pattern is not acceptable.
    InvalidPath,
    /// Anything else.
    Other,
}

impl fmt::Display for StorageErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::NotFound => "not found",
            Self::PermissionDenied => "permission denied",
            Self::InvalidPath => "invalid path",
            Self::Other => "storage failure",
        })
    }
}

/// Error raised by a [`Storage`] backend.
///
/// Carries the backend name, the document path or pattern it concerns, and
/// the backend's own error as source.
#[derive(Debug)]
pub struct StorageError {
    kind: StorageErrorKind,
    backend: &'static str,
    target: Option<String>,
    source: Option<Box<dyn Error + Send + Sync>>,
}

impl StorageError {
    /// Create an error of `kind` raised by `backend`.
    #[must_use]
    pub fn new(backend: &'static str, kind: StorageErrorKind) -> Self {
        Self {
            kind,
            backend,
            target: None,
            source: None,
        }
    }

    /// Document `path` does not exist in `backend`.
    #[must_use]
    pub fn missing(backend: &'static str, path: &str) -> Self {
        Self::new(backend, StorageErrorKind::NotFound).with_target(path)
    }

    /// Classify an I/O error raised while accessing document `path`.
    #[must_use]
    pub fn from_io(backend: &'static str, path: &str, err: std::io::Error) -> Self {
        let kind = match err.kind() {
            std::io::ErrorKind::NotFound => StorageErrorKind::NotFound,
            std::io::ErrorKind::PermissionDenied => StorageErrorKind::PermissionDenied,
            _ => StorageErrorKind::Other,
        };
        Self::new(backend, kind).with_target(path).caused_by(err)
    }

    /// Name the document path or pattern the error concerns.
    #[must_use]
    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }

    /// Attach the backend's underlying error.
    #[must_use]
    pub fn caused_by(mut self, source: impl Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Error category.
    #[must_use]
    pub fn kind(&self) -> StorageErrorKind {
        self.kind
    }

    /// Backend that raised the error (e.g., "Fs", "Mock").
    #[must_use]
    pub fn backend(&self) -> &'static str {
        self.backend
    }

    /// Document path or pattern the error concerns.
    #[must_use]
    pub fn target(&self) -> Option<&str> {
        self.target.as_deref()
    }
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // "Fs storage: not found: "intro": <source>"
        write!(f, "{} storage: {}", self.backend, self.kind)?;
        if let Some(target) = &self.target {
            write!(f, ": {target:?}")?;
        }
        if let Some(source) = &self.source {
            write!(f, ": {source}")?;
        }
        Ok(())
    }
}

impl Error for StorageError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.source.as_deref().map(|s| s as &(dyn Error + 'static))
    }
}

/// Source of content documents.
///
/// A build scans once to learn which documents exist, then reads each one's
/// content and modification time for last-updated tracking.
pub trait Storage: Send + Sync {
    /// All documents, sorted by canonical path.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the backend can't be listed.
    fn scan(&self) -> Result<Vec<Document>, StorageError>;

    /// Full content of document `path`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the document is missing or unreadable.
    fn read(&self, path: &str) -> Result<String, StorageError>;

    /// Modification time of document `path`, in seconds since Unix epoch.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the document is missing or its mtime is
    /// unavailable.
    fn mtime(&self, path: &str) -> Result<f64, StorageError>;
}
