//! Markdown files on disk as a docnav [`Storage`](docnav_storage::Storage).
//!
//! [`FsStorage`] walks a source directory (skipping hidden files, honoring
//! `.gitignore` and exclude globs), titles each document from its
//! frontmatter, first H1 or file name, and reports file mtimes for
//! last-updated tracking.
//!
//! ```ignore
//! use docnav_storage::Storage;
//! use docnav_storage_fs::FsStorage;
//!
//! let storage = FsStorage::with_exclude("website".into(), &["drafts/*".to_owned()])?;
//! let titles: Vec<String> = storage.scan()?.into_iter().map(|doc| doc.title).collect();
//! ```

mod frontmatter;
mod scanner;

use std::fs;
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;

use glob::Pattern;
use regex::Regex;

use docnav_storage::{Document, Storage, StorageError, StorageErrorKind};
use frontmatter::{parse_frontmatter, split_frontmatter};
use scanner::{DocumentRef, Scanner};

const BACKEND: &str = "Fs";

/// `setup-guide` / `setup_guide` -> `Setup Guide`.
fn titlecase_from_slug(slug: &str) -> String {
    slug.split(['-', '_', ' '])
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            chars.next().map_or_else(String::new, |first| {
                first.to_uppercase().chain(chars).collect()
            })
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Strip a trailing custom anchor (`# Title {#custom-id}`) from a heading.
fn strip_heading_anchor(heading: &str) -> &str {
    match heading.rfind(" {#") {
        Some(idx) if heading.ends_with('}') => heading[..idx].trim_end(),
        _ => heading,
    }
}

/// Markdown documents under one source directory.
///
/// A document's title is its frontmatter `title`, else its first H1
/// heading, else its file name in title case (`Home` for the root index).
pub struct FsStorage {
    source_dir: PathBuf,
    scanner: Scanner,
    /// Matches one ATX level-one heading line.
    h1_regex: Regex,
}

impl FsStorage {
    /// Storage over every markdown file in `source_dir`.
    #[must_use]
    pub fn new(source_dir: PathBuf) -> Self {
        let scanner = Scanner::new(source_dir.clone(), Vec::new());
        Self {
            source_dir,
            scanner,
            h1_regex: Regex::new(r"^#[ \t]+(.+)$").unwrap(),
        }
    }

    /// Create a new filesystem storage that skips files matching any of the
    /// given glob patterns (relative to `source_dir`).
    ///
    /// # Errors
    ///
    /// Returns [`StorageErrorKind::InvalidPath`] if a pattern is not a valid glob.
    pub fn with_exclude(source_dir: PathBuf, patterns: &[String]) -> Result<Self, StorageError> {
        let exclude = patterns
            .iter()
            .map(|p| {
                Pattern::new(p).map_err(|e| {
                    StorageError::new(BACKEND, StorageErrorKind::InvalidPath)
                        .with_target(p.as_str())
                        .caused_by(e)
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut storage = Self::new(source_dir);
        storage.scanner = Scanner::new(storage.source_dir.clone(), exclude);
        Ok(storage)
    }

    /// Root directory this storage reads from.
    #[must_use]
    pub fn source_dir(&self) -> &Path {
        &self.source_dir
    }

    /// Map document `path` to its content file, refusing `..` segments.
    fn locate(&self, path: &str) -> Result<PathBuf, StorageError> {
        if path.split('/').any(|segment| segment == "..") {
            return Err(
                StorageError::new(BACKEND, StorageErrorKind::InvalidPath).with_target(path),
            );
        }
        self.resolve_content(path)
            .ok_or_else(|| StorageError::missing(BACKEND, path))
    }

    /// Content file of a document path.
    ///
    /// Prefers `{path}/index.md` over `{path}.md`, matching the scanner.
    fn resolve_content(&self, path: &str) -> Option<PathBuf> {
        if path.is_empty() {
            let index = self.source_dir.join("index.md");
            return index.exists().then_some(index);
        }

        let index_path = self.source_dir.join(path).join("index.md");
        if index_path.exists() {
            return Some(index_path);
        }

        let file_path = self.source_dir.join(format!("{path}.md"));
        file_path.exists().then_some(file_path)
    }

    /// Build a `Document` from a `DocumentRef`.
    ///
    /// Unreadable files still produce a document titled from the file name,
    /// so a navigation link to them resolves.
    fn build_document(&self, doc_ref: DocumentRef) -> Document {
        let content = fs::read_to_string(self.source_dir.join(&doc_ref.rel_path))
            .inspect_err(|e| {
                tracing::warn!(path = %doc_ref.rel_path.display(), error = %e, "Failed to read document");
            })
            .ok();

        let (yaml, body) = split_frontmatter(content.as_deref().unwrap_or_default());
        let frontmatter = yaml
            .and_then(|y| {
                parse_frontmatter(y)
                    .inspect_err(|e| {
                        tracing::warn!(path = %doc_ref.rel_path.display(), error = %e, "Invalid frontmatter, ignoring");
                    })
                    .ok()
            })
            .unwrap_or_default();

        let title = frontmatter
            .title
            .filter(|t| !t.trim().is_empty())
            .or_else(|| self.extract_h1(body))
            .unwrap_or_else(|| derive_title(&doc_ref));

        Document {
            path: doc_ref.url_path,
            source_path: doc_ref.rel_path,
            title,
            description: frontmatter.description,
            content,
        }
    }

    /// First H1 heading of a markdown body, outside fenced code blocks.
    fn extract_h1(&self, body: &str) -> Option<String> {
        let mut fence: Option<&str> = None;
        for line in body.lines() {
            let trimmed = line.trim_start();
            let marker = ["```", "~~~"].into_iter().find(|m| trimmed.starts_with(m));
            match (fence, marker) {
                (None, Some(open)) => fence = Some(open),
                (Some(open), Some(close)) if open == close => fence = None,
                (Some(_), _) => {}
                (None, None) => {
                    let Some(caps) = self.h1_regex.captures(line) else {
                        continue;
                    };
                    let heading = strip_heading_anchor(caps[1].trim());
                    if !heading.is_empty() {
                        return Some(heading.to_owned());
                    }
                }
            }
        }
        None
    }
}

/// Generate a title from the file name, using the directory name for index files.
fn derive_title(doc_ref: &DocumentRef) -> String {
    match doc_ref.url_path.rsplit_once('/').map_or(doc_ref.url_path.as_str(), |(_, last)| last) {
        "" => "Home".to_owned(),
        slug => titlecase_from_slug(slug),
    }
}

impl Storage for FsStorage {
    fn scan(&self) -> Result<Vec<Document>, StorageError> {
        let documents: Vec<Document> = self
            .scanner
            .scan()
            .into_iter()
            .map(|r| self.build_document(r))
            .collect();
        tracing::debug!(
            count = documents.len(),
            source_dir = %self.source_dir.display(),
            "Scanned documents"
        );
        Ok(documents)
    }

    fn read(&self, path: &str) -> Result<String, StorageError> {
        let file = self.locate(path)?;
        fs::read_to_string(file).map_err(|e| StorageError::from_io(BACKEND, path, e))
    }

    fn mtime(&self, path: &str) -> Result<f64, StorageError> {
        let file = self.locate(path)?;
        let modified = fs::metadata(file)
            .and_then(|meta| meta.modified())
            .map_err(|e| StorageError::from_io(BACKEND, path, e))?;
        modified
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_secs_f64())
            .map_err(|e| {
                StorageError::new(BACKEND, StorageErrorKind::Other)
                    .with_target(path)
                    .caused_by(e)
            })
    }
}
