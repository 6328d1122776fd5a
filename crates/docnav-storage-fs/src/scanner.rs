//! Document discovery by filesystem walking.
//!
//! The scanner only identifies markdown files and maps them to canonical
//! document paths. Reading content and resolving titles happens in
//! `FsStorage`.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use glob::Pattern;
use ignore::WalkBuilder;

/// Reference to a document's source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct DocumentRef {
    /// Canonical document path (e.g., "", "basic", "basic/intro").
    pub url_path: String,
    /// Source file path relative to the source directory.
    pub rel_path: PathBuf,
}

impl DocumentRef {
    fn is_index(&self) -> bool {
        self.rel_path.file_stem().is_some_and(|s| s == "index")
    }
}

/// Discovers markdown documents under a source directory.
///
/// Hidden files are skipped and `.gitignore` rules are honored. Paths
/// matching any exclude pattern (relative to the source directory) are
/// dropped.
pub(crate) struct Scanner {
    source_dir: PathBuf,
    exclude: Vec<Pattern>,
}

impl Scanner {
    pub(crate) fn new(source_dir: PathBuf, exclude: Vec<Pattern>) -> Self {
        Self {
            source_dir,
            exclude,
        }
    }

    /// Scan the source directory and return document references sorted by
    /// canonical path.
    ///
    /// Returns an empty Vec if the source directory doesn't exist. When two
    /// files map to the same path (`guide.md` and `guide/index.md`), the
    /// directory index wins.
    pub(crate) fn scan(&self) -> Vec<DocumentRef> {
        let mut refs: BTreeMap<String, DocumentRef> = BTreeMap::new();
        if !self.source_dir.exists() {
            return Vec::new();
        }

        let walker = WalkBuilder::new(&self.source_dir)
            .hidden(true)
            .git_ignore(true)
            .require_git(false)
            .sort_by_file_path(|a, b| a.cmp(b))
            .build();

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!(error = %e, "Skipping unreadable entry");
                    continue;
                }
            };
            if !entry.file_type().is_some_and(|t| t.is_file()) {
                continue;
            }
            let path = entry.path();
            if path.extension().is_none_or(|e| e != "md") {
                continue;
            }
            let Ok(rel_path) = path.strip_prefix(&self.source_dir) else {
                continue;
            };
            if self.is_excluded(rel_path) {
                tracing::debug!(path = %rel_path.display(), "Excluded by pattern");
                continue;
            }

            let doc_ref = DocumentRef {
                url_path: file_path_to_url(rel_path),
                rel_path: rel_path.to_path_buf(),
            };
            match refs.get(&doc_ref.url_path) {
                Some(existing) if existing.is_index() || !doc_ref.is_index() => {
                    tracing::warn!(
                        kept = %existing.rel_path.display(),
                        shadowed = %doc_ref.rel_path.display(),
                        "Two files map to the same document path"
                    );
                }
                _ => {
                    refs.insert(doc_ref.url_path.clone(), doc_ref);
                }
            }
        }

        refs.into_values().collect()
    }

    fn is_excluded(&self, rel_path: &Path) -> bool {
        self.exclude.iter().any(|p| p.matches_path(rel_path))
    }
}

/// Convert a relative markdown file path to a canonical document path.
///
/// Examples:
/// - `index.md` -> `""`
/// - `intro.md` -> `"intro"`
/// - `basic/index.md` -> `"basic"`
/// - `basic/container/custom_container.md` -> `"basic/container/custom_container"`
pub(crate) fn file_path_to_url(rel_path: &Path) -> String {
    let path_str = rel_path.to_string_lossy().replace('\\', "/");

    let without_ext = path_str.strip_suffix(".md").unwrap_or(&path_str);

    if without_ext == "index" {
        String::new()
    } else if let Some(without_index) = without_ext.strip_suffix("/index") {
        without_index.to_owned()
    } else {
        without_ext.to_owned()
    }
}
