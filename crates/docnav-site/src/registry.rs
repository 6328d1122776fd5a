//! Content document registry.
//!
//! The registry is the ground truth the navigation builder validates links
//! against. It is populated once per build from a [`Storage`] backend and is
//! read-only afterwards, except for rendered-page metadata merged back by the
//! site resolver.

use std::collections::HashMap;
use std::path::PathBuf;

use docnav_storage::{Document, Storage, StorageError};

use crate::ledger::{self, LedgerEntry, LedgerRecords};
use crate::path::{canonical_path, is_external};
use crate::resolver::RenderedPage;

/// A content document with its metadata.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContentDocument {
    /// Canonical document path (e.g., "", "intro", "basic/container").
    pub path: String,
    /// Source file path relative to the storage root.
    pub source_path: PathBuf,
    /// Display title.
    pub title: String,
    /// Optional description.
    pub description: Option<String>,
    /// Last-updated timestamp in milliseconds since Unix epoch.
    pub last_updated: u64,
}

impl ContentDocument {
    fn from_storage(doc: Document, last_updated: u64) -> Self {
        Self {
            path: doc.path,
            source_path: doc.source_path,
            title: doc.title,
            description: doc.description,
            last_updated,
        }
    }
}

/// A link or path that matches no content document.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("Document not found: {0}")]
pub struct NotFound(pub String);

/// Registry of content documents keyed by canonical path.
#[derive(Debug, Default)]
pub struct ContentRegistry {
    documents: Vec<ContentDocument>,
    index: HashMap<String, usize>,
    fingerprints: HashMap<String, String>,
}

impl ContentRegistry {
    /// Scan `storage` and build the registry.
    ///
    /// Each document's last-updated timestamp is derived from its mtime and
    /// the `recorded` ledger entries: unchanged content keeps its recorded
    /// timestamp, changed content never goes below it. Documents whose
    /// content or mtime can't be read are kept, with a warning.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the storage scan fails.
    pub fn load(storage: &dyn Storage, recorded: &LedgerRecords) -> Result<Self, StorageError> {
        let documents = storage.scan()?;
        let mut registry = Self::default();

        for mut doc in documents {
            let content = match doc.content.take() {
                Some(content) => Some(content),
                None => storage
                    .read(&doc.path)
                    .inspect_err(|e| tracing::warn!(path = %doc.path, error = %e, "Failed to read document"))
                    .ok(),
            };
            let fingerprint = content.as_deref().map(ledger::fingerprint);
            let mtime_ms = storage
                .mtime(&doc.path)
                .inspect_err(|e| tracing::warn!(path = %doc.path, error = %e, "Failed to read mtime"))
                .map_or(0, secs_to_millis);

            let previous = recorded.get(&doc.path);
            let last_updated = ledger::stamp(previous, fingerprint.as_deref(), mtime_ms);
            // Unreadable content keeps the recorded fingerprint so the entry
            // survives the next commit.
            if let Some(fingerprint) =
                fingerprint.or_else(|| previous.map(|entry| entry.fingerprint.clone()))
            {
                registry.fingerprints.insert(doc.path.clone(), fingerprint);
            }
            registry.insert(ContentDocument::from_storage(doc, last_updated));
        }

        tracing::debug!(documents = registry.len(), "Loaded content registry");
        Ok(registry)
    }

    /// Build a registry from already-resolved documents.
    ///
    /// A later document with the same path replaces an earlier one.
    #[must_use]
    pub fn from_documents(documents: Vec<ContentDocument>) -> Self {
        let mut registry = Self::default();
        for doc in documents {
            registry.insert(doc);
        }
        registry
    }

    fn insert(&mut self, doc: ContentDocument) {
        if let Some(&idx) = self.index.get(&doc.path) {
            self.documents[idx] = doc;
        } else {
            self.index.insert(doc.path.clone(), self.documents.len());
            self.documents.push(doc);
        }
    }

    /// Look up the document a link points to.
    ///
    /// Accepts any spelling that canonicalizes to the same path
    /// (`/intro.md`, `/intro`, `intro`). External links never resolve.
    ///
    /// # Errors
    ///
    /// Returns [`NotFound`] carrying the link as given.
    pub fn resolve(&self, link: &str) -> Result<&ContentDocument, NotFound> {
        self.lookup(link)
            .map(|idx| &self.documents[idx])
            .ok_or_else(|| NotFound(link.to_owned()))
    }

    /// Check whether a link resolves.
    #[must_use]
    pub fn contains(&self, link: &str) -> bool {
        self.lookup(link).is_some()
    }

    /// Last-updated timestamp (ms since Unix epoch) of the linked document.
    ///
    /// # Errors
    ///
    /// Returns [`NotFound`] if the link doesn't resolve.
    pub fn last_updated(&self, link: &str) -> Result<u64, NotFound> {
        self.resolve(link).map(|doc| doc.last_updated)
    }

    /// Merge rendered-page metadata back into the registry.
    ///
    /// A title override replaces the document title. The last-updated
    /// timestamp only moves forward.
    ///
    /// # Errors
    ///
    /// Returns [`NotFound`] if the page path doesn't resolve.
    pub fn merge_rendered(&mut self, page: &RenderedPage) -> Result<(), NotFound> {
        let idx = self
            .lookup(&page.path)
            .ok_or_else(|| NotFound(page.path.clone()))?;
        let doc = &mut self.documents[idx];

        if let Some(title) = page.title.as_ref().filter(|t| !t.trim().is_empty()) {
            doc.title.clone_from(title);
        }
        if let Some(last_updated) = page.last_updated {
            doc.last_updated = doc.last_updated.max(last_updated);
        }
        Ok(())
    }

    /// All documents, sorted by path when loaded from storage.
    #[must_use]
    pub fn documents(&self) -> &[ContentDocument] {
        &self.documents
    }

    /// Number of documents.
    #[must_use]
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Check if the registry has no documents.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Ledger entries for every document with a known fingerprint, current or
    /// carried over from the previous ledger.
    pub(crate) fn ledger_records(&self) -> LedgerRecords {
        self.documents
            .iter()
            .filter_map(|doc| {
                let fingerprint = self.fingerprints.get(&doc.path)?;
                Some((
                    doc.path.clone(),
                    LedgerEntry {
                        fingerprint: fingerprint.clone(),
                        last_updated: doc.last_updated,
                    },
                ))
            })
            .collect()
    }

    fn lookup(&self, link: &str) -> Option<usize> {
        if is_external(link) {
            return None;
        }
        self.index.get(&canonical_path(link)).copied()
    }
}

/// Convert an mtime in seconds to whole milliseconds.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn secs_to_millis(secs: f64) -> u64 {
    (secs * 1000.0).round().max(0.0) as u64
}

#[cfg(test)]
mod tests {
    use docnav_storage::MockStorage;
    use pretty_assertions::assert_eq;

    use super::*;

    fn create_storage() -> MockStorage {
        MockStorage::new()
            .with_file("", "Home", "# Home")
            .with_file("intro", "Introduction", "# Introduction")
            .with_file("basic/container", "Container", "# Container")
            .with_mtime("", 1_700_000_000.0)
            .with_mtime("intro", 1_700_000_100.5)
            .with_mtime("basic/container", 1_700_000_200.0)
    }

    #[test]
    fn test_load_from_storage() {
        let registry = ContentRegistry::load(&create_storage(), &LedgerRecords::new()).unwrap();

        assert_eq!(registry.len(), 3);
        let paths: Vec<&str> = registry.documents().iter().map(|d| d.path.as_str()).collect();
        assert_eq!(paths, vec!["", "basic/container", "intro"]);
        assert_eq!(registry.last_updated("/intro.md"), Ok(1_700_000_100_500));
    }

    #[test]
    fn test_resolve_accepts_link_spellings() {
        let registry = ContentRegistry::load(&create_storage(), &LedgerRecords::new()).unwrap();

        for link in ["/intro.md", "/intro", "intro", "/intro.html", "/intro#setup"] {
            assert_eq!(registry.resolve(link).unwrap().title, "Introduction", "{link}");
        }
        assert_eq!(registry.resolve("/").unwrap().title, "Home");
        assert_eq!(
            registry.resolve("/basic/container/").unwrap().title,
            "Container"
        );
    }

    #[test]
    fn test_resolve_not_found() {
        let registry = ContentRegistry::load(&create_storage(), &LedgerRecords::new()).unwrap();

        assert_eq!(
            registry.resolve("/missing.md"),
            Err(NotFound("/missing.md".to_owned()))
        );
        assert!(registry.last_updated("/missing.md").is_err());
    }

    #[test]
    fn test_external_links_never_resolve() {
        let registry = ContentRegistry::load(&create_storage(), &LedgerRecords::new()).unwrap();

        assert!(!registry.contains("https://intro"));
    }

    #[test]
    fn test_load_keeps_unreadable_documents() {
        let storage = MockStorage::new().with_document("intro", "Intro");

        let registry = ContentRegistry::load(&storage, &LedgerRecords::new()).unwrap();

        assert_eq!(registry.resolve("intro").unwrap().last_updated, 0);
        assert!(registry.ledger_records().is_empty());
    }

    #[test]
    fn test_unchanged_content_keeps_recorded_timestamp() {
        let storage = create_storage();
        let first = ContentRegistry::load(&storage, &LedgerRecords::new()).unwrap();
        let recorded = first.ledger_records();

        // Fresh checkout: mtime moves backwards, content is the same
        storage.set_mtime("intro", 1_600_000_000.0);
        let second = ContentRegistry::load(&storage, &recorded).unwrap();

        assert_eq!(second.last_updated("intro"), Ok(1_700_000_100_500));
    }

    #[test]
    fn test_changed_content_never_regresses() {
        let storage = create_storage();
        let first = ContentRegistry::load(&storage, &LedgerRecords::new()).unwrap();
        let recorded = first.ledger_records();

        storage.set_content("intro", "# Introduction\n\nMore text.");
        storage.set_mtime("intro", 1_600_000_000.0);
        let regressed = ContentRegistry::load(&storage, &recorded).unwrap();
        assert_eq!(regressed.last_updated("intro"), Ok(1_700_000_100_500));

        storage.set_mtime("intro", 1_800_000_000.0);
        let advanced = ContentRegistry::load(&storage, &recorded).unwrap();
        assert_eq!(advanced.last_updated("intro"), Ok(1_800_000_000_000));
    }

    #[test]
    fn test_unreadable_document_keeps_ledger_entry() {
        let storage = create_storage();
        let recorded = ContentRegistry::load(&storage, &LedgerRecords::new())
            .unwrap()
            .ledger_records();

        storage.remove_content("intro");
        storage.set_mtime("intro", 1_600_000_000.0);
        let unreadable = ContentRegistry::load(&storage, &recorded).unwrap();

        assert_eq!(unreadable.last_updated("intro"), Ok(1_700_000_100_500));
        assert_eq!(unreadable.ledger_records()["intro"], recorded["intro"]);
    }

    #[test]
    fn test_read_failure_between_builds_never_regresses() {
        let storage = create_storage();
        let first = ContentRegistry::load(&storage, &LedgerRecords::new()).unwrap();

        storage.remove_content("intro");
        let second = ContentRegistry::load(&storage, &first.ledger_records()).unwrap();

        // Readable again, unchanged, restored with an older mtime
        storage.set_content("intro", "# Introduction");
        storage.set_mtime("intro", 1_600_000_000.0);
        let third = ContentRegistry::load(&storage, &second.ledger_records()).unwrap();

        assert_eq!(third.last_updated("intro"), Ok(1_700_000_100_500));
    }

    /// Serves scans from a mock but fails every `read`.
    struct ScanOnly(MockStorage);

    impl Storage for ScanOnly {
        fn scan(&self) -> Result<Vec<Document>, StorageError> {
            self.0.scan()
        }

        fn read(&self, path: &str) -> Result<String, StorageError> {
            Err(StorageError::missing("ScanOnly", path))
        }

        fn mtime(&self, path: &str) -> Result<f64, StorageError> {
            self.0.mtime(path)
        }
    }

    #[test]
    fn test_load_fingerprints_scanned_content() {
        let storage = ScanOnly(create_storage());

        let recorded = ContentRegistry::load(&storage, &LedgerRecords::new())
            .unwrap()
            .ledger_records();

        assert_eq!(recorded.len(), 3);
        assert_eq!(recorded["intro"].fingerprint, ledger::fingerprint("# Introduction"));
    }

    #[test]
    fn test_merge_rendered_overrides_title() {
        let mut registry = ContentRegistry::load(&create_storage(), &LedgerRecords::new()).unwrap();

        registry
            .merge_rendered(&RenderedPage {
                path: "intro".to_owned(),
                title: Some("Getting Started".to_owned()),
                last_updated: None,
            })
            .unwrap();

        assert_eq!(registry.resolve("intro").unwrap().title, "Getting Started");
    }

    #[test]
    fn test_merge_rendered_last_updated_only_moves_forward() {
        let mut registry = ContentRegistry::load(&create_storage(), &LedgerRecords::new()).unwrap();

        let mut page = RenderedPage {
            path: "intro".to_owned(),
            title: Some("  ".to_owned()),
            last_updated: Some(1),
        };
        registry.merge_rendered(&page).unwrap();
        assert_eq!(registry.last_updated("intro"), Ok(1_700_000_100_500));
        assert_eq!(registry.resolve("intro").unwrap().title, "Introduction");

        page.last_updated = Some(1_900_000_000_000);
        registry.merge_rendered(&page).unwrap();
        assert_eq!(registry.last_updated("intro"), Ok(1_900_000_000_000));
    }

    #[test]
    fn test_merge_rendered_unknown_path() {
        let mut registry = ContentRegistry::default();

        let err = registry
            .merge_rendered(&RenderedPage {
                path: "ghost".to_owned(),
                title: None,
                last_updated: None,
            })
            .unwrap_err();

        assert_eq!(err, NotFound("ghost".to_owned()));
    }

    #[test]
    fn test_from_documents_replaces_duplicates() {
        let doc = |title: &str| ContentDocument {
            path: "intro".to_owned(),
            source_path: PathBuf::from("intro.md"),
            title: title.to_owned(),
            description: None,
            last_updated: 0,
        };

        let registry = ContentRegistry::from_documents(vec![doc("Old"), doc("New")]);

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.resolve("intro").unwrap().title, "New");
    }

    #[test]
    fn test_secs_to_millis() {
        assert_eq!(secs_to_millis(1.5), 1_500);
        assert_eq!(secs_to_millis(0.0004), 0);
        assert_eq!(secs_to_millis(-3.0), 0);
    }
}
