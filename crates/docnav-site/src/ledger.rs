//! Last-updated ledger for monotonic page timestamps.
//!
//! Provides [`LastUpdatedLedger`] trait and implementations:
//! - [`FileLedger`]: JSON file in the cache directory
//! - [`NullLedger`]: no-op ledger (caching disabled)
//!
//! Each entry records the last published timestamp of a document together
//! with a SHA-256 fingerprint of its content. A rebuild with unchanged content
//! keeps the recorded timestamp even if the file's mtime moved (fresh
//! checkout, restored backup), and a changed document never goes below it.
//!
//! # Ledger Format
//!
//! ```json
//! {
//!     "version": 1,
//!     "entries": {
//!         "intro": {"fingerprint": "9f86d0...", "last_updated": 1700000000000}
//!     }
//! }
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Ledger format version. Files with another version are ignored.
const LEDGER_VERSION: u32 = 1;

/// Ledger file name inside the cache directory.
const LEDGER_FILENAME: &str = "last-updated.json";

/// Recorded state of one document.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    /// SHA-256 of the document content, hex encoded.
    pub fingerprint: String,
    /// Last published timestamp in milliseconds since Unix epoch.
    pub last_updated: u64,
}

/// Ledger entries keyed by canonical document path.
pub type LedgerRecords = BTreeMap<String, LedgerEntry>;

#[derive(Serialize, Deserialize)]
struct LedgerFile {
    version: u32,
    entries: LedgerRecords,
}

/// Persistent store of last-updated timestamps.
pub trait LastUpdatedLedger: Send + Sync {
    /// Load recorded entries.
    ///
    /// Returns an empty map when nothing was recorded or the ledger is
    /// unreadable.
    fn load(&self) -> LedgerRecords;

    /// Replace recorded entries.
    fn store(&self, records: &LedgerRecords);
}

/// No-op ledger that never records anything.
///
/// Used when caching is disabled. Timestamps then come straight from the
/// storage backend's modification times.
pub struct NullLedger;

impl LastUpdatedLedger for NullLedger {
    fn load(&self) -> LedgerRecords {
        LedgerRecords::new()
    }

    fn store(&self, _records: &LedgerRecords) {}
}

/// File-based ledger.
///
/// Stores entries as JSON in `{cache_dir}/last-updated.json`.
pub struct FileLedger {
    cache_dir: PathBuf,
}

impl FileLedger {
    /// Create a ledger stored under `cache_dir`.
    #[must_use]
    pub fn new(cache_dir: PathBuf) -> Self {
        Self { cache_dir }
    }

    fn ledger_path(&self) -> PathBuf {
        self.cache_dir.join(LEDGER_FILENAME)
    }
}

impl LastUpdatedLedger for FileLedger {
    fn load(&self) -> LedgerRecords {
        let path = self.ledger_path();
        if !path.exists() {
            return LedgerRecords::new();
        }

        let parsed = fs::read_to_string(&path)
            .map_err(|e| e.to_string())
            .and_then(|content| {
                serde_json::from_str::<LedgerFile>(&content).map_err(|e| e.to_string())
            });
        match parsed {
            Ok(file) if file.version == LEDGER_VERSION => file.entries,
            Ok(file) => {
                tracing::debug!(version = file.version, "Ignoring ledger with other version");
                LedgerRecords::new()
            }
            Err(e) => {
                tracing::debug!(error = %e, "Failed to read last-updated ledger");
                LedgerRecords::new()
            }
        }
    }

    fn store(&self, records: &LedgerRecords) {
        if let Err(e) = fs::create_dir_all(&self.cache_dir) {
            tracing::debug!(error = %e, "Failed to create cache directory");
            return;
        }

        let file = LedgerFile {
            version: LEDGER_VERSION,
            entries: records.clone(),
        };
        let content = match serde_json::to_string_pretty(&file) {
            Ok(c) => c,
            Err(e) => {
                tracing::debug!(error = %e, "Failed to serialize ledger");
                return;
            }
        };

        // Replace by rename so a crash never leaves a torn ledger.
        let path = self.ledger_path();
        let staging = path.with_extension("json.tmp");
        if let Err(e) = fs::write(&staging, content).and_then(|()| fs::rename(&staging, &path)) {
            tracing::debug!(error = %e, "Failed to write last-updated ledger");
            let _ = fs::remove_file(&staging);
        }
    }
}

/// Compute the content fingerprint of a document.
#[must_use]
pub fn fingerprint(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    hex::encode(hasher.finalize())
}

/// Decide a document's last-updated timestamp.
///
/// Unchanged content keeps the recorded value. Changed or unreadable content
/// takes the newer of its mtime and the recorded value.
pub(crate) fn stamp(
    recorded: Option<&LedgerEntry>,
    fingerprint: Option<&str>,
    mtime_ms: u64,
) -> u64 {
    match recorded {
        Some(entry) if fingerprint == Some(entry.fingerprint.as_str()) => entry.last_updated,
        Some(entry) => mtime_ms.max(entry.last_updated),
        None => mtime_ms,
    }
}
