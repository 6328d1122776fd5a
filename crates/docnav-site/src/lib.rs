//! Navigation tree, content registry and site resolution for docnav.
//!
//! This crate provides:
//! - [`ContentRegistry`]: documents known to the build, keyed by canonical path
//! - [`NavigationBuilder`]: validated [`NavigationTree`]s built from declared entries
//! - [`ResolvedSite`] and the [`SiteResolver`] contract with the site generator
//! - [`LastUpdatedLedger`]: monotonic last-updated timestamps across builds
//! - [`build_site`]: the whole pipeline, from storage scan to validated site
//!
//! # Quick Start
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use std::path::PathBuf;
//! use docnav_config::Config;
//! use docnav_site::{FileLedger, ManifestWriter, build_site};
//! use docnav_storage_fs::FsStorage;
//!
//! let config = Config::load(None, None)?;
//! let storage = FsStorage::new(config.docs.source_dir.clone());
//! let ledger = FileLedger::new(config.docs.cache_dir());
//!
//! let mut build = build_site(&config, &storage, &ledger)?;
//! for warning in build.warnings() {
//!     eprintln!("warning: {warning}");
//! }
//! build.publish(&ManifestWriter::new(PathBuf::from("dist")))?;
//! build.commit(&ledger);
//! # Ok(())
//! # }
//! ```

mod diagnostics;
mod ledger;
mod navigation;
mod path;
mod registry;
mod resolver;
mod site;

pub use diagnostics::{
    DuplicateLinkWarning, EntryLocation, EntryRef, MalformedReason, NavigationError,
    NavigationErrors, TreeKind,
};
pub use ledger::{
    FileLedger, LastUpdatedLedger, LedgerEntry, LedgerRecords, NullLedger, fingerprint,
};
pub use navigation::{
    BuiltNavigation, EntryKind, MAX_DEPTH, NavEntry, NavLink, NavigationBuilder, NavigationTree,
    SiteNavigation,
};
pub use path::{canonical_path, is_external};
pub use registry::{ContentDocument, ContentRegistry, NotFound};
pub use resolver::{
    ManifestWriter, PageData, RenderedPage, ResolveError, ResolvedItem, ResolvedSite,
    SiteResolver,
};
pub use site::{BuildError, SiteBuild, build_site};
