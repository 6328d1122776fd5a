//! Content storage abstraction for docnav.
//!
//! This crate provides a [`Storage`] trait for abstracting content document
//! discovery from the underlying backend. The navigation model only needs to
//! know which documents exist, what they are called, and when they last
//! changed; how they are stored is up to the backend.
//!
//! # Architecture
//!
//! The crate provides:
//! - [`Storage`] trait with `scan()`, `read()`, and `mtime()` methods
//! - [`Document`], the record returned by a scan
//! - [`StorageError`] with a semantic [`StorageErrorKind`]
//! - [`MockStorage`] for testing (behind `mock` feature flag)
//!
//! The filesystem backend lives in `docnav-storage-fs`.

#[cfg(feature = "mock")]
mod mock;
mod storage;

#[cfg(feature = "mock")]
pub use mock::MockStorage;
pub use storage::{Document, Storage, StorageError, StorageErrorKind};
