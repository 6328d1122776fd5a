//! Site build orchestration.
//!
//! A build runs in fixed stages:
//!
//! 1. Load the content registry from storage, stamping last-updated times
//!    against the ledger.
//! 2. Build and validate the navigation trees. Any fatal error aborts here
//!    with the complete diagnostic list; no tree is exposed.
//! 3. Hand the resolved site to a [`SiteResolver`] and merge its rendered-page
//!    metadata back ([`SiteBuild::publish`]).
//! 4. Record timestamps in the ledger ([`SiteBuild::commit`]).

use docnav_config::{Config, SiteInfo};
use docnav_storage::{Storage, StorageError};

use crate::diagnostics::{DuplicateLinkWarning, NavigationErrors};
use crate::ledger::LastUpdatedLedger;
use crate::navigation::{NavigationBuilder, SiteNavigation};
use crate::registry::{ContentDocument, ContentRegistry, NotFound};
use crate::resolver::{ResolveError, ResolvedSite, SiteResolver};

/// Site build error.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// Storage scan failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
    /// Navigation validation failed.
    #[error(transparent)]
    Navigation(#[from] NavigationErrors),
    /// Site resolver failed.
    #[error("Site resolver error: {0}")]
    Resolve(#[from] ResolveError),
    /// Site resolver reported a page the registry doesn't know.
    #[error("Site resolver reported unknown page: {0}")]
    NotFound(#[from] NotFound),
}

/// A validated site, ready to be handed to a resolver.
#[derive(Debug)]
pub struct SiteBuild {
    site: SiteInfo,
    navigation: SiteNavigation,
    registry: ContentRegistry,
    warnings: Vec<DuplicateLinkWarning>,
}

/// Load content and validate navigation for a site.
///
/// # Errors
///
/// Returns [`BuildError::Storage`] if scanning fails and
/// [`BuildError::Navigation`] with every validation error if the navigation
/// is invalid.
pub fn build_site(
    config: &Config,
    storage: &dyn Storage,
    ledger: &dyn LastUpdatedLedger,
) -> Result<SiteBuild, BuildError> {
    let registry = ContentRegistry::load(storage, &ledger.load())?;
    let built = NavigationBuilder::new(&registry).build(&config.nav, &config.sidebar)?;

    tracing::info!(
        documents = registry.len(),
        nav = built.navigation.nav.len(),
        sidebar = built.navigation.sidebar.len(),
        warnings = built.warnings.len(),
        "Navigation validated"
    );

    Ok(SiteBuild {
        site: config.site.clone(),
        navigation: built.navigation,
        registry,
        warnings: built.warnings,
    })
}

impl SiteBuild {
    /// Site-wide settings.
    #[must_use]
    pub fn site(&self) -> &SiteInfo {
        &self.site
    }

    /// Validated navigation trees.
    #[must_use]
    pub fn navigation(&self) -> &SiteNavigation {
        &self.navigation
    }

    /// Content registry.
    #[must_use]
    pub fn registry(&self) -> &ContentRegistry {
        &self.registry
    }

    /// Duplicate link warnings found during validation.
    #[must_use]
    pub fn warnings(&self) -> &[DuplicateLinkWarning] {
        &self.warnings
    }

    /// Resolve navigation and page data for a generator.
    #[must_use]
    pub fn resolve(&self) -> ResolvedSite {
        ResolvedSite::new(&self.site, &self.navigation, &self.registry)
    }

    /// Run a resolver and merge the metadata it reports.
    ///
    /// Returns the number of rendered pages merged.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::Resolve`] if the resolver fails and
    /// [`BuildError::NotFound`] if it reports a page the registry doesn't
    /// contain.
    pub fn publish(&mut self, resolver: &dyn SiteResolver) -> Result<usize, BuildError> {
        let rendered = resolver.resolve(&self.resolve())?;
        for page in &rendered {
            self.registry.merge_rendered(page)?;
        }
        Ok(rendered.len())
    }

    /// Record last-updated timestamps in the ledger.
    pub fn commit(&self, ledger: &dyn LastUpdatedLedger) {
        ledger.store(&self.registry.ledger_records());
    }

    /// Documents no navigation entry references, in path order.
    #[must_use]
    pub fn unlisted_documents(&self) -> Vec<&ContentDocument> {
        let linked = self.navigation.document_paths();
        self.registry
            .documents()
            .iter()
            .filter(|doc| !linked.contains(doc.path.as_str()))
            .collect()
    }
}
