//! Navigation tree building and validation.
//!
//! [`NavigationBuilder`] turns the declared `[[nav]]` and `[[sidebar]]`
//! entries into validated, immutable [`NavigationTree`]s. Validation walks the
//! whole declaration once and collects every problem it finds, so a single
//! run reports all broken entries. The tree is only returned when no fatal
//! error was found; duplicate links are reported as warnings alongside it.

use std::collections::{HashMap, HashSet};

use docnav_config::EntryDecl;

use crate::diagnostics::{
    DuplicateLinkWarning, EntryLocation, EntryRef, MalformedReason, NavigationError,
    NavigationErrors, TreeKind,
};
use crate::path::{canonical_path, is_external};
use crate::registry::ContentRegistry;

/// Maximum nesting depth: section → entry.
pub const MAX_DEPTH: usize = 2;

/// Target of a navigation entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NavLink {
    /// Link to a content document.
    Internal {
        /// Link as written in the configuration (e.g., "/intro.md#setup").
        declared: String,
        /// Canonical document path (e.g., "intro").
        path: String,
    },
    /// Link outside the site, kept verbatim.
    External(String),
}

impl NavLink {
    /// Classify a declared link.
    #[must_use]
    pub fn parse(link: &str) -> Self {
        if is_external(link) {
            Self::External(link.to_owned())
        } else {
            Self::Internal {
                declared: link.to_owned(),
                path: canonical_path(link),
            }
        }
    }

    /// Link as written in the configuration.
    #[must_use]
    pub fn declared(&self) -> &str {
        match self {
            Self::Internal { declared, .. } => declared,
            Self::External(url) => url,
        }
    }

    /// Canonical document path for internal links.
    #[must_use]
    pub fn document_path(&self) -> Option<&str> {
        match self {
            Self::Internal { path, .. } => Some(path),
            Self::External(_) => None,
        }
    }

    /// Key two links are compared by when looking for duplicates.
    fn target(&self) -> &str {
        match self {
            Self::Internal { path, .. } => path,
            Self::External(url) => url,
        }
    }
}

/// Shape of a navigation entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EntryKind {
    /// Entry pointing at a single target.
    Leaf(NavLink),
    /// Entry containing nested entries, optionally with its own landing page.
    Group {
        /// Landing page of the section.
        landing: Option<NavLink>,
        /// Nested entries, in declaration order.
        items: Vec<NavEntry>,
    },
}

/// A validated navigation entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NavEntry {
    /// Display label.
    pub text: String,
    /// Leaf or group.
    pub kind: EntryKind,
    /// Whether the group starts collapsed.
    pub collapsed: Option<bool>,
}

impl NavEntry {
    /// Direct link of this entry (leaf target or group landing page).
    #[must_use]
    pub fn link(&self) -> Option<&NavLink> {
        match &self.kind {
            EntryKind::Leaf(link) => Some(link),
            EntryKind::Group { landing, .. } => landing.as_ref(),
        }
    }

    /// Nested entries (empty for leaves).
    #[must_use]
    pub fn items(&self) -> &[NavEntry] {
        match &self.kind {
            EntryKind::Leaf(_) => &[],
            EntryKind::Group { items, .. } => items,
        }
    }
}

/// Validated, ordered navigation tree.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NavigationTree {
    entries: Vec<NavEntry>,
}

impl NavigationTree {
    /// Top-level entries, in declaration order.
    #[must_use]
    pub fn entries(&self) -> &[NavEntry] {
        &self.entries
    }

    /// Number of top-level entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the tree has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Every link in the tree, depth-first in declaration order.
    #[must_use]
    pub fn links(&self) -> Vec<&NavLink> {
        fn collect<'t>(entries: &'t [NavEntry], out: &mut Vec<&'t NavLink>) {
            for entry in entries {
                if let Some(link) = entry.link() {
                    out.push(link);
                }
                collect(entry.items(), out);
            }
        }

        let mut links = Vec::new();
        collect(&self.entries, &mut links);
        links
    }
}

/// Both navigation trees of a site.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SiteNavigation {
    /// Top bar.
    pub nav: NavigationTree,
    /// Main content tree.
    pub sidebar: NavigationTree,
}

impl SiteNavigation {
    /// Canonical paths of every document referenced by either tree.
    #[must_use]
    pub fn document_paths(&self) -> HashSet<&str> {
        self.nav
            .links()
            .into_iter()
            .chain(self.sidebar.links())
            .filter_map(NavLink::document_path)
            .collect()
    }
}

/// Successful navigation build.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BuiltNavigation {
    /// Validated trees.
    pub navigation: SiteNavigation,
    /// Non-fatal duplicate link warnings.
    pub warnings: Vec<DuplicateLinkWarning>,
}

/// Builds navigation trees validated against a content registry.
pub struct NavigationBuilder<'r> {
    registry: &'r ContentRegistry,
}

impl<'r> NavigationBuilder<'r> {
    /// Create a builder resolving links in `registry`.
    #[must_use]
    pub fn new(registry: &'r ContentRegistry) -> Self {
        Self { registry }
    }

    /// Build and validate both trees in one pass.
    ///
    /// # Errors
    ///
    /// Returns [`NavigationErrors`] with every fatal error of both trees if
    /// any was found.
    pub fn build(
        &self,
        nav: &[EntryDecl],
        sidebar: &[EntryDecl],
    ) -> Result<BuiltNavigation, NavigationErrors> {
        let mut nav_pass = TreePass::new(self.registry, TreeKind::Nav);
        let nav = nav_pass.entries(nav, None);
        let mut sidebar_pass = TreePass::new(self.registry, TreeKind::Sidebar);
        let sidebar = sidebar_pass.entries(sidebar, None);

        let mut errors = nav_pass.errors;
        errors.extend(sidebar_pass.errors);
        let mut warnings = nav_pass.warnings;
        warnings.extend(sidebar_pass.warnings);

        if !errors.is_empty() {
            return Err(NavigationErrors { errors, warnings });
        }

        Ok(BuiltNavigation {
            navigation: SiteNavigation {
                nav: NavigationTree { entries: nav },
                sidebar: NavigationTree { entries: sidebar },
            },
            warnings,
        })
    }

    /// Build and validate a single tree.
    ///
    /// # Errors
    ///
    /// Returns [`NavigationErrors`] with every fatal error of the tree if any
    /// was found.
    pub fn build_tree(
        &self,
        tree: TreeKind,
        decls: &[EntryDecl],
    ) -> Result<(NavigationTree, Vec<DuplicateLinkWarning>), NavigationErrors> {
        let mut pass = TreePass::new(self.registry, tree);
        let entries = pass.entries(decls, None);

        if pass.errors.is_empty() {
            Ok((NavigationTree { entries }, pass.warnings))
        } else {
            Err(NavigationErrors {
                errors: pass.errors,
                warnings: pass.warnings,
            })
        }
    }
}

/// Validation state for one tree.
struct TreePass<'r> {
    registry: &'r ContentRegistry,
    tree: TreeKind,
    errors: Vec<NavigationError>,
    warnings: Vec<DuplicateLinkWarning>,
    /// First entry seen for each link target.
    seen: HashMap<String, EntryRef>,
}

impl<'r> TreePass<'r> {
    fn new(registry: &'r ContentRegistry, tree: TreeKind) -> Self {
        Self {
            registry,
            tree,
            errors: Vec::new(),
            warnings: Vec::new(),
            seen: HashMap::new(),
        }
    }

    fn entries(&mut self, decls: &[EntryDecl], parent: Option<&EntryLocation>) -> Vec<NavEntry> {
        decls
            .iter()
            .enumerate()
            .filter_map(|(idx, decl)| {
                let location = match parent {
                    Some(parent) => parent.child(idx),
                    None => EntryLocation::root(self.tree, idx),
                };
                self.entry(decl, location)
            })
            .collect()
    }

    fn entry(&mut self, decl: &EntryDecl, location: EntryLocation) -> Option<NavEntry> {
        let depth = location.depth();
        if depth > MAX_DEPTH {
            self.errors.push(NavigationError::ExcessiveNesting {
                text: decl.text.clone(),
                location: location.clone(),
                depth,
                max: MAX_DEPTH,
            });
            // Deeper entries are reported too
            if let Some(items) = &decl.items {
                self.entries(items, Some(&location));
            }
            return None;
        }

        if decl.text.trim().is_empty() {
            self.malformed(decl, &location, MalformedReason::EmptyText);
        }

        let link = match decl.link.as_deref() {
            Some(raw) if raw.trim().is_empty() => {
                self.malformed(decl, &location, MalformedReason::EmptyLink);
                None
            }
            Some(raw) => self.link(raw, decl, &location),
            None => None,
        };

        let kind = match &decl.items {
            Some(items) => {
                if items.is_empty() && decl.link.is_none() {
                    self.malformed(decl, &location, MalformedReason::EmptyGroup);
                }
                EntryKind::Group {
                    landing: link,
                    items: self.entries(items, Some(&location)),
                }
            }
            None if decl.link.is_none() => {
                self.malformed(decl, &location, MalformedReason::NoLinkOrItems);
                return None;
            }
            None => EntryKind::Leaf(link?),
        };

        Some(NavEntry {
            text: decl.text.clone(),
            kind,
            collapsed: decl.collapsed,
        })
    }

    /// Resolve a declared link, recording an error if it doesn't resolve.
    fn link(&mut self, raw: &str, decl: &EntryDecl, location: &EntryLocation) -> Option<NavLink> {
        let link = NavLink::parse(raw);
        if matches!(link, NavLink::Internal { .. }) && !self.registry.contains(raw) {
            self.errors.push(NavigationError::UnresolvedLink {
                location: location.clone(),
                text: decl.text.clone(),
                link: raw.to_owned(),
            });
            return None;
        }

        let entry = EntryRef {
            location: location.clone(),
            text: decl.text.clone(),
        };
        match self.seen.get(link.target()) {
            Some(first) => {
                let warning = DuplicateLinkWarning {
                    target: link.target().to_owned(),
                    first: first.clone(),
                    duplicate: entry,
                };
                tracing::warn!(%warning, "Duplicate navigation link");
                self.warnings.push(warning);
            }
            None => {
                self.seen.insert(link.target().to_owned(), entry);
            }
        }

        Some(link)
    }

    fn malformed(&mut self, decl: &EntryDecl, location: &EntryLocation, reason: MalformedReason) {
        self.errors.push(NavigationError::MalformedEntry {
            location: location.clone(),
            text: decl.text.clone(),
            reason,
        });
    }
}
