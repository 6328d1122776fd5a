//! Contract with the site generator.
//!
//! The build hands a [`ResolvedSite`] to a [`SiteResolver`]: both navigation
//! trees with base-path-prefixed hrefs, plus page data for every document the
//! trees reference. The resolver renders whatever it renders and reports
//! per-page metadata back as [`RenderedPage`]s, which the build merges into
//! the content registry.
//!
//! [`ManifestWriter`] is the built-in resolver. It writes the resolved site as
//! JSON for a generator to pick up:
//!
//! ```text
//! {out_dir}/site.json          # title, description, basePath, nav, sidebar
//! {out_dir}/pages/index.json   # page data of the root document
//! {out_dir}/pages/intro.json   # page data of "intro"
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use docnav_config::SiteInfo;
use serde::Serialize;

use crate::navigation::{NavEntry, NavLink, SiteNavigation};
use crate::path::with_base_path;
use crate::registry::{ContentDocument, ContentRegistry};

/// A navigation entry ready for rendering.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ResolvedItem {
    /// Display label.
    pub text: String,
    /// Link target with the base path applied. Absent for groups without a
    /// landing page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    /// Canonical path of the linked document. Absent for external links.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document: Option<String>,
    /// Whether the group starts collapsed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collapsed: Option<bool>,
    /// Nested items.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<ResolvedItem>,
}

/// Page metadata exposed to the generator.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageData {
    /// Page title.
    pub title: String,
    /// Page description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Source file path relative to the source directory (e.g., "intro.md").
    pub relative_path: String,
    /// Last-updated timestamp in milliseconds since Unix epoch.
    pub last_updated: u64,
}

impl From<&ContentDocument> for PageData {
    fn from(doc: &ContentDocument) -> Self {
        Self {
            title: doc.title.clone(),
            description: doc.description.clone(),
            relative_path: doc.source_path.to_string_lossy().replace('\\', "/"),
            last_updated: doc.last_updated,
        }
    }
}

/// Everything the generator needs to render the site.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedSite {
    /// Site title.
    pub title: String,
    /// Site description.
    pub description: String,
    /// Prefix of every internal href.
    pub base_path: String,
    /// Top bar.
    pub nav: Vec<ResolvedItem>,
    /// Main content tree.
    pub sidebar: Vec<ResolvedItem>,
    /// Page data keyed by canonical document path.
    #[serde(skip)]
    pub pages: BTreeMap<String, PageData>,
}

impl ResolvedSite {
    /// Resolve validated navigation against the registry.
    ///
    /// Only documents referenced by the navigation get page data.
    #[must_use]
    pub fn new(site: &SiteInfo, navigation: &SiteNavigation, registry: &ContentRegistry) -> Self {
        let resolve_items = |entries: &[NavEntry]| -> Vec<ResolvedItem> {
            entries
                .iter()
                .map(|entry| resolve_entry(entry, &site.base_path))
                .collect()
        };

        let pages = navigation
            .document_paths()
            .into_iter()
            .filter_map(|path| registry.resolve(path).ok())
            .map(|doc| (doc.path.clone(), PageData::from(doc)))
            .collect();

        Self {
            title: site.title.clone(),
            description: site.description.clone(),
            base_path: site.base_path.clone(),
            nav: resolve_items(navigation.nav.entries()),
            sidebar: resolve_items(navigation.sidebar.entries()),
            pages,
        }
    }
}

fn resolve_entry(entry: &NavEntry, base_path: &str) -> ResolvedItem {
    let (href, document) = match entry.link() {
        Some(NavLink::Internal { declared, path }) => {
            (Some(with_base_path(base_path, declared)), Some(path.clone()))
        }
        Some(NavLink::External(url)) => (Some(url.clone()), None),
        None => (None, None),
    };

    ResolvedItem {
        text: entry.text.clone(),
        href,
        document,
        collapsed: entry.collapsed,
        items: entry
            .items()
            .iter()
            .map(|item| resolve_entry(item, base_path))
            .collect(),
    }
}

/// Metadata reported back by the generator for a rendered page.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RenderedPage {
    /// Document path (any spelling that resolves in the registry).
    pub path: String,
    /// Title override.
    pub title: Option<String>,
    /// Last-updated timestamp in milliseconds since Unix epoch.
    pub last_updated: Option<u64>,
}

/// Site resolver error.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    /// I/O error writing output.
    #[error("Failed to write {}: {source}", path.display())]
    Io {
        /// Path being written.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
    /// Serialization error.
    #[error("Failed to serialize site data: {0}")]
    Serialize(#[from] serde_json::Error),
    /// Generator-specific failure.
    #[error("{0}")]
    Generator(String),
}

/// External generator consuming the resolved site.
pub trait SiteResolver: Send + Sync {
    /// Render the site and report per-page metadata.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError`] if rendering fails.
    fn resolve(&self, site: &ResolvedSite) -> Result<Vec<RenderedPage>, ResolveError>;
}

/// Resolver writing the resolved site as JSON files.
pub struct ManifestWriter {
    out_dir: PathBuf,
}

impl ManifestWriter {
    /// Create a writer targeting `out_dir`.
    #[must_use]
    pub fn new(out_dir: PathBuf) -> Self {
        Self { out_dir }
    }

    /// Output directory.
    #[must_use]
    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }

    /// Page data file for a document path.
    fn page_file(&self, path: &str) -> PathBuf {
        let name = if path.is_empty() { "index" } else { path };
        self.out_dir.join("pages").join(format!("{name}.json"))
    }

    fn write_json(path: &Path, value: &impl Serialize) -> Result<(), ResolveError> {
        let io_err = |source| ResolveError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        let content = serde_json::to_string_pretty(value)?;
        fs::write(path, content).map_err(io_err)
    }
}

impl SiteResolver for ManifestWriter {
    fn resolve(&self, site: &ResolvedSite) -> Result<Vec<RenderedPage>, ResolveError> {
        Self::write_json(&self.out_dir.join("site.json"), site)?;
        for (path, page) in &site.pages {
            Self::write_json(&self.page_file(path), page)?;
        }
        tracing::info!(
            out_dir = %self.out_dir.display(),
            pages = site.pages.len(),
            "Wrote site manifest"
        );
        Ok(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use docnav_config::EntryDecl;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::navigation::NavigationBuilder;

    fn registry() -> ContentRegistry {
        ContentRegistry::from_documents(
            [("", "Home"), ("intro", "Introduction"), ("guide", "Guide")]
                .into_iter()
                .map(|(path, title)| ContentDocument {
                    path: path.to_owned(),
                    source_path: if path.is_empty() {
                        PathBuf::from("index.md")
                    } else {
                        PathBuf::from(format!("{path}.md"))
                    },
                    title: title.to_owned(),
                    description: Some(format!("About {title}")),
                    last_updated: 1_700_000_000_000,
                })
                .collect(),
        )
    }

    fn site_info(base_path: &str) -> SiteInfo {
        SiteInfo {
            base_path: base_path.to_owned(),
            title: "crane4j".to_owned(),
            description: "Data assembly".to_owned(),
        }
    }

    fn resolved(base_path: &str) -> ResolvedSite {
        let registry = registry();
        let built = NavigationBuilder::new(&registry)
            .build(
                &[
                    EntryDecl::leaf("Guide", "/intro.md#setup"),
                    EntryDecl::leaf("GitHub", "https://github.com/opengoofy/crane4j"),
                ],
                &[EntryDecl {
                    collapsed: Some(false),
                    ..EntryDecl::group("Guide", vec![EntryDecl::leaf("Intro", "/intro.md")])
                }],
            )
            .unwrap();
        ResolvedSite::new(&site_info(base_path), &built.navigation, &registry)
    }

    #[test]
    fn test_hrefs_use_base_path() {
        let site = resolved("/crane4j/");

        assert_eq!(site.nav[0].href.as_deref(), Some("/crane4j/intro.md#setup"));
        assert_eq!(site.nav[0].document.as_deref(), Some("intro"));
        assert_eq!(
            site.sidebar[0].items[0].href.as_deref(),
            Some("/crane4j/intro.md")
        );
    }

    #[test]
    fn test_external_href_is_verbatim() {
        let site = resolved("/crane4j/");

        assert_eq!(
            site.nav[1].href.as_deref(),
            Some("https://github.com/opengoofy/crane4j")
        );
        assert_eq!(site.nav[1].document, None);
    }

    #[test]
    fn test_group_without_landing_has_no_href() {
        let site = resolved("/");

        assert_eq!(site.sidebar[0].href, None);
        assert_eq!(site.sidebar[0].collapsed, Some(false));
        assert_eq!(site.sidebar[0].items.len(), 1);
    }

    #[test]
    fn test_pages_only_for_referenced_documents() {
        let site = resolved("/");

        assert_eq!(site.pages.keys().collect::<Vec<_>>(), vec!["intro"]);
        assert_eq!(
            site.pages["intro"],
            PageData {
                title: "Introduction".to_owned(),
                description: Some("About Introduction".to_owned()),
                relative_path: "intro.md".to_owned(),
                last_updated: 1_700_000_000_000,
            }
        );
    }

    #[test]
    fn test_page_data_json_is_camel_case() {
        let site = resolved("/");

        let json = serde_json::to_value(&site.pages["intro"]).unwrap();

        assert_eq!(json["relativePath"], "intro.md");
        assert_eq!(json["lastUpdated"], 1_700_000_000_000_u64);
    }

    #[test]
    fn test_manifest_writer_writes_site_and_pages() {
        let temp_dir = tempfile::tempdir().unwrap();
        let out_dir = temp_dir.path().join("dist");
        let writer = ManifestWriter::new(out_dir.clone());

        let rendered = writer.resolve(&resolved("/crane4j/")).unwrap();

        assert!(rendered.is_empty());
        let site: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(out_dir.join("site.json")).unwrap()).unwrap();
        assert_eq!(site["basePath"], "/crane4j/");
        assert_eq!(site["nav"][0]["href"], "/crane4j/intro.md#setup");
        assert!(site.get("pages").is_none());
        assert!(out_dir.join("pages/intro.json").exists());
    }

    #[test]
    fn test_manifest_writer_root_page_file() {
        let writer = ManifestWriter::new(PathBuf::from("/out"));

        assert_eq!(writer.page_file(""), PathBuf::from("/out/pages/index.json"));
        assert_eq!(
            writer.page_file("basic/container"),
            PathBuf::from("/out/pages/basic/container.json")
        );
    }
}
