//! Declarative site and navigation schema.
//!
//! These types mirror `docnav.toml` one to one and are deliberately lenient:
//! a missing `text` or an entry nested too deeply still parses, so the
//! navigation builder can report every problem in one pass instead of
//! stopping at the first serde error.

use serde::{Deserialize, Serialize};

/// Site-wide settings from the `[site]` table.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct SiteInfo {
    /// Prefix applied to every internal link. Must start and end with `/`.
    pub base_path: String,
    /// Site title.
    pub title: String,
    /// Site description.
    pub description: String,
}

impl Default for SiteInfo {
    fn default() -> Self {
        Self {
            base_path: "/".to_owned(),
            title: String::new(),
            description: String::new(),
        }
    }
}

/// A navigation entry as declared in `[[nav]]` or `[[sidebar]]`.
///
/// A leaf declares `link`; a group declares `items` and optionally a
/// landing-page `link`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct EntryDecl {
    /// Display label.
    #[serde(default)]
    pub text: String,
    /// Link to a content document (or an external URL).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    /// Nested entries.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<EntryDecl>>,
    /// Whether a group starts collapsed in the rendered sidebar.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collapsed: Option<bool>,
}

impl EntryDecl {
    /// Declare a leaf entry.
    #[must_use]
    pub fn leaf(text: impl Into<String>, link: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            link: Some(link.into()),
            ..Self::default()
        }
    }

    /// Declare a group entry.
    #[must_use]
    pub fn group(text: impl Into<String>, items: Vec<EntryDecl>) -> Self {
        Self {
            text: text.into(),
            items: Some(items),
            ..Self::default()
        }
    }

    /// Attach a landing-page link to a group.
    #[must_use]
    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.link = Some(link.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[derive(Deserialize)]
    struct Wrapper {
        sidebar: Vec<EntryDecl>,
    }

    #[test]
    fn test_parse_group_with_items() {
        let toml = r#"
[[sidebar]]
text = "Guide"
link = "/guide/"
collapsed = true

[[sidebar.items]]
text = "Intro"
link = "/intro.md"
"#;
        let parsed: Wrapper = toml::from_str(toml).unwrap();

        assert_eq!(
            parsed.sidebar,
            vec![EntryDecl {
                collapsed: Some(true),
                ..EntryDecl::group("Guide", vec![EntryDecl::leaf("Intro", "/intro.md")])
                    .with_link("/guide/")
            }]
        );
    }

    #[test]
    fn test_parse_is_lenient() {
        let toml = r#"
[[sidebar]]
link = "/orphan.md"

[[sidebar]]
text = "Deep"
[[sidebar.items]]
text = "Level 2"
[[sidebar.items.items]]
text = "Level 3"
link = "/deep.md"
"#;
        let parsed: Wrapper = toml::from_str(toml).unwrap();

        assert_eq!(parsed.sidebar[0].text, "");
        let level2 = &parsed.sidebar[1].items.as_ref().unwrap()[0];
        assert_eq!(level2.items.as_ref().unwrap()[0].text, "Level 3");
    }

    #[test]
    fn test_site_info_defaults() {
        let info = SiteInfo::default();
        assert_eq!(info.base_path, "/");
        assert!(info.title.is_empty());
    }
}
