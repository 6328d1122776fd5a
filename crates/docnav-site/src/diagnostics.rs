//! Navigation validation diagnostics.
//!
//! Fatal problems are [`NavigationError`]s; the only non-fatal one is
//! [`DuplicateLinkWarning`]. Validation collects everything it finds in one
//! pass and reports it as [`NavigationErrors`].

use std::fmt;

/// Which navigation tree an entry belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TreeKind {
    /// Top bar navigation (`[[nav]]`).
    Nav,
    /// Main content tree (`[[sidebar]]`).
    Sidebar,
}

impl fmt::Display for TreeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Nav => f.write_str("nav"),
            Self::Sidebar => f.write_str("sidebar"),
        }
    }
}

/// Position of an entry in its declaration, e.g. `sidebar[0].items[2]`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EntryLocation {
    /// Tree the entry was declared in.
    pub tree: TreeKind,
    /// Index at each nesting level, outermost first.
    pub indices: Vec<usize>,
}

impl EntryLocation {
    pub(crate) fn root(tree: TreeKind, index: usize) -> Self {
        Self {
            tree,
            indices: vec![index],
        }
    }

    pub(crate) fn child(&self, index: usize) -> Self {
        let mut indices = self.indices.clone();
        indices.push(index);
        Self {
            tree: self.tree,
            indices,
        }
    }

    /// Nesting depth (1 for top-level sections).
    #[must_use]
    pub fn depth(&self) -> usize {
        self.indices.len()
    }
}

impl fmt::Display for EntryLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut indices = self.indices.iter();
        if let Some(first) = indices.next() {
            write!(f, "{}[{first}]", self.tree)?;
        }
        for index in indices {
            write!(f, ".items[{index}]")?;
        }
        Ok(())
    }
}

/// Why an entry's shape is invalid.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MalformedReason {
    /// `text` is missing or blank.
    EmptyText,
    /// `link` is present but empty.
    EmptyLink,
    /// Neither `link` nor `items` is present.
    NoLinkOrItems,
    /// `items` is empty and there is no `link` to fall back on.
    EmptyGroup,
}

impl fmt::Display for MalformedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::EmptyText => "text must not be empty",
            Self::EmptyLink => "link must not be empty",
            Self::NoLinkOrItems => "entry needs a link or items",
            Self::EmptyGroup => "items is empty and no link is set",
        })
    }
}

/// Fatal navigation validation error.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum NavigationError {
    /// A link does not resolve to any content document.
    #[error("{location}: link {link:?} in entry {text:?} does not resolve to a document")]
    UnresolvedLink {
        /// Entry position.
        location: EntryLocation,
        /// Entry label.
        text: String,
        /// Link as written in the configuration.
        link: String,
    },
    /// An entry's shape is invalid.
    #[error("{location}: malformed entry {text:?}: {reason}")]
    MalformedEntry {
        /// Entry position.
        location: EntryLocation,
        /// Entry label (may be empty).
        text: String,
        /// What is wrong with it.
        reason: MalformedReason,
    },
    /// An entry is nested deeper than section → entry.
    #[error("{location}: entry {text:?} is nested {depth} levels deep, at most {max} allowed")]
    ExcessiveNesting {
        /// Entry position.
        location: EntryLocation,
        /// Entry label.
        text: String,
        /// Actual depth.
        depth: usize,
        /// Maximum allowed depth.
        max: usize,
    },
}

impl NavigationError {
    /// Position of the offending entry.
    #[must_use]
    pub fn location(&self) -> &EntryLocation {
        match self {
            Self::UnresolvedLink { location, .. }
            | Self::MalformedEntry { location, .. }
            | Self::ExcessiveNesting { location, .. } => location,
        }
    }
}

/// A labeled entry position, used to pair duplicate links.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EntryRef {
    /// Entry position.
    pub location: EntryLocation,
    /// Entry label.
    pub text: String,
}

/// Two entries of the same tree point to the same document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DuplicateLinkWarning {
    /// Canonical document path, or the URL for external links.
    pub target: String,
    /// First entry declaring the link.
    pub first: EntryRef,
    /// Later entry repeating it.
    pub duplicate: EntryRef,
}

impl fmt::Display for DuplicateLinkWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: entry {:?} links to {:?}, already linked by {:?} at {}",
            self.duplicate.location,
            self.duplicate.text,
            self.target,
            self.first.text,
            self.first.location
        )
    }
}

/// Every fatal error found while building the navigation, plus the warnings
/// collected along the way.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NavigationErrors {
    /// Fatal errors, in declaration order. Never empty.
    pub errors: Vec<NavigationError>,
    /// Non-fatal warnings, in declaration order.
    pub warnings: Vec<DuplicateLinkWarning>,
}

impl fmt::Display for NavigationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let count = self.errors.len();
        let noun = if count == 1 { "error" } else { "errors" };
        write!(f, "Navigation has {count} {noun}:")?;
        for error in &self.errors {
            write!(f, "\n  - {error}")?;
        }
        Ok(())
    }
}

impl std::error::Error for NavigationErrors {}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_location_display() {
        let top = EntryLocation::root(TreeKind::Sidebar, 0);
        let nested = top.child(2).child(1);

        assert_eq!(top.to_string(), "sidebar[0]");
        assert_eq!(nested.to_string(), "sidebar[0].items[2].items[1]");
        assert_eq!(nested.depth(), 3);
        assert_eq!(EntryLocation::root(TreeKind::Nav, 4).to_string(), "nav[4]");
    }

    #[test]
    fn test_unresolved_link_display() {
        let err = NavigationError::UnresolvedLink {
            location: EntryLocation::root(TreeKind::Sidebar, 0).child(0),
            text: "Intro".to_owned(),
            link: "/intro.md".to_owned(),
        };

        assert_eq!(
            err.to_string(),
            r#"sidebar[0].items[0]: link "/intro.md" in entry "Intro" does not resolve to a document"#
        );
    }

    #[test]
    fn test_navigation_errors_lists_every_error() {
        let errors = NavigationErrors {
            errors: vec![
                NavigationError::MalformedEntry {
                    location: EntryLocation::root(TreeKind::Nav, 1),
                    text: String::new(),
                    reason: MalformedReason::EmptyText,
                },
                NavigationError::ExcessiveNesting {
                    location: EntryLocation::root(TreeKind::Sidebar, 0).child(0).child(0),
                    text: "Deep".to_owned(),
                    depth: 3,
                    max: 2,
                },
            ],
            warnings: Vec::new(),
        };

        let msg = errors.to_string();
        assert!(msg.starts_with("Navigation has 2 errors:"));
        assert!(msg.contains("nav[1]: malformed entry \"\": text must not be empty"));
        assert!(msg.contains("sidebar[0].items[0].items[0]"));
    }

    #[test]
    fn test_duplicate_warning_display() {
        let warning = DuplicateLinkWarning {
            target: "intro".to_owned(),
            first: EntryRef {
                location: EntryLocation::root(TreeKind::Sidebar, 0),
                text: "Intro".to_owned(),
            },
            duplicate: EntryRef {
                location: EntryLocation::root(TreeKind::Sidebar, 3),
                text: "Start here".to_owned(),
            },
        };

        assert_eq!(
            warning.to_string(),
            r#"sidebar[3]: entry "Start here" links to "intro", already linked by "Intro" at sidebar[0]"#
        );
    }
}
