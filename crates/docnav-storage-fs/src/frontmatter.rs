//! YAML frontmatter parsing for markdown documents.
//!
//! Frontmatter is a YAML block delimited by `---` lines at the very start of
//! a document. Only the fields the navigation model consumes are parsed;
//! everything else is ignored.

use serde::Deserialize;

/// Parsed fields from a frontmatter block.
#[derive(Debug, Default, Deserialize, PartialEq, Eq)]
pub(crate) struct Frontmatter {
    pub title: Option<String>,
    pub description: Option<String>,
}

/// Split a document into its frontmatter block and body.
///
/// Returns `(None, content)` when the document has no frontmatter or the
/// block is never closed.
pub(crate) fn split_frontmatter(content: &str) -> (Option<&str>, &str) {
    let Some(rest) = content
        .strip_prefix("---\n")
        .or_else(|| content.strip_prefix("---\r\n"))
    else {
        return (None, content);
    };

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == "---" {
            let yaml = &rest[..offset];
            let body = &rest[offset + line.len()..];
            return (Some(yaml), body);
        }
        offset += line.len();
    }

    (None, content)
}

/// Parse frontmatter YAML.
///
/// Empty frontmatter yields a default instance.
///
/// # Errors
///
/// Returns the YAML error if the block is malformed.
pub(crate) fn parse_frontmatter(yaml: &str) -> Result<Frontmatter, serde_yaml::Error> {
    let trimmed = yaml.trim();
    if trimmed.is_empty() {
        return Ok(Frontmatter::default());
    }
    serde_yaml::from_str(trimmed)
}
