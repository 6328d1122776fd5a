//! Link canonicalization.
//!
//! Navigation links are written the way authors think of them (`/intro.md`,
//! `/guide/`, `/basic/container/index`), while the registry keys documents by
//! canonical path (`"intro"`, `"guide"`, `"basic/container"`). Every spelling
//! of the same document canonicalizes to the same key.

/// URL schemes marking a link as external.
const EXTERNAL_SCHEMES: [&str; 3] = ["http://", "https://", "mailto:"];

/// Check whether a link points outside the site.
#[must_use]
pub fn is_external(link: &str) -> bool {
    EXTERNAL_SCHEMES
        .iter()
        .any(|scheme| link.starts_with(scheme))
}

/// Split a link into its path part and optional `#fragment`.
pub(crate) fn split_fragment(link: &str) -> (&str, Option<&str>) {
    match link.split_once('#') {
        Some((path, fragment)) => (path, Some(fragment)),
        None => (link, None),
    }
}

/// Convert an internal link to a canonical document path.
///
/// Examples:
/// - `/` -> `""`
/// - `/intro.md` -> `"intro"`
/// - `/guide/` -> `"guide"`
/// - `/basic/container/index.html` -> `"basic/container"`
/// - `/intro#setup` -> `"intro"`
#[must_use]
pub fn canonical_path(link: &str) -> String {
    let (path, _) = split_fragment(link);
    let path = path.trim_start_matches('/').trim_end_matches('/');
    let path = path
        .strip_suffix(".md")
        .or_else(|| path.strip_suffix(".html"))
        .unwrap_or(path);

    if path == "index" {
        String::new()
    } else if let Some(parent) = path.strip_suffix("/index") {
        parent.to_owned()
    } else {
        path.to_owned()
    }
}

/// Prefix an internal link with the site base path.
///
/// Plain concatenation: the leading `/` of the link is dropped because the
/// base path always ends with one.
pub(crate) fn with_base_path(base_path: &str, link: &str) -> String {
    format!("{base_path}{}", link.trim_start_matches('/'))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_canonical_path() {
        assert_eq!(canonical_path("/"), "");
        assert_eq!(canonical_path("/index.md"), "");
        assert_eq!(canonical_path("/intro.md"), "intro");
        assert_eq!(canonical_path("/intro"), "intro");
        assert_eq!(canonical_path("intro.md"), "intro");
        assert_eq!(canonical_path("/guide/"), "guide");
        assert_eq!(canonical_path("/guide/index.md"), "guide");
        assert_eq!(
            canonical_path("/basic/container/custom_container.html"),
            "basic/container/custom_container"
        );
    }

    #[test]
    fn test_canonical_path_ignores_fragment() {
        assert_eq!(canonical_path("/intro.md#setup"), "intro");
        assert_eq!(canonical_path("/#top"), "");
    }

    #[test]
    fn test_is_external() {
        assert!(is_external("https://github.com/opengoofy/crane4j"));
        assert!(is_external("http://example.com"));
        assert!(is_external("mailto:team@example.com"));
        assert!(!is_external("/intro.md"));
        assert!(!is_external("intro"));
    }

    #[test]
    fn test_split_fragment() {
        assert_eq!(split_fragment("/intro#setup"), ("/intro", Some("setup")));
        assert_eq!(split_fragment("/intro"), ("/intro", None));
    }

    #[test]
    fn test_with_base_path() {
        assert_eq!(with_base_path("/", "/intro.md"), "/intro.md");
        assert_eq!(with_base_path("/crane4j/", "/intro.md"), "/crane4j/intro.md");
        assert_eq!(with_base_path("/crane4j/", "intro.md"), "/crane4j/intro.md");
        assert_eq!(with_base_path("/crane4j/", "/"), "/crane4j/");
    }
}
