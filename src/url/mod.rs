//! URL handling for the site loader
//!
//! This module resolves link targets against the page they were found on,
//! sorts raw `href` values into anchors, external references and site paths,
//! and gates recursion with the section filter.

mod filter;
mod normalize;

pub use filter::SectionFilter;
pub use normalize::{is_fetchable, normalize_path, parse_site_url};

/// Anchor fragments containing this marker point at highlighted code lines,
/// not at headings
const CODE_LINE_MARKER: &str = "codelineno";

/// How a raw `href` value found on a page is treated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LinkKind {
    /// In-page anchor (`#install`), recorded as a title
    Anchor,
    /// Reference to another site (`https://github.com/...`)
    External,
    /// Site-internal path that drives further traversal (`guide/`, `/api/`)
    Path,
    /// Anything else: code-line anchors, `mailto:`, bare words, empty values
    Ignored,
}

/// Classifies a raw `href` attribute value
///
/// # Rules
///
/// | Form | Kind |
/// |------|------|
/// | `#section` | Anchor |
/// | `#__codelineno-0-1` | Ignored |
/// | `http://…`, `https://…`, `//host/…` | External |
/// | `mailto:`, `tel:`, `javascript:`, `data:` | Ignored |
/// | contains `/` and has no scheme | Path |
/// | anything else (`index.html`, `..`) | Ignored |
///
/// # Examples
///
/// ```
/// use mkdocs_site_loader::url::{classify_href, LinkKind};
///
/// assert_eq!(classify_href("#install"), LinkKind::Anchor);
/// assert_eq!(classify_href("https://github.com/hummingbot"), LinkKind::External);
/// assert_eq!(classify_href("../strategies/"), LinkKind::Path);
/// assert_eq!(classify_href("mailto:dev@example.com"), LinkKind::Ignored);
/// ```
pub fn classify_href(href: &str) -> LinkKind {
    let href = href.trim();

    if href.is_empty() {
        return LinkKind::Ignored;
    }

    if let Some(fragment) = href.strip_prefix('#') {
        return if fragment.contains(CODE_LINE_MARKER) {
            LinkKind::Ignored
        } else {
            LinkKind::Anchor
        };
    }

    if href.starts_with("//") {
        return LinkKind::External;
    }

    if let Some(scheme) = scheme_of(href) {
        return if scheme.eq_ignore_ascii_case("http") || scheme.eq_ignore_ascii_case("https") {
            LinkKind::External
        } else {
            LinkKind::Ignored
        };
    }

    if href.contains('/') {
        LinkKind::Path
    } else {
        LinkKind::Ignored
    }
}

/// Returns the scheme of an absolute reference, if it has one
///
/// A scheme is a letter followed by letters, digits, `+`, `-` or `.`, ending
/// at the first `:`. `docs/a:b` has no scheme because `/` comes first.
fn scheme_of(href: &str) -> Option<&str> {
    let (scheme, _) = href.split_once(':')?;
    let mut chars = scheme.chars();
    let first = chars.next()?;

    let valid = first.is_ascii_alphabetic()
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));

    valid.then_some(scheme)
}
