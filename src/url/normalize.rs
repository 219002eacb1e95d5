use crate::{UrlError, UrlResult};
use url::Url;

/// Parses the crawl root and checks that it can be fetched over HTTP(S)
///
/// # Examples
///
/// ```
/// use mkdocs_site_loader::url::parse_site_url;
///
/// let root = parse_site_url("https://docs.example.com").unwrap();
/// assert_eq!(root.as_str(), "https://docs.example.com/");
/// assert!(parse_site_url("ftp://docs.example.com").is_err());
/// ```
pub fn parse_site_url(site_url: &str) -> UrlResult<Url> {
    let url = Url::parse(site_url.trim())
        .map_err(|e| UrlError::Parse(format!("{}: {}", site_url, e)))?;

    if !is_fetchable(&url) {
        return Err(UrlError::UnsupportedScheme(url.scheme().to_string()));
    }

    Ok(url)
}

/// Normalizes a link target into an absolute URL
///
/// # Normalization Steps
///
/// 1. If `path` is already absolute (carries a scheme), it is used as is
/// 2. Otherwise it is joined to `base_url` with RFC 3986 reference resolution,
///    so `guide/`, `../api/` and `/blog/` behave as they do in a browser
/// 3. The fragment is removed, since `page/#install` and `page/` are the same
///    document
///
/// The result is the identity key of a page for the whole crawl.
///
/// # Examples
///
/// ```
/// use mkdocs_site_loader::normalize_path;
/// use url::Url;
///
/// let base = Url::parse("https://docs.example.com/guide/").unwrap();
/// let url = normalize_path(&base, "../api/#client").unwrap();
/// assert_eq!(url.as_str(), "https://docs.example.com/api/");
/// ```
pub fn normalize_path(base_url: &Url, path: &str) -> UrlResult<Url> {
    let mut url = base_url
        .join(path.trim())
        .map_err(|e| UrlError::Parse(format!("{}: {}", path, e)))?;

    url.set_fragment(None);

    Ok(url)
}

/// Returns true if the URL can be requested by the HTTP transport
pub fn is_fetchable(url: &Url) -> bool {
    matches!(url.scheme(), "http" | "https") && url.host_str().is_some()
}
