use crate::{UrlError, UrlResult};
use url::Url;

/// Normalizes a URL into the form stored in the frontier
///
/// # Normalization Steps
///
/// 1. Parse the URL; reject if malformed
/// 2. Reject any scheme other than http and https
/// 3. Reject URLs without a host
/// 4. Remove the fragment (everything after #)
///
/// The `url` crate already lower-cases the host, resolves dot segments and
/// turns an empty path into `/`. Queries, trailing slashes and `www.` are left
/// alone: two URLs that differ there are treated as different pages.
///
/// # Examples
///
/// ```
/// use seoran::url::normalize_url;
///
/// let url = normalize_url("http://EXAMPLE.com/a/../b#top").unwrap();
/// assert_eq!(url.as_str(), "http://example.com/b");
/// ```
pub fn normalize_url(url_str: &str) -> UrlResult<Url> {
    let url = Url::parse(url_str.trim()).map_err(|e| UrlError::Parse(e.to_string()))?;
    normalize_parsed(url)
}

/// Applies the normalization rules to an already-parsed URL
pub fn normalize_parsed(mut url: Url) -> UrlResult<Url> {
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    match url.host_str() {
        Some(host) if !host.is_empty() => {}
        _ => return Err(UrlError::MissingDomain),
    }

    url.set_fragment(None);

    Ok(url)
}
