use crate::SeoranError;
use std::collections::BTreeSet;
use std::fmt;
use url::Url;

/// Extracts the lowercase hostname from a URL, without port
///
/// # Examples
///
/// ```
/// use url::Url;
/// use seoran::url::extract_domain;
///
/// let url = Url::parse("https://Fa.Wikipedia.org:8443/wiki").unwrap();
/// assert_eq!(extract_domain(&url), Some("fa.wikipedia.org".to_string()));
/// ```
pub fn extract_domain(url: &Url) -> Option<String> {
    url.host_str()
        .filter(|h| !h.is_empty())
        .map(|h| h.to_lowercase())
}

/// The set of hostnames a crawl session may fetch from
///
/// Resolved once per session and never modified afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainScope {
    hosts: BTreeSet<String>,
}

impl DomainScope {
    /// Membership test against the resolved hostname set
    pub fn in_scope(&self, url: &Url) -> bool {
        extract_domain(url).is_some_and(|host| self.hosts.contains(&host))
    }

    /// Membership test for a bare hostname
    pub fn contains_host(&self, host: &str) -> bool {
        self.hosts.contains(&ascii_host(host))
    }

    /// Iterates the allowed hostnames in sorted order
    pub fn hosts(&self) -> impl Iterator<Item = &str> {
        self.hosts.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.hosts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hosts.is_empty()
    }
}

impl fmt::Display for DomainScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hosts: Vec<&str> = self.hosts().collect();
        write!(f, "[{}]", hosts.join(", "))
    }
}

/// Lower-cased ASCII form of a bare hostname
///
/// Internationalized names become punycode, matching what `Url::host_str`
/// reports for fetched URLs. Entries the URL parser rejects are kept
/// lower-cased as given.
fn ascii_host(host: &str) -> String {
    Url::parse(&format!("http://{}/", host))
        .ok()
        .as_ref()
        .and_then(extract_domain)
        .unwrap_or_else(|| host.to_lowercase())
}

/// Resolves the domain scope for a crawl session
///
/// A non-empty `explicit` list is the scope (entries trimmed, converted to
/// lower-cased ASCII, blank entries dropped). Otherwise the scope is the seed's hostname alone.
///
/// # Returns
///
/// * `Ok((Url, DomainScope))` - The parsed seed and its scope
/// * `Err(SeoranError::InvalidSeed)` - The seed is not an absolute http/https URL with a host
pub fn resolve_scope(seed_url: &str, explicit: &[String]) -> Result<(Url, DomainScope), SeoranError> {
    let invalid = |reason: String| SeoranError::InvalidSeed {
        url: seed_url.to_string(),
        reason,
    };

    let seed = Url::parse(seed_url.trim()).map_err(|e| invalid(e.to_string()))?;

    if seed.scheme() != "http" && seed.scheme() != "https" {
        return Err(invalid(format!("unsupported scheme '{}'", seed.scheme())));
    }

    let seed_host = extract_domain(&seed).ok_or_else(|| invalid("missing hostname".to_string()))?;

    let mut hosts: BTreeSet<String> = explicit
        .iter()
        .map(|d| d.trim())
        .filter(|d| !d.is_empty())
        .map(ascii_host)
        .collect();

    if hosts.is_empty() {
        hosts.insert(seed_host);
    }

    let seed = crate::url::normalize_parsed(seed).map_err(|e| invalid(e.to_string()))?;

    Ok((seed, DomainScope { hosts }))
}
