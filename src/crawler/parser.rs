//! Link extraction from fetched pages
//!
//! This module turns the anchors of a fetched HTML page into the list of
//! URLs worth admitting to the frontier: resolved, normalized, retrievable,
//! and inside the crawl scope.

use crate::extract::{Document, HtmlDocument};
use crate::url::{normalize_parsed, DomainScope};
use std::collections::HashSet;
use url::Url;

/// Reference schemes that never lead to a page
const SKIPPED_SCHEMES: &[&str] = &["mailto:", "tel:", "javascript:", "ftp:", "data:"];

/// Path suffixes of non-document resources
pub const SKIPPED_EXTENSIONS: &[&str] = &[
    ".pdf", ".jpg", ".jpeg", ".png", ".gif", ".zip", ".rar", ".exe", ".mp3", ".mp4", ".doc",
    ".docx", ".xls", ".xlsx", ".ppt", ".pptx",
];

/// Extracts crawlable links from an HTML page
///
/// # Link Extraction Rules
///
/// **Include:**
/// - `<a href="...">` anywhere in the document
///
/// **Exclude:**
/// - Empty and fragment-only references
/// - `mailto:`, `tel:`, `javascript:`, `ftp:` and `data:` references
/// - References that do not resolve to an absolute http/https URL
/// - Paths ending in a non-document extension (images, archives, media, office files)
/// - Hosts outside `scope`
///
/// Links are returned in document order without duplicates.
///
/// # Example
///
/// ```
/// use seoran::crawler::extract_links;
/// use seoran::url::resolve_scope;
///
/// let (base, scope) = resolve_scope("https://example.com/blog/", &[]).unwrap();
/// let html = r#"<a href="post-1#top">1</a><a href="/cv.pdf">cv</a><a href="https://other.com/">x</a>"#;
///
/// let links = extract_links(html, &base, &scope);
/// assert_eq!(links.len(), 1);
/// assert_eq!(links[0].as_str(), "https://example.com/blog/post-1");
/// ```
pub fn extract_links(html: &str, base_url: &Url, scope: &DomainScope) -> Vec<Url> {
    let document = HtmlDocument::parse(html);
    extract_links_from(&document, base_url, scope)
}

/// [`extract_links`] over an already parsed document
pub fn extract_links_from<D: Document>(document: &D, base_url: &Url, scope: &DomainScope) -> Vec<Url> {
    let mut seen = HashSet::new();
    let mut links = Vec::new();

    for element in document.find_all("a") {
        let Some(href) = element.value().attr("href") else {
            continue;
        };

        if let Some(url) = resolve_link(href, base_url, scope) {
            if seen.insert(url.clone()) {
                links.push(url);
            }
        }
    }

    links
}

/// Resolves one raw reference, or returns None if it should not be followed
fn resolve_link(href: &str, base_url: &Url, scope: &DomainScope) -> Option<Url> {
    let href = href.trim();
    let href = href.split('#').next().unwrap_or("");

    if href.is_empty() {
        return None;
    }

    let lowered = href.to_ascii_lowercase();
    if SKIPPED_SCHEMES.iter().any(|s| lowered.starts_with(s)) {
        return None;
    }

    let joined = base_url.join(href).ok()?;
    let url = match normalize_parsed(joined) {
        Ok(url) => url,
        Err(e) => {
            tracing::trace!("Skipping link {}: {}", href, e);
            return None;
        }
    };

    if has_skipped_extension(&url) {
        tracing::trace!("Skipping non-document link {}", url);
        return None;
    }

    if !scope.in_scope(&url) {
        tracing::trace!("Skipping out-of-scope link {}", url);
        return None;
    }

    Some(url)
}

fn has_skipped_extension(url: &Url) -> bool {
    let path = url.path().to_ascii_lowercase();
    SKIPPED_EXTENSIONS.iter().any(|ext| path.ends_with(ext))
}
