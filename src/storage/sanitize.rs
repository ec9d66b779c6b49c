//! URL to filename mapping
//!
//! Produces a filesystem-safe, deterministic name for every URL. Names are
//! readable where possible (`host_path_query_....html`). A readable name that
//! lost characters (non-ASCII text, a long query, or the length cap) carries a
//! hash suffix, and a name that would be empty or too short uses the hashed
//! form instead.

use sha2::{Digest, Sha256};
use std::borrow::Cow;
use url::Url;

/// Longest readable name, before the document extension is appended
pub const MAX_FILENAME_LEN: usize = 180;

/// Readable names shorter than this use the hashed form
pub const MIN_FILENAME_LEN: usize = 10;

/// Extension forced onto every saved page
pub const DOCUMENT_EXTENSION: &str = ".html";

/// Characters of the query string kept in a readable name
const QUERY_PREFIX_LEN: usize = 50;

/// Hex characters of the URL hash used in hashed names
const HASH_LEN: usize = 8;

/// Server-side document extensions dropped from the path part
const STRIPPED_EXTENSIONS: &[&str] = &[".html", ".htm", ".php", ".asp", ".aspx", ".jsp"];

/// Names that carry no information about the URL
const PLACEHOLDER_NAMES: &[&str] = &[".html", "_query_.html"];

/// Maps a URL to a filesystem-safe filename
///
/// Total and deterministic: the same URL always yields the same name.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use seoran::storage::sanitize_filename;
///
/// let url = Url::parse("https://virgool.io/blog/post.php?id=7").unwrap();
/// assert_eq!(sanitize_filename(&url), "virgool.io_blog_post_query_id_7.html");
/// ```
pub fn sanitize_filename(url: &Url) -> String {
    let mut name = host_part(url);
    // Set when the readable form drops information that tells URLs apart
    let mut lossy = false;

    let path = percent_decode(url.path());
    if !path.is_empty() && path != "/" {
        let joined = path.replace('/', "_");
        let path_part = strip_document_extension(joined.trim_matches('_'));
        if !path_part.is_empty() {
            lossy |= !path_part.is_ascii();
            name.push('_');
            name.push_str(path_part);
        }
    }

    if let Some(query) = url.query().filter(|q| !q.is_empty()) {
        let decoded = percent_decode(query);
        lossy |= !decoded.is_ascii() || decoded.chars().count() > QUERY_PREFIX_LEN;
        let safe_query: String = replace_unsafe(&decoded)
            .chars()
            .take(QUERY_PREFIX_LEN)
            .collect();
        name.push_str("_query_");
        name.push_str(&safe_query);
    }

    let mut name = replace_unsafe(&name);

    // Every character is ASCII after replacement, so byte truncation is safe.
    lossy |= name.len() > MAX_FILENAME_LEN;
    if lossy {
        name.truncate(MAX_FILENAME_LEN - HASH_LEN - 1);
        name.push('_');
        name.push_str(&short_hash(url));
    }

    if !name.to_ascii_lowercase().ends_with(DOCUMENT_EXTENSION) {
        name.push_str(DOCUMENT_EXTENSION);
    }

    if is_degenerate(&name, url) {
        return fallback_filename(url);
    }

    name
}

/// The hashed form: `{host}_{hash}_page.html`
///
/// Dots in the host become underscores so the name cannot be mistaken for a
/// readable one.
pub fn fallback_filename(url: &Url) -> String {
    let host = host_part(url);
    let domain_part = if host.is_empty() {
        "nodomain".to_string()
    } else {
        host.replace('.', "_")
    };
    replace_unsafe(&format!(
        "{}_{}_page{}",
        domain_part,
        short_hash(url),
        DOCUMENT_EXTENSION
    ))
}

/// Filesystem-safe directory name for the URL's host
pub fn host_directory_name(url: &Url) -> String {
    match url.host_str().filter(|h| !h.is_empty()) {
        Some(host) => replace_unsafe(&host.to_lowercase().replace('.', "_")),
        None => "unknown_domain".to_string(),
    }
}

/// First eight hex characters of the SHA-256 of the URL
pub fn short_hash(url: &Url) -> String {
    let digest = Sha256::digest(url.as_str().as_bytes());
    let mut hash = hex::encode(digest);
    hash.truncate(HASH_LEN);
    hash
}

fn host_part(url: &Url) -> String {
    let host = url.host_str().unwrap_or_default();
    match url.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host.to_string(),
    }
}

fn percent_decode(input: &str) -> Cow<'_, str> {
    urlencoding::decode(input).unwrap_or(Cow::Borrowed(input))
}

fn strip_document_extension(path: &str) -> &str {
    let lower = path.to_ascii_lowercase();
    STRIPPED_EXTENSIONS
        .iter()
        .find(|ext| lower.ends_with(*ext))
        .map(|ext| &path[..path.len() - ext.len()])
        .unwrap_or(path)
}

/// Replaces every character outside `[A-Za-z0-9_.-]` with `_`
fn replace_unsafe(input: &str) -> String {
    input
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '.' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

fn is_degenerate(name: &str, url: &Url) -> bool {
    name.is_empty()
        || name.len() < MIN_FILENAME_LEN
        || PLACEHOLDER_NAMES.contains(&name)
        // "?" with nothing after it reads exactly like no query at all
        || url.query() == Some("")
}
