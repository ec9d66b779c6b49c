//! Character encoding resolution for fetched pages
//!
//! The charset declared by the server is trusted unless it is missing or one
//! of the labels servers commonly send by default regardless of the actual
//! bytes. In that case the encoding is sniffed from the body: byte order mark,
//! then `<meta>` declarations, then statistical detection.

use chardetng::EncodingDetector;
use encoding_rs::{Encoding, WINDOWS_1252, WINDOWS_1256};

/// Bytes of the body searched for a `<meta>` charset declaration
const PRESCAN_LEN: usize = 1024;

/// Extracts the `charset` parameter of a Content-Type header value
///
/// # Examples
///
/// ```
/// use seoran::crawler::charset_from_content_type;
///
/// let enc = charset_from_content_type("text/html; charset=\"UTF-8\"").unwrap();
/// assert_eq!(enc.name(), "UTF-8");
/// assert!(charset_from_content_type("text/html").is_none());
/// ```
pub fn charset_from_content_type(content_type: &str) -> Option<&'static Encoding> {
    content_type.split(';').skip(1).find_map(|param| {
        let (key, value) = param.split_once('=')?;
        if !key.trim().eq_ignore_ascii_case("charset") {
            return None;
        }
        let label = value.trim().trim_matches(|c| c == '"' || c == '\'');
        Encoding::for_label(label.as_bytes())
    })
}

/// Returns true when a declared encoding should not be trusted
///
/// `iso-8859-1`, `latin1` and `us-ascii` all resolve to windows-1252, the
/// usual server default. windows-1256 is frequently declared for pages that
/// are really UTF-8 Persian.
pub fn is_unreliable(declared: Option<&'static Encoding>) -> bool {
    match declared {
        None => true,
        Some(enc) => enc == WINDOWS_1252 || enc == WINDOWS_1256,
    }
}

/// Determines the encoding of an HTML body from its bytes alone
pub fn sniff_encoding(bytes: &[u8]) -> &'static Encoding {
    if let Some((enc, _)) = Encoding::for_bom(bytes) {
        return enc;
    }

    let head = &bytes[..bytes.len().min(PRESCAN_LEN)];
    if let Some(enc) = prescan_meta_charset(head) {
        return enc;
    }

    let mut detector = EncodingDetector::new();
    detector.feed(bytes, true);
    detector.guess(None, true)
}

/// Decodes an HTML body, replacing undecodable sequences
///
/// # Returns
///
/// The decoded text and the encoding actually used
pub fn decode_body(bytes: &[u8], declared: Option<&'static Encoding>) -> (String, &'static Encoding) {
    let encoding = match declared {
        Some(enc) if !is_unreliable(declared) => enc,
        _ => {
            let sniffed = sniff_encoding(bytes);
            tracing::trace!(
                "Declared encoding {:?} not trusted, sniffed {}",
                declared.map(Encoding::name),
                sniffed.name()
            );
            sniffed
        }
    };

    let (text, used, had_errors) = encoding.decode(bytes);
    if had_errors {
        tracing::debug!("Replaced undecodable bytes while decoding as {}", used.name());
    }

    (text.into_owned(), used)
}

/// Finds `<meta charset=...>` or `<meta http-equiv ... content="...charset=...">`
fn prescan_meta_charset(head: &[u8]) -> Option<&'static Encoding> {
    let text = String::from_utf8_lossy(head).to_ascii_lowercase();
    let mut rest = text.as_str();

    while let Some(start) = rest.find("<meta") {
        let tag_region = &rest[start..];
        let end = tag_region.find('>').unwrap_or(tag_region.len());
        if let Some(enc) = charset_in_tag(&tag_region[..end]) {
            return Some(enc);
        }
        rest = &tag_region[end..];
    }

    None
}

fn charset_in_tag(tag: &str) -> Option<&'static Encoding> {
    let idx = tag.find("charset")?;
    let after = tag[idx + "charset".len()..].trim_start();
    let after = after.strip_prefix('=')?.trim_start();
    let after = after.trim_start_matches(|c| c == '"' || c == '\'');

    let label = after
        .split(|c: char| c == '"' || c == '\'' || c == ';' || c == '/' || c.is_whitespace())
        .next()
        .filter(|l| !l.is_empty())?;

    Encoding::for_label(label.as_bytes())
}
