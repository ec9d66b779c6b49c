//! Plain-text extraction from saved pages
//!
//! This is the hand-off point to linguistic processing: it walks the page
//! store, strips boilerplate from each HTML file and writes the remaining
//! article text next to a mirror of the host directory layout. Tokenization
//! and normalization happen elsewhere.

mod document;
mod filter;

pub use document::{element_text, parse_selector, Document, DocumentMut, HtmlDocument};
pub use filter::{
    apply_filter, FilterError, FilterPipeline, FilterSummary, UNWANTED_SELECTORS, UNWANTED_TAGS,
};

use crate::output::ExtractionStats;
use crate::SeoranError;
use scraper::ElementRef;
use std::path::{Path, PathBuf};

/// Shortest extracted text worth keeping, in characters
pub const MIN_TEXT_LENGTH: usize = 100;

/// Candidates for the main content element, in order of preference
pub const MAIN_CONTENT_SELECTORS: &[&str] = &[
    "article",
    "main",
    ".post-content",
    ".entry-content",
    "#content",
    "#main-content",
];

const URL_PREFIXES: &[&str] = &["http://", "https://", "www."];

/// Extracts the readable text of an HTML page
///
/// Boilerplate is removed first, then the text of the first main-content
/// candidate inside `<body>` is taken (or all of `<body>` if none match).
/// URL-like tokens are dropped and whitespace is collapsed.
///
/// # Example
///
/// ```
/// use seoran::extract::extract_text;
///
/// let html = "<body><nav>منو</nav><article><p>سلام</p> <p>دنیا</p></article></body>";
/// assert_eq!(extract_text(html), "سلام دنیا");
/// ```
pub fn extract_text(html: &str) -> String {
    if html.trim().is_empty() {
        return String::new();
    }

    let mut doc = HtmlDocument::parse(html);
    FilterPipeline::boilerplate().run(&mut doc);

    let raw = match doc.body() {
        Some(body) => element_text(main_content(body).unwrap_or(body)),
        None => doc.get_text(),
    };

    clean_text(&raw)
}

fn main_content(body: ElementRef<'_>) -> Option<ElementRef<'_>> {
    MAIN_CONTENT_SELECTORS.iter().find_map(|css| {
        let selector = parse_selector(css).ok()?;
        body.select(&selector).next()
    })
}

/// Drops URL-like tokens and collapses whitespace
fn clean_text(text: &str) -> String {
    text.split_whitespace()
        .filter_map(|token| {
            let cut = URL_PREFIXES
                .iter()
                .filter_map(|prefix| token.find(prefix))
                .min()
                .unwrap_or(token.len());
            let kept = &token[..cut];
            (!kept.is_empty()).then_some(kept)
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Recursively lists `*.html` and `*.htm` files under `root`, sorted
pub fn discover_html_files(root: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    let mut dirs = vec![root.to_path_buf()];

    while let Some(dir) = dirs.pop() {
        for entry in std::fs::read_dir(&dir)? {
            let path = entry?.path();
            if path.is_dir() {
                dirs.push(path);
            } else if is_html_file(&path) {
                files.push(path);
            }
        }
    }

    files.sort();
    Ok(files)
}

fn is_html_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("html") || e.eq_ignore_ascii_case("htm"))
        .unwrap_or(false)
}

/// Extracts text from every page under `input` into `output`
///
/// `input/<host>/<name>.html` becomes `output/<host>/<name>.txt`. Per-file
/// problems are counted in the returned stats; only failing to create the
/// output root or to list the input is an error.
pub fn extract_directory(
    input: &Path,
    output: &Path,
    min_len: usize,
) -> Result<ExtractionStats, SeoranError> {
    std::fs::create_dir_all(output)?;
    let files = discover_html_files(input)?;

    let mut stats = ExtractionStats {
        total_files: files.len(),
        ..Default::default()
    };

    if files.is_empty() {
        tracing::warn!("No HTML files found under {}", input.display());
        return Ok(stats);
    }

    for (i, path) in files.iter().enumerate() {
        tracing::info!("({}/{}) Extracting: {}", i + 1, files.len(), path.display());
        extract_file(path, input, output, min_len, &mut stats);
    }

    Ok(stats)
}

fn extract_file(
    path: &Path,
    input: &Path,
    output: &Path,
    min_len: usize,
    stats: &mut ExtractionStats,
) {
    let html = match std::fs::read(path) {
        Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
        Err(e) => {
            stats.failed_to_read += 1;
            stats.record_failure(path.to_path_buf(), format!("Read error: {}", e));
            return;
        }
    };

    let text = extract_text(&html);
    if text.chars().count() < min_len {
        stats.too_short += 1;
        stats.record_failure(path.to_path_buf(), "Extracted text too short or empty");
        return;
    }

    let relative_dir = path
        .parent()
        .and_then(|p| p.strip_prefix(input).ok())
        .unwrap_or_else(|| Path::new(""));
    let target_dir = output.join(relative_dir);

    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "page".to_string());
    let target = target_dir.join(format!("{}.txt", stem));

    let written = std::fs::create_dir_all(&target_dir).and_then(|_| std::fs::write(&target, text));
    match written {
        Ok(()) => {
            stats.processed += 1;
            tracing::debug!("Wrote {}", target.display());
        }
        Err(e) => {
            stats.failed_to_save += 1;
            tracing::warn!("Failed to save {}: {}", target.display(), e);
            stats.record_failure(path.to_path_buf(), format!("Save error: {}", e));
        }
    }
}
