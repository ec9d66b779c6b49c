//! Boilerplate removal before text extraction
//!
//! A failing selector only skips that selector; the rest of the pipeline
//! still runs.

use crate::extract::document::DocumentMut;
use thiserror::Error;

/// Tags whose whole subtree never carries article text
pub const UNWANTED_TAGS: &[&str] = &[
    "script", "style", "header", "footer", "nav", "aside", "form", "button", "select", "textarea",
    "iframe", "link", "meta", "noscript", "embed", "object",
];

/// Site furniture: ads, comment sections, menus, sharing widgets
pub const UNWANTED_SELECTORS: &[&str] = &[
    ".ads",
    ".advertisement",
    ".ad",
    ".banner",
    ".popup",
    ".cookie-banner",
    ".cookie-notice",
    "#sidebar",
    "#comments",
    ".comments-area",
    ".comment-list",
    ".reply",
    ".related-posts",
    ".related_posts",
    ".share-buttons",
    ".social-sharing",
    ".site-footer",
    ".site-header",
    ".main-navigation",
    ".menu",
    ".social-links",
    ".breadcrumbs",
    ".pagination",
    ".widget",
    ".author-bio",
    ".post-meta-data",
    "[class*=\"promo\"]",
    "[id*=\"promo\"]",
    "[class*=\"advert\"]",
    "[id*=\"advert\"]",
    "[aria-hidden=\"true\"]",
];

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FilterError {
    #[error("Invalid selector '{selector}': {message}")]
    InvalidSelector { selector: String, message: String },
}

/// Removes every element matching `selector` from `doc`
pub fn apply_filter<D: DocumentMut>(doc: &mut D, selector: &str) -> Result<usize, FilterError> {
    doc.remove_matching(selector)
}

/// Ordered list of removal selectors
#[derive(Debug, Clone)]
pub struct FilterPipeline {
    selectors: Vec<String>,
}

/// What a pipeline run did
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FilterSummary {
    pub removed: usize,
    pub failed: Vec<FilterError>,
}

impl FilterPipeline {
    pub fn new<I, S>(selectors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            selectors: selectors.into_iter().map(Into::into).collect(),
        }
    }

    /// Unwanted tags first, then unwanted selectors
    pub fn boilerplate() -> Self {
        Self::new(UNWANTED_TAGS.iter().chain(UNWANTED_SELECTORS).copied())
    }

    pub fn selectors(&self) -> &[String] {
        &self.selectors
    }

    /// Applies each selector in order
    pub fn run<D: DocumentMut>(&self, doc: &mut D) -> FilterSummary {
        let mut summary = FilterSummary::default();

        for selector in &self.selectors {
            match apply_filter(doc, selector) {
                Ok(n) => summary.removed += n,
                Err(e) => {
                    tracing::debug!("Skipping filter: {}", e);
                    summary.failed.push(e);
                }
            }
        }

        summary
    }
}

impl Default for FilterPipeline {
    fn default() -> Self {
        Self::boilerplate()
    }
}
