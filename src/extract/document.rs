//! Minimal document capability over a parsed HTML tree
//!
//! Link extraction and text extraction only need these few operations, so any
//! HTML parser providing them can stand behind [`Document`].

use crate::extract::filter::FilterError;
use scraper::{ElementRef, Html, Selector};

/// Read access to a parsed HTML document
pub trait Document {
    /// All elements with the given tag name, in document order
    fn find_all(&self, tag: &str) -> Vec<ElementRef<'_>>;

    /// All elements matching a CSS selector, in document order
    fn select(&self, css: &str) -> Result<Vec<ElementRef<'_>>, FilterError>;

    /// Whitespace-separated text of the whole document
    fn get_text(&self) -> String;
}

/// Write access: removal of matching subtrees
pub trait DocumentMut: Document {
    /// Detaches every element matching `css`, returning how many were removed
    fn remove_matching(&mut self, css: &str) -> Result<usize, FilterError>;
}

/// [`Document`] backed by `scraper`
pub struct HtmlDocument {
    html: Html,
}

impl HtmlDocument {
    /// Parses a full HTML document; parsing never fails
    pub fn parse(html: &str) -> Self {
        Self {
            html: Html::parse_document(html),
        }
    }

    /// The `<body>` element, if the document has one
    pub fn body(&self) -> Option<ElementRef<'_>> {
        self.find_all("body").into_iter().next()
    }
}

impl Document for HtmlDocument {
    fn find_all(&self, tag: &str) -> Vec<ElementRef<'_>> {
        self.html
            .root_element()
            .descendants()
            .filter_map(ElementRef::wrap)
            .filter(|el| el.value().name().eq_ignore_ascii_case(tag))
            .collect()
    }

    fn select(&self, css: &str) -> Result<Vec<ElementRef<'_>>, FilterError> {
        let selector = parse_selector(css)?;
        Ok(self.html.select(&selector).collect())
    }

    fn get_text(&self) -> String {
        element_text(self.html.root_element())
    }
}

impl DocumentMut for HtmlDocument {
    fn remove_matching(&mut self, css: &str) -> Result<usize, FilterError> {
        let ids: Vec<_> = self.select(css)?.into_iter().map(|el| el.id()).collect();

        let mut removed = 0;
        for id in ids {
            if let Some(mut node) = self.html.tree.get_mut(id) {
                node.detach();
                removed += 1;
            }
        }

        Ok(removed)
    }
}

/// Compiles a CSS selector, mapping parse failures to [`FilterError`]
pub fn parse_selector(css: &str) -> Result<Selector, FilterError> {
    Selector::parse(css).map_err(|e| FilterError::InvalidSelector {
        selector: css.to_string(),
        message: e.to_string(),
    })
}

/// Text under an element: trimmed text nodes joined with single spaces
pub fn element_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
