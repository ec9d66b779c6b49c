//! Crawler module for web page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching and response classification
//! - Character encoding detection
//! - HTML link extraction and filtering
//! - Overall crawl coordination

mod coordinator;
mod encoding;
mod fetcher;
mod parser;

pub use coordinator::Coordinator;
pub use encoding::{charset_from_content_type, decode_body, is_unreliable, sniff_encoding};
pub use fetcher::{build_http_client, fetch_url, FailureKind, FetchOutcome, Fetcher, MAX_REDIRECTS};
pub use parser::{extract_links, extract_links_from, SKIPPED_EXTENSIONS};

use crate::config::Config;
use crate::output::CrawlReport;
use crate::SeoranError;

/// Runs a complete crawl session
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Resolve the domain scope from the seed and allowed domains
/// 2. Build the HTTP client
/// 3. Fetch pages one at a time, saving each under the output directory
/// 4. Extract and follow in-scope links
/// 5. Return the final report
///
/// # Returns
///
/// * `Ok(CrawlReport)` - The session ran to completion
/// * `Err(SeoranError)` - The session could not start (invalid seed or limits)
pub async fn crawl(config: &Config) -> Result<CrawlReport, SeoranError> {
    let mut coordinator = Coordinator::new(config)?;
    Ok(coordinator.run().await)
}
