//! Output module for crawl and extraction summaries
//!
//! This module handles:
//! - The end-of-crawl report returned by the coordinator
//! - Statistics of a text-extraction pass over the page store

mod report;
pub mod stats;

pub use report::{format_report, print_report, CrawlReport};
pub use stats::{print_extraction_stats, ExtractionStats};
