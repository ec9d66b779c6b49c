//! Statistics for a text-extraction pass over the page store

use std::path::PathBuf;

/// Per-run extraction counters
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractionStats {
    /// HTML files discovered under the input directory
    pub total_files: usize,

    /// Files whose text was extracted and saved
    pub processed: usize,

    /// Files that could not be read
    pub failed_to_read: usize,

    /// Files whose extracted text was empty or below the minimum length
    pub too_short: usize,

    /// Files whose text could not be written
    pub failed_to_save: usize,

    /// Every rejected or failed file with the reason
    pub failures: Vec<(PathBuf, String)>,
}

impl ExtractionStats {
    pub fn record_failure(&mut self, path: PathBuf, reason: impl Into<String>) {
        self.failures.push((path, reason.into()));
    }

    /// Files that produced no output, for any reason
    pub fn skipped(&self) -> usize {
        self.failed_to_read + self.too_short + self.failed_to_save
    }
}

/// Prints extraction statistics to stdout in a formatted manner
pub fn print_extraction_stats(stats: &ExtractionStats) {
    println!("=== Text Extraction ===\n");

    println!("  HTML files found: {}", stats.total_files);
    println!("  Extracted and saved: {}", stats.processed);
    println!("  Failed to read: {}", stats.failed_to_read);
    println!("  Empty or too short: {}", stats.too_short);
    println!("  Failed to save: {}", stats.failed_to_save);

    if !stats.failures.is_empty() {
        println!();
        println!("Skipped Files ({}):", stats.failures.len());
        for (path, reason) in &stats.failures {
            println!("  - {} ({})", path.display(), reason);
        }
    }
    println!();
}
