//! End-of-crawl report

use crate::crawler::FailureKind;
use crate::state::CompletionReason;
use crate::storage::PageRecord;
use crate::url::DomainScope;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use url::Url;

/// Outcome of one crawl session
#[derive(Debug, Clone)]
pub struct CrawlReport {
    /// Normalized seed URL
    pub seed: Url,

    /// Hostnames the session was allowed to fetch from
    pub scope: DomainScope,

    pub reason: CompletionReason,

    /// Successful fetches
    pub pages_fetched: u32,

    /// URLs whose fetch was attempted
    pub visited: usize,

    /// URLs admitted but never popped
    pub pending: usize,

    /// Pages written by the store
    pub saved: Vec<PageRecord>,

    /// Failed fetch attempts by kind
    pub failures: BTreeMap<FailureKind, usize>,

    /// Successful fetches whose page could not be written
    pub store_errors: usize,

    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl CrawlReport {
    pub fn total_failures(&self) -> usize {
        self.failures.values().sum()
    }

    pub fn duration_seconds(&self) -> i64 {
        (self.finished_at - self.started_at).num_seconds()
    }
}

/// Formats a crawl report as plain text
pub fn format_report(report: &CrawlReport) -> String {
    let mut out = String::new();

    out.push_str("=== Crawl Report ===\n\n");
    out.push_str(&format!("  Seed: {}\n", report.seed));
    out.push_str(&format!("  Allowed domains: {}\n", report.scope));
    out.push_str(&format!("  Stopped: {}\n", report.reason));
    out.push_str(&format!(
        "  Started: {}\n",
        report.started_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    out.push_str(&format!(
        "  Duration: {} seconds\n\n",
        report.duration_seconds()
    ));

    out.push_str(&format!("  Pages fetched: {}\n", report.pages_fetched));
    out.push_str(&format!("  Unique URLs visited: {}\n", report.visited));
    out.push_str(&format!("  URLs remaining in queue: {}\n", report.pending));
    out.push_str(&format!("  Files saved: {}\n", report.saved.len()));
    if report.store_errors > 0 {
        out.push_str(&format!(
            "  Files that could not be saved: {}\n",
            report.store_errors
        ));
    }

    if !report.failures.is_empty() {
        out.push_str(&format!(
            "\nFailed Fetches ({}):\n",
            report.total_failures()
        ));
        for (kind, count) in &report.failures {
            out.push_str(&format!("  {}: {}\n", kind, count));
        }
    }

    out
}

/// Prints a crawl report to stdout
pub fn print_report(report: &CrawlReport) {
    println!("{}", format_report(report));
}
