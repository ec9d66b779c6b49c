//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the crawl loop that drives one session:
//! - Popping URLs from the frontier in FIFO order
//! - Fetching them one at a time, with a politeness delay in between
//! - Persisting successful pages through the page store
//! - Admitting newly discovered in-scope links
//! - Producing the final report

use crate::config::Config;
use crate::crawler::fetcher::{FailureKind, FetchOutcome, Fetcher};
use crate::crawler::parser::extract_links;
use crate::output::CrawlReport;
use crate::state::CrawlSession;
use crate::storage::{FsPageStore, PageRecord, PageStore};
use crate::SeoranError;
use chrono::Utc;
use std::collections::BTreeMap;
use url::Url;

/// Main crawler coordinator structure
///
/// Owns the session and every collaborator; there is exactly one request in
/// flight at any time.
pub struct Coordinator<S: PageStore = FsPageStore> {
    session: CrawlSession,
    fetcher: Fetcher,
    store: S,
    saved: Vec<PageRecord>,
    failures: BTreeMap<FailureKind, usize>,
    store_errors: usize,
}

impl Coordinator<FsPageStore> {
    /// Creates a coordinator writing pages under `config.output.directory`
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Session resolved and HTTP client built
    /// * `Err(SeoranError)` - Invalid seed, invalid limits, or client construction failure
    pub fn new(config: &Config) -> Result<Self, SeoranError> {
        let store = FsPageStore::new(&config.output.directory);
        Self::with_store(config, store)
    }
}

impl<S: PageStore> Coordinator<S> {
    /// Creates a coordinator persisting pages through `store`
    pub fn with_store(config: &Config, store: S) -> Result<Self, SeoranError> {
        let session = CrawlSession::new(&config.crawler)?;
        let fetcher = Fetcher::new(&config.user_agent, &config.fetch)?;

        Ok(Self {
            session,
            fetcher,
            store,
            saved: Vec::new(),
            failures: BTreeMap::new(),
            store_errors: 0,
        })
    }

    pub fn session(&self) -> &CrawlSession {
        &self.session
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Runs the crawl loop until the page cap is reached or the frontier is empty
    ///
    /// Per-URL failures never end the loop; they are logged and counted.
    pub async fn run(&mut self) -> CrawlReport {
        let started_at = Utc::now();

        if !self.session.state().is_completed() {
            self.session.start();
            tracing::info!(
                "Starting crawl at {} (allowed domains: {}, max pages: {})",
                self.session.seed(),
                self.session.scope(),
                self.session.max_pages()
            );

            self.crawl_loop().await;
        }

        let reason = self.session.finish();
        tracing::info!(
            "Crawl finished ({}): {} pages fetched, {} URLs visited, {} still queued",
            reason,
            self.session.pages_fetched(),
            self.session.frontier().visited_len(),
            self.session.frontier().pending_len()
        );

        CrawlReport {
            seed: self.session.seed().clone(),
            scope: self.session.scope().clone(),
            reason,
            pages_fetched: self.session.pages_fetched(),
            visited: self.session.frontier().visited_len(),
            pending: self.session.frontier().pending_len(),
            saved: self.saved.clone(),
            failures: self.failures.clone(),
            store_errors: self.store_errors,
            started_at,
            finished_at: Utc::now(),
        }
    }

    async fn crawl_loop(&mut self) {
        while self.session.should_continue() {
            let Some(url) = self.session.frontier_mut().pop_next() else {
                break;
            };

            if self.session.frontier().is_visited(&url) {
                tracing::debug!("Discarding already visited {}", url);
                continue;
            }
            self.session.frontier_mut().mark_visited(&url);

            if !self.session.scope().in_scope(&url) {
                tracing::debug!("Skipping out-of-scope {}", url);
                continue;
            }

            tracing::info!(
                "({}/{}) Processing: {}",
                self.session.pages_fetched() + 1,
                self.session.max_pages(),
                url
            );

            match self.fetcher.fetch(&url).await {
                FetchOutcome::Success {
                    final_url,
                    body,
                    content_type,
                    encoding,
                } => {
                    tracing::debug!(
                        "Fetched {} ({}, decoded as {})",
                        final_url,
                        content_type,
                        encoding
                    );
                    self.handle_page(&url, &final_url, &body);
                }

                FetchOutcome::Failure { kind, detail } => {
                    tracing::warn!("Failed to fetch {}: {} ({})", url, kind, detail);
                    *self.failures.entry(kind).or_insert(0) += 1;
                }
            }

            let delay = self.session.request_delay();
            if self.session.should_continue() && !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
        }
    }

    /// Counts, stores and mines one successfully fetched page
    fn handle_page(&mut self, url: &Url, final_url: &Url, body: &str) {
        self.session.record_fetch();

        match self.store.save(url, body) {
            Ok(record) => self.saved.push(record),
            Err(e) => {
                tracing::warn!("Failed to save {}: {}", url, e);
                self.store_errors += 1;
            }
        }

        // No point discovering links that can never be fetched.
        if !self.session.has_capacity() {
            return;
        }

        let links = extract_links(body, final_url, self.session.scope());
        let found = links.len();
        let admitted = links
            .into_iter()
            .filter(|link| self.session.admit(link.clone()))
            .count();

        tracing::debug!("Found {} links on {}, {} new", found, url, admitted);
    }
}
