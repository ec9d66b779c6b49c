//! Crawl session: everything one crawl owns, created at start, dropped at end
//!
//! Nothing here outlives the session; a new crawl starts from an empty
//! frontier and a freshly resolved scope.

use crate::config::CrawlerConfig;
use crate::state::frontier::Frontier;
use crate::url::{resolve_scope, DomainScope};
use crate::{ConfigError, SeoranError};
use std::fmt;
use std::time::Duration;
use url::Url;

/// Why a session stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompletionReason {
    /// The configured number of pages was fetched
    PageCapReached,

    /// No pending URLs remained
    FrontierExhausted,
}

impl fmt::Display for CompletionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PageCapReached => write!(f, "page cap reached"),
            Self::FrontierExhausted => write!(f, "frontier exhausted"),
        }
    }
}

/// Lifecycle of a session: `Idle -> Running -> Completed(reason)`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Running,
    Completed(CompletionReason),
}

impl SessionState {
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed(_))
    }
}

/// State of one crawl
#[derive(Debug)]
pub struct CrawlSession {
    seed: Url,
    scope: DomainScope,
    frontier: Frontier,
    pages_fetched: u32,
    max_pages: u32,
    request_delay: Duration,
    state: SessionState,
}

impl CrawlSession {
    /// Resolves the scope and seeds the frontier
    ///
    /// # Errors
    ///
    /// * `SeoranError::InvalidSeed` - the seed is not an absolute http/https URL with a host
    /// * `SeoranError::Config` - `max_pages` is zero or the delay is negative, not finite, or too large
    pub fn new(config: &CrawlerConfig) -> Result<Self, SeoranError> {
        if config.max_pages == 0 {
            return Err(ConfigError::Validation("max-pages must be at least 1".to_string()).into());
        }
        let request_delay = Duration::try_from_secs_f64(config.request_delay_seconds).map_err(|_| {
            ConfigError::Validation(format!(
                "request-delay-seconds must be a non-negative number of seconds, got {}",
                config.request_delay_seconds
            ))
        })?;

        let (seed, scope) = resolve_scope(&config.seed_url, &config.allowed_domains)?;
        if !scope.in_scope(&seed) {
            tracing::warn!("Seed {} is outside the allowed domains {}", seed, scope);
        }

        // The seed is admitted as given; the dispatch-time scope check decides
        // whether it is fetched.
        let mut frontier = Frontier::new();
        frontier.admit(seed.clone());

        Ok(Self {
            seed,
            scope,
            frontier,
            pages_fetched: 0,
            max_pages: config.max_pages,
            request_delay,
            state: SessionState::Idle,
        })
    }

    pub fn seed(&self) -> &Url {
        &self.seed
    }

    pub fn scope(&self) -> &DomainScope {
        &self.scope
    }

    pub fn frontier(&self) -> &Frontier {
        &self.frontier
    }

    pub fn frontier_mut(&mut self) -> &mut Frontier {
        &mut self.frontier
    }

    pub fn pages_fetched(&self) -> u32 {
        self.pages_fetched
    }

    pub fn max_pages(&self) -> u32 {
        self.max_pages
    }

    pub fn request_delay(&self) -> Duration {
        self.request_delay
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Admits a discovered link if it is in scope and not yet seen
    pub fn admit(&mut self, url: Url) -> bool {
        if !self.scope.in_scope(&url) {
            tracing::trace!("Not admitting out-of-scope {}", url);
            return false;
        }
        self.frontier.admit(url)
    }

    pub fn start(&mut self) {
        if self.state == SessionState::Idle {
            self.state = SessionState::Running;
        }
    }

    /// Counts one successful fetch
    pub fn record_fetch(&mut self) {
        self.pages_fetched += 1;
    }

    /// True while fewer than `max_pages` pages have been fetched
    pub fn has_capacity(&self) -> bool {
        self.pages_fetched < self.max_pages
    }

    /// Loop condition: pending work and remaining capacity
    pub fn should_continue(&self) -> bool {
        !self.frontier.is_empty() && self.has_capacity()
    }

    /// Moves to `Completed` and returns the reason
    pub fn finish(&mut self) -> CompletionReason {
        if let SessionState::Completed(reason) = self.state {
            return reason;
        }

        let reason = if self.has_capacity() {
            CompletionReason::FrontierExhausted
        } else {
            CompletionReason::PageCapReached
        };
        self.state = SessionState::Completed(reason);
        reason
    }
}
