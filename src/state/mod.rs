//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `Frontier`: pending and visited URL sets with deduplicated admission
//! - `CrawlSession`: scope, frontier, counters and lifecycle of one crawl

mod frontier;
mod session;

pub use frontier::Frontier;
pub use session::{CompletionReason, CrawlSession, SessionState};
