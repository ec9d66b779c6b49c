//! URL handling module for Seoran
//!
//! This module provides URL normalization, hostname extraction and the
//! per-session domain scope.

mod normalize;
mod scope;

pub use normalize::{normalize_parsed, normalize_url};
pub use scope::{extract_domain, resolve_scope, DomainScope};
