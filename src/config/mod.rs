//! Configuration module for Seoran
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use seoran::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("seoran.toml")).unwrap();
//! println!("Crawler will fetch at most {} pages", config.crawler.max_pages);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CrawlerConfig, FetchConfig, OutputConfig, UserAgentConfig};

// Re-export parser functions
pub use parser::{
    compute_config_hash, load_config, load_config_with_hash, load_validated_config, parse_config,
};
pub use validation::validate;
