//! Storage traits and error types
//!
//! This module defines the trait interface for page stores and the
//! associated error and record types.

use std::path::PathBuf;
use thiserror::Error;
use url::Url;

/// Errors that can occur while persisting a page
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Failed to create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("No unique filename available for {0}")]
    NameExhausted(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// A page written by the store
///
/// The raw HTML lives in the file at `path`; the record is never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRecord {
    /// Source URL of the page
    pub url: Url,

    /// Destination file
    pub path: PathBuf,

    /// Number of bytes written
    pub bytes: usize,
}

/// Trait for page store implementations
///
/// A store persists the decoded HTML of each successfully fetched page so
/// that the text-processing collaborator can find it later.
pub trait PageStore {
    /// Persists one page
    ///
    /// # Arguments
    ///
    /// * `url` - The normalized URL the page was fetched from
    /// * `html` - The decoded HTML text
    ///
    /// # Returns
    ///
    /// The record of what was written and where
    fn save(&mut self, url: &Url, html: &str) -> StorageResult<PageRecord>;
}
