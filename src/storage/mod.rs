//! Storage module for persisting fetched pages
//!
//! This module provides:
//! - The `PageStore` trait implemented by page stores
//! - A filesystem implementation writing one directory per host
//! - The URL-to-filename sanitizer used for every saved page

mod fs_store;
mod sanitize;
mod traits;

pub use fs_store::FsPageStore;
pub use sanitize::{
    fallback_filename, host_directory_name, sanitize_filename, short_hash, DOCUMENT_EXTENSION,
    MAX_FILENAME_LEN, MIN_FILENAME_LEN,
};
pub use traits::{PageRecord, PageStore, StorageError, StorageResult};
