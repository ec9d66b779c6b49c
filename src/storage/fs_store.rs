//! Filesystem page store
//!
//! Layout: `<root>/<host_with_underscores>/<sanitized-filename>.html`.

use crate::storage::sanitize::{fallback_filename, host_directory_name, sanitize_filename};
use crate::storage::traits::{PageRecord, PageStore, StorageError, StorageResult};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use url::Url;

/// Attempts at a numbered name before giving up
const MAX_NUMBERED_NAMES: u32 = 1000;

/// Page store writing one file per page under a root directory
pub struct FsPageStore {
    root: PathBuf,

    /// Paths handed out during this session and the URL that owns each
    issued: HashMap<PathBuf, Url>,
}

impl FsPageStore {
    /// Creates a store rooted at `root`; nothing is created until the first save
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            issued: HashMap::new(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Number of distinct files written this session
    pub fn files_written(&self) -> usize {
        self.issued.len()
    }

    /// Picks a path for `url` that no other URL has used this session
    ///
    /// Readable name first, then the hashed name, then numbered variants of
    /// the hashed name.
    fn claim_path(&mut self, dir: &Path, url: &Url) -> StorageResult<PathBuf> {
        let primary = dir.join(sanitize_filename(url));
        if self.is_available(&primary, url) {
            return Ok(self.issue(primary, url));
        }

        let hashed_name = fallback_filename(url);
        let hashed = dir.join(&hashed_name);
        if self.is_available(&hashed, url) {
            tracing::debug!(
                "Filename {} already used this session, using {} for {}",
                primary.display(),
                hashed_name,
                url
            );
            return Ok(self.issue(hashed, url));
        }

        let stem = hashed_name.trim_end_matches(".html");
        for n in 1..=MAX_NUMBERED_NAMES {
            let candidate = dir.join(format!("{}_{}.html", stem, n));
            if self.is_available(&candidate, url) {
                return Ok(self.issue(candidate, url));
            }
        }

        Err(StorageError::NameExhausted(url.to_string()))
    }

    fn is_available(&self, path: &Path, url: &Url) -> bool {
        self.issued.get(path).map_or(true, |owner| owner == url)
    }

    fn issue(&mut self, path: PathBuf, url: &Url) -> PathBuf {
        self.issued.insert(path.clone(), url.clone());
        path
    }
}

impl PageStore for FsPageStore {
    fn save(&mut self, url: &Url, html: &str) -> StorageResult<PageRecord> {
        let dir = self.root.join(host_directory_name(url));
        std::fs::create_dir_all(&dir).map_err(|source| StorageError::CreateDir {
            path: dir.clone(),
            source,
        })?;

        let path = self.claim_path(&dir, url)?;
        std::fs::write(&path, html.as_bytes()).map_err(|source| StorageError::Write {
            path: path.clone(),
            source,
        })?;

        tracing::info!("Saved {} to {}", url, path.display());

        Ok(PageRecord {
            url: url.clone(),
            path,
            bytes: html.len(),
        })
    }
}
