use crate::domain::model::SourceTier;
use crate::domain::ports::{RawSnapshot, SnapshotSource};
use crate::utils::error::{DeadlineError, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

pub const CACHE_DIR_NAME: &str = ".legal_toolkit";
pub const CACHE_FILE_NAME: &str = "bank_holidays_cache.json";

/// Single-file cache of the last bank holiday document fetched from the feed.
#[derive(Debug, Clone)]
pub struct LocalCache {
    path: PathBuf,
}

impl LocalCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `$HOME/.legal_toolkit/bank_holidays_cache.json`, or the working directory without a home.
    pub fn default_path() -> PathBuf {
        let home = std::env::var_os("HOME")
            .or_else(|| std::env::var_os("USERPROFILE"))
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."));
        home.join(CACHE_DIR_NAME).join(CACHE_FILE_NAME)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn read(&self) -> Result<String> {
        Ok(fs::read_to_string(&self.path)?)
    }

    /// Replaces the cache atomically: readers see the old file or the new one, never a partial write.
    pub fn store(&self, body: &str) -> Result<()> {
        let parent = match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&parent)?;

        let mut staged = NamedTempFile::new_in(&parent)?;
        staged.write_all(body.as_bytes())?;
        staged.as_file().sync_all()?;
        staged
            .persist(&self.path)
            .map_err(|e| DeadlineError::IoError(e.error))?;

        tracing::debug!("Holiday cache written to {}", self.path.display());
        Ok(())
    }

    pub fn modified_at(&self) -> Option<DateTime<Utc>> {
        fs::metadata(&self.path)
            .and_then(|meta| meta.modified())
            .ok()
            .map(DateTime::<Utc>::from)
    }
}

impl Default for LocalCache {
    fn default() -> Self {
        Self::new(Self::default_path())
    }
}

#[async_trait]
impl SnapshotSource for LocalCache {
    fn tier(&self) -> SourceTier {
        SourceTier::Cache
    }

    async fn fetch(&self) -> Result<RawSnapshot> {
        let body = self.read().map_err(|e| DeadlineError::CacheCorruption {
            message: format!("{}: {}", self.path.display(), e),
        })?;

        Ok(RawSnapshot {
            body,
            as_of: self.modified_at(),
        })
    }
}
