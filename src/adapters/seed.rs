use crate::domain::model::SourceTier;
use crate::domain::ports::{RawSnapshot, SnapshotSource};
use crate::utils::error::{DeadlineError, Result};
use async_trait::async_trait;
use std::path::PathBuf;

/// UK bank holidays 2023-2027, shipped inside the binary.
pub const BUNDLED_SEED: &str = include_str!("../../data/bank_holidays.json");

/// Read-only point-in-time snapshot used when neither the feed nor the cache can be read.
#[derive(Debug, Clone)]
pub enum SeedSource {
    Embedded(&'static str),
    File(PathBuf),
}

impl SeedSource {
    pub fn bundled() -> Self {
        SeedSource::Embedded(BUNDLED_SEED)
    }

    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        SeedSource::File(path.into())
    }
}

impl Default for SeedSource {
    fn default() -> Self {
        Self::bundled()
    }
}

#[async_trait]
impl SnapshotSource for SeedSource {
    fn tier(&self) -> SourceTier {
        SourceTier::Seed
    }

    async fn fetch(&self) -> Result<RawSnapshot> {
        let body = match self {
            SeedSource::Embedded(body) => body.to_string(),
            SeedSource::File(path) => std::fs::read_to_string(path).map_err(|e| {
                DeadlineError::SeedUnavailable {
                    message: format!("{}: {}", path.display(), e),
                }
            })?,
        };

        Ok(RawSnapshot { body, as_of: None })
    }
}
