use crate::domain::model::{HolidaySet, SourceTier};
use crate::utils::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use std::path::PathBuf;
use std::time::Duration;

/// Read-only membership test handed to the calculators.
pub trait HolidayLookup {
    fn is_holiday(&self, date: NaiveDate) -> bool;
}

impl HolidayLookup for HolidaySet {
    fn is_holiday(&self, date: NaiveDate) -> bool {
        self.contains(date)
    }
}

impl<T: HolidayLookup + ?Sized> HolidayLookup for &T {
    fn is_holiday(&self, date: NaiveDate) -> bool {
        (**self).is_holiday(date)
    }
}

/// Raw bank holiday document as returned by one tier.
#[derive(Debug, Clone)]
pub struct RawSnapshot {
    pub body: String,
    pub as_of: Option<DateTime<Utc>>,
}

/// One step of the holiday fallback chain.
#[async_trait]
pub trait SnapshotSource: Send + Sync {
    fn tier(&self) -> SourceTier;
    async fn fetch(&self) -> Result<RawSnapshot>;
}

pub trait SourceSettings: Send + Sync {
    fn endpoint(&self) -> &str;
    fn timeout(&self) -> Duration;
    fn live_enabled(&self) -> bool;
    fn cache_path(&self) -> PathBuf;
    fn seed_path(&self) -> Option<PathBuf>;
}
