pub mod business_days;
pub mod deemed_service;
pub mod engine;
pub mod provider;

pub use crate::domain::model::{
    CalendarSnapshot, DeadlineReport, DeemedServiceResult, HolidaySet, Jurisdiction, Resolution,
    ServiceDeadlineReport, SourceTier, Transmission,
};
pub use crate::domain::ports::{HolidayLookup, RawSnapshot, SnapshotSource, SourceSettings};
pub use crate::utils::error::Result;
