pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::EngineConfig;

pub use adapters::{LiveSource, LocalCache, SeedSource};
pub use core::{
    business_days::BusinessDayCalculator,
    deemed_service::{DeemedServiceCalculator, ServiceRules},
    engine::{DeadlineEngine, DeadlineRequest},
    provider::HolidayCalendarProvider,
};
pub use domain::model::{
    DeadlineReport, DeemedServiceResult, HolidaySet, Jurisdiction, Resolution,
    ServiceDeadlineReport, SourceTier, Transmission,
};
pub use utils::error::{DeadlineError, Result};
