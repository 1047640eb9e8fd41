use crate::domain::model::SourceTier;
use chrono::NaiveDate;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DeadlineError {
    #[error("Holiday API request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Live holiday source failed: {message}")]
    DataSourceFailure { message: String },

    #[error("Holiday cache is unusable: {message}")]
    CacheCorruption { message: String },

    #[error("Bundled holiday seed is unavailable: {message}")]
    SeedUnavailable { message: String },

    #[error("Jurisdiction '{jurisdiction}' not present in {tier} holiday data")]
    JurisdictionMissing {
        jurisdiction: String,
        tier: SourceTier,
    },

    #[error("Invalid extension of {days} days: must be between {min} and {max}")]
    InvalidExtension { days: i64, min: u32, max: u32 },

    #[error("Invalid transmission '{value}': {reason}")]
    InvalidTransmission { value: String, reason: String },

    #[error("No business day found within {days} days after {date}")]
    LookaheadExhausted { date: NaiveDate, days: u32 },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Configuration validation failed for {field}: {message}")]
    ConfigValidationError { field: String, message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    DataSource,
    Input,
    Calendar,
    Configuration,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl DeadlineError {
    /// Wraps a failure raised while reading from `tier` into that tier's error kind.
    pub fn for_tier(tier: SourceTier, cause: DeadlineError) -> Self {
        // 缺少管轄區或已屬於該層級的錯誤保留原樣
        let already_tagged = match (&cause, tier) {
            (DeadlineError::JurisdictionMissing { .. }, _) => true,
            (DeadlineError::DataSourceFailure { .. }, SourceTier::Live) => true,
            (DeadlineError::CacheCorruption { .. }, SourceTier::Cache) => true,
            (DeadlineError::SeedUnavailable { .. }, SourceTier::Seed | SourceTier::Empty) => true,
            _ => false,
        };
        if already_tagged {
            return cause;
        }

        let message = cause.to_string();
        match tier {
            SourceTier::Live => DeadlineError::DataSourceFailure { message },
            SourceTier::Cache => DeadlineError::CacheCorruption { message },
            SourceTier::Seed | SourceTier::Empty => DeadlineError::SeedUnavailable { message },
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            DeadlineError::HttpError(_)
            | DeadlineError::DataSourceFailure { .. }
            | DeadlineError::CacheCorruption { .. }
            | DeadlineError::SeedUnavailable { .. }
            | DeadlineError::JurisdictionMissing { .. } => ErrorCategory::DataSource,
            DeadlineError::InvalidExtension { .. } | DeadlineError::InvalidTransmission { .. } => {
                ErrorCategory::Input
            }
            DeadlineError::LookaheadExhausted { .. } => ErrorCategory::Calendar,
            DeadlineError::ConfigError { .. }
            | DeadlineError::InvalidConfigValueError { .. }
            | DeadlineError::MissingConfigError { .. }
            | DeadlineError::ConfigValidationError { .. } => ErrorCategory::Configuration,
            DeadlineError::IoError(_) | DeadlineError::SerializationError(_) => {
                ErrorCategory::System
            }
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::DataSource => ErrorSeverity::Low,
            ErrorCategory::Input | ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Calendar => ErrorSeverity::Critical,
            ErrorCategory::System => ErrorSeverity::Medium,
        }
    }

    /// Whether the provider recovers from this error by moving to the next tier.
    pub fn is_recoverable(&self) -> bool {
        self.category() == ErrorCategory::DataSource
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            DeadlineError::HttpError(_) | DeadlineError::DataSourceFailure { .. } => {
                "Check network connectivity; cached or bundled holiday data is used meanwhile"
            }
            DeadlineError::CacheCorruption { .. } => {
                "Delete the holiday cache file; it is rebuilt on the next successful fetch"
            }
            DeadlineError::SeedUnavailable { .. } => {
                "Reinstall the tool or point [seed].path at a valid bank holiday JSON file"
            }
            DeadlineError::JurisdictionMissing { .. } => {
                "Use one of: england-and-wales, scotland, northern-ireland"
            }
            DeadlineError::InvalidExtension { .. } => {
                "Agreed extensions must be a whole number of days from 0 to 28"
            }
            DeadlineError::InvalidTransmission { .. } => {
                "Use YYYY-MM-DD for the date and HH:MM (24h) for the time"
            }
            DeadlineError::LookaheadExhausted { .. } => {
                "The holiday data looks corrupt; delete the cache or run with --offline"
            }
            DeadlineError::ConfigError { .. }
            | DeadlineError::InvalidConfigValueError { .. }
            | DeadlineError::MissingConfigError { .. }
            | DeadlineError::ConfigValidationError { .. } => {
                "Review the configuration file and command line flags"
            }
            DeadlineError::IoError(_) => "Check file permissions and available disk space",
            DeadlineError::SerializationError(_) => "Check that the JSON document is well formed",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            DeadlineError::InvalidExtension { days, .. } => {
                format!("An extension of {} days is not allowed", days)
            }
            DeadlineError::InvalidTransmission { value, reason } => {
                format!("Could not read transmission time '{}': {}", value, reason)
            }
            DeadlineError::LookaheadExhausted { date, .. } => {
                format!("Could not find a working day after {}", date)
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, DeadlineError>;
