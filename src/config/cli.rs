use crate::config::toml_config::{
    CacheConfig, DefaultsConfig, EngineConfig, SeedConfig, MAX_TIMEOUT_SECONDS,
};
use crate::core::deemed_service::ServiceRules;
use crate::domain::model::{Jurisdiction, Transmission};
use crate::utils::error::{DeadlineError, Result};
use crate::utils::validation::{self, Validate};
use chrono::NaiveDate;
use clap::Parser;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize, Parser)]
#[command(name = "cpr-deadline")]
#[command(about = "Compute CPR deemed service dates and filing deadlines")]
pub struct CliConfig {
    /// Date of transmission (YYYY-MM-DD)
    #[arg(long, required_unless_present = "service_date")]
    pub date: Option<String>,

    /// Time of transmission (HH:MM, 24h clock)
    #[arg(long, default_value = "12:00")]
    pub time: String,

    /// Known date of service (YYYY-MM-DD); skips the deeming rules
    #[arg(long, conflicts_with = "date")]
    pub service_date: Option<String>,

    /// Jurisdiction whose bank holidays apply
    #[arg(long, value_enum)]
    pub jurisdiction: Option<Jurisdiction>,

    /// Agreed extension in calendar days (0-28)
    #[arg(long, allow_negative_numbers = true)]
    pub extension: Option<i64>,

    /// Path to a TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Bank holiday feed URL [default: https://www.gov.uk/bank-holidays.json]
    #[arg(long)]
    pub api_endpoint: Option<String>,

    /// Feed timeout in seconds [default: 3]
    #[arg(long)]
    pub timeout_seconds: Option<u64>,

    #[arg(long)]
    pub cache_path: Option<String>,

    #[arg(long)]
    pub seed_path: Option<String>,

    /// Skip the live holiday feed and use cached or bundled data
    #[arg(long)]
    pub offline: bool,

    /// Write an iCalendar file with the three key dates
    #[arg(long)]
    pub ics: Option<String>,

    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub log_json: bool,
}

impl CliConfig {
    pub fn transmission(&self) -> Result<Transmission> {
        let date = self
            .date
            .as_deref()
            .ok_or_else(|| DeadlineError::InvalidTransmission {
                value: String::new(),
                reason: "--date is required unless --service-date is given".to_string(),
            })?;
        Transmission::parse(date, &self.time)
    }

    pub fn service_date(&self) -> Result<Option<NaiveDate>> {
        self.service_date
            .as_deref()
            .map(|raw| {
                NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|e| {
                    DeadlineError::InvalidTransmission {
                        value: raw.to_string(),
                        reason: format!("service date must be YYYY-MM-DD ({})", e),
                    }
                })
            })
            .transpose()
    }

    /// Effective settings: command line flags that were given win over the file.
    pub fn layered_over(&self, file: Option<&EngineConfig>) -> EngineConfig {
        let mut config = file.cloned().unwrap_or_default();

        if let Some(endpoint) = &self.api_endpoint {
            config.source.endpoint = endpoint.clone();
        }
        if let Some(timeout) = self.timeout_seconds {
            config.source.timeout_seconds = Some(timeout);
        }
        if self.offline {
            config.source.enabled = Some(false);
        }
        if let Some(path) = &self.cache_path {
            config.cache = CacheConfig {
                path: Some(path.clone()),
            };
        }
        if let Some(path) = &self.seed_path {
            config.seed = Some(SeedConfig {
                path: Some(path.clone()),
            });
        }

        if self.jurisdiction.is_some() || self.extension.is_some() {
            let defaults = config.defaults.get_or_insert_with(DefaultsConfig::default);
            if let Some(jurisdiction) = self.jurisdiction {
                defaults.jurisdiction = Some(jurisdiction);
            }
            if let Some(days) = self.extension {
                defaults.extension_days = Some(days);
            }
        }

        config
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        if let Some(endpoint) = &self.api_endpoint {
            validation::validate_url("api_endpoint", endpoint)?;
        }
        if let Some(timeout) = self.timeout_seconds {
            validation::validate_range("timeout_seconds", timeout, 1, MAX_TIMEOUT_SECONDS)?;
        }
        if let Some(path) = &self.cache_path {
            validation::validate_path("cache_path", path)?;
        }
        if let Some(path) = &self.seed_path {
            validation::validate_path("seed_path", path)?;
        }
        if let Some(days) = self.extension {
            ServiceRules::cpr().check_extension(days)?;
        }
        if self.service_date()?.is_none() {
            self.transmission()?;
        }
        Ok(())
    }
}
