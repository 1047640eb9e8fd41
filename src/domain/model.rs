use crate::utils::error::{DeadlineError, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::str::FromStr;

/// UK legal jurisdiction whose bank holidays apply to a calculation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "kebab-case")]
pub enum Jurisdiction {
    #[default]
    EnglandAndWales,
    Scotland,
    NorthernIreland,
}

impl Jurisdiction {
    pub const ALL: [Jurisdiction; 3] = [
        Jurisdiction::EnglandAndWales,
        Jurisdiction::Scotland,
        Jurisdiction::NorthernIreland,
    ];

    /// Identifier used as the key in bank holiday documents.
    pub fn as_str(&self) -> &'static str {
        match self {
            Jurisdiction::EnglandAndWales => "england-and-wales",
            Jurisdiction::Scotland => "scotland",
            Jurisdiction::NorthernIreland => "northern-ireland",
        }
    }
}

impl fmt::Display for Jurisdiction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Jurisdiction {
    type Err = DeadlineError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_ascii_lowercase();
        Jurisdiction::ALL
            .into_iter()
            .find(|j| j.as_str() == wanted)
            .ok_or_else(|| DeadlineError::InvalidConfigValueError {
                field: "jurisdiction".to_string(),
                value: s.to_string(),
                reason: "Expected england-and-wales, scotland or northern-ireland".to_string(),
            })
    }
}

/// Where a resolved holiday set came from, in fallback order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceTier {
    Live,
    Cache,
    Seed,
    Empty,
}

impl fmt::Display for SourceTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SourceTier::Live => "live",
            SourceTier::Cache => "cache",
            SourceTier::Seed => "seed",
            SourceTier::Empty => "empty",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HolidayEvent {
    pub date: NaiveDate,
    #[serde(rename = "title", alias = "name")]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DivisionCalendar {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub division: Option<String>,
    pub events: Vec<HolidayEvent>,
}

/// Decoded bank holiday document, keyed by jurisdiction identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CalendarSnapshot {
    pub divisions: HashMap<String, DivisionCalendar>,
}

impl CalendarSnapshot {
    pub fn from_json(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Reduces the snapshot to the holiday set of one jurisdiction.
    pub fn holidays_for(&self, jurisdiction: Jurisdiction) -> Option<HolidaySet> {
        self.divisions
            .get(jurisdiction.as_str())
            .map(|division| HolidaySet::from_dates(division.events.iter().map(|e| e.date)))
    }
}

/// Immutable set of non-working dates for one jurisdiction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HolidaySet {
    dates: HashSet<NaiveDate>,
}

impl HolidaySet {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_dates<I: IntoIterator<Item = NaiveDate>>(dates: I) -> Self {
        Self {
            dates: dates.into_iter().collect(),
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.dates.contains(&date)
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Member dates in ascending order.
    pub fn sorted_dates(&self) -> Vec<NaiveDate> {
        let mut dates: Vec<NaiveDate> = self.dates.iter().copied().collect();
        dates.sort();
        dates
    }
}

/// Holiday set together with the tier that supplied it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub jurisdiction: Jurisdiction,
    pub holidays: HolidaySet,
    pub tier: SourceTier,
    pub as_of: Option<DateTime<Utc>>,
}

impl Resolution {
    pub fn empty(jurisdiction: Jurisdiction) -> Self {
        Self {
            jurisdiction,
            holidays: HolidaySet::empty(),
            tier: SourceTier::Empty,
            as_of: None,
        }
    }

    /// Human readable note on which holiday data was used.
    pub fn provenance(&self) -> String {
        let as_of = self
            .as_of
            .map(|t| t.format("%Y-%m-%d %H:%M UTC").to_string());

        match (self.tier, as_of) {
            (SourceTier::Live, Some(at)) => format!("live holiday data retrieved {}", at),
            (SourceTier::Live, None) => "live holiday data".to_string(),
            (SourceTier::Cache, Some(at)) => format!("locally cached holiday data as of {}", at),
            (SourceTier::Cache, None) => "locally cached holiday data".to_string(),
            (SourceTier::Seed, _) => "bundled holiday snapshot shipped with this tool".to_string(),
            (SourceTier::Empty, _) => {
                "no holiday data available; weekends only were excluded".to_string()
            }
        }
    }
}

/// Moment a document was sent, in court-local time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Transmission {
    at: NaiveDateTime,
}

const DATE_FORMAT: &str = "%Y-%m-%d";
const TIME_FORMATS: [&str; 2] = ["%H:%M", "%H:%M:%S"];
const TIMESTAMP_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

impl Transmission {
    pub fn new(date: NaiveDate, time: NaiveTime) -> Self {
        Self {
            at: date.and_time(time),
        }
    }

    /// Builds a transmission from separate `YYYY-MM-DD` and `HH:MM[:SS]` strings.
    pub fn parse(date: &str, time: &str) -> Result<Self> {
        let date_value = NaiveDate::parse_from_str(date.trim(), DATE_FORMAT).map_err(|e| {
            DeadlineError::InvalidTransmission {
                value: date.to_string(),
                reason: format!("date must be YYYY-MM-DD ({})", e),
            }
        })?;

        let time_value = TIME_FORMATS
            .iter()
            .find_map(|fmt| NaiveTime::parse_from_str(time.trim(), fmt).ok())
            .ok_or_else(|| DeadlineError::InvalidTransmission {
                value: time.to_string(),
                reason: "time must be HH:MM or HH:MM:SS".to_string(),
            })?;

        Ok(Self::new(date_value, time_value))
    }

    pub fn date(&self) -> NaiveDate {
        self.at.date()
    }

    pub fn time(&self) -> NaiveTime {
        self.at.time()
    }

    pub fn timestamp(&self) -> NaiveDateTime {
        self.at
    }
}

impl From<NaiveDateTime> for Transmission {
    fn from(at: NaiveDateTime) -> Self {
        Self { at }
    }
}

impl FromStr for Transmission {
    type Err = DeadlineError;

    fn from_str(s: &str) -> Result<Self> {
        TIMESTAMP_FORMATS
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(s.trim(), fmt).ok())
            .map(Transmission::from)
            .ok_or_else(|| DeadlineError::InvalidTransmission {
                value: s.to_string(),
                reason: "expected an ISO 8601 local timestamp such as 2024-03-05T14:30".to_string(),
            })
    }
}

impl fmt::Display for Transmission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.at.format("%Y-%m-%d %H:%M"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeemedServiceResult {
    pub effective_step_date: NaiveDate,
    pub deemed_service_date: NaiveDate,
    pub filing_deadline: NaiveDate,
    pub extension_days: u32,
}

/// Everything a downstream consumer needs to store or render a computation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeadlineReport {
    pub jurisdiction: Jurisdiction,
    pub transmission: Transmission,
    #[serde(flatten)]
    pub result: DeemedServiceResult,
    pub holiday_source: SourceTier,
    pub holiday_data_as_of: Option<DateTime<Utc>>,
    pub provenance: String,
}

/// Filing deadline counted from a service date that is already known.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceDeadlineReport {
    pub jurisdiction: Jurisdiction,
    pub service_date: NaiveDate,
    pub filing_deadline: NaiveDate,
    pub extension_days: u32,
    pub holiday_source: SourceTier,
    pub holiday_data_as_of: Option<DateTime<Utc>>,
    pub provenance: String,
}
