//! Deemed service and filing deadline rules.
//!
//! The pipeline runs in a fixed order: cutoff adjustment, deeming delay,
//! response period, agreed extension, then a single snap forward when the
//! deadline lands on a weekend or bank holiday.

use crate::core::business_days::BusinessDayCalculator;
use crate::domain::model::{DeemedServiceResult, Transmission};
use crate::domain::ports::HolidayLookup;
use crate::utils::error::{DeadlineError, Result};
use chrono::{Days, NaiveDate, NaiveTime};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceRules {
    /// Transmissions strictly after this time count as sent on the next business day.
    pub cutoff: NaiveTime,
    pub deeming_business_days: u32,
    pub response_calendar_days: u32,
    pub max_extension_days: u32,
}

impl ServiceRules {
    /// CPR 6.26 cutoff and deeming, CPR 10.3 response period, CPR 2.11 extension cap.
    pub fn cpr() -> Self {
        Self {
            cutoff: NaiveTime::from_hms_opt(16, 30, 0).expect("16:30 is a valid time of day"),
            deeming_business_days: 2,
            response_calendar_days: 14,
            max_extension_days: 28,
        }
    }

    /// Rejects extensions outside `0..=max_extension_days`.
    pub fn check_extension(&self, extension_days: i64) -> Result<u32> {
        if extension_days < 0 || extension_days > i64::from(self.max_extension_days) {
            return Err(DeadlineError::InvalidExtension {
                days: extension_days,
                min: 0,
                max: self.max_extension_days,
            });
        }
        Ok(extension_days as u32)
    }
}

impl Default for ServiceRules {
    fn default() -> Self {
        Self::cpr()
    }
}

pub struct DeemedServiceCalculator<'a, H: HolidayLookup + ?Sized> {
    days: BusinessDayCalculator<'a, H>,
    rules: ServiceRules,
}

impl<'a, H: HolidayLookup + ?Sized> DeemedServiceCalculator<'a, H> {
    pub fn new(holidays: &'a H) -> Self {
        Self::with_rules(holidays, ServiceRules::cpr())
    }

    pub fn with_rules(holidays: &'a H, rules: ServiceRules) -> Self {
        Self {
            days: BusinessDayCalculator::new(holidays),
            rules,
        }
    }

    pub fn calculate(
        &self,
        transmission: &Transmission,
        extension_days: i64,
    ) -> Result<DeemedServiceResult> {
        let extension_days = self.rules.check_extension(extension_days)?;

        let effective_step_date = self.effective_step_date(transmission)?;
        let deemed_service_date = self
            .days
            .add_business_days(effective_step_date, self.rules.deeming_business_days)?;
        let filing_deadline = self.extended_deadline(deemed_service_date, extension_days)?;

        tracing::debug!(
            "Transmission {} -> step {}, deemed {}, deadline {} (+{} days extension)",
            transmission,
            effective_step_date,
            deemed_service_date,
            filing_deadline,
            extension_days
        );

        Ok(DeemedServiceResult {
            effective_step_date,
            deemed_service_date,
            filing_deadline,
            extension_days,
        })
    }

    /// Response period and extension from an already known date of service.
    pub fn deadline_from_service(
        &self,
        service_date: NaiveDate,
        extension_days: i64,
    ) -> Result<NaiveDate> {
        let extension_days = self.rules.check_extension(extension_days)?;
        self.extended_deadline(service_date, extension_days)
    }

    fn effective_step_date(&self, transmission: &Transmission) -> Result<NaiveDate> {
        let date = transmission.date();
        if !self.days.is_business_day(date) || transmission.time() > self.rules.cutoff {
            return self.days.next_business_day(date);
        }
        Ok(date)
    }

    fn extended_deadline(&self, service_date: NaiveDate, extension_days: u32) -> Result<NaiveDate> {
        let total = u64::from(self.rules.response_calendar_days) + u64::from(extension_days);
        let deadline = service_date.checked_add_days(Days::new(total)).ok_or_else(|| {
            DeadlineError::InvalidTransmission {
                value: service_date.to_string(),
                reason: "deadline falls outside the supported calendar range".to_string(),
            }
        })?;

        if self.days.is_business_day(deadline) {
            Ok(deadline)
        } else {
            self.days.next_business_day(deadline)
        }
    }
}
