use crate::core::deemed_service::{DeemedServiceCalculator, ServiceRules};
use crate::core::provider::HolidayCalendarProvider;
use crate::domain::model::{DeadlineReport, Jurisdiction, ServiceDeadlineReport, Transmission};
use crate::utils::error::Result;
use chrono::NaiveDate;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeadlineRequest {
    pub jurisdiction: Jurisdiction,
    pub transmission: Transmission,
    pub extension_days: i64,
}

/// Resolves holidays for each request, then runs the deemed service rules over them.
pub struct DeadlineEngine {
    provider: HolidayCalendarProvider,
    rules: ServiceRules,
}

impl DeadlineEngine {
    pub fn new(provider: HolidayCalendarProvider) -> Self {
        Self::with_rules(provider, ServiceRules::cpr())
    }

    pub fn with_rules(provider: HolidayCalendarProvider, rules: ServiceRules) -> Self {
        Self { provider, rules }
    }

    pub async fn compute(&self, request: &DeadlineRequest) -> Result<DeadlineReport> {
        // 先驗證延期天數，避免無謂的網路請求
        self.rules.check_extension(request.extension_days)?;

        tracing::info!(
            "Computing deadline for transmission {} ({})",
            request.transmission,
            request.jurisdiction
        );

        let resolution = self.provider.resolve(request.jurisdiction).await;
        let calculator = DeemedServiceCalculator::with_rules(&resolution.holidays, self.rules);
        let result = calculator.calculate(&request.transmission, request.extension_days)?;

        tracing::info!(
            "Deemed service {}, filing deadline {} ({} holiday data)",
            result.deemed_service_date,
            result.filing_deadline,
            resolution.tier
        );

        Ok(DeadlineReport {
            jurisdiction: request.jurisdiction,
            transmission: request.transmission,
            result,
            holiday_source: resolution.tier,
            holiday_data_as_of: resolution.as_of,
            provenance: resolution.provenance(),
        })
    }

    /// Response period and extension only, for a date of service the caller already knows.
    pub async fn deadline_from_service(
        &self,
        jurisdiction: Jurisdiction,
        service_date: NaiveDate,
        extension_days: i64,
    ) -> Result<ServiceDeadlineReport> {
        let extension = self.rules.check_extension(extension_days)?;

        tracing::info!("Computing deadline from service on {} ({})", service_date, jurisdiction);

        let resolution = self.provider.resolve(jurisdiction).await;
        let calculator = DeemedServiceCalculator::with_rules(&resolution.holidays, self.rules);
        let filing_deadline = calculator.deadline_from_service(service_date, extension_days)?;

        Ok(ServiceDeadlineReport {
            jurisdiction,
            service_date,
            filing_deadline,
            extension_days: extension,
            holiday_source: resolution.tier,
            holiday_data_as_of: resolution.as_of,
            provenance: resolution.provenance(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{LocalCache, SeedSource};
    use crate::domain::model::SourceTier;
    use crate::utils::error::DeadlineError;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn offline_engine(temp_dir: &TempDir) -> DeadlineEngine {
        let cache = LocalCache::new(temp_dir.path().join("cache.json"));
        DeadlineEngine::new(HolidayCalendarProvider::offline(cache, SeedSource::bundled()))
    }

    #[tokio::test]
    async fn test_compute_uses_seed_when_cache_missing() {
        let temp_dir = TempDir::new().unwrap();
        let engine = offline_engine(&temp_dir);

        let request = DeadlineRequest {
            jurisdiction: Jurisdiction::EnglandAndWales,
            transmission: Transmission::parse("2025-12-24", "10:00").unwrap(),
            extension_days: 28,
        };
        let report = engine.compute(&request).await.unwrap();

        assert_eq!(report.holiday_source, SourceTier::Seed);
        // 25、26 日為假日，之後是週末
        assert_eq!(
            report.result.deemed_service_date,
            NaiveDate::from_ymd_opt(2025, 12, 30).unwrap()
        );
        assert_eq!(
            (report.result.filing_deadline - report.result.deemed_service_date).num_days(),
            42
        );
    }

    #[tokio::test]
    async fn test_invalid_extension_rejected_before_resolution() {
        let temp_dir = TempDir::new().unwrap();
        let engine = offline_engine(&temp_dir);

        let request = DeadlineRequest {
            jurisdiction: Jurisdiction::Scotland,
            transmission: Transmission::parse("2025-06-02", "09:00").unwrap(),
            extension_days: -1,
        };
        let err = engine.compute(&request).await.unwrap_err();

        assert!(matches!(err, DeadlineError::InvalidExtension { days: -1, .. }));
    }

    #[tokio::test]
    async fn test_deadline_from_known_service_date_uses_holidays() {
        let temp_dir = TempDir::new().unwrap();
        let engine = offline_engine(&temp_dir);

        // 12 月 14 日 + 14 = 12 月 28 日 (週一，補假) -> 29 日
        let report = engine
            .deadline_from_service(
                Jurisdiction::EnglandAndWales,
                NaiveDate::from_ymd_opt(2026, 12, 14).unwrap(),
                0,
            )
            .await
            .unwrap();

        assert_eq!(report.holiday_source, SourceTier::Seed);
        assert_eq!(report.filing_deadline, NaiveDate::from_ymd_opt(2026, 12, 29).unwrap());

        let err = engine
            .deadline_from_service(
                Jurisdiction::EnglandAndWales,
                NaiveDate::from_ymd_opt(2026, 12, 14).unwrap(),
                29,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DeadlineError::InvalidExtension { days: 29, .. }));
    }
}
