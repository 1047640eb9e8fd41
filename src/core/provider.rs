use crate::adapters::{LiveSource, LocalCache, SeedSource};
use crate::domain::model::{CalendarSnapshot, Jurisdiction, Resolution, SourceTier};
use crate::domain::ports::{SnapshotSource, SourceSettings};
use crate::utils::error::{DeadlineError, Result};

/// Resolves the bank holidays of a jurisdiction through an ordered list of sources.
///
/// Sources are tried in the order given. The first one that yields a document
/// containing the requested jurisdiction wins; when every source fails the
/// result is an empty holiday set tagged [`SourceTier::Empty`].
///
/// A document obtained from a [`SourceTier::Live`] source is written verbatim
/// to the cache (when one is configured) once it has yielded a holiday set.
pub struct HolidayCalendarProvider {
    sources: Vec<Box<dyn SnapshotSource>>,
    cache: Option<LocalCache>,
}

impl HolidayCalendarProvider {
    pub fn new(sources: Vec<Box<dyn SnapshotSource>>, cache: Option<LocalCache>) -> Self {
        Self { sources, cache }
    }

    /// Live feed, then cache, then bundled seed.
    pub fn standard(live: LiveSource, cache: LocalCache, seed: SeedSource) -> Self {
        Self::new(
            vec![Box::new(live), Box::new(cache.clone()), Box::new(seed)],
            Some(cache),
        )
    }

    /// Cache then seed, never touching the network.
    pub fn offline(cache: LocalCache, seed: SeedSource) -> Self {
        Self::new(vec![Box::new(cache), Box::new(seed)], None)
    }

    pub fn from_settings<C: SourceSettings + ?Sized>(settings: &C) -> Result<Self> {
        let cache = LocalCache::new(settings.cache_path());
        let seed = settings
            .seed_path()
            .map(SeedSource::from_path)
            .unwrap_or_default();

        if !settings.live_enabled() {
            tracing::info!("Live holiday source disabled; using cache and seed only");
            return Ok(Self::offline(cache, seed));
        }

        let live = LiveSource::new(settings.endpoint(), settings.timeout())?;
        Ok(Self::standard(live, cache, seed))
    }

    pub fn tiers(&self) -> Vec<SourceTier> {
        self.sources.iter().map(|s| s.tier()).collect()
    }

    pub async fn resolve(&self, jurisdiction: Jurisdiction) -> Resolution {
        for source in &self.sources {
            let tier = source.tier();
            match self.try_source(source.as_ref(), jurisdiction).await {
                Ok(resolution) => {
                    tracing::info!(
                        "📅 Resolved {} bank holidays for {} from {} tier",
                        resolution.holidays.len(),
                        jurisdiction,
                        tier
                    );
                    return resolution;
                }
                Err(e) => {
                    tracing::warn!(
                        "⚠️ {} tier unavailable for {}: {} (falling back)",
                        tier,
                        jurisdiction,
                        e
                    );
                }
            }
        }

        tracing::warn!(
            "⚠️ No holiday data for {}; only weekends will be excluded",
            jurisdiction
        );
        Resolution::empty(jurisdiction)
    }

    async fn try_source(
        &self,
        source: &dyn SnapshotSource,
        jurisdiction: Jurisdiction,
    ) -> Result<Resolution> {
        let tier = source.tier();
        let wrap = |e: DeadlineError| DeadlineError::for_tier(tier, e);

        let raw = source.fetch().await.map_err(wrap)?;
        let snapshot = CalendarSnapshot::from_json(&raw.body).map_err(wrap)?;

        let holidays =
            snapshot
                .holidays_for(jurisdiction)
                .ok_or_else(|| DeadlineError::JurisdictionMissing {
                    jurisdiction: jurisdiction.to_string(),
                    tier,
                })?;

        if tier == SourceTier::Live {
            self.persist(&raw.body);
        }

        Ok(Resolution {
            jurisdiction,
            holidays,
            tier,
            as_of: raw.as_of,
        })
    }

    fn persist(&self, body: &str) {
        if let Some(cache) = &self.cache {
            // 快取寫入失敗不影響本次結果
            if let Err(e) = cache.store(body) {
                tracing::warn!(
                    "⚠️ Could not update holiday cache at {}: {}",
                    cache.path().display(),
                    e
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::RawSnapshot;
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct StaticSource {
        tier: SourceTier,
        body: Option<&'static str>,
        calls: Arc<AtomicUsize>,
    }

    impl StaticSource {
        fn boxed(tier: SourceTier, body: Option<&'static str>) -> (Box<dyn SnapshotSource>, Arc<AtomicUsize>) {
            let calls = Arc::new(AtomicUsize::new(0));
            let source = StaticSource {
                tier,
                body,
                calls: calls.clone(),
            };
            (Box::new(source), calls)
        }
    }

    #[async_trait]
    impl SnapshotSource for StaticSource {
        fn tier(&self) -> SourceTier {
            self.tier
        }

        async fn fetch(&self) -> Result<RawSnapshot> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.body {
                Some(body) => Ok(RawSnapshot {
                    body: body.to_string(),
                    as_of: None,
                }),
                None => Err(DeadlineError::DataSourceFailure {
                    message: "unreachable".to_string(),
                }),
            }
        }
    }

    const SCOTLAND_ONLY: &str =
        r#"{"scotland":{"events":[{"title":"St Andrew's Day","date":"2026-11-30"}]}}"#;
    const ENGLAND_ONLY: &str =
        r#"{"england-and-wales":{"events":[{"title":"Boxing Day","date":"2026-12-28"}]}}"#;

    #[tokio::test]
    async fn test_first_successful_tier_wins_and_later_tiers_are_skipped() {
        let (live, _) = StaticSource::boxed(SourceTier::Live, Some(SCOTLAND_ONLY));
        let (seed, seed_calls) = StaticSource::boxed(SourceTier::Seed, Some(SCOTLAND_ONLY));
        let provider = HolidayCalendarProvider::new(vec![live, seed], None);

        let resolution = provider.resolve(Jurisdiction::Scotland).await;

        assert_eq!(resolution.tier, SourceTier::Live);
        assert!(resolution
            .holidays
            .contains(NaiveDate::from_ymd_opt(2026, 11, 30).unwrap()));
        assert_eq!(seed_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_missing_jurisdiction_falls_through() {
        let (live, _) = StaticSource::boxed(SourceTier::Live, Some(SCOTLAND_ONLY));
        let (cache, _) = StaticSource::boxed(SourceTier::Cache, Some("not json"));
        let (seed, _) = StaticSource::boxed(SourceTier::Seed, Some(ENGLAND_ONLY));
        let provider = HolidayCalendarProvider::new(vec![live, cache, seed], None);

        let resolution = provider.resolve(Jurisdiction::EnglandAndWales).await;

        assert_eq!(resolution.tier, SourceTier::Seed);
        assert_eq!(resolution.holidays.len(), 1);
    }

    #[tokio::test]
    async fn test_all_tiers_failing_yields_empty() {
        let (live, _) = StaticSource::boxed(SourceTier::Live, None);
        let (seed, _) = StaticSource::boxed(SourceTier::Seed, Some(SCOTLAND_ONLY));
        let provider = HolidayCalendarProvider::new(vec![live, seed], None);

        let resolution = provider.resolve(Jurisdiction::NorthernIreland).await;

        assert_eq!(resolution, Resolution::empty(Jurisdiction::NorthernIreland));
    }

    #[test]
    fn test_offline_provider_has_no_live_tier() {
        let provider =
            HolidayCalendarProvider::offline(LocalCache::new("unused.json"), SeedSource::bundled());
        assert_eq!(provider.tiers(), vec![SourceTier::Cache, SourceTier::Seed]);
    }
}
