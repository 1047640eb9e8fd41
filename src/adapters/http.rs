use crate::domain::model::SourceTier;
use crate::domain::ports::{RawSnapshot, SnapshotSource};
use crate::utils::error::Result;
use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use std::time::Duration;

pub const DEFAULT_ENDPOINT: &str = "https://www.gov.uk/bank-holidays.json";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(3);

/// Authoritative remote bank holiday feed.
#[derive(Debug, Clone)]
pub struct LiveSource {
    client: Client,
    endpoint: String,
}

impl LiveSource {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }
}

#[async_trait]
impl SnapshotSource for LiveSource {
    fn tier(&self) -> SourceTier {
        SourceTier::Live
    }

    async fn fetch(&self) -> Result<RawSnapshot> {
        tracing::debug!("Requesting bank holidays from: {}", self.endpoint);
        let response = self
            .client
            .get(&self.endpoint)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?;

        tracing::debug!("Holiday API response status: {}", response.status());
        let body = response.error_for_status()?.text().await?;

        Ok(RawSnapshot {
            body,
            as_of: Some(Utc::now()),
        })
    }
}
