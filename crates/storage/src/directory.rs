//! Lookup of rider nationality in an external rider registry.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};

#[async_trait]
pub trait RiderDirectory: Send + Sync {
    /// Country code registered for the rider, or `None` when unknown or unreachable.
    async fn lookup_country(&self, external_id: &str) -> Option<String>;
}

/// Used when no directory is configured; every lookup comes back empty.
pub struct NoRiderDirectory;

#[async_trait]
impl RiderDirectory for NoRiderDirectory {
    async fn lookup_country(&self, _external_id: &str) -> Option<String> {
        None
    }
}

#[derive(Debug, Deserialize)]
struct RiderRecord {
    country: Option<String>,
}

pub struct HttpRiderDirectory {
    base_url: String,
    client: reqwest::Client,
}

impl HttpRiderDirectory {
    pub fn new(base_url: impl Into<String>) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(5))
            .build()?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    async fn fetch(&self, external_id: &str) -> Result<RiderRecord, reqwest::Error> {
        let url = format!("{}/riders/{}", self.base_url, external_id);

        self.client
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json::<RiderRecord>()
            .await
    }
}

#[async_trait]
impl RiderDirectory for HttpRiderDirectory {
    async fn lookup_country(&self, external_id: &str) -> Option<String> {
        match self.fetch(external_id).await {
            Ok(record) => {
                let country = record
                    .country
                    .map(|c| c.trim().to_uppercase())
                    .filter(|c| !c.is_empty());
                debug!(external_id, ?country, "Rider directory lookup");
                country
            }
            Err(e) => {
                warn!(external_id, error = %e, "Rider directory lookup failed");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_no_directory_returns_nothing() {
        assert_eq!(NoRiderDirectory.lookup_country("IRL-1042").await, None);
    }

    #[tokio::test]
    async fn test_unreachable_directory_is_not_fatal() {
        let directory = HttpRiderDirectory::new("http://127.0.0.1:9/").unwrap();
        assert_eq!(directory.base_url, "http://127.0.0.1:9");
        assert_eq!(directory.lookup_country("IRL-1042").await, None);
    }
}
