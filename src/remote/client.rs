// ABOUTME: HTTP client for the remote sync endpoint
// ABOUTME: Delivers one batch per POST; only HTTP 200 counts as accepted

use anyhow::{Context, Result};
use reqwest::{Client, StatusCode};
use std::time::Duration;

use super::SyncGateway;
use crate::error::SyncError;
use crate::sync::batch::SyncBatch;

pub struct HttpSyncClient {
    client: Client,
    base_url: String,
}

impl HttpSyncClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }
}

impl SyncGateway for HttpSyncClient {
    async fn push(&self, batch: &SyncBatch) -> Result<(), SyncError> {
        let url = format!("{}/sync", self.base_url);
        tracing::debug!("posting sync batch to {}", url);

        let response = self
            .client
            .post(&url)
            .json(batch)
            .send()
            .await
            .map_err(SyncError::NetworkFailure)?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            return Err(SyncError::NonSuccessResponse {
                status: status.as_u16(),
                body,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = HttpSyncClient::new("https://sync.example.org");
        assert!(client.is_ok());
    }
}
