use async_trait::async_trait;
use thiserror::Error;
use tracing::debug;

use harvest_core::Release;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("endpoint rejected request: {status}")]
    Rejected { status: u16 },
}

/// Thin wrapper over the farm APR endpoint.
///
/// Shared read-only across all workers; concurrent independent queries are
/// the expected usage pattern.
pub struct FarmClient {
    http: reqwest::Client,
    endpoint: String,
}

impl FarmClient {
    /// Builds the client and probes the endpoint once. A dead endpoint is a
    /// fatal setup failure; the batch never starts.
    pub async fn connect(endpoint: &str) -> Result<Self, ClientError> {
        let client = Self {
            http: reqwest::Client::new(),
            endpoint: endpoint.trim_end_matches('/').to_string(),
        };

        let url = format!("{}/health", client.endpoint);
        client.http.get(&url).send().await?.error_for_status()?;
        debug!(endpoint = %client.endpoint, "endpoint reachable");
        Ok(client)
    }

    /// Current APR document for one farm id.
    pub async fn farm_apr(&self, id: &str) -> Result<serde_json::Value, ClientError> {
        let url = format!("{}/farms/{id}/apr", self.endpoint);
        let response = self.http.get(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Rejected {
                status: status.as_u16(),
            });
        }
        Ok(response.json().await?)
    }
}

#[async_trait]
impl Release for FarmClient {
    async fn release(&self) -> anyhow::Result<()> {
        // reqwest tears down its pooled connections on drop; nothing to flush
        debug!("dropping http connection pool");
        Ok(())
    }
}
