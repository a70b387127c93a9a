use async_trait::async_trait;
use serde::Deserialize;
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

#[derive(Debug, Error)]
pub enum PriceError {
    #[error(transparent)]
    Client(#[from] ClientError),
    #[error("non-positive price {price} for asset {id}")]
    NonPositive { id: String, price: f64 },
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SpotQuote {
    /// Raw amount received for selling one unit of the base asset, expressed
    /// in the quote asset's smallest denomination.
    amount_out: f64,
}

/// Spot-price endpoint wrapper; shared read-only across all workers.
pub struct PriceClient {
    http: reqwest::Client,
    endpoint: String,
}

impl PriceClient {
    /// Builds the client and probes the endpoint once; fatal on failure.
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

    /// Raw quote-denomination amount for selling one unit of `base`.
    pub async fn spot(&self, base: &str, quote: &str) -> Result<f64, ClientError> {
        let url = format!("{}/spot/{base}/{quote}", self.endpoint);
        let response = self.http.get(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Rejected {
                status: status.as_u16(),
            });
        }
        let quote: SpotQuote = response.json().await?;
        Ok(quote.amount_out)
    }
}

#[async_trait]
impl Release for PriceClient {
    async fn release(&self) -> anyhow::Result<()> {
        debug!("dropping http connection pool");
        Ok(())
    }
}
