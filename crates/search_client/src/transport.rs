//! Network boundary of the controller: one authenticated `GET /search`.

use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use shared::{error::ApiError, protocol::SearchResponse};
use tokio_util::sync::CancellationToken;
use tracing::debug;
use url::Url;

use crate::{config::ClientConfig, error::SearchError, query::SearchParams};

#[async_trait]
pub trait SearchTransport: Send + Sync {
    /// Performs the call. Must return [`SearchError::Cancelled`] promptly
    /// once `cancel` fires, abandoning the underlying exchange.
    async fn search(
        &self,
        params: &SearchParams,
        cancel: CancellationToken,
    ) -> Result<SearchResponse, SearchError>;
}

pub struct HttpSearchTransport {
    http: Client,
    endpoint: Url,
    api_secret_key: String,
}

impl HttpSearchTransport {
    pub fn new(config: &ClientConfig) -> anyhow::Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().context("failed to build search http client")?;

        Ok(Self {
            http,
            endpoint: config.search_endpoint()?,
            api_secret_key: config.api_secret_key.clone(),
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    async fn fetch(&self, params: &SearchParams) -> Result<SearchResponse, SearchError> {
        let res = self
            .http
            .get(self.endpoint.clone())
            .query(&params.to_query_pairs())
            .bearer_auth(&self.api_secret_key)
            .send()
            .await?;

        let status = res.status();
        if !status.is_success() {
            // The error body is informational only; a missing or odd body
            // still yields the status.
            let api = res
                .bytes()
                .await
                .ok()
                .and_then(|body| serde_json::from_slice::<ApiError>(&body).ok());
            return Err(SearchError::http(status.as_u16(), api));
        }

        let body = res.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

#[async_trait]
impl SearchTransport for HttpSearchTransport {
    async fn search(
        &self,
        params: &SearchParams,
        cancel: CancellationToken,
    ) -> Result<SearchResponse, SearchError> {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!(query = params.query(), page = params.page(), "aborting superseded search request");
                Err(SearchError::Cancelled)
            }
            result = self.fetch(params) => result,
        }
    }
}

#[cfg(test)]
#[path = "tests/transport_tests.rs"]
mod tests;
