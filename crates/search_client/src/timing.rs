use async_trait::async_trait;
use shared::protocol::SearchResponse;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::{error::SearchError, query::SearchParams, transport::SearchTransport};

/// Measures wall-clock latency around a transport and fills
/// `time_taken_ms` when the server left it out.
pub struct Timed<T> {
    inner: T,
}

impl<T> Timed<T> {
    pub fn new(inner: T) -> Self {
        Self { inner }
    }

    pub fn into_inner(self) -> T {
        self.inner
    }
}

#[async_trait]
impl<T: SearchTransport> SearchTransport for Timed<T> {
    async fn search(
        &self,
        params: &SearchParams,
        cancel: CancellationToken,
    ) -> Result<SearchResponse, SearchError> {
        let started = Instant::now();
        let mut response = self.inner.search(params, cancel).await?;
        let elapsed_ms = (started.elapsed().as_secs_f64() * 1000.0).round() as u64;

        match response.time_taken_ms {
            Some(server_ms) => {
                debug!(elapsed_ms, server_ms, "search latency measured");
            }
            None => {
                debug!(elapsed_ms, "server omitted time_taken_ms; using client measurement");
                response.time_taken_ms = Some(elapsed_ms);
            }
        }

        Ok(response)
    }
}
