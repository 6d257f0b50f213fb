//! HTTP query API data source implementation
//!
//! Talks to the indexer's REST API. The API reports lookup failures as a
//! `200 OK` with an `{"error": "..."}` body, which is mapped to
//! [`Error::Api`] here.

use super::{BlockRef, DataSource, NetworkStats, require_address, require_tx_id};
use crate::data_source::cache::ResponseCache;
use crate::transform::QueryResult;
use crate::{Error, Result};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;

/// Query API client with retry logic
#[derive(Debug, Clone)]
pub struct HttpDataSource {
    client: reqwest::Client,
    base_url: String,
    max_retries: u32,
    retry_delay: Duration,
    cache: Option<Arc<ResponseCache>>,
}

impl HttpDataSource {
    /// Create a new HTTP data source
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            max_retries: 3,
            retry_delay: Duration::from_millis(1000),
            cache: None,
        })
    }

    /// Set maximum retry attempts
    pub fn with_max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    /// Set delay between retries
    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    /// Set cache
    pub fn with_cache(mut self, cache: ResponseCache) -> Self {
        self.cache = Some(Arc::new(cache));
        self
    }

    pub fn url_for(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Execute a request with retry logic
    async fn execute_with_retry<F, T, Fut>(&self, operation: F) -> Result<T>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = reqwest::Result<T>>,
    {
        let mut last_error = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                let delay = self.retry_delay + Duration::from_millis(rand::random::<u64>() % 250);
                tracing::debug!("Retrying after {:?} (attempt {})", delay, attempt);
                sleep(delay).await;
            }

            match operation().await {
                Ok(result) => return Ok(result),
                Err(e) => {
                    tracing::warn!("API request failed (attempt {}): {}", attempt + 1, e);

                    // Client errors will not improve on retry
                    let is_client_error = e.status().is_some_and(|s| s.is_client_error());
                    last_error = Some(e);
                    if is_client_error {
                        break;
                    }
                }
            }
        }

        match last_error {
            Some(e) => Err(Error::Http(e)),
            None => Err(Error::data_source("request was never attempted")),
        }
    }

    /// GET a JSON document, consulting the cache first
    async fn get_json(&self, path: &str) -> Result<Value> {
        if let Some(cache) = &self.cache
            && let Some(text) = cache.get_text(path).await
        {
            match serde_json::from_str::<Value>(&text) {
                Ok(value) => return Ok(value),
                Err(e) => tracing::warn!("Ignoring unreadable cache entry for {}: {}", path, e),
            }
        }

        let url = self.url_for(path);
        tracing::debug!("GET {}", url);

        let text = self
            .execute_with_retry(|| {
                let request = self.client.get(&url);
                async move { request.send().await?.error_for_status()?.text().await }
            })
            .await?;

        let value: Value = serde_json::from_str(&text)?;
        check_api_error(&value)?;

        if let Some(cache) = &self.cache {
            cache.save_text(path, &text).await;
        }

        Ok(value)
    }
}

/// Map an `{"error": "..."}` body to an error
fn check_api_error(value: &Value) -> Result<()> {
    if let Value::Object(map) = value
        && map.len() == 1
        && let Some(Value::String(message)) = map.get("error")
    {
        return Err(Error::Api(message.clone()));
    }
    Ok(())
}

#[async_trait]
impl DataSource for HttpDataSource {
    async fn get_address_transfers(&self, address: &str) -> Result<QueryResult> {
        require_address(address)?;
        let value = self
            .get_json(&format!("/v1/transaction/transfers/{}", address))
            .await?;
        let mut result: QueryResult = serde_json::from_value(value)?;
        if result.address.is_none() {
            result.address = Some(address.to_string());
        }
        tracing::info!(
            "Fetched {} sender and {} participant batches for {}",
            result.as_sender.len(),
            result.as_participant.len(),
            address
        );
        Ok(result)
    }

    async fn get_block(&self, block: &BlockRef) -> Result<Value> {
        self.get_json(&format!("/v1/block/{}", block)).await
    }

    async fn get_transaction(&self, txid: &str) -> Result<Value> {
        require_tx_id(txid)?;
        self.get_json(&format!("/v1/transaction/{}", txid)).await
    }

    async fn get_block_transactions(&self, block_hash: &str) -> Result<Value> {
        require_tx_id(block_hash)?;
        self.get_json(&format!("/v1/block/{}/transactions", block_hash))
            .await
    }

    async fn get_sender_transactions(&self, address: &str) -> Result<Value> {
        require_address(address)?;
        self.get_json(&format!("/v1/transaction/sender/{}", address))
            .await
    }

    async fn get_stats(&self) -> Result<NetworkStats> {
        let value = self.get_json("/v1/stat/stats").await?;
        Ok(serde_json::from_value(value)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn unreachable_source() -> HttpDataSource {
        // port 9 (discard) on localhost: nothing should be listening
        HttpDataSource::new("http://127.0.0.1:9/", Duration::from_millis(200))
            .unwrap()
            .with_max_retries(0)
    }

    #[test]
    fn test_url_for_strips_trailing_slash() {
        let ds = unreachable_source();
        assert_eq!(
            ds.url_for("/v1/block/1"),
            "http://127.0.0.1:9/v1/block/1"
        );
    }

    #[test]
    fn test_check_api_error() {
        let err = check_api_error(&json!({"error": "No transfers for that sender."})).unwrap_err();
        assert_eq!(err.to_string(), "API error: No transfers for that sender.");

        assert!(check_api_error(&json!({"error": "x", "index": 1})).is_ok());
        assert!(check_api_error(&json!({"index": 1})).is_ok());
        assert!(check_api_error(&json!([])).is_ok());
    }

    #[tokio::test]
    async fn test_invalid_input_rejected_before_request() {
        let ds = unreachable_source();

        let err = ds.get_address_transfers("not-an-address").await.unwrap_err();
        assert!(err.is_invalid_input());

        let err = ds.get_transaction("0x1234").await.unwrap_err();
        assert!(err.is_invalid_input());

        let err = ds.get_block_transactions("420").await.unwrap_err();
        assert!(err.is_invalid_input());

        let err = ds.get_sender_transactions("0x1234").await.unwrap_err();
        assert!(err.is_invalid_input());
    }
}
