//! HTTP transport shared by forecast providers: response cache in front,
//! retries with backoff behind.

use chrono::Utc;
use reqwest::Client;
use tracing::{debug, warn};

use crate::{cache::ResponseCache, error::ForecastError, retry::RetryConfig};

#[derive(Debug, Clone)]
pub struct Transport {
    http: Client,
    retry: RetryConfig,
    cache: Option<ResponseCache>,
}

impl Transport {
    pub fn new(http: Client, retry: RetryConfig, cache: Option<ResponseCache>) -> Self {
        Self { http, retry, cache }
    }

    pub fn cache(&self) -> Option<&ResponseCache> {
        self.cache.as_ref()
    }

    /// `GET url?params` and decode the body of a successful response with `decode`.
    ///
    /// Served from the cache when a fresh entry exists and still decodes.
    /// Otherwise retryable failures are retried per [`RetryConfig`]; the last
    /// error is returned once attempts run out. Only bodies that decode are
    /// cached.
    pub async fn get_decoded<T, F>(
        &self,
        url: &str,
        params: &[(String, String)],
        decode: F,
    ) -> Result<T, ForecastError>
    where
        F: Fn(&str) -> Result<T, ForecastError>,
    {
        let key = ResponseCache::key(url, params);

        if let Some(cache) = &self.cache {
            if let Some(body) = cache.get(&key, Utc::now()).await {
                match decode(&body) {
                    Ok(value) => return Ok(value),
                    Err(e) => warn!(%key, error = %e, "Cached response is unusable, refetching"),
                }
            }
        }

        let max_attempts = self.retry.max_attempts();
        let mut attempt = 1;
        let body = loop {
            match self.send(url, params).await {
                Ok(body) => break body,
                Err(e) if e.is_retryable() && attempt < max_attempts => {
                    let delay = self.retry.delay_after(attempt);
                    warn!(
                        attempt,
                        max_attempts,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "Forecast request failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        };

        let value = decode(&body)?;

        if let Some(cache) = &self.cache {
            cache.put(&key, url, &body, Utc::now()).await;
        }

        Ok(value)
    }

    async fn send(&self, url: &str, params: &[(String, String)]) -> Result<String, ForecastError> {
        debug!(url, "Sending forecast request");

        let res = self
            .http
            .get(url)
            .query(params)
            .send()
            .await
            .map_err(|source| ForecastError::Request { url: url.to_string(), source })?;

        let status = res.status();
        let body = res
            .text()
            .await
            .map_err(|source| ForecastError::Request { url: url.to_string(), source })?;

        if !status.is_success() {
            return Err(ForecastError::Status {
                url: url.to_string(),
                status,
                body: truncate_body(&body),
            });
        }

        Ok(body)
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((cut, _)) => format!("{}...", &body[..cut]),
        None => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_bodies_are_kept() {
        assert_eq!(truncate_body("oops"), "oops");
    }

    #[test]
    fn long_bodies_are_truncated_on_char_boundary() {
        let body = "°".repeat(300);
        let truncated = truncate_body(&body);
        assert!(truncated.ends_with("..."));
        assert_eq!(truncated.chars().count(), 203);
    }
}
