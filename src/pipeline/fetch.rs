//! Raw HTML fetching.
//!
//! [`HtmlFetcher`] is the seam through which both the content extractor and
//! the pagination locator obtain page HTML. [`HttpFetcher`] is the reqwest
//! implementation; [`CachedFetcher`] wraps any fetcher so one extraction run
//! downloads each page once even though two components read it.
//!
//! ## Retry Strategy
//!
//! Timeouts, connection failures, HTTP 429 and 5xx are retried with
//! exponential backoff (`retry_backoff_ms * 2^attempt`). Other statuses fail
//! immediately.

use crate::config::ExtractionConfig;
use crate::error::{FetchError, Web2MdError};
use crate::pipeline::input::visit_key;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, warn};
use url::Url;

/// Fetches the raw HTML of a page.
#[async_trait]
pub trait HtmlFetcher: Send + Sync {
    async fn fetch(&self, url: &Url) -> Result<String, FetchError>;
}

/// reqwest-backed fetcher with timeout and retry.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
    timeout_secs: u64,
    max_retries: u32,
    retry_backoff_ms: u64,
}

impl HttpFetcher {
    /// Build a fetcher from the timeout, retry and user-agent settings.
    pub fn from_config(config: &ExtractionConfig) -> Result<Self, Web2MdError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.fetch_timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| Web2MdError::Internal(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            timeout_secs: config.fetch_timeout_secs,
            max_retries: config.max_retries,
            retry_backoff_ms: config.retry_backoff_ms,
        })
    }

    async fn fetch_once(&self, url: &Url) -> Result<String, FetchError> {
        let response = self
            .client
            .get(url.clone())
            .header(reqwest::header::ACCEPT, "text/html,application/xhtml+xml;q=0.9,*/*;q=0.8")
            .send()
            .await
            .map_err(|e| self.map_request_error(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response.text().await.map_err(|e| FetchError::Body {
            url: url.to_string(),
            reason: e.to_string(),
        })
    }

    fn map_request_error(&self, url: &Url, e: reqwest::Error) -> FetchError {
        if e.is_timeout() {
            FetchError::Timeout {
                url: url.to_string(),
                secs: self.timeout_secs,
            }
        } else {
            FetchError::Request {
                url: url.to_string(),
                reason: e.to_string(),
            }
        }
    }
}

#[async_trait]
impl HtmlFetcher for HttpFetcher {
    async fn fetch(&self, url: &Url) -> Result<String, FetchError> {
        let mut attempt = 0;
        loop {
            match self.fetch_once(url).await {
                Ok(body) => {
                    debug!("Fetched {} ({} bytes)", url, body.len());
                    return Ok(body);
                }
                Err(e) if e.is_transient() && attempt < self.max_retries => {
                    let backoff = backoff_delay_ms(self.retry_backoff_ms, attempt);
                    attempt += 1;
                    warn!(
                        "{}: retry {}/{} after {}ms: {}",
                        url, attempt, self.max_retries, backoff, e
                    );
                    sleep(Duration::from_millis(backoff)).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

/// `base_ms * 2^attempt`, saturating at `u64::MAX` for large settings.
fn backoff_delay_ms(base_ms: u64, attempt: u32) -> u64 {
    base_ms.saturating_mul(1u64.checked_shl(attempt).unwrap_or(u64::MAX))
}

/// Memoises successful fetches by URL (fragment ignored).
///
/// Scoped to one extraction run: [`crate::convert::extract`] creates a fresh
/// cache per call. Failures are not cached.
pub struct CachedFetcher {
    inner: Arc<dyn HtmlFetcher>,
    pages: Mutex<HashMap<String, String>>,
}

impl CachedFetcher {
    pub fn new(inner: Arc<dyn HtmlFetcher>) -> Self {
        Self {
            inner,
            pages: Mutex::new(HashMap::new()),
        }
    }

    fn lookup(&self, key: &str) -> Option<String> {
        let pages = self.pages.lock().unwrap_or_else(|e| e.into_inner());
        pages.get(key).cloned()
    }
}

#[async_trait]
impl HtmlFetcher for CachedFetcher {
    async fn fetch(&self, url: &Url) -> Result<String, FetchError> {
        let key = visit_key(url);
        if let Some(html) = self.lookup(&key) {
            debug!("HTML cache hit: {}", key);
            return Ok(html);
        }

        let html = self.inner.fetch(url).await?;
        self.pages
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(key, html.clone());
        Ok(html)
    }
}
