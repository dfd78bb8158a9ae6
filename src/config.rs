//! Configuration types for web-article extraction.
//!
//! All extraction behaviour is controlled through [`ExtractionConfig`], built
//! via its [`ExtractionConfigBuilder`]. Collaborators (HTML fetcher, content
//! extractor, progress callback) are injected here as trait objects; when left
//! unset, [`crate::convert::extract`] builds the HTTP + readability defaults.

use crate::error::Web2MdError;
use crate::pipeline::extract::ContentExtractor;
use crate::pipeline::fetch::HtmlFetcher;
use crate::progress::ProgressCallback;
use chrono::format::{Item, StrftimeItems};
use std::fmt;
use std::sync::Arc;

/// Next-page markers matched (case-insensitively) against link text.
pub const DEFAULT_NEXT_LINK_MARKERS: &[&str] = &["next", "次のページ", "→"];

/// en-US calendar date, e.g. `3/7/2024`.
pub const DEFAULT_DATE_FORMAT: &str = "%-m/%-d/%Y";

/// Configuration for one extraction run.
///
/// Built via [`ExtractionConfig::builder()`] or using
/// [`ExtractionConfig::default()`].
///
/// # Example
/// ```rust
/// use edgequake_web2md::ExtractionConfig;
///
/// let config = ExtractionConfig::builder()
///     .max_pages(10)
///     .fetch_timeout_secs(15)
///     .next_link_marker("weiter")
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct ExtractionConfig {
    /// Maximum number of pages fetched in one walk. Default: 25.
    ///
    /// The visited set stops cycles; this stops long chains that never repeat
    /// (calendar archives, infinite "next" generators).
    pub max_pages: usize,

    /// Per-request HTTP timeout in seconds. Default: 30.
    pub fetch_timeout_secs: u64,

    /// Retry attempts on a transient fetch failure. Default: 2.
    pub max_retries: u32,

    /// Initial retry delay in milliseconds, doubled per attempt. Default: 500.
    pub retry_backoff_ms: u64,

    /// `User-Agent` header sent by the default HTTP fetcher.
    pub user_agent: String,

    /// Substrings that mark a link as "next page" when found in its text.
    /// Matched case-insensitively. Default: [`DEFAULT_NEXT_LINK_MARKERS`].
    pub next_link_markers: Vec<String>,

    /// Share one download per URL between the content extractor and the
    /// pagination locator. Default: true.
    pub cache_html: bool,

    /// strftime pattern for the publish-date line. Default: [`DEFAULT_DATE_FORMAT`].
    pub date_format: String,

    /// Pre-constructed HTML fetcher. If None, an `HttpFetcher` is built from
    /// the timeout/retry/user-agent fields.
    pub fetcher: Option<Arc<dyn HtmlFetcher>>,

    /// Pre-constructed content extractor. If None, a `ReadabilityExtractor`
    /// over the (possibly cached) fetcher is used.
    pub extractor: Option<Arc<dyn ContentExtractor>>,

    /// Optional progress callback.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            max_pages: 25,
            fetch_timeout_secs: 30,
            max_retries: 2,
            retry_backoff_ms: 500,
            user_agent: default_user_agent(),
            next_link_markers: DEFAULT_NEXT_LINK_MARKERS
                .iter()
                .map(|m| m.to_string())
                .collect(),
            cache_html: true,
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            fetcher: None,
            extractor: None,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for ExtractionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtractionConfig")
            .field("max_pages", &self.max_pages)
            .field("fetch_timeout_secs", &self.fetch_timeout_secs)
            .field("max_retries", &self.max_retries)
            .field("retry_backoff_ms", &self.retry_backoff_ms)
            .field("user_agent", &self.user_agent)
            .field("next_link_markers", &self.next_link_markers)
            .field("cache_html", &self.cache_html)
            .field("date_format", &self.date_format)
            .field("fetcher", &self.fetcher.as_ref().map(|_| "<dyn HtmlFetcher>"))
            .field(
                "extractor",
                &self.extractor.as_ref().map(|_| "<dyn ContentExtractor>"),
            )
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<dyn ExtractionProgressCallback>"),
            )
            .finish()
    }
}

impl ExtractionConfig {
    /// Create a new builder for `ExtractionConfig`.
    pub fn builder() -> ExtractionConfigBuilder {
        ExtractionConfigBuilder {
            config: Self::default(),
        }
    }
}

fn default_user_agent() -> String {
    format!(
        "Mozilla/5.0 (compatible; edgequake-web2md/{})",
        env!("CARGO_PKG_VERSION")
    )
}

/// Builder for [`ExtractionConfig`].
#[derive(Debug)]
pub struct ExtractionConfigBuilder {
    config: ExtractionConfig,
}

impl ExtractionConfigBuilder {
    pub fn max_pages(mut self, n: usize) -> Self {
        self.config.max_pages = n;
        self
    }

    pub fn fetch_timeout_secs(mut self, secs: u64) -> Self {
        self.config.fetch_timeout_secs = secs;
        self
    }

    pub fn max_retries(mut self, n: u32) -> Self {
        self.config.max_retries = n;
        self
    }

    pub fn retry_backoff_ms(mut self, ms: u64) -> Self {
        self.config.retry_backoff_ms = ms;
        self
    }

    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.config.user_agent = ua.into();
        self
    }

    /// Add one marker to the default set.
    pub fn next_link_marker(mut self, marker: impl Into<String>) -> Self {
        self.config.next_link_markers.push(marker.into());
        self
    }

    /// Replace the whole marker set.
    pub fn next_link_markers<I, S>(mut self, markers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.next_link_markers = markers.into_iter().map(Into::into).collect();
        self
    }

    pub fn cache_html(mut self, v: bool) -> Self {
        self.config.cache_html = v;
        self
    }

    pub fn date_format(mut self, fmt: impl Into<String>) -> Self {
        self.config.date_format = fmt.into();
        self
    }

    pub fn fetcher(mut self, fetcher: Arc<dyn HtmlFetcher>) -> Self {
        self.config.fetcher = Some(fetcher);
        self
    }

    pub fn extractor(mut self, extractor: Arc<dyn ContentExtractor>) -> Self {
        self.config.extractor = Some(extractor);
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(mut self) -> Result<ExtractionConfig, Web2MdError> {
        let c = &mut self.config;
        if c.max_pages == 0 {
            return Err(Web2MdError::InvalidConfig(
                "max_pages must be ≥ 1".into(),
            ));
        }
        if c.fetch_timeout_secs == 0 {
            return Err(Web2MdError::InvalidConfig(
                "fetch timeout must be ≥ 1 second".into(),
            ));
        }
        c.next_link_markers.retain(|m| !m.trim().is_empty());
        if StrftimeItems::new(&c.date_format).any(|item| matches!(item, Item::Error)) {
            return Err(Web2MdError::InvalidConfig(format!(
                "invalid date format '{}'",
                c.date_format
            )));
        }
        Ok(self.config)
    }
}
