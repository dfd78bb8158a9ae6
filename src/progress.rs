//! Progress-callback trait for per-page extraction events.
//!
//! Inject an [`Arc<dyn ExtractionProgressCallback>`] via
//! [`crate::config::ExtractionConfigBuilder::progress_callback`] to receive
//! events as the walk fetches each page and looks for the next one. The
//! library itself never prints; it emits `tracing` events and calls this
//! trait, so hosts decide where diagnostics go.
//!
//! # Example
//!
//! ```rust
//! use edgequake_web2md::{ExtractionConfig, ExtractionProgressCallback};
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct CountingCallback {
//!     pages: AtomicUsize,
//! }
//!
//! impl ExtractionProgressCallback for CountingCallback {
//!     fn on_page_complete(&self, page_num: usize, url: &str, content_len: usize) {
//!         self.pages.fetch_add(1, Ordering::SeqCst);
//!         eprintln!("page {page_num} ({content_len} bytes): {url}");
//!     }
//! }
//!
//! let counter = Arc::new(CountingCallback { pages: AtomicUsize::new(0) });
//!
//! let config = ExtractionConfig::builder()
//!     .progress_callback(counter as Arc<dyn ExtractionProgressCallback>)
//!     .build()
//!     .unwrap();
//! ```

use std::sync::Arc;

/// Called by the aggregator as it walks the pages of an article.
///
/// All methods have default no-op implementations so callers only override
/// what they care about. Pages are fetched sequentially, so calls for one
/// extraction never overlap; the `Send + Sync` bound lets one callback serve
/// several concurrent extractions.
pub trait ExtractionProgressCallback: Send + Sync {
    /// Called once, after URL validation and before the first fetch.
    fn on_extraction_start(&self, url: &str) {
        let _ = url;
    }

    /// Called just before the content extractor runs for a page.
    ///
    /// # Arguments
    /// * `page_num` — 1-indexed position in the walk
    /// * `url`      — the page being extracted
    fn on_page_start(&self, page_num: usize, url: &str) {
        let _ = (page_num, url);
    }

    /// Called when a page has been extracted.
    ///
    /// # Arguments
    /// * `page_num`    — 1-indexed position in the walk
    /// * `url`         — the page that was extracted
    /// * `content_len` — byte length of the extracted content (0 if absent)
    fn on_page_complete(&self, page_num: usize, url: &str, content_len: usize) {
        let _ = (page_num, url, content_len);
    }

    /// Called when the locator found a successor for `page_num`.
    fn on_next_page(&self, page_num: usize, next_url: &str) {
        let _ = (page_num, next_url);
    }

    /// Called when the pagination locator swallowed an error for `url`.
    /// The walk continues as if no next page existed.
    fn on_pagination_error(&self, url: &str, error: &str) {
        let _ = (url, error);
    }

    /// Called once after the walk ends successfully.
    fn on_extraction_complete(&self, total_pages: usize) {
        let _ = total_pages;
    }
}

/// A no-op implementation for callers that must pass a callback but don't
/// need progress events. Leaving `progress_callback` unset behaves the same.
pub struct NoopProgressCallback;

impl ExtractionProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::ExtractionConfig`].
pub type ProgressCallback = Arc<dyn ExtractionProgressCallback>;
