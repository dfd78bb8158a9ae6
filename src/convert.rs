//! Extraction entry points and the multi-page aggregator.
//!
//! [`extract`] validates the URL, walks the article page by page (extract the
//! current page, ask the pagination locator for its successor, repeat) and
//! renders every collected page into one Markdown document.
//!
//! Pages are strictly sequential: the next URL is only known once the current
//! page's HTML has been inspected. The walk ends when no successor is found,
//! when the successor was already visited, or when `max_pages` is reached.
//! An extractor failure on any page aborts the walk; a pagination failure
//! only ends it.

use crate::config::ExtractionConfig;
use crate::error::Web2MdError;
use crate::output::{ExtractionOutput, ExtractionStats, PageResult, StopReason};
use crate::pipeline::extract::{ContentExtractor, ReadabilityExtractor};
use crate::pipeline::fetch::{CachedFetcher, HtmlFetcher, HttpFetcher};
use crate::pipeline::input::{self, visit_key};
use crate::pipeline::paginate::{NextLinkMatcher, PaginationLocator};
use crate::pipeline::render;
use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, warn};
use url::Url;

/// Prefix of every failure string returned by [`extract_content_to_markdown`].
pub const ERROR_PREFIX: &str = "Error: ";

/// Extract a (possibly paginated) article from `url` as Markdown.
///
/// This is the primary entry point for the library.
///
/// # Errors
/// - [`Web2MdError::InvalidUrl`] before any network access when `url` is not
///   an absolute HTTP/HTTPS URL
/// - [`Web2MdError::ExtractionFailed`] when the content extractor fails on
///   any page of the walk
///
/// Failures while looking for the next page are not errors: the walk simply
/// ends at the current page.
pub async fn extract(
    input_str: impl AsRef<str>,
    config: &ExtractionConfig,
) -> Result<ExtractionOutput, Web2MdError> {
    let total_start = Instant::now();
    let input_str = input_str.as_ref().trim();
    info!("Starting extraction: {}", input_str);

    // ── Step 1: Validate input ───────────────────────────────────────────
    let start_url = input::validate_url(input_str)?;

    // ── Step 2: Resolve collaborators ────────────────────────────────────
    let fetcher = resolve_fetcher(config)?;
    let extractor = resolve_extractor(config, &fetcher);
    let locator = PaginationLocator::new(
        Arc::clone(&fetcher),
        NextLinkMatcher::new(&config.next_link_markers),
    )
    .with_progress(config.progress_callback.clone());

    if let Some(ref cb) = config.progress_callback {
        cb.on_extraction_start(input_str);
    }

    // ── Step 3: Walk the pages ───────────────────────────────────────────
    let (pages, stop_reason) = walk(start_url, extractor.as_ref(), &locator, config).await?;

    // ── Step 4: Render ───────────────────────────────────────────────────
    let markdown = render::render_markdown_with(&pages, input_str, &config.date_format);

    let stats = ExtractionStats {
        pages_fetched: pages.len(),
        stop_reason,
        total_duration_ms: total_start.elapsed().as_millis() as u64,
    };

    info!(
        "Extraction complete: {} page(s), {}ms, stopped: {:?}",
        stats.pages_fetched, stats.total_duration_ms, stats.stop_reason
    );

    if let Some(ref cb) = config.progress_callback {
        cb.on_extraction_complete(pages.len());
    }

    Ok(ExtractionOutput {
        markdown,
        pages,
        stats,
    })
}

/// Extract an article and write the Markdown directly to a file.
///
/// Uses atomic write (temp file + rename) to prevent partial files.
pub async fn extract_to_file(
    input_str: impl AsRef<str>,
    output_path: impl AsRef<Path>,
    config: &ExtractionConfig,
) -> Result<ExtractionStats, Web2MdError> {
    let output = extract(input_str, config).await?;
    let path = output_path.as_ref();
    let write_failed = |source| Web2MdError::OutputWriteFailed {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(write_failed)?;
    }

    let tmp_path = path.with_extension("md.tmp");
    tokio::fs::write(&tmp_path, &output.markdown)
        .await
        .map_err(write_failed)?;
    tokio::fs::rename(&tmp_path, path)
        .await
        .map_err(write_failed)?;

    Ok(output.stats)
}

/// Synchronous wrapper around [`extract`].
///
/// Creates a temporary tokio runtime internally.
pub fn extract_sync(
    input_str: impl AsRef<str>,
    config: &ExtractionConfig,
) -> Result<ExtractionOutput, Web2MdError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| Web2MdError::Internal(format!("Failed to create tokio runtime: {}", e)))?
        .block_on(extract(input_str, config))
}

/// Extract with the default configuration; never fails.
///
/// Returns the Markdown document, or a string starting with
/// [`ERROR_PREFIX`] followed by a human-readable message.
pub async fn extract_content_to_markdown(url: &str) -> String {
    extract_content_to_markdown_with(url, &ExtractionConfig::default()).await
}

/// [`extract_content_to_markdown`] with an explicit configuration.
pub async fn extract_content_to_markdown_with(url: &str, config: &ExtractionConfig) -> String {
    match extract(url, config).await {
        Ok(output) => output.markdown,
        Err(e) => {
            error!("Extraction of {} failed: {}", url, e);
            format!("{ERROR_PREFIX}{e}")
        }
    }
}

// ── Internal helpers ─────────────────────────────────────────────────────

/// The fetcher shared by the extractor and the locator for this run.
///
/// 1. **Pre-built fetcher** (`config.fetcher`): used as-is.
/// 2. **HTTP fetcher** built from timeout, retry and user-agent settings.
///
/// Either one is wrapped in a fresh [`CachedFetcher`] when `cache_html` is on.
fn resolve_fetcher(config: &ExtractionConfig) -> Result<Arc<dyn HtmlFetcher>, Web2MdError> {
    let base: Arc<dyn HtmlFetcher> = match config.fetcher {
        Some(ref fetcher) => Arc::clone(fetcher),
        None => Arc::new(HttpFetcher::from_config(config)?),
    };

    if config.cache_html {
        Ok(Arc::new(CachedFetcher::new(base)))
    } else {
        Ok(base)
    }
}

fn resolve_extractor(
    config: &ExtractionConfig,
    fetcher: &Arc<dyn HtmlFetcher>,
) -> Arc<dyn ContentExtractor> {
    match config.extractor {
        Some(ref extractor) => Arc::clone(extractor),
        None => Arc::new(ReadabilityExtractor::new(Arc::clone(fetcher))),
    }
}

/// The fetch → extract → follow loop.
///
/// Every URL enters `visited` as it becomes the current page, and a candidate
/// already in `visited` ends the walk, so each page is extracted at most once.
async fn walk(
    start_url: Url,
    extractor: &dyn ContentExtractor,
    locator: &PaginationLocator,
    config: &ExtractionConfig,
) -> Result<(Vec<PageResult>, StopReason), Web2MdError> {
    let mut visited: HashSet<String> = HashSet::new();
    let mut pages: Vec<PageResult> = Vec::new();
    let mut current = Some(start_url);
    let mut stop_reason = StopReason::NoNextPage;

    while let Some(url) = current.take() {
        visited.insert(visit_key(&url));
        let page_num = pages.len() + 1;

        info!("Fetching page {}: {}", page_num, url);
        if let Some(ref cb) = config.progress_callback {
            cb.on_page_start(page_num, url.as_str());
        }

        let article = extractor
            .parse(&url)
            .await
            .map_err(|source| Web2MdError::ExtractionFailed {
                url: url.to_string(),
                source,
            })?;
        let page = PageResult::new(page_num, url.as_str(), article);

        if let Some(ref cb) = config.progress_callback {
            cb.on_page_complete(page_num, url.as_str(), page.content_len());
        }
        pages.push(page);

        if pages.len() >= config.max_pages {
            warn!("Page limit of {} reached at {}", config.max_pages, url);
            stop_reason = StopReason::PageLimit {
                limit: config.max_pages,
            };
            break;
        }

        let Some(next) = locator.find_next(url.as_str()).await else {
            stop_reason = StopReason::NoNextPage;
            break;
        };
        let next_url = match Url::parse(&next) {
            Ok(next_url) => next_url,
            Err(e) => {
                warn!("Discarding next-page candidate {}: {}", next, e);
                stop_reason = StopReason::NoNextPage;
                break;
            }
        };

        if visited.contains(&visit_key(&next_url)) {
            debug!("Next page {} already visited, stopping", next);
            stop_reason = StopReason::AlreadyVisited { url: next };
            break;
        }

        if let Some(ref cb) = config.progress_callback {
            cb.on_next_page(page_num, &next);
        }
        current = Some(next_url);
    }

    Ok((pages, stop_reason))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn invalid_url_becomes_error_string() {
        let out = extract_content_to_markdown("ftp://example.com/file").await;
        assert!(out.starts_with(ERROR_PREFIX), "got: {out}");
        assert!(out.contains("ftp://example.com/file"));
    }

    #[tokio::test]
    async fn garbage_input_becomes_error_string() {
        let out = extract_content_to_markdown("definitely not a url").await;
        assert!(out.starts_with("Error: Invalid URL"), "got: {out}");
    }

    #[test]
    fn extract_sync_validates_before_network() {
        let err = extract_sync("", &ExtractionConfig::default()).unwrap_err();
        assert!(matches!(err, Web2MdError::InvalidUrl { .. }));
    }

    #[test]
    fn default_extractor_shares_fetcher() {
        let config = ExtractionConfig::default();
        let fetcher = resolve_fetcher(&config).unwrap();
        let extractor = resolve_extractor(&config, &fetcher);
        // Default extractor shares the fetcher: one Arc held here, one by the extractor.
        assert_eq!(Arc::strong_count(&fetcher), 2);
        drop(extractor);
        assert_eq!(Arc::strong_count(&fetcher), 1);
    }
}
