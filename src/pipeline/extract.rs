//! Content extraction: turn one page URL into structured article fields.
//!
//! [`ContentExtractor`] is the contract the aggregator consumes. The default
//! [`ReadabilityExtractor`] downloads the page through an [`HtmlFetcher`],
//! runs `readabilityrs` on a blocking thread (its DOM is not `Send`),
//! converts the cleaned article HTML to Markdown with `htmd` and tidies the
//! result with [`postprocess::clean_markdown`].

use crate::error::ExtractError;
use crate::output::ParsedArticle;
use crate::pipeline::fetch::HtmlFetcher;
use crate::pipeline::postprocess;
use async_trait::async_trait;
use readabilityrs::{Article, Readability};
use std::sync::Arc;
use tracing::{debug, warn};
use url::Url;

/// Extracts title, author, date, excerpt, content and domain from a page.
///
/// Implementations may return partial data (any field `None`). An `Err`
/// aborts the whole multi-page extraction.
#[async_trait]
pub trait ContentExtractor: Send + Sync {
    async fn parse(&self, url: &Url) -> Result<ParsedArticle, ExtractError>;
}

/// Default extractor backed by the readability algorithm.
pub struct ReadabilityExtractor {
    fetcher: Arc<dyn HtmlFetcher>,
}

impl ReadabilityExtractor {
    pub fn new(fetcher: Arc<dyn HtmlFetcher>) -> Self {
        Self { fetcher }
    }
}

#[async_trait]
impl ContentExtractor for ReadabilityExtractor {
    async fn parse(&self, url: &Url) -> Result<ParsedArticle, ExtractError> {
        let html = self.fetcher.fetch(url).await?;
        let page_url = url.to_string();

        let article = tokio::task::spawn_blocking(move || run_readability(&html, &page_url))
            .await
            .map_err(|e| ExtractError::Engine(format!("readability task panicked: {e}")))??;

        let domain = url.host_str().map(str::to_string);
        match article {
            Some(article) => Ok(article_to_parsed(article, domain)),
            None => {
                warn!("No readable article content found at {}", url);
                Ok(ParsedArticle {
                    domain,
                    ..Default::default()
                })
            }
        }
    }
}

fn run_readability(html: &str, url: &str) -> Result<Option<Article>, ExtractError> {
    let readability = Readability::new(html, Some(url), None)
        .map_err(|e| ExtractError::Engine(e.to_string()))?;
    Ok(readability.parse())
}

/// Map a readability [`Article`] onto the extractor contract.
fn article_to_parsed(article: Article, domain: Option<String>) -> ParsedArticle {
    let content = article
        .content
        .as_deref()
        .map(|html| html_to_markdown(html, article.text_content.as_deref()))
        .filter(|md| !md.is_empty());

    ParsedArticle {
        title: non_empty(article.title),
        author: non_empty(article.byline),
        date_published: non_empty(article.published_time),
        excerpt: non_empty(article.excerpt),
        content,
        domain,
    }
}

/// Convert article HTML to Markdown, falling back to the plain-text rendering
/// when the converter rejects the input.
fn html_to_markdown(html: &str, text_fallback: Option<&str>) -> String {
    match htmd::convert(html) {
        Ok(md) => postprocess::clean_markdown(&md),
        Err(e) => {
            debug!("HTML to Markdown conversion failed: {}", e);
            postprocess::clean_markdown(text_fallback.unwrap_or_default())
        }
    }
}

fn non_empty(field: Option<String>) -> Option<String> {
    field
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}
