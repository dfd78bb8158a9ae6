//! Output types: per-page extraction results and the assembled document.

use serde::{Deserialize, Serialize};

/// Fields produced by a [`crate::pipeline::extract::ContentExtractor`] for
/// one URL. Every field is optional: extractors may return partial data.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedArticle {
    pub title: Option<String>,
    pub author: Option<String>,
    /// Publication date as found in the page, ISO-8601 or similar.
    pub date_published: Option<String>,
    pub excerpt: Option<String>,
    /// Article body, Markdown or pre-rendered text that may still contain
    /// HTML-escaped fragments.
    pub content: Option<String>,
    pub domain: Option<String>,
}

/// One extracted page of a (possibly multi-page) article.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageResult {
    /// 1-indexed position of this page in the walk.
    pub page_num: usize,
    /// The URL fetched to produce this result.
    pub source_url: String,
    pub title: Option<String>,
    pub author: Option<String>,
    pub date_published: Option<String>,
    pub excerpt: Option<String>,
    pub content: Option<String>,
    pub domain: Option<String>,
}

impl PageResult {
    pub fn new(page_num: usize, source_url: impl Into<String>, article: ParsedArticle) -> Self {
        Self {
            page_num,
            source_url: source_url.into(),
            title: article.title,
            author: article.author,
            date_published: article.date_published,
            excerpt: article.excerpt,
            content: article.content,
            domain: article.domain,
        }
    }

    /// Byte length of the page content, 0 when absent.
    pub fn content_len(&self) -> usize {
        self.content.as_deref().map_or(0, str::len)
    }
}

/// Why the pagination walk stopped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum StopReason {
    /// The last page had no discoverable next-page link.
    NoNextPage,
    /// The next-page link pointed at a page already fetched in this walk.
    AlreadyVisited { url: String },
    /// The configured page limit was reached.
    PageLimit { limit: usize },
}

/// Statistics about one extraction run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionStats {
    pub pages_fetched: usize,
    pub stop_reason: StopReason,
    pub total_duration_ms: u64,
}

/// The complete result of [`crate::convert::extract`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionOutput {
    /// The assembled Markdown document.
    pub markdown: String,
    /// Every page in walk order.
    pub pages: Vec<PageResult>,
    pub stats: ExtractionStats,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_result_takes_article_fields() {
        let article = ParsedArticle {
            title: Some("T".into()),
            content: Some("body".into()),
            domain: Some("example.com".into()),
            ..Default::default()
        };
        let page = PageResult::new(2, "https://example.com/p2", article);
        assert_eq!(page.page_num, 2);
        assert_eq!(page.source_url, "https://example.com/p2");
        assert_eq!(page.title.as_deref(), Some("T"));
        assert_eq!(page.author, None);
        assert_eq!(page.content_len(), 4);
    }

    #[test]
    fn stop_reason_serialises_with_tag() {
        let json = serde_json::to_string(&StopReason::PageLimit { limit: 3 }).unwrap();
        assert_eq!(json, r#"{"reason":"page_limit","limit":3}"#);
        let json = serde_json::to_string(&StopReason::NoNextPage).unwrap();
        assert_eq!(json, r#"{"reason":"no_next_page"}"#);
    }
}
