//! Pagination discovery: find the URL of the page that follows a given page.
//!
//! The locator fetches the page's raw HTML, parses it with `scraper`, and
//! runs an ordered list of strategies; the first strategy that yields an
//! `href` wins:
//!
//! 1. [`explicit_next_link`] — an `<a href>` whose text contains a next
//!    marker ("next", "次のページ", "→", …) or whose `rel` is exactly `next`
//! 2. [`numbered_pagination`] — inside a pagination container, the link right
//!    after the current-page marker
//!
//! The winning `href` is resolved against `<base href>` (or the page URL).
//! If it does not resolve to an HTTP(S) URL the call yields no candidate;
//! later strategies are not consulted.
//!
//! [`PaginationLocator::find_next`] never fails. Every error is logged,
//! reported through the progress callback and mapped to `None`.

use crate::error::PaginationError;
use crate::pipeline::fetch::HtmlFetcher;
use crate::progress::ProgressCallback;
use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};
use scraper::{ElementRef, Html, Selector};
use std::sync::Arc;
use tracing::{debug, warn};
use url::Url;

static LINKS: Lazy<Selector> = Lazy::new(|| Selector::parse("a[href]").unwrap());
static BASE: Lazy<Selector> = Lazy::new(|| Selector::parse("base[href]").unwrap());
static CONTAINER_CANDIDATES: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".pagination, nav, [aria-label]").unwrap());
static CURRENT_MARKER: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#".current, .active, [aria-current="page"]"#).unwrap());

/// A pagination strategy: inspect the document, return the raw `href` of the
/// next-page link if this strategy recognises one.
type Strategy = fn(&Html, &NextLinkMatcher) -> Option<String>;

/// Strategies in priority order.
const STRATEGIES: &[(&str, Strategy)] = &[
    ("explicit-next-link", explicit_next_link),
    ("numbered-pagination", numbered_pagination),
];

/// Case-insensitive substring matcher over the configured next-page markers.
#[derive(Debug, Clone)]
pub struct NextLinkMatcher {
    pattern: Option<Regex>,
}

impl NextLinkMatcher {
    pub fn new<S: AsRef<str>>(markers: &[S]) -> Self {
        let alternatives: Vec<String> = markers
            .iter()
            .map(|m| m.as_ref().trim())
            .filter(|m| !m.is_empty())
            .map(regex::escape)
            .collect();
        if alternatives.is_empty() {
            return Self { pattern: None };
        }

        let pattern = RegexBuilder::new(&alternatives.join("|"))
            .case_insensitive(true)
            .build()
            .map_err(|e| warn!("Next-link markers rejected, text matching disabled: {}", e))
            .ok();
        Self { pattern }
    }

    /// Whether `text` contains any marker.
    pub fn is_match(&self, text: &str) -> bool {
        self.pattern.as_ref().is_some_and(|re| re.is_match(text))
    }
}

/// Finds the next page of an article by inspecting its HTML.
pub struct PaginationLocator {
    fetcher: Arc<dyn HtmlFetcher>,
    matcher: NextLinkMatcher,
    progress: Option<ProgressCallback>,
}

impl PaginationLocator {
    pub fn new(fetcher: Arc<dyn HtmlFetcher>, matcher: NextLinkMatcher) -> Self {
        Self {
            fetcher,
            matcher,
            progress: None,
        }
    }

    pub fn with_progress(mut self, progress: Option<ProgressCallback>) -> Self {
        self.progress = progress;
        self
    }

    /// Absolute URL of the page following `url`, or `None`.
    pub async fn find_next(&self, url: &str) -> Option<String> {
        match self.try_find_next(url).await {
            Ok(candidate) => candidate,
            Err(e) => {
                warn!("Pagination lookup failed for {}: {}", url, e);
                if let Some(ref cb) = self.progress {
                    cb.on_pagination_error(url, &e.to_string());
                }
                None
            }
        }
    }

    async fn try_find_next(&self, url: &str) -> Result<Option<String>, PaginationError> {
        let page_url = Url::parse(url).map_err(|e| PaginationError::InvalidPageUrl {
            url: url.to_string(),
            reason: e.to_string(),
        })?;
        let html = self.fetcher.fetch(&page_url).await?;
        find_next_in_html(&html, &page_url, &self.matcher)
    }
}

/// Run the strategy chain over already-fetched HTML.
pub fn find_next_in_html(
    html: &str,
    page_url: &Url,
    matcher: &NextLinkMatcher,
) -> Result<Option<String>, PaginationError> {
    let document = Html::parse_document(html);

    let Some((strategy, href)) = STRATEGIES
        .iter()
        .find_map(|(name, strategy)| strategy(&document, matcher).map(|href| (*name, href)))
    else {
        debug!("No next-page link on {}", page_url);
        return Ok(None);
    };

    let base = document_base(&document, page_url);
    let next = resolve_href(&base, &href)?;
    debug!("{} found next page {} on {}", strategy, next, page_url);
    Ok(Some(next))
}

// ── Strategy 1: explicit next link ───────────────────────────────────────────

/// First `<a href>` in document order whose text contains a next marker or
/// whose `rel` is exactly `next`.
pub fn explicit_next_link(document: &Html, matcher: &NextLinkMatcher) -> Option<String> {
    document
        .select(&LINKS)
        .find(|link| is_next_link(link, matcher))
        .and_then(|link| link.value().attr("href"))
        .map(str::to_string)
}

fn is_next_link(link: &ElementRef<'_>, matcher: &NextLinkMatcher) -> bool {
    if link.value().attr("rel") == Some("next") {
        return true;
    }
    let text: String = link.text().collect();
    matcher.is_match(text.trim())
}

// ── Strategy 2: numbered pagination ──────────────────────────────────────────

/// Inside the first pagination container with a current-page marker that has
/// a following link: that link's `href`.
pub fn numbered_pagination(document: &Html, _matcher: &NextLinkMatcher) -> Option<String> {
    document
        .select(&CONTAINER_CANDIDATES)
        .filter(is_pagination_container)
        .find_map(|container| {
            let current = container.select(&CURRENT_MARKER).next()?;
            link_after(current)
        })
}

fn is_pagination_container(el: &ElementRef<'_>) -> bool {
    let element = el.value();
    element.name() == "nav"
        || element.classes().any(|class| class == "pagination")
        || element
            .attr("aria-label")
            .is_some_and(|label| label.to_lowercase().contains("pag"))
}

/// The link immediately following the current-page marker. When the marker
/// is wrapped in a list item with no following link, the list item's siblings
/// are searched instead.
fn link_after(marker: ElementRef<'_>) -> Option<String> {
    sibling_link(marker).or_else(|| {
        let parent = marker.parent().and_then(ElementRef::wrap)?;
        if parent.value().name() == "li" {
            sibling_link(parent)
        } else {
            None
        }
    })
}

/// Link in the next element sibling, skipping text nodes such as whitespace
/// or " | " separators in between.
fn sibling_link(el: ElementRef<'_>) -> Option<String> {
    el.next_siblings()
        .find_map(ElementRef::wrap)
        .and_then(link_in)
}

/// The element itself when it is a link, otherwise its first descendant link.
fn link_in(el: ElementRef<'_>) -> Option<String> {
    let link = if el.value().name() == "a" {
        Some(el)
    } else {
        el.select(&LINKS).next()
    };
    link.and_then(|a| a.value().attr("href"))
        .map(str::to_string)
}

// ── Href resolution ──────────────────────────────────────────────────────────

/// `<base href>` resolved against the page URL, or the page URL itself.
fn document_base(document: &Html, page_url: &Url) -> Url {
    document
        .select(&BASE)
        .next()
        .and_then(|base| base.value().attr("href"))
        .and_then(|href| match page_url.join(href.trim()) {
            Ok(url) => Some(url),
            Err(e) => {
                debug!("Ignoring unusable <base href=\"{}\">: {}", href, e);
                None
            }
        })
        .unwrap_or_else(|| page_url.clone())
}

fn resolve_href(base: &Url, href: &str) -> Result<String, PaginationError> {
    let unresolvable = |reason: String| PaginationError::UnresolvableHref {
        href: href.to_string(),
        reason,
    };
    let url = base
        .join(href.trim())
        .map_err(|e| unresolvable(e.to_string()))?;
    match url.scheme() {
        "http" | "https" => Ok(url.to_string()),
        other => Err(unresolvable(format!("scheme '{other}' is not http(s)"))),
    }
}
