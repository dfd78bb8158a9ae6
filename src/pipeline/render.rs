//! Markdown rendering of the ordered page list.
//!
//! Document layout, using the first page's metadata:
//!
//! ```text
//! # <title>
//!
//! *Author: <author>*
//!
//! *Published: <date>*
//!
//! ## Summary
//! <excerpt>
//!
//! ## Content
//! <page 1 content>
//!
//! ### Page 2
//!
//! <page 2 content>
//!
//! ---
//! *Source: [<domain>](<original url>)*
//! ```
//!
//! Author, date and summary lines appear only when present. Every embedded
//! field goes through [`normalize_text`] first.

use crate::config::DEFAULT_DATE_FORMAT;
use crate::output::PageResult;
use crate::pipeline::normalize::normalize_text;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use std::fmt::Write;
use tracing::warn;

/// Returned for an empty page list.
pub const NO_CONTENT: &str = "No content could be extracted.";

/// Heading used when the first page has no title.
pub const UNTITLED: &str = "Untitled";

/// Render with the default en-US date format.
pub fn render_markdown(pages: &[PageResult], original_url: &str) -> String {
    render_markdown_with(pages, original_url, DEFAULT_DATE_FORMAT)
}

/// Render with a custom strftime pattern for the publish-date line.
pub fn render_markdown_with(pages: &[PageResult], original_url: &str, date_format: &str) -> String {
    let Some(first) = pages.first() else {
        return NO_CONTENT.to_string();
    };

    let mut md = String::new();

    let title = normalize_text(first.title.as_deref());
    let title = if title.is_empty() { UNTITLED } else { title.as_str() };
    md.push_str(&format!("# {title}\n\n"));

    if let Some(author) = non_empty(&first.author) {
        md.push_str(&format!("*Author: {}*\n\n", normalize_text(Some(author))));
    }

    if let Some(date) = non_empty(&first.date_published).and_then(|d| format_date(d, date_format)) {
        md.push_str(&format!("*Published: {date}*\n\n"));
    }

    if let Some(excerpt) = non_empty(&first.excerpt) {
        md.push_str(&format!("## Summary\n{}\n\n", normalize_text(Some(excerpt))));
    }

    md.push_str("## Content\n");
    for (i, page) in pages.iter().enumerate() {
        if i > 0 {
            md.push_str(&format!("### Page {}\n\n", i + 1));
        }
        if let Some(content) = non_empty(&page.content) {
            md.push_str(&normalize_text(Some(content)));
            md.push_str("\n\n");
        }
    }

    let domain = normalize_text(first.domain.as_deref());
    md.push_str(&format!("---\n*Source: [{domain}]({original_url})*"));
    md
}

fn non_empty(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|s| !s.trim().is_empty())
}

/// ISO-8601 shapes beyond RFC 3339: offsets without a colon, `Z`, or no
/// seconds (`2024-03-07T10:00:00+0000`, `2024-03-07T10:00Z`).
const OFFSET_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f%#z", "%Y-%m-%dT%H:%M%#z"];

/// Offset-free timestamps, read as calendar dates.
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
];

/// Render `raw` as a calendar date, or `None` when it cannot be parsed.
///
/// Accepted: RFC 3339, RFC 2822, ISO-8601 with `±hhmm`/`±hh:mm`/`Z` offsets
/// and optional seconds, offset-free `YYYY-MM-DD[T| ]HH:MM[:SS[.f]]` and
/// `YYYY-MM-DD`. Offsets are kept as written, so the calendar date is the one
/// at the publisher's location.
///
/// A pattern that cannot format a date (`%Q`, or a time field such as `%H`)
/// falls back to [`DEFAULT_DATE_FORMAT`].
pub fn format_date(raw: &str, date_format: &str) -> Option<String> {
    let date = parse_date(raw.trim())?;
    write_date(date, date_format).or_else(|| {
        warn!("Date format '{}' cannot render a date, using default", date_format);
        write_date(date, DEFAULT_DATE_FORMAT)
    })
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    DateTime::parse_from_rfc3339(raw)
        .or_else(|_| DateTime::parse_from_rfc2822(raw))
        .ok()
        .or_else(|| {
            OFFSET_FORMATS
                .iter()
                .find_map(|fmt| DateTime::parse_from_str(raw, fmt).ok())
        })
        .map(|dt| dt.date_naive())
        .or_else(|| {
            NAIVE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
                .map(|dt| dt.date())
        })
        .or_else(|| NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok())
}

/// `None` when the pattern is invalid; `to_string` would panic instead.
fn write_date(date: NaiveDate, date_format: &str) -> Option<String> {
    let mut out = String::new();
    write!(out, "{}", date.format(date_format)).ok()?;
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::ParsedArticle;

    fn page(n: usize, article: ParsedArticle) -> PageResult {
        PageResult::new(n, format!("https://x.test/{n}"), article)
    }

    fn content(n: usize, body: &str) -> PageResult {
        page(
            n,
            ParsedArticle {
                content: Some(body.into()),
                ..Default::default()
            },
        )
    }

    #[test]
    fn empty_list_renders_sentinel() {
        assert_eq!(render_markdown(&[], "https://x.test"), NO_CONTENT);
    }

    #[test]
    fn header_with_title_and_author() {
        let first = page(
            1,
            ParsedArticle {
                title: Some("Hello &amp; Welcome".into()),
                author: Some("Jane Doe".into()),
                ..Default::default()
            },
        );
        let md = render_markdown(&[first], "https://x.test/a");
        assert!(
            md.starts_with("# Hello & Welcome\n\n*Author: Jane Doe*\n\n"),
            "got: {md}"
        );
    }

    #[test]
    fn missing_title_uses_placeholder() {
        let md = render_markdown(&[content(1, "A")], "https://x.test/a");
        assert!(md.starts_with("# Untitled\n\n## Content\n"), "got: {md}");
    }

    #[test]
    fn page_markers_only_after_first_page() {
        let md = render_markdown(&[content(1, "A"), content(2, "B")], "https://x.test/a");
        assert!(md.contains("## Content\nA\n\n### Page 2\n\nB\n\n"), "got: {md}");
        assert!(!md.contains("### Page 1"));
    }

    #[test]
    fn page_without_content_keeps_its_marker() {
        let md = render_markdown(
            &[content(1, "A"), page(2, ParsedArticle::default()), content(3, "C")],
            "https://x.test/a",
        );
        assert!(md.contains("A\n\n### Page 2\n\n### Page 3\n\nC\n\n"), "got: {md}");
    }

    #[test]
    fn full_document_layout() {
        let first = page(
            1,
            ParsedArticle {
                title: Some("Title".into()),
                author: Some("Ann".into()),
                date_published: Some("2024-03-07T10:00:00Z".into()),
                excerpt: Some("Short \\\"summary\\\"".into()),
                content: Some("Body\\nline".into()),
                domain: Some("x.test".into()),
            },
        );
        let md = render_markdown(&[first], "https://x.test/a");
        assert_eq!(
            md,
            "# Title\n\n*Author: Ann*\n\n*Published: 3/7/2024*\n\n\
             ## Summary\nShort \"summary\"\n\n## Content\nBody\nline\n\n\
             ---\n*Source: [x.test](https://x.test/a)*"
        );
    }

    #[test]
    fn footer_uses_original_url_and_first_domain() {
        let mut second = content(2, "B");
        second.domain = Some("other.test".into());
        let mut first = content(1, "A");
        first.domain = Some("x.test".into());
        let md = render_markdown(&[first, second], "https://x.test/start?ref=1");
        assert!(md.ends_with("---\n*Source: [x.test](https://x.test/start?ref=1)*"));
    }

    #[test]
    fn unparseable_date_is_omitted() {
        let mut first = content(1, "A");
        first.date_published = Some("sometime last week".into());
        let md = render_markdown(&[first], "https://x.test/a");
        assert!(!md.contains("Published"), "got: {md}");
    }

    #[test]
    fn date_formats() {
        assert_eq!(format_date("2024-03-07T23:30:00-05:00", "%-m/%-d/%Y").as_deref(), Some("3/7/2024"));
        assert_eq!(format_date("Thu, 07 Mar 2024 10:00:00 +0000", "%Y-%m-%d").as_deref(), Some("2024-03-07"));
        assert_eq!(format_date("2024-03-07T10:00:00.123", "%-m/%-d/%Y").as_deref(), Some("3/7/2024"));
        assert_eq!(format_date("2024-03-07 10:00:00", "%-m/%-d/%Y").as_deref(), Some("3/7/2024"));
        assert_eq!(format_date("2024-12-25", "%B %-d, %Y").as_deref(), Some("December 25, 2024"));
        assert_eq!(format_date("yesterday", "%Y"), None);
    }

    #[test]
    fn iso_offsets_without_colon_or_seconds() {
        assert_eq!(format_date("2024-03-07T10:00:00+0000", "%Y-%m-%d").as_deref(), Some("2024-03-07"));
        assert_eq!(format_date("2024-03-07T10:00Z", "%Y-%m-%d").as_deref(), Some("2024-03-07"));
        assert_eq!(format_date("2024-03-07T10:00:00.000+0100", "%Y-%m-%d").as_deref(), Some("2024-03-07"));
        assert_eq!(format_date("2024-03-07T23:30-0500", "%Y-%m-%d").as_deref(), Some("2024-03-07"));
        assert_eq!(format_date("2024-03-07T10:00", "%Y-%m-%d").as_deref(), Some("2024-03-07"));
    }

    #[test]
    fn invalid_pattern_falls_back_to_default() {
        assert_eq!(format_date("2024-03-07", "%Q").as_deref(), Some("3/7/2024"));
        // Time fields have nothing to format on a calendar date.
        assert_eq!(format_date("2024-03-07", "%H:%M").as_deref(), Some("3/7/2024"));
    }

    #[test]
    fn render_with_invalid_pattern_does_not_panic() {
        let mut first = content(1, "A");
        first.date_published = Some("2024-03-07T10:00:00Z".into());
        let md = render_markdown_with(&[first], "https://x.test/a", "%Q");
        assert!(md.contains("*Published: 3/7/2024*\n\n"), "got: {md}");
    }

    #[test]
    fn empty_content_adds_no_blank_lines() {
        let md = render_markdown(&[content(1, "A"), content(2, "")], "https://x.test/a");
        assert!(md.contains("### Page 2\n\n---"), "got: {md}");
        assert!(!md.contains("\n\n\n"), "got: {md}");
    }
}
