//! # edgequake-web2md
//!
//! Extract the readable article from a web page, follow its "next page"
//! links, and return the whole article as one Markdown document.
//!
//! ## Why this crate?
//!
//! Long articles are often split across several pages. Readability-style
//! extractors only see one page at a time, so a naive extraction silently
//! drops everything after page 1. This crate walks the pagination chain
//! (explicit "next" links first, numbered pagination widgets as a fallback),
//! extracts every page, and stitches them into a single document with the
//! first page's metadata on top.
//!
//! ## Pipeline Overview
//!
//! ```text
//! URL
//!  │
//!  ├─ 1. Input     validate http(s) URL, no network on failure
//!  ├─ 2. Extract   fetch + readability + HTML → Markdown  ┐
//!  ├─ 3. Paginate  find the next page's URL               ┘ repeat until done
//!  ├─ 4. Render    normalise fields, assemble the document
//!  └─ 5. Output    Markdown + per-page results + stats
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use edgequake_web2md::{extract, ExtractionConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ExtractionConfig::default();
//!     let output = extract("https://example.com/article", &config).await?;
//!     println!("{}", output.markdown);
//!     eprintln!("pages: {}, stopped: {:?}",
//!         output.stats.pages_fetched,
//!         output.stats.stop_reason);
//!     Ok(())
//! }
//! ```
//!
//! Hosts that want a plain string (Markdown or `"Error: …"`) can call
//! [`extract_content_to_markdown`] instead.
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `web2md` binary (clap + anyhow + tracing-subscriber) |
//!
//! Disable `cli` when using only the library to avoid pulling in CLI-only deps:
//! ```toml
//! edgequake-web2md = { version = "0.1", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod convert;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod tool;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ExtractionConfig, ExtractionConfigBuilder, DEFAULT_DATE_FORMAT, DEFAULT_NEXT_LINK_MARKERS};
pub use convert::{
    extract, extract_content_to_markdown, extract_content_to_markdown_with, extract_sync,
    extract_to_file, ERROR_PREFIX,
};
pub use error::{ExtractError, FetchError, PaginationError, Web2MdError};
pub use output::{ExtractionOutput, ExtractionStats, PageResult, ParsedArticle, StopReason};
pub use pipeline::extract::{ContentExtractor, ReadabilityExtractor};
pub use pipeline::fetch::{CachedFetcher, HtmlFetcher, HttpFetcher};
pub use pipeline::normalize::normalize_text;
pub use pipeline::paginate::{NextLinkMatcher, PaginationLocator};
pub use pipeline::render::{render_markdown, render_markdown_with};
pub use progress::{ExtractionProgressCallback, NoopProgressCallback, ProgressCallback};
pub use tool::{call_tool, service_info, tool_definitions, ServiceInfo, ToolDefinition, ToolOutput};
