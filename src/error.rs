//! Error types for the edgequake-web2md library.
//!
//! Failures fall into two groups:
//!
//! * [`Web2MdError`] — **Fatal**: the extraction cannot produce a document
//!   (bad input URL, the content extractor failed on a page, invalid config).
//!   Returned as `Err(Web2MdError)` from the top-level `extract*` functions.
//!
//! * [`FetchError`], [`ExtractError`], [`PaginationError`] — failures of one
//!   collaborator call. A `PaginationError` never leaves the pagination
//!   locator: it is logged and treated as "no next page". An `ExtractError`
//!   is wrapped into [`Web2MdError::ExtractionFailed`] and aborts the walk.
//!
//! Only the outermost boundary
//! ([`crate::convert::extract_content_to_markdown`]) flattens these into an
//! `"Error: "`-prefixed string.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the edgequake-web2md library.
#[derive(Debug, Error)]
pub enum Web2MdError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// The input string is not a well-formed HTTP/HTTPS URL.
    #[error("Invalid URL '{input}': {reason}")]
    InvalidUrl { input: String, reason: String },

    // ── Extraction errors ─────────────────────────────────────────────────
    /// The content extractor failed for one page of the walk.
    #[error("Failed to extract content from '{url}': {source}")]
    ExtractionFailed {
        url: String,
        #[source]
        source: ExtractError,
    },

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not create or write the output Markdown file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Tool surface errors ───────────────────────────────────────────────
    /// A tool call named an operation this service does not expose.
    #[error("Unknown tool '{name}'. Available tools: extract")]
    UnknownTool { name: String },

    /// The arguments of a tool call did not match its input schema.
    #[error("Invalid arguments for tool '{tool}': {detail}")]
    InvalidToolArguments { tool: String, detail: String },

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// A failed HTTP fetch of a page's raw HTML.
#[derive(Debug, Clone, Error, serde::Serialize, serde::Deserialize)]
pub enum FetchError {
    /// Connection, DNS or TLS failure.
    #[error("Request to '{url}' failed: {reason}")]
    Request { url: String, reason: String },

    /// The request exceeded the configured timeout.
    #[error("Request to '{url}' timed out after {secs}s")]
    Timeout { url: String, secs: u64 },

    /// The server answered with a non-success status.
    #[error("Request to '{url}' returned HTTP {status}")]
    HttpStatus { url: String, status: u16 },

    /// The response body could not be read as text.
    #[error("Could not read body of '{url}': {reason}")]
    Body { url: String, reason: String },
}

impl FetchError {
    /// Whether another attempt could plausibly succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            FetchError::Request { .. } | FetchError::Timeout { .. } => true,
            FetchError::HttpStatus { status, .. } => *status == 429 || *status >= 500,
            FetchError::Body { .. } => false,
        }
    }
}

/// A failure of the content extractor for one URL.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// The page HTML could not be downloaded.
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// The extraction engine rejected the document.
    #[error("extraction engine failed: {0}")]
    Engine(String),
}

/// Why the pagination locator found no candidate. Never escapes the locator.
#[derive(Debug, Error)]
pub enum PaginationError {
    /// The page URL handed to the locator is not a valid absolute URL.
    #[error("page URL '{url}' is not valid: {reason}")]
    InvalidPageUrl { url: String, reason: String },

    /// The page HTML could not be fetched.
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// A candidate link was found but its href does not resolve to an
    /// HTTP/HTTPS URL.
    #[error("next-page href '{href}' could not be resolved: {reason}")]
    UnresolvableHref { href: String, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_url_display() {
        let e = Web2MdError::InvalidUrl {
            input: "ftp://example.com".into(),
            reason: "scheme must be http or https".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("ftp://example.com"), "got: {msg}");
        assert!(msg.contains("http or https"), "got: {msg}");
    }

    #[test]
    fn extraction_failed_includes_source() {
        let e = Web2MdError::ExtractionFailed {
            url: "https://example.com/a".into(),
            source: ExtractError::Fetch(FetchError::HttpStatus {
                url: "https://example.com/a".into(),
                status: 404,
            }),
        };
        let msg = e.to_string();
        assert!(msg.contains("https://example.com/a"));
        assert!(msg.contains("HTTP 404"), "got: {msg}");
    }

    #[test]
    fn transient_fetch_errors() {
        let status = |status| FetchError::HttpStatus {
            url: "u".into(),
            status,
        };
        assert!(status(503).is_transient());
        assert!(status(429).is_transient());
        assert!(!status(404).is_transient());
        assert!(FetchError::Timeout {
            url: "u".into(),
            secs: 5
        }
        .is_transient());
        assert!(!FetchError::Body {
            url: "u".into(),
            reason: "bad utf-8".into()
        }
        .is_transient());
    }

    #[test]
    fn unknown_tool_display() {
        let e = Web2MdError::UnknownTool {
            name: "summarize".into(),
        };
        assert!(e.to_string().contains("summarize"));
        assert!(e.to_string().contains("extract"));
    }
}
