//! Pipeline stages for web-article extraction.
//!
//! Each submodule implements one step; the aggregator in
//! [`crate::convert`] wires them together.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ extract ──▶ paginate ──┐   (repeat per page)
//!   ▲                               │
//!   └────────── next URL ◀──────────┘
//!                    │ (walk ends)
//!                    ▼
//!           normalize + render
//! ```
//!
//! 1. [`input`]       — validate the starting URL; visited-set keys
//! 2. [`fetch`]       — raw HTML over HTTP, with retry and a per-run cache
//! 3. [`extract`]     — readability extraction + HTML → Markdown
//! 4. [`postprocess`] — deterministic Markdown cleanup of extracted content
//! 5. [`paginate`]    — next-page discovery strategies
//! 6. [`normalize`]   — entity decoding and backslash unescaping
//! 7. [`render`]      — the final Markdown document

pub mod extract;
pub mod fetch;
pub mod input;
pub mod normalize;
pub mod paginate;
pub mod postprocess;
pub mod render;
