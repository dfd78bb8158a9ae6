//! Post-processing: deterministic cleanup of converted article Markdown.
//!
//! The HTML → Markdown conversion of readability output carries artefacts of
//! the source page: Windows line endings, indentation whitespace at line
//! ends, long runs of blank lines where removed elements used to be, and
//! zero-width characters used by CMSes for layout.
//!
//! ## Rule Order
//!
//! Line endings are normalised first so every later rule sees `\n` only.
//! Invisible characters are stripped before blank-line collapsing because a
//! line containing only a zero-width space must count as blank.

use once_cell::sync::Lazy;
use regex::Regex;

/// Apply all post-processing rules to converted article Markdown.
///
/// Rules (applied in order):
/// 1. Normalise line endings (CRLF / CR → LF)
/// 2. Strip invisible Unicode (zero-width spaces, BOM, soft hyphens)
/// 3. Trim trailing whitespace per line
/// 4. Collapse 3+ consecutive newlines down to one blank line
/// 5. Trim leading and trailing blank lines
pub fn clean_markdown(input: &str) -> String {
    let s = normalise_line_endings(input);
    let s = remove_invisible_chars(&s);
    let s = trim_trailing_whitespace(&s);
    let s = collapse_blank_lines(&s);
    s.trim_matches('\n').to_string()
}

// ── Rule 1: Normalise line endings ───────────────────────────────────────────

fn normalise_line_endings(input: &str) -> String {
    input.replace("\r\n", "\n").replace('\r', "\n")
}

// ── Rule 2: Strip invisible characters ───────────────────────────────────────

fn remove_invisible_chars(input: &str) -> String {
    input
        .chars()
        .filter(|c| {
            !matches!(
                c,
                '\u{200B}' | '\u{200C}' | '\u{200D}' | '\u{2060}' | '\u{FEFF}' | '\u{00AD}'
            )
        })
        .collect()
}

// ── Rule 3: Trim trailing whitespace per line ────────────────────────────────

fn trim_trailing_whitespace(input: &str) -> String {
    input
        .lines()
        .map(|line| line.trim_end())
        .collect::<Vec<_>>()
        .join("\n")
}

// ── Rule 4: Collapse excessive blank lines ───────────────────────────────────

static RE_BLANK_LINES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").unwrap());

fn collapse_blank_lines(input: &str) -> String {
    RE_BLANK_LINES.replace_all(input, "\n\n").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalise_line_endings() {
        assert_eq!(normalise_line_endings("a\r\nb\rc"), "a\nb\nc");
    }

    #[test]
    fn test_trim_trailing_whitespace() {
        assert_eq!(
            trim_trailing_whitespace("  hello   \nworld\t"),
            "  hello\nworld"
        );
    }

    #[test]
    fn test_collapse_blank_lines() {
        assert_eq!(collapse_blank_lines("a\n\n\n\n\nb"), "a\n\nb");
        assert_eq!(collapse_blank_lines("a\n\nb"), "a\n\nb");
    }

    #[test]
    fn test_remove_invisible() {
        let input = "hello\u{200B}world\u{FEFF}foo\u{00AD}bar";
        assert_eq!(remove_invisible_chars(input), "helloworldfoobar");
    }

    #[test]
    fn test_clean_markdown_full_pipeline() {
        let input = "\n\n# Title\r\n\r\nSome text   \n\u{200B}\n\n\n\n## Section\n\n";
        assert_eq!(clean_markdown(input), "# Title\n\nSome text\n\n## Section");
    }

    #[test]
    fn test_clean_markdown_empty() {
        assert_eq!(clean_markdown(""), "");
        assert_eq!(clean_markdown("\n\n  \n"), "");
    }
}
