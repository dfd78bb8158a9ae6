//! Text normalisation applied to every extracted field before it is embedded
//! in the Markdown document.
//!
//! Two steps, always in this order:
//! 1. decode HTML/XML character entities (`&amp;`, `&#8217;`, `&eacute;`, …)
//! 2. unescape backslash sequences left by JSON-ish extractors:
//!    `\n` → newline, `\t` → tab, `\r` → removed, `\"` → `"`, `\'` → `'`,
//!    `\\` → `\`, each applied as a whole-string pass in that sequence.

/// Backslash sequences and their replacements, in application order.
const BACKSLASH_ESCAPES: &[(&str, &str)] = &[
    ("\\n", "\n"),
    ("\\t", "\t"),
    ("\\r", ""),
    ("\\\"", "\""),
    ("\\'", "'"),
    ("\\\\", "\\"),
];

/// Normalise an optional field; absent and empty input both yield `""`.
pub fn normalize_text(text: Option<&str>) -> String {
    match text {
        Some(s) if !s.is_empty() => normalize(s),
        _ => String::new(),
    }
}

/// Decode entities, then unescape backslash sequences.
pub fn normalize(text: &str) -> String {
    let decoded = html_escape::decode_html_entities(text);
    unescape_backslashes(&decoded)
}

fn unescape_backslashes(text: &str) -> String {
    if !text.contains('\\') {
        return text.to_string();
    }
    BACKSLASH_ESCAPES
        .iter()
        .fold(text.to_string(), |acc, (from, to)| acc.replace(from, to))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_and_empty_are_empty() {
        assert_eq!(normalize_text(None), "");
        assert_eq!(normalize_text(Some("")), "");
    }

    #[test]
    fn decodes_named_and_numeric_entities() {
        assert_eq!(normalize("Hello &amp; Welcome"), "Hello & Welcome");
        assert_eq!(normalize("it&#8217;s &lt;b&gt;"), "it\u{2019}s <b>");
        assert_eq!(normalize("caf&eacute; &#x41;"), "café A");
    }

    #[test]
    fn unescapes_backslash_sequences() {
        assert_eq!(normalize(r"line1\nline2"), "line1\nline2");
        assert_eq!(normalize(r"a\tb"), "a\tb");
        assert_eq!(normalize(r"a\r\nb"), "a\nb");
        assert_eq!(normalize(r#"say \"hi\""#), "say \"hi\"");
        assert_eq!(normalize(r"don\'t"), "don't");
        assert_eq!(normalize(r"C:\\path"), r"C:\path");
    }

    #[test]
    fn entities_decode_before_unescaping() {
        // `&#92;n` decodes to a literal backslash-n, which step 2 then turns
        // into a newline.
        assert_eq!(normalize("a&#92;nb"), "a\nb");
    }

    #[test]
    fn normalising_twice_is_stable() {
        let inputs = [
            "Hello &amp; Welcome",
            r"first\nsecond\tthird",
            "plain text with no escapes",
            "caf&eacute; &lt;tag&gt;",
            "",
        ];
        for input in inputs {
            let once = normalize(input);
            assert_eq!(normalize(&once), once, "input: {input:?}");
        }
    }

    #[test]
    fn leaves_unknown_escapes_alone() {
        assert_eq!(normalize(r"\d+ matches"), r"\d+ matches");
    }
}
