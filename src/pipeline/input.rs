//! Input validation: turn the user-supplied string into an HTTP(S) URL.
//!
//! Validation happens before any network access, so a bad input never costs
//! a request.

use crate::error::Web2MdError;
use url::Url;

/// Parse and validate the starting URL.
///
/// Accepts only absolute `http`/`https` URLs with a host.
pub fn validate_url(input: &str) -> Result<Url, Web2MdError> {
    let invalid = |reason: &str| Web2MdError::InvalidUrl {
        input: input.to_string(),
        reason: reason.to_string(),
    };

    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(invalid("URL is empty"));
    }

    let url = Url::parse(trimmed).map_err(|e| invalid(&e.to_string()))?;
    match url.scheme() {
        "http" | "https" => {}
        other => {
            return Err(invalid(&format!(
                "scheme '{other}' is not supported, use http or https"
            )))
        }
    }
    if url.host_str().map_or(true, str::is_empty) {
        return Err(invalid("URL has no host"));
    }

    Ok(url)
}

/// Key under which a URL is stored in the visited set: the URL without its
/// fragment, so `page#comments` and `page` count as the same page.
pub fn visit_key(url: &Url) -> String {
    let mut key = url.clone();
    key.set_fragment(None);
    key.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_http_and_https() {
        assert_eq!(
            validate_url("https://example.com/a?b=1").unwrap().as_str(),
            "https://example.com/a?b=1"
        );
        assert!(validate_url("http://example.com").is_ok());
        assert!(validate_url("  https://example.com/padded  ").is_ok());
    }

    #[test]
    fn rejects_other_schemes() {
        for input in ["ftp://example.com", "file:///etc/passwd", "javascript:alert(1)"] {
            let err = validate_url(input).unwrap_err();
            assert!(
                matches!(err, Web2MdError::InvalidUrl { .. }),
                "{input} should be rejected"
            );
        }
    }

    #[test]
    fn rejects_malformed() {
        for input in ["", "   ", "not a url", "example.com/article", "https://"] {
            assert!(validate_url(input).is_err(), "{input:?} should be rejected");
        }
    }

    #[test]
    fn visit_key_drops_fragment() {
        let a = Url::parse("https://example.com/page#comments").unwrap();
        let b = Url::parse("https://example.com/page").unwrap();
        assert_eq!(visit_key(&a), visit_key(&b));
    }

    #[test]
    fn visit_key_keeps_query() {
        let a = Url::parse("https://example.com/page?p=2").unwrap();
        let b = Url::parse("https://example.com/page?p=3").unwrap();
        assert_ne!(visit_key(&a), visit_key(&b));
    }
}
