//! Source URL helpers: platform checks, thread detection and the canonical
//! form used as the duplicate-submission key.

use url::Url;

use crate::{InkDropError, Result};

/// Canonical host every platform URL is rewritten to.
pub const CANONICAL_HOST: &str = "x.com";

const PLATFORM_HOSTS: &[&str] = &["x.com", "twitter.com"];
const HOST_PREFIXES: &[&str] = &["", "www.", "mobile."];

fn is_platform_host(host: &str) -> bool {
    HOST_PREFIXES.iter().any(|prefix| {
        host.strip_prefix(prefix).is_some_and(|rest| PLATFORM_HOSTS.contains(&rest))
    })
}

fn parse_http(url: &str) -> Option<Url> {
    let parsed = Url::parse(url.trim()).ok()?;
    matches!(parsed.scheme(), "http" | "https").then_some(parsed)
}

/// Whether `url` points at the supported platform at all.
///
/// ```rust
/// use inkdrop_core::source::is_target_platform;
///
/// assert!(is_target_platform("https://mobile.twitter.com/jane"));
/// assert!(!is_target_platform("https://notx.com/jane"));
/// ```
pub fn is_target_platform(url: &str) -> bool {
    parse_http(url).is_some_and(|parsed| parsed.host_str().is_some_and(is_platform_host))
}

/// Whether `url` is a single-post (thread) URL on the platform.
///
/// Accepts `/<user>/status/<id>` and `/i/web/status/<id>`, with anything
/// after the numeric id.
pub fn is_thread_url(url: &str) -> bool {
    let Some(parsed) = parse_http(url) else {
        return false;
    };
    if !parsed.host_str().is_some_and(is_platform_host) {
        return false;
    }

    let segments: Vec<&str> = parsed.path_segments().map(|s| s.collect()).unwrap_or_default();
    let is_id = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    let is_user = |s: &str| !s.is_empty() && s.chars().all(|c| c.is_alphanumeric() || c == '_');

    match segments.as_slice() {
        ["i", "web", "status", id, ..] => is_id(*id),
        [user, "status", id, ..] => is_user(*user) && is_id(*id),
        _ => false,
    }
}

/// Find the first thread URL in free text, such as a share-sheet payload.
pub fn find_thread_url(text: &str) -> Option<String> {
    text.split_whitespace()
        .map(|token| token.trim_start_matches(['(', '[', '<', '"', '\'']))
        .map(|token| token.trim_end_matches([')', ']', '>', '"', '\'']))
        .find(|token| token.starts_with("http") && is_thread_url(token))
        .map(str::to_string)
}

/// Validate a submitted URL, returning it trimmed.
///
/// Empty or unparseable input is [`InkDropError::InvalidUrl`]; a valid URL on
/// another site is [`InkDropError::NotTargetPlatform`].
pub fn check_source_url(url: &str) -> Result<&str> {
    let url = url.trim();
    if url.is_empty() {
        return Err(InkDropError::InvalidUrl("URL is empty".to_string()));
    }
    if parse_http(url).is_none() {
        return Err(InkDropError::InvalidUrl(url.to_string()));
    }
    if !is_target_platform(url) {
        return Err(InkDropError::NotTargetPlatform(url.to_string()));
    }
    Ok(url)
}

/// Canonical form of a platform URL.
///
/// Host variants become `https://x.com`, the query string and fragment are
/// dropped, and trailing slashes are removed. Two submissions of the same
/// thread therefore compare equal.
///
/// ```rust
/// use inkdrop_core::source::normalize_url;
///
/// assert_eq!(
///     normalize_url("http://www.twitter.com/jane/status/42/?s=20"),
///     "https://x.com/jane/status/42"
/// );
/// ```
pub fn normalize_url(url: &str) -> String {
    let trimmed = url.trim();
    let Some(mut parsed) = parse_http(trimmed) else {
        return trimmed.split(['?', '#']).next().unwrap_or_default().trim_end_matches('/').to_string();
    };

    if parsed.host_str().is_some_and(is_platform_host) {
        // scheme and host swaps are infallible for http(s) URLs
        let _ = parsed.set_scheme("https");
        let _ = parsed.set_host(Some(CANONICAL_HOST));
    }
    parsed.set_query(None);
    parsed.set_fragment(None);

    parsed.as_str().trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("https://x.com/jane/status/1", true)]
    #[case("https://twitter.com/jane", true)]
    #[case("http://www.x.com/", true)]
    #[case("https://mobile.twitter.com/jane/status/1", true)]
    #[case("https://notx.com/jane/status/1", false)]
    #[case("https://x.com.evil.example/jane/status/1", false)]
    #[case("https://example.com/?next=x.com", false)]
    #[case("ftp://x.com/jane", false)]
    #[case("not a url", false)]
    #[case("", false)]
    fn test_is_target_platform(#[case] url: &str, #[case] expected: bool) {
        assert_eq!(is_target_platform(url), expected);
    }

    #[rstest]
    #[case("https://x.com/jane_doe/status/1234567890", true)]
    #[case("https://twitter.com/jane/status/1234?s=20", true)]
    #[case("https://x.com/jane/status/1234/photo/1", true)]
    #[case("https://x.com/i/web/status/1234", true)]
    #[case("https://x.com/jane", false)]
    #[case("https://x.com/jane/status/", false)]
    #[case("https://x.com/jane/status/abc", false)]
    #[case("https://example.com/jane/status/1234", false)]
    fn test_is_thread_url(#[case] url: &str, #[case] expected: bool) {
        assert_eq!(is_thread_url(url), expected);
    }

    #[test]
    fn test_check_source_url() {
        assert_eq!(check_source_url("  https://x.com/jane/status/1 ").unwrap(), "https://x.com/jane/status/1");
        assert!(matches!(check_source_url("   "), Err(InkDropError::InvalidUrl(_))));
        assert!(matches!(check_source_url("x.com/jane"), Err(InkDropError::InvalidUrl(_))));
        assert!(matches!(
            check_source_url("https://example.com/jane/status/1"),
            Err(InkDropError::NotTargetPlatform(_))
        ));
    }

    #[test]
    fn test_find_thread_url_in_share_text() {
        let text = "Check this out (https://x.com/jane/status/99?s=46) via the app";
        assert_eq!(find_thread_url(text).as_deref(), Some("https://x.com/jane/status/99?s=46"));
    }

    #[test]
    fn test_find_thread_url_skips_other_links() {
        let text = "https://example.com/post and https://twitter.com/jane/status/7";
        assert_eq!(find_thread_url(text).as_deref(), Some("https://twitter.com/jane/status/7"));
        assert_eq!(find_thread_url("no links here"), None);
    }

    #[rstest]
    #[case("https://twitter.com/jane/status/42", "https://x.com/jane/status/42")]
    #[case("http://www.twitter.com/jane/status/42", "https://x.com/jane/status/42")]
    #[case("https://x.com/jane/status/42?s=20&t=abc", "https://x.com/jane/status/42")]
    #[case("https://x.com/jane/status/42/", "https://x.com/jane/status/42")]
    #[case("https://mobile.x.com/jane/status/42#top", "https://x.com/jane/status/42")]
    #[case("https://x.com/jane/status/42", "https://x.com/jane/status/42")]
    fn test_normalize_url(#[case] url: &str, #[case] expected: &str) {
        assert_eq!(normalize_url(url), expected);
    }

    #[test]
    fn test_normalize_url_idempotent() {
        let once = normalize_url("http://www.twitter.com/jane/status/42/?s=1");
        assert_eq!(normalize_url(&once), once);
    }

    #[test]
    fn test_normalize_unparseable_input() {
        assert_eq!(normalize_url("x.com/jane/status/1/?s=2"), "x.com/jane/status/1");
    }
}
