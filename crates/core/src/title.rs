//! Display-title cleanup.

use crate::classify::{TextClassifier, title_chrome};

/// Strip platform chrome from a raw page or readability title.
///
/// Applied in order: trailing `" / X"` / `" | X"` suffix, leading `"(3) "`
/// notification count, then either the quoted body of a
/// `Name on X: "…"` title or, failing that, the bare `Name on X: ` prefix.
/// The result is trimmed. Unmatched input passes through trimmed.
///
/// # Example
///
/// ```rust
/// use inkdrop_core::normalize_title;
///
/// assert_eq!(normalize_title(r#"(3) Jane Doe on X: "My big idea""#), "My big idea");
/// assert_eq!(normalize_title("Some Thread / X"), "Some Thread");
/// ```
pub fn normalize_title(raw: &str) -> String {
    match title_chrome().rewrite(raw) {
        Some(title) => title.trim().to_string(),
        None => String::new(),
    }
}

/// Prefer the readability title when it has content, else the page title.
pub fn choose_title<'a>(readability_title: &'a str, page_title: &'a str) -> &'a str {
    if readability_title.trim().is_empty() { page_title } else { readability_title }
}
