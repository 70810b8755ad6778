//! Streaming HTML cleanup ahead of and inside extraction.
//!
//! Two passes live here, both built on `lol_html` so they run over the raw
//! markup without building a DOM:
//!
//! - [`strip_boilerplate`] drops the platform's error banners and `<noscript>`
//!   fallbacks from the captured page before the readability pass sees it.
//! - [`strip_non_content`] drops scripts, styles and navigation chrome from
//!   the readability fragment before paragraphs are read.

/// Containers removed from the raw page before readability.
pub const BOILERPLATE_SELECTORS: &[&str] = &[".errorContainer", "noscript"];

/// Tag categories removed from the content fragment before text extraction.
pub const NON_CONTENT_TAGS: &[&str] = &["script", "style", "nav", "footer", "aside", "iframe"];

/// Remove error containers and no-script blocks from a raw page.
///
/// Order of the remaining markup is preserved. If the rewriter fails the
/// input is returned unchanged.
pub fn strip_boilerplate(html: &str) -> String {
    remove_elements(html, BOILERPLATE_SELECTORS)
}

/// Remove script, style, nav, footer, aside and iframe elements, including
/// their contents.
pub fn strip_non_content(html: &str) -> String {
    remove_elements(html, NON_CONTENT_TAGS)
}

/// Remove every element matching one of `selectors` together with its content
fn remove_elements(html: &str, selectors: &[&str]) -> String {
    let mut output = Vec::new();
    let mut rewriter = lol_html::HtmlRewriter::new(
        lol_html::Settings {
            element_content_handlers: selectors
                .iter()
                .map(|&selector| {
                    lol_html::element!(selector, |el| {
                        el.remove();
                        Ok(())
                    })
                })
                .collect(),
            ..Default::default()
        },
        |c: &[u8]| output.extend_from_slice(c),
    );

    if rewriter.write(html.as_bytes()).is_err() {
        return html.to_string();
    }

    if rewriter.end().is_err() {
        return html.to_string();
    }

    String::from_utf8(output).unwrap_or_else(|_| html.to_string())
}
