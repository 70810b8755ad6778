//! HTML parsing and DOM queries.
//!
//! [`Document`] wraps a parsed page or fragment and answers the handful of
//! questions the pipeline asks of it: what is the `<title>`, which elements
//! match a selector, and does any of a list of selectors match at all.
//!
//! # Example
//!
//! ```rust
//! use inkdrop_core::parse::Document;
//!
//! let html = r#"
//!     <html>
//!         <head><title>Thread</title></head>
//!         <body><p class="content">Paragraph</p></body>
//!     </html>
//! "#;
//!
//! let doc = Document::parse(html).unwrap();
//! assert_eq!(doc.title(), Some("Thread".to_string()));
//! assert_eq!(doc.select("p.content").unwrap().len(), 1);
//! ```

use scraper::{Html, Selector};

use crate::{InkDropError, Result};

/// A parsed HTML document or fragment.
pub struct Document {
    html: Html,
}

impl Document {
    /// Parses a full HTML document.
    pub fn parse(html: &str) -> Result<Self> {
        Ok(Self { html: Html::parse_document(html) })
    }

    /// Parses an HTML fragment such as the output of the readability pass.
    ///
    /// Fragment parsing does not synthesize `<head>`/`<body>`, so the
    /// fragment's own block structure is kept intact.
    pub fn parse_fragment(html: &str) -> Result<Self> {
        Ok(Self { html: Html::parse_fragment(html) })
    }

    /// Selects elements using a CSS selector.
    ///
    /// # Errors
    ///
    /// Returns [`InkDropError::HtmlParseError`] if the selector is invalid.
    pub fn select(&'_ self, selector: &str) -> Result<Vec<Element<'_>>> {
        let sel = parse_selector(selector)?;
        Ok(self.html.select(&sel).map(|el| Element { element: el }).collect())
    }

    /// Whether at least one of `selectors` matches an element.
    ///
    /// Invalid selectors are reported as errors rather than skipped.
    pub fn matches_any(&self, selectors: &[&str]) -> Result<bool> {
        for selector in selectors {
            let sel = parse_selector(selector)?;
            if self.html.select(&sel).next().is_some() {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Gets the content of the first `<title>` element, if any.
    pub fn title(&self) -> Option<String> {
        let selector = Selector::parse("title").ok()?;
        self.html
            .select(&selector)
            .next()
            .map(|el| el.text().collect::<String>())
    }

    /// Gets the inner HTML of `<body>`, or the whole serialized tree when
    /// there is no body element.
    pub fn body_html(&self) -> String {
        match Selector::parse("body").ok().and_then(|sel| self.html.select(&sel).next()) {
            Some(body) => body.inner_html(),
            None => self.html.html(),
        }
    }
}

fn parse_selector(selector: &str) -> Result<Selector> {
    Selector::parse(selector).map_err(|e| InkDropError::HtmlParseError(format!("Invalid selector: {}", e)))
}

/// A wrapper around scraper's ElementRef.
#[derive(Clone, Debug)]
pub struct Element<'a> {
    element: scraper::ElementRef<'a>,
}

impl<'a> Element<'a> {
    /// Gets the raw text of this element.
    ///
    /// Text nodes are concatenated exactly as they appear, so whitespace
    /// between inline children survives for a later collapse step.
    pub fn text(&self) -> String {
        self.element.text().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_HTML: &str = r#"
        <!DOCTYPE html>
        <html lang="en">
        <head><title>Test Page</title></head>
        <body>
            <article data-testid="tweet">
                <p class="content">Paragraph <b>one</b></p>
                <p class="content">Paragraph 2</p>
            </article>
        </body>
        </html>
    "#;

    #[test]
    fn test_parse_document() {
        let doc = Document::parse(SAMPLE_HTML).unwrap();
        assert_eq!(doc.title(), Some("Test Page".to_string()));
    }

    #[test]
    fn test_select_elements_keeps_inline_spacing() {
        let doc = Document::parse(SAMPLE_HTML).unwrap();
        let elements = doc.select("p.content").unwrap();

        assert_eq!(elements.len(), 2);
        assert_eq!(elements[0].text(), "Paragraph one");
    }

    #[test]
    fn test_invalid_selector() {
        let doc = Document::parse(SAMPLE_HTML).unwrap();
        assert!(matches!(doc.select("[[invalid"), Err(InkDropError::HtmlParseError(_))));
        assert!(doc.matches_any(&["[[invalid"]).is_err());
    }

    #[test]
    fn test_matches_any() {
        let doc = Document::parse(SAMPLE_HTML).unwrap();
        assert!(doc.matches_any(&["div.none", r#"article[data-testid="tweet"]"#]).unwrap());
        assert!(!doc.matches_any(&["div.none", "section"]).unwrap());
    }

    #[test]
    fn test_fragment_and_body_html() {
        let doc = Document::parse_fragment("<p>One</p><p>Two</p>").unwrap();
        assert_eq!(doc.select("p").unwrap().len(), 2);
        assert_eq!(doc.title(), None);

        let full = Document::parse(SAMPLE_HTML).unwrap();
        let body = full.body_html();
        assert!(body.contains("Paragraph 2"));
        assert!(!body.contains("<title>"));
    }
}
