//! Readability pass.
//!
//! Generic boilerplate removal is delegated to a collaborator behind the
//! [`ReadabilityPass`] trait. The default implementation,
//! [`SmoothieReadability`], runs the `dom_smoothie` port of Mozilla's
//! Readability. Whatever it returns is treated as a content fragment for
//! [`crate::extract_segments`].

use dom_smoothie::{Config, Readability};

use crate::parse::Document;
use crate::{InkDropError, Result};

/// Output of a readability pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReadableFragment {
    /// Content-focused HTML fragment.
    pub content: String,
    /// Best-guess title; empty when none was found.
    pub title: String,
}

/// Converts a full page into a content-focused fragment plus a title.
pub trait ReadabilityPass: Send + Sync {
    fn extract(&self, html: &str, url: Option<&str>) -> Result<ReadableFragment>;
}

impl<T: ReadabilityPass + ?Sized> ReadabilityPass for Box<T> {
    fn extract(&self, html: &str, url: Option<&str>) -> Result<ReadableFragment> {
        (**self).extract(html, url)
    }
}

/// [`ReadabilityPass`] backed by `dom_smoothie`.
///
/// When Readability cannot find a candidate (very short threads do this),
/// the page `<body>` is returned as the fragment with an empty title so the
/// segment extractor still gets a chance at it.
#[derive(Debug, Clone)]
pub struct SmoothieReadability {
    /// Upper bound on elements Readability will consider (0 = unlimited)
    pub max_elements: usize,
    /// Fall back to the page body instead of failing
    pub fallback_to_body: bool,
}

impl Default for SmoothieReadability {
    fn default() -> Self {
        Self { max_elements: 9000, fallback_to_body: true }
    }
}

impl SmoothieReadability {
    pub fn new() -> Self {
        Self::default()
    }

    fn run(&self, html: &str, url: Option<&str>) -> Result<ReadableFragment> {
        let cfg = Config { max_elements_to_parse: self.max_elements, ..Default::default() };
        let mut reader =
            Readability::new(html, url, Some(cfg)).map_err(|e| InkDropError::Readability(e.to_string()))?;
        let article = reader.parse().map_err(|e| InkDropError::Readability(e.to_string()))?;

        Ok(ReadableFragment { content: article.content.to_string(), title: article.title.to_string() })
    }
}

impl ReadabilityPass for SmoothieReadability {
    fn extract(&self, html: &str, url: Option<&str>) -> Result<ReadableFragment> {
        match self.run(html, url) {
            Ok(fragment) => Ok(fragment),
            Err(e) if self.fallback_to_body => {
                tracing::debug!(error = %e, "readability found no candidate, using page body");
                let doc = Document::parse(html)?;
                Ok(ReadableFragment { content: doc.body_html(), title: String::new() })
            }
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const THREAD_HTML: &str = r#"
        <!DOCTYPE html>
        <html lang="en">
        <head><title>Jane Doe on X: "Notes on slow reading" / X</title></head>
        <body>
            <div id="react-root">
                <main>
                    <article data-testid="tweet">
                        <div data-testid="tweetText">
                            <p>Slow reading is a practice, and like every practice it gets easier with repetition, patience and a quiet room.</p>
                            <p>The second paragraph explains why paper, or e-ink, changes how carefully people follow an argument from start to end.</p>
                            <p>A third paragraph, with commas, clauses, and enough words to convince the scorer that this is the article body.</p>
                        </div>
                    </article>
                </main>
            </div>
        </body>
        </html>
    "#;

    #[test]
    fn test_default_config() {
        let pass = SmoothieReadability::default();
        assert_eq!(pass.max_elements, 9000);
        assert!(pass.fallback_to_body);
    }

    #[test]
    fn test_extracts_article_paragraphs() {
        let fragment = SmoothieReadability::new()
            .extract(THREAD_HTML, Some("https://x.com/jane/status/1"))
            .unwrap();
        assert!(fragment.content.contains("Slow reading is a practice"));
        assert!(fragment.content.contains("third paragraph"));
    }

    #[test]
    fn test_fallback_to_body() {
        let html = "<html><head><title>t</title></head><body><p>tiny</p></body></html>";
        let fragment = SmoothieReadability::new().extract(html, None).unwrap();
        assert!(fragment.content.contains("tiny"));
    }
}
