//! The finished article handed to delivery.
//!
//! [`CleanArticle`] is built once from a normalized title and the extracted
//! segments. Its rendered HTML and plain-text view are computed up front, so
//! every delivery channel sees the same bytes.

use serde::Serialize;

use crate::Result;
use crate::extract::TextSegment;
#[cfg(feature = "markdown")]
use crate::formatters::{MarkdownConfig, convert_to_markdown};
use crate::formatters::{HtmlConfig, TextConfig, convert_to_text, render_html};

/// Words per minute used for the reading time estimate.
const WORDS_PER_MINUTE: f64 = 200.0;

/// Output format options for a [`CleanArticle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// The rendered e-ink HTML document.
    Html,
    /// Markdown with TOML frontmatter.
    #[cfg(feature = "markdown")]
    Markdown,
    /// Plain text, one paragraph per block.
    PlainText,
    /// JSON (structured data).
    Json,
}

/// A cleaned, rendered article.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CleanArticle {
    /// Normalized display title.
    pub title: String,

    /// Complete rendered HTML document.
    pub html: String,

    /// Plain-text view of `html`, blocks separated by blank lines.
    pub text: String,

    /// Source URL the article was extracted from.
    pub url: String,

    /// Ordered, deduplicated prose segments.
    pub segments: Vec<TextSegment>,

    /// Word count over all segments.
    pub word_count: usize,

    /// Estimated reading time in minutes.
    pub reading_time: f64,
}

impl CleanArticle {
    /// Render `segments` under `title` and derive the text view and metrics.
    pub fn new(title: String, segments: Vec<TextSegment>, url: String, config: &HtmlConfig) -> Self {
        let html = render_html(&title, &segments, config);
        let text = convert_to_text(&html, &TextConfig::default());
        let word_count = segments.iter().map(|s| s.as_str().split_whitespace().count()).sum();
        let reading_time = word_count as f64 / WORDS_PER_MINUTE;

        Self { title, html, text, url, segments, word_count, reading_time }
    }

    /// Whether extraction kept no segments at all.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Converts the article to the specified format.
    pub fn to_format(&self, format: OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Html => Ok(self.html.clone()),
            #[cfg(feature = "markdown")]
            OutputFormat::Markdown => Ok(self.to_markdown(&MarkdownConfig { include_frontmatter: true })),
            OutputFormat::PlainText => Ok(self.text.clone()),
            OutputFormat::Json => Ok(serde_json::to_string_pretty(self)?),
        }
    }

    /// Plain text wrapped to a terminal width.
    pub fn to_text(&self, config: &TextConfig) -> String {
        convert_to_text(&self.html, config)
    }

    /// Gets content as Markdown with custom configuration.
    #[cfg(feature = "markdown")]
    pub fn to_markdown(&self, config: &MarkdownConfig) -> String {
        let source = (!self.url.is_empty()).then_some(self.url.as_str());
        convert_to_markdown(&self.title, &self.segments, source, config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::{ExtractConfig, dedup_texts};

    fn article() -> CleanArticle {
        let segments = dedup_texts(
            ["The first paragraph has six words.", "And the second one has five."],
            &ExtractConfig::default(),
        );
        CleanArticle::new(
            "Reading slowly".to_string(),
            segments,
            "https://x.com/jane/status/1".to_string(),
            &HtmlConfig::default(),
        )
    }

    #[test]
    fn test_article_creation() {
        let article = article();
        assert_eq!(article.segments.len(), 2);
        assert!(article.html.contains("<h1>Reading slowly</h1>"));
        assert_eq!(
            article.text,
            "Reading slowly\n\nThe first paragraph has six words.\n\nAnd the second one has five."
        );
        assert_eq!(article.word_count, 12);
        assert!((article.reading_time - 12.0 / 200.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_empty_article() {
        let article = CleanArticle::new("t".into(), Vec::new(), String::new(), &HtmlConfig::default());
        assert!(article.is_empty());
        assert_eq!(article.word_count, 0);
        assert_eq!(article.text, "t");
    }

    #[test]
    fn test_to_format_html_and_text() {
        let article = article();
        assert_eq!(article.to_format(OutputFormat::Html).unwrap(), article.html);
        assert_eq!(article.to_format(OutputFormat::PlainText).unwrap(), article.text);
    }

    #[test]
    fn test_to_format_json() {
        let json = article().to_format(OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["title"], "Reading slowly");
        assert_eq!(value["url"], "https://x.com/jane/status/1");
        assert_eq!(value["segments"][0], "The first paragraph has six words.");
        assert_eq!(value["word_count"], 12);
    }

    #[cfg(feature = "markdown")]
    #[test]
    fn test_to_format_markdown() {
        let md = article().to_format(OutputFormat::Markdown).unwrap();
        assert!(md.starts_with("+++"));
        assert!(md.contains("source = \"https://x.com/jane/status/1\""));
        assert!(md.contains("# Reading slowly"));
    }

    #[test]
    fn test_wrapped_text() {
        let text = article().to_text(&TextConfig { line_width: 20 });
        assert!(text.lines().count() > 5);
    }
}
