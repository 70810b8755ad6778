//! End-to-end extraction: fetch, strip, readability, salvage, render.
//!
//! # Example
//!
//! ```rust
//! use inkdrop_core::{Pipeline, RawPage, SmoothieReadability};
//!
//! let html = r#"<html><head><title>Notes / X</title></head><body>
//!     <p>A paragraph that is comfortably long enough to keep.</p>
//! </body></html>"#;
//! let page = RawPage::from_html(html.to_string()).unwrap();
//! let article = Pipeline::offline(SmoothieReadability::default())
//!     .process_page(page, "https://x.com/jane/status/1")
//!     .unwrap();
//! assert_eq!(article.title, "Notes");
//! ```

use crate::article::CleanArticle;
use crate::extract::{ExtractConfig, extract_segments};
use crate::fetch::{PageFetcher, RawPage};
use crate::formatters::HtmlConfig;
use crate::preprocess::strip_boilerplate;
use crate::readability::ReadabilityPass;
use crate::title::{choose_title, normalize_title};
use crate::{InkDropError, Result};

/// Placeholder fetcher for pipelines that only process pages already in hand.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoFetch;

#[async_trait::async_trait]
impl PageFetcher for NoFetch {
    async fn fetch(&self, url: &str) -> Result<RawPage> {
        Err(InkDropError::Configuration(format!("no page fetcher configured for {url}")))
    }
}

/// The extraction pipeline over a fetcher and a readability collaborator.
#[derive(Debug)]
pub struct Pipeline<F, R> {
    fetcher: F,
    readability: R,
    pub extract: ExtractConfig,
    pub html: HtmlConfig,
}

impl<R: ReadabilityPass> Pipeline<NoFetch, R> {
    /// A pipeline without a fetcher, for files and stdin.
    pub fn offline(readability: R) -> Self {
        Self::new(NoFetch, readability)
    }
}

impl<F: PageFetcher, R: ReadabilityPass> Pipeline<F, R> {
    pub fn new(fetcher: F, readability: R) -> Self {
        Self { fetcher, readability, extract: ExtractConfig::default(), html: HtmlConfig::default() }
    }

    pub fn with_extract_config(mut self, config: ExtractConfig) -> Self {
        self.extract = config;
        self
    }

    pub fn with_html_config(mut self, config: HtmlConfig) -> Self {
        self.html = config;
        self
    }

    /// Fetch `url` and turn it into a [`CleanArticle`].
    ///
    /// Fetch failures, including [`InkDropError::AuthExpired`], are returned
    /// as-is. Nothing is retried.
    pub async fn extract_article(&self, url: &str) -> Result<CleanArticle> {
        let page = self.fetcher.fetch(url).await?;
        self.process_page(page, url)
    }

    /// Run every stage after the fetch on a page already in hand.
    ///
    /// An article with no surviving segments is still returned; callers
    /// decide whether that is a failure.
    pub fn process_page(&self, page: RawPage, url: &str) -> Result<CleanArticle> {
        let stripped = strip_boilerplate(&page.html);
        let fragment = self.readability.extract(&stripped, Some(url).filter(|u| !u.is_empty()))?;

        let title = normalize_title(choose_title(&fragment.title, &page.title));
        let segments = extract_segments(&fragment.content, &self.extract);

        tracing::debug!(
            raw_bytes = page.html.len(),
            stripped_bytes = stripped.len(),
            fragment_bytes = fragment.content.len(),
            segments = segments.len(),
            title = %title,
            "page processed"
        );

        Ok(CleanArticle::new(title, segments, url.to_string(), &self.html))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::readability::ReadableFragment;
    use async_trait::async_trait;

    struct FixedReadability(ReadableFragment);

    impl ReadabilityPass for FixedReadability {
        fn extract(&self, _html: &str, _url: Option<&str>) -> Result<ReadableFragment> {
            Ok(self.0.clone())
        }
    }

    struct EchoReadability;

    impl ReadabilityPass for EchoReadability {
        fn extract(&self, html: &str, _url: Option<&str>) -> Result<ReadableFragment> {
            Ok(ReadableFragment { content: html.to_string(), title: String::new() })
        }
    }

    struct StaticFetcher(&'static str);

    #[async_trait]
    impl PageFetcher for StaticFetcher {
        async fn fetch(&self, _url: &str) -> Result<RawPage> {
            RawPage::from_html(self.0.to_string())
        }
    }

    fn page(html: &str, title: &str) -> RawPage {
        RawPage { html: html.to_string(), title: title.to_string() }
    }

    fn block_on<T>(future: impl std::future::Future<Output = T>) -> T {
        tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(future)
    }

    #[test]
    fn test_readability_title_preferred() {
        let readability = FixedReadability(ReadableFragment {
            content: "<p>Readable content that is long enough.</p>".into(),
            title: r#"Jane on X: "Readable title""#.into(),
        });
        let article = Pipeline::offline(readability).process_page(page("", "Page title / X"), "u").unwrap();
        assert_eq!(article.title, "Readable title");
        assert!(article.html.contains("<title>Readable title</title>"));
    }

    #[test]
    fn test_page_title_fallback() {
        let readability = FixedReadability(ReadableFragment {
            content: "<p>Readable content that is long enough.</p>".into(),
            title: "  ".into(),
        });
        let article = Pipeline::offline(readability).process_page(page("", "(2) Page title / X"), "u").unwrap();
        assert_eq!(article.title, "Page title");
    }

    #[test]
    fn test_boilerplate_stripped_before_readability() {
        let html = r#"<body>
            <div class="errorContainer"><p>Something broke, please try again later.</p></div>
            <noscript><p>JavaScript is not available in this browser.</p></noscript>
            <p>The only real paragraph in this page body.</p>
        </body>"#;
        let article = Pipeline::offline(EchoReadability).process_page(page(html, "t"), "u").unwrap();
        let texts: Vec<&str> = article.segments.iter().map(|s| s.as_str()).collect();
        assert_eq!(texts, ["The only real paragraph in this page body."]);
    }

    #[test]
    fn test_empty_extraction_is_not_an_error() {
        let article = Pipeline::offline(EchoReadability).process_page(page("<p>Follow</p>", "t"), "u").unwrap();
        assert!(article.is_empty());
    }

    #[test]
    fn test_extract_article_propagates_auth_expired() {
        let pipeline = Pipeline::new(StaticFetcher(r#"<a href="/login">Log in</a>"#), EchoReadability);
        let err = block_on(pipeline.extract_article("https://x.com/a/status/1")).unwrap_err();
        assert!(err.is_auth_expired());
    }

    #[test]
    fn test_extract_article_end_to_end() {
        let pipeline = Pipeline::new(
            StaticFetcher("<html><head><title>Thread / X</title></head><body><p>Fetched paragraph that is long enough.</p></body></html>"),
            EchoReadability,
        );
        let article = block_on(pipeline.extract_article("https://x.com/a/status/1")).unwrap();
        assert_eq!(article.title, "Thread");
        assert_eq!(article.url, "https://x.com/a/status/1");
        assert_eq!(article.segments.len(), 1);
    }

    #[test]
    fn test_offline_pipeline_cannot_fetch() {
        let err = block_on(Pipeline::offline(EchoReadability).extract_article("https://x.com/a/status/1")).unwrap_err();
        assert!(matches!(err, InkDropError::Configuration(_)));
    }
}
