//! Delivery contract.
//!
//! The pipeline produces a [`CleanArticle`]; getting it onto a device is a
//! separate concern behind the [`Delivery`] trait. [`OutboxDelivery`] writes
//! the rendered HTML into a directory that a sync client or mail relay can
//! pick up.

use std::io::ErrorKind;
use std::path::PathBuf;

use async_trait::async_trait;
use serde::Serialize;
use tokio::fs::{self, File, OpenOptions};
use tokio::io::AsyncWriteExt;

use crate::Result;
use crate::article::CleanArticle;

const INVALID_FILENAME_CHARS: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];
const MAX_FILENAME_CHARS: usize = 100;

/// Where an article ended up and a human-readable confirmation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeliveryReceipt {
    pub location: String,
    pub message: String,
}

/// Hands a finished article to its destination.
#[async_trait]
pub trait Delivery: Send + Sync {
    async fn deliver(&self, article: &CleanArticle) -> Result<DeliveryReceipt>;
}

/// Turn an article title into a safe file stem.
///
/// Path and shell-hostile characters are removed, the result is cut to 100
/// characters and trimmed, and an empty result becomes `article`.
pub fn sanitize_filename(title: &str) -> String {
    let cleaned: String = title
        .chars()
        .filter(|c| !INVALID_FILENAME_CHARS.contains(c) && !c.is_control())
        .take(MAX_FILENAME_CHARS)
        .collect();
    let trimmed = cleaned.trim();

    if trimmed.is_empty() { "article".to_string() } else { trimmed.to_string() }
}

/// [`Delivery`] that writes `<title>.html` into a directory.
#[derive(Debug, Clone)]
pub struct OutboxDelivery {
    dir: PathBuf,
}

impl OutboxDelivery {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Create the first free file for `stem`, adding ` (2)`, ` (3)`, ... on
    /// collision. Creation is exclusive, so concurrent deliveries of the same
    /// title never share a file.
    async fn create_unique(&self, stem: &str) -> Result<(PathBuf, File)> {
        let mut n = 1usize;
        loop {
            let path = match n {
                1 => self.dir.join(format!("{stem}.html")),
                n => self.dir.join(format!("{stem} ({n}).html")),
            };
            match OpenOptions::new().write(true).create_new(true).open(&path).await {
                Ok(file) => return Ok((path, file)),
                Err(e) if e.kind() == ErrorKind::AlreadyExists => n += 1,
                Err(e) => return Err(e.into()),
            }
        }
    }
}

#[async_trait]
impl Delivery for OutboxDelivery {
    async fn deliver(&self, article: &CleanArticle) -> Result<DeliveryReceipt> {
        fs::create_dir_all(&self.dir).await?;

        let (path, mut file) = self.create_unique(&sanitize_filename(&article.title)).await?;
        file.write_all(article.html.as_bytes()).await?;
        file.flush().await?;

        tracing::info!(path = %path.display(), bytes = article.html.len(), "article written to outbox");

        Ok(DeliveryReceipt { location: path.display().to_string(), message: "Article saved to outbox!".to_string() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formatters::HtmlConfig;
    use rstest::rstest;
    use std::collections::HashSet;
    use tempfile::TempDir;

    #[rstest]
    #[case("My big idea", "My big idea")]
    #[case(r#"a<b>c:d"e/f\g|h?i*j"#, "abcdefghij")]
    #[case("   padded   ", "padded")]
    #[case("", "article")]
    #[case("???", "article")]
    #[case("line\nbreak", "linebreak")]
    fn test_sanitize_filename(#[case] title: &str, #[case] expected: &str) {
        assert_eq!(sanitize_filename(title), expected);
    }

    #[test]
    fn test_sanitize_truncates_by_characters() {
        let title = "é".repeat(150);
        assert_eq!(sanitize_filename(&title).chars().count(), 100);
    }

    fn article(title: &str) -> CleanArticle {
        CleanArticle::new(title.to_string(), Vec::new(), "https://x.com/a/status/1".into(), &HtmlConfig::default())
    }

    #[tokio::test]
    async fn test_outbox_writes_html() {
        let dir = TempDir::new().unwrap();
        let outbox = OutboxDelivery::new(dir.path().join("outbox"));

        let receipt = outbox.deliver(&article("Thread: part 1")).await.unwrap();

        let expected = dir.path().join("outbox").join("Thread part 1.html");
        assert_eq!(receipt.location, expected.display().to_string());
        let written = std::fs::read_to_string(expected).unwrap();
        assert!(written.contains("<h1>Thread: part 1</h1>"));
    }

    #[tokio::test]
    async fn test_outbox_avoids_collisions() {
        let dir = TempDir::new().unwrap();
        let outbox = OutboxDelivery::new(dir.path());

        outbox.deliver(&article("Same")).await.unwrap();
        outbox.deliver(&article("Same")).await.unwrap();
        let third = outbox.deliver(&article("Same")).await.unwrap();

        assert!(dir.path().join("Same.html").exists());
        assert!(dir.path().join("Same (2).html").exists());
        assert!(third.location.ends_with("Same (3).html"));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_same_title_never_overwrites() {
        let dir = TempDir::new().unwrap();
        let outbox = OutboxDelivery::new(dir.path());
        let same = article("Same");

        let (a, b, c) = tokio::join!(outbox.deliver(&same), outbox.deliver(&same), outbox.deliver(&same));

        let locations: HashSet<String> = [a, b, c].into_iter().map(|r| r.unwrap().location).collect();
        assert_eq!(locations.len(), 3);
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 3);
        for location in &locations {
            assert!(std::fs::read_to_string(location).unwrap().contains("<h1>Same</h1>"));
        }
    }
}
