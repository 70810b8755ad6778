//! Error types for Ink Drop operations.
//!
//! This module defines the main error type [`InkDropError`] which represents
//! every failure the fetch/extract/deliver pipeline can surface.
//!
//! An empty extraction is deliberately *not* an error: the extractor returns
//! an empty segment list and the caller decides what that means.
//!
//! # Example
//!
//! ```rust
//! use inkdrop_core::{InkDropError, Result};
//!
//! fn require_token(token: Option<&str>) -> Result<String> {
//!     token
//!         .map(str::to_string)
//!         .ok_or_else(|| InkDropError::Configuration("TWITTER_AUTH_TOKEN is not set".into()))
//! }
//! # assert!(require_token(None).is_err());
//! ```

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for fetching and extraction.
///
/// # Example
///
/// ```rust
/// use inkdrop_core::{InkDropError, RawPage};
///
/// match RawPage::from_html(r#"<a href="/login">Log in</a>"#.to_string()) {
///     Err(InkDropError::AuthExpired) => println!("refresh the session cookies"),
///     Err(e) => println!("Error: {}", e),
///     Ok(page) => println!("Fetched: {}", page.title),
/// }
/// ```
#[derive(Error, Debug)]
pub enum InkDropError {
    /// The fetched page is a sign-in wall.
    ///
    /// The session credentials are no longer accepted. This is never retried
    /// and no HTML from the page is handed downstream.
    #[error("Session credentials have expired or are invalid")]
    AuthExpired,

    /// A required credential or setting is missing or malformed.
    ///
    /// Raised before any network activity takes place.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// HTTP request errors from reqwest.
    ///
    /// This variant wraps network errors, DNS failures, connection issues,
    /// and other transport problems talking to the browser service.
    #[cfg(feature = "fetch")]
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// The browser service answered with a non-success status.
    #[error("Browser service error (status {status}): {message}")]
    Browser { status: u16, message: String },

    /// Request timeout.
    ///
    /// Returned when a fetch exceeds the overall navigation budget.
    #[error("Request timed out after {timeout} seconds")]
    Timeout { timeout: u64 },

    /// Invalid URL provided.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// The URL does not point at the supported source platform.
    #[error("URL must be a Twitter/X link: {0}")]
    NotTargetPlatform(String),

    /// HTML parsing errors, usually an invalid CSS selector.
    #[error("Failed to parse HTML: {0}")]
    HtmlParseError(String),

    /// The readability collaborator could not process the page.
    #[error("Readability pass failed: {0}")]
    Readability(String),

    /// Article serialization failed.
    #[error("Failed to serialize article: {0}")]
    Serialization(#[from] serde_json::Error),

    /// File not found.
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// File read/write errors.
    #[error("Failed to write to file: {0}")]
    WriteError(#[from] std::io::Error),
}

impl InkDropError {
    /// Whether this error means the session credentials must be refreshed.
    pub fn is_auth_expired(&self) -> bool {
        matches!(self, InkDropError::AuthExpired)
    }
}

/// Result type alias for InkDropError.
pub type Result<T> = std::result::Result<T, InkDropError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = InkDropError::InvalidUrl("not a url".to_string());
        assert!(err.to_string().contains("Invalid URL"));
    }

    #[test]
    fn test_auth_expired_is_distinct() {
        assert!(InkDropError::AuthExpired.is_auth_expired());
        assert!(!InkDropError::Timeout { timeout: 60 }.is_auth_expired());
        assert!(!InkDropError::Configuration("x".into()).is_auth_expired());
    }

    #[test]
    fn test_timeout_error() {
        let err = InkDropError::Timeout { timeout: 30 };
        assert!(err.to_string().contains("30"));
    }

    #[test]
    fn test_browser_error_carries_status() {
        let err = InkDropError::Browser { status: 502, message: "bad gateway".into() };
        let msg = err.to_string();
        assert!(msg.contains("502"));
        assert!(msg.contains("bad gateway"));
    }
}
