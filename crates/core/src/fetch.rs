//! Page fetching through a headless browser, plus local sources.
//!
//! Thread pages render client-side, so a plain GET returns an empty shell.
//! [`BrowserlessFetcher`] asks a Browserless-compatible service to load the
//! page with the session cookies injected, wait for the network to settle
//! and for thread content to appear, then return the rendered DOM.
//!
//! Every captured page goes through [`RawPage::from_html`], which refuses
//! sign-in walls with [`InkDropError::AuthExpired`] so no downstream stage
//! ever sees one.

use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde::Serialize;

use crate::parse::Document;
use crate::{InkDropError, Result};

/// Markers that only appear on a sign-in wall or a session-less error page.
pub const AUTH_WALL_MARKERS: &[&str] = &[
    "Sign in to X",
    "Log in to X",
    "Sign in to Twitter",
    "Log in to Twitter",
    r#"href="/login""#,
    r#"href="/i/flow/login""#,
    "This account doesn't exist",
    "Something went wrong. Try reloading",
];

/// Selectors that indicate thread content has rendered.
pub const CONTENT_SELECTORS: &[&str] = &[
    r#"article[data-testid="tweet"]"#,
    r#"[data-testid="tweetText"]"#,
    ".longform-unstyled",
    r#"[data-testid="cellInnerDiv"]"#,
];

/// Cookie domain the session tokens are scoped to.
pub const COOKIE_DOMAIN: &str = ".x.com";

/// Whether `html` contains any sign-in wall marker.
pub fn detect_auth_wall(html: &str) -> bool {
    AUTH_WALL_MARKERS.iter().any(|marker| html.contains(marker))
}

/// A captured page: rendered HTML and its `<title>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawPage {
    pub html: String,
    pub title: String,
}

impl RawPage {
    /// Wrap captured HTML, rejecting sign-in walls.
    ///
    /// The title is read from the first `<title>` element, empty if absent.
    pub fn from_html(html: String) -> Result<Self> {
        if detect_auth_wall(&html) {
            return Err(InkDropError::AuthExpired);
        }
        let title = Document::parse(&html)?.title().unwrap_or_default();
        Ok(Self { html, title })
    }
}

/// The two opaque session tokens.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionCredentials {
    pub auth_token: String,
    pub ct0: String,
}

impl std::fmt::Debug for SessionCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionCredentials")
            .field("auth_token", &format_args!("<{} chars>", self.auth_token.len()))
            .field("ct0", &format_args!("<{} chars>", self.ct0.len()))
            .finish()
    }
}

/// A browser cookie as the browser service expects it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Cookie {
    pub name: String,
    pub value: String,
    pub domain: String,
    pub path: String,
    pub secure: bool,
    pub http_only: bool,
}

impl SessionCredentials {
    pub fn new(auth_token: impl Into<String>, ct0: impl Into<String>) -> Self {
        Self { auth_token: auth_token.into(), ct0: ct0.into() }
    }

    /// Render both tokens as cookies. `ct0` is readable from script, the
    /// auth token is not.
    pub fn cookies(&self) -> Vec<Cookie> {
        vec![
            Cookie {
                name: "auth_token".to_string(),
                value: self.auth_token.clone(),
                domain: COOKIE_DOMAIN.to_string(),
                path: "/".to_string(),
                secure: true,
                http_only: true,
            },
            Cookie {
                name: "ct0".to_string(),
                value: self.ct0.clone(),
                domain: COOKIE_DOMAIN.to_string(),
                path: "/".to_string(),
                secure: true,
                http_only: false,
            },
        ]
    }
}

type CredentialLoader = Box<dyn Fn() -> Result<SessionCredentials> + Send + Sync>;

/// Short-lived, explicitly owned credential holder.
///
/// Credentials are loaded on first use and reused until `ttl` elapses, after
/// which the loader runs again. Each fetcher owns its cache; there is no
/// process-wide token state.
pub struct CredentialCache {
    loader: CredentialLoader,
    ttl: Duration,
    cached: Mutex<Option<(SessionCredentials, Instant)>>,
}

impl CredentialCache {
    pub fn new<F>(ttl: Duration, loader: F) -> Self
    where
        F: Fn() -> Result<SessionCredentials> + Send + Sync + 'static,
    {
        Self { loader: Box::new(loader), ttl, cached: Mutex::new(None) }
    }

    /// A cache that always returns the same credentials.
    pub fn fixed(credentials: SessionCredentials) -> Self {
        Self::new(Duration::MAX, move || Ok(credentials.clone()))
    }

    /// Current credentials, reloading them if the cached pair is stale.
    pub fn get(&self) -> Result<SessionCredentials> {
        let mut cached = self.cached.lock().unwrap_or_else(|poisoned| poisoned.into_inner());

        if let Some((credentials, loaded_at)) = cached.as_ref()
            && loaded_at.elapsed() < self.ttl
        {
            return Ok(credentials.clone());
        }

        let fresh = (self.loader)()?;
        *cached = Some((fresh.clone(), Instant::now()));
        Ok(fresh)
    }

    /// Drop the cached pair so the next [`get`](Self::get) reloads.
    pub fn invalidate(&self) {
        let mut cached = self.cached.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        *cached = None;
    }
}

impl std::fmt::Debug for CredentialCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialCache").field("ttl", &self.ttl).finish_non_exhaustive()
    }
}

/// Browser-service fetch configuration.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Base URL of the Browserless-compatible service.
    pub browser_url: String,
    /// Optional API token for the service.
    pub browser_token: Option<String>,
    /// Overall navigation budget.
    pub navigation_timeout: Duration,
    /// How long to wait for a content-marker selector.
    pub content_timeout: Duration,
    /// Fixed delay after load for client-side rendering.
    pub settle_delay: Duration,
    /// Selectors indicating content has rendered.
    pub content_selectors: Vec<String>,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            browser_url: "http://localhost:3000".to_string(),
            browser_token: None,
            navigation_timeout: Duration::from_secs(60),
            content_timeout: Duration::from_secs(20),
            settle_delay: Duration::from_millis(5000),
            content_selectors: CONTENT_SELECTORS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl FetchConfig {
    pub fn builder() -> FetchConfigBuilder {
        FetchConfigBuilder::new()
    }

    /// Total request budget: navigation, selector wait and settle delay.
    ///
    /// # Errors
    ///
    /// Returns [`InkDropError::Configuration`] when the sum does not fit in a
    /// [`Duration`].
    pub fn total_timeout(&self) -> Result<Duration> {
        self.navigation_timeout
            .checked_add(self.content_timeout)
            .and_then(|sum| sum.checked_add(self.settle_delay))
            .ok_or_else(|| InkDropError::Configuration("fetch timeouts are too large to add up".to_string()))
    }
}

/// Builder for FetchConfig.
pub struct FetchConfigBuilder {
    config: FetchConfig,
}

impl FetchConfigBuilder {
    pub fn new() -> Self {
        Self { config: FetchConfig::default() }
    }

    pub fn browser_url(mut self, value: impl Into<String>) -> Self {
        self.config.browser_url = value.into();
        self
    }

    pub fn browser_token(mut self, value: Option<String>) -> Self {
        self.config.browser_token = value;
        self
    }

    pub fn navigation_timeout(mut self, value: Duration) -> Self {
        self.config.navigation_timeout = value;
        self
    }

    pub fn content_timeout(mut self, value: Duration) -> Self {
        self.config.content_timeout = value;
        self
    }

    pub fn settle_delay(mut self, value: Duration) -> Self {
        self.config.settle_delay = value;
        self
    }

    pub fn content_selectors(mut self, value: Vec<String>) -> Self {
        self.config.content_selectors = value;
        self
    }

    pub fn build(self) -> FetchConfig {
        self.config
    }
}

impl Default for FetchConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Fetches a thread page and returns its rendered HTML and title.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<RawPage>;
}

#[async_trait]
impl<T: PageFetcher + ?Sized> PageFetcher for Box<T> {
    async fn fetch(&self, url: &str) -> Result<RawPage> {
        (**self).fetch(url).await
    }
}

#[cfg(feature = "fetch")]
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ContentRequest<'a> {
    url: &'a str,
    cookies: Vec<Cookie>,
    goto_options: GotoOptions,
    wait_for_selector: WaitForSelector,
    wait_for_timeout: u64,
    best_attempt: bool,
}

#[cfg(feature = "fetch")]
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GotoOptions {
    wait_until: &'static str,
    timeout: u64,
}

#[cfg(feature = "fetch")]
#[derive(Debug, Serialize)]
struct WaitForSelector {
    selector: String,
    timeout: u64,
}

/// [`PageFetcher`] backed by a Browserless `/content` endpoint.
///
/// One request is one fresh browser context: cookies are set before
/// navigation and the context is torn down when the response is sent.
#[cfg(feature = "fetch")]
pub struct BrowserlessFetcher {
    client: reqwest::Client,
    config: FetchConfig,
    credentials: CredentialCache,
    timings: Timings,
}

/// Per-stage budgets in whole milliseconds, as the browser service expects.
#[cfg(feature = "fetch")]
#[derive(Debug, Clone, Copy)]
struct Timings {
    navigation_ms: u64,
    content_ms: u64,
    settle_ms: u64,
    total: Duration,
}

#[cfg(feature = "fetch")]
impl Timings {
    fn from_config(config: &FetchConfig) -> Result<Self> {
        Ok(Self {
            navigation_ms: whole_millis(config.navigation_timeout, "navigation timeout")?,
            content_ms: whole_millis(config.content_timeout, "content timeout")?,
            settle_ms: whole_millis(config.settle_delay, "settle delay")?,
            total: config.total_timeout()?,
        })
    }
}

#[cfg(feature = "fetch")]
fn whole_millis(value: Duration, name: &str) -> Result<u64> {
    u64::try_from(value.as_millis())
        .map_err(|_| InkDropError::Configuration(format!("{name} of {}s is out of range", value.as_secs())))
}

#[cfg(feature = "fetch")]
impl BrowserlessFetcher {
    /// # Errors
    ///
    /// Returns [`InkDropError::Configuration`] when a timeout cannot be
    /// expressed to the browser service, before any network activity.
    pub fn new(config: FetchConfig, credentials: CredentialCache) -> Result<Self> {
        let timings = Timings::from_config(&config)?;
        let client = reqwest::Client::builder()
            .timeout(timings.total)
            .build()
            .map_err(InkDropError::HttpError)?;

        Ok(Self { client, config, credentials, timings })
    }

    pub fn config(&self) -> &FetchConfig {
        &self.config
    }

    fn endpoint(&self) -> String {
        let mut endpoint = format!("{}/content", self.config.browser_url.trim_end_matches('/'));
        if let Some(token) = &self.config.browser_token {
            endpoint.push_str(&format!("?token={token}"));
        }
        endpoint
    }

    fn request_body<'a>(&self, url: &'a str, credentials: &SessionCredentials) -> ContentRequest<'a> {
        ContentRequest {
            url,
            cookies: credentials.cookies(),
            goto_options: GotoOptions {
                wait_until: "networkidle0",
                timeout: self.timings.navigation_ms,
            },
            wait_for_selector: WaitForSelector {
                selector: self.config.content_selectors.join(", "),
                timeout: self.timings.content_ms,
            },
            wait_for_timeout: self.timings.settle_ms,
            best_attempt: true,
        }
    }

    fn warn_if_no_content(&self, page: &RawPage, url: &str) {
        let selectors: Vec<&str> = self.config.content_selectors.iter().map(String::as_str).collect();
        match Document::parse(&page.html).and_then(|doc| doc.matches_any(&selectors)) {
            Ok(true) => {}
            Ok(false) => tracing::warn!(url, "no content marker rendered, extracting best effort"),
            Err(e) => tracing::warn!(url, error = %e, "could not check content markers"),
        }
    }
}

#[cfg(feature = "fetch")]
#[async_trait]
impl PageFetcher for BrowserlessFetcher {
    async fn fetch(&self, url: &str) -> Result<RawPage> {
        url::Url::parse(url).map_err(|e| InkDropError::InvalidUrl(e.to_string()))?;
        let credentials = self.credentials.get()?;
        let body = self.request_body(url, &credentials);
        let timeout = self.timings.total.as_secs();

        tracing::info!(url, "fetching page through browser service");

        let response = self
            .client
            .post(self.endpoint())
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| if e.is_timeout() { InkDropError::Timeout { timeout } } else { InkDropError::HttpError(e) })?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(InkDropError::Browser { status: status.as_u16(), message });
        }

        let html = response
            .text()
            .await
            .map_err(|e| if e.is_timeout() { InkDropError::Timeout { timeout } } else { InkDropError::HttpError(e) })?;

        let page = RawPage::from_html(html)?;
        self.warn_if_no_content(&page, url);
        tracing::info!(url, bytes = page.html.len(), "page captured");

        Ok(page)
    }
}

/// Reads HTML content from a local file.
///
/// Callers should validate and sanitize the path when accepting user input.
pub fn fetch_file(path: &str) -> Result<String> {
    let path_buf = PathBuf::from(path);

    if !path_buf.exists() {
        Err(InkDropError::FileNotFound(path_buf))
    } else {
        fs::read_to_string(&path_buf).map_err(InkDropError::from)
    }
}

/// Reads HTML content from standard input until EOF.
pub fn fetch_stdin() -> Result<String> {
    use std::io::{self, Read};

    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer).map_err(InkDropError::from)?;

    Ok(buffer)
}
