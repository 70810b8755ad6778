//! Environment-driven settings.
//!
//! Secrets and deployment-specific values come from the environment, with a
//! `.env` file in the working directory loaded first when present.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::fetch::{CredentialCache, FetchConfig, SessionCredentials};
use crate::{InkDropError, Result};

pub const AUTH_TOKEN_VAR: &str = "TWITTER_AUTH_TOKEN";
pub const CT0_VAR: &str = "TWITTER_CT0";

/// How long a loaded credential pair is reused before the environment is
/// read again.
pub const CREDENTIAL_TTL: Duration = Duration::from_secs(300);

/// Application settings loaded from environment variables.
#[derive(Clone)]
pub struct Settings {
    // Session
    pub auth_token: Option<String>,
    pub ct0: Option<String>,

    // Browser service
    pub browser_url: String,
    pub browser_token: Option<String>,
    pub navigation_timeout: Duration,
    pub content_timeout: Duration,
    pub settle_delay: Duration,

    // Storage
    pub ledger_path: PathBuf,
    pub outbox_dir: PathBuf,

    // Server
    pub host: String,
    pub port: u16,
}

impl Settings {
    /// Load `.env` (if any) and read settings from the process environment.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        let settings = Self::from_lookup(|key| std::env::var(key).ok())?;
        settings.log_keys();
        Ok(settings)
    }

    /// Read settings through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let data_dir = dirs::data_dir().map(|d| d.join("inkdrop"));

        let settings = Self {
            auth_token: var(AUTH_TOKEN_VAR),
            ct0: var(CT0_VAR),
            browser_url: var("BROWSERLESS_URL").unwrap_or_else(|| "http://localhost:3000".to_string()),
            browser_token: var("BROWSERLESS_TOKEN"),
            navigation_timeout: Duration::from_secs(parse_or(var("INKDROP_NAV_TIMEOUT_SECS"), "INKDROP_NAV_TIMEOUT_SECS", 60)?),
            content_timeout: Duration::from_secs(parse_or(
                var("INKDROP_CONTENT_TIMEOUT_SECS"),
                "INKDROP_CONTENT_TIMEOUT_SECS",
                20,
            )?),
            settle_delay: Duration::from_millis(parse_or(var("INKDROP_SETTLE_DELAY_MS"), "INKDROP_SETTLE_DELAY_MS", 5000)?),
            ledger_path: var("INKDROP_LEDGER").map(PathBuf::from).unwrap_or_else(|| match &data_dir {
                Some(dir) => dir.join("sent_articles.txt"),
                None => PathBuf::from("sent_articles.txt"),
            }),
            outbox_dir: var("INKDROP_OUTBOX").map(PathBuf::from).unwrap_or_else(|| match &data_dir {
                Some(dir) => dir.join("outbox"),
                None => PathBuf::from("outbox"),
            }),
            host: var("INKDROP_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: parse_or(var("INKDROP_PORT"), "INKDROP_PORT", 8080)?,
        };
        settings.check_timeouts()?;
        Ok(settings)
    }

    /// Every budget must be expressible in milliseconds and their sum must
    /// fit in a [`Duration`].
    fn check_timeouts(&self) -> Result<()> {
        for (name, value) in [
            ("INKDROP_NAV_TIMEOUT_SECS", self.navigation_timeout),
            ("INKDROP_CONTENT_TIMEOUT_SECS", self.content_timeout),
            ("INKDROP_SETTLE_DELAY_MS", self.settle_delay),
        ] {
            if u64::try_from(value.as_millis()).is_err() {
                return Err(InkDropError::Configuration(format!("{name} is out of range")));
            }
        }
        self.fetch_config().total_timeout().map(|_| ())
    }

    /// Both session tokens, or a configuration error naming what is missing.
    pub fn credentials(&self) -> Result<SessionCredentials> {
        match (&self.auth_token, &self.ct0) {
            (Some(auth_token), Some(ct0)) => Ok(SessionCredentials::new(auth_token, ct0)),
            (None, _) => Err(missing(AUTH_TOKEN_VAR)),
            (_, None) => Err(missing(CT0_VAR)),
        }
    }

    /// A credential cache seeded from these settings.
    ///
    /// Fails immediately when a token is missing so no fetch is attempted.
    pub fn credential_cache(&self) -> Result<CredentialCache> {
        let credentials = self.credentials()?;
        Ok(CredentialCache::new(CREDENTIAL_TTL, move || Ok(credentials.clone())))
    }

    /// A credential cache that reports missing tokens on use rather than now.
    ///
    /// Lets a long-running service start without credentials and answer each
    /// request with a configuration error until they are provided.
    pub fn deferred_credential_cache(&self) -> CredentialCache {
        let settings = self.clone();
        CredentialCache::new(CREDENTIAL_TTL, move || settings.credentials())
    }

    pub fn fetch_config(&self) -> FetchConfig {
        FetchConfig::builder()
            .browser_url(self.browser_url.clone())
            .browser_token(self.browser_token.clone())
            .navigation_timeout(self.navigation_timeout)
            .content_timeout(self.content_timeout)
            .settle_delay(self.settle_delay)
            .build()
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    fn log_keys(&self) {
        tracing::info!("Config loaded:");
        tracing::info!("  {AUTH_TOKEN_VAR}: {}", preview_opt(&self.auth_token));
        tracing::info!("  {CT0_VAR}: {}", preview_opt(&self.ct0));
        tracing::info!("  BROWSERLESS_URL: {}", self.browser_url);
        tracing::info!("  BROWSERLESS_TOKEN: {}", preview_opt(&self.browser_token));
        tracing::info!("  INKDROP_LEDGER: {}", self.ledger_path.display());
        tracing::info!("  INKDROP_OUTBOX: {}", self.outbox_dir.display());
    }
}

impl std::fmt::Debug for Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Settings")
            .field("auth_token", &preview_opt(&self.auth_token))
            .field("ct0", &preview_opt(&self.ct0))
            .field("browser_url", &self.browser_url)
            .field("browser_token", &preview_opt(&self.browser_token))
            .field("navigation_timeout", &self.navigation_timeout)
            .field("content_timeout", &self.content_timeout)
            .field("settle_delay", &self.settle_delay)
            .field("ledger_path", &self.ledger_path)
            .field("outbox_dir", &self.outbox_dir)
            .field("host", &self.host)
            .field("port", &self.port)
            .finish()
    }
}

fn missing(key: &str) -> InkDropError {
    InkDropError::Configuration(format!("{key} is not set"))
}

fn parse_or<T: FromStr>(value: Option<String>, key: &str, default: T) -> Result<T> {
    match value {
        Some(raw) => raw
            .parse()
            .map_err(|_| InkDropError::Configuration(format!("{key} must be a number, got {raw:?}"))),
        None => Ok(default),
    }
}

fn preview(val: &str) -> String {
    let head: String = val.chars().take(4).collect();
    format!("{head}...({} chars)", val.chars().count())
}

fn preview_opt(val: &Option<String>) -> String {
    match val {
        Some(v) => preview(v),
        None => "<not set>".to_string(),
    }
}
