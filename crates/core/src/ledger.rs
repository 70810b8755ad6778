//! Duplicate-submission ledger.
//!
//! An append-only text file with one normalized URL per line. The pipeline
//! never touches it; the service reserves a URL before extraction and
//! commits the reservation after a successful delivery.

use std::collections::HashSet;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;

use crate::Result;
use crate::source::normalize_url;

/// Flat-file record of already delivered URLs.
#[derive(Debug)]
pub struct SentLedger {
    path: PathBuf,
    file_lock: tokio::sync::Mutex<()>,
    in_flight: Mutex<HashSet<String>>,
}

/// Exclusive claim on a URL while it is being extracted and delivered.
///
/// Dropping it without [`Reservation::commit`] releases the URL so a later
/// submission may retry.
#[must_use = "dropping a reservation releases the URL"]
#[derive(Debug)]
pub struct Reservation<'a> {
    ledger: &'a SentLedger,
    url: String,
}

impl Reservation<'_> {
    /// The normalized URL held by this reservation.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Record the URL as sent and release the claim.
    pub async fn commit(self) -> Result<()> {
        self.ledger.append(&self.url).await
    }
}

impl Drop for Reservation<'_> {
    fn drop(&mut self) {
        self.ledger.in_flight().remove(&self.url);
    }
}

impl SentLedger {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), file_lock: tokio::sync::Mutex::new(()), in_flight: Mutex::new(HashSet::new()) }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn in_flight(&self) -> MutexGuard<'_, HashSet<String>> {
        self.in_flight.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Whether the normalized form of `url` is already recorded.
    ///
    /// A ledger file that does not exist yet means nothing was sent.
    pub async fn was_already_sent(&self, url: &str) -> Result<bool> {
        self.contains(&normalize_url(url)).await
    }

    /// Append the normalized form of `url`, creating the file and its parent
    /// directories on first use.
    pub async fn mark_as_sent(&self, url: &str) -> Result<()> {
        self.append(&normalize_url(url)).await
    }

    /// Claim `url` for delivery.
    ///
    /// Returns `None` when the URL is already recorded or another submission
    /// of it is still in progress.
    pub async fn try_reserve(&self, url: &str) -> Result<Option<Reservation<'_>>> {
        let normalized = normalize_url(url);
        let claimed = {
            let mut in_flight = self.in_flight();
            in_flight.insert(normalized.clone())
        };
        if !claimed {
            tracing::debug!(url = %normalized, "submission already in progress");
            return Ok(None);
        }

        let reservation = Reservation { ledger: self, url: normalized };
        if self.contains(&reservation.url).await? {
            return Ok(None);
        }
        Ok(Some(reservation))
    }

    async fn contains(&self, normalized: &str) -> Result<bool> {
        let _guard = self.file_lock.lock().await;

        match fs::read_to_string(&self.path).await {
            Ok(contents) => Ok(contents.lines().any(|line| line.trim() == normalized)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    async fn append(&self, normalized: &str) -> Result<()> {
        let _guard = self.file_lock.lock().await;

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).await?;
        }

        let mut file = OpenOptions::new().create(true).append(true).open(&self.path).await?;
        file.write_all(format!("{normalized}\n").as_bytes()).await?;
        file.flush().await?;
        tracing::debug!(url = %normalized, ledger = %self.path.display(), "recorded delivery");
        Ok(())
    }
}
