//! Saving media to the download directory.

mod error;
mod fetch;
mod target;

pub use error::DownloadError;
pub use fetch::fetch_to_dir;
pub use target::{persist, reserve, temp_path, unique_target, TEMP_SUFFIX};

use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

use crate::media::MediaKind;
use crate::url_model::download_filename;

/// Reject URLs the host cannot fetch.
pub fn validate_url(url: &str) -> Result<(), DownloadError> {
    let trimmed = url.trim();
    if trimmed.is_empty() || trimmed == "undefined" || trimmed == "blob:null" {
        return Err(DownloadError::InvalidUrl(url.to_string()));
    }
    if trimmed.starts_with("blob:") {
        return Err(DownloadError::BlobUrl);
    }
    if !trimmed.starts_with("http") {
        return Err(DownloadError::InvalidUrl(url.to_string()));
    }
    Ok(())
}

/// One entry of a batch download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchItem {
    pub url: String,
    pub filename: Option<String>,
    pub kind: Option<MediaKind>,
}

/// Outcome of one batch entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchOutcome {
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Writes downloads into one directory.
#[derive(Debug, Clone)]
pub struct Saver {
    dir: PathBuf,
    connect_timeout: Duration,
}

impl Saver {
    pub fn new(dir: impl Into<PathBuf>, connect_timeout: Duration) -> Self {
        Self {
            dir: dir.into(),
            connect_timeout,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Validate, name and fetch one URL.
    pub async fn save(
        &self,
        url: &str,
        filename: Option<&str>,
        kind: Option<MediaKind>,
    ) -> Result<PathBuf, DownloadError> {
        validate_url(url)?;
        let name = download_filename(url, filename, kind);
        let url = url.trim().to_string();
        let dir = self.dir.clone();
        let timeout = self.connect_timeout;
        let path = tokio::task::spawn_blocking(move || fetch_to_dir(&url, &dir, &name, timeout))
            .await
            .map_err(|e| DownloadError::Task(e.to_string()))??;
        info!(path = %path.display(), "download complete");
        Ok(path)
    }

    /// Save items one after another. A failed item is reported and the
    /// batch continues.
    pub async fn save_batch(&self, items: &[BatchItem]) -> Vec<BatchOutcome> {
        let mut outcomes = Vec::with_capacity(items.len());
        for item in items {
            let outcome = match self.save(&item.url, item.filename.as_deref(), item.kind).await {
                Ok(path) => BatchOutcome {
                    url: item.url.clone(),
                    path: Some(path),
                    error: None,
                },
                Err(e) => {
                    warn!(url = %item.url, error = %e, "batch item failed");
                    BatchOutcome {
                        url: item.url.clone(),
                        path: None,
                        error: Some(e.to_string()),
                    }
                }
            };
            outcomes.push(outcome);
        }
        outcomes
    }
}
