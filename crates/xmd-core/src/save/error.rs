//! Save-to-disk errors.

/// Why a download did not produce a file.
#[derive(Debug, thiserror::Error)]
pub enum DownloadError {
    /// Empty, `undefined`, `blob:null` or non-http URL.
    #[error("invalid media url: {0:?}")]
    InvalidUrl(String),
    /// Page-local `blob:` references only exist inside the browser.
    #[error("blob urls must be resolved before download")]
    BlobUrl,
    #[error("HTTP {0}")]
    Http(u32),
    #[error("transfer failed: {0}")]
    Curl(#[from] curl::Error),
    #[error("storage: {0}")]
    Io(#[from] std::io::Error),
    #[error("download task failed: {0}")]
    Task(String),
}
