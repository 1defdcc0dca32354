//! Blob store abstraction for console file uploads.
//!
//! A blob is addressed by a [`BlobPath`] inside one bucket. Uploads report
//! byte progress through a [`ProgressObserver`] and resolve to a public
//! download URL; deletes accept either that URL or the bare path.

mod locator;
mod path;

pub use locator::BlobLocator;
pub use path::BlobPath;

use async_trait::async_trait;
use thiserror::Error;

/// Error type for blob store operations
#[derive(Debug, Error)]
pub enum BlobError {
    #[error("blob not found")]
    NotFound,
    #[error("invalid blob reference: {0}")]
    InvalidReference(String),
    #[error("I/O error: {0}")]
    Io(String),
    #[error("backend error: {0}")]
    Backend(String),
}

impl From<std::io::Error> for BlobError {
    fn from(e: std::io::Error) -> Self {
        if e.kind() == std::io::ErrorKind::NotFound {
            BlobError::NotFound
        } else {
            BlobError::Io(e.to_string())
        }
    }
}

/// Receives byte progress for a single upload.
pub trait ProgressObserver: Send + Sync {
    fn on_progress(&self, transferred: u64, total: u64);
}

/// Observer that discards progress.
pub struct NoProgress;

impl ProgressObserver for NoProgress {
    fn on_progress(&self, _transferred: u64, _total: u64) {}
}

/// Whole-number percentage of an upload, rounded to nearest.
/// An empty upload counts as complete.
pub fn percent(transferred: u64, total: u64) -> u8 {
    if total == 0 {
        return 100;
    }
    let pct = (transferred.min(total) as f64 / total as f64 * 100.0).round();
    pct as u8
}

/// Blob storage trait.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Upload `bytes` to `path`, reporting progress, and return the download URL.
    async fn put(
        &self,
        path: &BlobPath,
        content_type: &str,
        bytes: Vec<u8>,
        progress: &dyn ProgressObserver,
    ) -> Result<String, BlobError>;

    /// Delete the blob at `path`. Fails with `NotFound` when it is already gone.
    async fn delete(&self, path: &BlobPath) -> Result<(), BlobError>;

    /// Turn a download URL (or a bare path) back into a blob path.
    fn resolve(&self, reference: &str) -> Result<BlobPath, BlobError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percent_rounds_to_nearest() {
        assert_eq!(percent(0, 200), 0);
        assert_eq!(percent(1, 200), 1); // 0.5% rounds up
        assert_eq!(percent(99, 200), 50);
        assert_eq!(percent(200, 200), 100);
    }

    #[test]
    fn test_percent_of_empty_upload_is_complete() {
        assert_eq!(percent(0, 0), 100);
    }

    #[test]
    fn test_percent_clamps_overshoot() {
        assert_eq!(percent(300, 200), 100);
    }

    #[test]
    fn test_io_not_found_maps_to_not_found() {
        let err: BlobError = std::io::Error::from(std::io::ErrorKind::NotFound).into();
        assert!(matches!(err, BlobError::NotFound));
        let err: BlobError = std::io::Error::other("disk full").into();
        assert!(matches!(err, BlobError::Io(_)));
    }
}
