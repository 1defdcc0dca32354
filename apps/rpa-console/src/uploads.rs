//! Blob upload and best-effort delete helpers shared by the record services.

use chrono::Utc;
use futures::future::join_all;
use rpa_blob::{BlobError, BlobPath, BlobStore, ProgressObserver};
use tracing::{debug, info, warn};

use crate::attachments::LocalFile;

/// `{folder}/{millis}_{file_name}`
pub(crate) fn timestamped_path(folder: &str, file_name: &str) -> Result<BlobPath, BlobError> {
    BlobPath::in_folder(
        folder,
        &format!("{}_{}", Utc::now().timestamp_millis(), file_name),
    )
}

/// Upload one file and return its download URL.
pub(crate) async fn upload(
    blobs: &dyn BlobStore,
    path: &BlobPath,
    file: &LocalFile,
    progress: &dyn ProgressObserver,
) -> Result<String, BlobError> {
    debug!(path = %path, bytes = file.bytes.len(), "Uploading file");
    match blobs
        .put(path, &file.content_type, file.bytes.clone(), progress)
        .await
    {
        Ok(url) => {
            info!(path = %path, "Uploaded file");
            Ok(url)
        }
        Err(e) => {
            warn!(path = %path, error = %e, "Upload failed");
            Err(e)
        }
    }
}

/// Delete a blob by path. An already-missing blob counts as deleted.
pub(crate) async fn delete_path_quietly(blobs: &dyn BlobStore, path: &BlobPath) -> bool {
    match blobs.delete(path).await {
        Ok(()) => {
            info!(path = %path, "Deleted file");
            true
        }
        Err(BlobError::NotFound) => {
            debug!(path = %path, "File already gone");
            true
        }
        Err(e) => {
            warn!(path = %path, error = %e, "Failed to delete file");
            false
        }
    }
}

/// Delete a blob by download URL or path, logging instead of failing.
pub(crate) async fn delete_quietly(blobs: &dyn BlobStore, reference: &str) -> bool {
    match blobs.resolve(reference) {
        Ok(path) => delete_path_quietly(blobs, &path).await,
        Err(e) => {
            warn!(reference, error = %e, "Failed to delete file");
            false
        }
    }
}

/// Delete every reference concurrently. Returns how many deletions failed.
pub(crate) async fn delete_all_quietly(blobs: &dyn BlobStore, references: &[String]) -> usize {
    join_all(references.iter().map(|r| delete_quietly(blobs, r)))
        .await
        .into_iter()
        .filter(|deleted| !deleted)
        .count()
}

/// Delete every path concurrently. Returns how many deletions failed.
pub(crate) async fn delete_paths_quietly(blobs: &dyn BlobStore, paths: &[BlobPath]) -> usize {
    join_all(paths.iter().map(|p| delete_path_quietly(blobs, p)))
        .await
        .into_iter()
        .filter(|deleted| !deleted)
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rpa_backend_memory::MemoryBlobStore;
    use rpa_blob::{BlobLocator, NoProgress};

    fn store() -> MemoryBlobStore {
        MemoryBlobStore::new(BlobLocator::new("https://storage.test", "bucket").unwrap())
    }

    #[test]
    fn test_timestamped_path() {
        let path = timestamped_path("team-images", "me/pic.png").unwrap();
        let name = path.file_name();
        let (millis, rest) = name.split_once('_').unwrap();
        assert!(millis.parse::<i64>().is_ok());
        assert_eq!(rest, "me_pic.png");
        assert!(path.as_str().starts_with("team-images/"));
    }

    #[tokio::test]
    async fn test_delete_all_tolerates_missing_and_counts_bad_references() {
        let blobs = store();
        let file = LocalFile::new("a.png", "image/png", vec![1]);
        let path = BlobPath::new("team-images/1_a.png").unwrap();
        let url = upload(&blobs, &path, &file, &NoProgress).await.unwrap();

        let failures = delete_all_quietly(
            &blobs,
            &[
                url.clone(),
                url,
                "https://elsewhere.test/v0/b/bucket/o?name=x&alt=media".to_string(),
            ],
        )
        .await;
        assert_eq!(failures, 1);
        assert!(blobs.is_empty());
    }
}
