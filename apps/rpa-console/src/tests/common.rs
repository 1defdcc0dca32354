//! Shared test fixtures: in-memory backends, a failure-injecting blob store
//! and small record helpers.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rpa_backend_memory::{MemoryBlobStore, MemoryIdentityProvider, MemoryStore};
use rpa_blob::{BlobError, BlobLocator, BlobPath, BlobStore, NoProgress, ProgressObserver};
use rpa_config::{keys, LocalStore, MemoryLocalStore};
use rpa_storage::{insert_record, DocumentId, RegisteredUser};

use crate::attachments::LocalFile;
use crate::console::Console;
use crate::notify::ToastLog;
use crate::records::RecordContext;

pub const STORAGE_ENDPOINT: &str = "https://storage.test";
pub const STORAGE_BUCKET: &str = "rpa-test";

pub fn locator() -> BlobLocator {
    BlobLocator::new(STORAGE_ENDPOINT, STORAGE_BUCKET).unwrap()
}

/// A small fake image.
pub fn image(name: &str) -> LocalFile {
    LocalFile::new(name, "image/jpeg", name.as_bytes().repeat(8))
}

pub fn images(prefix: &str, count: usize) -> Vec<LocalFile> {
    (0..count)
        .map(|i| image(&format!("{}{}.jpg", prefix, i)))
        .collect()
}

/// In-memory blob store that fails selected uploads and deletions.
pub struct FailingBlobStore {
    pub inner: MemoryBlobStore,
    failing_uploads: Mutex<Vec<String>>,
    failing_deletes: Mutex<Vec<String>>,
}

impl FailingBlobStore {
    pub fn new() -> Self {
        Self {
            inner: MemoryBlobStore::new(locator()),
            failing_uploads: Mutex::new(Vec::new()),
            failing_deletes: Mutex::new(Vec::new()),
        }
    }

    /// Fail every upload whose path contains `fragment`.
    pub fn fail_uploads_matching(&self, fragment: &str) {
        self.failing_uploads.lock().unwrap().push(fragment.to_string());
    }

    /// Fail every delete whose path contains `fragment`.
    pub fn fail_deletes_matching(&self, fragment: &str) {
        self.failing_deletes.lock().unwrap().push(fragment.to_string());
    }

    fn matches(list: &Mutex<Vec<String>>, path: &BlobPath) -> bool {
        list.lock()
            .unwrap()
            .iter()
            .any(|f| path.as_str().contains(f.as_str()))
    }
}

#[async_trait]
impl BlobStore for FailingBlobStore {
    async fn put(
        &self,
        path: &BlobPath,
        content_type: &str,
        bytes: Vec<u8>,
        progress: &dyn ProgressObserver,
    ) -> Result<String, BlobError> {
        if Self::matches(&self.failing_uploads, path) {
            progress.on_progress(0, bytes.len() as u64);
            return Err(BlobError::Backend("injected upload failure".into()));
        }
        self.inner.put(path, content_type, bytes, progress).await
    }

    async fn delete(&self, path: &BlobPath) -> Result<(), BlobError> {
        if Self::matches(&self.failing_deletes, path) {
            return Err(BlobError::Backend("injected delete failure".into()));
        }
        self.inner.delete(path).await
    }

    fn resolve(&self, reference: &str) -> Result<BlobPath, BlobError> {
        self.inner.resolve(reference)
    }
}

/// In-memory backends plus a toast log, wired like a console.
pub struct Backends {
    pub documents: Arc<MemoryStore>,
    pub blobs: Arc<FailingBlobStore>,
    pub identity: Arc<MemoryIdentityProvider>,
    pub local: Arc<MemoryLocalStore>,
    pub toasts: Arc<ToastLog>,
}

impl Backends {
    pub fn new() -> Self {
        Self {
            documents: Arc::new(MemoryStore::new()),
            blobs: Arc::new(FailingBlobStore::new()),
            identity: Arc::new(MemoryIdentityProvider::new()),
            local: Arc::new(MemoryLocalStore::new()),
            toasts: Arc::new(ToastLog::new()),
        }
    }

    /// Backends with `phone` stored as the signed-in number.
    pub fn signed_in(phone: &str) -> Self {
        let backends = Self::new();
        backends.local.set(keys::PHONE_NUMBER, phone).unwrap();
        backends
    }

    pub fn context(&self) -> RecordContext {
        RecordContext {
            documents: self.documents.clone(),
            blobs: self.blobs.clone(),
            notifier: self.toasts.clone(),
        }
    }

    pub fn console(&self) -> Console {
        Console::new(
            self.documents.clone(),
            self.blobs.clone(),
            self.identity.clone(),
            self.local.clone(),
            self.toasts.clone(),
            "91",
        )
    }

    /// Add a phone number to the registry.
    pub async fn register(&self, phone: &str, full_name: Option<&str>) -> DocumentId {
        let user = RegisteredUser {
            phone_number: phone.to_string(),
            full_name: full_name.map(str::to_string),
            created_at: None,
        };
        insert_record(self.documents.as_ref(), &user).await.unwrap()
    }

    /// Upload bytes directly, bypassing the console.
    pub async fn put_blob(&self, path: &str) -> String {
        self.blobs
            .inner
            .put(
                &BlobPath::new(path).unwrap(),
                "image/jpeg",
                path.as_bytes().to_vec(),
                &NoProgress,
            )
            .await
            .unwrap()
    }

    pub fn blob_exists(&self, path: &str) -> bool {
        self.blobs.inner.contains(&BlobPath::new(path).unwrap())
    }
}
