//! Picked files, previews and the admission rules for new attachments.

use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

use uuid::Uuid;

static NEXT_LOCAL_ID: AtomicU64 = AtomicU64::new(1);

/// Identifier of a queued file, unique within the process.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LocalId(u64);

impl LocalId {
    fn next() -> Self {
        LocalId(NEXT_LOCAL_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for LocalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A file picked by the operator, not yet uploaded.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LocalFile {
    pub name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl LocalFile {
    pub fn new(name: impl Into<String>, content_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }

    /// Read a file from disk, guessing its content type from the extension.
    pub async fn read(path: &Path) -> std::io::Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "file".to_string());
        Ok(Self::new(name, content_type_for(path), bytes))
    }

    pub fn is_image(&self) -> bool {
        self.content_type.starts_with("image/")
    }
}

/// Content type for a file name's extension.
pub fn content_type_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "bmp" => "image/bmp",
        "heic" => "image/heic",
        "pdf" => "application/pdf",
        "txt" => "text/plain",
        _ => "application/octet-stream",
    }
}

/// Transient in-memory preview handle. Never an upload URL.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PreviewRef(String);

impl PreviewRef {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Live previews of queued files.
#[derive(Default)]
pub struct PreviewRegistry {
    live: HashMap<PreviewRef, usize>,
}

impl PreviewRegistry {
    pub fn create(&mut self, file: &LocalFile) -> PreviewRef {
        let preview = PreviewRef(format!("preview:{}", Uuid::new_v4().simple()));
        self.live.insert(preview.clone(), file.bytes.len());
        preview
    }

    /// Release a preview. Returns false if it was already released.
    pub fn release(&mut self, preview: &PreviewRef) -> bool {
        self.live.remove(preview).is_some()
    }

    pub fn is_live(&self, preview: &PreviewRef) -> bool {
        self.live.contains_key(preview)
    }

    pub fn len(&self) -> usize {
        self.live.len()
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    pub fn clear(&mut self) {
        self.live.clear();
    }
}

/// A file waiting in the upload queue.
#[derive(Clone, Debug)]
pub struct QueuedFile {
    pub id: LocalId,
    pub file: LocalFile,
    pub preview: PreviewRef,
}

/// How files reached the editor. Only the rejection wording differs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SelectionSource {
    Picker,
    Drop,
}

impl SelectionSource {
    pub fn invalid_files_message(self) -> &'static str {
        match self {
            SelectionSource::Picker => "Please select valid image files",
            SelectionSource::Drop => "Please drop valid image files",
        }
    }
}

/// Result of offering files to the editor.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SelectionOutcome {
    pub accepted: Vec<LocalId>,
    /// Files dropped because they are not images
    pub rejected: usize,
    /// Images dropped because the attachment cap was reached
    pub truncated: usize,
}

pub(crate) struct Admission {
    pub files: Vec<LocalFile>,
    pub rejected: usize,
    pub truncated: usize,
}

/// Keep images only, then at most `remaining_slots` of them, in order.
pub(crate) fn admit(files: Vec<LocalFile>, remaining_slots: usize) -> Admission {
    let total = files.len();
    let mut images: Vec<LocalFile> = files.into_iter().filter(LocalFile::is_image).collect();
    let rejected = total - images.len();
    let truncated = images.len().saturating_sub(remaining_slots);
    images.truncate(remaining_slots);
    Admission {
        files: images,
        rejected,
        truncated,
    }
}

pub(crate) fn queue(files: Vec<LocalFile>, previews: &mut PreviewRegistry) -> Vec<QueuedFile> {
    files
        .into_iter()
        .map(|file| QueuedFile {
            id: LocalId::next(),
            preview: previews.create(&file),
            file,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image(name: &str) -> LocalFile {
        LocalFile::new(name, "image/jpeg", vec![1, 2, 3])
    }

    #[test]
    fn test_admit_filters_then_caps() {
        let files = vec![
            image("a.jpg"),
            LocalFile::new("notes.pdf", "application/pdf", vec![]),
            image("b.jpg"),
            image("c.jpg"),
        ];
        let admission = admit(files, 2);
        let names: Vec<_> = admission.files.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["a.jpg", "b.jpg"]);
        assert_eq!(admission.rejected, 1);
        assert_eq!(admission.truncated, 1);
    }

    #[test]
    fn test_admit_with_no_slots() {
        let admission = admit(vec![image("a.jpg")], 0);
        assert!(admission.files.is_empty());
        assert_eq!(admission.truncated, 1);
    }

    #[test]
    fn test_queue_assigns_unique_ids_and_previews() {
        let mut previews = PreviewRegistry::default();
        let queued = queue(vec![image("a.jpg"), image("b.jpg")], &mut previews);
        assert_ne!(queued[0].id, queued[1].id);
        assert_ne!(queued[0].preview, queued[1].preview);
        assert!(queued[0].preview.as_str().starts_with("preview:"));
        assert_eq!(previews.len(), 2);

        assert!(previews.release(&queued[0].preview));
        assert!(!previews.release(&queued[0].preview));
        assert!(!previews.is_live(&queued[0].preview));
    }

    #[test]
    fn test_content_type_guess() {
        assert_eq!(content_type_for(Path::new("x/photo.JPG")), "image/jpeg");
        assert_eq!(content_type_for(Path::new("scan.png")), "image/png");
        assert_eq!(content_type_for(Path::new("README")), "application/octet-stream");
    }
}
