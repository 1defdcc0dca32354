//! Validated blob paths.

use std::fmt;

use crate::BlobError;

/// Slash-separated object path inside a bucket, e.g. `activities/abc_1700000000000_photo.jpg`.
///
/// Paths are relative, non-empty, and never contain empty, `.` or `..` segments,
/// so a path can always be mapped onto a directory tree safely.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlobPath(String);

impl BlobPath {
    pub fn new(path: &str) -> Result<Self, BlobError> {
        if path.is_empty() {
            return Err(BlobError::InvalidReference("empty path".to_string()));
        }
        if path.contains('\\') || path.contains('\0') {
            return Err(BlobError::InvalidReference(path.to_string()));
        }
        let bad_segment = path
            .split('/')
            .any(|seg| seg.is_empty() || seg == "." || seg == "..");
        if bad_segment {
            return Err(BlobError::InvalidReference(path.to_string()));
        }
        Ok(BlobPath(path.to_string()))
    }

    /// Build `{folder}/{file_name}`, replacing path separators in the file name.
    pub fn in_folder(folder: &str, file_name: &str) -> Result<Self, BlobError> {
        let name: String = file_name
            .chars()
            .map(|c| if c == '/' || c == '\\' { '_' } else { c })
            .collect();
        Self::new(&format!("{}/{}", folder, name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Path segments, outermost first.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('/')
    }

    /// Last path segment.
    pub fn file_name(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or(&self.0)
    }
}

impl fmt::Display for BlobPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
