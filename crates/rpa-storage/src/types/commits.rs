//! Attachment commit journal types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Collection, DocumentId};
use crate::Record;

/// Intended final state of an attachment commit, written before any side effect
/// so an interrupted commit can be detected and cleaned up later.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingCommit {
    pub collection: Collection,
    pub record_id: DocumentId,
    pub field: String,
    pub kept: Vec<String>,            // Existing URLs that survive, in order
    pub planned_uploads: Vec<String>, // Blob paths fixed before uploading
    pub removals: Vec<String>,        // Existing URLs to delete
    pub started_at: DateTime<Utc>,
}

impl PendingCommit {
    /// Journal document id for a given content record.
    pub fn journal_id(collection: Collection, record_id: &DocumentId) -> DocumentId {
        DocumentId(format!("{}_{}", collection.as_str(), record_id))
    }
}

impl Record for PendingCommit {
    const COLLECTION: Collection = Collection::AttachmentCommits;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_journal_id_is_scoped_by_collection() {
        let id = DocumentId::from("abc");
        assert_eq!(
            PendingCommit::journal_id(Collection::Activities, &id).0,
            "activities_abc"
        );
        assert_ne!(
            PendingCommit::journal_id(Collection::Activities, &id),
            PendingCommit::journal_id(Collection::Articles, &id)
        );
    }
}
