//! Image attachment editing for activities and articles.
//!
//! An [`AttachmentEditor`] stages picked files and removals in memory and only
//! touches the backends on [`AttachmentEditor::commit`]. Each commit is journaled
//! in `attachment_commits` first, so an interrupted commit is cleaned up the next
//! time an editor is opened for the same record.

mod editor;
mod journal;
mod progress;
mod selection;

pub use editor::{AttachmentEditor, EditorMode};
pub use journal::{recover, RecoveryOutcome};
pub use progress::{FileProgress, ProgressTracker};
pub use selection::{
    content_type_for, LocalFile, LocalId, PreviewRef, PreviewRegistry, QueuedFile,
    SelectionOutcome, SelectionSource,
};

use rpa_storage::{Collection, DocumentId, ACTIVITY_IMAGES_FIELD, ARTICLE_IMAGES_FIELD};

/// Most attachments a record may carry.
pub const MAX_ATTACHMENTS: usize = 6;

/// The attachment list of one record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AttachmentTarget {
    pub collection: Collection,
    pub record_id: DocumentId,
    /// Document field holding the URL list
    pub field: &'static str,
    /// Blob folder new uploads go to
    pub folder: &'static str,
    noun: &'static str,
}

impl AttachmentTarget {
    pub fn activity(record_id: DocumentId) -> Self {
        Self {
            collection: Collection::Activities,
            record_id,
            field: ACTIVITY_IMAGES_FIELD,
            folder: "activities",
            noun: "Activity",
        }
    }

    pub fn article(record_id: DocumentId) -> Self {
        Self {
            collection: Collection::Articles,
            record_id,
            field: ARTICLE_IMAGES_FIELD,
            folder: "articles",
            noun: "Article",
        }
    }

    pub fn success_message(&self) -> String {
        format!("{} images updated successfully!", self.noun)
    }

    pub fn failure_message(&self) -> String {
        format!("Failed to update {} images", self.noun.to_lowercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_messages() {
        let target = AttachmentTarget::activity(DocumentId::from("a1"));
        assert_eq!(
            target.success_message(),
            "Activity images updated successfully!"
        );
        assert_eq!(target.failure_message(), "Failed to update activity images");
        assert_eq!(target.field, "activityImages");

        let target = AttachmentTarget::article(DocumentId::from("b2"));
        assert_eq!(target.failure_message(), "Failed to update article images");
        assert_eq!(target.folder, "articles");
    }
}
