//! Commit journal: the intended outcome of a commit, written before any side effect.

use std::collections::HashSet;

use rpa_blob::{BlobPath, BlobStore};
use rpa_storage::{
    fetch_record, put_record, DocumentStore, Fields, PendingCommit, Record, StoreError,
};
use serde_json::Value;
use tracing::{info, warn};

use super::AttachmentTarget;
use crate::error::AttachmentError;
use crate::uploads::{delete_all_quietly, delete_paths_quietly};

/// What recovery found for a record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RecoveryOutcome {
    /// No interrupted commit
    Clean,
    /// The commit had been persisted; its removals were re-issued.
    Completed { removals: usize },
    /// The commit never reached the record; its uploads were deleted.
    RolledBack { orphans: usize },
}

pub(crate) async fn begin(
    documents: &dyn DocumentStore,
    commit: &PendingCommit,
) -> Result<(), StoreError> {
    let id = PendingCommit::journal_id(commit.collection, &commit.record_id);
    put_record(documents, &id, commit).await
}

/// Drop the journal entry. Failures are logged; the entry is recovered later.
pub(crate) async fn finish(documents: &dyn DocumentStore, target: &AttachmentTarget) {
    let id = PendingCommit::journal_id(target.collection, &target.record_id);
    if let Err(e) = documents.delete(PendingCommit::COLLECTION, &id).await {
        warn!(journal_id = %id, error = %e, "Failed to clear commit journal");
    }
}

/// URL list stored in `field`, empty when absent.
pub(crate) fn attachment_list(fields: &Fields, field: &str) -> Vec<String> {
    fields
        .get(field)
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}

/// Finish or undo an interrupted commit for `target`. Safe to run repeatedly.
pub async fn recover(
    documents: &dyn DocumentStore,
    blobs: &dyn BlobStore,
    target: &AttachmentTarget,
) -> Result<RecoveryOutcome, AttachmentError> {
    let journal_id = PendingCommit::journal_id(target.collection, &target.record_id);
    let pending = match fetch_record::<PendingCommit>(documents, &journal_id).await {
        Ok(stored) => stored.record,
        Err(StoreError::NotFound) => return Ok(RecoveryOutcome::Clean),
        Err(e) => return Err(e.into()),
    };

    let persisted = match documents.get(target.collection, &target.record_id).await {
        Ok(doc) => attachment_list(&doc.fields, &pending.field),
        Err(StoreError::NotFound) => Vec::new(),
        Err(e) => return Err(e.into()),
    };

    let planned: Vec<BlobPath> = pending
        .planned_uploads
        .iter()
        .filter_map(|p| match BlobPath::new(p) {
            Ok(path) => Some(path),
            Err(e) => {
                warn!(path = %p, error = %e, "Skipping invalid planned upload");
                None
            }
        })
        .collect();

    let persisted_paths: HashSet<BlobPath> = persisted
        .iter()
        .filter_map(|url| blobs.resolve(url).ok())
        .collect();

    let reached_record = if planned.is_empty() {
        !pending.removals.is_empty() && !persisted.iter().any(|u| pending.removals.contains(u))
    } else {
        planned.iter().any(|p| persisted_paths.contains(p))
    };

    let outcome = if reached_record {
        let failed = delete_all_quietly(blobs, &pending.removals).await;
        info!(
            record_id = %target.record_id,
            removals = pending.removals.len(),
            failed,
            "Completed interrupted attachment commit"
        );
        RecoveryOutcome::Completed {
            removals: pending.removals.len(),
        }
    } else {
        let failed = delete_paths_quietly(blobs, &planned).await;
        info!(
            record_id = %target.record_id,
            orphans = planned.len(),
            failed,
            "Rolled back interrupted attachment commit"
        );
        RecoveryOutcome::RolledBack {
            orphans: planned.len(),
        }
    };

    documents
        .delete(PendingCommit::COLLECTION, &journal_id)
        .await?;
    Ok(outcome)
}
