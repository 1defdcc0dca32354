//! Attachment editor: staged changes to one record's image list.

use std::sync::Arc;

use chrono::Utc;
use futures::future::join_all;
use rpa_blob::{BlobPath, BlobStore};
use rpa_storage::{DocumentStore, Fields, PendingCommit};
use serde_json::Value;
use tracing::{info, warn};

use super::journal::{self, attachment_list};
use super::progress::ProgressTracker;
use super::selection::{admit, queue};
use super::{
    AttachmentTarget, LocalFile, LocalId, PreviewRegistry, QueuedFile, SelectionOutcome,
    SelectionSource, MAX_ATTACHMENTS,
};
use crate::error::AttachmentError;
use crate::notify::Notifier;
use crate::uploads::{delete_all_quietly, delete_paths_quietly, upload};

/// Editor mode. Changes are only accepted while `Editing`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EditorMode {
    Viewing,
    Editing,
    Committing,
}

pub struct AttachmentEditor {
    documents: Arc<dyn DocumentStore>,
    blobs: Arc<dyn BlobStore>,
    notifier: Arc<dyn Notifier>,
    target: AttachmentTarget,
    mode: EditorMode,
    persisted: Vec<String>,
    existing: Vec<String>,
    queued: Vec<QueuedFile>,
    removals: Vec<String>,
    previews: PreviewRegistry,
    progress: ProgressTracker,
}

impl AttachmentEditor {
    /// Load the record's attachment list, first cleaning up any interrupted commit.
    pub async fn open(
        documents: Arc<dyn DocumentStore>,
        blobs: Arc<dyn BlobStore>,
        notifier: Arc<dyn Notifier>,
        target: AttachmentTarget,
    ) -> Result<Self, AttachmentError> {
        match journal::recover(documents.as_ref(), blobs.as_ref(), &target).await {
            Ok(outcome) => info!(record_id = %target.record_id, ?outcome, "Checked commit journal"),
            Err(e) => warn!(record_id = %target.record_id, error = %e, "Commit journal recovery failed"),
        }

        let doc = documents.get(target.collection, &target.record_id).await?;
        let persisted = attachment_list(&doc.fields, target.field);

        Ok(Self {
            documents,
            blobs,
            notifier,
            target,
            mode: EditorMode::Viewing,
            existing: persisted.clone(),
            persisted,
            queued: Vec::new(),
            removals: Vec::new(),
            previews: PreviewRegistry::default(),
            progress: ProgressTracker::new(),
        })
    }

    pub fn mode(&self) -> EditorMode {
        self.mode
    }

    pub fn target(&self) -> &AttachmentTarget {
        &self.target
    }

    /// The list as last persisted.
    pub fn persisted(&self) -> &[String] {
        &self.persisted
    }

    /// Persisted attachments that survive the current edit, in order.
    pub fn existing(&self) -> &[String] {
        &self.existing
    }

    pub fn queued(&self) -> &[QueuedFile] {
        &self.queued
    }

    /// URLs marked for removal in the current edit.
    pub fn removals(&self) -> &[String] {
        &self.removals
    }

    /// Existing minus removed plus queued.
    pub fn attachment_count(&self) -> usize {
        self.existing.len() + self.queued.len()
    }

    pub fn remaining_slots(&self) -> usize {
        MAX_ATTACHMENTS.saturating_sub(self.attachment_count())
    }

    pub fn progress(&self) -> &ProgressTracker {
        &self.progress
    }

    pub fn live_previews(&self) -> usize {
        self.previews.len()
    }

    /// Enter edit mode with a fresh copy of the persisted list.
    pub fn begin_edit(&mut self) {
        if self.mode == EditorMode::Viewing {
            self.reset_to_persisted();
            self.mode = EditorMode::Editing;
        }
    }

    /// Discard every staged change and leave edit mode.
    pub fn cancel(&mut self) {
        if self.mode == EditorMode::Editing {
            self.reset_to_persisted();
            self.mode = EditorMode::Viewing;
        }
    }

    /// Queue files from the file picker.
    pub fn select_files(
        &mut self,
        files: Vec<LocalFile>,
    ) -> Result<SelectionOutcome, AttachmentError> {
        self.offer(files, SelectionSource::Picker)
    }

    /// Queue files dropped onto the editor.
    pub fn drop_files(&mut self, files: Vec<LocalFile>) -> Result<SelectionOutcome, AttachmentError> {
        self.offer(files, SelectionSource::Drop)
    }

    fn offer(
        &mut self,
        files: Vec<LocalFile>,
        source: SelectionSource,
    ) -> Result<SelectionOutcome, AttachmentError> {
        self.require_editing()?;

        let remaining = self.remaining_slots();
        let admission = admit(files, remaining);
        if admission.rejected > 0 {
            self.notifier.error(source.invalid_files_message());
        }
        if admission.files.is_empty() && admission.truncated == 0 {
            return Ok(SelectionOutcome {
                rejected: admission.rejected,
                ..SelectionOutcome::default()
            });
        }
        if admission.truncated > 0 {
            self.notifier
                .warning(&format!("Only {} more images can be added", remaining));
        }

        let queued = queue(admission.files, &mut self.previews);
        let accepted: Vec<LocalId> = queued.iter().map(|q| q.id).collect();
        self.queued.extend(queued);

        Ok(SelectionOutcome {
            accepted,
            rejected: admission.rejected,
            truncated: admission.truncated,
        })
    }

    /// Drop a queued file. Returns false when it is not queued (already removed).
    pub fn remove_local_file(&mut self, id: LocalId) -> bool {
        let Some(pos) = self.queued.iter().position(|q| q.id == id) else {
            return false;
        };
        let removed = self.queued.remove(pos);
        self.previews.release(&removed.preview);
        self.progress.remove(id);
        true
    }

    /// Mark the existing attachment at `index` for removal on commit.
    pub fn remove_existing(&mut self, index: usize) -> Result<String, AttachmentError> {
        self.require_editing()?;
        if index >= self.existing.len() {
            return Err(AttachmentError::NoSuchAttachment(index));
        }
        let url = self.existing.remove(index);
        self.removals.push(url.clone());
        Ok(url)
    }

    /// Upload queued files, persist the merged list, then delete removed attachments.
    ///
    /// Any upload or persist failure aborts the commit: uploads that did land are
    /// deleted again, the record is untouched and the editor stays in edit mode.
    /// Failed deletions of removed attachments are logged and do not fail the commit.
    pub async fn commit(&mut self) -> Result<Vec<String>, AttachmentError> {
        self.require_editing()?;
        self.mode = EditorMode::Committing;

        match self.reconcile().await {
            Ok(list) => {
                self.persisted = list.clone();
                self.reset_to_persisted();
                self.mode = EditorMode::Viewing;
                self.notifier.success(&self.target.success_message());
                Ok(list)
            }
            Err(e) => {
                warn!(record_id = %self.target.record_id, error = %e, "Attachment commit failed");
                self.mode = EditorMode::Editing;
                self.notifier.error(&self.target.failure_message());
                Err(e)
            }
        }
    }

    async fn reconcile(&self) -> Result<Vec<String>, AttachmentError> {
        let millis = Utc::now().timestamp_millis();
        let paths = self
            .queued
            .iter()
            .map(|q| {
                BlobPath::in_folder(
                    self.target.folder,
                    &format!("{}_{}_{}_{}", self.target.record_id, millis, q.id, q.file.name),
                )
            })
            .collect::<Result<Vec<_>, _>>()?;

        let pending = PendingCommit {
            collection: self.target.collection,
            record_id: self.target.record_id.clone(),
            field: self.target.field.to_string(),
            kept: self.existing.clone(),
            planned_uploads: paths.iter().map(|p| p.as_str().to_string()).collect(),
            removals: self.removals.clone(),
            started_at: Utc::now(),
        };
        journal::begin(self.documents.as_ref(), &pending).await?;

        let uploads = self.queued.iter().zip(&paths).map(|(q, path)| {
            let observer = self.progress.observer(q.id);
            let blobs = self.blobs.clone();
            async move {
                upload(blobs.as_ref(), path, &q.file, &observer)
                    .await
                    .map_err(|source| AttachmentError::Upload {
                        file_name: q.file.name.clone(),
                        source,
                    })
            }
        });
        let results = join_all(uploads).await;

        let mut new_urls = Vec::with_capacity(results.len());
        let mut first_error = None;
        for result in results {
            match result {
                Ok(url) => new_urls.push(url),
                Err(e) => {
                    first_error.get_or_insert(e);
                }
            }
        }
        if let Some(e) = first_error {
            self.abort(&paths).await;
            return Err(e);
        }

        let mut list = self.existing.clone();
        list.extend(new_urls);

        let mut update = Fields::new();
        update.insert(
            self.target.field.to_string(),
            Value::from(list.clone()),
        );
        update.insert("updatedAt".to_string(), Value::from(Utc::now().to_rfc3339()));
        if let Err(e) = self
            .documents
            .update(self.target.collection, &self.target.record_id, update)
            .await
        {
            self.abort(&paths).await;
            return Err(e.into());
        }
        info!(
            record_id = %self.target.record_id,
            attachments = list.len(),
            "Persisted attachment list"
        );

        let failed = delete_all_quietly(self.blobs.as_ref(), &self.removals).await;
        if failed > 0 {
            warn!(record_id = %self.target.record_id, failed, "Some removed attachments were not deleted");
        }

        journal::finish(self.documents.as_ref(), &self.target).await;
        Ok(list)
    }

    /// Undo the uploads of a failed commit and clear its journal entry.
    async fn abort(&self, paths: &[BlobPath]) {
        delete_paths_quietly(self.blobs.as_ref(), paths).await;
        journal::finish(self.documents.as_ref(), &self.target).await;
    }

    fn require_editing(&self) -> Result<(), AttachmentError> {
        match self.mode {
            EditorMode::Editing => Ok(()),
            EditorMode::Viewing | EditorMode::Committing => Err(AttachmentError::NotEditing),
        }
    }

    fn reset_to_persisted(&mut self) {
        self.existing = self.persisted.clone();
        self.queued.clear();
        self.removals.clear();
        self.previews.clear();
        self.progress.clear();
    }
}
