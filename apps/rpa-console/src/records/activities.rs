//! Activities and their image galleries.

use chrono::Utc;
use futures::future::join_all;
use rpa_blob::{BlobPath, NoProgress};
use rpa_storage::{
    fetch_record, insert_record, query_records, Activity, Collection, Direction, DocumentId,
    DocumentStore, Fields, Query, Stored,
};
use serde_json::Value;
use tracing::{info, warn};

use super::RecordContext;
use crate::attachments::{AttachmentEditor, AttachmentTarget, LocalFile, MAX_ATTACHMENTS};
use crate::error::{AttachmentError, RecordError};
use crate::uploads::{delete_all_quietly, delete_paths_quietly, upload};
use crate::validation::{parse_date, required, required_min, FieldErrors};

const IMAGE_FOLDER: &str = "activities";

fn check_name(errors: &mut FieldErrors, value: &str) {
    errors.check(
        "activityName",
        required_min(
            value,
            3,
            "Activity name is required",
            "Activity name must be at least 3 characters",
        ),
    );
}

fn check_location(errors: &mut FieldErrors, value: &str) {
    errors.check(
        "location",
        required_min(
            value,
            3,
            "Location is required",
            "Location must be at least 3 characters",
        ),
    );
}

fn check_date(errors: &mut FieldErrors, value: &str) {
    errors.check(
        "date",
        required(value, "Date is required")
            .or_else(|| parse_date(value).is_none().then(|| "Please enter a valid date".to_string())),
    );
}

fn check_summary(errors: &mut FieldErrors, value: &str) {
    errors.check(
        "activitySummary",
        required_min(
            value,
            3,
            "Activity summary is required",
            "Activity summary must be at least 3 characters",
        ),
    );
}

#[derive(Clone, Debug, Default)]
pub struct NewActivity {
    pub activity_name: String,
    pub location: String,
    /// `YYYY-MM-DD`
    pub date: String,
    pub activity_summary: String,
    pub images: Vec<LocalFile>,
}

impl NewActivity {
    pub fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        check_name(&mut errors, &self.activity_name);
        check_location(&mut errors, &self.location);
        check_date(&mut errors, &self.date);
        check_summary(&mut errors, &self.activity_summary);
        if self.images.iter().any(|f| !f.is_image()) {
            errors.add("activityImages", "Please select valid image files");
        }
        errors
    }
}

/// Detail fields to change on an existing activity. Images go through [`AttachmentEditor`].
#[derive(Clone, Debug, Default)]
pub struct ActivityUpdate {
    pub activity_name: Option<String>,
    pub location: Option<String>,
    pub date: Option<String>,
    pub activity_summary: Option<String>,
}

impl ActivityUpdate {
    pub fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        if let Some(v) = &self.activity_name {
            check_name(&mut errors, v);
        }
        if let Some(v) = &self.location {
            check_location(&mut errors, v);
        }
        if let Some(v) = &self.date {
            check_date(&mut errors, v);
        }
        if let Some(v) = &self.activity_summary {
            check_summary(&mut errors, v);
        }
        errors
    }
}

pub struct ActivityService {
    ctx: RecordContext,
}

impl ActivityService {
    pub fn new(ctx: RecordContext) -> Self {
        Self { ctx }
    }

    /// Upload every image concurrently, then create the activity.
    pub async fn create(&self, activity: NewActivity) -> Result<DocumentId, RecordError> {
        let errors = activity.validate();
        if !errors.is_empty() {
            return self.ctx.reject(errors);
        }
        if activity.images.is_empty() {
            self.ctx.notifier.error(&RecordError::MissingImages.to_string());
            return Err(RecordError::MissingImages);
        }
        if activity.images.len() > MAX_ATTACHMENTS {
            let err = RecordError::TooManyImages {
                max: MAX_ATTACHMENTS,
            };
            self.ctx.notifier.error(&err.to_string());
            return Err(err);
        }

        let result = self.insert(activity).await;
        self.ctx.report(
            result,
            "Activity created successfully!",
            "Failed to create activity",
        )
    }

    async fn insert(&self, activity: NewActivity) -> Result<DocumentId, RecordError> {
        let date = parse_date(&activity.date).ok_or_else(|| {
            let mut errors = FieldErrors::new();
            errors.add("date", "Please enter a valid date");
            RecordError::Validation(errors)
        })?;

        let millis = Utc::now().timestamp_millis();
        let paths = activity
            .images
            .iter()
            .enumerate()
            .map(|(i, f)| BlobPath::in_folder(IMAGE_FOLDER, &format!("{}_{}_{}", millis, i, f.name)))
            .collect::<Result<Vec<_>, _>>()?;

        let blobs = self.ctx.blobs.as_ref();
        let results = join_all(
            activity
                .images
                .iter()
                .zip(&paths)
                .map(|(file, path)| upload(blobs, path, file, &NoProgress)),
        )
        .await;
        let image_urls = match results.into_iter().collect::<Result<Vec<_>, _>>() {
            Ok(urls) => urls,
            Err(e) => {
                delete_paths_quietly(blobs, &paths).await;
                return Err(e.into());
            }
        };

        let record = Activity {
            activity_name: activity.activity_name,
            location: activity.location,
            date,
            activity_summary: activity.activity_summary,
            activity_images: image_urls,
            created_at: Utc::now(),
            updated_at: None,
        };
        match insert_record(self.ctx.documents.as_ref(), &record).await {
            Ok(id) => {
                info!(id = %id, images = record.activity_images.len(), "Activity created");
                Ok(id)
            }
            Err(e) => {
                delete_paths_quietly(blobs, &paths).await;
                Err(e.into())
            }
        }
    }

    /// Activities, newest first.
    pub async fn list(&self) -> Result<Vec<Stored<Activity>>, RecordError> {
        let query = Query::new().order_by("createdAt", Direction::Descending);
        let result = query_records(self.ctx.documents.as_ref(), &query).await;
        self.ctx.report_fetch(result, "Failed to fetch activities")
    }

    pub async fn get(&self, id: &DocumentId) -> Result<Stored<Activity>, RecordError> {
        Ok(fetch_record(self.ctx.documents.as_ref(), id).await?)
    }

    pub async fn update(&self, id: &DocumentId, update: ActivityUpdate) -> Result<(), RecordError> {
        let errors = update.validate();
        if !errors.is_empty() {
            return self.ctx.reject(errors);
        }
        let mut fields = Fields::new();
        let updates = [
            ("activityName", update.activity_name),
            ("location", update.location),
            ("date", update.date.map(|d| d.trim().to_string())),
            ("activitySummary", update.activity_summary),
        ];
        for (field, value) in updates {
            if let Some(value) = value {
                fields.insert(field.to_string(), Value::from(value));
            }
        }
        if fields.is_empty() {
            return Ok(());
        }
        fields.insert("updatedAt".into(), Value::from(Utc::now().to_rfc3339()));

        let result = self
            .ctx
            .documents
            .update(Collection::Activities, id, fields)
            .await;
        self.ctx.report(
            result,
            "Activity updated successfully!",
            "Failed to update activity",
        )
    }

    /// Delete the activity, then its images. Images that cannot be deleted are only logged.
    pub async fn delete(&self, id: &DocumentId) -> Result<(), RecordError> {
        let result = self.remove(id).await;
        self.ctx.report(
            result,
            "Activity deleted successfully",
            "Failed to delete activity",
        )
    }

    async fn remove(&self, id: &DocumentId) -> Result<(), RecordError> {
        let existing: Stored<Activity> = fetch_record(self.ctx.documents.as_ref(), id).await?;
        self.ctx.documents.delete(Collection::Activities, id).await?;
        let failed = delete_all_quietly(self.ctx.blobs.as_ref(), &existing.record.activity_images).await;
        if failed > 0 {
            warn!(id = %id, failed, "Some activity images were left behind");
        }
        info!(id = %id, "Activity deleted");
        Ok(())
    }

    /// Open the image editor for an activity.
    pub async fn edit_images(&self, id: DocumentId) -> Result<AttachmentEditor, AttachmentError> {
        AttachmentEditor::open(
            self.ctx.documents.clone(),
            self.ctx.blobs.clone(),
            self.ctx.notifier.clone(),
            AttachmentTarget::activity(id),
        )
        .await
    }
}
