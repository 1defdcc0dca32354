//! Team member profiles.

use chrono::Utc;
use rpa_blob::ProgressObserver;
use rpa_storage::{
    fetch_record, insert_record, query_records, Collection, Direction, DocumentId, DocumentStore,
    Fields, Query, Stored, TeamMember,
};
use serde_json::Value;
use tracing::{info, warn};

use super::RecordContext;
use crate::attachments::LocalFile;
use crate::error::RecordError;
use crate::uploads::{delete_quietly, timestamped_path, upload};
use crate::validation::{contact_number, required, required_min, FieldErrors};

const PICTURE_FOLDER: &str = "team-images";

fn check_full_name(errors: &mut FieldErrors, value: &str) {
    errors.check(
        "fullName",
        required_min(value, 2, "Full name is required", "Name must be at least 2 characters"),
    );
}

fn check_role(errors: &mut FieldErrors, value: &str) {
    errors.check("role", required(value, "Role is required"));
}

fn check_phone(errors: &mut FieldErrors, value: &str) {
    errors.check(
        "phoneNumber",
        contact_number(
            value,
            "Phone number is required",
            "Please enter a valid phone number",
        ),
    );
}

#[derive(Clone, Debug, Default)]
pub struct NewTeamMember {
    pub full_name: String,
    pub role: String,
    pub phone_number: String,
    pub picture: Option<LocalFile>,
}

impl NewTeamMember {
    pub fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        check_full_name(&mut errors, &self.full_name);
        check_role(&mut errors, &self.role);
        check_phone(&mut errors, &self.phone_number);
        errors
    }
}

/// Fields to change on an existing member. `None` leaves a field as is.
#[derive(Clone, Debug, Default)]
pub struct TeamMemberUpdate {
    pub full_name: Option<String>,
    pub role: Option<String>,
    pub phone_number: Option<String>,
    pub picture: Option<LocalFile>,
}

impl TeamMemberUpdate {
    pub fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        if let Some(name) = &self.full_name {
            check_full_name(&mut errors, name);
        }
        if let Some(role) = &self.role {
            check_role(&mut errors, role);
        }
        if let Some(phone) = &self.phone_number {
            check_phone(&mut errors, phone);
        }
        errors
    }
}

pub struct TeamService {
    ctx: RecordContext,
}

impl TeamService {
    pub fn new(ctx: RecordContext) -> Self {
        Self { ctx }
    }

    /// Upload the picture, if any, then create the member.
    pub async fn create(
        &self,
        member: NewTeamMember,
        progress: &dyn ProgressObserver,
    ) -> Result<DocumentId, RecordError> {
        let errors = member.validate();
        if !errors.is_empty() {
            return self.ctx.reject(errors);
        }
        let result = self.insert(member, progress).await;
        self.ctx.report(
            result,
            "Team member added successfully!",
            "Failed to add team member",
        )
    }

    async fn insert(
        &self,
        member: NewTeamMember,
        progress: &dyn ProgressObserver,
    ) -> Result<DocumentId, RecordError> {
        let picture_url = match &member.picture {
            Some(file) => Some(self.upload_picture(file, progress).await?),
            None => None,
        };
        let record = TeamMember {
            full_name: member.full_name,
            role: member.role,
            phone_number: member.phone_number,
            profile_picture: picture_url.clone(),
            created_at: Utc::now(),
        };
        match insert_record(self.ctx.documents.as_ref(), &record).await {
            Ok(id) => {
                info!(id = %id, "Team member added");
                Ok(id)
            }
            Err(e) => {
                if let Some(url) = picture_url {
                    delete_quietly(self.ctx.blobs.as_ref(), &url).await;
                }
                Err(e.into())
            }
        }
    }

    async fn upload_picture(
        &self,
        file: &LocalFile,
        progress: &dyn ProgressObserver,
    ) -> Result<String, RecordError> {
        let path = timestamped_path(PICTURE_FOLDER, &file.name)?;
        match upload(self.ctx.blobs.as_ref(), &path, file, progress).await {
            Ok(url) => Ok(url),
            Err(e) => {
                self.ctx.notifier.error("Image upload failed");
                Err(e.into())
            }
        }
    }

    /// Members, newest first.
    pub async fn list(&self) -> Result<Vec<Stored<TeamMember>>, RecordError> {
        let query = Query::new().order_by("createdAt", Direction::Descending);
        let result = query_records(self.ctx.documents.as_ref(), &query).await;
        self.ctx.report_fetch(result, "Failed to fetch team members")
    }

    pub async fn get(&self, id: &DocumentId) -> Result<Stored<TeamMember>, RecordError> {
        Ok(fetch_record(self.ctx.documents.as_ref(), id).await?)
    }

    /// Apply `update`. A replaced picture is deleted once the record points at the new one.
    pub async fn update(
        &self,
        id: &DocumentId,
        update: TeamMemberUpdate,
        progress: &dyn ProgressObserver,
    ) -> Result<(), RecordError> {
        let errors = update.validate();
        if !errors.is_empty() {
            return self.ctx.reject(errors);
        }
        let result = self.apply_update(id, update, progress).await;
        self.ctx.report(
            result,
            "Team member updated successfully!",
            "Failed to update team member",
        )
    }

    async fn apply_update(
        &self,
        id: &DocumentId,
        update: TeamMemberUpdate,
        progress: &dyn ProgressObserver,
    ) -> Result<(), RecordError> {
        let existing: Stored<TeamMember> = fetch_record(self.ctx.documents.as_ref(), id).await?;

        let mut fields = Fields::new();
        if let Some(name) = update.full_name {
            fields.insert("fullName".into(), Value::from(name));
        }
        if let Some(role) = update.role {
            fields.insert("role".into(), Value::from(role));
        }
        if let Some(phone) = update.phone_number {
            fields.insert("phoneNumber".into(), Value::from(phone));
        }
        let new_picture = match &update.picture {
            Some(file) => {
                let url = self.upload_picture(file, progress).await?;
                fields.insert("profilePicture".into(), Value::from(url.clone()));
                Some(url)
            }
            None => None,
        };
        if fields.is_empty() {
            return Ok(());
        }

        if let Err(e) = self
            .ctx
            .documents
            .update(Collection::Team, id, fields)
            .await
        {
            if let Some(url) = new_picture {
                delete_quietly(self.ctx.blobs.as_ref(), &url).await;
            }
            return Err(e.into());
        }
        if let (Some(_), Some(old)) = (new_picture, existing.record.profile_picture) {
            delete_quietly(self.ctx.blobs.as_ref(), &old).await;
        }
        info!(id = %id, "Team member updated");
        Ok(())
    }

    /// Delete the member, then its picture. A picture that cannot be deleted is only logged.
    pub async fn delete(&self, id: &DocumentId) -> Result<(), RecordError> {
        let result = self.remove(id).await;
        self.ctx.report(
            result,
            "Team member deleted successfully",
            "Failed to delete team member",
        )
    }

    async fn remove(&self, id: &DocumentId) -> Result<(), RecordError> {
        let existing: Stored<TeamMember> = fetch_record(self.ctx.documents.as_ref(), id).await?;
        self.ctx.documents.delete(Collection::Team, id).await?;
        if let Some(url) = existing.record.profile_picture {
            if !delete_quietly(self.ctx.blobs.as_ref(), &url).await {
                warn!(id = %id, picture = %url, "Team member picture left behind");
            }
        }
        info!(id = %id, "Team member deleted");
        Ok(())
    }
}
