//! Membership applications.

use chrono::Utc;
use rpa_storage::{
    fetch_record, insert_record, query_records, Collection, DocumentId, DocumentStore, Fields,
    MembershipRequest, MembershipStatus, Query, Stored,
};
use serde_json::Value;
use tracing::info;

use super::{DeleteConfirmation, RecordContext};
use crate::error::RecordError;
use crate::validation::{contact_number, required, required_min, FieldErrors};

#[derive(Clone, Debug, Default)]
pub struct NewMembershipRequest {
    pub full_name: String,
    pub contact_number: String,
    pub location: String,
    pub membership_type: String,
}

impl NewMembershipRequest {
    pub fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        errors.check(
            "fullName",
            required_min(
                &self.full_name,
                2,
                "Full name is required",
                "Name must be at least 2 characters",
            ),
        );
        errors.check(
            "contactNumber",
            contact_number(
                &self.contact_number,
                "Contact number is required",
                "Invalid contact number",
            ),
        );
        errors.check("location", required(&self.location, "Location is required"));
        errors.check(
            "membershipType",
            required(&self.membership_type, "Membership type is required"),
        );
        errors
    }
}

pub struct MembershipService {
    ctx: RecordContext,
}

impl MembershipService {
    pub fn new(ctx: RecordContext) -> Self {
        Self { ctx }
    }

    /// File an application with status `Pending`.
    pub async fn create(&self, request: NewMembershipRequest) -> Result<DocumentId, RecordError> {
        let errors = request.validate();
        if !errors.is_empty() {
            return self.ctx.reject(errors);
        }
        let record = MembershipRequest {
            full_name: request.full_name,
            contact_number: request.contact_number,
            location: request.location,
            membership_type: request.membership_type,
            status: MembershipStatus::Pending,
            created_at: Utc::now(),
            updated_at: None,
        };
        let result = insert_record(self.ctx.documents.as_ref(), &record).await;
        if let Ok(id) = &result {
            info!(id = %id, kind = %record.membership_type, "Membership request created");
        }
        self.ctx.report(
            result,
            "Membership request Created successfully!",
            "Failed to submit membership request",
        )
    }

    pub async fn list(&self) -> Result<Vec<Stored<MembershipRequest>>, RecordError> {
        let result = query_records(self.ctx.documents.as_ref(), &Query::new()).await;
        self.ctx
            .report_fetch(result, "Failed to fetch membership requests")
    }

    pub async fn get(&self, id: &DocumentId) -> Result<Stored<MembershipRequest>, RecordError> {
        Ok(fetch_record(self.ctx.documents.as_ref(), id).await?)
    }

    /// Approve, reject or reopen an application.
    pub async fn set_status(
        &self,
        id: &DocumentId,
        status: MembershipStatus,
    ) -> Result<(), RecordError> {
        let mut fields = Fields::new();
        fields.insert("status".into(), Value::from(status.to_string()));
        fields.insert("updatedAt".into(), Value::from(Utc::now().to_rfc3339()));
        let result = self
            .ctx
            .documents
            .update(Collection::MembershipRequests, id, fields)
            .await;
        self.ctx.report(
            result,
            "Membership request updated successfully!",
            "Failed to update membership request",
        )
    }

    pub async fn delete(&self, id: &DocumentId) -> Result<(), RecordError> {
        let result = self
            .ctx
            .documents
            .delete(Collection::MembershipRequests, id)
            .await;
        self.ctx.report(
            result,
            "Membership request deleted successfully",
            "Failed to delete membership request",
        )
    }

    /// Delete the selected application, then clear the selection.
    pub async fn confirm_delete(
        &self,
        confirmation: &mut DeleteConfirmation<DocumentId>,
    ) -> Result<Option<DocumentId>, RecordError> {
        confirmation
            .confirm(|id| async move { self.delete(&id).await })
            .await
    }
}
