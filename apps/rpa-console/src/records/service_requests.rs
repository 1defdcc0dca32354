//! Service requests raised on behalf of members of the public.

use chrono::Utc;
use rpa_storage::{
    fetch_record, insert_record, query_records, Collection, DocumentId, DocumentStore, Fields,
    Query, ServiceRequest, ServiceStatus, Stored,
};
use serde_json::Value;
use tracing::info;

use super::{DeleteConfirmation, RecordContext};
use crate::error::RecordError;
use crate::validation::{contact_number, required, required_min, FieldErrors};

fn validate_fields(full_name: &str, type_of_service: &str, contact: &str) -> FieldErrors {
    let mut errors = FieldErrors::new();
    errors.check(
        "fullName",
        required_min(full_name, 2, "Full name is required", "Name must be at least 2 characters"),
    );
    errors.check(
        "typeOfService",
        required(type_of_service, "Service type is required"),
    );
    errors.check(
        "contactNumber",
        contact_number(contact, "Contact number is required", "Invalid contact number"),
    );
    errors
}

fn details(more_details: Option<String>) -> Option<String> {
    more_details.filter(|d| !d.trim().is_empty())
}

#[derive(Clone, Debug, Default)]
pub struct NewServiceRequest {
    pub full_name: String,
    pub type_of_service: String,
    pub more_details: Option<String>,
    pub contact_number: String,
}

impl NewServiceRequest {
    pub fn validate(&self) -> FieldErrors {
        validate_fields(&self.full_name, &self.type_of_service, &self.contact_number)
    }
}

/// The edit form: every field is resubmitted.
#[derive(Clone, Debug)]
pub struct ServiceRequestUpdate {
    pub full_name: String,
    pub type_of_service: String,
    pub more_details: Option<String>,
    pub contact_number: String,
    pub status: ServiceStatus,
}

impl ServiceRequestUpdate {
    /// Prefill the form from a stored request.
    pub fn from_request(request: &ServiceRequest) -> Self {
        Self {
            full_name: request.full_name.clone(),
            type_of_service: request.type_of_service.clone(),
            more_details: request.more_details.clone(),
            contact_number: request.contact_number.clone(),
            status: request.status,
        }
    }

    pub fn validate(&self) -> FieldErrors {
        validate_fields(&self.full_name, &self.type_of_service, &self.contact_number)
    }
}

pub struct ServiceRequestService {
    ctx: RecordContext,
}

impl ServiceRequestService {
    pub fn new(ctx: RecordContext) -> Self {
        Self { ctx }
    }

    /// File a new request with status `Submitted`.
    pub async fn create(&self, request: NewServiceRequest) -> Result<DocumentId, RecordError> {
        let errors = request.validate();
        if !errors.is_empty() {
            return self.ctx.reject(errors);
        }
        let record = ServiceRequest {
            full_name: request.full_name,
            type_of_service: request.type_of_service,
            more_details: details(request.more_details),
            contact_number: request.contact_number,
            status: ServiceStatus::Submitted,
            created_at: Utc::now(),
            updated_at: None,
        };
        let result = insert_record(self.ctx.documents.as_ref(), &record).await;
        if let Ok(id) = &result {
            info!(id = %id, service = %record.type_of_service, "Service request created");
        }
        self.ctx.report(
            result,
            "Service request created successfully!",
            "Failed to submit service request",
        )
    }

    pub async fn list(&self) -> Result<Vec<Stored<ServiceRequest>>, RecordError> {
        let result = query_records(self.ctx.documents.as_ref(), &Query::new()).await;
        self.ctx
            .report_fetch(result, "Failed to fetch service requests")
    }

    pub async fn get(&self, id: &DocumentId) -> Result<Stored<ServiceRequest>, RecordError> {
        Ok(fetch_record(self.ctx.documents.as_ref(), id).await?)
    }

    pub async fn update(
        &self,
        id: &DocumentId,
        update: ServiceRequestUpdate,
    ) -> Result<(), RecordError> {
        let errors = update.validate();
        if !errors.is_empty() {
            return self.ctx.reject(errors);
        }
        let mut fields = Fields::new();
        fields.insert("fullName".into(), Value::from(update.full_name));
        fields.insert("typeOfService".into(), Value::from(update.type_of_service));
        fields.insert(
            "moreDetails".into(),
            details(update.more_details).map_or(Value::Null, Value::from),
        );
        fields.insert("contactNumber".into(), Value::from(update.contact_number));
        fields.insert("status".into(), Value::from(update.status.to_string()));
        self.write(id, fields).await
    }

    /// Move a request to `status`.
    pub async fn set_status(&self, id: &DocumentId, status: ServiceStatus) -> Result<(), RecordError> {
        let mut fields = Fields::new();
        fields.insert("status".into(), Value::from(status.to_string()));
        self.write(id, fields).await
    }

    async fn write(&self, id: &DocumentId, mut fields: Fields) -> Result<(), RecordError> {
        fields.insert("updatedAt".into(), Value::from(Utc::now().to_rfc3339()));
        let result = self
            .ctx
            .documents
            .update(Collection::ServiceRequests, id, fields)
            .await;
        self.ctx.report(
            result,
            "Service request updated successfully!",
            "Failed to update service request",
        )
    }

    pub async fn delete(&self, id: &DocumentId) -> Result<(), RecordError> {
        let result = self
            .ctx
            .documents
            .delete(Collection::ServiceRequests, id)
            .await;
        self.ctx.report(
            result,
            "Service request deleted successfully",
            "Failed to delete service request",
        )
    }

    /// Delete the selected request, then clear the selection.
    pub async fn confirm_delete(
        &self,
        confirmation: &mut DeleteConfirmation<DocumentId>,
    ) -> Result<Option<DocumentId>, RecordError> {
        confirmation
            .confirm(|id| async move { self.delete(&id).await })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::ToastKind;
    use crate::tests::common::Backends;

    fn request() -> NewServiceRequest {
        NewServiceRequest {
            full_name: "Ravi Kumar".into(),
            type_of_service: "Plumbing".into(),
            more_details: Some("  ".into()),
            contact_number: "98765 43210".into(),
        }
    }

    #[test]
    fn test_validation_messages() {
        let errors = NewServiceRequest {
            contact_number: "123".into(),
            ..NewServiceRequest::default()
        }
        .validate();
        assert_eq!(errors.get("fullName"), Some("Full name is required"));
        assert_eq!(errors.get("typeOfService"), Some("Service type is required"));
        assert_eq!(errors.get("contactNumber"), Some("Invalid contact number"));

        let errors = NewServiceRequest::default().validate();
        assert_eq!(errors.get("contactNumber"), Some("Contact number is required"));
    }

    #[tokio::test]
    async fn test_create_starts_submitted() {
        let backends = Backends::new();
        let service = ServiceRequestService::new(backends.context());
        let id = service.create(request()).await.unwrap();

        let stored = service.get(&id).await.unwrap().record;
        assert_eq!(stored.status, ServiceStatus::Submitted);
        assert_eq!(stored.more_details, None);
        assert!(backends
            .toasts
            .contains(ToastKind::Success, "Service request created successfully!"));
    }

    #[tokio::test]
    async fn test_update_stamps_updated_at() {
        let backends = Backends::new();
        let service = ServiceRequestService::new(backends.context());
        let id = service.create(request()).await.unwrap();

        let mut update = ServiceRequestUpdate::from_request(&service.get(&id).await.unwrap().record);
        update.status = ServiceStatus::Contacted;
        update.more_details = Some("Kitchen sink".into());
        service.update(&id, update).await.unwrap();

        let stored = service.get(&id).await.unwrap().record;
        assert_eq!(stored.status, ServiceStatus::Contacted);
        assert_eq!(stored.more_details.as_deref(), Some("Kitchen sink"));
        assert!(stored.updated_at.is_some());

        service.set_status(&id, ServiceStatus::Resolved).await.unwrap();
        assert_eq!(
            service.get(&id).await.unwrap().record.status,
            ServiceStatus::Resolved
        );
    }

    #[tokio::test]
    async fn test_confirmed_delete_clears_selection() {
        let backends = Backends::new();
        let service = ServiceRequestService::new(backends.context());
        let id = service.create(request()).await.unwrap();

        let mut confirmation = DeleteConfirmation::new();
        confirmation.select(id.clone());
        let deleted = service.confirm_delete(&mut confirmation).await.unwrap();
        assert_eq!(deleted, Some(id));
        assert!(confirmation.selected().is_none());
        assert!(service.list().await.unwrap().is_empty());
        assert!(backends
            .toasts
            .contains(ToastKind::Success, "Service request deleted successfully"));
    }
}
