//! Profile completion for the signed-in operator.

use std::sync::Arc;

use chrono::Utc;
use rpa_config::{keys, LocalStore};
use rpa_storage::{put_record, Collection, DocumentId, DocumentStore, Fields, RegisteredUser};
use serde_json::Value;
use tracing::{info, warn};

use super::registry::lookup_by_phone;
use super::RecordContext;
use crate::error::RecordError;
use crate::validation::{required, FieldErrors};

/// Whether `save` touched an existing registry entry or made a new one.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProfileSaved {
    Updated,
    Created,
}

pub struct ProfileService {
    ctx: RecordContext,
    local: Arc<dyn LocalStore>,
}

impl ProfileService {
    pub fn new(ctx: RecordContext, local: Arc<dyn LocalStore>) -> Self {
        Self { ctx, local }
    }

    fn phone_number(&self) -> Option<String> {
        self.local
            .get(keys::PHONE_NUMBER)
            .filter(|p| !p.trim().is_empty())
    }

    /// Current registry name of the signed-in operator, empty when unset.
    pub async fn load(&self) -> Result<String, RecordError> {
        let phone = self.phone_number().ok_or(RecordError::NoPhoneNumber)?;
        match lookup_by_phone(self.ctx.documents.as_ref(), &phone).await {
            Ok(found) => Ok(found
                .and_then(|u| u.record.full_name)
                .unwrap_or_default()),
            Err(e) => {
                warn!(phone = %phone, error = %e, "Failed to fetch profile details");
                Err(e.into())
            }
        }
    }

    /// Store `full_name` locally and in the registry.
    pub async fn save(&self, full_name: &str) -> Result<ProfileSaved, RecordError> {
        let Some(phone) = self.phone_number() else {
            self.ctx.notifier.error("Phone number is not available.");
            return Err(RecordError::NoPhoneNumber);
        };
        let full_name = full_name.trim();
        let mut errors = FieldErrors::new();
        errors.check("fullName", required(full_name, "Full name is required"));
        if !errors.is_empty() {
            return self.ctx.reject(errors);
        }

        let result = self.write(&phone, full_name).await;
        let success = match &result {
            Ok(ProfileSaved::Updated) => "Profile updated successfully!",
            _ => "Profile created successfully!",
        };
        self.ctx
            .report(result, success, "Failed to update/create profile.")
    }

    async fn write(&self, phone: &str, full_name: &str) -> Result<ProfileSaved, RecordError> {
        self.local.set(keys::FULL_NAME, full_name)?;
        let documents = self.ctx.documents.as_ref();
        match lookup_by_phone(documents, phone).await? {
            Some(existing) => {
                let mut fields = Fields::new();
                fields.insert("fullName".into(), Value::from(full_name));
                fields.insert("createdAt".into(), Value::from(Utc::now().to_rfc3339()));
                documents
                    .update(Collection::Users, &existing.id, fields)
                    .await?;
                info!(phone, id = %existing.id, "Profile updated");
                Ok(ProfileSaved::Updated)
            }
            None => {
                let user = RegisteredUser {
                    phone_number: phone.to_string(),
                    full_name: Some(full_name.to_string()),
                    created_at: Some(Utc::now()),
                };
                put_record(documents, &DocumentId::from(phone), &user).await?;
                info!(phone, "Profile created");
                Ok(ProfileSaved::Created)
            }
        }
    }
}
