//! Registry of users permitted to sign in.

use chrono::Utc;
use rpa_identity::PhoneNumber;
use rpa_storage::{
    insert_record, query_records, Direction, DocumentId, DocumentStore, Query, RegisteredUser,
    StoreError, Stored, PHONE_NUMBER_FIELD,
};
use tracing::{debug, info};

use super::RecordContext;
use crate::error::RecordError;

/// First registry entry with exactly this phone number.
pub async fn lookup_by_phone(
    documents: &dyn DocumentStore,
    phone_number: &str,
) -> Result<Option<Stored<RegisteredUser>>, StoreError> {
    let query = Query::new().where_eq(PHONE_NUMBER_FIELD, phone_number);
    let found = query_records::<RegisteredUser>(documents, &query).await?;
    debug!(phone = phone_number, matches = found.len(), "Registry lookup");
    Ok(found.into_iter().next())
}

pub struct RegistryService {
    ctx: RecordContext,
}

impl RegistryService {
    pub fn new(ctx: RecordContext) -> Self {
        Self { ctx }
    }

    pub async fn lookup(&self, phone: &PhoneNumber) -> Result<Option<Stored<RegisteredUser>>, RecordError> {
        Ok(lookup_by_phone(self.ctx.documents.as_ref(), phone.as_str()).await?)
    }

    /// Add a phone number to the registry. Returns the existing entry's id when already present.
    pub async fn register(
        &self,
        phone: &PhoneNumber,
        full_name: Option<&str>,
    ) -> Result<DocumentId, RecordError> {
        if let Some(existing) = self.lookup(phone).await? {
            info!(phone = %phone, id = %existing.id, "Phone number already registered");
            return Ok(existing.id);
        }
        let user = RegisteredUser {
            phone_number: phone.to_string(),
            full_name: full_name
                .map(str::trim)
                .filter(|n| !n.is_empty())
                .map(str::to_string),
            created_at: Some(Utc::now()),
        };
        let id = insert_record(self.ctx.documents.as_ref(), &user).await?;
        info!(phone = %phone, id = %id, "Registered user");
        Ok(id)
    }

    /// Registered users, newest first. Entries without `createdAt` come last.
    pub async fn list(&self) -> Result<Vec<Stored<RegisteredUser>>, RecordError> {
        let documents = self.ctx.documents.as_ref();
        let newest_first = Query::new().order_by("createdAt", Direction::Descending);
        let mut users: Vec<Stored<RegisteredUser>> = query_records(documents, &newest_first).await?;
        let undated: Vec<Stored<RegisteredUser>> = query_records(documents, &Query::new())
            .await?
            .into_iter()
            .filter(|u: &Stored<RegisteredUser>| u.record.created_at.is_none())
            .collect();
        users.extend(undated);
        Ok(users)
    }
}
