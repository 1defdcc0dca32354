//! Typed access on top of the field-map [`DocumentStore`].

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::query::Query;
use crate::store::DocumentStore;
use crate::types::{Collection, DocumentId};
use crate::{Document, Fields, StoreError};

/// A serialisable record bound to the collection it lives in.
pub trait Record: Serialize + DeserializeOwned + Send + Sync {
    const COLLECTION: Collection;
}

/// A record together with its document id.
#[derive(Clone, Debug, PartialEq)]
pub struct Stored<R> {
    pub id: DocumentId,
    pub record: R,
}

/// Serialise a record into a document field map.
pub fn to_fields<R: Serialize>(record: &R) -> Result<Fields, StoreError> {
    match serde_json::to_value(record)? {
        serde_json::Value::Object(map) => Ok(map),
        other => Err(StoreError::Serialization(format!(
            "expected an object, got {}",
            other
        ))),
    }
}

/// Deserialise a document field map into a record.
pub fn from_fields<R: DeserializeOwned>(fields: Fields) -> Result<R, StoreError> {
    Ok(serde_json::from_value(serde_json::Value::Object(fields))?)
}

fn into_stored<R: Record>(doc: Document) -> Result<Stored<R>, StoreError> {
    Ok(Stored {
        id: doc.id,
        record: from_fields(doc.fields)?,
    })
}

/// Create a record under a generated id.
pub async fn insert_record<R: Record>(
    store: &dyn DocumentStore,
    record: &R,
) -> Result<DocumentId, StoreError> {
    store.create(R::COLLECTION, to_fields(record)?).await
}

/// Create or overwrite a record under a caller-chosen id.
pub async fn put_record<R: Record>(
    store: &dyn DocumentStore,
    id: &DocumentId,
    record: &R,
) -> Result<(), StoreError> {
    store.set(R::COLLECTION, id, to_fields(record)?).await
}

/// Fetch and decode a single record.
pub async fn fetch_record<R: Record>(
    store: &dyn DocumentStore,
    id: &DocumentId,
) -> Result<Stored<R>, StoreError> {
    into_stored(store.get(R::COLLECTION, id).await?)
}

/// Query and decode records.
pub async fn query_records<R: Record>(
    store: &dyn DocumentStore,
    query: &Query,
) -> Result<Vec<Stored<R>>, StoreError> {
    store
        .query(R::COLLECTION, query)
        .await?
        .into_iter()
        .map(into_stored)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RegisteredUser;

    #[test]
    fn to_fields_uses_camel_case_names() {
        let user = RegisteredUser {
            phone_number: "+911234567890".to_string(),
            full_name: Some("Asha Rao".to_string()),
            created_at: None,
        };
        let fields = to_fields(&user).unwrap();
        assert_eq!(fields["phoneNumber"], "+911234567890");
        assert_eq!(fields["fullName"], "Asha Rao");
        assert!(!fields.contains_key("createdAt"));
    }

    #[test]
    fn to_fields_rejects_non_objects() {
        let err = to_fields(&vec![1, 2, 3]).unwrap_err();
        assert!(matches!(err, StoreError::Serialization(_)));
    }

    #[test]
    fn from_fields_tolerates_missing_optional_fields() {
        let mut fields = Fields::new();
        fields.insert("phoneNumber".into(), "+911234567890".into());
        let user: RegisteredUser = from_fields(fields).unwrap();
        assert_eq!(user.full_name, None);
    }
}
