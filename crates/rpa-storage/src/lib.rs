//! Document storage abstraction for the RPA console.
//!
//! Backend crates (e.g., rpa-backend-memory) implement [`DocumentStore`] so the
//! console doesn't depend on any specific managed service or its wire format.
//! Records are JSON-like field maps addressed by collection + opaque id.

mod query;
mod records;
mod store;
pub mod types;

pub use query::{Direction, FieldFilter, OrderBy, Query};
pub use records::{
    fetch_record, from_fields, insert_record, put_record, query_records, to_fields, Record, Stored,
};
pub use store::*;
pub use types::*;

use thiserror::Error;

/// Field map of a single document.
pub type Fields = serde_json::Map<String, serde_json::Value>;

/// Uniform error type for all storage backends.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("not found")]
    NotFound,
    #[error("already exists")]
    AlreadyExists,
    #[error("conflict")]
    Conflict,
    #[error("serialization error: {0}")]
    Serialization(String),
    #[error("backend error: {0}")]
    Backend(String),
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::Serialization(e.to_string())
    }
}

/// A stored document: its id plus raw fields.
#[derive(Clone, Debug, PartialEq)]
pub struct Document {
    pub id: DocumentId,
    pub fields: Fields,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_display() {
        assert_eq!(StoreError::NotFound.to_string(), "not found");
        assert_eq!(StoreError::AlreadyExists.to_string(), "already exists");
        assert_eq!(StoreError::Conflict.to_string(), "conflict");
        let err = StoreError::Backend("connection reset".to_string());
        assert!(err.to_string().contains("connection reset"));
    }

    #[test]
    fn test_serde_json_error_maps_to_serialization() {
        let parse_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: StoreError = parse_err.into();
        assert!(matches!(err, StoreError::Serialization(_)));
    }
}
