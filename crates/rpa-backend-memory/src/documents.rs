//! In-memory document store.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use dashmap::DashMap;
use rpa_storage::{Collection, Document, DocumentId, DocumentStore, Fields, Query, StoreError};

use crate::snapshot;

type CollectionMap = BTreeMap<DocumentId, Fields>;

/// Document store held in process memory.
///
/// When opened with [`MemoryStore::open_snapshot`], every write rewrites a JSON
/// snapshot of all collections so the data survives restarts.
pub struct MemoryStore {
    collections: DashMap<Collection, CollectionMap>,
    snapshot: Option<PathBuf>,
    persist_lock: tokio::sync::Mutex<()>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            collections: DashMap::new(),
            snapshot: None,
            persist_lock: tokio::sync::Mutex::new(()),
        }
    }

    /// Load collections from `path` (if it exists) and persist back to it on every write.
    pub fn open_snapshot<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let state: BTreeMap<Collection, CollectionMap> =
            snapshot::load(&path).map_err(StoreError::Backend)?;
        Ok(Self {
            collections: state.into_iter().collect(),
            snapshot: Some(path),
            persist_lock: tokio::sync::Mutex::new(()),
        })
    }

    /// Number of documents in a collection.
    pub fn count(&self, collection: Collection) -> usize {
        self.collections
            .get(&collection)
            .map(|c| c.len())
            .unwrap_or(0)
    }

    async fn persist(&self) -> Result<(), StoreError> {
        let Some(path) = &self.snapshot else {
            return Ok(());
        };
        let _guard = self.persist_lock.lock().await;
        let state: BTreeMap<Collection, CollectionMap> = self
            .collections
            .iter()
            .map(|entry| (*entry.key(), entry.value().clone()))
            .collect();
        snapshot::save(path, &state)
            .await
            .map_err(StoreError::Backend)
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn create(
        &self,
        collection: Collection,
        fields: Fields,
    ) -> Result<DocumentId, StoreError> {
        let id = DocumentId::generate();
        self.collections
            .entry(collection)
            .or_default()
            .insert(id.clone(), fields);
        self.persist().await?;
        Ok(id)
    }

    async fn set(
        &self,
        collection: Collection,
        id: &DocumentId,
        fields: Fields,
    ) -> Result<(), StoreError> {
        self.collections
            .entry(collection)
            .or_default()
            .insert(id.clone(), fields);
        self.persist().await
    }

    async fn update(
        &self,
        collection: Collection,
        id: &DocumentId,
        fields: Fields,
    ) -> Result<(), StoreError> {
        {
            let mut docs = self
                .collections
                .get_mut(&collection)
                .ok_or(StoreError::NotFound)?;
            let existing = docs.get_mut(id).ok_or(StoreError::NotFound)?;
            existing.extend(fields);
        }
        self.persist().await
    }

    async fn delete(&self, collection: Collection, id: &DocumentId) -> Result<(), StoreError> {
        let removed = self
            .collections
            .get_mut(&collection)
            .and_then(|mut docs| docs.remove(id))
            .is_some();
        if removed {
            self.persist().await?;
        }
        Ok(())
    }

    async fn get(&self, collection: Collection, id: &DocumentId) -> Result<Document, StoreError> {
        let docs = self
            .collections
            .get(&collection)
            .ok_or(StoreError::NotFound)?;
        let fields = docs.get(id).ok_or(StoreError::NotFound)?;
        Ok(Document {
            id: id.clone(),
            fields: fields.clone(),
        })
    }

    async fn query(
        &self,
        collection: Collection,
        query: &Query,
    ) -> Result<Vec<Document>, StoreError> {
        let documents: Vec<Document> = match self.collections.get(&collection) {
            Some(docs) => docs
                .iter()
                .map(|(id, fields)| Document {
                    id: id.clone(),
                    fields: fields.clone(),
                })
                .collect(),
            None => Vec::new(),
        };
        Ok(query.apply(documents))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rpa_storage::Direction;
    use serde_json::json;

    fn fields(value: serde_json::Value) -> Fields {
        match value {
            serde_json::Value::Object(map) => map,
            _ => panic!("fixture must be an object"),
        }
    }

    #[tokio::test]
    async fn create_then_get() {
        let store = MemoryStore::new();
        let id = store
            .create(Collection::Events, fields(json!({"title": "AGM"})))
            .await
            .unwrap();

        let doc = store.get(Collection::Events, &id).await.unwrap();
        assert_eq!(doc.fields["title"], "AGM");
        assert_eq!(store.count(Collection::Events), 1);
        assert_eq!(store.count(Collection::Articles), 0);
    }

    #[tokio::test]
    async fn get_missing_is_not_found() {
        let store = MemoryStore::new();
        let err = store
            .get(Collection::Users, &DocumentId::from("nope"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound));
    }

    #[tokio::test]
    async fn set_overwrites_whole_document() {
        let store = MemoryStore::new();
        let id = DocumentId::from("+911234567890");
        store
            .set(Collection::Users, &id, fields(json!({"a": 1, "b": 2})))
            .await
            .unwrap();
        store
            .set(Collection::Users, &id, fields(json!({"a": 3})))
            .await
            .unwrap();

        let doc = store.get(Collection::Users, &id).await.unwrap();
        assert_eq!(doc.fields, fields(json!({"a": 3})));
    }

    #[tokio::test]
    async fn update_merges_and_requires_existing() {
        let store = MemoryStore::new();
        let id = store
            .create(
                Collection::Activities,
                fields(json!({"activityName": "Camp", "activityImages": ["u1"]})),
            )
            .await
            .unwrap();

        store
            .update(
                Collection::Activities,
                &id,
                fields(json!({"activityImages": ["u1", "u2"], "updatedAt": "2024-01-01T00:00:00Z"})),
            )
            .await
            .unwrap();
        let doc = store.get(Collection::Activities, &id).await.unwrap();
        assert_eq!(doc.fields["activityName"], "Camp");
        assert_eq!(doc.fields["activityImages"], json!(["u1", "u2"]));

        let err = store
            .update(
                Collection::Activities,
                &DocumentId::from("missing"),
                fields(json!({"x": 1})),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound));
    }

    #[tokio::test]
    async fn delete_is_idempotent() {
        let store = MemoryStore::new();
        let id = store
            .create(Collection::Team, fields(json!({"fullName": "A"})))
            .await
            .unwrap();
        store.delete(Collection::Team, &id).await.unwrap();
        store.delete(Collection::Team, &id).await.unwrap();
        assert_eq!(store.count(Collection::Team), 0);
    }

    #[tokio::test]
    async fn query_filters_and_orders() {
        let store = MemoryStore::new();
        for (title, dt) in [
            ("Later", "2024-06-01T10:00:00"),
            ("Sooner", "2024-05-01T10:00:00"),
        ] {
            store
                .create(
                    Collection::Events,
                    fields(json!({"title": title, "dateTime": dt})),
                )
                .await
                .unwrap();
        }

        let q = Query::new().order_by("dateTime", Direction::Ascending);
        let docs = store.query(Collection::Events, &q).await.unwrap();
        let titles: Vec<_> = docs.iter().map(|d| d.fields["title"].clone()).collect();
        assert_eq!(titles, vec![json!("Sooner"), json!("Later")]);

        let q = Query::new().where_eq("title", "Later");
        assert_eq!(store.query(Collection::Events, &q).await.unwrap().len(), 1);

        let empty = store
            .query(Collection::MembershipRequests, &Query::new())
            .await
            .unwrap();
        assert!(empty.is_empty());
    }

    #[tokio::test]
    async fn snapshot_survives_reopen() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("data").join("documents.json");

        let id = {
            let store = MemoryStore::open_snapshot(&path).unwrap();
            store
                .create(Collection::Articles, fields(json!({"title": "Hello"})))
                .await
                .unwrap()
        };

        let reopened = MemoryStore::open_snapshot(&path).unwrap();
        let doc = reopened.get(Collection::Articles, &id).await.unwrap();
        assert_eq!(doc.fields["title"], "Hello");
    }
}
