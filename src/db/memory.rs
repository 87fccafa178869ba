use async_trait::async_trait;
use bson::{Bson, Document};
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::store::{DocumentStore, Filter, StoreError, StoredDocument};

/// Process-local document store. Collections keep insertion order so that
/// scans behave like a small ordered table.
#[derive(Default)]
pub struct MemoryDocumentStore {
    collections: RwLock<HashMap<String, Vec<StoredDocument>>>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a document under a caller-chosen key.
    pub async fn put(&self, collection: &str, key: &str, data: Document) {
        let mut collections = self.collections.write().await;
        let docs = collections.entry(collection.to_string()).or_default();
        match docs.iter_mut().find(|d| d.key == key) {
            Some(existing) => existing.data = data,
            None => docs.push(StoredDocument {
                key: key.to_string(),
                data,
            }),
        }
    }

    pub async fn len(&self, collection: &str) -> usize {
        self.collections
            .read()
            .await
            .get(collection)
            .map(Vec::len)
            .unwrap_or(0)
    }
}

fn set_path(target: &mut Document, path: &str, value: Bson) {
    match path.split_once('.') {
        None => {
            target.insert(path, value);
        }
        Some((head, rest)) => {
            if !matches!(target.get(head), Some(Bson::Document(_))) {
                target.insert(head, Document::new());
            }
            if let Some(Bson::Document(inner)) = target.get_mut(head) {
                set_path(inner, rest, value);
            }
        }
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn get(&self, collection: &str, key: &str) -> Result<Option<StoredDocument>, StoreError> {
        Ok(self
            .collections
            .read()
            .await
            .get(collection)
            .and_then(|docs| docs.iter().find(|d| d.key == key).cloned()))
    }

    async fn find(
        &self,
        collection: &str,
        filter: Filter,
    ) -> Result<Vec<StoredDocument>, StoreError> {
        Ok(self
            .collections
            .read()
            .await
            .get(collection)
            .map(|docs| {
                docs.iter()
                    .filter(|d| filter.matches(&d.data))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn add(&self, collection: &str, mut document: Document) -> Result<String, StoreError> {
        let key = match document.remove("_id") {
            Some(Bson::String(key)) => key,
            _ => Uuid::new_v4().simple().to_string(),
        };
        self.put(collection, &key, document).await;
        Ok(key)
    }

    async fn update(
        &self,
        collection: &str,
        key: &str,
        fields: Document,
    ) -> Result<(), StoreError> {
        let mut collections = self.collections.write().await;
        let existing = collections
            .get_mut(collection)
            .and_then(|docs| docs.iter_mut().find(|d| d.key == key))
            .ok_or_else(|| StoreError::NotFound {
                collection: collection.to_string(),
                key: key.to_string(),
            })?;

        for (path, value) in fields {
            set_path(&mut existing.data, &path, value);
        }
        Ok(())
    }

    async fn delete(&self, collection: &str, key: &str) -> Result<(), StoreError> {
        let mut collections = self.collections.write().await;
        let docs = collections.get_mut(collection);
        let position = docs
            .as_ref()
            .and_then(|docs| docs.iter().position(|d| d.key == key));

        match (docs, position) {
            (Some(docs), Some(index)) => {
                docs.remove(index);
                Ok(())
            }
            _ => Err(StoreError::NotFound {
                collection: collection.to_string(),
                key: key.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;

    #[test]
    fn test_update_sets_nested_paths() {
        tokio_test::block_on(async {
            let store = MemoryDocumentStore::new();
            store
                .put("users", "u1", doc! { "displayName": "Asha", "organizationDetails": { "phone": "1" } })
                .await;

            store
                .update(
                    "users",
                    "u1",
                    doc! { "organizationDetails.website": "https://peaks.example", "displayName": "Asha K" },
                )
                .await
                .unwrap();

            let user = store.get("users", "u1").await.unwrap().unwrap();
            assert_eq!(user.str_field("displayName"), Some("Asha K"));
            let org = user.data.get_document("organizationDetails").unwrap();
            assert_eq!(org.get_str("phone").unwrap(), "1");
            assert_eq!(org.get_str("website").unwrap(), "https://peaks.example");
        });
    }

    #[test]
    fn test_missing_documents_report_not_found() {
        tokio_test::block_on(async {
            let store = MemoryDocumentStore::new();
            assert!(store.get("treks", "nope").await.unwrap().is_none());
            assert!(matches!(
                store.update("treks", "nope", doc! { "a": 1 }).await,
                Err(StoreError::NotFound { .. })
            ));
            assert!(matches!(
                store.delete("treks", "nope").await,
                Err(StoreError::NotFound { .. })
            ));
        });
    }

    #[test]
    fn test_add_generates_keys_and_find_filters() {
        tokio_test::block_on(async {
            let store = MemoryDocumentStore::new();
            let a = store.add("reviews", doc! { "trekId": "hampta-pass" }).await.unwrap();
            let b = store.add("reviews", doc! { "trekId": "other" }).await.unwrap();
            assert_ne!(a, b);

            let found = store
                .find("reviews", Filter::eq("trekId", "hampta-pass"))
                .await
                .unwrap();
            assert_eq!(found.len(), 1);
            assert_eq!(found[0].key, a);
            assert_eq!(store.len("reviews").await, 2);
        });
    }
}
