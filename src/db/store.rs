use async_trait::async_trait;
use bson::{Bson, Document};
use thiserror::Error;

pub const TREKS: &str = "treks";
pub const REVIEWS: &str = "reviews";
pub const BOOKINGS: &str = "bookings";
pub const USERS: &str = "users";
pub const BLOGS: &str = "blogs";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("document store backend error: {0}")]
    Backend(String),
    #[error("failed to decode document {key} in {collection}: {reason}")]
    Decode {
        collection: String,
        key: String,
        reason: String,
    },
    #[error("failed to encode document: {0}")]
    Encode(#[from] bson::ser::Error),
    #[error("document {key} not found in {collection}")]
    NotFound { collection: String, key: String },
}

impl From<mongodb::error::Error> for StoreError {
    fn from(err: mongodb::error::Error) -> Self {
        StoreError::Backend(err.to_string())
    }
}

/// A document as read back from a collection. `data` never carries `_id`;
/// the primary key is exposed as `key` in string form.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredDocument {
    pub key: String,
    pub data: Document,
}

impl StoredDocument {
    /// Decode `data` into a typed record, reporting which document failed.
    pub fn decode<T>(&self, collection: &str) -> Result<T, StoreError>
    where
        T: serde::de::DeserializeOwned,
    {
        bson::from_document(self.data.clone()).map_err(|e| StoreError::Decode {
            collection: collection.to_string(),
            key: self.key.clone(),
            reason: e.to_string(),
        })
    }

    pub fn str_field(&self, field: &str) -> Option<&str> {
        self.data.get_str(field).ok()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    All,
    Eq(String, Bson),
}

impl Filter {
    pub fn eq(field: &str, value: impl Into<Bson>) -> Self {
        Filter::Eq(field.to_string(), value.into())
    }

    pub fn matches(&self, data: &Document) -> bool {
        match self {
            Filter::All => true,
            Filter::Eq(field, value) => data.get(field) == Some(value),
        }
    }
}

/// Get/query/add/update/delete over named collections of schema-less documents.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn get(&self, collection: &str, key: &str) -> Result<Option<StoredDocument>, StoreError>;

    async fn find(&self, collection: &str, filter: Filter)
        -> Result<Vec<StoredDocument>, StoreError>;

    /// Insert a new document and return its generated key.
    async fn add(&self, collection: &str, document: Document) -> Result<String, StoreError>;

    /// Set the given fields on an existing document. Dotted field names
    /// address nested documents.
    async fn update(&self, collection: &str, key: &str, fields: Document)
        -> Result<(), StoreError>;

    async fn delete(&self, collection: &str, key: &str) -> Result<(), StoreError>;

    /// Cheap reachability check for health reporting.
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

/// Render a primary key the way callers see it in routes.
pub fn key_to_string(id: &Bson) -> String {
    match id {
        Bson::ObjectId(oid) => oid.to_hex(),
        Bson::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Remove every null or undefined value, recursing into sub-documents.
pub fn strip_absent(document: &mut Document) {
    let absent: Vec<String> = document
        .iter()
        .filter(|(_, v)| matches!(v, Bson::Null | Bson::Undefined))
        .map(|(k, _)| k.clone())
        .collect();
    for key in absent {
        document.remove(&key);
    }
    for (_, value) in document.iter_mut() {
        if let Bson::Document(inner) = value {
            strip_absent(inner);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;

    #[test]
    fn test_strip_absent_removes_nulls_recursively() {
        let mut d = doc! {
            "a": 1,
            "b": Bson::Null,
            "nested": { "c": Bson::Null, "d": "kept" },
        };
        strip_absent(&mut d);
        assert_eq!(d, doc! { "a": 1, "nested": { "d": "kept" } });
    }

    #[test]
    fn test_filter_eq_matches_exact_value() {
        let f = Filter::eq("trekId", "kedarkantha");
        assert!(f.matches(&doc! { "trekId": "kedarkantha" }));
        assert!(!f.matches(&doc! { "trekId": "other" }));
        assert!(!f.matches(&doc! {}));
        assert!(Filter::All.matches(&doc! {}));
    }
}
