use async_trait::async_trait;
use bson::{doc, oid::ObjectId, Document};
use futures::TryStreamExt;
use mongodb::{
    options::{ClientOptions, ServerApi, ServerApiVersion},
    Client, Collection, Database,
};
use std::sync::Arc;
use std::time::Duration;

use super::store::{key_to_string, DocumentStore, Filter, StoreError, StoredDocument};

pub async fn create_mongo_client(uri: &str) -> Result<Arc<Client>, StoreError> {
    log::info!("Connecting to MongoDB");

    let mut client_options = ClientOptions::parse(uri).await?;

    client_options.connect_timeout = Some(Duration::from_secs(10));
    client_options.server_selection_timeout = Some(Duration::from_secs(10));
    client_options.max_pool_size = Some(10);
    client_options.min_pool_size = Some(1);

    let server_api = ServerApi::builder().version(ServerApiVersion::V1).build();
    client_options.server_api = Some(server_api);

    let client = Client::with_options(client_options)?;

    match client
        .database("admin")
        .run_command(doc! {"ping": 1})
        .await
    {
        Ok(_) => log::info!("Connected to MongoDB and verified with ping"),
        Err(e) => {
            log::warn!("Connected to MongoDB but ping failed: {}", e);
            log::warn!("Lookups will fall back to placeholder content until the store recovers");
        }
    }

    Ok(Arc::new(client))
}

pub struct MongoDocumentStore {
    database: Database,
}

impl MongoDocumentStore {
    pub fn new(client: Arc<Client>, database: &str) -> Self {
        Self {
            database: client.database(database),
        }
    }

    fn collection(&self, name: &str) -> Collection<Document> {
        self.database.collection(name)
    }

    /// Route keys are opaque strings; documents created outside this service
    /// may still carry ObjectId keys.
    fn key_filter(key: &str) -> Document {
        match ObjectId::parse_str(key) {
            Ok(oid) => doc! { "$or": [ { "_id": key }, { "_id": oid } ] },
            Err(_) => doc! { "_id": key },
        }
    }

    fn into_stored(mut data: Document) -> StoredDocument {
        let key = data
            .remove("_id")
            .map(|id| key_to_string(&id))
            .unwrap_or_default();
        StoredDocument { key, data }
    }
}

#[async_trait]
impl DocumentStore for MongoDocumentStore {
    async fn ping(&self) -> Result<(), StoreError> {
        self.database.run_command(doc! {"ping": 1}).await?;
        Ok(())
    }

    async fn get(&self, collection: &str, key: &str) -> Result<Option<StoredDocument>, StoreError> {
        let found = self
            .collection(collection)
            .find_one(Self::key_filter(key))
            .await?;
        Ok(found.map(Self::into_stored))
    }

    async fn find(
        &self,
        collection: &str,
        filter: Filter,
    ) -> Result<Vec<StoredDocument>, StoreError> {
        let query = match filter {
            Filter::All => doc! {},
            Filter::Eq(field, value) => {
                let mut d = Document::new();
                d.insert(field, value);
                d
            }
        };

        let cursor = self.collection(collection).find(query).await?;
        let documents: Vec<Document> = cursor.try_collect().await?;
        Ok(documents.into_iter().map(Self::into_stored).collect())
    }

    async fn add(&self, collection: &str, document: Document) -> Result<String, StoreError> {
        let result = self.collection(collection).insert_one(document).await?;
        Ok(key_to_string(&result.inserted_id))
    }

    async fn update(
        &self,
        collection: &str,
        key: &str,
        fields: Document,
    ) -> Result<(), StoreError> {
        let result = self
            .collection(collection)
            .update_one(Self::key_filter(key), doc! { "$set": fields })
            .await?;

        if result.matched_count == 0 {
            return Err(StoreError::NotFound {
                collection: collection.to_string(),
                key: key.to_string(),
            });
        }
        Ok(())
    }

    async fn delete(&self, collection: &str, key: &str) -> Result<(), StoreError> {
        let result = self
            .collection(collection)
            .delete_one(Self::key_filter(key))
            .await?;

        if result.deleted_count == 0 {
            return Err(StoreError::NotFound {
                collection: collection.to_string(),
                key: key.to_string(),
            });
        }
        Ok(())
    }
}
