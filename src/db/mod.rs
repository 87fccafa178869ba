pub mod memory;
pub mod mongo;
pub mod store;

pub use memory::MemoryDocumentStore;
pub use mongo::MongoDocumentStore;
pub use store::{DocumentStore, Filter, StoreError, StoredDocument};
