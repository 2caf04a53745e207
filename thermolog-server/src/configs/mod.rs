pub mod schema;
pub mod settings;
pub mod storage;

pub use schema::SchemaManager;
pub use settings::{Database, Ingest, Logger, Server, Settings};
pub use storage::Storage;
