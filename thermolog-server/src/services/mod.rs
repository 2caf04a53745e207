mod aggregate_service;
mod ingest_service;
mod rate_limit_service;
mod retention_service;

pub use aggregate_service::*;
pub use ingest_service::*;
pub use rate_limit_service::*;
pub use retention_service::*;
