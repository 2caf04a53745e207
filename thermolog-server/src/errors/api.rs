use super::IngestError;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Ingestion error: {0}")]
    Ingest(#[from] IngestError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}
