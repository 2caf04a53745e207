use axum::http::StatusCode;

#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("Invalid JSON format")]
    MalformedPayload,

    #[error("Missing API key")]
    MissingApiKey,

    #[error("Invalid API key")]
    InvalidApiKey,

    #[error("Missing required fields: room_name, temperature")]
    MissingFields,

    #[error("Rate limit exceeded. Max 1 submission per {0} seconds.")]
    RateLimited(u64),
}

impl IngestError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            IngestError::MalformedPayload => StatusCode::BAD_REQUEST,
            IngestError::MissingApiKey => StatusCode::UNAUTHORIZED,
            IngestError::InvalidApiKey => StatusCode::UNAUTHORIZED,
            IngestError::MissingFields => StatusCode::BAD_REQUEST,
            IngestError::RateLimited(_) => StatusCode::TOO_MANY_REQUESTS,
        }
    }
}
