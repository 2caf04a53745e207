use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::response::IntoResponse;
use serde_json::json;
use time::OffsetDateTime;

use crate::errors::{ApiError, IngestError};
use crate::services::{IngestService, TempSubmission};

#[derive(Clone)]
pub struct IngestState {
    pub ingest_service: Arc<IngestService>,
}

pub async fn log_temperature(
    State(state): State<IngestState>,
    payload: Result<Json<TempSubmission>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(submission) = payload.map_err(|_| IngestError::MalformedPayload)?;

    let reading_id = state
        .ingest_service
        .log_temperature(submission, OffsetDateTime::now_utc())
        .await?;

    Ok(Json(json!({
        "status": "success",
        "reading_id": reading_id.to_string(),
    })))
}
