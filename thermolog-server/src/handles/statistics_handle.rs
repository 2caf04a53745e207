use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::response::IntoResponse;
use time::OffsetDateTime;

use crate::errors::ApiError;
use crate::services::AggregateService;

#[derive(Clone)]
pub struct StatisticsState {
    pub aggregate_service: Arc<AggregateService>,
}

pub async fn get_global_average(
    State(state): State<StatisticsState>,
) -> Result<impl IntoResponse, ApiError> {
    let stats = state
        .aggregate_service
        .global_average(OffsetDateTime::now_utc())
        .await?;

    Ok(Json(stats))
}
