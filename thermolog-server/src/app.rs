use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::CorsLayer;

use crate::configs::{SchemaManager, Settings, Storage};
use crate::handles::*;
use crate::services::{AggregateService, IngestService, RateLimiter, RetentionService};

pub async fn create_app(settings: &Arc<Settings>) -> Router {
    let storage = Arc::new(
        Storage::new(settings.database.clone(), SchemaManager::default())
            .await
            .unwrap(),
    );

    let rate_limiter = Arc::new(RateLimiter::new(Duration::from_secs(
        settings.ingest.rate_limit_secs,
    )));
    let ingest_service = Arc::new(IngestService::new(storage.clone(), rate_limiter));
    let aggregate_service = Arc::new(AggregateService::new(
        storage.clone(),
        Duration::from_secs(settings.ingest.cache_ttl_secs),
    ));

    let retention_service = Arc::new(RetentionService::new(
        storage.clone(),
        settings.ingest.retention_days,
    ));
    retention_service.spawn();

    let ingest = Router::new()
        .route("/log_temp", post(log_temperature))
        .with_state(IngestState { ingest_service });

    let statistics = Router::new()
        .route("/global_average", get(get_global_average))
        .with_state(StatisticsState { aggregate_service });

    Router::new()
        .nest("/api", ingest.merge(statistics))
        .layer(CorsLayer::permissive())
}
