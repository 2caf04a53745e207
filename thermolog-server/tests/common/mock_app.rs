use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::routing::{get, post};
use time::OffsetDateTime;

use thermolog_server::configs::schema::SchemaManager;
use thermolog_server::configs::settings::Database;
use thermolog_server::configs::storage::Storage;
use thermolog_server::handles::{
    IngestState, StatisticsState, get_global_average, log_temperature,
};
use thermolog_server::models::{ApiKey, Reading, Room, User};
use thermolog_server::repositories::{
    ApiKeyRepository, ReadingRepository, RoomRepository, UserRepository,
};
use thermolog_server::services::{AggregateService, IngestService, RateLimiter};

pub struct MockApp {
    pub storage: Arc<Storage>,
    pub router: Router,
}

impl MockApp {
    pub async fn new() -> Self {
        Self::with_cooldown(Duration::from_secs(19 * 60)).await
    }

    pub async fn with_cooldown(cooldown: Duration) -> Self {
        let storage = Arc::new(
            Storage::new(
                Database {
                    clean_start: true,
                    url: String::from("sqlite::memory:"),
                },
                SchemaManager::default(),
            )
            .await
            .unwrap(),
        );

        let rate_limiter = Arc::new(RateLimiter::new(cooldown));
        let ingest_service = Arc::new(IngestService::new(storage.clone(), rate_limiter));
        let aggregate_service = Arc::new(AggregateService::new(
            storage.clone(),
            Duration::from_secs(300),
        ));

        let ingest = Router::new()
            .route("/log_temp", post(log_temperature))
            .with_state(IngestState { ingest_service });

        let statistics = Router::new()
            .route("/global_average", get(get_global_average))
            .with_state(StatisticsState { aggregate_service });

        let router = Router::new().nest("/api", ingest.merge(statistics));

        Self { storage, router }
    }

    pub async fn create_test_user(&self, email: &str) -> i32 {
        let repo = UserRepository::new(self.storage.clone());
        let mut tx = self.storage.get_pool().begin().await.unwrap();
        let user_id = repo
            .create(
                &User {
                    id: 0,
                    email: email.to_string(),
                    created_at: OffsetDateTime::now_utc(),
                },
                &mut tx,
            )
            .await
            .unwrap();
        tx.commit().await.unwrap();

        user_id
    }

    pub async fn create_test_api_key(&self, user_id: i32) -> String {
        let key = ApiKeyRepository::generate_key();

        let repo = ApiKeyRepository::new(self.storage.clone());
        let mut tx = self.storage.get_pool().begin().await.unwrap();
        repo.create(
            &ApiKey {
                id: 0,
                user_id,
                key: key.clone(),
                created_at: OffsetDateTime::now_utc(),
                last_used: None,
            },
            &mut tx,
        )
        .await
        .unwrap();
        tx.commit().await.unwrap();

        key
    }

    pub async fn create_test_room(&self, user_id: i32, name: &str) -> i32 {
        let repo = RoomRepository::new(self.storage.clone());
        let mut tx = self.storage.get_pool().begin().await.unwrap();
        let room_id = repo
            .create(
                &Room {
                    id: 0,
                    user_id,
                    name: name.to_string(),
                    created_at: OffsetDateTime::now_utc(),
                },
                &mut tx,
            )
            .await
            .unwrap();
        tx.commit().await.unwrap();

        room_id
    }

    pub async fn insert_reading(&self, room_id: i32, time: OffsetDateTime, temperature: f64) {
        let repo = ReadingRepository::new(self.storage.clone());
        let mut tx = self.storage.get_pool().begin().await.unwrap();
        repo.create(
            &Reading {
                id: 0,
                room_id,
                time,
                temperature,
                temp_min: temperature,
                temp_max: temperature,
                is_anomaly: false,
            },
            &mut tx,
        )
        .await
        .unwrap();
        tx.commit().await.unwrap();
    }
}
