use std::sync::Arc;

use sqlx::{Error, Sqlite, Transaction};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::configs::Storage;
use crate::models::ApiKey;

// TODO: store key hashes and compare via a constant-time digest once the
// provisioning flow can reissue existing device keys; until then tokens sit
// in the clear and match by plain equality.
pub struct ApiKeyRepository {
    storage: Arc<Storage>,
}

impl ApiKeyRepository {
    pub fn new(storage: Arc<Storage>) -> Self {
        Self { storage }
    }

    /// Random bearer token for a new device enrollment.
    pub fn generate_key() -> String {
        format!("key_{}", Uuid::new_v4().simple())
    }

    pub async fn create(
        &self,
        item: &ApiKey,
        transaction: &mut Transaction<'_, Sqlite>,
    ) -> Result<i32, Error> {
        let id = sqlx::query(
            r#"
            INSERT INTO api_keys (user_id, key, created_at, last_used)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(item.user_id)
        .bind(&item.key)
        .bind(item.created_at)
        .bind(item.last_used)
        .execute(&mut **transaction)
        .await?
        .last_insert_rowid();

        Ok(id as i32)
    }

    // Exact-match lookup; the token is the whole credential
    pub async fn find_by_key(&self, key: &str) -> Result<Option<ApiKey>, Error> {
        let api_key: Option<ApiKey> = sqlx::query_as("SELECT * FROM api_keys WHERE key = $1")
            .bind(key)
            .fetch_optional(self.storage.get_pool())
            .await?;

        Ok(api_key)
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<ApiKey>, Error> {
        let api_key: Option<ApiKey> = sqlx::query_as("SELECT * FROM api_keys WHERE id = $1")
            .bind(id)
            .fetch_optional(self.storage.get_pool())
            .await?;

        Ok(api_key)
    }

    pub async fn touch_last_used(
        &self,
        id: i32,
        now: OffsetDateTime,
        transaction: &mut Transaction<'_, Sqlite>,
    ) -> Result<(), Error> {
        sqlx::query("UPDATE api_keys SET last_used = $2 WHERE id = $1")
            .bind(id)
            .bind(now)
            .execute(&mut **transaction)
            .await?;

        Ok(())
    }
}
