use std::sync::Arc;

use sqlx::{Error, Sqlite, Transaction};
use time::OffsetDateTime;

use crate::configs::Storage;
use crate::models::Room;

pub struct RoomRepository {
    storage: Arc<Storage>,
}

impl RoomRepository {
    pub fn new(storage: Arc<Storage>) -> Self {
        Self { storage }
    }

    pub async fn create(
        &self,
        item: &Room,
        transaction: &mut Transaction<'_, Sqlite>,
    ) -> Result<i32, Error> {
        let id = sqlx::query(
            r#"
            INSERT INTO rooms (user_id, name, created_at)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(item.user_id)
        .bind(&item.name)
        .bind(item.created_at)
        .execute(&mut **transaction)
        .await?
        .last_insert_rowid();

        Ok(id as i32)
    }

    /// Upsert on (owner, name): concurrent first submissions for a new room
    /// land on the same row instead of racing a check-then-insert.
    pub async fn get_or_create(
        &self,
        user_id: i32,
        name: &str,
        now: OffsetDateTime,
        transaction: &mut Transaction<'_, Sqlite>,
    ) -> Result<Room, Error> {
        sqlx::query(
            r#"
            INSERT INTO rooms (user_id, name, created_at)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_id, name) DO NOTHING
            "#,
        )
        .bind(user_id)
        .bind(name)
        .bind(now)
        .execute(&mut **transaction)
        .await?;

        let room: Room = sqlx::query_as("SELECT * FROM rooms WHERE user_id = $1 AND name = $2")
            .bind(user_id)
            .bind(name)
            .fetch_one(&mut **transaction)
            .await?;

        Ok(room)
    }

    pub async fn find_by_owner_and_name(
        &self,
        user_id: i32,
        name: &str,
    ) -> Result<Option<Room>, Error> {
        let room: Option<Room> =
            sqlx::query_as("SELECT * FROM rooms WHERE user_id = $1 AND name = $2")
                .bind(user_id)
                .bind(name)
                .fetch_optional(self.storage.get_pool())
                .await?;

        Ok(room)
    }

    pub async fn find_by_owner(&self, user_id: i32) -> Result<Vec<Room>, Error> {
        let rooms: Vec<Room> =
            sqlx::query_as("SELECT * FROM rooms WHERE user_id = $1 ORDER BY created_at ASC")
                .bind(user_id)
                .fetch_all(self.storage.get_pool())
                .await?;

        Ok(rooms)
    }
}
