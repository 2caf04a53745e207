use std::sync::Arc;

use sqlx::{Error, Sqlite, Transaction};
use time::OffsetDateTime;

use crate::configs::Storage;
use crate::models::Reading;

pub struct ReadingRepository {
    storage: Arc<Storage>,
}

impl ReadingRepository {
    pub fn new(storage: Arc<Storage>) -> Self {
        Self { storage }
    }

    pub async fn create(
        &self,
        item: &Reading,
        transaction: &mut Transaction<'_, Sqlite>,
    ) -> Result<i64, Error> {
        let id = sqlx::query(
            r#"
            INSERT INTO readings (room_id, time, temperature, temp_min, temp_max, is_anomaly)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(item.room_id)
        .bind(item.time)
        .bind(item.temperature)
        .bind(item.temp_min)
        .bind(item.temp_max)
        .bind(item.is_anomaly)
        .execute(&mut **transaction)
        .await?
        .last_insert_rowid();

        Ok(id)
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<Reading>, Error> {
        let reading: Option<Reading> = sqlx::query_as("SELECT * FROM readings WHERE id = $1")
            .bind(id)
            .fetch_optional(self.storage.get_pool())
            .await?;

        Ok(reading)
    }

    // Readings newer than the cutoff across all rooms, newest first
    pub async fn find_since(&self, cutoff: OffsetDateTime) -> Result<Vec<Reading>, Error> {
        let readings: Vec<Reading> = sqlx::query_as(
            r#"
            SELECT * FROM readings
            WHERE time > $1
            ORDER BY time DESC
            "#,
        )
        .bind(cutoff)
        .fetch_all(self.storage.get_pool())
        .await?;

        Ok(readings)
    }

    pub async fn find_by_room_id(&self, room_id: i32) -> Result<Vec<Reading>, Error> {
        let readings: Vec<Reading> = sqlx::query_as(
            r#"
            SELECT * FROM readings
            WHERE room_id = $1
            ORDER BY time ASC
            "#,
        )
        .bind(room_id)
        .fetch_all(self.storage.get_pool())
        .await?;

        Ok(readings)
    }

    /// Delete all readings before the cutoff (retention contract).
    pub async fn delete_before_time(
        &self,
        cutoff: OffsetDateTime,
        transaction: &mut Transaction<'_, Sqlite>,
    ) -> Result<u64, Error> {
        let result = sqlx::query("DELETE FROM readings WHERE time < $1")
            .bind(cutoff)
            .execute(&mut **transaction)
            .await?;

        Ok(result.rows_affected())
    }
}
