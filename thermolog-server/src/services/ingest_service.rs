use std::sync::Arc;

use serde::{Deserialize, Serialize};
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{OffsetDateTime, PrimitiveDateTime};

use crate::configs::Storage;
use crate::errors::{ApiError, IngestError};
use crate::models::{ApiKey, Reading};
use crate::repositories::{ApiKeyRepository, ReadingRepository, RoomRepository};
use crate::services::RateLimiter;

/// Plausibility band for a classroom; outside it the reading is flagged but
/// still stored.
const NORMAL_TEMP_MIN: f64 = 5.0;
const NORMAL_TEMP_MAX: f64 = 35.0;

/// Client timestamps older than this are treated as clock damage.
const MAX_TIMESTAMP_AGE: time::Duration = time::Duration::days(7);

/// Inbound body of `POST /api/log_temp`. Everything is optional at the parse
/// layer so presence checks can order the 401/400 responses themselves.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TempSubmission {
    pub api_key: Option<String>,
    pub room_name: Option<String>,
    pub temperature: Option<f64>,
    pub temp_min: Option<f64>,
    pub temp_max: Option<f64>,
    pub timestamp: Option<String>,
}

pub fn classify_anomaly(temperature: f64) -> bool {
    temperature < NORMAL_TEMP_MIN || temperature > NORMAL_TEMP_MAX
}

fn parse_client_timestamp(raw: &str) -> Option<OffsetDateTime> {
    if let Ok(timestamp) = OffsetDateTime::parse(raw, &Rfc3339) {
        return Some(timestamp);
    }

    // Offset-less timestamps from older device firmware are taken as UTC
    let naive = format_description!(
        version = 2,
        "[year]-[month]-[day]T[hour]:[minute]:[second][optional [.[subsecond]]]"
    );

    PrimitiveDateTime::parse(raw, naive)
        .ok()
        .map(PrimitiveDateTime::assume_utc)
}

/// Keep a parsable client timestamp unless it is in the future or unusably
/// old; everything else collapses to `now`.
pub fn resolve_timestamp(raw: Option<&str>, now: OffsetDateTime) -> OffsetDateTime {
    let Some(raw) = raw else {
        return now;
    };

    match parse_client_timestamp(raw) {
        Some(timestamp) if timestamp > now => now,
        Some(timestamp) if now - timestamp > MAX_TIMESTAMP_AGE => now,
        Some(timestamp) => timestamp,
        None => now,
    }
}

/// The submission pipeline: authenticate, validate, rate-limit, then persist
/// room + reading + key bookkeeping in one transaction. Either the reading
/// is committed and acknowledged or nothing observable changes.
pub struct IngestService {
    storage: Arc<Storage>,
    api_keys: ApiKeyRepository,
    rooms: RoomRepository,
    readings: ReadingRepository,
    rate_limiter: Arc<RateLimiter>,
}

impl IngestService {
    pub fn new(storage: Arc<Storage>, rate_limiter: Arc<RateLimiter>) -> Self {
        Self {
            api_keys: ApiKeyRepository::new(storage.clone()),
            rooms: RoomRepository::new(storage.clone()),
            readings: ReadingRepository::new(storage.clone()),
            storage,
            rate_limiter,
        }
    }

    pub async fn log_temperature(
        &self,
        submission: TempSubmission,
        now: OffsetDateTime,
    ) -> Result<i64, ApiError> {
        let api_key = submission
            .api_key
            .as_deref()
            .filter(|key| !key.is_empty())
            .ok_or(IngestError::MissingApiKey)?;

        let key_row = self
            .api_keys
            .find_by_key(api_key)
            .await?
            .ok_or(IngestError::InvalidApiKey)?;

        let room_name = submission
            .room_name
            .as_deref()
            .filter(|name| !name.is_empty())
            .ok_or(IngestError::MissingFields)?;
        let temperature = submission.temperature.ok_or(IngestError::MissingFields)?;

        let permit = self
            .rate_limiter
            .try_acquire(api_key, now)
            .await
            .ok_or(IngestError::RateLimited(self.rate_limiter.cooldown_secs()))?;

        match self.persist(&key_row, room_name, temperature, &submission, now).await {
            Ok(reading_id) => Ok(reading_id),
            Err(err) => {
                // The slot was reserved at check time; hand it back so the
                // failed submission consumes no cooldown.
                self.rate_limiter.rollback(permit).await;
                Err(err)
            }
        }
    }

    async fn persist(
        &self,
        key_row: &ApiKey,
        room_name: &str,
        temperature: f64,
        submission: &TempSubmission,
        now: OffsetDateTime,
    ) -> Result<i64, ApiError> {
        let mut tx = self.storage.get_pool().begin().await?;

        let room = self
            .rooms
            .get_or_create(key_row.user_id, room_name, now, &mut tx)
            .await?;

        let reading = Reading {
            id: 0,
            room_id: room.id,
            time: resolve_timestamp(submission.timestamp.as_deref(), now),
            temperature,
            temp_min: submission.temp_min.unwrap_or(temperature),
            temp_max: submission.temp_max.unwrap_or(temperature),
            is_anomaly: classify_anomaly(temperature),
        };

        let reading_id = self.readings.create(&reading, &mut tx).await?;
        self.api_keys.touch_last_used(key_row.id, now, &mut tx).await?;

        tx.commit().await?;

        Ok(reading_id)
    }
}
