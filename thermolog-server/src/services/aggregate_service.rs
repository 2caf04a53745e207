use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use sqlx::Error;
use time::OffsetDateTime;
use tokio::sync::Mutex;

use crate::configs::Storage;
use crate::repositories::ReadingRepository;

/// Rooms must contribute at least this many samples in the window to count.
const MIN_ROOM_SAMPLES: usize = 3;

const WINDOW: time::Duration = time::Duration::hours(24);

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GlobalAverage {
    /// Mean over all qualifying samples, one decimal; None when no room
    /// qualifies.
    pub average: Option<f64>,
    pub sample_count: usize,
    pub room_count: usize,
}

struct CacheSlot {
    stats: GlobalAverage,
    computed_at: OffsetDateTime,
}

/// Memoized 24 h global average with a single TTL-bound slot. The slot lock
/// is held across recompute, so concurrent misses produce one store query.
pub struct AggregateService {
    readings: ReadingRepository,
    ttl: time::Duration,
    slot: Mutex<Option<CacheSlot>>,
}

impl AggregateService {
    pub fn new(storage: Arc<Storage>, ttl: Duration) -> Self {
        Self {
            readings: ReadingRepository::new(storage),
            ttl: time::Duration::seconds(ttl.as_secs() as i64),
            slot: Mutex::new(None),
        }
    }

    pub async fn global_average(&self, now: OffsetDateTime) -> Result<GlobalAverage, Error> {
        let mut slot = self.slot.lock().await;

        if let Some(cached) = slot.as_ref() {
            if now - cached.computed_at < self.ttl {
                return Ok(cached.stats.clone());
            }
        }

        let stats = self.compute(now).await?;

        *slot = Some(CacheSlot {
            stats: stats.clone(),
            computed_at: now,
        });

        Ok(stats)
    }

    async fn compute(&self, now: OffsetDateTime) -> Result<GlobalAverage, Error> {
        let recent = self.readings.find_since(now - WINDOW).await?;

        let mut by_room: HashMap<i32, Vec<f64>> = HashMap::new();
        for reading in recent {
            by_room.entry(reading.room_id).or_default().push(reading.temperature);
        }

        by_room.retain(|_, temps| temps.len() >= MIN_ROOM_SAMPLES);

        let room_count = by_room.len();
        let all_temps: Vec<f64> = by_room.into_values().flatten().collect();
        let sample_count = all_temps.len();

        let average = if sample_count > 0 {
            let mean = all_temps.iter().sum::<f64>() / sample_count as f64;
            Some((mean * 10.0).round() / 10.0)
        } else {
            None
        };

        Ok(GlobalAverage {
            average,
            sample_count,
            room_count,
        })
    }
}
