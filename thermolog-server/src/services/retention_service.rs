use std::sync::Arc;
use std::time::Duration;

use sqlx::Error;
use time::OffsetDateTime;

use crate::configs::Storage;
use crate::repositories::ReadingRepository;

const PURGE_INTERVAL: Duration = Duration::from_secs(24 * 60 * 60);

/// Deletes readings older than the retention horizon. The only contract it
/// consumes is `ReadingRepository::delete_before_time`.
pub struct RetentionService {
    storage: Arc<Storage>,
    readings: ReadingRepository,
    retention: time::Duration,
}

impl RetentionService {
    pub fn new(storage: Arc<Storage>, retention_days: i64) -> Self {
        Self {
            readings: ReadingRepository::new(storage.clone()),
            storage,
            retention: time::Duration::days(retention_days),
        }
    }

    pub async fn purge_once(&self, now: OffsetDateTime) -> Result<u64, Error> {
        let cutoff = now - self.retention;

        let mut tx = self.storage.get_pool().begin().await?;
        let deleted = self.readings.delete_before_time(cutoff, &mut tx).await?;
        tx.commit().await?;

        if deleted > 0 {
            tracing::info!(deleted, %cutoff, "retention purge removed old readings");
        }

        Ok(deleted)
    }

    /// Daily purge loop; the first tick fires immediately on startup.
    pub fn spawn(self: Arc<Self>) {
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(PURGE_INTERVAL);

            loop {
                interval.tick().await;

                if let Err(err) = self.purge_once(OffsetDateTime::now_utc()).await {
                    tracing::error!("retention purge failed: {}", err);
                }
            }
        });
    }
}
