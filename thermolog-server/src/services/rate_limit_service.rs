use std::collections::HashMap;
use std::time::Duration;

use time::OffsetDateTime;
use tokio::sync::Mutex;

/// Proof that a submission passed the cooldown check. Holds whatever was in
/// the slot before, so a failed submission can hand the slot back.
#[derive(Debug)]
pub struct RatePermit {
    key: String,
    previous: Option<OffsetDateTime>,
}

/// Per-key minimum spacing between accepted submissions. Process-local and
/// volatile: a restart only shortens the enforced cooldown once.
///
/// The caller supplies `now`, so tests drive the clock directly.
pub struct RateLimiter {
    cooldown: time::Duration,
    last_accepted: Mutex<HashMap<String, OffsetDateTime>>,
}

impl RateLimiter {
    pub fn new(cooldown: Duration) -> Self {
        Self {
            cooldown: time::Duration::seconds(cooldown.as_secs() as i64),
            last_accepted: Mutex::new(HashMap::new()),
        }
    }

    pub fn cooldown_secs(&self) -> u64 {
        self.cooldown.whole_seconds() as u64
    }

    /// Check-and-reserve in one step under the map lock: a second request for
    /// the same key sees the reservation and is rejected, never a stale slot.
    pub async fn try_acquire(&self, key: &str, now: OffsetDateTime) -> Option<RatePermit> {
        let mut last_accepted = self.last_accepted.lock().await;

        if let Some(&prior) = last_accepted.get(key) {
            if now - prior < self.cooldown {
                return None;
            }
        }

        let previous = last_accepted.insert(key.to_string(), now);

        Some(RatePermit {
            key: key.to_string(),
            previous,
        })
    }

    /// Undo a reservation whose submission did not go through, so the failed
    /// attempt consumes no cooldown.
    pub async fn rollback(&self, permit: RatePermit) {
        let mut last_accepted = self.last_accepted.lock().await;

        match permit.previous {
            Some(prior) => last_accepted.insert(permit.key, prior),
            None => last_accepted.remove(&permit.key),
        };
    }
}
