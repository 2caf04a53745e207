use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::Table;

#[derive(Clone, Debug, Serialize, Deserialize, sqlx::FromRow)]
pub struct Reading {
    pub id: i64,
    pub room_id: i32,
    /// The time of the measurement, clamped server-side on skew
    pub time: OffsetDateTime,
    /// Temperature in Celsius
    pub temperature: f64,
    pub temp_min: f64,
    pub temp_max: f64,
    /// Outside the 5..=35 plausibility band; stored, never rejected
    pub is_anomaly: bool,
}

#[derive(Clone)]
pub struct ReadingTable;

impl Table for ReadingTable {
    fn name(&self) -> &'static str {
        "readings"
    }

    fn create(&self) -> String {
        String::from(
            r#"
            CREATE TABLE IF NOT EXISTS readings (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                room_id INTEGER NOT NULL,
                time TIMESTAMP NOT NULL,
                temperature REAL NOT NULL,
                temp_min REAL NOT NULL,
                temp_max REAL NOT NULL,
                is_anomaly BOOLEAN NOT NULL,
                FOREIGN KEY (room_id) REFERENCES rooms (id) ON DELETE CASCADE
            );
            "#,
        )
    }

    fn dispose(&self) -> String {
        String::from("DROP TABLE IF EXISTS readings;")
    }
}
