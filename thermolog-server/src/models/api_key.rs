use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::Table;

#[derive(Clone, Debug, Serialize, Deserialize, sqlx::FromRow)]
pub struct ApiKey {
    pub id: i32,
    pub user_id: i32,
    /// The bearer token presented by the edge agent
    pub key: String,
    pub created_at: OffsetDateTime,
    /// Time of the last accepted submission, if any
    pub last_used: Option<OffsetDateTime>,
}

#[derive(Clone)]
pub struct ApiKeyTable;

impl Table for ApiKeyTable {
    fn name(&self) -> &'static str {
        "api_keys"
    }

    fn create(&self) -> String {
        String::from(
            r#"
            CREATE TABLE IF NOT EXISTS api_keys (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL,
                key TEXT NOT NULL UNIQUE,
                created_at TIMESTAMP NOT NULL,
                last_used TIMESTAMP,
                FOREIGN KEY (user_id) REFERENCES users (id) ON DELETE CASCADE
            );
            "#,
        )
    }

    fn dispose(&self) -> String {
        String::from("DROP TABLE IF EXISTS api_keys;")
    }
}
