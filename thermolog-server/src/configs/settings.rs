use std::error::Error;
use std::{env, fs};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Server {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Logger {
    pub level: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Database {
    pub clean_start: bool,
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ingest {
    /// Minimum spacing between accepted submissions per api key.
    /// One minute shy of the expected 20 minute cadence to tolerate drift.
    #[serde(default = "default_rate_limit_secs")]
    pub rate_limit_secs: u64,
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,
    #[serde(default = "default_retention_days")]
    pub retention_days: i64,
}

impl Default for Ingest {
    fn default() -> Self {
        Self {
            rate_limit_secs: default_rate_limit_secs(),
            cache_ttl_secs: default_cache_ttl_secs(),
            retention_days: default_retention_days(),
        }
    }
}

fn default_rate_limit_secs() -> u64 {
    19 * 60
}

fn default_cache_ttl_secs() -> u64 {
    300
}

fn default_retention_days() -> i64 {
    90
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub server: Server,
    pub logger: Logger,
    pub database: Database,
    #[serde(default)]
    pub ingest: Ingest,
}

impl Settings {
    pub fn new() -> Result<Self, Box<dyn Error>> {
        let path = env::var("THERMOLOG_CONFIG").unwrap_or("configs/default.toml".into());

        let settings: Settings = toml::from_str(&fs::read_to_string(&path)?)?;

        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ingest_defaults_apply() {
        let settings: Settings = toml::from_str(
            r#"
            [server]
            host = "127.0.0.1"
            port = 3000

            [logger]
            level = "info"

            [database]
            clean_start = true
            url = "sqlite::memory:"
            "#,
        )
        .unwrap();

        assert_eq!(settings.ingest.rate_limit_secs, 1140);
        assert_eq!(settings.ingest.cache_ttl_secs, 300);
        assert_eq!(settings.ingest.retention_days, 90);
    }

    #[test]
    fn test_ingest_overrides() {
        let settings: Settings = toml::from_str(
            r#"
            [server]
            host = "0.0.0.0"
            port = 8080

            [logger]
            level = "debug"

            [database]
            clean_start = false
            url = "sqlite:thermolog.db"

            [ingest]
            rate_limit_secs = 60
            retention_days = 30
            "#,
        )
        .unwrap();

        assert_eq!(settings.ingest.rate_limit_secs, 60);
        assert_eq!(settings.ingest.cache_ttl_secs, 300);
        assert_eq!(settings.ingest.retention_days, 30);
    }
}
