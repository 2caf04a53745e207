use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Device path used when the config file does not name one.
pub const DEFAULT_SERIAL_PORT: &str = if cfg!(windows) { "COM3" } else { "/dev/ttyACM0" };

pub const DEFAULT_BAUD_RATE: u32 = 115_200;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Configuration file '{0}' not found")]
    FileNotFound(String),

    #[error("API_KEY not configured")]
    MissingApiKey,

    #[error("ANVIL_ENDPOINT not configured")]
    MissingEndpoint,

    #[error("Invalid BAUD_RATE: must be a number")]
    InvalidBaudRate,
}

/// Edge agent settings, read from the fleet's plain `key=value` config file
/// (`#` comment lines ignored).
#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: String,
    pub serial_port: String,
    pub baud_rate: u32,
    pub endpoint: String,
}

impl Config {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path)
            .map_err(|_| ConfigError::FileNotFound(path.display().to_string()))?;

        Self::parse(&raw)
    }

    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        let mut values: HashMap<&str, &str> = HashMap::new();

        for line in raw.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            if let Some((key, value)) = line.split_once('=') {
                values.insert(key.trim(), value.trim());
            }
        }

        let api_key = values
            .get("API_KEY")
            .filter(|v| !v.is_empty())
            .ok_or(ConfigError::MissingApiKey)?
            .to_string();

        let endpoint = values
            .get("ANVIL_ENDPOINT")
            .filter(|v| !v.is_empty())
            .ok_or(ConfigError::MissingEndpoint)?
            .to_string();

        let serial_port = values
            .get("SERIAL_PORT")
            .filter(|v| !v.is_empty())
            .unwrap_or(&DEFAULT_SERIAL_PORT)
            .to_string();

        let baud_rate = match values.get("BAUD_RATE") {
            Some(raw) => raw.parse().map_err(|_| ConfigError::InvalidBaudRate)?,
            None => DEFAULT_BAUD_RATE,
        };

        Ok(Self {
            api_key,
            serial_port,
            baud_rate,
            endpoint,
        })
    }
}
