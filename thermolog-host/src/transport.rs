use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, thiserror::Error)]
pub enum TransmissionError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("timestamp formatting failed: {0}")]
    Timestamp(#[from] time::error::Format),
}

#[derive(Debug, Serialize)]
struct TempReport<'a> {
    api_key: &'a str,
    temperature: f64,
    timestamp: String,
}

/// Upstream delivery of an averaged reading.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(
        &self,
        temperature: f64,
        timestamp: OffsetDateTime,
    ) -> Result<(), TransmissionError>;
}

pub struct HttpTransport {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl HttpTransport {
    pub fn new(endpoint: String, api_key: String) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            client,
            endpoint,
            api_key,
        })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(
        &self,
        temperature: f64,
        timestamp: OffsetDateTime,
    ) -> Result<(), TransmissionError> {
        let report = TempReport {
            api_key: &self.api_key,
            temperature,
            timestamp: timestamp.format(&Rfc3339)?,
        };

        self.client
            .post(&self.endpoint)
            .json(&report)
            .send()
            .await?
            .error_for_status()?;

        Ok(())
    }
}
