pub mod agent;
pub mod config;
pub mod sampler;
pub mod sensor;
pub mod transport;

use time::OffsetDateTime;

use crate::agent::{EdgeAgent, POST_INTERVAL, SAMPLE_INTERVAL};
use crate::config::Config;
use crate::sensor::SerialSensor;
use crate::transport::HttpTransport;

pub async fn run(config: Config) -> anyhow::Result<()> {
    let sensor = SerialSensor::open(&config.serial_port, config.baud_rate)?;
    let transport = HttpTransport::new(config.endpoint.clone(), config.api_key.clone())?;
    let mut agent = EdgeAgent::new(sensor, transport, POST_INTERVAL, OffsetDateTime::now_utc());

    tracing::info!(
        port = config.serial_port,
        endpoint = config.endpoint,
        "starting temperature monitoring"
    );

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("stopping temperature monitoring");
                break;
            }
            _ = tokio::time::sleep(SAMPLE_INTERVAL) => {
                agent.tick(OffsetDateTime::now_utc()).await;
            }
        }
    }

    Ok(())
}
