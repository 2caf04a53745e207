use std::io::{BufRead, BufReader, ErrorKind};
use std::time::Duration;

use async_trait::async_trait;
use serialport::SerialPort;

const READ_TIMEOUT: Duration = Duration::from_secs(1);

/// Source of raw temperature lines. The production implementation reads a
/// serial device; tests substitute scripted sources.
#[async_trait]
pub trait SensorSource: Send {
    /// Next raw line from the device, or `None` when nothing arrived before
    /// the read timeout.
    async fn read_line(&mut self) -> anyhow::Result<Option<String>>;
}

pub struct SerialSensor {
    reader: BufReader<Box<dyn SerialPort>>,
}

impl SerialSensor {
    pub fn open(port_path: &str, baud_rate: u32) -> anyhow::Result<Self> {
        let port = serialport::new(port_path, baud_rate)
            .timeout(READ_TIMEOUT)
            .open()?;

        tracing::info!(port = port_path, baud_rate, "serial sensor connected");

        Ok(Self {
            reader: BufReader::new(port),
        })
    }
}

#[async_trait]
impl SensorSource for SerialSensor {
    async fn read_line(&mut self) -> anyhow::Result<Option<String>> {
        let mut line = String::new();

        match self.reader.read_line(&mut line) {
            Ok(0) => Ok(None),
            Ok(_) => Ok(Some(line)),
            Err(err) if err.kind() == ErrorKind::TimedOut => Ok(None),
            Err(err) => Err(err.into()),
        }
    }
}
