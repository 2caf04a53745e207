use time::OffsetDateTime;

use crate::sampler::SampleWindow;
use crate::sensor::SensorSource;
use crate::transport::Transport;

/// One reading every 30 seconds.
pub const SAMPLE_INTERVAL: std::time::Duration = std::time::Duration::from_secs(30);

/// One averaged upload every 20 minutes.
pub const POST_INTERVAL: time::Duration = time::Duration::minutes(20);

/// Sequential sample-and-forward loop: collect raw readings into the rolling
/// window, and once per post interval upload the window mean. A failed upload
/// keeps both the window and the flush timer, so the next cycle retries with
/// the accumulated samples.
pub struct EdgeAgent<S, T> {
    sensor: S,
    transport: T,
    window: SampleWindow,
    post_interval: time::Duration,
    last_flush: OffsetDateTime,
}

impl<S: SensorSource, T: Transport> EdgeAgent<S, T> {
    pub fn new(sensor: S, transport: T, post_interval: time::Duration, started_at: OffsetDateTime) -> Self {
        Self {
            sensor,
            transport,
            window: SampleWindow::default(),
            post_interval,
            last_flush: started_at,
        }
    }

    /// One sampling cycle at time `now`: read a line, record it, and flush
    /// the window when the post interval has elapsed.
    pub async fn tick(&mut self, now: OffsetDateTime) {
        match self.sensor.read_line().await {
            Ok(Some(line)) => {
                if let Some(value) = self.window.observe(&line) {
                    tracing::debug!(value, buffered = self.window.len(), "recorded sample");
                }
            }
            Ok(None) => {}
            Err(err) => tracing::warn!("sensor read failed: {err:#}"),
        }

        if now - self.last_flush < self.post_interval {
            return;
        }
        let Some(mean) = self.window.mean() else {
            return;
        };

        match self.transport.send(mean, now).await {
            Ok(()) => {
                tracing::info!(mean, samples = self.window.len(), "posted average temperature");
                self.window.clear();
                self.last_flush = now;
            }
            Err(err) => {
                tracing::warn!(
                    buffered = self.window.len(),
                    "failed to post average, retrying next cycle: {err}"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use time::macros::datetime;

    use super::*;
    use crate::transport::TransmissionError;

    struct ScriptedSensor {
        lines: VecDeque<Option<String>>,
    }

    impl ScriptedSensor {
        fn new(lines: &[Option<&str>]) -> Self {
            Self {
                lines: lines
                    .iter()
                    .map(|line| line.map(String::from))
                    .collect(),
            }
        }
    }

    #[async_trait]
    impl SensorSource for ScriptedSensor {
        async fn read_line(&mut self) -> anyhow::Result<Option<String>> {
            Ok(self.lines.pop_front().flatten())
        }
    }

    #[derive(Default)]
    struct RecordingTransport {
        fail_next: Mutex<usize>,
        sent: Mutex<Vec<(f64, OffsetDateTime)>>,
    }

    impl RecordingTransport {
        fn failing_first(count: usize) -> Self {
            Self {
                fail_next: Mutex::new(count),
                sent: Mutex::new(Vec::new()),
            }
        }

        fn sent(&self) -> Vec<(f64, OffsetDateTime)> {
            self.sent.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Transport for &RecordingTransport {
        async fn send(
            &self,
            temperature: f64,
            timestamp: OffsetDateTime,
        ) -> Result<(), TransmissionError> {
            let mut fail_next = self.fail_next.lock().unwrap();
            if *fail_next > 0 {
                *fail_next -= 1;
                return Err(TransmissionError::Timestamp(
                    time::error::Format::InvalidComponent("year"),
                ));
            }

            self.sent.lock().unwrap().push((temperature, timestamp));
            Ok(())
        }
    }

    const START: OffsetDateTime = datetime!(2026-01-10 08:00:00 UTC);

    #[tokio::test]
    async fn test_no_upload_before_post_interval() {
        let sensor = ScriptedSensor::new(&[Some("18.0"), Some("20.0")]);
        let transport = RecordingTransport::default();
        let mut agent = EdgeAgent::new(sensor, &transport, POST_INTERVAL, START);

        agent.tick(START + time::Duration::seconds(30)).await;
        agent.tick(START + time::Duration::minutes(10)).await;

        assert!(transport.sent().is_empty());
    }

    #[tokio::test]
    async fn test_upload_sends_window_mean_and_resets() {
        let sensor = ScriptedSensor::new(&[Some("18.0"), Some("20.0"), Some("19.0"), None]);
        let transport = RecordingTransport::default();
        let mut agent = EdgeAgent::new(sensor, &transport, POST_INTERVAL, START);

        agent.tick(START + time::Duration::minutes(1)).await;
        agent.tick(START + time::Duration::minutes(2)).await;

        let flush_at = START + time::Duration::minutes(20);
        agent.tick(flush_at).await;

        assert_eq!(transport.sent(), vec![(19.0, flush_at)]);

        // The window was cleared and the timer advanced, so the very next
        // cycle has nothing to upload.
        agent.tick(flush_at + time::Duration::seconds(30)).await;
        assert_eq!(transport.sent().len(), 1);
    }

    #[tokio::test]
    async fn test_failed_upload_retries_with_accumulated_samples() {
        let sensor = ScriptedSensor::new(&[Some("18.0"), Some("20.0"), Some("22.0")]);
        let transport = RecordingTransport::failing_first(1);
        let mut agent = EdgeAgent::new(sensor, &transport, POST_INTERVAL, START);

        agent.tick(START + time::Duration::minutes(1)).await;

        // First flush attempt fails; the sample survives
        agent.tick(START + time::Duration::minutes(20)).await;
        assert!(transport.sent().is_empty());

        // Next cycle adds one more sample and retries with both
        let retry_at = START + time::Duration::minutes(20) + time::Duration::seconds(30);
        agent.tick(retry_at).await;

        assert_eq!(transport.sent(), vec![(20.0, retry_at)]);
    }

    #[tokio::test]
    async fn test_empty_window_skips_upload() {
        let sensor = ScriptedSensor::new(&[None, Some("garbage"), None]);
        let transport = RecordingTransport::default();
        let mut agent = EdgeAgent::new(sensor, &transport, POST_INTERVAL, START);

        agent.tick(START + time::Duration::minutes(1)).await;
        agent.tick(START + time::Duration::minutes(20)).await;
        agent.tick(START + time::Duration::minutes(21)).await;

        assert!(transport.sent().is_empty());
    }

    #[tokio::test]
    async fn test_unparsable_lines_do_not_skew_the_mean() {
        let sensor = ScriptedSensor::new(&[Some("18.0"), Some("ERR"), Some("20.0")]);
        let transport = RecordingTransport::default();
        let mut agent = EdgeAgent::new(sensor, &transport, POST_INTERVAL, START);

        for minute in [1, 2, 3] {
            agent.tick(START + time::Duration::minutes(minute)).await;
        }

        let flush_at = START + time::Duration::minutes(20);
        agent.tick(flush_at).await;

        assert_eq!(transport.sent(), vec![(19.0, flush_at)]);
    }
}
