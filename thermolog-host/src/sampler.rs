use std::collections::VecDeque;

/// 20 minutes of readings at the 30 second sampling cadence.
pub const WINDOW_CAPACITY: usize = 40;

/// Bounded rolling buffer of temperature samples. Once full, recording a new
/// sample evicts the oldest one, so a stretch of failed uploads can only ever
/// cost readings older than the window.
#[derive(Debug)]
pub struct SampleWindow {
    samples: VecDeque<f64>,
    capacity: usize,
}

impl SampleWindow {
    pub fn new(capacity: usize) -> Self {
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Parse one raw sensor line and record it. Non-numeric lines are logged
    /// and skipped without touching the buffer.
    pub fn observe(&mut self, raw_line: &str) -> Option<f64> {
        let trimmed = raw_line.trim();
        if trimmed.is_empty() {
            return None;
        }

        match trimmed.parse::<f64>() {
            Ok(value) => {
                self.record(value);
                Some(value)
            }
            Err(_) => {
                tracing::warn!(line = trimmed, "discarding unparsable sensor line");
                None
            }
        }
    }

    pub fn record(&mut self, value: f64) {
        if self.samples.len() == self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(value);
    }

    pub fn mean(&self) -> Option<f64> {
        if self.samples.is_empty() {
            return None;
        }

        Some(self.samples.iter().sum::<f64>() / self.samples.len() as f64)
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

impl Default for SampleWindow {
    fn default() -> Self {
        Self::new(WINDOW_CAPACITY)
    }
}
