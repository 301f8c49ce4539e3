//! Running statistics over a stream of pose samples.
//!
//! Uses Welford's update so the mean of a constant stream is exactly that
//! constant, with no summation drift.

/// Incrementally updated mean/variance accumulator
#[derive(Debug, Clone, Copy, Default)]
pub struct RunningStats {
    count: usize,
    mean: f64,
    m2: f64,
    min: f64,
    max: f64,
}

impl RunningStats {
    /// Create an empty accumulator
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one sample
    #[allow(clippy::cast_precision_loss)]
    pub fn push(&mut self, value: f64) {
        if self.count == 0 {
            self.min = value;
            self.max = value;
        } else {
            self.min = self.min.min(value);
            self.max = self.max.max(value);
        }

        self.count += 1;
        let delta = value - self.mean;
        self.mean += delta / self.count as f64;
        self.m2 += delta * (value - self.mean);
    }

    /// Forget all samples
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Number of samples seen
    #[must_use]
    pub fn count(&self) -> usize {
        self.count
    }

    /// Summary of the samples seen so far, `None` when empty
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn summary(&self) -> Option<Statistics> {
        if self.count == 0 {
            return None;
        }

        let variance = self.m2 / self.count as f64;
        Some(Statistics {
            mean: self.mean,
            std_dev: variance.max(0.0).sqrt(),
            min: self.min,
            max: self.max,
            range: self.max - self.min,
        })
    }
}

/// Statistical summary of a sample window
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Statistics {
    /// Mean value of the data
    pub mean: f64,
    /// Population standard deviation of the data
    pub std_dev: f64,
    /// Minimum value
    pub min: f64,
    /// Maximum value
    pub max: f64,
    /// Range (max - min) of the data
    pub range: f64,
}
