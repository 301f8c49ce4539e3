//! Signal filtering for the steering/throttle pair.
//!
//! Filters smooth calibrated, clamped pose readings before they reach the
//! simulator.

/// Exponential filter for responsive smoothing
pub mod exponential;

/// Trait for control signal filters
pub trait SignalFilter: Send + Sync {
    /// Apply filter to input values
    fn apply(&mut self, steering: f64, throttle: f64) -> (f64, f64);

    /// Reset filter state
    fn reset(&mut self);

    /// Most recent output without feeding a new sample
    fn current(&self) -> (f64, f64);

    /// Get filter name
    fn name(&self) -> &str;
}

/// No-op filter that passes through values unchanged
#[derive(Debug, Default)]
pub struct NoFilter {
    last: (f64, f64),
}

impl SignalFilter for NoFilter {
    fn apply(&mut self, steering: f64, throttle: f64) -> (f64, f64) {
        self.last = (steering, throttle);
        self.last
    }

    fn reset(&mut self) {
        self.last = (0.0, 0.0);
    }

    fn current(&self) -> (f64, f64) {
        self.last
    }

    fn name(&self) -> &str {
        "NoFilter"
    }
}

/// Create the smoothing filter for a given factor; a factor of 1 disables smoothing
pub fn create_filter(smoothing_factor: f64) -> Box<dyn SignalFilter> {
    if (smoothing_factor - 1.0).abs() < crate::constants::EPSILON {
        Box::new(NoFilter::default())
    } else {
        Box::new(exponential::ExponentialFilter::new(smoothing_factor))
    }
}
