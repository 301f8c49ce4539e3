use super::SignalFilter;

/// Exponential smoothing filter seeded at the neutral signal
///
/// `smoothed = previous * (1 - alpha) + value * alpha`, starting from zero so
/// the first reading after a reset is already damped.
#[derive(Debug)]
pub struct ExponentialFilter {
    alpha: f64,
    last_steering: f64,
    last_throttle: f64,
}

impl ExponentialFilter {
    pub fn new(alpha: f64) -> Self {
        assert!(alpha > 0.0 && alpha <= 1.0, "Alpha must be in (0, 1]");
        Self {
            alpha,
            last_steering: 0.0,
            last_throttle: 0.0,
        }
    }

    #[must_use]
    pub fn alpha(&self) -> f64 {
        self.alpha
    }
}

impl SignalFilter for ExponentialFilter {
    fn apply(&mut self, steering: f64, throttle: f64) -> (f64, f64) {
        self.last_steering = self.last_steering * (1.0 - self.alpha) + steering * self.alpha;
        self.last_throttle = self.last_throttle * (1.0 - self.alpha) + throttle * self.alpha;

        (self.last_steering, self.last_throttle)
    }

    fn reset(&mut self) {
        self.last_steering = 0.0;
        self.last_throttle = 0.0;
    }

    fn current(&self) -> (f64, f64) {
        (self.last_steering, self.last_throttle)
    }

    fn name(&self) -> &str {
        "ExponentialFilter"
    }
}
