//! Neutral head position calibration.
//!
//! The calibrator is a tick-granular state machine: `begin` clears previous
//! samples, each `observe` call offers one (possibly missing) pose reading
//! together with the time since `begin`. It finishes either with the mean of
//! the collected samples or, once the timeout passes, with a zero baseline
//! that still counts as calibrated so play can go on.

use crate::{pose_estimation::RawPose, stats::RunningStats, Error, Result};
use log::{debug, info, warn};
use std::time::Duration;

/// Neutral pose subtracted from every reading
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CalibrationBaseline {
    pub neutral_angle: f64,
    pub neutral_tilt: f64,
}

/// Calibrator state
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CalibrationState {
    /// Never started
    Idle,
    /// Gathering samples
    Collecting,
    /// Baseline computed from the full sample set
    Done,
    /// Timed out; the zero baseline is in use
    Failed,
}

/// Result of offering one reading to the calibrator
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CalibrationProgress {
    /// Still collecting; counts after this reading
    Collecting { collected: usize, target: usize },
    /// Target reached
    Completed(CalibrationBaseline),
    /// Timeout expired before enough samples arrived
    TimedOut { collected: usize },
    /// `observe` was called outside a calibration run
    NotRunning,
}

/// Collects neutral pose samples and derives the baseline
#[derive(Debug, Clone)]
pub struct Calibrator {
    target: usize,
    timeout: Duration,
    angles: RunningStats,
    tilts: RunningStats,
    state: CalibrationState,
    baseline: CalibrationBaseline,
}

impl Calibrator {
    /// Create a calibrator that averages `target` samples within `timeout`
    ///
    /// # Errors
    ///
    /// Returns an error if `target` is zero or `timeout` is zero
    pub fn new(target: usize, timeout: Duration) -> Result<Self> {
        if target == 0 {
            return Err(Error::CalibrationError(
                "Calibration needs at least one sample".to_string(),
            ));
        }
        if timeout.is_zero() {
            return Err(Error::CalibrationError(
                "Calibration timeout must be positive".to_string(),
            ));
        }

        Ok(Self {
            target,
            timeout,
            angles: RunningStats::new(),
            tilts: RunningStats::new(),
            state: CalibrationState::Idle,
            baseline: CalibrationBaseline::default(),
        })
    }

    /// Start (or restart) a calibration run
    pub fn begin(&mut self) {
        info!("Starting head position calibration, hold still facing the camera");
        self.angles.reset();
        self.tilts.reset();
        self.state = CalibrationState::Collecting;
    }

    /// Offer one reading; `elapsed` is the time since `begin`
    pub fn observe(&mut self, pose: Option<RawPose>, elapsed: Duration) -> CalibrationProgress {
        if self.state != CalibrationState::Collecting {
            return CalibrationProgress::NotRunning;
        }

        if elapsed > self.timeout {
            let collected = self.collected();
            warn!(
                "Calibration timed out after {:.1}s with {}/{} samples, using default baseline",
                elapsed.as_secs_f64(),
                collected,
                self.target
            );
            self.baseline = CalibrationBaseline::default();
            self.state = CalibrationState::Failed;
            return CalibrationProgress::TimedOut { collected };
        }

        let Some(pose) = pose else {
            return self.progress();
        };

        self.angles.push(pose.angle);
        self.tilts.push(pose.tilt);
        info!("Collecting calibration sample: {}/{}", self.collected(), self.target);

        if self.collected() < self.target {
            return self.progress();
        }

        if let (Some(angle), Some(tilt)) = (self.angles.summary(), self.tilts.summary()) {
            debug!(
                "Calibration spread: angle std {:.4} range {:.4}, tilt std {:.4} range {:.4}",
                angle.std_dev, angle.range, tilt.std_dev, tilt.range
            );
            self.baseline = CalibrationBaseline {
                neutral_angle: angle.mean,
                neutral_tilt: tilt.mean,
            };
        }
        self.state = CalibrationState::Done;
        info!(
            "Calibration complete: neutral angle={:.2}, neutral tilt={:.2}",
            self.baseline.neutral_angle, self.baseline.neutral_tilt
        );

        CalibrationProgress::Completed(self.baseline)
    }

    fn progress(&self) -> CalibrationProgress {
        CalibrationProgress::Collecting {
            collected: self.collected(),
            target: self.target,
        }
    }

    /// Samples gathered in the current run
    #[must_use]
    pub fn collected(&self) -> usize {
        self.angles.count()
    }

    #[must_use]
    pub fn target(&self) -> usize {
        self.target
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    #[must_use]
    pub fn state(&self) -> CalibrationState {
        self.state
    }

    /// True once a run has finished, successfully or by timeout
    #[must_use]
    pub fn is_calibrated(&self) -> bool {
        matches!(self.state, CalibrationState::Done | CalibrationState::Failed)
    }

    /// Baseline currently in effect (zero until a run completes)
    #[must_use]
    pub fn baseline(&self) -> CalibrationBaseline {
        self.baseline
    }
}
