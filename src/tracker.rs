//! Pose pipeline: landmarks in, smoothed steering/throttle out.

use crate::{
    calibration::{CalibrationBaseline, CalibrationProgress, Calibrator},
    config::{Config, TrackingConfig},
    constants::SIGNAL_LIMIT,
    filters::{create_filter, SignalFilter},
    landmarks::{LandmarkSet, LandmarkSource},
    pose_estimation::{HeadPoseEstimator, RawPose},
    Result,
};
use log::{info, warn};
use serde::Serialize;
use std::time::{Duration, Instant};

/// Calibrated, bounded control output handed to the simulator
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct ControlSignal {
    /// Left (negative) to right (positive), in `[-1, 1]`
    pub steering: f64,
    /// Negative leans away from the camera (accelerate), positive leans in (brake)
    pub throttle: f64,
}

impl ControlSignal {
    /// Centered wheel, no throttle
    pub const NEUTRAL: Self = Self {
        steering: 0.0,
        throttle: 0.0,
    };

    #[must_use]
    pub fn new(steering: f64, throttle: f64) -> Self {
        Self { steering, throttle }
    }
}

/// Stateful head tracker producing control signals
pub struct HeadTracker {
    estimator: HeadPoseEstimator,
    calibrator: Calibrator,
    filter: Box<dyn SignalFilter>,
    angle_sensitivity: f64,
    tilt_sensitivity: f64,
    sample_interval: Duration,
    face_present: bool,
    last_raw: Option<RawPose>,
    last_signal: ControlSignal,
}

impl HeadTracker {
    /// Create a tracker from the tracking section of a validated config
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid
    pub fn new(config: &Config) -> Result<Self> {
        config.validate()?;
        Self::from_tracking(&config.tracking)
    }

    fn from_tracking(tracking: &TrackingConfig) -> Result<Self> {
        let calibrator = Calibrator::new(tracking.calibration_samples, tracking.calibration_timeout())?;

        Ok(Self {
            estimator: HeadPoseEstimator::new(),
            calibrator,
            filter: create_filter(tracking.smoothing_factor),
            angle_sensitivity: tracking.angle_sensitivity,
            tilt_sensitivity: tracking.tilt_sensitivity,
            sample_interval: tracking.sample_interval(),
            face_present: false,
            last_raw: None,
            last_signal: ControlSignal::NEUTRAL,
        })
    }

    /// Process one frame of landmarks and return the control signal
    ///
    /// Without a usable face the signal is neutral immediately and the
    /// smoothing history is left untouched.
    pub fn update(&mut self, landmarks: Option<&LandmarkSet>) -> ControlSignal {
        let raw = self.estimator.estimate(landmarks);
        self.note_face(raw.is_some());
        self.last_raw = raw;

        let Some(raw) = raw else {
            self.last_signal = ControlSignal::NEUTRAL;
            return self.last_signal;
        };

        let baseline = self.calibrator.baseline();
        let steering = Self::shape(raw.angle - baseline.neutral_angle, self.angle_sensitivity);
        let throttle = Self::shape(raw.tilt - baseline.neutral_tilt, self.tilt_sensitivity);

        let (steering, throttle) = self.filter.apply(steering, throttle);
        self.last_signal = ControlSignal::new(steering, throttle);
        self.last_signal
    }

    fn shape(offset: f64, sensitivity: f64) -> f64 {
        (offset * sensitivity).clamp(-SIGNAL_LIMIT, SIGNAL_LIMIT)
    }

    fn note_face(&mut self, present: bool) {
        if present != self.face_present {
            if present {
                info!("Face detected");
            } else {
                warn!("No face detected");
            }
            self.face_present = present;
        }
    }

    /// Signal produced by the latest `update`
    #[must_use]
    pub fn control_signal(&self) -> ControlSignal {
        self.last_signal
    }

    /// Raw pose from the latest `update`, if a face was present
    #[must_use]
    pub fn last_raw_pose(&self) -> Option<RawPose> {
        self.last_raw
    }

    #[must_use]
    pub fn face_present(&self) -> bool {
        self.face_present
    }

    /// Enter the collecting state and clear the smoothing history
    pub fn begin_calibration(&mut self) {
        self.filter.reset();
        self.last_signal = ControlSignal::NEUTRAL;
        self.calibrator.begin();
    }

    /// Feed one frame to a running calibration
    pub fn observe_calibration(&mut self, landmarks: Option<&LandmarkSet>, elapsed: Duration) -> CalibrationProgress {
        let raw = self.estimator.estimate(landmarks);
        self.note_face(raw.is_some());
        self.last_raw = raw;
        self.calibrator.observe(raw, elapsed)
    }

    /// Run a full calibration, polling `source` until the sample target is
    /// reached or the timeout expires. Returns whether enough samples were
    /// collected; either way the tracker is calibrated afterwards.
    ///
    /// The sample interval is only waited out after a frame that yielded a
    /// sample; frames without a face are retried immediately.
    pub fn calibrate<S: LandmarkSource + ?Sized>(&mut self, source: &mut S) -> bool {
        self.begin_calibration();
        let start = Instant::now();
        let mut last_collected = 0;

        loop {
            let frame = source.poll();
            match self.observe_calibration(frame.as_ref(), start.elapsed()) {
                CalibrationProgress::Completed(_) => return true,
                CalibrationProgress::TimedOut { .. } | CalibrationProgress::NotRunning => return false,
                CalibrationProgress::Collecting { collected, .. } => {
                    if collected > last_collected && !self.sample_interval.is_zero() {
                        std::thread::sleep(self.sample_interval);
                    }
                    last_collected = collected;
                }
            }
        }
    }

    #[must_use]
    pub fn is_calibrated(&self) -> bool {
        self.calibrator.is_calibrated()
    }

    #[must_use]
    pub fn baseline(&self) -> CalibrationBaseline {
        self.calibrator.baseline()
    }

    #[must_use]
    pub fn calibrator(&self) -> &Calibrator {
        &self.calibrator
    }
}
