//! Raw head pose (eye-line angle and nose depth) from face landmarks.

use crate::{
    constants::{LEFT_EYE_CORNER, MOUTH_LEFT, MOUTH_RIGHT, NOSE_TIP, RIGHT_EYE_CORNER},
    landmarks::LandmarkSet,
};

/// Uncalibrated head pose for one frame
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RawPose {
    /// Eye-line angle in radians (positive when the right eye sits lower)
    pub angle: f64,
    /// Nose-tip depth; negative is closer to the camera
    pub tilt: f64,
}

impl RawPose {
    #[must_use]
    pub fn new(angle: f64, tilt: f64) -> Self {
        Self { angle, tilt }
    }
}

/// Converts face landmarks into a steering angle and lean proxy
#[derive(Debug, Clone, Copy, Default)]
pub struct HeadPoseEstimator;

impl HeadPoseEstimator {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Estimate the raw pose, or `None` when no face (or an incomplete one) is
    /// available this tick
    #[must_use]
    pub fn estimate(&self, landmarks: Option<&LandmarkSet>) -> Option<RawPose> {
        let landmarks = landmarks?;

        let nose_tip = landmarks.get(NOSE_TIP)?;
        let left_eye = landmarks.get(LEFT_EYE_CORNER)?;
        let right_eye = landmarks.get(RIGHT_EYE_CORNER)?;
        // Mouth corners are part of the minimum topology even though the
        // current proxies do not read them.
        landmarks.get(MOUTH_LEFT)?;
        landmarks.get(MOUTH_RIGHT)?;

        let dx = right_eye.x - left_eye.x;
        let dy = right_eye.y - left_eye.y;
        let angle = dy.atan2(dx);

        let pose = RawPose::new(angle, nose_tip.z);
        if pose.angle.is_finite() && pose.tilt.is_finite() {
            Some(pose)
        } else {
            None
        }
    }
}
