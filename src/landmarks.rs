//! Facial landmark sets and the sources that supply them.
//!
//! Landmarks follow the face-mesh topology: normalized image coordinates in
//! `[0, 1]` for `x`/`y` and a relative depth `z` (negative is closer to the
//! camera). A source yields at most one set per tick, or `None` when no face
//! is visible.

use crate::{
    constants::{
        LEFT_EYE_CORNER, MOUTH_LEFT, MOUTH_RIGHT, NOSE_TIP, NUM_FACE_MESH_LANDMARKS, REQUIRED_LANDMARKS,
        RIGHT_EYE_CORNER,
    },
    Error, Result,
};
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::collections::VecDeque;
use std::f64::consts::TAU;

/// Single normalized landmark
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Landmark {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Landmark {
    #[must_use]
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

/// One frame of face landmarks, indexed by face-mesh topology
#[derive(Debug, Clone, PartialEq)]
pub struct LandmarkSet {
    points: Vec<Landmark>,
}

impl LandmarkSet {
    /// Wrap a landmark vector
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The set is too short to contain every required index
    /// - A required landmark has a non-finite coordinate
    pub fn new(points: Vec<Landmark>) -> Result<Self> {
        for index in REQUIRED_LANDMARKS {
            let point = points.get(index).ok_or_else(|| {
                Error::LandmarkError(format!(
                    "Landmark {index} missing from a set of {} points",
                    points.len()
                ))
            })?;
            if !point.is_finite() {
                return Err(Error::LandmarkError(format!("Landmark {index} is not finite")));
            }
        }

        Ok(Self { points })
    }

    /// Landmark at a face-mesh index
    #[must_use]
    pub fn get(&self, index: usize) -> Option<Landmark> {
        self.points.get(index).copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Build a face whose eye line is rotated by `angle` radians and whose
    /// nose tip sits at depth `tilt`.
    #[must_use]
    pub fn synthetic(angle: f64, tilt: f64) -> Self {
        let mut points = vec![Landmark::new(0.5, 0.5, 0.0); NUM_FACE_MESH_LANDMARKS];

        let (eye_cx, eye_cy, half_span) = (0.5, 0.4, 0.1);
        let (dx, dy) = (half_span * angle.cos(), half_span * angle.sin());
        points[LEFT_EYE_CORNER] = Landmark::new(eye_cx - dx, eye_cy - dy, 0.0);
        points[RIGHT_EYE_CORNER] = Landmark::new(eye_cx + dx, eye_cy + dy, 0.0);
        points[NOSE_TIP] = Landmark::new(0.5, 0.5, tilt);
        points[MOUTH_LEFT] = Landmark::new(0.45, 0.65, 0.0);
        points[MOUTH_RIGHT] = Landmark::new(0.55, 0.65, 0.0);

        Self { points }
    }
}

/// Anything that yields one landmark set (or no face) per tick
pub trait LandmarkSource {
    /// Fetch the landmarks for the current tick
    fn poll(&mut self) -> Option<LandmarkSet>;
}

/// Replays a fixed list of frames, then reports no face
#[derive(Debug, Clone, Default)]
pub struct ScriptedSource {
    frames: VecDeque<Option<LandmarkSet>>,
}

impl ScriptedSource {
    pub fn new<I>(frames: I) -> Self
    where
        I: IntoIterator<Item = Option<LandmarkSet>>,
    {
        Self {
            frames: frames.into_iter().collect(),
        }
    }

    /// Script built from `(angle, tilt)` poses; `None` entries are face-loss frames
    pub fn from_poses<I>(poses: I) -> Self
    where
        I: IntoIterator<Item = Option<(f64, f64)>>,
    {
        Self::new(
            poses
                .into_iter()
                .map(|pose| pose.map(|(angle, tilt)| LandmarkSet::synthetic(angle, tilt))),
        )
    }

    /// Frames not yet replayed
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.frames.len()
    }
}

impl LandmarkSource for ScriptedSource {
    fn poll(&mut self) -> Option<LandmarkSet> {
        self.frames.pop_front().flatten()
    }
}

/// Generates a gently swaying head, used when no camera is attached
#[derive(Debug, Clone)]
pub struct SyntheticSource {
    rng: StdRng,
    frame: u64,
    frame_rate: f64,
    steer_amplitude: f64,
    steer_period_secs: f64,
    lean_amplitude: f64,
    lean_period_secs: f64,
    noise: f64,
    face_drop_probability: f64,
}

impl SyntheticSource {
    #[must_use]
    pub fn new(seed: u64, frame_rate: u32) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            frame: 0,
            frame_rate: f64::from(frame_rate.max(1)),
            steer_amplitude: 0.25,
            steer_period_secs: 7.0,
            lean_amplitude: 0.3,
            lean_period_secs: 11.0,
            noise: 0.01,
            face_drop_probability: 0.0,
        }
    }

    /// Chance that a frame reports no face
    #[must_use]
    pub fn with_face_drop(mut self, probability: f64) -> Self {
        self.face_drop_probability = probability.clamp(0.0, 1.0);
        self
    }

    /// Amplitude of the simulated measurement noise
    #[must_use]
    pub fn with_noise(mut self, noise: f64) -> Self {
        self.noise = noise.abs();
        self
    }

    /// Steering sway amplitude (radians) and period
    #[must_use]
    pub fn with_steering(mut self, amplitude: f64, period_secs: f64) -> Self {
        self.steer_amplitude = amplitude;
        self.steer_period_secs = period_secs.max(f64::EPSILON);
        self
    }

    /// Forward/backward lean amplitude (depth units) and period
    #[must_use]
    pub fn with_lean(mut self, amplitude: f64, period_secs: f64) -> Self {
        self.lean_amplitude = amplitude;
        self.lean_period_secs = period_secs.max(f64::EPSILON);
        self
    }

    #[allow(clippy::cast_precision_loss)]
    fn sample_pose(&mut self) -> (f64, f64) {
        let t = self.frame as f64 / self.frame_rate;
        let angle = self.steer_amplitude * (TAU * t / self.steer_period_secs).sin() + self.jitter();
        let tilt = self.lean_amplitude * (TAU * t / self.lean_period_secs).sin() + self.jitter();
        (angle, tilt)
    }

    fn jitter(&mut self) -> f64 {
        if self.noise > 0.0 {
            self.rng.gen_range(-self.noise..=self.noise)
        } else {
            0.0
        }
    }
}

impl LandmarkSource for SyntheticSource {
    fn poll(&mut self) -> Option<LandmarkSet> {
        let (angle, tilt) = self.sample_pose();
        self.frame += 1;

        if self.face_drop_probability > 0.0 && self.rng.gen_bool(self.face_drop_probability) {
            return None;
        }

        Some(LandmarkSet::synthetic(angle, tilt))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_short_set() {
        let points = vec![Landmark::default(); 100];
        assert!(matches!(LandmarkSet::new(points), Err(Error::LandmarkError(_))));
    }

    #[test]
    fn test_new_rejects_non_finite_required_point() {
        let mut points = vec![Landmark::default(); NUM_FACE_MESH_LANDMARKS];
        points[NOSE_TIP].z = f64::NAN;
        assert!(LandmarkSet::new(points).is_err());
    }

    #[test]
    fn test_new_accepts_full_mesh() {
        let points = vec![Landmark::new(0.5, 0.5, 0.0); NUM_FACE_MESH_LANDMARKS];
        let set = LandmarkSet::new(points).unwrap();
        assert_eq!(set.len(), NUM_FACE_MESH_LANDMARKS);
        assert!(!set.is_empty());
        assert!(set.get(NUM_FACE_MESH_LANDMARKS).is_none());
    }

    #[test]
    fn test_synthetic_places_key_points() {
        let set = LandmarkSet::synthetic(0.0, -0.05);
        let left = set.get(LEFT_EYE_CORNER).unwrap();
        let right = set.get(RIGHT_EYE_CORNER).unwrap();
        assert!(right.x > left.x);
        assert_eq!(left.y, right.y);
        assert_eq!(set.get(NOSE_TIP).unwrap().z, -0.05);
    }

    #[test]
    fn test_scripted_source_replays_then_empties() {
        let mut source = ScriptedSource::from_poses(vec![Some((0.1, 0.0)), None, Some((0.2, 0.0))]);
        assert_eq!(source.remaining(), 3);
        assert!(source.poll().is_some());
        assert!(source.poll().is_none());
        assert!(source.poll().is_some());
        assert!(source.poll().is_none());
        assert_eq!(source.remaining(), 0);
    }

    #[test]
    fn test_synthetic_source_is_deterministic() {
        let mut a = SyntheticSource::new(42, 60).with_face_drop(0.2);
        let mut b = SyntheticSource::new(42, 60).with_face_drop(0.2);
        for _ in 0..50 {
            assert_eq!(a.poll(), b.poll());
        }
    }

    #[test]
    fn test_synthetic_source_face_drop_extremes() {
        let mut always = SyntheticSource::new(1, 60).with_face_drop(1.0);
        assert!((0..20).all(|_| always.poll().is_none()));

        let mut never = SyntheticSource::new(1, 60);
        assert!((0..20).all(|_| never.poll().is_some()));
    }
}
