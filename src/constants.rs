//! Constants used throughout the application

/// Number of points in the base face-mesh topology
pub const NUM_FACE_MESH_LANDMARKS: usize = 468;

/// Face-mesh index of the nose tip
pub const NOSE_TIP: usize = 4;

/// Face-mesh index of the outer corner of the left eye
pub const LEFT_EYE_CORNER: usize = 33;

/// Face-mesh index of the outer corner of the right eye
pub const RIGHT_EYE_CORNER: usize = 263;

/// Face-mesh index of the left mouth corner
pub const MOUTH_LEFT: usize = 61;

/// Face-mesh index of the right mouth corner
pub const MOUTH_RIGHT: usize = 291;

/// Landmarks the pose estimator cannot work without
pub const REQUIRED_LANDMARKS: [usize; 5] = [NOSE_TIP, LEFT_EYE_CORNER, RIGHT_EYE_CORNER, MOUTH_LEFT, MOUTH_RIGHT];

/// Control signals are clamped to this magnitude
pub const SIGNAL_LIMIT: f64 = 1.0;

/// Default tick rate of the driver loop
pub const DEFAULT_TICK_RATE: u32 = 60;

/// Default exponential smoothing factor
pub const DEFAULT_SMOOTHING_ALPHA: f64 = 0.3;

/// Exponential filter bounds
pub const SMOOTHING_ALPHA_MIN: f64 = 0.0;
pub const SMOOTHING_ALPHA_MAX: f64 = 1.0;

/// Displayed speed is the simulator speed times this factor (km/h)
pub const SPEED_DISPLAY_FACTOR: f64 = 10.0;

/// Numeric precision epsilon
pub const EPSILON: f64 = 1e-10;

/// Severe off-road deducts this many off-road penalties on top of the collision penalty
pub const SEVERE_OFF_ROAD_MULTIPLIER: i64 = 2;

/// Upper bound on the road curvature limit
pub const MAX_CURVATURE_LIMIT: f64 = 10.0;

/// Upper bound on the number of road segments covering the screen
pub const MAX_ROAD_SEGMENTS: usize = 100_000;
