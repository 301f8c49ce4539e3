//! Configuration management for the head racer game

use crate::{
    constants::{
        DEFAULT_SMOOTHING_ALPHA, DEFAULT_TICK_RATE, MAX_CURVATURE_LIMIT, MAX_ROAD_SEGMENTS, SMOOTHING_ALPHA_MAX,
        SMOOTHING_ALPHA_MIN,
    },
    Error, Result,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Game configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Head tracking and calibration
    pub tracking: TrackingConfig,

    /// Road generation
    pub road: RoadConfig,

    /// Car motion
    pub driving: DrivingConfig,

    /// Obstacle spawning
    pub obstacles: ObstacleConfig,

    /// Score, penalties and notifications
    pub scoring: ScoringConfig,

    /// Play-field size and status output
    pub display: DisplayConfig,

    /// Seed for road and obstacle randomness (random when absent)
    pub seed: Option<u64>,
}

/// Pose pipeline parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackingConfig {
    /// Steering gain applied to the calibrated eye-line angle
    pub angle_sensitivity: f64,

    /// Throttle gain applied to the calibrated nose depth
    pub tilt_sensitivity: f64,

    /// Exponential smoothing factor (lower = smoother, more lag)
    pub smoothing_factor: f64,

    /// Samples averaged into the neutral baseline
    pub calibration_samples: usize,

    /// Wall-clock limit for a calibration run
    pub calibration_timeout_secs: f64,

    /// Pause between calibration polls
    pub sample_interval_ms: u64,
}

/// Road ribbon parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RoadConfig {
    /// Distance between the left and right road edges
    pub road_width: f64,

    /// Vertical extent of one road segment
    pub segment_height: f64,

    /// Segments kept beyond those covering the screen
    pub extra_segments: usize,

    /// Largest curvature the random walk may target
    pub max_curvature: f64,

    /// Largest curvature change between neighbouring segments
    pub curvature_step: f64,

    /// Chance of drawing a new target curvature per generated segment
    pub retarget_probability: f64,

    /// Same chance while seeding the initial ribbon
    pub initial_retarget_probability: f64,

    /// Lateral displacement of the road centre at full curvature
    pub curve_amplitude: f64,

    /// Scroll distance per unit of speed per tick
    pub scroll_multiplier: f64,

    /// Length of a centre-line dash
    pub line_length: f64,

    /// Gap between centre-line dashes
    pub line_gap: f64,
}

/// Car motion parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DrivingConfig {
    pub max_speed: f64,
    pub min_speed: f64,

    /// Speed floor while the game is running
    pub min_running_speed: f64,

    pub acceleration: f64,
    pub deceleration: f64,
    pub friction: f64,

    /// Multiplier applied to throttle-driven speed changes
    pub throttle_gain: f64,

    /// Throttle magnitude below which neither gas nor brake applies
    pub throttle_deadzone: f64,

    /// Lateral velocity at full steering
    pub steering_sensitivity: f64,

    pub car_width: f64,
    pub car_height: f64,

    /// Distance from the bottom edge to the top of the car
    pub car_bottom_offset: f64,

    /// How far past the road edge the car may drift before being held
    pub off_road_tolerance: f64,

    /// Distance outside the road that counts as a crash
    pub severe_off_road_margin: f64,

    /// Simulation ticks per second
    pub tick_rate: u32,
}

/// Obstacle parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ObstacleConfig {
    pub width: f64,
    pub height: f64,

    /// Chance per tick of attempting a spawn
    pub spawn_probability: f64,

    /// Spawning only happens above this speed
    pub min_spawn_speed: f64,

    /// No spawn while an obstacle is closer than this to the top edge
    pub min_distance: f64,

    /// Minimum time between spawns
    pub spawn_interval_secs: f64,

    /// Spawn positions keep this distance from the road edges
    pub edge_inset: f64,

    /// Obstacles placed when a game starts
    pub initial_count: usize,

    /// Vertical spacing of the initial obstacles
    pub initial_spacing: f64,
}

/// Scoring parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub initial_score: i64,
    pub collision_penalty: i64,
    pub off_road_penalty: i64,

    /// Minimum time between two penalties
    pub collision_cooldown_secs: f64,

    /// Per-tick score is floor(speed * factor)
    pub speed_score_factor: f64,

    pub survival_bonus: i64,
    pub survival_interval_secs: f64,

    /// Awarded for each obstacle that leaves the screen untouched
    pub avoid_bonus: i64,

    /// Lifetime of a notification
    pub message_duration_secs: f64,

    /// Notifications kept at once
    pub max_messages: usize,
}

/// Play-field configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub width: u32,
    pub height: u32,

    /// Frames between status lines of the log renderer
    pub status_interval: u64,
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            angle_sensitivity: 2.0,
            tilt_sensitivity: 2.0,
            smoothing_factor: DEFAULT_SMOOTHING_ALPHA,
            calibration_samples: 30,
            calibration_timeout_secs: 10.0,
            sample_interval_ms: 100,
        }
    }
}

impl Default for RoadConfig {
    fn default() -> Self {
        Self {
            road_width: 300.0,
            segment_height: 5.0,
            extra_segments: 10,
            max_curvature: 0.3,
            curvature_step: 0.002,
            retarget_probability: 0.05,
            initial_retarget_probability: 0.1,
            curve_amplitude: 200.0,
            scroll_multiplier: 3.0,
            line_length: 30.0,
            line_gap: 30.0,
        }
    }
}

impl Default for DrivingConfig {
    fn default() -> Self {
        Self {
            max_speed: 10.0,
            min_speed: 0.0,
            min_running_speed: 1.0,
            acceleration: 0.1,
            deceleration: 0.1,
            friction: 0.01,
            throttle_gain: 3.0,
            throttle_deadzone: 0.1,
            steering_sensitivity: 5.0,
            car_width: 40.0,
            car_height: 70.0,
            car_bottom_offset: 100.0,
            off_road_tolerance: 20.0,
            severe_off_road_margin: 50.0,
            tick_rate: DEFAULT_TICK_RATE,
        }
    }
}

impl Default for ObstacleConfig {
    fn default() -> Self {
        Self {
            width: 40.0,
            height: 60.0,
            spawn_probability: 0.03,
            min_spawn_speed: 0.5,
            min_distance: 100.0,
            spawn_interval_secs: 1.0,
            edge_inset: 20.0,
            initial_count: 3,
            initial_spacing: 200.0,
        }
    }
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            initial_score: 100,
            collision_penalty: 10,
            off_road_penalty: 5,
            collision_cooldown_secs: 1.0,
            speed_score_factor: 0.01,
            survival_bonus: 5,
            survival_interval_secs: 5.0,
            avoid_bonus: 1,
            message_duration_secs: 2.0,
            max_messages: 8,
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            width: 1024,
            height: 768,
            status_interval: 60,
        }
    }
}

impl TrackingConfig {
    /// Calibration timeout as a `Duration`
    #[must_use]
    pub fn calibration_timeout(&self) -> Duration {
        Duration::from_secs_f64(self.calibration_timeout_secs.max(0.0))
    }

    /// Pause between calibration polls as a `Duration`
    #[must_use]
    pub fn sample_interval(&self) -> Duration {
        Duration::from_millis(self.sample_interval_ms)
    }
}

impl DrivingConfig {
    /// Simulated seconds per tick
    #[must_use]
    pub fn tick_seconds(&self) -> f64 {
        1.0 / f64::from(self.tick_rate.max(1))
    }
}

impl Config {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML text
    pub fn from_yaml(content: &str) -> Result<Self> {
        serde_yaml::from_str(content).map_err(|e| Error::ConfigError(format!("Failed to parse config: {e}")))
    }

    /// Save configuration to a YAML file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_yaml::to_string(self)
            .map_err(|e| Error::ConfigError(format!("Failed to serialize config: {e}")))?;

        std::fs::write(path, content)?;

        Ok(())
    }

    fn float_fields(&self) -> [(&'static str, f64); 40] {
        let (t, r, d, o, s) = (&self.tracking, &self.road, &self.driving, &self.obstacles, &self.scoring);
        [
            ("tracking.angle_sensitivity", t.angle_sensitivity),
            ("tracking.tilt_sensitivity", t.tilt_sensitivity),
            ("tracking.smoothing_factor", t.smoothing_factor),
            ("tracking.calibration_timeout_secs", t.calibration_timeout_secs),
            ("road.road_width", r.road_width),
            ("road.segment_height", r.segment_height),
            ("road.max_curvature", r.max_curvature),
            ("road.curvature_step", r.curvature_step),
            ("road.retarget_probability", r.retarget_probability),
            ("road.initial_retarget_probability", r.initial_retarget_probability),
            ("road.curve_amplitude", r.curve_amplitude),
            ("road.scroll_multiplier", r.scroll_multiplier),
            ("road.line_length", r.line_length),
            ("road.line_gap", r.line_gap),
            ("driving.max_speed", d.max_speed),
            ("driving.min_speed", d.min_speed),
            ("driving.min_running_speed", d.min_running_speed),
            ("driving.acceleration", d.acceleration),
            ("driving.deceleration", d.deceleration),
            ("driving.friction", d.friction),
            ("driving.throttle_gain", d.throttle_gain),
            ("driving.throttle_deadzone", d.throttle_deadzone),
            ("driving.steering_sensitivity", d.steering_sensitivity),
            ("driving.car_width", d.car_width),
            ("driving.car_height", d.car_height),
            ("driving.car_bottom_offset", d.car_bottom_offset),
            ("driving.off_road_tolerance", d.off_road_tolerance),
            ("driving.severe_off_road_margin", d.severe_off_road_margin),
            ("obstacles.width", o.width),
            ("obstacles.height", o.height),
            ("obstacles.spawn_probability", o.spawn_probability),
            ("obstacles.min_spawn_speed", o.min_spawn_speed),
            ("obstacles.min_distance", o.min_distance),
            ("obstacles.spawn_interval_secs", o.spawn_interval_secs),
            ("obstacles.edge_inset", o.edge_inset),
            ("obstacles.initial_spacing", o.initial_spacing),
            ("scoring.collision_cooldown_secs", s.collision_cooldown_secs),
            ("scoring.speed_score_factor", s.speed_score_factor),
            ("scoring.survival_interval_secs", s.survival_interval_secs),
            ("scoring.message_duration_secs", s.message_duration_secs),
        ]
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if let Some((name, value)) = self.float_fields().into_iter().find(|(_, v)| !v.is_finite()) {
            return Err(Error::ConfigError(format!("{name} must be finite, got {value}")));
        }

        let tracking = &self.tracking;
        if tracking.angle_sensitivity <= 0.0 || tracking.tilt_sensitivity <= 0.0 {
            return Err(Error::ConfigError("Sensitivities must be positive".to_string()));
        }
        if tracking.smoothing_factor <= SMOOTHING_ALPHA_MIN || tracking.smoothing_factor > SMOOTHING_ALPHA_MAX {
            return Err(Error::ConfigError("Smoothing factor must be in (0, 1]".to_string()));
        }
        if tracking.calibration_samples == 0 {
            return Err(Error::ConfigError(
                "Calibration sample count must be greater than 0".to_string(),
            ));
        }
        if tracking.calibration_timeout_secs <= 0.0
            || Duration::try_from_secs_f64(tracking.calibration_timeout_secs).is_err()
        {
            return Err(Error::ConfigError(
                "Calibration timeout must be a positive, representable duration".to_string(),
            ));
        }

        let driving = &self.driving;
        if driving.max_speed <= 0.0 {
            return Err(Error::ConfigError("Max speed must be positive".to_string()));
        }
        if driving.min_speed < 0.0 || driving.min_speed > driving.max_speed {
            return Err(Error::ConfigError(
                "Min speed must be between 0 and max speed".to_string(),
            ));
        }
        if driving.min_running_speed < driving.min_speed || driving.min_running_speed > driving.max_speed {
            return Err(Error::ConfigError(
                "Running speed floor must be between min and max speed".to_string(),
            ));
        }
        if driving.acceleration < 0.0
            || driving.deceleration < 0.0
            || driving.friction < 0.0
            || driving.throttle_gain < 0.0
        {
            return Err(Error::ConfigError(
                "Acceleration, deceleration, friction and throttle gain must be non-negative".to_string(),
            ));
        }
        if driving.steering_sensitivity <= 0.0 {
            return Err(Error::ConfigError("Steering sensitivity must be positive".to_string()));
        }
        if driving.car_width <= 0.0 || driving.car_height <= 0.0 {
            return Err(Error::ConfigError("Car dimensions must be positive".to_string()));
        }
        if driving.tick_rate == 0 {
            return Err(Error::ConfigError("Tick rate must be greater than 0".to_string()));
        }

        let road = &self.road;
        if road.road_width <= driving.car_width {
            return Err(Error::ConfigError("Road must be wider than the car".to_string()));
        }
        if road.segment_height <= 0.0 {
            return Err(Error::ConfigError("Segment height must be positive".to_string()));
        }
        #[allow(clippy::cast_precision_loss)]
        let (segments, max_segments) = (
            f64::from(self.display.height) / road.segment_height + road.extra_segments as f64,
            MAX_ROAD_SEGMENTS as f64,
        );
        if segments > max_segments {
            return Err(Error::ConfigError(format!(
                "Road would need {segments:.0} segments, at most {MAX_ROAD_SEGMENTS} are allowed"
            )));
        }
        if !(0.0..=MAX_CURVATURE_LIMIT).contains(&road.max_curvature) || road.curvature_step <= 0.0 {
            return Err(Error::ConfigError(format!(
                "Curvature limit must be between 0 and {MAX_CURVATURE_LIMIT} and curvature step positive"
            )));
        }
        if road.scroll_multiplier <= 0.0 {
            return Err(Error::ConfigError("Scroll multiplier must be positive".to_string()));
        }
        if road.line_length + road.line_gap <= 0.0 {
            return Err(Error::ConfigError("Centre-line period must be positive".to_string()));
        }

        let obstacles = &self.obstacles;
        if obstacles.width <= 0.0 || obstacles.height <= 0.0 {
            return Err(Error::ConfigError("Obstacle dimensions must be positive".to_string()));
        }
        if obstacles.width + 2.0 * obstacles.edge_inset > road.road_width {
            return Err(Error::ConfigError(
                "Obstacles with their edge inset must fit on the road".to_string(),
            ));
        }

        for (name, p) in [
            ("retarget_probability", road.retarget_probability),
            ("initial_retarget_probability", road.initial_retarget_probability),
            ("spawn_probability", obstacles.spawn_probability),
        ] {
            if !(0.0..=1.0).contains(&p) {
                return Err(Error::ConfigError(format!("{name} must be between 0.0 and 1.0")));
            }
        }

        let scoring = &self.scoring;
        if scoring.collision_penalty < 0 || scoring.off_road_penalty < 0 {
            return Err(Error::ConfigError("Penalties must be non-negative".to_string()));
        }
        if scoring.collision_cooldown_secs < 0.0 || scoring.message_duration_secs < 0.0 {
            return Err(Error::ConfigError("Durations must be non-negative".to_string()));
        }
        if scoring.survival_interval_secs <= 0.0 {
            return Err(Error::ConfigError("Survival interval must be positive".to_string()));
        }

        if self.display.width == 0 || self.display.height == 0 {
            return Err(Error::ConfigError("Display size must be positive".to_string()));
        }

        Ok(())
    }
}

/// Example configuration file content
pub const EXAMPLE_CONFIG: &str = r#"# Head Racer Configuration

# Pose pipeline
tracking:
  angle_sensitivity: 2.0
  tilt_sensitivity: 2.0
  smoothing_factor: 0.3
  calibration_samples: 30
  calibration_timeout_secs: 10.0
  sample_interval_ms: 100

# Road ribbon
road:
  road_width: 300.0
  segment_height: 5.0
  extra_segments: 10
  max_curvature: 0.3
  curvature_step: 0.002
  retarget_probability: 0.05
  initial_retarget_probability: 0.1
  curve_amplitude: 200.0
  scroll_multiplier: 3.0
  line_length: 30.0
  line_gap: 30.0

# Car motion
driving:
  max_speed: 10.0
  min_speed: 0.0
  min_running_speed: 1.0
  acceleration: 0.1
  deceleration: 0.1
  friction: 0.01
  throttle_gain: 3.0
  throttle_deadzone: 0.1
  steering_sensitivity: 5.0
  car_width: 40.0
  car_height: 70.0
  car_bottom_offset: 100.0
  off_road_tolerance: 20.0
  severe_off_road_margin: 50.0
  tick_rate: 60

# Obstacles
obstacles:
  width: 40.0
  height: 60.0
  spawn_probability: 0.03
  min_spawn_speed: 0.5
  min_distance: 100.0
  spawn_interval_secs: 1.0
  edge_inset: 20.0
  initial_count: 3
  initial_spacing: 200.0

# Scoring
scoring:
  initial_score: 100
  collision_penalty: 10
  off_road_penalty: 5
  collision_cooldown_secs: 1.0
  speed_score_factor: 0.01
  survival_bonus: 5
  survival_interval_secs: 5.0
  avoid_bonus: 1
  message_duration_secs: 2.0
  max_messages: 8

# Play field
display:
  width: 1024
  height: 768
  status_interval: 60
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_example_config_matches_defaults() {
        let parsed = Config::from_yaml(EXAMPLE_CONFIG).unwrap();
        let defaults = Config::default();

        assert_eq!(parsed.tracking.calibration_samples, defaults.tracking.calibration_samples);
        assert_eq!(parsed.driving.max_speed, defaults.driving.max_speed);
        assert_eq!(parsed.driving.acceleration, defaults.driving.acceleration);
        assert_eq!(parsed.road.curvature_step, defaults.road.curvature_step);
        assert_eq!(parsed.obstacles.initial_count, defaults.obstacles.initial_count);
        assert_eq!(parsed.scoring.collision_penalty, defaults.scoring.collision_penalty);
        assert_eq!(parsed.display.height, defaults.display.height);
        assert!(parsed.seed.is_none());
    }

    #[test]
    fn test_partial_yaml_keeps_other_defaults() {
        let config = Config::from_yaml("driving:\n  max_speed: 12.0\nseed: 7\n").unwrap();
        assert_eq!(config.driving.max_speed, 12.0);
        assert_eq!(config.driving.friction, 0.01);
        assert_eq!(config.tracking.smoothing_factor, 0.3);
        assert_eq!(config.seed, Some(7));
    }

    #[test]
    fn test_negative_max_speed_rejected() {
        let mut config = Config::default();
        config.driving.max_speed = -1.0;
        assert!(matches!(config.validate(), Err(Error::ConfigError(_))));
    }

    #[test]
    fn test_non_finite_values_rejected() {
        let config = Config::from_yaml("tracking:\n  calibration_timeout_secs: .inf\n").unwrap();
        assert!(matches!(config.validate(), Err(Error::ConfigError(_))));

        let config = Config::from_yaml("road:\n  max_curvature: .inf\n  initial_retarget_probability: 1.0\n").unwrap();
        assert!(matches!(config.validate(), Err(Error::ConfigError(_))));

        let mut config = Config::default();
        config.driving.friction = f64::NAN;
        assert!(config.validate().is_err());
        config.driving.friction = 0.01;
        config.obstacles.min_distance = f64::NEG_INFINITY;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_unrepresentable_timeout_rejected() {
        let mut config = Config::default();
        config.tracking.calibration_timeout_secs = 1e300;
        assert!(matches!(config.validate(), Err(Error::ConfigError(_))));
    }

    #[test]
    fn test_extreme_road_geometry_rejected() {
        let mut config = Config::default();
        config.road.segment_height = 1e-300;
        assert!(matches!(config.validate(), Err(Error::ConfigError(_))));

        let mut config = Config::default();
        config.road.extra_segments = usize::MAX;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.road.max_curvature = 1e300;
        assert!(config.validate().is_err());
        config.road.max_curvature = MAX_CURVATURE_LIMIT;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_smoothing_rejected() {
        let mut config = Config::default();
        config.tracking.smoothing_factor = 0.0;
        assert!(config.validate().is_err());
        config.tracking.smoothing_factor = 1.5;
        assert!(config.validate().is_err());
        config.tracking.smoothing_factor = 1.0;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_probability_bounds() {
        let mut config = Config::default();
        config.obstacles.spawn_probability = 1.2;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_tick_seconds() {
        let driving = DrivingConfig::default();
        assert!((driving.tick_seconds() - 1.0 / 60.0).abs() < 1e-12);
    }
}
