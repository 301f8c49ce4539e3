//! Configuration loading, saving and validation

use head_racer::{
    config::{Config, EXAMPLE_CONFIG},
    Error,
};

fn temp_path(name: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!("head_racer_{}_{}.yaml", name, std::process::id()))
}

#[test]
fn test_defaults_are_valid() {
    let config = Config::default();
    assert!(config.validate().is_ok());
    assert_eq!(config.driving.max_speed, 10.0);
    assert_eq!(config.scoring.collision_cooldown_secs, 1.0);
    assert_eq!(config.tracking.calibration_samples, 30);
    assert_eq!(config.road.road_width, 300.0);
}

#[test]
fn test_example_config_parses_to_defaults() {
    let config = Config::from_yaml(EXAMPLE_CONFIG).unwrap();
    let defaults = Config::default();
    assert_eq!(config.driving.acceleration, defaults.driving.acceleration);
    assert_eq!(config.obstacles.spawn_probability, defaults.obstacles.spawn_probability);
    assert_eq!(config.scoring.survival_bonus, defaults.scoring.survival_bonus);
    assert!(config.validate().is_ok());
}

#[test]
fn test_partial_yaml_keeps_other_defaults() {
    let config = Config::from_yaml("driving:\n  max_speed: 15.0\nseed: 7\n").unwrap();
    assert_eq!(config.driving.max_speed, 15.0);
    assert_eq!(config.driving.friction, 0.01);
    assert_eq!(config.seed, Some(7));
    assert_eq!(config.display.width, 1024);
}

#[test]
fn test_file_round_trip() {
    let path = temp_path("round_trip");
    let mut config = Config::default();
    config.seed = Some(99);
    config.scoring.collision_penalty = 25;
    config.to_file(&path).unwrap();

    let loaded = Config::from_file(&path).unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(loaded.seed, Some(99));
    assert_eq!(loaded.scoring.collision_penalty, 25);
}

#[test]
fn test_missing_file_is_io_error() {
    let result = Config::from_file(temp_path("does_not_exist"));
    assert!(matches!(result, Err(Error::Io(_))));
}

#[test]
fn test_malformed_yaml_is_config_error() {
    let result = Config::from_yaml("driving: [not, a, map");
    assert!(matches!(result, Err(Error::ConfigError(_))));
}

fn rejected(mutate: impl Fn(&mut Config)) -> bool {
    let mut config = Config::default();
    mutate(&mut config);
    matches!(config.validate(), Err(Error::ConfigError(_)))
}

#[test]
fn test_validation_rejects_bad_values() {
    assert!(rejected(|c| c.driving.max_speed = -1.0));
    assert!(rejected(|c| c.driving.min_speed = 20.0));
    assert!(rejected(|c| c.tracking.smoothing_factor = 0.0));
    assert!(rejected(|c| c.tracking.smoothing_factor = 1.5));
    assert!(rejected(|c| c.tracking.calibration_samples = 0));
    assert!(rejected(|c| c.tracking.calibration_timeout_secs = 0.0));
    assert!(rejected(|c| c.driving.tick_rate = 0));
    assert!(rejected(|c| c.road.road_width = 30.0));
    assert!(rejected(|c| c.obstacles.spawn_probability = 1.5));
    assert!(rejected(|c| c.scoring.collision_penalty = -1));
    assert!(rejected(|c| c.display.height = 0));
}
