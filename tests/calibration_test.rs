//! Calibration state machine tests

use head_racer::{
    calibration::{CalibrationBaseline, CalibrationProgress, CalibrationState, Calibrator},
    pose_estimation::RawPose,
    Error,
};
use std::time::Duration;

#[test]
fn test_constant_stream_gives_exact_baseline() {
    let mut calibrator = Calibrator::new(30, Duration::from_secs(10)).unwrap();
    calibrator.begin();

    let mut progress = CalibrationProgress::NotRunning;
    for i in 0..30 {
        progress = calibrator.observe(Some(RawPose::new(0.2, -0.1)), Duration::from_millis(i * 100));
    }

    let expected = CalibrationBaseline {
        neutral_angle: 0.2,
        neutral_tilt: -0.1,
    };
    assert_eq!(progress, CalibrationProgress::Completed(expected));
    assert_eq!(calibrator.baseline(), expected);
    assert_eq!(calibrator.state(), CalibrationState::Done);
    assert!(calibrator.is_calibrated());
}

#[test]
fn test_timeout_defaults_to_zero_but_calibrates() {
    let mut calibrator = Calibrator::new(30, Duration::from_secs(10)).unwrap();
    calibrator.begin();
    for i in 0..10 {
        calibrator.observe(Some(RawPose::new(0.4, 0.3)), Duration::from_secs(i));
    }

    let progress = calibrator.observe(Some(RawPose::new(0.4, 0.3)), Duration::from_millis(10_001));
    assert_eq!(progress, CalibrationProgress::TimedOut { collected: 10 });
    assert_eq!(calibrator.baseline(), CalibrationBaseline::default());
    assert_eq!(calibrator.state(), CalibrationState::Failed);
    assert!(calibrator.is_calibrated());
}

#[test]
fn test_missing_faces_do_not_count() {
    let mut calibrator = Calibrator::new(3, Duration::from_secs(10)).unwrap();
    calibrator.begin();
    calibrator.observe(None, Duration::ZERO);
    calibrator.observe(Some(RawPose::new(0.1, 0.0)), Duration::ZERO);
    calibrator.observe(None, Duration::ZERO);
    assert_eq!(calibrator.collected(), 1);
    assert_eq!(calibrator.state(), CalibrationState::Collecting);
    assert!(!calibrator.is_calibrated());
}

#[test]
fn test_observe_outside_collection_is_ignored() {
    let mut calibrator = Calibrator::new(3, Duration::from_secs(1)).unwrap();
    assert_eq!(
        calibrator.observe(Some(RawPose::new(0.1, 0.1)), Duration::ZERO),
        CalibrationProgress::NotRunning
    );
    assert_eq!(calibrator.state(), CalibrationState::Idle);
}

#[test]
fn test_recalibration_starts_over() {
    let mut calibrator = Calibrator::new(2, Duration::from_secs(10)).unwrap();
    calibrator.begin();
    calibrator.observe(Some(RawPose::new(0.5, 0.5)), Duration::ZERO);
    calibrator.observe(Some(RawPose::new(0.5, 0.5)), Duration::ZERO);

    calibrator.begin();
    assert_eq!(calibrator.collected(), 0);
    calibrator.observe(Some(RawPose::new(-0.1, 0.0)), Duration::ZERO);
    calibrator.observe(Some(RawPose::new(0.1, 0.2)), Duration::ZERO);
    let baseline = calibrator.baseline();
    assert!(baseline.neutral_angle.abs() < 1e-12);
    assert!((baseline.neutral_tilt - 0.1).abs() < 1e-12);
}

#[test]
fn test_invalid_parameters() {
    assert!(matches!(
        Calibrator::new(0, Duration::from_secs(1)),
        Err(Error::CalibrationError(_))
    ));
    assert!(Calibrator::new(5, Duration::ZERO).is_err());
}
