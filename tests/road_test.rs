//! Road generator behaviour over long drives

use head_racer::{config::Config, road::RoadGenerator};
use rand::{rngs::StdRng, SeedableRng};

fn road(config: &Config, seed: u64) -> (RoadGenerator, StdRng) {
    let mut rng = StdRng::seed_from_u64(seed);
    (RoadGenerator::new(config, &mut rng), rng)
}

#[test]
fn test_curvature_stays_bounded_over_long_drive() {
    let config = Config::default();
    let (mut road, mut rng) = road(&config, 12);
    let mut max_seen: f64 = 0.0;
    for _ in 0..5_000 {
        road.scroll(30.0, &mut rng);
        max_seen = max_seen.max(road.curvature().abs());
        assert!(road.curvature().abs() <= config.road.max_curvature + 1e-12);
        assert!(road.target_curvature().abs() <= config.road.max_curvature + 1e-12);
    }
    assert!(max_seen > 0.0, "road never curved");
}

#[test]
fn test_straight_road_without_retargeting() {
    let mut config = Config::default();
    config.road.retarget_probability = 0.0;
    config.road.initial_retarget_probability = 0.0;
    let (mut road, mut rng) = road(&config, 1);
    road.scroll(250.0, &mut rng);
    for segment in road.segments() {
        assert_eq!(segment.curvature, 0.0);
        let bounds = road.bounds_at(segment.y);
        assert_eq!(bounds.left, 362.0);
        assert_eq!(bounds.right, 662.0);
    }
}

#[test]
fn test_road_width_is_constant() {
    let (mut road, mut rng) = road(&Config::default(), 4);
    for step in 0..100 {
        road.scroll(f64::from(step % 7) + 0.5, &mut rng);
        for y in [0.0, 100.0, 384.0, 668.0, 767.0] {
            assert!((road.bounds_at(y).width() - 300.0).abs() < 1e-9);
        }
    }
}

#[test]
fn test_dashes_wrap_after_one_period() {
    let (mut road, mut rng) = road(&Config::default(), 8);
    road.scroll(25.0, &mut rng);
    assert_eq!(road.line_offset(), 25.0);
    road.scroll(30.0, &mut rng);
    assert_eq!(road.line_offset(), 55.0);
    road.scroll(10.0, &mut rng);
    assert_eq!(road.line_offset(), 0.0);
}

#[test]
fn test_segments_cover_screen_after_scrolling() {
    let config = Config::default();
    let (mut road, mut rng) = road(&config, 30);
    for _ in 0..300 {
        road.scroll(17.0, &mut rng);
        let top = road.segments().next().unwrap().y;
        let bottom = road.segments().last().unwrap().y;
        assert!(top <= 0.0);
        assert!(bottom >= 768.0 - config.road.segment_height);
    }
}
