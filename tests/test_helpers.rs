//! Helper functions and utilities for tests

#![allow(dead_code)]

use head_racer::{
    config::Config,
    simulator::{DrivingSimulator, TickReport},
};

/// Seeded configuration with a straight road and no random obstacles
pub fn quiet_config() -> Config {
    let mut config = Config::default();
    config.seed = Some(42);
    config.obstacles.initial_count = 0;
    config.obstacles.spawn_probability = 0.0;
    config.road.retarget_probability = 0.0;
    config.road.initial_retarget_probability = 0.0;
    config.tracking.sample_interval_ms = 0;
    config
}

/// Simulator built from `quiet_config`
pub fn quiet_simulator() -> DrivingSimulator {
    DrivingSimulator::new(&quiet_config()).unwrap()
}

/// Put an obstacle right on top of the car
pub fn place_obstacle_on_car(sim: &mut DrivingSimulator) {
    let car = *sim.car();
    sim.place_obstacle(car.x, car.y);
}

/// Run `ticks` updates with a constant input, returning the reports
pub fn drive(sim: &mut DrivingSimulator, ticks: usize, steering: f64, throttle: f64) -> Vec<TickReport> {
    (0..ticks).map(|_| sim.update(steering, throttle)).collect()
}
