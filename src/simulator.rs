//! Driving simulation: speed, scrolling, steering, obstacles, penalties and
//! score, advanced one fixed tick at a time.
//!
//! Simulation time is `ticks / tick_rate`; every timer (penalty cooldown,
//! spawn spacing, survival bonus, message expiry) runs on it, so a run is
//! fully determined by its seed and its input sequence. Per-tick updates
//! never fail: missing road data falls back to a straight centered road and
//! the only terminal transition is game over.

use crate::{
    config::Config,
    constants::SEVERE_OFF_ROAD_MULTIPLIER,
    messages::MessageLog,
    road::{RoadBounds, RoadGenerator, RoadSegment},
    tracker::ControlSignal,
    utils::{
        safe_cast::{f64_floor_to_i64_saturating, ticks_to_seconds},
        Rect,
    },
    Result,
};
use log::{debug, info};
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::Serialize;

/// Simulator run state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RunState {
    Running,
    /// Updates are skipped until resumed
    Paused,
    /// Terminal; nothing changes any more
    GameOver,
}

/// Player car
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CarState {
    /// Left edge
    pub x: f64,
    /// Top edge (fixed)
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub lateral_velocity: f64,
}

impl CarState {
    #[must_use]
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}

/// Obstacle, positioned by its top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Obstacle {
    pub x: f64,
    pub y: f64,
}

/// Score and progress of the running game
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SessionState {
    pub score: i64,
    pub speed: f64,
    /// Total scroll distance
    pub distance: f64,
    /// Simulated seconds of play
    pub elapsed_time: f64,
    /// Seconds until another penalty may apply
    pub collision_cooldown: f64,
    pub game_over: bool,
}

/// Something noteworthy that happened during a tick
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum GameEvent {
    /// Throttle moved into the accelerate zone
    Accelerating,
    /// Throttle moved into the brake zone
    Braking,
    /// Off-road penalty deducted
    OffRoad { penalty: i64 },
    /// Car far outside the road; counted as a crash
    SevereOffRoad { penalty: i64 },
    /// Car touched an obstacle (removed from play)
    ObstacleHit,
    /// Collision penalty deducted
    Collided { penalty: i64 },
    ObstacleSpawned { x: f64 },
    /// Obstacle left the screen untouched
    ObstacleAvoided { bonus: i64 },
    SurvivalBonus { points: i64 },
    GameOver { final_score: i64 },
}

/// Outcome of one `update` call
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TickReport {
    /// Whether the world advanced this tick
    pub advanced: bool,
    pub state: RunState,
    pub events: Vec<GameEvent>,
}

impl TickReport {
    fn skipped(state: RunState) -> Self {
        Self {
            advanced: false,
            state,
            events: Vec::new(),
        }
    }

    /// True if any event matches the predicate
    pub fn has(&self, predicate: impl Fn(&GameEvent) -> bool) -> bool {
        self.events.iter().any(predicate)
    }
}

/// Snapshot handed to a renderer once per frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderState {
    pub state: RunState,
    /// Ordered by ascending `y`
    pub segments: Vec<RoadSegment>,
    pub obstacles: Vec<Obstacle>,
    pub obstacle_size: (f64, f64),
    pub car: CarState,
    pub session: SessionState,
    pub curvature: f64,
    pub road_width: f64,
    pub segment_height: f64,
    pub line_offset: f64,
    pub messages: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pedal {
    Coasting,
    Accelerating,
    Braking,
}

/// Owns the world and advances it one tick per `update`
#[derive(Debug, Clone)]
pub struct DrivingSimulator {
    config: Config,
    rng: StdRng,
    road: RoadGenerator,
    obstacles: Vec<Obstacle>,
    car: CarState,
    session: SessionState,
    state: RunState,
    ticks: u64,
    last_penalty_at: Option<f64>,
    last_spawn_at: f64,
    last_bonus_at: f64,
    pedal: Pedal,
    messages: MessageLog,
}

impl DrivingSimulator {
    /// Create a simulator, failing fast on invalid configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration does not validate
    pub fn new(config: &Config) -> Result<Self> {
        config.validate()?;

        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let road = RoadGenerator::new(config, &mut rng);

        let driving = &config.driving;
        let car = CarState {
            x: f64::from(config.display.width) / 2.0,
            y: f64::from(config.display.height) - driving.car_bottom_offset,
            width: driving.car_width,
            height: driving.car_height,
            lateral_velocity: 0.0,
        };

        let session = SessionState {
            score: config.scoring.initial_score,
            speed: driving.min_speed,
            distance: 0.0,
            elapsed_time: 0.0,
            collision_cooldown: 0.0,
            game_over: false,
        };

        let mut simulator = Self {
            config: config.clone(),
            rng,
            road,
            obstacles: Vec::new(),
            car,
            session,
            state: RunState::Running,
            ticks: 0,
            last_penalty_at: None,
            last_spawn_at: 0.0,
            last_bonus_at: 0.0,
            pedal: Pedal::Coasting,
            messages: MessageLog::new(config.scoring.message_duration_secs, config.scoring.max_messages),
        };
        simulator.spawn_initial_obstacles();

        info!(
            "Driving simulator ready: {}x{} field, {} road segments, {} obstacles",
            config.display.width,
            config.display.height,
            simulator.road.segment_count(),
            simulator.obstacles.len()
        );

        Ok(simulator)
    }

    fn spawn_initial_obstacles(&mut self) {
        let spacing = self.config.obstacles.initial_spacing;
        for i in 0..self.config.obstacles.initial_count {
            #[allow(clippy::cast_precision_loss)]
            let y = i as f64 * spacing;
            let x = self.random_obstacle_x(self.road.bounds_at(y));
            self.obstacles.push(Obstacle { x, y });
        }
    }

    fn random_obstacle_x(&mut self, bounds: RoadBounds) -> f64 {
        let obstacles = &self.config.obstacles;
        let low = bounds.left + obstacles.edge_inset;
        let high = bounds.right - obstacles.width - obstacles.edge_inset;
        if high > low {
            self.rng.gen_range(low..=high)
        } else {
            low
        }
    }

    /// Advance one tick with the given control signal
    pub fn update_signal(&mut self, signal: ControlSignal) -> TickReport {
        self.update(signal.steering, signal.throttle)
    }

    /// Advance one tick. Does nothing while paused or after game over.
    pub fn update(&mut self, steering: f64, throttle: f64) -> TickReport {
        if self.state != RunState::Running {
            return TickReport::skipped(self.state);
        }

        let steering = if steering.is_finite() { steering } else { 0.0 };
        let throttle = if throttle.is_finite() { throttle } else { 0.0 };

        self.ticks += 1;
        let now = ticks_to_seconds(self.ticks, self.config.driving.tick_rate);
        self.session.elapsed_time = now;

        let mut events = Vec::new();

        self.update_speed(throttle, now, &mut events);
        self.advance_world(&mut events, now);
        self.steer(steering);
        self.check_off_road(now, &mut events);
        self.maybe_spawn_obstacle(now, &mut events);

        if self.detect_collision(now, &mut events) && self.cooldown_elapsed(now) {
            let penalty = self.config.scoring.collision_penalty;
            self.apply_penalty(penalty, now);
            self.messages.push(format!("Collision! -{penalty} points"), now);
            info!("Collision! -{} points, current score: {}", penalty, self.session.score);
            events.push(GameEvent::Collided { penalty });
        }

        if self.session.score <= 0 {
            self.session.score = 0;
            self.session.game_over = true;
            self.state = RunState::GameOver;
            self.messages.push("Game Over: Score is 0", now);
            info!("Game over after {:.1}s, distance {:.0}", now, self.session.distance);
            events.push(GameEvent::GameOver { final_score: 0 });
        } else {
            self.accrue_score(now, &mut events);
        }

        self.session.collision_cooldown = self.cooldown_remaining(now);
        self.messages.prune(now);

        TickReport {
            advanced: true,
            state: self.state,
            events,
        }
    }

    fn update_speed(&mut self, throttle: f64, now: f64, events: &mut Vec<GameEvent>) {
        let driving = &self.config.driving;
        let previous = self.pedal;

        let mut speed = self.session.speed;
        if throttle < -driving.throttle_deadzone {
            speed += driving.acceleration * (-throttle) * driving.throttle_gain;
            self.pedal = Pedal::Accelerating;
        } else if throttle > driving.throttle_deadzone {
            speed -= driving.deceleration * throttle * driving.throttle_gain;
            self.pedal = Pedal::Braking;
        } else {
            speed = (speed - driving.friction).max(driving.min_speed);
            self.pedal = Pedal::Coasting;
        }

        speed = speed.clamp(driving.min_speed, driving.max_speed);
        if speed < driving.min_running_speed {
            speed = driving.min_running_speed;
        }
        self.session.speed = speed;

        if self.pedal != previous {
            match self.pedal {
                Pedal::Accelerating => {
                    self.messages.push("Accelerating...", now);
                    events.push(GameEvent::Accelerating);
                }
                Pedal::Braking => {
                    self.messages.push("Braking...", now);
                    events.push(GameEvent::Braking);
                }
                Pedal::Coasting => {}
            }
        }
    }

    /// Scroll road and obstacles; obstacles leaving the bottom score a bonus
    fn advance_world(&mut self, events: &mut Vec<GameEvent>, now: f64) {
        let speed = self.session.speed;
        if speed <= 0.0 {
            return;
        }

        let advance = speed * self.config.road.scroll_multiplier;
        self.road.scroll(advance, &mut self.rng);
        self.session.distance += advance;

        let bottom = f64::from(self.config.display.height);
        let bonus = self.config.scoring.avoid_bonus;
        let before = self.obstacles.len();
        for obstacle in &mut self.obstacles {
            obstacle.y += advance;
        }
        self.obstacles.retain(|o| o.y < bottom);

        for _ in self.obstacles.len()..before {
            self.session.score += bonus;
            self.messages.push(format!("Avoided obstacle +{bonus} point"), now);
            events.push(GameEvent::ObstacleAvoided { bonus });
        }
    }

    fn steer(&mut self, steering: f64) {
        self.car.lateral_velocity = steering * self.config.driving.steering_sensitivity;
        self.car.x += self.car.lateral_velocity;
    }

    fn check_off_road(&mut self, now: f64, events: &mut Vec<GameEvent>) {
        let bounds = self.road.bounds_at(self.car.y);

        if (self.car.x < bounds.left || self.car.x + self.car.width > bounds.right) && self.cooldown_elapsed(now) {
            let penalty = self.config.scoring.off_road_penalty;
            self.apply_penalty(penalty, now);
            self.messages.push(format!("Off-road! -{penalty} points"), now);
            info!("Off-road! -{} points, current score: {}", penalty, self.session.score);
            events.push(GameEvent::OffRoad { penalty });
        }

        // Some overshoot is allowed so the penalty is felt before the car is held
        let tolerance = self.config.driving.off_road_tolerance;
        let min_x = bounds.left - tolerance;
        let max_x = bounds.right - self.car.width + tolerance;
        self.car.x = self.car.x.max(min_x).min(max_x);
    }

    fn maybe_spawn_obstacle(&mut self, now: f64, events: &mut Vec<GameEvent>) {
        let obstacles = &self.config.obstacles;
        if now - self.last_spawn_at <= obstacles.spawn_interval_secs || self.session.speed <= obstacles.min_spawn_speed {
            return;
        }
        let (probability, min_distance) = (obstacles.spawn_probability, obstacles.min_distance);
        if probability <= 0.0 || !self.rng.gen_bool(probability) {
            return;
        }
        if self.obstacles.iter().any(|o| o.y < min_distance) {
            return;
        }

        let x = self.random_obstacle_x(self.road.bounds_at(0.0));
        self.obstacles.push(Obstacle { x, y: 0.0 });
        self.last_spawn_at = now;
        debug!("Generated obstacle: x={x:.1}, y=0");
        events.push(GameEvent::ObstacleSpawned { x });
    }

    /// Obstacle hits remove the obstacle; a severe off-road also counts as a crash
    fn detect_collision(&mut self, now: f64, events: &mut Vec<GameEvent>) -> bool {
        let car_rect = self.car.rect().to_pixels();
        let (width, height) = (self.config.obstacles.width, self.config.obstacles.height);

        if let Some(index) = self
            .obstacles
            .iter()
            .position(|o| car_rect.intersects(&Rect::new(o.x, o.y, width, height).to_pixels()))
        {
            let hit = self.obstacles.remove(index);
            debug!(
                "Collision with obstacle: car=({:.1}, {:.1}), obstacle=({:.1}, {:.1})",
                self.car.x, self.car.y, hit.x, hit.y
            );
            events.push(GameEvent::ObstacleHit);
            return true;
        }

        let bounds = self.road.bounds_at(self.car.y);
        let margin = self.config.driving.severe_off_road_margin;
        if self.car.x + self.car.width < bounds.left - margin || self.car.x > bounds.right + margin {
            // Deducted regardless of cooldown, and the caller still applies the
            // collision penalty on top.
            let penalty = self.config.scoring.off_road_penalty * SEVERE_OFF_ROAD_MULTIPLIER;
            self.session.score -= penalty;
            self.messages.push(format!("Severely off-road! -{penalty} points"), now);
            info!("Severely off-road! -{} points, current score: {}", penalty, self.session.score);
            events.push(GameEvent::SevereOffRoad { penalty });
            return true;
        }

        false
    }

    fn accrue_score(&mut self, now: f64, events: &mut Vec<GameEvent>) {
        let scoring = &self.config.scoring;
        self.session.score += f64_floor_to_i64_saturating(self.session.speed * scoring.speed_score_factor);

        if now - self.last_bonus_at >= scoring.survival_interval_secs {
            let points = scoring.survival_bonus;
            self.session.score += points;
            self.last_bonus_at = now;
            self.messages.push(format!("Survival bonus +{points} points"), now);
            info!("Survival time bonus: +{} points, current score: {}", points, self.session.score);
            events.push(GameEvent::SurvivalBonus { points });
        }
    }

    fn cooldown_elapsed(&self, now: f64) -> bool {
        self.last_penalty_at
            .map_or(true, |t| now - t > self.config.scoring.collision_cooldown_secs)
    }

    fn cooldown_remaining(&self, now: f64) -> f64 {
        self.last_penalty_at
            .map_or(0.0, |t| (self.config.scoring.collision_cooldown_secs - (now - t)).max(0.0))
    }

    fn apply_penalty(&mut self, points: i64, now: f64) {
        self.session.score -= points;
        self.last_penalty_at = Some(now);
    }

    /// Switch between running and paused; no effect after game over
    pub fn toggle_pause(&mut self) -> RunState {
        self.state = match self.state {
            RunState::Running => RunState::Paused,
            RunState::Paused => RunState::Running,
            RunState::GameOver => RunState::GameOver,
        };
        info!("Simulator {:?}", self.state);
        self.state
    }

    /// Put an obstacle at a given position (scripted scenarios)
    pub fn place_obstacle(&mut self, x: f64, y: f64) {
        self.obstacles.push(Obstacle { x, y });
    }

    /// Snapshot for the renderer
    #[must_use]
    pub fn render_state(&self) -> RenderState {
        RenderState {
            state: self.state,
            segments: self.road.segments().copied().collect(),
            obstacles: self.obstacles.clone(),
            obstacle_size: (self.config.obstacles.width, self.config.obstacles.height),
            car: self.car,
            session: self.session,
            curvature: self.road.curvature(),
            road_width: self.config.road.road_width,
            segment_height: self.config.road.segment_height,
            line_offset: self.road.line_offset(),
            messages: self.messages.iter().map(|m| m.text.clone()).collect(),
        }
    }

    #[must_use]
    pub fn state(&self) -> RunState {
        self.state
    }

    #[must_use]
    pub fn is_game_over(&self) -> bool {
        self.state == RunState::GameOver
    }

    #[must_use]
    pub fn session(&self) -> &SessionState {
        &self.session
    }

    #[must_use]
    pub fn car(&self) -> &CarState {
        &self.car
    }

    #[must_use]
    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    #[must_use]
    pub fn road(&self) -> &RoadGenerator {
        &self.road
    }

    /// Road edges at the car's row
    #[must_use]
    pub fn road_bounds_at_car(&self) -> RoadBounds {
        self.road.bounds_at(self.car.y)
    }

    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }
}
