//! Driver loop: landmark source, head tracker, simulator and renderer.

use crate::{
    calibration::CalibrationProgress,
    config::Config,
    constants::SPEED_DISPLAY_FACTOR,
    landmarks::LandmarkSource,
    simulator::{DrivingSimulator, GameEvent, RenderState, RunState, TickReport},
    tracker::{ControlSignal, HeadTracker},
    Result,
};
use log::{debug, info, warn};
use std::time::{Duration, Instant};

/// Externally triggerable driver actions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Suspend or resume simulator updates
    TogglePause,
    /// Re-enter calibration
    Recalibrate,
    /// Show or hide the camera preview
    ToggleCamera,
    /// Show or hide the debug overlay
    ToggleDebug,
    Quit,
}

/// Render-only state; never fed back into the simulation
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Overlay {
    pub show_camera: bool,
    pub show_debug: bool,
    /// Whether a calibration is being collected
    pub calibrating: bool,
    pub face_present: bool,
    pub signal: ControlSignal,
}

/// Consumer of the per-tick snapshot
pub trait Renderer {
    /// Draw one frame. Failures are logged by the driver and otherwise ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if the frame could not be presented
    fn present(&mut self, state: &RenderState, overlay: &Overlay) -> Result<()>;
}

/// Headless renderer that logs a status line every `interval` frames
#[derive(Debug)]
pub struct LogRenderer {
    interval: u64,
    frames: u64,
}

impl LogRenderer {
    #[must_use]
    pub fn new(interval: u64) -> Self {
        Self {
            interval: interval.max(1),
            frames: 0,
        }
    }

    #[must_use]
    pub fn frames(&self) -> u64 {
        self.frames
    }
}

impl Renderer for LogRenderer {
    fn present(&mut self, state: &RenderState, overlay: &Overlay) -> Result<()> {
        self.frames += 1;
        if self.frames % self.interval != 0 && state.state != RunState::GameOver {
            return Ok(());
        }

        let session = &state.session;
        info!(
            "t={:.1}s score={} speed={:.0} distance={:.0} obstacles={} curvature={:+.3} state={:?}",
            session.elapsed_time,
            session.score,
            session.speed * SPEED_DISPLAY_FACTOR,
            session.distance,
            state.obstacles.len(),
            state.curvature,
            state.state
        );
        if overlay.show_debug {
            debug!(
                "steering={:+.3} throttle={:+.3} face={} car_x={:.1}",
                overlay.signal.steering, overlay.signal.throttle, overlay.face_present, state.car.x
            );
        }
        for message in &state.messages {
            debug!("message: {message}");
        }
        Ok(())
    }
}

/// One game session
pub struct GameApp<S: LandmarkSource, R: Renderer> {
    source: S,
    renderer: R,
    tracker: HeadTracker,
    simulator: DrivingSimulator,
    overlay: Overlay,
    tick_duration: Duration,
    recalibration_started: Option<Instant>,
    quit: bool,
    ticks: u64,
}

impl<S: LandmarkSource, R: Renderer> GameApp<S, R> {
    /// Build the pipeline from a configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid
    pub fn new(config: &Config, source: S, renderer: R) -> Result<Self> {
        info!("Initializing head racer");
        let tracker = HeadTracker::new(config)?;
        let simulator = DrivingSimulator::new(config)?;

        Ok(Self {
            source,
            renderer,
            tracker,
            simulator,
            overlay: Overlay::default(),
            tick_duration: Duration::from_secs_f64(config.driving.tick_seconds()),
            recalibration_started: None,
            quit: false,
            ticks: 0,
        })
    }

    /// Blocking startup calibration; gameplay proceeds either way
    pub fn start(&mut self) -> bool {
        info!("Calibrating, please hold your head still");
        let success = self.tracker.calibrate(&mut self.source);
        if !success {
            warn!("Calibration incomplete, using a zero baseline");
        }
        success
    }

    /// Apply a driver action. Returns false once the app should stop.
    pub fn handle(&mut self, action: Action) -> bool {
        match action {
            Action::TogglePause => {
                self.simulator.toggle_pause();
            }
            Action::Recalibrate => {
                info!("Recalibrating");
                self.tracker.begin_calibration();
                self.recalibration_started = Some(Instant::now());
            }
            Action::ToggleCamera => self.overlay.show_camera = !self.overlay.show_camera,
            Action::ToggleDebug => self.overlay.show_debug = !self.overlay.show_debug,
            Action::Quit => {
                info!("Exit requested");
                self.quit = true;
            }
        }
        !self.quit
    }

    /// Poll, track, simulate and render one frame
    pub fn tick(&mut self) -> TickReport {
        self.ticks += 1;
        let frame = self.source.poll();

        let report = if let Some(started) = self.recalibration_started {
            // The world holds still while a recalibration is collecting
            match self.tracker.observe_calibration(frame.as_ref(), started.elapsed()) {
                CalibrationProgress::Collecting { .. } => {}
                progress => {
                    debug!("Recalibration finished: {progress:?}");
                    self.recalibration_started = None;
                }
            }
            TickReport {
                advanced: false,
                state: self.simulator.state(),
                events: Vec::new(),
            }
        } else {
            let signal = self.tracker.update(frame.as_ref());
            self.simulator.update_signal(signal)
        };

        for event in &report.events {
            if let GameEvent::GameOver { final_score } = event {
                info!("Final score: {final_score}");
            }
        }

        self.overlay.calibrating = self.recalibration_started.is_some();
        self.overlay.face_present = self.tracker.face_present();
        self.overlay.signal = self.tracker.control_signal();

        let state = self.simulator.render_state();
        if let Err(e) = self.renderer.present(&state, &self.overlay) {
            warn!("Render failed: {e}");
        }

        report
    }

    /// Run up to `max_ticks` frames (unbounded if `None`), stopping at game
    /// over or on quit. With `realtime` each frame is paced to the tick rate.
    pub fn run(&mut self, max_ticks: Option<u64>, realtime: bool) -> u64 {
        info!("Starting main loop");
        let mut frames = 0;

        while !self.quit && max_ticks.map_or(true, |max| frames < max) {
            let frame_start = Instant::now();
            let report = self.tick();
            frames += 1;

            if report.state == RunState::GameOver {
                break;
            }
            if realtime {
                if let Some(remaining) = self.tick_duration.checked_sub(frame_start.elapsed()) {
                    std::thread::sleep(remaining);
                }
            }
        }

        info!(
            "Stopped after {} frames: score {}, distance {:.0}",
            frames,
            self.simulator.session().score,
            self.simulator.session().distance
        );
        frames
    }

    #[must_use]
    pub fn simulator(&self) -> &DrivingSimulator {
        &self.simulator
    }

    pub fn simulator_mut(&mut self) -> &mut DrivingSimulator {
        &mut self.simulator
    }

    #[must_use]
    pub fn tracker(&self) -> &HeadTracker {
        &self.tracker
    }

    #[must_use]
    pub fn overlay(&self) -> Overlay {
        self.overlay
    }

    #[must_use]
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    #[must_use]
    pub fn is_recalibrating(&self) -> bool {
        self.recalibration_started.is_some()
    }

    /// Frames processed so far
    #[must_use]
    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}
