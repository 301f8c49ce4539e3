//! Head-pose controlled racing game core.
//!
//! Two subsystems run once per frame:
//! - the pose pipeline turns face-mesh landmarks into a calibrated, smoothed
//!   steering/throttle [`tracker::ControlSignal`]
//! - the [`simulator::DrivingSimulator`] consumes that signal to advance a
//!   procedurally generated road, obstacles, penalties and score
//!
//! Window creation, audio and the camera itself live outside the crate; a
//! driver feeds landmarks in through [`landmarks::LandmarkSource`] and reads
//! [`simulator::RenderState`] snapshots out through [`app::Renderer`].
//!
//! # Examples
//!
//! ```no_run
//! use head_racer::{
//!     config::Config,
//!     landmarks::{LandmarkSet, ScriptedSource},
//!     simulator::DrivingSimulator,
//!     tracker::HeadTracker,
//! };
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::default();
//! let mut tracker = HeadTracker::new(&config)?;
//! let mut simulator = DrivingSimulator::new(&config)?;
//!
//! // Hold still for calibration
//! let mut source = ScriptedSource::from_poses(vec![Some((0.0, 0.0)); 30]);
//! tracker.calibrate(&mut source);
//!
//! // Lean back and turn right
//! let frame = LandmarkSet::synthetic(0.2, -0.3);
//! let signal = tracker.update(Some(&frame));
//! let report = simulator.update(signal.steering, signal.throttle);
//! println!("score {} events {:?}", simulator.session().score, report.events);
//! # Ok(())
//! # }
//! ```

/// Driver loop, actions and renderer interface
pub mod app;

/// Neutral-pose calibration state machine
pub mod calibration;

/// Configuration management
pub mod config;

/// Constants used throughout the crate
pub mod constants;

/// Error types and result handling
pub mod error;

/// Signal smoothing
pub mod filters;

/// Face-mesh landmarks and landmark sources
pub mod landmarks;

/// Transient player notifications
pub mod messages;

/// Raw head pose from landmarks
pub mod pose_estimation;

/// Procedural road generation
pub mod road;

/// Driving simulation state machine
pub mod simulator;

/// Running statistics
pub mod stats;

/// Pose pipeline facade
pub mod tracker;

/// Geometry and numeric helpers
pub mod utils;

pub use error::{Error, Result};
