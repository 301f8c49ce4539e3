//! Procedural road ribbon.
//!
//! The road is a column of thin segments ordered top to bottom (ascending
//! `y`). Segments scroll down as the car moves; those that leave the bottom
//! are dropped and fresh ones are added at the top, each one step further
//! along a bounded random walk of curvature.

use crate::config::{Config, RoadConfig};
use log::debug;
use rand::Rng;
use serde::Serialize;
use std::collections::VecDeque;

/// One horizontal slice of road
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RoadSegment {
    /// Top edge of the segment in screen space
    pub y: f64,
    /// Signed bend; positive shifts the road to the right further down the screen
    pub curvature: f64,
}

/// Left and right road edges at some height
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RoadBounds {
    pub left: f64,
    pub right: f64,
}

impl RoadBounds {
    #[must_use]
    pub fn center(&self) -> f64 {
        (self.left + self.right) / 2.0
    }

    #[must_use]
    pub fn width(&self) -> f64 {
        self.right - self.left
    }
}

/// Curvature random walk plus the segment ribbon it produces
#[derive(Debug, Clone)]
pub struct RoadGenerator {
    config: RoadConfig,
    track_height: f64,
    base_center_x: f64,
    segment_count: usize,
    segments: VecDeque<RoadSegment>,
    curvature: f64,
    target_curvature: f64,
    line_offset: f64,
}

impl RoadGenerator {
    /// Build the initial ribbon covering the screen from the bottom edge up
    pub fn new<R: Rng + ?Sized>(config: &Config, rng: &mut R) -> Self {
        let road = config.road.clone();
        let track_height = f64::from(config.display.height);
        let base_center_x = f64::from(config.display.width) / 2.0;
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let segment_count = ((track_height / road.segment_height).floor() as usize).saturating_add(road.extra_segments);

        let mut generator = Self {
            config: road,
            track_height,
            base_center_x,
            segment_count,
            segments: VecDeque::with_capacity(segment_count),
            curvature: 0.0,
            target_curvature: 0.0,
            line_offset: 0.0,
        };

        let probability = generator.config.initial_retarget_probability;
        let mut y = track_height;
        for _ in 0..segment_count {
            let curvature = generator.step_curvature(rng, probability);
            generator.segments.push_front(RoadSegment { y, curvature });
            y -= generator.config.segment_height;
        }

        generator
    }

    /// Advance the random walk by one segment and return the new curvature
    fn step_curvature<R: Rng + ?Sized>(&mut self, rng: &mut R, retarget_probability: f64) -> f64 {
        if retarget_probability > 0.0 && rng.gen_bool(retarget_probability.min(1.0)) {
            let max = self.config.max_curvature;
            self.target_curvature = if max > 0.0 { rng.gen_range(-max..=max) } else { 0.0 };
        }

        let step = self.config.curvature_step;
        if self.curvature < self.target_curvature {
            self.curvature = (self.curvature + step).min(self.target_curvature);
        } else if self.curvature > self.target_curvature {
            self.curvature = (self.curvature - step).max(self.target_curvature);
        }

        self.curvature
    }

    /// Move everything down by `distance`, drop what left the screen and refill at the top
    pub fn scroll<R: Rng + ?Sized>(&mut self, distance: f64, rng: &mut R) {
        if distance <= 0.0 {
            return;
        }

        let period = self.config.line_length + self.config.line_gap;
        self.line_offset += distance;
        if self.line_offset > period {
            self.line_offset = 0.0;
        }

        for segment in &mut self.segments {
            segment.y += distance;
        }

        let limit = self.track_height + self.config.segment_height;
        let before = self.segments.len();
        while self.segments.back().is_some_and(|s| s.y >= limit) {
            self.segments.pop_back();
        }
        let dropped = before - self.segments.len();

        let probability = self.config.retarget_probability;
        while self.segments.len() < self.segment_count {
            let y = self
                .segments
                .front()
                .map_or(self.track_height, |s| s.y - self.config.segment_height);
            let curvature = self.step_curvature(rng, probability);
            self.segments.push_front(RoadSegment { y, curvature });
        }

        if dropped > 0 {
            debug!("Road scrolled {distance:.1}: recycled {dropped} segments, curvature {:.3}", self.curvature);
        }
    }

    /// Road edges at height `y`, using the nearest segment's curvature;
    /// falls back to a straight centered road when there are no segments
    #[must_use]
    pub fn bounds_at(&self, y: f64) -> RoadBounds {
        let curvature = self
            .nearest_segment(y)
            .map_or(0.0, |segment| segment.curvature);
        self.bounds_for(curvature, y)
    }

    fn bounds_for(&self, curvature: f64, y: f64) -> RoadBounds {
        let center_x = self.base_center_x + curvature * (y / self.track_height) * self.config.curve_amplitude;
        let half = self.config.road_width / 2.0;
        RoadBounds {
            left: center_x - half,
            right: center_x + half,
        }
    }

    fn nearest_segment(&self, y: f64) -> Option<&RoadSegment> {
        self.segments
            .iter()
            .min_by(|a, b| (a.y - y).abs().total_cmp(&(b.y - y).abs()))
    }

    /// Segments ordered by ascending `y`
    pub fn segments(&self) -> impl ExactSizeIterator<Item = &RoadSegment> + '_ {
        self.segments.iter()
    }

    #[must_use]
    pub fn segment_count(&self) -> usize {
        self.segment_count
    }

    /// Curvature of the most recently generated segment
    #[must_use]
    pub fn curvature(&self) -> f64 {
        self.curvature
    }

    #[must_use]
    pub fn target_curvature(&self) -> f64 {
        self.target_curvature
    }

    /// Scroll offset of the centre-line dashes
    #[must_use]
    pub fn line_offset(&self) -> f64 {
        self.line_offset
    }

    #[cfg(test)]
    pub(crate) fn clear(&mut self) {
        self.segments.clear();
    }
}
