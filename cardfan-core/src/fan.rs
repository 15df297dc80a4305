//! Fan layout: placement of a hand of cards along a cubic Bezier arc.
//!
//! Pure geometry; callers own the configuration and feed the resulting poses
//! into card move transitions.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// A placement slot: a position on the arc plus a tilt in degrees,
/// counterclockwise-positive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    pub position: Vec2,
    pub rotation: f32,
}

/// Evaluates a cubic Bezier curve over four anchor points at `t` in [0, 1].
pub fn cubic_bezier(p0: Vec2, p1: Vec2, p2: Vec2, p3: Vec2, t: f32) -> Vec2 {
    let u = 1.0 - t;
    let uu = u * u;
    let tt = t * t;
    uu * u * p0 + 3.0 * uu * t * p1 + 3.0 * u * tt * p2 + tt * t * p3
}

/// The card arc: four Bezier anchors plus the spread and tilt knobs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FanConfig {
    pub left: Vec2,
    pub left_peak: Vec2,
    pub right_peak: Vec2,
    pub right: Vec2,
    /// Maximum tilt at the outer ends of the arc, degrees counterclockwise.
    pub tilt: f32,
    /// Step between neighbouring interpolation parameters in fixed-step mode.
    pub spread_step: f32,
    /// Hand size at which the layout switches to proportional spacing.
    pub proportional_min_cards: usize,
}

impl Default for FanConfig {
    fn default() -> Self {
        Self {
            left: Vec2::new(-420.0, 230.0),
            left_peak: Vec2::new(-180.0, 90.0),
            right_peak: Vec2::new(180.0, 90.0),
            right: Vec2::new(420.0, 230.0),
            tilt: 20.0,
            spread_step: 0.12,
            proportional_min_cards: 5,
        }
    }
}

impl FanConfig {
    pub fn point_at(&self, t: f32) -> Vec2 {
        cubic_bezier(self.left, self.left_peak, self.right_peak, self.right, t)
    }

    /// Tilt ramp along the arc: zero at the middle, `±tilt` at the ends,
    /// linear in between. The left half tilts counterclockwise.
    pub fn tilt_at(&self, t: f32) -> f32 {
        (self.tilt / 0.5) * (0.5 - t)
    }

    pub fn pose_at(&self, t: f32) -> Pose {
        Pose {
            position: self.point_at(t),
            rotation: self.tilt_at(t),
        }
    }

    /// Interpolation parameters for a hand of `count` cards.
    ///
    /// Hands smaller than `proportional_min_cards` keep a constant
    /// `spread_step` between neighbours, centered on the middle of the arc, so
    /// they stay visually fanned out. From the threshold upward the
    /// parameters cover [0, 1] evenly. A single card sits at the midpoint.
    pub fn spread(&self, count: usize) -> Vec<f32> {
        if count == 0 {
            return Vec::new();
        }
        if count == 1 {
            return vec![0.5];
        }

        let t_delta = 1.0 / (count - 1) as f32;
        let threshold_t = 1.0 / (self.proportional_min_cards.max(2) - 1) as f32;

        if t_delta > threshold_t {
            let half_span = (count as f32 / 2.0 - 0.5) * self.spread_step;
            let start = 0.5 - half_span;
            (0..count)
                .map(|i| start + i as f32 * self.spread_step)
                .collect()
        } else {
            (0..count).map(|i| i as f32 * t_delta).collect()
        }
    }

    pub fn poses(&self, count: usize) -> Vec<Pose> {
        self.spread(count)
            .into_iter()
            .map(|t| self.pose_at(t))
            .collect()
    }
}
