//! Collision and bounds tests for circular colliders
//!
//! The hot-path test compares squared distance against the squared sum of
//! radii, so no square root is taken per pair.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Playable area, origin at the top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }
}

/// Circle-vs-circle test, inclusive at exact contact
#[inline]
pub fn circles_collide(a: Vec2, a_radius: f32, b: Vec2, b_radius: f32) -> bool {
    let min_dist = a_radius + b_radius;
    a.distance_squared(b) <= min_dist * min_dist
}

/// True once a point is `margin` or more outside the playable area
pub fn is_out_of_bounds(pos: Vec2, bounds: Bounds, margin: f32) -> bool {
    let left = -margin;
    let right = bounds.width + margin;
    let top = -margin;
    let bottom = bounds.height + margin;

    pos.x <= left || pos.x >= right || pos.y <= top || pos.y >= bottom
}

/// Keep a circle of `radius` inside the playable area
pub fn clamp_to_bounds(pos: Vec2, radius: f32, bounds: Bounds) -> Vec2 {
    // Pins to the right/bottom edge if the circle is wider than the area
    Vec2::new(
        pos.x.max(radius).min(bounds.width - radius),
        pos.y.max(radius).min(bounds.height - radius),
    )
}
