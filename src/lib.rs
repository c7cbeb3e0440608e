//! Drift Runner - an arcade hazard-dodging simulation core
//!
//! Core modules:
//! - `pool`: Fixed-capacity recycling pools for transient actors
//! - `store`: Lock-guarded component store for hazard simulation data
//! - `events`: Kind-indexed publish/subscribe event bus
//! - `sim`: Simulation (actors, collisions, splitting, session state machine)
//! - `game`: Fixed-timestep driver wiring context, input and simulation
//! - `renderer`: CPU tessellation of drawable shape descriptors
//! - `tuning`: Data-driven game balance

pub mod events;
pub mod game;
pub mod pool;
pub mod renderer;
pub mod sim;
pub mod store;
pub mod tuning;

pub use events::{EventBus, GameEvent, Key, KeyAction, KeyEvent, MouseAction, MouseButton, MouseEvent};
pub use game::{Game, SimContext};
pub use pool::{Pool, PoolHandle};
pub use store::{ActorKey, HazardRow, HazardStore, OwnerEffect, RowId};
pub use tuning::Tuning;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (120 Hz)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Largest frame delta accepted by the driver (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Ship defaults
    pub const SHIP_RADIUS: f32 = 30.0;
    pub const SHIP_POINTS: u32 = 3;
    pub const SHIP_DRAG: f32 = 100.0;
    pub const SHIP_ACCELERATION: f32 = 400.0;
    pub const SHIP_MAX_SPEED: f32 = 400.0;
    /// Degrees per second
    pub const SHIP_TURN_RATE: f32 = 200.0;

    /// Projectile defaults
    pub const PROJECTILE_RADIUS: f32 = 5.0;
    pub const PROJECTILE_POINTS: u32 = 5;
    pub const PROJECTILE_SPEED: f32 = 800.0;

    /// Hazard row defaults (radius = BASE + level * STEP)
    pub const HAZARD_BASE_RADIUS: f32 = 10.0;
    pub const HAZARD_RADIUS_STEP: f32 = 10.0;
    pub const HAZARD_POINTS: u32 = 8;
    pub const HAZARD_DEFAULT_SPEED: f32 = 400.0;
    /// Degrees per second
    pub const HAZARD_ROTATION_SPEED: f32 = 25.0;
    /// Level a freshly constructed hazard starts at
    pub const HAZARD_INITIAL_LEVEL: i32 = 3;

    /// Objective zone
    pub const ZONE_RADIUS: f32 = 300.0;
    pub const ZONE_POINTS: u32 = 25;
    /// Degrees per second
    pub const ZONE_ROTATION_SPEED: f32 = 25.0;
}

/// Rotate a vector by an angle in degrees (counter-clockwise in a y-up frame)
#[inline]
pub fn rotate_degrees(v: Vec2, degrees: f32) -> Vec2 {
    Vec2::from_angle(degrees.to_radians()).rotate(v)
}

/// Unit heading for a rotation in degrees where 0° points "up" the screen (-y)
#[inline]
pub fn heading(rotation_degrees: f32) -> Vec2 {
    let radians = (rotation_degrees - 90.0).to_radians();
    Vec2::new(radians.cos(), radians.sin())
}

/// Normalized direction from `from` toward `to`, zero if the points coincide
#[inline]
pub fn direction_to(from: Vec2, to: Vec2) -> Vec2 {
    (to - from).normalize_or_zero()
}

/// Wrap an angle in degrees into [0, 360)
#[inline]
pub fn wrap_degrees(angle: f32) -> f32 {
    angle.rem_euclid(360.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rotate_degrees_quarter_turn() {
        let v = rotate_degrees(Vec2::X, 90.0);
        assert!((v - Vec2::Y).length() < 1e-5);
    }

    #[test]
    fn test_heading_zero_points_up() {
        let h = heading(0.0);
        assert!((h - Vec2::new(0.0, -1.0)).length() < 1e-5);
    }

    #[test]
    fn test_direction_to_coincident_is_zero() {
        assert_eq!(direction_to(Vec2::ONE, Vec2::ONE), Vec2::ZERO);
        let d = direction_to(Vec2::ZERO, Vec2::new(3.0, 4.0));
        assert!((d.length() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_wrap_degrees() {
        assert!((wrap_degrees(370.0) - 10.0).abs() < 1e-4);
        assert!((wrap_degrees(-10.0) - 350.0).abs() < 1e-4);
    }
}
