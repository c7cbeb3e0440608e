//! The player's ship

use glam::Vec2;

use super::actor::Actor;
use crate::consts::*;
use crate::{heading, wrap_degrees};

/// Player ship: thrust along its heading, turn in place, constant drag
#[derive(Debug, Clone, PartialEq)]
pub struct Ship {
    pub actor: Actor,
}

impl Default for Ship {
    fn default() -> Self {
        Self::new()
    }
}

impl Ship {
    pub fn new() -> Self {
        Self {
            actor: Actor::ship(),
        }
    }

    /// Park the ship at `position`, stationary and facing up
    pub fn reset(&mut self, position: Vec2) {
        self.actor.position = position;
        self.actor.rotation = 0.0;
        self.actor.speed = 0.0;
        self.actor.direction = heading(0.0);
    }

    /// `thrust` and `turn` are in [-1, 1]
    pub fn update(&mut self, thrust: f32, turn: f32, dt: f32) {
        let actor = &mut self.actor;
        actor.rotation = wrap_degrees(actor.rotation + turn * SHIP_TURN_RATE * dt);
        actor.direction = heading(actor.rotation);
        actor.speed = (actor.speed + thrust * SHIP_ACCELERATION * dt - SHIP_DRAG * dt)
            .clamp(0.0, SHIP_MAX_SPEED);
        actor.advance(dt);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thrust_accelerates_up() {
        let mut ship = Ship::new();
        ship.reset(Vec2::new(100.0, 100.0));
        ship.update(1.0, 0.0, 0.5);
        // (400 - 100) * 0.5
        assert!((ship.actor.speed - 150.0).abs() < 1e-3);
        assert!(ship.actor.position.y < 100.0);
        assert!((ship.actor.position.x - 100.0).abs() < 1e-3);
    }

    #[test]
    fn test_drag_never_reverses() {
        let mut ship = Ship::new();
        ship.reset(Vec2::ZERO);
        ship.update(0.0, 0.0, 1.0);
        assert_eq!(ship.actor.speed, 0.0);
        assert_eq!(ship.actor.position, Vec2::ZERO);
    }

    #[test]
    fn test_speed_capped() {
        let mut ship = Ship::new();
        ship.reset(Vec2::ZERO);
        for _ in 0..100 {
            ship.update(1.0, 0.0, 0.1);
        }
        assert!(ship.actor.speed <= SHIP_MAX_SPEED);
    }

    #[test]
    fn test_turning() {
        let mut ship = Ship::new();
        ship.reset(Vec2::ZERO);
        ship.update(0.0, 1.0, 0.45);
        // 200 deg/s * 0.45 s = 90 degrees, now facing +x
        assert!((ship.actor.rotation - 90.0).abs() < 1e-3);
        assert!((ship.actor.direction - Vec2::X).length() < 1e-4);
    }
}
