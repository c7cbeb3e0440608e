//! Actors: the identity-owning objects the simulation moves and draws

use glam::Vec2;

use crate::consts::*;
use crate::store::{OwnerEffect, RowId};

/// Linear RGBA colour
pub type Rgba = [f32; 4];

/// Colours for game elements
pub mod palette {
    use super::Rgba;

    pub const TRANSPARENT: Rgba = [0.0, 0.0, 0.0, 0.0];
    pub const SHIP: Rgba = [1.0, 1.0, 1.0, 1.0];
    pub const PROJECTILE: Rgba = [1.0, 0.0, 0.0, 1.0];
    pub const HAZARD_FILL: Rgba = [50.0 / 255.0, 50.0 / 255.0, 50.0 / 255.0, 1.0];
    pub const HAZARD_OUTLINE: Rgba = [100.0 / 255.0, 100.0 / 255.0, 100.0 / 255.0, 1.0];
    pub const ZONE_OUTLINE: Rgba = [1.0, 1.0, 1.0, 1.0];
}

/// How an actor looks, independent of its size
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapeStyle {
    pub point_count: u32,
    pub fill: Rgba,
    pub outline: Rgba,
    pub outline_thickness: f32,
}

/// Everything an external renderer needs to draw one actor
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawShape {
    pub position: Vec2,
    /// Degrees
    pub rotation: f32,
    pub radius: f32,
    pub point_count: u32,
    pub fill: Rgba,
    pub outline: Rgba,
    pub outline_thickness: f32,
}

impl DrawShape {
    pub fn is_filled(&self) -> bool {
        self.fill[3] > 0.0
    }

    pub fn is_outlined(&self) -> bool {
        self.outline_thickness > 0.0 && self.outline[3] > 0.0
    }
}

/// A live game object with a circular collision footprint
#[derive(Debug, Clone, PartialEq)]
pub struct Actor {
    pub position: Vec2,
    /// Degrees, 0 = facing up
    pub rotation: f32,
    pub direction: Vec2,
    pub speed: f32,
    pub radius: f32,
    pub style: ShapeStyle,
}

impl Actor {
    pub fn new(radius: f32, speed: f32, style: ShapeStyle) -> Self {
        Self {
            position: Vec2::ZERO,
            rotation: 0.0,
            direction: Vec2::ZERO,
            speed,
            radius,
            style,
        }
    }

    pub fn ship() -> Self {
        Self::new(
            SHIP_RADIUS,
            0.0,
            ShapeStyle {
                point_count: SHIP_POINTS,
                fill: palette::SHIP,
                outline: palette::TRANSPARENT,
                outline_thickness: 0.0,
            },
        )
    }

    pub fn projectile() -> Self {
        Self::new(
            PROJECTILE_RADIUS,
            PROJECTILE_SPEED,
            ShapeStyle {
                point_count: PROJECTILE_POINTS,
                fill: palette::PROJECTILE,
                outline: palette::TRANSPARENT,
                outline_thickness: 0.0,
            },
        )
    }

    /// Hazard shell; radius and speed are owned by the component store
    pub fn hazard() -> Self {
        Self::new(
            HAZARD_BASE_RADIUS,
            0.0,
            ShapeStyle {
                point_count: HAZARD_POINTS,
                fill: palette::HAZARD_FILL,
                outline: palette::HAZARD_OUTLINE,
                outline_thickness: 4.0,
            },
        )
    }

    pub fn zone() -> Self {
        Self::new(
            ZONE_RADIUS,
            0.0,
            ShapeStyle {
                point_count: ZONE_POINTS,
                fill: palette::TRANSPARENT,
                outline: palette::ZONE_OUTLINE,
                outline_thickness: 2.0,
            },
        )
    }

    /// Integrate straight-line motion
    pub fn advance(&mut self, dt: f32) {
        self.position += self.direction * self.speed * dt;
    }

    /// Strict circle overlap (touching does not count)
    pub fn intersects(&self, other: &Actor) -> bool {
        let reach = self.radius + other.radius;
        self.position.distance_squared(other.position) < reach * reach
    }

    /// Apply a store side effect; the caller has already matched the owner
    pub fn apply_effect(&mut self, effect: OwnerEffect) {
        match effect {
            OwnerEffect::Resize {
                radius,
                point_count,
                ..
            } => {
                self.radius = radius;
                self.style.point_count = point_count;
            }
            OwnerEffect::Translate { delta, .. } => self.position += delta,
        }
    }

    pub fn draw_shape(&self) -> DrawShape {
        DrawShape {
            position: self.position,
            rotation: self.rotation,
            radius: self.radius,
            point_count: self.style.point_count,
            fill: self.style.fill,
            outline: self.style.outline,
            outline_thickness: self.style.outline_thickness,
        }
    }
}

/// Pooled hazard: the actor plus the id of its row in the component store
#[derive(Debug, Clone, PartialEq)]
pub struct Hazard {
    pub actor: Actor,
    pub row: RowId,
}
