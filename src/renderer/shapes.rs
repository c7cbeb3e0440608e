//! Shape generation for 2D primitives
//!
//! Actors are regular polygons; the first corner points up (rotation 0) and
//! outlines grow outward from the edge.

use glam::Vec2;
use std::f32::consts::TAU;

use super::vertex::Vertex;
use crate::sim::DrawShape;

/// Corner `i` of an `n`-gon of `radius` around `center`
fn corner(center: Vec2, radius: f32, rotation_degrees: f32, i: u32, n: u32) -> Vec2 {
    let theta = (i as f32 / n as f32) * TAU + (rotation_degrees - 90.0).to_radians();
    center + radius * Vec2::new(theta.cos(), theta.sin())
}

/// Triangle fan for a filled regular polygon
pub fn polygon(center: Vec2, radius: f32, rotation: f32, color: [f32; 4], points: u32) -> Vec<Vertex> {
    if points < 3 || radius <= 0.0 {
        return Vec::new();
    }
    let mut vertices = Vec::with_capacity((points * 3) as usize);

    for i in 0..points {
        let a = corner(center, radius, rotation, i, points);
        let b = corner(center, radius, rotation, i + 1, points);

        vertices.push(Vertex::new(center.x, center.y, color));
        vertices.push(Vertex::new(a.x, a.y, color));
        vertices.push(Vertex::new(b.x, b.y, color));
    }

    vertices
}

/// Band between two concentric regular polygons
pub fn polygon_ring(
    center: Vec2,
    inner_radius: f32,
    outer_radius: f32,
    rotation: f32,
    color: [f32; 4],
    points: u32,
) -> Vec<Vertex> {
    if points < 3 || outer_radius <= inner_radius {
        return Vec::new();
    }
    let mut vertices = Vec::with_capacity((points * 6) as usize);

    for i in 0..points {
        let inner1 = corner(center, inner_radius, rotation, i, points);
        let inner2 = corner(center, inner_radius, rotation, i + 1, points);
        let outer1 = corner(center, outer_radius, rotation, i, points);
        let outer2 = corner(center, outer_radius, rotation, i + 1, points);

        // Two triangles per segment
        vertices.push(Vertex::new(inner1.x, inner1.y, color));
        vertices.push(Vertex::new(outer1.x, outer1.y, color));
        vertices.push(Vertex::new(outer2.x, outer2.y, color));

        vertices.push(Vertex::new(inner1.x, inner1.y, color));
        vertices.push(Vertex::new(outer2.x, outer2.y, color));
        vertices.push(Vertex::new(inner2.x, inner2.y, color));
    }

    vertices
}

pub fn fill(shape: &DrawShape) -> Vec<Vertex> {
    if !shape.is_filled() {
        return Vec::new();
    }
    polygon(shape.position, shape.radius, shape.rotation, shape.fill, shape.point_count)
}

pub fn outline(shape: &DrawShape) -> Vec<Vertex> {
    if !shape.is_outlined() {
        return Vec::new();
    }
    polygon_ring(
        shape.position,
        shape.radius,
        shape.radius + shape.outline_thickness,
        shape.rotation,
        shape.outline,
        shape.point_count,
    )
}

/// Fill then outline, ready for a triangle-list draw
pub fn vertices(shape: &DrawShape) -> Vec<Vertex> {
    let mut out = fill(shape);
    out.extend(outline(shape));
    out
}

/// Every shape in draw order, as one buffer
pub fn batch(shapes: &[DrawShape]) -> Vec<Vertex> {
    shapes.iter().flat_map(vertices).collect()
}
