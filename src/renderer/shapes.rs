//! Shape generation for 2D primitives

use glam::Vec2;
use std::f32::consts::TAU;

use super::vertex::Vertex;

/// Enough segments for a smooth edge at this radius
pub fn segments_for_radius(radius: f32) -> u32 {
    ((radius * 0.8) as u32).clamp(12, 64)
}

fn rim(center: Vec2, radius: f32, i: u32, segments: u32) -> Vec2 {
    let theta = (i as f32 / segments as f32) * TAU;
    center + Vec2::new(theta.cos(), theta.sin()) * radius
}

/// Filled circle as a triangle fan
pub fn circle(center: Vec2, radius: f32, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    let segments = segments.max(3);
    let mut vertices = Vec::with_capacity((segments * 3) as usize);

    for i in 0..segments {
        let a = rim(center, radius, i, segments);
        let b = rim(center, radius, i + 1, segments);
        vertices.push(Vertex::new(center.x, center.y, color));
        vertices.push(Vertex::new(a.x, a.y, color));
        vertices.push(Vertex::new(b.x, b.y, color));
    }

    vertices
}

/// Hollow circle band between `inner_radius` and `outer_radius`
pub fn ring(
    center: Vec2,
    inner_radius: f32,
    outer_radius: f32,
    color: [f32; 4],
    segments: u32,
) -> Vec<Vertex> {
    let segments = segments.max(3);
    let mut vertices = Vec::with_capacity((segments * 6) as usize);

    for i in 0..segments {
        let inner1 = rim(center, inner_radius, i, segments);
        let outer1 = rim(center, outer_radius, i, segments);
        let inner2 = rim(center, inner_radius, i + 1, segments);
        let outer2 = rim(center, outer_radius, i + 1, segments);

        // Two triangles per segment
        for p in [inner1, outer1, inner2, inner2, outer1, outer2] {
            vertices.push(Vertex::new(p.x, p.y, color));
        }
    }

    vertices
}
