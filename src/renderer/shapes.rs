//! Shape generation for 2D primitives
//!
//! All shapes are emitted as triangle lists in surface pixel coordinates.

use glam::Vec2;
use std::f32::consts::TAU;

use super::vertex::Vertex;
use crate::sim::collision::Rect;

/// Segments used for obstacle ellipses
pub const ELLIPSE_SEGMENTS: u32 = 24;

/// Filled axis-aligned rectangle (two triangles)
pub fn rect(r: &Rect, color: [f32; 4], out: &mut Vec<Vertex>) {
    gradient_rect(r, color, color, out);
}

/// Rectangle with a vertical gradient from `top` to `bottom`
pub fn gradient_rect(r: &Rect, top: [f32; 4], bottom: [f32; 4], out: &mut Vec<Vertex>) {
    let (x0, y0) = (r.x, r.y);
    let (x1, y1) = (r.x + r.w, r.y + r.h);

    out.push(Vertex::new(x0, y0, top));
    out.push(Vertex::new(x1, y0, top));
    out.push(Vertex::new(x0, y1, bottom));

    out.push(Vertex::new(x0, y1, bottom));
    out.push(Vertex::new(x1, y0, top));
    out.push(Vertex::new(x1, y1, bottom));
}

/// Filled ellipse inscribed in `bounds` (triangle fan from the centre)
pub fn ellipse(bounds: &Rect, color: [f32; 4], segments: u32, out: &mut Vec<Vertex>) {
    let center = bounds.center();
    let radii = Vec2::new(bounds.w / 2.0, bounds.h / 2.0);
    let segments = segments.max(3);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * TAU;
        let theta2 = ((i + 1) as f32 / segments as f32) * TAU;

        out.push(Vertex::new(center.x, center.y, color));
        out.push(Vertex::new(
            center.x + radii.x * theta1.cos(),
            center.y + radii.y * theta1.sin(),
            color,
        ));
        out.push(Vertex::new(
            center.x + radii.x * theta2.cos(),
            center.y + radii.y * theta2.sin(),
            color,
        ));
    }
}
