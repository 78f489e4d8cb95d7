//! Shape generation for 2D primitives
//!
//! Every function returns a triangle list in screen coordinates.

use glam::Vec2;
use std::f32::consts::{PI, TAU};

use super::vertex::Vertex;
use crate::sim::Rect;

/// Segment count that keeps curves smooth at a given radius
pub fn segments_for(radius: f32) -> u32 {
    ((radius * 0.75) as u32).clamp(12, 64)
}

/// Generate vertices for a filled circle
pub fn circle(center: Vec2, radius: f32, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    ellipse(center, Vec2::splat(radius), color, segments)
}

/// Generate vertices for a filled axis-aligned ellipse
pub fn ellipse(center: Vec2, radii: Vec2, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 3) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * TAU;
        let theta2 = ((i + 1) as f32 / segments as f32) * TAU;

        // Triangle from center to edge
        vertices.push(Vertex::new(center.x, center.y, color));
        vertices.push(Vertex::new(
            center.x + radii.x * theta1.cos(),
            center.y + radii.y * theta1.sin(),
            color,
        ));
        vertices.push(Vertex::new(
            center.x + radii.x * theta2.cos(),
            center.y + radii.y * theta2.sin(),
            color,
        ));
    }

    vertices
}

/// Band of `width` along the inside of an ellipse
pub fn ellipse_outline(
    center: Vec2,
    radii: Vec2,
    width: f32,
    color: [f32; 4],
    segments: u32,
) -> Vec<Vertex> {
    let inner = (radii - Vec2::splat(width)).max(Vec2::ZERO);
    let mut vertices = Vec::with_capacity((segments * 6) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * TAU;
        let theta2 = ((i + 1) as f32 / segments as f32) * TAU;
        let dir1 = Vec2::new(theta1.cos(), theta1.sin());
        let dir2 = Vec2::new(theta2.cos(), theta2.sin());

        let (inner1, outer1) = (center + dir1 * inner, center + dir1 * radii);
        let (inner2, outer2) = (center + dir2 * inner, center + dir2 * radii);
        for p in [inner1, outer1, inner2, inner2, outer1, outer2] {
            vertices.push(Vertex::new(p.x, p.y, color));
        }
    }

    vertices
}

/// Generate vertices for a ring (hollow circle)
pub fn ring(
    center: Vec2,
    inner_radius: f32,
    outer_radius: f32,
    color: [f32; 4],
    segments: u32,
) -> Vec<Vertex> {
    arc(center, inner_radius, outer_radius, 0.0, TAU, color, segments)
}

/// Thick arc band from `start` to `end` (radians, clockwise on screen)
pub fn arc(
    center: Vec2,
    inner_radius: f32,
    outer_radius: f32,
    start: f32,
    end: f32,
    color: [f32; 4],
    segments: u32,
) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 6) as usize);
    let span = end - start;

    for i in 0..segments {
        let theta1 = start + (i as f32 / segments as f32) * span;
        let theta2 = start + ((i + 1) as f32 / segments as f32) * span;

        let dir1 = Vec2::new(theta1.cos(), theta1.sin());
        let dir2 = Vec2::new(theta2.cos(), theta2.sin());
        let inner1 = center + dir1 * inner_radius;
        let outer1 = center + dir1 * outer_radius;
        let inner2 = center + dir2 * inner_radius;
        let outer2 = center + dir2 * outer_radius;

        // Two triangles per segment
        vertices.push(Vertex::new(inner1.x, inner1.y, color));
        vertices.push(Vertex::new(outer1.x, outer1.y, color));
        vertices.push(Vertex::new(inner2.x, inner2.y, color));

        vertices.push(Vertex::new(inner2.x, inner2.y, color));
        vertices.push(Vertex::new(outer1.x, outer1.y, color));
        vertices.push(Vertex::new(outer2.x, outer2.y, color));
    }

    vertices
}

/// Filled rectangle
pub fn rect(r: Rect, color: [f32; 4]) -> Vec<Vertex> {
    let (x0, y0, x1, y1) = (r.x, r.y, r.right(), r.bottom());
    vec![
        Vertex::new(x0, y0, color),
        Vertex::new(x1, y0, color),
        Vertex::new(x0, y1, color),
        Vertex::new(x0, y1, color),
        Vertex::new(x1, y0, color),
        Vertex::new(x1, y1, color),
    ]
}

/// Rectangle with rounded corners
pub fn rounded_rect(r: Rect, radius: f32, color: [f32; 4]) -> Vec<Vertex> {
    let radius = radius.min(r.w / 2.0).min(r.h / 2.0).max(0.0);
    if radius <= 0.5 {
        return rect(r, color);
    }

    let mut v = rect(Rect::new(r.x + radius, r.y, r.w - 2.0 * radius, r.h), color);
    v.extend(rect(Rect::new(r.x, r.y + radius, radius, r.h - 2.0 * radius), color));
    v.extend(rect(
        Rect::new(r.right() - radius, r.y + radius, radius, r.h - 2.0 * radius),
        color,
    ));

    let segments = (segments_for(radius) / 4).max(4);
    let corners = [
        (Vec2::new(r.x + radius, r.y + radius), PI),
        (Vec2::new(r.right() - radius, r.y + radius), 1.5 * PI),
        (Vec2::new(r.right() - radius, r.bottom() - radius), 0.0),
        (Vec2::new(r.x + radius, r.bottom() - radius), 0.5 * PI),
    ];
    for (center, start) in corners {
        v.extend(arc(center, 0.0, radius, start, start + 0.5 * PI, color, segments));
    }
    v
}

/// Fan-triangulated polygon; exact for shapes star-shaped around their centroid
pub fn polygon(points: &[Vec2], color: [f32; 4]) -> Vec<Vertex> {
    if points.len() < 3 {
        return Vec::new();
    }
    let center = points.iter().copied().sum::<Vec2>() / points.len() as f32;
    let mut vertices = Vec::with_capacity(points.len() * 3);
    for (i, a) in points.iter().enumerate() {
        let b = points[(i + 1) % points.len()];
        vertices.push(Vertex::new(center.x, center.y, color));
        vertices.push(Vertex::new(a.x, a.y, color));
        vertices.push(Vertex::new(b.x, b.y, color));
    }
    vertices
}

/// Thick line segment with square ends
pub fn line(a: Vec2, b: Vec2, width: f32, color: [f32; 4]) -> Vec<Vertex> {
    let dir = (b - a).normalize_or_zero();
    let perp = Vec2::new(-dir.y, dir.x) * (width / 2.0);

    let a1 = a + perp;
    let a2 = a - perp;
    let b1 = b + perp;
    let b2 = b - perp;

    vec![
        Vertex::new(a1.x, a1.y, color),
        Vertex::new(a2.x, a2.y, color),
        Vertex::new(b1.x, b1.y, color),
        Vertex::new(b1.x, b1.y, color),
        Vertex::new(a2.x, a2.y, color),
        Vertex::new(b2.x, b2.y, color),
    ]
}

/// Outline points of an n-pointed star, first point straight up
pub fn star_points(center: Vec2, outer: f32, inner: f32, points: u32) -> Vec<Vec2> {
    (0..points * 2)
        .map(|i| {
            let angle = i as f32 * PI / points as f32 - PI / 2.0;
            let r = if i % 2 == 0 { outer } else { inner };
            center + Vec2::new(angle.cos(), angle.sin()) * r
        })
        .collect()
}

/// Filled star
pub fn star(center: Vec2, outer: f32, inner: f32, points: u32, color: [f32; 4]) -> Vec<Vertex> {
    let outline = star_points(center, outer, inner, points);
    let mut vertices = Vec::with_capacity(outline.len() * 3);
    for (i, a) in outline.iter().enumerate() {
        let b = outline[(i + 1) % outline.len()];
        vertices.push(Vertex::new(center.x, center.y, color));
        vertices.push(Vertex::new(a.x, a.y, color));
        vertices.push(Vertex::new(b.x, b.y, color));
    }
    vertices
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_circle_vertex_count() {
        let v = circle(Vec2::ZERO, 10.0, [1.0; 4], 16);
        assert_eq!(v.len(), 48);
        for vert in v {
            let p = Vec2::from(vert.position);
            assert!(p.length() <= 10.0 + 1e-4);
        }
    }

    #[test]
    fn test_rect_covers_corners() {
        let v = rect(Rect::new(1.0, 2.0, 3.0, 4.0), [1.0; 4]);
        assert_eq!(v.len(), 6);
        assert!(v.iter().any(|v| v.position == [4.0, 6.0]));
        assert!(v.iter().any(|v| v.position == [1.0, 2.0]));
    }

    #[test]
    fn test_rounded_rect_stays_inside() {
        let r = Rect::new(0.0, 0.0, 100.0, 40.0);
        for vert in rounded_rect(r, 15.0, [1.0; 4]) {
            let [x, y] = vert.position;
            assert!((-1e-3..=100.001).contains(&x));
            assert!((-1e-3..=40.001).contains(&y));
        }
    }

    #[test]
    fn test_star_points_alternate_radius() {
        let pts = star_points(Vec2::ZERO, 20.0, 8.0, 5);
        assert_eq!(pts.len(), 10);
        assert!((pts[0] - Vec2::new(0.0, -20.0)).length() < 1e-4);
        assert!((pts[1].length() - 8.0).abs() < 1e-4);
    }

    #[test]
    fn test_polygon_needs_three_points() {
        assert!(polygon(&[Vec2::ZERO, Vec2::X], [1.0; 4]).is_empty());
        assert_eq!(polygon(&[Vec2::ZERO, Vec2::X, Vec2::Y], [1.0; 4]).len(), 9);
    }
}
