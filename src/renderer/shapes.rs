//! Shape generation for 2D primitives
//!
//! Everything is emitted as a triangle list in screen pixels.

use glam::Vec2;
use std::f32::consts::PI;

use super::vertex::Vertex;

/// Generate vertices for a filled circle
pub fn circle(center: Vec2, radius: f32, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 3) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        // Triangle from center to edge
        vertices.push(Vertex::new(center.x, center.y, color));
        vertices.push(Vertex::new(
            center.x + radius * theta1.cos(),
            center.y + radius * theta1.sin(),
            color,
        ));
        vertices.push(Vertex::new(
            center.x + radius * theta2.cos(),
            center.y + radius * theta2.sin(),
            color,
        ));
    }

    vertices
}

/// Quad covering the segment `a`-`b` with the given stroke width
pub fn line(a: Vec2, b: Vec2, width: f32, color: [f32; 4]) -> [Vertex; 6] {
    let dir = (b - a).normalize_or_zero();
    let perp = Vec2::new(-dir.y, dir.x) * (width * 0.5);

    let a1 = a + perp;
    let a2 = a - perp;
    let b1 = b + perp;
    let b2 = b - perp;

    [
        Vertex::new(a1.x, a1.y, color),
        Vertex::new(a2.x, a2.y, color),
        Vertex::new(b1.x, b1.y, color),
        Vertex::new(b1.x, b1.y, color),
        Vertex::new(a2.x, a2.y, color),
        Vertex::new(b2.x, b2.y, color),
    ]
}

/// Stroke a closed polygon, with a round joint at every corner
pub fn closed_outline(points: &[Vec2], width: f32, color: [f32; 4]) -> Vec<Vertex> {
    if points.len() < 2 {
        return Vec::new();
    }

    let joint_segments = 6;
    let mut vertices = Vec::with_capacity(points.len() * (6 + joint_segments as usize * 3));

    for (i, &a) in points.iter().enumerate() {
        let b = points[(i + 1) % points.len()];
        vertices.extend_from_slice(&line(a, b, width, color));
        vertices.extend(circle(a, width * 0.5, color, joint_segments));
    }

    vertices
}

/// Outline plus a wider translucent pass underneath, approximating canvas shadow blur
pub fn glowing_outline(
    points: &[Vec2],
    width: f32,
    color: [f32; 4],
    glow: Option<[f32; 4]>,
) -> Vec<Vertex> {
    let mut vertices = Vec::new();
    if let Some(glow_color) = glow {
        vertices.extend(closed_outline(points, width * 4.0, glow_color));
    }
    vertices.extend(closed_outline(points, width, color));
    vertices
}

#[cfg(test)]
mod tests {
    use super::*;

    const WHITE: [f32; 4] = [1.0; 4];

    #[test]
    fn test_circle_vertex_count_and_extent() {
        let verts = circle(Vec2::new(10.0, 20.0), 5.0, WHITE, 8);
        assert_eq!(verts.len(), 24);
        for v in &verts {
            let d = Vec2::from(v.position).distance(Vec2::new(10.0, 20.0));
            assert!(d <= 5.0 + 1e-4);
        }
    }

    #[test]
    fn test_line_quad_width() {
        let quad = line(Vec2::ZERO, Vec2::new(10.0, 0.0), 2.0, WHITE);
        let ys: Vec<f32> = quad.iter().map(|v| v.position[1]).collect();
        assert!(ys.iter().all(|y| (y.abs() - 1.0).abs() < 1e-5));
    }

    #[test]
    fn test_outline_closes_polygon() {
        let square = [
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 0.0),
            Vec2::new(10.0, 10.0),
            Vec2::new(0.0, 10.0),
        ];
        let verts = closed_outline(&square, 2.0, WHITE);
        // One quad and one joint per edge
        assert_eq!(verts.len(), 4 * (6 + 6 * 3));
        assert!(closed_outline(&square[..1], 2.0, WHITE).is_empty());
    }

    #[test]
    fn test_glow_drawn_first() {
        let tri = [Vec2::ZERO, Vec2::new(5.0, 0.0), Vec2::new(0.0, 5.0)];
        let glow = [1.0, 0.0, 0.0, 0.25];
        let verts = glowing_outline(&tri, 2.0, WHITE, Some(glow));
        assert_eq!(verts[0].color, glow);
        assert_eq!(verts.last().map(|v| v.color), Some(WHITE));
        assert_eq!(
            glowing_outline(&tri, 2.0, WHITE, None).len(),
            verts.len() / 2
        );
    }
}
