//! Tessellation of scene shapes into colored triangles for the GPU.
//!
//! Text is laid out separately as glyph runs (see `chart::text`).

use bytemuck::{Pod, Zeroable};
use glam::Vec2;

use crate::color::Rgb;

use super::layout::Bounds;
use super::scene::{Scene, Shape, Stroke};

/// Segments used for a full circle
const CIRCLE_SEGMENTS: usize = 32;

/// Vertex data for the chart mesh (scene position + linear RGBA)
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

/// Triangle list for one frame
#[derive(Debug, Clone, Default)]
pub struct ChartMesh {
    pub vertices: Vec<Vertex>,
}

impl ChartMesh {
    pub fn vertex_count(&self) -> u32 {
        self.vertices.len() as u32
    }

    fn triangle(&mut self, a: Vec2, b: Vec2, c: Vec2, color: [f32; 4]) {
        for p in [a, b, c] {
            self.vertices.push(Vertex {
                position: p.to_array(),
                color,
            });
        }
    }

    fn quad(&mut self, corners: [Vec2; 4], color: [f32; 4]) {
        let [a, b, c, d] = corners;
        self.triangle(a, b, c, color);
        self.triangle(a, c, d, color);
    }

    fn rect(&mut self, bounds: &Bounds, color: [f32; 4]) {
        if bounds.is_empty() {
            return;
        }
        let (x0, y0) = (bounds.x, bounds.y);
        let (x1, y1) = (bounds.right(), bounds.bottom());
        self.quad(
            [
                Vec2::new(x0, y0),
                Vec2::new(x1, y0),
                Vec2::new(x1, y1),
                Vec2::new(x0, y1),
            ],
            color,
        );
    }

    /// Outline centred on the edge, like SVG strokes
    fn rect_outline(&mut self, bounds: &Bounds, stroke: &Stroke) {
        let half = stroke.width / 2.0;
        let color = stroke.color.to_linear_rgba(1.0);
        let (x0, y0) = (bounds.x - half, bounds.y - half);
        let (w, h) = (bounds.width + stroke.width, bounds.height + stroke.width);
        self.rect(&Bounds::new(x0, y0, w, stroke.width), color);
        self.rect(&Bounds::new(x0, y0 + h - stroke.width, w, stroke.width), color);
        self.rect(&Bounds::new(x0, y0, stroke.width, h), color);
        self.rect(&Bounds::new(x0 + w - stroke.width, y0, stroke.width, h), color);
    }

    fn segment(&mut self, from: Vec2, to: Vec2, width: f32, color: [f32; 4]) {
        let direction = to - from;
        if direction.length_squared() <= f32::EPSILON {
            return;
        }
        let normal = direction.normalize().perp() * (width / 2.0);
        self.quad([from + normal, to + normal, to - normal, from - normal], color);
    }

    fn circle(&mut self, center: Vec2, radius: f32, color: [f32; 4]) {
        if radius <= 0.0 {
            return;
        }
        let step = std::f32::consts::TAU / CIRCLE_SEGMENTS as f32;
        for i in 0..CIRCLE_SEGMENTS {
            let a0 = step * i as f32;
            let a1 = step * (i + 1) as f32;
            self.triangle(
                center,
                center + Vec2::from_angle(a0) * radius,
                center + Vec2::from_angle(a1) * radius,
                color,
            );
        }
    }

    fn polyline(&mut self, points: &[Vec2], stroke: &Stroke) {
        let color = stroke.color.to_linear_rgba(1.0);
        for pair in points.windows(2) {
            self.segment(pair[0], pair[1], stroke.width, color);
        }
        // Round joins and caps
        for &point in points {
            self.circle(point, stroke.width / 2.0, color);
        }
    }
}

/// Tessellate every non-text shape, preserving paint order
pub fn tessellate(scene: &Scene) -> ChartMesh {
    let mut mesh = ChartMesh::default();

    for shape in &scene.shapes {
        match shape {
            Shape::Rect {
                bounds,
                fill,
                opacity,
                stroke,
                ..
            } => {
                mesh.rect(bounds, fill.to_linear_rgba(*opacity));
                if let Some(stroke) = stroke {
                    mesh.rect_outline(bounds, stroke);
                }
            }
            Shape::Line { from, to, stroke } => {
                mesh.segment(*from, *to, stroke.width, stroke.color.to_linear_rgba(1.0));
            }
            Shape::Polyline { points, stroke } => mesh.polyline(points, stroke),
            Shape::Circle {
                center,
                radius,
                fill,
                opacity,
            } => mesh.circle(*center, *radius, fill.to_linear_rgba(*opacity)),
            Shape::Text(_) => {}
        }
    }

    mesh
}

/// Clear color for the frame background
pub fn clear_color(background: Rgb) -> wgpu::Color {
    let [r, g, b, a] = background.to_linear_rgba(1.0);
    wgpu::Color {
        r: r as f64,
        g: g as f64,
        b: b as f64,
        a: a as f64,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::scene::build_scene;
    use crate::explorer::Explorer;

    #[test]
    fn test_vertex_layout_is_tightly_packed() {
        assert_eq!(std::mem::size_of::<Vertex>(), 24);
    }

    #[test]
    fn test_rect_and_circle_triangle_counts() {
        let mut mesh = ChartMesh::default();
        mesh.rect(&Bounds::new(0.0, 0.0, 10.0, 10.0), [1.0; 4]);
        assert_eq!(mesh.vertex_count(), 6);

        mesh.rect(&Bounds::new(0.0, 0.0, 0.0, 10.0), [1.0; 4]);
        assert_eq!(mesh.vertex_count(), 6);

        mesh.circle(Vec2::ZERO, 4.0, [1.0; 4]);
        assert_eq!(mesh.vertex_count() as usize, 6 + CIRCLE_SEGMENTS * 3);
    }

    #[test]
    fn test_segment_has_requested_width() {
        let mut mesh = ChartMesh::default();
        mesh.segment(Vec2::new(0.0, 0.0), Vec2::new(10.0, 0.0), 4.0, [1.0; 4]);
        let ys: Vec<f32> = mesh.vertices.iter().map(|v| v.position[1]).collect();
        let max = ys.iter().cloned().fold(f32::MIN, f32::max);
        let min = ys.iter().cloned().fold(f32::MAX, f32::min);
        assert!((max - min - 4.0).abs() < 1e-5);

        // Degenerate segments produce nothing
        mesh.segment(Vec2::ONE, Vec2::ONE, 4.0, [1.0; 4]);
        assert_eq!(mesh.vertex_count(), 6);
    }

    #[test]
    fn test_scene_tessellates_into_whole_triangles() {
        let mut explorer = Explorer::default();
        explorer.seek(75.0);
        let mesh = tessellate(&build_scene(&explorer.view()));

        assert!(mesh.vertex_count() > 0);
        assert_eq!(mesh.vertex_count() % 3, 0);
        assert!(mesh
            .vertices
            .iter()
            .all(|v| v.position.iter().chain(v.color.iter()).all(|c| c.is_finite())));
    }

    #[test]
    fn test_band_alpha_preserved() {
        let mut explorer = Explorer::default();
        explorer.seek(100.0);
        let mesh = tessellate(&build_scene(&explorer.view()));
        assert!(mesh.vertices.iter().any(|v| (v.color[3] - 0.05).abs() < 1e-6));
    }
}
