//! Per-frame display list
//!
//! Games describe a frame as an ordered list of commands; the GPU backend
//! replays it. Keeping this CPU-only lets game drawing run in tests.

use glam::Vec2;

use super::canvas::Canvas;
use super::shapes;
use super::vertex::{Vertex, colors};
use crate::assets::ImageId;
use crate::sim::{ParticleSystem, Rect};

#[derive(Debug, Clone)]
pub enum DrawCommand<'a> {
    /// Colored triangle list
    Shapes(Vec<Vertex>),
    /// Custom picture stretched over `rect`
    Image {
        id: ImageId,
        rect: Rect,
        tint: [f32; 4],
    },
    /// Paint surface shown in `rect`
    Canvas { canvas: &'a Canvas, rect: Rect },
}

#[derive(Debug, Clone)]
pub struct Frame<'a> {
    clear: [f32; 4],
    commands: Vec<DrawCommand<'a>>,
}

impl Default for Frame<'_> {
    fn default() -> Self {
        Self::new(colors::BACKGROUND_LIGHT)
    }
}

impl<'a> Frame<'a> {
    pub fn new(clear: [f32; 4]) -> Self {
        Self {
            clear,
            commands: Vec::new(),
        }
    }

    /// Background fill
    pub fn clear_color(&self) -> [f32; 4] {
        self.clear
    }

    pub fn set_clear(&mut self, color: [f32; 4]) {
        self.clear = color;
    }

    pub fn commands(&self) -> &[DrawCommand<'a>] {
        &self.commands
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Append triangles, merging with a preceding shape batch
    pub fn push(&mut self, vertices: Vec<Vertex>) {
        if vertices.is_empty() {
            return;
        }
        if let Some(DrawCommand::Shapes(batch)) = self.commands.last_mut() {
            batch.extend(vertices);
        } else {
            self.commands.push(DrawCommand::Shapes(vertices));
        }
    }

    pub fn image(&mut self, id: ImageId, rect: Rect) {
        self.image_tinted(id, rect, colors::WHITE);
    }

    pub fn image_tinted(&mut self, id: ImageId, rect: Rect, tint: [f32; 4]) {
        self.commands.push(DrawCommand::Image { id, rect, tint });
    }

    pub fn canvas(&mut self, canvas: &'a Canvas, rect: Rect) {
        self.commands.push(DrawCommand::Canvas { canvas, rect });
    }

    // === Shape helpers ===

    pub fn circle(&mut self, center: Vec2, radius: f32, color: [f32; 4]) {
        if radius > 0.0 {
            self.push(shapes::circle(center, radius, color, shapes::segments_for(radius)));
        }
    }

    pub fn ellipse(&mut self, center: Vec2, radii: Vec2, color: [f32; 4]) {
        let segments = shapes::segments_for(radii.max_element());
        self.push(shapes::ellipse(center, radii, color, segments));
    }

    pub fn ellipse_outline(&mut self, center: Vec2, radii: Vec2, width: f32, color: [f32; 4]) {
        let segments = shapes::segments_for(radii.max_element());
        self.push(shapes::ellipse_outline(center, radii, width, color, segments));
    }

    pub fn ring(&mut self, center: Vec2, radius: f32, width: f32, color: [f32; 4]) {
        let segments = shapes::segments_for(radius);
        self.push(shapes::ring(center, radius - width, radius, color, segments));
    }

    pub fn rect(&mut self, rect: Rect, color: [f32; 4]) {
        self.push(shapes::rect(rect, color));
    }

    pub fn rounded_rect(&mut self, rect: Rect, radius: f32, color: [f32; 4]) {
        self.push(shapes::rounded_rect(rect, radius, color));
    }

    pub fn polygon(&mut self, points: &[Vec2], color: [f32; 4]) {
        self.push(shapes::polygon(points, color));
    }

    pub fn line(&mut self, a: Vec2, b: Vec2, width: f32, color: [f32; 4]) {
        self.push(shapes::line(a, b, width, color));
    }

    /// Every live particle as a disk shrinking and fading with life
    pub fn particles(&mut self, particles: &ParticleSystem) {
        for p in particles.iter() {
            let radius = p.draw_radius();
            if radius >= 0.5 {
                self.push(shapes::circle(p.pos, radius, p.draw_color(), 12));
            }
        }
    }
}
