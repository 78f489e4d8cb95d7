//! CPU-side RGBA paint surface
//!
//! Strokes are rasterized here and the whole buffer is uploaded as a
//! texture whenever `revision` changes.

use glam::Vec2;
use image::RgbaImage;

/// Convert a float color to 8-bit RGBA
pub fn to_rgba8(color: [f32; 4]) -> [u8; 4] {
    color.map(|c| (c.clamp(0.0, 1.0) * 255.0).round() as u8)
}

#[derive(Debug, Clone)]
pub struct Canvas {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
    revision: u64,
}

impl Canvas {
    pub fn new(width: u32, height: u32, fill: [u8; 4]) -> Self {
        let mut canvas = Self {
            width,
            height,
            pixels: vec![0; (width * height * 4) as usize],
            revision: 0,
        };
        canvas.clear(fill);
        canvas
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw RGBA bytes, row-major
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Bumped on every modification
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y * self.width + x) * 4) as usize;
        Some([
            self.pixels[i],
            self.pixels[i + 1],
            self.pixels[i + 2],
            self.pixels[i + 3],
        ])
    }

    /// Fill every pixel with `color`
    pub fn clear(&mut self, color: [u8; 4]) {
        for px in self.pixels.chunks_exact_mut(4) {
            px.copy_from_slice(&color);
        }
        self.revision += 1;
    }

    fn blend(&mut self, x: i64, y: i64, color: [u8; 4]) {
        if x < 0 || y < 0 || x >= i64::from(self.width) || y >= i64::from(self.height) {
            return;
        }
        let i = ((y as u32 * self.width + x as u32) * 4) as usize;
        let a = u32::from(color[3]);
        if a == 255 {
            self.pixels[i..i + 4].copy_from_slice(&color);
            return;
        }
        if a == 0 {
            return;
        }
        for c in 0..3 {
            let dst = u32::from(self.pixels[i + c]);
            let src = u32::from(color[c]);
            self.pixels[i + c] = ((src * a + dst * (255 - a)) / 255) as u8;
        }
        let dst_a = u32::from(self.pixels[i + 3]);
        self.pixels[i + 3] = (a + dst_a * (255 - a) / 255).min(255) as u8;
    }

    /// Integer pixel bounds of a float box, clipped to the canvas
    fn clip_box(&self, min: Vec2, max: Vec2) -> Option<(i64, i64, i64, i64)> {
        let x0 = (min.x.floor() as i64).max(0);
        let y0 = (min.y.floor() as i64).max(0);
        let x1 = (max.x.ceil() as i64).min(i64::from(self.width) - 1);
        let y1 = (max.y.ceil() as i64).min(i64::from(self.height) - 1);
        (x0 <= x1 && y0 <= y1).then_some((x0, y0, x1, y1))
    }

    /// Filled disk; pixels whose centers lie within `radius`
    pub fn fill_circle(&mut self, center: Vec2, radius: f32, color: [u8; 4]) {
        self.stroke_line(center, center, radius * 2.0, color);
    }

    /// Thick segment with round caps
    pub fn stroke_line(&mut self, a: Vec2, b: Vec2, width: f32, color: [u8; 4]) {
        let r = width / 2.0;
        let min = a.min(b) - Vec2::splat(r);
        let max = a.max(b) + Vec2::splat(r);
        let Some((x0, y0, x1, y1)) = self.clip_box(min, max) else {
            self.revision += 1;
            return;
        };

        let ab = b - a;
        let len_sq = ab.length_squared();
        for y in y0..=y1 {
            for x in x0..=x1 {
                let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                let t = if len_sq > 0.0 {
                    ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0)
                } else {
                    0.0
                };
                if p.distance_squared(a + ab * t) <= r * r {
                    self.blend(x, y, color);
                }
            }
        }
        self.revision += 1;
    }

    /// Even-odd scanline fill of a closed polygon
    pub fn fill_polygon(&mut self, points: &[Vec2], color: [u8; 4]) {
        if points.len() < 3 {
            return;
        }
        let min = points.iter().copied().fold(Vec2::splat(f32::MAX), Vec2::min);
        let max = points.iter().copied().fold(Vec2::splat(f32::MIN), Vec2::max);
        let Some((x0, y0, x1, y1)) = self.clip_box(min, max) else {
            self.revision += 1;
            return;
        };

        let mut crossings = Vec::with_capacity(points.len());
        for y in y0..=y1 {
            let sy = y as f32 + 0.5;
            crossings.clear();
            for (i, p) in points.iter().enumerate() {
                let q = points[(i + 1) % points.len()];
                if (p.y <= sy && q.y > sy) || (q.y <= sy && p.y > sy) {
                    crossings.push(p.x + (sy - p.y) / (q.y - p.y) * (q.x - p.x));
                }
            }
            crossings.sort_by(f32::total_cmp);
            for pair in crossings.chunks_exact(2) {
                let start = ((pair[0] - 0.5).ceil() as i64).max(x0);
                let end = ((pair[1] - 0.5).floor() as i64).min(x1);
                for x in start..=end {
                    self.blend(x, y, color);
                }
            }
        }
        self.revision += 1;
    }

    /// Alpha-blend an image with its top-left corner at `origin`
    pub fn blit(&mut self, image: &RgbaImage, origin: Vec2) {
        let ox = origin.x.round() as i64;
        let oy = origin.y.round() as i64;
        for (x, y, px) in image.enumerate_pixels() {
            self.blend(ox + i64::from(x), oy + i64::from(y), px.0);
        }
        self.revision += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const WHITE: [u8; 4] = [255, 255, 255, 255];
    const RED: [u8; 4] = [255, 0, 0, 255];

    #[test]
    fn test_new_canvas_is_filled() {
        let canvas = Canvas::new(4, 3, WHITE);
        assert_eq!(canvas.pixels().len(), 48);
        assert_eq!(canvas.pixel(3, 2), Some(WHITE));
        assert_eq!(canvas.pixel(4, 0), None);
    }

    #[test]
    fn test_stroke_has_round_caps() {
        let mut canvas = Canvas::new(100, 100, WHITE);
        canvas.stroke_line(Vec2::new(20.0, 50.0), Vec2::new(80.0, 50.0), 16.0, RED);
        assert_eq!(canvas.pixel(50, 50), Some(RED));
        // inside the cap beyond the end point
        assert_eq!(canvas.pixel(85, 50), Some(RED));
        // corner of a square cap stays white
        assert_eq!(canvas.pixel(87, 57), Some(WHITE));
        assert_eq!(canvas.pixel(50, 60), Some(WHITE));
    }

    #[test]
    fn test_revision_bumps() {
        let mut canvas = Canvas::new(10, 10, WHITE);
        let r0 = canvas.revision();
        canvas.fill_circle(Vec2::new(5.0, 5.0), 2.0, RED);
        assert!(canvas.revision() > r0);
    }

    #[test]
    fn test_polygon_fill() {
        let mut canvas = Canvas::new(20, 20, WHITE);
        let square = [
            Vec2::new(5.0, 5.0),
            Vec2::new(15.0, 5.0),
            Vec2::new(15.0, 15.0),
            Vec2::new(5.0, 15.0),
        ];
        canvas.fill_polygon(&square, RED);
        assert_eq!(canvas.pixel(10, 10), Some(RED));
        assert_eq!(canvas.pixel(5, 5), Some(RED));
        assert_eq!(canvas.pixel(15, 10), Some(WHITE));
        assert_eq!(canvas.pixel(2, 2), Some(WHITE));
    }

    #[test]
    fn test_blit_respects_alpha() {
        let mut canvas = Canvas::new(4, 4, WHITE);
        let mut img = RgbaImage::new(2, 1);
        img.put_pixel(0, 0, image::Rgba(RED));
        img.put_pixel(1, 0, image::Rgba([0, 0, 255, 0]));
        canvas.blit(&img, Vec2::new(1.0, 1.0));
        assert_eq!(canvas.pixel(1, 1), Some(RED));
        assert_eq!(canvas.pixel(2, 1), Some(WHITE));
    }

    #[test]
    fn test_drawing_off_canvas_is_ignored() {
        let mut canvas = Canvas::new(10, 10, WHITE);
        canvas.stroke_line(Vec2::new(-50.0, -50.0), Vec2::new(-40.0, -40.0), 4.0, RED);
        assert!(canvas.pixels().chunks_exact(4).all(|px| px == WHITE));
    }

    proptest! {
        #[test]
        fn prop_clear_paints_every_pixel(
            strokes in proptest::collection::vec(
                (0.0f32..64.0, 0.0f32..48.0, 0.0f32..64.0, 0.0f32..48.0),
                0..8,
            ),
        ) {
            let mut canvas = Canvas::new(64, 48, WHITE);
            for (ax, ay, bx, by) in strokes {
                canvas.stroke_line(Vec2::new(ax, ay), Vec2::new(bx, by), 8.0, RED);
            }
            canvas.clear(WHITE);
            prop_assert!(canvas.pixels().chunks_exact(4).all(|px| px == WHITE));
        }
    }
}
