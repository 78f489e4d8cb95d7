//! Drawing Pad: free-hand pen strokes and stamps on a white canvas
//!
//! Tool state (pen color and size, or a stamp) is independent of the stroke
//! state (down, dragging, up). Strokes are painted into a [`Canvas`] that
//! the renderer uploads as a texture.

use glam::Vec2;
use image::RgbaImage;
use image::imageops::{self, FilterType};

use super::ui::{BackButton, ButtonResponse};
use super::{Game, GameContext, GameKind, InputEvent, Key};
use crate::assets::{AssetManifest, Sound, Sprite};
use crate::audio::{Clip, SoundPlayer, SynthError, synth};
use crate::consts::{SCREEN_HEIGHT, SCREEN_WIDTH};
use crate::renderer::canvas::to_rgba8;
use crate::renderer::{Canvas, Frame, colors, rgb, shapes};
use crate::sim::Rect;

pub const MANIFEST: AssetManifest = AssetManifest {
    game: "drawing_pad",
    images: &["icon", "star", "heart", "flower"],
    sounds: &["pop", "sparkle"],
};

const HEADER_HEIGHT: f32 = 70.0;
const TOOLBAR_HEIGHT: f32 = 110.0;
const CANVAS_MARGIN: f32 = 10.0;

pub const PEN_SIZES: [f32; 3] = [8.0, 16.0, 24.0];
const TOOL_SIZE: f32 = 50.0;
const TOOL_SPACING: f32 = 8.0;
const PALETTE_X: f32 = 30.0;
/// Half-size of a stamp on the canvas
const STAMP_SIZE: f32 = 40.0;

const BACKGROUND: [f32; 4] = rgb(245, 245, 250);
const PANEL: [f32; 4] = rgb(230, 230, 240);
const CANVAS_BORDER: [f32; 4] = rgb(200, 200, 200);
const CLEAR_FILL: [f32; 4] = rgb(220, 100, 100);
const CLEAR_BORDER: [f32; 4] = rgb(180, 80, 80);
const SELECTED_BORDER: [f32; 4] = rgb(50, 50, 50);
const IDLE_BORDER: [f32; 4] = rgb(150, 150, 150);
const SELECTED_FILL: [f32; 4] = rgb(200, 200, 210);
const IDLE_FILL: [f32; 4] = rgb(240, 240, 245);
const PAPER: [u8; 4] = [255, 255, 255, 255];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StampKind {
    Star,
    Heart,
    Flower,
}

impl StampKind {
    pub const ALL: [StampKind; 3] = [StampKind::Star, StampKind::Heart, StampKind::Flower];

    pub fn key(&self) -> &'static str {
        match self {
            StampKind::Star => "star",
            StampKind::Heart => "heart",
            StampKind::Flower => "flower",
        }
    }

    /// Filled pieces making up the stamp, `size` being its half-extent
    fn pieces(&self, center: Vec2, size: f32, color: [f32; 4]) -> Vec<Piece> {
        let (x, y) = (center.x, center.y);
        match self {
            StampKind::Star => vec![Piece::Polygon(
                shapes::star_points(center, size, size * 0.4, 5),
                color,
            )],
            StampKind::Heart => {
                let r = size * 0.5;
                vec![
                    Piece::Circle(Vec2::new(x - r * 0.5, y - r * 0.3), r, color),
                    Piece::Circle(Vec2::new(x + r * 0.5, y - r * 0.3), r, color),
                    Piece::Polygon(
                        vec![
                            Vec2::new(x - size, y),
                            Vec2::new(x + size, y),
                            Vec2::new(x, y + size * 1.2),
                        ],
                        color,
                    ),
                ]
            }
            StampKind::Flower => {
                let petal = size * 0.5;
                let mut pieces: Vec<Piece> = (0..5)
                    .map(|i| {
                        let angle = ((i * 72 - 90) as f32).to_radians();
                        Piece::Circle(center + Vec2::from_angle(angle) * petal, petal, color)
                    })
                    .collect();
                let middle = if color == colors::YELLOW {
                    colors::ORANGE
                } else {
                    colors::YELLOW
                };
                pieces.push(Piece::Circle(center, size * 0.3, middle));
                pieces
            }
        }
    }
}

/// A filled primitive that can go to the canvas or to a frame
#[derive(Debug, Clone, PartialEq)]
enum Piece {
    Circle(Vec2, f32, [f32; 4]),
    Polygon(Vec<Vec2>, [f32; 4]),
}

impl Piece {
    fn paint(&self, canvas: &mut Canvas) {
        match self {
            Piece::Circle(c, r, color) => canvas.fill_circle(*c, *r, to_rgba8(*color)),
            Piece::Polygon(points, color) => canvas.fill_polygon(points, to_rgba8(*color)),
        }
    }

    fn draw(&self, frame: &mut Frame) {
        match self {
            Piece::Circle(c, r, color) => frame.circle(*c, *r, *color),
            Piece::Polygon(points, color) => frame.polygon(points, *color),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tool {
    /// Pen with palette color index and size index
    Pen { color: usize, size: usize },
    /// Stamp in the pen's last color
    Stamp { stamp: usize, color: usize, size: usize },
}

impl Tool {
    fn color(&self) -> usize {
        match *self {
            Tool::Pen { color, .. } | Tool::Stamp { color, .. } => color,
        }
    }

    fn size(&self) -> usize {
        match *self {
            Tool::Pen { size, .. } | Tool::Stamp { size, .. } => size,
        }
    }
}

/// Toolbar element under the pointer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolbarHit {
    Clear,
    Color(usize),
    Size(usize),
    Stamp(usize),
}

/// Fixed screen layout
#[derive(Debug, Clone)]
pub struct Layout {
    pub canvas: Rect,
    pub colors: Vec<Rect>,
    pub sizes: Vec<Rect>,
    pub stamps: Vec<Rect>,
    pub clear: Rect,
}

impl Layout {
    pub fn new() -> Self {
        let toolbar_y = SCREEN_HEIGHT - TOOLBAR_HEIGHT + 10.0;
        let row = |start_x: f32, count: usize| -> Vec<Rect> {
            (0..count)
                .map(|i| {
                    Rect::new(
                        start_x + i as f32 * (TOOL_SIZE + TOOL_SPACING),
                        toolbar_y + 5.0,
                        TOOL_SIZE,
                        TOOL_SIZE,
                    )
                })
                .collect()
        };
        let palette = colors::PALETTE.len();
        let palette_w = palette as f32 * TOOL_SIZE + (palette - 1) as f32 * TOOL_SPACING;
        let sizes_x = PALETTE_X + palette_w + 40.0;
        let stamps_x = sizes_x + PEN_SIZES.len() as f32 * (TOOL_SIZE + TOOL_SPACING) + 30.0;

        Self {
            canvas: Rect::new(
                CANVAS_MARGIN,
                HEADER_HEIGHT,
                SCREEN_WIDTH - CANVAS_MARGIN * 2.0,
                SCREEN_HEIGHT - HEADER_HEIGHT - TOOLBAR_HEIGHT,
            ),
            colors: row(PALETTE_X, palette),
            sizes: row(sizes_x, PEN_SIZES.len()),
            stamps: row(stamps_x, StampKind::ALL.len()),
            clear: Rect::new(SCREEN_WIDTH - 120.0, 15.0, 100.0, 40.0),
        }
    }

    /// Toolbar hit, clear button first
    pub fn hit(&self, p: Vec2) -> Option<ToolbarHit> {
        if self.clear.contains(p) {
            return Some(ToolbarHit::Clear);
        }
        let find = |rects: &[Rect]| rects.iter().position(|r| r.contains(p));
        find(self.colors.as_slice())
            .map(ToolbarHit::Color)
            .or_else(|| find(self.sizes.as_slice()).map(ToolbarHit::Size))
            .or_else(|| find(self.stamps.as_slice()).map(ToolbarHit::Stamp))
    }

    /// Screen point to canvas pixel space, if on the canvas
    pub fn to_canvas(&self, p: Vec2) -> Option<Vec2> {
        self.canvas.contains(p).then(|| p - self.canvas.min())
    }
}

impl Default for Layout {
    fn default() -> Self {
        Self::new()
    }
}

pub struct DrawingPad {
    layout: Layout,
    canvas: Canvas,
    tool: Tool,
    /// Last canvas point of the stroke in progress
    stroke: Option<Vec2>,
    /// Toolbar element held down, selected on release over it
    pressed_tool: Option<ToolbarHit>,
    /// Custom stamp pictures, pre-scaled for the canvas
    stamp_images: [Option<RgbaImage>; 3],
    stamp_sprites: [Sprite; 3],
    click: Sound,
    sparkle: Sound,
    back: BackButton,
    quit: bool,
}

impl DrawingPad {
    pub fn new(ctx: &GameContext) -> Result<Self, SynthError> {
        let click = ctx.assets.sound(MANIFEST.game, "pop", || {
            Clip::synthesize("pop", &synth::brush_click(ctx.seed))
        })?;
        let sparkle = ctx.assets.sound(MANIFEST.game, "sparkle", || {
            Clip::synthesize("sparkle", &synth::sparkle())
        })?;

        let stamp_sprites = StampKind::ALL.map(|s| ctx.assets.sprite(MANIFEST.game, s.key()));
        let side = (STAMP_SIZE * 2.0) as u32;
        let stamp_images = stamp_sprites.map(|sprite| match sprite {
            Sprite::Custom(id) => ctx
                .assets
                .image(id)
                .map(|img| imageops::resize(img, side, side, FilterType::Triangle)),
            Sprite::Procedural => None,
        });

        let layout = Layout::new();
        let canvas = Canvas::new(layout.canvas.w as u32, layout.canvas.h as u32, PAPER);
        Ok(Self {
            layout,
            canvas,
            tool: Tool::Pen { color: 0, size: 1 },
            stroke: None,
            pressed_tool: None,
            stamp_images,
            stamp_sprites,
            click,
            sparkle,
            back: BackButton::at(20.0, 15.0),
            quit: false,
        })
    }

    fn pen_color(&self) -> [f32; 4] {
        colors::PALETTE[self.tool.color()]
    }

    fn pen_width(&self) -> f32 {
        PEN_SIZES[self.tool.size()]
    }

    fn select(&mut self, hit: ToolbarHit, audio: &mut dyn SoundPlayer) {
        let (color, size) = (self.tool.color(), self.tool.size());
        match hit {
            ToolbarHit::Clear => {
                self.canvas.clear(PAPER);
                audio.play(self.sparkle.clip());
                return;
            }
            ToolbarHit::Color(color) => self.tool = Tool::Pen { color, size },
            ToolbarHit::Size(size) => self.tool = Tool::Pen { color, size },
            ToolbarHit::Stamp(stamp) => self.tool = Tool::Stamp { stamp, color, size },
        }
        audio.play(self.click.clip());
    }

    fn stamp(&mut self, stamp: usize, at: Vec2, audio: &mut dyn SoundPlayer) {
        match &self.stamp_images[stamp] {
            Some(image) => self.canvas.blit(image, at - Vec2::splat(STAMP_SIZE)),
            None => {
                let color = self.pen_color();
                for piece in StampKind::ALL[stamp].pieces(at, STAMP_SIZE, color) {
                    piece.paint(&mut self.canvas);
                }
            }
        }
        audio.play(self.sparkle.clip());
    }

    fn pointer_down(&mut self, p: Vec2, audio: &mut dyn SoundPlayer) {
        if let Some(hit) = self.layout.hit(p) {
            self.pressed_tool = Some(hit);
            return;
        }
        let Some(at) = self.layout.to_canvas(p) else {
            return;
        };
        match self.tool {
            Tool::Stamp { stamp, .. } => self.stamp(stamp, at, audio),
            Tool::Pen { .. } => {
                let color = to_rgba8(self.pen_color());
                self.canvas.fill_circle(at, self.pen_width() / 2.0, color);
                self.stroke = Some(at);
                audio.play(self.click.clip());
            }
        }
    }

    fn pointer_up(&mut self, p: Vec2, audio: &mut dyn SoundPlayer) {
        self.stroke = None;
        if let Some(pressed) = self.pressed_tool.take() {
            if self.layout.hit(p) == Some(pressed) {
                self.select(pressed, audio);
            }
        }
    }

    fn pointer_move(&mut self, p: Vec2) {
        let (Some(last), Tool::Pen { .. }) = (self.stroke, self.tool) else {
            return;
        };
        let Some(at) = self.layout.to_canvas(p) else {
            return;
        };
        let color = to_rgba8(self.pen_color());
        self.canvas.stroke_line(last, at, self.pen_width(), color);
        self.stroke = Some(at);
    }

    fn draw_tool(frame: &mut Frame, rect: Rect, fill: [f32; 4], selected: bool) {
        let (border, width) = if selected {
            (SELECTED_BORDER, 4.0)
        } else {
            (IDLE_BORDER, 2.0)
        };
        frame.rounded_rect(rect, 8.0, border);
        frame.rounded_rect(rect.inflate(-width), 8.0 - width / 2.0, fill);
    }

    fn draw_toolbar(&self, frame: &mut Frame) {
        frame.rect(
            Rect::new(0.0, SCREEN_HEIGHT - TOOLBAR_HEIGHT, SCREEN_WIDTH, TOOLBAR_HEIGHT),
            PANEL,
        );

        let (pen_color, pen_size, stamp) = match self.tool {
            Tool::Pen { color, size } => (Some(color), Some(size), None),
            Tool::Stamp { stamp, .. } => (None, None, Some(stamp)),
        };

        for (i, rect) in self.layout.colors.iter().enumerate() {
            Self::draw_tool(frame, *rect, colors::PALETTE[i], pen_color == Some(i));
        }

        for (i, rect) in self.layout.sizes.iter().enumerate() {
            let selected = pen_size == Some(i);
            let fill = if selected { SELECTED_FILL } else { IDLE_FILL };
            Self::draw_tool(frame, *rect, fill, selected);
            frame.circle(rect.center(), PEN_SIZES[i] / 2.0, rgb(80, 80, 80));
        }

        for (i, rect) in self.layout.stamps.iter().enumerate() {
            let selected = stamp == Some(i);
            let fill = if selected { SELECTED_FILL } else { IDLE_FILL };
            Self::draw_tool(frame, *rect, fill, selected);
            match self.stamp_sprites[i] {
                Sprite::Custom(id) => frame.image(id, Rect::from_center(rect.center(), 30.0, 30.0)),
                Sprite::Procedural => {
                    let color = colors::PALETTE[i % colors::PALETTE.len()];
                    for piece in StampKind::ALL[i].pieces(rect.center(), 15.0, color) {
                        piece.draw(frame);
                    }
                }
            }
        }
    }

    fn draw_clear_button(&self, frame: &mut Frame) {
        let rect = self.layout.clear;
        frame.rounded_rect(rect, 8.0, CLEAR_BORDER);
        frame.rounded_rect(rect.inflate(-2.0), 7.0, CLEAR_FILL);
        // Sweeping cross
        let c = rect.center();
        let d = Vec2::new(10.0, 10.0);
        frame.line(c - d, c + d, 4.0, colors::WHITE);
        frame.line(c + Vec2::new(-d.x, d.y), c + Vec2::new(d.x, -d.y), 4.0, colors::WHITE);
    }
}

impl Game for DrawingPad {
    fn kind(&self) -> GameKind {
        GameKind::DrawingPad
    }

    fn on_enter(&mut self) {
        log::info!("Entered {}", self.kind().name());
    }

    fn on_exit(&mut self) {
        self.stroke = None;
        self.pressed_tool = None;
    }

    fn handle_event(&mut self, event: &InputEvent, audio: &mut dyn SoundPlayer) {
        match self.back.handle(event) {
            ButtonResponse::Clicked => {
                self.quit = true;
                return;
            }
            ButtonResponse::Consumed => return,
            ButtonResponse::Ignored => {}
        }

        match *event {
            InputEvent::Key(Key::Escape) => self.quit = true,
            InputEvent::PointerDown(p) => self.pointer_down(p, audio),
            InputEvent::PointerMove(p) => self.pointer_move(p),
            InputEvent::PointerUp(p) => self.pointer_up(p, audio),
            _ => {}
        }
    }

    fn update(&mut self, _dt: f32, _audio: &mut dyn SoundPlayer) {}

    fn draw<'a>(&'a self, frame: &mut Frame<'a>) {
        frame.set_clear(BACKGROUND);
        frame.rect(Rect::new(0.0, 0.0, SCREEN_WIDTH, HEADER_HEIGHT), PANEL);
        self.draw_clear_button(frame);

        frame.rounded_rect(self.layout.canvas.inflate(2.0), 5.0, CANVAS_BORDER);
        frame.canvas(&self.canvas, self.layout.canvas);

        self.draw_toolbar(frame);
        self.back.draw(frame);
    }

    fn return_requested(&self) -> bool {
        self.quit
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::testing::RecordingPlayer;
    use crate::games::testing::{context, down, up};
    use std::sync::Arc;

    fn game() -> DrawingPad {
        let mut game = DrawingPad::new(&context()).unwrap();
        game.on_enter();
        game
    }

    fn canvas_pixel(game: &DrawingPad, screen: Vec2) -> Option<[u8; 4]> {
        let at = game.layout.to_canvas(screen)?;
        game.canvas.pixel(at.x as u32, at.y as u32)
    }

    fn click(game: &mut DrawingPad, p: Vec2, audio: &mut RecordingPlayer) {
        game.handle_event(&down(p.x, p.y), audio);
        game.handle_event(&up(p.x, p.y), audio);
    }

    fn move_to(x: f32, y: f32) -> InputEvent {
        InputEvent::PointerMove(Vec2::new(x, y))
    }

    #[test]
    fn test_layout_matches_screen() {
        let layout = Layout::new();
        assert_eq!(layout.canvas, Rect::new(10.0, 70.0, 1004.0, 588.0));
        assert_eq!(layout.colors[0], Rect::new(30.0, 673.0, 50.0, 50.0));
        assert_eq!(layout.sizes[0].x, 30.0 + 7.0 * 50.0 + 6.0 * 8.0 + 40.0);
        // No toolbar element overlaps the canvas
        for rect in layout.colors.iter().chain(&layout.sizes).chain(&layout.stamps) {
            assert!(rect.y >= layout.canvas.bottom());
        }
    }

    #[test]
    fn test_stroke_paints_segments() {
        let mut game = game();
        let mut audio = RecordingPlayer::default();
        let red = to_rgba8(colors::PALETTE[0]);

        game.handle_event(&down(200.0, 300.0), &mut audio);
        assert!(game.stroke.is_some());
        assert_eq!(audio.count("pop"), 1);
        game.handle_event(&move_to(300.0, 300.0), &mut audio);
        game.handle_event(&up(300.0, 300.0), &mut audio);
        assert!(!game.stroke.is_some());

        assert_eq!(canvas_pixel(&game, Vec2::new(250.0, 300.0)), Some(red));
        assert_eq!(canvas_pixel(&game, Vec2::new(250.0, 330.0)), Some(PAPER));
        // Moving after release paints nothing
        game.handle_event(&move_to(400.0, 400.0), &mut audio);
        assert_eq!(canvas_pixel(&game, Vec2::new(350.0, 350.0)), Some(PAPER));
    }

    #[test]
    fn test_palette_and_size_selection() {
        let mut game = game();
        let mut audio = RecordingPlayer::default();
        let blue = game.layout.colors[3].center();
        let large = game.layout.sizes[2].center();
        click(&mut game, blue, &mut audio);
        click(&mut game, large, &mut audio);
        assert_eq!(game.tool, Tool::Pen { color: 3, size: 2 });
        assert_eq!(audio.count("pop"), 2);

        game.handle_event(&down(500.0, 400.0), &mut audio);
        let blue_px = to_rgba8(colors::PALETTE[3]);
        // 24 px pen: 11 px from the center is still inside
        assert_eq!(canvas_pixel(&game, Vec2::new(511.0, 400.0)), Some(blue_px));
    }

    #[test]
    fn test_stamp_mode_stamps_and_sparkles() {
        let mut game = game();
        let mut audio = RecordingPlayer::default();
        let star = game.layout.stamps[0].center();
        click(&mut game, star, &mut audio);
        assert!(matches!(game.tool, Tool::Stamp { stamp: 0, .. }));

        game.handle_event(&down(500.0, 350.0), &mut audio);
        assert!(!game.stroke.is_some());
        assert_eq!(audio.count("sparkle"), 1);
        let red = to_rgba8(colors::PALETTE[0]);
        assert_eq!(canvas_pixel(&game, Vec2::new(500.0, 350.0)), Some(red));
        // Beyond the tips
        assert_eq!(canvas_pixel(&game, Vec2::new(500.0 + 30.0, 350.0 + 30.0)), Some(PAPER));
    }

    #[test]
    fn test_color_pick_leaves_stamp_mode() {
        let mut game = game();
        let mut audio = RecordingPlayer::default();
        let heart = game.layout.stamps[1].center();
        let green = game.layout.colors[2].center();
        click(&mut game, heart, &mut audio);
        click(&mut game, green, &mut audio);
        assert_eq!(game.tool, Tool::Pen { color: 2, size: 1 });
    }

    #[test]
    fn test_toolbar_selects_on_release() {
        let mut game = game();
        let mut audio = RecordingPlayer::default();
        let blue = game.layout.colors[3].center();
        game.handle_event(&down(blue.x, blue.y), &mut audio);
        assert_eq!(game.tool, Tool::Pen { color: 0, size: 1 });
        assert!(audio.played.is_empty());
        game.handle_event(&up(blue.x, blue.y), &mut audio);
        assert_eq!(game.tool, Tool::Pen { color: 3, size: 1 });
        assert_eq!(audio.count("pop"), 1);
    }

    #[test]
    fn test_clear_release_elsewhere_keeps_drawing() {
        let mut game = game();
        let mut audio = RecordingPlayer::default();
        click(&mut game, Vec2::new(200.0, 300.0), &mut audio);

        let clear = game.layout.clear.center();
        game.handle_event(&down(clear.x, clear.y), &mut audio);
        game.handle_event(&up(500.0, 400.0), &mut audio);
        assert_ne!(canvas_pixel(&game, Vec2::new(200.0, 300.0)), Some(PAPER));
        assert_eq!(audio.count("sparkle"), 0);
        // Dragging off a toolbar press does not paint
        game.handle_event(&move_to(510.0, 400.0), &mut audio);
        assert_eq!(canvas_pixel(&game, Vec2::new(505.0, 400.0)), Some(PAPER));
    }

    #[test]
    fn test_clear_whitens_canvas() {
        let mut game = game();
        let mut audio = RecordingPlayer::default();
        game.handle_event(&down(200.0, 300.0), &mut audio);
        game.handle_event(&up(200.0, 300.0), &mut audio);
        assert_ne!(canvas_pixel(&game, Vec2::new(200.0, 300.0)), Some(PAPER));

        let clear = game.layout.clear.center();
        click(&mut game, clear, &mut audio);
        assert!(game.canvas.pixels().chunks_exact(4).all(|px| px == PAPER));
        assert_eq!(audio.count("sparkle"), 1);
    }

    #[test]
    fn test_custom_stamp_picture_is_blitted() {
        let mut cache = crate::assets::AssetCache::empty();
        cache.insert_image(
            MANIFEST.game,
            "heart",
            RgbaImage::from_pixel(8, 8, image::Rgba([0, 0, 255, 255])),
        );
        let mut ctx = context();
        ctx.assets = Arc::new(cache);
        let mut game = DrawingPad::new(&ctx).unwrap();
        let mut audio = RecordingPlayer::default();

        let heart = game.layout.stamps[1].center();
        click(&mut game, heart, &mut audio);
        game.handle_event(&down(500.0, 350.0), &mut audio);
        assert_eq!(
            canvas_pixel(&game, Vec2::new(500.0 + 30.0, 350.0 + 30.0)),
            Some([0, 0, 255, 255])
        );
    }

    #[test]
    fn test_down_outside_canvas_does_not_start_stroke() {
        let mut game = game();
        let mut audio = RecordingPlayer::default();
        game.handle_event(&down(500.0, 740.0), &mut audio);
        assert!(!game.stroke.is_some());
        assert!(audio.played.is_empty());
    }
}
