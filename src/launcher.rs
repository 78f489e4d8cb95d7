//! Game selection grid and the launcher/game session around it

use std::sync::Arc;

use glam::Vec2;

use crate::assets::{AssetCache, ImageId, Sprite};
use crate::audio::{SoundPlayer, SynthError};
use crate::consts::{ICON_SIZE, SCREEN_HEIGHT, SCREEN_WIDTH};
use crate::games::ui::{Button, ButtonResponse};
use crate::games::{Game, GameContext, GameKind, InputEvent, Key, run_frame};
use crate::renderer::{Frame, colors, darken, shapes};
use crate::sim::Rect;
use crate::{Settings, seed_or_clock};

const MAX_COLUMNS: usize = 4;
const TILE_SPACING: f32 = 40.0;
/// Room under each tile for its label
const LABEL_HEIGHT: f32 = 30.0;
const TILE_RADIUS: f32 = 20.0;
/// Custom icons cover this share of the tile
const ICON_SCALE: f32 = 0.6;

/// Tile rectangles for `count` games: up to four columns, centered, nudged
/// down to leave room for the title
pub fn tile_rects(count: usize) -> Vec<Rect> {
    if count == 0 {
        return Vec::new();
    }
    let cols = count.min(MAX_COLUMNS);
    let rows = count.div_ceil(cols);
    let grid_w = cols as f32 * ICON_SIZE + (cols - 1) as f32 * TILE_SPACING;
    let grid_h =
        rows as f32 * (ICON_SIZE + LABEL_HEIGHT) + (rows - 1) as f32 * TILE_SPACING;
    let start_x = ((SCREEN_WIDTH - grid_w) / 2.0).floor();
    let start_y = ((SCREEN_HEIGHT - grid_h) / 2.0).floor() + 50.0;

    (0..count)
        .map(|i| {
            let (row, col) = (i / cols, i % cols);
            Rect::new(
                start_x + col as f32 * (ICON_SIZE + TILE_SPACING),
                start_y + row as f32 * (ICON_SIZE + LABEL_HEIGHT + TILE_SPACING),
                ICON_SIZE,
                ICON_SIZE,
            )
        })
        .collect()
}

/// What the launcher wants after an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LauncherAction {
    None,
    Launch(GameKind),
    Quit,
}

#[derive(Debug, Clone)]
struct Tile {
    kind: GameKind,
    button: Button,
    color: [f32; 4],
    icon: Option<ImageId>,
}

/// Grid of big colored tiles, one per game
#[derive(Debug, Clone)]
pub struct Launcher {
    tiles: Vec<Tile>,
}

impl Launcher {
    pub fn new(assets: &AssetCache, games: &[GameKind]) -> Self {
        let tiles = games
            .iter()
            .zip(tile_rects(games.len()))
            .enumerate()
            .map(|(i, (&kind, rect))| Tile {
                kind,
                button: Button::new(rect),
                color: colors::PALETTE[i % colors::PALETTE.len()],
                icon: match assets.sprite(kind.dir(), "icon") {
                    Sprite::Custom(id) => Some(id),
                    Sprite::Procedural => None,
                },
            })
            .collect();
        Self { tiles }
    }

    pub fn handle_event(&mut self, event: &InputEvent) -> LauncherAction {
        if *event == InputEvent::Key(Key::Escape) {
            return LauncherAction::Quit;
        }
        for tile in &mut self.tiles {
            match tile.button.handle(event) {
                ButtonResponse::Clicked => return LauncherAction::Launch(tile.kind),
                ButtonResponse::Consumed => return LauncherAction::None,
                ButtonResponse::Ignored => {}
            }
        }
        LauncherAction::None
    }

    pub fn draw(&self, frame: &mut Frame) {
        frame.set_clear(colors::BACKGROUND_CREAM);
        draw_title(frame);

        for tile in &self.tiles {
            let rect = tile.button.rect;
            let color = tile.button.color(tile.color, darken(tile.color, 30));
            frame.rounded_rect(rect, TILE_RADIUS, color);
            match tile.icon {
                Some(id) => {
                    let size = ICON_SIZE * ICON_SCALE;
                    let tint = tile.button.color(colors::WHITE, darken(colors::WHITE, 30));
                    frame.image_tinted(id, Rect::from_center(rect.center(), size, size), tint);
                }
                None => draw_glyph(frame, tile.kind, rect.center(), ICON_SIZE * 0.3),
            }
            // Label underline in place of text
            frame.rounded_rect(
                Rect::new(rect.x + 30.0, rect.bottom() + 12.0, rect.w - 60.0, 8.0),
                4.0,
                darken(tile.color, 30),
            );
        }
    }
}

/// Row of palette stars across the top
fn draw_title(frame: &mut Frame) {
    let n = colors::PALETTE.len();
    let spacing = 70.0;
    let start = SCREEN_WIDTH / 2.0 - spacing * (n - 1) as f32 / 2.0;
    for (i, &color) in colors::PALETTE.iter().enumerate() {
        let center = Vec2::new(start + i as f32 * spacing, 80.0);
        frame.push(shapes::star(center, 26.0, 11.0, 5, color));
    }
}

/// White pictogram for a game without a custom icon
fn draw_glyph(frame: &mut Frame, kind: GameKind, c: Vec2, s: f32) {
    let white = colors::WHITE;
    match kind {
        GameKind::BalloonPop => {
            frame.ellipse(c - Vec2::new(0.0, s * 0.2), Vec2::new(s * 0.7, s * 0.85), white);
            frame.line(
                c + Vec2::new(0.0, s * 0.65),
                c + Vec2::new(s * 0.15, s * 1.2),
                3.0,
                white,
            );
        }
        GameKind::AnimalTouch => {
            // Paw print
            frame.ellipse(c + Vec2::new(0.0, s * 0.3), Vec2::new(s * 0.55, s * 0.45), white);
            for (dx, dy) in [(-0.6, -0.3), (-0.22, -0.7), (0.22, -0.7), (0.6, -0.3)] {
                frame.circle(c + Vec2::new(dx * s, dy * s), s * 0.2, white);
            }
        }
        GameKind::BabyPiano => {
            let w = s * 0.45;
            for i in 0..4 {
                let x = c.x - 2.0 * w + i as f32 * w;
                frame.rect(Rect::new(x + 2.0, c.y - s * 0.8, w - 4.0, s * 1.6), white);
            }
        }
        GameKind::MoleTap => {
            frame.ellipse(c + Vec2::new(0.0, s * 0.8), Vec2::new(s, s * 0.25), white);
            frame.circle(c, s * 0.6, white);
            for dx in [-0.45, 0.45] {
                frame.circle(c + Vec2::new(dx * s, -s * 0.55), s * 0.2, white);
            }
        }
        GameKind::VehicleGo => {
            frame.rounded_rect(
                Rect::new(c.x - s, c.y - s * 0.2, s * 2.0, s * 0.7),
                8.0,
                white,
            );
            frame.rounded_rect(
                Rect::new(c.x - s * 0.5, c.y - s * 0.7, s, s * 0.6),
                8.0,
                white,
            );
            for dx in [-0.55, 0.55] {
                frame.circle(c + Vec2::new(dx * s, s * 0.55), s * 0.28, white);
            }
        }
        GameKind::DrawingPad => {
            frame.line(
                c + Vec2::new(-s * 0.8, s * 0.8),
                c + Vec2::new(s * 0.6, -s * 0.6),
                s * 0.3,
                white,
            );
            frame.polygon(
                &[
                    c + Vec2::new(-s * 0.8, s * 0.8),
                    c + Vec2::new(-s * 0.9, s * 0.45),
                    c + Vec2::new(-s * 0.45, s * 0.9),
                ],
                white,
            );
        }
    }
}

/// Which screen the program starts on and where a finished game returns to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Launcher grid; games return to it
    Launcher,
    /// One game; leaving it ends the program
    Standalone(GameKind),
}

/// Launcher plus the currently running game
///
/// Each launch builds a fresh game instance. The return flag is checked in
/// [`Session::end_frame`], after the frame has been drawn.
pub struct Session {
    mode: Mode,
    assets: Arc<AssetCache>,
    seed: Option<u64>,
    max_particles: usize,
    launcher: Launcher,
    active: Option<Box<dyn Game>>,
    pending: Option<GameKind>,
    finished: bool,
}

impl Session {
    pub fn new(
        mode: Mode,
        assets: Arc<AssetCache>,
        settings: &Settings,
    ) -> Result<Self, SynthError> {
        let launcher = Launcher::new(&assets, &GameKind::ALL);
        let mut session = Self {
            mode,
            assets,
            seed: settings.seed,
            max_particles: settings.max_particles(),
            launcher,
            active: None,
            pending: None,
            finished: false,
        };
        if let Mode::Standalone(kind) = mode {
            session.launch(kind)?;
        }
        Ok(session)
    }

    /// Start `kind`, replacing whatever was running
    pub fn launch(&mut self, kind: GameKind) -> Result<(), SynthError> {
        if let Some(mut old) = self.active.take() {
            old.on_exit();
        }
        let ctx = GameContext::new(
            Arc::clone(&self.assets),
            seed_or_clock(self.seed),
            self.max_particles,
        );
        let mut game = kind.create(&ctx)?;
        game.on_enter();
        log::info!("Launched {}", kind.name());
        self.active = Some(game);
        Ok(())
    }

    /// True once the program should exit
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Input, update and draw for whichever screen is showing
    pub fn frame<'a>(
        &'a mut self,
        events: &[InputEvent],
        dt: f32,
        audio: &mut dyn SoundPlayer,
        frame: &mut Frame<'a>,
    ) {
        match self.active.as_deref_mut() {
            Some(game) => run_frame(game, events, dt, audio, frame),
            None => {
                for event in events {
                    match self.launcher.handle_event(event) {
                        LauncherAction::Launch(kind) => {
                            self.pending = Some(kind);
                            break;
                        }
                        LauncherAction::Quit => {
                            self.finished = true;
                            break;
                        }
                        LauncherAction::None => {}
                    }
                }
                self.launcher.draw(frame);
            }
        }
    }

    /// Apply screen changes requested during the frame
    pub fn end_frame(&mut self) -> Result<(), SynthError> {
        if let Some(kind) = self.pending.take() {
            self.launch(kind)?;
        }

        let returning = self.active.as_ref().is_some_and(|g| g.return_requested());
        if returning {
            if let Some(mut game) = self.active.take() {
                game.on_exit();
                log::info!("Left {}", game.kind().name());
            }
            if matches!(self.mode, Mode::Standalone(_)) {
                self.finished = true;
            }
        }
        Ok(())
    }
}
