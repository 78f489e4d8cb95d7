//! Mini-games
//!
//! Every game is a screen implementing [`Game`]. The app (or the launcher)
//! translates platform input into [`InputEvent`]s and runs one
//! [`run_frame`] per tick: events, then `update(dt)`, then `draw`.

pub mod animal_touch;
pub mod baby_piano;
pub mod balloon_pop;
pub mod drawing_pad;
pub mod mole_tap;
pub mod ui;
pub mod vehicle_go;

use std::sync::Arc;

use glam::Vec2;

use crate::assets::{AssetCache, AssetManifest};
use crate::audio::{SoundPlayer, SynthError};
use crate::renderer::Frame;

/// Keys the games react to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Escape,
    Left,
    Right,
    Space,
    /// Number row, 0-9
    Digit(u8),
}

/// Platform-independent input in logical screen coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    PointerDown(Vec2),
    PointerUp(Vec2),
    PointerMove(Vec2),
    Key(Key),
}

/// A mini-game screen
pub trait Game {
    fn kind(&self) -> GameKind;

    /// Called when the screen becomes active
    fn on_enter(&mut self) {}

    /// Called when the screen is left
    fn on_exit(&mut self) {}

    fn handle_event(&mut self, event: &InputEvent, audio: &mut dyn SoundPlayer);

    fn update(&mut self, dt: f32, audio: &mut dyn SoundPlayer);

    fn draw<'a>(&'a self, frame: &mut Frame<'a>);

    /// Whether the game asked to go back to the launcher
    fn return_requested(&self) -> bool;
}

/// Shared per-game construction inputs
#[derive(Debug, Clone)]
pub struct GameContext {
    pub assets: Arc<AssetCache>,
    pub seed: u64,
    pub max_particles: usize,
}

impl GameContext {
    pub fn new(assets: Arc<AssetCache>, seed: u64, max_particles: usize) -> Self {
        Self {
            assets,
            seed,
            max_particles,
        }
    }
}

/// The game catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameKind {
    BalloonPop,
    AnimalTouch,
    BabyPiano,
    MoleTap,
    VehicleGo,
    DrawingPad,
}

impl GameKind {
    /// Launcher order
    pub const ALL: [GameKind; 6] = [
        GameKind::BalloonPop,
        GameKind::AnimalTouch,
        GameKind::BabyPiano,
        GameKind::MoleTap,
        GameKind::VehicleGo,
        GameKind::DrawingPad,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            GameKind::BalloonPop => "Balloon Pop",
            GameKind::AnimalTouch => "Animal Touch",
            GameKind::BabyPiano => "Baby Piano",
            GameKind::MoleTap => "Mole Tap",
            GameKind::VehicleGo => "Vehicle Go",
            GameKind::DrawingPad => "Drawing Pad",
        }
    }

    /// Asset directory name
    pub fn dir(&self) -> &'static str {
        match self {
            GameKind::BalloonPop => "balloon_pop",
            GameKind::AnimalTouch => "animal_touch",
            GameKind::BabyPiano => "baby_piano",
            GameKind::MoleTap => "mole_tap",
            GameKind::VehicleGo => "vehicle_go",
            GameKind::DrawingPad => "drawing_pad",
        }
    }

    pub fn manifest(&self) -> AssetManifest {
        match self {
            GameKind::BalloonPop => balloon_pop::MANIFEST,
            GameKind::AnimalTouch => animal_touch::MANIFEST,
            GameKind::BabyPiano => baby_piano::MANIFEST,
            GameKind::MoleTap => mole_tap::MANIFEST,
            GameKind::VehicleGo => vehicle_go::MANIFEST,
            GameKind::DrawingPad => drawing_pad::MANIFEST,
        }
    }

    /// Fresh game instance
    pub fn create(&self, ctx: &GameContext) -> Result<Box<dyn Game>, SynthError> {
        Ok(match self {
            GameKind::BalloonPop => Box::new(balloon_pop::BalloonPop::new(ctx)?),
            GameKind::AnimalTouch => Box::new(animal_touch::AnimalTouch::new(ctx)?),
            GameKind::BabyPiano => Box::new(baby_piano::BabyPiano::new(ctx)?),
            GameKind::MoleTap => Box::new(mole_tap::MoleTap::new(ctx)?),
            GameKind::VehicleGo => Box::new(vehicle_go::VehicleGo::new(ctx)?),
            GameKind::DrawingPad => Box::new(drawing_pad::DrawingPad::new(ctx)?),
        })
    }
}

/// Manifests of every game, for loading the asset cache once
pub fn all_manifests() -> Vec<AssetManifest> {
    GameKind::ALL.iter().map(GameKind::manifest).collect()
}

/// One tick: input, simulation, drawing
pub fn run_frame<'a>(
    game: &'a mut dyn Game,
    events: &[InputEvent],
    dt: f32,
    audio: &mut dyn SoundPlayer,
    frame: &mut Frame<'a>,
) {
    for event in events {
        game.handle_event(event, audio);
    }
    game.update(dt, audio);
    let game: &'a dyn Game = game;
    game.draw(frame);
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;

    pub const SEED: u64 = 42;

    pub fn context() -> GameContext {
        GameContext::new(Arc::new(AssetCache::empty()), SEED, 1000)
    }

    pub fn down(x: f32, y: f32) -> InputEvent {
        InputEvent::PointerDown(Vec2::new(x, y))
    }

    pub fn up(x: f32, y: f32) -> InputEvent {
        InputEvent::PointerUp(Vec2::new(x, y))
    }

    /// Press and release at one point
    pub fn tap(game: &mut dyn Game, audio: &mut dyn SoundPlayer, x: f32, y: f32) {
        game.handle_event(&down(x, y), audio);
        game.handle_event(&up(x, y), audio);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::testing::RecordingPlayer;

    #[test]
    fn test_every_game_builds_and_draws() {
        let ctx = testing::context();
        let mut audio = RecordingPlayer::default();
        for kind in GameKind::ALL {
            let mut game = kind.create(&ctx).unwrap();
            assert_eq!(game.kind(), kind);
            game.on_enter();
            let mut frame = Frame::default();
            run_frame(game.as_mut(), &[], 1.0 / 60.0, &mut audio, &mut frame);
            assert!(!frame.is_empty(), "{} drew nothing", kind.name());
        }
    }

    #[test]
    fn test_escape_requests_return() {
        let ctx = testing::context();
        let mut audio = RecordingPlayer::default();
        // The piano backs out through its modes; from free play one press is enough
        for kind in GameKind::ALL {
            let mut game = kind.create(&ctx).unwrap();
            game.on_enter();
            game.handle_event(&InputEvent::Key(Key::Escape), &mut audio);
            assert!(game.return_requested(), "{}", kind.name());
        }
    }

    #[test]
    fn test_back_button_requests_return() {
        let ctx = testing::context();
        let mut audio = RecordingPlayer::default();
        for kind in GameKind::ALL {
            let mut game = kind.create(&ctx).unwrap();
            game.on_enter();
            testing::tap(game.as_mut(), &mut audio, 50.0, 50.0);
            assert!(game.return_requested(), "{}", kind.name());
        }
    }

    #[test]
    fn test_manifest_dirs_match() {
        for kind in GameKind::ALL {
            assert_eq!(kind.manifest().game, kind.dir());
        }
    }
}
