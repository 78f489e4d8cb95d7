//! Mole Tap: friendly animals pop out of holes, tap them
//!
//! No score and no timer. A hole goes
//! `idle -> rising -> visible -> (tapped -> bounce -> idle | timeout -> sinking -> idle)`.

use std::f32::consts::{PI, TAU};

use glam::Vec2;
use rand::Rng;

use super::ui::{BackButton, ButtonResponse};
use super::{Game, GameContext, GameKind, InputEvent, Key};
use crate::assets::{AssetManifest, Sound, Sprite};
use crate::audio::{Clip, SoundPlayer, SynthError, synth};
use crate::consts::{SCREEN_HEIGHT, SCREEN_WIDTH};
use crate::renderer::{Frame, colors, rgb, shapes};
use crate::sim::{GameRng, Particle, ParticleSystem, Rect, seeded_rng};

pub const MANIFEST: AssetManifest = AssetManifest {
    game: "mole_tap",
    images: &["icon", "rabbit", "bear", "cat", "dog", "chick", "frog"],
    sounds: &["pop", "tap"],
};

pub const GRID_COLS: usize = 3;
pub const GRID_ROWS: usize = 2;
pub const HOLE_SIZE: f32 = 140.0;
const SPACING: Vec2 = Vec2::new(180.0, 200.0);
const GRID_TOP: f32 = 200.0;

pub const MAX_ACTIVE: usize = 3;
pub const SPAWN_INTERVAL: f32 = 1.5;
const FIRST_SPAWN: f32 = 1.0;
const SHOW_TIME: (f32, f32) = (2.0, 4.0);
/// Rise rate, progress per second
const POP_SPEED: f32 = 3.0;
/// Tap bounce decay per second
const BOUNCE_SPEED: f32 = 3.0;
const BOUNCE_HEIGHT: f32 = 30.0;
/// Taps count only once the animal is this far out
const TAPPABLE_PROGRESS: f32 = 0.5;
const CHARACTER_SIZE: f32 = 100.0;

const PARTICLE_COUNT: usize = 8;
const PARTICLE_LIFETIME: f32 = 0.5;
const PARTICLE_GRAVITY: f32 = 300.0;

const GRASS: [f32; 4] = rgb(150, 200, 100);
const HOLE_SHADOW: [f32; 4] = rgb(80, 60, 40);
const HOLE_INSIDE: [f32; 4] = rgb(50, 35, 20);
const HOLE_RIM: [f32; 4] = rgb(100, 80, 50);
const FACE_FEATURE: [f32; 4] = rgb(50, 50, 50);
const CHEEK: [f32; 4] = rgb(255, 180, 180);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Ears {
    Pointed,
    Round,
    None,
}

#[derive(Debug, Clone, Copy)]
pub struct Character {
    pub key: &'static str,
    pub color: [f32; 4],
    ears: Ears,
}

pub const CHARACTERS: [Character; 6] = [
    Character { key: "rabbit", color: colors::PINK, ears: Ears::Pointed },
    Character { key: "bear", color: colors::ORANGE, ears: Ears::Round },
    Character { key: "cat", color: colors::YELLOW, ears: Ears::Pointed },
    Character { key: "dog", color: colors::BLUE, ears: Ears::Round },
    Character { key: "chick", color: colors::YELLOW, ears: Ears::None },
    Character { key: "frog", color: colors::GREEN, ears: Ears::None },
];

#[derive(Debug, Clone, PartialEq)]
pub struct Hole {
    pub center: Vec2,
    pub active: bool,
    pub character: usize,
    /// 0 = hidden, 1 = fully out
    pub pop_progress: f32,
    pub show_timer: f32,
    pub was_tapped: bool,
    /// 1 at the tap, falls to 0
    pub tap_animation: f32,
}

impl Hole {
    fn new(center: Vec2) -> Self {
        Self {
            center,
            active: false,
            character: 0,
            pop_progress: 0.0,
            show_timer: 0.0,
            was_tapped: false,
            tap_animation: 0.0,
        }
    }

    /// Area where a tap hits the animal's face
    pub fn face_rect(&self) -> Rect {
        Rect::new(self.center.x - 50.0, self.center.y - 80.0, 100.0, 100.0)
    }

    pub fn is_tappable(&self) -> bool {
        self.active && !self.was_tapped && self.pop_progress > TAPPABLE_PROGRESS
    }

    /// Advance animations; false when the animal has gone back down
    fn update(&mut self, dt: f32) -> bool {
        if self.pop_progress < 1.0 {
            self.pop_progress = (self.pop_progress + POP_SPEED * dt).min(1.0);
        }

        if self.was_tapped {
            self.tap_animation -= BOUNCE_SPEED * dt;
            return self.tap_animation > 0.0;
        }

        self.show_timer -= dt;
        if self.show_timer <= 0.0 {
            self.pop_progress -= POP_SPEED * 0.5 * dt;
            return self.pop_progress > 0.0;
        }
        true
    }
}

/// Hole centers, row-major
pub fn hole_layout() -> Vec<Vec2> {
    let grid_w = (GRID_COLS - 1) as f32 * SPACING.x;
    let start_x = ((SCREEN_WIDTH - grid_w) / 2.0).floor();
    (0..GRID_ROWS)
        .flat_map(|row| {
            (0..GRID_COLS).map(move |col| {
                Vec2::new(start_x + col as f32 * SPACING.x, GRID_TOP + row as f32 * SPACING.y)
            })
        })
        .collect()
}

pub struct MoleTap {
    holes: Vec<Hole>,
    /// Countdown to the next spawn attempt
    spawn_in: f32,
    particles: ParticleSystem,
    sprites: [Sprite; CHARACTERS.len()],
    pop: Sound,
    tap: Sound,
    back: BackButton,
    rng: GameRng,
    quit: bool,
}

impl MoleTap {
    pub fn new(ctx: &GameContext) -> Result<Self, SynthError> {
        let pop = ctx.assets.sound(MANIFEST.game, "pop", || {
            Clip::synthesize("pop", &synth::mole_pop())
        })?;
        let tap = ctx.assets.sound(MANIFEST.game, "tap", || {
            Clip::synthesize("tap", &synth::tap_chord())
        })?;
        let sprites = CHARACTERS.map(|c| ctx.assets.sprite(MANIFEST.game, c.key));
        Ok(Self {
            holes: hole_layout().into_iter().map(Hole::new).collect(),
            spawn_in: FIRST_SPAWN,
            particles: ParticleSystem::new(ctx.max_particles),
            sprites,
            pop,
            tap,
            back: BackButton::new(),
            rng: seeded_rng(ctx.seed),
            quit: false,
        })
    }

    pub fn holes(&self) -> &[Hole] {
        &self.holes
    }

    pub fn active_count(&self) -> usize {
        self.holes.iter().filter(|h| h.active).count()
    }

    pub fn particles(&self) -> &ParticleSystem {
        &self.particles
    }

    fn spawn_character(&mut self, audio: &mut dyn SoundPlayer) {
        let idle: Vec<usize> = (0..self.holes.len())
            .filter(|&i| !self.holes[i].active)
            .collect();
        if idle.is_empty() {
            return;
        }
        let index = idle[self.rng.random_range(0..idle.len())];
        let character = self.rng.random_range(0..CHARACTERS.len());
        let show_timer = self.rng.random_range(SHOW_TIME.0..SHOW_TIME.1);

        let hole = &mut self.holes[index];
        hole.active = true;
        hole.character = character;
        hole.pop_progress = 0.0;
        hole.show_timer = show_timer;
        hole.was_tapped = false;
        hole.tap_animation = 0.0;

        log::debug!("{} pops out of hole {index}", CHARACTERS[character].key);
        audio.play(self.pop.clip());
    }

    fn tap_at(&mut self, p: Vec2, audio: &mut dyn SoundPlayer) {
        let Some(hole) = self
            .holes
            .iter_mut()
            .find(|h| h.is_tappable() && h.face_rect().contains(p))
        else {
            return;
        };
        hole.was_tapped = true;
        hole.tap_animation = 1.0;
        let origin = hole.center - Vec2::new(0.0, 40.0);
        let color = CHARACTERS[hole.character].color;

        for _ in 0..PARTICLE_COUNT {
            let angle = self.rng.random_range(0.0..TAU);
            let speed = self.rng.random_range(100.0..200.0);
            let size = self.rng.random_range(8.0..15.0);
            self.particles.spawn(
                Particle::new(origin, Vec2::from_angle(angle) * speed, color, size)
                    .with_lifetime(PARTICLE_LIFETIME)
                    .with_gravity(PARTICLE_GRAVITY),
            );
        }
        audio.play(self.tap.clip());
    }

    fn draw_background(frame: &mut Frame) {
        frame.set_clear(GRASS);
        let mut y = 0.0;
        while y < SCREEN_HEIGHT {
            let a = (50.0 - y / SCREEN_HEIGHT * 50.0) / 255.0;
            let band = [130.0 / 255.0 + a, 180.0 / 255.0 + a, 80.0 / 255.0 + a, 1.0];
            frame.rect(Rect::new(0.0, y, SCREEN_WIDTH, 20.0), band);
            y += 20.0;
        }
    }

    fn draw_hole(&self, frame: &mut Frame, hole: &Hole) {
        let c = hole.center;
        let (w, h) = (HOLE_SIZE, HOLE_SIZE / 3.0);
        let opening = Vec2::new(c.x, c.y + 25.0 + h / 2.0);

        frame.ellipse(opening, Vec2::new(w / 2.0 + 5.0, h / 2.0 + 5.0), HOLE_SHADOW);
        frame.ellipse(opening, Vec2::new(w / 2.0, h / 2.0), HOLE_INSIDE);

        if hole.active {
            let mut y = c.y;
            if hole.was_tapped && hole.tap_animation > 0.0 {
                y -= (hole.tap_animation * PI).sin() * BOUNCE_HEIGHT;
            }
            self.draw_character(frame, hole.character, Vec2::new(c.x, y), hole.pop_progress);
        }

        frame.ellipse_outline(opening, Vec2::new(w / 2.0, h / 2.0), 4.0, HOLE_RIM);
    }

    fn draw_character(&self, frame: &mut Frame, index: usize, at: Vec2, progress: f32) {
        let size = CHARACTER_SIZE;
        let visible = size * progress.min(1.0);
        if visible <= 0.0 {
            return;
        }

        if let Sprite::Custom(id) = self.sprites[index] {
            let rect = Rect::new(
                at.x - size / 2.0,
                at.y - visible + size / 4.0,
                size,
                visible,
            );
            frame.image(id, rect);
            return;
        }

        if visible <= size * 0.3 {
            return;
        }
        let character = &CHARACTERS[index];
        let face = size * 0.8;
        let x = at.x;
        let face_y = at.y - visible / 2.0 + size / 4.0;
        let color = character.color;

        match character.ears {
            Ears::Pointed => {
                for side in [-1.0, 1.0] {
                    frame.polygon(
                        &[
                            Vec2::new(x + side * face * 0.3, face_y - face * 0.3),
                            Vec2::new(x + side * face * 0.4, face_y - face * 0.7),
                            Vec2::new(x + side * face * 0.15, face_y - face * 0.4),
                        ],
                        color,
                    );
                }
            }
            Ears::Round => {
                for side in [-1.0, 1.0] {
                    frame.circle(
                        Vec2::new(x + side * face * 0.35, face_y - face * 0.35),
                        face * 0.15,
                        color,
                    );
                }
            }
            Ears::None => {}
        }

        frame.circle(Vec2::new(x, face_y), face / 2.0, color);

        let eye_y = face_y - face * 0.1;
        for side in [-1.0, 1.0] {
            let eye = Vec2::new(x + side * face * 0.2, eye_y);
            frame.circle(eye, 6.0, FACE_FEATURE);
            frame.circle(eye - Vec2::splat(2.0), 2.0, colors::WHITE);
            frame.circle(Vec2::new(x + side * face * 0.3, face_y + face * 0.05), 5.0, CHEEK);
        }

        let mouth = Vec2::new(x, face_y + face * 0.15);
        frame.push(shapes::arc(
            mouth,
            face * 0.2 - 2.0,
            face * 0.2,
            0.0,
            PI,
            FACE_FEATURE,
            16,
        ));
    }
}

impl Game for MoleTap {
    fn kind(&self) -> GameKind {
        GameKind::MoleTap
    }

    fn on_enter(&mut self) {
        log::info!("Entered {}", self.kind().name());
    }

    fn on_exit(&mut self) {
        self.particles.clear();
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
            InputEvent::PointerDown(p) => self.tap_at(p, audio),
            _ => {}
        }
    }

    fn update(&mut self, dt: f32, audio: &mut dyn SoundPlayer) {
        self.spawn_in -= dt;
        if self.spawn_in <= 0.0 && self.active_count() < MAX_ACTIVE {
            self.spawn_character(audio);
            self.spawn_in = SPAWN_INTERVAL;
        }

        for hole in self.holes.iter_mut().filter(|h| h.active) {
            if !hole.update(dt) {
                hole.active = false;
            }
        }

        self.particles.update(dt);
    }

    fn draw<'a>(&'a self, frame: &mut Frame<'a>) {
        Self::draw_background(frame);
        for hole in &self.holes {
            self.draw_hole(frame, hole);
        }
        frame.particles(&self.particles);
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
    use crate::games::testing::{context, down};

    const DT: f32 = 1.0 / 60.0;

    fn game() -> MoleTap {
        let mut game = MoleTap::new(&context()).unwrap();
        game.on_enter();
        game
    }

    fn run(game: &mut MoleTap, audio: &mut RecordingPlayer, seconds: f32) {
        let steps = (seconds / DT).round() as usize;
        for _ in 0..steps {
            game.update(DT, audio);
        }
    }

    fn show(game: &mut MoleTap, index: usize, progress: f32) {
        let hole = &mut game.holes[index];
        hole.active = true;
        hole.character = 0;
        hole.pop_progress = progress;
        hole.show_timer = 3.0;
        hole.was_tapped = false;
        hole.tap_animation = 0.0;
    }

    #[test]
    fn test_layout_is_centered_three_by_two() {
        let centers = hole_layout();
        assert_eq!(centers.len(), 6);
        assert_eq!(centers[0], Vec2::new(332.0, 200.0));
        assert_eq!(centers[2], Vec2::new(692.0, 200.0));
        assert_eq!(centers[5], Vec2::new(692.0, 400.0));
    }

    #[test]
    fn test_first_spawn_after_one_second() {
        let mut game = game();
        let mut audio = RecordingPlayer::default();
        run(&mut game, &mut audio, 0.9);
        assert_eq!(game.active_count(), 0);
        run(&mut game, &mut audio, 0.2);
        assert_eq!(game.active_count(), 1);
        assert_eq!(audio.count("pop"), 1);
    }

    #[test]
    fn test_never_more_than_max_active() {
        let mut game = game();
        let mut audio = RecordingPlayer::default();
        for _ in 0..(30.0 / DT) as usize {
            game.update(DT, &mut audio);
            assert!(game.active_count() <= MAX_ACTIVE);
        }
        assert!(audio.count("pop") > 3);
    }

    #[test]
    fn test_tap_needs_half_risen_animal() {
        let mut game = game();
        let mut audio = RecordingPlayer::default();
        show(&mut game, 0, 0.4);
        let face = game.holes()[0].face_rect().center();

        game.handle_event(&down(face.x, face.y), &mut audio);
        assert!(!game.holes()[0].was_tapped);
        assert!(audio.played.is_empty());

        game.holes[0].pop_progress = 0.6;
        game.handle_event(&down(face.x, face.y), &mut audio);
        assert!(game.holes()[0].was_tapped);
        assert_eq!(game.holes()[0].tap_animation, 1.0);
        assert_eq!(audio.count("tap"), 1);
        assert_eq!(game.particles().len(), PARTICLE_COUNT);
    }

    #[test]
    fn test_second_tap_is_ignored() {
        let mut game = game();
        let mut audio = RecordingPlayer::default();
        show(&mut game, 1, 1.0);
        let face = game.holes()[1].face_rect().center();
        game.handle_event(&down(face.x, face.y), &mut audio);
        game.handle_event(&down(face.x, face.y), &mut audio);
        assert_eq!(audio.count("tap"), 1);
    }

    #[test]
    fn test_tap_outside_face_misses() {
        let mut game = game();
        let mut audio = RecordingPlayer::default();
        show(&mut game, 0, 1.0);
        let face = game.holes()[0].face_rect();
        game.handle_event(&down(face.x - 1.0, face.y), &mut audio);
        assert!(!game.holes()[0].was_tapped);
    }

    #[test]
    fn test_tapped_animal_bounces_then_hides() {
        let mut game = game();
        let mut audio = RecordingPlayer::default();
        game.spawn_in = 100.0;
        show(&mut game, 0, 1.0);
        let face = game.holes()[0].face_rect().center();
        game.handle_event(&down(face.x, face.y), &mut audio);

        run(&mut game, &mut audio, 0.2);
        assert!(game.holes()[0].active);
        run(&mut game, &mut audio, 0.2);
        assert!(!game.holes()[0].active);
    }

    #[test]
    fn test_untapped_animal_sinks_after_show_time() {
        let mut game = game();
        let mut audio = RecordingPlayer::default();
        game.spawn_in = 100.0;
        show(&mut game, 0, 1.0);
        game.holes[0].show_timer = 0.5;

        run(&mut game, &mut audio, 0.5);
        assert!(game.holes()[0].active);
        // Sinking at half the rise speed takes 2/3 s
        run(&mut game, &mut audio, 0.7);
        assert!(!game.holes()[0].active);
    }

    #[test]
    fn test_tap_particles_fade_in_half_a_second() {
        let mut game = game();
        let mut audio = RecordingPlayer::default();
        game.spawn_in = 100.0;
        show(&mut game, 0, 1.0);
        let face = game.holes()[0].face_rect().center();
        game.handle_event(&down(face.x, face.y), &mut audio);
        run(&mut game, &mut audio, 0.55);
        assert!(game.particles().is_empty());
    }
}
