//! Balloon Pop: tap the rising balloons

use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;
use rand::seq::IndexedRandom;

use super::ui::{BackButton, ButtonResponse};
use super::{Game, GameContext, GameKind, InputEvent, Key};
use crate::assets::{AssetManifest, Sound};
use crate::audio::{Clip, SoundPlayer, SynthError, synth};
use crate::consts::{SCREEN_HEIGHT, SCREEN_WIDTH};
use crate::renderer::{Frame, colors, rgb};
use crate::sim::{
    GameRng, Particle, ParticleSystem, SpawnTimer, per_second, per_second_sq, seeded_rng,
};

pub const MANIFEST: AssetManifest = AssetManifest {
    game: "balloon_pop",
    images: &["icon"],
    sounds: &["pop"],
};

const INITIAL_BALLOONS: usize = 3;
const MIN_BALLOONS: usize = 2;
const SPAWN_INTERVAL: f32 = 1.5;
const RADIUS_RANGE: (f32, f32) = (60.0, 100.0);
/// Rise speed in px/s
const SPEED_RANGE: (f32, f32) = (per_second(0.8), per_second(1.5));
/// Wobble phase advance in rad/s
const WOBBLE_SPEED_RANGE: (f32, f32) = (per_second(0.02), per_second(0.05));
const WOBBLE_AMPLITUDE: f32 = per_second(0.5);
/// A balloon is gone once its bottom passes this far above the screen
const TOP_MARGIN: f32 = 50.0;

const BURST_GRAVITY: f32 = per_second_sq(0.3);
const SPARKLE: [f32; 4] = rgb(255, 255, 100);
const STRING: [f32; 4] = rgb(150, 150, 150);

#[derive(Debug, Clone, PartialEq)]
pub struct Balloon {
    pub pos: Vec2,
    pub radius: f32,
    pub color: [f32; 4],
    /// px/s upwards
    pub speed: f32,
    pub wobble_offset: f32,
    /// rad/s
    pub wobble_speed: f32,
    pub time: f32,
}

impl Balloon {
    /// Rise and sway; false once fully above the top margin
    pub fn update(&mut self, dt: f32) -> bool {
        self.pos.y -= self.speed * dt;
        self.time += self.wobble_speed * dt;
        self.pos.x += (self.time + self.wobble_offset).sin() * WOBBLE_AMPLITUDE * dt;
        self.pos.y + self.radius > -TOP_MARGIN
    }

    pub fn contains(&self, p: Vec2) -> bool {
        self.pos.distance(p) <= self.radius
    }

    fn draw(&self, frame: &mut Frame) {
        let r = self.radius;
        frame.circle(self.pos, r, self.color);

        let highlight = [
            (self.color[0] + 60.0 / 255.0).min(1.0),
            (self.color[1] + 60.0 / 255.0).min(1.0),
            (self.color[2] + 60.0 / 255.0).min(1.0),
            self.color[3],
        ];
        frame.circle(self.pos - Vec2::splat(r / 3.0), r / 4.0, highlight);

        let start = self.pos + Vec2::new(0.0, r);
        let end = start + Vec2::new(self.time.sin() * 5.0, 30.0);
        frame.line(start, end, 2.0, STRING);
    }
}

pub struct BalloonPop {
    balloons: Vec<Balloon>,
    particles: ParticleSystem,
    spawn_timer: SpawnTimer,
    pop: Sound,
    back: BackButton,
    rng: GameRng,
    quit: bool,
}

impl BalloonPop {
    pub fn new(ctx: &GameContext) -> Result<Self, SynthError> {
        let pop = ctx.assets.sound(MANIFEST.game, "pop", || {
            Clip::synthesize("pop", &synth::balloon_pop())
        })?;
        Ok(Self {
            balloons: Vec::new(),
            particles: ParticleSystem::new(ctx.max_particles),
            spawn_timer: SpawnTimer::new(SPAWN_INTERVAL),
            pop,
            back: BackButton::new(),
            rng: seeded_rng(ctx.seed),
            quit: false,
        })
    }

    pub fn balloons(&self) -> &[Balloon] {
        &self.balloons
    }

    pub fn particles(&self) -> &ParticleSystem {
        &self.particles
    }

    fn spawn_balloon(&mut self) {
        let radius = self.rng.random_range(RADIUS_RANGE.0..RADIUS_RANGE.1);
        let x = self.rng.random_range(radius..SCREEN_WIDTH - radius);
        let color = *colors::PALETTE
            .choose(&mut self.rng)
            .unwrap_or(&colors::RED);
        let balloon = Balloon {
            pos: Vec2::new(x, SCREEN_HEIGHT + radius),
            radius,
            color,
            speed: self.rng.random_range(SPEED_RANGE.0..SPEED_RANGE.1),
            wobble_offset: self.rng.random_range(0.0..TAU),
            wobble_speed: self.rng.random_range(WOBBLE_SPEED_RANGE.0..WOBBLE_SPEED_RANGE.1),
            time: 0.0,
        };
        log::debug!("Balloon spawned at x={x:.0} r={radius:.0}");
        self.balloons.push(balloon);
    }

    fn burst(&mut self, balloon: &Balloon) {
        let count = self.rng.random_range(15..=25);
        for _ in 0..count {
            let angle = self.rng.random_range(0.0..TAU);
            let speed = per_second(self.rng.random_range(3.0..8.0));
            let vel = Vec2::new(angle.cos() * speed, angle.sin() * speed - per_second(2.0));
            let size = self.rng.random_range(5.0..15.0);
            let decay = per_second(self.rng.random_range(0.015..0.03));
            self.particles.spawn(
                Particle::new(balloon.pos, vel, balloon.color, size)
                    .with_decay(decay)
                    .with_gravity(BURST_GRAVITY),
            );
        }

        for _ in 0..5 {
            let angle = self.rng.random_range(0.0..TAU);
            let speed = per_second(self.rng.random_range(2.0..5.0));
            let vel = Vec2::new(angle.cos() * speed, angle.sin() * speed - per_second(3.0));
            let size = self.rng.random_range(8.0..12.0);
            let decay = per_second(self.rng.random_range(0.02..0.04));
            self.particles.spawn(
                Particle::new(balloon.pos, vel, SPARKLE, size)
                    .with_decay(decay)
                    .with_gravity(BURST_GRAVITY),
            );
        }
    }

    fn pop_at(&mut self, p: Vec2, audio: &mut dyn SoundPlayer) {
        let Some(index) = self.balloons.iter().position(|b| b.contains(p)) else {
            return;
        };
        let balloon = self.balloons.remove(index);
        audio.play(self.pop.clip());
        self.burst(&balloon);
    }
}

impl Game for BalloonPop {
    fn kind(&self) -> GameKind {
        GameKind::BalloonPop
    }

    fn on_enter(&mut self) {
        self.balloons.clear();
        self.particles.clear();
        self.spawn_timer.reset();
        for _ in 0..INITIAL_BALLOONS {
            self.spawn_balloon();
        }
        log::info!("Entered {}", self.kind().name());
    }

    fn on_exit(&mut self) {
        self.balloons.clear();
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
            InputEvent::PointerDown(p) => self.pop_at(p, audio),
            _ => {}
        }
    }

    fn update(&mut self, dt: f32, _audio: &mut dyn SoundPlayer) {
        self.balloons.retain_mut(|b| b.update(dt));
        self.particles.update(dt);

        if self.spawn_timer.tick(dt) {
            self.spawn_balloon();
        }
        if self.balloons.len() < MIN_BALLOONS {
            self.spawn_balloon();
        }
    }

    fn draw<'a>(&'a self, frame: &mut Frame<'a>) {
        frame.set_clear(colors::BACKGROUND_LIGHT);
        for balloon in &self.balloons {
            balloon.draw(frame);
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
    use crate::games::testing::{context, down, tap};
    use proptest::prelude::*;

    fn game() -> BalloonPop {
        let mut game = BalloonPop::new(&context()).unwrap();
        game.on_enter();
        game
    }

    fn balloon_at(x: f32, y: f32, radius: f32) -> Balloon {
        Balloon {
            pos: Vec2::new(x, y),
            radius,
            color: colors::RED,
            speed: 60.0,
            wobble_offset: 0.0,
            wobble_speed: 0.0,
            time: 0.0,
        }
    }

    #[test]
    fn test_starts_with_three_balloons_below_screen() {
        let game = game();
        assert_eq!(game.balloons().len(), 3);
        for b in game.balloons() {
            assert!((60.0..100.0).contains(&b.radius));
            assert!(b.pos.x >= b.radius && b.pos.x <= SCREEN_WIDTH - b.radius);
            assert_eq!(b.pos.y, SCREEN_HEIGHT + b.radius);
        }
    }

    #[test]
    fn test_pop_removes_balloon_and_bursts() {
        let mut game = game();
        let mut audio = RecordingPlayer::default();
        game.balloons = vec![balloon_at(500.0, 400.0, 80.0)];

        game.handle_event(&down(510.0, 420.0), &mut audio);

        assert!(game.balloons().is_empty());
        assert_eq!(audio.count("pop"), 1);
        let n = game.particles().len();
        assert!((20..=30).contains(&n), "{n} particles");
        assert_eq!(
            game.particles().iter().filter(|p| p.color == SPARKLE).count(),
            5
        );
    }

    #[test]
    fn test_tap_on_empty_sky_does_nothing() {
        let mut game = game();
        let mut audio = RecordingPlayer::default();
        game.balloons = vec![balloon_at(500.0, 400.0, 80.0)];
        game.handle_event(&down(100.0, 400.0), &mut audio);
        assert_eq!(game.balloons().len(), 1);
        assert!(audio.played.is_empty());
    }

    #[test]
    fn test_only_first_overlapping_balloon_pops() {
        let mut game = game();
        let mut audio = RecordingPlayer::default();
        game.balloons = vec![balloon_at(500.0, 400.0, 80.0), balloon_at(520.0, 400.0, 80.0)];
        game.handle_event(&down(510.0, 400.0), &mut audio);
        assert_eq!(game.balloons().len(), 1);
        assert_eq!(game.balloons()[0].pos.x, 520.0);
        assert_eq!(audio.count("pop"), 1);
    }

    #[test]
    fn test_back_button_shields_balloon_underneath() {
        let mut game = game();
        let mut audio = RecordingPlayer::default();
        game.balloons = vec![balloon_at(50.0, 50.0, 80.0)];
        tap(&mut game, &mut audio, 50.0, 50.0);
        assert_eq!(game.balloons().len(), 1);
        assert!(audio.played.is_empty());
        assert!(game.return_requested());
    }

    #[test]
    fn test_balloon_leaves_above_top_margin() {
        let mut b = balloon_at(500.0, -50.0 - 80.0 + 1.0, 80.0);
        assert!(!b.update(1.0 / 60.0));
        let mut b = balloon_at(500.0, 400.0, 80.0);
        assert!(b.update(1.0 / 60.0));
        assert!(b.pos.y < 400.0);
    }

    #[test]
    fn test_population_floor_and_timer() {
        let mut game = game();
        let mut audio = RecordingPlayer::default();
        game.balloons.clear();
        game.update(0.01, &mut audio);
        assert_eq!(game.balloons().len(), 1);

        let before = game.balloons().len();
        game.update(SPAWN_INTERVAL, &mut audio);
        assert!(game.balloons().len() >= before + 1);
    }

    #[test]
    fn test_same_seed_same_balloons() {
        assert_eq!(game().balloons(), game().balloons());
    }

    proptest! {
        #[test]
        fn prop_spawned_balloons_fit_horizontally(seed in any::<u64>()) {
            let mut ctx = context();
            ctx.seed = seed;
            let mut game = BalloonPop::new(&ctx).unwrap();
            game.on_enter();
            for b in game.balloons() {
                prop_assert!(b.radius >= RADIUS_RANGE.0 && b.radius < RADIUS_RANGE.1);
                prop_assert!(b.pos.x >= b.radius && b.pos.x <= SCREEN_WIDTH - b.radius);
                prop_assert!(b.speed >= SPEED_RANGE.0 && b.speed < SPEED_RANGE.1);
            }
        }
    }
}
