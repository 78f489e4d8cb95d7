//! Animal Touch: tap the animal to hear it call

use std::f32::consts::{FRAC_PI_4, PI, TAU};

use glam::Vec2;
use rand::Rng;

use super::ui::{BackButton, Button, ButtonResponse};
use super::{Game, GameContext, GameKind, InputEvent, Key};
use crate::assets::{AssetCache, AssetManifest, ImageId, Sound, Sprite};
use crate::audio::{Clip, SoundPlayer, SynthError, synth};
use crate::consts::{SCREEN_HEIGHT, SCREEN_WIDTH};
use crate::renderer::{Frame, colors, rgb, shapes};
use crate::sim::{GameRng, Rect, seeded_rng};

pub const MANIFEST: AssetManifest = AssetManifest {
    game: "animal_touch",
    images: &[
        "icon", "dog", "cat", "cow", "pig", "sheep", "chicken", "frog", "lion",
    ],
    sounds: &["dog", "cat", "cow", "pig", "sheep", "chicken", "frog", "lion"],
};

const BOUNCE_DURATION: f32 = 0.8;
const BUBBLE_DURATION: f32 = 1.5;
const AUTO_SWITCH_INTERVAL: f32 = 8.0;

const ARROW_COLOR: [f32; 4] = rgb(100, 100, 100);
const BUBBLE_OUTLINE: [f32; 4] = rgb(100, 100, 100);
const EYE: [f32; 4] = colors::BLACK;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Animal {
    pub key: &'static str,
    pub color: [f32; 4],
    pub secondary: [f32; 4],
    /// Synthesized call pitch in Hz
    pub call_freq: f32,
    /// Peak lift of the bounce in px
    pub bounce_height: f32,
}

pub const ANIMALS: [Animal; 8] = [
    Animal {
        key: "dog",
        color: rgb(139, 90, 43),
        secondary: rgb(101, 67, 33),
        call_freq: 300.0,
        bounce_height: 20.0,
    },
    Animal {
        key: "cat",
        color: rgb(255, 165, 0),
        secondary: rgb(255, 200, 100),
        call_freq: 500.0,
        bounce_height: 15.0,
    },
    Animal {
        key: "cow",
        color: rgb(40, 40, 40),
        secondary: rgb(255, 255, 255),
        call_freq: 150.0,
        bounce_height: 10.0,
    },
    Animal {
        key: "pig",
        color: rgb(255, 182, 193),
        secondary: rgb(255, 150, 170),
        call_freq: 200.0,
        bounce_height: 12.0,
    },
    Animal {
        key: "sheep",
        color: rgb(245, 245, 245),
        secondary: rgb(200, 200, 200),
        call_freq: 400.0,
        bounce_height: 12.0,
    },
    Animal {
        key: "chicken",
        color: rgb(255, 100, 50),
        secondary: rgb(255, 220, 100),
        call_freq: 600.0,
        bounce_height: 18.0,
    },
    Animal {
        key: "frog",
        color: rgb(50, 205, 50),
        secondary: rgb(144, 238, 144),
        call_freq: 350.0,
        bounce_height: 25.0,
    },
    Animal {
        key: "lion",
        color: rgb(255, 180, 50),
        secondary: rgb(200, 120, 20),
        call_freq: 120.0,
        bounce_height: 15.0,
    },
];

/// Middle half of the screen; taps here make the animal call
pub const ANIMAL_AREA: Rect = Rect::new(
    SCREEN_WIDTH / 4.0,
    SCREEN_HEIGHT / 4.0,
    SCREEN_WIDTH / 2.0,
    SCREEN_HEIGHT / 2.0,
);

/// Damped triple hop, 0 at both ends
pub fn bounce_offset(elapsed: f32) -> f32 {
    let progress = (elapsed / BOUNCE_DURATION).clamp(0.0, 1.0);
    (progress * PI * 3.0).sin() * (1.0 - progress)
}

/// Custom picture with the size it is drawn at
#[derive(Debug, Clone, Copy)]
struct Picture {
    id: ImageId,
    size: Vec2,
}

/// Fit the custom picture for `key` into a `size` square, keeping its aspect
fn picture(assets: &AssetCache, key: &str, size: f32) -> Option<Picture> {
    let Sprite::Custom(id) = assets.sprite(MANIFEST.game, key) else {
        return None;
    };
    let (w, h) = assets.image(id)?.dimensions();
    if w == 0 || h == 0 {
        return None;
    }
    let aspect = w as f32 / h as f32;
    let size = if aspect > 1.0 {
        Vec2::new(size, size / aspect)
    } else {
        Vec2::new(size * aspect, size)
    };
    Some(Picture { id, size })
}

pub struct AnimalTouch {
    current: usize,
    /// Time since the last call, while bouncing
    bounce: Option<f32>,
    /// Time since the last call, while the bubble shows
    bubble: Option<f32>,
    idle: f32,
    sounds: Vec<Sound>,
    pictures: Vec<Option<Picture>>,
    left: Button,
    right: Button,
    back: BackButton,
    rng: GameRng,
    quit: bool,
}

impl AnimalTouch {
    pub fn new(ctx: &GameContext) -> Result<Self, SynthError> {
        let sounds = ANIMALS
            .iter()
            .map(|animal| {
                ctx.assets.sound(MANIFEST.game, animal.key, || {
                    Clip::synthesize(animal.key, &synth::animal_call(animal.call_freq))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        let size = animal_size();
        let pictures = ANIMALS
            .iter()
            .map(|animal| picture(&ctx.assets, animal.key, size))
            .collect();

        let arrow_y = SCREEN_HEIGHT / 2.0 - 40.0;
        Ok(Self {
            current: 0,
            bounce: None,
            bubble: None,
            idle: 0.0,
            sounds,
            pictures,
            left: Button::new(Rect::new(20.0, arrow_y, 60.0, 80.0)),
            right: Button::new(Rect::new(SCREEN_WIDTH - 80.0, arrow_y, 60.0, 80.0)),
            back: BackButton::new(),
            rng: seeded_rng(ctx.seed),
            quit: false,
        })
    }

    pub fn current(&self) -> &Animal {
        &ANIMALS[self.current]
    }

    pub fn next_animal(&mut self) {
        self.current = (self.current + 1) % ANIMALS.len();
        self.idle = 0.0;
    }

    pub fn prev_animal(&mut self) {
        self.current = (self.current + ANIMALS.len() - 1) % ANIMALS.len();
        self.idle = 0.0;
    }

    fn call(&mut self, audio: &mut dyn SoundPlayer) {
        self.bounce = Some(0.0);
        self.bubble = Some(0.0);
        self.idle = 0.0;
        audio.play(self.sounds[self.current].clip());
        log::debug!("{} calls", self.current().key);
    }

    fn draw_arrow(frame: &mut Frame, button: &Button, pointing_left: bool) {
        button.draw(frame, colors::LIGHT_GRAY, 10.0);
        let c = button.rect.center();
        let a = 20.0;
        let dir = if pointing_left { -1.0 } else { 1.0 };
        frame.polygon(
            &[
                c + Vec2::new(-dir * a / 2.0, -a),
                c + Vec2::new(dir * a / 2.0, 0.0),
                c + Vec2::new(-dir * a / 2.0, a),
            ],
            ARROW_COLOR,
        );
    }

    fn draw_bubble(&self, frame: &mut Frame) {
        let rect = Rect::new(SCREEN_WIDTH / 2.0 - 180.0, SCREEN_HEIGHT - 160.0, 360.0, 110.0);
        frame.rounded_rect(rect, 15.0, BUBBLE_OUTLINE);
        frame.rounded_rect(rect.inflate(-3.0), 12.0, colors::WHITE);

        // Sound waves spreading out of a speaker dot
        let color = self.current().color;
        let origin = rect.center() - Vec2::new(60.0, 0.0);
        frame.circle(origin, 12.0, color);
        for i in 1..=3 {
            let r = 12.0 + i as f32 * 22.0;
            frame.push(shapes::arc(
                origin,
                r,
                r + 6.0,
                -FRAC_PI_4,
                FRAC_PI_4,
                color,
                16,
            ));
        }
    }

    /// One dot per animal, the current one filled
    fn draw_indicator(&self, frame: &mut Frame) {
        let spacing = 30.0;
        let start = SCREEN_WIDTH / 2.0 - spacing * (ANIMALS.len() - 1) as f32 / 2.0;
        for i in 0..ANIMALS.len() {
            let center = Vec2::new(start + i as f32 * spacing, 110.0);
            if i == self.current {
                frame.circle(center, 10.0, self.current().color);
            } else {
                frame.ring(center, 8.0, 3.0, colors::LIGHT_GRAY);
            }
        }
    }
}

fn animal_size() -> f32 {
    SCREEN_WIDTH.min(SCREEN_HEIGHT) / 2.0
}

/// Ellipse inscribed in the rectangle `(x, y, w, h)`
fn oval(frame: &mut Frame, x: f32, y: f32, w: f32, h: f32, color: [f32; 4]) {
    frame.ellipse(Vec2::new(x + w / 2.0, y + h / 2.0), Vec2::new(w / 2.0, h / 2.0), color);
}

/// Lower half of the ellipse inscribed in `(x, y, w, h)`, as a stroke
fn smile(frame: &mut Frame, x: f32, y: f32, w: f32, h: f32, width: f32, color: [f32; 4]) {
    let center = Vec2::new(x + w / 2.0, y + h / 2.0);
    let radii = Vec2::new(w / 2.0, h / 2.0);
    let steps = 12;
    let point = |i: u32| {
        let a = PI * i as f32 / steps as f32;
        center + Vec2::new(a.cos() * radii.x, a.sin() * radii.y)
    };
    for i in 0..steps {
        frame.line(point(i), point(i + 1), width, color);
    }
}

fn draw_dog(frame: &mut Frame, c: Vec2, s: f32) {
    let body = rgb(139, 90, 43);
    let ear = rgb(101, 67, 33);
    oval(frame, c.x - s / 2.0, c.y - s / 4.0, s, s / 2.0, body);

    let head_size = s / 2.0;
    let head = c + Vec2::new(-s / 4.0, -s / 3.0);
    frame.circle(head, head_size / 2.0, body);
    for dx in [-head_size / 3.0, head_size / 6.0] {
        oval(
            frame,
            head.x + dx,
            head.y - head_size / 2.0,
            head_size / 3.0,
            head_size / 2.0,
            ear,
        );
    }
    for dx in [-head_size / 6.0, head_size / 6.0] {
        frame.circle(head + Vec2::new(dx, -head_size / 8.0), head_size / 10.0, EYE);
    }
    frame.circle(head + Vec2::new(0.0, head_size / 6.0), head_size / 8.0, EYE);

    let tail = [
        Vec2::new(c.x + s / 2.0, c.y),
        Vec2::new(c.x + s * 0.75, c.y - s / 4.0),
        Vec2::new(c.x + s / 2.0 + s / 3.0, c.y - s / 3.0),
    ];
    frame.line(tail[0], tail[1], 8.0, ear);
    frame.line(tail[1], tail[2], 8.0, ear);
}

fn draw_cat(frame: &mut Frame, c: Vec2, s: f32) {
    let color = rgb(255, 165, 0);
    oval(frame, c.x - s / 3.0, c.y - s / 6.0, s * 2.0 / 3.0, s / 3.0, color);

    let h = s / 2.0;
    let head = c + Vec2::new(-s / 4.0, -s / 4.0);
    frame.circle(head, h / 2.0, color);
    let ear = h / 3.0;
    frame.polygon(
        &[
            head + Vec2::new(-h / 3.0, -h / 4.0),
            head + Vec2::new(-h / 2.0, -h / 2.0 - ear),
            head + Vec2::new(-h / 6.0, -h / 3.0),
        ],
        color,
    );
    frame.polygon(
        &[
            head + Vec2::new(h / 6.0, -h / 3.0),
            head + Vec2::new(h / 3.0, -h / 2.0 - ear),
            head + Vec2::new(h / 2.0, -h / 4.0),
        ],
        color,
    );

    let eye = rgb(0, 200, 0);
    for dx in [-h / 4.0, h / 10.0] {
        oval(frame, head.x + dx, head.y - h / 6.0, h / 5.0, h / 4.0, eye);
    }
    frame.polygon(
        &[
            head + Vec2::new(0.0, h / 8.0),
            head + Vec2::new(-h / 10.0, h / 5.0),
            head + Vec2::new(h / 10.0, h / 5.0),
        ],
        rgb(255, 150, 150),
    );

    let whisker = rgb(100, 100, 100);
    let wy = head.y + h / 6.0;
    for dy in [-5.0, 5.0] {
        frame.line(
            Vec2::new(head.x - h / 2.0, wy + dy),
            Vec2::new(head.x - h / 6.0, wy),
            2.0,
            whisker,
        );
        frame.line(
            Vec2::new(head.x + h / 6.0, wy),
            Vec2::new(head.x + h / 2.0, wy + dy),
            2.0,
            whisker,
        );
    }
}

fn draw_cow(frame: &mut Frame, c: Vec2, s: f32) {
    oval(frame, c.x - s / 2.0, c.y - s / 4.0, s, s / 2.0, colors::WHITE);
    let spot = rgb(40, 40, 40);
    for offset in [
        Vec2::new(-s / 4.0, -s / 8.0),
        Vec2::new(s / 6.0, 0.0),
        Vec2::new(0.0, s / 8.0),
    ] {
        frame.circle(c + offset, s / 8.0, spot);
    }

    let head = c + Vec2::new(-s / 3.0, -s / 4.0);
    frame.circle(head, s / 4.0, colors::WHITE);
    let horn = rgb(200, 180, 150);
    for dx in [-s / 4.0, s / 8.0] {
        oval(frame, head.x + dx, head.y - s / 3.0, s / 8.0, s / 4.0, horn);
    }
    for dx in [-s / 10.0, s / 10.0] {
        frame.circle(head + Vec2::new(dx, -s / 12.0), s / 16.0, EYE);
    }
    oval(frame, head.x - s / 8.0, head.y + s / 12.0, s / 4.0, s / 6.0, rgb(255, 200, 200));
}

fn draw_pig(frame: &mut Frame, c: Vec2, s: f32) {
    let color = rgb(255, 182, 193);
    let dark = rgb(255, 150, 170);
    frame.circle(c, s / 3.0, color);

    let head = c + Vec2::new(-s / 4.0, -s / 6.0);
    frame.circle(head, s / 4.0, color);
    for dx in [-s / 4.0, s / 8.0] {
        oval(frame, head.x + dx, head.y - s / 4.0, s / 5.0, s / 4.0, dark);
    }
    oval(frame, head.x - s / 8.0, head.y + s / 16.0, s / 4.0, s / 6.0, dark);
    let nostril = rgb(200, 100, 120);
    for dx in [-s / 20.0, s / 20.0] {
        frame.circle(head + Vec2::new(dx, s / 8.0), s / 24.0, nostril);
    }
    for dx in [-s / 10.0, s / 10.0] {
        frame.circle(head + Vec2::new(dx, -s / 16.0), s / 20.0, EYE);
    }
}

fn draw_sheep(frame: &mut Frame, c: Vec2, s: f32) {
    let wool = rgb(245, 245, 245);
    for offset in [
        Vec2::new(-s / 4.0, 0.0),
        Vec2::new(s / 4.0, 0.0),
        Vec2::new(0.0, -s / 6.0),
        Vec2::new(0.0, s / 6.0),
        Vec2::new(-s / 6.0, -s / 8.0),
        Vec2::new(s / 6.0, -s / 8.0),
    ] {
        frame.circle(c + offset, s / 4.0, wool);
    }

    let face = rgb(60, 60, 60);
    let head = c + Vec2::new(-s / 3.0, 0.0);
    oval(frame, head.x - s / 6.0, head.y - s / 8.0, s / 3.0, s / 4.0, face);
    for dx in [-s / 16.0, s / 8.0] {
        frame.circle(head + Vec2::new(dx, -s / 20.0), s / 20.0, colors::WHITE);
    }
    for dx in [-s / 4.0, s / 6.0] {
        oval(frame, head.x + dx, head.y - s / 12.0, s / 8.0, s / 10.0, face);
    }
}

fn draw_chicken(frame: &mut Frame, c: Vec2, s: f32) {
    let body = rgb(255, 220, 100);
    oval(frame, c.x - s / 3.0, c.y - s / 6.0, s * 2.0 / 3.0, s / 2.0, body);

    let head = c + Vec2::new(-s / 4.0, -s / 3.0);
    frame.circle(head, s / 5.0, body);
    let comb = rgb(255, 50, 50);
    frame.circle(head + Vec2::new(0.0, -s / 5.0), s / 10.0, comb);
    for dx in [-s / 12.0, s / 12.0] {
        frame.circle(head + Vec2::new(dx, -s / 6.0), s / 12.0, comb);
    }
    frame.polygon(
        &[
            head + Vec2::new(-s / 5.0, 0.0),
            head + Vec2::new(-s / 3.0, s / 20.0),
            head + Vec2::new(-s / 5.0, s / 10.0),
        ],
        rgb(255, 150, 50),
    );
    frame.circle(head + Vec2::new(-s / 16.0, -s / 20.0), s / 24.0, EYE);
    // Wing
    oval(frame, c.x - s / 6.0, c.y - s / 8.0, s / 3.0, s / 4.0, rgb(255, 200, 80));
}

fn draw_frog(frame: &mut Frame, c: Vec2, s: f32) {
    let color = rgb(50, 205, 50);
    oval(frame, c.x - s / 3.0, c.y - s / 6.0, s * 2.0 / 3.0, s / 2.0, color);

    let eye = s / 5.0;
    for dx in [-s / 5.0, s / 5.0] {
        let at = c + Vec2::new(dx, -s / 4.0);
        frame.circle(at, eye, color);
        frame.circle(at, eye - 5.0, colors::WHITE);
        frame.circle(at, eye / 3.0, EYE);
    }
    smile(frame, c.x - s / 4.0, c.y - s / 8.0, s / 2.0, s / 4.0, 3.0, rgb(0, 100, 0));
    oval(frame, c.x - s / 5.0, c.y, s * 2.0 / 5.0, s / 4.0, rgb(144, 238, 144));
}

fn draw_lion(frame: &mut Frame, c: Vec2, s: f32) {
    let mane = rgb(200, 120, 20);
    let body = rgb(255, 180, 50);
    let face = c - Vec2::splat(s / 6.0);
    for i in 0..12 {
        let a = TAU * i as f32 / 12.0;
        frame.circle(face + Vec2::new(a.cos(), a.sin()) * (s / 3.0), s / 6.0, mane);
    }
    frame.circle(face, s / 4.0, body);
    oval(frame, c.x - s / 6.0, c.y, s / 2.0, s / 3.0, body);

    for dx in [-s / 4.0, -s / 12.0] {
        frame.circle(Vec2::new(c.x + dx, c.y - s / 5.0), s / 20.0, EYE);
    }
    frame.polygon(
        &[
            Vec2::new(c.x - s / 6.0, c.y - s / 12.0),
            Vec2::new(c.x - s / 5.0, c.y),
            Vec2::new(c.x - s / 8.0, c.y),
        ],
        rgb(150, 100, 50),
    );
    smile(frame, c.x - s / 4.0, c.y - s / 12.0, s / 6.0, s / 8.0, 2.0, rgb(100, 50, 20));
}

fn draw_procedural(frame: &mut Frame, key: &str, center: Vec2, size: f32) {
    match key {
        "dog" => draw_dog(frame, center, size),
        "cat" => draw_cat(frame, center, size),
        "cow" => draw_cow(frame, center, size),
        "pig" => draw_pig(frame, center, size),
        "sheep" => draw_sheep(frame, center, size),
        "chicken" => draw_chicken(frame, center, size),
        "frog" => draw_frog(frame, center, size),
        "lion" => draw_lion(frame, center, size),
        _ => {}
    }
}

impl Game for AnimalTouch {
    fn kind(&self) -> GameKind {
        GameKind::AnimalTouch
    }

    fn on_enter(&mut self) {
        self.current = self.rng.random_range(0..ANIMALS.len());
        self.bounce = None;
        self.bubble = None;
        self.idle = 0.0;
        log::info!("Entered {} with the {}", self.kind().name(), self.current().key);
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
        match self.left.handle(event) {
            ButtonResponse::Clicked => {
                self.prev_animal();
                return;
            }
            ButtonResponse::Consumed => return,
            ButtonResponse::Ignored => {}
        }
        match self.right.handle(event) {
            ButtonResponse::Clicked => {
                self.next_animal();
                return;
            }
            ButtonResponse::Consumed => return,
            ButtonResponse::Ignored => {}
        }

        match *event {
            InputEvent::Key(Key::Escape) => self.quit = true,
            InputEvent::Key(Key::Left) => self.prev_animal(),
            InputEvent::Key(Key::Right) => self.next_animal(),
            InputEvent::Key(Key::Space) => self.call(audio),
            InputEvent::PointerDown(p) if ANIMAL_AREA.contains(p) => self.call(audio),
            _ => {}
        }
    }

    fn update(&mut self, dt: f32, _audio: &mut dyn SoundPlayer) {
        if let Some(t) = self.bounce.as_mut() {
            *t += dt;
            if *t >= BOUNCE_DURATION {
                self.bounce = None;
            }
        }
        if let Some(t) = self.bubble.as_mut() {
            *t += dt;
            if *t >= BUBBLE_DURATION {
                self.bubble = None;
            }
        }

        self.idle += dt;
        if self.idle >= AUTO_SWITCH_INTERVAL {
            self.next_animal();
        }
    }

    fn draw<'a>(&'a self, frame: &mut Frame<'a>) {
        frame.set_clear(colors::BACKGROUND_CREAM);
        self.draw_indicator(frame);

        let animal = self.current();
        let lift = self.bounce.map_or(0.0, bounce_offset) * animal.bounce_height;
        let center = Vec2::new(SCREEN_WIDTH / 2.0, SCREEN_HEIGHT / 2.0 + 20.0 - lift);
        match self.pictures[self.current] {
            Some(picture) => frame.image(
                picture.id,
                Rect::from_center(center, picture.size.x, picture.size.y),
            ),
            None => draw_procedural(frame, animal.key, center, animal_size()),
        }

        if self.bubble.is_some() {
            self.draw_bubble(frame);
        }
        Self::draw_arrow(frame, &self.left, true);
        Self::draw_arrow(frame, &self.right, false);
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

    fn game() -> AnimalTouch {
        let mut game = AnimalTouch::new(&context()).unwrap();
        game.on_enter();
        game
    }

    #[test]
    fn test_tap_center_calls_and_bounces() {
        let mut game = game();
        let mut audio = RecordingPlayer::default();
        let key = game.current().key;

        game.handle_event(&down(512.0, 384.0), &mut audio);

        assert_eq!(audio.count(key), 1);
        assert!(game.bounce.is_some());
        assert!(game.bubble.is_some());
    }

    #[test]
    fn test_tap_outside_area_is_silent() {
        let mut game = game();
        let mut audio = RecordingPlayer::default();
        game.handle_event(&down(200.0, 700.0), &mut audio);
        assert!(audio.played.is_empty());
        assert!(!game.bounce.is_some());
    }

    #[test]
    fn test_bounce_ends_before_bubble() {
        let mut game = game();
        let mut audio = RecordingPlayer::default();
        game.handle_event(&InputEvent::Key(Key::Space), &mut audio);

        game.update(1.0, &mut audio);
        assert!(!game.bounce.is_some());
        assert!(game.bubble.is_some());

        game.update(0.6, &mut audio);
        assert!(!game.bubble.is_some());
    }

    #[test]
    fn test_arrows_cycle_both_ways() {
        let mut game = game();
        let mut audio = RecordingPlayer::default();
        game.current = 0;

        tap(&mut game, &mut audio, 50.0, SCREEN_HEIGHT / 2.0);
        assert_eq!(game.current, ANIMALS.len() - 1);

        tap(&mut game, &mut audio, SCREEN_WIDTH - 50.0, SCREEN_HEIGHT / 2.0);
        assert_eq!(game.current, 0);

        game.handle_event(&InputEvent::Key(Key::Right), &mut audio);
        assert_eq!(game.current, 1);
        assert!(audio.played.is_empty());
    }

    #[test]
    fn test_idle_switches_to_next_animal() {
        let mut game = game();
        let mut audio = RecordingPlayer::default();
        let start = game.current;

        game.update(7.9, &mut audio);
        assert_eq!(game.current, start);
        game.update(0.2, &mut audio);
        assert_eq!(game.current, (start + 1) % ANIMALS.len());
    }

    #[test]
    fn test_call_resets_idle_timer() {
        let mut game = game();
        let mut audio = RecordingPlayer::default();
        let start = game.current;

        game.update(7.0, &mut audio);
        game.handle_event(&InputEvent::Key(Key::Space), &mut audio);
        game.update(7.0, &mut audio);
        assert_eq!(game.current, start);
    }

    #[test]
    fn test_bounce_offset_rests_at_both_ends() {
        assert!(bounce_offset(0.0).abs() < 1e-6);
        assert!(bounce_offset(BOUNCE_DURATION).abs() < 1e-6);
        assert!(bounce_offset(BOUNCE_DURATION / 6.0) > 0.5);
    }

    #[test]
    fn test_every_animal_draws() {
        let mut game = game();
        for i in 0..ANIMALS.len() {
            game.current = i;
            let mut frame = Frame::default();
            game.draw(&mut frame);
            assert!(!frame.is_empty());
        }
    }
}
