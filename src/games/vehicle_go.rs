//! Vehicle Go: tap a vehicle and watch it drive across the screen

use std::f32::consts::{PI, TAU};

use glam::Vec2;
use rand::Rng;

use super::ui::{BackButton, ButtonResponse};
use super::{Game, GameContext, GameKind, InputEvent, Key};
use crate::assets::{AssetCache, AssetManifest, Sound, Sprite};
use crate::audio::{Clip, SoundPlayer, SynthError, synth};
use crate::consts::{SCREEN_HEIGHT, SCREEN_WIDTH};
use crate::renderer::{Frame, colors, rgb, shapes};
use crate::sim::{GameRng, Particle, ParticleSystem, Rect, seeded_rng};

pub const MANIFEST: AssetManifest = AssetManifest {
    game: "vehicle_go",
    images: &[
        "icon", "car", "bus", "train", "firetruck", "airplane", "ambulance", "motorcycle", "ship",
    ],
    sounds: &[
        "car", "bus", "train", "firetruck", "airplane", "ambulance", "motorcycle", "ship",
    ],
};

const GRID_COLS: usize = 4;
const BUTTON_SIZE: f32 = 140.0;
const BUTTON_SPACING: f32 = 20.0;
const GRID_TOP: f32 = 120.0;

/// Baseline of the driving lane
pub const LANE_Y: f32 = SCREEN_HEIGHT - 200.0;
pub const START_X: f32 = -200.0;
/// The run ends past this x
pub const EXIT_X: f32 = SCREEN_WIDTH + 200.0;
const RUNNING_SIZE: f32 = 120.0;
const TRAIL_CHANCE: f64 = 0.3;

const WINDOW: [f32; 4] = rgb(200, 230, 255);
const TIRE: [f32; 4] = rgb(50, 50, 50);
const SPOKE: [f32; 4] = rgb(150, 150, 150);
const LANE: [f32; 4] = rgb(230, 240, 250);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Movement {
    Horizontal,
    /// Climbs at 0.3x its speed
    DiagonalUp,
    /// Bobs 15 px around the lane
    Wave,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundKind {
    Engine,
    Siren,
    Horn,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Trail {
    Exhaust,
    Water,
    Cloud,
}

#[derive(Debug, Clone, Copy)]
pub struct Vehicle {
    pub key: &'static str,
    pub color: [f32; 4],
    pub secondary: [f32; 4],
    pub sound_freq: f32,
    /// px/s
    pub speed: f32,
    pub movement: Movement,
    pub y_offset: f32,
    pub sound: SoundKind,
}

impl Vehicle {
    fn trail(&self) -> Trail {
        match (self.movement, self.key) {
            (Movement::Wave, _) => Trail::Water,
            (_, "airplane") => Trail::Cloud,
            _ => Trail::Exhaust,
        }
    }
}

pub const VEHICLES: [Vehicle; 8] = [
    Vehicle {
        key: "car",
        color: colors::RED,
        secondary: rgb(200, 50, 50),
        sound_freq: 150.0,
        speed: 400.0,
        movement: Movement::Horizontal,
        y_offset: 0.0,
        sound: SoundKind::Engine,
    },
    Vehicle {
        key: "bus",
        color: colors::YELLOW,
        secondary: rgb(200, 180, 50),
        sound_freq: 100.0,
        speed: 300.0,
        movement: Movement::Horizontal,
        y_offset: 0.0,
        sound: SoundKind::Engine,
    },
    Vehicle {
        key: "train",
        color: colors::GREEN,
        secondary: rgb(50, 180, 50),
        sound_freq: 80.0,
        speed: 350.0,
        movement: Movement::Horizontal,
        y_offset: 0.0,
        sound: SoundKind::Engine,
    },
    Vehicle {
        key: "firetruck",
        color: rgb(220, 50, 50),
        secondary: rgb(180, 180, 180),
        sound_freq: 400.0,
        speed: 450.0,
        movement: Movement::Horizontal,
        y_offset: 0.0,
        sound: SoundKind::Siren,
    },
    Vehicle {
        key: "airplane",
        color: colors::WHITE,
        secondary: colors::BLUE,
        sound_freq: 200.0,
        speed: 500.0,
        movement: Movement::DiagonalUp,
        y_offset: -50.0,
        sound: SoundKind::Engine,
    },
    Vehicle {
        key: "ambulance",
        color: colors::WHITE,
        secondary: colors::RED,
        sound_freq: 450.0,
        speed: 500.0,
        movement: Movement::Horizontal,
        y_offset: 0.0,
        sound: SoundKind::Siren,
    },
    Vehicle {
        key: "motorcycle",
        color: colors::PURPLE,
        secondary: rgb(100, 100, 100),
        sound_freq: 250.0,
        speed: 550.0,
        movement: Movement::Horizontal,
        y_offset: 0.0,
        sound: SoundKind::Engine,
    },
    Vehicle {
        key: "ship",
        color: colors::BLUE,
        secondary: rgb(200, 150, 100),
        sound_freq: 60.0,
        speed: 200.0,
        movement: Movement::Wave,
        y_offset: 30.0,
        sound: SoundKind::Horn,
    },
];

/// Selection buttons, 4 per row
pub fn button_rects() -> Vec<Rect> {
    let grid_w = GRID_COLS as f32 * BUTTON_SIZE + (GRID_COLS - 1) as f32 * BUTTON_SPACING;
    let start_x = ((SCREEN_WIDTH - grid_w) / 2.0).floor();
    (0..VEHICLES.len())
        .map(|i| {
            let (row, col) = (i / GRID_COLS, i % GRID_COLS);
            Rect::new(
                start_x + col as f32 * (BUTTON_SIZE + BUTTON_SPACING),
                GRID_TOP + row as f32 * (BUTTON_SIZE + BUTTON_SPACING),
                BUTTON_SIZE,
                BUTTON_SIZE,
            )
        })
        .collect()
}

/// Custom clip, or the synthesized sound for the vehicle's kind
fn vehicle_sound(assets: &AssetCache, vehicle: &Vehicle) -> Result<Sound, SynthError> {
    assets.sound(MANIFEST.game, vehicle.key, || {
        let patch = match vehicle.sound {
            SoundKind::Siren => synth::siren(400.0, 500.0),
            SoundKind::Horn => synth::horn(vehicle.sound_freq),
            SoundKind::Engine => synth::engine(vehicle.sound_freq),
        };
        Clip::synthesize(vehicle.key, &patch)
    })
}

/// The vehicle currently on the road
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunningVehicle {
    pub index: usize,
    pub pos: Vec2,
    /// Degrees
    pub wheel_rotation: f32,
}

impl RunningVehicle {
    fn start(index: usize) -> Self {
        Self {
            index,
            pos: Vec2::new(START_X, LANE_Y + VEHICLES[index].y_offset),
            wheel_rotation: 0.0,
        }
    }

    /// Move along the vehicle's path; false once off screen
    pub fn update(&mut self, dt: f32) -> bool {
        let vehicle = &VEHICLES[self.index];
        self.pos.x += vehicle.speed * dt;
        match vehicle.movement {
            Movement::Horizontal => {}
            Movement::DiagonalUp => self.pos.y -= vehicle.speed * 0.3 * dt,
            Movement::Wave => {
                self.pos.y = LANE_Y + vehicle.y_offset + (self.pos.x / 50.0).sin() * 15.0;
            }
        }
        self.wheel_rotation += vehicle.speed * dt * 0.5;
        self.pos.x <= EXIT_X
    }
}

pub struct VehicleGo {
    buttons: Vec<Rect>,
    running: Option<RunningVehicle>,
    particles: ParticleSystem,
    sprites: [Sprite; VEHICLES.len()],
    sounds: Vec<Sound>,
    back: BackButton,
    /// Seconds since start, drives the flashing lights and waves
    clock: f32,
    rng: GameRng,
    quit: bool,
}

impl VehicleGo {
    pub fn new(ctx: &GameContext) -> Result<Self, SynthError> {
        let sounds = VEHICLES
            .iter()
            .map(|v| vehicle_sound(&ctx.assets, v))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            buttons: button_rects(),
            running: None,
            particles: ParticleSystem::new(ctx.max_particles),
            sprites: VEHICLES.map(|v| ctx.assets.sprite(MANIFEST.game, v.key)),
            sounds,
            back: BackButton::new(),
            clock: 0.0,
            rng: seeded_rng(ctx.seed),
            quit: false,
        })
    }

    pub fn running(&self) -> Option<&RunningVehicle> {
        self.running.as_ref()
    }

    pub fn buttons(&self) -> &[Rect] {
        &self.buttons
    }

    pub fn particles(&self) -> &ParticleSystem {
        &self.particles
    }

    /// Start a run; ignored while another vehicle is on the road
    pub fn launch(&mut self, index: usize, audio: &mut dyn SoundPlayer) {
        if self.running.is_some() {
            return;
        }
        log::info!("Launching {}", VEHICLES[index].key);
        self.running = Some(RunningVehicle::start(index));
        self.particles.clear();
        audio.play(self.sounds[index].clip());
    }

    fn spawn_trail(&mut self, trail: Trail, at: Vec2) {
        let rng = &mut self.rng;
        let particle = match trail {
            Trail::Exhaust => Particle::new(
                at + Vec2::new(-60.0, 20.0),
                Vec2::new(rng.random_range(-30.0..-10.0), rng.random_range(-20.0..20.0)),
                rgb(150, 150, 150),
                rng.random_range(5.0..15.0),
            )
            .with_lifetime(0.8),
            Trail::Water => Particle::new(
                at + Vec2::new(-50.0, 40.0),
                Vec2::new(rng.random_range(-50.0..-20.0), rng.random_range(-30.0..10.0)),
                rgb(150, 200, 255),
                rng.random_range(3.0..8.0),
            )
            .with_lifetime(0.6),
            Trail::Cloud => Particle::new(
                at + Vec2::new(-80.0, 0.0),
                Vec2::new(rng.random_range(-20.0..0.0), rng.random_range(-10.0..10.0)),
                colors::WHITE,
                rng.random_range(10.0..20.0),
            )
            .with_lifetime(1.0),
        };
        self.particles.spawn(particle);
    }

    fn draw_button(&self, frame: &mut Frame, index: usize) {
        let vehicle = &VEHICLES[index];
        let rect = self.buttons[index];
        frame.rounded_rect(rect, 15.0, TIRE);
        frame.rounded_rect(rect.inflate(-3.0), 12.0, vehicle.color);

        let center = rect.center() - Vec2::new(0.0, 10.0);
        let size = rect.w * 0.6;
        match self.sprites[index] {
            Sprite::Custom(id) => frame.image(id, Rect::from_center(center, size, size * 0.7)),
            Sprite::Procedural => self.draw_vehicle(frame, index, center, size, 0.0),
        }
    }

    fn draw_vehicle(&self, frame: &mut Frame, index: usize, at: Vec2, size: f32, wheels: f32) {
        let vehicle = &VEHICLES[index];
        let (x, y, s) = (at.x, at.y, size);
        let (color, secondary) = (vehicle.color, vehicle.secondary);
        let flash = |period_ms: f32| (self.clock * 1000.0 / period_ms) as u32 % 2 == 0;

        match vehicle.key {
            "car" => {
                frame.rounded_rect(Rect::new(x - s / 2.0, y - s / 4.0, s, s / 2.0), 10.0, color);
                frame.polygon(
                    &[
                        Vec2::new(x - s / 4.0, y - s / 4.0),
                        Vec2::new(x - s / 6.0, y - s / 2.0),
                        Vec2::new(x + s / 4.0, y - s / 2.0),
                        Vec2::new(x + s / 3.0, y - s / 4.0),
                    ],
                    secondary,
                );
                frame.rect(Rect::new(x - s / 6.0, y - s / 2.0 + 5.0, s / 3.0, s / 5.0), WINDOW);
                let radius = s / 6.0;
                for wx in [x - s / 3.0, x + s / 4.0] {
                    draw_wheel(frame, Vec2::new(wx, y + s / 4.0), radius, wheels, 4);
                }
            }
            "bus" => {
                frame.rounded_rect(
                    Rect::new(x - s * 0.6, y - s / 3.0, s * 1.2, s * 0.6),
                    8.0,
                    color,
                );
                let window_w = s / 5.0;
                for i in 0..4 {
                    let wx = x - s * 0.5 + i as f32 * (window_w + 8.0) + 10.0;
                    frame.rect(Rect::new(wx, y - s / 4.0, window_w, s / 4.0), WINDOW);
                }
                for wx in [x - s * 0.4, x + s * 0.4] {
                    frame.circle(Vec2::new(wx, y + s / 4.0), s / 7.0, TIRE);
                }
            }
            "train" => {
                let (car_w, car_h) = (s * 0.5, s * 0.4);
                for i in 0..3 {
                    let cx = x - s * 0.6 + i as f32 * (car_w + 5.0);
                    frame.rounded_rect(Rect::new(cx, y - car_h / 2.0, car_w, car_h), 5.0, color);
                    frame.rect(
                        Rect::new(cx + 5.0, y - car_h / 3.0, car_w - 10.0, car_h / 3.0),
                        WINDOW,
                    );
                    frame.rect(Rect::new(cx, y + car_h / 6.0, car_w, 5.0), secondary);
                    for fx in [0.25, 0.75] {
                        frame.circle(Vec2::new(cx + car_w * fx, y + car_h / 2.0), s / 12.0, TIRE);
                    }
                }
            }
            "firetruck" => {
                frame.rounded_rect(Rect::new(x - s / 2.0, y - s / 4.0, s, s / 2.0), 5.0, color);
                frame.rect(Rect::new(x + s / 4.0, y - s / 2.0, s / 4.0, s / 4.0), color);
                frame.rect(
                    Rect::new(x + s / 4.0 + 3.0, y - s / 2.0 + 3.0, s / 4.0 - 6.0, s / 5.0),
                    WINDOW,
                );
                frame.rect(Rect::new(x - s * 0.4, y - s / 3.0, s * 0.6, s / 10.0), secondary);
                let light = if flash(200.0) { rgb(255, 100, 100) } else { rgb(255, 200, 200) };
                frame.circle(Vec2::new(x + s / 3.0, y - s / 2.0 - 10.0), 8.0, light);
                for wx in [x - s / 3.0, x + s / 4.0] {
                    frame.circle(Vec2::new(wx, y + s / 4.0), s / 7.0, TIRE);
                }
            }
            "airplane" => {
                frame.polygon(
                    &[
                        Vec2::new(x + s / 2.0, y),
                        Vec2::new(x + s / 4.0, y - s / 10.0),
                        Vec2::new(x - s / 2.0, y - s / 10.0),
                        Vec2::new(x - s / 2.0, y + s / 10.0),
                        Vec2::new(x + s / 4.0, y + s / 10.0),
                    ],
                    color,
                );
                for side in [-1.0, 1.0] {
                    frame.polygon(
                        &[
                            Vec2::new(x - s / 6.0, y + side * s / 10.0),
                            Vec2::new(x - s / 4.0, y + side * s / 2.0),
                            Vec2::new(x + s / 6.0, y + side * s / 2.0),
                            Vec2::new(x + s / 6.0, y + side * s / 10.0),
                        ],
                        secondary,
                    );
                }
                frame.polygon(
                    &[
                        Vec2::new(x - s / 2.0, y - s / 10.0),
                        Vec2::new(x - s * 0.6, y - s / 3.0),
                        Vec2::new(x - s * 0.4, y - s / 10.0),
                    ],
                    secondary,
                );
                for i in 0..3 {
                    frame.circle(Vec2::new(x + s / 4.0 - i as f32 * (s / 6.0), y), 5.0, WINDOW);
                }
            }
            "ambulance" => {
                frame.rounded_rect(Rect::new(x - s / 2.0, y - s / 4.0, s, s / 2.0), 5.0, color);
                frame.rect(Rect::new(x - s / 2.0, y - s / 8.0, s, s / 8.0), secondary);
                let c = s / 6.0;
                frame.rect(Rect::new(x - c / 2.0, y - s / 6.0 - c, c, c * 2.0), secondary);
                frame.rect(Rect::new(x - c, y - s / 6.0 - c / 2.0, c * 2.0, c), secondary);
                let light = if flash(150.0) { rgb(255, 50, 50) } else { rgb(50, 50, 255) };
                frame.circle(Vec2::new(x, y - s / 4.0 - 10.0), 8.0, light);
                for wx in [x - s / 3.0, x + s / 3.0] {
                    frame.circle(Vec2::new(wx, y + s / 4.0), s / 7.0, TIRE);
                }
            }
            "motorcycle" => {
                let radius = s / 5.0;
                for wx in [x - s / 3.0, x + s / 4.0] {
                    draw_wheel(frame, Vec2::new(wx, y + s / 6.0), radius, wheels, 8);
                }
                frame.line(Vec2::new(x - s / 3.0, y), Vec2::new(x, y - s / 4.0), 5.0, color);
                frame.line(Vec2::new(x, y - s / 4.0), Vec2::new(x + s / 4.0, y), 5.0, color);
                frame.ellipse(Vec2::new(x, y - s / 6.0), Vec2::new(s / 6.0, s / 12.0), color);
                frame.ellipse(
                    Vec2::new(x, y - s / 5.0 + s / 16.0),
                    Vec2::new(s / 8.0, s / 16.0),
                    TIRE,
                );
                frame.line(
                    Vec2::new(x + s / 6.0, y - s / 4.0),
                    Vec2::new(x + s / 4.0, y - s / 3.0),
                    4.0,
                    secondary,
                );
            }
            "ship" => {
                let y = y + (self.clock * 5.0).sin() * 5.0;
                frame.polygon(
                    &[
                        Vec2::new(x - s / 2.0, y),
                        Vec2::new(x - s * 0.4, y + s / 3.0),
                        Vec2::new(x + s * 0.4, y + s / 3.0),
                        Vec2::new(x + s / 2.0, y),
                    ],
                    secondary,
                );
                frame.rect(Rect::new(x - s * 0.4, y - s / 6.0, s * 0.8, s / 4.0), color);
                frame.rect(
                    Rect::new(x - s / 10.0, y - s / 3.0, s / 5.0, s / 4.0),
                    rgb(100, 100, 100),
                );
                for i in 0..3 {
                    frame.circle(Vec2::new(x - s / 4.0 + i as f32 * (s / 4.0), y), 6.0, WINDOW);
                }
                let wave_y = y + s / 3.0 + 15.0;
                let drift = (self.clock * 1000.0 / 50.0) % 30.0;
                for i in -2..3 {
                    let wave_x = x + i as f32 * 30.0 + drift;
                    frame.push(shapes::arc(
                        Vec2::new(wave_x, wave_y),
                        12.0,
                        15.0,
                        PI,
                        TAU,
                        rgb(100, 180, 255),
                        12,
                    ));
                }
            }
            _ => {}
        }
    }
}

/// Tire with rotating spokes
fn draw_wheel(frame: &mut Frame, center: Vec2, radius: f32, rotation_deg: f32, spokes: u32) {
    frame.circle(center, radius, TIRE);
    let len = radius - 3.0;
    for i in 0..spokes {
        let angle = (i as f32 * 360.0 / spokes as f32 + rotation_deg).to_radians();
        frame.line(center, center + Vec2::from_angle(angle) * len, 2.0, SPOKE);
    }
}

impl Game for VehicleGo {
    fn kind(&self) -> GameKind {
        GameKind::VehicleGo
    }

    fn on_enter(&mut self) {
        log::info!("Entered {}", self.kind().name());
    }

    fn on_exit(&mut self) {
        self.running = None;
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
            InputEvent::PointerDown(p) => {
                if let Some(index) = self.buttons.iter().position(|r| r.contains(p)) {
                    self.launch(index, audio);
                }
            }
            _ => {}
        }
    }

    fn update(&mut self, dt: f32, _audio: &mut dyn SoundPlayer) {
        self.clock += dt;

        if let Some(mut running) = self.running.take() {
            let on_screen = running.update(dt);
            if self.rng.random_bool(TRAIL_CHANCE) {
                self.spawn_trail(VEHICLES[running.index].trail(), running.pos);
            }
            if on_screen {
                self.running = Some(running);
            } else {
                log::debug!("{} left the screen", VEHICLES[running.index].key);
            }
        }

        self.particles.update(dt);
    }

    fn draw<'a>(&'a self, frame: &mut Frame<'a>) {
        frame.set_clear(colors::BACKGROUND_CREAM);

        for index in 0..VEHICLES.len() {
            self.draw_button(frame, index);
        }

        frame.rect(Rect::new(0.0, LANE_Y - 50.0, SCREEN_WIDTH, 200.0), LANE);
        frame.rect(Rect::new(0.0, LANE_Y + 80.0, SCREEN_WIDTH, 5.0), colors::LIGHT_GRAY);
        frame.particles(&self.particles);

        if let Some(running) = &self.running {
            match self.sprites[running.index] {
                Sprite::Custom(id) => frame.image(id, Rect::from_center(running.pos, 150.0, 100.0)),
                Sprite::Procedural => self.draw_vehicle(
                    frame,
                    running.index,
                    running.pos,
                    RUNNING_SIZE,
                    running.wheel_rotation,
                ),
            }
        }

        self.back.draw(frame);
    }

    fn return_requested(&self) -> bool {
        self.quit
    }
}
