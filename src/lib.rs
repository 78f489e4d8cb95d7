//! Baby Fun Box - toddler mini-games behind a common launcher
//!
//! Core modules:
//! - `audio`: Procedural PCM synthesis and playback
//! - `sim`: Particles, spawn timers and hit-test geometry
//! - `renderer`: Display list and wgpu pipeline
//! - `assets`: Optional custom pictures and sounds
//! - `games`: The six mini-games behind the shared `Game` trait
//! - `launcher`: Game selection grid
//! - `app`: Native window and frame loop

pub mod app;
pub mod assets;
pub mod audio;
pub mod games;
pub mod launcher;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use settings::{QualityPreset, Settings};

/// Game configuration constants
pub mod consts {
    /// Logical screen size; all game coordinates use this space
    pub const SCREEN_WIDTH: f32 = 1024.0;
    pub const SCREEN_HEIGHT: f32 = 768.0;
    /// Target frame rate
    pub const FPS: u32 = 60;
    /// Largest frame delta handed to `update` (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// PCM output rate for synthesized sounds
    pub const SAMPLE_RATE: u32 = 22_050;

    /// Home button in the top-left corner of every game
    pub const BACK_BUTTON_POS: (f32, f32) = (20.0, 20.0);
    pub const BACK_BUTTON_SIZE: f32 = 60.0;

    /// Launcher tile size
    pub const ICON_SIZE: f32 = 150.0;
}

/// Seed for a fresh game RNG: the configured one, or the wall clock
pub fn seed_or_clock(seed: Option<u64>) -> u64 {
    seed.unwrap_or_else(|| {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0x5eed)
    })
}
