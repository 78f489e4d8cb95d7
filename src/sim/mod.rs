//! Simulation primitives shared by the games
//!
//! Pure and frame-rate independent:
//! - Seconds-based integration (`update(dt) -> bool`)
//! - Seeded RNG only
//! - No rendering or platform dependencies

pub mod geometry;
pub mod particle;
pub mod spawn;

pub use geometry::{Rect, circle_contains};
pub use particle::{Particle, ParticleSystem};
pub use spawn::SpawnTimer;

use rand::SeedableRng;
use rand_pcg::Pcg32;

/// Game RNG type
pub type GameRng = Pcg32;

/// Seeded RNG for one game instance
pub fn seeded_rng(seed: u64) -> GameRng {
    Pcg32::seed_from_u64(seed)
}

/// Convert a per-frame quantity at 60 FPS to per second
#[inline]
pub const fn per_second(per_frame: f32) -> f32 {
    per_frame * 60.0
}

/// Convert a per-frame-per-frame acceleration at 60 FPS to per second squared
#[inline]
pub const fn per_second_sq(per_frame_sq: f32) -> f32 {
    per_frame_sq * 3600.0
}
