//! Asteroid Blaster - A browser arcade shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, collisions, waves, game state)
//! - `renderer`: WebGPU rendering pipeline
//! - `platform`: Browser/native platform abstraction (input, clock)
//! - `tuning`: Data-driven game balance
//! - `settings`: Visual quality preferences

pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use settings::{QualityPreset, Settings};
pub use tuning::{Tuning, TuningError};

use glam::Vec2;
use rand::Rng;

/// Game configuration constants
///
/// Velocities are in pixels per simulation step, times in milliseconds.
pub mod consts {
    /// Simulation steps per second
    pub const STEPS_PER_SECOND: f64 = 60.0;
    /// Fixed simulation timestep in milliseconds
    pub const FRAME_MS: f64 = 1000.0 / STEPS_PER_SECOND;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Largest frame delta fed into the accumulator (ms)
    pub const MAX_FRAME_DELTA_MS: f64 = 100.0;

    /// Fraction of the viewport the canvas occupies
    pub const CANVAS_VIEWPORT_FRACTION: f64 = 0.8;
    /// Field size used before the first resize (and by the native demo)
    pub const DEFAULT_FIELD_WIDTH: f32 = 800.0;
    pub const DEFAULT_FIELD_HEIGHT: f32 = 600.0;

    /// Ship defaults
    pub const SHIP_RADIUS: f32 = 20.0;
    pub const SHIP_ROTATION_SPEED: f32 = 0.05; // radians per step
    pub const SHIP_FIRE_COOLDOWN_MS: f64 = 500.0;
    /// Bullets leave the ship this far ahead of its centre
    pub const SHIP_MUZZLE_OFFSET: f32 = 20.0;

    /// Bullet defaults
    pub const BULLET_RADIUS: f32 = 3.0;
    pub const BULLET_SPEED: f32 = 7.0;
    pub const BULLET_LIFETIME_MS: f64 = 1000.0;

    /// Asteroid radius per size tier (large = 3 * 15)
    pub const ASTEROID_RADIUS_PER_TIER: f32 = 15.0;
    pub const ASTEROID_MIN_SPEED: f32 = 1.0;
    pub const ASTEROID_MAX_SPEED: f32 = 3.0;
    /// Polygon vertex count range (inclusive)
    pub const ASTEROID_VERTICES: std::ops::RangeInclusive<usize> = 7..=11;
    /// Radial jitter applied to each polygon vertex
    pub const ASTEROID_MIN_JITTER: f32 = 0.7;
    pub const ASTEROID_MAX_JITTER: f32 = 1.3;
    /// Children produced when a non-smallest asteroid is destroyed
    pub const ASTEROID_SPLIT_COUNT: usize = 2;

    /// Waves
    pub const WAVE_SIZE: usize = 5;
    pub const SPAWN_EDGE_MARGIN: f32 = 30.0;
    pub const SPAWN_INTERVAL_START_MS: u32 = 2000;
    pub const SPAWN_INTERVAL_STEP_MS: u32 = 100;
    pub const SPAWN_INTERVAL_FLOOR_MS: u32 = 500;

    /// Scoring
    pub const SCORE_PER_ASTEROID: u64 = 10;
    pub const SCORE_PER_SPECIAL: u64 = 50;

    /// Special ability cooldown
    pub const SPECIAL_COOLDOWN_MS: f64 = 10_000.0;

    /// Debris
    pub const PARTICLES_PER_EXPLOSION: usize = 20;
    pub const PARTICLE_LIFETIME_MS: f64 = 1000.0;
    pub const PARTICLE_MAX_SPEED: f32 = 2.0;
    pub const PARTICLE_MIN_RADIUS: f32 = 1.0;
    pub const PARTICLE_MAX_RADIUS: f32 = 3.0;

    /// Background stars
    pub const STAR_COUNT: usize = 100;
    pub const STAR_MAX_RADIUS: f32 = 2.0;
    pub const STAR_MAX_SPEED: f32 = 0.5;
}

/// Uniform random value between `min` and `max`
///
/// Nominally `[min, max)`, but f32 rounding can land exactly on `max`, so
/// callers must treat the upper bound as inclusive. Degenerate ranges
/// (`max <= min`) return `min` instead of panicking.
#[inline]
pub fn random_range<R: Rng + ?Sized>(rng: &mut R, min: f32, max: f32) -> f32 {
    if max <= min {
        return min;
    }
    rng.random::<f32>() * (max - min) + min
}

/// Euclidean distance between two points
#[inline]
pub fn distance(a: Vec2, b: Vec2) -> f32 {
    (b - a).length()
}

/// Unit vector for a heading in radians (0 = +x, y grows downward on screen)
#[inline]
pub fn heading(angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin())
}
