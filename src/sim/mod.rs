//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (collection order, dead entities compacted once per tick)
//! - No rendering or platform dependencies

pub mod collision;
pub mod spawn;
pub mod state;
pub mod tick;

pub use collision::{BulletHit, circles_overlap, find_bullet_hits, ship_collision};
pub use spawn::{SpawnEdge, SpawnSchedule, spawn_wave, update_spawns};
pub use state::{
    Asteroid, AsteroidSize, Bullet, GameEvent, GamePhase, GameState, Particle, Ship, Star,
};
pub use tick::{Actions, TickInput, tick};
