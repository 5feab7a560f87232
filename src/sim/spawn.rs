//! Wave spawning and difficulty ramp
//!
//! Waves of large asteroids enter from just outside a random screen edge.
//! Each timed wave shortens the gap before the next one, down to a floor.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::state::{AsteroidSize, GameEvent, GameState};
use crate::random_range;
use crate::tuning::Tuning;

/// Screen edge a wave asteroid enters from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpawnEdge {
    Top,
    Right,
    Bottom,
    Left,
}

impl SpawnEdge {
    pub const ALL: [SpawnEdge; 4] = [
        SpawnEdge::Top,
        SpawnEdge::Right,
        SpawnEdge::Bottom,
        SpawnEdge::Left,
    ];

    pub fn random(rng: &mut Pcg32) -> Self {
        Self::ALL[rng.random_range(0..Self::ALL.len())]
    }

    /// A point `margin` pixels outside this edge, uniform along it
    pub fn spawn_point(self, rng: &mut Pcg32, field: Vec2, margin: f32) -> Vec2 {
        match self {
            SpawnEdge::Top => Vec2::new(random_range(rng, 0.0, field.x), -margin),
            SpawnEdge::Right => Vec2::new(field.x + margin, random_range(rng, 0.0, field.y)),
            SpawnEdge::Bottom => Vec2::new(random_range(rng, 0.0, field.x), field.y + margin),
            SpawnEdge::Left => Vec2::new(-margin, random_range(rng, 0.0, field.y)),
        }
    }
}

/// Timer for the next wave
#[derive(Debug, Clone, PartialEq)]
pub struct SpawnSchedule {
    /// Current gap between waves
    pub interval_ms: u32,
    /// Clock time of the last wave
    pub last_spawn_ms: f64,
    /// Waves spawned so far this run
    pub wave: u32,
}

impl SpawnSchedule {
    pub fn new(tuning: &Tuning, now_ms: f64) -> Self {
        Self {
            interval_ms: tuning.spawn_interval_start_ms,
            last_spawn_ms: now_ms,
            wave: 0,
        }
    }

    /// Whether strictly more than one interval has passed since the last wave
    pub fn is_due(&self, now_ms: f64) -> bool {
        now_ms - self.last_spawn_ms > self.interval_ms as f64
    }

    /// Restart the timer and tighten the interval toward the floor
    pub fn advance(&mut self, now_ms: f64, tuning: &Tuning) {
        self.last_spawn_ms = now_ms;
        if self.interval_ms > tuning.spawn_interval_floor_ms {
            self.interval_ms = self
                .interval_ms
                .saturating_sub(tuning.spawn_interval_step_ms)
                .max(tuning.spawn_interval_floor_ms);
        }
    }
}

/// Spawn one wave of large asteroids around the edges
pub fn spawn_wave(state: &mut GameState) {
    let margin = state.tuning.spawn_edge_margin;
    for _ in 0..state.tuning.wave_size {
        let edge = SpawnEdge::random(&mut state.rng);
        let pos = edge.spawn_point(&mut state.rng, state.field, margin);
        state.spawn_asteroid(pos, AsteroidSize::Large);
    }

    state.spawn.wave += 1;
    let wave = state.spawn.wave;
    let interval_ms = state.spawn.interval_ms;
    state.events.push(GameEvent::WaveSpawned { wave, interval_ms });
    log::info!(
        "Wave {} spawned ({} asteroids on field, next gap {}ms)",
        wave,
        state.asteroids.len(),
        interval_ms
    );
}

/// Spawn a wave if the schedule says one is due; returns whether it did
pub fn update_spawns(state: &mut GameState) -> bool {
    if !state.spawn.is_due(state.clock_ms) {
        return false;
    }
    let now = state.clock_ms;
    state.spawn.advance(now, &state.tuning);
    spawn_wave(state);
    true
}
