//! Fixed timestep simulation tick
//!
//! Core game loop that advances simulation deterministically.

use bitflags::bitflags;

use super::collision::{find_bullet_hits, ship_collision};
use super::spawn::update_spawns;
use super::state::{GameEvent, GamePhase, GameState};
use crate::consts::FRAME_MS;

bitflags! {
    /// Logical actions currently held down
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Actions: u8 {
        const ROTATE_LEFT = 1 << 0;
        const ROTATE_RIGHT = 1 << 1;
        const FIRE = 1 << 2;
        const SPECIAL = 1 << 3;
    }
}

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    /// Held actions (level-triggered)
    pub held: Actions,
    /// Pause toggle (one-shot)
    pub pause: bool,
}

impl TickInput {
    pub fn holding(held: Actions) -> Self {
        Self { held, pause: false }
    }
}

/// Advance the game state by one fixed timestep
///
/// Update order: stars, particles, ship, bullets, asteroids; then bullet
/// hits, then the ship check, then wave spawning.
pub fn tick(state: &mut GameState, input: &TickInput) {
    state.events.clear();

    // Handle pause toggle
    if input.pause {
        match state.phase {
            GamePhase::Playing => {
                state.phase = GamePhase::Paused;
                log::info!("Paused");
                return;
            }
            GamePhase::Paused => {
                state.phase = GamePhase::Playing;
                log::info!("Resumed");
            }
            GamePhase::GameOver => {}
        }
    }

    // Don't tick if paused or game over
    if state.phase != GamePhase::Playing {
        return;
    }

    state.time_ticks += 1;
    state.clock_ms += FRAME_MS;
    let now = state.clock_ms;
    let field = state.field;

    for star in state.stars.iter_mut() {
        star.update(&mut state.rng, field);
    }

    for particle in state.particles.iter_mut() {
        particle.update();
    }

    update_ship(state, input.held);

    for bullet in state.bullets.iter_mut() {
        bullet.update(now, field);
    }

    for asteroid in state.asteroids.iter_mut() {
        asteroid.update(field);
    }

    // Bullets vs asteroids
    for hit in find_bullet_hits(&state.bullets, &state.asteroids) {
        state.bullets[hit.bullet].alive = false;
        state.destroy_asteroid(hit.asteroid);
    }

    // Ship vs asteroids
    if let Some(index) = ship_collision(&state.ship, &state.asteroids) {
        let asteroid = &state.asteroids[index];
        log::info!(
            "Ship hit by {:?} asteroid at ({:.0}, {:.0}); final score {}",
            asteroid.size,
            asteroid.pos.x,
            asteroid.pos.y,
            state.score
        );
        state.phase = GamePhase::GameOver;
        state.events.push(GameEvent::GameOver { score: state.score });
    }

    state.compact();

    if state.phase == GamePhase::Playing {
        update_spawns(state);
    }
}

/// Rotate, fire, and trigger the special ability from held input
fn update_ship(state: &mut GameState, held: Actions) {
    let now = state.clock_ms;

    if held.contains(Actions::ROTATE_LEFT) {
        state.ship.rotate_left();
    }
    if held.contains(Actions::ROTATE_RIGHT) {
        state.ship.rotate_right();
    }

    if held.contains(Actions::FIRE) {
        if let Some(bullet) = state.ship.try_fire(&state.tuning, now) {
            state.bullets.push(bullet);
            state.events.push(GameEvent::ShotFired);
        }
    }

    // Presses while on cooldown are dropped, not queued
    if held.contains(Actions::SPECIAL) && state.special_ready() {
        state.use_special();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{AsteroidSize, Bullet};
    use crate::tuning::Tuning;
    use glam::Vec2;

    /// A game with no opening asteroids and no timed waves
    fn quiet_state(seed: u64) -> GameState {
        let mut tuning = Tuning::default();
        tuning.spawn_interval_start_ms = 10_000_000;
        tuning.spawn_interval_floor_ms = 10_000_000;
        let mut state = GameState::with_tuning(seed, 800.0, 600.0, tuning, 10);
        state.asteroids.clear();
        state
    }

    fn still_bullet(pos: Vec2, now_ms: f64) -> Bullet {
        let mut bullet = Bullet::fire(pos, 0.0, &Tuning::default(), now_ms);
        bullet.pos = pos;
        bullet.vel = Vec2::ZERO;
        bullet
    }

    #[test]
    fn test_rotation() {
        let mut state = quiet_state(1);
        tick(&mut state, &TickInput::holding(Actions::ROTATE_RIGHT));
        assert!((state.ship.angle - 0.05).abs() < 0.0001);
        tick(&mut state, &TickInput::holding(Actions::ROTATE_LEFT));
        tick(&mut state, &TickInput::holding(Actions::ROTATE_LEFT));
        assert!((state.ship.angle + 0.05).abs() < 0.0001);
        tick(
            &mut state,
            &TickInput::holding(Actions::ROTATE_LEFT | Actions::ROTATE_RIGHT),
        );
        assert!((state.ship.angle + 0.05).abs() < 0.0001);
    }

    #[test]
    fn test_fire_respects_cooldown() {
        let mut state = quiet_state(1);
        let mut shots = 0;
        for _ in 0..30 {
            tick(&mut state, &TickInput::holding(Actions::FIRE));
            shots += state
                .events
                .iter()
                .filter(|e| **e == GameEvent::ShotFired)
                .count();
        }
        assert_eq!(shots, 1);

        for _ in 0..3 {
            tick(&mut state, &TickInput::holding(Actions::FIRE));
            shots += state
                .events
                .iter()
                .filter(|e| **e == GameEvent::ShotFired)
                .count();
        }
        assert_eq!(shots, 2);
    }

    #[test]
    fn test_bullet_linear_motion_and_expiry() {
        let mut state = quiet_state(1);
        let mut bullet = Bullet::fire(Vec2::ZERO, 0.0, &Tuning::default(), 0.0);
        bullet.pos = Vec2::new(100.0, 100.0);
        bullet.vel = Vec2::new(2.0, 1.5);
        state.bullets.push(bullet);

        for _ in 0..20 {
            tick(&mut state, &TickInput::default());
        }
        assert_eq!(state.bullets[0].pos, Vec2::new(140.0, 130.0));

        for _ in 20..59 {
            tick(&mut state, &TickInput::default());
        }
        assert_eq!(state.bullets.len(), 1);

        tick(&mut state, &TickInput::default());
        tick(&mut state, &TickInput::default());
        assert!(state.bullets.is_empty());
    }

    #[test]
    fn test_full_cascade_scores_70() {
        let mut state = quiet_state(3);
        state.spawn_asteroid(Vec2::new(100.0, 100.0), AsteroidSize::Large);

        let mut steps = 0;
        while !state.asteroids.is_empty() {
            let now = state.clock_ms;
            let targets: Vec<Vec2> = state.asteroids.iter().map(|a| a.pos).collect();
            for pos in targets {
                state.bullets.push(still_bullet(pos, now));
            }
            tick(&mut state, &TickInput::default());
            steps += 1;
            assert!(steps <= 3, "cascade should finish in three steps");
        }

        assert_eq!(state.score, 70);
        assert_eq!(state.phase, GamePhase::Playing);
        let destroyed = |size: AsteroidSize| {
            state
                .events
                .iter()
                .filter(|e| matches!(e, GameEvent::AsteroidDestroyed { size: s, .. } if *s == size))
                .count()
        };
        assert_eq!(destroyed(AsteroidSize::Small), 4);
    }

    #[test]
    fn test_hit_removes_bullet_and_splits() {
        let mut state = quiet_state(4);
        state.spawn_asteroid(Vec2::new(100.0, 100.0), AsteroidSize::Medium);
        state.bullets.push(still_bullet(Vec2::new(100.0, 100.0), 0.0));

        tick(&mut state, &TickInput::default());

        assert!(state.bullets.is_empty());
        assert_eq!(state.score, 10);
        assert_eq!(state.asteroids.len(), 2);
        assert!(state.asteroids.iter().all(|a| a.size == AsteroidSize::Small));
        assert_eq!(state.particles.len(), 20);
    }

    #[test]
    fn test_children_not_hit_in_the_step_they_spawn() {
        let mut state = quiet_state(12);
        let spot = Vec2::new(100.0, 100.0);
        state.spawn_asteroid(spot, AsteroidSize::Large);
        state.asteroids[0].vel = Vec2::ZERO;
        state.bullets.push(still_bullet(spot, 0.0));
        state.bullets.push(still_bullet(spot, 0.0));

        tick(&mut state, &TickInput::default());

        // One kill; the second bullet waits for the children
        assert_eq!(state.score, 10);
        assert_eq!(state.bullets.len(), 1);
        assert_eq!(state.asteroids.len(), 2);
        assert!(state.asteroids.iter().all(|a| a.size == AsteroidSize::Medium));

        tick(&mut state, &TickInput::default());

        assert_eq!(state.score, 20);
        assert!(state.bullets.is_empty());
        assert_eq!(state.asteroids.len(), 3);
    }

    #[test]
    fn test_special_clears_field_and_cools_down() {
        let mut state = GameState::with_tuning(5, 800.0, 600.0, quiet_state(5).tuning, 0);
        assert_eq!(state.asteroids.len(), 5);
        state.bullets.push(still_bullet(Vec2::new(10.0, 10.0), 0.0));

        let special = TickInput::holding(Actions::SPECIAL);
        tick(&mut state, &special);
        assert!(state.asteroids.is_empty());
        assert!(state.bullets.is_empty());
        assert_eq!(state.score, 50);
        assert!(!state.special_ready());

        // Held through most of the cooldown: ignored
        for _ in 0..590 {
            tick(&mut state, &special);
        }
        assert_eq!(state.score, 50);

        // Ready again ten seconds after use
        for _ in 0..20 {
            tick(&mut state, &special);
        }
        assert_eq!(state.score, 100);
    }

    #[test]
    fn test_ship_collision_ends_game() {
        let mut state = quiet_state(6);
        let center = state.ship.pos;
        state.spawn_asteroid(center + Vec2::new(30.0, 0.0), AsteroidSize::Small);
        // Unrelated kill in the same frame doesn't save the ship
        state.spawn_asteroid(Vec2::new(100.0, 100.0), AsteroidSize::Small);
        state.bullets.push(still_bullet(Vec2::new(100.0, 100.0), 0.0));

        tick(&mut state, &TickInput::default());

        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.score, 10);
        assert!(state.events.contains(&GameEvent::GameOver { score: 10 }));

        // Further ticks are no-ops
        let clock = state.clock_ms;
        tick(&mut state, &TickInput::holding(Actions::FIRE));
        assert_eq!(state.clock_ms, clock);
        assert!(state.bullets.is_empty());
    }

    #[test]
    fn test_pause_freezes_clock() {
        let mut state = quiet_state(7);
        tick(&mut state, &TickInput::default());
        let clock = state.clock_ms;

        let pause = TickInput {
            pause: true,
            ..Default::default()
        };
        tick(&mut state, &pause);
        assert_eq!(state.phase, GamePhase::Paused);
        tick(&mut state, &TickInput::default());
        assert_eq!(state.clock_ms, clock);

        tick(&mut state, &pause);
        assert_eq!(state.phase, GamePhase::Playing);
        assert!(state.clock_ms > clock);
    }

    #[test]
    fn test_waves_keep_coming() {
        let mut state = GameState::new(8, 800.0, 600.0);
        let mut waves = 1;
        for _ in 0..(60 * 5) {
            tick(&mut state, &TickInput::default());
            waves += state
                .events
                .iter()
                .filter(|e| matches!(e, GameEvent::WaveSpawned { .. }))
                .count();
            if state.phase == GamePhase::GameOver {
                break;
            }
        }
        assert!(waves >= 2 || state.phase == GamePhase::GameOver);
        assert_eq!(state.spawn.wave as usize, waves);
    }

    #[test]
    fn test_determinism() {
        // Two states with same seed should produce identical results
        let mut state1 = GameState::new(99999, 800.0, 600.0);
        let mut state2 = GameState::new(99999, 800.0, 600.0);

        let inputs = [
            TickInput::holding(Actions::ROTATE_LEFT | Actions::FIRE),
            TickInput::holding(Actions::FIRE),
            TickInput::holding(Actions::ROTATE_RIGHT),
            TickInput::default(),
        ];

        for _ in 0..100 {
            for input in &inputs {
                tick(&mut state1, input);
                tick(&mut state2, input);
            }
        }

        assert_eq!(state1.time_ticks, state2.time_ticks);
        assert_eq!(state1.score, state2.score);
        assert_eq!(state1.phase, state2.phase);
        assert_eq!(state1.asteroids.len(), state2.asteroids.len());
        for (a, b) in state1.asteroids.iter().zip(&state2.asteroids) {
            assert_eq!(a.pos, b.pos);
            assert_eq!(a.size, b.size);
        }
        assert!((state1.ship.angle - state2.ship.angle).abs() < 0.0001);
    }
}
