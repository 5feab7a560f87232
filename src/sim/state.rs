//! Game state and core simulation types
//!
//! Screen-space coordinates: origin top-left, y grows downward. Velocities are
//! pixels per step; timestamps are milliseconds on the simulation clock.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::spawn::SpawnSchedule;
use crate::consts::*;
use crate::tuning::Tuning;
use crate::{heading, random_range};

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Game is paused (simulation clock frozen)
    Paused,
    /// Ship was hit; waiting for restart
    GameOver,
}

/// Asteroid size tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AsteroidSize {
    Small = 1,
    Medium = 2,
    Large = 3,
}

impl AsteroidSize {
    /// Numeric tier (3 large, 2 medium, 1 small)
    pub fn tier(self) -> u8 {
        self as u8
    }

    pub fn from_tier(tier: u8) -> Option<Self> {
        match tier {
            1 => Some(AsteroidSize::Small),
            2 => Some(AsteroidSize::Medium),
            3 => Some(AsteroidSize::Large),
            _ => None,
        }
    }

    /// Size of the children produced when this asteroid is destroyed
    pub fn split(self) -> Option<Self> {
        match self {
            AsteroidSize::Large => Some(AsteroidSize::Medium),
            AsteroidSize::Medium => Some(AsteroidSize::Small),
            AsteroidSize::Small => None,
        }
    }
}

/// Decorative background star, falls forever
#[derive(Debug, Clone)]
pub struct Star {
    pub pos: Vec2,
    pub radius: f32,
    /// Pixels per step, downward
    pub speed: f32,
}

impl Star {
    pub fn new(rng: &mut Pcg32, field: Vec2) -> Self {
        Self {
            pos: Vec2::new(
                random_range(rng, 0.0, field.x),
                random_range(rng, 0.0, field.y),
            ),
            radius: random_range(rng, 0.0, STAR_MAX_RADIUS),
            speed: random_range(rng, 0.0, STAR_MAX_SPEED),
        }
    }

    /// Drift down; past the bottom edge, reappear at the top with a new x
    pub fn update(&mut self, rng: &mut Pcg32, field: Vec2) {
        self.pos.y += self.speed;
        if self.pos.y > field.y {
            self.pos.y = 0.0;
            self.pos.x = random_range(rng, 0.0, field.x);
        }
    }
}

/// Cosmetic debris from a destroyed asteroid
#[derive(Debug, Clone)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub spawn_ms: f64,
    pub lifetime_ms: f64,
}

impl Particle {
    pub fn new(rng: &mut Pcg32, pos: Vec2, now_ms: f64, lifetime_ms: f64) -> Self {
        Self {
            pos,
            vel: Vec2::new(
                random_range(rng, -PARTICLE_MAX_SPEED, PARTICLE_MAX_SPEED),
                random_range(rng, -PARTICLE_MAX_SPEED, PARTICLE_MAX_SPEED),
            ),
            radius: random_range(rng, PARTICLE_MIN_RADIUS, PARTICLE_MAX_RADIUS),
            spawn_ms: now_ms,
            lifetime_ms,
        }
    }

    pub fn update(&mut self) {
        self.pos += self.vel;
    }

    pub fn is_expired(&self, now_ms: f64) -> bool {
        now_ms - self.spawn_ms > self.lifetime_ms
    }

    /// Remaining life in 0..=1 (for fading)
    pub fn life_fraction(&self, now_ms: f64) -> f32 {
        (1.0 - (now_ms - self.spawn_ms) / self.lifetime_ms).clamp(0.0, 1.0) as f32
    }
}

/// A projectile fired by the ship
#[derive(Debug, Clone)]
pub struct Bullet {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub spawn_ms: f64,
    pub lifetime_ms: f64,
    pub alive: bool,
}

impl Bullet {
    /// Fire from `origin` along `angle`, starting at the muzzle offset
    pub fn fire(origin: Vec2, angle: f32, tuning: &Tuning, now_ms: f64) -> Self {
        let dir = heading(angle);
        Self {
            pos: origin + dir * tuning.muzzle_offset,
            vel: dir * tuning.bullet_speed,
            radius: tuning.bullet_radius,
            spawn_ms: now_ms,
            lifetime_ms: tuning.bullet_lifetime_ms,
            alive: true,
        }
    }

    /// Move one step; dies when too old or outside the visible field
    pub fn update(&mut self, now_ms: f64, field: Vec2) {
        self.pos += self.vel;

        let expired = now_ms - self.spawn_ms > self.lifetime_ms;
        let off_screen = self.pos.x < 0.0
            || self.pos.x > field.x
            || self.pos.y < 0.0
            || self.pos.y > field.y;
        if expired || off_screen {
            self.alive = false;
        }
    }
}

/// A drifting polygonal rock
#[derive(Debug, Clone)]
pub struct Asteroid {
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: AsteroidSize,
    /// Collision radius (also the nominal polygon radius)
    pub radius: f32,
    /// Per-vertex radial jitter, fixed at creation
    pub offsets: Vec<f32>,
    pub alive: bool,
}

impl Asteroid {
    pub fn new(pos: Vec2, size: AsteroidSize, rng: &mut Pcg32, tuning: &Tuning) -> Self {
        let speed = random_range(rng, tuning.asteroid_min_speed, tuning.asteroid_max_speed);
        let angle = random_range(rng, 0.0, std::f32::consts::TAU);
        let vertex_count = rng.random_range(ASTEROID_VERTICES);
        let offsets = (0..vertex_count)
            .map(|_| random_range(rng, ASTEROID_MIN_JITTER, ASTEROID_MAX_JITTER))
            .collect();

        Self {
            pos,
            vel: heading(angle) * speed,
            size,
            radius: tuning.asteroid_radius(size.tier()),
            offsets,
            alive: true,
        }
    }

    /// Move one step, wrapping once fully past any edge
    pub fn update(&mut self, field: Vec2) {
        self.pos += self.vel;

        let r = self.radius;
        if self.pos.x < -r {
            self.pos.x = field.x + r;
        }
        if self.pos.x > field.x + r {
            self.pos.x = -r;
        }
        if self.pos.y < -r {
            self.pos.y = field.y + r;
        }
        if self.pos.y > field.y + r {
            self.pos.y = -r;
        }
    }

    /// Polygon outline in world space
    pub fn outline(&self) -> Vec<Vec2> {
        let n = self.offsets.len() as f32;
        self.offsets
            .iter()
            .enumerate()
            .map(|(i, offset)| {
                let angle = (i as f32 / n) * std::f32::consts::TAU;
                self.pos + heading(angle) * (self.radius * offset)
            })
            .collect()
    }
}

/// Ship hull in local space (nose along +x)
const SHIP_HULL: [Vec2; 4] = [
    Vec2::new(20.0, 0.0),
    Vec2::new(-15.0, 12.0),
    Vec2::new(-10.0, 0.0),
    Vec2::new(-15.0, -12.0),
];

/// The player's ship: rotates in place and fires
#[derive(Debug, Clone)]
pub struct Ship {
    pub pos: Vec2,
    /// Facing angle in radians
    pub angle: f32,
    pub radius: f32,
    pub rotation_speed: f32,
    pub fire_cooldown_ms: f64,
    /// Time of the last shot (`None` until the first one)
    pub last_shot_ms: Option<f64>,
}

impl Ship {
    pub fn new(pos: Vec2, tuning: &Tuning) -> Self {
        Self {
            pos,
            angle: 0.0,
            radius: tuning.ship_radius,
            rotation_speed: tuning.ship_rotation_speed,
            fire_cooldown_ms: tuning.fire_cooldown_ms,
            last_shot_ms: None,
        }
    }

    pub fn rotate_left(&mut self) {
        self.angle -= self.rotation_speed;
    }

    pub fn rotate_right(&mut self) {
        self.angle += self.rotation_speed;
    }

    /// Whether the firing cooldown has elapsed
    pub fn can_fire(&self, now_ms: f64) -> bool {
        match self.last_shot_ms {
            None => true,
            Some(last) => now_ms - last > self.fire_cooldown_ms,
        }
    }

    /// Fire a bullet if the cooldown allows it
    pub fn try_fire(&mut self, tuning: &Tuning, now_ms: f64) -> Option<Bullet> {
        if !self.can_fire(now_ms) {
            return None;
        }
        self.last_shot_ms = Some(now_ms);
        Some(Bullet::fire(self.pos, self.angle, tuning, now_ms))
    }

    /// Hull outline in world space
    pub fn outline(&self) -> [Vec2; 4] {
        let rot = Vec2::from_angle(self.angle);
        SHIP_HULL.map(|p| self.pos + rot.rotate(p))
    }
}

/// Notable things that happened during the last tick
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    ShotFired,
    AsteroidDestroyed { size: AsteroidSize, pos: Vec2 },
    SpecialUsed,
    WaveSpawned { wave: u32, interval_ms: u32 },
    GameOver { score: u64 },
}

/// Complete game state (deterministic for a given seed and input sequence)
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    /// Balance parameters for this run
    pub tuning: Tuning,
    /// Playfield size in pixels
    pub field: Vec2,
    pub phase: GamePhase,
    pub score: u64,
    /// Simulation clock (ms), advances only while playing
    pub clock_ms: f64,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub ship: Ship,
    pub bullets: Vec<Bullet>,
    pub asteroids: Vec<Asteroid>,
    /// Visual particles (not gameplay-affecting)
    pub particles: Vec<Particle>,
    /// Background stars (kept across restarts)
    pub stars: Vec<Star>,
    /// When the special ability becomes available again (`None` = ready)
    pub special_ready_at_ms: Option<f64>,
    pub spawn: SpawnSchedule,
    /// Events from the most recent tick
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Create a new game with default tuning and star count
    pub fn new(seed: u64, width: f32, height: f32) -> Self {
        Self::with_tuning(seed, width, height, Tuning::default(), STAR_COUNT)
    }

    /// Create a new game; the opening wave is spawned immediately
    pub fn with_tuning(
        seed: u64,
        width: f32,
        height: f32,
        tuning: Tuning,
        star_count: usize,
    ) -> Self {
        let field = Vec2::new(width, height);
        let mut rng = Pcg32::seed_from_u64(seed);
        let stars = (0..star_count).map(|_| Star::new(&mut rng, field)).collect();
        let ship = Ship::new(field / 2.0, &tuning);
        let spawn = SpawnSchedule::new(&tuning, 0.0);

        let mut state = Self {
            seed,
            rng,
            tuning,
            field,
            phase: GamePhase::Playing,
            score: 0,
            clock_ms: 0.0,
            time_ticks: 0,
            ship,
            bullets: Vec::new(),
            asteroids: Vec::new(),
            particles: Vec::new(),
            stars,
            special_ready_at_ms: None,
            spawn,
            events: Vec::new(),
        };

        super::spawn::spawn_wave(&mut state);
        state
    }

    /// Reset everything but the star field and RNG stream, then spawn the
    /// opening wave
    pub fn restart(&mut self) {
        self.phase = GamePhase::Playing;
        self.score = 0;
        self.ship = Ship::new(self.field / 2.0, &self.tuning);
        self.bullets.clear();
        self.asteroids.clear();
        self.particles.clear();
        self.special_ready_at_ms = None;
        self.spawn = SpawnSchedule::new(&self.tuning, self.clock_ms);
        self.events.clear();
        super::spawn::spawn_wave(self);
        log::info!("Game restarted (seed {})", self.seed);
    }

    /// Resize the playfield and re-centre the ship
    pub fn resize(&mut self, width: f32, height: f32) {
        self.field = Vec2::new(width, height);
        self.ship.pos = self.field / 2.0;
    }

    /// Whether the special ability can be triggered right now
    pub fn special_ready(&self) -> bool {
        match self.special_ready_at_ms {
            None => true,
            Some(at) => self.clock_ms >= at,
        }
    }

    /// Milliseconds until the special ability is ready again
    pub fn special_cooldown_remaining_ms(&self) -> f64 {
        self.special_ready_at_ms
            .map(|at| (at - self.clock_ms).max(0.0))
            .unwrap_or(0.0)
    }

    /// Add a live asteroid at the end of the collection
    pub fn spawn_asteroid(&mut self, pos: Vec2, size: AsteroidSize) {
        let asteroid = Asteroid::new(pos, size, &mut self.rng, &self.tuning);
        self.asteroids.push(asteroid);
    }

    /// Destroy the asteroid at `index`: score it, throw debris, and split it
    ///
    /// Children are appended to the collection alive; the destroyed asteroid
    /// is only marked dead and removed at the next compaction. Destroying an
    /// already-dead asteroid does nothing.
    pub fn destroy_asteroid(&mut self, index: usize) {
        let Some(asteroid) = self.asteroids.get_mut(index) else {
            return;
        };
        if !asteroid.alive {
            return;
        }
        asteroid.alive = false;
        let (pos, size) = (asteroid.pos, asteroid.size);

        self.score += self.tuning.score_per_asteroid;
        self.spawn_debris(pos);

        if let Some(child) = size.split() {
            for _ in 0..ASTEROID_SPLIT_COUNT {
                self.spawn_asteroid(pos, child);
            }
            log::debug!("Asteroid split: {:?} -> 2x {:?}", size, child);
        }

        self.events.push(GameEvent::AsteroidDestroyed { size, pos });
    }

    /// Clear the field: all asteroids and bullets vanish
    pub fn use_special(&mut self) {
        self.asteroids.clear();
        self.bullets.clear();
        self.score += self.tuning.score_per_special;
        let ready_at = self.clock_ms + self.tuning.special_cooldown_ms;
        self.special_ready_at_ms = Some(ready_at);
        self.events.push(GameEvent::SpecialUsed);
        log::debug!("Special ability used, ready again at {:.0}ms", ready_at);
    }

    /// Spawn an explosion of particles, dropping the oldest past the cap
    fn spawn_debris(&mut self, pos: Vec2) {
        for _ in 0..self.tuning.particles_per_explosion {
            let particle = Particle::new(
                &mut self.rng,
                pos,
                self.clock_ms,
                self.tuning.particle_lifetime_ms,
            );
            self.particles.push(particle);
        }

        let max = self.tuning.max_particles;
        if self.particles.len() > max {
            let excess = self.particles.len() - max;
            self.particles.drain(..excess);
        }
    }

    /// Drop every entity marked dead (once per tick)
    pub fn compact(&mut self) {
        let now = self.clock_ms;
        self.bullets.retain(|b| b.alive);
        self.asteroids.retain(|a| a.alive);
        self.particles.retain(|p| !p.is_expired(now));
    }

}
