//! Collision detection between circles
//!
//! Entity counts stay small, so every check is a plain pairwise scan.

use glam::Vec2;

use super::state::{Asteroid, Bullet, Ship};
use crate::distance;

/// A bullet that struck an asteroid this step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BulletHit {
    pub bullet: usize,
    pub asteroid: usize,
}

/// True when two circles overlap (touching does not count)
#[inline]
pub fn circles_overlap(a: Vec2, ra: f32, b: Vec2, rb: f32) -> bool {
    distance(a, b) < ra + rb
}

/// A bullet hits when its centre is inside the asteroid's radius
#[inline]
pub fn bullet_hits_asteroid(bullet: &Bullet, asteroid: &Asteroid) -> bool {
    distance(bullet.pos, asteroid.pos) < asteroid.radius
}

/// Pair live bullets with the asteroids they strike
///
/// Bullets are scanned in order. Each bullet takes the first live asteroid
/// it overlaps, and an asteroid claimed by an earlier bullet cannot be hit
/// again in the same step.
pub fn find_bullet_hits(bullets: &[Bullet], asteroids: &[Asteroid]) -> Vec<BulletHit> {
    let mut claimed = vec![false; asteroids.len()];
    let mut hits = Vec::new();

    for (bi, bullet) in bullets.iter().enumerate() {
        if !bullet.alive {
            continue;
        }
        let target = asteroids
            .iter()
            .enumerate()
            .find(|&(ai, asteroid)| {
                asteroid.alive && !claimed[ai] && bullet_hits_asteroid(bullet, asteroid)
            })
            .map(|(ai, _)| ai);

        if let Some(ai) = target {
            claimed[ai] = true;
            hits.push(BulletHit {
                bullet: bi,
                asteroid: ai,
            });
        }
    }

    hits
}

/// Index of the first live asteroid touching the ship, if any
pub fn ship_collision(ship: &Ship, asteroids: &[Asteroid]) -> Option<usize> {
    asteroids
        .iter()
        .position(|a| a.alive && circles_overlap(ship.pos, ship.radius, a.pos, a.radius))
}
