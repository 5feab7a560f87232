//! Scene building: game state to a flat vertex list
//!
//! Draw order is back to front: stars, particles, ship, bullets, asteroids.

use super::shapes;
use super::vertex::{Vertex, colors};
use crate::settings::Settings;
use crate::sim::GameState;

/// Stroke width for ship and asteroid outlines, in pixels
pub const OUTLINE_WIDTH: f32 = 2.0;

pub fn build_scene(state: &GameState, settings: &Settings) -> Vec<Vertex> {
    let segments = settings.quality.circle_segments();
    let mut vertices = Vec::new();

    if settings.starfield {
        for star in &state.stars {
            vertices.extend(shapes::circle(star.pos, star.radius, colors::STAR, segments));
        }
    }

    if settings.particles {
        for particle in &state.particles {
            let color = colors::faded(colors::PARTICLE, particle.life_fraction(state.clock_ms));
            vertices.extend(shapes::circle(particle.pos, particle.radius, color, segments));
        }
    }

    let glow = |color| settings.glow.then_some(color);

    vertices.extend(shapes::glowing_outline(
        &state.ship.outline(),
        OUTLINE_WIDTH,
        colors::SHIP,
        glow(colors::SHIP_GLOW),
    ));

    for bullet in state.bullets.iter().filter(|b| b.alive) {
        vertices.extend(shapes::circle(bullet.pos, bullet.radius, colors::BULLET, segments));
    }

    for asteroid in state.asteroids.iter().filter(|a| a.alive) {
        vertices.extend(shapes::glowing_outline(
            &asteroid.outline(),
            OUTLINE_WIDTH,
            colors::ASTEROID,
            glow(colors::ASTEROID_GLOW),
        ));
    }

    vertices
}
