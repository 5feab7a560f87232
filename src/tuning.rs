//! Data-driven game balance
//!
//! Every gameplay number the simulation reads lives here. Defaults come from
//! [`crate::consts`]; a page may override any subset through a JSON block.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Errors from loading or validating a tuning block
#[derive(Debug, Error)]
pub enum TuningError {
    /// The JSON could not be parsed into a `Tuning`
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// A value parsed but makes no sense for the game
    #[error("Invalid tuning value `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

/// Game balance parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Ship ===
    pub ship_radius: f32,
    /// Radians per step while a rotate input is held
    pub ship_rotation_speed: f32,
    pub fire_cooldown_ms: f64,
    pub muzzle_offset: f32,

    // === Bullets ===
    pub bullet_radius: f32,
    pub bullet_speed: f32,
    pub bullet_lifetime_ms: f64,

    // === Asteroids ===
    pub asteroid_radius_per_tier: f32,
    pub asteroid_min_speed: f32,
    pub asteroid_max_speed: f32,

    // === Waves ===
    pub wave_size: usize,
    pub spawn_edge_margin: f32,
    pub spawn_interval_start_ms: u32,
    pub spawn_interval_step_ms: u32,
    pub spawn_interval_floor_ms: u32,

    // === Scoring / ability ===
    pub score_per_asteroid: u64,
    pub score_per_special: u64,
    pub special_cooldown_ms: f64,

    // === Debris ===
    pub particles_per_explosion: usize,
    pub particle_lifetime_ms: f64,
    /// Hard cap on live particles (oldest dropped first)
    pub max_particles: usize,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            ship_radius: SHIP_RADIUS,
            ship_rotation_speed: SHIP_ROTATION_SPEED,
            fire_cooldown_ms: SHIP_FIRE_COOLDOWN_MS,
            muzzle_offset: SHIP_MUZZLE_OFFSET,

            bullet_radius: BULLET_RADIUS,
            bullet_speed: BULLET_SPEED,
            bullet_lifetime_ms: BULLET_LIFETIME_MS,

            asteroid_radius_per_tier: ASTEROID_RADIUS_PER_TIER,
            asteroid_min_speed: ASTEROID_MIN_SPEED,
            asteroid_max_speed: ASTEROID_MAX_SPEED,

            wave_size: WAVE_SIZE,
            spawn_edge_margin: SPAWN_EDGE_MARGIN,
            spawn_interval_start_ms: SPAWN_INTERVAL_START_MS,
            spawn_interval_step_ms: SPAWN_INTERVAL_STEP_MS,
            spawn_interval_floor_ms: SPAWN_INTERVAL_FLOOR_MS,

            score_per_asteroid: SCORE_PER_ASTEROID,
            score_per_special: SCORE_PER_SPECIAL,
            special_cooldown_ms: SPECIAL_COOLDOWN_MS,

            particles_per_explosion: PARTICLES_PER_EXPLOSION,
            particle_lifetime_ms: PARTICLE_LIFETIME_MS,
            max_particles: 2000,
        }
    }
}

impl Tuning {
    /// Parse a (possibly partial) tuning block and validate it
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), TuningError> {
        fn positive(field: &'static str, value: f64) -> Result<(), TuningError> {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(TuningError::Invalid {
                    field,
                    reason: "must be a positive number",
                })
            }
        }

        fn non_negative(field: &'static str, value: f64) -> Result<(), TuningError> {
            if value.is_finite() && value >= 0.0 {
                Ok(())
            } else {
                Err(TuningError::Invalid {
                    field,
                    reason: "must be zero or positive",
                })
            }
        }

        positive("ship_radius", self.ship_radius as f64)?;
        positive("ship_rotation_speed", self.ship_rotation_speed as f64)?;
        positive("bullet_radius", self.bullet_radius as f64)?;
        positive("bullet_speed", self.bullet_speed as f64)?;
        positive("bullet_lifetime_ms", self.bullet_lifetime_ms)?;
        positive("asteroid_radius_per_tier", self.asteroid_radius_per_tier as f64)?;
        positive("asteroid_min_speed", self.asteroid_min_speed as f64)?;
        positive("asteroid_max_speed", self.asteroid_max_speed as f64)?;
        positive("particle_lifetime_ms", self.particle_lifetime_ms)?;

        non_negative("fire_cooldown_ms", self.fire_cooldown_ms)?;
        non_negative("special_cooldown_ms", self.special_cooldown_ms)?;
        non_negative("muzzle_offset", self.muzzle_offset as f64)?;
        // Negative margins would drop waves onto the field
        non_negative("spawn_edge_margin", self.spawn_edge_margin as f64)?;

        if self.asteroid_max_speed < self.asteroid_min_speed {
            return Err(TuningError::Invalid {
                field: "asteroid_max_speed",
                reason: "must not be below asteroid_min_speed",
            });
        }
        if self.wave_size == 0 {
            return Err(TuningError::Invalid {
                field: "wave_size",
                reason: "must spawn at least one asteroid",
            });
        }
        if self.spawn_interval_floor_ms == 0 {
            return Err(TuningError::Invalid {
                field: "spawn_interval_floor_ms",
                reason: "must be above zero",
            });
        }
        if self.spawn_interval_floor_ms > self.spawn_interval_start_ms {
            return Err(TuningError::Invalid {
                field: "spawn_interval_floor_ms",
                reason: "must not exceed spawn_interval_start_ms",
            });
        }

        Ok(())
    }

    /// Radius of an asteroid of the given tier
    pub fn asteroid_radius(&self, tier: u8) -> f32 {
        tier as f32 * self.asteroid_radius_per_tier
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let tuning = Tuning::default();
        assert!(tuning.validate().is_ok());
        assert_eq!(tuning.asteroid_radius(3), 45.0);
        assert_eq!(tuning.asteroid_radius(1), 15.0);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "wave_size": 8, "bullet_speed": 9.5 }"#).unwrap();
        assert_eq!(tuning.wave_size, 8);
        assert_eq!(tuning.bullet_speed, 9.5);
        assert_eq!(tuning.ship_radius, SHIP_RADIUS);
        assert_eq!(tuning.spawn_interval_start_ms, SPAWN_INTERVAL_START_MS);
    }

    #[test]
    fn test_empty_object_is_default() {
        let tuning = Tuning::from_json("{}").unwrap();
        assert_eq!(tuning, Tuning::default());
    }

    #[test]
    fn test_json_roundtrip() {
        let mut tuning = Tuning::default();
        tuning.special_cooldown_ms = 5_000.0;
        let json = serde_json::to_string(&tuning).unwrap();
        assert_eq!(Tuning::from_json(&json).unwrap(), tuning);
    }

    #[test]
    fn test_rejects_malformed_json() {
        let err = Tuning::from_json("{ wave_size: ").unwrap_err();
        assert!(matches!(err, TuningError::Parse(_)));
    }

    #[test]
    fn test_rejects_invalid_values() {
        let err = Tuning::from_json(r#"{ "wave_size": 0 }"#).unwrap_err();
        assert!(matches!(err, TuningError::Invalid { field: "wave_size", .. }));

        let err = Tuning::from_json(r#"{ "bullet_speed": -1.0 }"#).unwrap_err();
        assert!(matches!(err, TuningError::Invalid { field: "bullet_speed", .. }));

        let err = Tuning::from_json(
            r#"{ "spawn_interval_start_ms": 400, "spawn_interval_floor_ms": 500 }"#,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            TuningError::Invalid {
                field: "spawn_interval_floor_ms",
                ..
            }
        ));
    }

    #[test]
    fn test_rejects_non_finite_and_negative_geometry() {
        // Overflows f32 to infinity
        let err = Tuning::from_json(r#"{ "asteroid_max_speed": 1e39 }"#).unwrap_err();
        assert!(matches!(err, TuningError::Invalid { field: "asteroid_max_speed", .. }));

        let err = Tuning::from_json(r#"{ "spawn_edge_margin": -300 }"#).unwrap_err();
        assert!(matches!(err, TuningError::Invalid { field: "spawn_edge_margin", .. }));

        let err = Tuning::from_json(r#"{ "muzzle_offset": -1e39 }"#).unwrap_err();
        assert!(matches!(err, TuningError::Invalid { field: "muzzle_offset", .. }));

        let err = Tuning::from_json(r#"{ "ship_rotation_speed": -5 }"#).unwrap_err();
        assert!(matches!(err, TuningError::Invalid { field: "ship_rotation_speed", .. }));

        // Zero margin and muzzle offset are fine
        assert!(Tuning::from_json(r#"{ "spawn_edge_margin": 0, "muzzle_offset": 0 }"#).is_ok());
    }

    #[test]
    fn test_error_message() {
        let err = TuningError::Invalid {
            field: "wave_size",
            reason: "must spawn at least one asteroid",
        };
        assert_eq!(
            err.to_string(),
            "Invalid tuning value `wave_size`: must spawn at least one asteroid"
        );
    }
}
