//! Visual quality settings
//!
//! Chosen per page load from the URL query (`?quality=low&fps=1`); nothing
//! is persisted.

use serde::{Deserialize, Serialize};

use crate::consts::STAR_COUNT;
use crate::tuning::Tuning;

/// Quality preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum QualityPreset {
    Low,
    #[default]
    Medium,
    High,
}

impl QualityPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityPreset::Low => "Low",
            QualityPreset::Medium => "Medium",
            QualityPreset::High => "High",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(QualityPreset::Low),
            "medium" | "med" => Some(QualityPreset::Medium),
            "high" => Some(QualityPreset::High),
            _ => None,
        }
    }

    /// Maximum live debris particles for this preset
    pub fn max_particles(&self) -> usize {
        match self {
            QualityPreset::Low => 100,
            QualityPreset::Medium => 500,
            QualityPreset::High => 2000,
        }
    }

    /// Background star count
    pub fn star_count(&self) -> usize {
        match self {
            QualityPreset::Low => STAR_COUNT / 2,
            QualityPreset::Medium => STAR_COUNT,
            QualityPreset::High => STAR_COUNT * 2,
        }
    }

    /// Circle tessellation for bullets, particles and stars
    pub fn circle_segments(&self) -> u32 {
        match self {
            QualityPreset::Low => 6,
            QualityPreset::Medium => 10,
            QualityPreset::High => 16,
        }
    }
}

/// Visual preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Graphics quality preset
    pub quality: QualityPreset,
    /// Debris particles on asteroid destruction
    pub particles: bool,
    /// Drifting background stars
    pub starfield: bool,
    /// Soft halo under ship and asteroid outlines
    pub glow: bool,
    /// Show FPS counter in the HUD
    pub show_fps: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            quality: QualityPreset::Medium,
            particles: true,
            starfield: true,
            glow: true,
            show_fps: false,
        }
    }
}

impl Settings {
    /// Create settings from a quality preset (applies preset defaults)
    pub fn from_preset(preset: QualityPreset) -> Self {
        let mut settings = Self::default();
        settings.apply_preset(preset);
        settings
    }

    /// Apply a quality preset (updates quality-dependent settings)
    pub fn apply_preset(&mut self, preset: QualityPreset) {
        self.quality = preset;

        // Low preset drops the glow pass for performance
        if preset == QualityPreset::Low {
            self.glow = false;
        }
    }

    /// Parse a URL query string such as `?quality=high&glow=0`
    ///
    /// Unknown keys and unparsable values are ignored.
    pub fn from_query(query: &str) -> Self {
        let mut settings = Self::default();
        let query = query.strip_prefix('?').unwrap_or(query);

        for pair in query.split('&').filter(|p| !p.is_empty()) {
            let (key, value) = pair.split_once('=').unwrap_or((pair, "1"));
            match key {
                "quality" => {
                    if let Some(preset) = QualityPreset::from_str(value) {
                        settings.apply_preset(preset);
                    } else {
                        log::warn!("Unknown quality preset: {}", value);
                    }
                }
                "particles" => settings.particles = parse_flag(value),
                "stars" => settings.starfield = parse_flag(value),
                "glow" => settings.glow = parse_flag(value),
                "fps" => settings.show_fps = parse_flag(value),
                _ => {}
            }
        }

        settings
    }

    /// Effective particle count cap
    pub fn max_particles(&self) -> usize {
        if !self.particles {
            0
        } else {
            self.quality.max_particles()
        }
    }

    /// Effective star count
    pub fn star_count(&self) -> usize {
        if !self.starfield {
            0
        } else {
            self.quality.star_count()
        }
    }

    /// Clamp tuning values that depend on visual quality
    pub fn apply_to(&self, tuning: &mut Tuning) {
        tuning.max_particles = tuning.max_particles.min(self.max_particles());
    }
}

fn parse_flag(value: &str) -> bool {
    !matches!(value.to_lowercase().as_str(), "0" | "false" | "off" | "no")
}
