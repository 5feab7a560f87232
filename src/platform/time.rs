//! Frame timing
//!
//! Turns wall-clock frame callbacks into a whole number of fixed simulation
//! steps, and tracks FPS for the HUD.

use crate::consts::{FRAME_MS, MAX_FRAME_DELTA_MS, MAX_SUBSTEPS};

/// Monotonic milliseconds (page-relative on web, process-relative on native)
#[cfg(target_arch = "wasm32")]
pub fn now_ms() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or_else(js_sys::Date::now)
}

#[cfg(not(target_arch = "wasm32"))]
pub fn now_ms() -> f64 {
    use std::sync::OnceLock;
    use std::time::Instant;

    static START: OnceLock<Instant> = OnceLock::new();
    START.get_or_init(Instant::now).elapsed().as_secs_f64() * 1000.0
}

const FPS_WINDOW: usize = 60;
/// Slack for float error when the accumulator sits on a step boundary
const STEP_EPSILON_MS: f64 = 1e-9;

/// Fixed-timestep accumulator
#[derive(Debug, Clone)]
pub struct FrameClock {
    accumulator_ms: f64,
    last_ms: Option<f64>,
    frame_times: [f64; FPS_WINDOW],
    frame_index: usize,
    fps: u32,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameClock {
    pub fn new() -> Self {
        Self {
            accumulator_ms: 0.0,
            last_ms: None,
            frame_times: [0.0; FPS_WINDOW],
            frame_index: 0,
            fps: 0,
        }
    }

    /// Record a frame at `now_ms` and return how many steps to simulate
    pub fn advance(&mut self, now_ms: f64) -> u32 {
        let dt = match self.last_ms {
            Some(last) => (now_ms - last).clamp(0.0, MAX_FRAME_DELTA_MS),
            None => FRAME_MS,
        };
        self.last_ms = Some(now_ms);
        self.accumulator_ms += dt;

        // Whole steps counted in one division; repeated subtraction drifts
        // below FRAME_MS on exact multiples
        let whole = ((self.accumulator_ms + STEP_EPSILON_MS) / FRAME_MS).floor();
        let steps = (whole as u32).min(MAX_SUBSTEPS);
        self.accumulator_ms = (self.accumulator_ms - steps as f64 * FRAME_MS).max(0.0);

        self.track_fps(now_ms);
        steps
    }

    /// Forget timing history (after a pause in frame delivery, e.g. restart)
    pub fn reset(&mut self) {
        self.accumulator_ms = 0.0;
        self.last_ms = None;
    }

    pub fn fps(&self) -> u32 {
        self.fps
    }

    fn track_fps(&mut self, now_ms: f64) {
        self.frame_times[self.frame_index] = now_ms;
        self.frame_index = (self.frame_index + 1) % FPS_WINDOW;

        // Oldest sample is the one we'll overwrite next
        let oldest = self.frame_times[self.frame_index];
        if oldest > 0.0 {
            let elapsed = now_ms - oldest;
            if elapsed > 0.0 {
                self.fps = ((FPS_WINDOW as f64 - 1.0) * 1000.0 / elapsed).round() as u32;
            }
        }
    }
}
