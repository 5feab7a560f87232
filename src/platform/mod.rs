//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Time/ticks
//! - Input events

pub mod input;
pub mod time;

pub use input::{Action, KeyState, action_for_key};
pub use time::{FrameClock, now_ms};

use thiserror::Error;

use crate::renderer::RenderError;

/// Startup failures in the browser front end
#[derive(Debug, Error)]
pub enum PlatformError {
    #[error("no global window")]
    NoWindow,

    #[error("no document on window")]
    NoDocument,

    #[error("element #{0} not found")]
    MissingElement(&'static str),

    #[error("element #{id} is not a {expected}")]
    WrongElementType {
        id: &'static str,
        expected: &'static str,
    },

    #[error("failed to create surface: {0}")]
    Surface(#[from] wgpu::CreateSurfaceError),

    #[error("no suitable GPU adapter: {0}")]
    Adapter(#[from] wgpu::RequestAdapterError),

    #[error("renderer setup failed: {0}")]
    Render(#[from] RenderError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            PlatformError::MissingElement("gameCanvas").to_string(),
            "element #gameCanvas not found"
        );
        assert_eq!(
            PlatformError::WrongElementType {
                id: "gameCanvas",
                expected: "canvas"
            }
            .to_string(),
            "element #gameCanvas is not a canvas"
        );
    }
}
