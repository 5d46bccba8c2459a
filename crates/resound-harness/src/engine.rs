//! The boundary between the harness and the synthesis engine under test.
//!
//! The engine is an external collaborator: the harness drives it through
//! the [`Engine`] trait and never interprets parameter semantics. One
//! engine instance serves the whole run, and [`Engine::restart`] is the
//! sole isolation mechanism between scenarios, which makes an incomplete
//! reset directly observable as reference drift.

use thiserror::Error;

use resound_scenario::Event;

use crate::audio::RenderedAudio;

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Errors reported by an engine implementation.
///
/// Any of these is fatal to a run: a broken engine invalidates every
/// comparison that would follow.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    /// Event sent or render requested before the engine was restarted.
    #[error("engine has not been restarted")]
    NotStarted,

    /// Render duration is unusable.
    #[error("invalid render duration: {seconds} seconds")]
    InvalidDuration {
        /// The rejected duration.
        seconds: f64,
    },

    /// An event was rejected by the engine.
    #[error("event rejected at {time_ms} ms: {message}")]
    EventRejected {
        /// Timestamp of the rejected event.
        time_ms: u32,
        /// Engine-supplied reason.
        message: String,
    },

    /// Engine-internal failure.
    #[error("engine failure: {message}")]
    Failed {
        /// Engine-supplied reason.
        message: String,
    },
}

impl EngineError {
    /// Creates an engine-internal failure.
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed {
            message: message.into(),
        }
    }
}

/// A synthesis engine the harness can drive.
///
/// The contract mirrors the engine's own API surface: reset to a clean
/// state, accept a timed parameter change (possibly scheduled for a future
/// offset), and render a fixed-duration buffer by advancing internal time.
/// Rendering blocks until the complete buffer is available; there is no
/// incremental form.
pub trait Engine {
    /// Resets the engine to a clean initial state.
    fn restart(&mut self) -> EngineResult<()>;

    /// Applies a parameter-change event, scheduled at its time offset.
    fn send(&mut self, event: &Event) -> EngineResult<()>;

    /// Advances internal time by `seconds` and returns the rendered audio.
    fn render(&mut self, seconds: f64) -> EngineResult<RenderedAudio>;

    /// Output sample rate in Hz. Fixed per engine, not per scenario.
    fn sample_rate(&self) -> u32;

    /// Output channel count. Fixed per engine, not per scenario.
    fn channels(&self) -> u16;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            EngineError::NotStarted.to_string(),
            "engine has not been restarted"
        );
        let err = EngineError::failed("voice allocator wedged");
        assert!(err.to_string().contains("voice allocator wedged"));
    }
}
