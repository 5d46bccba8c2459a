//! Error types for scenario construction.

use thiserror::Error;

/// Errors raised while building events or scenarios.
///
/// All of these are construction-time errors: a `Scenario` that exists is
/// guaranteed to have a usable name and time-ordered events.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScenarioError {
    /// Scenario name is not usable as a file stem.
    #[error("invalid scenario name '{name}': must match [a-z][a-z0-9_]*")]
    InvalidName {
        /// The rejected name.
        name: String,
    },

    /// Events were declared out of time order.
    #[error("event {index} out of order: {time_ms} ms follows {prev_ms} ms")]
    EventOutOfOrder {
        /// Index of the offending event.
        index: usize,
        /// Timestamp of the preceding event.
        prev_ms: u32,
        /// Timestamp of the offending event.
        time_ms: u32,
    },

    /// A control-coefficient string failed to parse.
    #[error("invalid control coefficients '{input}': {reason}")]
    InvalidCoefficients {
        /// The rejected input.
        input: String,
        /// Why it was rejected.
        reason: String,
    },

    /// A breakpoint-envelope string failed to parse.
    #[error("invalid breakpoint envelope '{input}': {reason}")]
    InvalidBreakpoints {
        /// The rejected input.
        input: String,
        /// Why it was rejected.
        reason: String,
    },

    /// A serialized scenario failed to parse.
    #[error("invalid scenario JSON: {message}")]
    InvalidJson {
        /// Parser diagnostic.
        message: String,
    },
}
