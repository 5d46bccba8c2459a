//! Scenario scripts: named, time-ordered event sequences.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::ScenarioError;
use crate::event::Event;

fn name_regex() -> &'static Regex {
    static NAME_RE: OnceLock<Regex> = OnceLock::new();
    NAME_RE.get_or_init(|| Regex::new(r"^[a-z][a-z0-9_]*$").expect("name regex is valid"))
}

/// A named, ordered script of [`Event`]s describing one test case.
///
/// The name keys the output and reference recordings
/// (`<dir>/<name>.wav`), so it is restricted to lowercase identifiers.
/// Events must be declared in non-decreasing time order; two events sharing
/// a timestamp keep their declaration order. Both invariants are checked in
/// [`Scenario::new`] and hold for the lifetime of the value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    name: String,
    events: Vec<Event>,
}

impl Scenario {
    /// Builds a scenario, validating the name and the event ordering.
    pub fn new(name: impl Into<String>, events: Vec<Event>) -> Result<Self, ScenarioError> {
        let name = name.into();
        if !name_regex().is_match(&name) {
            return Err(ScenarioError::InvalidName { name });
        }

        for (index, pair) in events.windows(2).enumerate() {
            let (prev, next) = (&pair[0], &pair[1]);
            if next.time_ms() < prev.time_ms() {
                return Err(ScenarioError::EventOutOfOrder {
                    index: index + 1,
                    prev_ms: prev.time_ms(),
                    time_ms: next.time_ms(),
                });
            }
        }

        Ok(Self { name, events })
    }

    /// The scenario name, used for output/reference file naming.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The events, in replay order.
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Timestamp of the last event, in milliseconds (0 for an empty script).
    pub fn span_ms(&self) -> u32 {
        self.events.last().map(Event::time_ms).unwrap_or(0)
    }

    /// Serializes the scenario as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserializes a scenario from JSON.
    ///
    /// The construction invariants are re-checked, so external JSON cannot
    /// smuggle in an invalid name or an unsorted script.
    pub fn from_json(json: &str) -> Result<Self, ScenarioError> {
        let raw: Self = serde_json::from_str(json).map_err(|e| ScenarioError::InvalidJson {
            message: e.to_string(),
        })?;
        Self::new(raw.name, raw.events)
    }
}
