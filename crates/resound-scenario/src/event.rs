//! Timed parameter-change events.
//!
//! An [`Event`] is a point-in-time instruction to the synthesis engine: a
//! millisecond offset from scenario start plus one or more parameter
//! changes. Parameters are a closed, typed vocabulary ([`Param`]) with an
//! explicit escape hatch ([`Param::Ext`]) for engine-specific extensions,
//! so malformed scripts fail when they are built rather than somewhere
//! inside the engine.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ScenarioError;

/// Waveform selector for an oscillator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Waveform {
    Sine,
    Pulse,
    SawDown,
    SawUp,
    Triangle,
    Noise,
    /// Sampled (PCM) playback from a patch.
    Pcm,
    /// FM algorithm patch.
    Algo,
    /// Partials (additive) patch.
    Partials,
}

/// Filter selector for an oscillator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterKind {
    None,
    LowPass,
    /// 24 dB/octave low-pass.
    LowPass24,
    HighPass,
    BandPass,
}

/// Destination of a modulation source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModTarget {
    Amp,
    Freq,
    FilterFreq,
    Duty,
    Pan,
}

/// Ordered control coefficients for a modulatable parameter.
///
/// The coefficient order is: constant, note scaling, velocity scaling,
/// envelope-0 scaling, envelope-1 scaling, modulation scaling. Trailing
/// zeros may be omitted; the string form is a comma-separated list
/// (`"300,0,0,0,3"`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ControlCoefs(Vec<f64>);

impl ControlCoefs {
    /// A single constant value with no scaling terms.
    pub fn constant(value: f64) -> Self {
        Self(vec![value])
    }

    /// The coefficient list.
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    /// The constant (first) coefficient.
    pub fn constant_value(&self) -> f64 {
        self.0.first().copied().unwrap_or(0.0)
    }

    /// Parses a comma-separated coefficient string.
    pub fn parse(input: &str) -> Result<Self, ScenarioError> {
        let invalid = |reason: &str| ScenarioError::InvalidCoefficients {
            input: input.to_string(),
            reason: reason.to_string(),
        };

        if input.trim().is_empty() {
            return Err(invalid("empty coefficient list"));
        }

        let mut coefs = Vec::new();
        for part in input.split(',') {
            let value: f64 = part
                .trim()
                .parse()
                .map_err(|_| invalid(&format!("'{}' is not a number", part.trim())))?;
            if !value.is_finite() {
                return Err(invalid("coefficients must be finite"));
            }
            coefs.push(value);
        }
        Ok(Self(coefs))
    }
}

impl<const N: usize> From<[f64; N]> for ControlCoefs {
    fn from(coefs: [f64; N]) -> Self {
        Self(coefs.to_vec())
    }
}

impl FromStr for ControlCoefs {
    type Err = ScenarioError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for ControlCoefs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, coef) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{}", coef)?;
        }
        Ok(())
    }
}

/// A breakpoint envelope: ordered `(segment duration ms, target level)`
/// pairs. The string form interleaves the pair members
/// (`"50,1,250,0.1,50,0"`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Breakpoints(Vec<(u32, f64)>);

impl Breakpoints {
    /// The `(duration_ms, level)` segments.
    pub fn segments(&self) -> &[(u32, f64)] {
        &self.0
    }

    /// Total envelope duration in milliseconds.
    pub fn total_ms(&self) -> u32 {
        self.0.iter().map(|(ms, _)| ms).sum()
    }

    /// Parses an interleaved `ms,level,ms,level,...` string.
    pub fn parse(input: &str) -> Result<Self, ScenarioError> {
        let invalid = |reason: &str| ScenarioError::InvalidBreakpoints {
            input: input.to_string(),
            reason: reason.to_string(),
        };

        let parts: Vec<&str> = input.split(',').map(str::trim).collect();
        if parts.is_empty() || (parts.len() == 1 && parts[0].is_empty()) {
            return Err(invalid("empty envelope"));
        }
        if parts.len() % 2 != 0 {
            return Err(invalid("expected an even number of values"));
        }

        let mut segments = Vec::with_capacity(parts.len() / 2);
        for pair in parts.chunks_exact(2) {
            let ms: u32 = pair[0]
                .parse()
                .map_err(|_| invalid(&format!("'{}' is not a duration in ms", pair[0])))?;
            let level: f64 = pair[1]
                .parse()
                .map_err(|_| invalid(&format!("'{}' is not a level", pair[1])))?;
            if !level.is_finite() {
                return Err(invalid("levels must be finite"));
            }
            segments.push((ms, level));
        }
        Ok(Self(segments))
    }
}

impl<const N: usize> From<[(u32, f64); N]> for Breakpoints {
    fn from(segments: [(u32, f64); N]) -> Self {
        Self(segments.to_vec())
    }
}

impl FromStr for Breakpoints {
    type Err = ScenarioError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Breakpoints {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (ms, level)) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{},{}", ms, level)?;
        }
        Ok(())
    }
}

/// One parameter change carried by an [`Event`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Param {
    /// Oscillator index addressed by the rest of the event.
    Osc(u32),
    /// Waveform selector.
    Wave(Waveform),
    /// Frequency in Hz with optional scaling coefficients.
    Freq(ControlCoefs),
    /// MIDI note number.
    Note(f64),
    /// Velocity; `0.0` is note-off.
    Vel(f64),
    /// Amplitude control coefficients.
    Amp(ControlCoefs),
    /// Patch index for PCM/algorithm/partials waveforms.
    Patch(u32),
    /// Filter selector.
    FilterType(FilterKind),
    /// Filter cutoff in Hz with optional scaling coefficients.
    FilterFreq(ControlCoefs),
    /// Filter resonance.
    Resonance(f64),
    /// Oscillator index used as a modulation source.
    ModSource(u32),
    /// Modulation destination.
    ModTarget(ModTarget),
    /// Breakpoint envelope generator 0.
    Bp0(Breakpoints),
    /// Breakpoint envelope generator 1.
    Bp1(Breakpoints),
    /// Stereo position, 0.0 (left) to 1.0 (right).
    Pan(f64),
    /// Pulse duty cycle with optional scaling coefficients.
    Duty(ControlCoefs),
    /// Global EQ low band, dB.
    EqLow(f64),
    /// Global EQ mid band, dB.
    EqMid(f64),
    /// Global EQ high band, dB.
    EqHigh(f64),
    /// Global chorus send level.
    ChorusLevel(f64),
    /// Engine debug flags.
    Debug(u32),
    /// Engine-specific extension, passed through uninterpreted.
    Ext { key: String, value: String },
}

/// A timestamped instruction changing one or more engine parameters.
///
/// Events are built with the fluent methods below; an event with no
/// parameters is valid and is used as the zero-time calibration event sent
/// after every engine restart.
///
/// ```
/// use resound_scenario::{Event, Waveform};
///
/// let event = Event::at(0).osc(0).wave(Waveform::Sine).freq(1000.0);
/// assert_eq!(event.time_ms(), 0);
/// assert_eq!(event.params().len(), 3);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    time_ms: u32,
    params: Vec<Param>,
}

impl Event {
    /// Creates an empty event at the given millisecond offset.
    pub fn at(time_ms: u32) -> Self {
        Self {
            time_ms,
            params: Vec::new(),
        }
    }

    /// Millisecond offset from scenario start.
    pub fn time_ms(&self) -> u32 {
        self.time_ms
    }

    /// The parameter changes, in declaration order.
    pub fn params(&self) -> &[Param] {
        &self.params
    }

    /// Appends an arbitrary parameter.
    pub fn param(mut self, param: Param) -> Self {
        self.params.push(param);
        self
    }

    /// The oscillator index this event addresses, if any.
    pub fn osc_index(&self) -> Option<u32> {
        self.params.iter().find_map(|p| match p {
            Param::Osc(index) => Some(*index),
            _ => None,
        })
    }

    pub fn osc(self, index: u32) -> Self {
        self.param(Param::Osc(index))
    }

    pub fn wave(self, wave: Waveform) -> Self {
        self.param(Param::Wave(wave))
    }

    /// Constant frequency in Hz.
    pub fn freq(self, hz: f64) -> Self {
        self.param(Param::Freq(ControlCoefs::constant(hz)))
    }

    /// Frequency with scaling coefficients.
    pub fn freq_coefs(self, coefs: impl Into<ControlCoefs>) -> Self {
        self.param(Param::Freq(coefs.into()))
    }

    pub fn note(self, note: f64) -> Self {
        self.param(Param::Note(note))
    }

    pub fn vel(self, vel: f64) -> Self {
        self.param(Param::Vel(vel))
    }

    /// Constant amplitude.
    pub fn amp(self, amp: f64) -> Self {
        self.param(Param::Amp(ControlCoefs::constant(amp)))
    }

    /// Amplitude with scaling coefficients.
    pub fn amp_coefs(self, coefs: impl Into<ControlCoefs>) -> Self {
        self.param(Param::Amp(coefs.into()))
    }

    pub fn patch(self, patch: u32) -> Self {
        self.param(Param::Patch(patch))
    }

    pub fn filter_type(self, kind: FilterKind) -> Self {
        self.param(Param::FilterType(kind))
    }

    pub fn filter_freq_coefs(self, coefs: impl Into<ControlCoefs>) -> Self {
        self.param(Param::FilterFreq(coefs.into()))
    }

    pub fn resonance(self, resonance: f64) -> Self {
        self.param(Param::Resonance(resonance))
    }

    pub fn mod_source(self, osc: u32) -> Self {
        self.param(Param::ModSource(osc))
    }

    pub fn mod_target(self, target: ModTarget) -> Self {
        self.param(Param::ModTarget(target))
    }

    pub fn bp0(self, envelope: impl Into<Breakpoints>) -> Self {
        self.param(Param::Bp0(envelope.into()))
    }

    pub fn bp1(self, envelope: impl Into<Breakpoints>) -> Self {
        self.param(Param::Bp1(envelope.into()))
    }

    pub fn pan(self, pan: f64) -> Self {
        self.param(Param::Pan(pan))
    }

    /// Constant duty cycle.
    pub fn duty(self, duty: f64) -> Self {
        self.param(Param::Duty(ControlCoefs::constant(duty)))
    }

    /// Duty cycle with scaling coefficients.
    pub fn duty_coefs(self, coefs: impl Into<ControlCoefs>) -> Self {
        self.param(Param::Duty(coefs.into()))
    }

    /// Global EQ bands in dB.
    pub fn eq(self, low: f64, mid: f64, high: f64) -> Self {
        self.param(Param::EqLow(low))
            .param(Param::EqMid(mid))
            .param(Param::EqHigh(high))
    }

    pub fn chorus_level(self, level: f64) -> Self {
        self.param(Param::ChorusLevel(level))
    }

    pub fn debug(self, flags: u32) -> Self {
        self.param(Param::Debug(flags))
    }

    /// Engine-specific extension parameter.
    pub fn ext(self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.param(Param::Ext {
            key: key.into(),
            value: value.into(),
        })
    }
}
