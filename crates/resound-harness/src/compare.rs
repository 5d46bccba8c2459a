//! Regression comparator: signal and error levels in decibels.
//!
//! The comparator is observational. It quantifies drift between a fresh
//! render and its reference; it never decides pass/fail. A CI gate wanting
//! hard regression detection adds a tolerance policy on top of these
//! primitives.

use thiserror::Error;

/// Floor added to the RMS before taking the logarithm, so that all-silence
/// input yields a finite level (-100 dB) instead of negative infinity.
pub const DB_EPSILON: f64 = 1e-5;

/// The level reported for perfect silence: `20 * log10(DB_EPSILON)`.
pub const SILENCE_FLOOR_DB: f64 = -100.0;

/// Errors from comparing a render against its reference.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CompareError {
    /// Render and reference hold different numbers of samples.
    ///
    /// A sample-wise difference over mismatched buffers has no meaning, so
    /// the comparison is rejected rather than truncated or padded.
    #[error("sample count mismatch: rendered {rendered}, reference {reference}")]
    LengthMismatch {
        /// Samples in the rendered buffer.
        rendered: usize,
        /// Samples in the reference buffer.
        reference: usize,
    },
}

/// Root-mean-square amplitude. Empty input yields 0.0.
pub fn rms(samples: &[f32]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum_of_squares: f64 = samples.iter().map(|&s| (s as f64) * (s as f64)).sum();
    (sum_of_squares / samples.len() as f64).sqrt()
}

/// RMS amplitude in decibels: `20 * log10(rms + epsilon)`.
///
/// Finite for any finite input; silence maps to [`SILENCE_FLOOR_DB`].
pub fn level_db(samples: &[f32]) -> f64 {
    20.0 * (rms(samples) + DB_EPSILON).log10()
}

/// Decibel level of the sample-wise difference between a render and its
/// reference.
///
/// Comparing a buffer against itself yields the silence floor (zero
/// self-error). Buffers of different lengths are rejected; see
/// [`CompareError::LengthMismatch`].
pub fn error_db(samples: &[f32], reference: &[f32]) -> Result<f64, CompareError> {
    if samples.len() != reference.len() {
        return Err(CompareError::LengthMismatch {
            rendered: samples.len(),
            reference: reference.len(),
        });
    }
    let diff: Vec<f32> = samples
        .iter()
        .zip(reference.iter())
        .map(|(a, b)| a - b)
        .collect();
    Ok(level_db(&diff))
}
