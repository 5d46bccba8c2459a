//! Rendered audio buffers.

use crate::wav;

/// A fixed-length buffer of rendered audio.
///
/// Samples are floating-point in [-1, 1), interleaved when there is more
/// than one channel. Produced once per scenario execution and never
/// mutated afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedAudio {
    /// Interleaved samples.
    pub samples: Vec<f32>,
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Channel count.
    pub channels: u16,
}

impl RenderedAudio {
    /// Creates a buffer from interleaved samples.
    pub fn new(samples: Vec<f32>, sample_rate: u32, channels: u16) -> Self {
        Self {
            samples,
            sample_rate,
            channels,
        }
    }

    /// Number of sample frames (samples per channel).
    pub fn frames(&self) -> usize {
        if self.channels == 0 {
            0
        } else {
            self.samples.len() / self.channels as usize
        }
    }

    /// Duration in seconds.
    pub fn duration_seconds(&self) -> f64 {
        if self.sample_rate == 0 {
            0.0
        } else {
            self.frames() as f64 / self.sample_rate as f64
        }
    }

    /// BLAKE3 hash of the 16-bit PCM encoding of the samples.
    ///
    /// Two renders with the same hash quantize to identical recordings,
    /// which is the determinism check used by baseline capture.
    pub fn pcm_hash(&self) -> String {
        let pcm = wav::samples_to_pcm16(&self.samples);
        blake3::hash(&pcm).to_hex().to_string()
    }
}
