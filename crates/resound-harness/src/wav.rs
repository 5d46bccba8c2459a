//! WAV adapter: the pure format boundary between float buffers and 16-bit
//! PCM recordings.
//!
//! Writing quantizes floating-point samples to 16-bit little-endian PCM and
//! emits RIFF/fmt/data chunks with no timestamps or variable metadata, so
//! identical samples always produce byte-identical files. Reading walks the
//! chunk list and normalizes 16-bit samples back to floats by dividing by
//! the integer full-scale magnitude. No resampling, no channel mixing.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use thiserror::Error;

use crate::audio::RenderedAudio;

const BITS_PER_SAMPLE: u16 = 16;

/// Errors from reading or writing WAV data.
#[derive(Debug, Error)]
pub enum WavError {
    /// Underlying I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// File is too short to hold the required headers.
    #[error("WAV data too short: expected at least {expected} bytes, got {actual}")]
    DataTooShort {
        /// Minimum byte count required.
        expected: usize,
        /// Byte count found.
        actual: usize,
    },

    /// Missing or invalid RIFF header.
    #[error("invalid or missing RIFF header")]
    InvalidRiffHeader,

    /// Missing or invalid WAVE identifier.
    #[error("invalid or missing WAVE identifier")]
    InvalidWaveFormat,

    /// No fmt chunk present.
    #[error("missing fmt chunk")]
    MissingFmtChunk,

    /// No data chunk present.
    #[error("missing data chunk")]
    MissingDataChunk,

    /// Non-PCM audio format.
    #[error("unsupported audio format code {format_code} (only PCM/1)")]
    UnsupportedAudioFormat {
        /// Format code from the fmt chunk.
        format_code: u16,
    },

    /// Bit depth other than 16.
    #[error("unsupported bits per sample: {bits} (only 16)")]
    UnsupportedBitsPerSample {
        /// Bit depth from the fmt chunk.
        bits: u16,
    },

    /// Data chunk claims more bytes than the file holds.
    #[error("data chunk truncated: declares {declared} bytes, {available} available")]
    TruncatedDataChunk {
        /// Declared chunk size.
        declared: usize,
        /// Bytes actually present.
        available: usize,
    },
}

/// WAV format parameters (16-bit PCM only).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavFormat {
    /// Number of channels.
    pub channels: u16,
    /// Sample rate in Hz.
    pub sample_rate: u32,
}

impl WavFormat {
    fn block_align(&self) -> u16 {
        self.channels * (BITS_PER_SAMPLE / 8)
    }

    fn byte_rate(&self) -> u32 {
        self.sample_rate * self.block_align() as u32
    }
}

/// Converts float samples to 16-bit little-endian PCM bytes.
///
/// Samples outside [-1, 1] are clipped.
pub fn samples_to_pcm16(samples: &[f32]) -> Vec<u8> {
    let mut pcm = Vec::with_capacity(samples.len() * 2);
    for &sample in samples {
        let clipped = sample.clamp(-1.0, 1.0);
        let value = (clipped * 32767.0).round() as i16;
        pcm.extend_from_slice(&value.to_le_bytes());
    }
    pcm
}

/// Converts 16-bit little-endian PCM bytes to float samples in [-1, 1).
pub fn pcm16_to_samples(pcm: &[u8]) -> Vec<f32> {
    pcm.chunks_exact(2)
        .map(|chunk| {
            let value = i16::from_le_bytes([chunk[0], chunk[1]]);
            value as f32 / 32768.0
        })
        .collect()
}

/// Writes a complete WAV file to a writer.
pub fn write_wav<W: Write>(writer: &mut W, format: &WavFormat, pcm_data: &[u8]) -> io::Result<()> {
    let data_size = pcm_data.len() as u32;
    // Total file size minus the 8-byte RIFF chunk header.
    let file_size = 36 + data_size;

    writer.write_all(b"RIFF")?;
    writer.write_all(&file_size.to_le_bytes())?;
    writer.write_all(b"WAVE")?;

    writer.write_all(b"fmt ")?;
    writer.write_all(&16u32.to_le_bytes())?;
    writer.write_all(&1u16.to_le_bytes())?; // PCM
    writer.write_all(&format.channels.to_le_bytes())?;
    writer.write_all(&format.sample_rate.to_le_bytes())?;
    writer.write_all(&format.byte_rate().to_le_bytes())?;
    writer.write_all(&format.block_align().to_le_bytes())?;
    writer.write_all(&BITS_PER_SAMPLE.to_le_bytes())?;

    writer.write_all(b"data")?;
    writer.write_all(&data_size.to_le_bytes())?;
    writer.write_all(pcm_data)?;

    Ok(())
}

/// Encodes a rendered buffer as a complete WAV file in memory.
pub fn encode_wav(audio: &RenderedAudio) -> Vec<u8> {
    let pcm = samples_to_pcm16(&audio.samples);
    let format = WavFormat {
        channels: audio.channels,
        sample_rate: audio.sample_rate,
    };
    let mut buffer = Vec::with_capacity(44 + pcm.len());
    write_wav(&mut buffer, &format, &pcm).expect("writing to Vec should not fail");
    buffer
}

/// Writes a rendered buffer to a WAV file on disk.
pub fn write_wav_file(path: &Path, audio: &RenderedAudio) -> Result<(), WavError> {
    fs::write(path, encode_wav(audio))?;
    Ok(())
}

/// Decodes a WAV file from memory into a normalized float buffer.
pub fn read_wav(data: &[u8]) -> Result<RenderedAudio, WavError> {
    // RIFF header (12) + fmt chunk (24) + data chunk header (8).
    if data.len() < 44 {
        return Err(WavError::DataTooShort {
            expected: 44,
            actual: data.len(),
        });
    }

    if &data[0..4] != b"RIFF" {
        return Err(WavError::InvalidRiffHeader);
    }
    if &data[8..12] != b"WAVE" {
        return Err(WavError::InvalidWaveFormat);
    }

    let (fmt_offset, fmt_size) = find_chunk(data, b"fmt ").ok_or(WavError::MissingFmtChunk)?;
    if fmt_size < 16 {
        return Err(WavError::MissingFmtChunk);
    }
    let fmt = &data[fmt_offset..];

    let format_code = u16::from_le_bytes([fmt[0], fmt[1]]);
    let channels = u16::from_le_bytes([fmt[2], fmt[3]]);
    let sample_rate = u32::from_le_bytes([fmt[4], fmt[5], fmt[6], fmt[7]]);
    let bits_per_sample = u16::from_le_bytes([fmt[14], fmt[15]]);

    if format_code != 1 {
        return Err(WavError::UnsupportedAudioFormat { format_code });
    }
    if bits_per_sample != BITS_PER_SAMPLE {
        return Err(WavError::UnsupportedBitsPerSample {
            bits: bits_per_sample,
        });
    }

    let (data_offset, data_size) = find_chunk(data, b"data").ok_or(WavError::MissingDataChunk)?;
    if data_offset + data_size > data.len() {
        return Err(WavError::TruncatedDataChunk {
            declared: data_size,
            available: data.len() - data_offset,
        });
    }

    let samples = pcm16_to_samples(&data[data_offset..data_offset + data_size]);
    Ok(RenderedAudio::new(samples, sample_rate, channels))
}

/// Reads and decodes a WAV file from disk.
pub fn read_wav_file(path: &Path) -> Result<RenderedAudio, WavError> {
    let data = fs::read(path)?;
    read_wav(&data)
}

/// Finds a chunk by id and returns its data offset and size.
fn find_chunk(data: &[u8], chunk_id: &[u8; 4]) -> Option<(usize, usize)> {
    let mut offset = 12; // Skip the RIFF header.

    while offset + 8 <= data.len() {
        let id = &data[offset..offset + 4];
        let size = u32::from_le_bytes([
            data[offset + 4],
            data[offset + 5],
            data[offset + 6],
            data[offset + 7],
        ]) as usize;

        if id == chunk_id {
            return Some((offset + 8, size));
        }

        // Chunks are word-aligned.
        offset += 8 + size + (size % 2);
    }

    None
}
