//! Per-scenario diagnostic reports and the run summary.

use std::fmt;
use std::path::PathBuf;

/// How the reference comparison went for one scenario.
///
/// Everything except [`Compared`](Self::Compared) leaves the error level
/// absent; "no baseline yet" is never conflated with "regression detected".
#[derive(Debug, Clone, PartialEq)]
pub enum ReferenceOutcome {
    /// Reference found and compared.
    Compared {
        /// Decibel level of the sample-wise difference.
        error_db: f64,
    },
    /// No reference recording exists yet. Expected for first runs and
    /// newly added scenarios.
    Missing {
        /// Path that was probed.
        path: PathBuf,
    },
    /// The reference file exists but could not be decoded. Treated the
    /// same as missing: reported, never fatal.
    Unreadable {
        /// Path of the unreadable file.
        path: PathBuf,
        /// Decode failure description.
        reason: String,
    },
    /// Render and reference hold different sample counts, typically after
    /// a render-duration change between captures.
    LengthMismatch {
        /// Samples rendered.
        rendered: usize,
        /// Samples in the reference.
        reference: usize,
    },
    /// Reference sample rate or channel count differs from the render.
    FormatMismatch {
        /// `(sample_rate, channels)` of the render.
        rendered: (u32, u16),
        /// `(sample_rate, channels)` of the reference.
        reference: (u32, u16),
    },
}

impl ReferenceOutcome {
    /// The error level, when one was computed.
    pub fn error_db(&self) -> Option<f64> {
        match self {
            Self::Compared { error_db } => Some(*error_db),
            _ => None,
        }
    }
}

/// Diagnostic result for one executed scenario.
#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioReport {
    /// Scenario name.
    pub name: String,
    /// Decibel RMS level of the rendered buffer.
    pub signal_db: f64,
    /// Outcome of the reference comparison.
    pub reference: ReferenceOutcome,
}

impl fmt::Display for ScenarioReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:<16}: signal={:.1} dB", self.name, self.signal_db)?;
        match &self.reference {
            ReferenceOutcome::Compared { error_db } => write!(f, "  err={:.1} dB", error_db),
            ReferenceOutcome::Missing { path } => {
                write!(f, "  no reference ({})", path.display())
            }
            ReferenceOutcome::Unreadable { path, reason } => {
                write!(f, "  reference unreadable ({}): {}", path.display(), reason)
            }
            ReferenceOutcome::LengthMismatch {
                rendered,
                reference,
            } => write!(
                f,
                "  length mismatch ({} vs {} samples)",
                rendered, reference
            ),
            ReferenceOutcome::FormatMismatch {
                rendered,
                reference,
            } => write!(
                f,
                "  format mismatch ({} Hz x{} vs {} Hz x{})",
                rendered.0, rendered.1, reference.0, reference.1
            ),
        }
    }
}

/// Result of capturing one scenario into the reference directory.
#[derive(Debug, Clone, PartialEq)]
pub struct CaptureReport {
    /// Scenario name.
    pub name: String,
    /// Decibel RMS level of the captured buffer.
    pub signal_db: f64,
    /// BLAKE3 hash of the captured 16-bit PCM.
    pub pcm_hash: String,
    /// Where the reference was written.
    pub path: PathBuf,
}

impl fmt::Display for CaptureReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:<16}: signal={:.1} dB  hash={}",
            self.name,
            self.signal_db,
            &self.pcm_hash[..8.min(self.pcm_hash.len())]
        )
    }
}

/// Counts accumulated over a whole run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SuiteSummary {
    /// Scenarios executed.
    pub scenarios: usize,
    /// Scenarios compared against a reference.
    pub compared: usize,
    /// Scenarios with no reference recording.
    pub missing: usize,
    /// Scenarios whose reference failed to decode.
    pub unreadable: usize,
    /// Scenarios whose reference had a different sample count or format.
    pub mismatched: usize,
}

impl SuiteSummary {
    pub(crate) fn record(&mut self, outcome: &ReferenceOutcome) {
        self.scenarios += 1;
        match outcome {
            ReferenceOutcome::Compared { .. } => self.compared += 1,
            ReferenceOutcome::Missing { .. } => self.missing += 1,
            ReferenceOutcome::Unreadable { .. } => self.unreadable += 1,
            ReferenceOutcome::LengthMismatch { .. } | ReferenceOutcome::FormatMismatch { .. } => {
                self.mismatched += 1
            }
        }
    }
}

impl fmt::Display for SuiteSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} scenarios: {} compared, {} missing reference",
            self.scenarios, self.compared, self.missing
        )?;
        if self.unreadable > 0 {
            write!(f, ", {} unreadable", self.unreadable)?;
        }
        if self.mismatched > 0 {
            write!(f, ", {} mismatched", self.mismatched)?;
        }
        Ok(())
    }
}
