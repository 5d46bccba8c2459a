//! Suite runner: sequential scenario execution and baseline capture.
//!
//! One engine instance serves the whole run. Per scenario the runner
//! resets the engine, sends the zero-time calibration event, replays the
//! script, renders one fixed-duration buffer, persists it, and compares it
//! against the reference recording of the same name. Scenarios never run
//! concurrently; a scenario completes fully before the next begins.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use resound_scenario::{Event, Scenario};

use crate::audio::RenderedAudio;
use crate::compare::{self, CompareError};
use crate::engine::{Engine, EngineError};
use crate::report::{CaptureReport, ReferenceOutcome, ScenarioReport, SuiteSummary};
use crate::wav::{self, WavError};

/// Render window for every scenario, in seconds. Scripts must land inside
/// this window; events scheduled past it produce no audible effect.
pub const RENDER_SECONDS: f64 = 1.0;

/// Default reference-recording directory.
pub const DEFAULT_REF_DIR: &str = "tests/ref";

/// Default output-recording directory.
pub const DEFAULT_OUT_DIR: &str = "tests/tst";

/// Directories and render window for a run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    /// Where reference recordings are read from.
    pub ref_dir: PathBuf,
    /// Where output recordings are written.
    pub out_dir: PathBuf,
    /// Render window in seconds.
    pub render_seconds: f64,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            ref_dir: PathBuf::from(DEFAULT_REF_DIR),
            out_dir: PathBuf::from(DEFAULT_OUT_DIR),
            render_seconds: RENDER_SECONDS,
        }
    }
}

impl RunConfig {
    /// Overrides the reference directory.
    pub fn with_ref_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.ref_dir = dir.into();
        self
    }

    /// Overrides the output directory.
    pub fn with_out_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.out_dir = dir.into();
        self
    }

    /// Recording path for a scenario in the given directory.
    pub fn wav_path(dir: &Path, scenario_name: &str) -> PathBuf {
        dir.join(format!("{}.wav", scenario_name))
    }
}

/// Fatal run errors.
///
/// Reference-read problems are not here: they are recovered per scenario
/// and reported inline. Only a broken engine or a failure to persist
/// output aborts a run.
#[derive(Debug, Error)]
pub enum HarnessError {
    /// The engine failed to reset, accept an event, or render.
    #[error(transparent)]
    Engine(#[from] EngineError),

    /// A recording directory could not be created.
    #[error("failed to create directory {path}: {source}")]
    CreateDir {
        /// The directory.
        path: PathBuf,
        /// Underlying error.
        source: io::Error,
    },

    /// An output recording could not be written.
    #[error("failed to write {path}: {source}")]
    WriteRecording {
        /// The output file.
        path: PathBuf,
        /// Underlying error.
        source: WavError,
    },
}

/// Executes every scenario in order, reporting one diagnostic per scenario
/// through `on_report`, and returns the accumulated summary.
pub fn run_suite<E: Engine>(
    engine: &mut E,
    scenarios: &[Scenario],
    config: &RunConfig,
    mut on_report: impl FnMut(&ScenarioReport),
) -> Result<SuiteSummary, HarnessError> {
    create_dir(&config.out_dir)?;

    let mut summary = SuiteSummary::default();
    for scenario in scenarios {
        let rendered = execute_scenario(engine, scenario, config.render_seconds)?;

        let out_path = RunConfig::wav_path(&config.out_dir, scenario.name());
        wav::write_wav_file(&out_path, &rendered).map_err(|source| {
            HarnessError::WriteRecording {
                path: out_path.clone(),
                source,
            }
        })?;

        let ref_path = RunConfig::wav_path(&config.ref_dir, scenario.name());
        let reference = compare_against_reference(&rendered, &ref_path);
        summary.record(&reference);

        let report = ScenarioReport {
            name: scenario.name().to_string(),
            signal_db: compare::level_db(&rendered.samples),
            reference,
        };
        on_report(&report);
    }

    Ok(summary)
}

/// Renders every scenario into the reference directory (baseline capture),
/// reporting each written reference through `on_capture`.
pub fn capture_suite<E: Engine>(
    engine: &mut E,
    scenarios: &[Scenario],
    config: &RunConfig,
    mut on_capture: impl FnMut(&CaptureReport),
) -> Result<usize, HarnessError> {
    create_dir(&config.ref_dir)?;

    for scenario in scenarios {
        let rendered = execute_scenario(engine, scenario, config.render_seconds)?;

        let path = RunConfig::wav_path(&config.ref_dir, scenario.name());
        wav::write_wav_file(&path, &rendered).map_err(|source| HarnessError::WriteRecording {
            path: path.clone(),
            source,
        })?;

        let report = CaptureReport {
            name: scenario.name().to_string(),
            signal_db: compare::level_db(&rendered.samples),
            pcm_hash: rendered.pcm_hash(),
            path,
        };
        on_capture(&report);
    }

    Ok(scenarios.len())
}

/// Resets the engine, replays one scenario, and renders the window.
fn execute_scenario<E: Engine>(
    engine: &mut E,
    scenario: &Scenario,
    render_seconds: f64,
) -> Result<RenderedAudio, HarnessError> {
    engine.restart()?;
    // Zero-time calibration: pins the engine clock to scenario time before
    // any scheduled event arrives.
    engine.send(&Event::at(0))?;

    for event in scenario.events() {
        engine.send(event)?;
    }

    Ok(engine.render(render_seconds)?)
}

/// Loads the reference of the same name and compares. All failures here
/// are local: they become a reported outcome, never an abort.
fn compare_against_reference(rendered: &RenderedAudio, ref_path: &Path) -> ReferenceOutcome {
    let reference = match wav::read_wav_file(ref_path) {
        Ok(audio) => audio,
        Err(WavError::Io(e)) if e.kind() == io::ErrorKind::NotFound => {
            return ReferenceOutcome::Missing {
                path: ref_path.to_path_buf(),
            };
        }
        Err(e) => {
            return ReferenceOutcome::Unreadable {
                path: ref_path.to_path_buf(),
                reason: e.to_string(),
            };
        }
    };

    if reference.sample_rate != rendered.sample_rate || reference.channels != rendered.channels {
        return ReferenceOutcome::FormatMismatch {
            rendered: (rendered.sample_rate, rendered.channels),
            reference: (reference.sample_rate, reference.channels),
        };
    }

    match compare::error_db(&rendered.samples, &reference.samples) {
        Ok(error_db) => ReferenceOutcome::Compared { error_db },
        Err(CompareError::LengthMismatch {
            rendered,
            reference,
        }) => ReferenceOutcome::LengthMismatch {
            rendered,
            reference,
        },
    }
}

fn create_dir(path: &Path) -> Result<(), HarnessError> {
    fs::create_dir_all(path).map_err(|source| HarnessError::CreateDir {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compare::SILENCE_FLOOR_DB;
    use pretty_assertions::assert_eq;
    use resound_scenario::Waveform;

    /// Engine double that records the call sequence and renders a canned
    /// constant buffer.
    struct RecordingEngine {
        calls: Vec<String>,
        started: bool,
        level: f32,
        frames: usize,
    }

    impl RecordingEngine {
        fn new(level: f32) -> Self {
            Self {
                calls: Vec::new(),
                started: false,
                level,
                frames: 1000,
            }
        }
    }

    impl Engine for RecordingEngine {
        fn restart(&mut self) -> Result<(), EngineError> {
            self.started = true;
            self.calls.push("restart".to_string());
            Ok(())
        }

        fn send(&mut self, event: &Event) -> Result<(), EngineError> {
            if !self.started {
                return Err(EngineError::NotStarted);
            }
            self.calls
                .push(format!("send@{}:{}", event.time_ms(), event.params().len()));
            Ok(())
        }

        fn render(&mut self, _seconds: f64) -> Result<RenderedAudio, EngineError> {
            if !self.started {
                return Err(EngineError::NotStarted);
            }
            self.calls.push("render".to_string());
            Ok(RenderedAudio::new(
                vec![self.level; self.frames],
                self.sample_rate(),
                self.channels(),
            ))
        }

        fn sample_rate(&self) -> u32 {
            44_100
        }

        fn channels(&self) -> u16 {
            1
        }
    }

    /// Engine that always fails to restart.
    struct BrokenEngine;

    impl Engine for BrokenEngine {
        fn restart(&mut self) -> Result<(), EngineError> {
            Err(EngineError::failed("dead on arrival"))
        }
        fn send(&mut self, _event: &Event) -> Result<(), EngineError> {
            Err(EngineError::NotStarted)
        }
        fn render(&mut self, _seconds: f64) -> Result<RenderedAudio, EngineError> {
            Err(EngineError::NotStarted)
        }
        fn sample_rate(&self) -> u32 {
            44_100
        }
        fn channels(&self) -> u16 {
            1
        }
    }

    fn sine_scenario() -> Scenario {
        Scenario::new(
            "sine_osc",
            vec![
                Event::at(0).osc(0).wave(Waveform::Sine).freq(1000.0),
                Event::at(100).vel(1.0),
                Event::at(500).vel(0.0),
            ],
        )
        .unwrap()
    }

    fn temp_config() -> (tempfile::TempDir, RunConfig) {
        let dir = tempfile::tempdir().unwrap();
        let config = RunConfig::default()
            .with_ref_dir(dir.path().join("ref"))
            .with_out_dir(dir.path().join("tst"));
        (dir, config)
    }

    #[test]
    fn test_calibration_event_is_sent_first() {
        let (_dir, config) = temp_config();
        let mut engine = RecordingEngine::new(0.0);

        run_suite(&mut engine, &[sine_scenario()], &config, |_| {}).unwrap();

        assert_eq!(engine.calls[0], "restart");
        // Calibration event: time 0, no params.
        assert_eq!(engine.calls[1], "send@0:0");
        // Then the script, in declared order, and the render.
        assert_eq!(engine.calls[2], "send@0:3");
        assert_eq!(engine.calls[3], "send@100:1");
        assert_eq!(engine.calls[4], "send@500:1");
        assert_eq!(engine.calls[5], "render");
    }

    #[test]
    fn test_missing_reference_is_reported_not_fatal() {
        let (_dir, config) = temp_config();
        let mut engine = RecordingEngine::new(0.25);

        let mut reports = Vec::new();
        let summary = run_suite(&mut engine, &[sine_scenario()], &config, |r| {
            reports.push(r.clone())
        })
        .unwrap();

        assert_eq!(summary.scenarios, 1);
        assert_eq!(summary.missing, 1);
        assert!(matches!(
            reports[0].reference,
            ReferenceOutcome::Missing { .. }
        ));
        // The output recording was still written.
        assert!(RunConfig::wav_path(&config.out_dir, "sine_osc").exists());
    }

    #[test]
    fn test_capture_then_run_reports_zero_self_error() {
        let (_dir, config) = temp_config();
        let scenarios = vec![sine_scenario()];

        let mut engine = RecordingEngine::new(0.25);
        let mut captures = Vec::new();
        capture_suite(&mut engine, &scenarios, &config, |c| {
            captures.push(c.clone())
        })
        .unwrap();
        assert_eq!(captures.len(), 1);
        assert!(captures[0].path.exists());

        let mut reports = Vec::new();
        let summary = run_suite(&mut engine, &scenarios, &config, |r| {
            reports.push(r.clone())
        })
        .unwrap();

        assert_eq!(summary.compared, 1);
        // Identical render vs its own capture: error at the silence floor
        // (within WAV quantization).
        let error = reports[0].reference.error_db().unwrap();
        assert!(error < SILENCE_FLOOR_DB + 1.0, "error={error}");
    }

    #[test]
    fn test_unreadable_reference_is_recovered() {
        let (_dir, config) = temp_config();
        fs::create_dir_all(&config.ref_dir).unwrap();
        fs::write(
            RunConfig::wav_path(&config.ref_dir, "sine_osc"),
            b"not a wav file, definitely",
        )
        .unwrap();

        let mut engine = RecordingEngine::new(0.25);
        let mut reports = Vec::new();
        let summary = run_suite(&mut engine, &[sine_scenario()], &config, |r| {
            reports.push(r.clone())
        })
        .unwrap();

        assert_eq!(summary.unreadable, 1);
        assert!(matches!(
            reports[0].reference,
            ReferenceOutcome::Unreadable { .. }
        ));
    }

    #[test]
    fn test_length_mismatch_is_reported() {
        let (_dir, config) = temp_config();
        fs::create_dir_all(&config.ref_dir).unwrap();
        // Reference captured with half the frames.
        let short = RenderedAudio::new(vec![0.25; 500], 44_100, 1);
        wav::write_wav_file(&RunConfig::wav_path(&config.ref_dir, "sine_osc"), &short).unwrap();

        let mut engine = RecordingEngine::new(0.25);
        let mut reports = Vec::new();
        run_suite(&mut engine, &[sine_scenario()], &config, |r| {
            reports.push(r.clone())
        })
        .unwrap();

        assert_eq!(
            reports[0].reference,
            ReferenceOutcome::LengthMismatch {
                rendered: 1000,
                reference: 500,
            }
        );
    }

    #[test]
    fn test_format_mismatch_is_reported() {
        let (_dir, config) = temp_config();
        fs::create_dir_all(&config.ref_dir).unwrap();
        let other_rate = RenderedAudio::new(vec![0.25; 1000], 48_000, 1);
        wav::write_wav_file(
            &RunConfig::wav_path(&config.ref_dir, "sine_osc"),
            &other_rate,
        )
        .unwrap();

        let mut engine = RecordingEngine::new(0.25);
        let mut reports = Vec::new();
        run_suite(&mut engine, &[sine_scenario()], &config, |r| {
            reports.push(r.clone())
        })
        .unwrap();

        assert_eq!(
            reports[0].reference,
            ReferenceOutcome::FormatMismatch {
                rendered: (44_100, 1),
                reference: (48_000, 1),
            }
        );
    }

    #[test]
    fn test_engine_failure_aborts_the_run() {
        let (_dir, config) = temp_config();
        let mut engine = BrokenEngine;

        let result = run_suite(&mut engine, &[sine_scenario()], &config, |_| {});
        assert!(matches!(result, Err(HarnessError::Engine(_))));
    }

    #[test]
    fn test_sequential_execution_one_reset_per_scenario() {
        let (_dir, config) = temp_config();
        let mut engine = RecordingEngine::new(0.1);

        let second = Scenario::new("quiet", vec![]).unwrap();
        run_suite(
            &mut engine,
            &[sine_scenario(), second],
            &config,
            |_| {},
        )
        .unwrap();

        let restarts = engine.calls.iter().filter(|c| *c == "restart").count();
        let renders = engine.calls.iter().filter(|c| *c == "render").count();
        assert_eq!(restarts, 2);
        assert_eq!(renders, 2);
        // The second scenario's restart comes after the first render.
        let first_render = engine.calls.iter().position(|c| c == "render").unwrap();
        let second_restart = engine
            .calls
            .iter()
            .rposition(|c| c == "restart")
            .unwrap();
        assert!(second_restart > first_render);
    }
}
