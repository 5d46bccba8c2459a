//! resound audio regression harness.
//!
//! The harness replays [`resound_scenario`] scripts against a synthesis
//! engine, renders one fixed-duration buffer per scenario, persists it as a
//! 16-bit PCM recording, and reports how far it has drifted from a
//! previously captured reference recording — as a decibel level, never as
//! a pass/fail verdict.
//!
//! # Driving a real engine
//!
//! Implement [`Engine`] for a handle to the synthesizer under test and run
//! the suite through the library API:
//!
//! ```no_run
//! use resound_harness::{run_suite, Engine, RunConfig};
//! use resound_scenario::catalog;
//!
//! fn check<E: Engine>(engine: &mut E) -> Result<(), resound_harness::HarnessError> {
//!     let summary = run_suite(engine, &catalog(), &RunConfig::default(), |report| {
//!         println!("{report}");
//!     })?;
//!     println!("{summary}");
//!     Ok(())
//! }
//! ```
//!
//! The built-in [`ProbeEngine`] is a deterministic stand-in used by the
//! `resound` binary's self-check mode and by the integration tests; it is
//! not the engine under test.

pub mod audio;
pub mod compare;
pub mod engine;
pub mod probe;
pub mod report;
pub mod runner;
pub mod wav;

pub use audio::RenderedAudio;
pub use compare::{error_db, level_db, rms, CompareError, DB_EPSILON, SILENCE_FLOOR_DB};
pub use engine::{Engine, EngineError, EngineResult};
pub use probe::{ProbeEngine, PROBE_SAMPLE_RATE};
pub use report::{CaptureReport, ReferenceOutcome, ScenarioReport, SuiteSummary};
pub use runner::{
    capture_suite, run_suite, HarnessError, RunConfig, DEFAULT_OUT_DIR, DEFAULT_REF_DIR,
    RENDER_SECONDS,
};
pub use wav::{read_wav_file, write_wav_file, WavError};
