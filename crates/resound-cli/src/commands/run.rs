//! The `run` command: execute the suite and report drift.

use std::process::ExitCode;

use anyhow::{Context, Result};
use colored::Colorize;

use resound_harness::{run_suite, ProbeEngine};
use resound_scenario::catalog;

use super::build_config;

/// Runs every catalog scenario against the built-in probe engine and
/// prints one diagnostic line per scenario plus a trailer.
///
/// The run reports; it does not gate. Completing the suite always exits
/// zero, whatever the error levels say. Only an engine failure or an
/// unwritable output directory is fatal.
pub fn run(ref_dir: Option<&str>, out_dir: Option<&str>) -> Result<ExitCode> {
    let config = build_config(ref_dir, out_dir);
    let scenarios = catalog();
    let mut engine = ProbeEngine::new();

    let summary = run_suite(&mut engine, &scenarios, &config, |report| {
        println!("{report}");
    })
    .context("suite run failed")?;

    println!();
    println!("{} {}", "Done:".green().bold(), summary);
    Ok(ExitCode::SUCCESS)
}
