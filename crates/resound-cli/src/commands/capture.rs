//! The `capture` command: write current renders into the reference
//! directory as the new baselines.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use colored::Colorize;
use walkdir::WalkDir;

use resound_harness::{capture_suite, ProbeEngine};
use resound_scenario::{catalog, Scenario};

use super::build_config;

/// Renders every catalog scenario into the reference directory and prints
/// the captured signal level and PCM hash per scenario. Reference files
/// that no longer match any scenario are reported afterwards so stale
/// baselines do not linger unnoticed.
pub fn run(ref_dir: Option<&str>) -> Result<ExitCode> {
    let config = build_config(ref_dir, None);
    let scenarios = catalog();
    let mut engine = ProbeEngine::new();

    let count = capture_suite(&mut engine, &scenarios, &config, |capture| {
        println!("{capture}");
    })
    .context("baseline capture failed")?;

    println!();
    println!(
        "{} {} reference recordings in {}",
        "Captured:".green().bold(),
        count,
        config.ref_dir.display()
    );

    for orphan in orphaned_references(&config.ref_dir, &scenarios) {
        println!(
            "{} orphaned reference (no matching scenario): {}",
            "WARN".yellow(),
            orphan.display()
        );
    }

    Ok(ExitCode::SUCCESS)
}

/// Finds `.wav` files in the reference directory whose stem matches no
/// scenario name.
fn orphaned_references(ref_dir: &Path, scenarios: &[Scenario]) -> Vec<PathBuf> {
    let mut orphans: Vec<PathBuf> = WalkDir::new(ref_dir)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| {
            entry
                .path()
                .extension()
                .and_then(|ext| ext.to_str())
                .map(|ext| ext.eq_ignore_ascii_case("wav"))
                .unwrap_or(false)
        })
        .filter(|entry| {
            let stem = entry.path().file_stem().and_then(|s| s.to_str());
            match stem {
                Some(stem) => !scenarios.iter().any(|s| s.name() == stem),
                None => true,
            }
        })
        .map(|entry| entry.path().to_path_buf())
        .collect();

    // Deterministic report order.
    orphans.sort();
    orphans
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_capture_writes_every_reference() {
        let dir = tempfile::tempdir().unwrap();
        let ref_dir = dir.path().join("ref");

        let result = run(Some(ref_dir.to_str().unwrap()));
        assert!(result.is_ok());

        for scenario in catalog() {
            assert!(ref_dir.join(format!("{}.wav", scenario.name())).exists());
        }
    }

    #[test]
    fn test_orphaned_references_are_detected() {
        let dir = tempfile::tempdir().unwrap();
        let ref_dir = dir.path().join("ref");
        fs::create_dir_all(&ref_dir).unwrap();

        fs::write(ref_dir.join("sine_osc.wav"), b"placeholder").unwrap();
        fs::write(ref_dir.join("retired_case.wav"), b"placeholder").unwrap();
        fs::write(ref_dir.join("notes.txt"), b"not audio").unwrap();

        let orphans = orphaned_references(&ref_dir, &catalog());
        assert_eq!(orphans, vec![ref_dir.join("retired_case.wav")]);
    }
}
