//! End-to-end suite runs against the probe engine.

use std::fs;

use resound_harness::{
    capture_suite, level_db, run_suite, ProbeEngine, ReferenceOutcome, RunConfig,
    SILENCE_FLOOR_DB,
};
use resound_scenario::catalog;

fn temp_config() -> (tempfile::TempDir, RunConfig) {
    let dir = tempfile::tempdir().expect("temp dir");
    let config = RunConfig::default()
        .with_ref_dir(dir.path().join("ref"))
        .with_out_dir(dir.path().join("tst"));
    (dir, config)
}

#[test]
fn first_run_reports_every_scenario_with_missing_references() {
    let (_dir, config) = temp_config();
    let scenarios = catalog();
    let mut engine = ProbeEngine::new();

    let mut reports = Vec::new();
    let summary = run_suite(&mut engine, &scenarios, &config, |r| {
        reports.push(r.clone())
    })
    .expect("run completes");

    assert_eq!(summary.scenarios, scenarios.len());
    assert_eq!(summary.missing, scenarios.len());
    assert_eq!(summary.compared, 0);

    for (scenario, report) in scenarios.iter().zip(&reports) {
        assert_eq!(report.name, scenario.name());
        assert!(report.signal_db.is_finite());
        assert!(matches!(report.reference, ReferenceOutcome::Missing { .. }));
        // Every scenario left a recording behind.
        assert!(RunConfig::wav_path(&config.out_dir, scenario.name()).exists());
    }
}

#[test]
fn sine_scenario_is_audible() {
    let (_dir, config) = temp_config();
    let scenarios = catalog();
    let mut engine = ProbeEngine::new();

    let mut reports = Vec::new();
    run_suite(&mut engine, &scenarios, &config, |r| reports.push(r.clone())).unwrap();

    let sine = reports
        .iter()
        .find(|r| r.name == "sine_osc")
        .expect("sine_osc report");
    assert!(sine.signal_db > -60.0, "signal={}", sine.signal_db);
}

#[test]
fn capture_then_run_compares_at_the_floor() {
    let (_dir, config) = temp_config();
    let scenarios = catalog();
    let mut engine = ProbeEngine::new();

    let captured = capture_suite(&mut engine, &scenarios, &config, |_| {}).unwrap();
    assert_eq!(captured, scenarios.len());

    let mut reports = Vec::new();
    let summary = run_suite(&mut engine, &scenarios, &config, |r| {
        reports.push(r.clone())
    })
    .unwrap();

    assert_eq!(summary.compared, scenarios.len());
    assert_eq!(summary.missing, 0);

    for report in &reports {
        // The probe is fully deterministic, so every re-render matches its
        // capture to within WAV quantization.
        let error = report
            .reference
            .error_db()
            .unwrap_or_else(|| panic!("{} was not compared", report.name));
        assert!(error < -80.0, "{}: err={}", report.name, error);
        assert!(error >= SILENCE_FLOOR_DB - 1e-6);
    }
}

#[test]
fn capture_reports_carry_stable_hashes() {
    let (_dir, config) = temp_config();
    let scenarios = catalog();

    let mut engine = ProbeEngine::new();
    let mut first = Vec::new();
    capture_suite(&mut engine, &scenarios, &config, |c| first.push(c.clone())).unwrap();

    let mut engine = ProbeEngine::new();
    let mut second = Vec::new();
    capture_suite(&mut engine, &scenarios, &config, |c| second.push(c.clone())).unwrap();

    for (a, b) in first.iter().zip(&second) {
        assert_eq!(a.name, b.name);
        assert_eq!(a.pcm_hash, b.pcm_hash, "{} drifted between runs", a.name);
    }
}

#[test]
fn tampered_reference_shows_up_as_error_level() {
    let (_dir, config) = temp_config();
    let scenarios: Vec<_> = catalog()
        .into_iter()
        .filter(|s| s.name() == "sine_osc")
        .collect();
    let mut engine = ProbeEngine::new();

    capture_suite(&mut engine, &scenarios, &config, |_| {}).unwrap();

    // Attenuate the captured reference slightly.
    let ref_path = RunConfig::wav_path(&config.ref_dir, "sine_osc");
    let reference = resound_harness::read_wav_file(&ref_path).unwrap();
    let mut tampered = reference.clone();
    for sample in &mut tampered.samples {
        *sample *= 0.9;
    }
    resound_harness::write_wav_file(&ref_path, &tampered).unwrap();

    let mut reports = Vec::new();
    run_suite(&mut engine, &scenarios, &config, |r| reports.push(r.clone())).unwrap();

    let error = reports[0].reference.error_db().expect("compared");
    // A 10% amplitude change is far above the floor but below the signal.
    assert!(error > SILENCE_FLOOR_DB + 10.0, "err={error}");
    assert!(error < reports[0].signal_db, "err={error}");
}

#[test]
fn run_output_matches_reference_byte_for_byte_after_capture() {
    let (_dir, config) = temp_config();
    let scenarios: Vec<_> = catalog()
        .into_iter()
        .filter(|s| s.name() == "noise_osc")
        .collect();
    let mut engine = ProbeEngine::new();

    capture_suite(&mut engine, &scenarios, &config, |_| {}).unwrap();
    run_suite(&mut engine, &scenarios, &config, |_| {}).unwrap();

    // The seeded noise source renders identically, so the recording files
    // are byte-identical.
    let reference = fs::read(RunConfig::wav_path(&config.ref_dir, "noise_osc")).unwrap();
    let output = fs::read(RunConfig::wav_path(&config.out_dir, "noise_osc")).unwrap();
    assert_eq!(reference, output);
}

#[test]
fn every_catalog_recording_has_sane_levels() {
    let (_dir, config) = temp_config();
    let scenarios = catalog();
    let mut engine = ProbeEngine::new();

    run_suite(&mut engine, &scenarios, &config, |_| {}).unwrap();

    for scenario in &scenarios {
        let path = RunConfig::wav_path(&config.out_dir, scenario.name());
        let audio = resound_harness::read_wav_file(&path).unwrap();
        let level = level_db(&audio.samples);
        assert!(level.is_finite());
        assert!(
            level >= SILENCE_FLOOR_DB - 1e-6 && level <= 0.0,
            "{}: level={}",
            scenario.name(),
            level
        );
    }
}
