//! The built-in scenario catalog.
//!
//! Every test case is registered here explicitly; the runner iterates this
//! list and nothing else. Each scenario exercises one engine behavior:
//! a single oscillator waveform, an envelope, a filter, a modulation
//! routing, or a spelled-out instrument patch.

use crate::event::{Event, FilterKind, ModTarget, Waveform};
use crate::scenario::Scenario;

fn scenario(name: &str, events: Vec<Event>) -> Scenario {
    Scenario::new(name, events).expect("built-in scenario is valid")
}

/// Returns the full scenario suite, in execution order.
pub fn catalog() -> Vec<Scenario> {
    vec![
        // --- single-oscillator waveforms -------------------------------
        scenario(
            "sine_osc",
            vec![
                Event::at(0).osc(0).wave(Waveform::Sine).freq(1000.0),
                Event::at(100).vel(1.0),
                Event::at(500).vel(0.0),
            ],
        ),
        scenario(
            "pulse_osc",
            vec![
                Event::at(0).osc(0).wave(Waveform::Pulse).freq(1000.0),
                Event::at(100).vel(1.0),
                Event::at(500).vel(0.0),
            ],
        ),
        scenario(
            "saw_down_osc",
            vec![
                Event::at(0).osc(0).wave(Waveform::SawDown),
                Event::at(100).note(48.0).vel(1.0),
                Event::at(900).vel(0.0),
            ],
        ),
        scenario(
            "saw_up_osc",
            vec![
                Event::at(0).osc(0).wave(Waveform::SawUp),
                Event::at(100).note(46.0).vel(1.0),
                Event::at(500).vel(0.0),
            ],
        ),
        scenario(
            "triangle_osc",
            vec![
                Event::at(0).osc(0).wave(Waveform::Triangle).freq(1000.0),
                Event::at(100).vel(1.0),
                Event::at(500).vel(0.0),
            ],
        ),
        // The noise source is seeded at engine restart; see the engine's
        // seeding contract for what "deterministic" means here.
        scenario(
            "noise_osc",
            vec![
                Event::at(0).osc(0).wave(Waveform::Noise).freq(1000.0),
                Event::at(100).vel(1.0),
                Event::at(500).vel(0.0),
            ],
        ),
        // --- sampled and patch-based sources ---------------------------
        scenario(
            "pcm",
            vec![
                Event::at(0).osc(0).wave(Waveform::Pcm).patch(1),
                Event::at(100).vel(1.0),
            ],
        ),
        scenario(
            "pcm_shift",
            vec![
                Event::at(0).osc(0).wave(Waveform::Pcm).patch(10),
                // No note plays the patch at its default pitch.
                Event::at(100).vel(1.0),
                // An explicit note shifts it.
                Event::at(500).note(70.0).vel(1.0),
            ],
        ),
        scenario(
            "partials",
            vec![
                Event::at(0).osc(0).wave(Waveform::Partials).patch(1),
                Event::at(100).note(60.0).vel(1.0),
            ],
        ),
        scenario(
            "algo",
            vec![
                Event::at(0).osc(0).wave(Waveform::Algo).patch(21),
                Event::at(100).note(70.0).vel(1.0),
                Event::at(500).vel(0.0),
            ],
        ),
        scenario(
            "algo2",
            vec![
                Event::at(0).osc(0).wave(Waveform::Algo).patch(24),
                Event::at(100).note(70.0).vel(1.0),
                Event::at(500).vel(0.0),
            ],
        ),
        // --- envelopes -------------------------------------------------
        scenario(
            "sine_env",
            vec![
                Event::at(0).osc(0).wave(Waveform::Sine).freq(1000.0),
                Event::at(0)
                    .osc(0)
                    .amp_coefs([0.0, 0.0, 0.85, 1.0, 0.0, 0.0])
                    .bp0([(50, 1.0), (250, 0.1), (50, 0.0)]),
                Event::at(100).vel(1.0),
                Event::at(500).vel(0.0),
            ],
        ),
        // --- filters and modulation ------------------------------------
        scenario(
            "filter",
            vec![
                Event::at(0)
                    .osc(0)
                    .wave(Waveform::SawDown)
                    .filter_type(FilterKind::LowPass)
                    .resonance(8.0)
                    .filter_freq_coefs([300.0, 0.0, 0.0, 0.0, 3.0])
                    .bp1([(0, 1.0), (800, 0.1), (50, 0.0)]),
                Event::at(100).note(48.0).vel(1.0),
                Event::at(900).vel(0.0),
            ],
        ),
        scenario(
            "filter_lfo",
            vec![
                Event::at(0).osc(1).wave(Waveform::Sine).freq(6.0).amp(1.0),
                Event::at(0)
                    .osc(0)
                    .wave(Waveform::SawDown)
                    .filter_type(FilterKind::LowPass)
                    .resonance(8.0)
                    .mod_source(1)
                    .filter_freq_coefs([400.0, 0.0, 0.0, 0.0, 3.0, 0.5])
                    .bp1([(0, 1.0), (500, 0.0), (100, 0.0)]),
                Event::at(100).note(48.0).vel(1.0),
                Event::at(500).vel(0.0),
            ],
        ),
        scenario(
            "lfo",
            vec![
                // Unit-per-octave pitch modulation: +/- 0.138 octaves.
                Event::at(0).osc(1).wave(Waveform::Sine).freq(4.0).amp(0.138),
                Event::at(0)
                    .osc(0)
                    .wave(Waveform::Sine)
                    .mod_source(1)
                    .mod_target(ModTarget::Freq),
                Event::at(100).note(70.0).vel(1.0),
                Event::at(500).vel(0.0),
            ],
        ),
        // --- pulse width -----------------------------------------------
        scenario(
            "duty",
            vec![
                Event::at(0).osc(0).wave(Waveform::Pulse).duty(0.1),
                Event::at(100).note(70.0).vel(1.0),
                Event::at(200).vel(0.0),
                Event::at(300).osc(0).wave(Waveform::Pulse).duty(0.9),
                Event::at(300).note(70.0).vel(1.0),
                Event::at(400).vel(0.0),
            ],
        ),
        scenario(
            "pwm",
            vec![
                Event::at(0)
                    .osc(0)
                    .wave(Waveform::Pulse)
                    .mod_source(1)
                    .duty_coefs([0.5, 0.0, 0.0, 0.0, 0.0, 0.25]),
                Event::at(0).osc(1).wave(Waveform::Sine).freq(4.0).amp(1.0),
                Event::at(100).note(70.0).vel(1.0),
                Event::at(500).vel(0.0),
            ],
        ),
        // --- global effects --------------------------------------------
        scenario(
            "global_eq",
            vec![
                Event::at(0).eq(-10.0, 10.0, 3.0),
                Event::at(0).osc(0).wave(Waveform::SawUp),
                Event::at(100).note(46.0).vel(1.0),
                Event::at(500).vel(0.0),
            ],
        ),
        scenario(
            "chorus",
            vec![
                Event::at(0).chorus_level(1.0),
                // Same voicing as the filter scenario, through the chorus.
                Event::at(0)
                    .osc(0)
                    .wave(Waveform::SawDown)
                    .filter_type(FilterKind::LowPass)
                    .resonance(8.0)
                    .filter_freq_coefs([300.0, 0.0, 0.0, 0.0, 3.0])
                    .bp1([(0, 1.0), (800, 0.1), (50, 0.0)]),
                Event::at(100).note(48.0).vel(1.0),
                Event::at(900).vel(0.0),
            ],
        ),
        // --- spelled-out instrument patches ----------------------------
        // A Juno-6 style brass patch, two articulations.
        scenario(
            "brass",
            vec![
                Event::at(0)
                    .osc(1)
                    .wave(Waveform::SawUp)
                    .freq_coefs([130.81, 1.0, 0.0, 0.0, 0.0, 0.0])
                    .amp_coefs([0.0, 0.0, 0.85, 1.0, 0.0, 0.0])
                    .bp0([(30, 1.0), (702, 0.354), (100, 0.0)])
                    .filter_type(FilterKind::LowPass24)
                    .resonance(0.167)
                    .filter_freq_coefs([93.73, 0.677, 0.0, 0.0, 9.133, 0.0])
                    .bp1([(30, 1.0), (702, 0.354), (100, 0.0)])
                    .mod_source(2),
                Event::at(0)
                    .osc(2)
                    .wave(Waveform::Sine)
                    .freq(0.974)
                    .bp0([(156, 1.0), (256, 1.0), (100, 0.0)]),
                Event::at(100).osc(1).note(76.0).vel(1.0),
                Event::at(300).osc(1).vel(0.0),
                Event::at(600).osc(1).note(76.0).vel(1.0),
                Event::at(800).osc(1).vel(0.0),
            ],
        ),
        // Shorter release; exercises the note-off thump.
        scenario(
            "brass2",
            vec![
                Event::at(0)
                    .osc(0)
                    .wave(Waveform::SawUp)
                    .amp_coefs([0.0, 0.0, 0.85, 1.0])
                    .freq_coefs([130.815, 1.0])
                    .resonance(0.713)
                    .filter_type(FilterKind::LowPass24)
                    .filter_freq_coefs([93.726, 0.677, 0.0, 0.0, 9.134])
                    .bp0([(30, 1.0), (702, 0.354), (232, 0.0)])
                    .bp1([(30, 1.0), (702, 0.354), (232, 0.0)]),
                Event::at(100).osc(0).note(60.0).vel(1.0),
                Event::at(600).osc(0).vel(0.0),
            ],
        ),
        // Fast repluck; exercises the note-off zipper.
        scenario(
            "guitar",
            vec![
                Event::at(0)
                    .osc(0)
                    .wave(Waveform::SawUp)
                    .amp_coefs([0.0, 0.0, 0.756, 1.0])
                    .freq_coefs([130.815, 1.0])
                    .filter_freq_coefs([16.23, 0.236, 0.0, 0.0, 11.181])
                    .resonance(0.753)
                    .filter_type(FilterKind::LowPass24)
                    .bp0([(6, 1.0), (57, 0.425), (153, 0.0)])
                    .bp1([(6, 1.0), (57, 0.425), (153, 0.0)]),
                Event::at(100).osc(0).note(60.0).vel(4.0),
                Event::at(150).osc(0).vel(0.0),
                Event::at(500).osc(0).note(60.0).vel(4.0),
                Event::at(550).osc(0).vel(0.0),
            ],
        ),
        // Start-up beep with a pan sweep.
        scenario(
            "bleep",
            vec![
                Event::at(0).wave(Waveform::Sine).freq(220.0),
                Event::at(100).osc(0).pan(0.9).vel(1.0),
                Event::at(250).osc(0).pan(0.1).freq(440.0),
                Event::at(300).osc(0).pan(0.5).vel(0.0),
            ],
        ),
    ]
}
