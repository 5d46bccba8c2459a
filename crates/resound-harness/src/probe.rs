//! Deterministic probe engine.
//!
//! `ProbeEngine` exists so the harness can be exercised end-to-end without
//! the real synthesizer: it is the engine behind the `resound` binary's
//! self-check mode and the integration tests. It is a probe, not a
//! synthesizer — no envelopes, no filters, no modulation. It interprets
//! the gating subset of the event vocabulary (oscillator index, waveform,
//! frequency, note, velocity, duty cycle) and turns each gated window into
//! a closed-form tone. Patch-based timbres (PCM, FM algorithms, partials)
//! sound as a sine placeholder so every catalog scenario stays audible.
//! Every parameter it does not interpret is ignored; those belong to the
//! real engine.
//!
//! Output is mono 44.1 kHz. The noise stream is seeded per render from a
//! fixed constant, so identical scripts produce identical buffers on every
//! invocation.

use std::collections::HashMap;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use resound_scenario::{Event, Param, Waveform};

use crate::audio::RenderedAudio;
use crate::engine::{Engine, EngineError, EngineResult};

/// Output sample rate of the probe.
pub const PROBE_SAMPLE_RATE: u32 = 44_100;

/// Base seed for the probe's noise stream.
const NOISE_SEED: u64 = 42;

/// Pitch used when a gated oscillator has neither frequency nor note.
const DEFAULT_FREQ_HZ: f64 = 261.63;

/// Peak amplitude of a single full-velocity voice.
const VOICE_AMPLITUDE: f64 = 0.5;

const TWO_PI: f64 = std::f64::consts::TAU;

/// Per-oscillator voicing state accumulated from events.
#[derive(Debug, Clone)]
struct OscState {
    wave: Waveform,
    freq: Option<f64>,
    note: Option<f64>,
    duty: f64,
}

impl Default for OscState {
    fn default() -> Self {
        Self {
            wave: Waveform::Sine,
            freq: None,
            note: None,
            duty: 0.5,
        }
    }
}

impl OscState {
    fn freq_hz(&self) -> f64 {
        if let Some(freq) = self.freq {
            freq
        } else if let Some(note) = self.note {
            midi_to_hz(note)
        } else {
            DEFAULT_FREQ_HZ
        }
    }
}

/// One gated tone window, snapshotted at note-on (or re-voice).
#[derive(Debug, Clone)]
struct Segment {
    start: usize,
    end: Option<usize>,
    wave: Waveform,
    freq_hz: f64,
    duty: f64,
    amplitude: f64,
}

/// The deterministic probe engine. See the module docs.
#[derive(Debug, Default)]
pub struct ProbeEngine {
    started: bool,
    events: Vec<Event>,
}

impl ProbeEngine {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Engine for ProbeEngine {
    fn restart(&mut self) -> EngineResult<()> {
        self.started = true;
        self.events.clear();
        Ok(())
    }

    fn send(&mut self, event: &Event) -> EngineResult<()> {
        if !self.started {
            return Err(EngineError::NotStarted);
        }
        self.events.push(event.clone());
        Ok(())
    }

    fn render(&mut self, seconds: f64) -> EngineResult<RenderedAudio> {
        if !self.started {
            return Err(EngineError::NotStarted);
        }
        if !seconds.is_finite() || seconds <= 0.0 {
            return Err(EngineError::InvalidDuration { seconds });
        }

        let frames = (seconds * PROBE_SAMPLE_RATE as f64).round() as usize;
        let segments = self.collect_segments(frames);
        Ok(synthesize(&segments, frames))
    }

    fn sample_rate(&self) -> u32 {
        PROBE_SAMPLE_RATE
    }

    fn channels(&self) -> u16 {
        1
    }
}

impl ProbeEngine {
    /// Replays the received events into gated tone segments.
    fn collect_segments(&self, frames: usize) -> Vec<Segment> {
        let mut events = self.events.clone();
        // Stable: equal timestamps keep arrival order.
        events.sort_by_key(Event::time_ms);

        let mut states: HashMap<u32, OscState> = HashMap::new();
        let mut open: HashMap<u32, Segment> = HashMap::new();
        let mut done: Vec<Segment> = Vec::new();

        for event in &events {
            let osc = event.osc_index().unwrap_or(0);
            let frame = ms_to_frame(event.time_ms(), frames);

            for param in event.params() {
                match param {
                    Param::Wave(wave) => {
                        states.entry(osc).or_default().wave = *wave;
                        retrigger(osc, frame, &states, &mut open, &mut done);
                    }
                    Param::Freq(coefs) => {
                        states.entry(osc).or_default().freq = Some(coefs.constant_value());
                        retrigger(osc, frame, &states, &mut open, &mut done);
                    }
                    Param::Note(note) => {
                        states.entry(osc).or_default().note = Some(*note);
                        retrigger(osc, frame, &states, &mut open, &mut done);
                    }
                    Param::Duty(coefs) => {
                        states.entry(osc).or_default().duty = coefs.constant_value();
                        retrigger(osc, frame, &states, &mut open, &mut done);
                    }
                    Param::Vel(vel) if *vel > 0.0 => {
                        if let Some(mut segment) = open.remove(&osc) {
                            segment.end = Some(frame);
                            done.push(segment);
                        }
                        let state = states.entry(osc).or_default();
                        open.insert(
                            osc,
                            Segment {
                                start: frame,
                                end: None,
                                wave: state.wave,
                                freq_hz: state.freq_hz(),
                                duty: state.duty,
                                amplitude: VOICE_AMPLITUDE * vel.clamp(0.0, 1.0),
                            },
                        );
                    }
                    Param::Vel(_) => {
                        if let Some(mut segment) = open.remove(&osc) {
                            segment.end = Some(frame);
                            done.push(segment);
                        }
                    }
                    // Everything else is the real engine's business.
                    _ => {}
                }
            }
        }

        // Oscillators still gated at the end of the window run to its edge.
        done.extend(open.into_values());
        done.sort_by_key(|segment| segment.start);
        done
    }
}

/// A voicing change while an oscillator is gated closes its segment and
/// reopens it with the new snapshot at the same amplitude.
fn retrigger(
    osc: u32,
    frame: usize,
    states: &HashMap<u32, OscState>,
    open: &mut HashMap<u32, Segment>,
    done: &mut Vec<Segment>,
) {
    if let Some(mut segment) = open.remove(&osc) {
        let amplitude = segment.amplitude;
        segment.end = Some(frame);
        done.push(segment);

        let state = &states[&osc];
        open.insert(
            osc,
            Segment {
                start: frame,
                end: None,
                wave: state.wave,
                freq_hz: state.freq_hz(),
                duty: state.duty,
                amplitude,
            },
        );
    }
}

/// Mixes the segments additively into one mono buffer.
fn synthesize(segments: &[Segment], frames: usize) -> RenderedAudio {
    let mut buffer = vec![0.0f64; frames];
    let rate = PROBE_SAMPLE_RATE as f64;

    for segment in segments {
        let end = segment.end.unwrap_or(frames).min(frames);
        if segment.start >= end {
            continue;
        }

        let mut rng = noise_rng(segment.start);
        for i in segment.start..end {
            // Phase is zero at segment start.
            let t = (i - segment.start) as f64 / rate;
            let frac = (segment.freq_hz * t).fract();
            let value = match segment.wave {
                Waveform::Pulse => {
                    if frac < segment.duty {
                        1.0
                    } else {
                        -1.0
                    }
                }
                Waveform::SawDown => 1.0 - 2.0 * frac,
                Waveform::SawUp => 2.0 * frac - 1.0,
                Waveform::Triangle => 4.0 * (frac - 0.5).abs() - 1.0,
                Waveform::Noise => rng.gen_range(-1.0..1.0),
                // Sine, plus the sine placeholder for patch timbres.
                Waveform::Sine | Waveform::Pcm | Waveform::Algo | Waveform::Partials => {
                    (TWO_PI * segment.freq_hz * t).sin()
                }
            };
            buffer[i] += segment.amplitude * value;
        }
    }

    let samples = buffer
        .iter()
        .map(|&s| s.clamp(-1.0, 1.0) as f32)
        .collect();
    RenderedAudio::new(samples, PROBE_SAMPLE_RATE, 1)
}

fn noise_rng(segment_start: usize) -> Pcg32 {
    Pcg32::seed_from_u64(NOISE_SEED.wrapping_add(segment_start as u64))
}

fn ms_to_frame(time_ms: u32, frames: usize) -> usize {
    let frame = (time_ms as u64 * PROBE_SAMPLE_RATE as u64 / 1000) as usize;
    frame.min(frames)
}

fn midi_to_hz(note: f64) -> f64 {
    440.0 * ((note - 69.0) / 12.0).exp2()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compare::level_db;

    fn gated_sine(freq: f64) -> Vec<Event> {
        vec![
            Event::at(0).osc(0).wave(Waveform::Sine).freq(freq),
            Event::at(100).vel(1.0),
            Event::at(500).vel(0.0),
        ]
    }

    fn render_events(events: &[Event]) -> RenderedAudio {
        let mut engine = ProbeEngine::new();
        engine.restart().unwrap();
        engine.send(&Event::at(0)).unwrap();
        for event in events {
            engine.send(event).unwrap();
        }
        engine.render(1.0).unwrap()
    }

    #[test]
    fn test_send_before_restart_fails() {
        let mut engine = ProbeEngine::new();
        assert_eq!(
            engine.send(&Event::at(0)),
            Err(EngineError::NotStarted)
        );
        assert!(matches!(engine.render(1.0), Err(EngineError::NotStarted)));
    }

    #[test]
    fn test_invalid_render_duration() {
        let mut engine = ProbeEngine::new();
        engine.restart().unwrap();
        assert!(matches!(
            engine.render(0.0),
            Err(EngineError::InvalidDuration { .. })
        ));
        assert!(matches!(
            engine.render(f64::NAN),
            Err(EngineError::InvalidDuration { .. })
        ));
    }

    #[test]
    fn test_gated_sine_is_audible_and_windowed() {
        let audio = render_events(&gated_sine(1000.0));
        assert_eq!(audio.frames(), 44_100);

        // Silence before the gate opens at 100 ms.
        let pre_gate = &audio.samples[..4000];
        assert!(pre_gate.iter().all(|s| *s == 0.0));

        // Audible inside the gate.
        let gated = &audio.samples[4410..22_050];
        assert!(level_db(gated) > -60.0);

        // Silence again after note-off at 500 ms.
        let post_gate = &audio.samples[22_100..];
        assert!(post_gate.iter().all(|s| *s == 0.0));
    }

    #[test]
    fn test_sine_frequency_via_zero_crossings() {
        let audio = render_events(&gated_sine(1000.0));
        let gated = &audio.samples[4410..22_050];
        let crossings = gated
            .windows(2)
            .filter(|w| (w[0] >= 0.0) != (w[1] >= 0.0))
            .count();
        // 1 kHz over 0.4 s: about 800 crossings.
        assert!((700..900).contains(&crossings), "crossings={crossings}");
    }

    #[test]
    fn test_note_sets_pitch() {
        // MIDI 69 is concert A.
        let events = vec![
            Event::at(0).osc(0).wave(Waveform::Sine),
            Event::at(0).note(69.0).vel(1.0),
        ];
        let audio = render_events(&events);
        let crossings = audio
            .samples
            .windows(2)
            .filter(|w| (w[0] >= 0.0) != (w[1] >= 0.0))
            .count();
        // 440 Hz over the full second: about 880 crossings.
        assert!((800..960).contains(&crossings), "crossings={crossings}");
    }

    #[test]
    fn test_render_is_deterministic_across_restarts() {
        let render_once = || {
            let mut engine = ProbeEngine::new();
            engine.restart().unwrap();
            for event in gated_sine(1000.0) {
                engine.send(&event).unwrap();
            }
            engine.render(1.0).unwrap().pcm_hash()
        };
        assert_eq!(render_once(), render_once());
    }

    #[test]
    fn test_noise_is_deterministic() {
        let noise = vec![
            Event::at(0).osc(0).wave(Waveform::Noise).freq(1000.0),
            Event::at(100).vel(1.0),
            Event::at(500).vel(0.0),
        ];
        let a = render_events(&noise);
        let b = render_events(&noise);
        assert_eq!(a.pcm_hash(), b.pcm_hash());
        assert!(level_db(&a.samples) > -60.0);
    }

    #[test]
    fn test_restart_clears_state() {
        let mut engine = ProbeEngine::new();
        engine.restart().unwrap();
        for event in gated_sine(1000.0) {
            engine.send(&event).unwrap();
        }
        let first = engine.render(1.0).unwrap();

        // After a restart with no events, the probe renders silence.
        engine.restart().unwrap();
        let silent = engine.render(1.0).unwrap();
        assert!(silent.samples.iter().all(|s| *s == 0.0));
        assert!(first.samples.iter().any(|s| *s != 0.0));
    }

    #[test]
    fn test_revoice_while_gated_changes_pitch() {
        // Pitch change mid-note, as in the startup-bleep scenario.
        let events = vec![
            Event::at(0).osc(0).wave(Waveform::Sine).freq(220.0),
            Event::at(100).vel(1.0),
            Event::at(250).freq(440.0),
            Event::at(300).vel(0.0),
        ];
        let audio = render_events(&events);

        let count_crossings = |samples: &[f32]| {
            samples
                .windows(2)
                .filter(|w| (w[0] >= 0.0) != (w[1] >= 0.0))
                .count()
        };
        // 150 ms at 220 Hz vs 50 ms at 440 Hz.
        let first = count_crossings(&audio.samples[4410..11_025]);
        let second = count_crossings(&audio.samples[11_025..13_230]);
        assert!((50..85).contains(&first), "first={first}");
        assert!((30..60).contains(&second), "second={second}");
    }

    #[test]
    fn test_unknown_params_are_ignored() {
        let mut events = gated_sine(1000.0);
        events[0] = events[0].clone().resonance(8.0).ext("vendor_mode", "3");
        let with_extras = render_events(&events);
        let without = render_events(&gated_sine(1000.0));
        assert_eq!(with_extras.pcm_hash(), without.pcm_hash());
    }

    #[test]
    fn test_two_oscillators_mix() {
        let events = vec![
            Event::at(0).osc(0).wave(Waveform::Sine).freq(440.0),
            Event::at(0).osc(1).wave(Waveform::Sine).freq(660.0),
            Event::at(0).osc(0).vel(1.0),
            Event::at(0).osc(1).vel(1.0),
            Event::at(500).osc(0).vel(0.0),
            Event::at(500).osc(1).vel(0.0),
        ];
        let audio = render_events(&events);
        // Two half-amplitude voices: louder than either alone would be at
        // its RMS, and nothing clamped.
        assert!(level_db(&audio.samples[..22_050]) > -9.0);
        assert!(audio.samples.iter().all(|s| s.abs() <= 1.0));
    }

    #[test]
    fn test_midi_to_hz() {
        assert!((midi_to_hz(69.0) - 440.0).abs() < 1e-9);
        assert!((midi_to_hz(57.0) - 220.0).abs() < 1e-9);
        assert!((midi_to_hz(60.0) - 261.63).abs() < 0.01);
    }
}
