//! Offline group rendering
//!
//! Synthesizes an installed schedule into a mono f32 sample buffer and
//! exports it as WAV. Each voice is a single oscillator shaped by the
//! timbre's ADSR envelope; the membrane voice adds the fast downward
//! pitch sweep that stands in for a drum hit.

use super::{OscillatorShape, ScheduledNote, Timbre, VoiceSchedule};
use crate::{QuizbeatError, Result};
use std::path::Path;

/// Default render sample rate in Hz
pub const SAMPLE_RATE: u32 = 44_100;

/// Membrane pitch sweep: starts this many octaves above the note
const MEMBRANE_OCTAVES: f32 = 4.0;
/// Membrane pitch sweep time constant in seconds
const MEMBRANE_PITCH_DECAY: f32 = 0.05;
/// Peak level the mixed buffer is normalized down to when it clips
const PEAK_TARGET: f32 = 0.9;

fn midi_to_freq(midi: u8) -> f32 {
    440.0 * 2f32.powf((midi as f32 - 69.0) / 12.0)
}

/// Envelope level at `t` seconds into a note of `duration` seconds
fn envelope_level(timbre: &Timbre, t: f32, duration: f32) -> f32 {
    let env = &timbre.envelope;
    if t < 0.0 {
        return 0.0;
    }
    if t < duration {
        if t < env.attack {
            return t / env.attack.max(1e-4);
        }
        let after_attack = t - env.attack;
        if after_attack < env.decay {
            let k = after_attack / env.decay.max(1e-4);
            return 1.0 - k * (1.0 - env.sustain);
        }
        return env.sustain;
    }
    // Release from whatever level the note held at cutoff
    let held = envelope_level(timbre, duration.min(duration - 1e-6).max(0.0), f32::INFINITY);
    let into_release = t - duration;
    if into_release >= env.release {
        0.0
    } else {
        held * (1.0 - into_release / env.release.max(1e-4))
    }
}

fn oscillator_sample(shape: OscillatorShape, phase: f32) -> f32 {
    // phase in [0, 1)
    match shape {
        OscillatorShape::Sine | OscillatorShape::Membrane => {
            (phase * std::f32::consts::TAU).sin()
        }
        OscillatorShape::Triangle => 4.0 * (phase - 0.5).abs() - 1.0,
        OscillatorShape::Sawtooth => 2.0 * phase - 1.0,
    }
}

fn render_note(timbre: &Timbre, note: &ScheduledNote, sample_rate: u32, out: &mut [f32]) {
    let rate = sample_rate as f32;
    let base_freq = midi_to_freq(note.midi);
    let duration = note.duration as f32;
    let total = duration + timbre.envelope.release;
    let start = (note.onset * sample_rate as f64) as usize;
    let count = (total * rate) as usize;

    let mut phase = 0.0f32;
    for i in 0..count {
        let idx = start + i;
        if idx >= out.len() {
            break;
        }
        let t = i as f32 / rate;
        let freq = match timbre.shape {
            OscillatorShape::Membrane => {
                // Sweep from (base << octaves) down toward base
                let sweep = (-t / MEMBRANE_PITCH_DECAY).exp();
                base_freq * (1.0 + (2f32.powf(MEMBRANE_OCTAVES) - 1.0) * sweep)
            }
            _ => base_freq,
        };
        phase = (phase + freq / rate).fract();
        let level = envelope_level(timbre, t, duration) * note.velocity;
        out[idx] += oscillator_sample(timbre.shape, phase) * level;
    }
}

/// Render a schedule to a mono f32 buffer at `sample_rate`.
///
/// The buffer covers the last note's end plus its release tail. Output is
/// peak-normalized only when the mix would clip.
pub fn render_group(schedule: &[VoiceSchedule], sample_rate: u32) -> Vec<f32> {
    let mut total = 0.0f64;
    for voice in schedule {
        for note in &voice.notes {
            let end = note.onset + note.duration + voice.timbre.envelope.release as f64;
            total = total.max(end);
        }
    }
    let mut out = vec![0.0f32; (total * sample_rate as f64).ceil() as usize];

    for voice in schedule {
        for note in &voice.notes {
            render_note(&voice.timbre, note, sample_rate, &mut out);
        }
    }

    let peak = out.iter().fold(0.0f32, |acc, s| acc.max(s.abs()));
    if peak > PEAK_TARGET {
        let gain = PEAK_TARGET / peak;
        for s in &mut out {
            *s *= gain;
        }
    }
    out
}

/// Write a mono f32 buffer as a 16-bit WAV file
pub fn write_wav(path: impl AsRef<Path>, samples: &[f32], sample_rate: u32) -> Result<()> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path, spec)
        .map_err(|e| QuizbeatError::Audio(e.to_string()))?;
    for &sample in samples {
        let value = (sample.clamp(-1.0, 1.0) * i16::MAX as f32) as i16;
        writer
            .write_sample(value)
            .map_err(|e| QuizbeatError::Audio(e.to_string()))?;
    }
    writer
        .finalize()
        .map_err(|e| QuizbeatError::Audio(e.to_string()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::playback::{timbre_for, Role};

    fn one_note_schedule(shape_role: Role, percussion: bool) -> Vec<VoiceSchedule> {
        vec![VoiceSchedule {
            timbre: timbre_for(shape_role, percussion),
            notes: vec![ScheduledNote {
                onset: 0.0,
                duration: 0.5,
                midi: 57,
                velocity: 0.9,
            }],
        }]
    }

    #[test]
    fn test_render_is_audible_and_bounded() {
        let samples = render_group(&one_note_schedule(Role::Bass, false), SAMPLE_RATE);
        let timbre = timbre_for(Role::Bass, false);
        let expected = ((0.5 + timbre.envelope.release as f64) * SAMPLE_RATE as f64).ceil();
        assert_eq!(samples.len(), expected as usize);
        assert!(samples.iter().any(|s| s.abs() > 0.01), "rendered silence");
        assert!(samples.iter().all(|s| s.abs() <= 1.0));
    }

    #[test]
    fn test_empty_schedule_renders_nothing() {
        assert!(render_group(&[], SAMPLE_RATE).is_empty());
    }

    #[test]
    fn test_membrane_sweep_starts_high() {
        // The percussion voice's early cycles run well above the base
        // frequency; just assert the render is non-trivial and decays.
        let samples = render_group(&one_note_schedule(Role::Drums, true), SAMPLE_RATE);
        let head: f32 = samples[..2000].iter().map(|s| s.abs()).sum();
        let tail: f32 = samples[samples.len() - 2000..].iter().map(|s| s.abs()).sum();
        assert!(head > tail, "membrane hit should decay");
    }

    #[test]
    fn test_write_wav_roundtrip_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("group.wav");
        let samples = render_group(&one_note_schedule(Role::Strings, false), 8_000);
        write_wav(&path, &samples, 8_000).unwrap();

        let reader = hound::WavReader::open(&path).unwrap();
        assert_eq!(reader.spec().channels, 1);
        assert_eq!(reader.spec().sample_rate, 8_000);
        assert_eq!(reader.len() as usize, samples.len());
    }
}
