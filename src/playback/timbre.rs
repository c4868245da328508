//! Role timbre presets
//!
//! A pure lookup from (role, percussion flag) to a synthesizer
//! configuration: oscillator shape plus ADSR envelope, or the
//! membrane-style percussion voice. Stateless by design so the same group
//! always sounds the same.

use super::Role;

/// Oscillator shape for a synthesized voice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OscillatorShape {
    /// Pure sine
    Sine,
    /// Triangle
    Triangle,
    /// Sawtooth
    Sawtooth,
    /// Pitched membrane with a fast downward pitch sweep (drums)
    Membrane,
}

/// Linear ADSR envelope, all stages in seconds except sustain level
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Envelope {
    /// Attack time
    pub attack: f32,
    /// Decay time
    pub decay: f32,
    /// Sustain level in `[0, 1]`
    pub sustain: f32,
    /// Release time
    pub release: f32,
}

/// One synthesizer configuration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Timbre {
    /// Oscillator shape
    pub shape: OscillatorShape,
    /// Amplitude envelope
    pub envelope: Envelope,
}

const fn timbre(shape: OscillatorShape, attack: f32, decay: f32, sustain: f32, release: f32) -> Timbre {
    Timbre {
        shape,
        envelope: Envelope {
            attack,
            decay,
            sustain,
            release,
        },
    }
}

/// Select the voice configuration for a track.
///
/// Percussion tracks always get the membrane voice; otherwise the group's
/// role decides. Deterministic lookup, no state.
pub fn timbre_for(role: Role, is_percussion: bool) -> Timbre {
    if is_percussion {
        return timbre(OscillatorShape::Membrane, 0.001, 0.05, 0.0, 0.2);
    }
    match role {
        Role::Bass => timbre(OscillatorShape::Triangle, 0.02, 0.1, 0.8, 0.5),
        Role::BrassWind => timbre(OscillatorShape::Sawtooth, 0.05, 0.1, 0.7, 0.3),
        Role::Strings | Role::Ensemble => timbre(OscillatorShape::Sine, 0.3, 0.1, 0.9, 1.0),
        _ => timbre(OscillatorShape::Triangle, 0.02, 0.1, 0.5, 0.5),
    }
}
