//! Instrument role classification
//!
//! Maps a General MIDI program number to a coarse instrument role. The
//! mapping is a pure, total function; the percussion flag always wins
//! regardless of program number.

use super::Track;
use std::collections::BTreeMap;
use std::fmt;

/// Coarse instrument category used for grouping and timbre selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Role {
    /// Percussion channel (MIDI channel 10)
    Drums,
    /// Electric and acoustic basses (programs 32-39)
    Bass,
    /// Guitars (24-31)
    Guitar,
    /// Bowed strings (40-46)
    Strings,
    /// Orchestral percussion oddities: Timpani (47), Orchestra Hit (55)
    Percussion,
    /// String ensembles (48-51)
    Ensemble,
    /// Voice patches (52-54)
    Choir,
    /// Brass and winds (56-71)
    BrassWind,
    /// Synth leads and pads (80-95)
    Synth,
    /// Pianos, chromatic percussion and organs (0-23)
    KeysPiano,
    /// Everything else
    Other,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Role::Drums => "Drums",
            Role::Bass => "Bass",
            Role::Guitar => "Guitar",
            Role::Strings => "Strings",
            Role::Percussion => "Percussion",
            Role::Ensemble => "Ensemble",
            Role::Choir => "Choir",
            Role::BrassWind => "Brass/Wind",
            Role::Synth => "Synth",
            Role::KeysPiano => "Keys/Piano",
            Role::Other => "Other",
        };
        f.write_str(label)
    }
}

/// Classify a program number into a role; the percussion flag always wins
pub fn classify_role(program: u8, is_percussion: bool) -> Role {
    if is_percussion {
        return Role::Drums;
    }
    match program {
        32..=39 => Role::Bass,
        24..=31 => Role::Guitar,
        40..=46 => Role::Strings,
        47 => Role::Percussion, // Timpani
        48..=51 => Role::Ensemble,
        52..=54 => Role::Choir,
        55 => Role::Percussion, // Orchestra Hit
        56..=71 => Role::BrassWind,
        80..=95 => Role::Synth,
        0..=23 => Role::KeysPiano,
        _ => Role::Other,
    }
}

/// Bucket tracks by role, collecting instrument names per role.
///
/// Tracks without notes are dropped; they contribute nothing to playback.
pub fn group_tracks_by_role(tracks: &[Track]) -> BTreeMap<Role, Vec<String>> {
    let mut groups: BTreeMap<Role, Vec<String>> = BTreeMap::new();
    for track in tracks.iter().filter(|t| !t.notes.is_empty()) {
        let role = classify_role(track.program, track.percussion);
        groups.entry(role).or_default().push(track.name.clone());
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::playback::Note;

    #[test]
    fn test_percussion_flag_always_wins() {
        for program in 0..=u8::MAX {
            assert_eq!(classify_role(program, true), Role::Drums);
        }
    }

    #[test]
    fn test_classification_table() {
        assert_eq!(classify_role(0, false), Role::KeysPiano);
        assert_eq!(classify_role(23, false), Role::KeysPiano);
        assert_eq!(classify_role(24, false), Role::Guitar);
        assert_eq!(classify_role(33, false), Role::Bass);
        assert_eq!(classify_role(40, false), Role::Strings);
        assert_eq!(classify_role(46, false), Role::Strings);
        assert_eq!(classify_role(47, false), Role::Percussion);
        assert_eq!(classify_role(48, false), Role::Ensemble);
        assert_eq!(classify_role(52, false), Role::Choir);
        assert_eq!(classify_role(55, false), Role::Percussion);
        assert_eq!(classify_role(56, false), Role::BrassWind);
        assert_eq!(classify_role(71, false), Role::BrassWind);
        assert_eq!(classify_role(80, false), Role::Synth);
        assert_eq!(classify_role(95, false), Role::Synth);
        assert_eq!(classify_role(72, false), Role::Other);
        assert_eq!(classify_role(127, false), Role::Other);
    }

    #[test]
    fn test_grouping_skips_silent_tracks() {
        let tracks = vec![
            Track::new("Fingered Bass", 33, false)
                .with_notes(vec![Note::new(0.0, 0.5, 45, 0.9)]),
            Track::new("Empty Pad", 89, false),
            Track::new("Standard Kit", 0, true).with_notes(vec![Note::new(0.0, 0.1, 36, 1.0)]),
            Track::new("Picked Bass", 34, false)
                .with_notes(vec![Note::new(1.0, 0.5, 43, 0.8)]),
        ];

        let groups = group_tracks_by_role(&tracks);
        assert_eq!(
            groups.get(&Role::Bass).unwrap(),
            &["Fingered Bass", "Picked Bass"]
        );
        assert_eq!(groups.get(&Role::Drums).unwrap(), &["Standard Kit"]);
        assert!(!groups.contains_key(&Role::Synth));
    }
}
