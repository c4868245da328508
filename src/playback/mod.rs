//! Role Grouping & Transport
//!
//! The music-player half of the crate. Instrument tracks (already parsed
//! from MIDI by an external collaborator) are classified into coarse roles,
//! grouped, and played as a group: every track in the group gets a
//! role-derived synthesized timbre, all events share one transport
//! timeline normalized to start at zero, and progress is reported by
//! polling the transport clock rather than by push events.

mod render;
mod roles;
mod timbre;
mod transport;

pub use render::{render_group, write_wav, SAMPLE_RATE};
pub use roles::{classify_role, group_tracks_by_role, Role};
pub use timbre::{timbre_for, Envelope, OscillatorShape, Timbre};
pub use transport::{
    GroupPlayer, ManualClock, PlaybackState, Progress, ProgressTicker, ScheduledNote,
    TransportClock, VoiceSchedule, PROGRESS_INTERVAL,
};

/// One note event: onset and duration in seconds, MIDI pitch, velocity 0..1
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Note {
    /// Onset time in seconds on the source timeline
    pub onset: f64,
    /// Duration in seconds
    pub duration: f64,
    /// MIDI pitch number
    pub midi: u8,
    /// Velocity in `[0, 1]`
    pub velocity: f32,
}

impl Note {
    /// Create a note event
    pub fn new(onset: f64, duration: f64, midi: u8, velocity: f32) -> Self {
        Note {
            onset,
            duration,
            midi,
            velocity,
        }
    }

    /// End time on the source timeline
    pub fn end(&self) -> f64 {
        self.onset + self.duration
    }
}

/// One instrument track as delivered by the MIDI extraction step
#[derive(Debug, Clone, PartialEq)]
pub struct Track {
    /// Instrument display name
    pub name: String,
    /// General MIDI program number
    pub program: u8,
    /// Whether the track is a percussion channel
    pub percussion: bool,
    /// Note events
    pub notes: Vec<Note>,
}

impl Track {
    /// Create an empty track
    pub fn new(name: impl Into<String>, program: u8, percussion: bool) -> Self {
        Track {
            name: name.into(),
            program,
            percussion,
            notes: Vec::new(),
        }
    }

    /// Attach note events
    pub fn with_notes(mut self, notes: Vec<Note>) -> Self {
        self.notes = notes;
        self
    }
}

/// Format seconds as `mm:ss` for progress display
pub fn format_time(seconds: f64) -> String {
    let total = seconds.max(0.0) as u64;
    format!("{:02}:{:02}", total / 60, total % 60)
}
