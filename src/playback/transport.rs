//! Group playback transport
//!
//! Owns transport state for one playing group: timeline normalization,
//! start/stop/seek, and polling-based progress. The audio engine behind
//! the transport exposes its position as a readable clock, so progress is
//! polled on a fixed interval rather than pushed.
//!
//! Starting a new playback unconditionally stops and fully cancels any
//! prior schedule first, and stopping cancels the progress ticker
//! synchronously, so no stale callback can fire for a superseded playback
//! session.

use super::{timbre_for, Role, Timbre, Track};
use crate::Result;

/// Progress polling interval in seconds
pub const PROGRESS_INTERVAL: f64 = 0.1;

/// Transport state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    /// Nothing scheduled or clock halted
    Stopped,
    /// Clock running, schedule installed
    Playing,
}

/// The audio engine's transport clock contract.
///
/// Implementations wrap the engine's shared timeline: a readable elapsed
/// position plus start/stop/seek. Engine failures surface as errors and
/// are tolerated (swallowed) at the stop/reset boundary.
pub trait TransportClock {
    /// Start or resume the clock
    fn start(&mut self) -> Result<()>;

    /// Halt the clock
    fn stop(&mut self) -> Result<()>;

    /// Reposition the clock to an absolute time in seconds
    fn seek(&mut self, seconds: f64) -> Result<()>;

    /// Current position in seconds
    fn elapsed(&self) -> f64;
}

/// A transport clock advanced explicitly by the caller.
///
/// Stands in for the audio engine's clock in tests and offline use.
#[derive(Debug, Clone, Copy, Default)]
pub struct ManualClock {
    running: bool,
    position: f64,
}

impl ManualClock {
    /// Create a halted clock at position zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance the clock by `dt` seconds if it is running
    pub fn advance(&mut self, dt: f64) {
        if self.running {
            self.position += dt;
        }
    }
}

impl TransportClock for ManualClock {
    fn start(&mut self) -> Result<()> {
        self.running = true;
        Ok(())
    }

    fn stop(&mut self) -> Result<()> {
        self.running = false;
        Ok(())
    }

    fn seek(&mut self, seconds: f64) -> Result<()> {
        self.position = seconds.max(0.0);
        Ok(())
    }

    fn elapsed(&self) -> f64 {
        self.position
    }
}

/// One note on the normalized (starts-at-zero) playback timeline
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScheduledNote {
    /// Onset in seconds from playback start
    pub onset: f64,
    /// Duration in seconds
    pub duration: f64,
    /// MIDI pitch
    pub midi: u8,
    /// Velocity in `[0, 1]`
    pub velocity: f32,
}

/// One track's scheduled voice: a timbre plus its normalized notes
#[derive(Debug, Clone, PartialEq)]
pub struct VoiceSchedule {
    /// Voice configuration for every note of this track
    pub timbre: Timbre,
    /// Normalized note events
    pub notes: Vec<ScheduledNote>,
}

/// A `(elapsed, duration)` progress report
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Progress {
    /// Seconds elapsed on the playback timeline
    pub elapsed: f64,
    /// Total playback duration in seconds
    pub duration: f64,
}

/// Cancellable repeating progress task.
///
/// Emits at most once per interval of clock time; restartable on seek.
#[derive(Debug, Clone, Copy)]
pub struct ProgressTicker {
    interval: f64,
    active: bool,
    last_emit: Option<f64>,
}

impl ProgressTicker {
    /// Create an inactive ticker with the given interval in seconds
    pub fn new(interval: f64) -> Self {
        ProgressTicker {
            interval,
            active: false,
            last_emit: None,
        }
    }

    /// Activate and forget any previous emission
    pub fn restart(&mut self) {
        self.active = true;
        self.last_emit = None;
    }

    /// Deactivate; no further emissions until restarted
    pub fn cancel(&mut self) {
        self.active = false;
        self.last_emit = None;
    }

    /// Whether a report is due at clock position `elapsed`
    pub fn poll(&mut self, elapsed: f64) -> bool {
        if !self.active {
            return false;
        }
        match self.last_emit {
            Some(last) if elapsed - last < self.interval => false,
            _ => {
                self.last_emit = Some(elapsed);
                true
            }
        }
    }
}

/// Transport controller for one track group
pub struct GroupPlayer<C: TransportClock> {
    clock: C,
    state: PlaybackState,
    schedule: Vec<VoiceSchedule>,
    duration: f64,
    ticker: ProgressTicker,
    group: Option<Role>,
}

impl<C: TransportClock> GroupPlayer<C> {
    /// Create a player over the given transport clock
    pub fn new(clock: C) -> Self {
        GroupPlayer {
            clock,
            state: PlaybackState::Stopped,
            schedule: Vec::new(),
            duration: 0.0,
            ticker: ProgressTicker::new(PROGRESS_INTERVAL),
            group: None,
        }
    }

    /// Start playing a group from a clean state.
    ///
    /// Any prior schedule is fully cancelled first. The timeline is
    /// normalized so the earliest onset plays at time zero. A group with
    /// no notes is a no-op and leaves the player stopped.
    pub fn start(&mut self, tracks: &[Track], role: Role) -> Result<()> {
        self.stop();

        let mut start_time = f64::INFINITY;
        let mut end_time = f64::NEG_INFINITY;
        for note in tracks.iter().flat_map(|t| t.notes.iter()) {
            start_time = start_time.min(note.onset);
            end_time = end_time.max(note.end());
        }
        if !start_time.is_finite() {
            return Ok(());
        }

        self.schedule = tracks
            .iter()
            .filter(|t| !t.notes.is_empty())
            .map(|track| VoiceSchedule {
                timbre: timbre_for(role, track.percussion),
                notes: track
                    .notes
                    .iter()
                    .map(|n| ScheduledNote {
                        onset: n.onset - start_time,
                        duration: n.duration,
                        midi: n.midi,
                        velocity: n.velocity,
                    })
                    .collect(),
            })
            .collect();
        self.duration = end_time - start_time;
        self.group = Some(role);

        self.clock.seek(0.0)?;
        self.clock.start()?;
        self.ticker.restart();
        self.state = PlaybackState::Playing;
        Ok(())
    }

    /// Stop playback, cancelling the schedule and the progress ticker
    /// synchronously. Engine failures here are not user-actionable and are
    /// swallowed.
    pub fn stop(&mut self) {
        self.ticker.cancel();
        let _ = self.clock.stop();
        self.schedule.clear();
        self.state = PlaybackState::Stopped;
    }

    /// Seek to a fraction of the group's duration.
    ///
    /// The fraction is clamped to `[0, 1]`; the progress ticker restarts
    /// from the new position. A no-op before any group has been started.
    pub fn seek(&mut self, fraction: f64) -> Result<()> {
        if self.duration <= 0.0 {
            return Ok(());
        }
        let target = fraction.clamp(0.0, 1.0) * self.duration;
        self.ticker.restart();
        self.clock.seek(target)?;
        self.clock.start()?;
        self.state = PlaybackState::Playing;
        Ok(())
    }

    /// Poll the transport for progress.
    ///
    /// Reports at most once per [`PROGRESS_INTERVAL`] of clock time and
    /// auto-stops (with a final report) when elapsed reaches the duration.
    pub fn poll(&mut self) -> Option<Progress> {
        if self.state != PlaybackState::Playing {
            return None;
        }
        let elapsed = self.clock.elapsed();
        if elapsed >= self.duration {
            self.stop();
            return Some(Progress {
                elapsed: self.duration,
                duration: self.duration,
            });
        }
        if self.ticker.poll(elapsed) {
            Some(Progress {
                elapsed,
                duration: self.duration,
            })
        } else {
            None
        }
    }

    /// Current transport state
    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// Total duration of the started group in seconds
    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// Current clock position in seconds
    pub fn elapsed(&self) -> f64 {
        self.clock.elapsed()
    }

    /// The role of the group being (or last) played
    pub fn group(&self) -> Option<Role> {
        self.group
    }

    /// The installed schedule (empty when stopped)
    pub fn schedule(&self) -> &[VoiceSchedule] {
        &self.schedule
    }

    /// Access the underlying clock
    pub fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::playback::Note;

    fn group() -> Vec<Track> {
        vec![
            Track::new("Cello", 42, false).with_notes(vec![
                Note::new(2.0, 1.0, 48, 0.9),
                Note::new(4.0, 118.0, 50, 0.7),
            ]),
            Track::new("Viola", 41, false).with_notes(vec![Note::new(3.0, 2.0, 55, 0.8)]),
        ]
    }

    #[test]
    fn test_timeline_normalizes_to_zero() {
        let mut player = GroupPlayer::new(ManualClock::new());
        player.start(&group(), Role::Strings).unwrap();

        assert_eq!(player.state(), PlaybackState::Playing);
        assert_eq!(player.duration(), 120.0);
        // Earliest onset (2.0) moved to zero
        let first = player.schedule()[0].notes[0];
        assert_eq!(first.onset, 0.0);
        assert_eq!(player.schedule()[1].notes[0].onset, 1.0);
    }

    #[test]
    fn test_empty_group_is_a_noop() {
        let mut player = GroupPlayer::new(ManualClock::new());
        player
            .start(&[Track::new("Silent", 0, false)], Role::KeysPiano)
            .unwrap();
        assert_eq!(player.state(), PlaybackState::Stopped);
        assert!(player.poll().is_none());
    }

    #[test]
    fn test_seek_to_fraction_and_clamp() {
        let mut player = GroupPlayer::new(ManualClock::new());
        player.start(&group(), Role::Strings).unwrap();

        player.seek(0.5).unwrap();
        assert_eq!(player.elapsed(), 60.0);

        player.seek(1.5).unwrap();
        assert_eq!(player.elapsed(), 120.0);

        player.seek(-0.25).unwrap();
        assert_eq!(player.elapsed(), 0.0);
    }

    #[test]
    fn test_progress_reports_and_auto_stop() {
        let mut player = GroupPlayer::new(ManualClock::new());
        player.start(&group(), Role::Strings).unwrap();

        // First poll reports immediately, then respects the interval
        let first = player.poll().unwrap();
        assert_eq!(first.elapsed, 0.0);
        assert_eq!(first.duration, 120.0);

        player.clock_mut().advance(0.05);
        assert!(player.poll().is_none());
        player.clock_mut().advance(0.05);
        assert!(player.poll().is_some());

        // Run past the end: final report, then stopped
        player.clock_mut().advance(130.0);
        let last = player.poll().unwrap();
        assert_eq!(last.elapsed, 120.0);
        assert_eq!(player.state(), PlaybackState::Stopped);
        assert!(player.poll().is_none());
    }

    #[test]
    fn test_restart_cancels_prior_schedule() {
        let mut player = GroupPlayer::new(ManualClock::new());
        player.start(&group(), Role::Strings).unwrap();
        player.clock_mut().advance(30.0);

        let bass =
            vec![Track::new("Bass", 33, false).with_notes(vec![Note::new(0.0, 4.0, 40, 1.0)])];
        player.start(&bass, Role::Bass).unwrap();

        assert_eq!(player.elapsed(), 0.0);
        assert_eq!(player.duration(), 4.0);
        assert_eq!(player.schedule().len(), 1);
        assert_eq!(player.group(), Some(Role::Bass));
    }

    #[test]
    fn test_stop_cancels_ticker_synchronously() {
        let mut player = GroupPlayer::new(ManualClock::new());
        player.start(&group(), Role::Strings).unwrap();
        player.stop();

        assert_eq!(player.state(), PlaybackState::Stopped);
        assert!(player.schedule().is_empty());
        player.clock_mut().advance(1.0);
        assert!(player.poll().is_none(), "stale tick after stop");
    }

    #[test]
    fn test_seek_resumes_reporting_after_stop() {
        let mut player = GroupPlayer::new(ManualClock::new());
        player.start(&group(), Role::Strings).unwrap();
        player.stop();

        player.seek(0.25).unwrap();
        assert_eq!(player.state(), PlaybackState::Playing);
        let report = player.poll().unwrap();
        assert_eq!(report.elapsed, 30.0);
    }
}
