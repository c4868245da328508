//! Quizbeat: creature-guessing quiz engine and group playback
//!
//! Two independent subsystems behind one crate, mirroring the two sibling
//! front ends they were built for:
//!
//! - A turn-based trivia game played over a creature catalog: each player
//!   gets a fixed deck of entries, answers one question per turn against a
//!   countdown, and earns speed-scaled points for correct answers.
//! - A multi-track music player that classifies instrument tracks into
//!   coarse roles, groups them, and plays a group with per-role synthesized
//!   timbres on a shared transport with polling progress and seeking.
//!
//! # Crate feature flags
//! - `quiz` (default): catalog access, session store, setup, round engine
//!   (`catalog`, `store`, `session`, `round`)
//! - `playback` (default): role grouping, timbres, transport, offline
//!   rendering (`playback`)
//!
//! # Quick start
//! ## Run a quiz session
//! ```no_run
//! use quizbeat::catalog::{CachedCatalog, CsvCatalog};
//! use quizbeat::round::RoundEngine;
//! use quizbeat::session::{GameConfig, GameMode, SetupOptions};
//! use quizbeat::store::MemoryStore;
//! use std::sync::Arc;
//!
//! let store = Arc::new(MemoryStore::new());
//! let source = CsvCatalog::open("catalog.csv").unwrap();
//! let mut catalog = CachedCatalog::new(source, store.clone(), "fr", "en");
//! catalog.load(1025).unwrap();
//!
//! let opts = SetupOptions::new(vec!["Ada".into(), "Max".into()], 10)
//!     .game_mode(GameMode::Qcm);
//! let config = quizbeat::session::build_config(&opts, &mut catalog).unwrap();
//! config.save(store.as_ref()).unwrap();
//!
//! let loaded = GameConfig::load(store.as_ref()).unwrap();
//! let mut engine = RoundEngine::new(loaded, catalog);
//! engine.start().unwrap();
//! ```
//!
//! ## Play a track group
//! ```
//! use quizbeat::playback::{classify_role, GroupPlayer, ManualClock, Note, Track};
//!
//! let track = Track::new("Fingered Bass", 33, false)
//!     .with_notes(vec![Note::new(0.0, 0.5, 45, 0.9)]);
//! let role = classify_role(33, false);
//! let mut player = GroupPlayer::new(ManualClock::new());
//! player.start(&[track], role).unwrap();
//! ```

#![warn(missing_docs)]

// Domain modules (feature-gated for modular use)
#[cfg(feature = "quiz")]
pub mod catalog; // Catalog Data Access & Caching
#[cfg(feature = "playback")]
pub mod playback; // Role Grouping & Transport
#[cfg(feature = "quiz")]
pub mod round; // Round Engine (turn state machine)
#[cfg(feature = "quiz")]
pub mod session; // Players, Decks & Setup
#[cfg(feature = "quiz")]
pub mod store; // Session Key-Value Store

/// Error types for quiz and playback operations
#[derive(thiserror::Error, Debug)]
pub enum QuizbeatError {
    /// No persisted game session was found at load time.
    ///
    /// A recoverable user-flow condition (redirect to setup), not a crash.
    #[error("no stored game session")]
    NoSession,

    /// Catalog list or localized-name lookup failed
    #[error("catalog error: {0}")]
    Catalog(String),

    /// Session store read or write failed
    #[error("session store error: {0}")]
    Store(String),

    /// Catalog file could not be parsed
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// IO error from filesystem
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Audio rendering or export error
    #[error("audio error: {0}")]
    Audio(String),

    /// Invalid setup or game configuration
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl From<String> for QuizbeatError {
    /// Converts a String into `QuizbeatError::Other`.
    ///
    /// Convenience for generic string errors; prefer the specific variant
    /// constructors (`Catalog`, `Store`, `Config`, ...) where the error type
    /// is known.
    fn from(msg: String) -> Self {
        QuizbeatError::Other(msg)
    }
}

impl From<&str> for QuizbeatError {
    /// Converts a string slice into `QuizbeatError::Other`.
    fn from(msg: &str) -> Self {
        QuizbeatError::Other(msg.to_string())
    }
}

/// Result type for quiz and playback operations
pub type Result<T> = std::result::Result<T, QuizbeatError>;

// Public API exports
#[cfg(feature = "quiz")]
pub use catalog::{CachedCatalog, CatalogEntry, CatalogSource, CsvCatalog};
#[cfg(feature = "playback")]
pub use playback::{
    classify_role, group_tracks_by_role, timbre_for, GroupPlayer, ManualClock, Note, PlaybackState,
    Role, Track, TransportClock,
};
#[cfg(feature = "quiz")]
pub use round::{RoundEngine, RoundOutcome, RoundPhase, RoundSnapshot, Standing};
#[cfg(feature = "quiz")]
pub use session::{build_config, GameConfig, GameMode, ImageMode, Player, SetupOptions};
#[cfg(feature = "quiz")]
pub use store::{FileStore, MemoryStore, SessionStore};
