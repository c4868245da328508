//! Round Engine (turn state machine)
//!
//! The core of the trivia game: sequences turns across players, presents
//! one question per turn, scores answers by correctness and speed, and
//! determines session completion and final ranking.
//!
//! Per turn the engine moves through
//! `Loading → AwaitingAnswer → Answered → (Advancing | Finished)`. It is a
//! pure state-transition core with explicit inputs (`submit_choice`,
//! `submit_text`, `tick`, `advance`) and a read-only snapshot output;
//! rendering is a separate consumer.

mod countdown;
mod engine;
mod ranking;
mod scoring;
mod text;

pub use countdown::Countdown;
pub use engine::{ChoiceOption, RoundEngine, RoundOutcome, RoundSnapshot};
pub use ranking::{rank_players, Standing};
pub use scoring::{points_for, round2};
pub use text::normalize;

/// Per-round time budget in countdown ticks
pub const TIME_BUDGET: u32 = 10;

/// Phase of the current turn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundPhase {
    /// Resolving the active entry's localized name (and distractors)
    Loading,
    /// Countdown running, waiting for an answer or a timeout
    AwaitingAnswer,
    /// Answer processed, outcome available, waiting to advance
    Answered,
    /// All turns exhausted; standings are final
    Finished,
}
