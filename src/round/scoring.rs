//! Answer scoring
//!
//! A correct answer is worth up to 100 points, scaled linearly by how much
//! of the time budget was left. Incorrect and timed-out answers award
//! zero. Both the awarded points and the running total are kept at
//! two-decimal precision so scores do not accumulate float drift over a
//! long session.

use crate::session::Player;

/// Round a value to two decimal places
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Points for one answer.
///
/// `time_used` is clamped to `budget`; the result is
/// `max(0, (budget - time_used) / budget * 100)` rounded to two decimals,
/// or zero for an incorrect answer.
pub fn points_for(correct: bool, time_used: f64, budget: f64) -> f64 {
    if !correct {
        return 0.0;
    }
    let used = time_used.clamp(0.0, budget);
    round2(((budget - used) / budget * 100.0).max(0.0))
}

/// Add `points` to the player's total and re-round the total
pub(crate) fn award(player: &mut Player, points: f64) {
    player.score = round2(player.score + points);
}
