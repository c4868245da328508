//! Tick-driven countdown
//!
//! The per-round timer is advanced explicitly by the host loop, one tick
//! per time unit. Nothing fires on its own, so a superseded round can never
//! be mutated by a stale timer callback.

/// Countdown over a fixed budget of ticks
#[derive(Debug, Clone, Copy)]
pub struct Countdown {
    budget: u32,
    remaining: u32,
}

impl Countdown {
    /// Create a countdown with `budget` ticks remaining
    pub fn new(budget: u32) -> Self {
        Countdown {
            budget,
            remaining: budget,
        }
    }

    /// Advance by one tick.
    ///
    /// Returns true exactly once, on the tick that exhausts the budget;
    /// further ticks are no-ops.
    pub fn tick(&mut self) -> bool {
        if self.remaining == 0 {
            return false;
        }
        self.remaining -= 1;
        self.remaining == 0
    }

    /// Ticks left before expiry
    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    /// Ticks consumed so far
    pub fn elapsed(&self) -> u32 {
        self.budget - self.remaining
    }

    /// Total tick budget
    pub fn budget(&self) -> u32 {
        self.budget
    }

    /// Whether the budget is exhausted
    pub fn is_expired(&self) -> bool {
        self.remaining == 0
    }

    /// Restore the full budget
    pub fn reset(&mut self) {
        self.remaining = self.budget;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expires_exactly_once() {
        let mut countdown = Countdown::new(3);
        assert!(!countdown.tick());
        assert!(!countdown.tick());
        assert!(countdown.tick());
        assert!(countdown.is_expired());
        // Exhausted countdown stays silent
        assert!(!countdown.tick());
        assert_eq!(countdown.elapsed(), 3);
    }

    #[test]
    fn test_elapsed_tracks_ticks() {
        let mut countdown = Countdown::new(10);
        assert_eq!(countdown.elapsed(), 0);
        countdown.tick();
        countdown.tick();
        assert_eq!(countdown.elapsed(), 2);
        assert_eq!(countdown.remaining(), 8);

        countdown.reset();
        assert_eq!(countdown.remaining(), 10);
    }
}
