//! Turn sequencing, answer processing and session completion

use super::scoring::award;
use super::{normalize, points_for, rank_players, Countdown, RoundPhase, Standing, TIME_BUDGET};
use crate::catalog::{CachedCatalog, CatalogEntry, CatalogSource};
use crate::session::{GameConfig, GameMode, Player};
use crate::{QuizbeatError, Result};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_pcg::Pcg64;

/// One presented answer option (multiple-choice mode)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChoiceOption {
    /// Catalog id behind this option
    pub id: u32,
    /// Localized display label
    pub label: String,
}

/// Result of one processed answer
#[derive(Debug, Clone, PartialEq)]
pub struct RoundOutcome {
    /// Player who held this turn
    pub player_index: usize,
    /// Whether the answer matched
    pub correct: bool,
    /// Whether the countdown forced completion
    pub timed_out: bool,
    /// Points awarded (zero unless correct)
    pub points: f64,
    /// The correct localized name, revealed in every outcome
    pub answer: String,
}

/// Read-only view of the current turn for a rendering consumer
#[derive(Debug, Clone)]
pub struct RoundSnapshot {
    /// Current phase
    pub phase: RoundPhase,
    /// Zero-based global turn counter
    pub global_turn: usize,
    /// Total turns in the session
    pub total_turns: usize,
    /// Player holding this turn
    pub player_index: usize,
    /// Zero-based round within the player's deck
    pub round_index: usize,
    /// The active catalog entry (id, canonical name, image)
    pub entry: CatalogEntry,
    /// Presented options; empty in free-text mode
    pub options: Vec<ChoiceOption>,
    /// Countdown ticks left
    pub time_remaining: u32,
    /// Countdown budget
    pub time_budget: u32,
}

/// Mutable per-question state, discarded when the answer is processed
struct ActiveRound {
    entry: CatalogEntry,
    localized: String,
    options: Vec<ChoiceOption>,
    countdown: Countdown,
    answered: bool,
}

/// The round engine: owns the session config, the catalog access layer and
/// the turn state machine.
///
/// All timing is explicit: the host loop calls [`tick`](Self::tick) once
/// per time unit and the answer inputs exactly when the player acts, so
/// exactly one round is ever awaiting an answer and no stale timer can
/// touch a superseded turn.
pub struct RoundEngine<S: CatalogSource> {
    config: GameConfig,
    catalog: CachedCatalog<S>,
    rng: Pcg64,
    global_turn: usize,
    time_budget: u32,
    phase: RoundPhase,
    active: Option<ActiveRound>,
    last_outcome: Option<RoundOutcome>,
}

impl<S: CatalogSource> RoundEngine<S> {
    /// Create an engine for a loaded session
    pub fn new(config: GameConfig, catalog: CachedCatalog<S>) -> Self {
        Self::with_seed(config, catalog, rand::random())
    }

    /// Create an engine with a fixed RNG seed (reproducible sessions, tests)
    pub fn with_seed(config: GameConfig, catalog: CachedCatalog<S>, seed: u64) -> Self {
        RoundEngine {
            config,
            catalog,
            rng: Pcg64::seed_from_u64(seed),
            global_turn: 0,
            time_budget: TIME_BUDGET,
            phase: RoundPhase::Loading,
            active: None,
            last_outcome: None,
        }
    }

    /// Override the per-round tick budget (default [`TIME_BUDGET`])
    pub fn with_time_budget(mut self, budget: u32) -> Self {
        self.time_budget = budget.max(1);
        self
    }

    /// Validate the session and load the first question
    pub fn start(&mut self) -> Result<()> {
        if self.active.is_some() || self.phase == RoundPhase::Finished {
            return Err(QuizbeatError::Config("session already started".into()));
        }
        if self.config.players.is_empty() {
            return Err(QuizbeatError::Config("session has no players".into()));
        }
        if self.config.decks.len() != self.config.players.len()
            || self
                .config
                .decks
                .iter()
                .any(|d| d.len() < self.config.items_per_player)
        {
            return Err(QuizbeatError::Config(
                "decks do not match players and items per player".into(),
            ));
        }
        self.load_round()
    }

    /// Advance the countdown by one tick.
    ///
    /// Returns the timeout outcome when this tick exhausts the budget: the
    /// round is force-completed as incorrect with the answer revealed.
    /// Outside `AwaitingAnswer` this is a no-op.
    pub fn tick(&mut self) -> Option<RoundOutcome> {
        if self.phase != RoundPhase::AwaitingAnswer {
            return None;
        }
        let expired = self.active.as_mut()?.countdown.tick();
        if expired {
            self.finish_round(false, true)
        } else {
            None
        }
    }

    /// Submit a multiple-choice answer by option id.
    ///
    /// Returns `None` if the round is not awaiting an answer (the answered
    /// guard); a round's answer is processed at most once.
    pub fn submit_choice(&mut self, id: u32) -> Option<RoundOutcome> {
        if self.phase != RoundPhase::AwaitingAnswer {
            return None;
        }
        let correct = {
            let active = self.active.as_ref()?;
            if active.answered {
                return None;
            }
            id == active.entry.id
        };
        self.finish_round(correct, false)
    }

    /// Submit a free-text answer.
    ///
    /// Blank input is ignored without consuming the turn. Comparison is
    /// case- and diacritic-insensitive against the localized name.
    pub fn submit_text(&mut self, input: &str) -> Option<RoundOutcome> {
        if self.phase != RoundPhase::AwaitingAnswer || input.trim().is_empty() {
            return None;
        }
        let correct = {
            let active = self.active.as_ref()?;
            if active.answered {
                return None;
            }
            normalize(input) == normalize(&active.localized)
        };
        self.finish_round(correct, false)
    }

    /// Move to the next turn after a processed answer.
    ///
    /// Increments the global turn counter exactly once and either loads the
    /// next question or finishes the session.
    pub fn advance(&mut self) -> Result<RoundPhase> {
        if self.phase != RoundPhase::Answered {
            return Err(QuizbeatError::Config(
                "no processed answer to advance past".into(),
            ));
        }
        self.global_turn += 1;
        self.active = None;
        if self.global_turn >= self.config.total_turns() {
            self.phase = RoundPhase::Finished;
            Ok(self.phase)
        } else {
            self.load_round()?;
            Ok(self.phase)
        }
    }

    /// Current phase
    pub fn phase(&self) -> RoundPhase {
        self.phase
    }

    /// Whether all turns are exhausted
    pub fn is_finished(&self) -> bool {
        self.phase == RoundPhase::Finished
    }

    /// Zero-based global turn counter
    pub fn global_turn(&self) -> usize {
        self.global_turn
    }

    /// Total turns in the session
    pub fn total_turns(&self) -> usize {
        self.config.total_turns()
    }

    /// Index of the player holding the current turn
    pub fn current_player_index(&self) -> usize {
        self.global_turn % self.config.players.len()
    }

    /// Zero-based round within the current player's deck
    pub fn current_round_index(&self) -> usize {
        self.global_turn / self.config.players.len()
    }

    /// All players in session order
    pub fn players(&self) -> &[Player] {
        &self.config.players
    }

    /// The session configuration
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Outcome of the most recently processed answer
    pub fn last_outcome(&self) -> Option<&RoundOutcome> {
        self.last_outcome.as_ref()
    }

    /// Read-only view of the current turn (None once finished)
    pub fn snapshot(&self) -> Option<RoundSnapshot> {
        let active = self.active.as_ref()?;
        Some(RoundSnapshot {
            phase: self.phase,
            global_turn: self.global_turn,
            total_turns: self.config.total_turns(),
            player_index: self.current_player_index(),
            round_index: self.current_round_index(),
            entry: active.entry.clone(),
            options: active.options.clone(),
            time_remaining: active.countdown.remaining(),
            time_budget: active.countdown.budget(),
        })
    }

    /// Final standings: stable descending sort by score
    pub fn standings(&self) -> Vec<Standing> {
        rank_players(&self.config.players)
    }

    fn load_round(&mut self) -> Result<()> {
        self.phase = RoundPhase::Loading;
        let player_index = self.current_player_index();
        let round_index = self.current_round_index();
        let entry = self.config.decks[player_index][round_index].clone();
        let localized = self.catalog.name_of(entry.id)?;
        let options = match self.config.game_mode {
            GameMode::Qcm => self.draw_options(&entry)?,
            GameMode::Libre => Vec::new(),
        };
        self.active = Some(ActiveRound {
            entry,
            localized,
            options,
            countdown: Countdown::new(self.time_budget),
            answered: false,
        });
        self.phase = RoundPhase::AwaitingAnswer;
        Ok(())
    }

    /// Draw three distinct distractors excluding the current entry, then
    /// Fisher-Yates shuffle the four options into presentation order.
    fn draw_options(&mut self, entry: &CatalogEntry) -> Result<Vec<ChoiceOption>> {
        let pool: Vec<u32> = self
            .catalog
            .entries()
            .iter()
            .map(|e| e.id)
            .filter(|&id| id != entry.id)
            .collect();
        if pool.len() < 3 {
            return Err(QuizbeatError::Config(format!(
                "multiple choice needs a catalog of at least 4, got {}",
                pool.len() + 1
            )));
        }

        let distractors: Vec<u32> = rand::seq::index::sample(&mut self.rng, pool.len(), 3)
            .iter()
            .map(|i| pool[i])
            .collect();

        let mut options = Vec::with_capacity(4);
        options.push(ChoiceOption {
            id: entry.id,
            label: self.catalog.name_of(entry.id)?,
        });
        for id in distractors {
            options.push(ChoiceOption {
                id,
                label: self.catalog.name_of(id)?,
            });
        }
        options.shuffle(&mut self.rng);
        Ok(options)
    }

    fn finish_round(&mut self, correct: bool, timed_out: bool) -> Option<RoundOutcome> {
        let active = self.active.as_mut()?;
        active.answered = true;
        let time_used = active.countdown.elapsed() as f64;
        let budget = active.countdown.budget() as f64;
        let answer = active.localized.clone();

        let player_index = self.global_turn % self.config.players.len();
        let points = points_for(correct, time_used, budget);
        let player = &mut self.config.players[player_index];
        award(player, points);
        if correct {
            player.correct += 1;
        }

        self.phase = RoundPhase::Answered;
        let outcome = RoundOutcome {
            player_index,
            correct,
            timed_out,
            points,
            answer,
        };
        self.last_outcome = Some(outcome.clone());
        Some(outcome)
    }
}
