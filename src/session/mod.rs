//! Players, Decks & Session Configuration
//!
//! A game session is assembled once at setup: players with colors from a
//! fixed palette, one randomly drawn deck of catalog entries per player,
//! and the chosen modes. The whole aggregate is persisted as a single
//! record under one store key, read back once when the game screen starts,
//! and removed at "play again".

mod setup;

pub use setup::{build_config, SetupOptions};

use crate::catalog::CatalogEntry;
use crate::store::SessionStore;
use crate::{QuizbeatError, Result};
use serde::{Deserialize, Serialize};

/// Store key for the persisted session record
pub const SESSION_KEY: &str = "gameConfig";

/// Fixed palette assigned to players in input order
pub const PLAYER_COLORS: [&str; 8] = [
    "#E3350D", "#2A75BB", "#27ae60", "#9b59b6", "#e67e22", "#1abc9c", "#e91e63", "#ff9800",
];

/// Answer mode for the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameMode {
    /// Multiple choice: four options, one correct
    Qcm,
    /// Free text: typed answer, normalized comparison
    Libre,
}

/// Question image treatment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageMode {
    /// Image shown as-is from the first moment
    Real,
    /// Image obscured until the answer is processed
    Shadow,
}

/// One player in the session.
///
/// Created at setup, mutated only by the round engine's scoring step, never
/// removed during a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    /// Display name
    pub name: String,
    /// Visual tag from [`PLAYER_COLORS`]
    pub color: String,
    /// Cumulative score, kept at two-decimal precision
    pub score: f64,
    /// Correctly answered rounds this session (not persisted)
    #[serde(skip)]
    pub correct: u32,
}

impl Player {
    /// Create a player with a zero score
    pub fn new(name: impl Into<String>, color: impl Into<String>) -> Self {
        Player {
            name: name.into(),
            color: color.into(),
            score: 0.0,
            correct: 0,
        }
    }
}

/// Persisted session aggregate: players, decks and modes.
///
/// The serialized field names are the session record's wire contract
/// (`pokemonPerPlayer`, `gameMode`, `imageMode`), so a config written by
/// the web front end reads back unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    /// All players, in input order
    pub players: Vec<Player>,
    /// One deck per player, same order; fixed length, consumed by index
    pub decks: Vec<Vec<CatalogEntry>>,
    /// Deck length per player
    #[serde(rename = "pokemonPerPlayer")]
    pub items_per_player: usize,
    /// Answer mode
    #[serde(rename = "gameMode")]
    pub game_mode: GameMode,
    /// Image treatment
    #[serde(rename = "imageMode")]
    pub image_mode: ImageMode,
}

impl GameConfig {
    /// Total number of turns in the session
    pub fn total_turns(&self) -> usize {
        self.players.len() * self.items_per_player
    }

    /// Persist this config under [`SESSION_KEY`]
    pub fn save(&self, store: &dyn SessionStore) -> Result<()> {
        let raw = serde_json::to_string(self).map_err(|e| QuizbeatError::Store(e.to_string()))?;
        store.set(SESSION_KEY, &raw)
    }

    /// Load the persisted config.
    ///
    /// A missing record is [`QuizbeatError::NoSession`]: the game screen was
    /// reached without going through setup.
    pub fn load(store: &dyn SessionStore) -> Result<GameConfig> {
        let raw = store.get(SESSION_KEY).ok_or(QuizbeatError::NoSession)?;
        serde_json::from_str(&raw)
            .map_err(|e| QuizbeatError::Store(format!("corrupt session record: {}", e)))
    }

    /// Remove the persisted config ("play again")
    pub fn clear(store: &dyn SessionStore) {
        store.remove(SESSION_KEY);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn tiny_config() -> GameConfig {
        GameConfig {
            players: vec![
                Player::new("Ada", PLAYER_COLORS[0]),
                Player::new("Max", PLAYER_COLORS[1]),
            ],
            decks: vec![
                vec![CatalogEntry::new(1, "bulbasaur", "img/1")],
                vec![CatalogEntry::new(4, "charmander", "img/4")],
            ],
            items_per_player: 1,
            game_mode: GameMode::Qcm,
            image_mode: ImageMode::Real,
        }
    }

    #[test]
    fn test_total_turns() {
        let mut config = tiny_config();
        config.items_per_player = 10;
        assert_eq!(config.total_turns(), 20);
    }

    #[test]
    fn test_save_load_clear_lifecycle() {
        let store = MemoryStore::new();
        let config = tiny_config();
        config.save(&store).unwrap();

        let loaded = GameConfig::load(&store).unwrap();
        assert_eq!(loaded, config);

        GameConfig::clear(&store);
        assert!(matches!(
            GameConfig::load(&store),
            Err(QuizbeatError::NoSession)
        ));
    }

    #[test]
    fn test_wire_field_names() {
        let raw = serde_json::to_string(&tiny_config()).unwrap();
        assert!(raw.contains("\"pokemonPerPlayer\":1"));
        assert!(raw.contains("\"gameMode\":\"qcm\""));
        assert!(raw.contains("\"imageMode\":\"real\""));
        assert!(raw.contains("\"img\":"));
    }

    #[test]
    fn test_missing_session_is_no_session() {
        let store = MemoryStore::new();
        assert!(matches!(
            GameConfig::load(&store),
            Err(QuizbeatError::NoSession)
        ));
    }
}
