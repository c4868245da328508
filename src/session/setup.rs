//! Session setup
//!
//! Builds a [`GameConfig`] from setup choices: validates the player list,
//! assigns palette colors, draws one deck per player uniformly at random
//! without replacement, and prefetches every drawn entry's localized name
//! so the game screen never waits on the first question.

use super::{GameConfig, GameMode, ImageMode, Player, PLAYER_COLORS};
use crate::catalog::{CachedCatalog, CatalogSource};
use crate::{QuizbeatError, Result};
use rand::SeedableRng;
use rand_pcg::Pcg64;
use std::collections::BTreeSet;

/// Maximum number of players per session
pub const MAX_PLAYERS: usize = 8;

/// Choices collected on the setup screen
#[derive(Debug, Clone)]
pub struct SetupOptions {
    names: Vec<String>,
    items_per_player: usize,
    game_mode: GameMode,
    image_mode: ImageMode,
    seed: Option<u64>,
}

impl SetupOptions {
    /// Start from player names and a deck length.
    ///
    /// Blank names get a `Player N` default, as on the setup screen.
    pub fn new(names: Vec<String>, items_per_player: usize) -> Self {
        SetupOptions {
            names,
            items_per_player,
            game_mode: GameMode::Qcm,
            image_mode: ImageMode::Real,
            seed: None,
        }
    }

    /// Set the answer mode (default: multiple choice)
    pub fn game_mode(mut self, mode: GameMode) -> Self {
        self.game_mode = mode;
        self
    }

    /// Set the image treatment (default: revealed)
    pub fn image_mode(mut self, mode: ImageMode) -> Self {
        self.image_mode = mode;
        self
    }

    /// Fix the deck-draw RNG seed (reproducible sessions, tests)
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

/// Build a full session config from setup choices.
///
/// The catalog must already be [loaded](CachedCatalog::load). Deck draws
/// are uniform without replacement within each player's deck; different
/// players may still draw the same entry, as in the original game.
pub fn build_config<S: CatalogSource>(
    opts: &SetupOptions,
    catalog: &mut CachedCatalog<S>,
) -> Result<GameConfig> {
    if opts.names.is_empty() || opts.names.len() > MAX_PLAYERS {
        return Err(QuizbeatError::Config(format!(
            "player count must be 1..={}, got {}",
            MAX_PLAYERS,
            opts.names.len()
        )));
    }
    if opts.items_per_player == 0 {
        return Err(QuizbeatError::Config(
            "items per player must be at least 1".to_string(),
        ));
    }

    let entries = catalog.entries();
    if entries.len() < opts.items_per_player {
        return Err(QuizbeatError::Config(format!(
            "catalog has {} entries, need {} per deck",
            entries.len(),
            opts.items_per_player
        )));
    }

    let players: Vec<Player> = opts
        .names
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let name = name.trim();
            let name = if name.is_empty() {
                format!("Player {}", i + 1)
            } else {
                name.to_string()
            };
            Player::new(name, PLAYER_COLORS[i])
        })
        .collect();

    let mut rng = match opts.seed {
        Some(seed) => Pcg64::seed_from_u64(seed),
        None => Pcg64::from_entropy(),
    };

    let decks: Vec<_> = players
        .iter()
        .map(|_| {
            rand::seq::index::sample(&mut rng, entries.len(), opts.items_per_player)
                .iter()
                .map(|i| entries[i].clone())
                .collect::<Vec<_>>()
        })
        .collect();

    // Warm the name cache for every drawn id before the config is saved
    let ids: BTreeSet<u32> = decks.iter().flatten().map(|e| e.id).collect();
    for id in ids {
        catalog.name_of(id)?;
    }

    Ok(GameConfig {
        players,
        decks,
        items_per_player: opts.items_per_player,
        game_mode: opts.game_mode,
        image_mode: opts.image_mode,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CatalogEntry;
    use crate::store::MemoryStore;
    use std::sync::Arc;

    struct StubSource(Vec<CatalogEntry>);

    impl CatalogSource for StubSource {
        fn list(&mut self, limit: usize) -> crate::Result<Vec<CatalogEntry>> {
            Ok(self.0.iter().take(limit).cloned().collect())
        }

        fn localized_name(
            &mut self,
            id: u32,
            _preferred: &str,
            _fallback: &str,
        ) -> crate::Result<String> {
            Ok(format!("Nom-{}", id))
        }
    }

    fn loaded_catalog(count: u32) -> CachedCatalog<StubSource> {
        let entries: Vec<_> = (1..=count)
            .map(|id| CatalogEntry::new(id, format!("mon-{}", id), format!("img/{}", id)))
            .collect();
        let mut catalog = CachedCatalog::new(
            StubSource(entries),
            Arc::new(MemoryStore::new()),
            "fr",
            "en",
        );
        catalog.load(count as usize).unwrap();
        catalog
    }

    #[test]
    fn test_decks_are_fixed_length_without_repetition() {
        let mut catalog = loaded_catalog(20);
        let opts = SetupOptions::new(vec!["Ada".into(), "Max".into()], 10).seed(7);
        let config = build_config(&opts, &mut catalog).unwrap();

        assert_eq!(config.decks.len(), 2);
        for deck in &config.decks {
            assert_eq!(deck.len(), 10);
            let unique: BTreeSet<u32> = deck.iter().map(|e| e.id).collect();
            assert_eq!(unique.len(), 10, "deck drew a duplicate entry");
        }
    }

    #[test]
    fn test_blank_names_and_palette_assignment() {
        let mut catalog = loaded_catalog(6);
        let opts = SetupOptions::new(vec!["".into(), "  ".into(), "Zoe".into()], 2).seed(1);
        let config = build_config(&opts, &mut catalog).unwrap();

        assert_eq!(config.players[0].name, "Player 1");
        assert_eq!(config.players[1].name, "Player 2");
        assert_eq!(config.players[2].name, "Zoe");
        assert_eq!(config.players[0].color, PLAYER_COLORS[0]);
        assert_eq!(config.players[2].color, PLAYER_COLORS[2]);
        assert!(config.players.iter().all(|p| p.score == 0.0));
    }

    #[test]
    fn test_player_count_bounds() {
        let mut catalog = loaded_catalog(6);
        let none = SetupOptions::new(vec![], 2);
        assert!(build_config(&none, &mut catalog).is_err());

        let nine = SetupOptions::new(vec![String::new(); 9], 2);
        assert!(build_config(&nine, &mut catalog).is_err());
    }

    #[test]
    fn test_catalog_too_small_for_deck() {
        let mut catalog = loaded_catalog(3);
        let opts = SetupOptions::new(vec!["Ada".into()], 5);
        assert!(matches!(
            build_config(&opts, &mut catalog),
            Err(QuizbeatError::Config(_))
        ));
    }

    #[test]
    fn test_seeded_builds_are_reproducible() {
        let opts = SetupOptions::new(vec!["Ada".into(), "Max".into()], 4).seed(42);
        let a = build_config(&opts, &mut loaded_catalog(12)).unwrap();
        let b = build_config(&opts, &mut loaded_catalog(12)).unwrap();
        assert_eq!(a.decks, b.decks);
    }
}
