//! Final standings
//!
//! Players are ranked by cumulative score, descending. The sort is stable,
//! so ties keep the original input order. The top three standings feed the
//! podium display; with fewer players the podium simply shrinks.

use crate::session::Player;
use std::cmp::Ordering;

/// One row of the final standings
#[derive(Debug, Clone, PartialEq)]
pub struct Standing {
    /// 1-based place
    pub place: usize,
    /// Index of the player in the original session order
    pub player_index: usize,
    /// Snapshot of the player at session end
    pub player: Player,
}

/// Rank players descending by score; ties keep input order
pub fn rank_players(players: &[Player]) -> Vec<Standing> {
    let mut indexed: Vec<(usize, &Player)> = players.iter().enumerate().collect();
    // Scores are finite and non-negative, so partial_cmp cannot fail here
    indexed.sort_by(|(_, a), (_, b)| {
        b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal)
    });

    indexed
        .into_iter()
        .enumerate()
        .map(|(i, (player_index, player))| Standing {
            place: i + 1,
            player_index,
            player: player.clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player(name: &str, score: f64) -> Player {
        let mut p = Player::new(name, "#2A75BB");
        p.score = score;
        p
    }

    #[test]
    fn test_descending_with_stable_ties() {
        let players = vec![
            player("A", 10.0),
            player("B", 30.0),
            player("C", 30.0),
            player("D", 5.0),
        ];
        let ranked = rank_players(&players);
        let names: Vec<&str> = ranked.iter().map(|s| s.player.name.as_str()).collect();
        // B before C: equal scores keep original order
        assert_eq!(names, ["B", "C", "A", "D"]);
        assert_eq!(ranked[0].place, 1);
        assert_eq!(ranked[1].player_index, 2);
    }

    #[test]
    fn test_single_player_podium() {
        let ranked = rank_players(&[player("Solo", 12.5)]);
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].place, 1);
    }
}
