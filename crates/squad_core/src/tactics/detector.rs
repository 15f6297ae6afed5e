// Formation detection: count by position, match against the catalog.

use super::formation::{Formation, PositionCounts};
use crate::models::{Player, Position};

pub fn count_positions<'a>(players: impl IntoIterator<Item = &'a Player>) -> PositionCounts {
    players.into_iter().map(|player| player.position).collect()
}

/// Formation of a lineup given as bare positions, or `None` if no catalog
/// entry matches (any lineup that is not exactly 11 players never matches).
pub fn detect_positions(positions: impl IntoIterator<Item = Position>) -> Option<Formation> {
    let counts: PositionCounts = positions.into_iter().collect();
    Formation::from_counts(&counts)
}

pub fn detect_formation(players: &[Player]) -> Option<Formation> {
    detect_positions(players.iter().map(|player| player.position))
}
