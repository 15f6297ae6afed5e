// crates/squad_core/src/tactics/formation.rs
// Formation catalog: the 8 playable shapes, the 15-player pool layout and
// the column geometry used to lay rows out on the pitch.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::Position;

/// Player count per position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct PositionCounts {
    pub goalkeepers: u8,
    pub defenders: u8,
    pub midfielders: u8,
    pub forwards: u8,
}

impl PositionCounts {
    pub const fn new(goalkeepers: u8, defenders: u8, midfielders: u8, forwards: u8) -> Self {
        Self { goalkeepers, defenders, midfielders, forwards }
    }

    pub fn get(&self, position: Position) -> u8 {
        match position {
            Position::Goalkeeper => self.goalkeepers,
            Position::Defender => self.defenders,
            Position::Midfielder => self.midfielders,
            Position::Forward => self.forwards,
        }
    }

    fn slot_mut(&mut self, position: Position) -> &mut u8 {
        match position {
            Position::Goalkeeper => &mut self.goalkeepers,
            Position::Defender => &mut self.defenders,
            Position::Midfielder => &mut self.midfielders,
            Position::Forward => &mut self.forwards,
        }
    }

    pub fn increment(&mut self, position: Position) {
        let slot = self.slot_mut(position);
        *slot = slot.saturating_add(1);
    }

    pub fn decrement(&mut self, position: Position) {
        let slot = self.slot_mut(position);
        *slot = slot.saturating_sub(1);
    }

    pub fn total(&self) -> usize {
        usize::from(self.goalkeepers)
            + usize::from(self.defenders)
            + usize::from(self.midfielders)
            + usize::from(self.forwards)
    }

    /// Row sizes from the goal line forward (GK, DEF, MID, FWD).
    pub fn rows(&self) -> [u8; 4] {
        [self.goalkeepers, self.defenders, self.midfielders, self.forwards]
    }
}

impl FromIterator<Position> for PositionCounts {
    fn from_iter<I: IntoIterator<Item = Position>>(iter: I) -> Self {
        let mut counts = PositionCounts::default();
        for position in iter {
            counts.increment(position);
        }
        counts
    }
}

impl fmt::Display for PositionCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "GK:{} DEF:{} MID:{} FWD:{}",
            self.goalkeepers, self.defenders, self.midfielders, self.forwards
        )
    }
}

/// Squad-building layout: 2 GK, 5 DEF, 5 MID, 3 FWD. Not a playable formation.
pub const POOL_LAYOUT: PositionCounts = PositionCounts::new(2, 5, 5, 3);

/// Number of fielded players in every formation.
pub const LINEUP_SIZE: usize = 11;

/// Which side of a bound was crossed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoundKind {
    Minimum,
    Maximum,
}

impl fmt::Display for BoundKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundKind::Minimum => f.write_str("minimum"),
            BoundKind::Maximum => f.write_str("maximum"),
        }
    }
}

/// Inclusive per-position limits of a legal main lineup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionBounds {
    pub min: u8,
    pub max: u8,
}

impl PositionBounds {
    pub fn for_lineup(position: Position) -> Self {
        match position {
            Position::Goalkeeper => Self { min: 1, max: 1 },
            Position::Defender => Self { min: 3, max: 5 },
            Position::Midfielder => Self { min: 2, max: 5 },
            Position::Forward => Self { min: 1, max: 3 },
        }
    }
}

/// First position whose lineup bound `counts` violates, in canonical order.
pub fn bound_violation(counts: &PositionCounts) -> Option<(Position, BoundKind, u8)> {
    Position::ALL.into_iter().find_map(|position| {
        let bounds = PositionBounds::for_lineup(position);
        let actual = counts.get(position);
        if actual < bounds.min {
            Some((position, BoundKind::Minimum, bounds.min))
        } else if actual > bounds.max {
            Some((position, BoundKind::Maximum, bounds.max))
        } else {
            None
        }
    })
}

/// The 8 legal on-field formations (always exactly one goalkeeper).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Formation {
    #[serde(rename = "3-5-2")]
    F352,
    #[serde(rename = "3-4-3")]
    F343,
    #[serde(rename = "4-5-1")]
    F451,
    #[serde(rename = "4-4-2")]
    F442,
    #[serde(rename = "4-3-3")]
    F433,
    #[serde(rename = "5-4-1")]
    F541,
    #[serde(rename = "5-3-2")]
    F532,
    #[serde(rename = "5-2-3")]
    F523,
}

impl Formation {
    pub fn all() -> [Formation; 8] {
        [
            Formation::F352,
            Formation::F343,
            Formation::F451,
            Formation::F442,
            Formation::F433,
            Formation::F541,
            Formation::F532,
            Formation::F523,
        ]
    }

    /// (defenders, midfielders, forwards)
    pub fn get_positions(&self) -> (u8, u8, u8) {
        match self {
            Formation::F352 => (3, 5, 2),
            Formation::F343 => (3, 4, 3),
            Formation::F451 => (4, 5, 1),
            Formation::F442 => (4, 4, 2),
            Formation::F433 => (4, 3, 3),
            Formation::F541 => (5, 4, 1),
            Formation::F532 => (5, 3, 2),
            Formation::F523 => (5, 2, 3),
        }
    }

    pub fn counts(&self) -> PositionCounts {
        let (defenders, midfielders, forwards) = self.get_positions();
        PositionCounts::new(1, defenders, midfielders, forwards)
    }

    pub fn code(&self) -> &'static str {
        match self {
            Formation::F352 => "3-5-2",
            Formation::F343 => "3-4-3",
            Formation::F451 => "4-5-1",
            Formation::F442 => "4-4-2",
            Formation::F433 => "4-3-3",
            Formation::F541 => "5-4-1",
            Formation::F532 => "5-3-2",
            Formation::F523 => "5-2-3",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::all().into_iter().find(|formation| formation.code() == code.trim())
    }

    /// Linear scan of the catalog for an exact count match.
    pub fn from_counts(counts: &PositionCounts) -> Option<Self> {
        Self::all().into_iter().find(|formation| formation.counts() == *counts)
    }

    /// Row sizes from the goal line forward.
    pub fn rows(&self) -> [u8; 4] {
        self.counts().rows()
    }

    /// "3-5-2, 3-4-3, ..." for rejection messages.
    pub fn legal_codes() -> String {
        Self::all().iter().map(Formation::code).collect::<Vec<_>>().join(", ")
    }
}

impl Default for Formation {
    fn default() -> Self {
        Formation::F442
    }
}

impl fmt::Display for Formation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Normalized horizontal positions (0.0 = left touchline, 1.0 = right) of a
/// row holding `players` players. Rows wider than five never occur.
pub fn row_columns(players: usize) -> &'static [f32] {
    match players {
        1 => &[0.5],
        2 => &[0.35, 0.65],
        3 => &[0.2, 0.5, 0.8],
        4 => &[0.125, 0.375, 0.625, 0.875],
        5 => &[0.1, 0.3, 0.5, 0.7, 0.9],
        _ => &[],
    }
}
