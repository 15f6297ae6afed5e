use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::{SquadState, TourId};

/// Which screen surfaces a boost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoostScreen {
    Squad,
    Transfers,
}

/// Boost kind without kind-specific data. Used for availability records,
/// claims and messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoostKind {
    BenchBoost,
    TripleCaptain,
    DoubleCaptain,
    Wildcard,
    GoldenTour,
}

impl BoostKind {
    pub const ALL: [BoostKind; 5] = [
        BoostKind::BenchBoost,
        BoostKind::TripleCaptain,
        BoostKind::DoubleCaptain,
        BoostKind::Wildcard,
        BoostKind::GoldenTour,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            BoostKind::BenchBoost => "bench_boost",
            BoostKind::TripleCaptain => "triple_captain",
            BoostKind::DoubleCaptain => "double_captain",
            BoostKind::Wildcard => "wildcard",
            BoostKind::GoldenTour => "golden_tour",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.code() == code.trim())
    }

    pub fn screen(&self) -> BoostScreen {
        match self {
            BoostKind::BenchBoost | BoostKind::TripleCaptain | BoostKind::DoubleCaptain => {
                BoostScreen::Squad
            }
            BoostKind::Wildcard | BoostKind::GoldenTour => BoostScreen::Transfers,
        }
    }

    /// Full-unrestricted-transfer kinds cannot be undone once committed.
    pub fn is_permanent(&self) -> bool {
        matches!(self, BoostKind::Wildcard | BoostKind::GoldenTour)
    }

    pub fn effects(&self) -> BoostEffects {
        let base = BoostEffects::BASELINE;
        match self {
            BoostKind::BenchBoost => BoostEffects { bench_counts: true, ..base },
            BoostKind::TripleCaptain => BoostEffects { captain_multiplier: 3, ..base },
            BoostKind::DoubleCaptain => BoostEffects { vice_captain_multiplier: 2, ..base },
            BoostKind::Wildcard => BoostEffects { unlimited_transfers: true, ..base },
            BoostKind::GoldenTour => {
                BoostEffects { unlimited_transfers: true, restores_squad: true, ..base }
            }
        }
    }
}

impl fmt::Display for BoostKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Rule overrides armed by a boost. Final points are computed by the
/// scoring service; this only records which rule applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoostEffects {
    pub captain_multiplier: u8,
    pub vice_captain_multiplier: u8,
    pub bench_counts: bool,
    pub unlimited_transfers: bool,
    pub restores_squad: bool,
}

impl BoostEffects {
    pub const BASELINE: BoostEffects = BoostEffects {
        captain_multiplier: 2,
        vice_captain_multiplier: 1,
        bench_counts: false,
        unlimited_transfers: false,
        restores_squad: false,
    };
}

impl Default for BoostEffects {
    fn default() -> Self {
        Self::BASELINE
    }
}

/// Committed squad captured right before a golden tour is applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoldenSnapshot {
    tour: TourId,
    captured_at: DateTime<Utc>,
    squad: SquadState,
}

impl GoldenSnapshot {
    pub fn capture(tour: TourId, squad: &SquadState) -> Self {
        Self { tour, captured_at: Utc::now(), squad: squad.clone() }
    }

    pub fn tour(&self) -> TourId {
        self.tour
    }

    pub fn captured_at(&self) -> DateTime<Utc> {
        self.captured_at
    }

    pub fn squad(&self) -> &SquadState {
        &self.squad
    }

    pub fn into_squad(self) -> SquadState {
        self.squad
    }
}

/// A boost applied to a tour, with kind-specific data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Boost {
    BenchBoost,
    TripleCaptain,
    DoubleCaptain,
    Wildcard,
    /// `None` when the boost was committed in an earlier session and the
    /// restore point is held by the backend.
    GoldenTour { snapshot: Option<GoldenSnapshot> },
}

impl Boost {
    pub fn kind(&self) -> BoostKind {
        match self {
            Boost::BenchBoost => BoostKind::BenchBoost,
            Boost::TripleCaptain => BoostKind::TripleCaptain,
            Boost::DoubleCaptain => BoostKind::DoubleCaptain,
            Boost::Wildcard => BoostKind::Wildcard,
            Boost::GoldenTour { .. } => BoostKind::GoldenTour,
        }
    }

    /// Instantiate a boost of `kind`. Golden tours capture `committed`.
    pub fn arm(kind: BoostKind, tour: TourId, committed: Option<&SquadState>) -> Self {
        match kind {
            BoostKind::BenchBoost => Boost::BenchBoost,
            BoostKind::TripleCaptain => Boost::TripleCaptain,
            BoostKind::DoubleCaptain => Boost::DoubleCaptain,
            BoostKind::Wildcard => Boost::Wildcard,
            BoostKind::GoldenTour => Boost::GoldenTour {
                snapshot: committed.map(|squad| GoldenSnapshot::capture(tour, squad)),
            },
        }
    }

    pub fn effects(&self) -> BoostEffects {
        self.kind().effects()
    }
}
