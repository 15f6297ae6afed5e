use thiserror::Error;

use crate::boost::BoostKind;
use crate::models::{ClubId, PlayerId, Position, Price, Role, TourId};
use crate::tactics::{bound_violation, BoundKind, Formation, PositionCounts};

/// Every rejection the engine can produce. All of them leave the caller's
/// state untouched.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SquadError {
    #[error("lineup {counts} would break all valid schemes (legal: {legal})")]
    Formation { counts: PositionCounts, legal: String },

    #[error("goalkeeper may only swap with goalkeeper")]
    GoalkeeperExclusivity,

    #[error("{position} {bound} is {limit}, lineup would have {actual}")]
    PositionCount { position: Position, bound: BoundKind, limit: u8, actual: u8 },

    #[error("price {price} exceeds remaining budget {remaining}")]
    Budget { price: Price, remaining: Price },

    #[error("squad costs {spent}, over the budget pool of {pool}")]
    OverBudget { spent: Price, pool: Price },

    #[error("club {club} already has the maximum of {limit} players")]
    ClubCap { club: ClubId, limit: u8 },

    #[error("only one boost per tour: {active} already holds {tour}")]
    BoostConflict { active: BoostKind, tour: TourId },

    #[error("player {id} could not be located in the {role} lineup")]
    IdentityLookup { id: PlayerId, role: Role },

    #[error("{role} lineup must have {expected} players, found {found}")]
    SquadSize { role: Role, expected: usize, found: usize },

    #[error("{role} lineup must have exactly one goalkeeper, found {found}")]
    GoalkeeperCount { role: Role, found: usize },

    #[error("bench goalkeeper must occupy bench slot 0")]
    BenchOrder,

    #[error("slot {slot} of {position} is used twice in the {role} lineup")]
    DuplicateSlot { role: Role, position: Position, slot: u8 },

    #[error("player {0} appears more than once in the squad")]
    DuplicatePlayer(PlayerId),

    #[error("player {0} is not in the squad")]
    UnknownPlayer(PlayerId),

    #[error("captaincy: {0}")]
    Captaincy(String),

    #[error("boost {0} is not available")]
    BoostUnavailable(BoostKind),

    #[error("boost {0} cannot be cancelled or removed")]
    BoostIrreversible(BoostKind),

    #[error("boost {0} must be explicitly confirmed before it is committed")]
    ConfirmationRequired(BoostKind),

    #[error("boost {kind} cannot be {action} while {state}")]
    BoostTransition { kind: BoostKind, action: &'static str, state: &'static str },

    #[error("config error: {0}")]
    Config(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("persistence error: {0}")]
    Persistence(String),
}

impl SquadError {
    /// Rejection for a lineup that matches no formation. Names the violated
    /// bound when there is one, otherwise lists the legal schemes.
    pub fn for_counts(counts: PositionCounts) -> Self {
        match bound_violation(&counts) {
            Some((position, bound, limit)) => SquadError::PositionCount {
                position,
                bound,
                limit,
                actual: counts.get(position),
            },
            None => SquadError::formation(counts),
        }
    }

    pub fn formation(counts: PositionCounts) -> Self {
        SquadError::Formation { counts, legal: Formation::legal_codes() }
    }

    /// Stable machine-readable code for JSON responses.
    pub fn code(&self) -> &'static str {
        match self {
            SquadError::Formation { .. } => "FORMATION",
            SquadError::GoalkeeperExclusivity => "GOALKEEPER_EXCLUSIVITY",
            SquadError::PositionCount { .. } => "POSITION_COUNT",
            SquadError::Budget { .. } => "BUDGET",
            SquadError::OverBudget { .. } => "OVER_BUDGET",
            SquadError::ClubCap { .. } => "CLUB_CAP",
            SquadError::BoostConflict { .. } => "BOOST_CONFLICT",
            SquadError::IdentityLookup { .. } => "IDENTITY_LOOKUP",
            SquadError::SquadSize { .. } => "SQUAD_SIZE",
            SquadError::GoalkeeperCount { .. } => "GOALKEEPER_COUNT",
            SquadError::BenchOrder => "BENCH_ORDER",
            SquadError::DuplicateSlot { .. } => "DUPLICATE_SLOT",
            SquadError::DuplicatePlayer(_) => "DUPLICATE_PLAYER",
            SquadError::UnknownPlayer(_) => "UNKNOWN_PLAYER",
            SquadError::Captaincy(_) => "CAPTAINCY",
            SquadError::BoostUnavailable(_) => "BOOST_UNAVAILABLE",
            SquadError::BoostIrreversible(_) => "BOOST_IRREVERSIBLE",
            SquadError::ConfirmationRequired(_) => "CONFIRMATION_REQUIRED",
            SquadError::BoostTransition { .. } => "BOOST_TRANSITION",
            SquadError::Config(_) => "CONFIG",
            SquadError::Serialization(_) => "SERIALIZATION",
            SquadError::Persistence(_) => "PERSISTENCE",
        }
    }

    /// User-facing rejections are recoverable; the rest point at a bug or a
    /// broken collaborator.
    pub fn is_recoverable(&self) -> bool {
        !matches!(
            self,
            SquadError::IdentityLookup { .. }
                | SquadError::Config(_)
                | SquadError::Serialization(_)
                | SquadError::Persistence(_)
        )
    }
}

impl From<serde_json::Error> for SquadError {
    fn from(err: serde_json::Error) -> Self {
        SquadError::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for SquadError {
    fn from(err: serde_yaml::Error) -> Self {
        SquadError::Config(err.to_string())
    }
}

impl From<std::io::Error> for SquadError {
    fn from(err: std::io::Error) -> Self {
        SquadError::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, SquadError>;
