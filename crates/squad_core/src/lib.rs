//! # squad_core - Fantasy Squad Composition Engine
//!
//! Rules engine for a fantasy-football squad screen: formation recognition,
//! field/bench swaps, slot assignment, transfer costs and one-shot boosts.
//!
//! ## Features
//! - 8-scheme formation catalog with bound-aware rejections
//! - Swap validation and swap option enumeration
//! - Edit sessions with all-or-nothing commits
//! - Cross-screen boost exclusion through one shared store
//! - JSON API for UI hosts

pub mod api;
pub mod boost;
pub mod config;
pub mod error;
pub mod lineup;
pub mod models;
pub mod tactics;
pub mod transfer;

// Re-export main API functions
pub use api::{
    detect_formation_json, swap_options_json, transfer_cost_json, validate_squad_json,
    SquadPersistence, SquadSnapshot, SquadSubmission,
};
pub use error::{Result, SquadError};

// Re-export squad model types
pub use models::{ClubId, Player, PlayerId, Position, Price, Role, SquadState, TourId};

// Re-export engine components
pub use boost::{Boost, BoostKind, BoostPanel, BoostScreen, PendingBoostStore, SharedBoostSlot};
pub use config::RulesConfig;
pub use lineup::{swap_options, validate_swap, SlotIndex, SlotKey, SwapOption};
pub use tactics::{detect_formation, Formation, PositionCounts};
pub use transfer::{EditSession, SquadBuilder, TransferCost, TransferLedger};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
