//! Shapes exchanged with the squad backend.
//!
//! The engine never persists anything itself. It reads a [`SquadSnapshot`],
//! and hands a validated [`SquadSubmission`] to whatever implements
//! [`SquadPersistence`].

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::boost::{BoostAvailability, BoostPanel, BoostScreen, BoostTransition, PendingBoostStore};
use crate::config::RulesConfig;
use crate::error::Result;
use crate::models::{Player, PlayerId, SquadState, TourId};
use crate::transfer::{EditSession, TransferCost};

/// Squad as loaded from the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SquadSnapshot {
    pub main: Vec<Player>,
    pub bench: Vec<Player>,
    #[serde(default)]
    pub captain_id: Option<PlayerId>,
    #[serde(default)]
    pub vice_captain_id: Option<PlayerId>,
    pub free_transfers: u32,
    #[serde(default)]
    pub boosts: Vec<BoostAvailability>,
    pub upcoming_tour: TourId,
}

impl SquadSnapshot {
    /// Normalized squad state (slots assigned, goalkeeper-first bench).
    pub fn squad(&self) -> SquadState {
        SquadState::new(
            self.main.clone(),
            self.bench.clone(),
            self.captain_id,
            self.vice_captain_id,
        )
    }

    pub fn open_session(&self, rules: RulesConfig) -> EditSession {
        EditSession::new(rules, self.squad(), self.upcoming_tour, self.free_transfers)
    }

    pub fn boost_panel(&self, screen: BoostScreen, store: Arc<dyn PendingBoostStore>) -> Result<BoostPanel> {
        BoostPanel::from_availability(screen, store, &self.boosts, self.upcoming_tour)
    }
}

/// Validated squad ready to be stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SquadSubmission {
    pub main_player_ids: Vec<PlayerId>,
    /// Goalkeeper first, then substitution order.
    pub bench_player_ids: Vec<PlayerId>,
    pub captain_id: Option<PlayerId>,
    pub vice_captain_id: Option<PlayerId>,
    pub boost: Option<BoostTransition>,
    pub transfer_cost: TransferCost,
    pub tour: TourId,
}

/// Backend the engine loads from and submits to.
pub trait SquadPersistence {
    type Error: std::error::Error;

    fn load(&self) -> std::result::Result<SquadSnapshot, Self::Error>;

    fn submit(&mut self, submission: &SquadSubmission) -> std::result::Result<(), Self::Error>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boost::{BoostKind, SharedBoostSlot};
    use crate::error::SquadError;
    use crate::models::squad::fixtures::squad_442;

    #[derive(Debug)]
    struct Offline;

    impl std::fmt::Display for Offline {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_str("backend offline")
        }
    }

    impl std::error::Error for Offline {}

    #[derive(Default)]
    struct MemoryBackend {
        snapshot: Option<SquadSnapshot>,
        submitted: Vec<SquadSubmission>,
        offline: bool,
    }

    impl SquadPersistence for MemoryBackend {
        type Error = Offline;

        fn load(&self) -> std::result::Result<SquadSnapshot, Offline> {
            self.snapshot.clone().ok_or(Offline)
        }

        fn submit(&mut self, submission: &SquadSubmission) -> std::result::Result<(), Offline> {
            if self.offline {
                return Err(Offline);
            }
            self.submitted.push(submission.clone());
            Ok(())
        }
    }

    fn snapshot() -> SquadSnapshot {
        let squad = squad_442();
        SquadSnapshot {
            main: squad.main,
            bench: squad.bench,
            captain_id: squad.captain_id,
            vice_captain_id: squad.vice_captain_id,
            free_transfers: 1,
            boosts: vec![BoostAvailability {
                kind: BoostKind::BenchBoost,
                available: true,
                last_used_tour: None,
                committed_for_upcoming: false,
            }],
            upcoming_tour: TourId(12),
        }
    }

    #[test]
    fn test_snapshot_json_defaults() {
        let json = serde_json::json!({
            "main": [], "bench": [], "free_transfers": 2, "upcoming_tour": 3
        });
        let snapshot: SquadSnapshot = serde_json::from_value(json).unwrap();
        assert!(snapshot.boosts.is_empty());
        assert_eq!(snapshot.captain_id, None);
    }

    #[test]
    fn test_save_submits_then_commits() {
        let mut backend = MemoryBackend { snapshot: Some(snapshot()), ..Default::default() };
        let loaded = backend.load().unwrap();
        let mut session = loaded.open_session(RulesConfig::default());
        let store = SharedBoostSlot::new();
        let mut panel = loaded.boost_panel(BoostScreen::Squad, store).unwrap();

        panel.queue(BoostKind::BenchBoost, TourId(12)).unwrap();
        session.swap(PlayerId(2), PlayerId(14)).unwrap();
        let submission = session.save(&mut backend, Some(&mut panel), false).unwrap();

        assert_eq!(backend.submitted, vec![submission.clone()]);
        assert_eq!(submission.tour, TourId(12));
        assert_eq!(submission.boost.map(|b| b.kind), Some(BoostKind::BenchBoost));
        assert_eq!(session.committed(), session.draft());
    }

    #[test]
    fn test_failed_submit_keeps_committed_state() {
        let mut backend = MemoryBackend { snapshot: Some(snapshot()), offline: true, ..Default::default() };
        let mut session = snapshot().open_session(RulesConfig::default());
        session.swap(PlayerId(2), PlayerId(14)).unwrap();

        let err = session.save(&mut backend, None, false).unwrap_err();
        assert_eq!(err, SquadError::Persistence("backend offline".to_string()));
        assert_ne!(session.committed(), session.draft());
        assert_eq!(session.committed(), &squad_442());
    }
}
