//! Per-screen boost state machine.
//!
//! ```text
//! Available -> Pending(tour) -> Committed(tour) -> Used
//!      ^            |                 |
//!      +-- cancel --+                 |
//!      +------- remove (cancellable kinds only)
//! ```
//!
//! Each screen owns a `BoostPanel` for its own kinds. The panels share one
//! [`PendingBoostStore`], which is what keeps the squad at one boost per tour.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info};

use super::kind::{Boost, BoostEffects, BoostKind, BoostScreen, GoldenSnapshot};
use super::store::{BoostClaim, PendingBoostStore};
use crate::error::{Result, SquadError};
use crate::models::{SquadState, TourId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum BoostStatus {
    Available,
    Pending { tour: TourId },
    Committed { tour: TourId, boost: Boost },
    Used { tour: Option<TourId> },
}

impl BoostStatus {
    fn label(&self) -> &'static str {
        match self {
            BoostStatus::Available => "available",
            BoostStatus::Pending { .. } => "pending",
            BoostStatus::Committed { .. } => "committed",
            BoostStatus::Used { .. } => "used",
        }
    }
}

/// Availability record for one boost kind, as loaded from the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoostAvailability {
    pub kind: BoostKind,
    pub available: bool,
    #[serde(default)]
    pub last_used_tour: Option<TourId>,
    #[serde(default)]
    pub committed_for_upcoming: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoostAction {
    Apply,
    Remove,
}

/// Boost change to send along with a squad submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoostTransition {
    pub kind: BoostKind,
    pub tour: TourId,
    pub action: BoostAction,
}

#[derive(Debug)]
pub struct BoostPanel {
    screen: BoostScreen,
    store: Arc<dyn PendingBoostStore>,
    statuses: BTreeMap<BoostKind, BoostStatus>,
}

impl BoostPanel {
    /// Panel with every kind of `screen` available.
    pub fn new(screen: BoostScreen, store: Arc<dyn PendingBoostStore>) -> Self {
        let statuses = BoostKind::ALL
            .into_iter()
            .filter(|kind| kind.screen() == screen)
            .map(|kind| (kind, BoostStatus::Available))
            .collect();
        Self { screen, store, statuses }
    }

    /// Panel seeded from backend records. A boost already committed for the
    /// upcoming tour claims the shared slot.
    pub fn from_availability(
        screen: BoostScreen,
        store: Arc<dyn PendingBoostStore>,
        records: &[BoostAvailability],
        upcoming: TourId,
    ) -> Result<Self> {
        let mut panel = Self::new(screen, store);
        for record in records.iter().filter(|record| record.kind.screen() == screen) {
            let status = if record.committed_for_upcoming {
                panel.store.try_acquire(BoostClaim { kind: record.kind, tour: upcoming })?;
                BoostStatus::Committed { tour: upcoming, boost: Boost::arm(record.kind, upcoming, None) }
            } else if record.available {
                BoostStatus::Available
            } else {
                BoostStatus::Used { tour: record.last_used_tour }
            };
            panel.statuses.insert(record.kind, status);
        }
        Ok(panel)
    }

    pub fn screen(&self) -> BoostScreen {
        self.screen
    }

    pub fn status(&self, kind: BoostKind) -> Option<&BoostStatus> {
        self.statuses.get(&kind)
    }

    pub fn statuses(&self) -> impl Iterator<Item = (BoostKind, &BoostStatus)> {
        self.statuses.iter().map(|(kind, status)| (*kind, status))
    }

    fn current(&self, kind: BoostKind) -> Result<&BoostStatus> {
        self.statuses.get(&kind).ok_or(SquadError::BoostUnavailable(kind))
    }

    fn transition_error(kind: BoostKind, action: &'static str, status: &BoostStatus) -> SquadError {
        SquadError::BoostTransition { kind, action, state: status.label() }
    }

    /// Queue `kind` for `tour`. Fails if any boost (on either screen) already
    /// holds the slot.
    pub fn queue(&mut self, kind: BoostKind, tour: TourId) -> Result<()> {
        match self.current(kind)? {
            BoostStatus::Available => {}
            BoostStatus::Used { .. } => return Err(SquadError::BoostUnavailable(kind)),
            other => return Err(Self::transition_error(kind, "queued", other)),
        }
        self.store.try_acquire(BoostClaim { kind, tour })?;
        self.statuses.insert(kind, BoostStatus::Pending { tour });
        debug!(%kind, %tour, screen = ?self.screen, "boost queued");
        Ok(())
    }

    /// Drop a pending cancellable boost.
    pub fn cancel(&mut self, kind: BoostKind) -> Result<()> {
        match self.current(kind)? {
            BoostStatus::Pending { .. } if kind.is_permanent() => {
                Err(SquadError::BoostIrreversible(kind))
            }
            BoostStatus::Pending { .. } => {
                self.store.release(kind);
                self.statuses.insert(kind, BoostStatus::Available);
                Ok(())
            }
            other => Err(Self::transition_error(kind, "cancelled", other)),
        }
    }

    /// Abandoning the edit session drops every pending boost of this screen,
    /// permanent kinds included (nothing was sent).
    pub fn discard_pending(&mut self) {
        for (kind, status) in self.statuses.iter_mut() {
            if matches!(status, BoostStatus::Pending { .. }) {
                self.store.release(*kind);
                *status = BoostStatus::Available;
            }
        }
    }

    /// The pending boost on this screen, if any.
    pub fn pending(&self) -> Option<(BoostKind, TourId)> {
        self.statuses.iter().find_map(|(kind, status)| match status {
            BoostStatus::Pending { tour } => Some((*kind, *tour)),
            _ => None,
        })
    }

    /// Everything `commit` checks, without changing state.
    pub fn check_commit(&self, kind: BoostKind, confirmed: bool) -> Result<TourId> {
        match self.current(kind)? {
            BoostStatus::Pending { .. } if kind.is_permanent() && !confirmed => {
                Err(SquadError::ConfirmationRequired(kind))
            }
            BoostStatus::Pending { tour } => Ok(*tour),
            other => Err(Self::transition_error(kind, "committed", other)),
        }
    }

    /// Commit the pending `kind`. `committed` is the last committed squad; a
    /// golden tour keeps a copy of it as its restore point. Permanent kinds
    /// need `confirmed`.
    pub fn commit(
        &mut self,
        kind: BoostKind,
        confirmed: bool,
        committed: &SquadState,
    ) -> Result<BoostTransition> {
        let tour = self.check_commit(kind, confirmed)?;
        let boost = Boost::arm(kind, tour, Some(committed));
        self.statuses.insert(kind, BoostStatus::Committed { tour, boost });
        info!(%kind, %tour, "boost committed");
        Ok(BoostTransition { kind, tour, action: BoostAction::Apply })
    }

    /// Revert a committed cancellable boost.
    pub fn remove(&mut self, kind: BoostKind) -> Result<BoostTransition> {
        match self.current(kind)? {
            BoostStatus::Committed { .. } if kind.is_permanent() => {
                Err(SquadError::BoostIrreversible(kind))
            }
            BoostStatus::Committed { tour, .. } => {
                let tour = *tour;
                self.store.release(kind);
                self.statuses.insert(kind, BoostStatus::Available);
                info!(%kind, %tour, "boost removed");
                Ok(BoostTransition { kind, tour, action: BoostAction::Remove })
            }
            other => Err(Self::transition_error(kind, "removed", other)),
        }
    }

    /// Pending or committed boost armed for `tour`.
    pub fn armed(&self, tour: TourId) -> Option<BoostKind> {
        self.statuses.iter().find_map(|(kind, status)| match status {
            BoostStatus::Pending { tour: t } | BoostStatus::Committed { tour: t, .. } if *t == tour => {
                Some(*kind)
            }
            _ => None,
        })
    }

    /// Effects in force for `tour`, read from the shared claim so a boost
    /// held on the other screen counts too.
    pub fn effects(&self, tour: TourId) -> BoostEffects {
        self.store
            .current()
            .filter(|claim| claim.tour == tour)
            .map(|claim| claim.kind.effects())
            .unwrap_or_default()
    }

    pub fn unlimited_transfers(&self, tour: TourId) -> bool {
        self.effects(tour).unlimited_transfers
    }

    /// Close out every boost for tours up to `ended`. Committed boosts become
    /// used; stale pending ones go back to available. Returns the golden-tour
    /// restore point, if one was armed.
    pub fn finish_tour(&mut self, ended: TourId) -> Option<GoldenSnapshot> {
        let mut restore = None;
        for (kind, status) in self.statuses.iter_mut() {
            match status {
                BoostStatus::Committed { tour, boost } if *tour <= ended => {
                    let used = *tour;
                    if let Boost::GoldenTour { snapshot } = boost {
                        restore = snapshot.take();
                    }
                    self.store.release(*kind);
                    *status = BoostStatus::Used { tour: Some(used) };
                }
                BoostStatus::Pending { tour } if *tour <= ended => {
                    self.store.release(*kind);
                    *status = BoostStatus::Available;
                }
                _ => {}
            }
        }
        restore
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boost::store::SharedBoostSlot;
    use crate::models::squad::fixtures::squad_442;

    fn panels() -> (BoostPanel, BoostPanel, Arc<SharedBoostSlot>) {
        let store = SharedBoostSlot::new();
        let squad = BoostPanel::new(BoostScreen::Squad, store.clone());
        let transfers = BoostPanel::new(BoostScreen::Transfers, store.clone());
        (squad, transfers, store)
    }

    #[test]
    fn test_one_boost_across_screens() {
        let (mut squad, mut transfers, _) = panels();
        squad.queue(BoostKind::TripleCaptain, TourId(5)).unwrap();
        assert_eq!(
            transfers.queue(BoostKind::Wildcard, TourId(5)),
            Err(SquadError::BoostConflict { active: BoostKind::TripleCaptain, tour: TourId(5) })
        );
        assert_eq!(
            squad.queue(BoostKind::BenchBoost, TourId(5)),
            Err(SquadError::BoostConflict { active: BoostKind::TripleCaptain, tour: TourId(5) })
        );
        assert_eq!(transfers.status(BoostKind::Wildcard), Some(&BoostStatus::Available));
    }

    #[test]
    fn test_effects_follow_other_screen() {
        let (squad, mut transfers, _) = panels();
        transfers.queue(BoostKind::Wildcard, TourId(3)).unwrap();
        transfers.commit(BoostKind::Wildcard, true, &squad_442()).unwrap();
        assert_eq!(squad.armed(TourId(3)), None);
        assert!(squad.unlimited_transfers(TourId(3)));
        assert!(!squad.unlimited_transfers(TourId(4)));
    }

    #[test]
    fn test_cancel_frees_slot_for_other_screen() {
        let (mut squad, mut transfers, store) = panels();
        squad.queue(BoostKind::BenchBoost, TourId(5)).unwrap();
        squad.cancel(BoostKind::BenchBoost).unwrap();
        assert_eq!(store.current(), None);
        transfers.queue(BoostKind::Wildcard, TourId(5)).unwrap();
        assert_eq!(transfers.pending(), Some((BoostKind::Wildcard, TourId(5))));
    }

    #[test]
    fn test_wrong_screen_kind_unavailable() {
        let (mut squad, _, _) = panels();
        assert_eq!(
            squad.queue(BoostKind::GoldenTour, TourId(1)),
            Err(SquadError::BoostUnavailable(BoostKind::GoldenTour))
        );
    }

    #[test]
    fn test_permanent_boost_needs_confirmation_and_cannot_be_removed() {
        let (_, mut transfers, store) = panels();
        let committed = squad_442();
        transfers.queue(BoostKind::Wildcard, TourId(2)).unwrap();
        assert_eq!(transfers.cancel(BoostKind::Wildcard), Err(SquadError::BoostIrreversible(BoostKind::Wildcard)));
        assert_eq!(
            transfers.commit(BoostKind::Wildcard, false, &committed),
            Err(SquadError::ConfirmationRequired(BoostKind::Wildcard))
        );
        let transition = transfers.commit(BoostKind::Wildcard, true, &committed).unwrap();
        assert_eq!(transition.action, BoostAction::Apply);
        assert_eq!(transfers.remove(BoostKind::Wildcard), Err(SquadError::BoostIrreversible(BoostKind::Wildcard)));
        assert!(transfers.unlimited_transfers(TourId(2)));
        assert_eq!(store.current(), Some(BoostClaim { kind: BoostKind::Wildcard, tour: TourId(2) }));
    }

    #[test]
    fn test_cancellable_boost_commit_and_remove() {
        let (mut squad, _, store) = panels();
        squad.queue(BoostKind::DoubleCaptain, TourId(4)).unwrap();
        squad.commit(BoostKind::DoubleCaptain, false, &squad_442()).unwrap();
        assert_eq!(squad.effects(TourId(4)).vice_captain_multiplier, 2);
        let transition = squad.remove(BoostKind::DoubleCaptain).unwrap();
        assert_eq!(transition, BoostTransition {
            kind: BoostKind::DoubleCaptain,
            tour: TourId(4),
            action: BoostAction::Remove,
        });
        assert_eq!(squad.status(BoostKind::DoubleCaptain), Some(&BoostStatus::Available));
        assert_eq!(store.current(), None);
        assert_eq!(squad.effects(TourId(4)), BoostEffects::BASELINE);
    }

    #[test]
    fn test_discard_pending_releases_permanent_kind() {
        let (_, mut transfers, store) = panels();
        transfers.queue(BoostKind::GoldenTour, TourId(8)).unwrap();
        transfers.discard_pending();
        assert_eq!(transfers.status(BoostKind::GoldenTour), Some(&BoostStatus::Available));
        assert_eq!(store.current(), None);
    }

    #[test]
    fn test_golden_tour_restores_after_tour() {
        let (_, mut transfers, store) = panels();
        let before = squad_442();
        transfers.queue(BoostKind::GoldenTour, TourId(9)).unwrap();
        transfers.commit(BoostKind::GoldenTour, true, &before).unwrap();

        assert_eq!(transfers.finish_tour(TourId(8)), None);
        let snapshot = transfers.finish_tour(TourId(9)).expect("restore point");
        assert_eq!(snapshot.squad(), &before);
        assert_eq!(transfers.status(BoostKind::GoldenTour), Some(&BoostStatus::Used { tour: Some(TourId(9)) }));
        assert_eq!(store.current(), None);
        assert_eq!(
            transfers.queue(BoostKind::GoldenTour, TourId(10)),
            Err(SquadError::BoostUnavailable(BoostKind::GoldenTour))
        );
    }

    #[test]
    fn test_from_availability() {
        let store = SharedBoostSlot::new();
        let records = vec![
            BoostAvailability { kind: BoostKind::BenchBoost, available: false, last_used_tour: Some(TourId(2)), committed_for_upcoming: false },
            BoostAvailability { kind: BoostKind::TripleCaptain, available: true, last_used_tour: None, committed_for_upcoming: true },
            BoostAvailability { kind: BoostKind::Wildcard, available: true, last_used_tour: None, committed_for_upcoming: false },
        ];
        let squad = BoostPanel::from_availability(BoostScreen::Squad, store.clone(), &records, TourId(6)).unwrap();
        assert_eq!(squad.status(BoostKind::BenchBoost), Some(&BoostStatus::Used { tour: Some(TourId(2)) }));
        assert_eq!(squad.armed(TourId(6)), Some(BoostKind::TripleCaptain));
        assert_eq!(squad.status(BoostKind::DoubleCaptain), Some(&BoostStatus::Available));

        let mut transfers = BoostPanel::from_availability(BoostScreen::Transfers, store, &records, TourId(6)).unwrap();
        assert!(matches!(transfers.queue(BoostKind::Wildcard, TourId(6)), Err(SquadError::BoostConflict { .. })));
    }

    #[test]
    fn test_double_commit_is_transition_error() {
        let (mut squad, _, _) = panels();
        assert!(matches!(
            squad.commit(BoostKind::BenchBoost, true, &squad_442()),
            Err(SquadError::BoostTransition { action: "committed", state: "available", .. })
        ));
    }
}
