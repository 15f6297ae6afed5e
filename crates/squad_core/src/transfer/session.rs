//! Edit session over one committed squad.
//!
//! All edits go to a draft. The committed state is only replaced when a
//! commit passes full validation, so the previous committed squad is always
//! available as the rollback target and the golden-tour restore point.

use tracing::{debug, info, warn};

use super::ledger::{count_changes, TransferCost, TransferLedger};
use crate::api::boundary::{SquadPersistence, SquadSubmission};
use crate::boost::{BoostAction, BoostPanel, BoostTransition, GoldenSnapshot};
use crate::config::RulesConfig;
use crate::error::{Result, SquadError};
use crate::lineup::SlotKey;
use crate::models::{Player, PlayerId, Role, SquadState, TourId};
use crate::tactics::{count_positions, BoundKind, POOL_LAYOUT};

/// A slot emptied by `remove_player`, waiting for a same-position player.
#[derive(Debug, Clone, PartialEq)]
pub struct Vacancy {
    pub key: SlotKey,
    pub removed: Player,
}

#[derive(Debug, Clone)]
pub struct EditSession {
    rules: RulesConfig,
    ledger: TransferLedger,
    committed: SquadState,
    draft: SquadState,
    vacancies: Vec<Vacancy>,
    tour: TourId,
    free_transfers: u32,
}

impl EditSession {
    pub fn new(rules: RulesConfig, committed: SquadState, tour: TourId, free_transfers: u32) -> Self {
        let committed = committed.normalized();
        Self {
            ledger: TransferLedger::new(&rules),
            rules,
            draft: committed.clone(),
            committed,
            vacancies: Vec::new(),
            tour,
            free_transfers,
        }
    }

    pub fn committed(&self) -> &SquadState {
        &self.committed
    }

    pub fn draft(&self) -> &SquadState {
        &self.draft
    }

    pub fn vacancies(&self) -> &[Vacancy] {
        &self.vacancies
    }

    pub fn tour(&self) -> TourId {
        self.tour
    }

    pub fn free_transfers(&self) -> u32 {
        self.free_transfers
    }

    pub fn rules(&self) -> &RulesConfig {
        &self.rules
    }

    fn ensure_no_vacancies(&self) -> Result<()> {
        match self.vacancies.first() {
            Some(vacancy) => {
                let (expected, found) = match vacancy.key.role {
                    Role::Main => (self.rules.main_size, self.draft.main.len()),
                    Role::Bench => (self.rules.bench_size, self.draft.bench.len()),
                };
                Err(SquadError::SquadSize { role: vacancy.key.role, expected, found })
            }
            None => Ok(()),
        }
    }

    pub fn swap(&mut self, field_id: PlayerId, bench_id: PlayerId) -> Result<()> {
        self.ensure_no_vacancies()?;
        self.draft = self.draft.swap(field_id, bench_id)?;
        Ok(())
    }

    pub fn reorder_bench(&mut self, first: PlayerId, second: PlayerId) -> Result<()> {
        self.ensure_no_vacancies()?;
        self.draft = self.draft.reorder_bench(first, second)?;
        Ok(())
    }

    pub fn set_captain(&mut self, id: PlayerId) -> Result<()> {
        self.check_armband(id, "captain", self.draft.vice_captain_id)?;
        self.draft.captain_id = Some(id);
        Ok(())
    }

    pub fn set_vice_captain(&mut self, id: PlayerId) -> Result<()> {
        self.check_armband(id, "vice captain", self.draft.captain_id)?;
        self.draft.vice_captain_id = Some(id);
        Ok(())
    }

    fn check_armband(&self, id: PlayerId, label: &str, other: Option<PlayerId>) -> Result<()> {
        match self.draft.role_of(id) {
            None => return Err(SquadError::UnknownPlayer(id)),
            Some(Role::Bench) => {
                return Err(SquadError::Captaincy(format!("{label} {id} must be in the main lineup")))
            }
            Some(Role::Main) => {}
        }
        if other == Some(id) {
            return Err(SquadError::Captaincy(format!(
                "{id} already holds the other armband and cannot also be {label}"
            )));
        }
        Ok(())
    }

    /// Take a player out of the draft, leaving a vacancy in their slot.
    /// Removing an armband holder clears that armband.
    pub fn remove_player(&mut self, id: PlayerId) -> Result<&Vacancy> {
        let (list, role) = if self.draft.main.iter().any(|p| p.id == id) {
            (&mut self.draft.main, Role::Main)
        } else if self.draft.bench.iter().any(|p| p.id == id) {
            (&mut self.draft.bench, Role::Bench)
        } else {
            return Err(SquadError::UnknownPlayer(id));
        };
        let at = list.iter().position(|p| p.id == id).ok_or(SquadError::UnknownPlayer(id))?;
        let removed = list.remove(at);
        let key = SlotKey { role, ..SlotKey::of(&removed) };

        if self.draft.captain_id == Some(id) {
            self.draft.captain_id = None;
        }
        if self.draft.vice_captain_id == Some(id) {
            self.draft.vice_captain_id = None;
        }

        debug!(%id, ?key, "player removed");
        self.vacancies.push(Vacancy { key, removed });
        self.vacancies.last().ok_or(SquadError::UnknownPlayer(id))
    }

    /// Put a player into the oldest vacancy of their position. Slot numbers
    /// of the other players stay fixed until every vacancy is filled.
    pub fn add_player(&mut self, mut player: Player) -> Result<()> {
        if self.draft.find(player.id).is_some() {
            return Err(SquadError::DuplicatePlayer(player.id));
        }

        let Some(vacancy_index) =
            self.vacancies.iter().position(|vacancy| vacancy.key.position == player.position)
        else {
            let held = count_positions(self.draft.players()).get(player.position);
            return Err(SquadError::PositionCount {
                position: player.position,
                bound: BoundKind::Maximum,
                limit: POOL_LAYOUT.get(player.position),
                actual: held + 1,
            });
        };

        let remaining = self.rules.budget_pool.saturating_sub(self.draft.spent());
        if player.price > remaining {
            return Err(SquadError::Budget { price: player.price, remaining });
        }

        let from_club = self.draft.players().filter(|p| p.club == player.club).count();
        if from_club >= usize::from(self.rules.club_cap) {
            return Err(SquadError::ClubCap { club: player.club, limit: self.rules.club_cap });
        }

        let vacancy = self.vacancies.remove(vacancy_index);
        player.role = vacancy.key.role;
        player.slot_index = vacancy.key.slot;
        let list = match vacancy.key.role {
            Role::Main => &mut self.draft.main,
            Role::Bench => &mut self.draft.bench,
        };
        list.push(player);
        match vacancy.key.role {
            Role::Main => list.sort_by_key(|p| (p.position.order(), p.slot_index)),
            Role::Bench => list.sort_by_key(|p| p.slot_index),
        }
        if self.vacancies.is_empty() {
            self.draft = self.draft.clone().normalized();
        }
        debug!(replaced = %vacancy.removed.id, "vacancy filled");
        Ok(())
    }

    pub fn pending_changes(&self) -> u32 {
        count_changes(&self.committed, &self.draft)
    }

    /// Cost of the draft's transfers if committed now.
    pub fn preview_cost(&self, panel: Option<&BoostPanel>) -> TransferCost {
        let boost_active = self.unlimited_transfers(panel);
        self.ledger.cost(self.pending_changes(), self.free_transfers, boost_active)
    }

    /// Whether a boost held for this tour on any screen lifts the quota.
    fn unlimited_transfers(&self, panel: Option<&BoostPanel>) -> bool {
        panel.is_some_and(|panel| panel.unlimited_transfers(self.tour))
    }

    /// Drop every local change, pending boosts included.
    pub fn discard(&mut self, panel: Option<&mut BoostPanel>) {
        self.draft = self.committed.clone();
        self.vacancies.clear();
        if let Some(panel) = panel {
            panel.discard_pending();
        }
    }

    /// Validate the draft and build the submission without changing anything.
    pub fn prepare_commit(&self, panel: Option<&BoostPanel>, confirmed: bool) -> Result<SquadSubmission> {
        let checked = self.ensure_no_vacancies().and_then(|_| self.draft.validate(&self.rules));
        let formation = match checked {
            Ok(formation) => formation,
            Err(err) => {
                warn!(error = %err, tour = %self.tour, "commit rejected");
                return Err(err);
            }
        };

        let boost = match panel.and_then(BoostPanel::pending) {
            Some((kind, tour)) => {
                panel.map(|panel| panel.check_commit(kind, confirmed)).transpose()?;
                Some(BoostTransition { kind, tour, action: BoostAction::Apply })
            }
            None => None,
        };

        let transfer_cost = self.preview_cost(panel);
        debug!(%formation, changes = transfer_cost.change_count, penalty = transfer_cost.points_penalty, "commit prepared");
        Ok(SquadSubmission {
            main_player_ids: self.draft.main_ids(),
            bench_player_ids: self.draft.bench_ids(),
            captain_id: self.draft.captain_id,
            vice_captain_id: self.draft.vice_captain_id,
            boost,
            transfer_cost,
            tour: self.tour,
        })
    }

    /// Validate and commit the draft. On success the draft becomes the
    /// committed squad and any pending boost is committed with it.
    pub fn commit(&mut self, mut panel: Option<&mut BoostPanel>, confirmed: bool) -> Result<SquadSubmission> {
        let submission = self.prepare_commit(panel.as_deref(), confirmed)?;
        self.apply(&submission, panel.take(), confirmed)?;
        Ok(submission)
    }

    /// Like `commit`, but only supersedes local state after the backend has
    /// accepted the submission.
    pub fn save<P: SquadPersistence>(
        &mut self,
        persistence: &mut P,
        mut panel: Option<&mut BoostPanel>,
        confirmed: bool,
    ) -> Result<SquadSubmission> {
        let submission = self.prepare_commit(panel.as_deref(), confirmed)?;
        persistence
            .submit(&submission)
            .map_err(|err| SquadError::Persistence(err.to_string()))?;
        self.apply(&submission, panel.take(), confirmed)?;
        Ok(submission)
    }

    fn apply(&mut self, submission: &SquadSubmission, panel: Option<&mut BoostPanel>, confirmed: bool) -> Result<()> {
        let unlimited = self.unlimited_transfers(panel.as_deref());
        if let (Some(transition), Some(panel)) = (submission.boost, panel) {
            panel.commit(transition.kind, confirmed, &self.committed)?;
        }
        if !unlimited {
            self.free_transfers = self.free_transfers.saturating_sub(submission.transfer_cost.free_used);
        }
        self.committed = self.draft.clone();
        info!(
            tour = %self.tour,
            changes = submission.transfer_cost.change_count,
            penalty = submission.transfer_cost.points_penalty,
            "squad committed"
        );
        Ok(())
    }

    /// Replace the committed squad with a golden-tour restore point.
    pub fn restore(&mut self, snapshot: GoldenSnapshot) {
        info!(tour = %snapshot.tour(), captured_at = %snapshot.captured_at(), "squad restored");
        self.committed = snapshot.into_squad();
        self.draft = self.committed.clone();
        self.vacancies.clear();
    }

    /// Open `tour` with a fresh free-transfer quota.
    pub fn start_tour(&mut self, tour: TourId) {
        self.tour = tour;
        self.free_transfers = self.ledger.free_quota();
        self.draft = self.committed.clone();
        self.vacancies.clear();
    }

    /// Close the current tour on every panel, apply a golden-tour restore if
    /// one was armed, then open the next tour.
    pub fn finish_tour(&mut self, panels: &mut [&mut BoostPanel]) {
        let ended = self.tour;
        for panel in panels.iter_mut() {
            if let Some(snapshot) = panel.finish_tour(ended) {
                self.restore(snapshot);
            }
        }
        self.start_tour(ended.next());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boost::{BoostKind, BoostScreen, SharedBoostSlot};
    use crate::models::squad::fixtures::squad_442;
    use crate::models::{Position, Price};
    use crate::tactics::Formation;

    fn session() -> EditSession {
        EditSession::new(RulesConfig::default(), squad_442(), TourId(5), 2)
    }

    fn newcomer(id: u32, position: Position) -> Player {
        Player::new(id, position, Price::from_tenths(45), "NEW")
    }

    #[test]
    fn test_swap_and_discard() {
        let mut session = session();
        session.swap(PlayerId(2), PlayerId(14)).unwrap();
        assert_eq!(session.draft().formation(), Some(Formation::F352));
        assert_eq!(session.pending_changes(), 0);
        session.discard(None);
        assert_eq!(session.draft(), session.committed());
    }

    #[test]
    fn test_rejected_swap_leaves_draft() {
        let mut session = session();
        session.swap(PlayerId(2), PlayerId(14)).unwrap();
        let before = session.draft().clone();
        // Two defenders fits no scheme.
        assert!(matches!(session.swap(PlayerId(3), PlayerId(15)), Err(SquadError::Formation { .. })));
        assert_eq!(session.draft(), &before);
    }

    #[test]
    fn test_replace_player_in_vacated_slot() {
        let mut session = session();
        let key = session.remove_player(PlayerId(4)).unwrap().key;
        assert_eq!(key, SlotKey { role: Role::Main, position: Position::Defender, slot: 2 });

        session.add_player(newcomer(40, Position::Defender)).unwrap();
        let index = session.draft().slot_index().unwrap();
        assert_eq!(index.player_at(key), Some(PlayerId(40)));
        assert_eq!(session.pending_changes(), 1);
        assert!(session.vacancies().is_empty());
    }

    #[test]
    fn test_refill_two_vacancies_keeps_slots() {
        let mut session = session();
        session.remove_player(PlayerId(3)).unwrap();
        session.remove_player(PlayerId(2)).unwrap();
        session.add_player(newcomer(40, Position::Defender)).unwrap();
        // One vacancy left: the others keep their slots.
        let defenders = |session: &EditSession| -> Vec<(PlayerId, u8)> {
            session
                .draft()
                .main
                .iter()
                .filter(|p| p.position == Position::Defender)
                .map(|p| (p.id, p.slot_index))
                .collect()
        };
        assert_eq!(defenders(&session), vec![(PlayerId(40), 1), (PlayerId(4), 2), (PlayerId(5), 3)]);

        session.add_player(newcomer(41, Position::Defender)).unwrap();
        assert_eq!(
            defenders(&session),
            vec![(PlayerId(41), 0), (PlayerId(40), 1), (PlayerId(4), 2), (PlayerId(5), 3)]
        );
        let index = session.draft().slot_index().unwrap();
        let slot = |slot| SlotKey { role: Role::Main, position: Position::Defender, slot };
        assert_eq!(index.player_at(slot(1)), Some(PlayerId(40)));
        assert_eq!(index.player_at(slot(2)), Some(PlayerId(4)));
        assert_eq!(session.draft().validate(&RulesConfig::default()), Ok(Formation::F442));
    }

    #[test]
    fn test_bench_reorder_waits_for_vacancies() {
        let mut session = session();
        session.remove_player(PlayerId(13)).unwrap();
        assert_eq!(
            session.reorder_bench(PlayerId(14), PlayerId(15)),
            Err(SquadError::SquadSize { role: Role::Bench, expected: 4, found: 3 })
        );
        session.add_player(newcomer(40, Position::Defender)).unwrap();
        assert_eq!(session.draft().bench_ids()[1], PlayerId(40));
        session.reorder_bench(PlayerId(14), PlayerId(15)).unwrap();
    }

    #[test]
    fn test_add_requires_same_position_vacancy() {
        let mut session = session();
        session.remove_player(PlayerId(4)).unwrap();
        assert_eq!(
            session.add_player(newcomer(40, Position::Forward)),
            Err(SquadError::PositionCount {
                position: Position::Forward,
                bound: BoundKind::Maximum,
                limit: 3,
                actual: 4,
            })
        );
        assert_eq!(
            session.add_player(newcomer(1, Position::Defender)),
            Err(SquadError::DuplicatePlayer(PlayerId(1)))
        );
    }

    #[test]
    fn test_add_checks_budget_and_club() {
        let mut session = session();
        session.remove_player(PlayerId(4)).unwrap();
        let pricey = Player::new(40, Position::Defender, Price::from_tenths(500), "NEW");
        assert!(matches!(session.add_player(pricey), Err(SquadError::Budget { .. })));
        let arsenal = Player::new(41, Position::Defender, Price::from_tenths(40), "ARS");
        assert_eq!(
            session.add_player(arsenal),
            Err(SquadError::ClubCap { club: "ARS".into(), limit: 3 })
        );
        assert_eq!(session.vacancies().len(), 1);
    }

    #[test]
    fn test_commit_with_vacancy_rejected() {
        let mut session = session();
        session.remove_player(PlayerId(13)).unwrap();
        assert_eq!(
            session.commit(None, false),
            Err(SquadError::SquadSize { role: Role::Bench, expected: 4, found: 3 })
        );
        assert_eq!(session.committed(), &squad_442());
    }

    #[test]
    fn test_commit_charges_paid_transfers() {
        let mut session = session();
        for (old, new, position) in [
            (3, 40, Position::Defender),
            (7, 41, Position::Midfielder),
            (11, 42, Position::Forward),
        ] {
            session.remove_player(PlayerId(old)).unwrap();
            session.add_player(newcomer(new, position)).unwrap();
        }
        let submission = session.commit(None, false).unwrap();
        assert_eq!(
            submission.transfer_cost,
            TransferCost { change_count: 3, free_used: 2, paid: 1, points_penalty: 4 }
        );
        assert_eq!(submission.bench_player_ids[0], PlayerId(12));
        assert_eq!(session.free_transfers(), 0);
        assert_eq!(session.pending_changes(), 0);
    }

    #[test]
    fn test_wildcard_commit_is_free_and_needs_confirmation() {
        let store = SharedBoostSlot::new();
        let mut transfers = BoostPanel::new(BoostScreen::Transfers, store);
        let mut session = session();
        transfers.queue(BoostKind::Wildcard, TourId(5)).unwrap();
        for (old, new) in [(2, 40), (3, 41), (4, 42)] {
            session.remove_player(PlayerId(old)).unwrap();
            session.add_player(newcomer(new, Position::Defender)).unwrap();
        }
        assert_eq!(
            session.commit(Some(&mut transfers), false),
            Err(SquadError::ConfirmationRequired(BoostKind::Wildcard))
        );
        let submission = session.commit(Some(&mut transfers), true).unwrap();
        assert_eq!(submission.transfer_cost.points_penalty, 0);
        assert_eq!(
            submission.boost,
            Some(BoostTransition { kind: BoostKind::Wildcard, tour: TourId(5), action: BoostAction::Apply })
        );
        assert_eq!(session.free_transfers(), 2);
    }

    #[test]
    fn test_wildcard_from_other_screen_covers_squad_commit() {
        let store = SharedBoostSlot::new();
        let mut squad_panel = BoostPanel::new(BoostScreen::Squad, store.clone());
        let mut transfers = BoostPanel::new(BoostScreen::Transfers, store);
        let mut session = session();
        transfers.queue(BoostKind::Wildcard, TourId(5)).unwrap();
        transfers.commit(BoostKind::Wildcard, true, session.committed()).unwrap();

        for (old, new) in [(2, 40), (3, 41), (4, 42)] {
            session.remove_player(PlayerId(old)).unwrap();
            session.add_player(newcomer(new, Position::Defender)).unwrap();
        }
        let preview = session.preview_cost(Some(&squad_panel));
        assert_eq!(preview, TransferCost { change_count: 3, free_used: 3, paid: 0, points_penalty: 0 });

        let submission = session.commit(Some(&mut squad_panel), false).unwrap();
        assert_eq!(submission.transfer_cost.points_penalty, 0);
        assert_eq!(submission.boost, None);
        assert_eq!(session.free_transfers(), 2);
    }

    #[test]
    fn test_armbands() {
        let mut session = session();
        assert!(matches!(session.set_captain(PlayerId(6)), Err(SquadError::Captaincy(_))));
        assert!(matches!(session.set_captain(PlayerId(13)), Err(SquadError::Captaincy(_))));
        assert_eq!(session.set_captain(PlayerId(99)), Err(SquadError::UnknownPlayer(PlayerId(99))));
        session.set_captain(PlayerId(9)).unwrap();
        session.set_vice_captain(PlayerId(10)).unwrap();
        assert_eq!(session.draft().captain_id, Some(PlayerId(9)));
        assert_eq!(session.draft().vice_captain_id, Some(PlayerId(10)));
    }

    #[test]
    fn test_golden_tour_round_trip() {
        let store = SharedBoostSlot::new();
        let mut squad_panel = BoostPanel::new(BoostScreen::Squad, store.clone());
        let mut transfers = BoostPanel::new(BoostScreen::Transfers, store);
        let mut session = session();
        let original = session.committed().clone();

        transfers.queue(BoostKind::GoldenTour, TourId(5)).unwrap();
        session.remove_player(PlayerId(10)).unwrap();
        session.add_player(newcomer(40, Position::Forward)).unwrap();
        session.set_captain(PlayerId(11)).unwrap();
        session.commit(Some(&mut transfers), true).unwrap();
        assert_ne!(session.committed(), &original);

        session.finish_tour(&mut [&mut squad_panel, &mut transfers]);
        assert_eq!(session.committed(), &original);
        assert_eq!(session.tour(), TourId(6));
        assert_eq!(session.free_transfers(), 2);
    }
}
