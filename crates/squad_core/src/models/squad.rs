use fxhash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::ids::{ClubId, PlayerId};
use super::player::{Player, Role};
use super::price::Price;
use crate::config::RulesConfig;
use crate::error::{Result, SquadError};
use crate::lineup::{assign_slots, reorder_bench, validate_swap, SlotIndex};
use crate::tactics::{count_positions, Formation};

/// One squad: 11 fielded players, 4 on the bench, optional armbands.
///
/// Values are treated as immutable snapshots: editing operations return a
/// new `SquadState` and leave `self` untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SquadState {
    pub main: Vec<Player>,
    pub bench: Vec<Player>,
    #[serde(default)]
    pub captain_id: Option<PlayerId>,
    #[serde(default)]
    pub vice_captain_id: Option<PlayerId>,
}

impl SquadState {
    /// Build a squad and normalize it into engine shape (roles, slots,
    /// goalkeeper-first bench).
    pub fn new(
        main: Vec<Player>,
        bench: Vec<Player>,
        captain_id: Option<PlayerId>,
        vice_captain_id: Option<PlayerId>,
    ) -> Self {
        Self { main, bench, captain_id, vice_captain_id }.normalized()
    }

    pub fn normalized(mut self) -> Self {
        assign_slots(&mut self.main, Role::Main);
        assign_slots(&mut self.bench, Role::Bench);
        self
    }

    pub fn formation(&self) -> Option<Formation> {
        crate::tactics::detect_formation(&self.main)
    }

    pub fn players(&self) -> impl Iterator<Item = &Player> {
        self.main.iter().chain(self.bench.iter())
    }

    pub fn find(&self, id: PlayerId) -> Option<&Player> {
        self.players().find(|player| player.id == id)
    }

    pub fn role_of(&self, id: PlayerId) -> Option<Role> {
        if self.main.iter().any(|player| player.id == id) {
            Some(Role::Main)
        } else if self.bench.iter().any(|player| player.id == id) {
            Some(Role::Bench)
        } else {
            None
        }
    }

    pub fn main_ids(&self) -> Vec<PlayerId> {
        self.main.iter().map(|player| player.id).collect()
    }

    pub fn bench_ids(&self) -> Vec<PlayerId> {
        self.bench.iter().map(|player| player.id).collect()
    }

    pub fn spent(&self) -> Price {
        self.players().map(|player| player.price).sum()
    }

    /// Money left from `pool`, or `None` when the squad is over budget.
    pub fn remaining_budget(&self, pool: Price) -> Option<Price> {
        pool.checked_sub(self.spent())
    }

    pub fn club_counts(&self) -> FxHashMap<&ClubId, u8> {
        let mut counts = FxHashMap::default();
        for player in self.players() {
            *counts.entry(&player.club).or_insert(0u8) += 1;
        }
        counts
    }

    pub fn slot_index(&self) -> Result<SlotIndex> {
        SlotIndex::build(&self.main, &self.bench)
    }

    /// Check every committed-state invariant. Returns the lineup formation.
    pub fn validate(&self, rules: &RulesConfig) -> Result<Formation> {
        if self.main.len() != rules.main_size {
            return Err(SquadError::SquadSize {
                role: Role::Main,
                expected: rules.main_size,
                found: self.main.len(),
            });
        }
        if self.bench.len() != rules.bench_size {
            return Err(SquadError::SquadSize {
                role: Role::Bench,
                expected: rules.bench_size,
                found: self.bench.len(),
            });
        }

        for (role, players) in [(Role::Main, &self.main), (Role::Bench, &self.bench)] {
            let keepers = players.iter().filter(|player| player.is_goalkeeper()).count();
            if keepers != 1 {
                return Err(SquadError::GoalkeeperCount { role, found: keepers });
            }
        }
        match self.bench.first() {
            Some(first) if first.is_goalkeeper() && first.slot_index == 0 => {}
            _ => return Err(SquadError::BenchOrder),
        }

        let counts = count_positions(&self.main);
        let formation = Formation::from_counts(&counts).ok_or_else(|| SquadError::for_counts(counts))?;

        self.slot_index()?;

        if let Some(remaining) = rules.budget_pool.checked_sub(self.spent()) {
            debug!(%remaining, "budget check passed");
        } else {
            return Err(SquadError::OverBudget { spent: self.spent(), pool: rules.budget_pool });
        }

        if let Some((club, _)) = self.club_counts().into_iter().find(|(_, n)| *n > rules.club_cap) {
            return Err(SquadError::ClubCap { club: club.clone(), limit: rules.club_cap });
        }

        self.validate_captaincy()?;
        Ok(formation)
    }

    fn validate_captaincy(&self) -> Result<()> {
        for (label, id) in [("captain", self.captain_id), ("vice captain", self.vice_captain_id)] {
            if let Some(id) = id {
                if self.role_of(id) != Some(Role::Main) {
                    return Err(SquadError::Captaincy(format!(
                        "{label} {id} must be in the main lineup"
                    )));
                }
            }
        }
        if self.captain_id.is_some() && self.captain_id == self.vice_captain_id {
            return Err(SquadError::Captaincy(
                "captain and vice captain must be different players".to_string(),
            ));
        }
        Ok(())
    }

    /// Exchange a field player with a bench player.
    ///
    /// The incoming player takes the field slot, the outgoing player takes
    /// the bench position (substitution priority) of the incoming one. An
    /// outgoing captain or vice captain hands the armband to the incoming
    /// player.
    pub fn swap(&self, field_id: PlayerId, bench_id: PlayerId) -> Result<SquadState> {
        let field_index = self
            .main
            .iter()
            .position(|player| player.id == field_id)
            .ok_or(SquadError::IdentityLookup { id: field_id, role: Role::Main })?;
        let bench_index = self
            .bench
            .iter()
            .position(|player| player.id == bench_id)
            .ok_or(SquadError::IdentityLookup { id: bench_id, role: Role::Bench })?;

        let formation =
            validate_swap(&self.main, &self.main[field_index], &self.bench[bench_index])?;

        let mut next = self.clone();
        let incoming = next.bench[bench_index].clone();
        let outgoing = std::mem::replace(&mut next.main[field_index], incoming);
        next.bench[bench_index] = outgoing;
        if next.captain_id == Some(field_id) {
            next.captain_id = Some(bench_id);
        }
        if next.vice_captain_id == Some(field_id) {
            next.vice_captain_id = Some(bench_id);
        }
        let next = next.normalized();

        debug!(field = %field_id, bench = %bench_id, %formation, "swap applied");
        Ok(next)
    }

    /// Swap substitution priority of two outfield bench players.
    pub fn reorder_bench(&self, first: PlayerId, second: PlayerId) -> Result<SquadState> {
        let mut next = self.clone();
        reorder_bench(&mut next.bench, first, second)?;
        Ok(next)
    }
}
