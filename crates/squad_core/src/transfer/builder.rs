//! Assembling a fresh 15-player squad in the pool layout (2 GK, 5 DEF,
//! 5 MID, 3 FWD) before it is split into lineup and bench.

use tracing::debug;

use crate::config::RulesConfig;
use crate::error::{Result, SquadError};
use crate::models::{Player, PlayerId, Position, Price, Role, SquadState};
use crate::tactics::{count_positions, BoundKind, Formation, PositionCounts, POOL_LAYOUT};

#[derive(Debug, Clone)]
pub struct SquadBuilder {
    rules: RulesConfig,
    pool: Vec<Player>,
}

impl SquadBuilder {
    pub fn new(rules: RulesConfig) -> Self {
        Self { rules, pool: Vec::new() }
    }

    pub fn players(&self) -> &[Player] {
        &self.pool
    }

    pub fn counts(&self) -> PositionCounts {
        count_positions(&self.pool)
    }

    pub fn spent(&self) -> Price {
        self.pool.iter().map(|player| player.price).sum()
    }

    pub fn remaining_budget(&self) -> Price {
        self.rules.budget_pool.saturating_sub(self.spent())
    }

    pub fn is_complete(&self) -> bool {
        self.counts() == POOL_LAYOUT
    }

    /// Pick a player. Rejected picks leave the pool unchanged.
    pub fn add(&mut self, player: Player) -> Result<()> {
        if self.pool.iter().any(|picked| picked.id == player.id) {
            return Err(SquadError::DuplicatePlayer(player.id));
        }

        let held = self.counts().get(player.position);
        let limit = POOL_LAYOUT.get(player.position);
        if held >= limit {
            return Err(SquadError::PositionCount {
                position: player.position,
                bound: BoundKind::Maximum,
                limit,
                actual: held + 1,
            });
        }

        let remaining = self.remaining_budget();
        if player.price > remaining {
            return Err(SquadError::Budget { price: player.price, remaining });
        }

        let from_club = self.pool.iter().filter(|picked| picked.club == player.club).count();
        if from_club >= usize::from(self.rules.club_cap) {
            return Err(SquadError::ClubCap { club: player.club, limit: self.rules.club_cap });
        }

        debug!(id = %player.id, position = %player.position, price = %player.price, "player picked");
        self.pool.push(player);
        Ok(())
    }

    pub fn remove(&mut self, id: PlayerId) -> Result<Player> {
        let index = self
            .pool
            .iter()
            .position(|player| player.id == id)
            .ok_or(SquadError::UnknownPlayer(id))?;
        Ok(self.pool.remove(index))
    }

    /// Split the pool into a lineup in `formation` and a goalkeeper-first
    /// bench. Players are fielded in pick order.
    pub fn finish(&self, formation: Formation) -> Result<SquadState> {
        let counts = self.counts();
        if let Some(position) = Position::ALL.into_iter().find(|p| counts.get(*p) < POOL_LAYOUT.get(*p)) {
            return Err(SquadError::PositionCount {
                position,
                bound: BoundKind::Minimum,
                limit: POOL_LAYOUT.get(position),
                actual: counts.get(position),
            });
        }

        let mut fielded = PositionCounts::default();
        let mut main = Vec::with_capacity(self.rules.main_size);
        let mut bench = Vec::with_capacity(self.rules.bench_size);
        for player in &self.pool {
            if fielded.get(player.position) < formation.counts().get(player.position) {
                fielded.increment(player.position);
                main.push(player.clone());
            } else {
                bench.push(player.clone().with_role(Role::Bench));
            }
        }
        bench.sort_by_key(|player| player.position.order());

        let squad = SquadState::new(main, bench, None, None);
        squad.validate(&self.rules)?;
        Ok(squad)
    }
}

impl Default for SquadBuilder {
    fn default() -> Self {
        Self::new(RulesConfig::default())
    }
}
