//! Transfer cost accounting for one tour.

use fxhash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::config::RulesConfig;
use crate::models::{PlayerId, SquadState};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TransferCost {
    pub change_count: u32,
    pub free_used: u32,
    pub paid: u32,
    pub points_penalty: u32,
}

impl TransferCost {
    pub fn is_free(&self) -> bool {
        self.points_penalty == 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferLedger {
    free_per_tour: u32,
    penalty_per_paid: u32,
}

impl TransferLedger {
    pub fn new(rules: &RulesConfig) -> Self {
        Self {
            free_per_tour: rules.free_transfers_per_tour,
            penalty_per_paid: rules.paid_transfer_penalty,
        }
    }

    /// Quota granted at the start of each tour. Unused transfers do not
    /// carry over.
    pub fn free_quota(&self) -> u32 {
        self.free_per_tour
    }

    /// Cost of `change_count` changes with `free_available` free transfers
    /// left. Under an unlimited-transfer boost every change is free; the
    /// tour quota is not consumed by the caller in that case.
    pub fn cost(&self, change_count: u32, free_available: u32, boost_active: bool) -> TransferCost {
        if boost_active {
            return TransferCost { change_count, free_used: change_count, paid: 0, points_penalty: 0 };
        }
        let free_used = change_count.min(free_available);
        let paid = change_count - free_used;
        TransferCost {
            change_count,
            free_used,
            paid,
            points_penalty: paid * self.penalty_per_paid,
        }
    }
}

impl Default for TransferLedger {
    fn default() -> Self {
        Self::new(&RulesConfig::default())
    }
}

/// Number of transfers between two rosters. A removal paired with an
/// addition is one transfer, an unpaired removal or addition also counts
/// as one.
pub fn count_changes(before: &SquadState, after: &SquadState) -> u32 {
    let old: FxHashSet<PlayerId> = before.players().map(|player| player.id).collect();
    let new: FxHashSet<PlayerId> = after.players().map(|player| player.id).collect();
    let removed = old.difference(&new).count();
    let added = new.difference(&old).count();
    removed.max(added) as u32
}
