//! Slot assignment and the `(role, position, slot) -> player` index.

use fxhash::FxHashMap;
use serde::{Deserialize, Serialize};

use super::bench::normalize_bench;
use crate::error::{Result, SquadError};
use crate::models::{Player, PlayerId, Position, Role};

/// Stable address of a rendered player slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SlotKey {
    pub role: Role,
    pub position: Position,
    pub slot: u8,
}

impl SlotKey {
    pub fn of(player: &Player) -> Self {
        Self { role: player.role, position: player.position, slot: player.slot_index }
    }
}

/// Assign slot indices to one side of the squad.
///
/// Main lineup: stable sort into canonical position order, then number each
/// position group from 0. Bench: the bench invariant (goalkeeper first,
/// index = substitution order).
pub fn assign_slots(players: &mut Vec<Player>, role: Role) {
    match role {
        Role::Main => {
            players.sort_by_key(|player| player.position.order());
            let mut current: Option<Position> = None;
            let mut counter: u8 = 0;
            for player in players.iter_mut() {
                if current != Some(player.position) {
                    current = Some(player.position);
                    counter = 0;
                }
                player.role = Role::Main;
                player.slot_index = counter;
                counter += 1;
            }
        }
        Role::Bench => normalize_bench(players),
    }
}

/// Canonical lookup structure for "which player is in this slot" and back.
#[derive(Debug, Clone, Default)]
pub struct SlotIndex {
    by_slot: FxHashMap<SlotKey, PlayerId>,
    by_player: FxHashMap<PlayerId, SlotKey>,
}

impl SlotIndex {
    /// Index both sides. Fails on a reused slot or a repeated player id.
    pub fn build(main: &[Player], bench: &[Player]) -> Result<Self> {
        let mut index = SlotIndex::default();
        for player in main.iter().chain(bench) {
            let key = SlotKey::of(player);
            if index.by_player.insert(player.id, key).is_some() {
                return Err(SquadError::DuplicatePlayer(player.id));
            }
            if index.by_slot.insert(key, player.id).is_some() {
                return Err(SquadError::DuplicateSlot {
                    role: key.role,
                    position: key.position,
                    slot: key.slot,
                });
            }
        }
        Ok(index)
    }

    pub fn player_at(&self, key: SlotKey) -> Option<PlayerId> {
        self.by_slot.get(&key).copied()
    }

    pub fn slot_of(&self, id: PlayerId) -> Option<SlotKey> {
        self.by_player.get(&id).copied()
    }

    pub fn len(&self) -> usize {
        self.by_player.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_player.is_empty()
    }
}
