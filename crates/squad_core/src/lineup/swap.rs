//! Field/bench swap validation.
//!
//! Rules, in order:
//! 1. A goalkeeper only swaps with a goalkeeper.
//! 2. Same position: the formation cannot change.
//! 3. Otherwise simulate the exchange and classify the resulting lineup.
//!
//! The field player is located by id only. A missing id is a caller bug and
//! is reported as [`SquadError::IdentityLookup`]; there is no positional
//! fallback that could pick the wrong player.

use tracing::error;

use crate::error::{Result, SquadError};
use crate::models::{Player, Role};
use crate::tactics::{count_positions, detect_positions, Formation};

/// Validate exchanging `field` (in `main`) with `bench`. Returns the formation
/// the main lineup would have afterwards. Pure.
pub fn validate_swap(main: &[Player], field: &Player, bench: &Player) -> Result<Formation> {
    if field.is_goalkeeper() != bench.is_goalkeeper() {
        return Err(SquadError::GoalkeeperExclusivity);
    }

    let Some(field_index) = main.iter().position(|player| player.id == field.id) else {
        error!(player_id = %field.id, "swap target missing from main lineup");
        return Err(SquadError::IdentityLookup { id: field.id, role: Role::Main });
    };

    if field.position == bench.position {
        let counts = count_positions(main);
        return Formation::from_counts(&counts).ok_or_else(|| SquadError::formation(counts));
    }

    let simulated = main.iter().enumerate().map(|(index, player)| {
        if index == field_index {
            bench.position
        } else {
            player.position
        }
    });
    match detect_positions(simulated.clone()) {
        Some(formation) => Ok(formation),
        None => Err(SquadError::formation(simulated.collect())),
    }
}
