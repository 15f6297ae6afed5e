//! Enumerate swap partners for a selected player.

use serde::{Deserialize, Serialize};

use super::swap::validate_swap;
use crate::error::{Result, SquadError};
use crate::models::{Player, PlayerId, Position, Role};
use crate::tactics::Formation;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapOption {
    pub id: PlayerId,
    pub position: Position,
    pub resulting_formation: Formation,
}

/// Every opposite-side player the selected player may legally swap with.
///
/// Goalkeepers only see goalkeepers; outfield players see every outfield
/// candidate whose exchange keeps the main lineup in a catalog formation.
pub fn swap_options(main: &[Player], bench: &[Player], selected: PlayerId) -> Result<Vec<SwapOption>> {
    if let Some(field) = main.iter().find(|player| player.id == selected) {
        return Ok(bench
            .iter()
            .filter(|candidate| candidate.is_goalkeeper() == field.is_goalkeeper())
            .filter_map(|candidate| {
                validate_swap(main, field, candidate).ok().map(|formation| SwapOption {
                    id: candidate.id,
                    position: candidate.position,
                    resulting_formation: formation,
                })
            })
            .collect());
    }

    let bench_player = bench
        .iter()
        .find(|player| player.id == selected)
        .ok_or(SquadError::UnknownPlayer(selected))?;
    Ok(main
        .iter()
        .filter(|candidate| candidate.is_goalkeeper() == bench_player.is_goalkeeper())
        .filter_map(|candidate| {
            validate_swap(main, candidate, bench_player).ok().map(|formation| SwapOption {
                id: candidate.id,
                position: candidate.position,
                resulting_formation: formation,
            })
        })
        .collect())
}

/// Bench players the selected bench player may trade substitution priority
/// with. Goalkeepers never reorder.
pub fn bench_reorder_options(bench: &[Player], selected: PlayerId) -> Result<Vec<PlayerId>> {
    let chosen = bench
        .iter()
        .find(|player| player.id == selected)
        .ok_or(SquadError::IdentityLookup { id: selected, role: Role::Bench })?;
    if chosen.is_goalkeeper() {
        return Ok(Vec::new());
    }
    Ok(bench
        .iter()
        .filter(|player| player.id != selected && !player.is_goalkeeper())
        .map(|player| player.id)
        .collect())
}
