//! Bench ordering: the goalkeeper always sits in bench slot 0, outfield
//! players follow in substitution priority.

use crate::error::{Result, SquadError};
use crate::models::{Player, PlayerId, Role};

/// Move the goalkeeper (if any) to the front, keep everyone else in their
/// current order and renumber slots from 0.
pub fn normalize_bench(bench: &mut Vec<Player>) {
    if let Some(gk_index) = bench.iter().position(Player::is_goalkeeper) {
        if gk_index != 0 {
            let goalkeeper = bench.remove(gk_index);
            bench.insert(0, goalkeeper);
        }
    }
    for (slot, player) in bench.iter_mut().enumerate() {
        player.role = Role::Bench;
        player.slot_index = slot as u8;
    }
}

/// Exchange the substitution priority of two outfield bench players.
pub fn reorder_bench(bench: &mut Vec<Player>, first: PlayerId, second: PlayerId) -> Result<()> {
    let locate = |id: PlayerId| {
        bench
            .iter()
            .position(|player| player.id == id)
            .ok_or(SquadError::IdentityLookup { id, role: Role::Bench })
    };
    let a = locate(first)?;
    let b = locate(second)?;
    if bench[a].is_goalkeeper() || bench[b].is_goalkeeper() {
        return Err(SquadError::GoalkeeperExclusivity);
    }
    bench.swap(a, b);
    normalize_bench(bench);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Position, Price};
    use proptest::prelude::*;

    fn bench_of(positions: &[Position]) -> Vec<Player> {
        positions
            .iter()
            .enumerate()
            .map(|(i, position)| {
                Player::new(i as u32 + 1, *position, Price::from_tenths(40), "CLB")
                    .with_role(Role::Bench)
            })
            .collect()
    }

    #[test]
    fn test_goalkeeper_moves_to_front() {
        let mut bench = bench_of(&[
            Position::Defender,
            Position::Forward,
            Position::Goalkeeper,
            Position::Midfielder,
        ]);
        normalize_bench(&mut bench);
        let ids: Vec<u32> = bench.iter().map(|p| p.id.0).collect();
        assert_eq!(ids, vec![3, 1, 2, 4]);
        let slots: Vec<u8> = bench.iter().map(|p| p.slot_index).collect();
        assert_eq!(slots, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_reorder_outfield_players() {
        let mut bench = bench_of(&[
            Position::Goalkeeper,
            Position::Defender,
            Position::Midfielder,
            Position::Forward,
        ]);
        reorder_bench(&mut bench, PlayerId(2), PlayerId(4)).unwrap();
        let ids: Vec<u32> = bench.iter().map(|p| p.id.0).collect();
        assert_eq!(ids, vec![1, 4, 3, 2]);
        assert_eq!(bench[1].slot_index, 1);
    }

    #[test]
    fn test_reorder_rejects_goalkeeper() {
        let mut bench = bench_of(&[
            Position::Goalkeeper,
            Position::Defender,
            Position::Midfielder,
            Position::Forward,
        ]);
        let before = bench.clone();
        assert_eq!(
            reorder_bench(&mut bench, PlayerId(1), PlayerId(3)),
            Err(SquadError::GoalkeeperExclusivity)
        );
        assert_eq!(bench, before);
    }

    #[test]
    fn test_reorder_unknown_player() {
        let mut bench = bench_of(&[Position::Goalkeeper, Position::Defender]);
        assert!(matches!(
            reorder_bench(&mut bench, PlayerId(2), PlayerId(99)),
            Err(SquadError::IdentityLookup { .. })
        ));
    }

    proptest! {
        /// Any permutation of a bench with one goalkeeper normalizes to
        /// GK at slot 0 and outfield slots 1..=3.
        #[test]
        fn prop_bench_goalkeeper_first(order in Just(vec![0usize, 1, 2, 3]).prop_shuffle(),
                                       swaps in proptest::collection::vec((1u32..=4, 1u32..=4), 0..6)) {
            let positions = [
                Position::Goalkeeper,
                Position::Defender,
                Position::Midfielder,
                Position::Forward,
            ];
            let shuffled: Vec<Position> = order.iter().map(|&i| positions[i]).collect();
            let mut bench = bench_of(&shuffled);
            normalize_bench(&mut bench);
            for (a, b) in swaps {
                let _ = reorder_bench(&mut bench, PlayerId(a), PlayerId(b));
            }

            prop_assert_eq!(bench[0].position, Position::Goalkeeper);
            prop_assert_eq!(bench[0].slot_index, 0);
            let mut rest: Vec<u8> = bench[1..].iter().map(|p| p.slot_index).collect();
            rest.sort_unstable();
            prop_assert_eq!(rest, vec![1, 2, 3]);
        }
    }
}
