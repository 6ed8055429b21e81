//! Circle strategy: patrol in lockstep with the turn counter.

use crate::board::{Command, GameState, UnitId, DIRECTIONS};

/// Moves one step in direction `DIRECTIONS[turn % 6]`.
///
/// Every circle unit turns clockwise together, one direction per turn. A unit
/// whose step would leave the grid or land on an occupied cell passes.
pub fn circle_command(id: UnitId, state: &GameState) -> Command {
    let unit = state.unit(id);
    let direction = DIRECTIONS[(state.turn % 6) as usize];

    match state.grid.neighbor(unit.pos, direction) {
        Some(to) if !state.is_occupied(to) => Command::Move { from: unit.pos, to },
        _ => Command::Pass,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Battalion, Coord, HexGrid, Player, Side, Strategy, Unit};

    fn state_at(pos: Coord, turn: u32) -> GameState {
        let red = Player::new(Side::Red, "Red").with_battalion(
            Battalion::new("Patrol", Strategy::Circle).with_unit(Unit::new("P1", pos, 1)),
        );
        let blue = Player::new(Side::Blue, "Blu").with_battalion(
            Battalion::new("Guard", Strategy::Uninitialized)
                .with_unit(Unit::new("G1", Coord::new(7, 5), 1)),
        );
        let mut state = GameState::new(HexGrid::new(8, 6), Coord::new(0, 0), [red, blue]);
        state.turn = turn;
        state
    }

    fn target(state: &GameState) -> Command {
        circle_command(state.find_unit("P1").unwrap(), state)
    }

    #[test]
    fn direction_follows_turn() {
        let pos = Coord::new(3, 2);
        let expected = [
            Coord::new(3, 1),
            Coord::new(4, 2),
            Coord::new(4, 3),
            Coord::new(3, 3),
            Coord::new(2, 3),
            Coord::new(2, 2),
        ];
        for (turn, want) in expected.iter().enumerate() {
            let state = state_at(pos, turn as u32);
            assert_eq!(target(&state), Command::Move { from: pos, to: *want });
        }
        // Wraps around after six turns.
        assert_eq!(
            target(&state_at(pos, 6)),
            Command::Move { from: pos, to: Coord::new(3, 1) }
        );
    }

    #[test]
    fn edge_of_map_passes() {
        let state = state_at(Coord::new(0, 0), 0);
        assert_eq!(target(&state), Command::Pass);
    }

    #[test]
    fn occupied_destination_passes() {
        // Turn 3 heads south from (7, 4) onto the guard at (7, 5).
        let state = state_at(Coord::new(7, 4), 3);
        assert_eq!(target(&state), Command::Pass);
    }
}
