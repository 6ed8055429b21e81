//! Retreat destination generation.
//!
//! Enumerates the cells a unit may fall back to when it loses a combat.

use crate::board::{Coord, GameState, UnitId, DIRECTIONS};

/// Returns the legal retreat cells for a unit, in direction order.
///
/// A retreat cell must be:
/// - on the grid,
/// - not occupied by an active unit,
/// - not adjacent to an active enemy of the retreating unit.
///
/// Returns an empty vec for inactive units or when the unit is boxed in.
pub fn retreat_cells(id: UnitId, state: &GameState) -> Vec<Coord> {
    let unit = state.unit(id);
    if !unit.is_active() {
        return Vec::new();
    }

    DIRECTIONS
        .iter()
        .filter_map(|&d| state.grid.neighbor(unit.pos, d))
        .filter(|&cell| !state.is_occupied(cell))
        .filter(|&cell| !state.adjacent_to_enemy(cell, unit.side, 1))
        .collect()
}
