//! Evacuate strategy: walk toward the evacuation cell.
//!
//! Each call floods a fresh breadth-first distance field from the
//! evacuation cell and steps the unit to a random neighbor that is strictly
//! closer.

use std::collections::VecDeque;

use rand::Rng;
use tracing::{debug, warn};

use crate::board::{Command, Coord, GameState, HexGrid, UnitId};
use crate::error::GameError;

/// Shortest hex-step distance from every cell to a root cell.
///
/// Cells that cannot be reached keep `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DistanceField {
    grid: HexGrid,
    dist: Vec<Option<u32>>,
}

impl DistanceField {
    /// Floods the grid from `root`. Every reachable cell is enqueued once.
    pub fn build(grid: HexGrid, root: Coord) -> Self {
        let mut dist = vec![None; grid.cell_count()];
        let mut queue = VecDeque::new();

        if let Some(idx) = grid.index(root) {
            dist[idx] = Some(0);
            queue.push_back((root, 0u32));
        }

        while let Some((cell, d)) = queue.pop_front() {
            for next in grid.neighbors(cell) {
                let Some(idx) = grid.index(next) else {
                    continue;
                };
                if dist[idx].is_none() {
                    dist[idx] = Some(d + 1);
                    queue.push_back((next, d + 1));
                }
            }
        }

        DistanceField { grid, dist }
    }

    /// Distance from `cell` to the root, or `None` if off-grid or unreachable.
    pub fn get(&self, cell: Coord) -> Option<u32> {
        self.grid.index(cell).and_then(|idx| self.dist[idx])
    }

    /// Neighbors of `cell` strictly closer to the root, in direction order.
    pub fn improving_neighbors(&self, cell: Coord) -> Vec<Coord> {
        let Some(here) = self.get(cell) else {
            return Vec::new();
        };
        self.grid
            .neighbors(cell)
            .filter(|&n| matches!(self.get(n), Some(d) if d < here))
            .collect()
    }
}

/// Chooses the evacuate-strategy command for an active unit.
///
/// On the evacuation cell the unit evacuates. Otherwise it moves to a
/// uniformly random unoccupied neighbor with a smaller distance, or passes
/// if every such neighbor is occupied.
pub fn evacuate_command(
    id: UnitId,
    state: &GameState,
    rng: &mut impl Rng,
) -> Result<Command, GameError> {
    let unit = state.unit(id);
    let field = DistanceField::build(state.grid, state.evacuation);

    if field.get(unit.pos) == Some(0) {
        return Ok(Command::Evacuate);
    }

    let improving = field.improving_neighbors(unit.pos);
    if improving.is_empty() {
        return Err(GameError::PathfindingInvariant {
            unit: unit.name.clone(),
            at: unit.pos,
        });
    }

    let open: Vec<Coord> = improving
        .into_iter()
        .filter(|&c| !state.is_occupied(c))
        .collect();
    debug!(unit = %unit.name, candidates = open.len(), "evacuate candidates");

    if open.is_empty() {
        warn!(unit = %unit.name, at = %unit.pos, "evacuation route blocked");
        return Ok(Command::Pass);
    }

    let to = open[rng.gen_range(0..open.len())];
    Ok(Command::Move { from: unit.pos, to })
}
