//! Scripted move generation.
//!
//! Turns a battalion's strategy into a command for each of its units, and
//! enumerates retreat destinations for units that lose a combat.

pub mod circle;
pub mod evacuate;
pub mod retreat;

use rand::Rng;

use crate::board::{Command, GameState, Strategy, UnitId};
use crate::error::GameError;

pub use circle::circle_command;
pub use evacuate::{evacuate_command, DistanceField};
pub use retreat::retreat_cells;

/// Chooses the command `strategy` gives the unit `id`.
///
/// Inactive units and units without a strategy pass.
pub fn strategy_command(
    strategy: Strategy,
    id: UnitId,
    state: &GameState,
    rng: &mut impl Rng,
) -> Result<Command, GameError> {
    if !state.unit(id).is_active() {
        return Ok(Command::Pass);
    }
    match strategy {
        Strategy::Circle => Ok(circle_command(id, state)),
        Strategy::Evacuate => evacuate_command(id, state, rng),
        Strategy::Uninitialized => Ok(Command::Pass),
    }
}
