//! Combat resolution.
//!
//! During a side's combat phase each of its active units engages the first
//! adjacent enemy it finds: a strictly stronger unit attacks, anything else
//! retreats.

use rand::Rng;

use crate::board::{Command, GameState, Side, UnitId, DIRECTIONS};
use crate::error::GameError;

use super::interpret::{process_command, Effect};

/// The combat command for an aggressor unit, or `None` if it is inactive or
/// has no adjacent active enemy.
///
/// Defenders are scanned battalion by battalion, unit by unit, direction by
/// direction; the first adjacency wins.
pub fn combat_command(aggressor: UnitId, state: &GameState) -> Option<Command> {
    let attacker = state.unit(aggressor);
    if !attacker.is_active() {
        return None;
    }

    for defender_id in state.side_unit_ids(aggressor.side.other()) {
        let defender = state.unit(defender_id);
        if !defender.is_active() {
            continue;
        }
        let adjacent = DIRECTIONS
            .iter()
            .any(|&d| state.grid.neighbor(attacker.pos, d) == Some(defender.pos));
        if adjacent {
            let command = if attacker.strength > defender.strength {
                Command::Attack {
                    target: defender.name.clone(),
                }
            } else {
                Command::Retreat
            };
            return Some(command);
        }
    }
    None
}

/// Runs a combat phase with `aggressor` attacking.
///
/// Units are visited in roster order and statuses are re-read for each one,
/// so a unit destroyed or moved earlier in the phase is seen as such.
/// Returns the effects of the commands issued.
pub fn evaluate_combat(
    aggressor: Side,
    state: &mut GameState,
    rng: &mut impl Rng,
) -> Result<Vec<Effect>, GameError> {
    let mut effects = Vec::new();
    for id in state.side_unit_ids(aggressor) {
        if let Some(command) = combat_command(id, state) {
            effects.push(process_command(id, &command, state, rng)?);
        }
    }
    Ok(effects)
}
