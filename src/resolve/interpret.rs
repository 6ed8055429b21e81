//! Command interpreter.
//!
//! Applies a unit command to the game state. This is the only place unit
//! positions and statuses change once a game is running.

use rand::Rng;
use tracing::info;

use crate::board::{Command, Coord, GameEvent, GameState, UnitCommand, UnitId, UnitStatus};
use crate::error::GameError;
use crate::movegen::retreat_cells;
use crate::protocol::parse_command;

/// What applying a command did to the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    Unchanged,
    Moved { from: Coord, to: Coord },
    Evacuated(UnitId),
    Destroyed(UnitId),
}

impl Effect {
    /// True if the board needs a redraw.
    pub fn changes_board(self) -> bool {
        match self {
            Effect::Unchanged => false,
            Effect::Moved { from, to } => from != to,
            Effect::Evacuated(_) | Effect::Destroyed(_) => true,
        }
    }
}

/// Applies `command` to the unit `id`, logging the command line first.
///
/// `MV` relocates unconditionally; callers only issue legal moves.
/// `RETREAT` picks a uniformly random safe neighbor and moves there, or
/// destroys the unit in place when there is none.
///
/// Only `PASS` may name a unit that has left the board, and `ATTACK` must
/// target an active unit. Anything else is `GameError::InactiveUnit` and
/// leaves the state untouched.
pub fn process_command(
    id: UnitId,
    command: &Command,
    state: &mut GameState,
    rng: &mut impl Rng,
) -> Result<Effect, GameError> {
    let unit = state.unit(id);
    let name = unit.name.clone();
    if !unit.is_active() && *command != Command::Pass {
        return Err(GameError::InactiveUnit(name));
    }
    let target_id = match command {
        Command::Attack { target } => {
            let target_id = state
                .find_unit(target)
                .ok_or_else(|| GameError::UnknownUnit(target.clone()))?;
            if !state.unit(target_id).is_active() {
                return Err(GameError::InactiveUnit(target.clone()));
            }
            Some(target_id)
        }
        _ => None,
    };
    log_command(state, UnitCommand::new(name.clone(), command.clone()));

    match command {
        Command::Evacuate => {
            state.unit_mut(id).remove(UnitStatus::OffBoard);
            state.record(GameEvent::UnitEvacuated { unit: name });
            Ok(Effect::Evacuated(id))
        }
        Command::Pass => Ok(Effect::Unchanged),
        Command::Move { to, .. } => Ok(relocate(id, Some(*to), state)),
        Command::Attack { .. } => match target_id {
            Some(target_id) => Ok(relocate(target_id, None, state)),
            None => Ok(Effect::Unchanged),
        },
        Command::Retreat => {
            let cells = retreat_cells(id, state);
            if cells.is_empty() {
                info!("{} has nowhere to retreat and is destroyed!", name);
                return Ok(relocate(id, None, state));
            }
            let to = cells[rng.gen_range(0..cells.len())];
            let from = state.unit(id).pos;
            log_command(state, UnitCommand::new(name, Command::Move { from, to }));
            Ok(relocate(id, Some(to), state))
        }
    }
}

/// Parses a command line and applies it to the unit it names.
pub fn process_line(
    line: &str,
    state: &mut GameState,
    rng: &mut impl Rng,
) -> Result<Effect, GameError> {
    let parsed = parse_command(line)?;
    let id = state
        .find_unit(&parsed.unit)
        .ok_or_else(|| GameError::UnknownUnit(parsed.unit.clone()))?;
    process_command(id, &parsed.command, state, rng)
}

fn log_command(state: &mut GameState, cmd: UnitCommand) {
    state.record(GameEvent::CommandIssued {
        text: cmd.to_string(),
    });
}

/// Moves the unit to `dest`, or destroys it when `dest` is `None`.
fn relocate(id: UnitId, dest: Option<Coord>, state: &mut GameState) -> Effect {
    let unit = state.unit_mut(id);
    match dest {
        Some(to) => {
            let from = unit.pos;
            unit.pos = to;
            Effect::Moved { from, to }
        }
        None => {
            unit.remove(UnitStatus::Destroyed);
            let name = unit.name.clone();
            state.record(GameEvent::UnitDestroyed { unit: name });
            Effect::Destroyed(id)
        }
    }
}
