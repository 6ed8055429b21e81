//! Phase scheduling.
//!
//! A turn is an unordered set of phases. Each step picks one pending phase
//! uniformly at random and runs it; when none are pending the turn is over,
//! the flags reset and the turn counter advances.

use rand::Rng;

use crate::board::{BattalionId, GameEvent, GameState, PhaseKind, UnitId};
use crate::error::GameError;
use crate::movegen::strategy_command;

use super::combat::evaluate_combat;
use super::interpret::{process_command, Effect};

/// The outcome of one scheduling step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhaseStep {
    pub label: String,
    /// The board changed and should be redrawn.
    pub redraw: bool,
}

/// Returns true while some phase has not run this turn.
pub fn active_phases(state: &GameState) -> bool {
    state.phases.iter().any(|p| !p.performed)
}

/// Marks every phase as not yet performed.
pub fn reset_phases(state: &mut GameState) {
    for phase in &mut state.phases {
        phase.performed = false;
    }
}

/// Picks a pending phase uniformly at random, runs it, and marks it performed.
///
/// Callers must check `active_phases` first; stepping a finished turn is an error.
pub fn next_phase(state: &mut GameState, rng: &mut impl Rng) -> Result<PhaseStep, GameError> {
    let pending: Vec<usize> = state
        .phases
        .iter()
        .enumerate()
        .filter(|(_, p)| !p.performed)
        .map(|(i, _)| i)
        .collect();
    if pending.is_empty() {
        return Err(GameError::NoPendingPhase);
    }

    let idx = pending[rng.gen_range(0..pending.len())];
    let label = state.phases[idx].label.clone();
    let kind = state.phases[idx].kind;

    state.record(GameEvent::PhaseExecuted {
        label: label.clone(),
    });
    let redraw = execute_phase(kind, state, rng)?;
    state.phases[idx].performed = true;

    Ok(PhaseStep { label, redraw })
}

/// Runs a single phase. Returns true if the board should be redrawn.
///
/// Movement phases always request a redraw; combat phases only when a
/// command changed the board.
pub fn execute_phase(
    kind: PhaseKind,
    state: &mut GameState,
    rng: &mut impl Rng,
) -> Result<bool, GameError> {
    match kind {
        PhaseKind::Combat(side) => {
            let effects = evaluate_combat(side, state, rng)?;
            Ok(effects.into_iter().any(Effect::changes_board))
        }
        PhaseKind::Movement(battalion) => {
            move_battalion(battalion, state, rng)?;
            Ok(true)
        }
    }
}

/// Applies the battalion's strategy to each of its active units in order.
pub fn move_battalion(
    id: BattalionId,
    state: &mut GameState,
    rng: &mut impl Rng,
) -> Result<Vec<Effect>, GameError> {
    let battalion = state
        .battalion(id)
        .ok_or(GameError::UnknownBattalion(id))?;
    let strategy = battalion.strategy;
    let count = battalion.units.len();

    let mut effects = Vec::with_capacity(count);
    for unit in 0..count {
        let unit_id = UnitId {
            side: id.side,
            battalion: id.index,
            unit,
        };
        if !state.unit(unit_id).is_active() {
            continue;
        }
        let command = strategy_command(strategy, unit_id, state, rng)?;
        effects.push(process_command(unit_id, &command, state, rng)?);
    }
    Ok(effects)
}

/// Logs the start of the current turn.
pub fn begin_turn(state: &mut GameState) {
    let turn = state.turn;
    state.record(GameEvent::TurnStarted { turn });
}

/// Closes a completed turn: resets the phase flags and advances the counter.
pub fn advance_turn(state: &mut GameState) {
    reset_phases(state);
    state.turn += 1;
}

/// Plays one whole turn: every phase once, in random order.
pub fn play_turn(state: &mut GameState, rng: &mut impl Rng) -> Result<Vec<PhaseStep>, GameError> {
    begin_turn(state);
    let mut steps = Vec::with_capacity(state.phases.len());
    while active_phases(state) {
        steps.push(next_phase(state, rng)?);
    }
    advance_turn(state);
    Ok(steps)
}
