//! Game loop and the state handle shared with the presentation side.
//!
//! The loop is the only writer of `GameState`. Each phase step runs under
//! the write lock, so a reader sees the board either before or after a
//! command, never halfway through one. The presentation side reads
//! snapshots, raises the stop signal, and clears the dirty flag.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::thread;
use std::time::Duration;

use rand::Rng;
use serde::Serialize;

use crate::board::{
    Coord, GameEvent, GameState, HexGrid, Side, SideTally, UnitStatus, ALL_SIDES,
};
use crate::error::GameError;
use crate::resolve::{active_phases, advance_turn, begin_turn, next_phase};

/// Default pause between phase steps, in milliseconds.
pub const DEFAULT_PACING_MS: u64 = 1000;

/// Default number of turns before the game ends.
pub const DEFAULT_MAX_TURNS: u32 = 10;

/// Game loop settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoopConfig {
    /// The game ends once this many turns have been played.
    pub max_turns: u32,
    /// Pause after each phase step so the board can be watched.
    pub pacing: Duration,
}

impl Default for LoopConfig {
    fn default() -> Self {
        LoopConfig {
            max_turns: DEFAULT_MAX_TURNS,
            pacing: Duration::from_millis(DEFAULT_PACING_MS),
        }
    }
}

/// Read-only copy of one unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitView {
    pub name: String,
    pub side: Side,
    pub pos: Coord,
    pub strength: i32,
    pub status: UnitStatus,
}

/// Read-only snapshot of everything the renderer needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameView {
    pub turn: u32,
    pub grid: HexGrid,
    pub evacuation: Coord,
    pub player_names: [String; 2],
    pub units: Vec<UnitView>,
}

impl GameView {
    pub fn from_state(state: &GameState) -> Self {
        GameView {
            turn: state.turn,
            grid: state.grid,
            evacuation: state.evacuation,
            player_names: [
                state.players[0].name.clone(),
                state.players[1].name.clone(),
            ],
            units: state
                .units()
                .map(|u| UnitView {
                    name: u.name.clone(),
                    side: u.side,
                    pos: u.pos,
                    strength: u.strength,
                    status: u.status,
                })
                .collect(),
        }
    }

    /// The active unit on `cell`, if any.
    pub fn unit_at(&self, cell: Coord) -> Option<&UnitView> {
        self.units
            .iter()
            .find(|u| u.status == UnitStatus::Active && u.pos == cell)
    }
}

/// Why the game loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Finish {
    TurnLimit,
    Stopped,
}

/// Final state of a game loop run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameSummary {
    pub finish: Finish,
    pub turns_played: u32,
    pub tallies: [SideTally; 2],
}

/// Game state shared between the game loop and the presentation loop.
#[derive(Debug)]
pub struct SharedGame {
    state: RwLock<GameState>,
    running: AtomicBool,
    dirty: AtomicBool,
}

impl SharedGame {
    /// Wraps a freshly set up game. Starts running and dirty.
    pub fn new(state: GameState) -> Self {
        SharedGame {
            state: RwLock::new(state),
            running: AtomicBool::new(true),
            dirty: AtomicBool::new(true),
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Raises the stop signal. The loop exits before its next phase step.
    pub fn stop(&self) {
        self.running.store(false, Ordering::Release);
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty.load(Ordering::Acquire)
    }

    /// Returns whether a redraw is due and clears the flag.
    pub fn take_dirty(&self) -> bool {
        self.dirty.swap(false, Ordering::AcqRel)
    }

    fn mark_dirty(&self) {
        self.dirty.store(true, Ordering::Release);
    }

    /// Read access to the state, for inspection between steps.
    pub fn read(&self) -> RwLockReadGuard<'_, GameState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, GameState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Takes a snapshot for rendering.
    pub fn view(&self) -> GameView {
        GameView::from_state(&self.read())
    }

    pub fn into_state(self) -> GameState {
        self.state
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

/// Runs turns until the turn limit or the stop signal, then raises the
/// stop signal so the presentation loop winds down too.
///
/// Any game error halts the loop and is returned.
pub fn run_game(
    shared: &SharedGame,
    config: &LoopConfig,
    rng: &mut impl Rng,
) -> Result<GameSummary, GameError> {
    let result = drive(shared, config, rng);
    shared.stop();
    result
}

fn drive(
    shared: &SharedGame,
    config: &LoopConfig,
    rng: &mut impl Rng,
) -> Result<GameSummary, GameError> {
    let finish = loop {
        if !shared.is_running() {
            break Finish::Stopped;
        }

        {
            let mut state = shared.write();
            if state.turn > config.max_turns {
                state.record(GameEvent::GameOver {
                    turns: config.max_turns,
                });
                break Finish::TurnLimit;
            }
            begin_turn(&mut state);
        }

        while shared.is_running() {
            let step = {
                let mut state = shared.write();
                if !active_phases(&state) {
                    break;
                }
                next_phase(&mut state, rng)?
            };
            if step.redraw {
                shared.mark_dirty();
            }
            if !config.pacing.is_zero() {
                thread::sleep(config.pacing);
            }
        }

        let mut state = shared.write();
        if active_phases(&state) {
            // Stopped partway through the turn.
            break Finish::Stopped;
        }
        advance_turn(&mut state);
    };

    let state = shared.read();
    Ok(GameSummary {
        finish,
        turns_played: state.turn.saturating_sub(1),
        tallies: ALL_SIDES.map(|side| state.tally(side)),
    })
}
