//! Errors raised while running a game.
//!
//! None of these are recoverable: commands are generated by the engine
//! itself, so any of them means the game state is corrupt and the game loop
//! halts.

use thiserror::Error;

use crate::board::{BattalionId, Coord};
use crate::protocol::CommandError;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GameError {
    #[error("malformed command: {0}")]
    Command(#[from] CommandError),

    #[error("no unit named '{0}'")]
    UnknownUnit(String),

    #[error("unit '{0}' is no longer on the board")]
    InactiveUnit(String),

    #[error("no battalion {} on side {:?}", .0.index, .0.side)]
    UnknownBattalion(BattalionId),

    #[error("no improving move for {unit} at {at}: grid is disconnected from the evacuation cell")]
    PathfindingInvariant { unit: String, at: Coord },

    #[error("no pending phase to execute")]
    NoPendingPhase,
}
