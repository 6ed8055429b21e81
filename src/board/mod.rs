//! Board representation and game-state types.
//!
//! Contains the hex geometry, units, battalions, players, phases, unit
//! commands, and the overall game state.

pub mod command;
pub mod hex;
pub mod state;
pub mod unit;

pub use command::{Command, UnitCommand};
pub use hex::{Coord, Direction, HexGrid, DIRECTIONS};
pub use state::{
    Battalion, BattalionId, GameEvent, GameState, Phase, PhaseKind, Player, SideTally, Strategy,
};
pub use unit::{Side, Unit, UnitId, UnitStatus, ALL_SIDES};
