//! Unit commands.
//!
//! Strategies and the combat resolver produce these typed values; the text
//! form (`"U1: MV (3, 2) -> (2, 2)"`) only appears at the logging boundary
//! and in `protocol::notation`.

use super::hex::Coord;

/// An action for a single unit.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Command {
    /// Move: `MV (3, 2) -> (2, 2)`
    Move { from: Coord, to: Coord },

    /// Attack: `ATTACK E1`
    Attack { target: String },

    /// Retreat to a safe neighbor, or be destroyed: `RETREAT`
    Retreat,

    /// Leave the board through the evacuation cell: `EVACUATE`
    Evacuate,

    /// Do nothing: `PASS`
    Pass,
}

/// A command addressed to a named unit.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UnitCommand {
    pub unit: String,
    pub command: Command,
}

impl UnitCommand {
    pub fn new(unit: impl Into<String>, command: Command) -> Self {
        UnitCommand {
            unit: unit.into(),
            command,
        }
    }
}
